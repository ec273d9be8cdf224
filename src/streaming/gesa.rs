//! The packed GESA row and its buffered reader/writer.

use crate::streaming::buffers::{FixedRecord, RecordReader, RecordWriter};
use crate::types::{Len, SeqId, Symbol, TERMINATE};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// One row of a Generalized Enhanced Suffix Array: the color of the
/// suffix's source sequence, its starting offset, its LCP with the
/// previous row, and its BWT symbol.
///
/// On disk this is a packed 13-byte record (`4 + 4 + 4 + 1`, no
/// alignment padding); fields are read and written individually in
/// little-endian order rather than relying on `#[repr(C, packed)]`
/// struct transmute, since Rust gives no portability guarantee for that
/// across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GesaRecord {
    pub text: SeqId,
    pub suff: Len,
    pub lcp: Len,
    pub bwt: Symbol,
}

impl GesaRecord {
    /// Canonicalize a `\0` BWT byte (the null the suffix-array builder
    /// writes for the sentinel position) to [`TERMINATE`].
    pub fn canonical_bwt(self) -> Symbol {
        if self.bwt == 0 {
            TERMINATE
        } else {
            self.bwt
        }
    }
}

impl FixedRecord for GesaRecord {
    const WIDTH: usize = 13;

    fn decode(bytes: &[u8]) -> Self {
        let text = SeqId::from_le_bytes(bytes[0..4].try_into().unwrap());
        let suff = Len::from_le_bytes(bytes[4..8].try_into().unwrap());
        let lcp = Len::from_le_bytes(bytes[8..12].try_into().unwrap());
        let bwt = bytes[12];
        GesaRecord { text, suff, lcp, bwt }
    }

    fn encode(&self, bytes: &mut [u8]) {
        bytes[0..4].copy_from_slice(&self.text.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.suff.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.lcp.to_le_bytes());
        bytes[12] = self.bwt;
    }
}

/// A forward-only buffered reader over a `.gesa` file.
pub struct GesaReader<R: Read>(RecordReader<R, GesaRecord>);

impl GesaReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::with_capacity(256 * 1024, file)))
    }
}

impl<R: Read> GesaReader<R> {
    pub fn new(inner: R) -> Self {
        Self(RecordReader::new(inner))
    }

    pub fn read_one(&mut self) -> std::io::Result<Option<GesaRecord>> {
        self.0.read_one()
    }
}

/// A forward-only buffered writer over a `.gesa` file.
pub struct GesaWriter<W: Write>(RecordWriter<W, GesaRecord>);

impl GesaWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::with_capacity(256 * 1024, file)))
    }
}

impl<W: Write> GesaWriter<W> {
    pub fn new(inner: W) -> Self {
        Self(RecordWriter::new(inner))
    }

    pub fn write_one(&mut self, record: &GesaRecord) -> std::io::Result<()> {
        self.0.write_one(record)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}
