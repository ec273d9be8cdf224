//! Typed readers/writers for the `.bwt`, `.id`, `.lcp` and `.d` sidecars.
//!
//! Each sidecar is a flat stream of one primitive per GESA row; the
//! `FixedRecord` impls below let them share the buffering engine in
//! [`crate::streaming::buffers`] while keeping distinct, self-documenting
//! type names at call sites.

use crate::streaming::buffers::{FixedRecord, RecordReader, RecordWriter};
use crate::types::{Len, SeqId, Symbol};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

impl FixedRecord for Symbol {
    const WIDTH: usize = 1;

    fn decode(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn encode(&self, bytes: &mut [u8]) {
        bytes[0] = *self;
    }
}

// `SeqId` and `Len` (see `types.rs`) are both aliases for `u32`, so a
// single impl covers the `.id`/`.lcp`/`.d` sidecars; giving each alias
// its own impl would be a conflicting-impl error over the same concrete
// type.
impl FixedRecord for u32 {
    const WIDTH: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        u32::from_le_bytes(bytes.try_into().unwrap())
    }

    fn encode(&self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }
}

macro_rules! typed_stream {
    ($reader:ident, $writer:ident, $elem:ty, $doc:literal) => {
        #[doc = $doc]
        pub struct $reader<R: Read>(RecordReader<R, $elem>);

        impl $reader<File> {
            pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
                let file = File::open(path)?;
                Ok(Self::new(BufReader::with_capacity(256 * 1024, file)))
            }
        }

        impl<R: Read> $reader<R> {
            pub fn new(inner: R) -> Self {
                Self(RecordReader::new(inner))
            }

            pub fn read_one(&mut self) -> std::io::Result<Option<$elem>> {
                self.0.read_one()
            }
        }

        #[doc = $doc]
        pub struct $writer<W: Write>(RecordWriter<W, $elem>);

        impl $writer<File> {
            pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
                let file = File::create(path)?;
                Ok(Self::new(BufWriter::with_capacity(256 * 1024, file)))
            }
        }

        impl<W: Write> $writer<W> {
            pub fn new(inner: W) -> Self {
                Self(RecordWriter::new(inner))
            }

            pub fn write_one(&mut self, value: &$elem) -> std::io::Result<()> {
                self.0.write_one(value)
            }

            pub fn flush(&mut self) -> std::io::Result<()> {
                self.0.flush()
            }
        }
    };
}

typed_stream!(SymbolReader, SymbolWriter, Symbol, "Buffered stream over a `.bwt` sidecar.");
typed_stream!(IdReader, IdWriter, SeqId, "Buffered stream over a `.id` sidecar.");
typed_stream!(LcpReader, LcpWriter, Len, "Buffered stream over a `.lcp` or `.d` sidecar.");

/// The D array is LCP-typed on disk; this alias documents the distinct
/// role while reusing [`LcpReader`]/[`LcpWriter`]'s buffering.
pub type DReader<R> = LcpReader<R>;
pub type DWriter<W> = LcpWriter<W>;

/// Writer-side helper for [`crate::dgen`]: encodes a completed LCP
/// interval as the dense D-array encoding described in the design --
/// `pos - last_pos` leading zeros followed by `lcp + 1`.
pub struct DEncoder<W: Write> {
    writer: DWriter<W>,
    last_pos: u64,
}

impl<W: Write> DEncoder<W> {
    pub fn new(writer: DWriter<W>) -> Self {
        Self { writer, last_pos: 0 }
    }

    /// Emit the zero run up to `pos`, then `lcp + 1`, and advance the
    /// cursor to `pos + 1`.
    pub fn write_pair(&mut self, pos: u64, lcp: Len) -> std::io::Result<()> {
        self.fill_with_zeros(pos - self.last_pos)?;
        self.writer.write_one(&(lcp + 1))?;
        self.last_pos = pos + 1;
        Ok(())
    }

    /// Emit `n` zero values without advancing past a boundary.
    pub fn fill_with_zeros(&mut self, n: u64) -> std::io::Result<()> {
        for _ in 0..n {
            self.writer.write_one(&0)?;
        }
        self.last_pos += n;
        Ok(())
    }

    /// Flush the remaining zero run up to `total` (the total row count of
    /// the GESA stream) and return the underlying writer flushed too.
    pub fn fill_to(&mut self, total: u64) -> std::io::Result<()> {
        if total > self.last_pos {
            self.fill_with_zeros(total - self.last_pos)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_stream_round_trips() {
        let data: Vec<Symbol> = b"banana$".to_vec();
        let mut raw = Vec::new();
        {
            let mut w = SymbolWriter::new(&mut raw);
            for s in &data {
                w.write_one(s).unwrap();
            }
            w.flush().unwrap();
        }
        let mut r = SymbolReader::new(raw.as_slice());
        let mut got = Vec::new();
        while let Some(s) = r.read_one().unwrap() {
            got.push(s);
        }
        assert_eq!(got, data);
    }

    #[test]
    fn d_encoder_produces_dense_stream() {
        let mut raw = Vec::new();
        {
            let mut enc = DEncoder::new(DWriter::new(&mut raw));
            enc.write_pair(2, 5).unwrap(); // zeros at 0,1 then value at 2
            enc.write_pair(4, 1).unwrap(); // zero at 3 then value at 4
            enc.fill_with_zeros(1).unwrap(); // trailing zero at 5
            enc.flush().unwrap();
        }
        let mut r = DReader::new(raw.as_slice());
        let mut got = Vec::new();
        while let Some(v) = r.read_one().unwrap() {
            got.push(v);
        }
        assert_eq!(got, vec![0, 0, 6, 0, 2, 0]);
    }
}
