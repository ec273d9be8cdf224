//! Collection metadata: per-color sequence lengths and alphabet
//! frequencies, with a text sidecar format and a binary lengths-only
//! loader.

use crate::error::{AcsError, Result};
use crate::streaming::gesa::GesaReader;
use crate::streaming::records::{IdReader, LcpReader, SymbolReader};
use crate::types::{Count, Len, SeqId, Symbol};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const COMPONENT: &str = "CollectionInfo";

/// Inventory of a collection of sequences: how long each color's
/// sequence is (including its trailing separator), how often each
/// alphabet symbol occurs across the whole collection, and the total
/// size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionInfo {
    colors: BTreeMap<SeqId, Len>,
    freq: BTreeMap<Symbol, u64>,
    total_size: Count,
}

impl CollectionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alphabet_size(&self) -> usize {
        self.freq.len()
    }

    pub fn sequence_count(&self) -> usize {
        self.colors.len()
    }

    pub fn total_size(&self) -> Count {
        self.total_size
    }

    pub fn sequence_length(&self, color: SeqId) -> Option<Len> {
        self.colors.get(&color).copied()
    }

    pub fn has_color(&self, color: SeqId) -> bool {
        self.colors.contains_key(&color)
    }

    pub fn frequency(&self, symbol: Symbol) -> u64 {
        self.freq.get(&symbol).copied().unwrap_or(0)
    }

    pub fn colors(&self) -> impl Iterator<Item = (&SeqId, &Len)> {
        self.colors.iter()
    }

    /// Verify the invariants stated in the design: total size equals the
    /// sum of lengths, colors are a dense range `[0, m)`, frequencies sum
    /// to the total size.
    pub fn validate(&self) -> Result<()> {
        let summed: Count = self.colors.values().map(|&l| l as Count).sum();
        if summed != self.total_size {
            return Err(AcsError::integrity(
                COMPONENT,
                "validate",
                format!(
                    "sum of sequence lengths ({}) does not match total size ({})",
                    summed, self.total_size
                ),
            ));
        }
        for (i, &color) in self.colors.keys().enumerate() {
            if color as usize != i {
                return Err(AcsError::integrity(
                    COMPONENT,
                    "validate",
                    format!("color range is not dense: missing color {}", i),
                ));
            }
        }
        let freq_sum: u64 = self.freq.values().sum();
        if freq_sum != self.total_size {
            return Err(AcsError::integrity(
                COMPONENT,
                "validate",
                format!(
                    "sum of symbol frequencies ({}) does not match total size ({})",
                    freq_sum, self.total_size
                ),
            ));
        }
        Ok(())
    }

    /// Load the text sidecar (`.info`) format:
    /// ```text
    /// <total_size>
    /// #<alphabet_size>
    /// <symbol>\t<frequency>   (alphabet_size lines)
    /// #<sequence_count>
    /// <color>\t<length>       (sequence_count lines)
    /// ```
    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AcsError::open(COMPONENT, "load_text", path, e))?;
        let mut lines = BufReader::new(file).lines();

        let bad = |msg: &str| AcsError::integrity(COMPONENT, "load_text", msg.to_string());

        let total_size: Count = lines
            .next()
            .ok_or_else(|| bad("missing total size line"))??
            .trim()
            .parse()
            .map_err(|_| bad("total size is not a number"))?;

        let alphabet_header = lines
            .next()
            .ok_or_else(|| bad("missing alphabet size header"))??;
        let alphabet_size: usize = alphabet_header
            .trim_start_matches('#')
            .trim()
            .parse()
            .map_err(|_| bad("alphabet size header is malformed"))?;

        let mut freq = BTreeMap::new();
        for _ in 0..alphabet_size {
            let line = lines.next().ok_or_else(|| bad("truncated alphabet table"))??;
            let mut fields = line.split('\t');
            let symbol: u16 = fields
                .next()
                .ok_or_else(|| bad("missing symbol field"))?
                .parse()
                .map_err(|_| bad("symbol field is not a number"))?;
            let frequency: u64 = fields
                .next()
                .ok_or_else(|| bad("missing frequency field"))?
                .parse()
                .map_err(|_| bad("frequency field is not a number"))?;
            freq.insert(symbol as Symbol, frequency);
        }

        let sequence_header = lines
            .next()
            .ok_or_else(|| bad("missing sequence count header"))??;
        let sequence_count: usize = sequence_header
            .trim_start_matches('#')
            .trim()
            .parse()
            .map_err(|_| bad("sequence count header is malformed"))?;

        let mut colors = BTreeMap::new();
        for _ in 0..sequence_count {
            let line = lines.next().ok_or_else(|| bad("truncated sequence table"))??;
            let mut fields = line.split('\t');
            let color: SeqId = fields
                .next()
                .ok_or_else(|| bad("missing color field"))?
                .parse()
                .map_err(|_| bad("color field is not a number"))?;
            let length: Len = fields
                .next()
                .ok_or_else(|| bad("missing length field"))?
                .parse()
                .map_err(|_| bad("length field is not a number"))?;
            colors.insert(color, length);
        }

        Ok(CollectionInfo { colors, freq, total_size })
    }

    /// Save the text sidecar, byte-identical to what [`Self::load_text`]
    /// would read back.
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| AcsError::open(COMPONENT, "save_text", path, e))?;
        let mut w = BufWriter::new(file);
        let mut int_buf = itoa::Buffer::new();

        writeln!(w, "{}", int_buf.format(self.total_size))?;
        writeln!(w, "#{}", int_buf.format(self.freq.len()))?;
        for (symbol, frequency) in &self.freq {
            w.write_all(int_buf.format(*symbol).as_bytes())?;
            w.write_all(b"\t")?;
            w.write_all(int_buf.format(*frequency).as_bytes())?;
            w.write_all(b"\n")?;
        }
        writeln!(w, "#{}", int_buf.format(self.colors.len()))?;
        for (color, length) in &self.colors {
            w.write_all(int_buf.format(*color).as_bytes())?;
            w.write_all(b"\t")?;
            w.write_all(int_buf.format(*length).as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
        Ok(())
    }

    /// Load a `.lenSeqs.aux` binary sidecar: one 32-bit little-endian
    /// length per sequence, assigned colors `0..n` in file order. Each
    /// stored value is `raw + 1` (the sequence plus its separator).
    pub fn load_lengths<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AcsError::open(COMPONENT, "load_lengths", path, e))?;
        let mut reader: LcpReader<_> = LcpReader::new(BufReader::new(file));
        let mut colors = BTreeMap::new();
        let mut total_size: Count = 0;
        let mut next_color: SeqId = 0;
        while let Some(raw_len) = reader.read_one()? {
            let length = raw_len + 1;
            colors.insert(next_color, length);
            total_size += length as Count;
            next_color += 1;
        }
        Ok(CollectionInfo { colors, freq: BTreeMap::new(), total_size })
    }

    /// Derive collection metadata directly from a combined `.gesa`
    /// stream: each row contributes one unit to its color's length and
    /// one unit to its (canonicalized) symbol's frequency.
    pub fn from_gesa_scan<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = GesaReader::open(path)
            .map_err(|e| AcsError::open(COMPONENT, "from_gesa_scan", path, e))?;
        let mut colors: BTreeMap<SeqId, Len> = BTreeMap::new();
        let mut freq: BTreeMap<Symbol, u64> = BTreeMap::new();
        let mut total_size: Count = 0;
        while let Some(rec) = reader.read_one()? {
            *colors.entry(rec.text).or_insert(0) += 1;
            *freq.entry(rec.canonical_bwt()).or_insert(0) += 1;
            total_size += 1;
        }
        Ok(CollectionInfo { colors, freq, total_size })
    }

    /// Derive collection metadata from the split `.bwt`/`.id` streams
    /// produced by a BCR-style build, mirroring
    /// [`Self::from_gesa_scan`] for inputs that were never combined into
    /// a single `.gesa` file.
    pub fn from_bcr_scan<P: AsRef<Path>>(bwt_path: P, id_path: P) -> Result<Self> {
        let bwt_path = bwt_path.as_ref();
        let id_path = id_path.as_ref();
        let mut bwt = SymbolReader::open(bwt_path)
            .map_err(|e| AcsError::open(COMPONENT, "from_bcr_scan", bwt_path, e))?;
        let mut id = IdReader::open(id_path)
            .map_err(|e| AcsError::open(COMPONENT, "from_bcr_scan", id_path, e))?;
        let mut colors: BTreeMap<SeqId, Len> = BTreeMap::new();
        let mut freq: BTreeMap<Symbol, u64> = BTreeMap::new();
        let mut total_size: Count = 0;
        loop {
            let sym = bwt.read_one()?;
            let color = id.read_one()?;
            match (sym, color) {
                (Some(sym), Some(color)) => {
                    let canonical = if sym == 0 { crate::types::TERMINATE } else { sym };
                    *colors.entry(color).or_insert(0) += 1;
                    *freq.entry(canonical).or_insert(0) += 1;
                    total_size += 1;
                }
                (None, None) => break,
                _ => {
                    return Err(AcsError::integrity(
                        COMPONENT,
                        "from_bcr_scan",
                        "bwt and id streams have different lengths",
                    ))
                }
            }
        }
        Ok(CollectionInfo { colors, freq, total_size })
    }

    /// Merge `other` into `self`, renumbering `other`'s colors by
    /// `self`'s current sequence count so the two color spaces stay
    /// disjoint and dense.
    pub fn join(&mut self, other: &CollectionInfo) -> Result<()> {
        let offset = self.colors.len() as SeqId;
        for (&color, &length) in &other.colors {
            let new_color = color + offset;
            if self.colors.insert(new_color, length).is_some() {
                return Err(AcsError::integrity(
                    COMPONENT,
                    "join",
                    format!("color collision at {} after renumbering", new_color),
                ));
            }
        }
        for (&symbol, &count) in &other.freq {
            *self.freq.entry(symbol).or_insert(0) += count;
        }
        self.total_size += other.total_size;
        Ok(())
    }

    /// Render a human-readable summary, in the spirit of the original's
    /// console resume block.
    pub fn print(&self) -> String {
        format!(
            "collection: {} sequences, alphabet of {} symbols, total size {}",
            self.sequence_count(),
            self.alphabet_size(),
            self.total_size
        )
    }
}
