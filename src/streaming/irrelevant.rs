//! Bit-packed "irrelevant" flag stream.
//!
//! One bit per GESA row, packed LSB-first within each byte. This stream
//! is produced/consumed by auxiliary passes outside the critical cLCP
//! path (see the component note in the design: "not on the critical
//! path"), but is part of the buffered-record-stream family described
//! alongside the typed readers/writers.

use std::io::{Read, Write};

pub struct IrrelevantBitWriter<W: Write> {
    inner: W,
    current: u8,
    bit_pos: u8,
    bits_written: u64,
}

impl<W: Write> IrrelevantBitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, current: 0, bit_pos: 0, bits_written: 0 }
    }

    pub fn write_bit(&mut self, bit: bool) -> std::io::Result<()> {
        if bit {
            self.current |= 1 << self.bit_pos;
        }
        self.bit_pos += 1;
        self.bits_written += 1;
        if self.bit_pos == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.bit_pos = 0;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.bit_pos > 0 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.bit_pos = 0;
        }
        self.inner.flush()
    }

    /// Total bits written so far; the reader needs this count to know
    /// where padding begins in the final byte.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

/// Reads exactly `bit_count` bits from a packed stream, LSB-first.
pub struct IrrelevantBitReader<R: Read> {
    inner: R,
    bit_count: u64,
    bits_read: u64,
    current: u8,
    bit_pos: u8,
}

impl<R: Read> IrrelevantBitReader<R> {
    pub fn new(inner: R, bit_count: u64) -> Self {
        Self { inner, bit_count, bits_read: 0, current: 0, bit_pos: 8 }
    }

    pub fn read_bit(&mut self) -> std::io::Result<Option<bool>> {
        if self.bits_read >= self.bit_count {
            return Ok(None);
        }
        if self.bit_pos == 8 {
            let mut byte = [0u8; 1];
            let n = self.inner.read(&mut byte)?;
            if n == 0 {
                return Ok(None);
            }
            self.current = byte[0];
            self.bit_pos = 0;
        }
        let bit = (self.current >> self.bit_pos) & 1 == 1;
        self.bit_pos += 1;
        self.bits_read += 1;
        Ok(Some(bit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bit_count() {
        let bits = [true, false, false, true, true, true, false, false, true, true];
        let mut raw = Vec::new();
        {
            let mut w = IrrelevantBitWriter::new(&mut raw);
            for &b in &bits {
                w.write_bit(b).unwrap();
            }
            w.flush().unwrap();
        }
        let mut r = IrrelevantBitReader::new(raw.as_slice(), bits.len() as u64);
        let mut got = Vec::new();
        while let Some(b) = r.read_bit().unwrap() {
            got.push(b);
        }
        assert_eq!(got, bits);
    }

    #[test]
    fn stops_at_bit_count_not_byte_boundary() {
        let mut raw = Vec::new();
        {
            let mut w = IrrelevantBitWriter::new(&mut raw);
            for _ in 0..3 {
                w.write_bit(true).unwrap();
            }
            w.flush().unwrap();
        }
        assert_eq!(raw.len(), 1);
        let mut r = IrrelevantBitReader::new(raw.as_slice(), 3);
        let mut count = 0;
        while r.read_bit().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
    }
}
