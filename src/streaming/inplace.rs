//! In-place record editor.
//!
//! Reads a page of fixed-width records from a seekable file, lets the
//! caller mutate individual records, and writes the page back to the
//! same offset on [`InPlaceEditor::flush`] or before loading the next
//! page. Pairs with [`crate::streaming::buffers::RecordReader`]/
//! [`crate::streaming::buffers::RecordWriter`] for the sequential case;
//! this one is for auxiliary passes that annotate an existing sidecar
//! without rewriting it end to end. Not on the critical cLCP path.

use crate::config::BUFFER_SIZE;
use crate::streaming::buffers::FixedRecord;
use std::io::{Read, Seek, SeekFrom, Write};

pub struct InPlaceEditor<F: Read + Write + Seek, T: FixedRecord> {
    file: F,
    page: Vec<T>,
    page_start: u64,
    page_len: usize,
    dirty: bool,
}

impl<F: Read + Write + Seek, T: FixedRecord> InPlaceEditor<F, T> {
    pub fn new(file: F) -> Self {
        Self {
            file,
            page: vec![T::default(); BUFFER_SIZE],
            page_start: 0,
            page_len: 0,
            dirty: false,
        }
    }

    /// Load the page of up to `BUFFER_SIZE` records starting at
    /// `record_index`, flushing any unwritten edits to the previous page
    /// first. Returns the number of records actually loaded (short at
    /// end of file).
    pub fn load(&mut self, record_index: u64) -> std::io::Result<usize> {
        self.flush()?;
        self.file.seek(SeekFrom::Start(record_index * T::WIDTH as u64))?;
        let mut raw = vec![0u8; BUFFER_SIZE * T::WIDTH];
        let mut filled = 0usize;
        loop {
            let n = self.file.read(&mut raw[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
            if filled == raw.len() {
                break;
            }
        }
        let count = filled / T::WIDTH;
        for i in 0..count {
            self.page[i] = T::decode(&raw[i * T::WIDTH..(i + 1) * T::WIDTH]);
        }
        self.page_start = record_index;
        self.page_len = count;
        self.dirty = false;
        Ok(count)
    }

    /// The record at `offset` within the currently loaded page.
    pub fn get(&self, offset: usize) -> Option<&T> {
        if offset < self.page_len {
            Some(&self.page[offset])
        } else {
            None
        }
    }

    /// Overwrite the record at `offset` within the currently loaded page;
    /// takes effect on disk at the next [`Self::flush`].
    pub fn set(&mut self, offset: usize, value: T) {
        assert!(offset < self.page_len, "offset {} out of loaded page", offset);
        self.page[offset] = value;
        self.dirty = true;
    }

    /// Write the current page back to its original file offset if it has
    /// unflushed edits.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if !self.dirty || self.page_len == 0 {
            return Ok(());
        }
        self.file.seek(SeekFrom::Start(self.page_start * T::WIDTH as u64))?;
        let mut raw = vec![0u8; self.page_len * T::WIDTH];
        for i in 0..self.page_len {
            self.page[i].encode(&mut raw[i * T::WIDTH..(i + 1) * T::WIDTH]);
        }
        self.file.write_all(&raw)?;
        self.dirty = false;
        Ok(())
    }

    /// Advance the file cursor past `n` records without reading or
    /// mutating them, discarding the currently loaded page.
    pub fn skip(&mut self, n: u64) -> std::io::Result<()> {
        self.flush()?;
        let cur = self.file.stream_position()?;
        self.file.seek(SeekFrom::Start(cur + n * T::WIDTH as u64))?;
        self.page_len = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Len;
    use std::io::Cursor;

    fn seed(values: &[Len]) -> Cursor<Vec<u8>> {
        let mut raw = Vec::new();
        for v in values {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        Cursor::new(raw)
    }

    #[test]
    fn mutated_record_persists_after_flush_and_reload() {
        let file = seed(&[10, 20, 30, 40]);
        let mut editor: InPlaceEditor<_, Len> = InPlaceEditor::new(file);

        let n = editor.load(0).unwrap();
        assert_eq!(n, 4);
        assert_eq!(*editor.get(1).unwrap(), 20);

        editor.set(1, 99);
        editor.flush().unwrap();

        editor.load(0).unwrap();
        assert_eq!(*editor.get(1).unwrap(), 99);
        // Untouched neighbours survive the partial rewrite.
        assert_eq!(*editor.get(0).unwrap(), 10);
        assert_eq!(*editor.get(2).unwrap(), 30);
    }

    #[test]
    fn skip_advances_without_loading() {
        let file = seed(&[1, 2, 3, 4, 5]);
        let mut editor: InPlaceEditor<_, Len> = InPlaceEditor::new(file);

        editor.load(0).unwrap();
        editor.skip(2).unwrap();
        let n = editor.load(2).unwrap();
        assert_eq!(n, 3);
        assert_eq!(*editor.get(0).unwrap(), 3);
    }

    #[test]
    fn unmodified_page_does_not_rewrite_on_flush() {
        let file = seed(&[7, 8]);
        let mut editor: InPlaceEditor<_, Len> = InPlaceEditor::new(file);
        editor.load(0).unwrap();
        editor.flush().unwrap();
        editor.load(0).unwrap();
        assert_eq!(*editor.get(0).unwrap(), 7);
        assert_eq!(*editor.get(1).unwrap(), 8);
    }
}
