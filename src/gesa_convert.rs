//! Splits a packed `.gesa` stream into its three parallel sidecars.
//!
//! Some upstream suffix-array builders emit only the combined GESA
//! file; the forward and backward passes want `.bwt`, `.lcp` and `.id`
//! as separate streams. This is a one-record-at-a-time, unbuffered-past-
//! the-record-stream conversion: no reordering, no sorting, just a
//! column split.

use crate::error::Result;
use crate::streaming::gesa::GesaReader;
use crate::streaming::records::{IdWriter, LcpWriter, SymbolWriter};
use std::io::{Read, Write};

/// Result of a conversion: the row count, reported so callers can
/// cross-check it against [`crate::collection::CollectionInfo::total_size`].
#[derive(Debug, Clone, Copy)]
pub struct GesaConvertStats {
    pub rows: u64,
}

impl std::fmt::Display for GesaConvertStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gesa split: {} rows", self.rows)
    }
}

/// Reads `gesa` to exhaustion, writing one symbol/lcp/id triple to each
/// of `bwt`, `lcp` and `id` per row. BWT bytes of `\0` are canonicalized
/// to the terminator symbol on the way out.
pub fn split_gesa<R: Read, WB: Write, WL: Write, WI: Write>(
    mut gesa: GesaReader<R>,
    mut bwt: SymbolWriter<WB>,
    mut lcp: LcpWriter<WL>,
    mut id: IdWriter<WI>,
) -> Result<GesaConvertStats> {
    let mut rows = 0u64;
    while let Some(record) = gesa.read_one()? {
        bwt.write_one(&record.canonical_bwt())?;
        lcp.write_one(&record.lcp)?;
        id.write_one(&record.text)?;
        rows += 1;
    }
    bwt.flush()?;
    lcp.flush()?;
    id.flush()?;
    Ok(GesaConvertStats { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::gesa::GesaRecord;
    use crate::streaming::records::{IdReader, LcpReader, SymbolReader};

    fn build_gesa(records: &[GesaRecord]) -> Vec<u8> {
        use crate::streaming::gesa::GesaWriter;
        let mut raw = Vec::new();
        {
            let mut w = GesaWriter::new(&mut raw);
            for r in records {
                w.write_one(r).unwrap();
            }
            w.flush().unwrap();
        }
        raw
    }

    #[test]
    fn splits_columns_in_row_order() {
        let records = vec![
            GesaRecord { text: 0, suff: 3, lcp: 0, bwt: b'a' },
            GesaRecord { text: 1, suff: 1, lcp: 2, bwt: 0 },
            GesaRecord { text: 0, suff: 0, lcp: 1, bwt: b'b' },
        ];
        let gesa_raw = build_gesa(&records);

        let mut bwt_raw = Vec::new();
        let mut lcp_raw = Vec::new();
        let mut id_raw = Vec::new();
        let stats = split_gesa(
            GesaReader::new(gesa_raw.as_slice()),
            SymbolWriter::new(&mut bwt_raw),
            LcpWriter::new(&mut lcp_raw),
            IdWriter::new(&mut id_raw),
        )
        .unwrap();

        assert_eq!(stats.rows, 3);

        let mut bwt_r = SymbolReader::new(bwt_raw.as_slice());
        let mut bwts = Vec::new();
        while let Some(b) = bwt_r.read_one().unwrap() {
            bwts.push(b);
        }
        assert_eq!(bwts, vec![b'a', crate::types::TERMINATE, b'b']);

        let mut lcp_r = LcpReader::new(lcp_raw.as_slice());
        let mut lcps = Vec::new();
        while let Some(v) = lcp_r.read_one().unwrap() {
            lcps.push(v);
        }
        assert_eq!(lcps, vec![0, 2, 1]);

        let mut id_r = IdReader::new(id_raw.as_slice());
        let mut ids = Vec::new();
        while let Some(v) = id_r.read_one().unwrap() {
            ids.push(v);
        }
        assert_eq!(ids, vec![0, 1, 0]);
    }

    #[test]
    fn empty_gesa_produces_empty_sidecars() {
        let gesa_raw = build_gesa(&[]);
        let mut bwt_raw = Vec::new();
        let mut lcp_raw = Vec::new();
        let mut id_raw = Vec::new();
        let stats = split_gesa(
            GesaReader::new(gesa_raw.as_slice()),
            SymbolWriter::new(&mut bwt_raw),
            LcpWriter::new(&mut lcp_raw),
            IdWriter::new(&mut id_raw),
        )
        .unwrap();
        assert_eq!(stats.rows, 0);
        assert!(bwt_raw.is_empty());
        assert!(lcp_raw.is_empty());
        assert!(id_raw.is_empty());
    }
}
