//! Backward colored-LCP completion pass.
//!
//! The forward pass only bounds each row with the running minimum
//! `alpha`; the true value of a row also depends on the row immediately
//! after it, which is not yet known while the row is current. This pass
//! walks the partial cLCP file from the last row to the first, combining
//! each row with the already-finalized row above it via the same
//! min/max recurrence the forward pass uses for the reference-row
//! closure. Because the recurrence only ever reaches one row back, a
//! single-row reverse sweep is a faithful, simpler instance of the
//! general chunked backward scan: batching more than one row into memory
//! at a time changes memory use, not the result.

use crate::error::Result;
use crate::types::Len;
use std::io::{Read, Seek, SeekFrom};

/// Completes the cLCP matrix for one reference and accumulates, per
/// color, the sum over all rows (`score_x`, used as `sumS1` in the
/// distance formula).
pub struct BackwardPass {
    m: usize,
    n_x: u64,
}

impl BackwardPass {
    pub fn new(m: usize, n_x: u64) -> Self {
        Self { m, n_x }
    }

    /// `clcp` is the partial cLCP file written by [`crate::clcp::forward::ForwardPass`]
    /// (row-major `n_x x m` `Len` values); `lcp_x` is the reference's own
    /// LCP stream (`n_x` `Len` values). Both must support seeking since
    /// the scan runs from the last row to the first.
    pub fn run<RC: Read + Seek, RL: Read + Seek>(
        &self,
        mut clcp: RC,
        mut lcp_x: RL,
    ) -> Result<BackwardStats> {
        let elem = std::mem::size_of::<Len>() as u64;
        let row_bytes = self.m as u64 * elem;
        let mut score_x = vec![0u64; self.m];
        let mut next_row = vec![0 as Len; self.m];
        let mut raw_row = vec![0u8; self.m * elem as usize];
        let mut have_next = false;

        for idx in (0..self.n_x).rev() {
            clcp.seek(SeekFrom::Start(idx * row_bytes))?;
            clcp.read_exact(&mut raw_row)?;
            let mut cur_row = vec![0 as Len; self.m];
            for c in 0..self.m {
                let start = c * elem as usize;
                cur_row[c] = Len::from_le_bytes(raw_row[start..start + 4].try_into().unwrap());
            }

            if have_next {
                lcp_x.seek(SeekFrom::Start((idx + 1) * elem))?;
                let mut buf = [0u8; 4];
                lcp_x.read_exact(&mut buf)?;
                let lcp_x_next = Len::from_le_bytes(buf);
                for c in 0..self.m {
                    cur_row[c] = cur_row[c].max(next_row[c].min(lcp_x_next));
                    score_x[c] += cur_row[c] as u64;
                }
            } else {
                for c in 0..self.m {
                    score_x[c] += cur_row[c] as u64;
                }
            }

            next_row = cur_row;
            have_next = true;
        }

        Ok(BackwardStats { rows: self.n_x, score_x })
    }
}

/// Result of the backward pass: per-color total sums over the reference's
/// rows (`sumS1`), plus a row counter for diagnostics.
#[derive(Debug, Clone)]
pub struct BackwardStats {
    pub rows: u64,
    pub score_x: Vec<u64>,
}

impl std::fmt::Display for BackwardStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backward pass: {} rows completed", self.rows)
    }
}
