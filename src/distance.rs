//! ACS distance aggregation and `.acs` output.

use crate::error::{AcsError, Result};
use crate::types::{Len, SeqId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const COMPONENT: &str = "AcsDistance";

/// Combines the forward (`score_r`) and backward (`score_x`) score sums
/// into one ACS distance per non-reference color.
pub struct AcsDistanceComputer {
    reference_color: SeqId,
    m: usize,
}

impl AcsDistanceComputer {
    pub fn new(reference_color: SeqId, m: usize) -> Self {
        Self { reference_color, m }
    }

    /// `n_x` is the reference sequence's stored length (including
    /// separator); `lengths[r]` is color `r`'s stored length; `score_x`
    /// is the backward-accumulated sum per color (`sumS1`); `score_r` is
    /// the forward-accumulated sum per color (`sumS2`). Returns one
    /// distance per color, with the reference color's own slot set to
    /// `0.0`.
    pub fn compute(
        &self,
        n_x: Len,
        lengths: &[Len],
        score_x: &[u64],
        score_r: &[u64],
    ) -> Result<Vec<f64>> {
        if lengths.len() != self.m || score_x.len() != self.m || score_r.len() != self.m {
            return Err(AcsError::contract(
                COMPONENT,
                "compute",
                "lengths/score_x/score_r must each have exactly m entries",
            ));
        }
        if n_x == 0 {
            return Err(AcsError::integrity(
                COMPONENT,
                "compute",
                "reference sequence has zero stored length",
            ));
        }

        let s1 = (n_x - 1) as f64;
        let mut distances = vec![0.0f64; self.m];

        for r in 0..self.m {
            if r == self.reference_color as usize {
                continue;
            }
            let n_r = lengths[r];
            if n_r == 0 {
                return Err(AcsError::integrity(
                    COMPONENT,
                    "compute",
                    format!("target color {} has zero stored length", r),
                ));
            }
            if n_x < 2 || n_r < 2 {
                return Err(AcsError::integrity(
                    COMPONENT,
                    "compute",
                    format!(
                        "color {} or the reference has length 1 (no symbols besides the separator); ACS distance is undefined",
                        r
                    ),
                ));
            }
            let s2 = (n_r - 1) as f64;
            let sum_s1 = score_x[r] as f64;
            let sum_s2 = score_r[r] as f64;
            if sum_s1 == 0.0 || sum_s2 == 0.0 {
                return Err(AcsError::integrity(
                    COMPONENT,
                    "compute",
                    format!(
                        "color {} shares no common substring with the reference (disjoint alphabets?)",
                        r
                    ),
                ));
            }

            let d = 0.5
                * (s1.log10() / (sum_s2 / s2) - 2.0 * s2.log10() / s2 + s2.log10() / (sum_s1 / s1)
                    - 2.0 * s1.log10() / s1);
            distances[r] = d;
        }

        Ok(distances)
    }
}

/// Writes a `.acs` file: tab-terminated distances in color order, with
/// the literal `0` in the reference's own slot. No trailing newline,
/// matching the original tool's `fprintf(..., "%f\t", d)` loop.
pub fn write_acs_file<P: AsRef<Path>>(
    path: P,
    reference_color: SeqId,
    distances: &[f64],
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AcsError::open(COMPONENT, "write_acs_file", path, e))?;
    let mut w = BufWriter::new(file);
    for (color, d) in distances.iter().enumerate() {
        if color as SeqId == reference_color {
            write!(w, "0\t")?;
        } else {
            write!(w, "{:.6}\t", d)?;
        }
    }
    w.flush()?;
    Ok(())
}
