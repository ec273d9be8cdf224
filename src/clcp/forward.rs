//! Forward colored-LCP pass: joint streaming of id/lcp/D/reference-lcp
//! with a rolling window over all colors.

use crate::error::{AcsError, Result};
use crate::streaming::records::{DReader, IdReader, LcpReader, LcpWriter};
use crate::types::{Len, SeqId, MAX_LEN};
use std::io::{Read, Write};

const COMPONENT: &str = "ForwardPass";

/// Runs the forward cLCP scan for a single reference color over a
/// collection of `m` colors.
pub struct ForwardPass {
    reference_color: SeqId,
    m: usize,
    n_x: u64,
    q: u64,
}

impl ForwardPass {
    pub fn new(reference_color: SeqId, m: usize, n_x: u64, q: u64) -> Self {
        Self { reference_color, m, n_x, q: q.max(1) }
    }

    /// Scan the joint (id, lcp, d) streams and the reference-only lcp_x
    /// stream, writing the partial cLCP matrix to `out` and returning the
    /// forward-accumulated per-color score sums.
    pub fn run<R1: Read, R2: Read, R3: Read, R4: Read, W: Write>(
        &self,
        mut id_r: IdReader<R1>,
        mut lcp_r: LcpReader<R2>,
        mut d_r: DReader<R3>,
        mut lcp_x_r: LcpReader<R4>,
        mut out: LcpWriter<W>,
        mut trace: Option<&mut dyn Write>,
    ) -> Result<ForwardStats> {
        let m = self.m;
        let rows = (self.q as usize) + 1;
        let mut window = vec![0 as Len; rows * m];
        let mut touched = vec![false; m];
        let mut score_r = vec![0u64; m];

        let mut h_x: u64 = 0;
        let mut h_x_idx: usize = 0;
        let mut alpha: Len = MAX_LEN;
        let mut k_val: Len = 0;
        let mut lcp_x_value: Len = lcp_x_r.read_one()?.unwrap_or(0);
        let mut records_seen: u64 = 0;

        while let Some(id) = id_r.read_one()? {
            let color = id as usize;
            if color >= m {
                return Err(AcsError::integrity(
                    COMPONENT,
                    "run",
                    format!("color {} out of range (collection has {} colors)", id, m),
                ));
            }
            let lcp_value = lcp_r.read_one()?.ok_or_else(|| {
                AcsError::integrity(COMPONENT, "run", "lcp stream shorter than id stream")
            })?;
            let d_value = d_r.read_one()?.ok_or_else(|| {
                AcsError::integrity(COMPONENT, "run", "d stream shorter than id stream")
            })?;
            records_seen += 1;

            if id != self.reference_color {
                alpha = alpha.min(lcp_value);
                if d_value > 0 {
                    k_val = k_val.max(d_value - 1);
                }

                let s = if h_x == 0 {
                    k_val
                } else if alpha > lcp_x_value {
                    alpha
                } else {
                    alpha.max(k_val).max(lcp_x_value)
                };
                score_r[color] += s as u64;

                let cur_idx = h_x_idx * m + color;
                if h_x == 0 {
                    window[cur_idx] = k_val;
                } else if alpha > lcp_x_value && h_x < self.n_x {
                    window[cur_idx] = lcp_x_value;
                } else {
                    window[cur_idx] = k_val.max(lcp_x_value);
                }

                if h_x > 0 && !touched[color] {
                    let prev_idx = (h_x_idx - 1) * m + color;
                    window[prev_idx] = window[prev_idx].max(alpha);
                    touched[color] = true;
                }

                if let Some(w) = trace.as_deref_mut() {
                    writeln!(w, "{}: {}", id, s)?;
                }
            } else {
                if h_x > 0 {
                    for r in 0..m {
                        let cur_idx = h_x_idx * m + r;
                        let prev_idx = (h_x_idx - 1) * m + r;
                        window[cur_idx] =
                            window[prev_idx].min(lcp_x_value).max(window[cur_idx]);
                    }
                    if let Some(w) = trace.as_deref_mut() {
                        let row = &window[h_x_idx * m..h_x_idx * m + m];
                        let rendered: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                        writeln!(w, "[{}]: {}", h_x - 1, rendered.join(" "))?;
                    }
                }

                h_x += 1;
                h_x_idx += 1;

                if h_x_idx == rows {
                    for row in 0..self.q as usize {
                        for col in 0..m {
                            out.write_one(&window[row * m + col])?;
                        }
                    }
                    for col in 0..m {
                        window[col] = window[(self.q as usize) * m + col];
                    }
                    for row in 1..rows {
                        for col in 0..m {
                            window[row * m + col] = 0;
                        }
                    }
                    h_x_idx = 1;
                }

                alpha = MAX_LEN;
                k_val = 0;
                for flag in touched.iter_mut() {
                    *flag = false;
                }
                lcp_x_value = lcp_x_r.read_one()?.unwrap_or(0);
            }
        }

        for row in 0..h_x_idx {
            for col in 0..m {
                out.write_one(&window[row * m + col])?;
            }
        }
        out.flush()?;

        Ok(ForwardStats { records_seen, reference_rows: h_x, score_r })
    }
}

/// Result of the forward pass: per-color partial sums (`score_r`, used
/// as `sumS2` in the distance formula) plus counters for diagnostics.
#[derive(Debug, Clone)]
pub struct ForwardStats {
    pub records_seen: u64,
    pub reference_rows: u64,
    pub score_r: Vec<u64>,
}

impl std::fmt::Display for ForwardStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "forward pass: {} rows scanned, {} reference rows",
            self.records_seen, self.reference_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::records::LcpWriter as LW;

    fn build_stream<T: Copy>(values: &[T]) -> Vec<u8>
    where
        T: crate::streaming::buffers::FixedRecord,
    {
        let mut raw = Vec::new();
        let mut w: crate::streaming::buffers::RecordWriter<&mut Vec<u8>, T> =
            crate::streaming::buffers::RecordWriter::new(&mut raw);
        for v in values {
            w.write_one(v).unwrap();
        }
        w.flush().unwrap();
        raw
    }

    #[test]
    fn single_sequence_collection_has_zero_window_contribution() {
        // m == 1: every record is the reference itself. No target rows
        // exist so score_r stays all zero.
        let ids = build_stream::<SeqId>(&[0, 0, 0]);
        let lcps = build_stream::<Len>(&[0, 1, 0]);
        let ds = build_stream::<Len>(&[0, 0, 0]);
        let lcp_x = build_stream::<Len>(&[0, 1, 0]);

        let id_r = IdReader::new(ids.as_slice());
        let lcp_r = LcpReader::new(lcps.as_slice());
        let d_r = DReader::new(ds.as_slice());
        let lcp_x_r = LcpReader::new(lcp_x.as_slice());

        let mut out_raw = Vec::new();
        let out = LcpWriter::new(&mut out_raw);

        let pass = ForwardPass::new(0, 1, 3, 2);
        let stats = pass.run(id_r, lcp_r, d_r, lcp_x_r, out, None).unwrap();

        assert_eq!(stats.score_r, vec![0]);
        assert_eq!(stats.reference_rows, 3);
    }

    #[test]
    fn out_of_range_color_is_integrity_error() {
        let ids = build_stream::<SeqId>(&[7]);
        let lcps = build_stream::<Len>(&[0]);
        let ds = build_stream::<Len>(&[0]);
        let lcp_x = build_stream::<Len>(&[0]);

        let pass = ForwardPass::new(0, 2, 1, 1);
        let err = pass
            .run(
                IdReader::new(ids.as_slice()),
                LcpReader::new(lcps.as_slice()),
                DReader::new(ds.as_slice()),
                LcpReader::new(lcp_x.as_slice()),
                LcpWriter::new(Vec::new()),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, AcsError::Integrity { .. }));
    }

    #[test]
    fn partial_clcp_file_size_matches_n_x_times_m() {
        // Two colors, reference color 0 has 2 rows, target color 1 has 2 rows.
        let ids = build_stream::<SeqId>(&[0, 1, 0, 1]);
        let lcps = build_stream::<Len>(&[0, 0, 1, 1]);
        let ds = build_stream::<Len>(&[0, 0, 0, 0]);
        let lcp_x = build_stream::<Len>(&[0, 1]);

        let mut out_raw = Vec::new();
        let out: LW<&mut Vec<u8>> = LW::new(&mut out_raw);
        let pass = ForwardPass::new(0, 2, 2, 1);
        pass.run(
            IdReader::new(ids.as_slice()),
            LcpReader::new(lcps.as_slice()),
            DReader::new(ds.as_slice()),
            LcpReader::new(lcp_x.as_slice()),
            out,
            None,
        )
        .unwrap();
        assert_eq!(out_raw.len(), 2 * 2 * std::mem::size_of::<Len>());
    }

    #[test]
    fn verbose_trace_is_deterministic_across_runs() {
        let ids = build_stream::<SeqId>(&[0, 1, 0, 1]);
        let lcps = build_stream::<Len>(&[0, 0, 1, 1]);
        let ds = build_stream::<Len>(&[0, 0, 0, 0]);
        let lcp_x = build_stream::<Len>(&[0, 1]);

        let run_once = || {
            let mut trace = Vec::new();
            {
                let pass = ForwardPass::new(0, 2, 2, 1);
                pass.run(
                    IdReader::new(ids.as_slice()),
                    LcpReader::new(lcps.as_slice()),
                    DReader::new(ds.as_slice()),
                    LcpReader::new(lcp_x.as_slice()),
                    LcpWriter::new(Vec::new()),
                    Some(&mut trace as &mut dyn Write),
                )
                .unwrap();
            }
            trace
        };

        assert_eq!(run_once(), run_once());
    }
}
