//! Primitive types shared across the ACS pipeline.

/// An alphabet symbol (the BWT character of a GESA row).
pub type Symbol = u8;

/// A sequence (color) identifier.
pub type SeqId = u32;

/// An LCP value or sequence length.
pub type Len = u32;

/// A position within the generalized enhanced suffix array.
pub type Count = u64;

/// A byte count used for memory-budget accounting.
pub type Memory = u64;

/// End-of-sequence separator. A null byte read from the GESA's BWT field
/// is canonicalized to this value.
pub const TERMINATE: Symbol = b'$';

/// Sentinel meaning "no LCP value recorded yet" for accumulators that
/// track a running minimum.
pub const MAX_LEN: Len = Len::MAX;
