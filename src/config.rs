//! Process-wide constants for the ACS pipeline.
//!
//! These mirror the fixed tunables of the original tool (`BUFFER_SIZE`,
//! the default memory budget) without hiding them behind global mutable
//! state: every pass receives its buffer/window sizes as explicit
//! constructor arguments, derived from these constants.

use crate::types::{Len, Memory};

/// Number of records held by each buffered record reader/writer.
pub const BUFFER_SIZE: usize = 10_000;

/// Default memory budget (in bytes) for the forward pass's rolling
/// cLCP window when `-Q` is not given on the command line.
pub const DEFAULT_MEMORY_BUDGET: Memory = (BUFFER_SIZE as Memory) * (std::mem::size_of::<Len>() as Memory);
