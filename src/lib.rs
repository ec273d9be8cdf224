// Clippy allows for the whole crate
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::type_complexity)]

//! ACS: Average Common Substring distance over a Generalized Enhanced
//! Suffix Array.
//!
//! This library streams a reference sequence's rows against a colored
//! collection's Generalized Enhanced Suffix Array (GESA) and derives the
//! Average Common Substring distance from the reference to every other
//! color, without ever materializing the full collection or cLCP matrix
//! in memory.
//!
//! # Pipeline
//!
//! 1. [`collection`] loads or derives the per-color lengths and alphabet
//!    frequencies a run needs.
//! 2. [`gesa_convert`] splits a combined `.gesa` stream into `.bwt`/`.lcp`/`.id`
//!    sidecars when a run only has the combined form.
//! 3. [`dgen`] scans the GESA once to produce the `.d` array marking
//!    reference-color boundaries.
//! 4. [`clcp`] runs the forward and backward colored-LCP passes over the
//!    `.id`/`.lcp`/`.d` streams and the reference's own LCP stream.
//! 5. [`distance`] combines the two passes' score sums into one ACS
//!    distance per color and writes the `.acs` output.

pub mod clcp;
pub mod collection;
pub mod config;
pub mod dgen;
pub mod distance;
pub mod error;
pub mod gesa_convert;
pub mod memtrack;
pub mod streaming;
pub mod types;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clcp::{window_depth, BackwardPass, BackwardStats, ForwardPass, ForwardStats};
    pub use crate::collection::CollectionInfo;
    pub use crate::dgen::{DGenStats, DGenerator};
    pub use crate::distance::{write_acs_file, AcsDistanceComputer};
    pub use crate::error::{AcsError, Result};
    pub use crate::gesa_convert::{split_gesa, GesaConvertStats};
}
