//! # neuroprobe_analysis
//!
//! Corpus analysis for projections: which real examples look most like a
//! reconstruction, and what they look like on average.
//!
//! This crate provides:
//! - [`top_k`] exact brute-force dot-product search
//! - [`aggregate`] similarity-weighted averaging of matches

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod aggregate;
mod similarity;

pub use aggregate::aggregate;
pub use similarity::{top_k, top_k_with_config, SearchConfig, SimilarityResult};
