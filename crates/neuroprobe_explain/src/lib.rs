//! # neuroprobe_explain
//!
//! Explainability tools for a two-layer perceptron: reconstructions of hidden
//! units in input-pixel space and the maps derived from them.
//!
//! This crate provides:
//! - [`Projector`] for weighted sums of hidden-unit weight vectors
//! - [`Modulation`] and [`DecodingTriple`] for class-conditioned decodings
//! - [`normalize`] and [`GlobalNorms`] for local or batch-shared scaling
//! - [`saliency`] for projection × input maps
//! - [`ColorMapper`] for turning normalized values into colours
//! - [`ProbeSession`] for the per-analyst selection and activation state

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod color;
mod normalize;
mod projection;
mod saliency;
mod session;

pub use color::{ColorMapper, Rgb};
pub use neuroprobe_core::NormMode;
pub use normalize::{normalize, normalize_to, GlobalNorms, NormRange};
pub use projection::{DecodingTriple, Modulation, Projector, SelectionPartition};
pub use saliency::{saliency, Saliency};
pub use session::ProbeSession;
