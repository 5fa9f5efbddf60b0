//! # neuroprobe_core
//!
//! Core types and traits for probing a trained two-layer perceptron.
//!
//! This crate provides:
//! - [`Image`] for reconstructed or raw 784-pixel images with their extremes
//! - [`Selection`] for sets of hidden-unit indices
//! - [`WeightStore`] for the read-only weight matrices and bias vectors
//! - [`IndexedImageSource`] for random access into an image corpus
//! - [`InferenceRunner`] and [`DenseNetwork`] for forward passes
//! - [`EngineConfig`] and error types
//!
//! ## Shape Convention
//!
//! - `W1`: `(784, H)`, row = input pixel, column = hidden unit
//! - `W2`: `(H, C)`, row = hidden unit, column = output class
//!
//! ## Example
//!
//! ```rust,ignore
//! use neuroprobe_core::{DenseNetwork, InferenceRunner, WeightStore};
//!
//! let store = WeightStore::new(w1, b1, w2, b2)?;
//! let pass = DenseNetwork::new(&store).forward(&pixels)?;
//! println!("predicted {}", pass.prediction);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod image;
mod inference;
mod selection;
mod source;
mod weights;

pub use config::{EngineConfig, NormMode, PixelScale};
pub use error::{CoreError, Result};
pub use image::{Image, IMAGE_SIDE, IMAGE_SIZE};
pub use inference::{DenseNetwork, ForwardPass, InferenceRunner};
pub use selection::Selection;
pub use source::IndexedImageSource;
pub use weights::WeightStore;
