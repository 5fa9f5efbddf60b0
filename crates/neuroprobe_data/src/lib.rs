//! # neuroprobe_data
//!
//! Loading for the inputs the engine treats as opaque: image corpora and
//! trained weights.
//!
//! This crate provides:
//! - IDX image/label parsing ([`parse_idx_images`], [`parse_idx_labels`], [`extract_image`])
//! - [`ImageCorpus`], a row-major corpus implementing [`IndexedImageSource`]
//! - [`LabelSet`] for per-image class labels
//! - Weight loading from per-layer JSON files or an NPZ archive
//!
//! ## Example
//!
//! ```rust,ignore
//! use neuroprobe_core::PixelScale;
//! use neuroprobe_data::{load_weights, ImageCorpus};
//!
//! let store = load_weights("data/model_weights")?;
//! let corpus = ImageCorpus::from_idx_file("data/train-images-idx3-ubyte", PixelScale::Raw)?;
//! ```
//!
//! [`IndexedImageSource`]: neuroprobe_core::IndexedImageSource

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod corpus;
mod error;
mod idx;
mod weights_io;

pub use corpus::{ImageCorpus, LabelSet};
pub use error::{DataError, Result};
pub use idx::{
    count_images, extract_image, extract_label, parse_idx_images, parse_idx_labels, IdxImages,
    IMAGE_MAGIC, LABEL_MAGIC,
};
pub use weights_io::{load_weights, load_weights_json, load_weights_npz};
