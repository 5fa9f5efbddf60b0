//! # neuroprobe
//!
//! Feature attribution and similarity search for a trained two-layer MNIST
//! perceptron.
//!
//! neuroprobe reconstructs what hidden units respond to in pixel space:
//!
//! - **Data**: IDX image/label files, weights from JSON layers or NPZ
//! - **Inference**: a dense ReLU/softmax forward pass for activations
//! - **Projection**: weighted sums of hidden-unit weight vectors, class-conditioned decodings
//! - **Display**: local or global normalization and colour mapping
//! - **Analysis**: saliency maps, exact top-k similarity search and weighted aggregates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use neuroprobe::prelude::*;
//!
//! let store = load_weights("data/model_weights")?;
//! let corpus = ImageCorpus::from_idx_file("data/train-images-idx3-ubyte", PixelScale::Raw)?;
//!
//! let selection: Selection = [3, 17, 42].into_iter().collect();
//! let projection = Projector::new(&store).project(&selection, None, false)?;
//!
//! let matches = top_k(&projection, &corpus, 10)?;
//! let average = aggregate(&matches)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use neuroprobe_analysis as analysis;
pub use neuroprobe_core as core;
pub use neuroprobe_data as data;
pub use neuroprobe_explain as explain;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use neuroprobe::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use neuroprobe_core::{
        CoreError, DenseNetwork, EngineConfig, ForwardPass, Image, IndexedImageSource,
        InferenceRunner, NormMode, PixelScale, Result, Selection, WeightStore, IMAGE_SIZE,
    };

    // Data
    pub use neuroprobe_data::{load_weights, ImageCorpus, LabelSet};

    // Explain
    pub use neuroprobe_explain::{
        normalize, saliency, ColorMapper, DecodingTriple, GlobalNorms, Modulation, ProbeSession,
        Projector, Rgb,
    };

    // Analysis
    pub use neuroprobe_analysis::{aggregate, top_k, SimilarityResult};
}
