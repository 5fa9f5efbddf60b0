//! neuroprobe CLI for inspecting what a trained MNIST perceptron has learned.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neuroprobe_core::{EngineConfig, IndexedImageSource, WeightStore};
use neuroprobe_data::{load_weights, ImageCorpus, LabelSet};

mod report;

use report::DecodeRequest;

#[derive(Parser)]
#[command(name = "neuroprobe")]
#[command(author, version)]
#[command(about = "Feature attribution and similarity search for a two-layer MNIST perceptron")]
#[command(long_about = "neuroprobe: reconstruct hidden units of a trained perceptron in pixel space.

Weights are read from a directory holding layer_0.json..layer_3.json or from
an .npz archive with arrays w1, b1, w2, b2. Images and labels use the MNIST
IDX format.

EXAMPLES:
  # Show layer shapes
  neuroprobe inspect --weights ./model

  # Project hidden units 3, 17 and 42
  neuroprobe decode --weights ./model --units 3,17,42

  # Decode what pushes the network towards a 7 for test image 0
  neuroprobe decode --weights ./model --classes 7 --images t10k-images-idx3-ubyte --index 0

  # Saliency of all hidden units for one input
  neuroprobe saliency --weights ./model --images t10k-images-idx3-ubyte --index 0

  # Training images closest to a projection
  neuroprobe similar --weights ./model --corpus train-images-idx3-ubyte --units 3 --k 5")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shapes of a weight set
    Inspect {
        /// Weight directory or .npz archive
        #[arg(long, value_name = "PATH")]
        weights: PathBuf,

        /// Optional IDX image file to summarize
        #[arg(long, value_name = "IDX")]
        images: Option<PathBuf>,
    },
    /// Project a unit selection, or decode a set of classes
    Decode {
        /// Weight directory or .npz archive
        #[arg(long, value_name = "PATH")]
        weights: PathBuf,

        /// Hidden units to project (all units when omitted)
        #[arg(long, value_delimiter = ',', value_name = "UNITS")]
        units: Vec<usize>,

        /// Output classes to decode into positive/negative/hyperplane images
        #[arg(long, value_delimiter = ',', value_name = "CLASSES")]
        classes: Vec<usize>,

        /// IDX image file providing the input for a forward pass
        #[arg(long, value_name = "IDX", requires = "index")]
        images: Option<PathBuf>,

        /// Index of the input image
        #[arg(long, value_name = "N", requires = "images")]
        index: Option<usize>,

        /// Weight by absolute modulation values
        #[arg(long = "abs", default_value = "false")]
        use_absolute: bool,
    },
    /// Projection times input for one image
    Saliency {
        /// Weight directory or .npz archive
        #[arg(long, value_name = "PATH")]
        weights: PathBuf,

        /// IDX image file
        #[arg(long, value_name = "IDX")]
        images: PathBuf,

        /// Index of the input image
        #[arg(long, value_name = "N")]
        index: usize,

        /// Hidden units to project (all units when omitted)
        #[arg(long, value_delimiter = ',', value_name = "UNITS")]
        units: Vec<usize>,
    },
    /// Find the corpus images most similar to a projection
    Similar {
        /// Weight directory or .npz archive
        #[arg(long, value_name = "PATH")]
        weights: PathBuf,

        /// IDX image file to search
        #[arg(long, value_name = "IDX")]
        corpus: PathBuf,

        /// IDX label file matching the corpus
        #[arg(long, value_name = "IDX")]
        labels: Option<PathBuf>,

        /// Hidden units to project (all units when omitted)
        #[arg(long, value_delimiter = ',', value_name = "UNITS")]
        units: Vec<usize>,

        /// Number of matches (defaults to the configured top_k)
        #[arg(long, value_name = "N")]
        k: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { weights, images } => {
            handle_inspect(&weights, images.as_deref(), &config)
        }
        Commands::Decode {
            weights,
            units,
            classes,
            images,
            index,
            use_absolute,
        } => {
            let input = images.as_deref().zip(index);
            handle_decode(&weights, &units, &classes, input, use_absolute, &config)
        }
        Commands::Saliency {
            weights,
            images,
            index,
            units,
        } => handle_saliency(&weights, &images, index, &units, &config),
        Commands::Similar {
            weights,
            corpus,
            labels,
            units,
            k,
        } => handle_similar(&weights, &corpus, labels.as_deref(), &units, k, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    tracing::info!(?config, "engine configuration");
    Ok(config)
}

fn load_store(path: &Path) -> Result<WeightStore> {
    let store = load_weights(path)
        .with_context(|| format!("Failed to load weights from {}", path.display()))?;
    tracing::info!(
        inputs = store.n_inputs(),
        hidden = store.n_hidden(),
        classes = store.n_classes(),
        "loaded weights"
    );
    Ok(store)
}

fn load_corpus(path: &Path, config: &EngineConfig) -> Result<ImageCorpus> {
    let corpus = ImageCorpus::from_idx_file(path, config.pixel_scale)
        .with_context(|| format!("Failed to read IDX images {}", path.display()))?;
    tracing::info!(images = corpus.len(), path = %path.display(), "loaded corpus");
    Ok(corpus)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_inspect(weights: &Path, images: Option<&Path>, config: &EngineConfig) -> Result<()> {
    let store = load_store(weights)?;
    let corpus = images.map(|path| load_corpus(path, config)).transpose()?;
    print_json(&report::inspect(&store, corpus.as_ref()))
}

fn handle_decode(
    weights: &Path,
    units: &[usize],
    classes: &[usize],
    input: Option<(&Path, usize)>,
    use_absolute: bool,
    config: &EngineConfig,
) -> Result<()> {
    let store = load_store(weights)?;
    let pixels = match input {
        Some((path, index)) => Some(load_corpus(path, config)?.image_vec(index)?),
        None => None,
    };
    let request = DecodeRequest {
        units,
        classes,
        input: pixels.as_deref(),
        use_absolute,
    };
    print_json(&report::decode(&store, request, config)?)
}

fn handle_saliency(
    weights: &Path,
    images: &Path,
    index: usize,
    units: &[usize],
    config: &EngineConfig,
) -> Result<()> {
    let store = load_store(weights)?;
    let corpus = load_corpus(images, config)?;
    print_json(&report::saliency_of(&store, &corpus, index, units, config)?)
}

fn handle_similar(
    weights: &Path,
    corpus_path: &Path,
    labels: Option<&Path>,
    units: &[usize],
    k: Option<usize>,
    config: &EngineConfig,
) -> Result<()> {
    let store = load_store(weights)?;
    let corpus = load_corpus(corpus_path, config)?;
    let labels = labels
        .map(|path| {
            LabelSet::from_idx_file(path)
                .with_context(|| format!("Failed to read IDX labels {}", path.display()))
        })
        .transpose()?;
    print_json(&report::similar(&store, &corpus, labels.as_ref(), units, k, config)?)
}
