//! JSON reports produced by the subcommands.

use anyhow::{bail, Result};
use serde::Serialize;

use neuroprobe_analysis::{aggregate, top_k_with_config, SearchConfig};
use neuroprobe_core::{
    DenseNetwork, EngineConfig, Image, IndexedImageSource, InferenceRunner, NormMode, Selection,
    WeightStore,
};
use neuroprobe_data::{ImageCorpus, LabelSet};
use neuroprobe_explain::{normalize, saliency, ColorMapper, GlobalNorms, ProbeSession, Projector};

/// An image ready for display: raw extremes, normalized values and colours.
#[derive(Debug, Serialize)]
pub struct RenderedImage {
    pub min: f32,
    pub max: f32,
    pub normalized: Vec<f32>,
    pub colours: Vec<String>,
}

impl RenderedImage {
    pub fn new(image: &Image, mode: NormMode, norms: &GlobalNorms, mapper: &ColorMapper) -> Self {
        let normalized = normalize(image, mode, norms);
        let colours = mapper
            .map_image(&normalized)
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        Self {
            min: image.min(),
            max: image.max(),
            normalized,
            colours,
        }
    }

    /// Render on the image's own extremes, honouring the configured mode.
    fn standalone(image: &Image, mapper: &ColorMapper, config: &EngineConfig) -> Self {
        let norms = GlobalNorms::recompute(std::iter::once(image));
        Self::new(image, config.norm_mode, &norms, mapper)
    }
}

#[derive(Debug, Serialize)]
pub struct Inspection {
    pub inputs: usize,
    pub hidden: usize,
    pub classes: usize,
    pub w1: [usize; 2],
    pub b1: usize,
    pub w2: [usize; 2],
    pub b2: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<usize>,
}

pub fn inspect(store: &WeightStore, corpus: Option<&ImageCorpus>) -> Inspection {
    Inspection {
        inputs: store.n_inputs(),
        hidden: store.n_hidden(),
        classes: store.n_classes(),
        w1: [store.n_inputs(), store.n_hidden()],
        b1: store.hidden_bias().len(),
        w2: [store.n_hidden(), store.n_classes()],
        b2: store.output_bias().len(),
        images: corpus.map(IndexedImageSource::len),
    }
}

/// Output of `decode`: a single projection, or a class decoding triple.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DecodeReport {
    Triple {
        classes: Vec<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        prediction: Option<usize>,
        positive: RenderedImage,
        negative: RenderedImage,
        hyperplane: RenderedImage,
    },
    Projection {
        units: Vec<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        prediction: Option<usize>,
        image: RenderedImage,
    },
}

/// Options of the `decode` subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeRequest<'a> {
    pub units: &'a [usize],
    pub classes: &'a [usize],
    pub input: Option<&'a [f32]>,
    pub use_absolute: bool,
}

/// Explicit units, or every hidden unit when none are given.
pub fn selection_for(units: &[usize], store: &WeightStore) -> Selection {
    if units.is_empty() {
        Selection::all(store.n_hidden())
    } else {
        units.iter().copied().collect()
    }
}

/// Project a unit selection, or decode the requested classes.
///
/// The triple is always rendered on its shared extremes so the three images
/// stay comparable; `config.norm_mode` only applies to single projections.
pub fn decode(
    store: &WeightStore,
    request: DecodeRequest<'_>,
    config: &EngineConfig,
) -> Result<DecodeReport> {
    let projector = Projector::new(store);
    let mapper = ColorMapper::from_names(&config.colour_stops)?;

    let mut session = ProbeSession::new();
    *session.selection_mut() = selection_for(request.units, store);
    for &class in request.classes {
        session.toggle_class(class);
    }

    let mut prediction = None;
    if let Some(pixels) = request.input {
        let pass = DenseNetwork::new(store).forward(pixels)?;
        tracing::info!(prediction = pass.prediction, "forward pass");
        prediction = Some(pass.prediction);
        session.set_forward(pass);
    }

    if request.classes.is_empty() {
        let image = if session.forward().is_some() {
            session.project_by_activation(&projector, request.use_absolute)?
        } else {
            if request.use_absolute {
                tracing::warn!("--abs has no effect on an unweighted projection");
            }
            session.project_selection(&projector)?
        };
        return Ok(DecodeReport::Projection {
            units: session.selection().iter().collect(),
            prediction,
            image: RenderedImage::standalone(&image, &mapper, config),
        });
    }

    let Some(triple) = session.decode(&projector, request.use_absolute)? else {
        bail!("No classes selected");
    };
    let norms = session.global_norms();
    let render = |image: &Image| RenderedImage::new(image, NormMode::Global, &norms, &mapper);
    Ok(DecodeReport::Triple {
        classes: session.classes().collect(),
        prediction,
        positive: render(&triple.positive),
        negative: render(&triple.negative),
        hyperplane: render(&triple.hyperplane),
    })
}

#[derive(Debug, Serialize)]
pub struct SaliencyReport {
    pub index: usize,
    pub prediction: usize,
    pub total: f32,
    pub image: RenderedImage,
}

/// Saliency of a unit selection for one corpus image.
pub fn saliency_of(
    store: &WeightStore,
    corpus: &ImageCorpus,
    index: usize,
    units: &[usize],
    config: &EngineConfig,
) -> Result<SaliencyReport> {
    let mapper = ColorMapper::from_names(&config.colour_stops)?;
    let input = corpus.image_vec(index)?;

    let prediction = DenseNetwork::new(store).forward(&input)?.prediction;
    let projection = Projector::new(store).project(&selection_for(units, store), None, false)?;
    let map = saliency(&projection, &input)?;
    tracing::debug!(index, total = map.total, "saliency");

    // Displayed on the projection's scale
    let norms = GlobalNorms::recompute(std::iter::once(&projection));
    Ok(SaliencyReport {
        index,
        prediction,
        total: map.total,
        image: RenderedImage::new(&map.image, NormMode::Global, &norms, &mapper),
    })
}

#[derive(Debug, Serialize)]
pub struct Match {
    pub index: usize,
    pub similarity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct SimilarReport {
    pub k: usize,
    pub matches: Vec<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<RenderedImage>,
}

/// Corpus images closest to the projection of a unit selection.
pub fn similar(
    store: &WeightStore,
    corpus: &ImageCorpus,
    labels: Option<&LabelSet>,
    units: &[usize],
    k: Option<usize>,
    config: &EngineConfig,
) -> Result<SimilarReport> {
    if let Some(labels) = labels {
        if labels.len() != corpus.len() {
            bail!(
                "Label count {} does not match corpus size {}",
                labels.len(),
                corpus.len()
            );
        }
    }
    let mapper = ColorMapper::from_names(&config.colour_stops)?;

    let k = k.unwrap_or(config.top_k);
    let query = Projector::new(store).project(&selection_for(units, store), None, false)?;
    let results = top_k_with_config(&query, corpus, k, &SearchConfig::from(config))?;

    let aggregate = if results.is_empty() {
        None
    } else {
        let image = aggregate(&results)?;
        Some(RenderedImage::standalone(&image, &mapper, config))
    };

    let matches = results
        .iter()
        .map(|r| {
            let label = labels.map(|l| l.label_at(r.index)).transpose()?;
            Ok(Match {
                index: r.index,
                similarity: r.similarity,
                label,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SimilarReport {
        k,
        matches,
        aggregate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroprobe_core::{PixelScale, IMAGE_SIZE};
    use neuroprobe_data::load_weights;
    use std::path::Path;

    fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) {
        std::fs::write(dir.join(name), serde_json::to_string(value).unwrap()).unwrap();
    }

    fn write_images(path: &Path, images: &[Vec<u8>]) {
        let mut bytes = Vec::new();
        for value in [2051u32, images.len() as u32, 28, 28] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        for image in images {
            bytes.extend_from_slice(image);
        }
        std::fs::write(path, bytes).unwrap();
    }

    fn write_labels(path: &Path, labels: &[u8]) {
        let mut bytes = Vec::new();
        for value in [2049u32, labels.len() as u32] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        bytes.extend_from_slice(labels);
        std::fs::write(path, bytes).unwrap();
    }

    /// Unit 0 column = 1, unit 1 column = 4. Class 0 weights (1, -1), class 1 (0, 1).
    ///
    /// Images: fully lit, first pixel lit, blank.
    struct Fixture {
        dir: tempfile::TempDir,
        store: WeightStore,
        corpus: ImageCorpus,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model");
        std::fs::create_dir(&model).unwrap();

        let w1: Vec<Vec<f32>> = vec![vec![1.0, 4.0]; IMAGE_SIZE];
        write_json(&model, "layer_0.json", &w1);
        write_json(&model, "layer_1.json", &[0.0f32; 2]);
        write_json(&model, "layer_2.json", &[[1.0f32, 0.0], [-1.0, 1.0]]);
        write_json(&model, "layer_3.json", &[0.0f32; 2]);

        let mut first = vec![0u8; IMAGE_SIZE];
        first[0] = 255;
        write_images(
            &dir.path().join("images.idx"),
            &[vec![255; IMAGE_SIZE], first, vec![0; IMAGE_SIZE]],
        );
        write_labels(&dir.path().join("labels.idx"), &[1, 1, 0]);

        let store = load_weights(&model).unwrap();
        let corpus =
            ImageCorpus::from_idx_file(dir.path().join("images.idx"), PixelScale::Raw).unwrap();
        Fixture { dir, store, corpus }
    }

    #[test]
    fn test_inspect_shapes() {
        let f = fixture();
        let report = inspect(&f.store, Some(&f.corpus));
        assert_eq!(report.w1, [IMAGE_SIZE, 2]);
        assert_eq!(report.w2, [2, 2]);
        assert_eq!(report.images, Some(3));
    }

    #[test]
    fn test_decode_triple_shares_one_scale() {
        let f = fixture();
        let request = DecodeRequest {
            classes: &[0],
            ..Default::default()
        };
        let config = EngineConfig::default();
        assert_eq!(config.norm_mode, NormMode::Local);

        let report = decode(&f.store, request, &config).unwrap();
        let DecodeReport::Triple {
            positive,
            negative,
            hyperplane,
            prediction,
            ..
        } = report
        else {
            panic!("expected a decoding triple");
        };

        // Extremes of the triple are -4 and 1, so everything is divided by 4
        assert!(prediction.is_none());
        assert_eq!(positive.max, 1.0);
        assert!(positive.normalized.iter().all(|&v| v == 0.25));
        assert!(negative.normalized.iter().all(|&v| v == -1.0));
        assert!(hyperplane.normalized.iter().all(|&v| v == -0.75));
        assert_eq!(negative.colours[0], "#0000ff");
        assert_eq!(positive.colours[0], "#404040");
    }

    #[test]
    fn test_decode_projection_by_activation() {
        let f = fixture();
        let pixels = f.corpus.image_vec(1).unwrap();
        let config = EngineConfig::default();

        let plain = DecodeRequest {
            units: &[0, 1],
            ..Default::default()
        };
        let DecodeReport::Projection { image, .. } = decode(&f.store, plain, &config).unwrap()
        else {
            panic!("expected a projection");
        };
        assert_eq!(image.max, 5.0);

        // Hidden activations are (255, 1020): 1·255 + 4·1020
        let weighted = DecodeRequest {
            input: Some(pixels.as_slice()),
            ..plain
        };
        let DecodeReport::Projection {
            image, prediction, ..
        } = decode(&f.store, weighted, &config).unwrap()
        else {
            panic!("expected a projection");
        };
        assert_eq!(prediction, Some(1));
        assert_eq!(image.max, 4335.0);
        assert!(image.normalized.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_decode_rejects_unknown_class() {
        let f = fixture();
        let request = DecodeRequest {
            classes: &[5],
            ..Default::default()
        };
        assert!(decode(&f.store, request, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_saliency_on_projection_scale() {
        let f = fixture();
        let report = saliency_of(&f.store, &f.corpus, 1, &[1], &EngineConfig::default()).unwrap();

        assert_eq!(report.total, 1020.0);
        assert_eq!(report.image.min, 4.0);
        assert_eq!(report.image.max, 4.0);
        // 4 · 255 divided by the projection extent of 4
        assert_eq!(report.image.normalized[0], 255.0);
        assert!(report.image.normalized[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_similar_with_labels() {
        let f = fixture();
        let labels = LabelSet::from_idx_file(f.dir.path().join("labels.idx")).unwrap();
        let report = similar(
            &f.store,
            &f.corpus,
            Some(&labels),
            &[0],
            Some(2),
            &EngineConfig::default(),
        )
        .unwrap();

        let order: Vec<usize> = report.matches.iter().map(|m| m.index).collect();
        assert_eq!(order, vec![0, 1]);
        assert_eq!(report.matches[0].label, Some(1));
        assert_eq!(report.matches[1].similarity, 255.0);
        assert!(report.aggregate.is_some());
    }

    #[test]
    fn test_similar_defaults_to_configured_k() {
        let f = fixture();
        let config = EngineConfig {
            top_k: 1,
            ..Default::default()
        };
        let report = similar(&f.store, &f.corpus, None, &[], None, &config).unwrap();
        assert_eq!(report.k, 1);
        assert_eq!(report.matches.len(), 1);
        assert!(report.matches[0].label.is_none());
    }

    #[test]
    fn test_similar_rejects_label_mismatch() {
        let f = fixture();
        let labels = LabelSet::new(vec![0, 1]);
        let result = similar(
            &f.store,
            &f.corpus,
            Some(&labels),
            &[0],
            None,
            &EngineConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let f = fixture();
        let request = DecodeRequest {
            classes: &[0],
            ..Default::default()
        };
        let report = decode(&f.store, request, &EngineConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["classes"], serde_json::json!([0]));
        assert!(json.get("prediction").is_none());
        assert_eq!(json["positive"]["colours"].as_array().unwrap().len(), IMAGE_SIZE);
    }
}
