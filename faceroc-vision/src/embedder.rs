use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array4, ArrayD, IxDyn};
use ort::{session::Session, value::Value};

use crate::preprocess::InputSpec;

/// Turns one normalized, batched image into a raw embedding tensor.
pub trait Embedder {
    fn embed(&mut self, input: &Array4<f32>) -> Result<ArrayD<f32>>;
}

/// Tensor shapes reported by the model when it was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub input_shape: Vec<usize>,
    pub output_shape: Vec<usize>,
}

/// Embedder backed by an ONNX Runtime session.
pub struct OnnxEmbedder {
    session: Session,
    info: ModelInfo,
}

impl OnnxEmbedder {
    /// Load the model and run one all-zero probe to check it accepts `spec`.
    pub fn load(path: &Path, spec: &InputSpec) -> Result<Self> {
        let session = crate::model::load_session(path)?;
        let mut embedder = Self {
            session,
            info: ModelInfo {
                input_shape: spec.shape().to_vec(),
                output_shape: Vec::new(),
            },
        };

        let [n, a, b, c] = spec.shape();
        let probe = Array4::<f32>::zeros((n, a, b, c));
        let output = embedder
            .embed(&probe)
            .context("model rejected probe input")?;
        embedder.info.output_shape = output.shape().to_vec();

        log::info!("Model loaded: {}", path.display());
        log::info!("  Input: {:?}", embedder.info.input_shape);
        log::info!("  Output: {:?}", embedder.info.output_shape);

        Ok(embedder)
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}

impl Embedder for OnnxEmbedder {
    fn embed(&mut self, input: &Array4<f32>) -> Result<ArrayD<f32>> {
        let input_tensor = Value::from_array(input.clone())?;
        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
        let output = ArrayD::from_shape_vec(IxDyn(&dims), data.to_vec())
            .context("embedding output shape does not match its data")?;
        Ok(output)
    }
}
