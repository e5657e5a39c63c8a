// ONNX classifier backend — the exported random forest.
//
// The training side exports the fitted random forest with skl2onnx (zipmap
// disabled), which fixes the wire contract this backend relies on:
// input tensor `float_input` of shape [1, n_features], output tensor
// `probabilities` of shape [1, n_classes]. Inference runs entirely on the
// local CPU — no network, no service dependency.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::traits::Classifier;

/// Classifier backed by an ONNX model file.
pub struct OnnxClassifier {
    // Mutex because ort::Session::run takes &mut self and the Classifier
    // trait is &self + Sync. Calls are short and single-shot, so the lock
    // is uncontended in practice.
    session: Mutex<Session>,
}

impl OnnxClassifier {
    /// Load the ONNX model from the given file.
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!(
                "Classifier model not found: {}\nCopy the exported model artifacts into the model directory (see `sympred status`).",
                model_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        debug!("Loaded ONNX classifier from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_probabilities(&self, features: &[f32]) -> Result<Vec<f64>> {
        let shape = [1i64, features.len() as i64];
        let input = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create feature tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! { "float_input" => input })
            .context("ONNX inference failed")?;

        // Shape [1, n_classes]; the leading batch dimension is always 1 here.
        let (_shape, data) = outputs["probabilities"]
            .try_extract_tensor::<f32>()
            .context("Failed to extract probability tensor")?;

        Ok(data.iter().map(|&p| p as f64).collect())
    }
}
