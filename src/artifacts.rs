// Model artifact layout and discovery.
//
// All pretrained artifacts live in one directory, produced by the training
// side: the TF-IDF vocabulary, the label-encoder classes, and one classifier
// model per backend. Files are stored in a platform-appropriate directory
// (~/.local/share/sympred/models/ on Linux) unless overridden by config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::ClassifierBackend;

/// Fitted TF-IDF vocabulary + IDF table.
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
/// Label-encoder classes, index order.
pub const LABELS_FILE: &str = "label_encoder.json";
/// skl2onnx export of the random forest (Onnx backend).
pub const FOREST_MODEL_FILE: &str = "random_forest.onnx";
/// Multinomial logistic-regression weights (Linear backend).
pub const LINEAR_MODEL_FILE: &str = "logistic_regression.json";
/// Optional training metadata shown by `sympred status`.
pub const MODEL_CARD_FILE: &str = "model_card.json";

/// Returns the default directory for model artifacts.
/// Uses the platform data directory: ~/.local/share/sympred/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sympred")
        .join("models")
}

pub fn vectorizer_path(dir: &Path) -> PathBuf {
    dir.join(VECTORIZER_FILE)
}

pub fn labels_path(dir: &Path) -> PathBuf {
    dir.join(LABELS_FILE)
}

pub fn forest_model_path(dir: &Path) -> PathBuf {
    dir.join(FOREST_MODEL_FILE)
}

pub fn linear_model_path(dir: &Path) -> PathBuf {
    dir.join(LINEAR_MODEL_FILE)
}

pub fn model_card_path(dir: &Path) -> PathBuf {
    dir.join(MODEL_CARD_FILE)
}

/// Classifier model file for a backend.
pub fn classifier_path(dir: &Path, backend: &ClassifierBackend) -> PathBuf {
    match backend {
        ClassifierBackend::Onnx => forest_model_path(dir),
        ClassifierBackend::Linear => linear_model_path(dir),
    }
}

/// Check whether every artifact the given backend needs is present.
pub fn artifact_files_present(dir: &Path, backend: &ClassifierBackend) -> bool {
    vectorizer_path(dir).exists()
        && labels_path(dir).exists()
        && classifier_path(dir, backend).exists()
}

/// Training metadata the original pipeline displayed next to its predictions:
/// which model was picked, how features were extracted, and the accuracy of
/// each candidate model. Entirely optional — inference never reads it.
#[derive(Debug, Deserialize)]
pub struct ModelCard {
    pub model: Option<String>,
    pub feature_extraction: Option<String>,
    pub trained_on: Option<String>,
    /// model name -> accuracy percent, sorted for stable display
    #[serde(default)]
    pub accuracy: BTreeMap<String, f64>,
}

/// Load the model card if one exists. Missing file is not an error.
pub fn load_model_card(dir: &Path) -> Result<Option<ModelCard>> {
    let path = model_card_path(dir);
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read model card: {}", path.display()))?;
    let card = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed model card: {}", path.display()))?;
    Ok(Some(card))
}
