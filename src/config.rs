use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Which classifier backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Exported random forest via ONNX Runtime (default)
    Onnx,
    /// Logistic-regression weights scored in-process — no native runtime
    Linear,
}

impl ClassifierBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierBackend::Onnx => "random forest (ONNX)",
            ClassifierBackend::Linear => "logistic regression",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Everything
/// has a default, so a fresh checkout runs with zero configuration once the
/// model artifacts are in place.
pub struct Config {
    /// Directory containing the pretrained model artifacts
    pub model_dir: PathBuf,
    /// Which classifier backend to score with (default: Onnx)
    pub classifier_backend: ClassifierBackend,
    /// How many predictions to return by default (default: 3)
    pub top_k: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let classifier_backend = match env::var("SYMPRED_CLASSIFIER").as_deref() {
            Ok("linear") => ClassifierBackend::Linear,
            // "onnx" or unset both default to the ONNX forest
            _ => ClassifierBackend::Onnx,
        };

        let model_dir = env::var("SYMPRED_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::artifacts::default_model_dir());

        let top_k = match env::var("SYMPRED_TOP_K") {
            Ok(raw) => {
                let k: usize = raw
                    .parse()
                    .with_context(|| format!("SYMPRED_TOP_K is not a number: {raw:?}"))?;
                if k == 0 {
                    anyhow::bail!("SYMPRED_TOP_K must be at least 1");
                }
                k
            }
            Err(_) => 3,
        };

        Ok(Self {
            model_dir,
            classifier_backend,
            top_k,
        })
    }

    /// Check that the configured backend has its artifacts on disk.
    /// Call this before building the engine so the user gets an actionable
    /// message instead of a load failure mid-command.
    pub fn require_model(&self) -> Result<()> {
        if !crate::artifacts::artifact_files_present(&self.model_dir, &self.classifier_backend) {
            anyhow::bail!(
                "Model artifacts not found in {}\n\
                 The {} backend needs {}, {} and {}.\n\
                 Copy the exported training artifacts there, or point \
                 SYMPRED_MODEL_DIR at them.",
                self.model_dir.display(),
                self.classifier_backend.as_str(),
                crate::artifacts::VECTORIZER_FILE,
                crate::artifacts::LABELS_FILE,
                crate::artifacts::classifier_path(&self.model_dir, &self.classifier_backend)
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }
        Ok(())
    }
}
