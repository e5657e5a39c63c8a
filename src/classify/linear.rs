// Logistic-regression classifier backend.
//
// A pure-Rust alternative to the ONNX forest: the fitted multinomial
// logistic-regression weights are loaded from a JSON artifact and scored
// in-process (dot product per class, softmax over the scores). Useful on
// targets where ONNX Runtime is unavailable, and as the fast path in tests.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::traits::Classifier;

/// On-disk shape of `logistic_regression.json`. One coefficient row per
/// class; the artifact is always exported in full multi-class form, even
/// for two classes.
#[derive(Deserialize)]
struct LinearArtifact {
    coefficients: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

/// Multinomial logistic-regression classifier restored from a fitted artifact.
pub struct LinearClassifier {
    coefficients: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

impl LinearClassifier {
    /// Load the weights artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read classifier artifact: {}", path.display()))?;
        let artifact: LinearArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed classifier artifact: {}", path.display()))?;

        let classifier = Self::from_parts(artifact.coefficients, artifact.intercepts)?;

        debug!(
            classes = classifier.class_count(),
            features = classifier.feature_count(),
            "Loaded logistic-regression classifier from {}",
            path.display()
        );

        Ok(classifier)
    }

    /// Build a classifier from already-parsed weights, validating shape:
    /// at least one class, rectangular coefficient rows, one intercept per
    /// class.
    pub fn from_parts(coefficients: Vec<Vec<f32>>, intercepts: Vec<f32>) -> Result<Self> {
        if coefficients.is_empty() {
            anyhow::bail!("Classifier artifact has no coefficient rows");
        }
        let width = coefficients[0].len();
        if width == 0 {
            anyhow::bail!("Classifier artifact has zero-width coefficient rows");
        }
        if let Some((row, _)) = coefficients
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != width)
        {
            anyhow::bail!(
                "Coefficient row {} has {} entries, expected {}",
                row,
                coefficients[row].len(),
                width
            );
        }
        if intercepts.len() != coefficients.len() {
            anyhow::bail!(
                "{} intercepts for {} classes — artifact was not exported in one piece",
                intercepts.len(),
                coefficients.len()
            );
        }

        Ok(Self {
            coefficients,
            intercepts,
        })
    }

    pub fn class_count(&self) -> usize {
        self.coefficients.len()
    }

    pub fn feature_count(&self) -> usize {
        self.coefficients[0].len()
    }
}

impl Classifier for LinearClassifier {
    fn predict_probabilities(&self, features: &[f32]) -> Result<Vec<f64>> {
        if features.len() != self.feature_count() {
            anyhow::bail!(
                "Feature vector has {} entries but the classifier was trained on {} — vectorizer and classifier artifacts do not match",
                features.len(),
                self.feature_count()
            );
        }

        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(self.intercepts.iter())
            .map(|(row, &intercept)| {
                let dot: f32 = row.iter().zip(features.iter()).map(|(c, x)| c * x).sum();
                (dot + intercept) as f64
            })
            .collect();

        Ok(softmax(&scores))
    }
}

/// Softmax with max-subtraction so large scores don't overflow `exp`.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}
