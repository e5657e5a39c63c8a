// Top-K ranked inference engine.
//
// Orchestrates the three pretrained collaborators (vectorizer, classifier,
// label decoder) into one deterministic ranked result. The engine holds no
// mutable state: a call is a pure function of the input text and the
// collaborators injected at construction, so concurrent use needs no locking
// beyond what the collaborators do internally.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::classify::traits::Classifier;
use crate::labels::LabelDecoder;
use crate::vectorize::traits::Vectorizer;

/// One entry of a ranked prediction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    /// 1-based position in the ranking
    pub rank: usize,
    /// Human-readable disease name from the label decoder
    pub disease: String,
    /// Confidence as a percentage (0.0 to 100.0). Full float precision is
    /// kept here; presentation rounds to two decimals.
    pub confidence: f64,
}

/// Why an inference call failed.
///
/// `EmptyInput` is the only user-correctable case — everything else points at
/// a deployment defect (artifacts that were not fitted together, or a top-k
/// request the model cannot satisfy) and should reach the operator, not the
/// user. `is_user_error` is the discriminator the CLI uses to decide which.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("no symptoms provided — enter a description before predicting")]
    EmptyInput,
    #[error("top-{requested} requested but only {available} disease classes are known")]
    NotEnoughClasses { requested: usize, available: usize },
    #[error("class index {index} has no label entry (decoder knows {known} classes)")]
    LabelMismatch { index: usize, known: usize },
    #[error("vectorizer failed: {0}")]
    Vectorizer(anyhow::Error),
    #[error("classifier failed: {0}")]
    Classifier(anyhow::Error),
}

impl PredictError {
    /// True for errors the user can fix by re-entering input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, PredictError::EmptyInput)
    }
}

/// The inference engine. Collaborators are injected once and treated as
/// immutable; swap in test doubles or an alternative classifier backend
/// without touching the ranking logic.
pub struct Engine {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    decoder: LabelDecoder,
}

impl Engine {
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        decoder: LabelDecoder,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            decoder,
        }
    }

    /// Number of disease classes the label decoder knows about.
    pub fn class_count(&self) -> usize {
        self.decoder.class_count()
    }

    /// Predict the `k` most probable diseases for a symptom description,
    /// in strictly non-increasing confidence order.
    ///
    /// Equal probabilities are broken by ascending class index, so repeated
    /// calls with the same inputs produce identical output. Returns exactly
    /// `k` entries or an error — never a truncated ranking.
    pub fn predict_top_k(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<RankedPrediction>, PredictError> {
        // Reject blank input before any collaborator runs.
        if text.trim().is_empty() {
            return Err(PredictError::EmptyInput);
        }

        let known = self.decoder.class_count();
        if k == 0 || k > known {
            return Err(PredictError::NotEnoughClasses {
                requested: k,
                available: known,
            });
        }

        let features = self
            .vectorizer
            .transform(text)
            .map_err(PredictError::Vectorizer)?;
        let probabilities = self
            .classifier
            .predict_probabilities(&features)
            .map_err(PredictError::Classifier)?;

        // The classifier may disagree with the decoder about the class space
        // (artifacts not exported together). Too few classes is caught here;
        // an out-of-range winner is caught at decode time below.
        if probabilities.len() < k {
            return Err(PredictError::NotEnoughClasses {
                requested: k,
                available: probabilities.len(),
            });
        }

        let selected = top_k_indices(&probabilities, k);

        let mut ranked = Vec::with_capacity(k);
        for (position, &class_idx) in selected.iter().enumerate() {
            let disease = self
                .decoder
                .decode(class_idx)
                .ok_or(PredictError::LabelMismatch {
                    index: class_idx,
                    known,
                })?;
            ranked.push(RankedPrediction {
                rank: position + 1,
                disease: disease.to_string(),
                confidence: probabilities[class_idx] * 100.0,
            });
        }

        debug!(
            k,
            classes = probabilities.len(),
            top_disease = %ranked[0].disease,
            top_confidence = ranked[0].confidence,
            text_preview = %crate::output::truncate_chars(text, 50),
            "ranked prediction complete"
        );

        Ok(ranked)
    }
}

/// Indices of the `k` largest probabilities, ordered by probability
/// descending, equal probabilities by ascending index.
///
/// A plain descending sort leaves tie order unspecified; the explicit
/// secondary key keeps the ranking reproducible across runs.
fn top_k_indices(probabilities: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    order.truncate(k);
    order
}
