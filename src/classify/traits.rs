// Classifier trait — the swap-ready abstraction.
//
// The original pipeline had "you can change model here" scribbled next to
// the model load; this trait is that comment made into a seam. The default
// backend runs the exported random forest through ONNX Runtime; a pure-Rust
// logistic-regression backend is available where ONNX Runtime is not.

use anyhow::Result;

/// Trait for producing a class probability distribution from a feature vector.
pub trait Classifier: Send + Sync {
    /// Score one feature vector. Returns one probability per class, aligned
    /// to the class index space the model was trained with. Values are
    /// non-negative; whether they sum to exactly 1.0 is a property of the
    /// backend, not enforced here.
    fn predict_probabilities(&self, features: &[f32]) -> Result<Vec<f64>>;
}
