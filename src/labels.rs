// Label decoder — class index to human-readable disease name.
//
// The training side persists the label-encoder classes as a JSON array in
// class-index order. Decoding is a straight index lookup; an index outside
// the array means the classifier and decoder were not fitted together.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Disease names in class-index order.
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    /// Load the label artifact (a JSON array of names) from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label artifact: {}", path.display()))?;
        let classes: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed label artifact: {}", path.display()))?;

        let decoder = Self::from_classes(classes)?;
        debug!(
            classes = decoder.class_count(),
            "Loaded label decoder from {}",
            path.display()
        );
        Ok(decoder)
    }

    pub fn from_classes(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            anyhow::bail!("Label artifact contains no classes");
        }
        Ok(Self { classes })
    }

    /// Disease name for a class index, or `None` if the index is outside the
    /// label space.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
