// Pretrained TF-IDF vectorizer.
//
// Loads the fitted vocabulary and per-term IDF weights from a JSON artifact
// and reproduces the training-side transform: tokenize, count terms, weight
// by IDF, L2-normalize. Terms outside the fitted vocabulary are ignored —
// the vector length is fixed by the artifact, not by the input.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde::Deserialize;
use tracing::debug;

use super::traits::Vectorizer;

/// Word rule the vectorizer was fitted with: runs of two or more word
/// characters. Single-character tokens carry no signal and were dropped
/// during training, so they must be dropped here too.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// On-disk shape of `tfidf_vectorizer.json`.
#[derive(Deserialize)]
struct TfidfArtifact {
    /// term -> column index in the feature vector
    vocabulary: HashMap<String, usize>,
    /// IDF weight per column, indexed by vocabulary value
    idf: Vec<f32>,
}

/// TF-IDF vectorizer restored from a fitted artifact.
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    token_pattern: Regex,
}

impl TfidfVectorizer {
    /// Load the vectorizer artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vectorizer artifact: {}", path.display()))?;
        let artifact: TfidfArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed vectorizer artifact: {}", path.display()))?;

        let vectorizer = Self::from_parts(artifact.vocabulary, artifact.idf)?;

        debug!(
            terms = vectorizer.vocabulary.len(),
            dimension = vectorizer.idf.len(),
            "Loaded TF-IDF vectorizer from {}",
            path.display()
        );

        Ok(vectorizer)
    }

    /// Build a vectorizer from an already-parsed vocabulary and IDF table.
    ///
    /// Every vocabulary index must fall inside the IDF table — a mismatch
    /// means the artifact was not exported in one piece.
    pub fn from_parts(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Result<Self> {
        if idf.is_empty() {
            anyhow::bail!("Vectorizer artifact has an empty IDF table");
        }
        if let Some((term, &index)) = vocabulary.iter().find(|(_, &i)| i >= idf.len()) {
            anyhow::bail!(
                "Vocabulary term {:?} maps to column {} but the IDF table has only {} entries",
                term,
                index,
                idf.len()
            );
        }

        let token_pattern = Regex::new(TOKEN_PATTERN).context("Invalid token pattern")?;

        Ok(Self {
            vocabulary,
            idf,
            token_pattern,
        })
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();

        // Raw term counts over the fitted vocabulary
        let mut vector = vec![0.0f32; self.idf.len()];
        for token in self.token_pattern.find_iter(&lower) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                vector[column] += 1.0;
            }
        }

        // Weight by IDF, then L2-normalize. A text with no known terms stays
        // a zero vector rather than erroring — the classifier still produces
        // a (flat) distribution for it.
        for (value, &idf) in vector.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_vectorizer() -> TfidfVectorizer {
        let vocabulary = HashMap::from([
            ("fever".to_string(), 0),
            ("headache".to_string(), 1),
            ("nausea".to_string(), 2),
        ]);
        TfidfVectorizer::from_parts(vocabulary, vec![1.0, 2.0, 1.5]).unwrap()
    }

    #[test]
    fn test_transform_counts_and_weights() {
        let v = small_vectorizer();
        // fever x1, headache x2 -> tf*idf = [1.0, 4.0, 0.0] before norm
        let out = v.transform("Fever and headache, severe headache").unwrap();

        let norm = (1.0f32 + 16.0).sqrt();
        assert!((out[0] - 1.0 / norm).abs() < 1e-6);
        assert!((out[1] - 4.0 / norm).abs() < 1e-6);
        assert!(out[2].abs() < 1e-6);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let v = small_vectorizer();
        let out = v.transform("fever nausea headache").unwrap();
        let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "L2 norm was {norm}");
    }

    #[test]
    fn test_unknown_terms_ignored() {
        let v = small_vectorizer();
        let out = v.transform("completely unrelated words").unwrap();
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_char_tokens_dropped() {
        let vocabulary = HashMap::from([("a".to_string(), 0), ("flu".to_string(), 1)]);
        let v = TfidfVectorizer::from_parts(vocabulary, vec![1.0, 1.0]).unwrap();
        // "a" never matches the two-character word rule
        let out = v.transform("a a a flu").unwrap();
        assert!(out[0].abs() < 1e-6);
        assert!(out[1] > 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let v = small_vectorizer();
        assert_eq!(
            v.transform("FEVER Headache").unwrap(),
            v.transform("fever headache").unwrap()
        );
    }

    #[test]
    fn test_dimension_matches_idf_table() {
        assert_eq!(small_vectorizer().dimension(), 3);
    }

    #[test]
    fn test_vocabulary_index_out_of_range_rejected() {
        let vocabulary = HashMap::from([("fever".to_string(), 5)]);
        assert!(TfidfVectorizer::from_parts(vocabulary, vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_empty_idf_rejected() {
        assert!(TfidfVectorizer::from_parts(HashMap::new(), vec![]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("sympred-tfidf-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tfidf_vectorizer.json");
        std::fs::write(
            &path,
            r#"{"vocabulary": {"fever": 0, "cough": 1}, "idf": [1.2, 2.4]}"#,
        )
        .unwrap();

        let v = TfidfVectorizer::load(&path).unwrap();
        assert_eq!(v.dimension(), 2);
        let out = v.transform("fever").unwrap();
        assert!((out[0] - 1.0).abs() < 1e-6, "single-term vector normalizes to 1.0");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
