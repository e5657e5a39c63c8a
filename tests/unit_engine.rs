// Unit tests for the top-k ranked inference engine.
//
// The engine runs against in-process stand-ins for the three collaborators,
// so every ranking property is checked without touching model artifacts:
// ordering, tie-breaking, exact counts, percentage conversion, determinism,
// and input rejection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use sympred::classify::traits::Classifier;
use sympred::engine::{Engine, PredictError};
use sympred::labels::LabelDecoder;
use sympred::vectorize::traits::Vectorizer;

/// Vectorizer stand-in: fixed output, counts invocations.
struct CountingVectorizer {
    output: Vec<f32>,
    calls: Arc<AtomicUsize>,
}

impl Vectorizer for CountingVectorizer {
    fn transform(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }

    fn dimension(&self) -> usize {
        self.output.len()
    }
}

/// Classifier stand-in: fixed distribution, counts invocations.
struct FixedClassifier {
    probabilities: Vec<f64>,
    calls: Arc<AtomicUsize>,
}

impl Classifier for FixedClassifier {
    fn predict_probabilities(&self, _features: &[f32]) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probabilities.clone())
    }
}

/// Vectorizer stand-in that always fails.
struct FailingVectorizer;

impl Vectorizer for FailingVectorizer {
    fn transform(&self, _text: &str) -> Result<Vec<f32>> {
        anyhow::bail!("vocabulary table corrupted")
    }

    fn dimension(&self) -> usize {
        0
    }
}

/// Engine over a fixed distribution and label set, plus call counters for
/// the vectorizer and classifier.
fn engine_with(
    probabilities: Vec<f64>,
    labels: &[&str],
) -> (Engine, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let vectorizer_calls = Arc::new(AtomicUsize::new(0));
    let classifier_calls = Arc::new(AtomicUsize::new(0));

    let engine = Engine::new(
        Box::new(CountingVectorizer {
            output: vec![0.5; 4],
            calls: Arc::clone(&vectorizer_calls),
        }),
        Box::new(FixedClassifier {
            probabilities,
            calls: Arc::clone(&classifier_calls),
        }),
        LabelDecoder::from_classes(labels.iter().map(|s| s.to_string()).collect()).unwrap(),
    );

    (engine, vectorizer_calls, classifier_calls)
}

// ============================================================
// Reference scenarios
// ============================================================

#[test]
fn ranked_output_matches_reference_distribution() {
    let (engine, _, _) = engine_with(
        vec![0.05, 0.70, 0.10, 0.15],
        &["Flu", "Cold", "Migraine", "Allergy"],
    );

    let ranked = engine.predict_top_k("fever and chills", 3).unwrap();

    assert_eq!(ranked.len(), 3);

    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].disease, "Cold");
    assert!((ranked[0].confidence - 70.0).abs() < 1e-9);

    assert_eq!(ranked[1].rank, 2);
    assert_eq!(ranked[1].disease, "Allergy");
    assert!((ranked[1].confidence - 15.0).abs() < 1e-9);

    assert_eq!(ranked[2].rank, 3);
    assert_eq!(ranked[2].disease, "Migraine");
    assert!((ranked[2].confidence - 10.0).abs() < 1e-9);
}

#[test]
fn tie_broken_by_ascending_class_index() {
    let (engine, _, _) = engine_with(vec![0.5, 0.5], &["Flu", "Cold"]);

    let ranked = engine.predict_top_k("aches", 2).unwrap();

    assert_eq!(ranked[0].disease, "Flu");
    assert_eq!(ranked[1].disease, "Cold");
    assert!((ranked[0].confidence - 50.0).abs() < 1e-9);
    assert!((ranked[1].confidence - 50.0).abs() < 1e-9);
}

#[test]
fn whitespace_input_rejected_before_any_collaborator_call() {
    let (engine, vectorizer_calls, classifier_calls) =
        engine_with(vec![0.25; 4], &["A", "B", "C", "D"]);

    let err = engine.predict_top_k("   ", 3).unwrap_err();

    assert!(matches!(err, PredictError::EmptyInput));
    assert!(err.is_user_error());
    assert_eq!(vectorizer_calls.load(Ordering::SeqCst), 0);
    assert_eq!(classifier_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn k_beyond_class_count_is_a_configuration_error() {
    let (engine, _, _) = engine_with(vec![0.25; 4], &["A", "B", "C", "D"]);

    let err = engine.predict_top_k("fever", 5).unwrap_err();

    assert!(matches!(
        err,
        PredictError::NotEnoughClasses {
            requested: 5,
            available: 4
        }
    ));
    assert!(!err.is_user_error());
}

#[test]
fn zero_k_rejected() {
    let (engine, _, _) = engine_with(vec![0.25; 4], &["A", "B", "C", "D"]);

    let err = engine.predict_top_k("fever", 0).unwrap_err();
    assert!(matches!(err, PredictError::NotEnoughClasses { .. }));
}

// ============================================================
// Ranking properties
// ============================================================

#[test]
fn confidence_never_increases_down_the_ranking() {
    let (engine, _, _) = engine_with(
        vec![0.12, 0.03, 0.12, 0.40, 0.05, 0.28],
        &["A", "B", "C", "D", "E", "F"],
    );

    let ranked = engine.predict_top_k("symptoms", 6).unwrap();

    for pair in ranked.windows(2) {
        assert!(
            pair[0].confidence >= pair[1].confidence,
            "rank {} ({}) below rank {} ({})",
            pair[0].rank,
            pair[0].confidence,
            pair[1].rank,
            pair[1].confidence
        );
    }

    // Equal probabilities at indices 0 and 2: index 0 must come first
    let pos_a = ranked.iter().position(|p| p.disease == "A").unwrap();
    let pos_c = ranked.iter().position(|p| p.disease == "C").unwrap();
    assert!(pos_a < pos_c);
}

#[test]
fn returns_exactly_k_entries_with_ranks_from_one() {
    let (engine, _, _) = engine_with(vec![0.1, 0.2, 0.3, 0.4], &["A", "B", "C", "D"]);

    for k in 1..=4 {
        let ranked = engine.predict_top_k("fever", k).unwrap();
        assert_eq!(ranked.len(), k);
        for (i, prediction) in ranked.iter().enumerate() {
            assert_eq!(prediction.rank, i + 1);
        }
    }
}

#[test]
fn confidence_is_probability_times_one_hundred() {
    let probabilities = vec![0.071, 0.419, 0.2535, 0.2565];
    let (engine, _, _) = engine_with(probabilities.clone(), &["A", "B", "C", "D"]);

    let ranked = engine.predict_top_k("fever", 4).unwrap();

    for prediction in &ranked {
        let class_idx = ["A", "B", "C", "D"]
            .iter()
            .position(|d| *d == prediction.disease)
            .unwrap();
        assert!(
            (prediction.confidence - probabilities[class_idx] * 100.0).abs() < 1e-6,
            "confidence {} for probability {}",
            prediction.confidence,
            probabilities[class_idx]
        );
    }
}

#[test]
fn repeated_calls_are_identical() {
    let (engine, _, _) = engine_with(
        vec![0.2, 0.2, 0.2, 0.2, 0.2],
        &["A", "B", "C", "D", "E"],
    );

    let first = engine.predict_top_k("fever and cough", 5).unwrap();
    let second = engine.predict_top_k("fever and cough", 5).unwrap();

    assert_eq!(first, second);
}

// ============================================================
// Collaborator mismatch and failure
// ============================================================

#[test]
fn winner_outside_label_space_is_a_mismatch() {
    // Classifier claims 5 classes, decoder only knows 3 — the winning index
    // has no label and must fail loudly, not silently skip.
    let (engine, _, _) = engine_with(vec![0.1, 0.1, 0.1, 0.1, 0.6], &["A", "B", "C"]);

    let err = engine.predict_top_k("fever", 2).unwrap_err();

    assert!(matches!(
        err,
        PredictError::LabelMismatch { index: 4, known: 3 }
    ));
    assert!(!err.is_user_error());
}

#[test]
fn distribution_shorter_than_k_is_insufficient() {
    // Decoder knows 4 classes so the upfront check passes, but the
    // classifier only produced 2 probabilities.
    let (engine, _, _) = engine_with(vec![0.6, 0.4], &["A", "B", "C", "D"]);

    let err = engine.predict_top_k("fever", 3).unwrap_err();

    assert!(matches!(
        err,
        PredictError::NotEnoughClasses {
            requested: 3,
            available: 2
        }
    ));
}

#[test]
fn vectorizer_failure_propagates_as_configuration_error() {
    let classifier_calls = Arc::new(AtomicUsize::new(0));
    let engine = Engine::new(
        Box::new(FailingVectorizer),
        Box::new(FixedClassifier {
            probabilities: vec![0.5, 0.5],
            calls: Arc::clone(&classifier_calls),
        }),
        LabelDecoder::from_classes(vec!["A".to_string(), "B".to_string()]).unwrap(),
    );

    let err = engine.predict_top_k("fever", 2).unwrap_err();

    assert!(matches!(err, PredictError::Vectorizer(_)));
    assert!(!err.is_user_error());
    // Classification never runs if vectorization failed
    assert_eq!(classifier_calls.load(Ordering::SeqCst), 0);
}
