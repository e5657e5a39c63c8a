// Sympred: symptom-based disease prediction from free text.
//
// This is the library root. Each module is one stage of the pipeline:
// model artifacts on disk -> vectorizer -> classifier -> ranked predictions,
// plus terminal presentation.

pub mod artifacts;
pub mod classify;
pub mod config;
pub mod engine;
pub mod labels;
pub mod output;
pub mod vectorize;
