// Colored terminal output for prediction results and model info.
//
// This module handles all terminal-specific formatting: colors, ranked
// lists, confidence bars. The main.rs command handlers delegate here; the
// engine itself only ever returns plain structured data.

use colored::Colorize;

use crate::artifacts::ModelCard;
use crate::engine::RankedPrediction;

/// Display a ranked prediction list in the terminal.
///
/// Confidence is always rendered with exactly two decimal places and a `%`
/// suffix, matching how the scores were reported during model evaluation.
pub fn display_predictions(predictions: &[RankedPrediction]) {
    if predictions.is_empty() {
        println!("No predictions produced.");
        return;
    }

    println!("\n{}", "=== Prediction Results ===".bold());
    println!();

    let bar_width: usize = 20;

    for prediction in predictions {
        let filled = (prediction.confidence / 100.0 * bar_width as f64).round() as usize;
        let filled = filled.min(bar_width);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(bar_width - filled));

        let colored_bar = if prediction.confidence >= 50.0 {
            bar.bright_green()
        } else if prediction.confidence >= 20.0 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<32} {} {}",
            prediction.rank,
            prediction.disease.bold(),
            colored_bar,
            format!("{:.2}% match", prediction.confidence),
        );
    }

    println!();
}

/// Display the optional model card — which model is serving, how features
/// were extracted, and how the candidate models scored during training.
pub fn display_model_card(card: &ModelCard) {
    println!("\n{}", "=== Model Information ===".bold());

    if let Some(model) = &card.model {
        println!("  Model used: {}", model.bold());
    }
    if let Some(extraction) = &card.feature_extraction {
        println!("  Feature extraction: {extraction}");
    }
    if let Some(trained_on) = &card.trained_on {
        println!("  Trained on: {trained_on}");
    }

    if !card.accuracy.is_empty() {
        println!("\n  Accuracy report:");
        for (name, percent) in &card.accuracy {
            let line = format!("    {name}: {percent:.0}%");
            // Highlight the model that's actually serving
            if card.model.as_deref() == Some(name.as_str()) {
                println!("{}", line.bold());
            } else {
                println!("{line}");
            }
        }
    }
}
