use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use sympred::artifacts;
use sympred::classify::linear::LinearClassifier;
use sympred::classify::onnx::OnnxClassifier;
use sympred::classify::traits::Classifier;
use sympred::config::{ClassifierBackend, Config};
use sympred::engine::Engine;
use sympred::labels::LabelDecoder;
use sympred::vectorize::tfidf::TfidfVectorizer;
use sympred::vectorize::traits::Vectorizer;

/// Sympred: symptom-based disease prediction.
///
/// Describe your symptoms in plain language and get the most probable
/// diseases with confidence scores, ranked by a pretrained model.
#[derive(Parser)]
#[command(name = "sympred", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict diseases for a one-shot symptom description
    Predict {
        /// The symptom description (e.g. "fever, headache, runny nose")
        text: String,

        /// How many predictions to return (default: configured top-k)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Interactive mode: enter symptoms, get predictions, repeat
    Chat,

    /// Show model artifact status and training information
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sympred=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict { text, top } => {
            let config = Config::load()?;
            config.require_model()?;
            let engine = build_engine(&config)?;

            let k = top.unwrap_or(config.top_k);
            predict_and_display(&engine, &text, k)?;
        }

        Commands::Chat => {
            let config = Config::load()?;
            config.require_model()?;
            let engine = build_engine(&config)?;

            println!(
                "{}",
                "Describe your symptoms (e.g. fever, headache, runny nose). Type 'quit' or press Ctrl-D to exit."
                    .bold()
            );

            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                print!("\nsymptoms> ");
                std::io::stdout().flush()?;

                line.clear();
                if stdin.lock().read_line(&mut line)? == 0 {
                    // EOF
                    println!();
                    break;
                }

                let text = line.trim();
                if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
                    break;
                }

                predict_and_display(&engine, text, config.top_k)?;
            }
        }

        Commands::Status => {
            let config = Config::load()?;

            println!("Model directory: {}", config.model_dir.display());
            println!("Classifier backend: {}", config.classifier_backend.as_str());
            println!();

            let artifact_files = [
                artifacts::vectorizer_path(&config.model_dir),
                artifacts::labels_path(&config.model_dir),
                artifacts::classifier_path(&config.model_dir, &config.classifier_backend),
            ];
            for path in &artifact_files {
                let name = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if path.exists() {
                    println!("  {} {}", "ok".green(), name);
                } else {
                    println!("  {} {} (missing)", "--".red(), name);
                }
            }

            let labels_path = artifacts::labels_path(&config.model_dir);
            if labels_path.exists() {
                let decoder = LabelDecoder::load(&labels_path)?;
                println!("\nKnown diseases: {}", decoder.class_count());
            }

            if let Some(card) = artifacts::load_model_card(&config.model_dir)? {
                sympred::output::terminal::display_model_card(&card);
            }

            if !artifacts::artifact_files_present(&config.model_dir, &config.classifier_backend) {
                println!(
                    "\nCopy the exported training artifacts into the model directory,\n\
                     or point SYMPRED_MODEL_DIR at them."
                );
            }
        }
    }

    Ok(())
}

/// Run one inference and render the result. User-correctable input problems
/// become a warning prompt; everything else (artifact mismatches) is a real
/// error and aborts the command.
fn predict_and_display(engine: &Engine, text: &str, k: usize) -> Result<()> {
    match engine.predict_top_k(text, k) {
        Ok(predictions) => {
            sympred::output::terminal::display_predictions(&predictions);
            Ok(())
        }
        Err(e) if e.is_user_error() => {
            println!(
                "{} Please describe your symptoms before predicting.",
                "Warning:".yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Assemble the inference engine from the configured artifacts.
fn build_engine(config: &Config) -> Result<Engine> {
    let vectorizer =
        TfidfVectorizer::load(&artifacts::vectorizer_path(&config.model_dir))?;
    let decoder = LabelDecoder::load(&artifacts::labels_path(&config.model_dir))?;

    let classifier: Box<dyn Classifier> = match config.classifier_backend {
        ClassifierBackend::Onnx => Box::new(OnnxClassifier::load(&artifacts::forest_model_path(
            &config.model_dir,
        ))?),
        ClassifierBackend::Linear => Box::new(LinearClassifier::load(
            &artifacts::linear_model_path(&config.model_dir),
        )?),
    };

    info!(
        backend = config.classifier_backend.as_str(),
        diseases = decoder.class_count(),
        features = vectorizer.dimension(),
        "Engine ready"
    );

    Ok(Engine::new(Box::new(vectorizer), classifier, decoder))
}
