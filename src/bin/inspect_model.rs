//! Offline model inspection.
//!
//! Loads a model artifact (and optionally its metadata), prints a summary and,
//! given a request file, scores it exactly as `POST /predict` would.
//!
//! ```sh
//! cargo run --bin inspect_model -- --model models/best_model.json --input request.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rating_classifier::application::PredictionService;
use rating_classifier::application::ml::Classifier;
use rating_classifier::config::{DEFAULT_METADATA_PATH, DEFAULT_MODEL_PATH, ModelEnvConfig};
use rating_classifier::domain::movie::PredictRequest;
use rating_classifier::infrastructure::model::{load_metadata, load_model};
use rating_classifier::infrastructure::{Metrics, ModelState};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the model artifact
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Path to the metadata document
    #[arg(long, default_value = DEFAULT_METADATA_PATH)]
    metadata: PathBuf,

    /// Prediction request to score (same body as POST /predict)
    #[arg(long)]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let model = load_model(&args.model)
        .with_context(|| format!("Failed to load model from {:?}", args.model))?;

    println!("Model:    {} ({} trees)", model.name(), model.n_trees());
    println!("Columns:  {}", model.feature_columns().join(", "));
    let classes: Vec<_> = model.classes().iter().map(|c| c.as_str()).collect();
    println!("Classes:  {}", classes.join(", "));

    let metadata = match load_metadata(&args.metadata) {
        Ok(metadata) => {
            println!("Metadata: {}", metadata.model_name());
            for (name, value) in metadata.metrics() {
                println!("  {}: {}", name, value);
            }
            for (name, value) in metadata.parameters() {
                println!("  param {}: {}", name, value);
            }
            Some(metadata)
        }
        Err(e) => {
            println!("Metadata: unavailable ({})", e);
            None
        }
    };

    let Some(input) = args.input else {
        return Ok(());
    };

    let file = File::open(&input).with_context(|| format!("Failed to open {:?}", input))?;
    let request: PredictRequest = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {:?}", input))?;

    let config = ModelEnvConfig {
        model_path: args.model,
        metadata_path: args.metadata,
    };
    let state = ModelState::from_parts(Some(Arc::new(model)), metadata, &config);
    let service = PredictionService::new(Arc::new(state), Metrics::new()?);
    let response = service.respond(&request)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
