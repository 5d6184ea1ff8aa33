//! Reliability engine entrypoint. `train` produces the artifact bundle;
//! `predict` and `recommend` load the bundle once and score a metric record
//! read from a JSON file (or stdin when the path is `-`).

use reliability_engine::{
    config::EngineConfig,
    logging::StructuredLogger,
    metrics::MetricRecord,
    recommend::recommend,
    service::InferenceService,
    storage::ArtifactStore,
    train::Trainer,
};
use std::io::Read;
use tracing::info;

fn read_record(path: &str) -> Result<MetricRecord, Box<dyn std::error::Error + Send + Sync>> {
    let data = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&data)?)
}

fn usage() -> ! {
    eprintln!("usage: reliability-engine <train | predict <metrics.json> | recommend <metrics.json>>");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("RELIABILITY_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or_else(|| usage());

    match command {
        "train" => {
            let store = ArtifactStore::new(&config.models_dir)?;
            let trainer = Trainer::new(config.clone(), store);
            let summary = trainer.run()?;
            info!(
                samples = summary.samples,
                accuracy = summary.test_accuracy,
                "training complete"
            );
        }
        "predict" => {
            let input = args.get(2).map(String::as_str).unwrap_or_else(|| usage());
            let record = read_record(input)?;
            let store = ArtifactStore::new(&config.models_dir)?;
            let service = InferenceService::load(&store)?;
            let result = service.predict(&record);
            StructuredLogger::emit_json(&result, &mut std::io::stdout());
        }
        "recommend" => {
            let input = args.get(2).map(String::as_str).unwrap_or_else(|| usage());
            let record = read_record(input)?;
            let store = ArtifactStore::new(&config.models_dir)?;
            let service = InferenceService::load(&store)?;
            let result = service.predict(&record);
            let guidance = recommend(result.risk_level, &record);
            StructuredLogger::emit_json(&guidance, &mut std::io::stdout());
        }
        _ => usage(),
    }

    Ok(())
}
