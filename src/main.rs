// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use philologica_ocr::{
    api::{start_server, AppState},
    cli::Cli,
    config::OcrServiceConfig,
    version,
    vision::{
        ocr::{
            EngineSelector, HandwrittenAdapter, KrakenCli, LineRecognizer, OcrPipeline,
            PrintedAdapter, PrintedBackend, TesseractCli,
        },
        ModelRegistry,
    },
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    info!("🚀 Starting {}", version::get_version_string());
    info!("📦 Features: {}", version::FEATURES.join(", "));

    let pipeline = build_pipeline(&config);
    let state = AppState::new(pipeline, config);

    tokio::select! {
        result = start_server(state) => result?,
        _ = signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}

/// Detect the recognition backends and load the model registry once
fn build_pipeline(config: &OcrServiceConfig) -> OcrPipeline {
    let registry = Arc::new(ModelRegistry::load_from_dir(&config.model_dir));

    let recognizer: Option<Arc<dyn LineRecognizer>> = if config.kraken_enabled {
        KrakenCli::detect(&config.kraken_bin).map(|cli| Arc::new(cli) as Arc<dyn LineRecognizer>)
    } else {
        warn!("Kraken disabled by configuration");
        None
    };

    let backend: Option<Arc<dyn PrintedBackend>> = if config.tesseract_enabled {
        TesseractCli::detect(&config.tesseract_bin).map(|cli| Arc::new(cli) as Arc<dyn PrintedBackend>)
    } else {
        warn!("Tesseract disabled by configuration");
        None
    };

    OcrPipeline::new(
        EngineSelector::default(),
        HandwrittenAdapter::new(registry, recognizer),
        PrintedAdapter::new(backend),
    )
}
