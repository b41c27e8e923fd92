// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use crate::config::OcrServiceConfig;

/// Philologica OCR service
#[derive(Parser, Debug, Default)]
#[command(name = "philologica-ocr")]
#[command(version)]
#[command(about = "OCR service for historical documents", long_about = None)]
pub struct Cli {
    /// TOML configuration file; environment variables are used when absent
    #[arg(long, env = "OCR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory with handwritten recognition models
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Recognition timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Disable the handwritten engine
    #[arg(long)]
    pub no_kraken: bool,

    /// Disable the printed engine
    #[arg(long)]
    pub no_tesseract: bool,
}

impl Cli {
    /// Resolve the effective configuration: file or environment, then flags
    pub fn load_config(&self) -> Result<OcrServiceConfig> {
        let mut config = match &self.config {
            Some(path) => OcrServiceConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => OcrServiceConfig::from_env(),
        };
        self.apply(&mut config);
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply(&self, config: &mut OcrServiceConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.model_dir {
            config.model_dir = dir.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if self.no_kraken {
            config.kraken_enabled = false;
        }
        if self.no_tesseract {
            config.tesseract_enabled = false;
        }
    }
}
