// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the OCR service

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for the OCR service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OcrServiceConfig {
    /// Address the HTTP server binds to
    pub host: String,
    pub port: u16,
    /// Directory scanned for handwritten recognition models
    pub model_dir: PathBuf,
    /// Kraken executable, looked up on PATH when not a path
    pub kraken_bin: PathBuf,
    /// Tesseract executable, looked up on PATH when not a path
    pub tesseract_bin: PathBuf,
    /// Whether the handwritten engine may be used at all
    pub kraken_enabled: bool,
    /// Whether the printed engine may be used at all
    pub tesseract_enabled: bool,
    /// Upper bound on one recognition request, in seconds
    pub timeout_secs: u64,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl OcrServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("OCR_HOST").unwrap_or(defaults.host),
            port: env::var("OCR_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            model_dir: env::var("KRAKEN_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            kraken_bin: env::var("KRAKEN_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.kraken_bin),
            tesseract_bin: env::var("TESSERACT_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.tesseract_bin),
            // Set KRAKEN_ENABLED=false / TESSERACT_ENABLED=false to disable
            kraken_enabled: env::var("KRAKEN_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            tesseract_enabled: env::var("TESSERACT_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            timeout_secs: env::var("OCR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            max_upload_bytes: env::var("OCR_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Recognition timeout must be greater than 0".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("Maximum upload size must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            kraken_bin: PathBuf::from("kraken"),
            tesseract_bin: PathBuf::from("tesseract"),
            kraken_enabled: true,
            tesseract_enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
