// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registry of handwritten-text recognition models
//!
//! The registry is populated once, before the first request, and is read-only
//! afterwards. It is shared as `Arc<ModelRegistry>` and handed to the engine
//! adapters explicitly; there is no process-wide model state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

/// File extension of recognition model files
pub const MODEL_EXTENSION: &str = "mlmodel";

/// Key of the model used when nothing matches the requested language
pub const DEFAULT_MODEL_KEY: &str = "default";

/// A loaded line-recognition model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionModel {
    /// Registry key, e.g. `lat_antiqua`
    pub name: String,
    /// Location of the model file
    pub path: PathBuf,
}

/// Immutable set of recognition models keyed by name
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<RecognitionModel>>,
}

impl ModelRegistry {
    /// Registry with no models; the handwritten engine reports unavailable
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from explicit models
    pub fn from_models<I>(models: I) -> Self
    where
        I: IntoIterator<Item = RecognitionModel>,
    {
        let models = models
            .into_iter()
            .map(|model| (model.name.clone(), Arc::new(model)))
            .collect();
        Self { models }
    }

    /// Load every `*.mlmodel` file found in `dir`
    ///
    /// A missing or unreadable directory is not fatal: the registry is
    /// returned empty and the handwritten engine reports itself unavailable.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "⚠️ Recognition models not found in {}: {}. Download them with 'kraken get'.",
                    dir.display(),
                    e
                );
                return Self::empty();
            }
        };

        let mut models = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_model = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(MODEL_EXTENSION))
                .unwrap_or(false);
            if !is_model || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            debug!("Found recognition model {} at {}", name, path.display());
            models.push(RecognitionModel {
                name: name.to_string(),
                path,
            });
        }

        let registry = Self::from_models(models);
        if registry.is_empty() {
            warn!("⚠️ No recognition models in {}", dir.display());
        } else {
            info!(
                "✅ Loaded {} recognition model(s) from {}: {:?}",
                registry.len(),
                dir.display(),
                registry.model_names()
            );
        }
        registry
    }

    /// Find the model serving a language or script code
    ///
    /// Lookup order: exact key, first key (in sorted order) prefixed by
    /// `"{language}_"`, then the `default` model.
    pub fn model_for_language(&self, language: &str) -> Option<Arc<RecognitionModel>> {
        let language = language.trim().to_lowercase();
        if let Some(model) = self.models.get(&language) {
            return Some(model.clone());
        }

        let prefix = format!("{}_", language);
        self.models
            .iter()
            .find(|(name, _)| name.starts_with(&prefix))
            .or_else(|| self.models.get_key_value(DEFAULT_MODEL_KEY))
            .map(|(_, model)| model.clone())
    }

    /// Names of all registered models, sorted
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
