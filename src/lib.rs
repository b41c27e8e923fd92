// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

pub use api::{build_router, AppState};
pub use config::OcrServiceConfig;
pub use vision::ocr::{EngineChoice, EngineKind, OcrPipeline, RecognitionResult};
pub use vision::ModelRegistry;
