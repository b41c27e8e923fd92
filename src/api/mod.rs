// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod engines;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod ocr;

pub use analyze::{analyze_handler, AnalyzeRequest, AnalyzeResponse, TextStatistics};
pub use engines::{engines_handler, languages_handler, EnginesResponse, LanguagesResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, root_handler, HealthResponse, ServiceInfo};
pub use http_server::{build_router, start_server, AppState};
pub use ocr::{ocr_handler, OcrQuery, OcrResponse};
