// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{analyze_handler, engines_handler, health_handler, languages_handler, ocr_handler, root_handler};
use crate::config::OcrServiceConfig;
use crate::vision::ocr::OcrPipeline;

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<OcrPipeline>,
    pub config: Arc<OcrServiceConfig>,
}

impl AppState {
    pub fn new(pipeline: OcrPipeline, config: OcrServiceConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        // Service info and health
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Recognition
        .route("/api/ocr", post(ocr_handler))
        // Introspection
        .route("/api/engines", get(engines_handler))
        .route("/api/languages", get(languages_handler))
        // Text statistics
        .route("/api/analyze", post(analyze_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_address();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Log method, path, status and latency of every request
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} - {} - {:.3}s",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64()
    );
    response
}
