// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
    pub endpoints: BTreeMap<String, String>,
}

/// GET / - Service name, version and endpoint map
pub async fn root_handler() -> Json<ServiceInfo> {
    let endpoints = [
        ("ocr", "/api/ocr"),
        ("analyze", "/api/analyze"),
        ("languages", "/api/languages"),
        ("engines", "/api/engines"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Json(ServiceInfo {
        name: version::SERVICE_NAME.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        status: "operational".to_string(),
        endpoints,
    })
}

/// GET /health - Liveness, with unavailable engines reported as issues
///
/// The service stays healthy while either engine can recognize text; with
/// neither it is degraded. The handwritten engine needs its backend and at
/// least one loaded model.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let handwritten = state.pipeline.handwritten();
    let printed = state.pipeline.printed().availability();

    let mut issues = Vec::new();
    if !handwritten.is_installed() {
        issues.push("Kraken not installed".to_string());
    } else if handwritten.registry().is_empty() {
        issues.push("No Kraken models loaded".to_string());
    }
    if let Some(reason) = printed.reason() {
        issues.push(reason.to_string());
    }

    let handwritten_ready = handwritten.is_installed() && !handwritten.registry().is_empty();
    let status = if handwritten_ready || printed.is_available() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        issues: (!issues.is_empty()).then_some(issues),
    })
}
