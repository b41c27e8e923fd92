// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/analyze

use axum::{body::Body, http::{Request, StatusCode}};
use philologica_ocr::api::build_router;
use tower::ServiceExt;

use super::common::*;

fn analyze_request(json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_analyze_statistics() {
    let app = build_router(state(full_pipeline()));

    let response = app
        .oneshot(analyze_request(r#"{"text": "Gallia est omnis\ndivisa in partes tres"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["analysis_type"], "all");
    assert_eq!(body["statistics"]["words"], 7);
    assert_eq!(body["statistics"]["lines"], 2);
    assert_eq!(body["statistics"]["characters"], 38);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_analyze_empty_text() {
    let app = build_router(state(full_pipeline()));

    let response = app
        .oneshot(analyze_request(r#"{"text": "", "analysis_type": "stats"}"#))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["analysis_type"], "stats");
    assert_eq!(body["statistics"]["words"], 0);
    assert_eq!(body["statistics"]["avg_word_length"], 0.0);
}
