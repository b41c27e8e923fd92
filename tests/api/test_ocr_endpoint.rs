// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/ocr: upload validation, engine selection, error mapping

use axum::http::StatusCode;
use philologica_ocr::{
    api::{build_router, AppState},
    config::OcrServiceConfig,
    vision::ocr::WordBox,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

use super::common::*;

#[tokio::test]
async fn test_unsupported_extension_is_rejected_before_decoding() {
    let app = build_router(state(full_pipeline()));

    let response = app
        .oneshot(upload_request("/api/ocr", "edition.pdf", b"not even an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains(".png"), "detail should list accepted extensions: {}", detail);
}

#[tokio::test]
async fn test_printed_page_round_trip() {
    let app = build_router(state(full_pipeline()));
    let bytes = page_png(400, 500);

    let response = app
        .oneshot(upload_request("/api/ocr?language=lat&engine=tesseract", "page_1.PNG", &bytes))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["text"], "Gallia est\nomnis");
    assert_eq!(body["engine_used"], "tesseract");
    assert_eq!(body["success"], true);
    assert!((body["confidence"].as_f64().unwrap() - 0.9333).abs() < 1e-3);
    assert_eq!(body["metadata"]["dimensions"], "400x500");
    assert_eq!(body["metadata"]["mode"], "L");
    assert_eq!(body["metadata"]["language_requested"], "lat");
    assert_eq!(body["filename"], "page_1.PNG");
    assert_eq!(body["file_size"], bytes.len());
}

#[tokio::test]
async fn test_auto_selects_handwritten_for_wide_scroll() {
    let app = build_router(state(full_pipeline()));

    let response = app
        .oneshot(upload_request("/api/ocr", "scroll.png", &page_png(900, 300)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["engine_used"], "kraken");
    assert_eq!(body["metadata"]["engine_used"], "kraken");
    assert_eq!(body["text"], "In principio erat verbum");
    assert!((body["confidence"].as_f64().unwrap() - 0.85).abs() < 1e-6);
}

#[tokio::test]
async fn test_handwritten_without_model_falls_back_to_printed() {
    let pipeline = pipeline(
        registry(&[]),
        Some(Arc::new(FakeLines("unused"))),
        Some(Arc::new(FakePrinted::new(vec![WordBox::new("Roma", 1, 80.0)]))),
    );
    let app = build_router(state(pipeline));

    let response = app
        .oneshot(upload_request("/api/ocr?engine=kraken&language=heb", "scroll.png", &page_png(900, 300)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["engine_used"], "tesseract");
    assert_eq!(body["text"], "Roma");
}

#[tokio::test]
async fn test_unknown_engine_is_bad_request() {
    let app = build_router(state(full_pipeline()));

    let response = app
        .oneshot(upload_request("/api/ocr?engine=ocropus", "page.png", &page_png(40, 40)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("ocropus"));
}

#[tokio::test]
async fn test_corrupt_image_is_server_error() {
    let app = build_router(state(full_pipeline()));

    let response = app
        .oneshot(upload_request("/api/ocr", "broken.jpg", b"\xFF\xD8\xFFtruncated"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(!body["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_file_field_is_bad_request() {
    let app = build_router(state(full_pipeline()));
    let body = multipart_body("attachment", "page.png", &page_png(20, 20));
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/ocr")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recognition_timeout_is_server_error() {
    let slow = FakePrinted {
        words: vec![WordBox::new("tarde", 1, 90.0)],
        delay: Some(Duration::from_millis(1500)),
    };
    let pipeline = pipeline(registry(&[]), None, Some(Arc::new(slow)));
    let config = OcrServiceConfig {
        timeout_secs: 1,
        ..OcrServiceConfig::default()
    };
    let app = build_router(AppState::new(pipeline, config));

    let response = app
        .oneshot(upload_request("/api/ocr", "page.png", &page_png(40, 60)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_nothing_installed_still_answers() {
    let app = build_router(state(pipeline(registry(&[]), None, None)));

    let response = app
        .oneshot(upload_request("/api/ocr", "page.tif", &tiff_page()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["text"], "Tesseract not installed");
    assert_eq!(body["confidence"], 0.0);
}

fn tiff_page() -> Vec<u8> {
    let page = image::RgbImage::from_pixel(30, 40, image::Rgb([180, 170, 150]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(page)
        .write_to(&mut buf, image::ImageFormat::Tiff)
        .unwrap();
    buf.into_inner()
}

#[tokio::test]
async fn test_truncated_multipart_is_bad_request() {
    let app = build_router(state(full_pipeline()));
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"page.png\"\r\n\r\n",
        BOUNDARY
    )
    .into_bytes();
    body.extend_from_slice(&page_png(40, 40)[..20]);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/ocr")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().starts_with("Failed to read upload"));
}

#[tokio::test]
async fn test_oversized_upload_is_bad_request() {
    let config = OcrServiceConfig {
        max_upload_bytes: 512,
        ..OcrServiceConfig::default()
    };
    let app = build_router(AppState::new(full_pipeline(), config));

    let response = app
        .oneshot(upload_request("/api/ocr", "folio.png", &[0x5a; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().starts_with("Failed to read upload"));
}
