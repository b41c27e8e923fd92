// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for router tests: fake backends, images, multipart bodies

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use philologica_ocr::{
    api::AppState,
    config::OcrServiceConfig,
    vision::{
        ocr::{
            BackendError, EngineSelector, HandwrittenAdapter, LinePrediction, LineRecognizer,
            OcrPipeline, PrintedAdapter, PrintedBackend, WordBox,
        },
        ModelRegistry, RecognitionModel,
    },
};
use std::{io::Cursor, path::PathBuf, sync::Arc, time::Duration};

pub const BOUNDARY: &str = "philologica-test-boundary";

/// Printed backend returning fixed words, optionally after a delay
pub struct FakePrinted {
    pub words: Vec<WordBox>,
    pub delay: Option<Duration>,
}

impl FakePrinted {
    pub fn new(words: Vec<WordBox>) -> Self {
        Self { words, delay: None }
    }
}

impl PrintedBackend for FakePrinted {
    fn image_to_data(&self, _image: &GrayImage, _language: &str) -> Result<Vec<WordBox>, BackendError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(self.words.clone())
    }
}

/// Line recognizer answering every line with the same text
pub struct FakeLines(pub &'static str);

impl LineRecognizer for FakeLines {
    fn recognize_lines(
        &self,
        _model: &RecognitionModel,
        lines: &[GrayImage],
    ) -> Result<Vec<LinePrediction>, BackendError> {
        Ok(lines.iter().map(|_| LinePrediction::new(self.0)).collect())
    }
}

pub fn registry(names: &[&str]) -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::from_models(names.iter().map(|name| RecognitionModel {
        name: name.to_string(),
        path: PathBuf::from(format!("/models/{}.mlmodel", name)),
    })))
}

pub fn pipeline(
    registry: Arc<ModelRegistry>,
    recognizer: Option<Arc<dyn LineRecognizer>>,
    printed: Option<Arc<dyn PrintedBackend>>,
) -> OcrPipeline {
    OcrPipeline::new(
        EngineSelector::default(),
        HandwrittenAdapter::new(registry, recognizer),
        PrintedAdapter::new(printed),
    )
}

/// Pipeline with both engines installed and a default handwritten model
pub fn full_pipeline() -> OcrPipeline {
    pipeline(
        registry(&["default", "lat_antiqua"]),
        Some(Arc::new(FakeLines("In principio erat verbum"))),
        Some(Arc::new(FakePrinted::new(vec![
            WordBox::new("Gallia", 1, 96.0),
            WordBox::new("est", 1, 94.0),
            WordBox::new("omnis", 2, 90.0),
        ]))),
    )
}

pub fn state(pipeline: OcrPipeline) -> AppState {
    AppState::new(pipeline, OcrServiceConfig::default())
}

/// White page with one dark horizontal stripe, encoded as PNG
pub fn page_png(width: u32, height: u32) -> Vec<u8> {
    let stripe = (height / 3)..(height / 3 + height / 5).max(height / 3 + 4);
    let page = GrayImage::from_fn(width, height, |x, y| {
        let inked = stripe.contains(&y) && x > width / 10 && x < width - width / 10;
        Luma([if inked { 20 } else { 235 }])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(page)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Multipart body with a single field
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(uri: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body("file", filename, bytes)))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
