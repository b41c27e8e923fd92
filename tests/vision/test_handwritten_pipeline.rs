// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Binarization, line segmentation and the handwritten adapter on synthetic manuscripts

use image::{GrayImage, Luma};
use philologica_ocr::vision::{
    ocr::{
        binarization::{binarize, SauvolaParams, INK, PAPER},
        handwritten::aggregate,
        segmentation::{segment_lines, SegmentationParams},
        BackendError, HandwrittenAdapter, LinePrediction, LineRecognizer,
    },
    ModelRegistry, PreprocessedImage, RecognitionModel,
};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Aged page: uneven background with `lines` dark text stripes and a blank bottom margin
fn manuscript(lines: u32) -> GrayImage {
    GrayImage::from_fn(400, 40 * lines + 20, |x, y| {
        let band = y % 40;
        let inked = y < 40 * lines && (14..26).contains(&band) && x % 7 != 0 && x > 20 && x < 380;
        // Background darkens from left to right, as on a stained sheet
        let paper = 230 - (x / 8) as u8;
        Luma([if inked { 35 } else { paper }])
    })
}

/// Counts backend calls and numbers its predictions
#[derive(Default)]
struct CountingRecognizer {
    calls: AtomicUsize,
}

impl LineRecognizer for CountingRecognizer {
    fn recognize_lines(
        &self,
        model: &RecognitionModel,
        lines: &[GrayImage],
    ) -> Result<Vec<LinePrediction>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                assert!(line.pixels().all(|p| p.0[0] == INK || p.0[0] == PAPER));
                LinePrediction::with_confidences(format!("{} linea {}", model.name, i + 1), vec![0.9, 0.8])
            })
            .collect())
    }
}

#[test]
fn test_binarization_is_pure_black_and_white() {
    let bw = binarize(&manuscript(3), SauvolaParams::default());
    assert!(bw.pixels().all(|p| p.0[0] == INK || p.0[0] == PAPER));
}

#[test]
fn test_segmentation_finds_one_region_per_stripe() {
    for lines in 1..=4 {
        let bw = binarize(&manuscript(lines), SauvolaParams::default());
        let regions = segment_lines(&bw, SegmentationParams::default());
        assert_eq!(regions.len() as u32, lines, "{} stripes", lines);
        assert!(regions.windows(2).all(|w| w[0].y < w[1].y));
    }
}

#[test]
fn test_adapter_recognizes_lines_in_reading_order() {
    let registry = Arc::new(ModelRegistry::from_models([RecognitionModel {
        name: "grc_papyri".to_string(),
        path: PathBuf::from("/models/grc_papyri.mlmodel"),
    }]));
    let recognizer = Arc::new(CountingRecognizer::default());
    let adapter = HandwrittenAdapter::new(registry, Some(recognizer.clone()));

    let page = PreprocessedImage::from(manuscript(3));
    let output = adapter.recognize(&page, "grc");

    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        output.text,
        "grc_papyri linea 1\ngrc_papyri linea 2\ngrc_papyri linea 3"
    );
    assert!((output.confidence - 0.85).abs() < 1e-6);
}

#[test]
fn test_aggregate_defaults_without_scores() {
    let output = aggregate(&[LinePrediction::new("alpha"), LinePrediction::new("beta")]);
    assert_eq!(output.text, "alpha\nbeta");
    assert_eq!(output.confidence, 0.85);
}
