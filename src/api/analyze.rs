// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Basic statistics over extracted text

use axum::Json;
use serde::{Deserialize, Serialize};

fn default_analysis_type() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub lines: usize,
    pub avg_word_length: f64,
}

impl TextStatistics {
    /// Character counts are in Unicode scalar values, words are
    /// whitespace-separated
    pub fn compute(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        };

        Self {
            characters: text.chars().count(),
            characters_no_spaces: text.chars().filter(|c| *c != ' ').count(),
            words: words.len(),
            lines: text.lines().count(),
            avg_word_length,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis_type: String,
    pub statistics: TextStatistics,
    pub timestamp: String,
}

/// POST /api/analyze - Statistics of an extracted text
pub async fn analyze_handler(Json(request): Json<AnalyzeRequest>) -> Json<AnalyzeResponse> {
    Json(AnalyzeResponse {
        statistics: TextStatistics::compute(&request.text),
        analysis_type: request.analysis_type,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
