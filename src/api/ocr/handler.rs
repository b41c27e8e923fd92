// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR endpoint handler

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use tracing::{debug, info, warn};

use super::request::{OcrQuery, FILE_FIELD};
use super::response::OcrResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::check_extension;

/// POST /api/ocr - Extract text from an uploaded page scan
///
/// # Request
/// - multipart field `file`: the image, with a filename
/// - `language` query parameter: language code - defaults to "lat"
/// - `engine` query parameter: auto, kraken or tesseract - defaults to "auto"
///
/// # Response
/// The recognition result (`text`, `confidence`, `engine_used`, `metadata`,
/// `success`) plus `filename` and `file_size`.
///
/// # Errors
/// - 400 Bad Request: unsupported extension, unknown engine, missing file,
///   malformed or oversized upload
/// - 500 Internal Server Error: undecodable image, timeout
pub async fn ocr_handler(
    State(state): State<AppState>,
    Query(query): Query<OcrQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let engine = query.engine_choice()?;
    let language = query.language();
    let mut multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    // 1. Find the file field and validate its extension before reading it
    let (filename, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(upload_error)?
            .ok_or_else(|| ApiError::InvalidRequest("No file uploaded".to_string()))?;

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if let Err(e) = check_extension(&filename) {
            warn!("Rejected upload '{}': {}", filename, e);
            return Err(e.into());
        }

        let bytes = field
            .bytes()
            .await
            .map_err(upload_error)?;
        break (filename, bytes);
    };

    let file_size = bytes.len();
    debug!(
        "OCR request: file={}, size={}, engine={}, language={}",
        filename, file_size, engine, language
    );

    // 2. Run the pipeline off the async workers, bounded by the timeout
    let pipeline = state.pipeline.clone();
    let task_language = language.clone();
    let task = tokio::task::spawn_blocking(move || {
        pipeline.process(bytes.to_vec(), engine, &task_language)
    });

    let timeout = state.config.timeout();
    let result = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result.map_err(|e| {
            warn!("OCR failed for '{}': {}", filename, e);
            ApiError::from(e)
        })?,
        Ok(Err(e)) => {
            warn!("OCR task for '{}' failed: {}", filename, e);
            return Err(ApiError::InternalError(format!("Recognition task failed: {}", e)));
        }
        Err(_) => {
            warn!("OCR for '{}' timed out after {:?}", filename, timeout);
            return Err(ApiError::Timeout(timeout.as_secs()));
        }
    };

    info!(
        "OCR complete: {} ({} bytes) via {}, confidence {:.2}, success {}",
        filename,
        file_size,
        result.engine_used(),
        result.confidence(),
        result.success()
    );

    Ok(Json(OcrResponse::new(result, filename, file_size)))
}

/// A multipart stream that cannot be read is the client's fault: malformed
/// framing or a body over the upload limit.
fn upload_error(err: MultipartError) -> ApiError {
    warn!("Unreadable upload: {}", err);
    ApiError::InvalidRequest(format!("Failed to read upload: {}", err))
}
