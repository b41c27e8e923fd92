// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plumbing shared by the command-line recognition backends

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{GrayImage, ImageFormat};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Failures raised inside a recognition backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to write temporary image: {0}")]
    TempImage(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed: {stderr}")]
    Failed { program: String, stderr: String },

    #[error("malformed backend output: {0}")]
    MalformedOutput(String),
}

/// Write a grayscale image to a temporary PNG the backend can read
pub fn write_temp_png(image: &GrayImage) -> Result<NamedTempFile, BackendError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("philologica-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| BackendError::TempImage(e.to_string()))?;
    image
        .write_to(&mut tmp, ImageFormat::Png)
        .map_err(|e| BackendError::TempImage(e.to_string()))?;
    tmp.flush()
        .map_err(|e| BackendError::TempImage(e.to_string()))?;
    Ok(tmp)
}

/// Run a backend command to completion and return its stdout
pub fn run_command(command: &mut Command) -> Result<String, BackendError> {
    let program = command.get_program().to_string_lossy().to_string();
    debug!("Running backend command: {:?}", command);

    let output = command.output().map_err(|source| BackendError::Spawn {
        program: program.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BackendError::Failed {
            program,
            stderr: stderr.trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Resolve a program name against `PATH` (absolute or relative paths are checked directly)
pub fn find_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
