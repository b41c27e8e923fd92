// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Engine identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A concrete recognition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    /// Manuscript-oriented line recognizer (Kraken)
    #[serde(rename = "kraken")]
    Handwritten,
    /// Print-oriented word recognizer (Tesseract)
    #[serde(rename = "tesseract")]
    Printed,
}

impl EngineKind {
    /// Wire name of the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Handwritten => "kraken",
            EngineKind::Printed => "tesseract",
        }
    }

    /// Human-readable specialization, reported by the engines endpoint
    pub fn specialization(&self) -> &'static str {
        match self {
            EngineKind::Handwritten => "Manuscripts, ancient texts, complex layouts",
            EngineKind::Printed => "Printed texts, modern languages",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineChoice {
    #[default]
    Auto,
    Handwritten,
    Printed,
}

impl EngineChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineChoice::Auto => "auto",
            EngineChoice::Handwritten => EngineKind::Handwritten.as_str(),
            EngineChoice::Printed => EngineKind::Printed.as_str(),
        }
    }
}

impl From<EngineKind> for EngineChoice {
    fn from(kind: EngineKind) -> Self {
        match kind {
            EngineKind::Handwritten => EngineChoice::Handwritten,
            EngineKind::Printed => EngineChoice::Printed,
        }
    }
}

/// Whether an engine adapter can run in this process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    /// Reason the engine cannot run, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Availability::Available => None,
            Availability::Unavailable(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown engine '{0}', expected one of: auto, kraken, tesseract")]
pub struct ParseEngineError(pub String);

impl FromStr for EngineChoice {
    type Err = ParseEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(EngineChoice::Auto),
            "kraken" => Ok(EngineChoice::Handwritten),
            "tesseract" => Ok(EngineChoice::Printed),
            other => Err(ParseEngineError(other.to_string())),
        }
    }
}

impl fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
