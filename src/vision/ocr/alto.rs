// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ALTO output of the handwritten backend
//!
//! Each recognized line is written as one ALTO document. Words are `String`
//! elements carrying `CONTENT` and a word confidence `WC`; their characters
//! are nested `Glyph` elements with a glyph confidence `GC`, both in `0..=1`.

use regex::Regex;

use super::backend::BackendError;
use super::handwritten::LinePrediction;

const ELEMENT_PATTERN: &str = r"<(String|Glyph)\b([^>]*)>";
const ATTRIBUTE_PATTERN: &str = r#"([A-Za-z_][\w.-]*)\s*=\s*"([^"]*)""#;

/// Parse the ALTO document of a single line
///
/// Text is the words' `CONTENT` joined by spaces. Confidences are the
/// per-glyph `GC` values, or the per-word `WC` values when the document
/// carries no glyphs; `None` when it carries neither.
pub fn parse_line(xml: &str) -> Result<LinePrediction, BackendError> {
    if !xml.contains("<alto") {
        return Err(BackendError::MalformedOutput(
            "expected an ALTO document".to_string(),
        ));
    }

    let element = Regex::new(ELEMENT_PATTERN).map_err(|e| BackendError::MalformedOutput(e.to_string()))?;
    let attribute =
        Regex::new(ATTRIBUTE_PATTERN).map_err(|e| BackendError::MalformedOutput(e.to_string()))?;

    let mut words = Vec::new();
    let mut word_confidences = Vec::new();
    let mut glyph_confidences = Vec::new();

    for captures in element.captures_iter(xml) {
        let attrs = &captures[2];
        match &captures[1] {
            "String" => {
                if let Some(content) = attr(&attribute, attrs, "CONTENT") {
                    words.push(unescape(content));
                }
                if let Some(wc) = attr(&attribute, attrs, "WC") {
                    word_confidences.push(parse_confidence(wc)?);
                }
            }
            _ => {
                if let Some(gc) = attr(&attribute, attrs, "GC") {
                    glyph_confidences.push(parse_confidence(gc)?);
                }
            }
        }
    }

    let text = words
        .iter()
        .filter(|w| !w.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let confidences = if !glyph_confidences.is_empty() {
        glyph_confidences
    } else {
        word_confidences
    };

    Ok(if confidences.is_empty() {
        LinePrediction::new(text)
    } else {
        LinePrediction::with_confidences(text, confidences)
    })
}

fn attr<'a>(pattern: &Regex, attrs: &'a str, name: &str) -> Option<&'a str> {
    pattern
        .captures_iter(attrs)
        .find(|c| &c[1] == name)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
}

fn parse_confidence(value: &str) -> Result<f32, BackendError> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| BackendError::MalformedOutput(format!("invalid confidence '{}'", value)))
}

/// Resolve the predefined XML entities and numeric character references
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..end];
        let resolved = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .map(|hex| u32::from_str_radix(hex, 16).ok())
                .unwrap_or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match resolved {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}
