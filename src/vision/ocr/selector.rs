// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Engine selection
//!
//! Resolves the caller's `EngineChoice` into the engine that will actually
//! run. `Auto` is delegated to a pluggable `SelectionPolicy`; an explicit
//! choice is honored unless it names the handwritten engine while that engine
//! is unavailable, in which case the printed engine runs instead.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::engine::{EngineChoice, EngineKind};

/// Aspect ratio above which `Auto` picks the handwritten engine
pub const DEFAULT_ASPECT_RATIO_THRESHOLD: f64 = 2.5;

/// Decides an engine for `Auto` requests from page geometry
pub trait SelectionPolicy: Send + Sync {
    fn choose(&self, width: u32, height: u32) -> EngineKind;
}

impl<F> SelectionPolicy for F
where
    F: Fn(u32, u32) -> EngineKind + Send + Sync,
{
    fn choose(&self, width: u32, height: u32) -> EngineKind {
        self(width, height)
    }
}

/// Elongated, scroll-like pages are treated as manuscripts
#[derive(Debug, Clone, Copy)]
pub struct AspectRatioPolicy {
    pub threshold: f64,
}

impl Default for AspectRatioPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ASPECT_RATIO_THRESHOLD,
        }
    }
}

impl SelectionPolicy for AspectRatioPolicy {
    fn choose(&self, width: u32, height: u32) -> EngineKind {
        if height == 0 {
            return EngineKind::Printed;
        }
        let aspect_ratio = width as f64 / height as f64;
        if aspect_ratio > self.threshold {
            EngineKind::Handwritten
        } else {
            EngineKind::Printed
        }
    }
}

/// Resolves requested engines to concrete ones
#[derive(Clone)]
pub struct EngineSelector {
    policy: Arc<dyn SelectionPolicy>,
}

impl fmt::Debug for EngineSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSelector").finish_non_exhaustive()
    }
}

impl Default for EngineSelector {
    fn default() -> Self {
        Self::new(AspectRatioPolicy::default())
    }
}

impl EngineSelector {
    pub fn new<P: SelectionPolicy + 'static>(policy: P) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Resolve a request to the engine that will run
    ///
    /// # Arguments
    /// * `width`, `height` - Dimensions of the preprocessed page
    /// * `requested` - The caller's choice
    /// * `handwritten_available` - Whether the handwritten adapter can run
    pub fn resolve(
        &self,
        width: u32,
        height: u32,
        requested: EngineChoice,
        handwritten_available: bool,
    ) -> EngineKind {
        let chosen = match requested {
            EngineChoice::Auto => {
                let kind = self.policy.choose(width, height);
                debug!("Auto-selected {} for {}x{} page", kind, width, height);
                kind
            }
            EngineChoice::Handwritten => EngineKind::Handwritten,
            EngineChoice::Printed => EngineKind::Printed,
        };

        if chosen == EngineKind::Handwritten && !handwritten_available {
            warn!("Handwritten engine unavailable, falling back to printed engine");
            return EngineKind::Printed;
        }
        chosen
    }
}
