//! Per-call search parameter overrides and their resolution.

use tokio_util::sync::CancellationToken;

use crate::config::ScreenConfig;
use crate::geometry::Region;

/// Optional per-call overrides for find operations.
///
/// Unset fields fall back to the facade's [`ScreenConfig`] (or the full
/// screen for the search region) at resolution time.
#[derive(Debug, Clone, Default)]
pub struct FindParams {
    /// Minimum match confidence override
    pub confidence: Option<f64>,
    /// Restrict the search to this region instead of the whole screen
    pub search_region: Option<Region>,
    /// Multi-scale search override
    pub search_multiple_scales: Option<bool>,
    /// Cancellation signal observed by `wait_for`
    pub abort: Option<CancellationToken>,
}

impl FindParams {
    /// Empty parameter set: everything falls back to the config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the minimum match confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Restrict the search to `region`.
    pub fn with_search_region(mut self, region: Region) -> Self {
        self.search_region = Some(region);
        self
    }

    /// Override the multi-scale search flag.
    pub fn with_search_multiple_scales(mut self, enabled: bool) -> Self {
        self.search_multiple_scales = Some(enabled);
        self
    }

    /// Attach a cancellation signal for `wait_for`.
    pub fn with_abort(mut self, token: CancellationToken) -> Self {
        self.abort = Some(token);
        self
    }

    /// Merge these overrides onto `config`, producing the fully resolved
    /// parameter set one search operation consumes.
    ///
    /// `screen` is the reference screen region used when no search region
    /// was given.
    pub fn resolve(&self, config: &ScreenConfig, screen: Region) -> EffectiveParams {
        EffectiveParams {
            confidence: self.confidence.unwrap_or(config.confidence),
            search_region: self.search_region.unwrap_or(screen),
            search_multiple_scales: self.search_multiple_scales.unwrap_or(false),
        }
    }
}

/// A fully resolved parameter set for one search operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParams {
    pub confidence: f64,
    pub search_region: Region,
    pub search_multiple_scales: bool,
}
