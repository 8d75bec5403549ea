//! Match requests and results exchanged with finder providers.

use serde::{Deserialize, Serialize};

use crate::geometry::Region;
use crate::image::Image;

/// A search request handed to a finder provider.
///
/// Constructed fresh for every search; never persisted. The needle type
/// parameter matches the finder capability the request is dispatched to.
#[derive(Debug, Clone)]
pub struct MatchRequest<N> {
    /// The captured screen region to search within
    pub haystack: Image,
    /// What to look for
    pub needle: N,
    /// Minimum similarity score in (0, 1] a match must reach
    pub confidence: f64,
    /// Whether the finder should also try scaled-down/up variants
    pub search_multiple_scales: bool,
}

impl<N> MatchRequest<N> {
    /// Create a new match request.
    pub fn new(haystack: Image, needle: N, confidence: f64, search_multiple_scales: bool) -> Self {
        Self {
            haystack,
            needle,
            confidence,
            search_multiple_scales,
        }
    }
}

/// A single match reported by a finder provider.
///
/// `location` is relative to the haystack image's own origin; the
/// orchestrator translates it into absolute screen coordinates before
/// returning it to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Similarity score, higher is better
    pub confidence: f64,
    /// Match location relative to the haystack origin
    pub location: Region,
}

impl MatchResult {
    /// Create a new match result.
    pub const fn new(confidence: f64, location: Region) -> Self {
        Self {
            confidence,
            location,
        }
    }
}
