//! Hook registry: callbacks invoked after successful matches.
//!
//! Hooks are keyed by the needle's stable id. Registration appends to an
//! ordered list and never replaces earlier callbacks; there is no removal
//! operation. Invocation (sequential, in registration order) is the
//! orchestrator's job.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::screen::FindResult;

/// An async callback invoked with a successful find result.
pub type MatchCallback = Arc<dyn Fn(FindResult) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Ordered, append-only hook lists per needle id.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Vec<MatchCallback>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback to the hook list for `needle_id`.
    pub fn register(&mut self, needle_id: impl Into<String>, callback: MatchCallback) {
        self.hooks.entry(needle_id.into()).or_default().push(callback);
    }

    /// All callbacks registered for `needle_id`, in registration order.
    ///
    /// Returns clones of the shared callbacks so the registry lock can be
    /// released before any of them is awaited.
    pub fn hooks_for(&self, needle_id: &str) -> Vec<MatchCallback> {
        self.hooks.get(needle_id).cloned().unwrap_or_default()
    }

    /// Number of callbacks registered for `needle_id`.
    pub fn count_for(&self, needle_id: &str) -> usize {
        self.hooks.get(needle_id).map_or(0, Vec::len)
    }
}
