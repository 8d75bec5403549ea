//! Window values returned by window searches.

use serde::{Deserialize, Serialize};

/// Opaque native window handle as reported by a window finder provider.
pub type WindowHandle = u64;

/// A located window.
///
/// Purely a value wrapper around the provider's handle; window
/// manipulation is outside the core's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    handle: WindowHandle,
}

impl Window {
    /// Wrap a provider window handle.
    pub const fn new(handle: WindowHandle) -> Self {
        Self { handle }
    }

    /// The native handle.
    pub const fn handle(&self) -> WindowHandle {
        self.handle
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window#{}", self.handle)
    }
}
