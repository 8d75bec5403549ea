//! Facade configuration.
//!
//! Config values are read fresh on every operation; callers may mutate
//! them between calls and the next operation picks the change up.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the screen facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Default minimum match confidence in (0, 1]
    pub confidence: f64,
    /// Highlight every successful find result automatically
    pub auto_highlight: bool,
    /// How long a highlight overlay stays visible
    pub highlight_duration: Duration,
    /// Highlight overlay opacity in [0, 1]
    pub highlight_opacity: f64,
    /// Directory captures are written to when no directory is given
    pub resource_directory: PathBuf,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            confidence: 0.99,
            auto_highlight: false,
            highlight_duration: Duration::from_millis(500),
            highlight_opacity: 0.25,
            resource_directory: PathBuf::from("."),
        }
    }
}

/// Configuration for the mouse facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouseConfig {
    /// Pause inserted after each injected mouse event
    pub auto_delay: Duration,
    /// Cursor travel speed for animated moves, logical pixels per second
    pub speed: f64,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            auto_delay: Duration::from_millis(100),
            speed: 1000.0,
        }
    }
}

/// Configuration for the keyboard facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Pause inserted after each injected keyboard event
    pub auto_delay: Duration,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            auto_delay: Duration::from_millis(300),
        }
    }
}
