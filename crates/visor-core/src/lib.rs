//! # visor-core
//!
//! Core library for screen-driven desktop automation: it exposes screen
//! capture, template/text/window/color matching, and mouse/keyboard
//! control as a unified asynchronous API, while delegating pixel
//! grabbing, input injection and the actual matching algorithms to
//! pluggable provider implementations.
//!
//! The heart of the crate is the find orchestration engine in [`screen`]:
//! needle + search region in, located match out, with confidence
//! thresholds, result-offset correction back into absolute screen
//! coordinates, sequential match hooks, polling retries with timeout and
//! cancellation, and highlight-on-match.
//!
//! ## Modules
//!
//! - [`config`] - Facade configuration (confidence, highlighting, pacing)
//! - [`error`] - Error types and Result alias
//! - [`geometry`] - Region, point and size value types
//! - [`hooks`] - Match hook registry
//! - [`image`] - Pixel buffers, pixel density and colors
//! - [`input`] - Key and button value types
//! - [`keyboard`] / [`mouse`] - Input facades
//! - [`matching`] - Match requests and results
//! - [`needle`] - The closed set of searchable needles
//! - [`provider`] - Provider traits and the capability registry
//! - [`screen`] - The screen facade and find orchestrator
//! - [`wait`] - Polling retry driver
//! - [`window`] - Window values
//!
//! ## Example
//!
//! ```no_run
//! use visor_core::{FindParams, Needle, ProviderRegistry, Screen, TextQuery};
//!
//! # async fn run() -> visor_core::Result<()> {
//! // Providers come from a backend crate; the registry wires them up.
//! let providers = ProviderRegistry::new();
//! let screen = Screen::new(providers);
//!
//! let needle: Needle = TextQuery::word("Submit").into();
//! let result = screen.find(needle, FindParams::new()).await?;
//! println!("found at {:?}", result.as_region());
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod geometry;
pub mod hooks;
pub mod image;
pub mod input;
pub mod keyboard;
pub mod matching;
pub mod mouse;
pub mod needle;
pub mod provider;
pub mod screen;
pub mod util;
pub mod wait;
pub mod window;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Geometry and pixel data
pub use geometry::{Point, Region, Size, MIN_SEARCH_REGION_EDGE};
pub use image::{Image, ImageFormat, PixelDensity, RgbaColor};

// Needles and matching
pub use matching::{MatchRequest, MatchResult};
pub use needle::{ColorQuery, Needle, TextQuery, TextQueryKind, WindowQuery};

// Providers
pub use provider::{
    ColorFinder, ImageFinder, ImageWriter, KeyboardProvider, MouseProvider, ProviderRegistry,
    ScreenProvider, TextFinder, WindowFinder,
};

// Configuration
pub use config::{KeyboardConfig, MouseConfig, ScreenConfig};

// Facades
pub use keyboard::Keyboard;
pub use mouse::Mouse;
pub use screen::{FindParams, FindResult, Screen};

// Hooks
pub use hooks::{HookRegistry, MatchCallback};

// Retry driver
pub use wait::{poll_until, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};

// Input and window values
pub use input::{Button, Key};
pub use window::{Window, WindowHandle};
