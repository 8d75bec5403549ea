//! Provider traits and the capability registry.
//!
//! The core never touches pixels or native input itself; everything that
//! crosses into the OS goes through one of these traits. One backend
//! implementation may supply several capabilities.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::geometry::{Point, Region};
use crate::image::Image;
use crate::input::{Button, Key};
use crate::matching::{MatchRequest, MatchResult};
use crate::needle::{ColorQuery, TextQuery, WindowQuery};
use crate::window::WindowHandle;

/// Screen capture and overlay rendering.
#[async_trait]
pub trait ScreenProvider: Send + Sync {
    /// Full screen bounds as a region anchored at the origin.
    fn screen_size(&self) -> Result<Region>;

    /// Screen width in logical pixels.
    fn screen_width(&self) -> Result<f64> {
        Ok(self.screen_size()?.width)
    }

    /// Screen height in logical pixels.
    fn screen_height(&self) -> Result<f64> {
        Ok(self.screen_size()?.height)
    }

    /// Grab the whole screen.
    async fn grab_screen(&self) -> Result<Image>;

    /// Grab a sub-region of the screen.
    async fn grab_screen_region(&self, region: Region) -> Result<Image>;

    /// Render a highlight overlay over `region` for `duration`.
    async fn highlight_screen_region(
        &self,
        region: Region,
        duration: Duration,
        opacity: f64,
    ) -> Result<()>;
}

/// Template image matching.
///
/// A finder that cannot produce a match at the requested confidence is
/// expected to fail with a descriptive reason rather than return a
/// below-threshold result.
#[async_trait]
pub trait ImageFinder: Send + Sync {
    /// Best single match for the template.
    async fn find_match(&self, request: &MatchRequest<Image>) -> Result<MatchResult>;

    /// All matches for the template, in provider order.
    async fn find_matches(&self, request: &MatchRequest<Image>) -> Result<Vec<MatchResult>>;
}

/// Text (line/word) matching, typically OCR-backed.
#[async_trait]
pub trait TextFinder: Send + Sync {
    /// Best single match for the query.
    async fn find_match(&self, request: &MatchRequest<TextQuery>) -> Result<MatchResult>;

    /// All matches for the query, in provider order.
    async fn find_matches(&self, request: &MatchRequest<TextQuery>) -> Result<Vec<MatchResult>>;
}

/// Pixel color matching.
///
/// Reported points are in the haystack's physical pixel space; the
/// orchestrator applies pixel-density scaling and region offsets.
#[async_trait]
pub trait ColorFinder: Send + Sync {
    /// First pixel matching the queried color.
    async fn find_match(&self, request: &MatchRequest<ColorQuery>) -> Result<Point>;

    /// All pixels matching the queried color, in provider order.
    async fn find_matches(&self, request: &MatchRequest<ColorQuery>) -> Result<Vec<Point>>;
}

/// Window lookup by query.
#[async_trait]
pub trait WindowFinder: Send + Sync {
    /// Handle of the first window matching the query.
    async fn find_match(&self, query: &WindowQuery) -> Result<WindowHandle>;

    /// Handles of all windows matching the query, in provider order.
    async fn find_matches(&self, query: &WindowQuery) -> Result<Vec<WindowHandle>>;
}

/// Image persistence (format encoding is the implementation's concern).
#[async_trait]
pub trait ImageWriter: Send + Sync {
    /// Encode and write `image` to `path`.
    async fn store(&self, image: &Image, path: &Path) -> Result<()>;
}

/// Native mouse injection.
#[async_trait]
pub trait MouseProvider: Send + Sync {
    /// Current cursor position.
    async fn position(&self) -> Result<Point>;

    /// Move the cursor to an absolute position.
    async fn set_position(&self, point: Point) -> Result<()>;

    /// Click (press and release) a button.
    async fn click(&self, button: Button) -> Result<()>;

    /// Press and hold a button.
    async fn press(&self, button: Button) -> Result<()>;

    /// Release a held button.
    async fn release(&self, button: Button) -> Result<()>;

    /// Scroll up by `amount` steps.
    async fn scroll_up(&self, amount: i32) -> Result<()>;

    /// Scroll down by `amount` steps.
    async fn scroll_down(&self, amount: i32) -> Result<()>;

    /// Scroll left by `amount` steps.
    async fn scroll_left(&self, amount: i32) -> Result<()>;

    /// Scroll right by `amount` steps.
    async fn scroll_right(&self, amount: i32) -> Result<()>;
}

/// Native keyboard injection.
#[async_trait]
pub trait KeyboardProvider: Send + Sync {
    /// Type a string of text.
    async fn type_text(&self, text: &str) -> Result<()>;

    /// Press and hold the given keys, in order.
    async fn press_keys(&self, keys: &[Key]) -> Result<()>;

    /// Release the given keys, in order.
    async fn release_keys(&self, keys: &[Key]) -> Result<()>;
}

/// Registry of provider implementations, looked up by capability.
///
/// Registration is builder-style; lookups fail with
/// [`Error::ProviderMissing`] when a capability was never supplied.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    screen: Option<Arc<dyn ScreenProvider>>,
    image_finder: Option<Arc<dyn ImageFinder>>,
    text_finder: Option<Arc<dyn TextFinder>>,
    color_finder: Option<Arc<dyn ColorFinder>>,
    window_finder: Option<Arc<dyn WindowFinder>>,
    image_writer: Option<Arc<dyn ImageWriter>>,
    mouse: Option<Arc<dyn MouseProvider>>,
    keyboard: Option<Arc<dyn KeyboardProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the screen provider.
    pub fn with_screen(mut self, provider: Arc<dyn ScreenProvider>) -> Self {
        self.screen = Some(provider);
        self
    }

    /// Register the image finder.
    pub fn with_image_finder(mut self, provider: Arc<dyn ImageFinder>) -> Self {
        self.image_finder = Some(provider);
        self
    }

    /// Register the text finder.
    pub fn with_text_finder(mut self, provider: Arc<dyn TextFinder>) -> Self {
        self.text_finder = Some(provider);
        self
    }

    /// Register the color finder.
    pub fn with_color_finder(mut self, provider: Arc<dyn ColorFinder>) -> Self {
        self.color_finder = Some(provider);
        self
    }

    /// Register the window finder.
    pub fn with_window_finder(mut self, provider: Arc<dyn WindowFinder>) -> Self {
        self.window_finder = Some(provider);
        self
    }

    /// Register the image writer.
    pub fn with_image_writer(mut self, provider: Arc<dyn ImageWriter>) -> Self {
        self.image_writer = Some(provider);
        self
    }

    /// Register the mouse provider.
    pub fn with_mouse(mut self, provider: Arc<dyn MouseProvider>) -> Self {
        self.mouse = Some(provider);
        self
    }

    /// Register the keyboard provider.
    pub fn with_keyboard(mut self, provider: Arc<dyn KeyboardProvider>) -> Self {
        self.keyboard = Some(provider);
        self
    }

    /// The registered screen provider.
    pub fn screen(&self) -> Result<Arc<dyn ScreenProvider>> {
        self.screen.clone().ok_or(Error::ProviderMissing("screen"))
    }

    /// The registered image finder.
    pub fn image_finder(&self) -> Result<Arc<dyn ImageFinder>> {
        self.image_finder
            .clone()
            .ok_or(Error::ProviderMissing("image finder"))
    }

    /// The registered text finder.
    pub fn text_finder(&self) -> Result<Arc<dyn TextFinder>> {
        self.text_finder
            .clone()
            .ok_or(Error::ProviderMissing("text finder"))
    }

    /// The registered color finder.
    pub fn color_finder(&self) -> Result<Arc<dyn ColorFinder>> {
        self.color_finder
            .clone()
            .ok_or(Error::ProviderMissing("color finder"))
    }

    /// The registered window finder.
    pub fn window_finder(&self) -> Result<Arc<dyn WindowFinder>> {
        self.window_finder
            .clone()
            .ok_or(Error::ProviderMissing("window finder"))
    }

    /// The registered image writer.
    pub fn image_writer(&self) -> Result<Arc<dyn ImageWriter>> {
        self.image_writer
            .clone()
            .ok_or(Error::ProviderMissing("image writer"))
    }

    /// The registered mouse provider.
    pub fn mouse(&self) -> Result<Arc<dyn MouseProvider>> {
        self.mouse.clone().ok_or(Error::ProviderMissing("mouse"))
    }

    /// The registered keyboard provider.
    pub fn keyboard(&self) -> Result<Arc<dyn KeyboardProvider>> {
        self.keyboard
            .clone()
            .ok_or(Error::ProviderMissing("keyboard"))
    }
}
