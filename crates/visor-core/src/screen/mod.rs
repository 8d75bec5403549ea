//! Screen facade and find orchestration.
//!
//! [`Screen`] is the central engine of the crate: it validates search
//! regions, captures the haystack through the screen provider, dispatches
//! match requests to the finder matching the needle kind, translates
//! finder-local results back into absolute screen coordinates, runs
//! registered hooks, and optionally highlights results.
//!
//! Every failure between parameter resolution and result translation is
//! folded into the uniform [`Error::SearchFailed`] shape carrying the
//! needle id; hook errors propagate unwrapped.

mod params;

pub use params::{EffectiveParams, FindParams};

use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ScreenConfig;
use crate::error::{Error, Result};
use crate::geometry::{Point, Region};
use crate::hooks::{HookRegistry, MatchCallback};
use crate::image::{Image, ImageFormat, PixelDensity, RgbaColor};
use crate::matching::{MatchRequest, MatchResult};
use crate::needle::Needle;
use crate::provider::ProviderRegistry;
use crate::util::generate_output_path;
use crate::wait::{poll_until, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
use crate::window::Window;

/// The outcome of a find operation, shaped by the needle kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FindResult {
    /// Image and text needles locate a region
    Region(Region),
    /// Color needles locate a point (pixel-density corrected)
    Point(Point),
    /// Window needles locate a window
    Window(Window),
}

impl FindResult {
    /// The located region, if this result is one.
    pub fn as_region(&self) -> Option<Region> {
        match self {
            FindResult::Region(region) => Some(*region),
            _ => None,
        }
    }

    /// The located point, if this result is one.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            FindResult::Point(point) => Some(*point),
            _ => None,
        }
    }

    /// The located window, if this result is one.
    pub fn as_window(&self) -> Option<Window> {
        match self {
            FindResult::Window(window) => Some(*window),
            _ => None,
        }
    }
}

/// Screen capture, matching and find orchestration facade.
///
/// All heavy lifting is delegated to the providers in the registry; the
/// facade owns only its configuration and hook registry. Both are read
/// fresh on every operation, so callers may reconfigure between calls.
pub struct Screen {
    providers: ProviderRegistry,
    config: RwLock<ScreenConfig>,
    hooks: RwLock<HookRegistry>,
}

impl Screen {
    /// Create a screen facade with default configuration.
    pub fn new(providers: ProviderRegistry) -> Self {
        Self::with_config(providers, ScreenConfig::default())
    }

    /// Create a screen facade with an explicit configuration.
    pub fn with_config(providers: ProviderRegistry, config: ScreenConfig) -> Self {
        Self {
            providers,
            config: RwLock::new(config),
            hooks: RwLock::new(HookRegistry::new()),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ScreenConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Mutate the configuration; the next operation picks the change up.
    pub fn update_config(&self, update: impl FnOnce(&mut ScreenConfig)) {
        match self.config.write() {
            Ok(mut guard) => update(&mut guard),
            Err(poisoned) => update(&mut poisoned.into_inner()),
        }
    }

    /// Screen width in logical pixels.
    pub fn width(&self) -> Result<f64> {
        self.providers.screen()?.screen_width()
    }

    /// Screen height in logical pixels.
    pub fn height(&self) -> Result<f64> {
        self.providers.screen()?.screen_height()
    }

    /// Register a hook invoked after every successful match of `needle`.
    ///
    /// Repeated registration appends; earlier hooks are never replaced.
    pub fn on(&self, needle: &Needle, callback: MatchCallback) {
        match self.hooks.write() {
            Ok(mut guard) => guard.register(needle.id(), callback),
            Err(poisoned) => poisoned.into_inner().register(needle.id(), callback),
        }
    }

    /// Grab the whole screen.
    pub async fn grab(&self) -> Result<Image> {
        self.providers.screen()?.grab_screen().await
    }

    /// Grab a sub-region of the screen.
    pub async fn grab_region(&self, region: Region) -> Result<Image> {
        self.providers.screen()?.grab_screen_region(region).await
    }

    /// Color of the screen pixel at a logical coordinate.
    pub async fn color_at(&self, point: Point) -> Result<RgbaColor> {
        let image = self.grab().await?;
        image.color_at(point)
    }

    /// Capture the whole screen as PNG into the resource directory.
    pub async fn capture(&self, name: &str) -> Result<PathBuf> {
        self.capture_with(name, ImageFormat::Png, None, "", "").await
    }

    /// Capture the whole screen with explicit format, directory, prefix
    /// and postfix. Returns the generated file path
    /// (`{directory}/{prefix}{name}{postfix}.{format}`).
    pub async fn capture_with(
        &self,
        name: &str,
        format: ImageFormat,
        directory: Option<&Path>,
        prefix: &str,
        postfix: &str,
    ) -> Result<PathBuf> {
        let image = self.grab().await?;
        self.store_capture(&image, name, format, directory, prefix, postfix)
            .await
    }

    /// Capture a screen region as PNG into the resource directory.
    pub async fn capture_region(&self, name: &str, region: Region) -> Result<PathBuf> {
        self.capture_region_with(name, region, ImageFormat::Png, None, "", "")
            .await
    }

    /// Capture a screen region with explicit format, directory, prefix
    /// and postfix. Fails if `region` is malformed.
    pub async fn capture_region_with(
        &self,
        name: &str,
        region: Region,
        format: ImageFormat,
        directory: Option<&Path>,
        prefix: &str,
        postfix: &str,
    ) -> Result<PathBuf> {
        if !region.is_finite() || region.has_negative_component() {
            return Err(Error::InvalidArgument(format!(
                "Invalid capture region {}",
                region
            )));
        }
        let image = self.grab_region(region).await?;
        self.store_capture(&image, name, format, directory, prefix, postfix)
            .await
    }

    async fn store_capture(
        &self,
        image: &Image,
        name: &str,
        format: ImageFormat,
        directory: Option<&Path>,
        prefix: &str,
        postfix: &str,
    ) -> Result<PathBuf> {
        let config = self.config();
        let directory = directory.unwrap_or_else(|| config.resource_directory.as_path());
        let path = generate_output_path(directory, name, format, prefix, postfix);
        self.providers.image_writer()?.store(image, &path).await?;
        info!(path = %path.display(), "stored capture");
        Ok(path)
    }

    /// Render a highlight overlay over `region`, then return the same
    /// region unchanged (supports chaining after `find`).
    pub async fn highlight(&self, region: Region) -> Result<Region> {
        if !region.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "Invalid highlight region {}",
                region
            )));
        }
        let config = self.config();
        self.providers
            .screen()?
            .highlight_screen_region(region, config.highlight_duration, config.highlight_opacity)
            .await?;
        Ok(region)
    }

    /// Locate a needle on the screen.
    ///
    /// Returns a [`FindResult::Region`] for image and text needles, a
    /// [`FindResult::Point`] for color needles and a
    /// [`FindResult::Window`] for window needles. Any failure up to and
    /// including the finder call surfaces as [`Error::SearchFailed`] with
    /// the needle id; hook errors propagate as-is.
    pub async fn find(&self, needle: impl Into<Needle>, params: FindParams) -> Result<FindResult> {
        let needle = needle.into();
        let config = self.config();
        debug!(needle = needle.id(), kind = needle.kind(), "find");

        let result = self
            .search_one(&needle, &params, &config)
            .await
            .map_err(|cause| Error::search_failed(needle.id(), cause))?;

        self.invoke_hooks(&needle, &result).await?;

        if config.auto_highlight {
            if let FindResult::Region(region) = result {
                return Ok(FindResult::Region(self.highlight(region).await?));
            }
        }
        Ok(result)
    }

    /// Locate every match of a needle on the screen.
    ///
    /// Results keep the finder provider's order; no deduplication or
    /// sorting is applied. Hooks run once per result, sequentially. With
    /// auto-highlight enabled, highlights are fired without being awaited.
    pub async fn find_all(
        &self,
        needle: impl Into<Needle>,
        params: FindParams,
    ) -> Result<Vec<FindResult>> {
        let needle = needle.into();
        let config = self.config();
        debug!(needle = needle.id(), kind = needle.kind(), "find_all");

        let results = self
            .search_many(&needle, &params, &config)
            .await
            .map_err(|cause| Error::search_failed(needle.id(), cause))?;

        for result in &results {
            self.invoke_hooks(&needle, result).await?;
        }

        if config.auto_highlight {
            for result in &results {
                if let FindResult::Region(region) = *result {
                    let screen = self.providers.screen()?;
                    let duration = config.highlight_duration;
                    let opacity = config.highlight_opacity;
                    tokio::spawn(async move {
                        if let Err(cause) =
                            screen.highlight_screen_region(region, duration, opacity).await
                        {
                            debug!(%cause, "highlight failed");
                        }
                    });
                }
            }
        }
        Ok(results)
    }

    /// Poll [`Screen::find`] until it succeeds, the timeout passes, or
    /// the abort signal in `params` fires.
    ///
    /// `timeout` defaults to 5000 ms and `interval` to 500 ms. Attempts
    /// never overlap; an abort rejects immediately with a fixed message.
    pub async fn wait_for(
        &self,
        needle: impl Into<Needle>,
        timeout: Option<Duration>,
        interval: Option<Duration>,
        params: FindParams,
    ) -> Result<FindResult> {
        let needle = needle.into();
        let timeout = timeout.unwrap_or(DEFAULT_POLL_TIMEOUT);
        let interval = interval.unwrap_or(DEFAULT_POLL_INTERVAL);
        let abort = params.abort.clone();
        debug!(
            needle = needle.id(),
            timeout_ms = timeout.as_millis() as u64,
            interval_ms = interval.as_millis() as u64,
            "wait_for"
        );
        poll_until(interval, timeout, abort, || {
            self.find(needle.clone(), params.clone())
        })
        .await
    }

    async fn invoke_hooks(&self, needle: &Needle, result: &FindResult) -> Result<()> {
        let callbacks = match self.hooks.read() {
            Ok(guard) => guard.hooks_for(needle.id()),
            Err(poisoned) => poisoned.into_inner().hooks_for(needle.id()),
        };
        // Strictly sequential: each hook is awaited before the next one
        // starts, and a failing hook aborts the rest of the chain.
        for callback in callbacks {
            callback(*result).await?;
        }
        Ok(())
    }

    /// Resolve parameters, grab the haystack and validate the search
    /// region, in that order. Nothing here may call a finder.
    async fn prepare_search(
        &self,
        params: &FindParams,
        config: &ScreenConfig,
    ) -> Result<(Image, EffectiveParams)> {
        let screen = self.providers.screen()?;
        let bounds = screen.screen_size()?;
        let effective = params.resolve(config, bounds);
        let haystack = screen.grab_screen_region(effective.search_region).await?;
        effective.search_region.validate_as_search_region(&bounds)?;
        Ok((haystack, effective))
    }

    async fn search_one(
        &self,
        needle: &Needle,
        params: &FindParams,
        config: &ScreenConfig,
    ) -> Result<FindResult> {
        if let Needle::Window(query) = needle {
            let handle = self.providers.window_finder()?.find_match(query).await?;
            return Ok(FindResult::Window(Window::new(handle)));
        }

        let (haystack, effective) = self.prepare_search(params, config).await?;
        let density = haystack.pixel_density;
        match needle {
            Needle::Image(template) => {
                let request = MatchRequest::new(
                    haystack,
                    template.clone(),
                    effective.confidence,
                    effective.search_multiple_scales,
                );
                let matched = self.providers.image_finder()?.find_match(&request).await?;
                check_confidence(&matched, effective.confidence)?;
                Ok(FindResult::Region(
                    matched.location.translated_into(&effective.search_region),
                ))
            }
            Needle::Text(query) => {
                let request = MatchRequest::new(
                    haystack,
                    query.clone(),
                    effective.confidence,
                    effective.search_multiple_scales,
                );
                let matched = self.providers.text_finder()?.find_match(&request).await?;
                check_confidence(&matched, effective.confidence)?;
                Ok(FindResult::Region(
                    matched.location.translated_into(&effective.search_region),
                ))
            }
            Needle::Color(query) => {
                let request = MatchRequest::new(
                    haystack,
                    query.clone(),
                    effective.confidence,
                    effective.search_multiple_scales,
                );
                let point = self.providers.color_finder()?.find_match(&request).await?;
                Ok(FindResult::Point(translate_point(
                    point,
                    &effective.search_region,
                    density,
                )))
            }
            // Window needles never reach this point.
            Needle::Window(_) => unreachable!(),
        }
    }

    async fn search_many(
        &self,
        needle: &Needle,
        params: &FindParams,
        config: &ScreenConfig,
    ) -> Result<Vec<FindResult>> {
        if let Needle::Window(query) = needle {
            let handles = self.providers.window_finder()?.find_matches(query).await?;
            return Ok(handles
                .into_iter()
                .map(|handle| FindResult::Window(Window::new(handle)))
                .collect());
        }

        let (haystack, effective) = self.prepare_search(params, config).await?;
        let density = haystack.pixel_density;
        match needle {
            Needle::Image(template) => {
                let request = MatchRequest::new(
                    haystack,
                    template.clone(),
                    effective.confidence,
                    effective.search_multiple_scales,
                );
                let matches = self.providers.image_finder()?.find_matches(&request).await?;
                Ok(translate_matches(matches, &effective.search_region))
            }
            Needle::Text(query) => {
                let request = MatchRequest::new(
                    haystack,
                    query.clone(),
                    effective.confidence,
                    effective.search_multiple_scales,
                );
                let matches = self.providers.text_finder()?.find_matches(&request).await?;
                Ok(translate_matches(matches, &effective.search_region))
            }
            Needle::Color(query) => {
                let request = MatchRequest::new(
                    haystack,
                    query.clone(),
                    effective.confidence,
                    effective.search_multiple_scales,
                );
                let points = self.providers.color_finder()?.find_matches(&request).await?;
                Ok(points
                    .into_iter()
                    .map(|point| {
                        FindResult::Point(translate_point(point, &effective.search_region, density))
                    })
                    .collect())
            }
            // Window needles never reach this point.
            Needle::Window(_) => unreachable!(),
        }
    }
}

/// Reject matches the finder reported below the required confidence.
fn check_confidence(matched: &MatchResult, required: f64) -> Result<()> {
    if matched.confidence < required {
        return Err(Error::Other(format!(
            "No match with required confidence {}. Best match: {}",
            required, matched.confidence
        )));
    }
    Ok(())
}

/// Translate a finder-local region list into absolute coordinates,
/// keeping the provider's order.
fn translate_matches(matches: Vec<MatchResult>, search_region: &Region) -> Vec<FindResult> {
    matches
        .into_iter()
        .map(|matched| FindResult::Region(matched.location.translated_into(search_region)))
        .collect()
}

/// Translate a physical-pixel point into absolute logical coordinates.
fn translate_point(point: Point, search_region: &Region, density: PixelDensity) -> Point {
    Point::new(
        search_region.left + point.x / density.scale_x,
        search_region.top + point.y / density.scale_y,
    )
}
