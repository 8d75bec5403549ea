//! Integration tests for the find orchestration engine.
//!
//! These tests drive the full `Screen` facade against hand-rolled mock
//! providers: search-region validation, offset translation, confidence
//! gating, hook ordering, retry/timeout behavior and capture paths.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use visor_core::{
    ColorFinder, ColorQuery, Error, FindParams, FindResult, Image, ImageFinder, ImageWriter, Key,
    KeyboardProvider, MatchCallback, MatchRequest, MatchResult, Needle, PixelDensity, Point,
    ProviderRegistry, Region, Result, RgbaColor, Screen, ScreenProvider, TextQuery, Window,
    WindowFinder, WindowQuery,
};

const SCREEN: Region = Region::new(0.0, 0.0, 1920.0, 1080.0);

/// Install a test subscriber so `RUST_LOG` surfaces orchestrator logs.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Screen provider backed by synthetic pixel data.
struct MockScreen {
    size: Region,
    density: PixelDensity,
    highlights: Mutex<Vec<(Region, Duration, f64)>>,
}

impl MockScreen {
    fn new() -> Self {
        Self::with_density(PixelDensity::new(1.0, 1.0))
    }

    fn with_density(density: PixelDensity) -> Self {
        Self {
            size: SCREEN,
            density,
            highlights: Mutex::new(Vec::new()),
        }
    }

    fn synthetic_image(&self, region: Region) -> Image {
        let width = if region.width.is_finite() && region.width > 0.0 {
            (region.width * self.density.scale_x) as u32
        } else {
            0
        };
        let height = if region.height.is_finite() && region.height > 0.0 {
            (region.height * self.density.scale_y) as u32
        } else {
            0
        };
        let data = vec![7u8; width as usize * height as usize * 4];
        Image::new("haystack", width, height, data, 4, self.density).expect("synthetic image")
    }

    fn highlight_calls(&self) -> Vec<(Region, Duration, f64)> {
        self.highlights.lock().expect("highlight lock").clone()
    }
}

#[async_trait]
impl ScreenProvider for MockScreen {
    fn screen_size(&self) -> Result<Region> {
        Ok(self.size)
    }

    async fn grab_screen(&self) -> Result<Image> {
        Ok(self.synthetic_image(self.size))
    }

    async fn grab_screen_region(&self, region: Region) -> Result<Image> {
        Ok(self.synthetic_image(region))
    }

    async fn highlight_screen_region(
        &self,
        region: Region,
        duration: Duration,
        opacity: f64,
    ) -> Result<()> {
        self.highlights
            .lock()
            .expect("highlight lock")
            .push((region, duration, opacity));
        Ok(())
    }
}

/// Image finder that replays a fixed outcome and counts its calls.
struct MockImageFinder {
    single: Option<MatchResult>,
    multi: Vec<MatchResult>,
    calls: AtomicUsize,
}

impl MockImageFinder {
    fn matching(result: MatchResult) -> Self {
        Self {
            single: Some(result),
            multi: vec![result],
            calls: AtomicUsize::new(0),
        }
    }

    fn matching_all(results: Vec<MatchResult>) -> Self {
        Self {
            single: results.first().copied(),
            multi: results,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            single: None,
            multi: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageFinder for MockImageFinder {
    async fn find_match(&self, _request: &MatchRequest<Image>) -> Result<MatchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.single
            .ok_or_else(|| Error::Other("no match found".into()))
    }

    async fn find_matches(&self, _request: &MatchRequest<Image>) -> Result<Vec<MatchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.multi.clone())
    }
}

struct MockColorFinder {
    point: Point,
}

#[async_trait]
impl ColorFinder for MockColorFinder {
    async fn find_match(&self, _request: &MatchRequest<ColorQuery>) -> Result<Point> {
        Ok(self.point)
    }

    async fn find_matches(&self, _request: &MatchRequest<ColorQuery>) -> Result<Vec<Point>> {
        Ok(vec![self.point])
    }
}

struct MockWindowFinder {
    handle: u64,
}

#[async_trait]
impl WindowFinder for MockWindowFinder {
    async fn find_match(&self, _query: &WindowQuery) -> Result<u64> {
        Ok(self.handle)
    }

    async fn find_matches(&self, _query: &WindowQuery) -> Result<Vec<u64>> {
        Ok(vec![self.handle, self.handle + 1])
    }
}

/// Image writer that records paths instead of encoding anything.
#[derive(Default)]
struct RecordingWriter {
    stored: Mutex<Vec<std::path::PathBuf>>,
}

impl RecordingWriter {
    fn stored_paths(&self) -> Vec<std::path::PathBuf> {
        self.stored.lock().expect("writer lock").clone()
    }
}

#[async_trait]
impl ImageWriter for RecordingWriter {
    async fn store(&self, _image: &Image, path: &Path) -> Result<()> {
        self.stored
            .lock()
            .expect("writer lock")
            .push(path.to_path_buf());
        Ok(())
    }
}

struct NoopKeyboard;

#[async_trait]
impl KeyboardProvider for NoopKeyboard {
    async fn type_text(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn press_keys(&self, _keys: &[Key]) -> Result<()> {
        Ok(())
    }

    async fn release_keys(&self, _keys: &[Key]) -> Result<()> {
        Ok(())
    }
}

/// Test fixture bundling a screen facade with mock providers.
struct Fixture {
    screen: Screen,
    screen_provider: Arc<MockScreen>,
    image_finder: Arc<MockImageFinder>,
    writer: Arc<RecordingWriter>,
}

impl Fixture {
    fn with_finder(finder: MockImageFinder) -> Self {
        Self::build(MockScreen::new(), finder)
    }

    fn build(screen_provider: MockScreen, finder: MockImageFinder) -> Self {
        init_tracing();
        let screen_provider = Arc::new(screen_provider);
        let image_finder = Arc::new(finder);
        let writer = Arc::new(RecordingWriter::default());
        let providers = ProviderRegistry::new()
            .with_screen(Arc::clone(&screen_provider) as Arc<dyn ScreenProvider>)
            .with_image_finder(Arc::clone(&image_finder) as Arc<dyn ImageFinder>)
            .with_color_finder(Arc::new(MockColorFinder {
                point: Point::new(50.0, 100.0),
            }))
            .with_window_finder(Arc::new(MockWindowFinder { handle: 42 }))
            .with_image_writer(Arc::clone(&writer) as Arc<dyn ImageWriter>)
            .with_keyboard(Arc::new(NoopKeyboard));
        Self {
            screen: Screen::new(providers),
            screen_provider,
            image_finder,
            writer,
        }
    }
}

fn template() -> Image {
    Image::new(
        "needle.png",
        2,
        2,
        vec![0u8; 16],
        4,
        PixelDensity::new(1.0, 1.0),
    )
    .expect("template image")
}

fn recording_hook(log: Arc<Mutex<Vec<usize>>>, tag: usize) -> MatchCallback {
    Arc::new(move |_result| -> BoxFuture<'static, Result<()>> {
        let log = Arc::clone(&log);
        Box::pin(async move {
            log.lock().expect("hook log lock").push(tag);
            Ok(())
        })
    })
}

fn failing_hook(message: &'static str) -> MatchCallback {
    Arc::new(move |_result| -> BoxFuture<'static, Result<()>> {
        Box::pin(async move { Err(Error::Other(message.into())) })
    })
}

#[tokio::test]
async fn find_translates_match_into_absolute_coordinates() {
    // Regression scenario from the original system: search region
    // (100,200,300,400) + local match (50,100,150,200) => (150,300,150,200).
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        0.995,
        Region::new(50.0, 100.0, 150.0, 200.0),
    )));
    let params = FindParams::new().with_search_region(Region::new(100.0, 200.0, 300.0, 400.0));

    let result = fixture.screen.find(template(), params).await.unwrap();
    assert_eq!(
        result.as_region(),
        Some(Region::new(150.0, 300.0, 150.0, 200.0))
    );
}

#[tokio::test]
async fn find_defaults_search_region_to_whole_screen() {
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        1.0,
        Region::new(10.0, 20.0, 30.0, 40.0),
    )));
    let result = fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .unwrap();
    assert_eq!(result.as_region(), Some(Region::new(10.0, 20.0, 30.0, 40.0)));
}

#[tokio::test]
async fn find_rejects_below_required_confidence() {
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        0.8,
        Region::new(0.0, 0.0, 10.0, 10.0),
    )));

    let err = fixture
        .screen
        .find(template(), FindParams::new().with_confidence(0.99))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Searching for needle.png failed. Reason:"));
    assert!(message.contains("0.99"));

    // The same provider result passes once the bar is lowered.
    let result = fixture
        .screen
        .find(template(), FindParams::new().with_confidence(0.5))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn invalid_search_regions_fail_before_the_finder_runs() {
    let invalid = [
        Region::new(f64::NAN, 0.0, 100.0, 100.0),
        Region::new(-10.0, 0.0, 100.0, 100.0),
        Region::new(0.0, 0.0, -100.0, 100.0),
        Region::new(0.0, 0.0, 1.0, 100.0),
        Region::new(0.0, 0.0, 100.0, 1.0),
        Region::new(1800.0, 1000.0, 200.0, 100.0),
    ];

    for region in invalid {
        let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
            1.0,
            Region::new(0.0, 0.0, 10.0, 10.0),
        )));
        let err = fixture
            .screen
            .find(template(), FindParams::new().with_search_region(region))
            .await
            .unwrap_err();
        assert!(
            err.to_string().contains("failed. Reason:"),
            "unexpected error for {}: {}",
            region,
            err
        );
        assert_eq!(
            fixture.image_finder.call_count(),
            0,
            "finder must not run for invalid region {}",
            region
        );
    }
}

#[tokio::test]
async fn provider_failures_surface_as_uniform_search_errors() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let err = fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Searching for needle.png failed. Reason: no match found"
    );
}

#[tokio::test]
async fn hooks_run_once_per_match_in_registration_order() {
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        1.0,
        Region::new(0.0, 0.0, 10.0, 10.0),
    )));
    let needle: Needle = template().into();
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in 1..=3 {
        fixture
            .screen
            .on(&needle, recording_hook(Arc::clone(&log), tag));
    }

    fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn find_all_invokes_hooks_once_per_result() {
    let fixture = Fixture::with_finder(MockImageFinder::matching_all(vec![
        MatchResult::new(1.0, Region::new(0.0, 0.0, 10.0, 10.0)),
        MatchResult::new(0.99, Region::new(20.0, 0.0, 10.0, 10.0)),
    ]));
    let needle: Needle = template().into();
    let log = Arc::new(Mutex::new(Vec::new()));
    fixture.screen.on(&needle, recording_hook(Arc::clone(&log), 1));
    fixture.screen.on(&needle, recording_hook(Arc::clone(&log), 2));

    let results = fixture
        .screen
        .find_all(template(), FindParams::new())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(*log.lock().unwrap(), vec![1, 2, 1, 2]);
}

#[tokio::test]
async fn failing_hook_aborts_chain_with_unwrapped_error() {
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        1.0,
        Region::new(0.0, 0.0, 10.0, 10.0),
    )));
    let needle: Needle = template().into();
    let log = Arc::new(Mutex::new(Vec::new()));
    fixture.screen.on(&needle, recording_hook(Arc::clone(&log), 1));
    fixture.screen.on(&needle, failing_hook("hook exploded"));
    fixture.screen.on(&needle, recording_hook(Arc::clone(&log), 3));

    let err = fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .unwrap_err();
    // The hook's own error, not the search wrapper.
    assert_eq!(err.to_string(), "hook exploded");
    assert_eq!(*log.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn find_all_preserves_provider_order() {
    let regions = vec![
        MatchResult::new(0.9, Region::new(30.0, 0.0, 5.0, 5.0)),
        MatchResult::new(1.0, Region::new(10.0, 0.0, 5.0, 5.0)),
        MatchResult::new(0.95, Region::new(20.0, 0.0, 5.0, 5.0)),
    ];
    let fixture = Fixture::with_finder(MockImageFinder::matching_all(regions.clone()));
    let results = fixture
        .screen
        .find_all(template(), FindParams::new())
        .await
        .unwrap();
    let lefts: Vec<f64> = results
        .iter()
        .filter_map(FindResult::as_region)
        .map(|region| region.left)
        .collect();
    assert_eq!(lefts, vec![30.0, 10.0, 20.0]);
}

#[tokio::test]
async fn color_needle_returns_density_corrected_point() {
    // Finder reports physical pixel (50, 100); density 2.0 halves it
    // before the search-region offset is applied.
    let fixture = Fixture::build(
        MockScreen::with_density(PixelDensity::new(2.0, 2.0)),
        MockImageFinder::failing(),
    );
    let needle: Needle = ColorQuery::color(RgbaColor::new(255, 0, 0, 255)).into();
    let params = FindParams::new().with_search_region(Region::new(100.0, 200.0, 300.0, 400.0));

    let result = fixture.screen.find(needle, params).await.unwrap();
    assert_eq!(result.as_point(), Some(Point::new(125.0, 250.0)));
}

#[tokio::test]
async fn window_needle_returns_wrapped_handle() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let needle: Needle = WindowQuery::title("Editor").into();
    let log = Arc::new(Mutex::new(Vec::new()));
    fixture.screen.on(&needle, recording_hook(Arc::clone(&log), 1));

    let result = fixture
        .screen
        .find(needle.clone(), FindParams::new())
        .await
        .unwrap();
    assert_eq!(result.as_window(), Some(Window::new(42)));
    assert_eq!(*log.lock().unwrap(), vec![1]);

    let all = fixture
        .screen
        .find_all(needle, FindParams::new())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn auto_highlight_highlights_the_found_region() {
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        1.0,
        Region::new(50.0, 100.0, 150.0, 200.0),
    )));
    fixture.screen.update_config(|config| {
        config.auto_highlight = true;
    });

    let result = fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .unwrap();
    assert_eq!(
        result.as_region(),
        Some(Region::new(50.0, 100.0, 150.0, 200.0))
    );

    let calls = fixture.screen_provider.highlight_calls();
    assert_eq!(calls.len(), 1);
    let config = fixture.screen.config();
    assert_eq!(calls[0].0, Region::new(50.0, 100.0, 150.0, 200.0));
    assert_eq!(calls[0].1, config.highlight_duration);
    assert_eq!(calls[0].2, config.highlight_opacity);
}

#[tokio::test]
async fn find_all_auto_highlight_fires_once_per_region_result() {
    let fixture = Fixture::with_finder(MockImageFinder::matching_all(vec![
        MatchResult::new(1.0, Region::new(0.0, 0.0, 10.0, 10.0)),
        MatchResult::new(0.99, Region::new(20.0, 0.0, 10.0, 10.0)),
    ]));
    fixture.screen.update_config(|config| {
        config.auto_highlight = true;
    });

    let results = fixture
        .screen
        .find_all(template(), FindParams::new())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    // Highlights are spawned, not awaited; yield until the tasks ran.
    for _ in 0..32 {
        if fixture.screen_provider.highlight_calls().len() == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }

    let calls = fixture.screen_provider.highlight_calls();
    assert_eq!(calls.len(), 2);
    let config = fixture.screen.config();
    let mut lefts: Vec<f64> = calls.iter().map(|(region, _, _)| region.left).collect();
    lefts.sort_by(f64::total_cmp);
    assert_eq!(lefts, vec![0.0, 20.0]);
    for (_, duration, opacity) in calls {
        assert_eq!(duration, config.highlight_duration);
        assert_eq!(opacity, config.highlight_opacity);
    }
}

#[tokio::test]
async fn highlight_returns_the_same_region() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let region = Region::new(5.0, 6.0, 70.0, 80.0);
    let returned = fixture.screen.highlight(region).await.unwrap();
    assert_eq!(returned, region);
    assert_eq!(fixture.screen_provider.highlight_calls().len(), 1);
}

#[tokio::test]
async fn config_changes_apply_to_the_next_operation() {
    let fixture = Fixture::with_finder(MockImageFinder::matching(MatchResult::new(
        0.9,
        Region::new(0.0, 0.0, 10.0, 10.0),
    )));

    // Default confidence (0.99) rejects the 0.9 match.
    assert!(fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .is_err());

    fixture.screen.update_config(|config| {
        config.confidence = 0.8;
    });
    assert!(fixture
        .screen
        .find(template(), FindParams::new())
        .await
        .is_ok());
}

#[tokio::test(start_paused = true)]
async fn wait_for_times_out_after_deadline() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let start = tokio::time::Instant::now();
    let err = fixture
        .screen
        .wait_for(template(), None, None, FindParams::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Action timed out after 5000 ms");
    assert!(start.elapsed() >= Duration::from_millis(5000));
    assert!(fixture.image_finder.call_count() >= 2);
}

#[tokio::test(start_paused = true)]
async fn wait_for_abort_wins_over_timeout() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        trigger.cancel();
    });

    let start = tokio::time::Instant::now();
    let err = fixture
        .screen
        .wait_for(
            template(),
            None,
            None,
            FindParams::new().with_abort(token),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Action aborted by signal");
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn wait_for_resolves_once_a_match_appears() {
    struct EventuallyFinder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageFinder for EventuallyFinder {
        async fn find_match(&self, _request: &MatchRequest<Image>) -> Result<MatchResult> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::Other("not yet".into()))
            } else {
                Ok(MatchResult::new(1.0, Region::new(1.0, 2.0, 3.0, 4.0)))
            }
        }

        async fn find_matches(&self, _request: &MatchRequest<Image>) -> Result<Vec<MatchResult>> {
            Ok(Vec::new())
        }
    }

    let providers = ProviderRegistry::new()
        .with_screen(Arc::new(MockScreen::new()))
        .with_image_finder(Arc::new(EventuallyFinder {
            calls: AtomicUsize::new(0),
        }));
    let screen = Screen::new(providers);

    let result = screen
        .wait_for(template(), None, None, FindParams::new())
        .await
        .unwrap();
    assert_eq!(result.as_region(), Some(Region::new(1.0, 2.0, 3.0, 4.0)));
}

#[tokio::test]
async fn capture_writes_once_and_returns_the_joined_path() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let target = tempfile::TempDir::new().unwrap();

    let path = fixture
        .screen
        .capture_with(
            "shot",
            visor_core::ImageFormat::Png,
            Some(target.path()),
            "",
            "",
        )
        .await
        .unwrap();
    assert_eq!(path, target.path().join("shot.png"));
    assert_eq!(fixture.writer.stored_paths(), vec![path]);
}

#[tokio::test]
async fn capture_embeds_prefix_and_postfix() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let target = tempfile::TempDir::new().unwrap();

    let path = fixture
        .screen
        .capture_region_with(
            "area",
            Region::new(0.0, 0.0, 100.0, 100.0),
            visor_core::ImageFormat::Jpeg,
            Some(target.path()),
            "pre_",
            "_post",
        )
        .await
        .unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name, "pre_area_post.jpg");
}

#[tokio::test]
async fn capture_region_rejects_malformed_regions() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    let err = fixture
        .screen
        .capture_region("bad", Region::new(f64::NAN, 0.0, 10.0, 10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(fixture.writer.stored_paths().is_empty());
}

#[tokio::test]
async fn color_at_reads_the_grabbed_pixel() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    // MockScreen fills every channel with 7.
    let color = fixture.screen.color_at(Point::new(10.0, 10.0)).await.unwrap();
    assert_eq!(color, RgbaColor::new(7, 7, 7, 7));
}

#[tokio::test]
async fn width_and_height_come_from_the_screen_provider() {
    let fixture = Fixture::with_finder(MockImageFinder::failing());
    assert_eq!(fixture.screen.width().unwrap(), 1920.0);
    assert_eq!(fixture.screen.height().unwrap(), 1080.0);
}

#[tokio::test]
async fn missing_finder_surfaces_as_wrapped_search_error() {
    let providers = ProviderRegistry::new().with_screen(Arc::new(MockScreen::new()));
    let screen = Screen::new(providers);
    let needle: Needle = TextQuery::line("anything").into();

    let err = screen.find(needle, FindParams::new()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Searching for line-query-anything failed. Reason: No text finder provider registered"
    );
}
