//! Mouse facade: paced pass-through to the mouse provider.

use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

use crate::config::MouseConfig;
use crate::error::Result;
use crate::geometry::Point;
use crate::input::Button;
use crate::provider::ProviderRegistry;

/// Mouse control facade.
///
/// Injection happens through the registered [`crate::provider::MouseProvider`];
/// the facade adds the configured auto-delay after every injected event
/// and animates moves at the configured speed.
pub struct Mouse {
    providers: ProviderRegistry,
    config: RwLock<MouseConfig>,
}

impl Mouse {
    /// Interval between interpolated cursor steps during animated moves.
    const STEP_INTERVAL: Duration = Duration::from_millis(10);

    /// Create a mouse facade with default configuration.
    pub fn new(providers: ProviderRegistry) -> Self {
        Self::with_config(providers, MouseConfig::default())
    }

    /// Create a mouse facade with an explicit configuration.
    pub fn with_config(providers: ProviderRegistry, config: MouseConfig) -> Self {
        Self {
            providers,
            config: RwLock::new(config),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> MouseConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Mutate the configuration; the next operation picks the change up.
    pub fn update_config(&self, update: impl FnOnce(&mut MouseConfig)) {
        match self.config.write() {
            Ok(mut guard) => update(&mut guard),
            Err(poisoned) => update(&mut poisoned.into_inner()),
        }
    }

    /// Current cursor position.
    pub async fn position(&self) -> Result<Point> {
        self.providers.mouse()?.position().await
    }

    /// Jump the cursor to an absolute position.
    pub async fn set_position(&self, point: Point) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.set_position(point).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Move the cursor to `target` along a straight line at the
    /// configured speed.
    pub async fn move_to(&self, target: Point) -> Result<()> {
        let config = self.config();
        let mouse = self.providers.mouse()?;
        let start = mouse.position().await?;

        let distance = ((target.x - start.x).powi(2) + (target.y - start.y).powi(2)).sqrt();
        let duration = if config.speed > 0.0 {
            Duration::from_secs_f64(distance / config.speed)
        } else {
            Duration::ZERO
        };
        let steps = (duration.as_millis() / Self::STEP_INTERVAL.as_millis()).max(1) as u32;
        debug!(%start, %target, steps, "move_to");

        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            let point = Point::new(
                start.x + (target.x - start.x) * t,
                start.y + (target.y - start.y) * t,
            );
            mouse.set_position(point).await?;
            if step < steps {
                tokio::time::sleep(Self::STEP_INTERVAL).await;
            }
        }
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Click (press and release) a button.
    pub async fn click(&self, button: Button) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.click(button).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Click a button twice.
    pub async fn double_click(&self, button: Button) -> Result<()> {
        let config = self.config();
        let mouse = self.providers.mouse()?;
        mouse.click(button).await?;
        mouse.click(button).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Press and hold a button.
    pub async fn press(&self, button: Button) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.press(button).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Release a held button.
    pub async fn release(&self, button: Button) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.release(button).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Drag with the left button held from the current position to
    /// `target`.
    pub async fn drag_to(&self, target: Point) -> Result<()> {
        self.press(Button::Left).await?;
        let result = self.move_to(target).await;
        // Always release, even when the move failed midway.
        let release = self.release(Button::Left).await;
        result.and(release)
    }

    /// Scroll up by `amount` steps.
    pub async fn scroll_up(&self, amount: i32) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.scroll_up(amount).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Scroll down by `amount` steps.
    pub async fn scroll_down(&self, amount: i32) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.scroll_down(amount).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Scroll left by `amount` steps.
    pub async fn scroll_left(&self, amount: i32) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.scroll_left(amount).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Scroll right by `amount` steps.
    pub async fn scroll_right(&self, amount: i32) -> Result<()> {
        let config = self.config();
        self.providers.mouse()?.scroll_right(amount).await?;
        pace(config.auto_delay).await;
        Ok(())
    }
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
