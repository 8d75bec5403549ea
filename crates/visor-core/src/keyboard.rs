//! Keyboard facade: paced pass-through to the keyboard provider.

use std::sync::RwLock;
use std::time::Duration;

use crate::config::KeyboardConfig;
use crate::error::Result;
use crate::input::Key;
use crate::provider::ProviderRegistry;

/// Keyboard control facade.
///
/// Injection happens through the registered
/// [`crate::provider::KeyboardProvider`]; the facade adds the configured
/// auto-delay after every injected event.
pub struct Keyboard {
    providers: ProviderRegistry,
    config: RwLock<KeyboardConfig>,
}

impl Keyboard {
    /// Create a keyboard facade with default configuration.
    pub fn new(providers: ProviderRegistry) -> Self {
        Self::with_config(providers, KeyboardConfig::default())
    }

    /// Create a keyboard facade with an explicit configuration.
    pub fn with_config(providers: ProviderRegistry, config: KeyboardConfig) -> Self {
        Self {
            providers,
            config: RwLock::new(config),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> KeyboardConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Mutate the configuration; the next operation picks the change up.
    pub fn update_config(&self, update: impl FnOnce(&mut KeyboardConfig)) {
        match self.config.write() {
            Ok(mut guard) => update(&mut guard),
            Err(poisoned) => update(&mut poisoned.into_inner()),
        }
    }

    /// Type a string of text.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        let config = self.config();
        self.providers.keyboard()?.type_text(text).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Press and hold keys, in order (e.g. a modifier chord).
    pub async fn press(&self, keys: &[Key]) -> Result<()> {
        let config = self.config();
        self.providers.keyboard()?.press_keys(keys).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Release held keys, in order.
    pub async fn release(&self, keys: &[Key]) -> Result<()> {
        let config = self.config();
        self.providers.keyboard()?.release_keys(keys).await?;
        pace(config.auto_delay).await;
        Ok(())
    }

    /// Press and release a key chord.
    pub async fn tap(&self, keys: &[Key]) -> Result<()> {
        self.press(keys).await?;
        self.release(keys).await
    }
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
