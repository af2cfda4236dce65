//! Driver registry
//!
//! Maps a driver kind name to the factory that builds it. A registry value is
//! owned by each [`Manager`](crate::Manager); registering a kind replaces any
//! previous factory for that kind.

use super::config::ChannelConfig;
use super::driver::Driver;
use super::error::{LoggerError, Result};
use crate::drivers::{FileDriver, WebhookDriver};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a driver from a channel definition
pub type DriverFactory = Arc<dyn Fn(&ChannelConfig) -> Result<Box<dyn Driver>> + Send + Sync>;

#[derive(Clone)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
}

impl DriverRegistry {
    /// Registry seeded with the built-in kinds: `file`, `webhook`, `slack`
    /// and, with the `console` feature, `console`.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register("file", |config: &ChannelConfig| {
            Ok(Box::new(FileDriver::from_config(config)?) as Box<dyn Driver>)
        });
        registry.register("webhook", |config: &ChannelConfig| {
            Ok(Box::new(WebhookDriver::from_config(config)?) as Box<dyn Driver>)
        });
        registry.register("slack", |config: &ChannelConfig| {
            Ok(Box::new(WebhookDriver::from_config(config)?) as Box<dyn Driver>)
        });

        #[cfg(feature = "console")]
        registry.register("console", |config: &ChannelConfig| {
            Ok(Box::new(crate::drivers::ConsoleDriver::from_config(config)) as Box<dyn Driver>)
        });

        registry
    }

    /// Registry with no kinds at all
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Bind `kind` to `factory`, returning the factory it displaced
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Option<DriverFactory>
    where
        F: Fn(&ChannelConfig) -> Result<Box<dyn Driver>> + Send + Sync + 'static,
    {
        self.factories
            .insert(normalize(kind.into()), Arc::new(factory))
    }

    pub fn lookup(&self, kind: &str) -> Option<DriverFactory> {
        self.factories.get(&normalize(kind.to_string())).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(&normalize(kind.to_string()))
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Build the driver for a channel definition
    pub fn build(&self, config: &ChannelConfig) -> Result<Box<dyn Driver>> {
        let factory = self
            .lookup(&config.driver)
            .ok_or_else(|| LoggerError::driver_not_supported(&config.driver))?;
        factory(config)
    }
}

fn normalize(kind: String) -> String {
    kind.trim().to_ascii_lowercase()
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
