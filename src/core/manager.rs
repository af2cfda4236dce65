//! Manager: owner of the channel cache, shared context and default channel

use super::{
    channel::Channel,
    config::{ChannelConfig, Config},
    driver::Driver,
    error::{LoggerError, Result},
    logger::Logger,
    registry::{DriverFactory, DriverRegistry},
    value::Context,
};
use crate::drivers::StackDriver;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct ManagerState {
    channels: HashMap<String, Arc<Channel>>,
    default_channel: String,
    shared_context: Context,
}

/// Builds channels on first request and hands out [`Logger`] views onto them.
///
/// # Example
///
/// ```no_run
/// use rust_channel_logger::prelude::*;
///
/// let manager = Manager::new(Config::default());
/// manager.share_context(&context! { "env" => "production" });
///
/// let logger = manager.default_logger()?;
/// logger.info("Service started");
///
/// manager.close()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Manager {
    config: Config,
    registry: RwLock<DriverRegistry>,
    state: RwLock<ManagerState>,
}

impl Manager {
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, DriverRegistry::new())
    }

    /// Manager resolving driver kinds through `registry`
    pub fn with_registry(config: Config, registry: DriverRegistry) -> Self {
        let state = ManagerState {
            default_channel: config.default.clone(),
            ..ManagerState::default()
        };
        Self {
            config,
            registry: RwLock::new(registry),
            state: RwLock::new(state),
        }
    }

    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Logger for the named channel, building and caching the channel on
    /// first use.
    pub fn channel(&self, name: &str) -> Result<Logger> {
        {
            let state = self.state.read();
            if let Some(channel) = state.channels.get(name) {
                return Ok(Self::snapshot(channel, &state.shared_context));
            }
        }

        // Only one upgradable reader at a time: concurrent first requests
        // for a name queue here, and the loser finds the winner's channel.
        let state = self.state.upgradable_read();
        if let Some(channel) = state.channels.get(name) {
            return Ok(Self::snapshot(channel, &state.shared_context));
        }

        let channel = Arc::new(self.build_channel(name)?);
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state
            .channels
            .insert(name.to_string(), Arc::clone(&channel));
        Ok(Self::snapshot(&channel, &state.shared_context))
    }

    /// Logger for the current default channel
    pub fn default_logger(&self) -> Result<Logger> {
        let name = self.default_channel();
        self.channel(&name)
    }

    pub fn set_default(&self, name: impl Into<String>) {
        self.state.write().default_channel = name.into();
    }

    pub fn default_channel(&self) -> String {
        self.state.read().default_channel.clone()
    }

    /// Merge `context` into the shared context and into every cached
    /// channel's private context. Existing loggers keep their snapshot.
    pub fn share_context(&self, context: &Context) {
        let mut state = self.state.write();
        state.shared_context.merge(context);
        for channel in state.channels.values() {
            channel.merge_context(context);
        }
    }

    pub fn shared_context(&self) -> Context {
        self.state.read().shared_context.clone()
    }

    /// Clear the shared context. Keys already copied into cached channels
    /// stay there.
    pub fn flush_shared_context(&self) {
        self.state.write().shared_context.clear();
    }

    /// Register a driver kind for channels built from now on
    pub fn register_driver<F>(&self, kind: impl Into<String>, factory: F) -> Option<DriverFactory>
    where
        F: Fn(&ChannelConfig) -> Result<Box<dyn Driver>> + Send + Sync + 'static,
    {
        self.registry.write().register(kind, factory)
    }

    pub fn registered_drivers(&self) -> Vec<String> {
        self.registry.read().kinds()
    }

    /// Names of the channels built so far, sorted
    pub fn cached_channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Flush every cached channel, reporting the last failure
    pub fn flush(&self) -> Result<()> {
        let channels = self.sorted_channels();
        let mut last = Ok(());
        for channel in channels {
            if let Err(e) = channel.flush() {
                last = Err(e);
            }
        }
        last
    }

    /// Close every cached channel and empty the cache, reporting the last
    /// failure.
    pub fn close(&self) -> Result<()> {
        match self.close_each().pop() {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }

    /// Close every cached channel and empty the cache, reporting each
    /// failure with its channel name in name order.
    pub fn close_each(&self) -> Vec<(String, LoggerError)> {
        let channels = std::mem::take(&mut self.state.write().channels);
        let mut channels: Vec<(String, Arc<Channel>)> = channels.into_iter().collect();
        channels.sort_by(|a, b| a.0.cmp(&b.0));

        channels
            .into_iter()
            .filter_map(|(name, channel)| channel.close().err().map(|err| (name, err)))
            .collect()
    }

    fn sorted_channels(&self) -> Vec<Arc<Channel>> {
        let state = self.state.read();
        let mut channels: Vec<Arc<Channel>> = state.channels.values().cloned().collect();
        channels.sort_by(|a, b| a.name().cmp(b.name()));
        channels
    }

    fn snapshot(channel: &Arc<Channel>, shared: &Context) -> Logger {
        let context = channel.context().merged(shared);
        Logger::new(Arc::clone(channel), context)
    }

    fn build_channel(&self, name: &str) -> Result<Channel> {
        let config = self
            .config
            .channel(name)
            .ok_or_else(|| LoggerError::channel_not_found(name))?;
        let driver = self.build_driver(name, &mut Vec::new())?;
        Ok(Channel::new(name, driver, config.min_level()))
    }

    /// Build the driver for a configured channel. `path` holds the stack
    /// channels currently being built, outermost first.
    fn build_driver(&self, name: &str, path: &mut Vec<String>) -> Result<Box<dyn Driver>> {
        let config = self
            .config
            .channel(name)
            .ok_or_else(|| LoggerError::channel_not_found(name))?;

        if config.is_stack() {
            let stack = self.build_stack(name, config, path)?;
            return Ok(Box::new(stack));
        }

        let factory = self
            .registry
            .read()
            .lookup(&config.driver)
            .ok_or_else(|| LoggerError::driver_not_supported(&config.driver))?;

        let config = self.with_app_defaults(config);
        factory(&config).map_err(|e| LoggerError::driver_construction(name, &config.driver, e))
    }

    fn build_stack(
        &self,
        name: &str,
        config: &ChannelConfig,
        path: &mut Vec<String>,
    ) -> Result<StackDriver> {
        if path.iter().any(|building| building == name) {
            return Err(LoggerError::stack_cycle(name));
        }

        let settings = config.stack.clone().unwrap_or_default();
        path.push(name.to_string());

        let mut members = Vec::with_capacity(settings.channels.len());
        for member in &settings.channels {
            match self.build_driver(member, path) {
                Ok(driver) => members.push(driver),
                Err(LoggerError::StackCycle { name }) => {
                    path.pop();
                    return Err(LoggerError::StackCycle { name });
                }
                Err(_) if settings.ignore_failures => continue,
                Err(e) => {
                    path.pop();
                    return Err(e);
                }
            }
        }

        path.pop();
        StackDriver::new(name, members, settings.ignore_failures)
    }

    /// Fill manager-level defaults into a channel definition
    fn with_app_defaults(&self, config: &ChannelConfig) -> ChannelConfig {
        let mut config = config.clone();
        if let Some(ref mut webhook) = config.webhook {
            if webhook.username.as_deref().map_or(true, str::is_empty)
                && !self.config.app_name.is_empty()
            {
                webhook.username = Some(self.config.app_name.clone());
            }
        }
        config
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("default_channel", &self.default_channel())
            .field("cached_channels", &self.cached_channels())
            .field("registry", &*self.registry.read())
            .finish()
    }
}

/// Builder for constructing a Manager with a fluent API
///
/// # Example
/// ```
/// use rust_channel_logger::prelude::*;
/// use rust_channel_logger::drivers::MemoryDriver;
///
/// let memory = MemoryDriver::new();
/// let manager = Manager::builder()
///     .app_name("billing")
///     .channel("audit", ChannelConfig::new("memory").with_level(Level::Notice))
///     .default_channel("audit")
///     .driver("memory", memory.factory())
///     .shared_context(context! { "service" => "billing" })
///     .build();
///
/// manager.default_logger().unwrap().notice("invoice sent");
/// assert_eq!(memory.len(), 1);
/// ```
pub struct ManagerBuilder {
    config: Config,
    registry: DriverRegistry,
    shared_context: Context,
}

impl ManagerBuilder {
    /// Builder over an empty configuration and the built-in driver kinds
    pub fn new() -> Self {
        Self {
            config: Config::new(""),
            registry: DriverRegistry::new(),
            shared_context: Context::new(),
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = app_name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn channel(mut self, name: impl Into<String>, channel: ChannelConfig) -> Self {
        self.config.channels.insert(name.into(), channel);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_channel(mut self, name: impl Into<String>) -> Self {
        self.config.default = name.into();
        self
    }

    /// Register a driver kind
    #[must_use = "builder methods return a new value"]
    pub fn driver<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ChannelConfig) -> Result<Box<dyn Driver>> + Send + Sync + 'static,
    {
        self.registry.register(kind, factory);
        self
    }

    /// Replace the driver registry
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: DriverRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_context(mut self, context: Context) -> Self {
        self.shared_context.merge(&context);
        self
    }

    pub fn build(self) -> Manager {
        let manager = Manager::with_registry(self.config, self.registry);
        if !self.shared_context.is_empty() {
            manager.share_context(&self.shared_context);
        }
        manager
    }
}

impl Default for ManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Level, Value};
    use crate::drivers::MemoryDriver;

    fn memory_manager(channels: &[(&str, ChannelConfig)]) -> (Manager, MemoryDriver) {
        let memory = MemoryDriver::new();
        let mut builder = Manager::builder().driver("memory", memory.factory());
        for (name, config) in channels {
            builder = builder.channel(*name, config.clone());
        }
        (builder.default_channel(channels[0].0).build(), memory)
    }

    #[test]
    fn test_channel_is_cached() {
        let (manager, _) = memory_manager(&[("app", ChannelConfig::new("memory"))]);

        let first = manager.channel("app").unwrap();
        let second = manager.channel("app").unwrap();
        assert!(first.shares_channel_with(&second));
        assert_eq!(manager.cached_channels(), vec!["app"]);
    }

    #[test]
    fn test_unknown_channel_and_driver() {
        let (manager, _) = memory_manager(&[("weird", ChannelConfig::new("kafka"))]);

        let err = manager.channel("missing").unwrap_err();
        assert!(matches!(err, LoggerError::ChannelNotFound { ref name } if name == "missing"));

        let err = manager.channel("weird").unwrap_err();
        assert!(matches!(err, LoggerError::DriverNotSupported { ref driver } if driver == "kafka"));
        assert!(manager.cached_channels().is_empty());
    }

    #[test]
    fn test_factory_failure_is_wrapped() {
        let manager = Manager::builder()
            .channel("alerts", ChannelConfig::webhook(""))
            .build();

        let err = manager.channel("alerts").unwrap_err();
        assert!(matches!(
            err,
            LoggerError::DriverConstruction { ref channel, ref driver, .. }
                if channel == "alerts" && driver == "webhook"
        ));
    }

    #[test]
    fn test_default_logger_follows_set_default() {
        let (manager, memory) = memory_manager(&[
            ("one", ChannelConfig::new("memory")),
            ("two", ChannelConfig::new("memory")),
        ]);

        manager.default_logger().unwrap().info("to one");
        manager.set_default("two");
        assert_eq!(manager.default_channel(), "two");
        manager.default_logger().unwrap().info("to two");

        let channels: Vec<String> = memory.entries().into_iter().map(|e| e.channel).collect();
        assert_eq!(channels, vec!["one", "two"]);
    }

    #[test]
    fn test_shared_context_snapshot() {
        let (manager, memory) = memory_manager(&[("app", ChannelConfig::new("memory"))]);

        manager.share_context(&Context::new().with("env", "prod"));
        let before = manager.channel("app").unwrap();

        manager.share_context(&Context::new().with("region", "eu"));
        let after = manager.channel("app").unwrap();

        before.info("before");
        after.info("after");

        let entries = memory.entries();
        assert_eq!(entries[0].context.get("env").and_then(Value::as_str), Some("prod"));
        assert!(!entries[0].context.contains_key("region"));
        assert_eq!(entries[1].context.get("region").and_then(Value::as_str), Some("eu"));
    }

    #[test]
    fn test_share_context_patches_cached_channels() {
        let (manager, _) = memory_manager(&[("app", ChannelConfig::new("memory"))]);
        let logger = manager.channel("app").unwrap();

        manager.share_context(&Context::new().with("build", 7));
        assert!(logger.channel().context().contains_key("build"));

        manager.flush_shared_context();
        assert!(manager.shared_context().is_empty());
        let fresh = manager.channel("app").unwrap();
        assert!(fresh.context().contains_key("build"));
    }

    #[test]
    fn test_close_empties_cache_and_closes_drivers() {
        let (manager, memory) = memory_manager(&[("app", ChannelConfig::new("memory"))]);
        manager.channel("app").unwrap();

        manager.close().unwrap();
        assert!(manager.cached_channels().is_empty());
        assert!(memory.is_closed());

        let reopened = manager.channel("app").unwrap();
        assert!(!reopened.channel().is_closed());
    }

    #[test]
    fn test_register_driver_at_runtime() {
        let manager = Manager::builder()
            .channel("late", ChannelConfig::new("late-kind"))
            .build();
        assert!(manager.channel("late").is_err());

        let memory = MemoryDriver::new();
        assert!(manager.register_driver("late-kind", memory.factory()).is_none());
        manager.channel("late").unwrap().warning("now it works");
        assert_eq!(memory.len(), 1);
        assert!(manager.registered_drivers().contains(&"late-kind".to_string()));
    }

    #[test]
    fn test_channel_levels() {
        let (manager, memory) = memory_manager(&[(
            "app",
            ChannelConfig::new("memory").with_level(Level::Warning),
        )]);
        let logger = manager.channel("app").unwrap();

        logger.info("dropped");
        logger.error("kept");
        assert_eq!(memory.messages(), vec!["kept"]);
    }

    #[test]
    fn test_stack_cycle_detected() {
        let manager = Manager::builder()
            .channel("a", ChannelConfig::stack(["b"]).with_ignore_failures(true))
            .channel("b", ChannelConfig::stack(["a"]))
            .build();

        let err = manager.channel("a").unwrap_err();
        assert!(matches!(err, LoggerError::StackCycle { ref name } if name == "a"));
    }

    #[test]
    fn test_webhook_username_from_app_name() {
        let config = ChannelConfig::webhook("http://localhost/hook");
        let manager = Manager::builder().app_name("billing").build();

        let resolved = manager.with_app_defaults(&config);
        assert_eq!(
            resolved.webhook.unwrap().username.as_deref(),
            Some("billing")
        );

        let named = ChannelConfig::webhook_with(
            crate::core::WebhookConfig::new("http://localhost/hook").with_username("Ops"),
        );
        let resolved = manager.with_app_defaults(&named);
        assert_eq!(resolved.webhook.unwrap().username.as_deref(), Some("Ops"));
    }
}
