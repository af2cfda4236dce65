//! Process-wide convenience layer
//!
//! One optional [`Manager`] lives in a lazily created slot. The level
//! functions forward to its default logger and do nothing until a manager has
//! been installed.
//!
//! ```no_run
//! use rust_channel_logger::{context, global, Config};
//!
//! global::init(Config::default());
//! global::info_with_context("User logged in", &context! { "user_id" => 123 });
//!
//! if let Ok(audit) = global::channel("audit") {
//!     audit.notice("permissions changed");
//! }
//!
//! global::close().ok();
//! ```

use crate::core::{Config, Context, Level, Logger, LoggerError, Manager, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static GLOBAL_MANAGER: Lazy<RwLock<Option<Arc<Manager>>>> = Lazy::new(|| RwLock::new(None));

/// Install a manager built from `config` unless one is already installed.
///
/// Returns `true` when this call installed the manager. After [`close`] a
/// later `init` installs again.
pub fn init(config: Config) -> bool {
    let mut slot = GLOBAL_MANAGER.write();
    if slot.is_some() {
        return false;
    }
    *slot = Some(Arc::new(Manager::new(config)));
    true
}

/// Install `manager`, replacing any previous one without closing it
pub fn set_manager(manager: Manager) -> Option<Arc<Manager>> {
    GLOBAL_MANAGER.write().replace(Arc::new(manager))
}

pub fn manager() -> Option<Arc<Manager>> {
    GLOBAL_MANAGER.read().clone()
}

pub fn is_initialized() -> bool {
    GLOBAL_MANAGER.read().is_some()
}

pub fn channel(name: &str) -> Result<Logger> {
    manager().ok_or(LoggerError::NotInitialized)?.channel(name)
}

pub fn default_logger() -> Result<Logger> {
    manager().ok_or(LoggerError::NotInitialized)?.default_logger()
}

pub fn share_context(context: &Context) {
    if let Some(manager) = manager() {
        manager.share_context(context);
    }
}

/// Close and remove the installed manager
pub fn close() -> Result<()> {
    let taken = GLOBAL_MANAGER.write().take();
    match taken {
        Some(manager) => manager.close(),
        None => Ok(()),
    }
}

pub fn log(level: Level, message: impl Into<String>) {
    if let Ok(logger) = default_logger() {
        logger.log(level, message);
    }
}

pub fn log_with_context(level: Level, message: impl Into<String>, context: &Context) {
    if let Ok(logger) = default_logger() {
        logger.log_with_context(level, message, context);
    }
}

macro_rules! global_level_functions {
    ($($level:ident => $function:ident, $with_context:ident;)*) => {
        $(
            #[doc = concat!("Emit at `", stringify!($level), "` level on the default channel")]
            pub fn $function(message: impl Into<String>) {
                log(Level::$level, message);
            }

            pub fn $with_context(message: impl Into<String>, context: &Context) {
                log_with_context(Level::$level, message, context);
            }
        )*
    };
}

global_level_functions! {
    Debug => debug, debug_with_context;
    Info => info, info_with_context;
    Notice => notice, notice_with_context;
    Warning => warning, warning_with_context;
    Error => error, error_with_context;
    Critical => critical, critical_with_context;
    Alert => alert, alert_with_context;
    Emergency => emergency, emergency_with_context;
}

#[track_caller]
pub fn error_with_exception<E>(message: impl Into<String>, error: &E)
where
    E: std::error::Error + ?Sized,
{
    if let Ok(logger) = default_logger() {
        logger.error_with_exception(message, error);
    }
}

#[track_caller]
pub fn critical_with_exception<E>(message: impl Into<String>, error: &E)
where
    E: std::error::Error + ?Sized,
{
    if let Ok(logger) = default_logger() {
        logger.critical_with_exception(message, error);
    }
}
