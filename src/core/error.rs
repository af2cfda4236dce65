//! Error types for the channel logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// No channel with this name is configured
    #[error("channel [{name}] is not defined")]
    ChannelNotFound { name: String },

    /// No factory is registered for this driver kind
    #[error("driver [{driver}] is not supported")]
    DriverNotSupported { driver: String },

    /// A registered factory failed to build the driver for a channel
    #[error("failed to create driver [{driver}] for channel [{channel}]: {source}")]
    DriverConstruction {
        channel: String,
        driver: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// A stack channel ended up with no usable member drivers
    #[error("stack channel [{name}] has no resolvable member channels")]
    EmptyStack { name: String },

    /// A stack channel includes itself, directly or through nested stacks
    #[error("stack channel [{name}] refers back to itself")]
    StackCycle { name: String },

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Transport failure while talking to a webhook endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook endpoint answered with a non-success status
    #[error("webhook returned non-success status: {status}")]
    WebhookStatus { status: u16 },

    /// Write attempted after the driver was closed
    #[error("driver [{driver}] is closed")]
    DriverClosed { driver: String },

    /// The process-wide manager has not been installed
    #[error("log manager not initialized, call global::init() first")]
    NotInitialized,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an unknown-channel error
    pub fn channel_not_found(name: impl Into<String>) -> Self {
        LoggerError::ChannelNotFound { name: name.into() }
    }

    /// Create an unregistered-driver error
    pub fn driver_not_supported(driver: impl Into<String>) -> Self {
        LoggerError::DriverNotSupported {
            driver: driver.into(),
        }
    }

    /// Wrap a factory failure with the channel and driver it was building
    pub fn driver_construction(
        channel: impl Into<String>,
        driver: impl Into<String>,
        source: LoggerError,
    ) -> Self {
        LoggerError::DriverConstruction {
            channel: channel.into(),
            driver: driver.into(),
            source: Box::new(source),
        }
    }

    /// Create an empty-stack error
    pub fn empty_stack(name: impl Into<String>) -> Self {
        LoggerError::EmptyStack { name: name.into() }
    }

    /// Create a stack-cycle error
    pub fn stack_cycle(name: impl Into<String>) -> Self {
        LoggerError::StackCycle { name: name.into() }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a closed-driver error
    pub fn driver_closed(driver: impl Into<String>) -> Self {
        LoggerError::DriverClosed {
            driver: driver.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error comes from configuration rather than delivery
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::ChannelNotFound { .. }
                | LoggerError::DriverNotSupported { .. }
                | LoggerError::DriverConstruction { .. }
                | LoggerError::EmptyStack { .. }
                | LoggerError::StackCycle { .. }
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}
