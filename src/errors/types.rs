//! Error types for the Ionic Push channel
//!
//! Two kinds matter to callers of the channel: [`AppError::InvalidConfiguration`],
//! raised before any request is made, and [`AppError::CouldNotSendNotification`],
//! raised once a request was attempted and did not succeed. The remaining
//! variants cover configuration files, serialization and the CLI.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::transport::HttpResponse;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The channel is missing a setting it cannot work without (the API key).
    #[error("Ionic Push is not configured: {message}")]
    InvalidConfiguration { message: String },

    /// The request was attempted and either rejected or never completed.
    #[error("Could not send notification: {failure}")]
    CouldNotSendNotification {
        #[source]
        failure: DeliveryFailure,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Unknown configuration key: {key}")]
    UnknownConfigKey { key: String },

    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidConfigValue {
        key: String,
        value: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("JSON serialization error: {context}")]
    JsonSerialization {
        context: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("TOML parsing error: {context}")]
    TomlParsing {
        context: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Why a delivery attempt failed
#[derive(Debug)]
pub enum DeliveryFailure {
    /// The API answered with a non-2xx status.
    Rejected(HttpResponse),
    /// The request never produced a response.
    Transport(TransportError),
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(response) if response.body.is_empty() => {
                write!(f, "HTTP {}", response.status)
            }
            Self::Rejected(response) => write!(f, "HTTP {} - {}", response.status, response.body),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DeliveryFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(_) => None,
            Self::Transport(err) => Some(err),
        }
    }
}

/// Failure below the HTTP layer: connect, TLS, timeout, malformed request
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    timed_out: bool,
    #[source]
    source: Option<BoxedSource>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!(
                "connection to {} failed",
                err.url().map(|u| u.as_str()).unwrap_or("unknown")
            )
        } else {
            "HTTP request failed".to_string()
        };

        Self {
            message,
            timed_out: err.is_timeout(),
            source: Some(Box::new(err)),
        }
    }
}

impl AppError {
    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a delivery error for a non-2xx response
    pub fn rejected(response: HttpResponse) -> Self {
        Self::CouldNotSendNotification {
            failure: DeliveryFailure::Rejected(response),
        }
    }

    /// Create a delivery error for a transport failure
    pub fn transport(err: TransportError) -> Self {
        Self::CouldNotSendNotification {
            failure: DeliveryFailure::Transport(err),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidConfigValue {
            key: key.into(),
            value: value.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The rejected response, when the API answered with a non-2xx status
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::CouldNotSendNotification {
                failure: DeliveryFailure::Rejected(response),
            } => Some(response),
            _ => None,
        }
    }

    /// The transport failure, when no response was received
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::CouldNotSendNotification {
                failure: DeliveryFailure::Transport(err),
            } => Some(err),
            _ => None,
        }
    }

    /// Whether a later attempt could plausibly succeed.
    ///
    /// The channel never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CouldNotSendNotification { failure } => match failure {
                DeliveryFailure::Rejected(response) => {
                    response.status >= 500 || response.status == 408 || response.status == 429
                }
                DeliveryFailure::Transport(_) => true,
            },
            _ => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. }
            | Self::Config { .. }
            | Self::UnknownConfigKey { .. }
            | Self::InvalidConfigValue { .. } => "config",
            Self::CouldNotSendNotification { .. } => "delivery",
            Self::Io { .. } => "io",
            Self::JsonSerialization { .. } | Self::TomlParsing { .. } => "serialization",
            Self::Validation { .. } => "validation",
            Self::Other { .. } => "internal",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let operation = match err.kind() {
            std::io::ErrorKind::NotFound => "file not found",
            std::io::ErrorKind::PermissionDenied => "permission denied",
            _ => "I/O operation",
        }
        .to_string();

        Self::Io {
            path: PathBuf::from("unknown"),
            operation,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonSerialization {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlParsing {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config {
            message: format!("Failed to serialize config: {err}"),
            source: Some(Box::new(err)),
        }
    }
}
