//! Error types for postboard
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use axum::http::StatusCode;
use thiserror::Error;

/// The main error type for postboard
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token generation failed: {message}")]
    TokenGeneration { message: String },

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: i64 },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Store Errors
    // ============================================================================
    #[error("Record store error: {message}")]
    Store { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a record store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to when it reaches a handler
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::BadRequest { .. } | Error::FileNotFound { .. } | Error::JsonParse(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Auth { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error was caused by the client
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Result type alias for postboard
pub type Result<T> = std::result::Result<T, Error>;

/// Prefixes errors with a description of what was being attempted
pub trait ResultExt<T> {
    /// Prefix the error with `message`
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Prefix the error with a lazily built message
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.with_context(|| message.into())
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner: Error = e.into();
            Error::Other(format!("{}: {inner}", f()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("host");
        assert_eq!(err.to_string(), "Missing required config field: host");

        let err = Error::not_found("post", 42);
        assert_eq!(err.to_string(), "post 42 not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::not_found("post", 1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::bad_request("nope").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::FileNotFound {
                path: "temp/a.png".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::auth("expired").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::store("connection lost").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        assert!(Error::auth("x").is_client_error());
        assert!(!Error::store("x").is_client_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::store("inner"));
        let err = result.context("outer").unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert_eq!(err.to_string(), "outer: Record store error: inner");

        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk gone"));
        let err = io.with_context(|| "reading upload".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "reading upload: IO error: disk gone");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
