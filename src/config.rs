//! Service configuration
//!
//! Settings are loaded from an optional YAML file, then overridden by
//! `POSTBOARD_*` environment variables. Every field has a default so an
//! empty file (or no file) yields a runnable local setup.

use crate::error::{Error, Result};
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config key for the URL scheme used in absolute links
pub const PROTOCOL_KEY: &str = "protocol";

/// Config key for the public `host[:port]` used in absolute links
pub const HOST_KEY: &str = "host";

/// Default page size when `take` is absent or invalid
pub const DEFAULT_TAKE: u64 = 20;

// ============================================================================
// Config Provider
// ============================================================================

/// Read access to configuration values by key
///
/// The pagination engine only needs `protocol` and `host`; it receives a
/// provider instead of reading process-wide state.
pub trait ConfigProvider: Send + Sync {
    /// Look up a configuration value
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a configuration value that must be present and non-empty
    fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::missing_field(key))
    }
}

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Public address and listening port
    #[serde(default)]
    pub server: ServerSettings,

    /// Listing defaults
    #[serde(default)]
    pub pagination: PaginationSettings,

    /// Record store selection
    #[serde(default)]
    pub database: DatabaseSettings,

    /// File staging locations
    #[serde(default)]
    pub storage: StorageSettings,

    /// Token verification
    #[serde(default)]
    pub auth: AuthSettings,

    /// Log level used when RUST_LOG is not set
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// URL scheme for generated links (e.g., "http")
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Public host used in generated links (e.g., "localhost:3000")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost:3000".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// Page size used when the request has none
    #[serde(default = "default_take")]
    pub default_take: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_take: default_take(),
        }
    }
}

fn default_take() -> u64 {
    DEFAULT_TAKE
}

/// Which record store backs the posts collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local map, lost on restart
    Memory,
    /// DuckDB database (file or in-memory)
    #[default]
    Duckdb,
}

/// Database settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Store backend
    #[serde(default)]
    pub backend: StoreBackend,

    /// DuckDB file path; in-memory when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// File storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Root directory for uploaded files
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Directory (under root) holding freshly uploaded files
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Directory (under root) holding files attached to posts
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            temp_dir: default_temp_dir(),
            posts_dir: default_posts_dir(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_temp_dir() -> String {
    "temp".to_string()
}

fn default_posts_dir() -> String {
    "posts".to_string()
}

/// Auth settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for access tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_seconds: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl_seconds: default_access_token_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "postboard-dev-secret".to_string()
}

fn default_access_token_ttl() -> u64 {
    300
}

// ============================================================================
// Loading
// ============================================================================

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Load settings from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `POSTBOARD_*` overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(protocol) = lookup("POSTBOARD_PROTOCOL") {
            self.server.protocol = protocol;
        }
        if let Some(host) = lookup("POSTBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("POSTBOARD_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::invalid_value("POSTBOARD_PORT", format!("{e}")))?;
        }
        if let Some(path) = lookup("POSTBOARD_DATABASE") {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(secret) = lookup("POSTBOARD_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(root) = lookup("POSTBOARD_STORAGE_ROOT") {
            self.storage.root = PathBuf::from(root);
        }
        Ok(())
    }

    /// Check values that cannot be defaulted sensibly
    pub fn validate(&self) -> Result<()> {
        if self.pagination.default_take == 0 {
            return Err(Error::invalid_value(
                "pagination.default_take",
                "must be at least 1",
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(Error::missing_field("auth.jwt_secret"));
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            PROTOCOL_KEY => Some(self.server.protocol.clone()),
            HOST_KEY => Some(self.server.host.clone()),
            "port" => Some(self.server.port.to_string()),
            "default_take" => Some(self.pagination.default_take.to_string()),
            _ => None,
        }
    }
}
