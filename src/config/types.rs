// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::http::cache::{DEFAULT_CACHEABLE_EXTENSIONS, DEFAULT_MAX_AGE};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as `/`
    pub root: String,
    /// Tokio worker threads, CPU cores when unset
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            root: ".".to_string(),
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "common".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<usize>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// Cache policy configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Extensions (with leading dot) answered with a public max-age policy
    pub extensions: Vec<String>,
    pub max_age: u32,
    /// Match extensions ignoring ASCII case
    pub case_insensitive: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_CACHEABLE_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_age: DEFAULT_MAX_AGE,
            case_insensitive: false,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub index_files: Vec<String>,
    pub server_name: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            server_name: concat!("cachebox/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
