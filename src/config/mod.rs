// Configuration module entry point
// Loads configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::http::cache::CacheRules;

// Re-export public types
pub use state::AppState;
pub use types::{CacheConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file consulted when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables prefixed with `CACHEBOX_`
    /// override file values, with `__` separating sections, e.g.
    /// `CACHEBOX_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CACHEBOX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Extension table used to pick each response's cache policy
    pub fn cache_rules(&self) -> CacheRules {
        CacheRules::new(
            &self.cache.extensions,
            self.cache.max_age,
            self.cache.case_insensitive,
        )
    }
}
