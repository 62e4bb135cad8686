// Application state module
// Immutable per-process state shared by every connection task

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::http::cache::CacheRules;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Served root directory
    pub root: PathBuf,
    /// Extension to cache policy table
    pub cache_rules: CacheRules,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let root = PathBuf::from(&config.server.root);
        let cache_rules = config.cache_rules();

        Self {
            config,
            root,
            cache_rules,
            active_connections: AtomicUsize::new(0),
        }
    }
}
