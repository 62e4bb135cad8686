//! cachebox - a static file server that tags every response with a
//! `Cache-Control` policy chosen from the requested file's extension.
//!
//! Layers:
//! - [`config`]: configuration loading and shared state
//! - [`http`]: cache policy, MIME detection and response builders
//! - [`handler`]: path translation, static serving and header finalization
//! - [`server`]: listener, accept loop and shutdown signals
//! - [`logger`]: lifecycle, error and access logging

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

use std::sync::Arc;

/// Bind the configured address and serve until SIGINT or SIGTERM
///
/// Bind failures are logged and returned.
pub async fn run(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_listener(addr).map_err(|e| {
        logger::log_bind_failed(&addr, &e);
        e
    })?;

    logger::log_server_start(&listener.local_addr().unwrap_or(addr), &cfg);
    let state = Arc::new(config::AppState::new(cfg));
    server::serve_until(listener, state, server::shutdown_signal()).await;
    Ok(())
}
