// Server module entry point
// Binds the listener, accepts connections and stops on shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::serve_until;
pub use signal::shutdown_signal;
