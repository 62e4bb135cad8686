//! Request handler module
//!
//! Translates request paths, serves files from the configured root and
//! finalizes response headers with the cache policy.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
