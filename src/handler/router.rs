//! Request dispatch module
//!
//! Entry point for HTTP request processing: builds the per-request context,
//! delegates to static file serving, then finalizes response headers with the
//! cache policy selected for the requested path.

use crate::config::AppState;
use crate::handler::path::{translate_path, TranslatedPath};
use crate::handler::static_files;
use crate::http::{self, CachePolicy};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT,
};
use hyper::{Method, Request, Response, Version};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context: per-request state used to serve the path and pick its
/// cache policy. Never shared between requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Request path as sent, without query
    pub url_path: String,
    pub query: Option<String>,
    pub translated: TranslatedPath,
    pub policy: CachePolicy,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl RequestContext {
    pub fn new<B>(req: &Request<B>, state: &AppState) -> Self {
        let uri = req.uri();
        let translated = translate_path(&state.root, uri.path());
        let policy = state.cache_rules.select(translated.extension());

        Self {
            method: req.method().clone(),
            url_path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            translated,
            policy,
            is_head: *req.method() == Method::HEAD,
            if_modified_since: req
                .headers()
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: req.headers().contains_key(IF_NONE_MATCH),
        }
    }

    /// Decoded request path for display in listings
    pub fn display_path(&self) -> String {
        percent_decode_str(&self.url_path)
            .decode_utf8_lossy()
            .into_owned()
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::new(&req, &state);
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| new_access_entry(&req, peer_addr));
    drop(req);

    // 1. Default static serving: status, body and standard headers
    let mut response = match ctx.method {
        Method::GET | Method::HEAD => {
            static_files::serve(&ctx, &state.config.http.index_files).await
        }
        ref method => {
            logger::log_debug(&format!("Unsupported method: {method}"));
            http::build_501_response(method.as_str())
        }
    };

    // 2. Finalize headers before hyper transmits them
    finalize_headers(&mut response, &ctx, &state.config.http.server_name);

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or_default();
        entry.cache_policy = ctx.policy.name();
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Append the headers every response carries, ending with the cache policy
///
/// Runs after the static layer prepared its own headers, for every status.
pub fn finalize_headers<B>(
    response: &mut Response<B>,
    ctx: &RequestContext,
    server_name: &str,
) {
    let headers = response.headers_mut();
    if let Ok(server) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, server);
    }
    ctx.policy.apply(headers);
}

fn new_access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_value(req, REFERER);
    entry.user_agent = header_value(req, USER_AGENT);
    entry
}

fn header_value<B>(req: &Request<B>, name: HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
