//! HTTP cache control module
//!
//! Picks the cache policy of a response from the requested path's extension,
//! writes the matching header set, and handles `If-Modified-Since`
//! revalidation.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use std::time::SystemTime;

/// Extensions served with a public cache policy unless configured otherwise
pub const DEFAULT_CACHEABLE_EXTENSIONS: [&str; 3] = [".js", ".css", ".svg"];

/// Lifetime (seconds) of cacheable responses unless configured otherwise
pub const DEFAULT_MAX_AGE: u32 = 3600;

const NO_CACHE_DIRECTIVES: &str = "no-cache, no-store, must-revalidate";

/// IMF-fixdate, the preferred HTTP date format
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Cache control policy attached to every response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Cacheable { max_age: u32 },
    /// Must not be stored or reused without revalidation
    NoCache,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Cacheable { max_age } => format!("public, max-age={max_age}"),
            Self::NoCache => NO_CACHE_DIRECTIVES.to_string(),
        }
    }

    /// Short name used in access logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cacheable { .. } => "cacheable",
            Self::NoCache => "no-cache",
        }
    }

    /// Write this policy's headers into a prepared header block
    ///
    /// Replaces whatever cache headers were already present, so each header
    /// of the policy appears exactly once. A cacheable policy never carries
    /// `Pragma` or `Expires`.
    pub fn apply(self, headers: &mut HeaderMap) {
        match self {
            Self::Cacheable { .. } => {
                match HeaderValue::from_str(&self.to_header_value()) {
                    Ok(value) => {
                        headers.insert(CACHE_CONTROL, value);
                    }
                    Err(e) => {
                        crate::logger::log_error(&format!("Invalid Cache-Control value: {e}"));
                    }
                }
                headers.remove(PRAGMA);
                headers.remove(EXPIRES);
            }
            Self::NoCache => {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_DIRECTIVES));
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(EXPIRES, HeaderValue::from_static("0"));
            }
        }
    }
}

/// Extension table deciding which responses may be cached
#[derive(Debug, Clone)]
pub struct CacheRules {
    extensions: Vec<String>,
    max_age: u32,
    case_insensitive: bool,
}

impl CacheRules {
    /// Build the table; entries given without a leading dot get one
    pub fn new<I, S>(extensions: I, max_age: u32, case_insensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref();
                let ext = if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{ext}")
                };
                if case_insensitive {
                    ext.to_ascii_lowercase()
                } else {
                    ext
                }
            })
            .collect();

        Self {
            extensions,
            max_age,
            case_insensitive,
        }
    }

    /// Select the policy for an extension (leading dot included, or empty)
    ///
    /// Unknown and empty extensions fall back to [`CachePolicy::NoCache`].
    pub fn select(&self, extension: &str) -> CachePolicy {
        if self.is_cacheable(extension) {
            CachePolicy::Cacheable {
                max_age: self.max_age,
            }
        } else {
            CachePolicy::NoCache
        }
    }

    fn is_cacheable(&self, extension: &str) -> bool {
        if extension.is_empty() {
            return false;
        }
        if self.case_insensitive {
            self.extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(extension))
        } else {
            self.extensions.iter().any(|ext| ext == extension)
        }
    }
}

impl Default for CacheRules {
    fn default() -> Self {
        Self::new(DEFAULT_CACHEABLE_EXTENSIONS, DEFAULT_MAX_AGE, false)
    }
}

/// Extension of the final component of a `/`-separated path
///
/// Leading dots of the component do not start an extension, so `.bashrc`
/// has none while `archive.tar.gz` yields `.gz`.
pub fn extension_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem_start = name.len() - name.trim_start_matches('.').len();
    name[stem_start..]
        .rfind('.')
        .map_or("", |dot| &name[stem_start + dot..])
}

/// Format a timestamp as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Check whether the client's cached copy is still fresh
///
/// `If-Modified-Since` is ignored when `If-None-Match` is present or when the
/// date cannot be parsed. Modification times compare at second precision.
///
/// # Returns
/// Returns true if the response should be 304 Not Modified
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(since.trim()) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}
