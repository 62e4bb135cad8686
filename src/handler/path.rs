//! URL path translation module
//!
//! Maps a request target onto a location below the served root. Query and
//! fragment are dropped, the path is percent-decoded and normalized, and no
//! segment can climb out of the root.

use crate::http::cache::extension_of;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Request target translated to the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Location below the served root
    pub fs_path: PathBuf,
    /// Decoded, normalized segments joined with `/` (no leading slash)
    pub relative: String,
    /// Decoded URL path ended with `/`
    pub trailing_slash: bool,
}

impl TranslatedPath {
    /// Extension that decides the cache policy, empty for directory-style paths
    pub fn extension(&self) -> &str {
        if self.trailing_slash {
            ""
        } else {
            extension_of(&self.relative)
        }
    }
}

/// Translate a request target (path with optional query/fragment) under `root`
///
/// `..` removes the previous segment and is ignored at the root. Segments
/// that would not be a single plain path component on this platform are
/// dropped.
pub fn translate_path(root: &Path, target: &str) -> TranslatedPath {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let trailing_slash = decoded.trim_end().ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ if is_plain_segment(segment) => segments.push(segment),
            _ => {}
        }
    }

    let fs_path = segments
        .iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment));

    TranslatedPath {
        fs_path,
        relative: segments.join("/"),
        trailing_slash,
    }
}

fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
