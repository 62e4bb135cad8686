//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Content-Type used when the extension is unknown
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type for an extension as produced by
/// [`extension_of`](crate::http::cache::extension_of) (leading dot included)
///
/// The exact extension is tried first, then its lowercase form.
///
/// # Examples
/// ```
/// use cachebox::http::mime::content_type_for;
/// assert_eq!(content_type_for(".html"), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(".PNG"), "image/png");
/// assert_eq!(content_type_for(""), "application/octet-stream");
/// ```
pub fn content_type_for(extension: &str) -> &'static str {
    let Some(ext) = extension.strip_prefix('.') else {
        return DEFAULT_CONTENT_TYPE;
    };
    lookup(ext)
        .or_else(|| lookup(&ext.to_ascii_lowercase()))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

fn lookup(ext: &str) -> Option<&'static str> {
    let content_type = match ext {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "application/xml",

        // Scripts
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Media
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}
