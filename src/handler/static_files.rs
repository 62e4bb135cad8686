//! Static file serving module
//!
//! Produces the status, body and standard headers of a response from the
//! filesystem: files, index files, directory listings, redirects and errors.

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve the translated path of `ctx`
pub async fn serve(ctx: &RequestContext, index_files: &[String]) -> Response<Full<Bytes>> {
    let path = &ctx.translated.fs_path;
    let is_dir = fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir());

    if is_dir {
        // Relative links in the page only resolve against a trailing slash
        if !ctx.url_path.ends_with('/') {
            return http::build_redirect_response(&directory_location(ctx));
        }
        return match find_index_file(path, index_files).await {
            Some(index) => serve_file(ctx, &index).await,
            None => serve_listing(ctx, path).await,
        };
    }

    if ctx.translated.trailing_slash {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, path).await
}

/// Serve a single regular file
pub async fn serve_file(ctx: &RequestContext, path: &Path) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return http::build_404_response(ctx.is_head),
        Err(e) => return open_error_response(ctx, path, &e),
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(last_modified)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response(last_modified);
        }
    }

    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let content_type = mime::content_type_for(cache::extension_of(&name));

    if ctx.is_head {
        return http::build_file_response(
            Bytes::new(),
            metadata.len(),
            content_type,
            last_modified.as_deref(),
        );
    }

    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return open_error_response(ctx, path, &e);
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                path.display(),
                e
            ));
            return http::build_500_response(ctx.is_head);
        }
    };

    let content_length = content.len() as u64;
    http::build_file_response(
        Bytes::from(content),
        content_length,
        content_type,
        last_modified.as_deref(),
    )
}

/// First configured index file present in `dir`
async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate)
            .await
            .is_ok_and(|metadata| metadata.is_file())
        {
            return Some(candidate);
        }
    }
    None
}

async fn serve_listing(ctx: &RequestContext, dir: &Path) -> Response<Full<Bytes>> {
    match listing::read_entries(dir).await {
        Ok(entries) => {
            let html = listing::render(&ctx.display_path(), &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot list directory '{}': {}",
                dir.display(),
                e
            ));
            http::build_error_response(
                StatusCode::NOT_FOUND,
                "No permission to list directory",
                ctx.is_head,
            )
        }
    }
}

/// Redirect target for a directory requested without trailing slash
fn directory_location(ctx: &RequestContext) -> String {
    match &ctx.query {
        Some(query) => format!("{}/?{}", ctx.url_path, query),
        None => format!("{}/", ctx.url_path),
    }
}

fn open_error_response(
    ctx: &RequestContext,
    path: &Path,
    error: &io::Error,
) -> Response<Full<Bytes>> {
    if error.kind() == io::ErrorKind::PermissionDenied {
        logger::log_warning(&format!(
            "Permission denied for '{}'",
            path.display()
        ));
        return http::build_403_response(ctx.is_head);
    }
    // Missing files are routine, keep them out of the error log
    logger::log_debug(&format!("Not found '{}': {}", path.display(), error));
    http::build_404_response(ctx.is_head)
}
