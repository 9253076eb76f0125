//! Static file serving
//!
//! Resolves request paths under the document root, serves files with
//! conditional and range support, redirects bare directory paths and
//! generates directory listing pages where no index file exists.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{cache, range, response};
use crate::logger;
use crate::server::ServerState;

const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Characters percent-encoded in listing hrefs; '/' is kept for directories.
const HREF_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\'')
    .add(b'`');

/// Serve a GET/HEAD request from the document root.
pub async fn serve(ctx: &RequestContext<'_>, state: &ServerState) -> Response<Full<Bytes>> {
    let Some(decoded) = decode_path(ctx.path) else {
        return response::build_404_response();
    };

    let Some(relative) = sanitized_relative(&decoded) else {
        logger::log_warning(&format!("path traversal attempt blocked: {}", ctx.path));
        return response::build_404_response();
    };

    // Canonicalize resolves symlinks and fails on nonexistent paths; anything
    // escaping the (canonical) root is refused without disclosing why.
    let Ok(resolved) = state.document_root.join(&relative).canonicalize() else {
        return response::build_404_response();
    };
    if !resolved.starts_with(&state.document_root) {
        logger::log_warning(&format!(
            "path escapes document root, refused: {} -> {}",
            ctx.path,
            resolved.display()
        ));
        return response::build_404_response();
    }

    let metadata = match fs::metadata(&resolved).await {
        Ok(m) => m,
        Err(_) => return response::build_404_response(),
    };

    if metadata.is_dir() {
        // Directory URLs get a canonical trailing slash first, so relative
        // links inside index pages and listings resolve correctly.
        if !ctx.path.ends_with('/') {
            return response::build_redirect_response(&format!("{}/", ctx.path));
        }
        for index in INDEX_FILES {
            let candidate = resolved.join(index);
            if fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return serve_file(ctx, &candidate, state).await;
            }
        }
        return serve_listing(ctx, &resolved, &decoded).await;
    }

    serve_file(ctx, &resolved, state).await
}

/// Percent-decode the URI path; undecodable or NUL-bearing paths are refused.
fn decode_path(path: &str) -> Option<String> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded.into_owned())
}

/// Reduce a decoded request path to a root-relative path.
///
/// Parent components are rejected outright rather than normalized away, so
/// `..` never takes part in filesystem resolution.
fn sanitized_relative(path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

/// Read a file and build the response, honoring conditional and range headers.
async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    state: &ServerState,
) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) => {
            logger::log_error(&format!("failed to read '{}': {e}", path.display()));
            return response::build_404_response();
        }
    };
    let modified = fs::metadata(path).await.ok().and_then(|m| m.modified().ok());
    let content_type = state
        .mime
        .content_type(path.extension().and_then(|e| e.to_str()));

    build_file_response(ctx, content, content_type, modified)
}

#[allow(clippy::cast_possible_truncation)]
fn build_file_response(
    ctx: &RequestContext<'_>,
    content: Vec<u8>,
    content_type: &str,
    modified: Option<SystemTime>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);

    // If-None-Match takes precedence over If-Modified-Since (RFC 7232)
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return response::build_304_response(&etag);
    }
    if ctx.if_none_match.is_none() {
        if let Some(mtime) = modified {
            if cache::unmodified_since(ctx.if_modified_since.as_deref(), mtime) {
                return response::build_304_response(&etag);
            }
        }
    }

    let last_modified = modified.map(cache::format_http_date);
    let total_size = content.len() as u64;
    let full = Bytes::from(content);

    match range::resolve(ctx.range_header.as_deref(), total_size) {
        range::RangeOutcome::Satisfiable(byte_range) => {
            let slice = full.slice(byte_range.start as usize..=byte_range.end as usize);
            response::build_partial_response(
                slice,
                content_type,
                &etag,
                last_modified.as_deref(),
                byte_range,
                total_size,
                ctx.is_head,
            )
        }
        range::RangeOutcome::Unsatisfiable => response::build_416_response(total_size),
        range::RangeOutcome::Ignored => response::build_file_response(
            full,
            content_type,
            &etag,
            last_modified.as_deref(),
            ctx.is_head,
        ),
    }
}

/// Generate and serve the directory listing page.
async fn serve_listing(
    ctx: &RequestContext<'_>,
    dir: &Path,
    request_path: &str,
) -> Response<Full<Bytes>> {
    match render_listing(dir, request_path).await {
        Ok(html) => response::build_listing_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("failed to list '{}': {e}", dir.display()));
            response::build_404_response()
        }
    }
}

/// Render the listing HTML: sorted entries, trailing slash on directories,
/// escaped names and percent-encoded hrefs.
async fn render_listing(dir: &Path, request_path: &str) -> std::io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        if is_dir {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let title = escape_html(&format!("Directory listing for {request_path}"));
    let mut html = String::with_capacity(512 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for name in &entries {
        let href = utf8_percent_encode(name, HREF_ENCODE).to_string();
        html.push_str(&format!(
            "<li><a href=\"{href}\">{}</a></li>\n",
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/plain.txt"), Some("/plain.txt".to_string()));
        assert_eq!(
            decode_path("/with%20space.txt"),
            Some("/with space.txt".to_string())
        );
        assert_eq!(decode_path("/%00"), None);
        assert_eq!(decode_path("/%ff%fe"), None);
    }

    #[test]
    fn test_sanitized_relative_plain_paths() {
        assert_eq!(
            sanitized_relative("/a/b/c.txt"),
            Some(PathBuf::from("a/b/c.txt"))
        );
        assert_eq!(sanitized_relative("/"), Some(PathBuf::new()));
        assert_eq!(sanitized_relative("/./a"), Some(PathBuf::from("a")));
    }

    #[test]
    fn test_sanitized_relative_rejects_parent_components() {
        assert_eq!(sanitized_relative("/../etc/passwd"), None);
        assert_eq!(sanitized_relative("/a/../../b"), None);
        assert_eq!(sanitized_relative("/../../../../etc/passwd"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>\"a\" & b</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; b&lt;/script&gt;"
        );
    }

    #[tokio::test]
    async fn test_render_listing_marks_directories() {
        let dir = std::env::temp_dir().join(format!("coiserve-listing-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("a.txt"), b"x").unwrap();

        let html = render_listing(&dir, "/").await.unwrap();
        assert!(html.contains("Directory listing for /"));
        assert!(html.contains("<a href=\"a.txt\">a.txt</a>"));
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));
    }

    #[tokio::test]
    async fn test_render_listing_escapes_names() {
        let dir =
            std::env::temp_dir().join(format!("coiserve-listing-esc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a b<c>.txt"), b"x").unwrap();

        let html = render_listing(&dir, "/").await.unwrap();
        assert!(html.contains("href=\"a%20b%3Cc%3E.txt\""));
        assert!(html.contains(">a b&lt;c&gt;.txt</a>"));
    }

    #[tokio::test]
    async fn test_render_listing_encodes_ampersand_in_href() {
        let dir =
            std::env::temp_dir().join(format!("coiserve-listing-amp-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a&b.txt"), b"x").unwrap();

        let html = render_listing(&dir, "/").await.unwrap();
        assert!(html.contains("href=\"a%26b.txt\""));
        assert!(html.contains(">a&amp;b.txt</a>"));
    }
}
