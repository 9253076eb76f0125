//! HTTP response building module
//!
//! Builders for every status code the server emits. The isolation headers are
//! not set here; they are injected once at the handler exit so that no
//! response path can miss them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http::range::ByteRange;

/// Build 200 OK response for a fully served file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag);
    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    last_modified: Option<&str>,
    range: ByteRange,
    total_size: u64,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", range.byte_count())
        .header(
            "Content-Range",
            format!("bytes {}-{}/{total_size}", range.start, range.end),
        )
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag);
    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 200 OK response for a generated directory listing page
pub fn build_listing_response(html: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = html.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(html) };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect (directory request without trailing slash)
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Moved Permanently")))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("Range Not Satisfiable")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/plain"
        );
    }

    #[test]
    fn test_405_allows_get_and_head() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allow").unwrap(), "GET, HEAD");
    }

    #[test]
    fn test_file_response_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"hello"),
            "text/plain; charset=utf-8",
            "\"etag\"",
            Some("Thu, 01 Jan 1970 00:00:00 GMT"),
            false,
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "5");
        assert_eq!(resp.headers().get("Accept-Ranges").unwrap(), "bytes");
        assert_eq!(
            resp.headers().get("Last-Modified").unwrap(),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_head_keeps_content_length() {
        let resp = build_file_response(
            Bytes::from_static(b"hello"),
            "text/plain",
            "\"etag\"",
            None,
            true,
        );
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "5");
    }

    #[test]
    fn test_partial_response_content_range() {
        let resp = build_partial_response(
            Bytes::from_static(b"bcd"),
            "application/octet-stream",
            "\"etag\"",
            Some("Thu, 01 Jan 1970 00:00:00 GMT"),
            ByteRange { start: 1, end: 3 },
            10,
            false,
        );
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers().get("Content-Range").unwrap(), "bytes 1-3/10");
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "3");
        assert_eq!(
            resp.headers().get("Last-Modified").unwrap(),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_416_content_range() {
        let resp = build_416_response(42);
        assert_eq!(resp.status(), 416);
        assert_eq!(resp.headers().get("Content-Range").unwrap(), "bytes */42");
    }

    #[test]
    fn test_redirect_location() {
        let resp = build_redirect_response("/subdir/");
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers().get("Location").unwrap(), "/subdir/");
    }
}
