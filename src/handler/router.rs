//! Request entry point
//!
//! Validates the method, extracts the conditional/range headers, dispatches
//! to the static file handler and finalizes the response. Finalization is the
//! single place the cross-origin isolation headers are injected, so every
//! response (200, 206, 301, 304, 404, 405, 416) carries them.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};

use crate::http::{isolation, response};
use crate::logger::{self, AccessLogEntry};
use crate::server::ServerState;

/// Per-request information the static file handler needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let version = version_label(req.version());

    let mut response = dispatch(&req, &state).await;
    isolation::apply(response.headers_mut());

    let body_bytes = response.body().size_hint().exact().unwrap_or(0);
    logger::log_access(&AccessLogEntry::new(
        peer_addr.to_string(),
        method,
        path,
        version,
        response.status().as_u16(),
        body_bytes,
    ));

    Ok(response)
}

async fn dispatch<B>(req: &Request<B>, state: &ServerState) -> Response<Full<Bytes>> {
    match *req.method() {
        Method::GET | Method::HEAD => {}
        _ => {
            logger::log_warning(&format!("method not allowed: {}", req.method()));
            return response::build_405_response();
        }
    }

    let headers = req.headers();
    let header_string = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *req.method() == Method::HEAD,
        if_none_match: header_string("if-none-match"),
        if_modified_since: header_string("if-modified-since"),
        range_header: header_string("range"),
    };

    super::static_files::serve(&ctx, state).await
}

fn version_label(version: Version) -> String {
    let label = if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else if version == Version::HTTP_09 {
        "0.9"
    } else {
        "1.1"
    };
    label.to_string()
}
