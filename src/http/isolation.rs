//! Cross-origin isolation headers
//!
//! Browsers only enable `SharedArrayBuffer` and related high-resolution APIs
//! on cross-origin isolated pages, which requires these two response headers.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

pub const EMBEDDER_POLICY: &str = "cross-origin-embedder-policy";
pub const EMBEDDER_POLICY_VALUE: &str = "require-corp";
pub const OPENER_POLICY: &str = "cross-origin-opener-policy";
pub const OPENER_POLICY_VALUE: &str = "same-origin";

/// Insert both isolation headers into a response header map.
///
/// Called once per response, after routing and immediately before the
/// response is handed back to hyper, so every status code carries them.
pub fn apply(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static(EMBEDDER_POLICY),
        HeaderValue::from_static(EMBEDDER_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static(OPENER_POLICY),
        HeaderValue::from_static(OPENER_POLICY_VALUE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_inserts_both_headers() {
        let mut headers = HeaderMap::new();
        apply(&mut headers);
        assert_eq!(
            headers.get(EMBEDDER_POLICY).and_then(|v| v.to_str().ok()),
            Some("require-corp")
        );
        assert_eq!(
            headers.get(OPENER_POLICY).and_then(|v| v.to_str().ok()),
            Some("same-origin")
        );
    }

    #[test]
    fn test_apply_overwrites_existing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(EMBEDDER_POLICY),
            HeaderValue::from_static("unsafe-none"),
        );
        apply(&mut headers);
        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get(EMBEDDER_POLICY).and_then(|v| v.to_str().ok()),
            Some("require-corp")
        );
    }
}
