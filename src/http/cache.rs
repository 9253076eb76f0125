//! Conditional request handling
//!
//! `ETag` generation with `If-None-Match` matching, plus `Last-Modified`
//! formatting and `If-Modified-Since` comparison at whole-second granularity.

use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// Generate a quoted `ETag` from file content.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let digest = hasher.finish();
    format!("\"{digest:x}\"")
}

/// Whether the client's `If-None-Match` header matches the computed `ETag`.
///
/// Handles comma-separated lists and the `*` wildcard.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etags| {
        client_etags
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Format a filesystem mtime as an HTTP date (RFC 7231 IMF-fixdate).
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Whether the file is unmodified relative to `If-Modified-Since`.
///
/// Unparseable header values never match; HTTP dates carry no sub-second
/// precision, so the comparison truncates the mtime to seconds.
pub fn unmodified_since(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(header) = if_modified_since else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(header) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_etag_shape_and_consistency() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"other content"));
    }

    #[test]
    fn test_etag_matching() {
        let etag = "\"abc123\"";
        assert!(etag_matches(Some("\"abc123\""), etag));
        assert!(etag_matches(Some("\"xyz\", \"abc123\""), etag));
        assert!(etag_matches(Some("*"), etag));
        assert!(!etag_matches(Some("\"different\""), etag));
        assert!(!etag_matches(None, etag));
    }

    #[test]
    fn test_format_http_date() {
        let date = format_http_date(SystemTime::UNIX_EPOCH);
        assert_eq!(date, "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn test_unmodified_since_round_trip() {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let header = format_http_date(mtime);
        assert!(unmodified_since(Some(&header), mtime));
        // A later mtime is modified relative to the old header
        assert!(!unmodified_since(
            Some(&header),
            mtime + Duration::from_secs(60)
        ));
        // Sub-second mtime changes compare equal
        assert!(unmodified_since(
            Some(&header),
            mtime + Duration::from_millis(300)
        ));
    }

    #[test]
    fn test_unmodified_since_rejects_garbage() {
        let mtime = SystemTime::UNIX_EPOCH;
        assert!(!unmodified_since(Some("not a date"), mtime));
        assert!(!unmodified_since(None, mtime));
    }
}
