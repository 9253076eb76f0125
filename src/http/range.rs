//! HTTP Range header resolution
//!
//! Single-range `bytes=` parsing per RFC 7233. Multi-range and non-byte
//! units are ignored and answered with the full representation.

/// Resolved byte range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range.
    pub const fn byte_count(self) -> u64 {
        self.end - self.start + 1
    }
}

/// Outcome of resolving a Range header against a known file size.
#[derive(Debug)]
pub enum RangeOutcome {
    /// Serve 206 with this slice
    Satisfiable(ByteRange),
    /// Serve 416 with `Content-Range: bytes */size`
    Unsatisfiable,
    /// No header, malformed header or multi-range: serve the full file
    Ignored,
}

/// Resolve a Range header value against the file size.
///
/// Supported forms: `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
pub fn resolve(header: Option<&str>, size: u64) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Ignored;
    };
    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }
    let Some((start_part, end_part)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_part, end_part) = (start_part.trim(), end_part.trim());

    if start_part.is_empty() {
        return resolve_suffix(end_part, size);
    }

    let Ok(start) = start_part.parse::<u64>() else {
        return RangeOutcome::Ignored;
    };
    if start >= size {
        return RangeOutcome::Unsatisfiable;
    }
    let end = if end_part.is_empty() {
        size - 1
    } else {
        let Ok(end) = end_part.parse::<u64>() else {
            return RangeOutcome::Ignored;
        };
        if end < start {
            return RangeOutcome::Unsatisfiable;
        }
        end.min(size - 1)
    };
    RangeOutcome::Satisfiable(ByteRange { start, end })
}

/// `bytes=-suffix`: the last `suffix` bytes of the file.
fn resolve_suffix(suffix_part: &str, size: u64) -> RangeOutcome {
    let Ok(suffix) = suffix_part.parse::<u64>() else {
        return RangeOutcome::Ignored;
    };
    if suffix == 0 || size == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Satisfiable(ByteRange {
        start: size.saturating_sub(suffix),
        end: size - 1,
    })
}
