//! MIME type registry
//!
//! Maps file extensions to Content-Type values. The registry is built once at
//! startup (built-in table plus explicit overrides such as `wasm`) and is
//! never mutated once the server starts accepting connections.

use std::collections::HashMap;
use std::fmt;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Rejected MIME registration.
#[derive(Debug, PartialEq, Eq)]
pub enum MimeError {
    /// Extension is empty or contains non-alphanumeric characters
    InvalidExtension(String),
    /// Media type is not of the form `type/subtype`
    InvalidMediaType(String),
}

impl fmt::Display for MimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidExtension(ext) => write!(f, "invalid file extension: '{ext}'"),
            Self::InvalidMediaType(media) => write!(f, "invalid media type: '{media}'"),
        }
    }
}

impl std::error::Error for MimeError {}

/// Extension to Content-Type mapping with explicit overrides.
///
/// Overrides take precedence over the built-in table, so registering an
/// extension replaces any prior mapping for it.
#[derive(Debug, Default)]
pub struct MimeRegistry {
    overrides: HashMap<String, String>,
}

impl MimeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a media type for an extension (strict).
    ///
    /// The extension must be non-empty ASCII alphanumeric without the leading
    /// dot, and the media type must be `type/subtype`. Registration failures
    /// are treated as fatal at startup.
    pub fn register(&mut self, extension: &str, media_type: &str) -> Result<(), MimeError> {
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MimeError::InvalidExtension(extension.to_string()));
        }
        let valid_media = media_type
            .split_once('/')
            .is_some_and(|(kind, subtype)| !kind.is_empty() && !subtype.is_empty());
        if !valid_media {
            return Err(MimeError::InvalidMediaType(media_type.to_string()));
        }
        self.overrides
            .insert(extension.to_ascii_lowercase(), media_type.to_string());
        Ok(())
    }

    /// Resolve the Content-Type for a file extension.
    pub fn content_type(&self, extension: Option<&str>) -> &str {
        let Some(ext) = extension else {
            return DEFAULT_CONTENT_TYPE;
        };
        let ext = ext.to_ascii_lowercase();
        match self.overrides.get(&ext) {
            Some(media_type) => media_type,
            None => builtin_content_type(&ext),
        }
    }
}

/// Built-in extension table (lowercase input expected)
fn builtin_content_type(extension: &str) -> &'static str {
    match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",

        // JavaScript
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => DEFAULT_CONTENT_TYPE,
    }
}
