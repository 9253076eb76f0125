//! Access log formatting
//!
//! Renders request/response information as Common Log Format (CLF) lines,
//! the same shape most HTTP servers print per request.

use chrono::{DateTime, Local};

/// Access log entry for a single handled request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    /// Time the response was produced
    pub time: DateTime<Local>,
    /// HTTP method
    pub method: String,
    /// Request URI path
    pub path: String,
    /// HTTP version label ("1.0", "1.1", ...)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
}

impl AccessLogEntry {
    pub fn new(
        remote_addr: String,
        method: String,
        path: String,
        http_version: String,
        status: u16,
        body_bytes: u64,
    ) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            http_version,
            status,
            body_bytes,
        }
    }

    /// Common Log Format
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    pub fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }
}
