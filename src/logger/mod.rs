//! Logger module
//!
//! Access logging in Common Log Format plus lifecycle and error logging.
//! Access lines go to stdout, diagnostics to stderr.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use std::path::Path;

pub fn log_server_start(addr: &SocketAddr, document_root: &Path) {
    println!("Serving {} on http://{addr}/", document_root.display());
    println!("Cross-origin isolation headers enabled (COOP/COEP)");
    println!("Press Ctrl+C to stop\n");
}

/// One line per handled request
pub fn log_access(entry: &AccessLogEntry) {
    println!("{}", entry.format_common());
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] failed to serve connection: {err:?}");
}

pub fn log_signal(name: &str) {
    println!("\n{name} received, shutting down");
}
