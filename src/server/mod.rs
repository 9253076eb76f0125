//! Server module
//!
//! Listener construction, fixed server settings and shutdown signal handling.

pub mod listener;
pub mod signal;

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::http::mime::MimeRegistry;

/// Fixed port the server listens on
pub const PORT: u16 = 8992;

/// Server settings resolved at startup.
///
/// There is deliberately no CLI, environment or file configuration: the
/// server always exposes the process's working directory on the fixed port,
/// bound on all interfaces like the reference development server.
#[derive(Debug)]
pub struct ServerSettings {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub document_root: PathBuf,
}

impl ServerSettings {
    /// Resolve settings against the current working directory.
    ///
    /// The document root is canonicalized once here; the request path guard
    /// in the handler relies on it being an absolute, symlink-free path.
    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: PORT,
            document_root: std::env::current_dir()?.canonicalize()?,
        })
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Shared immutable state handed to every request.
///
/// Built before the listener starts accepting and never mutated afterwards,
/// so no locking is needed.
#[derive(Debug)]
pub struct ServerState {
    pub document_root: PathBuf,
    pub mime: MimeRegistry,
}

impl ServerState {
    pub fn new(settings: &ServerSettings, mime: MimeRegistry) -> Self {
        Self {
            document_root: settings.document_root.clone(),
            mime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_bind_all_interfaces_on_fixed_port() {
        let settings = ServerSettings::from_current_dir().unwrap();
        let addr = settings.socket_addr();
        assert_eq!(addr.port(), 8992);
        assert!(addr.ip().is_unspecified());
        assert!(settings.document_root.is_absolute());
    }
}
