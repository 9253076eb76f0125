// Signal handling
//
// SIGTERM and SIGINT (Ctrl+C) both request a clean shutdown; the accept loop
// observes the signal and returns Ok so the process exits 0.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shutdown request shared between the signal task and the accept loop.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    notify: Notify,
    requested: AtomicBool,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so a waiter that has not polled yet
        // still observes the request
        self.notify.notify_one();
    }

    /// Wait until shutdown is requested; returns immediately if it already was.
    pub async fn wait(&self) {
        if self.requested.load(Ordering::SeqCst) {
            return;
        }
        self.notify.notified().await;
    }
}

/// Spawn the background task that listens for termination signals (Unix).
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<ShutdownSignal>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => crate::logger::log_signal("SIGTERM"),
            _ = sigint.recv() => crate::logger::log_signal("SIGINT"),
        }
        shutdown.request();
    });
}

/// Windows fallback: only Ctrl+C is supported.
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<ShutdownSignal>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            crate::logger::log_signal("Ctrl+C");
            shutdown.request();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_returns_after_request() {
        let shutdown = Arc::new(ShutdownSignal::new());

        let waiter = {
            let shutdown = Arc::clone(&shutdown);
            tokio::spawn(async move { shutdown.wait().await })
        };
        shutdown.request();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_after_request_is_immediate() {
        let shutdown = ShutdownSignal::new();
        shutdown.request();
        shutdown.wait().await;
    }
}
