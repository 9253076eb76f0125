//! coiserve: serve the current directory over HTTP with the cross-origin
//! isolation headers (COOP/COEP) that browsers require before enabling
//! `SharedArrayBuffer`, and with `.wasm` files typed as `application/wasm`.
//!
//! No flags, no configuration: run it in the directory to serve.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

mod handler;
mod http;
mod logger;
mod server;

use crate::http::mime::MimeRegistry;
use crate::server::signal::{self, ShutdownSignal};
use crate::server::{listener, ServerSettings, ServerState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ServerSettings::from_current_dir()?;

    // MIME registration happens strictly before the listener is bound;
    // a rejected registration is a fatal startup error.
    let mut mime = MimeRegistry::new();
    mime.register("wasm", "application/wasm")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(settings, mime))
}

async fn async_main(
    settings: ServerSettings,
    mime: MimeRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings.socket_addr();
    let tcp_listener = listener::bind(addr)?;
    let state = Arc::new(ServerState::new(&settings, mime));

    let shutdown = Arc::new(ShutdownSignal::new());
    signal::start_signal_handler(Arc::clone(&shutdown));

    logger::log_server_start(&addr, &state.document_root);
    run_accept_loop(tcp_listener, state, shutdown).await;
    Ok(())
}

/// Accept connections until shutdown is requested.
///
/// Accept errors are logged and the loop keeps serving; a clean shutdown
/// returns so the process exits 0.
async fn run_accept_loop(
    tcp_listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: Arc<ShutdownSignal>,
) {
    loop {
        tokio::select! {
            accepted = tcp_listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => logger::log_error(&format!("failed to accept connection: {e}")),
                }
            }
            () = shutdown.wait() => return,
        }
    }
}

/// Serve one HTTP/1.1 connection in a spawned task.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<ServerState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, peer_addr, state).await }
            }),
        );
        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
