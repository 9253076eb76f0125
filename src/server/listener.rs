// Listener construction
// Builds the TCP listener through socket2 so SO_REUSEADDR is set before bind.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create a bound, nonblocking `TcpListener` ready for the accept loop.
///
/// `SO_REUSEADDR` allows rebinding the fixed port while a previous instance's
/// sockets sit in TIME_WAIT, which happens constantly when restarting a local
/// dev server. A bind failure (port taken, insufficient permission) is a
/// fatal startup error surfaced to the caller.
pub fn bind(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Nonblocking before handing the fd to tokio
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
