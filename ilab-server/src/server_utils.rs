//! Listener setup and shutdown signalling for `serve`.

use anyhow::{Context, Result};
use listenfd::ListenFd;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::net::TcpListener;
use tracing::info;

const LISTEN_BACKLOG: i32 = 1024;

/// Socket handed over by systemd if present, otherwise a fresh bind on `host:port`.
pub fn create_listener(host: &str, port: u16) -> Result<TcpListener> {
    if let Some(listener) = ListenFd::from_env().take_tcp_listener(0)? {
        info!("🔌 Using systemd socket activation (fd=3)");
        listener.set_nonblocking(true)?;
        return Ok(TcpListener::from_std(listener)?);
    }

    let addr = resolve(host, port)?;
    let listener = bind(addr).with_context(|| format!("Failed to bind {addr}"))?;
    info!("🔌 Bound to {}", addr);
    Ok(listener)
}

/// First address `host` resolves to; accepts IPs and hostnames such as `localhost`.
fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", host, e))?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Invalid bind address '{}': no addresses", host))
}

fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(TcpListener::from_std(socket.into())?)
}

/// Resolves on Ctrl+C or SIGTERM.
#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler").recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let source = tokio::select! {
        () = ctrl_c => "Ctrl+C",
        () = terminate => "SIGTERM",
    };
    info!("🛑 Received {}, draining in-flight requests...", source);
}
