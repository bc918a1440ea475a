//! TCP listener binding with bounded port fallback.
//!
//! Free-tier hosts sometimes leave a previous instance holding the port
//! during redeploys; binding retries on the next integer port instead of
//! failing outright, and gives up past 65535.

use std::io;

use tokio::net::TcpListener;

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("no available port at or above {0}, giving up")]
    PortsExhausted(u16),
    #[error("failed to bind {addr}: {source}")]
    Io { addr: String, source: io::Error },
}

/// Bind `host:port`, stepping to the next port on an address-in-use error.
pub async fn bind_with_fallback(host: &str, port: u16) -> Result<TcpListener, BindError> {
    let requested = port;
    let mut port = port;
    loop {
        let addr = format!("{}:{}", host, port);
        match TcpListener::bind(&addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => match port.checked_add(1) {
                Some(next) => {
                    tracing::warn!("Port {} is busy, trying {}...", port, next);
                    port = next;
                }
                None => return Err(BindError::PortsExhausted(requested)),
            },
            Err(e) => return Err(BindError::Io { addr, source: e }),
        }
    }
}
