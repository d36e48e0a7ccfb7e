//! TCP server for the problem protocol.
//!
//! Accepts connections and hands each one to its own task, which reads a
//! single request, answers it and closes. The accept loop never waits on
//! a connection.

use crate::config::Config;
use crate::handler::{handle_connection, ConnContext, ConnectionLog, HandlerOptions, TracingLog};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Server instance
pub struct Server {
    config: Config,
    log: Arc<dyn ConnectionLog>,
}

impl Server {
    /// Create a new server instance that logs through `tracing`
    pub fn new(config: Config) -> Self {
        Self::with_log(config, Arc::new(TracingLog))
    }

    /// Create a server with a custom connection log
    pub fn with_log(config: Config, log: Arc<dyn ConnectionLog>) -> Self {
        Server { config, log }
    }

    /// Bind the configured address and serve forever
    pub async fn run(&self) -> std::io::Result<()> {
        let (listener, _) = bind(&self.config.listen_addr()).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        let local = listener.local_addr()?;
        info!(address = %local, "Server listening");
        log_local_addresses();

        let options = HandlerOptions {
            report_errors: self.config.report_errors,
        };
        let mut connections: u64 = 0;

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    connections += 1;
                    let ctx = ConnContext {
                        id: connections,
                        peer: Some(peer),
                    };
                    let log = Arc::clone(&self.log);

                    tokio::spawn(async move {
                        handle_connection(stream, ctx, options, log.as_ref()).await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

/// Non-loopback IPv4 addresses of this host's interfaces
pub fn local_ipv4_addresses() -> std::io::Result<Vec<(String, Ipv4Addr)>> {
    let addresses = if_addrs::get_if_addrs()?
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .filter_map(|iface| match iface.ip() {
            IpAddr::V4(ip) => Some((iface.name, ip)),
            IpAddr::V6(_) => None,
        })
        .collect();
    Ok(addresses)
}

/// Log where clients on other hosts can reach the server
fn log_local_addresses() {
    match local_ipv4_addresses() {
        Ok(addresses) => {
            info!("Available network interfaces:");
            for (name, ip) in addresses {
                info!(interface = %name, %ip, "  - {}", ip);
            }
        }
        Err(e) => error!(error = %e, "Error getting local IPs"),
    }
}

/// Bind `addr`, returning the listener and the address actually bound
pub async fn bind(addr: &str) -> std::io::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    Ok((listener, local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            report_errors: false,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    #[test]
    fn test_local_addresses_skip_loopback() {
        let addresses = local_ipv4_addresses().unwrap();
        for (name, ip) in addresses {
            assert!(!ip.is_loopback(), "{} reported loopback {}", name, ip);
        }
    }

    #[tokio::test]
    async fn test_serves_one_request_per_connection() {
        let (listener, addr) = bind("127.0.0.1:0").await.unwrap();
        let server = Server::new(test_config());
        tokio::spawn(async move { server.serve(listener).await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"3\nhello\n").await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert_eq!(response, "olleh");
    }

    #[tokio::test]
    async fn test_silent_close_on_incomplete_request() {
        let (listener, addr) = bind("127.0.0.1:0").await.unwrap();
        let server = Server::new(test_config());
        tokio::spawn(async move { server.serve(listener).await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"4\nonly one line\n").await.unwrap();
        stream.shutdown().await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert!(response.is_empty());
    }
}
