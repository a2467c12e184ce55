//! Configuration for the bridge server.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;

/// Bridge server configuration, from command-line flags with environment
/// variable fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "bridge-server", version, about = "Configurator-to-allocator HTTP bridge")]
pub struct Config {
    /// IP address to bind to.
    #[arg(long, env = "BRIDGE_IP", default_value = "0.0.0.0")]
    pub ip: IpAddr,

    /// Port to listen on with the HTTP protocol.
    #[arg(long, env = "BRIDGE_HTTP_PORT", default_value_t = 4050)]
    pub http_port: u16,

    /// Number of worker threads. 0 uses the number of cores on this machine.
    #[arg(long, env = "BRIDGE_THREADS", default_value_t = 0)]
    pub threads: usize,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "BRIDGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// The socket address the HTTP front end binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.http_port)
    }

    /// Effective worker thread count, resolving 0 to the core count.
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    }
}
