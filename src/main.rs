//! Solodns
//!
//! A single-domain authoritative DNS responder: one domain, one IPv4
//! address, silence for everything else.
#![allow(dead_code)]

use log::info;
use tokio::signal;

use solodns::{config::ServerConfig, errors::DnsError, handlers::run_udp_server};

#[tokio::main]
async fn main() -> Result<(), DnsError> {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    // Load configuration from environment variables
    let config = ServerConfig::from_env()?;

    // Set up shutdown signal handler
    let shutdown_signal = async {
        signal::ctrl_c()
            .await
            .expect("Failed to listen for shutdown signal");
        info!("Shutdown signal received");
    };

    let udp_server = run_udp_server(config);

    // Wait for either a shutdown signal or a server error. In-flight
    // handlers are not joined; the process exits with the socket.
    tokio::select! {
        _ = shutdown_signal => {
            info!("DNS responder stopped");
            Ok(())
        },
        res = udp_server => res,
    }
}
