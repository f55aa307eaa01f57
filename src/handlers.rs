//! Request handling for the DNS responder.
//!
//! This module owns the UDP receive loop and the per-query decision: answer
//! with the configured address, acknowledge without an answer, or stay
//! silent.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::{net::UdpSocket, task};

use crate::config::{ServerConfig, MAX_PACKET_SIZE};
use crate::dns::{self, Query, QTYPE_A, QTYPE_AAAA};
use crate::errors::DnsError;

/// Run the UDP DNS responder.
///
/// Binding failure is fatal; without its socket the responder cannot run.
///
/// # Arguments
/// * `config` - The responder configuration.
///
/// # Returns
/// A `Result` indicating success or failure.
pub async fn run_udp_server(config: ServerConfig) -> Result<(), DnsError> {
    let socket = UdpSocket::bind(config.bind_addr).await?;
    info!(
        "DNS responder for {} ({}) listening on {}",
        config.domain, config.ip, config.bind_addr
    );
    serve(socket, config).await
}

/// Drive the receive loop on an already-bound socket.
///
/// One task owns the socket for reads; each datagram is handed to a spawned
/// handler that performs its own send. Handlers share nothing mutable, so a
/// slow or malicious sender cannot stall other clients. A failed read is
/// logged and the loop continues.
///
/// # Arguments
/// * `socket` - The bound UDP socket.
/// * `config` - The responder configuration.
///
/// # Returns
/// A `Result` indicating success or failure. The loop only exits with the
/// process.
pub async fn serve(socket: UdpSocket, config: ServerConfig) -> Result<(), DnsError> {
    let socket = Arc::new(socket);
    let mut buf = vec![0u8; MAX_PACKET_SIZE];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((amt, src)) => {
                let query = buf[..amt].to_vec();
                let socket = socket.clone();
                let config = config.clone();
                task::spawn(async move {
                    if let Err(e) = handle_udp_query(query, src, socket, config).await {
                        warn!("UDP query error: {}", e);
                    }
                });
            }
            Err(e) => error!("UDP receive error: {}", e),
        }
    }
}

/// Handle a single UDP query datagram.
///
/// Every datagram is logged, whether or not it gets a reply. Undecodable
/// input is dropped without a response; errors never go back on the wire.
///
/// # Arguments
/// * `query` - The raw query datagram.
/// * `src` - The source address of the query.
/// * `socket` - The UDP socket to send the response on.
/// * `config` - The responder configuration.
///
/// # Returns
/// A `Result` indicating success or failure.
pub async fn handle_udp_query(
    query: Vec<u8>,
    src: SocketAddr,
    socket: Arc<UdpSocket>,
    config: ServerConfig,
) -> Result<(), DnsError> {
    let decoded = match dns::decode_query(&query) {
        Ok(decoded) => decoded,
        Err(e) => {
            info!("Dropping undecodable query from {}: {}", src, e);
            return Ok(());
        }
    };

    info!(
        "Query from {} for {} (type {})",
        src, decoded.name, decoded.qtype
    );

    if let Some(response) = dispatch(&query, &decoded, &config) {
        socket.send_to(&response, src).await?;
    }
    Ok(())
}

/// Decide whether a decoded query gets a response, and build it.
///
/// Names are compared ASCII case-insensitively; the configured domain was
/// dot-normalized at load time. A matching A query gets the configured
/// address, a matching AAAA query gets an explicit empty answer, and
/// everything else is silence: this responder is authoritative for exactly
/// one name and must not answer for others.
///
/// # Arguments
/// * `request` - The raw query datagram.
/// * `decoded` - The decoded query.
/// * `config` - The responder configuration.
///
/// # Returns
/// An `Option` containing the response datagram, or `None` to drop.
pub fn dispatch(request: &[u8], decoded: &Query, config: &ServerConfig) -> Option<Vec<u8>> {
    if !decoded.name.eq_ignore_ascii_case(&config.domain) {
        return None;
    }

    match decoded.qtype {
        QTYPE_A => Some(dns::build_a_response(request, decoded, config.ip)),
        QTYPE_AAAA => Some(dns::build_empty_response(request, decoded)),
        _ => None,
    }
}
