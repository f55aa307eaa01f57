//! Helper functions for configuration loading.
#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use crate::errors::DnsError;

/// Normalize a configured domain name for matching.
///
/// Strips the trailing dot so that "example.com." and "example.com" compare
/// equal against decoded question names, which never carry the root dot.
///
/// # Arguments
/// * `domain` - The configured domain name.
///
/// # Returns
/// The domain without its trailing dot.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim_end_matches('.').to_string()
}

/// Detect a non-loopback IPv4 address of this host.
///
/// Opens a UDP socket and connects it to a public address, then reads the
/// local address the OS picked for that route. Nothing is sent; connect on
/// UDP only selects the outbound interface.
///
/// # Returns
/// A `Result` containing the local IPv4 address, or a `Config` error when
/// the host has no usable non-loopback IPv4 route.
pub fn detect_local_ipv4() -> Result<Ipv4Addr, DnsError> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:53")?;

    match socket.local_addr()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Ok(ip),
        other => Err(DnsError::Config(format!(
            "no non-loopback local IPv4 address found (got {})",
            other
        ))),
    }
}
