//! Configuration for the DNS responder.
//!
//! This module defines the configuration structure and methods to load
//! configuration from environment variables.
#![allow(dead_code)]

use std::{env, net::Ipv4Addr, net::SocketAddr};

use log::info;

use crate::errors::DnsError;
use crate::utils::{detect_local_ipv4, normalize_domain};

/// Maximum size of DNS packets in bytes.
pub const MAX_PACKET_SIZE: usize = 4096;

/// Responder configuration, immutable after loading.
///
/// There is exactly one responder identity per process: one domain, one
/// address. The dispatcher receives this by value; no globals exist.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the DNS socket to.
    pub bind_addr: SocketAddr,

    /// Domain this responder is authoritative for, trailing dot stripped.
    pub domain: String,

    /// IPv4 address returned in A answers.
    pub ip: Ipv4Addr,
}

impl ServerConfig {
    /// Load responder configuration from environment variables.
    ///
    /// `DNS_DOMAIN` is required. `DNS_IP` is optional; when unset, a
    /// non-loopback local IPv4 address is auto-detected. `DNS_BIND` defaults
    /// to `0.0.0.0:53`.
    ///
    /// # Returns
    /// A `Result` containing either the loaded `ServerConfig` or a `DnsError`.
    pub fn from_env() -> Result<Self, DnsError> {
        let domain = env::var("DNS_DOMAIN")
            .map_err(|_| DnsError::Config("DNS_DOMAIN must be set".into()))?;

        let ip = match env::var("DNS_IP") {
            Ok(v) => Some(v),
            Err(_) => None,
        };

        let bind = env::var("DNS_BIND").unwrap_or_else(|_| "0.0.0.0:53".into());

        Self::from_values(&domain, ip.as_deref(), &bind)
    }

    /// Build a configuration from raw string values.
    ///
    /// A bad address literal is a fatal error here, before the socket opens,
    /// rather than something discovered while answering traffic.
    ///
    /// # Arguments
    /// * `domain` - Domain name to answer for (required, non-empty).
    /// * `ip` - IPv4 literal to answer with; `None` auto-detects.
    /// * `bind` - Socket address to bind to.
    ///
    /// # Returns
    /// A `Result` containing either the `ServerConfig` or a `DnsError`.
    pub fn from_values(
        domain: &str,
        ip: Option<&str>,
        bind: &str,
    ) -> Result<Self, DnsError> {
        let domain = normalize_domain(domain);
        if domain.is_empty() {
            return Err(DnsError::Config("domain must be non-empty".into()));
        }

        let ip = match ip {
            Some(literal) => literal.parse().map_err(|_| {
                DnsError::Config(format!("invalid IPv4 address: {}", literal))
            })?,
            None => {
                let detected = detect_local_ipv4()?;
                info!("Auto-detected local IPv4 address {}", detected);
                detected
            }
        };

        let bind_addr = bind
            .parse()
            .map_err(|_| DnsError::Config(format!("invalid bind address: {}", bind)))?;

        Ok(Self {
            bind_addr,
            domain,
            ip,
        })
    }
}
