//! Single-domain authoritative DNS responder.
//!
//! This library answers UDP queries for exactly one configured domain name
//! with one configured IPv4 address, and stays silent for everything else.

#![allow(dead_code)]

// Define modules
pub mod config;
pub mod dns;
pub mod errors;
pub mod handlers;
pub mod utils;

// Re-export commonly used items
pub use config::ServerConfig;
pub use errors::DnsError;
