//! Error types for the DNS responder.
//!
//! This module defines the error types used throughout the responder.
#![allow(dead_code)]

use thiserror::Error;

/// Represents errors that can occur in the DNS responder.
#[derive(Error, Debug)]
pub enum DnsError {
    /// I/O errors from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The message ends before a complete header or question section.
    #[error("Truncated DNS message: {0}")]
    Truncated(String),

    /// The question section cannot be decoded as a sequence of plain labels.
    #[error("Malformed DNS message: {0}")]
    Malformed(String),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(String),
}
