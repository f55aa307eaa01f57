//! DNS wire-format handling.
//!
//! This module decodes incoming query datagrams and builds response
//! datagrams. Responses reuse the request's header and question bytes
//! verbatim, which is what makes the fixed `0xC00C` answer name pointer
//! valid (see [`build_a_response`]).
#![allow(dead_code)]

use std::net::Ipv4Addr;
use std::str;

use crate::errors::DnsError;

/// Size of a DNS message header in bytes.
pub const HEADER_LEN: usize = 12;

/// Byte offset where the question name starts; the answer name pointer
/// encodes this offset.
pub const QUESTION_OFFSET: usize = 12;

/// QTYPE for IPv4 host addresses.
pub const QTYPE_A: u16 = 1;

/// QTYPE for IPv6 host addresses.
pub const QTYPE_AAAA: u16 = 28;

/// QCLASS for Internet records.
pub const QCLASS_IN: u16 = 1;

/// TTL in seconds for every answer this responder emits.
pub const ANSWER_TTL: u32 = 300;

/// Response flags: QR set, recursion available, RCODE 0. The responder only
/// ever produces single-answer or empty no-error replies, so the flags are a
/// fixed policy rather than derived from the request.
const RESPONSE_FLAGS: [u8; 2] = [0x81, 0x80];

/// Compression pointer to the question name at `QUESTION_OFFSET`.
const NAME_POINTER: [u8; 2] = [0xc0, QUESTION_OFFSET as u8];

/// A decoded DNS query.
///
/// Holds the fields the dispatcher needs plus `question_end`, the offset one
/// past the question's QCLASS in the original datagram. The byte span
/// `[0, question_end)` of that datagram is what responses echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Transaction ID from the message header.
    pub id: u16,

    /// Question name as dot-separated labels, case preserved.
    pub name: String,

    /// Query type (1 = A, 28 = AAAA, others unhandled).
    pub qtype: u16,

    /// Query class (normally 1 = IN).
    pub qclass: u16,

    /// Offset just past the question section in the request buffer.
    pub question_end: usize,
}

/// Decode the header ID and question section of a DNS query datagram.
///
/// Only plain length-prefixed labels are accepted in the question name; a
/// byte with the compression-pointer bits set is rejected rather than
/// followed, since real clients never compress the question section.
///
/// # Arguments
/// * `buf` - The raw query datagram.
///
/// # Returns
/// A `Result` containing the decoded `Query` or a `Truncated`/`Malformed`
/// error. Decoding never reads past `buf`.
pub fn decode_query(buf: &[u8]) -> Result<Query, DnsError> {
    if buf.len() < HEADER_LEN {
        return Err(DnsError::Truncated(format!(
            "{} bytes is shorter than a DNS header",
            buf.len()
        )));
    }

    let id = u16::from_be_bytes([buf[0], buf[1]]);

    let mut pos = QUESTION_OFFSET;
    let mut name = String::new();

    // Walk the length-prefixed labels up to the zero terminator.
    loop {
        if pos >= buf.len() {
            return Err(DnsError::Malformed(
                "question name runs past the end of the message".into(),
            ));
        }

        let len = buf[pos] as usize;
        if len == 0 {
            pos += 1;
            break;
        }

        // 0xC0 marks a compression pointer; 0x40/0x80 are reserved. Neither
        // is a plain label, so both are malformed here.
        if len & 0xC0 != 0 {
            return Err(DnsError::Malformed(
                "compression pointer in question name".into(),
            ));
        }
        pos += 1;

        if pos + len > buf.len() {
            return Err(DnsError::Malformed(format!(
                "label length {} overruns the message",
                len
            )));
        }

        let label = str::from_utf8(&buf[pos..pos + len])
            .map_err(|_| DnsError::Malformed("label is not valid UTF-8".into()))?;

        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(label);
        pos += len;
    }

    if pos + 4 > buf.len() {
        return Err(DnsError::Truncated(
            "missing query type and class after question name".into(),
        ));
    }

    let qtype = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
    let qclass = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);

    Ok(Query {
        id,
        name,
        qtype,
        qclass,
        question_end: pos + 4,
    })
}

/// Build a single-answer A-record response.
///
/// The request's header and question bytes are copied verbatim, the flags
/// are rewritten to `0x8180`, ANCOUNT is set to 1, and a 16-byte answer is
/// appended: a name pointer to the question name, type A, class IN, a fixed
/// TTL, and the four address octets as RDATA.
///
/// # Arguments
/// * `request` - The original query datagram.
/// * `query` - The decoded query (for its `question_end`).
/// * `ip` - The IPv4 address to answer with.
///
/// # Returns
/// A ready-to-transmit response datagram.
pub fn build_a_response(request: &[u8], query: &Query, ip: Ipv4Addr) -> Vec<u8> {
    let mut response = echo_header_and_question(request, query.question_end);

    // ANCOUNT = 1
    response[6..8].copy_from_slice(&1u16.to_be_bytes());

    response.extend_from_slice(&NAME_POINTER);
    response.extend_from_slice(&QTYPE_A.to_be_bytes());
    response.extend_from_slice(&QCLASS_IN.to_be_bytes());
    response.extend_from_slice(&ANSWER_TTL.to_be_bytes());

    // RDLENGTH (4 for IPv4) and RDATA
    response.extend_from_slice(&4u16.to_be_bytes());
    response.extend_from_slice(&ip.octets());

    response
}

/// Build an answerless no-error response.
///
/// Same header and question echo as [`build_a_response`] with ANCOUNT 0 and
/// nothing appended. Sent for AAAA queries so IPv6-preferring clients fall
/// back to A promptly instead of retrying into a timeout.
///
/// # Arguments
/// * `request` - The original query datagram.
/// * `query` - The decoded query (for its `question_end`).
///
/// # Returns
/// A ready-to-transmit response datagram.
pub fn build_empty_response(request: &[u8], query: &Query) -> Vec<u8> {
    let mut response = echo_header_and_question(request, query.question_end);

    // ANCOUNT = 0, regardless of what the request carried there.
    response[6..8].copy_from_slice(&0u16.to_be_bytes());

    response
}

/// Copy `[0, question_end)` of the request and rewrite the flags.
///
/// Precondition: the question name starts at `QUESTION_OFFSET` and
/// `question_end` lies inside the request, past the minimal header + name
/// terminator + type/class. The answer name pointer is only correct while
/// the response begins with the unmodified request prefix; any change to
/// this copy strategy must change the pointer too.
fn echo_header_and_question(request: &[u8], question_end: usize) -> Vec<u8> {
    assert!(
        question_end <= request.len() && question_end >= HEADER_LEN + 5,
        "question end {} outside request of {} bytes",
        question_end,
        request.len()
    );

    let mut response = Vec::with_capacity(question_end + 16);
    response.extend_from_slice(&request[..question_end]);
    response[2..4].copy_from_slice(&RESPONSE_FLAGS);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a single-question query datagram for tests.
    fn query_bytes(id: u16, name: &str, qtype: u16, qclass: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&id.to_be_bytes());
        buf.extend_from_slice(&[0x01, 0x00]); // flags: RD
        buf.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
        buf.extend_from_slice(&[0; 6]); // ANCOUNT, NSCOUNT, ARCOUNT
        for label in name.split('.').filter(|l| !l.is_empty()) {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
        buf.push(0);
        buf.extend_from_slice(&qtype.to_be_bytes());
        buf.extend_from_slice(&qclass.to_be_bytes());
        buf
    }

    #[test]
    fn decode_round_trips_name() {
        for name in ["example.com", "a.b.c.d", "xn--nxasmq6b.example", "x"] {
            let buf = query_bytes(0x0102, name, QTYPE_A, QCLASS_IN);
            let query = decode_query(&buf).unwrap();
            assert_eq!(query.name, name);
            assert_eq!(query.id, 0x0102);
            assert_eq!(query.qtype, QTYPE_A);
            assert_eq!(query.qclass, QCLASS_IN);
            assert_eq!(query.question_end, buf.len());
        }
    }

    #[test]
    fn decode_preserves_name_case() {
        let buf = query_bytes(1, "ExAmPlE.CoM", QTYPE_A, QCLASS_IN);
        assert_eq!(decode_query(&buf).unwrap().name, "ExAmPlE.CoM");
    }

    #[test]
    fn decode_rejects_short_buffers() {
        for len in 0..HEADER_LEN {
            let buf = vec![0u8; len];
            assert!(matches!(
                decode_query(&buf),
                Err(DnsError::Truncated(_))
            ));
        }
    }

    #[test]
    fn decode_rejects_label_overrunning_buffer() {
        let mut buf = query_bytes(1, "example.com", QTYPE_A, QCLASS_IN);
        // Declare a 63-byte label where only a few bytes remain.
        buf[QUESTION_OFFSET] = 63;
        assert!(matches!(decode_query(&buf), Err(DnsError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_unterminated_name() {
        let mut buf = query_bytes(1, "example.com", QTYPE_A, QCLASS_IN);
        // Drop the terminator and everything after it.
        buf.truncate(buf.len() - 5);
        assert!(matches!(decode_query(&buf), Err(DnsError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_compression_pointer_in_question() {
        let mut buf = vec![0u8; HEADER_LEN];
        buf.extend_from_slice(&[0xc0, 0x0c]); // pointer instead of a label
        buf.extend_from_slice(&QTYPE_A.to_be_bytes());
        buf.extend_from_slice(&QCLASS_IN.to_be_bytes());
        assert!(matches!(decode_query(&buf), Err(DnsError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_missing_type_and_class() {
        let mut buf = query_bytes(1, "example.com", QTYPE_A, QCLASS_IN);
        buf.truncate(buf.len() - 2); // QCLASS gone
        assert!(matches!(decode_query(&buf), Err(DnsError::Truncated(_))));
    }

    #[test]
    fn a_response_layout() {
        let request = query_bytes(0x1234, "example.com", QTYPE_A, QCLASS_IN);
        let query = decode_query(&request).unwrap();
        let ip: Ipv4Addr = "192.168.1.100".parse().unwrap();

        let response = build_a_response(&request, &query, ip);

        // Echoed header with rewritten flags and ANCOUNT.
        assert_eq!(&response[0..2], &0x1234u16.to_be_bytes());
        assert_eq!(&response[2..4], &[0x81, 0x80]);
        assert_eq!(&response[4..6], &1u16.to_be_bytes()); // QDCOUNT echoed
        assert_eq!(&response[6..8], &1u16.to_be_bytes()); // ANCOUNT
        assert_eq!(&response[8..12], &[0, 0, 0, 0]);

        // Question echoed byte-for-byte.
        assert_eq!(
            &response[QUESTION_OFFSET..query.question_end],
            &request[QUESTION_OFFSET..query.question_end]
        );

        // 16-byte answer record.
        let answer = &response[query.question_end..];
        assert_eq!(answer.len(), 16);
        assert_eq!(&answer[0..2], &[0xc0, 0x0c]);
        assert_eq!(&answer[2..4], &QTYPE_A.to_be_bytes());
        assert_eq!(&answer[4..6], &QCLASS_IN.to_be_bytes());
        assert_eq!(&answer[6..10], &ANSWER_TTL.to_be_bytes());
        assert_eq!(&answer[10..12], &4u16.to_be_bytes());
        assert_eq!(&answer[12..16], &[192, 168, 1, 100]);
    }

    #[test]
    fn a_response_pointer_targets_question_name() {
        let request = query_bytes(7, "example.com", QTYPE_A, QCLASS_IN);
        let query = decode_query(&request).unwrap();
        let response = build_a_response(&request, &query, Ipv4Addr::LOCALHOST);

        let pointer = u16::from_be_bytes([
            response[query.question_end],
            response[query.question_end + 1],
        ]);
        let target = (pointer & 0x3FFF) as usize;
        assert_eq!(target, QUESTION_OFFSET);
        // The pointed-at bytes must still decode to the question name.
        assert_eq!(response[target] as usize, "example".len());
    }

    #[test]
    fn empty_response_is_echo_only() {
        let request = query_bytes(0x5678, "example.com", QTYPE_AAAA, QCLASS_IN);
        let query = decode_query(&request).unwrap();

        let response = build_empty_response(&request, &query);

        assert_eq!(response.len(), query.question_end);
        assert_eq!(&response[0..2], &0x5678u16.to_be_bytes());
        assert_eq!(&response[2..4], &[0x81, 0x80]);
        assert_eq!(&response[6..8], &0u16.to_be_bytes()); // ANCOUNT
        assert_eq!(
            &response[QUESTION_OFFSET..],
            &request[QUESTION_OFFSET..query.question_end]
        );
    }

    #[test]
    fn responses_are_deterministic() {
        let request = query_bytes(42, "example.com", QTYPE_A, QCLASS_IN);
        let query = decode_query(&request).unwrap();
        let ip: Ipv4Addr = "10.0.0.1".parse().unwrap();

        let first = build_a_response(&request, &query, ip);
        let second = build_a_response(&request, &query, ip);
        assert_eq!(first, second);
    }
}
