//! DNS Wire Format
//!
//! RFC 1035 message codec for the UDP transport: the fixed 12-byte header,
//! length-prefixed domain names, and the four resource-record sections.
//!
//! ## Limitations
//!
//! - No message compression: compression pointers are never emitted, and a
//!   pointer octet in the input (length > 63) is rejected rather than parsed.
//! - No TCP fallback or truncation flag; responses over 512 bytes are sent
//!   as-is and logged by the dispatcher.

mod message;
mod name;

pub use message::{Header, Message, ResourceRecord};
pub use name::encode_name;

use thiserror::Error;

/// Size of the fixed DNS header
pub const HEADER_SIZE: usize = 12;

/// Maximum UDP DNS message size (RFC 1035)
pub const MAX_MESSAGE_SIZE: usize = 512;

/// Maximum length of a single domain-name label
pub const MAX_LABEL_LEN: usize = 63;

/// Record types
pub const TYPE_A: u16 = 1;
pub const TYPE_AAAA: u16 = 28;

/// Record classes
pub const CLASS_IN: u16 = 1;

/// Header flags
pub const FLAG_RESPONSE: u16 = 1 << 15;

/// Response codes (low nibble of the flags word)
pub const RCODE_NXDOMAIN: u16 = 3;

/// Errors produced by the wire codec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("header truncated: got {0} bytes, need {HEADER_SIZE}")]
    HeaderTruncated(usize),

    #[error("question {0} truncated")]
    QuestionTruncated(usize),

    #[error("domain name truncated")]
    TruncatedName,

    #[error("label of {0} bytes exceeds the {MAX_LABEL_LEN}-byte limit")]
    LabelTooLong(usize),
}
