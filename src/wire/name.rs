//! Domain Name Codec
//!
//! RFC 1035: "Domain names in messages are expressed in terms of a sequence
//! of labels. Each label is represented as a one octet length field followed
//! by that number of octets. Since every domain name ends with the null label
//! of the root, a domain name is terminated by a length byte of zero."
//!
//! Label case is preserved exactly as received.

use super::{WireError, MAX_LABEL_LEN};

/// Decode a length-prefixed label sequence starting at `offset`.
///
/// Returns the dot-joined name and the offset of the first byte past the
/// terminating zero octet. A length octet greater than 63 is rejected; such
/// an octet is either corrupt or a compression pointer, which this codec
/// does not support.
pub fn decode_name(buf: &[u8], mut offset: usize) -> Result<(String, usize), WireError> {
    let mut name = String::new();

    loop {
        let len = *buf.get(offset).ok_or(WireError::TruncatedName)? as usize;
        offset += 1;

        if len == 0 {
            break;
        }

        if len > MAX_LABEL_LEN {
            return Err(WireError::LabelTooLong(len));
        }

        let label = buf
            .get(offset..offset + len)
            .ok_or(WireError::TruncatedName)?;
        offset += len;

        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(&String::from_utf8_lossy(label));
    }

    Ok((name, offset))
}

/// Encode `name` as a label sequence followed by the root terminator.
///
/// The empty name encodes as the bare root (a single zero octet).
pub fn encode_name(buf: &mut Vec<u8>, name: &str) -> Result<(), WireError> {
    if !name.is_empty() {
        for label in name.split('.') {
            if label.len() > MAX_LABEL_LEN {
                return Err(WireError::LabelTooLong(label.len()));
            }
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
    }

    buf.push(0);
    Ok(())
}
