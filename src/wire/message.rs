//! Message Codec
//!
//! Decodes a raw UDP datagram into a [`Message`] and encodes a [`Message`]
//! back into wire bytes. Decoding is deliberately lenient: errors are
//! collected and whatever parsed cleanly is kept, so a truncated query can
//! still receive a best-effort response. Encoding is strict and recomputes
//! every header count from the actual section lengths.

use super::name::{decode_name, encode_name};
use super::{WireError, HEADER_SIZE, MAX_MESSAGE_SIZE};

/// The fixed 12-byte DNS header, all fields big-endian on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Opaque transaction ID, echoed verbatim in the response
    pub transaction_id: u16,

    /// Flags word; bit 15 distinguishes query (0) from response (1)
    pub flags: u16,

    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    /// Decode the header from the front of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < HEADER_SIZE {
            return Err(WireError::HeaderTruncated(buf.len()));
        }

        let field = |i: usize| u16::from_be_bytes([buf[i], buf[i + 1]]);

        Ok(Self {
            transaction_id: field(0),
            flags: field(2),
            question_count: field(4),
            answer_count: field(6),
            authority_count: field(8),
            additional_count: field(10),
        })
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.transaction_id.to_be_bytes());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&self.question_count.to_be_bytes());
        buf.extend_from_slice(&self.answer_count.to_be_bytes());
        buf.extend_from_slice(&self.authority_count.to_be_bytes());
        buf.extend_from_slice(&self.additional_count.to_be_bytes());
    }
}

/// A single resource record.
///
/// Questions carry only name, type, and class; `ttl` and `rdata` stay empty
/// and are never written to the wire for them. The rdata length field is
/// always written as `rdata.len()`, so it can never disagree with the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Dot-joined label sequence, case as received
    pub name: String,

    /// Record type code; only A (1) and AAAA (28) are interpreted
    pub rtype: u16,

    /// Record class code; only IN (1) is supported
    pub class: u16,

    /// Time-to-live in seconds (answers only)
    pub ttl: u32,

    /// Raw type-specific data: 4 bytes for A, 16 for AAAA
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    /// A question entry: name, type, and class only.
    pub fn question(name: String, rtype: u16, class: u16) -> Self {
        Self {
            name,
            rtype,
            class,
            ttl: 0,
            rdata: Vec::new(),
        }
    }

    /// An answer-shaped record with class IN.
    pub fn answer(name: String, rtype: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        Self {
            name,
            rtype,
            class: super::CLASS_IN,
            ttl,
            rdata,
        }
    }
}

/// A full DNS message, transient per request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<ResourceRecord>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

/// Outcome of lenient decoding: the best-effort message plus every error
/// encountered along the way, for the caller to log.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub message: Message,
    pub errors: Vec<WireError>,
}

impl Message {
    /// Decode a datagram leniently.
    ///
    /// A short header is replaced by a zeroed one; question parsing stops at
    /// the first malformed entry, keeping the questions read so far. Only the
    /// question section is parsed — queries carry no other records, and
    /// trailing bytes are ignored.
    pub fn decode(bytes: &[u8]) -> DecodedMessage {
        let mut errors = Vec::new();

        let header = match Header::decode(bytes) {
            Ok(header) => header,
            Err(err) => {
                errors.push(err);
                Header::default()
            }
        };

        let mut questions = Vec::new();
        let mut offset = HEADER_SIZE.min(bytes.len());

        for idx in 0..header.question_count as usize {
            match decode_question(bytes, offset) {
                Ok((question, next)) => {
                    questions.push(question);
                    offset = next;
                }
                Err(WireError::LabelTooLong(len)) => {
                    errors.push(WireError::LabelTooLong(len));
                    break;
                }
                Err(_) => {
                    errors.push(WireError::QuestionTruncated(idx));
                    break;
                }
            }
        }

        DecodedMessage {
            message: Message {
                header,
                questions,
                answers: Vec::new(),
                authorities: Vec::new(),
                additionals: Vec::new(),
            },
            errors,
        }
    }

    /// Encode the message, recomputing every header count from the actual
    /// list lengths rather than trusting `self.header`.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::with_capacity(MAX_MESSAGE_SIZE);

        let header = Header {
            transaction_id: self.header.transaction_id,
            flags: self.header.flags,
            question_count: self.questions.len() as u16,
            answer_count: self.answers.len() as u16,
            authority_count: self.authorities.len() as u16,
            additional_count: self.additionals.len() as u16,
        };
        header.encode(&mut buf);

        for question in &self.questions {
            encode_name(&mut buf, &question.name)?;
            buf.extend_from_slice(&question.rtype.to_be_bytes());
            buf.extend_from_slice(&question.class.to_be_bytes());
        }

        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            encode_name(&mut buf, &record.name)?;
            buf.extend_from_slice(&record.rtype.to_be_bytes());
            buf.extend_from_slice(&record.class.to_be_bytes());
            buf.extend_from_slice(&record.ttl.to_be_bytes());
            buf.extend_from_slice(&(record.rdata.len() as u16).to_be_bytes());
            buf.extend_from_slice(&record.rdata);
        }

        Ok(buf)
    }
}

fn decode_question(buf: &[u8], offset: usize) -> Result<(ResourceRecord, usize), WireError> {
    let (name, offset) = decode_name(buf, offset)?;

    let fixed = buf
        .get(offset..offset + 4)
        .ok_or(WireError::TruncatedName)?;
    let rtype = u16::from_be_bytes([fixed[0], fixed[1]]);
    let class = u16::from_be_bytes([fixed[2], fixed[3]]);

    Ok((ResourceRecord::question(name, rtype, class), offset + 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{CLASS_IN, FLAG_RESPONSE, TYPE_A, TYPE_AAAA};

    /// Build a well-formed single-question query datagram.
    fn build_query(id: u16, name: &str, rtype: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&id.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes()); // flags: query
        data.extend_from_slice(&1u16.to_be_bytes()); // questions
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        encode_name(&mut data, name).unwrap();
        data.extend_from_slice(&rtype.to_be_bytes());
        data.extend_from_slice(&CLASS_IN.to_be_bytes());
        data
    }

    #[test]
    fn test_decode_query() {
        let data = build_query(0x1234, "foo.ip4", TYPE_A);
        let decoded = Message::decode(&data);

        assert!(decoded.errors.is_empty());
        let msg = decoded.message;
        assert_eq!(msg.header.transaction_id, 0x1234);
        assert_eq!(msg.header.question_count, 1);
        assert_eq!(msg.questions.len(), 1);
        assert_eq!(msg.questions[0].name, "foo.ip4");
        assert_eq!(msg.questions[0].rtype, TYPE_A);
        assert_eq!(msg.questions[0].class, CLASS_IN);
    }

    #[test]
    fn test_decode_short_header() {
        let decoded = Message::decode(&[0xAB, 0xCD, 0x01]);
        assert_eq!(decoded.errors, vec![WireError::HeaderTruncated(3)]);
        assert_eq!(decoded.message.header, Header::default());
        assert!(decoded.message.questions.is_empty());
    }

    #[test]
    fn test_decode_truncated_question_keeps_parsed_ones() {
        // Header claims two questions, but the second is cut off mid-name
        let mut data = build_query(7, "foo.ip4", TYPE_A);
        data[5] = 2; // question_count = 2
        data.push(3);
        data.extend_from_slice(b"ba"); // label promises 3 bytes, gives 2

        let decoded = Message::decode(&data);
        assert_eq!(decoded.errors, vec![WireError::QuestionTruncated(1)]);
        assert_eq!(decoded.message.questions.len(), 1);
        assert_eq!(decoded.message.questions[0].name, "foo.ip4");
    }

    #[test]
    fn test_decode_lying_question_count() {
        // Header claims five questions but carries one
        let mut data = build_query(9, "a.b", TYPE_AAAA);
        data[5] = 5;

        let decoded = Message::decode(&data);
        assert_eq!(decoded.message.questions.len(), 1);
        assert!(!decoded.errors.is_empty());
    }

    #[test]
    fn test_encode_recomputes_counts() {
        // Header counts disagree with the actual lists on purpose
        let msg = Message {
            header: Header {
                transaction_id: 42,
                flags: FLAG_RESPONSE,
                question_count: 9,
                answer_count: 9,
                authority_count: 9,
                additional_count: 9,
            },
            questions: vec![ResourceRecord::question("foo.ip4".into(), TYPE_A, CLASS_IN)],
            answers: vec![ResourceRecord::answer(
                "foo.ip4".into(),
                TYPE_A,
                1800,
                vec![127, 0, 0, 1],
            )],
            authorities: Vec::new(),
            additionals: Vec::new(),
        };

        let bytes = msg.encode().unwrap();
        let header = Header::decode(&bytes).unwrap();
        assert_eq!(header.question_count, 1);
        assert_eq!(header.answer_count, 1);
        assert_eq!(header.authority_count, 0);
        assert_eq!(header.additional_count, 0);
        assert_eq!(header.flags & FLAG_RESPONSE, FLAG_RESPONSE);
    }

    #[test]
    fn test_encode_answer_wire_layout() {
        let msg = Message {
            header: Header {
                transaction_id: 1,
                flags: FLAG_RESPONSE,
                ..Header::default()
            },
            questions: Vec::new(),
            answers: vec![ResourceRecord::answer(
                "a".into(),
                TYPE_A,
                60,
                vec![10, 0, 0, 1],
            )],
            authorities: Vec::new(),
            additionals: Vec::new(),
        };

        let bytes = msg.encode().unwrap();
        // name "a" = [1, 'a', 0], then type, class, ttl, rdlength, rdata
        let record = &bytes[HEADER_SIZE..];
        assert_eq!(&record[..3], &[1, b'a', 0]);
        assert_eq!(&record[3..5], &TYPE_A.to_be_bytes());
        assert_eq!(&record[5..7], &CLASS_IN.to_be_bytes());
        assert_eq!(&record[7..11], &60u32.to_be_bytes());
        assert_eq!(&record[11..13], &4u16.to_be_bytes());
        assert_eq!(&record[13..], &[10, 0, 0, 1]);
    }

    #[test]
    fn test_query_round_trip() {
        let msg = Message {
            header: Header {
                transaction_id: 0xBEEF,
                flags: 0,
                question_count: 2,
                ..Header::default()
            },
            questions: vec![
                ResourceRecord::question("foo.ip4".into(), TYPE_A, CLASS_IN),
                ResourceRecord::question("bar.ip6".into(), TYPE_AAAA, CLASS_IN),
            ],
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        };

        let bytes = msg.encode().unwrap();
        let decoded = Message::decode(&bytes);
        assert!(decoded.errors.is_empty());
        assert_eq!(decoded.message, msg);
    }
}
