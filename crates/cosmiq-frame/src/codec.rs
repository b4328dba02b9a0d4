use crate::error::{FrameError, Result};

/// Lines shorter than this (after trimming) are noise, not frames.
pub const MIN_LINE_LEN: usize = 10;

/// Offset of the payload text: command (2) + checksum (2) + length (2).
pub const PAYLOAD_OFFSET: usize = 6;

/// Payload size seen on every body frame so far, in bytes. Not enforced.
pub const OBSERVED_PAYLOAD_LEN: usize = 6;

/// One capture line split into its fields.
///
/// Line layout, hex digits with no separators:
/// ```text
/// ┌──────────┬──────────┬──────────┬──────────────────────┐
/// │ Command  │ Checksum │ Length   │ Payload              │
/// │ (2 hex)  │ (2 hex)  │ (2 hex)  │ (rest of the line)   │
/// └──────────┴──────────┴──────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command code selecting the channel.
    pub command: u8,
    /// Checksum byte as sent, if it is a hex pair. Never verified.
    pub checksum: Option<u8>,
    /// Length byte as sent, if it is a hex pair. Never verified.
    pub length: Option<u8>,
    /// Payload hex text, undecoded. May be empty.
    pub payload: String,
}

impl Frame {
    /// Payload size implied by the text length.
    pub fn payload_len(&self) -> usize {
        self.payload.len() / 2
    }
}

/// Parse one capture line.
///
/// Returns `Ok(None)` for lines shorter than `min_len` after trimming. Only the
/// command field has to be a hex pair; checksum, length and payload are taken
/// as they are.
pub fn parse_line(line: &str, min_len: usize) -> Result<Option<Frame>> {
    let line = line.trim();
    if line.len() < min_len.max(PAYLOAD_OFFSET) {
        return Ok(None);
    }

    let command = line
        .get(0..2)
        .and_then(parse_hex_pair)
        .ok_or_else(|| invalid_field("command", line.get(0..2).unwrap_or(line)))?;
    let checksum = line.get(2..4).and_then(parse_hex_pair);
    let length = line.get(4..6).and_then(parse_hex_pair);
    let payload = line
        .get(PAYLOAD_OFFSET..)
        .ok_or_else(|| invalid_field("payload", line))?;

    Ok(Some(Frame {
        command,
        checksum,
        length,
        payload: payload.to_string(),
    }))
}

fn parse_hex_pair(field: &str) -> Option<u8> {
    let mut byte = [0u8; 1];
    hex::decode_to_slice(field, &mut byte).ok()?;
    Some(byte[0])
}

fn invalid_field(field: &'static str, value: &str) -> FrameError {
    FrameError::InvalidField {
        field,
        value: value.to_string(),
    }
}
