use bytes::Bytes;

use crate::command::ChannelKind;
use crate::error::DecodeError;

/// Append-only accumulator of payload hex text for one channel.
///
/// Text is kept in capture order and only decoded when the channel is
/// materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    kind: ChannelKind,
    hex: String,
    frames: usize,
}

impl Channel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            hex: String::new(),
            frames: 0,
        }
    }

    /// Append one frame's payload text. Empty payloads still count as a frame.
    pub fn append(&mut self, payload: &str) {
        self.hex.push_str(payload);
        self.frames += 1;
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The accumulated payload text, undecoded.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Number of frames routed to this channel.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn hex_len(&self) -> usize {
        self.hex.len()
    }

    /// Byte count implied by the text length, without decoding it.
    pub fn byte_len(&self) -> usize {
        self.hex.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.hex.is_empty()
    }

    /// Decode the accumulated text into raw bytes.
    ///
    /// Fails as a whole: no partial bytes are returned.
    pub fn materialize(&self) -> Result<Bytes, DecodeError> {
        let bytes = hex::decode(&self.hex).map_err(|err| match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => DecodeError::InvalidCharacter {
                character: c,
                index,
            },
            _ => DecodeError::OddLength {
                len: self.hex.len(),
            },
        })?;
        tracing::debug!(
            channel = self.name(),
            frames = self.frames,
            bytes = bytes.len(),
            "materialized channel"
        );
        Ok(Bytes::from(bytes))
    }
}
