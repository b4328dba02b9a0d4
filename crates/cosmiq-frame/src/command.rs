//! Command codes observed on the wire.
//!
//! Only two codes carry dump data. Every other code is a request, an
//! acknowledgement or something not yet understood, and is dropped.

/// Header response: device and log metadata.
pub const HEADER: u8 = 0x42;

/// Body response: the log memory itself.
pub const BODY: u8 = 0x44;

/// The channels a capture is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Header,
    Body,
}

impl ChannelKind {
    /// Map a command code to its channel using the built-in codes.
    pub fn from_command(command: u8) -> Option<Self> {
        match command {
            HEADER => Some(Self::Header),
            BODY => Some(Self::Body),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
        }
    }
}

/// Returns a human-readable name for a command code.
pub fn channel_name(command: u8) -> &'static str {
    ChannelKind::from_command(command)
        .map(ChannelKind::name)
        .unwrap_or("unknown")
}
