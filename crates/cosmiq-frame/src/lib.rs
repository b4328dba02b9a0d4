//! Capture-line framing and channel demultiplexing for Cosmiq serial dumps.
//!
//! A capture is a text file with one hex-encoded frame per line:
//! - A 1-byte command code selecting the channel
//! - A 1-byte checksum (read, never verified)
//! - A 1-byte length (read, never verified)
//! - The payload, as hex text, up to the end of the line
//!
//! Payload text is appended to the channel its command code selects, and a
//! channel is only decoded to bytes when it is materialized.

pub mod channel;
pub mod codec;
pub mod command;
pub mod demux;
pub mod error;
pub mod reader;

pub use channel::Channel;
pub use codec::{parse_line, Frame, MIN_LINE_LEN, OBSERVED_PAYLOAD_LEN, PAYLOAD_OFFSET};
pub use command::{channel_name, ChannelKind, BODY, HEADER};
pub use demux::{demultiplex, DemuxConfig, DemuxStats, Demultiplexer, Demuxed};
pub use error::{DecodeError, FrameError, Result};
pub use reader::{read_capture, CaptureReader};
