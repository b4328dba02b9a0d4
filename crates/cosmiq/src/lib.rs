//! Recover dive-log data from Cosmiq dive computer serial captures.
//!
//! A capture is split by command code into header and body channels, the body
//! is decoded and cut into blocks at erased-flash filler, and blocks can be
//! scanned for candidate samples.
//!
//! # Crate Structure
//!
//! - [`frame`]: Capture-line parsing, channel demultiplexing and materialization
//! - [`block`]: Block segmentation, sample extraction and block persistence

/// Re-export frame types.
pub mod frame {
    pub use cosmiq_frame::*;
}

/// Re-export block types.
pub mod block {
    pub use cosmiq_block::*;
}
