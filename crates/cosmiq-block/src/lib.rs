//! Block recovery and sample decoding for Cosmiq log memory.
//!
//! The body channel of a dump is mostly erased flash (`0xFF`). The
//! [`segment`] module cuts it into blocks at filler windows; [`sample`]
//! scans one block for marker-prefixed readings. The reading layout and its
//! scaling are guesses, so the extractor takes the scale as a parameter.

pub mod dump;
pub mod error;
pub mod sample;
pub mod segment;
pub mod store;

pub use dump::{hexdump_lines, DUMP_LINE_BYTES};
pub use error::{BlockError, Result};
pub use sample::{Divisor, Marker, Sample, SampleExtractor, ValueScale, DEFAULT_MARKERS, RECORD_LEN};
pub use segment::{segment, Block, SegmentConfig, Segmenter, DEFAULT_FILLER, DEFAULT_WINDOW_SIZE};
pub use store::{read_block, BlockStore, StoreConfig, BLOCK_FILE_EXTENSION, BLOCK_FILE_PREFIX};
