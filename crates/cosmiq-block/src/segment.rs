use bytes::{Bytes, BytesMut};

use crate::error::{BlockError, Result};

/// Window size in bytes, matching the payload size of one body frame.
pub const DEFAULT_WINDOW_SIZE: usize = 6;

/// Value of erased flash.
pub const DEFAULT_FILLER: u8 = 0xFF;

/// Segmenter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Window size in bytes. Fixed for the whole sequence. Default: 6.
    pub window_size: usize,
    /// Byte value a window must consist of entirely to count as filler. Default: 0xFF.
    pub filler: u8,
}

impl SegmentConfig {
    /// The full filler window.
    pub fn filler_pattern(&self) -> Vec<u8> {
        vec![self.filler; self.window_size]
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(BlockError::InvalidConfig(
                "window size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            filler: DEFAULT_FILLER,
        }
    }
}

/// A maximal run of non-filler windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Position in discovery order, starting at 1.
    pub index: usize,
    /// Offset of the first byte in the segmented sequence.
    pub offset: usize,
    pub bytes: Bytes,
}

impl Block {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Splits a byte sequence into blocks at filler windows.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentConfig,
    filler: Vec<u8>,
}

impl Segmenter {
    pub fn new(config: SegmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filler: config.filler_pattern(),
            config,
        })
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Segment `data` into blocks.
    ///
    /// Windows are taken back to back from offset 0. A window equal to the
    /// filler pattern closes the open block, any other window (including a
    /// short trailing one) extends or opens it. A block still open at the end
    /// of input is emitted.
    pub fn segment(&self, data: &[u8]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut open: Option<(usize, BytesMut)> = None;

        for (n, window) in data.chunks(self.config.window_size).enumerate() {
            if window == self.filler.as_slice() {
                if let Some((offset, bytes)) = open.take() {
                    push_block(&mut blocks, offset, bytes);
                }
                continue;
            }

            let offset = n * self.config.window_size;
            open.get_or_insert_with(|| (offset, BytesMut::new()))
                .1
                .extend_from_slice(window);
        }

        if let Some((offset, bytes)) = open {
            push_block(&mut blocks, offset, bytes);
        }

        tracing::debug!(
            input = data.len(),
            window = self.config.window_size,
            blocks = blocks.len(),
            "segmented byte sequence"
        );
        blocks
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        let config = SegmentConfig::default();
        Self {
            filler: config.filler_pattern(),
            config,
        }
    }
}

fn push_block(blocks: &mut Vec<Block>, offset: usize, bytes: BytesMut) {
    let block = Block {
        index: blocks.len() + 1,
        offset,
        bytes: bytes.freeze(),
    };
    tracing::trace!(index = block.index, offset, len = block.len(), "closed block");
    blocks.push(block);
}

/// Segment with the default 6-byte all-`0xFF` filler window.
pub fn segment(data: &[u8]) -> Vec<Block> {
    Segmenter::default().segment(data)
}
