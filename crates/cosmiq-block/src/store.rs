use std::io::Read;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{BlockError, Result};
use crate::segment::Block;

/// File name prefix for persisted blocks.
pub const BLOCK_FILE_PREFIX: &str = "dive_log_block_";

/// File extension for persisted blocks.
pub const BLOCK_FILE_EXTENSION: &str = "bin";

/// Limits applied when re-ingesting block files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum bytes read from one block file. Default: 16 MiB.
    pub max_block_size: u64,
    /// Maximum number of block files listed from a directory. Default: 4096.
    pub max_blocks: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_block_size: 16 * 1024 * 1024,
            max_blocks: 4096,
        }
    }
}

/// A directory of raw block files, one per recovered block.
#[derive(Debug, Clone)]
pub struct BlockStore {
    dir: PathBuf,
    config: StoreConfig,
}

impl BlockStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(dir, StoreConfig::default())
    }

    pub fn with_config(dir: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path a block is written to: `dive_log_block_{index}.bin`.
    pub fn path_for(&self, block: &Block) -> PathBuf {
        self.dir.join(format!(
            "{BLOCK_FILE_PREFIX}{}.{BLOCK_FILE_EXTENSION}",
            block.index
        ))
    }

    /// Write one block, creating the directory if needed. Existing files are replaced.
    pub fn write(&self, block: &Block) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|err| BlockError::io(&self.dir, err))?;
        let path = self.path_for(block);
        std::fs::write(&path, block.as_bytes()).map_err(|err| BlockError::io(&path, err))?;
        tracing::debug!(path = %path.display(), len = block.len(), "wrote block");
        Ok(path)
    }

    /// Write every block in order.
    pub fn write_all(&self, blocks: &[Block]) -> Result<Vec<PathBuf>> {
        blocks.iter().map(|block| self.write(block)).collect()
    }

    /// Remove `dive_log_block_{n}.bin` files left by an earlier run.
    ///
    /// Returns the number of files removed. A missing directory counts as empty.
    pub fn clear(&self) -> Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(BlockError::io(&self.dir, err)),
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|err| BlockError::io(&self.dir, err))?;
            let path = entry.path();
            if !is_block_file_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let file_type = entry
                .file_type()
                .map_err(|err| BlockError::io(&path, err))?;
            if !file_type.is_file() {
                continue;
            }
            std::fs::remove_file(&path).map_err(|err| BlockError::io(&path, err))?;
            removed += 1;
        }

        if removed > 0 {
            tracing::debug!(dir = %self.dir.display(), removed, "removed stale block files");
        }
        Ok(removed)
    }

    /// List `*.bin` files in the directory, sorted by file name.
    ///
    /// Symlinks and anything that is not a regular file are skipped.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|err| BlockError::io(&self.dir, err))?;
        let mut paths = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|err| BlockError::io(&self.dir, err))?;
            let path = entry.path();
            let has_extension = path
                .extension()
                .map(|ext| ext == BLOCK_FILE_EXTENSION)
                .unwrap_or(false);
            if !has_extension {
                continue;
            }

            let file_type = entry
                .file_type()
                .map_err(|err| BlockError::io(&path, err))?;
            if !file_type.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-regular block entry");
                continue;
            }

            paths.push(path);
            if paths.len() > self.config.max_blocks {
                return Err(BlockError::TooMany {
                    count: paths.len(),
                    max: self.config.max_blocks,
                });
            }
        }

        paths.sort();
        Ok(paths)
    }
}

/// Read one block file, bounded by `config.max_block_size`.
pub fn read_block(path: &Path, config: &StoreConfig) -> Result<Bytes> {
    let file = std::fs::File::open(path).map_err(|err| BlockError::io(path, err))?;
    let size = file
        .metadata()
        .map_err(|err| BlockError::io(path, err))?
        .len();
    let max = config.max_block_size;
    if size > max {
        return Err(BlockError::TooLarge {
            path: path.to_path_buf(),
            size,
            max,
        });
    }

    let mut data = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
    file.take(max.saturating_add(1))
        .read_to_end(&mut data)
        .map_err(|err| BlockError::io(path, err))?;
    if data.len() as u64 > max {
        return Err(BlockError::TooLarge {
            path: path.to_path_buf(),
            size: data.len() as u64,
            max,
        });
    }

    Ok(Bytes::from(data))
}

fn is_block_file_name(name: &str) -> bool {
    name.strip_prefix(BLOCK_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(BLOCK_FILE_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .map(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
