use std::path::PathBuf;

/// Errors from segmentation setup and block persistence.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// A configuration value cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a block artifact failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A block artifact exceeds the configured size limit.
    #[error("block file too large ({size} bytes, max {max}): {}", path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// A directory holds more block artifacts than the configured limit.
    #[error("too many block files ({count}, max {max})")]
    TooMany { count: usize, max: usize },
}

impl BlockError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlockError>;
