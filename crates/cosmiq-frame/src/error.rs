/// Errors raised while materializing a channel's hex text into bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The accumulated hex text does not split into whole bytes.
    #[error("odd number of hex digits ({len})")]
    OddLength { len: usize },

    /// The accumulated hex text contains a character that is not a hex digit.
    #[error("invalid hex character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

/// Errors that can occur while reading and framing a capture.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A fixed header field is not a hex digit pair.
    #[error("invalid {field} field {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// An I/O error occurred while reading the capture.
    #[error("capture I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
