//! Error types for the encoder service.

use thiserror::Error;

/// Closed set of failure categories reported across the guest boundary.
///
/// Every [`PngEncError`] maps onto exactly one of these through
/// [`PngEncError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required address argument was null.
    InvalidAddress,
    /// A size field failed the version tag or capacity check.
    InvalidSize,
    /// A configuration value is outside its accepted range.
    InvalidParam,
    /// The handle is null, malformed, or has been deleted.
    InvalidHandle,
    /// The compression backend failed.
    GenericFailure,
}

/// Errors produced by sizing, handle management and encoding.
#[derive(Debug, Error)]
pub enum PngEncError {
    /// A required pointer argument was null.
    #[error("Null address for {0}")]
    NullAddress(&'static str),

    /// The config's header size does not match the expected ABI tag.
    #[error("Header size mismatch: expected {expected}, got {actual}")]
    HeaderSizeMismatch { expected: u32, actual: u32 },

    /// Caller memory is smaller than the sizing formula requires.
    #[error("Encoder memory too small: need {required} bytes, got {actual}")]
    MemoryTooSmall { required: usize, actual: usize },

    /// Source pixel buffer is shorter than the rows that will be read.
    #[error("Source buffer too small: need {required} bytes, got {actual}")]
    SourceTooSmall { required: usize, actual: usize },

    /// Encoded stream does not fit the destination buffer.
    #[error("Destination too small: encoded {required} bytes, capacity {capacity}")]
    DestinationTooSmall { required: usize, capacity: usize },

    /// A configuration or request value is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// The handle record failed validation.
    #[error("Invalid handle: {0}")]
    InvalidHandle(&'static str),

    /// The PNG codec rejected the stream.
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

impl PngEncError {
    /// The status category this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PngEncError::NullAddress(_) => ErrorKind::InvalidAddress,
            PngEncError::HeaderSizeMismatch { .. }
            | PngEncError::MemoryTooSmall { .. }
            | PngEncError::SourceTooSmall { .. }
            | PngEncError::DestinationTooSmall { .. } => ErrorKind::InvalidSize,
            PngEncError::InvalidParam(_) => ErrorKind::InvalidParam,
            PngEncError::InvalidHandle(_) => ErrorKind::InvalidHandle,
            PngEncError::EncodingFailed(_) => ErrorKind::GenericFailure,
        }
    }
}

impl From<png::EncodingError> for PngEncError {
    fn from(err: png::EncodingError) -> Self {
        PngEncError::EncodingFailed(err.to_string())
    }
}

impl From<std::io::Error> for PngEncError {
    fn from(err: std::io::Error) -> Self {
        PngEncError::EncodingFailed(err.to_string())
    }
}
