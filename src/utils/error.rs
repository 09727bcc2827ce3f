use std::io;
use thiserror::Error;

use crate::bitpack::Overflow;

/// Main error type for the codec library.
#[derive(Error, Debug)]
pub enum CodecError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The compressed stream does not start with a valid header
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    /// The header declares an empty image
    #[error("Invalid compressed image dimensions: {width}x{height}")]
    InvalidDimensions { width: u64, height: u64 },
    /// The body ended before the last word promised by the header
    #[error("Truncated stream: expected {expected} words, read {read}")]
    TruncatedStream { expected: usize, read: usize },
    /// A quantized value did not fit its packed field
    #[error("Field overflow: {0}")]
    Overflow(#[from] Overflow),
    /// The source or destination image could not be processed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// An invalid argument was provided
    #[error("Invalid argument: {0}")]
    InvalidArg(String),
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
