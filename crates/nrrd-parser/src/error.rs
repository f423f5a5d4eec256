//! Error types for NRRD parsing.

use thiserror::Error;

/// Errors that can occur while decoding an NRRD container.
///
/// All variants are fatal to the single decode request that produced them;
/// retry policy belongs to whoever loaded the bytes.
#[derive(Debug, Error)]
pub enum NrrdError {
    /// The boundary scan exhausted the buffer without finding the
    /// header terminator (`\r\n\r\n` or `\n\n`).
    #[error("no header terminator found")]
    NoHeaderTerminator,

    /// The header text could not be decoded.
    #[error("invalid NRRD header: {0}")]
    InvalidHeader(String),

    /// A mandatory header field is absent.
    #[error("NRRD header is missing the mandatory field \"{0}\"")]
    MissingField(&'static str),

    /// The `type` field names a scalar type we cannot read.
    #[error("unsupported scalar type \"{0}\"")]
    UnsupportedType(String),

    /// The codec rejected the compressed body.
    #[error("failed to decompress NRRD body: {0}")]
    Decompression(String),

    /// The decompressed body is shorter than the header-declared extent.
    #[error("volume body too short: header declares {expected} bytes, body has {actual}")]
    TruncatedBody { expected: usize, actual: usize },

    /// A sample was requested outside the volume extent.
    #[error("point ({0}, {1}, {2}) is outside the volume")]
    OutOfVolume(f32, f32, f32),
}
