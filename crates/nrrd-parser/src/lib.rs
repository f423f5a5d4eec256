//! NRRD container parsing.
//!
//! An NRRD file is an ASCII header terminated by a blank line (`\r\n\r\n`
//! or `\n\n`), followed by a compressed binary body. This crate locates the
//! header/body boundary with an escape-aware scanner, decodes the header
//! into a typed [`VolumeHeader`], gunzips the body off the caller's
//! scheduling thread, and hands back a [`Volume`] ready for sampling.

pub mod error;
pub mod header;
pub mod scan;
pub mod volume;

mod decompress;

pub use error::NrrdError;
pub use header::{Endianness, ScalarType, SpaceAxes, VolumeHeader};
pub use volume::Volume;

use bytes::Bytes;

/// Parse a raw NRRD byte buffer into a [`Volume`].
///
/// One call per buffer; the returned volume is exclusively owned by the
/// caller. Decompression runs on the blocking pool, so the caller's task
/// is never stalled by the codec.
pub async fn parse(data: Bytes) -> Result<Volume, NrrdError> {
    let header_length = scan::header_length(&data).ok_or(NrrdError::NoHeaderTerminator)?;
    let header_text = std::str::from_utf8(&data[..header_length])
        .map_err(|e| NrrdError::InvalidHeader(format!("header is not valid UTF-8: {e}")))?;
    let header = VolumeHeader::parse(header_text)?;
    tracing::debug!(
        header_length,
        body_length = data.len() - header_length,
        scalar_type = ?header.scalar_type,
        "parsed NRRD header"
    );
    let body = decompress::decompress(data.slice(header_length..)).await?;
    Volume::new(header, body)
}
