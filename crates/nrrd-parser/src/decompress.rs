//! Body decompression.
//!
//! NRRD bodies are gzip in the wild, but some producers emit bare zlib or
//! raw deflate streams, so decoding sniffs the container before picking a
//! codec. The work runs under `spawn_blocking` so a decode request never
//! stalls the caller's scheduling thread.

use std::io::Read;

use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};

use crate::NrrdError;

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompress the body on the blocking pool.
pub async fn decompress(body: Bytes) -> Result<Vec<u8>, NrrdError> {
    tokio::task::spawn_blocking(move || inflate(&body))
        .await
        .map_err(|e| NrrdError::Decompression(format!("decompression task failed: {e}")))?
}

/// Synchronous decode; pick the codec from the stream prefix.
fn inflate(data: &[u8]) -> Result<Vec<u8>, NrrdError> {
    let mut out = Vec::new();
    if data.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| NrrdError::Decompression(format!("gzip: {e}")))?;
    } else if is_zlib_header(data) {
        ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| NrrdError::Decompression(format!("zlib: {e}")))?;
    } else {
        DeflateDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| NrrdError::Decompression(format!("deflate: {e}")))?;
    }
    Ok(out)
}

/// Zlib header check: CMF/FLG pair with deflate method and a valid
/// header checksum.
fn is_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => (cmf & 0x0f) == 8 && ((*cmf as u16) << 8 | *flg as u16) % 31 == 0,
        _ => false,
    }
}
