//! Chunked LCW with a base64 text form.
//!
//! Red Alert and Tiberian Sun store map overlays and terrain in INI files as
//! a "pack": the payload is cut into 8 KiB chunks, each chunk is LCW-encoded
//! and prefixed with `[u16 encoded_len][u16 decoded_len]`, and the whole
//! binary is base64-encoded and spread over numbered keys.
//!
//! # Example
//!
//! ```rust
//! use cncmix::pack;
//!
//! let overlay = vec![0xFFu8; pack::CHUNK_SIZE * 2];
//! let text = pack::encode(&overlay).unwrap();
//! let lines = pack::split_lines(&text, pack::LINE_WIDTH);
//! assert_eq!(pack::decode(&pack::join_lines(lines)).unwrap(), overlay);
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::codec::lcw;
use crate::format::reader::u16_at;
use crate::{Error, Result};

/// Size of one uncompressed chunk.
pub const CHUNK_SIZE: usize = 8192;

/// Line width of the base64 text in game INI files.
pub const LINE_WIDTH: usize = 70;

const CHUNK_HEADER_SIZE: usize = 4;

/// One chunk located by the first pass over the binary form.
struct ChunkSpan<'a> {
    offset: usize,
    encoded: &'a [u8],
    decoded_len: usize,
}

fn scan_chunks(bytes: &[u8]) -> Result<Vec<ChunkSpan<'_>>> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let (Some(encoded_len), Some(decoded_len)) = (u16_at(bytes, pos), u16_at(bytes, pos + 2))
        else {
            return Err(Error::malformed(pos as u64, "truncated chunk header"));
        };
        let start = pos + CHUNK_HEADER_SIZE;
        let end = start + usize::from(encoded_len);
        let encoded = bytes.get(start..end).ok_or_else(|| {
            Error::malformed(
                pos as u64,
                format!(
                    "chunk declares {} encoded bytes but only {} remain",
                    encoded_len,
                    bytes.len().saturating_sub(start)
                ),
            )
        })?;
        chunks.push(ChunkSpan {
            offset: pos,
            encoded,
            decoded_len: usize::from(decoded_len),
        });
        pos = end;
    }
    Ok(chunks)
}

/// Decodes the binary chunk sequence.
///
/// The output is sized from the declared chunk lengths before anything is
/// decompressed. A chunk that decodes to fewer bytes than declared leaves
/// zeros behind and is logged as a warning.
pub fn decode_binary(bytes: &[u8]) -> Result<Vec<u8>> {
    let chunks = scan_chunks(bytes)?;
    let total = chunks.iter().map(|c| c.decoded_len).sum();
    let mut out = vec![0u8; total];

    let mut at = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        let dst = &mut out[at..at + chunk.decoded_len];
        let mut src = chunk.encoded;
        let written = lcw::decode(dst, 0, &mut src).map_err(|e| match e {
            Error::MalformedStream { offset, reason } => Error::malformed(
                (chunk.offset + CHUNK_HEADER_SIZE) as u64 + offset,
                format!("chunk {}: {}", i, reason),
            ),
            other => other,
        })?;
        if written < chunk.decoded_len {
            log::warn!(
                "Pack chunk {} decoded to {} bytes, expected {}",
                i,
                written,
                chunk.decoded_len
            );
        }
        at += chunk.decoded_len;
    }
    Ok(out)
}

/// Decodes base64 pack text, ignoring any ASCII whitespace in it.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::malformed(0, format!("invalid base64: {}", e)))?;
    decode_binary(&bytes)
}

/// Encodes `data` into the binary chunk sequence.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless `data.len()` is a multiple of
/// [`CHUNK_SIZE`].
pub fn encode_binary(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % CHUNK_SIZE != 0 {
        return Err(Error::InvalidInput(format!(
            "pack data must be a multiple of {} bytes, got {}",
            CHUNK_SIZE,
            data.len()
        )));
    }

    let mut out = Vec::with_capacity(data.len() / 4);
    for chunk in data.chunks(CHUNK_SIZE) {
        let encoded = lcw::encode(chunk);
        let encoded_len = u16::try_from(encoded.len()).map_err(|_| {
            Error::InvalidInput(format!("chunk encodes to {} bytes", encoded.len()))
        })?;
        out.extend_from_slice(&encoded_len.to_le_bytes());
        out.extend_from_slice(&(CHUNK_SIZE as u16).to_le_bytes());
        out.extend_from_slice(&encoded);
    }
    Ok(out)
}

/// Encodes `data` as base64 pack text on a single line.
pub fn encode(data: &[u8]) -> Result<String> {
    Ok(STANDARD.encode(encode_binary(data)?))
}

/// Cuts `text` into lines of at most `width` characters.
pub fn split_lines(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(i, _)| i);
        let (line, tail) = rest.split_at(end);
        lines.push(line);
        rest = tail;
    }
    lines
}

/// Joins lines produced by [`split_lines`] (or read back from numbered INI
/// keys) into one string.
pub fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .collect()
}
