//! Zero-run codec used by Dune II sprites.
//!
//! Each row is coded on its own: a non-zero byte stands for itself and a
//! `0x00` is followed by the number of zero bytes it stands for. A run never
//! spans two rows.

use super::ByteSource;
use crate::{Error, Result};

const MAX_RUN: usize = u8::MAX as usize;

fn frame_size(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .ok_or_else(|| Error::InvalidInput(format!("{}x{} frame is too large", width, height)))
}

/// Decodes a `width` by `height` image.
///
/// A run longer than what is left of its row is clipped to the row.
///
/// # Errors
///
/// Returns [`Error::MalformedStream`] if `src` ends before every row is
/// complete.
pub fn decode(src: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let size = frame_size(width, height)?;
    if size == 0 {
        return Ok(Vec::new());
    }
    // two source bytes yield at most MAX_RUN pixels
    let mut out = Vec::with_capacity(size.min(src.len().saturating_mul(MAX_RUN)));
    let mut reader = src;
    let mut src = ByteSource::new(&mut reader);

    for _ in 0..height {
        let mut remaining = width;
        while remaining > 0 {
            let value = src.u8("pixel")?;
            if value != 0 {
                out.push(value);
                remaining -= 1;
            } else {
                let zeros = usize::from(src.u8("zero run length")?).min(remaining);
                out.resize(out.len() + zeros, 0);
                remaining -= zeros;
            }
        }
    }
    Ok(out)
}

/// Encodes a `width` by `height` image.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `src` is not exactly `width * height`
/// bytes.
pub fn encode(src: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let size = frame_size(width, height)?;
    if src.len() != size {
        return Err(Error::InvalidInput(format!(
            "expected {} bytes for a {}x{} frame, got {}",
            size,
            width,
            height,
            src.len()
        )));
    }
    if width == 0 {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(size);
    for row in src.chunks(width) {
        let mut x = 0;
        while x < row.len() {
            if row[x] != 0 {
                out.push(row[x]);
                x += 1;
                continue;
            }
            let run = row[x..]
                .iter()
                .take(MAX_RUN)
                .take_while(|&&b| b == 0)
                .count();
            out.push(0);
            out.push(run as u8);
            x += run;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_run_then_literal() {
        assert_eq!(decode(&[0x00, 0x03, 0x05], 4, 1).unwrap(), vec![0, 0, 0, 5]);
    }

    #[test]
    fn test_run_clipped_to_row() {
        let src = [0x00, 0x09, 0x07, 0x00, 0x05];
        assert_eq!(decode(&src, 3, 2).unwrap(), vec![0, 0, 0, 7, 0, 0]);
    }

    #[test]
    fn test_truncated_is_malformed() {
        let err = decode(&[0x01, 0x00], 4, 1).unwrap_err();
        assert!(matches!(err, Error::MalformedStream { offset: 2, .. }));
    }

    #[test]
    fn test_huge_frame_from_short_stream() {
        // output grows with the source, so this fails at end of input
        let err = decode(&[0x01], usize::MAX / 2, 1).unwrap_err();
        assert!(matches!(err, Error::MalformedStream { offset: 1, .. }));
        assert!(matches!(
            decode(&[0x00, 0xFF], usize::MAX, 2).unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn test_encode_runs_stop_at_rows() {
        let frame = [0, 0, 4, 0, 0, 0];
        assert_eq!(
            encode(&frame, 3, 2).unwrap(),
            vec![0x00, 0x02, 0x04, 0x00, 0x03]
        );
    }

    #[test]
    fn test_encode_splits_long_runs() {
        let frame = vec![0u8; 300];
        let packed = encode(&frame, 300, 1).unwrap();
        assert_eq!(packed, vec![0x00, 0xFF, 0x00, 45]);
        assert_eq!(decode(&packed, 300, 1).unwrap(), frame);
    }

    #[test]
    fn test_encode_rejects_wrong_size() {
        assert!(matches!(
            encode(&[1, 2, 3], 2, 2).unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn test_empty_frame() {
        assert!(encode(&[], 0, 5).unwrap().is_empty());
        assert!(decode(&[], 0, 5).unwrap().is_empty());
    }
}
