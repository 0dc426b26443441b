//! Westwood compression and delta codecs.
//!
//! Every decoder writes into a caller-owned destination whose final size is
//! known in advance; codecs never resize buffers. Commands are decoded from
//! one-to-four byte prefixes into small enums and applied with explicit
//! bounds checks, so malformed input surfaces as
//! [`Error::MalformedStream`] instead of a panic.
//!
//! | Module | Historical name | Direction |
//! |--------|-----------------|-----------|
//! | [`lcw`] | Format80 | decode + encode |
//! | [`xor_delta`] | Format40 | decode |
//! | [`zero_run`] | RLE-Zero (Dune II) | decode + encode |

pub mod lcw;
pub mod xor_delta;
pub mod zero_run;

use std::io::Read;

use crate::format::reader::{read_u8, read_u16_le};
use crate::{Error, Result};

/// Forward-only byte source that remembers how far it has read.
///
/// The position is used to point error messages at the offending command.
pub(crate) struct ByteSource<'a, R> {
    inner: &'a mut R,
    position: u64,
}

impl<'a, R: Read> ByteSource<'a, R> {
    pub(crate) fn new(inner: &'a mut R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed so far.
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    pub(crate) fn u8(&mut self, what: &str) -> Result<u8> {
        let value =
            read_u8(self.inner).map_err(|e| Error::from_read(e, self.position, what))?;
        self.position += 1;
        Ok(value)
    }

    pub(crate) fn u16(&mut self, what: &str) -> Result<u16> {
        let value =
            read_u16_le(self.inner).map_err(|e| Error::from_read(e, self.position, what))?;
        self.position += 2;
        Ok(value)
    }

    pub(crate) fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.inner
            .read_exact(buf)
            .map_err(|e| Error::from_read(e, self.position, what))?;
        self.position += buf.len() as u64;
        Ok(())
    }
}

/// Returns `start..start + count` if it lies within a buffer of `len` bytes.
pub(crate) fn checked_span(
    start: usize,
    count: usize,
    len: usize,
    offset: u64,
    command: &str,
) -> Result<std::ops::Range<usize>> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(start..end),
        _ => Err(Error::malformed(
            offset,
            format!(
                "{} of {} bytes at index {} overruns {}-byte destination",
                command, count, start, len
            ),
        )),
    }
}
