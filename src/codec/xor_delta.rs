//! XOR-delta codec ("Format40").
//!
//! A Format40 stream describes how to turn one frame into the next: it skips
//! over unchanged bytes and XORs the changed ones, either with bytes taken
//! from the stream or with a repeated value. Because every change is an XOR,
//! applying the same delta twice restores the original frame.

use std::io::Read;

use super::{ByteSource, checked_span};
use crate::{Error, Result};

const LONG_COMMAND: u8 = 0x80;
const LONG_XOR_BIT: u16 = 0x8000;
const LONG_FILL_BIT: u16 = 0x4000;
const LONG_COUNT_MASK: u16 = 0x3FFF;

/// A decoded Format40 command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeltaCommand {
    Exit,
    Skip(usize),
    XorBytes(usize),
    XorFill { count: usize, value: u8 },
}

impl DeltaCommand {
    fn read<R: Read>(src: &mut ByteSource<'_, R>) -> Result<Self> {
        let opcode = src.u8("opcode")?;
        Ok(match opcode {
            0x00 => {
                let count = usize::from(src.u8("fill count")?);
                let value = src.u8("fill value")?;
                DeltaCommand::XorFill { count, value }
            }
            0x01..=0x7F => DeltaCommand::XorBytes(usize::from(opcode)),
            LONG_COMMAND => {
                let word = src.u16("long command")?;
                if word == 0 {
                    DeltaCommand::Exit
                } else if word & LONG_XOR_BIT == 0 {
                    DeltaCommand::Skip(usize::from(word))
                } else if word & LONG_FILL_BIT == 0 {
                    DeltaCommand::XorBytes(usize::from(word & LONG_COUNT_MASK))
                } else {
                    let value = src.u8("fill value")?;
                    DeltaCommand::XorFill {
                        count: usize::from(word & LONG_COUNT_MASK),
                        value,
                    }
                }
            }
            0x81..=0xFF => DeltaCommand::Skip(usize::from(opcode & 0x7F)),
        })
    }
}

/// Applies a Format40 delta to `dst`, starting at `start_index`.
///
/// An empty destination is left alone without reading from `src`. Skips may
/// run past the end of `dst`; only a write there is an error. Returns the
/// final write index relative to `start_index`.
///
/// # Errors
///
/// Returns [`Error::MalformedStream`] if the stream ends before the exit
/// command or an XOR would touch bytes outside `dst`.
pub fn decode<R: Read>(dst: &mut [u8], start_index: usize, src: &mut R) -> Result<usize> {
    if dst.is_empty() {
        return Ok(0);
    }

    let mut src = ByteSource::new(src);
    let mut index = start_index;
    loop {
        let at = src.position();
        match DeltaCommand::read(&mut src)? {
            DeltaCommand::Exit => return Ok(index - start_index),
            DeltaCommand::Skip(count) => index = index.saturating_add(count),
            DeltaCommand::XorBytes(count) => {
                let span = checked_span(index, count, dst.len(), at, "XOR copy")?;
                let mut delta = vec![0u8; count];
                src.fill(&mut delta, "XOR bytes")?;
                for (out, d) in dst[span].iter_mut().zip(&delta) {
                    *out ^= d;
                }
                index += count;
            }
            DeltaCommand::XorFill { count, value } => {
                let span = checked_span(index, count, dst.len(), at, "XOR fill")?;
                for out in &mut dst[span] {
                    *out ^= value;
                }
                index += count;
            }
        }
    }
}

/// Applies a delta held in memory to a whole frame.
pub fn apply(frame: &mut [u8], delta: &[u8]) -> Result<()> {
    let mut reader = delta;
    decode(frame, 0, &mut reader).map(|_| ()).map_err(|e| match e {
        Error::MalformedStream { offset, reason } => Error::MalformedStream {
            offset,
            reason: format!("delta frame: {}", reason),
        },
        other => other,
    })
}
