//! LCW ("Format80") codec.
//!
//! LCW is Westwood's general-purpose LZ-style compressor. A stream is a
//! sequence of one-byte opcodes, some followed by counts, offsets or a fill
//! value:
//!
//! | Opcode | Command | Payload |
//! |--------|---------|---------|
//! | `0x00..=0x7F` | near copy | count `(b >> 4) + 3`, 12-bit distance back from the write index |
//! | `0x80` | exit | - |
//! | `0x81..=0xBF` | literal | `b & 0x3F` bytes copied verbatim |
//! | `0xC0..=0xFD` | medium copy | count `(b & 0x3F) + 3`, u16 offset |
//! | `0xFE` | fill | u16 count, value byte |
//! | `0xFF` | long copy | u16 count, u16 offset |
//!
//! The medium and long copies address the output either absolutely (from the
//! first index of this decode call) or relative to the write index. A stream
//! whose first byte is `0x00` is relative; any other first byte is already the
//! first opcode of an absolute stream.
//!
//! # Example
//!
//! ```rust
//! use cncmix::codec::lcw;
//!
//! let data = b"one two one two one two".to_vec();
//! let packed = lcw::encode(&data);
//! assert_eq!(lcw::decompress(&packed, data.len()).unwrap(), data);
//! ```

use std::io::Read;

use super::{ByteSource, checked_span};
use crate::{Error, Result};

const EXIT: u8 = 0x80;
const FILL: u8 = 0xFE;
const LONG_COPY: u8 = 0xFF;
const MEDIUM_COPY: u8 = 0xC0;

const MIN_MATCH: usize = 3;
const MAX_LITERAL: usize = 0x3F;
const NEAR_MAX_COUNT: usize = 10;
const NEAR_MAX_DISTANCE: usize = 0x0FFF;
const MEDIUM_MAX_COUNT: usize = 64;
const MAX_COUNT: usize = 0xFFFF;

/// Runs at least this long are written as a fill command.
const FILL_THRESHOLD: usize = 65;

/// Inputs up to this size are encoded with absolute offsets.
const ABSOLUTE_LIMIT: usize = 0xFFFF;

/// Furthest a relative copy may reach back.
const RELATIVE_WINDOW: usize = 0xFFFF;

/// Candidates examined per position by the match finder.
const MAX_CHAIN: usize = 256;

const HASH_BITS: u32 = 16;
const NIL: usize = usize::MAX;

/// How medium and long copy offsets are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Offsets count from the first destination index of the decode call.
    Absolute,
    /// Offsets count back from the current write index.
    Relative,
}

/// A decoded LCW command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LcwCommand {
    NearCopy { count: usize, distance: usize },
    Exit,
    Literal { count: usize },
    MediumCopy { count: usize, offset: u16 },
    Fill { count: usize, value: u8 },
    LongCopy { count: usize, offset: u16 },
}

impl LcwCommand {
    fn read<R: Read>(opcode: u8, src: &mut ByteSource<'_, R>) -> Result<Self> {
        Ok(match opcode {
            0x00..=0x7F => {
                let low = src.u8("near copy distance")?;
                LcwCommand::NearCopy {
                    count: usize::from(opcode >> 4) + 3,
                    distance: (usize::from(opcode & 0x0F) << 8) | usize::from(low),
                }
            }
            EXIT => LcwCommand::Exit,
            0x81..=0xBF => LcwCommand::Literal {
                count: usize::from(opcode & 0x3F),
            },
            0xC0..=0xFD => LcwCommand::MediumCopy {
                count: usize::from(opcode & 0x3F) + 3,
                offset: src.u16("medium copy offset")?,
            },
            FILL => {
                let count = usize::from(src.u16("fill count")?);
                let value = src.u8("fill value")?;
                LcwCommand::Fill { count, value }
            }
            LONG_COPY => {
                let count = usize::from(src.u16("long copy count")?);
                let offset = src.u16("long copy offset")?;
                LcwCommand::LongCopy { count, offset }
            }
        })
    }
}

/// Decodes an LCW stream into `dst`, starting at `start_index`.
///
/// Decoding runs until the exit opcode; filling `dst` does not end it.
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`Error::MalformedStream`] if the stream ends before the exit
/// opcode, a command writes past the end of `dst`, or a copy reads from
/// beyond the current write index.
pub fn decode<R: Read>(dst: &mut [u8], start_index: usize, src: &mut R) -> Result<usize> {
    let mut src = ByteSource::new(src);
    let first = src.u8("mode byte")?;
    let (addressing, mut pending) = if first == 0 {
        (Addressing::Relative, None)
    } else {
        (Addressing::Absolute, Some(first))
    };

    let mut index = start_index;
    loop {
        let at = if pending.is_some() { 0 } else { src.position() };
        let opcode = match pending.take() {
            Some(opcode) => opcode,
            None => src.u8("opcode")?,
        };

        match LcwCommand::read(opcode, &mut src)? {
            LcwCommand::Exit => return Ok(index - start_index),
            LcwCommand::Literal { count } => {
                let span = checked_span(index, count, dst.len(), at, "literal")?;
                src.fill(&mut dst[span], "literal bytes")?;
                index += count;
            }
            LcwCommand::Fill { count, value } => {
                let span = checked_span(index, count, dst.len(), at, "fill")?;
                dst[span].fill(value);
                index += count;
            }
            LcwCommand::NearCopy { count, distance } => {
                let from = index.checked_sub(distance).ok_or_else(|| {
                    Error::malformed(
                        at,
                        format!("near copy reaches {} bytes before index {}", distance, index),
                    )
                })?;
                replicate(dst, from, index, count, at)?;
                index += count;
            }
            LcwCommand::MediumCopy { count, offset } | LcwCommand::LongCopy { count, offset } => {
                let from = resolve(addressing, offset, start_index, index, at)?;
                replicate(dst, from, index, count, at)?;
                index += count;
            }
        }
    }
}

/// Decodes an LCW stream into a new buffer of exactly `size` bytes.
pub fn decompress(src: &[u8], size: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; size];
    let mut reader = src;
    decode(&mut out, 0, &mut reader)?;
    Ok(out)
}

fn resolve(
    addressing: Addressing,
    offset: u16,
    start_index: usize,
    index: usize,
    at: u64,
) -> Result<usize> {
    let offset = usize::from(offset);
    let from = match addressing {
        Addressing::Absolute => start_index.checked_add(offset),
        Addressing::Relative => index.checked_sub(offset),
    };
    from.ok_or_else(|| {
        Error::malformed(
            at,
            format!("{:?} copy offset {} is out of range at index {}", addressing, offset, index),
        )
    })
}

/// Copies `count` bytes from `from` to `to`, front to back.
///
/// Overlapping ranges repeat the pattern, which is how short back-references
/// expand into runs.
fn replicate(dst: &mut [u8], from: usize, to: usize, count: usize, at: u64) -> Result<()> {
    if from > to {
        return Err(Error::malformed(
            at,
            format!("copy source {} is ahead of write index {}", from, to),
        ));
    }
    checked_span(to, count, dst.len(), at, "block copy")?;
    if to - from >= count {
        dst.copy_within(from..from + count, to);
    } else {
        for i in 0..count {
            dst[to + i] = dst[from + i];
        }
    }
    Ok(())
}

/// Hash chains over three-byte prefixes of the input.
struct MatchFinder<'a> {
    data: &'a [u8],
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl<'a> MatchFinder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            head: vec![NIL; 1 << HASH_BITS],
            prev: vec![NIL; data.len()],
        }
    }

    fn hash(&self, pos: usize) -> usize {
        let key = (u32::from(self.data[pos]) << 16)
            | (u32::from(self.data[pos + 1]) << 8)
            | u32::from(self.data[pos + 2]);
        (key.wrapping_mul(2_654_435_761) >> (32 - HASH_BITS)) as usize
    }

    fn insert(&mut self, pos: usize) {
        if pos + MIN_MATCH <= self.data.len() {
            let h = self.hash(pos);
            self.prev[pos] = self.head[h];
            self.head[h] = pos;
        }
    }

    /// Longest earlier match for `pos`, as `(length, source)`.
    ///
    /// Chains run newest first and only a strictly longer match replaces the
    /// current best, so ties keep the closest source.
    fn longest_match(&self, pos: usize, limit: usize) -> Option<(usize, usize)> {
        if pos + MIN_MATCH > self.data.len() {
            return None;
        }
        let mut best: Option<(usize, usize)> = None;
        let mut candidate = self.head[self.hash(pos)];
        let mut depth = 0;
        while candidate != NIL && depth < MAX_CHAIN {
            if pos - candidate > RELATIVE_WINDOW {
                break;
            }
            let len = self.data[candidate..]
                .iter()
                .zip(&self.data[pos..pos + limit])
                .take_while(|(a, b)| a == b)
                .count();
            if len > best.map_or(0, |(l, _)| l) {
                best = Some((len, candidate));
                if len == limit {
                    break;
                }
            }
            candidate = self.prev[candidate];
            depth += 1;
        }
        best.filter(|&(len, _)| len >= MIN_MATCH)
    }
}

fn flush_literals(out: &mut Vec<u8>, src: &[u8], pending: &mut Option<usize>, end: usize) {
    if let Some(start) = pending.take() {
        out.push(EXIT | (end - start) as u8);
        out.extend_from_slice(&src[start..end]);
    }
}

fn emit_copy(out: &mut Vec<u8>, addressing: Addressing, pos: usize, from: usize, len: usize) {
    let distance = pos - from;
    if len <= NEAR_MAX_COUNT && distance <= NEAR_MAX_DISTANCE {
        out.push((((len - 3) << 4) | (distance >> 8)) as u8);
        out.push(distance as u8);
        return;
    }

    let offset = match addressing {
        Addressing::Absolute => from,
        Addressing::Relative => distance,
    } as u16;
    if len <= MEDIUM_MAX_COUNT {
        out.push(MEDIUM_COPY | (len - 3) as u8);
    } else {
        out.push(LONG_COPY);
        out.extend_from_slice(&(len as u16).to_le_bytes());
    }
    out.extend_from_slice(&offset.to_le_bytes());
}

/// Compresses `src` into an LCW stream.
///
/// Greedy single pass: at each position the encoder compares the run of the
/// current byte with the longest earlier match and emits whichever command
/// covers more input, falling back to literals. Inputs larger than 64 KiB
/// are written in relative mode (leading `0x00`) and only reference the last
/// 65535 bytes. The stream always ends with the exit opcode.
pub fn encode(src: &[u8]) -> Vec<u8> {
    let addressing = if src.len() > ABSOLUTE_LIMIT {
        Addressing::Relative
    } else {
        Addressing::Absolute
    };

    let mut out = Vec::with_capacity(src.len() / 2 + 16);
    if addressing == Addressing::Relative {
        out.push(0);
    }

    let mut finder = MatchFinder::new(src);
    let mut literals: Option<usize> = None;
    let mut pos = 0;
    while pos < src.len() {
        let limit = (src.len() - pos).min(MAX_COUNT);
        let run = src[pos..pos + limit]
            .iter()
            .take_while(|&&b| b == src[pos])
            .count();
        let found = finder.longest_match(pos, limit);
        let match_len = found.map_or(0, |(len, _)| len);

        let step = if run >= FILL_THRESHOLD && run >= match_len {
            flush_literals(&mut out, src, &mut literals, pos);
            out.push(FILL);
            out.extend_from_slice(&(run as u16).to_le_bytes());
            out.push(src[pos]);
            run
        } else if let Some((len, from)) = found {
            flush_literals(&mut out, src, &mut literals, pos);
            emit_copy(&mut out, addressing, pos, from, len);
            len
        } else {
            literals.get_or_insert(pos);
            1
        };

        for p in pos..pos + step {
            finder.insert(p);
        }
        pos += step;

        if literals.is_some_and(|start| pos - start == MAX_LITERAL) {
            flush_literals(&mut out, src, &mut literals, pos);
        }
    }

    flush_literals(&mut out, src, &mut literals, pos);
    out.push(EXIT);
    out
}
