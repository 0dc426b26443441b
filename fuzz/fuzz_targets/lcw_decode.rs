//! Fuzz target for the LCW, XOR-delta and Pack decoders.
//!
//! The first two bytes choose the destination size; the rest is the stream.
//!
//! Run with: cargo +nightly fuzz run lcw_decode

#![no_main]

use cncmix::codec::{lcw, xor_delta};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let size = usize::from(u16::from_le_bytes([data[0], data[1]]));
    let stream = &data[2..];

    let mut dst = vec![0u8; size];
    if let Ok(written) = lcw::decode(&mut dst, 0, &mut &stream[..]) {
        assert!(written <= size);
    }
    let _ = xor_delta::decode(&mut dst, 0, &mut &stream[..]);
    let _ = cncmix::pack::decode_binary(stream);
});
