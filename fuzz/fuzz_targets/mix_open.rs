//! Fuzz target for MixArchive::open with arbitrary byte input.
//!
//! Run with: cargo +nightly fuzz run mix_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Only panics and hangs are interesting; errors are expected
    if let Ok(mut archive) = cncmix::MixArchive::open(Cursor::new(data)) {
        let entries = archive.entries().to_vec();
        for entry in entries {
            let _ = archive.read_entry(&entry);
        }
        let _ = archive.verify_checksum();
    }
});
