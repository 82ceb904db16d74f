// Author: Lukas Bower
// Purpose: Shared console hex-dump formatting for both worlds.

//! Byte-dump helpers for the line-oriented console.
//!
//! Output is observability only; nothing in the protocol depends on it.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

/// Bytes rendered per console line.
const BYTES_PER_LINE: usize = 8;

/// Render `bytes` as console lines of `0xNN, ` pairs, eight per line.
#[must_use]
pub fn hex_lines(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(BYTES_PER_LINE)
        .map(|chunk| {
            let mut line = String::new();
            for byte in chunk {
                let _ = write!(line, "0x{byte:02x}, ");
            }
            line
        })
        .collect()
}

/// Log `bytes` under `tag` as debug-level hex lines.
pub fn dump(tag: &str, bytes: &[u8]) {
    for line in hex_lines(bytes) {
        log::debug!("[{tag}] {line}");
    }
}

/// Compact single-line rendering for log messages.
#[must_use]
pub fn short_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
