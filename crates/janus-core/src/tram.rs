// Author: Lukas Bower
// Purpose: Implement the one-way trust RAM shared with the untrusted world.

//! Trust RAM: the single buffer shared across the world boundary.
//!
//! The trusted world writes, the untrusted world reads, never the other way
//! around. Reads copy the whole buffer by value so no reference into trusted
//! memory ever crosses the boundary. The store tracks no "valid length";
//! interpreting offsets is a caller convention.

use thiserror::Error;

/// Size of the shared buffer in bytes.
pub const TRUST_RAM_SIZE: usize = 128;

/// Errors raised by trusted-world writes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TramError {
    /// The write would run past the end of the buffer.
    #[error("write of {len} bytes at offset {offset} exceeds trust RAM of {size} bytes")]
    OutOfRange {
        /// Offset requested by the caller.
        offset: usize,
        /// Length of the data the caller supplied.
        len: usize,
        /// Fixed buffer size.
        size: usize,
    },
}

/// Fixed-size secret store owned by the trusted world.
#[derive(Debug)]
pub struct TrustRam {
    buf: [u8; TRUST_RAM_SIZE],
}

impl TrustRam {
    /// Allocate the buffer zero-initialised. Called once at trusted-world
    /// startup.
    #[must_use]
    pub const fn init() -> Self {
        Self {
            buf: [0u8; TRUST_RAM_SIZE],
        }
    }

    /// Overwrite `data.len()` bytes at `offset`, in place.
    ///
    /// Fails without touching the buffer when the write would run out of
    /// range. Only reachable from the trusted world.
    pub fn write(&mut self, data: &[u8], offset: usize) -> Result<(), TramError> {
        let end = offset.checked_add(data.len()).filter(|&end| end <= TRUST_RAM_SIZE);
        match end {
            Some(end) => {
                self.buf[offset..end].copy_from_slice(data);
                Ok(())
            }
            None => Err(TramError::OutOfRange {
                offset,
                len: data.len(),
                size: TRUST_RAM_SIZE,
            }),
        }
    }

    /// Copy out the whole buffer, regardless of how much was meaningfully
    /// written.
    #[must_use]
    pub fn read_all(&self) -> [u8; TRUST_RAM_SIZE] {
        self.buf
    }

    /// Build the read-only gateway handle handed to the untrusted world.
    #[must_use]
    pub fn reader(&self) -> TramReader<'_> {
        TramReader { ram: self }
    }
}

/// Read gateway crossing the world boundary.
///
/// The handle captures read access only; no write path is reachable through
/// it under any call sequence.
#[derive(Debug, Clone, Copy)]
pub struct TramReader<'a> {
    ram: &'a TrustRam,
}

impl TramReader<'_> {
    /// Copy out the whole buffer by value.
    #[must_use]
    pub fn read_all(&self) -> [u8; TRUST_RAM_SIZE] {
        self.ram.read_all()
    }
}
