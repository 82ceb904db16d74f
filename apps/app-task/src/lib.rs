// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Read the trust RAM gateway from the untrusted world.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Untrusted-world application.
//!
//! The application world owns nothing of the protocol: it receives a read
//! gateway over the trust RAM at boot and re-reads the whole buffer on
//! demand. The secret's position inside the buffer is a convention shared
//! with the secure world, not something the store tracks.

use janus_core::console;
use janus_core::tram::{TramReader, TRUST_RAM_SIZE};

/// Offset the secure world parks the session secret at.
const SECRET_OFFSET: usize = 0;
/// Length of the parked session secret.
const SECRET_LEN: usize = 32;

/// Application world bound to its read gateway.
#[derive(Debug, Clone, Copy)]
pub struct AppWorld<'a> {
    reader: TramReader<'a>,
}

impl<'a> AppWorld<'a> {
    /// Bind to the gateway handed over at boot.
    #[must_use]
    pub fn new(reader: TramReader<'a>) -> Self {
        Self { reader }
    }

    /// Re-read the whole trust RAM and dump it to the console.
    #[must_use]
    pub fn poll(&self) -> [u8; TRUST_RAM_SIZE] {
        let copy = self.reader.read_all();
        log::info!("[app] data in trust RAM:");
        console::dump("app:tram", &copy);
        copy
    }

    /// The session secret under the shared offset convention.
    #[must_use]
    pub fn session_secret(&self) -> [u8; SECRET_LEN] {
        let copy = self.reader.read_all();
        let mut secret = [0u8; SECRET_LEN];
        secret.copy_from_slice(&copy[SECRET_OFFSET..SECRET_OFFSET + SECRET_LEN]);
        secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janus_core::tram::TrustRam;

    #[test]
    fn poll_returns_the_full_buffer_copy() {
        let mut ram = TrustRam::init();
        ram.write(&[0xab; 32], 0).unwrap();
        let world = AppWorld::new(ram.reader());
        let copy = world.poll();
        assert_eq!(copy.len(), TRUST_RAM_SIZE);
        assert_eq!(&copy[..32], &[0xab; 32]);
        assert_eq!(copy, world.poll());
    }

    #[test]
    fn session_secret_follows_the_offset_convention() {
        let mut ram = TrustRam::init();
        ram.write(&[0x5c; 32], 0).unwrap();
        ram.write(&[0xff; 8], 64).unwrap();
        let world = AppWorld::new(ram.reader());
        assert_eq!(world.session_secret(), [0x5c; 32]);
    }
}
