// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define trusted-world protocol, trust RAM and handoff primitives.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![no_std]

//! Trusted-world core for the Janus dual-world controller.
//!
//! The secure world authenticates a remote identity device with a disposable
//! key exchange ([`auth`]), derives a session secret with it ([`exchange`]),
//! parks the secret in the one-way trust RAM ([`tram`]) and only then starts
//! the untrusted world ([`handoff`]). Trust anchors live in [`registry`].

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod auth;
pub mod console;
pub mod exchange;
pub mod handoff;
pub mod registry;
pub mod tram;

pub use auth::{AuthEngine, AuthError, Authenticated, Endpoint};
pub use exchange::{derive_session_secret, ExchangeError};
pub use handoff::{AppImage, HandoffController, HandoffError, WorldSwitch};
pub use registry::KeyRegistry;
pub use tram::{TramError, TramReader, TrustRam, TRUST_RAM_SIZE};
