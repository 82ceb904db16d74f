// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define the secure-element capability interface and wire values.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![no_std]

//! Capability interface for the external identity devices used by Janus.
//!
//! The secure world talks to two discrete identity devices multiplexed on one
//! bus; only one of them is addressable at a time, selected by re-running
//! [`SecureElement::init`] with that endpoint's configuration. Every
//! cryptographic primitive (random, sign, verify, key agreement) is performed
//! inside the device and consumed here as an opaque capability call.

extern crate alloc;

#[cfg(feature = "mock")]
pub mod mock;

use thiserror::Error;

#[cfg(test)]
extern crate std;

/// Length of a raw elliptic-curve public key as stored by the device.
pub const PUBLIC_KEY_LEN: usize = 64;
/// Length of a signature produced by the device.
pub const SIGNATURE_LEN: usize = 64;
/// Length of a challenge nonce.
pub const NONCE_LEN: usize = 32;
/// Length of a derived shared secret.
pub const SECRET_LEN: usize = 32;
/// Length of the pre-shared transport wrap key.
pub const WRAP_KEY_LEN: usize = 32;

/// Raw 64-byte elliptic-curve point, compared only by byte equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Wrap raw key bytes. No curve validation is performed here; the device
    /// enforces point validity internally.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

/// Signature over exactly one challenge nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Wrap raw signature bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

/// Fresh 32-byte challenge, generated once per authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Wrap raw nonce bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw nonce bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Secret derived by the device's key-agreement capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedSecret([u8; SECRET_LEN]);

impl SharedSecret {
    /// Wrap raw secret bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }
}

/// Pre-shared transport key used by the device to protect a derived secret in
/// transit. Static provisioning data, not a negotiated secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapKey([u8; WRAP_KEY_LEN]);

impl WrapKey {
    /// Wrap raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; WRAP_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; WRAP_KEY_LEN] {
        &self.0
    }
}

/// Opaque reference to a key pair stored inside the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySlot(u8);

impl KeySlot {
    /// Reference the slot with the given device-local index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Device-local slot index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Identity-device families supported on the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Host-side identity device.
    Atecc508a,
    /// Remote identity device presenting disposable keys.
    Atecc608a,
}

/// Transport parameters addressing one identity device on the shared bus.
///
/// The retry count is the transport's own concern; the protocol layers above
/// never retry a capability call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Device family behind this endpoint.
    pub device: DeviceType,
    /// Bus address of the device.
    pub bus_addr: u8,
    /// Bus index the device is attached to.
    pub bus: u8,
    /// Bus clock in hertz.
    pub baud_hz: u32,
    /// Delay granted to the device to wake from sleep, in microseconds.
    pub wake_delay_us: u16,
    /// Transport-level receive retries.
    pub rx_retries: u8,
}

/// Errors surfaced by identity-device capability calls.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ElementError {
    /// The bus transaction could not be started or was interrupted.
    #[error("bus fault while addressing device 0x{0:02x}")]
    Bus(u8),
    /// The device did not acknowledge within the transport retry budget.
    #[error("device 0x{0:02x} did not acknowledge")]
    Nack(u8),
    /// The device failed to wake within the configured delay.
    #[error("device 0x{0:02x} failed to wake")]
    WakeTimeout(u8),
    /// The device reported a command execution failure.
    #[error("command rejected with device status 0x{0:02x}")]
    Execution(u8),
    /// The call sequence violated the device contract.
    #[error("unexpected command: {0}")]
    Protocol(&'static str),
}

/// Capability calls offered by an identity device.
///
/// All calls are synchronous and blocking; callers treat every error as fatal.
pub trait SecureElement {
    /// Point the provider at the endpoint described by `cfg`. Re-initialising
    /// is the only way to address the other device on the shared bus.
    fn init(&mut self, cfg: &EndpointConfig) -> Result<(), ElementError>;

    /// Fill `out` with device-generated random bytes.
    fn random(&mut self, out: &mut [u8]) -> Result<(), ElementError>;

    /// Sign `message` with the private key held in `slot`.
    fn sign(&mut self, slot: KeySlot, message: &[u8]) -> Result<Signature, ElementError>;

    /// Fetch the public half of the key pair held in `slot`.
    fn public_key(&mut self, slot: KeySlot) -> Result<PublicKey, ElementError>;

    /// Verify `signature` over `message` against `key`. A clean call that
    /// fails verification returns `Ok(false)`, not an error.
    fn verify(
        &mut self,
        message: &[u8],
        signature: &Signature,
        key: &PublicKey,
    ) -> Result<bool, ElementError>;

    /// Run the device's key-agreement primitive between the private key in
    /// `local_slot` and `peer`, with the result protected in transit by
    /// `wrap_key` as provisioned in `wrap_slot`.
    fn derive_shared_secret(
        &mut self,
        local_slot: KeySlot,
        peer: &PublicKey,
        wrap_key: &WrapKey,
        wrap_slot: KeySlot,
    ) -> Result<SharedSecret, ElementError>;
}
