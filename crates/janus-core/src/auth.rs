// Author: Lukas Bower
// Purpose: Run the disposable-key challenge/response against the remote identity device.

//! Disposable-key authentication engine.
//!
//! One linear pass, no retries: challenge the remote device with a fresh
//! nonce, collect its signature and disposable public key, check the key
//! against the trust anchors, then have the host device verify the
//! signature. Only a completed pass yields an [`Authenticated`] proof, and
//! key agreement ([`crate::exchange`]) requires that proof.
//!
//! The two identity devices share one bus; exactly one is addressable at a
//! time. The engine threads the current selection through its own state and
//! re-initialises the provider at every switch, so the strict call ordering
//! below is mandatory and not reorderable.

use janus_element::{
    ElementError, EndpointConfig, KeySlot, Nonce, PublicKey, SecureElement, Signature, NONCE_LEN,
};
use thiserror::Error;

use crate::console;
use crate::registry::KeyRegistry;

/// Identity endpoint currently addressed on the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Local identity device performing challenge generation and verification.
    Host,
    /// Remote identity device presenting the disposable key.
    Remote,
}

/// Terminal failures of one authentication attempt.
///
/// `UntrustedKey` and `AuthRejected` are expected negative outcomes; the
/// rest are infrastructure faults. All of them are fatal to the attempt and
/// must keep the untrusted world from starting.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// An endpoint could not be configured, or the challenge could not be
    /// generated.
    #[error("endpoint initialisation failed: {0}")]
    InitFailed(ElementError),
    /// The remote device failed to sign the challenge.
    #[error("remote signing failed: {0}")]
    SignFailed(ElementError),
    /// The remote device failed to hand over its disposable public key.
    #[error("disposable key fetch failed: {0}")]
    KeyFetchFailed(ElementError),
    /// The verification call itself errored; distinct from a clean negative
    /// result.
    #[error("verification call failed: {0}")]
    VerifyCallFailed(ElementError),
    /// Verification ran cleanly and rejected the signature.
    #[error("signature rejected by host verification")]
    AuthRejected,
    /// The disposable key is not a trust anchor; no verification was
    /// attempted.
    #[error("disposable key is not a trust anchor")]
    UntrustedKey,
}

/// Proof that one challenge/response pass completed.
///
/// Carries the nonce and signature of exactly this attempt plus the anchor
/// the trust check resolved. Not clonable: key agreement consumes the proof,
/// so each authentication yields at most one derived secret.
#[derive(Debug)]
pub struct Authenticated {
    nonce: Nonce,
    signature: Signature,
    disposable_key: PublicKey,
    anchor: PublicKey,
}

impl Authenticated {
    /// Challenge nonce of this attempt.
    #[must_use]
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Signature the remote produced over [`Self::nonce`].
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Disposable key the remote presented.
    #[must_use]
    pub fn disposable_key(&self) -> &PublicKey {
        &self.disposable_key
    }

    /// Registry anchor the trust check resolved. Verification ran against
    /// this stored key, not against [`Self::disposable_key`]; the membership
    /// check established the two agree.
    #[must_use]
    pub fn anchor(&self) -> &PublicKey {
        &self.anchor
    }
}

/// Single-use engine for one authentication attempt.
pub struct AuthEngine<'a, E: SecureElement> {
    element: &'a mut E,
    registry: KeyRegistry<'a>,
    host: &'a EndpointConfig,
    remote: &'a EndpointConfig,
    disposable_slot: KeySlot,
    selected: Option<Endpoint>,
}

impl<'a, E: SecureElement> AuthEngine<'a, E> {
    /// Bind an engine to the provider, anchors and endpoint provisioning.
    pub fn new(
        element: &'a mut E,
        registry: KeyRegistry<'a>,
        host: &'a EndpointConfig,
        remote: &'a EndpointConfig,
        disposable_slot: KeySlot,
    ) -> Self {
        Self {
            element,
            registry,
            host,
            remote,
            disposable_slot,
            selected: None,
        }
    }

    fn select(&mut self, endpoint: Endpoint) -> Result<(), ElementError> {
        let cfg = match endpoint {
            Endpoint::Host => self.host,
            Endpoint::Remote => self.remote,
        };
        self.element.init(cfg)?;
        self.selected = Some(endpoint);
        log::info!("[auth] {endpoint:?} endpoint ready at 0x{addr:02x}", addr = cfg.bus_addr);
        Ok(())
    }

    /// Run the whole exchange. Consumes the engine: a fresh nonce means a
    /// fresh engine.
    pub fn authenticate(mut self) -> Result<Authenticated, AuthError> {
        log::info!("[auth] disposable asymmetric authentication in progress");

        self.select(Endpoint::Host).map_err(AuthError::InitFailed)?;

        let mut challenge = [0u8; NONCE_LEN];
        self.element
            .random(&mut challenge)
            .map_err(AuthError::InitFailed)?;
        let nonce = Nonce::from_bytes(challenge);
        console::dump("auth:nonce", nonce.as_bytes());

        self.select(Endpoint::Remote).map_err(AuthError::InitFailed)?;

        debug_assert_eq!(self.selected, Some(Endpoint::Remote));
        let signature = self
            .element
            .sign(self.disposable_slot, nonce.as_bytes())
            .map_err(AuthError::SignFailed)?;
        console::dump("auth:signature", signature.as_bytes());

        let disposable_key = self
            .element
            .public_key(self.disposable_slot)
            .map_err(AuthError::KeyFetchFailed)?;
        console::dump("auth:disposable-key", disposable_key.as_bytes());

        self.select(Endpoint::Host).map_err(AuthError::InitFailed)?;

        if !self.registry.contains(&disposable_key) {
            log::warn!("[auth] disposable key is not provisioned; rejecting without verify");
            return Err(AuthError::UntrustedKey);
        }
        let anchor = *self.registry.anchor().ok_or(AuthError::UntrustedKey)?;
        log::info!("[auth] disposable key found among {n} anchors", n = self.registry.len());

        debug_assert_eq!(self.selected, Some(Endpoint::Host));
        let verified = self
            .element
            .verify(nonce.as_bytes(), &signature, &anchor)
            .map_err(AuthError::VerifyCallFailed)?;
        if !verified {
            log::warn!("[auth] host rejected the remote signature");
            return Err(AuthError::AuthRejected);
        }

        log::info!("[auth] remote identity authenticated by host");
        Ok(Authenticated {
            nonce,
            signature,
            disposable_key,
            anchor,
        })
    }
}
