// Author: Lukas Bower
// Purpose: Provide the scripted identity-device double used by tests and host builds.

//! Scripted stand-in for the identity devices on the shared bus.
//!
//! Every capability call is journalled with its arguments so tests can assert
//! call ordering and byte identity across protocol steps. Replies can be
//! queued per operation; with nothing queued each call succeeds with a
//! deterministic value, which lets hosted builds run the full exchange
//! without hardware.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use sha2::{Digest, Sha256};

use crate::{
    DeviceType, ElementError, EndpointConfig, KeySlot, Nonce, PublicKey, SecureElement,
    SharedSecret, Signature, NONCE_LEN, PUBLIC_KEY_LEN, SECRET_LEN, SIGNATURE_LEN,
};

/// One journalled capability call with the arguments the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementCall {
    /// Endpoint selection.
    Init {
        /// Device family addressed.
        device: DeviceType,
        /// Bus address addressed.
        bus_addr: u8,
    },
    /// Random generation, with the bytes actually handed back.
    Random {
        /// Bytes returned to the caller.
        returned: Vec<u8>,
    },
    /// Signing request.
    Sign {
        /// Slot index used.
        slot: u8,
        /// Message bytes as received.
        message: Vec<u8>,
    },
    /// Public-key fetch.
    PublicKey {
        /// Slot index used.
        slot: u8,
    },
    /// Verification request.
    Verify {
        /// Message bytes as received.
        message: Vec<u8>,
        /// Signature bytes as received.
        signature: Vec<u8>,
        /// Key bytes as received.
        key: Vec<u8>,
    },
    /// Key-agreement request.
    DeriveSharedSecret {
        /// Local private-key slot index.
        local_slot: u8,
        /// Peer public-key bytes as received.
        peer: Vec<u8>,
        /// Transport wrap slot index.
        wrap_slot: u8,
    },
}

/// Scripted identity device implementing [`SecureElement`].
#[derive(Debug, Default)]
pub struct MockElement {
    calls: Vec<ElementCall>,
    selected: Option<DeviceType>,
    counter: u64,
    disposable_key: Option<PublicKey>,
    init_replies: VecDeque<Result<(), ElementError>>,
    random_replies: VecDeque<Result<Nonce, ElementError>>,
    sign_replies: VecDeque<Result<Signature, ElementError>>,
    public_key_replies: VecDeque<Result<PublicKey, ElementError>>,
    verify_replies: VecDeque<Result<bool, ElementError>>,
    derive_replies: VecDeque<Result<SharedSecret, ElementError>>,
}

impl MockElement {
    /// Create a device whose calls all succeed with deterministic values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the public key reported for any slot when no reply is queued.
    #[must_use]
    pub fn with_disposable_key(mut self, key: PublicKey) -> Self {
        self.disposable_key = Some(key);
        self
    }

    /// Queue a reply for the next unanswered `init` call.
    pub fn queue_init(&mut self, reply: Result<(), ElementError>) {
        self.init_replies.push_back(reply);
    }

    /// Queue a reply for the next unanswered `random` call.
    pub fn queue_random(&mut self, reply: Result<Nonce, ElementError>) {
        self.random_replies.push_back(reply);
    }

    /// Queue a reply for the next unanswered `sign` call.
    pub fn queue_sign(&mut self, reply: Result<Signature, ElementError>) {
        self.sign_replies.push_back(reply);
    }

    /// Queue a reply for the next unanswered `public_key` call.
    pub fn queue_public_key(&mut self, reply: Result<PublicKey, ElementError>) {
        self.public_key_replies.push_back(reply);
    }

    /// Queue a reply for the next unanswered `verify` call.
    pub fn queue_verify(&mut self, reply: Result<bool, ElementError>) {
        self.verify_replies.push_back(reply);
    }

    /// Queue a reply for the next unanswered `derive_shared_secret` call.
    pub fn queue_derive(&mut self, reply: Result<SharedSecret, ElementError>) {
        self.derive_replies.push_back(reply);
    }

    /// Journal of every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[ElementCall] {
        &self.calls
    }

    /// Device currently addressed on the simulated bus.
    #[must_use]
    pub fn selected(&self) -> Option<DeviceType> {
        self.selected
    }

    fn next_block(&mut self, domain: &[u8]) -> [u8; 32] {
        self.counter = self.counter.wrapping_add(1);
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(self.counter.to_le_bytes());
        hasher.finalize().into()
    }
}

impl SecureElement for MockElement {
    fn init(&mut self, cfg: &EndpointConfig) -> Result<(), ElementError> {
        self.calls.push(ElementCall::Init {
            device: cfg.device,
            bus_addr: cfg.bus_addr,
        });
        let reply = self.init_replies.pop_front().unwrap_or(Ok(()));
        if reply.is_ok() {
            log::debug!("[mock] addressed {:?} at 0x{:02x}", cfg.device, cfg.bus_addr);
            self.selected = Some(cfg.device);
        }
        reply
    }

    fn random(&mut self, out: &mut [u8]) -> Result<(), ElementError> {
        match self.random_replies.pop_front() {
            Some(Ok(nonce)) => {
                let n = out.len().min(NONCE_LEN);
                out[..n].copy_from_slice(&nonce.as_bytes()[..n]);
            }
            Some(Err(err)) => {
                self.calls.push(ElementCall::Random {
                    returned: Vec::new(),
                });
                return Err(err);
            }
            None => {
                for chunk in out.chunks_mut(32) {
                    let block = self.next_block(b"janus-mock-random");
                    chunk.copy_from_slice(&block[..chunk.len()]);
                }
            }
        }
        self.calls.push(ElementCall::Random {
            returned: out.to_vec(),
        });
        Ok(())
    }

    fn sign(&mut self, slot: KeySlot, message: &[u8]) -> Result<Signature, ElementError> {
        self.calls.push(ElementCall::Sign {
            slot: slot.index(),
            message: message.to_vec(),
        });
        if let Some(reply) = self.sign_replies.pop_front() {
            return reply;
        }
        let mut first = Sha256::new();
        first.update(b"janus-mock-sign");
        first.update([slot.index()]);
        first.update(message);
        let head: [u8; 32] = first.finalize().into();
        let tail: [u8; 32] = Sha256::digest(head).into();
        let mut sig = [0u8; SIGNATURE_LEN];
        sig[..32].copy_from_slice(&head);
        sig[32..].copy_from_slice(&tail);
        Ok(Signature::from_bytes(sig))
    }

    fn public_key(&mut self, slot: KeySlot) -> Result<PublicKey, ElementError> {
        self.calls.push(ElementCall::PublicKey {
            slot: slot.index(),
        });
        if let Some(reply) = self.public_key_replies.pop_front() {
            return reply;
        }
        if let Some(key) = self.disposable_key {
            return Ok(key);
        }
        let head = self.next_block(b"janus-mock-pubkey");
        let tail = self.next_block(b"janus-mock-pubkey");
        let mut key = [0u8; PUBLIC_KEY_LEN];
        key[..32].copy_from_slice(&head);
        key[32..].copy_from_slice(&tail);
        Ok(PublicKey::from_bytes(key))
    }

    fn verify(
        &mut self,
        message: &[u8],
        signature: &Signature,
        key: &PublicKey,
    ) -> Result<bool, ElementError> {
        self.calls.push(ElementCall::Verify {
            message: message.to_vec(),
            signature: signature.as_bytes().to_vec(),
            key: key.as_bytes().to_vec(),
        });
        self.verify_replies.pop_front().unwrap_or(Ok(true))
    }

    fn derive_shared_secret(
        &mut self,
        local_slot: KeySlot,
        peer: &PublicKey,
        _wrap_key: &crate::WrapKey,
        wrap_slot: KeySlot,
    ) -> Result<SharedSecret, ElementError> {
        self.calls.push(ElementCall::DeriveSharedSecret {
            local_slot: local_slot.index(),
            peer: peer.as_bytes().to_vec(),
            wrap_slot: wrap_slot.index(),
        });
        if let Some(reply) = self.derive_replies.pop_front() {
            return reply;
        }
        let mut hasher = Sha256::new();
        hasher.update(b"janus-mock-ecdh");
        hasher.update([local_slot.index()]);
        hasher.update(peer.as_bytes());
        let secret: [u8; SECRET_LEN] = hasher.finalize().into();
        Ok(SharedSecret::from_bytes(secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_cfg() -> EndpointConfig {
        EndpointConfig {
            device: DeviceType::Atecc508a,
            bus_addr: 0xc0,
            bus: 1,
            baud_hz: 100_000,
            wake_delay_us: 800,
            rx_retries: 20,
        }
    }

    #[test]
    fn journal_records_calls_in_order() {
        let mut dev = MockElement::new();
        dev.init(&host_cfg()).unwrap();
        let mut nonce = [0u8; NONCE_LEN];
        dev.random(&mut nonce).unwrap();
        assert_eq!(dev.calls().len(), 2);
        assert!(matches!(dev.calls()[0], ElementCall::Init { bus_addr: 0xc0, .. }));
        assert!(matches!(dev.calls()[1], ElementCall::Random { .. }));
    }

    #[test]
    fn default_random_is_deterministic_per_call() {
        let mut a = MockElement::new();
        let mut b = MockElement::new();
        let mut first = [0u8; NONCE_LEN];
        let mut second = [0u8; NONCE_LEN];
        a.random(&mut first).unwrap();
        b.random(&mut second).unwrap();
        assert_eq!(first, second);
        let mut third = [0u8; NONCE_LEN];
        a.random(&mut third).unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn queued_failure_is_consumed_once() {
        let mut dev = MockElement::new();
        dev.queue_init(Err(ElementError::WakeTimeout(0xc0)));
        assert_eq!(dev.init(&host_cfg()), Err(ElementError::WakeTimeout(0xc0)));
        assert!(dev.selected().is_none());
        assert_eq!(dev.init(&host_cfg()), Ok(()));
        assert_eq!(dev.selected(), Some(DeviceType::Atecc508a));
    }

    #[test]
    fn fixed_disposable_key_overrides_generated_one() {
        let key = PublicKey::from_bytes([0x42; PUBLIC_KEY_LEN]);
        let mut dev = MockElement::new().with_disposable_key(key);
        assert_eq!(dev.public_key(KeySlot::new(4)).unwrap(), key);
    }
}
