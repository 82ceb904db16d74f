// Author: Lukas Bower
// Purpose: Gate session-secret derivation on a completed authentication.

//! Post-authentication key agreement.
//!
//! A single capability call against the host device's key-agreement
//! primitive. The peer key passed in is the registry anchor carried by the
//! [`Authenticated`] proof, and the proof is consumed: one authentication,
//! at most one derived secret.

use janus_element::{ElementError, KeySlot, SecureElement, SharedSecret, WrapKey};
use thiserror::Error;

use crate::auth::Authenticated;
use crate::console;

/// Failure of the key-agreement capability call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeError {
    /// The device could not complete the derivation.
    #[error("shared-secret derivation failed: {0}")]
    DerivationFailed(ElementError),
}

/// Derive the session secret for an authenticated exchange.
///
/// `wrap_key` is static provisioning data the device uses to protect the
/// result on the bus; it is not a secret negotiated by this protocol.
pub fn derive_session_secret<E: SecureElement>(
    element: &mut E,
    proof: Authenticated,
    local_slot: KeySlot,
    wrap_key: &WrapKey,
    wrap_slot: KeySlot,
) -> Result<SharedSecret, ExchangeError> {
    let secret = element
        .derive_shared_secret(local_slot, proof.anchor(), wrap_key, wrap_slot)
        .map_err(ExchangeError::DerivationFailed)?;
    log::info!("[exchange] session secret derived via slot {slot}", slot = local_slot.index());
    console::dump("exchange:secret", secret.as_bytes());
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthEngine;
    use crate::registry::KeyRegistry;
    use janus_element::mock::{ElementCall, MockElement};
    use janus_element::{DeviceType, EndpointConfig, PublicKey};

    const HOST: EndpointConfig = EndpointConfig {
        device: DeviceType::Atecc508a,
        bus_addr: 0xc0,
        bus: 1,
        baud_hz: 100_000,
        wake_delay_us: 800,
        rx_retries: 20,
    };
    const REMOTE: EndpointConfig = EndpointConfig {
        device: DeviceType::Atecc608a,
        bus_addr: 0xc2,
        bus: 1,
        baud_hz: 100_000,
        wake_delay_us: 800,
        rx_retries: 20,
    };

    fn authenticated(element: &mut MockElement, anchors: &[PublicKey]) -> Authenticated {
        let registry = KeyRegistry::new(anchors);
        AuthEngine::new(element, registry, &HOST, &REMOTE, KeySlot::new(4))
            .authenticate()
            .expect("scripted exchange authenticates")
    }

    #[test]
    fn derivation_uses_the_registry_anchor_as_peer() {
        let anchor = PublicKey::from_bytes([0x67; 64]);
        let presented = PublicKey::from_bytes([0x99; 64]);
        let anchors = [anchor, presented];
        let mut element = MockElement::new().with_disposable_key(presented);
        let proof = authenticated(&mut element, &anchors);

        derive_session_secret(
            &mut element,
            proof,
            KeySlot::new(4),
            &WrapKey::from_bytes([0x11; 32]),
            KeySlot::new(2),
        )
        .unwrap();

        let derive = element
            .calls()
            .iter()
            .find_map(|call| match call {
                ElementCall::DeriveSharedSecret { peer, .. } => Some(peer.clone()),
                _ => None,
            })
            .expect("derivation call journalled");
        assert_eq!(derive, anchor.as_bytes().to_vec());
    }

    #[test]
    fn device_failure_maps_to_derivation_failed() {
        let anchor = PublicKey::from_bytes([0x67; 64]);
        let anchors = [anchor];
        let mut element = MockElement::new().with_disposable_key(anchor);
        let proof = authenticated(&mut element, &anchors);

        element.queue_derive(Err(ElementError::Execution(0x3c)));
        let err = derive_session_secret(
            &mut element,
            proof,
            KeySlot::new(4),
            &WrapKey::from_bytes([0x11; 32]),
            KeySlot::new(2),
        )
        .unwrap_err();
        assert_eq!(err, ExchangeError::DerivationFailed(ElementError::Execution(0x3c)));
    }
}
