// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Exercise the authentication engine against the scripted identity devices.
// Author: Lukas Bower

use janus_core::auth::{AuthEngine, AuthError};
use janus_core::registry::KeyRegistry;
use janus_element::mock::{ElementCall, MockElement};
use janus_element::{DeviceType, ElementError, EndpointConfig, KeySlot, PublicKey, Signature};

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

const DISPOSABLE_SLOT: KeySlot = KeySlot::new(4);

fn engine<'a>(
    element: &'a mut MockElement,
    anchors: &'a [PublicKey],
) -> AuthEngine<'a, MockElement> {
    AuthEngine::new(element, KeyRegistry::new(anchors), &HOST, &REMOTE, DISPOSABLE_SLOT)
}

#[test]
fn happy_path_reaches_authenticated_with_strict_call_order() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor, PublicKey::from_bytes([0x00; 64])];
    let mut element = MockElement::new().with_disposable_key(anchor);

    let proof = engine(&mut element, &anchors).authenticate().unwrap();
    assert_eq!(proof.disposable_key(), &anchor);
    assert_eq!(proof.anchor(), &anchor);

    let shape: Vec<&'static str> = element
        .calls()
        .iter()
        .map(|call| match call {
            ElementCall::Init { device: DeviceType::Atecc508a, .. } => "init-host",
            ElementCall::Init { device: DeviceType::Atecc608a, .. } => "init-remote",
            ElementCall::Random { .. } => "random",
            ElementCall::Sign { .. } => "sign",
            ElementCall::PublicKey { .. } => "pubkey",
            ElementCall::Verify { .. } => "verify",
            ElementCall::DeriveSharedSecret { .. } => "derive",
        })
        .collect();
    assert_eq!(
        shape,
        [
            "init-host",
            "random",
            "init-remote",
            "sign",
            "pubkey",
            "init-host",
            "verify",
        ]
    );
}

#[test]
fn verify_sees_the_generated_nonce_and_signature_unchanged() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);

    let proof = engine(&mut element, &anchors).authenticate().unwrap();

    let generated = element
        .calls()
        .iter()
        .find_map(|call| match call {
            ElementCall::Random { returned } => Some(returned.clone()),
            _ => None,
        })
        .expect("challenge generation journalled");
    let signed_message = element
        .calls()
        .iter()
        .find_map(|call| match call {
            ElementCall::Sign { message, .. } => Some(message.clone()),
            _ => None,
        })
        .expect("signing journalled");
    let (verified_message, verified_signature, verified_key) = element
        .calls()
        .iter()
        .find_map(|call| match call {
            ElementCall::Verify {
                message,
                signature,
                key,
            } => Some((message.clone(), signature.clone(), key.clone())),
            _ => None,
        })
        .expect("verification journalled");

    assert_eq!(generated, proof.nonce().as_bytes().to_vec());
    assert_eq!(signed_message, generated);
    assert_eq!(verified_message, generated);
    assert_eq!(verified_signature, proof.signature().as_bytes().to_vec());
    assert_eq!(verified_key, anchor.as_bytes().to_vec());
}

#[test]
fn consecutive_attempts_use_fresh_nonces() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);

    let first = engine(&mut element, &anchors).authenticate().unwrap();
    let second = engine(&mut element, &anchors).authenticate().unwrap();

    assert_ne!(first.nonce(), second.nonce());
    assert_ne!(first.signature(), second.signature());
}

#[test]
fn unprovisioned_key_short_circuits_before_verify() {
    let anchors = [PublicKey::from_bytes([0x67; 64])];
    let stranger = PublicKey::from_bytes([0x99; 64]);
    let mut element = MockElement::new().with_disposable_key(stranger);

    let err = engine(&mut element, &anchors).authenticate().unwrap_err();
    assert_eq!(err, AuthError::UntrustedKey);
    assert!(element
        .calls()
        .iter()
        .all(|call| !matches!(call, ElementCall::Verify { .. })));
}

#[test]
fn clean_negative_verification_is_auth_rejected() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);
    element.queue_verify(Ok(false));

    let err = engine(&mut element, &anchors).authenticate().unwrap_err();
    assert_eq!(err, AuthError::AuthRejected);
}

#[test]
fn verify_transport_fault_is_distinct_from_rejection() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);
    element.queue_verify(Err(ElementError::Bus(0xc0)));

    let err = engine(&mut element, &anchors).authenticate().unwrap_err();
    assert_eq!(err, AuthError::VerifyCallFailed(ElementError::Bus(0xc0)));
}

#[test]
fn sign_failure_halts_before_key_fetch() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);
    element.queue_sign(Err(ElementError::Execution(0x0f)));

    let err = engine(&mut element, &anchors).authenticate().unwrap_err();
    assert_eq!(err, AuthError::SignFailed(ElementError::Execution(0x0f)));

    assert!(matches!(
        element.calls().last(),
        Some(ElementCall::Sign { .. })
    ));
    assert!(element
        .calls()
        .iter()
        .all(|call| !matches!(call, ElementCall::PublicKey { .. })));
}

#[test]
fn key_fetch_failure_is_reported_as_such() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);
    element.queue_public_key(Err(ElementError::Nack(0xc2)));

    let err = engine(&mut element, &anchors).authenticate().unwrap_err();
    assert_eq!(err, AuthError::KeyFetchFailed(ElementError::Nack(0xc2)));
}

#[test]
fn scripted_signature_flows_through_untouched() {
    let anchor = PublicKey::from_bytes([0x67; 64]);
    let anchors = [anchor];
    let mut element = MockElement::new().with_disposable_key(anchor);
    let scripted = Signature::from_bytes([0x5a; 64]);
    element.queue_sign(Ok(scripted));

    let proof = engine(&mut element, &anchors).authenticate().unwrap();
    assert_eq!(proof.signature(), &scripted);
}
