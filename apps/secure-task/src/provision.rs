// Author: Lukas Bower
// Purpose: Compile-in the trust anchors and endpoint provisioning for this image.

//! Static provisioning data baked into the deployed secure image.
//!
//! Nothing here is negotiated at runtime: endpoint transport parameters, key
//! slots, the trust-anchor list and the transport wrap key are all fixed when
//! the image is built.

use janus_element::{DeviceType, EndpointConfig, KeySlot, PublicKey, WrapKey};

/// Host identity device on the shared bus.
pub const HOST_ENDPOINT: EndpointConfig = EndpointConfig {
    device: DeviceType::Atecc508a,
    bus_addr: 0xc0,
    bus: 1,
    baud_hz: 100_000,
    wake_delay_us: 800,
    rx_retries: 20,
};

/// Remote identity device presenting the disposable key.
pub const REMOTE_ENDPOINT: EndpointConfig = EndpointConfig {
    device: DeviceType::Atecc608a,
    bus_addr: 0xc2,
    bus: 1,
    baud_hz: 100_000,
    wake_delay_us: 800,
    rx_retries: 20,
};

/// Slot holding the disposable signing key pair on the remote device, and the
/// local private key for key agreement on the host device.
pub const DISPOSABLE_SLOT: KeySlot = KeySlot::new(4);

/// Slot the transport wrap key is provisioned into.
pub const WRAP_SLOT: KeySlot = KeySlot::new(2);

/// Where the derived session secret lands inside the trust RAM.
pub const SECRET_OFFSET: usize = 0;

/// Fixed location of the untrusted image.
pub const APP_IMAGE_BASE: u32 = 0x0000_8000;

/// Pre-shared transport key protecting derived secrets on the bus.
pub const WRAP_KEY: WrapKey = WrapKey::from_bytes([
    0xf2, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, //
    0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, //
    0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, //
    0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x2f,
]);

/// Trust anchors accepted from the remote device. The first entry is the
/// anchor used for verification and key agreement; the second slot is
/// reserved for a future remote identity and stays zeroed until provisioned.
pub static KEY_REGISTRY: [PublicKey; 2] = [
    PublicKey::from_bytes([
        0x67, 0x51, 0x50, 0x54, 0x59, 0x23, 0xdc, 0x6a, //
        0x8c, 0xbc, 0xe5, 0x26, 0x90, 0x04, 0xe8, 0xa5, //
        0x66, 0xbc, 0x12, 0xa8, 0xcc, 0xce, 0xd7, 0xa8, //
        0x6d, 0xf0, 0x9a, 0x5f, 0xd6, 0xb0, 0xd9, 0xf9, //
        0x89, 0x40, 0x45, 0xe5, 0x43, 0xa9, 0xce, 0xe7, //
        0x39, 0x91, 0xb9, 0xe3, 0xd5, 0x55, 0xe7, 0xb2, //
        0x82, 0x76, 0x79, 0x6f, 0x03, 0x4b, 0x40, 0x4c, //
        0x87, 0x48, 0x16, 0xd8, 0xc8, 0xd0, 0x23, 0xe4,
    ]),
    PublicKey::from_bytes([0u8; 64]),
];
