// Author: Lukas Bower
#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![doc = "Trusted-world entry points for host and bare-metal builds."]

#[cfg(target_os = "none")]
mod kernel;

#[cfg(not(target_os = "none"))]
use anyhow::Result;

/// Run the secure-world sequence against the simulated bus.
#[cfg(not(target_os = "none"))]
fn main() -> Result<()> {
    use janus_element::mock::MockElement;
    use secure_task::{provision, InProcessSwitch, Supervisor};

    env_logger::init();

    let element = MockElement::new().with_disposable_key(provision::KEY_REGISTRY[0]);
    let mut supervisor = Supervisor::new(element);
    let mut switch = InProcessSwitch::new();

    // Synthetic untrusted image: initial stack then entry point, little endian.
    let mut image = [0u8; 64];
    image[0..4].copy_from_slice(&0x2000_4000u32.to_le_bytes());
    image[4..8].copy_from_slice(&(provision::APP_IMAGE_BASE + 0x145).to_le_bytes());

    match supervisor.run(&mut switch, &image) {
        Ok(()) => {
            log::info!("[secure] untrusted world started; secure world parked");
            Ok(())
        }
        Err(err) => {
            log::error!("[secure] halted: {err}");
            Err(err.into())
        }
    }
}
