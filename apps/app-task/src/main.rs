// Author: Lukas Bower
#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![doc = "Untrusted-world entry points for host and bare-metal builds."]

#[cfg(target_os = "none")]
mod kernel;

#[cfg(not(target_os = "none"))]
use anyhow::Result;

/// Poll the trust RAM gateway a few times, as the deployed application does
/// on each user trigger.
#[cfg(not(target_os = "none"))]
fn main() -> Result<()> {
    use app_task::AppWorld;
    use janus_core::tram::TrustRam;

    env_logger::init();
    log::info!("[app] hello from the application world");

    // Off-hardware there is no secure world to inherit a gateway from; read
    // over a freshly zeroed store instead.
    let ram = TrustRam::init();
    let world = AppWorld::new(ram.reader());
    for trigger in 0..3u32 {
        log::info!("[app] read trigger {trigger}");
        let _ = world.poll();
    }
    Ok(())
}
