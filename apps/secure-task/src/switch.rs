// Author: Lukas Bower
// Purpose: Provide the in-process world switch used off-hardware.

//! Hosted stand-in for the platform trampoline.
//!
//! On hardware the switch programs the untrusted stack pointer and branches
//! to the entry point without returning. Off-hardware we only record the
//! entry so simulations and tests can observe that — and how often — the
//! untrusted world was started.

use janus_core::handoff::{AppImage, WorldSwitch};

/// Recording switch for hosted builds and tests.
#[derive(Debug, Default)]
pub struct InProcessSwitch {
    entries: Vec<AppImage>,
}

impl InProcessSwitch {
    /// Switch with no recorded entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every world entry recorded so far.
    #[must_use]
    pub fn entries(&self) -> &[AppImage] {
        &self.entries
    }
}

impl WorldSwitch for InProcessSwitch {
    fn switch(&mut self, image: &AppImage) {
        log::info!(
            "[switch] simulated world entry at 0x{entry:08x}",
            entry = image.entry_point()
        );
        self.entries.push(*image);
    }
}
