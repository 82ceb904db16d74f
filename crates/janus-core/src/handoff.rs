// Author: Lukas Bower
// Purpose: Describe the untrusted image and gate the one-shot world switch.

//! Boot handoff to the untrusted world.
//!
//! The untrusted image sits at a fixed, known location; its first two
//! little-endian words are the initial stack pointer and the entry point, in
//! that order. Those two values are data ([`AppImage`]); the actual transfer
//! is a platform trampoline behind [`WorldSwitch`]. On hardware the switch
//! never returns and anything after it in the trusted world is unreachable;
//! hosted implementations return so the sequence stays testable.
//!
//! Beyond the blank-flash check on the entry word, no image validation is
//! performed at this layer.

use thiserror::Error;

/// Failures while describing or starting the untrusted image.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    /// The image region is too short to carry the two header words.
    #[error("untrusted image header is truncated at {0} bytes")]
    TruncatedImage(usize),
    /// The entry word reads as blank flash (all zeroes or all ones).
    #[error("untrusted image entry word is blank")]
    BlankImage,
    /// The untrusted world was already started this power cycle.
    #[error("untrusted world was already started")]
    AlreadyStarted,
}

/// Entry descriptor of the untrusted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppImage {
    initial_stack: u32,
    entry_point: u32,
}

impl AppImage {
    /// Describe an image from already-known header words.
    #[must_use]
    pub const fn new(initial_stack: u32, entry_point: u32) -> Self {
        Self {
            initial_stack,
            entry_point,
        }
    }

    /// Read the descriptor from the head of the image region.
    pub fn parse(image: &[u8]) -> Result<Self, HandoffError> {
        if image.len() < 8 {
            return Err(HandoffError::TruncatedImage(image.len()));
        }
        let mut word = [0u8; 4];
        word.copy_from_slice(&image[0..4]);
        let initial_stack = u32::from_le_bytes(word);
        word.copy_from_slice(&image[4..8]);
        let entry_point = u32::from_le_bytes(word);
        if entry_point == 0 || entry_point == u32::MAX {
            return Err(HandoffError::BlankImage);
        }
        Ok(Self {
            initial_stack,
            entry_point,
        })
    }

    /// Initial stack pointer the untrusted world starts on.
    #[must_use]
    pub const fn initial_stack(&self) -> u32 {
        self.initial_stack
    }

    /// Entry point control transfers to.
    #[must_use]
    pub const fn entry_point(&self) -> u32 {
        self.entry_point
    }
}

/// Platform trampoline performing the actual world switch.
pub trait WorldSwitch {
    /// Configure the untrusted stack pointer and transfer control to the
    /// entry point. One-directional; hardware implementations diverge.
    fn switch(&mut self, image: &AppImage);
}

/// One-shot gate in front of the trampoline.
#[derive(Debug)]
pub struct HandoffController {
    started: bool,
}

impl HandoffController {
    /// Fresh gate; the untrusted world has not been started.
    #[must_use]
    pub const fn new() -> Self {
        Self { started: false }
    }

    /// Whether the switch already fired this power cycle.
    #[must_use]
    pub fn started(&self) -> bool {
        self.started
    }

    /// Fire the trampoline exactly once.
    pub fn start<W: WorldSwitch>(
        &mut self,
        switch: &mut W,
        image: &AppImage,
    ) -> Result<(), HandoffError> {
        if self.started {
            return Err(HandoffError::AlreadyStarted);
        }
        self.started = true;
        log::info!(
            "[handoff] starting untrusted world entry=0x{entry:08x} sp=0x{sp:08x}",
            entry = image.entry_point(),
            sp = image.initial_stack(),
        );
        switch.switch(image);
        Ok(())
    }
}

impl Default for HandoffController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct RecordingSwitch {
        entries: Vec<AppImage>,
    }

    impl WorldSwitch for RecordingSwitch {
        fn switch(&mut self, image: &AppImage) {
            self.entries.push(*image);
        }
    }

    #[test]
    fn parse_reads_little_endian_words() {
        let mut image = [0u8; 16];
        image[0..4].copy_from_slice(&0x2000_4000u32.to_le_bytes());
        image[4..8].copy_from_slice(&0x0000_8145u32.to_le_bytes());
        let parsed = AppImage::parse(&image).unwrap();
        assert_eq!(parsed.initial_stack(), 0x2000_4000);
        assert_eq!(parsed.entry_point(), 0x0000_8145);
    }

    #[test]
    fn parse_rejects_truncated_header() {
        assert_eq!(
            AppImage::parse(&[0u8; 7]),
            Err(HandoffError::TruncatedImage(7))
        );
    }

    #[test]
    fn parse_rejects_blank_flash() {
        assert_eq!(AppImage::parse(&[0u8; 8]), Err(HandoffError::BlankImage));
        assert_eq!(AppImage::parse(&[0xff; 8]), Err(HandoffError::BlankImage));
    }

    #[test]
    fn controller_fires_at_most_once() {
        let mut controller = HandoffController::new();
        let mut switch = RecordingSwitch::default();
        let image = AppImage::new(0x2000_4000, 0x8145);

        controller.start(&mut switch, &image).unwrap();
        assert!(controller.started());
        assert_eq!(
            controller.start(&mut switch, &image),
            Err(HandoffError::AlreadyStarted)
        );
        assert_eq!(switch.entries.len(), 1);
    }
}
