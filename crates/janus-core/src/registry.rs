// Author: Lukas Bower
// Purpose: Hold the build-time trust anchors for remote disposable keys.

//! Trust-anchor registry.
//!
//! The registry is baked into the deployed image; there is no runtime
//! insertion, removal or expiry. Membership is the whole trust decision:
//! a disposable key presented by the remote device is trusted exactly when
//! its 64 bytes match an entry.

use janus_element::PublicKey;

/// Build-time set of trusted public keys.
#[derive(Debug, Clone, Copy)]
pub struct KeyRegistry<'a> {
    entries: &'a [PublicKey],
}

impl<'a> KeyRegistry<'a> {
    /// Wrap the provisioned anchor list.
    #[must_use]
    pub const fn new(entries: &'a [PublicKey]) -> Self {
        Self { entries }
    }

    /// Whether `candidate` matches an entry byte-for-byte.
    ///
    /// Linear scan; entry order never affects the result. Partial or prefix
    /// matches are not trust.
    #[must_use]
    pub fn contains(&self, candidate: &PublicKey) -> bool {
        self.entries.iter().any(|entry| entry == candidate)
    }

    /// The first provisioned entry.
    ///
    /// Verification and key agreement run against this anchor, not against
    /// the key the remote presented (the two are byte-identical whenever the
    /// membership check passed on the first entry).
    #[must_use]
    pub fn anchor(&self) -> Option<&'a PublicKey> {
        self.entries.first()
    }

    /// Number of provisioned anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry carries no anchors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
