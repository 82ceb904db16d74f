// Author: Lukas Bower
// Purpose: Sequence the trusted-world boot phases from RAM audit to handoff.

//! Linear secure-world supervisor.
//!
//! Phases run exactly once, in order; skipping or repeating one is a fatal
//! supervisor fault distinct from the protocol's own error taxonomy. On any
//! fatal outcome the caller parks the core instead of retrying: restart
//! requires an external power cycle.

use janus_core::auth::{AuthEngine, AuthError};
use janus_core::console;
use janus_core::exchange::{derive_session_secret, ExchangeError};
use janus_core::handoff::{AppImage, HandoffController, HandoffError, WorldSwitch};
use janus_core::registry::KeyRegistry;
use janus_core::tram::{TramError, TramReader, TrustRam};
use janus_element::SecureElement;
use thiserror::Error;

use crate::provision;

/// Secure-world boot phases, executed exactly once in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurePhase {
    /// Zero-initialise the trust RAM.
    TrustRamInit,
    /// Dump the RAM content observed before authentication.
    RamAudit,
    /// Run the disposable-key exchange.
    Authenticate,
    /// Derive the session secret.
    DeriveSecret,
    /// Park the secret in the trust RAM.
    ProvisionSecret,
    /// Start the untrusted world.
    WorldHandoff,
}

impl SecurePhase {
    const fn as_str(self) -> &'static str {
        match self {
            Self::TrustRamInit => "TrustRamInit",
            Self::RamAudit => "RamAudit",
            Self::Authenticate => "Authenticate",
            Self::DeriveSecret => "DeriveSecret",
            Self::ProvisionSecret => "ProvisionSecret",
            Self::WorldHandoff => "WorldHandoff",
        }
    }
}

const ORDERING: &[SecurePhase] = &[
    SecurePhase::TrustRamInit,
    SecurePhase::RamAudit,
    SecurePhase::Authenticate,
    SecurePhase::DeriveSecret,
    SecurePhase::ProvisionSecret,
    SecurePhase::WorldHandoff,
];

/// Fatal sequencing faults raised by the supervisor itself.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhaseError {
    /// A phase ran outside the fixed order.
    #[error("phase order violation: expected {expected}, saw {saw}")]
    OutOfOrder {
        /// Phase the ordering demanded next.
        expected: &'static str,
        /// Phase that was attempted.
        saw: &'static str,
    },
    /// A phase was attempted after the sequence completed.
    #[error("phase advance attempted after completion")]
    Complete,
}

/// Tracks phase progress and rejects re-entry or reordering.
#[derive(Debug)]
pub struct PhaseSequencer {
    next: usize,
}

impl PhaseSequencer {
    /// Sequencer positioned before the first phase.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Mark `phase` as executed, logging a beacon line.
    pub fn advance(&mut self, phase: SecurePhase) -> Result<(), PhaseError> {
        let Some(&expected) = ORDERING.get(self.next) else {
            return Err(PhaseError::Complete);
        };
        if expected != phase {
            return Err(PhaseError::OutOfOrder {
                expected: expected.as_str(),
                saw: phase.as_str(),
            });
        }
        log::info!("[secure] phase {name}", name = phase.as_str());
        self.next += 1;
        Ok(())
    }
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal supervisor outcome; any variant halts the secure world.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// Authentication failed or could not run.
    #[error("authentication failed: {0}")]
    Auth(AuthError),
    /// Key agreement failed after authentication.
    #[error("key agreement failed: {0}")]
    Exchange(ExchangeError),
    /// The secret could not be parked in the trust RAM.
    #[error("trust RAM write failed: {0}")]
    Tram(TramError),
    /// The untrusted image could not be described or started.
    #[error("handoff failed: {0}")]
    Handoff(HandoffError),
    /// The supervisor's own sequencing was violated.
    #[error("supervisor fault: {0}")]
    Phase(PhaseError),
}

impl From<PhaseError> for FatalError {
    fn from(err: PhaseError) -> Self {
        Self::Phase(err)
    }
}

/// Trusted-world supervisor owning the provider and the trust RAM.
pub struct Supervisor<E: SecureElement> {
    element: E,
    tram: TrustRam,
    sequencer: PhaseSequencer,
    handoff: HandoffController,
}

impl<E: SecureElement> Supervisor<E> {
    /// Bind the supervisor to its identity-device provider.
    pub fn new(element: E) -> Self {
        Self {
            element,
            tram: TrustRam::init(),
            sequencer: PhaseSequencer::new(),
            handoff: HandoffController::new(),
        }
    }

    /// Read gateway over the trust RAM, for handing to the untrusted world.
    #[must_use]
    pub fn reader(&self) -> TramReader<'_> {
        self.tram.reader()
    }

    /// Borrow the identity-device provider, for diagnostics.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Run the full secure-world sequence over the untrusted image at
    /// `image`. Returns only after the world switch fired (hosted switches
    /// return; hardware ones do not) or on the first fatal error.
    pub fn run<W: WorldSwitch>(&mut self, switch: &mut W, image: &[u8]) -> Result<(), FatalError> {
        log::info!("[secure] hello from the secure world");

        self.sequencer.advance(SecurePhase::TrustRamInit)?;
        self.tram = TrustRam::init();

        self.sequencer.advance(SecurePhase::RamAudit)?;
        let snapshot = self.tram.read_all();
        log::info!("[secure] current data in the trust RAM:");
        console::dump("secure:tram", &snapshot);

        self.sequencer.advance(SecurePhase::Authenticate)?;
        let registry = KeyRegistry::new(&provision::KEY_REGISTRY);
        let proof = AuthEngine::new(
            &mut self.element,
            registry,
            &provision::HOST_ENDPOINT,
            &provision::REMOTE_ENDPOINT,
            provision::DISPOSABLE_SLOT,
        )
        .authenticate()
        .map_err(FatalError::Auth)?;

        self.sequencer.advance(SecurePhase::DeriveSecret)?;
        let secret = derive_session_secret(
            &mut self.element,
            proof,
            provision::DISPOSABLE_SLOT,
            &provision::WRAP_KEY,
            provision::WRAP_SLOT,
        )
        .map_err(FatalError::Exchange)?;

        self.sequencer.advance(SecurePhase::ProvisionSecret)?;
        self.tram
            .write(secret.as_bytes(), provision::SECRET_OFFSET)
            .map_err(FatalError::Tram)?;
        log::info!("[secure] session secret parked in trust RAM for the application world");

        self.sequencer.advance(SecurePhase::WorldHandoff)?;
        let descriptor = AppImage::parse(image).map_err(FatalError::Handoff)?;
        self.handoff
            .start(switch, &descriptor)
            .map_err(FatalError::Handoff)?;

        Ok(())
    }
}
