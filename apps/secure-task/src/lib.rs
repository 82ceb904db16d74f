// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Expose the trusted-world supervisor building blocks.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Trusted-world supervisor for the Janus dual-world controller.
//!
//! Boot order: zero the trust RAM, audit it, authenticate the remote
//! identity device, derive the session secret, park it in the trust RAM,
//! then hand control to the untrusted world. Any fatal outcome halts the
//! secure world instead of retrying.

pub mod provision;
pub mod supervisor;
pub mod switch;

pub use supervisor::{FatalError, PhaseError, PhaseSequencer, SecurePhase, Supervisor};
pub use switch::InProcessSwitch;
