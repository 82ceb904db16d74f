// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Defines the bare-metal entry scaffold for app-task.
// Author: Lukas Bower
#![allow(dead_code)]

//! Bare-metal entry for the application world.
//!
//! The deployed binary waits for a user trigger, reads the whole trust RAM
//! through the gateway veneer and prints it. The trigger peripheral is
//! platform bring-up; until it is integrated the entry parks the core.

use core::panic::PanicInfo;

/// Minimal entry point for bare-metal app-task binaries.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn _start() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

/// Panic handler that traps execution in a spin loop.
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {
        core::hint::spin_loop();
    }
}
