// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// Crate-wide lines to disable specific lints:

// Hardware components are constructed explicitly with their power-on state, so
// there will be no derived Default implementations unless needed.
#![allow(clippy::new_without_default)]

/// This module contains the error type shared by the motherboard and emulator.
pub mod error;

/// This module contains the CPU collaborator interface.
pub mod cpu;

/// This module contains address translation and the RAM/ROM planes.
pub mod memory;

/// This module contains the I/O port register bank and the system bus.
pub mod ports;

/// This module contains the external devices controller (keyboard and SMP multiplexer).
pub mod ext_device;

/// This module contains the removable SMP storage cartridge slots.
pub mod smp;

/// This module contains the tone generator and its timers.
pub mod sound_timer;

/// This module contains the breakpoint and watchpoint lists.
pub mod breakpoints;

/// This module contains the snapshot image layout and codec.
pub mod snapshot;

/// This module contains MK90 motherboard related functionality.
pub mod motherboard;

/// This module contains the application-level emulator API.
pub mod emulator;
