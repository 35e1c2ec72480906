// SPDX-License-Identifier: GPL-3.0
// motherboard.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::Path;

use crate::{error::Result, memory::AddressType};

/// This module contains the default motherboard implementation. There
/// may be others in future.
pub mod mk90_motherboard;

/// Trace flags for `set_trace`.
pub const TRACE_NONE: u32 = 0;
pub const TRACE_CPUROM: u32 = 0o1;
pub const TRACE_CPURAM: u32 = 0o2;
pub const TRACE_CPU: u32 = 0o3;
pub const TRACE_CPUINT: u32 = 0o7;
pub const TRACE_TIMER: u32 = 0o10;
pub const TRACE_KEYBOARD: u32 = 0o1000;
pub const TRACE_ALL: u32 = 0o177777;

/// Output sample rate assumed when none is configured.
pub const DEFAULT_SOUND_SAMPLE_RATE: u32 = 22050;

/// Callback receiving one stereo sample per audio period.
pub type SoundGenCallback = Box<dyn FnMut(u16, u16)>;

/// This trait provides an implementation-opaque way of calling motherboard
/// methods from elsewhere in the system, such as the emulator façade.
pub trait Motherboard {

    /// Implementations must stop the CPU, reset every device and restart the CPU.
    fn reset(&mut self);

    /// Implementations must record the configuration and clear RAM and ROM.
    fn set_configuration(&mut self, configuration: u16);

    /// Implementations must return the configuration last set.
    fn configuration(&self) -> u16;

    /// Implementations must replace the ROM image with the supplied 32K buffer.
    fn load_rom(&mut self, buffer: &[u8]) -> Result<()>;

    /// Implementations must copy the buffer into RAM at the given 8K bank.
    fn load_ram(&mut self, bank: usize, buffer: &[u8]) -> Result<()>;

    /// Implementations must deliver a key press or release to the keyboard.
    fn keyboard_event(&mut self, scancode: u8, pressed: bool);

    /// Implementations must attach the SMP image file to the given slot.
    fn attach_smp_image(&mut self, slot: usize, path: &Path) -> Result<()>;

    /// Implementations must detach the SMP image in the given slot.
    fn detach_smp_image(&mut self, slot: usize) -> Result<()>;

    /// Implementations must report whether the given slot holds an image.
    fn is_smp_image_attached(&self, slot: usize) -> bool;

    /// Implementations must install (or with `None`, remove) the sound callback.
    fn set_sound_gen_callback(&mut self, callback: Option<SoundGenCallback>);

    /// Implementations must stop `system_frame` when the PC hits any of these.
    /// An empty slice disables breakpoint checks.
    fn set_cpu_breakpoints(&mut self, breakpoints: &[u16]);

    /// Implementations must gate the 50 Hz EVNT line.
    fn set_timer50_on_off(&mut self, on: bool);

    /// Implementations must gate the sound output.
    fn set_sound_on_off(&mut self, on: bool);

    /// Implementations must store the trace flags.
    fn set_trace(&mut self, trace: u32);

    /// Implementations must run one 1/25 second frame, returning false if a
    /// breakpoint was hit.
    fn system_frame(&mut self) -> bool;

    /// Implementations must execute exactly one instruction from its first tick.
    fn debug_ticks(&mut self);

    /// Implementations must execute one instruction.
    fn execute_cpu(&mut self);

    /// Implementations must reset the CPU sub-instruction tick counter.
    fn clear_cpu_internal_tick(&mut self);

    /// Implementations must return RAM from the LCD address register onwards.
    fn video_buffer(&self) -> &[u8];

    /// Implementations must return the current CPU program counter.
    fn cpu_pc(&self) -> u16;

    /// Implementations must report whether the CPU is in HALT mode.
    fn cpu_halt_mode(&self) -> bool;

    /// Implementations must return a RAM byte.
    fn ram_byte(&self, offset: u16) -> u8;

    /// Implementations must return a RAM word.
    fn ram_word(&self, offset: u16) -> u16;

    /// Implementations must return a bus word without side effects.
    fn word_view(&self, address: u16, halt_mode: bool, exec: bool) -> (u16, AddressType);

    /// Implementations must return a port register without side effects.
    fn port_view(&self, address: u16) -> u16;

    /// Implementations must write their state into an emulator image.
    fn save_to_image(&self, image: &mut [u8]) -> Result<()>;

    /// Implementations must restore their state from an emulator image.
    fn load_from_image(&mut self, image: &[u8]) -> Result<()>;
}
