// SPDX-License-Identifier: GPL-3.0
// cpu.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

/// This module contains a scriptable CPU used by the unit tests.
#[cfg(test)]
pub mod test_cpu;

/// The number of bytes of opaque CPU state stored in an emulator image.
pub const CPU_IMAGE_SIZE: usize = 32;

/// This trait provides an implementation-opaque way of calling CPU
/// methods from elsewhere in the system. The instruction decoder itself
/// lives outside this crate; the motherboard only drives it through these
/// calls. We supply a bridge object so that the implementation can call
/// out via it for memory accesses, and the bridge is handed the CPU back so
/// that devices can raise interrupts or bus faults in the middle of an access.
pub trait Cpu {

    /// Implementations must execute one instruction's worth of internal ticks,
    /// performing all memory accesses through the supplied bridge.
    fn execute(&mut self, bridge: &mut dyn CpuBridge);

    /// Implementations must return the current program counter.
    fn pc(&self) -> u16;

    /// Implementations must set the program counter.
    fn set_pc(&mut self, pc: u16);

    /// Implementations must start the processor, fetching whatever reset
    /// vector they need through the bridge.
    fn start(&mut self, bridge: &mut dyn CpuBridge);

    /// Implementations must stop the processor.
    fn stop(&mut self);

    /// Implementations must latch a vectored interrupt request.
    fn interrupt_virq(&mut self, level: u8, vector: u16);

    /// Implementations must treat this as a bus error for the current access.
    fn memory_error(&mut self);

    /// Implementations must latch an event on the EVNT (50 Hz) line.
    fn tick_evnt(&mut self);

    /// Implementations must report whether they are in HALT mode.
    fn is_halt_mode(&self) -> bool;

    /// Implementations must return the sub-instruction tick counter, which is
    /// 0 when the next call to `execute` begins a new instruction.
    fn internal_tick(&self) -> u16;

    /// Implementations must reset the sub-instruction tick counter.
    fn clear_internal_tick(&mut self);

    /// Implementations must write their state into the supplied image region.
    fn save_to_image(&self, image: &mut [u8; CPU_IMAGE_SIZE]);

    /// Implementations must restore their state from the supplied image region.
    fn load_from_image(&mut self, image: &[u8; CPU_IMAGE_SIZE]);
}

/// This trait provides an implementation-opaque way of the CPU
/// calling methods from elsewhere in the system via a 'bridge'.
pub trait CpuBridge {

    /// The CPU must call this to read a word from the system bus.
    fn get_word(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool) -> u16;

    /// The CPU must call this to fetch an instruction word from the system bus.
    fn get_word_exec(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool) -> u16;

    /// The CPU must call this to read a byte from the system bus.
    fn get_byte(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool) -> u8;

    /// The CPU must call this to write a word to the system bus.
    fn set_word(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool, word: u16);

    /// The CPU must call this to write a byte to the system bus.
    fn set_byte(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool, byte: u8);
}
