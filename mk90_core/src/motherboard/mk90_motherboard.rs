// SPDX-License-Identifier: GPL-3.0
// mk90_motherboard.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::Path;

use log::{debug, info, trace};

use super::{
    Motherboard, SoundGenCallback, TRACE_CPU, TRACE_CPUINT, TRACE_CPURAM, TRACE_CPUROM, TRACE_KEYBOARD, TRACE_NONE,
    TRACE_TIMER,
};
use crate::{
    cpu::{Cpu, CPU_IMAGE_SIZE},
    error::Result,
    memory::{AddressType, RAM_SIZE, ROM_SIZE},
    ports::SystemBus,
    snapshot::{
        check_image_size, BoardRegisters, SnapshotHeader, BOARD_BLOCK_SIZE, OFFSET_BOARD, OFFSET_CPU,
        OFFSET_RAM, OFFSET_ROM, RAM_REGION_SIZE,
    },
};

/// Scheduler ticks per frame; one tick is 2 microseconds.
const FRAME_TICKS: u32 = 20000;

/// CPU and timer 1 steps per scheduler tick.
const FRAME_PROC_TICKS: u32 = 16;

/// Scheduler ticks at which the 50 Hz line fires.
const TICK50_AT: [u32; 2] = [0, 10000];

/// Audio ticks per frame expressed against the scheduler clock.
const AUDIO_CLOCK: u32 = 20286;

/// Frames per second.
const FRAMES_PER_SECOND: u32 = 25;

/// Computes how many scheduler ticks separate two sound samples.
pub fn audio_period(sample_rate: u32) -> u32 {
    let samples_per_frame = (sample_rate / FRAMES_PER_SECOND).max(1);
    (AUDIO_CLOCK / samples_per_frame).max(1)
}

/// This struct models the central 'motherboard' of the MK90, owning the CPU
/// and the system bus, and driving both through the frame scheduler.
pub struct Mk90Motherboard {

    // The processor, supplied by the caller.
    cpu: Box<dyn Cpu>,

    // Memory and every memory-mapped device.
    bus: SystemBus,

    // Machine configuration id (10 or 20 for the two BASIC ROMs).
    configuration: u16,

    // Addresses at which system_frame stops; empty means no checks.
    breakpoints: Vec<u16>,

    // Debug flags and switches.
    trace: u32,
    timer50_on: bool,
    sound_on: bool,

    // Audio output.
    sound_callback: Option<SoundGenCallback>,
    audio_period: u32,
}

/// Implementation functions for the motherboard itself.
impl Mk90Motherboard {

    /// Creates a new motherboard object around the given CPU, producing sound
    /// samples at the given rate. Memory starts cleared and the board reset.
    pub fn new(cpu: Box<dyn Cpu>, sample_rate: u32) -> Self {

        let mut motherboard = Mk90Motherboard {

            // Setup components.
            cpu,
            bus: SystemBus::new(),

            // Setup board state.
            configuration: 0,
            breakpoints: vec![],
            trace: TRACE_NONE,
            timer50_on: false,
            sound_on: false,

            // Setup audio.
            sound_callback: None,
            audio_period: audio_period(sample_rate),
        };

        motherboard.set_configuration(0);
        motherboard.reset();

        motherboard
    }

    /// Logs the instruction about to execute, if tracing covers its memory.
    fn trace_instruction(&self) {

        let halt_mode = self.cpu.is_halt_mode();
        let address = self.cpu.pc();

        let (first, address_type) = self.bus.get_word_view(address, halt_mode, true);
        let traced = match address_type {
            AddressType::Ram => self.trace & TRACE_CPURAM != 0,
            AddressType::Rom => self.trace & TRACE_CPUROM != 0,
            _ => false,
        };
        if !traced {
            return;
        }

        let word = |index: u16| self.bus.get_word_view(address.wrapping_add(index * 2), halt_mode, true).0;
        trace!(
            "{:06o}: {:06o} {:06o} {:06o} {:06o}",
            address,
            first,
            word(1),
            word(2),
            word(3)
        );
    }

    /// Advances the 8 MHz side of the tone generator.
    fn timer_tick(&mut self) {
        self.bus.sound_timer.timer_tick();
    }

    /// Fires the 50 Hz line.
    fn tick50(&mut self) {

        if self.timer50_on {
            if cfg!(debug_assertions) && self.trace & TRACE_CPUINT == TRACE_CPUINT {
                debug!("EVNT at {:06o}", self.cpu.pc());
            }
            self.cpu.tick_evnt();
        }

        let trace = cfg!(debug_assertions) && self.trace & TRACE_TIMER != 0;
        self.bus.sound_timer.tick50(trace);
    }

    /// Hands one sample to the sound callback, if any.
    fn do_sound(&mut self) {

        if let Some(callback) = self.sound_callback.as_mut() {
            let (left, right) = self.bus.sound_timer.sample(self.sound_on);
            callback(left, right);
        }
    }
}

/// Implementation functions to be called from anything that understands what
/// a Motherboard object is.
impl Motherboard for Mk90Motherboard {

    fn reset(&mut self) {

        self.cpu.stop();

        // Reset ports.
        self.bus.reset_lcd();
        self.sound_on = false;

        // External devices controller.
        self.bus.ext_device.reset();

        self.cpu.start(&mut self.bus);
    }

    fn set_configuration(&mut self, configuration: u16) {
        info!("Board configuration {}", configuration);
        self.configuration = configuration;
        self.bus.memory.clear();
    }

    fn configuration(&self) -> u16 {
        self.configuration
    }

    fn load_rom(&mut self, buffer: &[u8]) -> Result<()> {
        self.bus.memory.load_rom(buffer)
    }

    fn load_ram(&mut self, bank: usize, buffer: &[u8]) -> Result<()> {
        self.bus.memory.load_ram(bank, buffer)
    }

    fn keyboard_event(&mut self, scancode: u8, pressed: bool) {
        if cfg!(debug_assertions) && self.trace & TRACE_KEYBOARD != 0 {
            debug!("Keyboard {:03o} {}", scancode, if pressed { "pressed" } else { "released" });
        }
        self.bus.ext_device.keyboard_event(&mut *self.cpu, scancode, pressed);
    }

    fn attach_smp_image(&mut self, slot: usize, path: &Path) -> Result<()> {
        self.bus.ext_device.attach_smp_image(slot, path)
    }

    fn detach_smp_image(&mut self, slot: usize) -> Result<()> {
        self.bus.ext_device.detach_smp_image(slot)
    }

    fn is_smp_image_attached(&self, slot: usize) -> bool {
        self.bus.ext_device.is_smp_image_attached(slot)
    }

    fn set_sound_gen_callback(&mut self, callback: Option<SoundGenCallback>) {
        self.sound_callback = callback;
    }

    fn set_cpu_breakpoints(&mut self, breakpoints: &[u16]) {
        self.breakpoints = breakpoints.to_vec();
    }

    fn set_timer50_on_off(&mut self, on: bool) {
        self.timer50_on = on;
    }

    fn set_sound_on_off(&mut self, on: bool) {
        self.sound_on = on;
    }

    fn set_trace(&mut self, trace: u32) {
        self.trace = trace;
    }

    /// Runs one frame: 20000 scheduler ticks of 16 CPU/timer steps each, with
    /// the 50 Hz line at ticks 0 and 10000 and a sound sample every audio period.
    fn system_frame(&mut self) -> bool {

        for frame_tick in 0..FRAME_TICKS {

            for _ in 0..FRAME_PROC_TICKS {

                if cfg!(debug_assertions) && self.trace & TRACE_CPU != 0 && self.cpu.internal_tick() == 0 {
                    self.trace_instruction();
                }

                self.cpu.execute(&mut self.bus);
                if self.breakpoints.contains(&self.cpu.pc()) {
                    return false;
                }

                self.timer_tick();
            }

            if TICK50_AT.contains(&frame_tick) {
                self.tick50();
            }

            if frame_tick % self.audio_period == 0 {
                self.do_sound();
            }
        }

        true
    }

    fn debug_ticks(&mut self) {
        self.cpu.clear_internal_tick();
        self.cpu.execute(&mut self.bus);
    }

    fn execute_cpu(&mut self) {
        self.cpu.execute(&mut self.bus);
    }

    fn clear_cpu_internal_tick(&mut self) {
        self.cpu.clear_internal_tick();
    }

    fn video_buffer(&self) -> &[u8] {
        self.bus.memory.ram_from(self.bus.lcd.address)
    }

    fn cpu_pc(&self) -> u16 {
        self.cpu.pc()
    }

    fn cpu_halt_mode(&self) -> bool {
        self.cpu.is_halt_mode()
    }

    fn ram_byte(&self, offset: u16) -> u8 {
        self.bus.memory.ram_byte(offset)
    }

    fn ram_word(&self, offset: u16) -> u16 {
        self.bus.memory.ram_word(offset)
    }

    fn word_view(&self, address: u16, halt_mode: bool, exec: bool) -> (u16, AddressType) {
        self.bus.get_word_view(address, halt_mode, exec)
    }

    fn port_view(&self, address: u16) -> u16 {
        self.bus.get_port_view(address)
    }

    fn save_to_image(&self, image: &mut [u8]) -> Result<()> {

        check_image_size(image.len())?;

        // Header, keeping whatever uptime the caller stored.
        let uptime = SnapshotHeader::read_from(image)?.uptime;
        SnapshotHeader::new(uptime).write_to(image)?;

        // Board data.
        let mut block = [0; BOARD_BLOCK_SIZE];
        BoardRegisters {
            configuration: self.configuration,
            lcd: self.bus.lcd,
            sound_on: self.sound_on,
            sound_timer: self.bus.sound_timer.registers(),
            ext_device: self.bus.ext_device.registers(),
        }
        .encode(&mut block);
        image[OFFSET_BOARD..OFFSET_BOARD + BOARD_BLOCK_SIZE].copy_from_slice(&block);

        // CPU status.
        let mut cpu_block = [0; CPU_IMAGE_SIZE];
        self.cpu.save_to_image(&mut cpu_block);
        image[OFFSET_CPU..OFFSET_CPU + CPU_IMAGE_SIZE].copy_from_slice(&cpu_block);
        image[OFFSET_CPU + CPU_IMAGE_SIZE..OFFSET_ROM].fill(0);

        // ROM, then RAM followed by zero fill.
        image[OFFSET_ROM..OFFSET_ROM + ROM_SIZE].copy_from_slice(self.bus.memory.rom());
        image[OFFSET_RAM..OFFSET_RAM + RAM_SIZE].copy_from_slice(self.bus.memory.ram());
        image[OFFSET_RAM + RAM_SIZE..OFFSET_RAM + RAM_REGION_SIZE].fill(0);

        info!("Board saved to image, configuration {}", self.configuration);
        Ok(())
    }

    fn load_from_image(&mut self, image: &[u8]) -> Result<()> {

        check_image_size(image.len())?;

        // Board data.
        let mut block = [0; BOARD_BLOCK_SIZE];
        block.copy_from_slice(&image[OFFSET_BOARD..OFFSET_BOARD + BOARD_BLOCK_SIZE]);
        let registers = BoardRegisters::decode(&block);

        self.configuration = registers.configuration;
        self.bus.lcd = registers.lcd;
        self.sound_on = registers.sound_on;
        self.bus.sound_timer.set_registers(&registers.sound_timer);
        self.bus.ext_device.set_registers(&registers.ext_device);

        // CPU status.
        let mut cpu_block = [0; CPU_IMAGE_SIZE];
        cpu_block.copy_from_slice(&image[OFFSET_CPU..OFFSET_CPU + CPU_IMAGE_SIZE]);
        self.cpu.load_from_image(&cpu_block);

        // ROM and RAM.
        self.bus.memory.restore(
            &image[OFFSET_ROM..OFFSET_ROM + ROM_SIZE],
            &image[OFFSET_RAM..OFFSET_RAM + RAM_SIZE],
        );

        info!("Board loaded from image, configuration {}", self.configuration);
        Ok(())
    }
}
