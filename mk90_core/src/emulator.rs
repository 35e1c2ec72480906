// SPDX-License-Identifier: GPL-3.0
// emulator.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
};

use log::{info, warn};

use crate::{
    breakpoints::{AddressList, BreakpointRegistry, NO_BREAKPOINT},
    error::Result,
    memory::{RAM_SIZE, ROM_SIZE},
    motherboard::Motherboard,
    snapshot::{write_uptime, SnapshotHeader, IMAGE_SIZE},
};

/// Frames per second of emulated time.
const FRAMES_PER_SECOND: u32 = 25;

/// This enum represents the machine configurations, each tied to one ROM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Configuration {
    Basic10 = 10,
    Basic20 = 20,
}

impl Configuration {

    /// Maps a numeric configuration id; unknown ids fall back to BASIC 1.0.
    pub fn from_id(id: u16) -> Self {
        match id {
            20 => Configuration::Basic20,
            _ => Configuration::Basic10,
        }
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    /// Name of the ROM file this configuration boots from.
    pub fn rom_file_name(self) -> &'static str {
        match self {
            Configuration::Basic10 => "basic10.rom",
            Configuration::Basic20 => "basic20.rom",
        }
    }
}

/// This struct is the application-level face of the emulator: it owns the
/// board and adds the run state, the debugger's breakpoint and watchpoint
/// lists, uptime accounting, RAM change tracking and image files.
pub struct Emulator {

    // The board, with its CPU inside.
    board: Box<dyn Motherboard>,

    // Run state.
    configuration: Configuration,
    running: bool,

    // Debugger lists.
    breakpoints: BreakpointRegistry,
    watchpoints: AddressList,

    // Uptime accounting.
    uptime_frame_count: u32,
    uptime: u32,

    // Values cached by on_update.
    cpu_pc: u16,
    prev_cpu_pc: u16,
    previous_ram: Vec<u8>,
    changed_ram: Vec<u8>,
}

impl Emulator {

    /// Creates a new, stopped emulator around the given board and resets it.
    pub fn new(board: Box<dyn Motherboard>) -> Self {

        let mut emulator = Emulator {
            board,
            configuration: Configuration::Basic10,
            running: false,
            breakpoints: BreakpointRegistry::new(),
            watchpoints: AddressList::new(),
            uptime_frame_count: 0,
            uptime: 0,
            cpu_pc: NO_BREAKPOINT,
            prev_cpu_pc: NO_BREAKPOINT,
            previous_ram: vec![0; RAM_SIZE],
            changed_ram: vec![0; RAM_SIZE],
        };

        emulator.board.reset();

        emulator
    }

    /// Returns the board.
    pub fn board(&self) -> &dyn Motherboard {
        &*self.board
    }

    /// Returns the board mutably, for keyboard, sound and SMP plumbing.
    pub fn board_mut(&mut self) -> &mut dyn Motherboard {
        &mut *self.board
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    /// Switches configuration: clears memory, loads the configuration's ROM
    /// from the given directory, then resets. Exactly 32K of the file is used.
    pub fn init_configuration(&mut self, configuration: Configuration, rom_dir: &Path) -> Result<()> {

        self.board.set_configuration(configuration.id());

        let path = rom_dir.join(configuration.rom_file_name());
        let mut buffer = vec![0; ROM_SIZE];
        let loaded = File::open(&path).and_then(|mut file| file.read_exact(&mut buffer));
        if let Err(error) = loaded {
            warn!("Failed to load ROM {}: {}", path.display(), error);
            return Err(error.into());
        }
        self.board.load_rom(&buffer)?;

        self.configuration = configuration;
        self.board.reset();
        self.uptime_frame_count = 0;
        self.uptime = 0;

        info!("Configuration {:?} ready, ROM {}", configuration, path.display());
        Ok(())
    }

    pub fn start(&mut self) {

        self.running = true;

        // Start breakpoint checks on an instruction boundary.
        if !self.breakpoints.as_slice().is_empty() {
            self.board.clear_cpu_internal_tick();
        }
    }

    /// Stops the emulator, dropping any temporary breakpoint.
    pub fn stop(&mut self) {
        self.running = false;
        self.breakpoints.clear_temporary();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resets the board and the uptime.
    pub fn reset(&mut self) {
        self.board.reset();
        self.uptime_frame_count = 0;
        self.uptime = 0;
    }

    pub fn add_cpu_breakpoint(&mut self, address: u16) -> bool {
        self.breakpoints.add(address)
    }

    pub fn remove_cpu_breakpoint(&mut self, address: u16) -> bool {
        self.breakpoints.remove(address)
    }

    pub fn set_temp_cpu_breakpoint(&mut self, address: u16) {
        self.breakpoints.set_temporary(address);
    }

    pub fn cpu_breakpoints(&self) -> &[u16] {
        self.breakpoints.as_slice()
    }

    /// Returns true if the CPU is sitting on a breakpoint.
    pub fn is_breakpoint(&self) -> bool {
        self.breakpoints.contains(self.board.cpu_pc())
    }

    pub fn is_breakpoint_at(&self, address: u16) -> bool {
        self.breakpoints.contains(address)
    }

    pub fn remove_all_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    pub fn add_watchpoint(&mut self, address: u16) -> bool {
        self.watchpoints.add(address)
    }

    pub fn remove_watchpoint(&mut self, address: u16) -> bool {
        self.watchpoints.remove(address)
    }

    pub fn watchpoints(&self) -> &[u16] {
        self.watchpoints.as_slice()
    }

    pub fn remove_all_watchpoints(&mut self) {
        self.watchpoints.clear();
    }

    /// Runs one frame with the current breakpoints. Returns false if a
    /// breakpoint stopped it, in which case uptime is not advanced.
    pub fn system_frame(&mut self) -> bool {

        self.board.set_cpu_breakpoints(self.breakpoints.active().unwrap_or(&[]));

        if !self.board.system_frame() {
            return false;
        }

        self.uptime_frame_count += 1;
        if self.uptime_frame_count >= FRAMES_PER_SECOND {
            self.uptime += 1;
            self.uptime_frame_count = 0;
        }

        true
    }

    /// Returns the emulated uptime in seconds.
    pub fn uptime(&self) -> u32 {
        self.uptime
    }

    pub fn set_uptime(&mut self, uptime: u32) {
        self.uptime = uptime;
    }

    /// Refreshes the cached PC values and the RAM change flags after a run or step.
    pub fn on_update(&mut self) {

        self.prev_cpu_pc = self.cpu_pc;
        self.cpu_pc = self.board.cpu_pc();

        for (offset, (old, changed)) in self.previous_ram.iter_mut().zip(self.changed_ram.iter_mut()).enumerate() {
            let value = self.board.ram_byte(offset as u16);
            *changed = if value != *old { 0xFF } else { 0 };
            *old = value;
        }
    }

    /// Returns the change flags of the RAM word at the given address: 0xFF in
    /// each byte that changed at the last `on_update`.
    pub fn changed_ram_word(&self, address: u16) -> u16 {
        let low = self.changed_ram[address as usize];
        let high = self.changed_ram.get(address as usize + 1).copied().unwrap_or(0);
        u16::from_le_bytes([low, high])
    }

    /// Returns the PC cached by the last `on_update`.
    pub fn cpu_pc(&self) -> u16 {
        self.cpu_pc
    }

    /// Returns the PC cached by the `on_update` before last.
    pub fn prev_cpu_pc(&self) -> u16 {
        self.prev_cpu_pc
    }

    /// Builds a complete emulator image of the current state.
    pub fn save_image_bytes(&self) -> Result<Vec<u8>> {

        let mut image = vec![0; IMAGE_SIZE];
        SnapshotHeader::new(self.uptime).write_to(&mut image)?;
        self.board.save_to_image(&mut image)?;
        write_uptime(&mut image, self.uptime)?;

        Ok(image)
    }

    /// Writes an emulator image file.
    pub fn save_image(&self, path: &Path) -> Result<()> {
        let image = self.save_image_bytes()?;
        fs::write(path, image)?;
        info!("Emulator image saved to {}", path.display());
        Ok(())
    }

    /// Stops and resets, then restores state from an emulator image. The
    /// header is not checked.
    pub fn load_image_bytes(&mut self, image: &[u8]) -> Result<()> {
        self.stop();
        self.reset();
        self.restore_image(image)
    }

    /// Stops and resets, then restores state from an emulator image file.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {

        self.stop();
        self.reset();

        let image = fs::read(path)?;
        self.restore_image(&image)?;

        info!("Emulator image loaded from {}", path.display());
        Ok(())
    }

    fn restore_image(&mut self, image: &[u8]) -> Result<()> {

        let header = SnapshotHeader::read_from(image)?;
        self.board.load_from_image(image)?;

        self.configuration = Configuration::from_id(self.board.configuration());
        self.uptime = header.uptime;
        self.cpu_pc = self.board.cpu_pc();

        Ok(())
    }
}
