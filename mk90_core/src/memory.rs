// SPDX-License-Identifier: GPL-3.0
// memory.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use crate::error::{BoardError, Result};
use mk90_utility::{read_u16_le, write_u16_le};

/// Size of the RAM area in bytes.
pub const RAM_SIZE: usize = 65536;

/// Size of the ROM area in bytes.
pub const ROM_SIZE: usize = 32768;

/// Size of one RAM bank as used by `load_ram`.
pub const RAM_BANK_SIZE: usize = 8192;

/// Start of the unmapped gap above the low 16K of RAM.
pub const DENY_START: u16 = 0o40000;

/// Start of the ROM window (and end of the deny gap).
pub const ROM_START: u16 = 0o100000;

/// Start of the I/O window carved out of the ROM space.
pub const IO_WINDOW_START: u16 = 0o164000;

/// End (exclusive) of the I/O window.
pub const IO_WINDOW_END: u16 = 0o166000;

/// End (exclusive) of the ROM window; RAM is aliased from here up.
pub const ROM_END: u16 = 0o174666;

/// Port sub-ranges inside the I/O window, inclusive at both ends.
const PORT_RANGES: [(u16, u16); 4] = [
    (0o164000, 0o164007), // LCD controller
    (0o164020, 0o164027), // External devices controller
    (0o164032, 0o164035), // Tone generator
    (0o165000, 0o165177), // Real time clock
];

/// Word accesses to RAM ignore address bit 0.
const WORD_ALIGN_MASK: u16 = 0o177776;

/// This enum represents the kind of memory an address resolves to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressType {
    Ram,
    Rom,
    Io,
    Deny,
}

/// Determines the memory type for the given address, together with the offset
/// inside that memory plane. The result depends on the address alone: the
/// processor mode and the fetch flag are accepted so that mode-dependent
/// windows can be introduced without changing callers.
pub fn translate_address(address: u16, _halt_mode: bool, _exec: bool) -> (AddressType, u16) {

    // 000000-037777: RAM, 16K.
    if address < DENY_START {
        return (AddressType::Ram, address);
    }

    // 040000-077777: nothing is decoded here.
    if address < ROM_START {
        return (AddressType::Deny, address);
    }

    // 164000-165777: ports scattered over RAM.
    if (IO_WINDOW_START..IO_WINDOW_END).contains(&address) {
        let is_port = PORT_RANGES
            .iter()
            .any(|&(first, last)| (first..=last).contains(&address));

        return if is_port {
            (AddressType::Io, address)
        } else {
            (AddressType::Ram, address)
        };
    }

    // 100000-174665: ROM.
    if address < ROM_END {
        return (AddressType::Rom, address - ROM_START);
    }

    // 174666-177777: RAM, holding vectors and stack in every mode.
    (AddressType::Ram, address)
}

/// This struct owns the RAM and ROM planes of the board. All accessors are
/// bounds checked; offsets come from `translate_address` so they always fit.
pub struct Memory {

    // 64 KiB of RAM (heap allocated).
    ram: Vec<u8>,

    // 32 KiB of ROM (heap allocated).
    rom: Vec<u8>,
}

impl Memory {

    /// Creates a new, zero-filled memory object.
    pub fn new() -> Self {
        Memory {
            ram: vec![0; RAM_SIZE],
            rom: vec![0; ROM_SIZE],
        }
    }

    /// Zero-fills both RAM and ROM.
    pub fn clear(&mut self) {
        self.ram.fill(0);
        self.rom.fill(0);
    }

    /// Reads a RAM word; bit 0 of the offset is ignored.
    pub fn ram_word(&self, offset: u16) -> u16 {
        read_u16_le(&self.ram, (offset & WORD_ALIGN_MASK) as usize).unwrap_or(0)
    }

    /// Reads a RAM byte.
    pub fn ram_byte(&self, offset: u16) -> u8 {
        self.ram[offset as usize]
    }

    /// Writes a RAM word; bit 0 of the offset is ignored.
    pub fn set_ram_word(&mut self, offset: u16, word: u16) {
        write_u16_le(&mut self.ram, (offset & WORD_ALIGN_MASK) as usize, word);
    }

    /// Writes a RAM byte.
    pub fn set_ram_byte(&mut self, offset: u16, byte: u8) {
        self.ram[offset as usize] = byte;
    }

    /// Reads a ROM word. ROM fetches are not realigned, matching the board.
    pub fn rom_word(&self, offset: u16) -> u16 {
        read_u16_le(&self.rom, offset as usize).unwrap_or(0)
    }

    /// Reads a ROM byte; offsets past the image read as 0.
    pub fn rom_byte(&self, offset: u16) -> u8 {
        self.rom.get(offset as usize).copied().unwrap_or(0)
    }

    /// Replaces the whole ROM image.
    pub fn load_rom(&mut self, buffer: &[u8]) -> Result<()> {
        if buffer.len() != ROM_SIZE {
            return Err(BoardError::RomImageSize(buffer.len(), ROM_SIZE));
        }
        self.rom.copy_from_slice(buffer);
        Ok(())
    }

    /// Copies data into RAM starting at the given 8K bank.
    pub fn load_ram(&mut self, bank: usize, buffer: &[u8]) -> Result<()> {
        let start = bank * RAM_BANK_SIZE;
        let out_of_range = BoardError::RamLoadOutOfRange {
            bank,
            length: buffer.len(),
        };

        match start.checked_add(buffer.len()) {
            Some(end) if end <= RAM_SIZE => {
                self.ram[start..end].copy_from_slice(buffer);
                Ok(())
            },
            _ => Err(out_of_range),
        }
    }

    /// Returns the whole RAM plane.
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Returns the whole ROM plane.
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// Returns the RAM plane from the given offset to the end.
    pub fn ram_from(&self, offset: u16) -> &[u8] {
        &self.ram[offset as usize..]
    }

    /// Replaces RAM and ROM wholesale from snapshot slices of exactly the
    /// plane sizes.
    pub(crate) fn restore(&mut self, rom: &[u8], ram: &[u8]) {
        self.rom.copy_from_slice(rom);
        self.ram.copy_from_slice(ram);
    }
}

#[cfg(test)]
mod tests;
