// SPDX-License-Identifier: GPL-3.0
// ports.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use log::{debug, warn};

use crate::{
    cpu::{Cpu, CpuBridge},
    ext_device::ExtDeviceController,
    memory::{translate_address, AddressType, Memory},
    sound_timer::SoundTimer,
};
use mk90_utility::WordBytes;

/// LCD controller address register and its alias.
pub const PORT_LCD_ADDRESS: u16 = 0o164000;
pub const PORT_LCD_ADDRESS_ALIAS: u16 = 0o164004;

/// LCD controller configuration register and its alias.
pub const PORT_LCD_CONFIG: u16 = 0o164002;
pub const PORT_LCD_CONFIG_ALIAS: u16 = 0o164006;

/// External devices controller registers.
pub const PORT_EXT_DATA: u16 = 0o164020;
pub const PORT_EXT_INT_STATUS: u16 = 0o164022;
pub const PORT_EXT_STATUS: u16 = 0o164024;
pub const PORT_EXT_COMMAND: u16 = 0o164026;

/// Tone generator registers.
pub const PORT_TONE_RG1: u16 = 0o164032;
pub const PORT_TONE_RG2: u16 = 0o164034;

/// Real time clock window, inclusive at both ends. Not modelled.
const RTC_WINDOW: (u16, u16) = (0o165000, 0o165177);

/// Power-on value of the LCD configuration register.
pub const LCD_CONFIG_RESET: u16 = 0x88C6;

/// Power-on value of the LCD index register.
pub const LCD_INDEX_RESET: u16 = 0xFFFF;

/// A copy of the LCD controller registers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LcdRegisters {
    pub address: u16,
    pub config: u16,
    pub index: u16,
}

/// This struct is the system bus of the board: it owns memory and every
/// memory-mapped device, and is what the CPU reaches through the bridge. It
/// is kept apart from the CPU itself so that the motherboard can lend it to
/// the CPU mutably while the CPU is borrowed too.
pub struct SystemBus {
    pub(crate) memory: Memory,
    pub(crate) lcd: LcdRegisters,
    pub(crate) ext_device: ExtDeviceController,
    pub(crate) sound_timer: SoundTimer,
}

/// Implementation functions for the system bus.
impl SystemBus {

    /// Creates a new bus object with zeroed memory and reset devices.
    pub fn new() -> Self {

        let mut bus = SystemBus {

            // Setup memory planes.
            memory: Memory::new(),

            // Setup devices.
            lcd: LcdRegisters::default(),
            ext_device: ExtDeviceController::new(),
            sound_timer: SoundTimer::new(),
        };

        bus.reset_lcd();

        bus
    }

    /// Puts the LCD controller registers into their power-on state.
    pub fn reset_lcd(&mut self) {
        self.lcd = LcdRegisters {
            address: 0,
            config: LCD_CONFIG_RESET,
            index: LCD_INDEX_RESET,
        };
    }

    /// Returns true if the address falls in the real time clock window.
    fn is_rtc(address: u16) -> bool {
        (RTC_WINDOW.0..=RTC_WINDOW.1).contains(&address)
    }

    /// Reads a port word, with all device side effects. Unknown ports fault.
    pub fn get_port_word(&mut self, cpu: &mut dyn Cpu, address: u16) -> u16 {

        match address {
            PORT_LCD_ADDRESS | PORT_LCD_ADDRESS_ALIAS => self.lcd.address,
            PORT_LCD_CONFIG | PORT_LCD_CONFIG_ALIAS => self.lcd.config,
            PORT_EXT_DATA => self.ext_device.read_data(cpu) as u16,
            PORT_EXT_INT_STATUS => self.ext_device.read_int_status(),
            PORT_EXT_STATUS => self.ext_device.read_status(),
            PORT_EXT_COMMAND => self.ext_device.read_command(cpu) as u16,
            PORT_TONE_RG1 => self.sound_timer.read_rg1(),
            PORT_TONE_RG2 => self.sound_timer.read_rg2(),
            _ if Self::is_rtc(address) => {
                debug!("Real time clock read at {:06o}", address);
                0
            },
            _ => {
                warn!("Read from unknown port {:06o}", address);
                cpu.memory_error();
                0
            },
        }
    }

    /// Writes a port word, with all device side effects. Unknown ports fault.
    pub fn set_port_word(&mut self, cpu: &mut dyn Cpu, address: u16, word: u16) {

        match address {
            PORT_LCD_ADDRESS | PORT_LCD_ADDRESS_ALIAS => self.lcd.address = word,
            PORT_LCD_CONFIG | PORT_LCD_CONFIG_ALIAS => self.lcd.config = word,
            PORT_EXT_DATA => self.ext_device.write_data(cpu, word.low_byte()),
            PORT_EXT_INT_STATUS => self.ext_device.write_clock_rate(word),
            PORT_EXT_STATUS => self.ext_device.write_control(cpu, word.low_byte()),
            PORT_EXT_COMMAND => self.ext_device.write_command(cpu, word.low_byte()),
            PORT_TONE_RG1 => self.sound_timer.write_rg1(word),
            PORT_TONE_RG2 => self.sound_timer.write_rg2(word),
            _ if Self::is_rtc(address) => {
                debug!("Real time clock write {:06o} to {:06o} ignored", word, address);
            },
            _ => {
                warn!("Write of {:06o} to unknown port {:06o}", word, address);
                cpu.memory_error();
            },
        }
    }

    /// Reads a port byte from the containing word.
    pub fn get_port_byte(&mut self, cpu: &mut dyn Cpu, address: u16) -> u8 {
        self.get_port_word(cpu, address & !1).byte_at(address)
    }

    /// Writes a port byte by merging it into the containing word. The word is
    /// read through the normal path first, so read side effects happen.
    pub fn set_port_byte(&mut self, cpu: &mut dyn Cpu, address: u16, byte: u8) {
        let word = self.get_port_word(cpu, address & !1);
        self.set_port_word(cpu, address & !1, word.with_byte_at(address, byte));
    }

    /// Returns the value of a port register without side effects.
    pub fn get_port_view(&self, address: u16) -> u16 {

        match address & !1 {
            PORT_LCD_ADDRESS | PORT_LCD_ADDRESS_ALIAS => self.lcd.address,
            PORT_LCD_CONFIG | PORT_LCD_CONFIG_ALIAS => self.lcd.config,
            PORT_EXT_DATA => self.ext_device.peek_shift() as u16,
            PORT_EXT_INT_STATUS => self.ext_device.read_int_status(),
            PORT_EXT_STATUS => self.ext_device.read_status(),
            PORT_EXT_COMMAND => {
                let registers = self.ext_device.registers();
                if registers.selected { registers.shift as u16 } else { 0 }
            },
            PORT_TONE_RG1 => self.sound_timer.read_rg1(),
            PORT_TONE_RG2 => self.sound_timer.read_rg2(),
            _ => 0,
        }
    }

    /// Returns the word at the given address for the debugger, together with
    /// the kind of memory it is in. Ports and unmapped memory view as 0.
    pub fn get_word_view(&self, address: u16, halt_mode: bool, exec: bool) -> (u16, AddressType) {

        let (address_type, offset) = translate_address(address, halt_mode, exec);
        let word = match address_type {
            AddressType::Ram => self.memory.ram_word(offset),
            AddressType::Rom => self.memory.rom_word(offset),
            AddressType::Io | AddressType::Deny => 0,
        };

        (word, address_type)
    }

    /// Returns the LCD controller registers.
    pub fn lcd_registers(&self) -> LcdRegisters {
        self.lcd
    }

    /// Shared word read used by data reads and instruction fetches.
    fn read_word(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool, exec: bool) -> u16 {

        let (address_type, offset) = translate_address(address, halt_mode, exec);
        match address_type {
            AddressType::Ram => self.memory.ram_word(offset),
            AddressType::Rom => self.memory.rom_word(offset),
            AddressType::Io => self.get_port_word(cpu, offset),
            AddressType::Deny => {
                cpu.memory_error();
                0
            },
        }
    }
}

/// Implementation functions to be called by the CPU.
impl CpuBridge for SystemBus {

    fn get_word(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool) -> u16 {
        self.read_word(cpu, address, halt_mode, false)
    }

    fn get_word_exec(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool) -> u16 {
        self.read_word(cpu, address, halt_mode, true)
    }

    fn get_byte(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool) -> u8 {

        let (address_type, offset) = translate_address(address, halt_mode, false);
        match address_type {
            AddressType::Ram => self.memory.ram_byte(offset),
            AddressType::Rom => self.memory.rom_byte(offset),
            AddressType::Io => self.get_port_byte(cpu, offset),
            AddressType::Deny => {
                cpu.memory_error();
                0
            },
        }
    }

    fn set_word(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool, word: u16) {

        let (address_type, offset) = translate_address(address, halt_mode, false);
        match address_type {
            AddressType::Ram => self.memory.set_ram_word(offset, word),
            AddressType::Io => self.set_port_word(cpu, offset, word),
            AddressType::Rom | AddressType::Deny => cpu.memory_error(),
        }
    }

    fn set_byte(&mut self, cpu: &mut dyn Cpu, address: u16, halt_mode: bool, byte: u8) {

        let (address_type, offset) = translate_address(address, halt_mode, false);
        match address_type {
            AddressType::Ram => self.memory.set_ram_byte(offset, byte),
            AddressType::Io => self.set_port_byte(cpu, offset, byte),
            AddressType::Rom | AddressType::Deny => cpu.memory_error(),
        }
    }
}
