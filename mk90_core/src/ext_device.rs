// SPDX-License-Identifier: GPL-3.0
// ext_device.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::Path;

use log::debug;

use crate::{
    cpu::Cpu,
    error::{BoardError, Result},
    smp::{SmpSlot, SMP_SLOT_COUNT},
};

/// Interrupt level raised when a device transfer completes.
const TRANSFER_IRQ_LEVEL: u8 = 7;

/// Interrupt vector raised when a device transfer completes.
const TRANSFER_IRQ_VECTOR: u16 = 0o304;

/// Interrupt level raised on a key press.
const KEYBOARD_IRQ_LEVEL: u8 = 8;

/// Interrupt vector raised on a key press.
const KEYBOARD_IRQ_VECTOR: u16 = 0o310;

/// Control register bit that masks the transfer interrupt when set.
const CONTROL_IRQ_DISABLE: u8 = 0x20;

/// Fixed bits of the status register.
const STATUS_FIXED_BITS: u16 = 0xFF84;

/// Status register bit reported while no device is selected.
const STATUS_DESELECTED: u16 = 0x08;

/// The device addressed by the low nibble of the control register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Device {
    SmpRead(usize),
    Keyboard,
    SmpWrite(usize),
}

impl Device {

    /// Decodes the control register. Nibbles without a device return `None`
    /// and every operation on them is a no-op.
    fn from_control(control: u8) -> Option<Self> {
        match control & 0x0F {
            0 | 1 => Some(Device::SmpRead((control & 1) as usize)),
            2 => Some(Device::Keyboard),
            8 | 9 => Some(Device::SmpWrite((control & 1) as usize)),
            _ => None,
        }
    }
}

/// A copy of the controller registers, as stored in an emulator image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtDeviceRegisters {
    pub keyboard_scan: u8,
    pub control: u8,
    pub shift: u8,
    pub selected: bool,
    pub int_status: u16,
}

/// This struct models the external devices controller: a shift register shared
/// between the keyboard and the two SMP cartridges, driven through command,
/// data, status and control registers.
pub struct ExtDeviceController {

    // Last key pressed, 0 when already consumed.
    keyboard_scan: u8,

    // Register declarations.
    control: u8,
    shift: u8,
    selected: bool,
    int_status: u16,

    // The cartridge slots.
    smp: [SmpSlot; SMP_SLOT_COUNT],
}

/// Implementation functions for the external devices controller.
impl ExtDeviceController {

    /// Creates a new controller object with the correct initial state.
    pub fn new() -> Self {

        let mut controller = ExtDeviceController {
            keyboard_scan: 0,
            control: 0,
            shift: 0,
            selected: false,
            int_status: 0,
            smp: [SmpSlot::new(), SmpSlot::new()],
        };

        controller.reset();

        controller
    }

    /// Puts the registers into their power-on state. Attached cartridges stay.
    pub fn reset(&mut self) {
        self.keyboard_scan = 0;
        self.control = 0;
        self.shift = 0xFF;
        self.selected = false;
        self.int_status = 0xFFFF;
    }

    /// Raises the transfer-complete interrupt unless masked by the control register.
    fn transfer_complete(&self, cpu: &mut dyn Cpu) {
        if self.control & CONTROL_IRQ_DISABLE == 0 {
            cpu.interrupt_virq(TRANSFER_IRQ_LEVEL, TRANSFER_IRQ_VECTOR);
        }
    }

    /// Flags the addressed channel in the interrupt status register.
    fn mark_channel(&mut self) {
        self.int_status |= 1 << (self.control & 7);
    }

    /// Moves a pending key into the shift register.
    fn transfer_keyboard(&mut self, cpu: &mut dyn Cpu) {
        if self.keyboard_scan != 0 {
            self.shift = self.keyboard_scan;
            self.keyboard_scan = 0;
            self.transfer_complete(cpu);
        }
    }

    /// Performs the read transfer of the addressed device, if it is a reader.
    fn transfer_in(&mut self, cpu: &mut dyn Cpu) {
        match Device::from_control(self.control) {
            Some(Device::SmpRead(slot)) => {
                self.shift = self.smp[slot].read_data();
                self.transfer_complete(cpu);
            },
            Some(Device::Keyboard) => self.transfer_keyboard(cpu),
            _ => (),
        }
    }

    /// Reads the data register. The shift register is returned and refilled.
    pub fn read_data(&mut self, cpu: &mut dyn Cpu) -> u8 {

        let result = self.shift;
        self.shift = 0xFF;
        self.mark_channel();

        if self.selected {
            self.transfer_in(cpu);
        }

        result
    }

    /// Reads the interrupt status register.
    pub fn read_int_status(&self) -> u16 {
        self.int_status
    }

    /// Reads the status register, which is synthesized from the control bits.
    pub fn read_status(&self) -> u16 {
        let deselected = if self.selected { 0 } else { STATUS_DESELECTED };
        (self.control as u16 & 0x70) | STATUS_FIXED_BITS | deselected
    }

    /// Reads the command register, ending the current transaction.
    pub fn read_command(&mut self, cpu: &mut dyn Cpu) -> u8 {

        if !self.selected {
            return 0;
        }

        self.selected = false;
        self.transfer_complete(cpu);
        self.shift
    }

    /// Writes the data register.
    pub fn write_data(&mut self, cpu: &mut dyn Cpu, byte: u8) {

        self.shift = byte;
        self.mark_channel();

        if !self.selected {
            return;
        }

        match Device::from_control(self.control) {
            Some(Device::SmpWrite(slot)) => {
                self.smp[slot].write_data(self.shift);
                self.transfer_complete(cpu);
            },
            _ => self.transfer_in(cpu),
        }
    }

    /// Writes the clock rate register. The serial clock is not modelled.
    pub fn write_clock_rate(&mut self, word: u16) {
        debug!("External devices clock rate {:06o} ignored", word);
    }

    /// Writes the control register; a selected reader transfers immediately.
    pub fn write_control(&mut self, cpu: &mut dyn Cpu, byte: u8) {

        self.control = byte;

        if self.selected {
            self.transfer_in(cpu);
        }
    }

    /// Writes the command register, starting a transaction with the addressed device.
    pub fn write_command(&mut self, cpu: &mut dyn Cpu, byte: u8) {

        self.selected = true;
        self.shift = byte;
        self.mark_channel();

        match Device::from_control(self.control) {
            Some(Device::SmpRead(slot)) => {
                self.shift = self.smp[slot].read_command();
                self.transfer_complete(cpu);
            },
            Some(Device::Keyboard) => self.transfer_keyboard(cpu),
            Some(Device::SmpWrite(slot)) => {
                self.smp[slot].write_command(self.shift);
                self.transfer_complete(cpu);
            },
            None => (),
        }
    }

    /// Latches a key press and raises the keyboard interrupt. Releases are ignored.
    pub fn keyboard_event(&mut self, cpu: &mut dyn Cpu, scancode: u8, pressed: bool) {

        if !pressed {
            return;
        }

        self.keyboard_scan = scancode;
        cpu.interrupt_virq(KEYBOARD_IRQ_LEVEL, KEYBOARD_IRQ_VECTOR);
    }

    /// Returns the slot with the given index, or an error for a bad index.
    fn slot_mut(&mut self, slot: usize) -> Result<&mut SmpSlot> {
        self.smp.get_mut(slot).ok_or(BoardError::InvalidSlot(slot))
    }

    /// Attaches an SMP image to the given slot.
    pub fn attach_smp_image(&mut self, slot: usize, path: &Path) -> Result<()> {
        self.slot_mut(slot)?.attach(path)
    }

    /// Detaches the SMP image in the given slot.
    pub fn detach_smp_image(&mut self, slot: usize) -> Result<()> {
        self.slot_mut(slot)?.detach();
        Ok(())
    }

    /// Returns true if the given slot holds an image; bad indices hold nothing.
    pub fn is_smp_image_attached(&self, slot: usize) -> bool {
        self.smp.get(slot).is_some_and(SmpSlot::is_attached)
    }

    /// Returns the raw register values.
    pub fn registers(&self) -> ExtDeviceRegisters {
        ExtDeviceRegisters {
            keyboard_scan: self.keyboard_scan,
            control: self.control,
            shift: self.shift,
            selected: self.selected,
            int_status: self.int_status,
        }
    }

    /// Restores the raw register values, as captured by `registers`.
    pub fn set_registers(&mut self, registers: &ExtDeviceRegisters) {
        self.keyboard_scan = registers.keyboard_scan;
        self.control = registers.control;
        self.shift = registers.shift;
        self.selected = registers.selected;
        self.int_status = registers.int_status;
    }

    /// Returns the shift register without side effects.
    pub fn peek_shift(&self) -> u8 {
        self.shift
    }
}
