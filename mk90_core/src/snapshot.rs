// SPDX-License-Identifier: GPL-3.0
// snapshot.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use crate::{
    error::{BoardError, Result},
    ext_device::ExtDeviceRegisters,
    ports::LcdRegisters,
    sound_timer::SoundTimerRegisters,
};
use mk90_utility::{read_u16_le, read_u32_le, write_u16_le, write_u32_le};

/// First magic word of an emulator image.
pub const IMAGE_HEADER1: u32 = 0x494D454E;

/// Second magic word of an emulator image.
pub const IMAGE_HEADER2: u32 = 0x21214147;

/// Image format version.
pub const IMAGE_VERSION: u32 = 0x00010000;

/// Total size of an emulator image in bytes.
pub const IMAGE_SIZE: usize = 147456;

/// Field offsets inside the image.
pub const OFFSET_MAGIC1: usize = 0;
pub const OFFSET_MAGIC2: usize = 4;
pub const OFFSET_VERSION: usize = 8;
pub const OFFSET_SIZE: usize = 12;
pub const OFFSET_UPTIME: usize = 16;
pub const OFFSET_BOARD: usize = 32;
pub const OFFSET_CPU: usize = 160;
pub const OFFSET_ROM: usize = 4096;
pub const OFFSET_RAM: usize = 36864;

/// Size of the board register block.
pub const BOARD_BLOCK_SIZE: usize = 128;

/// Size of the RAM region; RAM is followed by zero fill.
pub const RAM_REGION_SIZE: usize = IMAGE_SIZE - OFFSET_RAM;

/// Word indices inside the board register block.
const WORD_CONFIGURATION: usize = 0;
const WORD_LCD_ADDRESS: usize = 7;
const WORD_LCD_CONFIG: usize = 8;
const WORD_LCD_INDEX: usize = 9;
const WORD_SOUND_ON: usize = 10;
const WORD_TONE_MODE: usize = 11;
const WORD_TONE: usize = 12;
const WORD_COUNTER1_RELOAD: usize = 13;
const WORD_COUNTER2_RELOAD: usize = 14;
const WORD_TIMER1: usize = 15;
const WORD_TIMER1_DIV: usize = 16;
const WORD_TIMER2: usize = 17;
const WORD_KEYBOARD_SCAN: usize = 18;
const WORD_EXT_CONTROL: usize = 19;
const WORD_EXT_SHIFT: usize = 20;
const WORD_EXT_SELECTED: usize = 21;
const WORD_EXT_INT_STATUS: usize = 22;

/// Fails unless the buffer can hold a whole image.
pub fn check_image_size(length: usize) -> Result<()> {
    if length < IMAGE_SIZE {
        return Err(BoardError::ImageSize(length, IMAGE_SIZE));
    }
    Ok(())
}

/// The fixed header at the start of every emulator image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic1: u32,
    pub magic2: u32,
    pub version: u32,
    pub size: u32,
    pub uptime: u32,
}

impl SnapshotHeader {

    /// Creates the header this build writes, with the given uptime in seconds.
    pub fn new(uptime: u32) -> Self {
        SnapshotHeader {
            magic1: IMAGE_HEADER1,
            magic2: IMAGE_HEADER2,
            version: IMAGE_VERSION,
            size: IMAGE_SIZE as u32,
            uptime,
        }
    }

    /// Writes the header fields into the image.
    pub fn write_to(&self, image: &mut [u8]) -> Result<()> {

        check_image_size(image.len())?;

        write_u32_le(image, OFFSET_MAGIC1, self.magic1);
        write_u32_le(image, OFFSET_MAGIC2, self.magic2);
        write_u32_le(image, OFFSET_VERSION, self.version);
        write_u32_le(image, OFFSET_SIZE, self.size);
        write_u32_le(image, OFFSET_UPTIME, self.uptime);

        Ok(())
    }

    /// Reads the header fields from the image, without judging them.
    pub fn read_from(image: &[u8]) -> Result<Self> {

        check_image_size(image.len())?;

        Ok(SnapshotHeader {
            magic1: read_u32_le(image, OFFSET_MAGIC1).unwrap_or(0),
            magic2: read_u32_le(image, OFFSET_MAGIC2).unwrap_or(0),
            version: read_u32_le(image, OFFSET_VERSION).unwrap_or(0),
            size: read_u32_le(image, OFFSET_SIZE).unwrap_or(0),
            uptime: read_u32_le(image, OFFSET_UPTIME).unwrap_or(0),
        })
    }

    /// Checks the magic words, version and size. Loading does not call this;
    /// it is for tools that want to vet an image first.
    pub fn validate(&self) -> Result<()> {

        if self.magic1 != IMAGE_HEADER1 || self.magic2 != IMAGE_HEADER2 {
            return Err(BoardError::ImageHeader(format!(
                "bad magic {:08x} {:08x}",
                self.magic1, self.magic2
            )));
        }
        if self.version != IMAGE_VERSION {
            return Err(BoardError::ImageHeader(format!("unsupported version {:08x}", self.version)));
        }
        if self.size != IMAGE_SIZE as u32 {
            return Err(BoardError::ImageHeader(format!("recorded size {}", self.size)));
        }

        Ok(())
    }
}

/// Writes the uptime field of an image in place.
pub fn write_uptime(image: &mut [u8], uptime: u32) -> Result<()> {
    check_image_size(image.len())?;
    write_u32_le(image, OFFSET_UPTIME, uptime);
    Ok(())
}

/// Everything the board itself stores in the register block of an image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardRegisters {
    pub configuration: u16,
    pub lcd: LcdRegisters,
    pub sound_on: bool,
    pub sound_timer: SoundTimerRegisters,
    pub ext_device: ExtDeviceRegisters,
}

impl BoardRegisters {

    /// Encodes the registers as little-endian words. Unused words are zeroed.
    pub fn encode(&self, block: &mut [u8; BOARD_BLOCK_SIZE]) {

        block.fill(0);
        let mut put = |index: usize, word: u16| {
            write_u16_le(block, index * 2, word);
        };

        put(WORD_CONFIGURATION, self.configuration);

        put(WORD_LCD_ADDRESS, self.lcd.address);
        put(WORD_LCD_CONFIG, self.lcd.config);
        put(WORD_LCD_INDEX, self.lcd.index);
        put(WORD_SOUND_ON, self.sound_on as u16);

        let timer = &self.sound_timer;
        put(WORD_TONE_MODE, timer.mode);
        put(WORD_TONE, timer.tone);
        put(WORD_COUNTER1_RELOAD, timer.counter1_reload);
        put(WORD_COUNTER2_RELOAD, timer.counter2_reload);
        put(WORD_TIMER1, timer.timer1);
        put(WORD_TIMER1_DIV, timer.timer1_div);
        put(WORD_TIMER2, timer.timer2);

        let ext = &self.ext_device;
        put(WORD_KEYBOARD_SCAN, ext.keyboard_scan as u16);
        put(WORD_EXT_CONTROL, ext.control as u16);
        put(WORD_EXT_SHIFT, ext.shift as u16);
        put(WORD_EXT_SELECTED, ext.selected as u16);
        put(WORD_EXT_INT_STATUS, ext.int_status);
    }

    /// Decodes the registers from little-endian words.
    pub fn decode(block: &[u8; BOARD_BLOCK_SIZE]) -> Self {

        let get = |index: usize| read_u16_le(block, index * 2).unwrap_or(0);

        BoardRegisters {
            configuration: get(WORD_CONFIGURATION),
            lcd: LcdRegisters {
                address: get(WORD_LCD_ADDRESS),
                config: get(WORD_LCD_CONFIG),
                index: get(WORD_LCD_INDEX),
            },
            sound_on: get(WORD_SOUND_ON) != 0,
            sound_timer: SoundTimerRegisters {
                mode: get(WORD_TONE_MODE),
                tone: get(WORD_TONE),
                counter1_reload: get(WORD_COUNTER1_RELOAD),
                counter2_reload: get(WORD_COUNTER2_RELOAD),
                timer1: get(WORD_TIMER1),
                timer1_div: get(WORD_TIMER1_DIV),
                timer2: get(WORD_TIMER2),
            },
            ext_device: ExtDeviceRegisters {
                keyboard_scan: get(WORD_KEYBOARD_SCAN) as u8,
                control: get(WORD_EXT_CONTROL) as u8,
                shift: get(WORD_EXT_SHIFT) as u8,
                selected: get(WORD_EXT_SELECTED) != 0,
                int_status: get(WORD_EXT_INT_STATUS),
            },
        }
    }
}

#[cfg(test)]
mod tests;
