// SPDX-License-Identifier: GPL-3.0
// smp.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    fs::{File, OpenOptions},
    io::Read,
    path::Path,
};

use log::{info, trace, warn};

use crate::error::{BoardError, Result};

/// The number of SMP slots on the board.
pub const SMP_SLOT_COUNT: usize = 2;

/// The largest SMP image we accept, in bytes.
pub const SMP_MAX_SIZE: usize = 10240;

/// Cursor mask for images below 64K.
const MASK_16BIT: u32 = 0xFFFF;

/// Cursor mask for larger images. Unreachable while `SMP_MAX_SIZE` stays below
/// 64K, but part of the cartridge addressing scheme.
const MASK_24BIT: u32 = 0xFF_FFFF;

/// This struct models one removable SMP cartridge slot: a file-backed byte array
/// with a command-driven cursor.
pub struct SmpSlot {

    // Backing file, present while an image is attached.
    file: Option<File>,

    // Image contents, exactly as large as the file.
    data: Vec<u8>,

    // Data offset, wrapped by the mask below.
    dataptr: u32,
    mask: u32,

    // Last command byte written to the cartridge.
    cmd: u8,
}

/// Implementation functions for the SMP slot.
impl SmpSlot {

    /// Creates a new, empty slot.
    pub fn new() -> Self {
        SmpSlot {
            file: None,
            data: vec![],
            dataptr: 0,
            mask: 0,
            cmd: 0,
        }
    }

    /// Returns true if an image is attached.
    pub fn is_attached(&self) -> bool {
        self.file.is_some()
    }

    /// Returns the size of the attached image in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the current data cursor.
    pub fn dataptr(&self) -> u32 {
        self.dataptr
    }

    /// Returns the last command byte.
    pub fn command(&self) -> u8 {
        self.cmd
    }

    /// Attaches the image at the given path, detaching any current one first.
    /// On failure the slot is left detached.
    pub fn attach(&mut self, path: &Path) -> Result<()> {

        self.detach();

        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let size = file.metadata()?.len();
        if size > SMP_MAX_SIZE as u64 {
            warn!("SMP image {} rejected: {} bytes", path.display(), size);
            return Err(BoardError::SmpImageTooLarge {
                path: path.to_path_buf(),
                size,
                limit: SMP_MAX_SIZE,
            });
        }

        let mut data = vec![0; size as usize];
        file.read_exact(&mut data)?;

        self.mask = if data.len() < 65536 { MASK_16BIT } else { MASK_24BIT };
        self.data = data;
        self.file = Some(file);
        self.dataptr = 0;
        self.cmd = 0;

        info!("SMP image {} attached, {} bytes", path.display(), self.data.len());
        Ok(())
    }

    /// Detaches the current image. The buffer is dropped without being written back.
    pub fn detach(&mut self) {

        if self.file.take().is_none() {
            return;
        }

        self.data = vec![];
        info!("SMP image detached");
    }

    /// Handles a read of the command register.
    pub fn read_command(&self) -> u8 {
        0
    }

    /// Handles a write to the command register.
    pub fn write_command(&mut self, byte: u8) {
        trace!("SMP command {:02x} at {:04x}", byte, self.dataptr);
        self.cmd = byte;
    }

    /// Handles a data read, as selected by the last command.
    pub fn read_data(&mut self) -> u8 {

        match self.cmd >> 4 {

            0x0 => 0,

            // Read data, direction chosen by bit 7.
            0x1 | 0xD => {
                let result = self.data.get(self.dataptr as usize).copied().unwrap_or(0xFF);
                let next = if self.cmd & 0x80 != 0 {
                    self.dataptr.wrapping_add(1)
                } else {
                    self.dataptr.wrapping_sub(1)
                };
                self.dataptr = next & self.mask;
                trace!("SMP read {:02x}, next {:06x}", result, self.dataptr);
                result
            },

            _ => 0xFF,
        }
    }

    /// Handles a data write, as selected by the last command.
    pub fn write_data(&mut self, byte: u8) {

        match self.cmd >> 4 {

            // Write address, high byte first.
            0xA => self.dataptr = ((self.dataptr << 8) | byte as u32) & self.mask,

            // Write data: not modelled for this cartridge revision.
            0x2 | 0xC | 0xE => (),

            _ => (),
        }
    }
}
