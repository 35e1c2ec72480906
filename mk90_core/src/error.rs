// SPDX-License-Identifier: GPL-3.0
// error.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results produced by the board and the emulator.
pub type Result<T> = std::result::Result<T, BoardError>;

/// This enum represents every failure the board and emulator report to their
/// caller. Bus faults are not in here: those go to the CPU via `memory_error`.
#[derive(Debug, Error)]
pub enum BoardError {

    #[error("SMP slot {0} does not exist")]
    InvalidSlot(usize),

    #[error("SMP image {path} is {size} bytes, the limit is {limit} bytes")]
    SmpImageTooLarge {
        path: PathBuf,
        size: u64,
        limit: usize,
    },

    #[error("RAM load of {length} bytes at bank {bank} does not fit in RAM")]
    RamLoadOutOfRange {
        bank: usize,
        length: usize,
    },

    #[error("ROM image is {0} bytes, expected {1}")]
    RomImageSize(usize, usize),

    #[error("emulator image is {0} bytes, expected {1}")]
    ImageSize(usize, usize),

    #[error("emulator image header mismatch: {0}")]
    ImageHeader(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
