// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// This crate contains useful utility functions that can be used throughout the codebase.

/// Exists to allow us to define custom trait operations on `u16`.
type CustomWord = u16;

/// This trait exists to allow us to split and splice 16-bit bus words in the same way
/// the hardware does for byte-wide accesses: even addresses hit the low byte, odd
/// addresses hit the high byte.
pub trait WordBytes {

    type Output;

    /// This function should return the low (even address) byte of the word.
    fn low_byte(self) -> u8;

    /// This function should return the high (odd address) byte of the word.
    fn high_byte(self) -> u8;

    /// This function should return the word with its low byte replaced.
    fn with_low_byte(self, byte: u8) -> Self::Output;

    /// This function should return the word with its high byte replaced.
    fn with_high_byte(self, byte: u8) -> Self::Output;

    /// This function should return the byte selected by bit 0 of the supplied address.
    fn byte_at(self, address: u16) -> u8;

    /// This function should return the word with the byte selected by bit 0 of the
    /// supplied address replaced.
    fn with_byte_at(self, address: u16, byte: u8) -> Self::Output;
}

impl WordBytes for CustomWord {

    type Output = u16;

    /// Returns bits 0-7.
    #[inline(always)]
    fn low_byte(self) -> u8 {
        (self & 0xFF) as u8
    }

    /// Returns bits 8-15.
    #[inline(always)]
    fn high_byte(self) -> u8 {
        (self >> 8) as u8
    }

    /// Replaces bits 0-7.
    #[inline(always)]
    fn with_low_byte(self, byte: u8) -> Self::Output {
        (self & 0xFF00) | byte as u16
    }

    /// Replaces bits 8-15.
    #[inline(always)]
    fn with_high_byte(self, byte: u8) -> Self::Output {
        (self & 0x00FF) | ((byte as u16) << 8)
    }

    /// Odd addresses select the high byte.
    #[inline(always)]
    fn byte_at(self, address: u16) -> u8 {
        if address & 1 != 0 {
            self.high_byte()
        } else {
            self.low_byte()
        }
    }

    /// Odd addresses select the high byte.
    #[inline(always)]
    fn with_byte_at(self, address: u16, byte: u8) -> Self::Output {
        if address & 1 != 0 {
            self.with_high_byte(byte)
        } else {
            self.with_low_byte(byte)
        }
    }
}

/// Reads a little-endian `u16` from the buffer at the given offset, or `None` if the
/// field would run past the end of the buffer.
pub fn read_u16_le(buffer: &[u8], offset: usize) -> Option<u16> {
    let bytes = buffer.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reads a little-endian `u32` from the buffer at the given offset, or `None` if the
/// field would run past the end of the buffer.
pub fn read_u32_le(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes = buffer.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Writes a little-endian `u16` into the buffer at the given offset. Returns `false`
/// and leaves the buffer untouched if the field does not fit.
pub fn write_u16_le(buffer: &mut [u8], offset: usize, value: u16) -> bool {
    match offset.checked_add(2).and_then(|end| buffer.get_mut(offset..end)) {
        Some(field) => {
            field.copy_from_slice(&value.to_le_bytes());
            true
        },
        None => false,
    }
}

/// Writes a little-endian `u32` into the buffer at the given offset. Returns `false`
/// and leaves the buffer untouched if the field does not fit.
pub fn write_u32_le(buffer: &mut [u8], offset: usize, value: u32) -> bool {
    match offset.checked_add(4).and_then(|end| buffer.get_mut(offset..end)) {
        Some(field) => {
            field.copy_from_slice(&value.to_le_bytes());
            true
        },
        None => false,
    }
}


#[cfg(test)]
mod tests {

    use super::{read_u16_le, read_u32_le, write_u16_le, write_u32_le, WordBytes};

    #[test]
    fn low_and_high_byte_should_split_word() {

        let input = 0x88C6_u16;

        assert_eq!(input.low_byte(), 0xC6);
        assert_eq!(input.high_byte(), 0x88);
    }

    #[test]
    fn with_low_byte_should_keep_high_byte() {

        let input = 0x1234_u16;
        let output = input.with_low_byte(0xAB);

        assert_eq!(output, 0x12AB);
    }

    #[test]
    fn with_high_byte_should_keep_low_byte() {

        let input = 0x1234_u16;
        let output = input.with_high_byte(0xAB);

        assert_eq!(output, 0xAB34);
    }

    #[test]
    fn byte_at_should_select_high_byte_for_odd_address() {

        let input = 0xFF84_u16;

        assert_eq!(input.byte_at(0o164025), 0xFF);
        assert_eq!(input.byte_at(0o164024), 0x84);
    }

    #[test]
    fn with_byte_at_should_merge_into_correct_half() {

        let input = 0x0000_u16;

        assert_eq!(input.with_byte_at(0o164001, 0x12), 0x1200);
        assert_eq!(input.with_byte_at(0o164000, 0x12), 0x0012);
    }

    #[test]
    fn read_u16_le_should_decode_little_endian() {

        let buffer = [0x00, 0x34, 0x12];

        assert_eq!(read_u16_le(&buffer, 1), Some(0x1234));
    }

    #[test]
    fn read_should_refuse_fields_past_the_end() {

        let buffer = [0x00, 0x34, 0x12];

        assert_eq!(read_u16_le(&buffer, 2), None);
        assert_eq!(read_u32_le(&buffer, 0), None);
        assert_eq!(read_u16_le(&buffer, usize::MAX), None);
    }

    #[test]
    fn write_u32_le_should_encode_little_endian() {

        let mut buffer = [0_u8; 6];

        assert!(write_u32_le(&mut buffer, 1, 0x494D454E));
        assert_eq!(buffer, [0x00, 0x4E, 0x45, 0x4D, 0x49, 0x00]);
        assert_eq!(read_u32_le(&buffer, 1), Some(0x494D454E));
    }

    #[test]
    fn write_should_leave_buffer_untouched_when_field_does_not_fit() {

        let mut buffer = [0xAA_u8; 3];

        assert!(!write_u16_le(&mut buffer, 2, 0x1234));
        assert!(!write_u32_le(&mut buffer, 0, 0x12345678));
        assert_eq!(buffer, [0xAA; 3]);
    }
}
