// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::{translate_address, AddressType, Memory, RAM_SIZE, ROM_SIZE};
use crate::error::BoardError;
use proptest::prelude::*;

#[test]
fn low_16k_should_be_ram_at_same_offset() {

    assert_eq!(translate_address(0, false, false), (AddressType::Ram, 0));
    assert_eq!(translate_address(0o37777, false, false), (AddressType::Ram, 0o37777));
}

#[test]
fn gap_between_ram_and_rom_should_be_denied() {

    assert_eq!(translate_address(0o40000, false, false).0, AddressType::Deny);
    assert_eq!(translate_address(0o77777, true, true).0, AddressType::Deny);
}

#[test]
fn rom_window_should_be_offset_from_100000() {

    assert_eq!(translate_address(0o100000, false, false), (AddressType::Rom, 0));
    assert_eq!(translate_address(0o163777, false, false), (AddressType::Rom, 0o63777));
    assert_eq!(translate_address(0o166000, false, false), (AddressType::Rom, 0o66000));
    assert_eq!(translate_address(0o174665, false, false), (AddressType::Rom, 0o74665));
}

#[test]
fn addresses_from_174666_should_be_ram() {

    assert_eq!(translate_address(0o174666, false, false), (AddressType::Ram, 0o174666));
    assert_eq!(translate_address(0o177777, true, false), (AddressType::Ram, 0o177777));
}

#[test]
fn io_window_should_expose_ports_only_in_their_sub_ranges() {

    // Given the sparse port layout of the 164000-165777 window.
    let ports = [0o164000, 0o164007, 0o164020, 0o164027, 0o164032, 0o164035, 0o165000, 0o165177];
    let ram = [0o164010, 0o164017, 0o164030, 0o164031, 0o164036, 0o164777, 0o165200, 0o165777];

    for address in ports {
        assert_eq!(translate_address(address, false, false), (AddressType::Io, address));
    }
    for address in ram {
        assert_eq!(translate_address(address, false, false), (AddressType::Ram, address));
    }
}

proptest! {

    #[test]
    fn translation_should_ignore_mode_and_fetch_flags(address in any::<u16>()) {

        let reference = translate_address(address, false, false);

        prop_assert_eq!(translate_address(address, true, false), reference);
        prop_assert_eq!(translate_address(address, false, true), reference);
        prop_assert_eq!(translate_address(address, true, true), reference);
    }

    #[test]
    fn translated_offsets_should_fit_their_plane(address in any::<u16>()) {

        let (kind, offset) = translate_address(address, false, false);

        match kind {
            AddressType::Rom => prop_assert!((offset as usize) < ROM_SIZE),
            AddressType::Ram => prop_assert!((offset as usize) < RAM_SIZE),
            AddressType::Io | AddressType::Deny => prop_assert_eq!(offset, address),
        }
    }
}

#[test]
fn ram_word_should_be_little_endian_and_ignore_bit_0() {

    let mut memory = Memory::new();
    memory.set_ram_word(0o1001, 0x1234);

    assert_eq!(memory.ram_byte(0o1000), 0x34);
    assert_eq!(memory.ram_byte(0o1001), 0x12);
    assert_eq!(memory.ram_word(0o1001), 0x1234);
}

#[test]
fn top_of_ram_word_should_be_reachable() {

    let mut memory = Memory::new();
    memory.set_ram_word(0o177776, 0o123456);

    assert_eq!(memory.ram_word(0o177777), 0o123456);
}

#[test]
fn load_rom_should_reject_wrong_size() {

    let mut memory = Memory::new();
    let result = memory.load_rom(&[0; 100]);

    assert!(matches!(result, Err(BoardError::RomImageSize(100, 32768))));
}

#[test]
fn load_rom_should_replace_whole_image() {

    let mut memory = Memory::new();
    let mut image = vec![0_u8; ROM_SIZE];
    image[0] = 0x0A;
    image[1] = 0x0B;
    memory.load_rom(&image).unwrap();

    assert_eq!(memory.rom_word(0), 0x0B0A);
    assert_eq!(memory.rom_byte(1), 0x0B);
}

#[test]
fn load_ram_should_place_data_at_bank_boundary() {

    let mut memory = Memory::new();
    memory.load_ram(2, &[1, 2, 3]).unwrap();

    assert_eq!(memory.ram_byte(16384), 1);
    assert_eq!(memory.ram_byte(16386), 3);
}

#[test]
fn load_ram_should_reject_overflowing_data_without_writing() {

    let mut memory = Memory::new();
    let result = memory.load_ram(7, &[0xFF; 8193]);

    assert!(matches!(result, Err(BoardError::RamLoadOutOfRange { bank: 7, length: 8193 })));
    assert_eq!(memory.ram_byte(0o160000), 0);
}

#[test]
fn clear_should_zero_both_planes() {

    let mut memory = Memory::new();
    memory.set_ram_byte(5, 5);
    memory.load_rom(&vec![0xFF; ROM_SIZE]).unwrap();
    memory.clear();

    assert_eq!(memory.ram_byte(5), 0);
    assert_eq!(memory.rom_byte(5), 0);
}
