// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::*;

#[test]
fn header_should_be_written_at_fixed_offsets() {

    let mut image = vec![0; IMAGE_SIZE];
    SnapshotHeader::new(42).write_to(&mut image).unwrap();

    assert_eq!(&image[0..4], &[0x4E, 0x45, 0x4D, 0x49]);
    assert_eq!(&image[4..8], &[0x47, 0x41, 0x21, 0x21]);
    assert_eq!(&image[8..12], &[0x00, 0x00, 0x01, 0x00]);
    assert_eq!(&image[12..16], &147456_u32.to_le_bytes());
    assert_eq!(&image[16..20], &42_u32.to_le_bytes());
}

#[test]
fn header_should_read_back_and_validate() {

    let mut image = vec![0; IMAGE_SIZE];
    SnapshotHeader::new(7).write_to(&mut image).unwrap();
    let header = SnapshotHeader::read_from(&image).unwrap();

    assert_eq!(header, SnapshotHeader::new(7));
    assert!(header.validate().is_ok());
}

#[test]
fn validate_should_reject_foreign_headers() {

    let zeroed = SnapshotHeader::read_from(&vec![0; IMAGE_SIZE]).unwrap();
    let old_version = SnapshotHeader {
        version: 0x00000100,
        ..SnapshotHeader::new(0)
    };
    let wrong_size = SnapshotHeader {
        size: 1024,
        ..SnapshotHeader::new(0)
    };

    assert!(matches!(zeroed.validate(), Err(BoardError::ImageHeader(_))));
    assert!(matches!(old_version.validate(), Err(BoardError::ImageHeader(_))));
    assert!(matches!(wrong_size.validate(), Err(BoardError::ImageHeader(_))));
}

#[test]
fn short_buffers_should_be_rejected() {

    let mut image = vec![0; IMAGE_SIZE - 1];

    assert!(matches!(
        SnapshotHeader::new(0).write_to(&mut image),
        Err(BoardError::ImageSize(147455, 147456))
    ));
    assert!(SnapshotHeader::read_from(&image).is_err());
    assert!(write_uptime(&mut image, 1).is_err());
}

#[test]
fn board_registers_should_use_documented_word_layout() {

    // Given a register set with distinct values in every field.
    let registers = BoardRegisters {
        configuration: 20,
        lcd: LcdRegisters {
            address: 0o1000,
            config: 0x88C6,
            index: 0xFFFF,
        },
        sound_on: true,
        sound_timer: SoundTimerRegisters {
            mode: 0o14,
            tone: 0o31,
            counter1_reload: 0x40,
            counter2_reload: 5,
            timer1: 3,
            timer1_div: 2,
            timer2: 1,
        },
        ext_device: ExtDeviceRegisters {
            keyboard_scan: 0o105,
            control: 0x22,
            shift: 0xFF,
            selected: true,
            int_status: 0xFFFF,
        },
    };
    let mut block = [0xAA; BOARD_BLOCK_SIZE];
    registers.encode(&mut block);

    // Spot check the layout, then decode it back.
    let word = |index: usize| u16::from_le_bytes([block[index * 2], block[index * 2 + 1]]);
    assert_eq!(word(0), 20);
    assert_eq!(word(1), 0);
    assert_eq!(word(7), 0o1000);
    assert_eq!(word(10), 1);
    assert_eq!(word(12), 0o31);
    assert_eq!(word(18), 0o105);
    assert_eq!(word(22), 0xFFFF);
    assert!(block[46..].iter().all(|&byte| byte == 0));

    assert_eq!(BoardRegisters::decode(&block), registers);
}
