// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::*;

#[test]
fn add_should_reject_sentinel_and_duplicates() {

    let mut list = AddressList::new();

    assert!(list.add(0o1000));
    assert!(!list.add(0o1000));
    assert!(!list.add(NO_BREAKPOINT));
    assert_eq!(list.as_slice(), &[0o1000]);
}

#[test]
fn add_should_fail_once_capacity_minus_one_is_reached() {

    let mut list = AddressList::new();
    for address in 0..(MAX_BREAKPOINT_COUNT as u16 - 1) {
        assert!(list.add(address * 2));
    }

    assert!(!list.add(0o7000));
    assert_eq!(list.len(), MAX_BREAKPOINT_COUNT - 1);
}

#[test]
fn remove_should_swap_last_entry_into_hole() {

    let mut list = AddressList::new();
    for address in [10, 20, 30, 40] {
        list.add(address);
    }

    assert!(list.remove(20));
    assert_eq!(list.as_slice(), &[10, 40, 30]);
    assert!(!list.remove(20));
    assert!(!list.remove(NO_BREAKPOINT));
}

#[test]
fn remove_from_empty_list_should_fail() {

    let mut list = AddressList::new();

    assert!(!list.remove(0));
    assert!(list.is_empty());
}

#[test]
fn temporary_breakpoint_should_be_idempotent() {

    // Given one regular breakpoint.
    let mut registry = BreakpointRegistry::new();
    registry.add(0o100);

    // Setting the same temporary address twice leaves one entry.
    registry.set_temporary(0o200);
    registry.set_temporary(0o200);

    assert_eq!(registry.as_slice(), &[0o100, 0o200]);
    assert_eq!(registry.temporary(), Some(0o200));

    // Moving it replaces the old entry.
    registry.set_temporary(0o300);

    assert_eq!(registry.as_slice(), &[0o100, 0o300]);

    registry.clear_temporary();

    assert_eq!(registry.as_slice(), &[0o100]);
    assert_eq!(registry.temporary(), None);
}

#[test]
fn temporary_breakpoint_should_not_shadow_regular_one() {

    let mut registry = BreakpointRegistry::new();
    registry.add(0o100);
    registry.set_temporary(0o100);

    assert_eq!(registry.temporary(), None);

    // Clearing the temporary breakpoint keeps the regular one.
    registry.clear_temporary();

    assert!(registry.contains(0o100));
}

#[test]
fn temporary_breakpoint_should_ignore_capacity() {

    let mut registry = BreakpointRegistry::new();
    for address in 0..(MAX_BREAKPOINT_COUNT as u16 - 1) {
        registry.add(address * 2);
    }
    registry.set_temporary(0o7001);

    assert_eq!(registry.as_slice().len(), MAX_BREAKPOINT_COUNT);
    assert!(registry.contains(0o7001));
}

#[test]
fn add_should_stay_rejected_after_temporary_fills_last_slot() {

    // Given a full list with the temporary breakpoint in the spare slot.
    let mut registry = BreakpointRegistry::new();
    for address in 0..(MAX_BREAKPOINT_COUNT as u16 - 1) {
        assert!(registry.add(address * 2));
    }
    registry.set_temporary(0o7001);

    assert!(!registry.add(0o7777));
    assert!(!registry.add(0o7775));
    assert_eq!(registry.as_slice().len(), MAX_BREAKPOINT_COUNT);

    // Dropping the temporary breakpoint still leaves the list full.
    registry.clear_temporary();

    assert!(!registry.add(0o7777));
    assert_eq!(registry.as_slice().len(), MAX_BREAKPOINT_COUNT - 1);
}

#[test]
fn active_should_be_none_when_empty() {

    let mut registry = BreakpointRegistry::new();

    assert_eq!(registry.active(), None);

    registry.set_temporary(0o400);

    assert_eq!(registry.active(), Some(&[0o400][..]));

    registry.clear();

    assert_eq!(registry.active(), None);
    assert_eq!(registry.temporary(), None);
}
