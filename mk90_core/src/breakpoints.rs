// SPDX-License-Identifier: GPL-3.0
// breakpoints.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

/// Capacity of a breakpoint or watchpoint list. One slot is kept back, so a
/// list holds at most `MAX_BREAKPOINT_COUNT - 1` addresses.
pub const MAX_BREAKPOINT_COUNT: usize = 16;

/// The address value meaning "no breakpoint".
pub const NO_BREAKPOINT: u16 = 0xFFFF;

/// This struct is a small capacity-bounded set of addresses, used for both
/// breakpoints and watchpoints. Insertion order is kept until a removal swaps
/// the last entry into the hole.
#[derive(Clone, Debug, Default)]
pub struct AddressList {
    addresses: Vec<u16>,
}

impl AddressList {

    /// Creates an empty list.
    pub fn new() -> Self {
        AddressList {
            addresses: Vec::with_capacity(MAX_BREAKPOINT_COUNT),
        }
    }

    /// Adds an address. Fails when full, for the sentinel, or for a duplicate.
    pub fn add(&mut self, address: u16) -> bool {

        if self.addresses.len() >= MAX_BREAKPOINT_COUNT - 1 || address == NO_BREAKPOINT {
            return false;
        }
        if self.contains(address) {
            return false;
        }

        self.addresses.push(address);
        true
    }

    /// Removes an address. Fails when it is not in the list.
    pub fn remove(&mut self, address: u16) -> bool {

        if address == NO_BREAKPOINT {
            return false;
        }

        match self.addresses.iter().position(|&entry| entry == address) {
            Some(index) => {
                self.addresses.swap_remove(index);
                true
            },
            None => false,
        }
    }

    pub fn contains(&self, address: u16) -> bool {
        self.addresses.contains(&address)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    /// Appends without the capacity check, for the temporary breakpoint.
    fn push_unchecked(&mut self, address: u16) {
        self.addresses.push(address);
    }
}

/// This struct holds the CPU breakpoints together with the one temporary
/// breakpoint used by "run to cursor" style stepping.
#[derive(Clone, Debug)]
pub struct BreakpointRegistry {
    breakpoints: AddressList,
    temporary: u16,
}

impl BreakpointRegistry {

    pub fn new() -> Self {
        BreakpointRegistry {
            breakpoints: AddressList::new(),
            temporary: NO_BREAKPOINT,
        }
    }

    pub fn add(&mut self, address: u16) -> bool {
        self.breakpoints.add(address)
    }

    pub fn remove(&mut self, address: u16) -> bool {
        self.breakpoints.remove(address)
    }

    pub fn contains(&self, address: u16) -> bool {
        self.breakpoints.contains(address)
    }

    /// Returns the current temporary breakpoint, if one is set.
    pub fn temporary(&self) -> Option<u16> {
        (self.temporary != NO_BREAKPOINT).then_some(self.temporary)
    }

    /// Replaces the temporary breakpoint. The sentinel just clears it, and an
    /// address that already holds a regular breakpoint is left alone.
    pub fn set_temporary(&mut self, address: u16) {

        if self.temporary != NO_BREAKPOINT {
            self.breakpoints.remove(self.temporary);
            self.temporary = NO_BREAKPOINT;
        }

        if address == NO_BREAKPOINT || self.breakpoints.contains(address) {
            return;
        }

        self.breakpoints.push_unchecked(address);
        self.temporary = address;
    }

    pub fn clear_temporary(&mut self) {
        self.set_temporary(NO_BREAKPOINT);
    }

    /// Removes every breakpoint, the temporary one included.
    pub fn clear(&mut self) {
        self.breakpoints.clear();
        self.temporary = NO_BREAKPOINT;
    }

    /// Returns the breakpoints to hand to the board, or `None` when there are none.
    pub fn active(&self) -> Option<&[u16]> {
        if self.breakpoints.is_empty() {
            None
        } else {
            Some(self.breakpoints.as_slice())
        }
    }

    pub fn as_slice(&self) -> &[u16] {
        self.breakpoints.as_slice()
    }
}

#[cfg(test)]
mod tests;
