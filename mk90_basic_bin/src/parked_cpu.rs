// SPDX-License-Identifier: GPL-3.0
// parked_cpu.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use mk90_core::cpu::{Cpu, CpuBridge, CPU_IMAGE_SIZE};

/// This struct stands in for the processor when only board state is needed,
/// such as when building or inspecting images. It never executes; its image
/// region is carried through untouched, with the PC in the first word.
pub struct ParkedCpu {
    state: [u8; CPU_IMAGE_SIZE],
}

impl ParkedCpu {

    pub fn new() -> Self {
        ParkedCpu {
            state: [0; CPU_IMAGE_SIZE],
        }
    }
}

impl Cpu for ParkedCpu {

    fn execute(&mut self, _bridge: &mut dyn CpuBridge) {}

    fn pc(&self) -> u16 {
        u16::from_le_bytes([self.state[0], self.state[1]])
    }

    fn set_pc(&mut self, pc: u16) {
        self.state[0..2].copy_from_slice(&pc.to_le_bytes());
    }

    fn start(&mut self, _bridge: &mut dyn CpuBridge) {}

    fn stop(&mut self) {}

    fn interrupt_virq(&mut self, _level: u8, _vector: u16) {}

    fn memory_error(&mut self) {}

    fn tick_evnt(&mut self) {}

    fn is_halt_mode(&self) -> bool {
        false
    }

    fn internal_tick(&self) -> u16 {
        0
    }

    fn clear_internal_tick(&mut self) {}

    fn save_to_image(&self, image: &mut [u8; CPU_IMAGE_SIZE]) {
        image.copy_from_slice(&self.state);
    }

    fn load_from_image(&mut self, image: &[u8; CPU_IMAGE_SIZE]) {
        self.state.copy_from_slice(image);
    }
}
