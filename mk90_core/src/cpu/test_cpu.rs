// SPDX-License-Identifier: GPL-3.0
// test_cpu.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    cell::{Ref, RefCell, RefMut},
    collections::VecDeque,
    rc::Rc,
};

use super::{Cpu, CpuBridge, CPU_IMAGE_SIZE};

/// A single bus access the test CPU performs on its next `execute` call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BusOp {
    ReadWord(u16),
    FetchWord(u16),
    ReadByte(u16),
    WriteWord(u16, u16),
    WriteByte(u16, u8),
}

/// This struct stands in for the real processor. It walks the program counter
/// forward by a fixed step per instruction, performs queued bus accesses, and
/// records everything the board asks of it.
pub struct TestCpu {
    pub pc: u16,
    pub pc_step: u16,
    pub reset_pc: u16,
    pub running: bool,
    pub halt_mode: bool,
    pub internal_tick: u16,
    pub executes: u64,
    pub starts: u32,
    pub stops: u32,
    pub evnt_ticks: u32,
    pub memory_errors: u32,
    pub interrupts: Vec<(u8, u16)>,
    pub pending_ops: VecDeque<BusOp>,
    pub read_results: Vec<u16>,
    pub state: [u8; CPU_IMAGE_SIZE],
}

impl TestCpu {

    pub fn new() -> Self {
        TestCpu {
            pc: 0,
            pc_step: 2,
            reset_pc: 0o100000,
            running: false,
            halt_mode: false,
            internal_tick: 0,
            executes: 0,
            starts: 0,
            stops: 0,
            evnt_ticks: 0,
            memory_errors: 0,
            interrupts: vec![],
            pending_ops: VecDeque::new(),
            read_results: vec![],
            state: [0; CPU_IMAGE_SIZE],
        }
    }

    /// Performs one queued access against the bridge, as an instruction would.
    fn perform(&mut self, bridge: &mut dyn CpuBridge, op: BusOp) {
        let halt_mode = self.halt_mode;
        match op {
            BusOp::ReadWord(address) => {
                let value = bridge.get_word(self, address, halt_mode);
                self.read_results.push(value);
            },
            BusOp::FetchWord(address) => {
                let value = bridge.get_word_exec(self, address, halt_mode);
                self.read_results.push(value);
            },
            BusOp::ReadByte(address) => {
                let value = bridge.get_byte(self, address, halt_mode);
                self.read_results.push(value as u16);
            },
            BusOp::WriteWord(address, word) => bridge.set_word(self, address, halt_mode, word),
            BusOp::WriteByte(address, byte) => bridge.set_byte(self, address, halt_mode, byte),
        }
    }
}

impl Cpu for TestCpu {

    fn execute(&mut self, bridge: &mut dyn CpuBridge) {
        self.executes += 1;
        if let Some(op) = self.pending_ops.pop_front() {
            self.perform(bridge, op);
        }
        self.pc = self.pc.wrapping_add(self.pc_step);
        self.internal_tick = 0;
    }

    fn pc(&self) -> u16 {
        self.pc
    }

    fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    fn start(&mut self, _bridge: &mut dyn CpuBridge) {
        self.starts += 1;
        self.running = true;
        self.pc = self.reset_pc;
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.running = false;
    }

    fn interrupt_virq(&mut self, level: u8, vector: u16) {
        self.interrupts.push((level, vector));
    }

    fn memory_error(&mut self) {
        self.memory_errors += 1;
    }

    fn tick_evnt(&mut self) {
        self.evnt_ticks += 1;
    }

    fn is_halt_mode(&self) -> bool {
        self.halt_mode
    }

    fn internal_tick(&self) -> u16 {
        self.internal_tick
    }

    fn clear_internal_tick(&mut self) {
        self.internal_tick = 0;
    }

    fn save_to_image(&self, image: &mut [u8; CPU_IMAGE_SIZE]) {
        image.copy_from_slice(&self.state);
        image[0..2].copy_from_slice(&self.pc.to_le_bytes());
    }

    fn load_from_image(&mut self, image: &[u8; CPU_IMAGE_SIZE]) {
        self.state.copy_from_slice(image);
        self.pc = u16::from_le_bytes([image[0], image[1]]);
    }
}

/// A handle that lets a test keep inspecting a `TestCpu` after the board has
/// taken ownership of its boxed copy.
#[derive(Clone)]
pub struct SharedTestCpu(Rc<RefCell<TestCpu>>);

impl SharedTestCpu {

    pub fn new() -> Self {
        SharedTestCpu(Rc::new(RefCell::new(TestCpu::new())))
    }

    /// Returns another handle to the same CPU, boxed for the board.
    pub fn boxed(&self) -> Box<dyn Cpu> {
        Box::new(self.clone())
    }

    pub fn get(&self) -> Ref<'_, TestCpu> {
        self.0.borrow()
    }

    pub fn get_mut(&self) -> RefMut<'_, TestCpu> {
        self.0.borrow_mut()
    }
}

impl Cpu for SharedTestCpu {

    fn execute(&mut self, bridge: &mut dyn CpuBridge) {
        self.0.borrow_mut().execute(bridge);
    }

    fn pc(&self) -> u16 {
        self.0.borrow().pc()
    }

    fn set_pc(&mut self, pc: u16) {
        self.0.borrow_mut().set_pc(pc);
    }

    fn start(&mut self, bridge: &mut dyn CpuBridge) {
        self.0.borrow_mut().start(bridge);
    }

    fn stop(&mut self) {
        self.0.borrow_mut().stop();
    }

    fn interrupt_virq(&mut self, level: u8, vector: u16) {
        self.0.borrow_mut().interrupt_virq(level, vector);
    }

    fn memory_error(&mut self) {
        self.0.borrow_mut().memory_error();
    }

    fn tick_evnt(&mut self) {
        self.0.borrow_mut().tick_evnt();
    }

    fn is_halt_mode(&self) -> bool {
        self.0.borrow().is_halt_mode()
    }

    fn internal_tick(&self) -> u16 {
        self.0.borrow().internal_tick()
    }

    fn clear_internal_tick(&mut self) {
        self.0.borrow_mut().clear_internal_tick();
    }

    fn save_to_image(&self, image: &mut [u8; CPU_IMAGE_SIZE]) {
        self.0.borrow().save_to_image(image);
    }

    fn load_from_image(&mut self, image: &[u8; CPU_IMAGE_SIZE]) {
        self.0.borrow_mut().load_from_image(image);
    }
}
