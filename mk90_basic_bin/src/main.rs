// SPDX-License-Identifier: GPL-3.0
// main.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// This file is the core of the basic client - it exists merely as a CLI-based
// program to build and inspect emulator images without a processor core. In
// due course, other UIs will likely come with full emulation support.

mod parked_cpu;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use mk90_core::{
    cpu::{Cpu, CPU_IMAGE_SIZE},
    emulator::{Configuration, Emulator},
    error::Result,
    motherboard::{mk90_motherboard::Mk90Motherboard, Motherboard, DEFAULT_SOUND_SAMPLE_RATE},
    snapshot::{BoardRegisters, SnapshotHeader, BOARD_BLOCK_SIZE, OFFSET_BOARD, OFFSET_CPU},
};
use parked_cpu::ParkedCpu;

#[derive(Parser)]
#[command(
    version,
    about = "A basic barebones image tool for the MK90 emulator",
    long_about = None
)]
struct Mk90Args {
    #[command(subcommand)]
    command: Mk90Command,
}

#[derive(Subcommand)]
enum Mk90Command {

    /// Print the header and board registers of an emulator image
    Info {
        #[arg(
            help = "An emulator image file",
            id = "Image file"
        )]
        image: PathBuf,
    },

    /// Build a freshly reset emulator image from a ROM and optional RAM contents
    Build {
        #[arg(
            long = "rom",
            help = "A 32K MK90 BASIC ROM file",
            id = "ROM file"
        )]
        rom: PathBuf,

        #[arg(
            long = "conf",
            help = "Machine configuration: 10 or 20",
            default_value_t = 10
        )]
        conf: u16,

        #[arg(
            long = "ram",
            help = "An optional file to place in RAM",
            id = "RAM file"
        )]
        ram: Option<PathBuf>,

        #[arg(
            long = "bank",
            help = "The 8K RAM bank the RAM file starts at",
            default_value_t = 0
        )]
        bank: usize,

        #[arg(
            long = "pc",
            help = "An optional octal program counter to store",
            value_parser = parse_octal
        )]
        pc: Option<u16>,

        #[arg(
            long = "uptime",
            help = "Uptime in seconds to store",
            default_value_t = 0
        )]
        uptime: u32,

        #[arg(
            long = "sample-rate",
            help = "Sound sample rate of the board",
            default_value_t = DEFAULT_SOUND_SAMPLE_RATE
        )]
        sample_rate: u32,

        #[arg(
            long = "out",
            help = "The emulator image file to write",
            id = "Output file"
        )]
        out: PathBuf,
    },
}

/// Parses an octal word, as addresses are written on this machine.
fn parse_octal(text: &str) -> std::result::Result<u16, String> {
    let digits = text.strip_prefix("0o").unwrap_or(text);
    u16::from_str_radix(digits, 8).map_err(|error| format!("{} is not an octal word: {}", text, error))
}

/// Prints the contents of an image file.
fn info(path: &Path) -> Result<()> {

    let image = fs::read(path)?;
    let header = SnapshotHeader::read_from(&image)?;

    println!("Image:         {}", path.display());
    println!("Magic:         {:08x} {:08x}", header.magic1, header.magic2);
    println!("Version:       {:08x}", header.version);
    println!("Size:          {}", header.size);
    println!(
        "Uptime:        {:02}:{:02}:{:02}",
        header.uptime / 3600,
        header.uptime / 60 % 60,
        header.uptime % 60
    );
    if let Err(error) = header.validate() {
        warn!("{}", error);
    }

    let mut block = [0; BOARD_BLOCK_SIZE];
    block.copy_from_slice(&image[OFFSET_BOARD..OFFSET_BOARD + BOARD_BLOCK_SIZE]);
    let registers = BoardRegisters::decode(&block);
    let timer = &registers.sound_timer;
    let ext = &registers.ext_device;

    println!("Configuration: {:?} ({})", Configuration::from_id(registers.configuration), registers.configuration);
    println!(
        "LCD:           address {:06o} config {:06o} index {:06o}",
        registers.lcd.address, registers.lcd.config, registers.lcd.index
    );
    println!("Sound:         {}", if registers.sound_on { "on" } else { "off" });
    println!(
        "Tone:          mode {:03o} tone {:03o} reload {:03o}/{:03o} timers {:06o} {:06o} {:06o}",
        timer.mode,
        timer.tone,
        timer.counter1_reload,
        timer.counter2_reload,
        timer.timer1,
        timer.timer1_div,
        timer.timer2
    );
    println!(
        "Ext devices:   control {:02x} shift {:02x} {} scan {:03o} int status {:04x}",
        ext.control,
        ext.shift,
        if ext.selected { "selected" } else { "idle" },
        ext.keyboard_scan,
        ext.int_status
    );

    let cpu_state: Vec<String> = image[OFFSET_CPU..OFFSET_CPU + CPU_IMAGE_SIZE]
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect();
    println!("CPU state:     {}", cpu_state.join(" "));

    Ok(())
}

/// Builds an image file from a ROM and optional RAM contents.
#[allow(clippy::too_many_arguments)]
fn build(
    rom: &Path,
    conf: u16,
    ram: Option<&Path>,
    bank: usize,
    pc: Option<u16>,
    uptime: u32,
    sample_rate: u32,
    out: &Path,
) -> Result<()> {

    let configuration = Configuration::from_id(conf);
    if configuration.id() != conf {
        warn!("Unknown configuration {}, using {:?}", conf, configuration);
    }

    let mut cpu = ParkedCpu::new();
    if let Some(pc) = pc {
        cpu.set_pc(pc);
    }

    let mut board = Mk90Motherboard::new(Box::new(cpu), sample_rate);
    board.set_configuration(configuration.id());
    board.load_rom(&fs::read(rom)?)?;
    if let Some(ram) = ram {
        board.load_ram(bank, &fs::read(ram)?)?;
    }

    let mut emulator = Emulator::new(Box::new(board));
    emulator.set_uptime(uptime);
    emulator.save_image(out)?;

    info!("Built {:?} image {}", configuration, out.display());
    Ok(())
}

fn main() -> ExitCode {

    colog::init();
    let mk90_args = Mk90Args::parse();

    let result = match mk90_args.command {
        Mk90Command::Info { image } => info(&image),
        Mk90Command::Build {
            rom,
            conf,
            ram,
            bank,
            pc,
            uptime,
            sample_rate,
            out,
        } => build(&rom, conf, ram.as_deref(), bank, pc, uptime, sample_rate, &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", error);
            ExitCode::FAILURE
        },
    }
}
