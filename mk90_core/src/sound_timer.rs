// SPDX-License-Identifier: GPL-3.0
// sound_timer.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use log::debug;

/// Mode bits that start counter 1 from its clock input when both are set.
const MODE_COUNTER1_CLOCK: u16 = 0o14;

/// Mode bits that hand counter 2 to its external gate when both are set.
const MODE_COUNTER2_GATE: u16 = 0o60;

/// Level produced at full volume, before the volume shift.
const SOUND_LEVEL: u16 = 0x1FFF;

/// A copy of the tone generator state, as stored in an emulator image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SoundTimerRegisters {
    pub mode: u16,
    pub tone: u16,
    pub counter1_reload: u16,
    pub counter2_reload: u16,
    pub timer1: u16,
    pub timer1_div: u16,
    pub timer2: u16,
}

/// This struct models the tone generator: a two stage prescaler/counter pair
/// clocked at 8 MHz that shapes a square wave, and a second counter clocked by
/// the 50 Hz line that times the note.
pub struct SoundTimer {

    // Programmable registers.
    mode: u16,
    tone: u16,
    counter1_reload: u16,
    counter2_reload: u16,

    // Running counters.
    timer1: u16,
    timer1_div: u16,
    timer2: u16,
}

impl SoundTimer {

    /// Creates a new, stopped tone generator.
    pub fn new() -> Self {
        SoundTimer {
            mode: 0,
            tone: 0,
            counter1_reload: 0,
            counter2_reload: 0,
            timer1: 0,
            timer1_div: 0,
            timer2: 0,
        }
    }

    /// Octave field of the tone register, 1..7 (0 means silent).
    fn octave(&self) -> u16 {
        self.tone & 7
    }

    /// Volume field of the tone register, 0..3.
    fn volume(&self) -> u16 {
        (self.tone >> 3) & 3
    }

    /// Reads port RG1: mode in the high byte, tone in the low byte.
    pub fn read_rg1(&self) -> u16 {
        (self.mode << 8) | self.tone
    }

    /// Writes port RG1.
    pub fn write_rg1(&mut self, word: u16) {
        self.mode = word >> 8;
        self.tone = word & 0xFF;
    }

    /// Reads port RG2: counter 2 reload in the high byte, counter 1 reload in the low byte.
    pub fn read_rg2(&self) -> u16 {
        (self.counter2_reload << 8) | self.counter1_reload
    }

    /// Writes port RG2.
    pub fn write_rg2(&mut self, word: u16) {
        self.counter2_reload = word >> 8;
        self.counter1_reload = word & 0xFF;
    }

    /// Advances the 8 MHz side by one tick.
    pub fn timer_tick(&mut self) {

        if self.timer1 == 0 || self.timer1_div == 0 {
            if self.mode & MODE_COUNTER1_CLOCK == MODE_COUNTER1_CLOCK {
                self.timer1_div = 1 << self.octave();
                if self.timer1 == 0 {
                    self.timer1 = self.counter1_reload;
                }
            }
            return;
        }

        self.timer1_div -= 1;
        if self.timer1_div == 0 {
            self.timer1_div = 1 << self.octave();

            self.timer1 -= 1;
            if self.timer1 == 0 {
                self.timer1 = self.counter1_reload;
            }
        }
    }

    /// Advances the 50 Hz side by one tick.
    pub fn tick50(&mut self, trace: bool) {

        if self.timer2 == 0 {
            if self.counter2_reload != 0 && self.mode & MODE_COUNTER2_GATE != MODE_COUNTER2_GATE {
                self.timer2 = self.counter2_reload;
                if trace {
                    debug!("Tick50 Timer2 START {:06o}", self.timer2);
                }
            }
            return;
        }

        self.timer2 -= 1;
        if self.timer2 == 0 {
            self.counter2_reload = 0;
            if trace {
                debug!("Tick50 Timer2 END");
            }
        }
    }

    /// Returns the level for both channels at this instant.
    pub fn sample(&self, sound_on: bool) -> (u16, u16) {

        let volume = self.volume();
        if !sound_on || volume == 0 || self.octave() == 0 {
            return (0, 0);
        }

        // Second half of the period is the low phase of the square wave.
        if self.timer1 > self.counter1_reload / 2 {
            return (0, 0);
        }

        let sound = SOUND_LEVEL >> (3 - volume);
        (sound, sound)
    }

    /// Returns the raw register values.
    pub fn registers(&self) -> SoundTimerRegisters {
        SoundTimerRegisters {
            mode: self.mode,
            tone: self.tone,
            counter1_reload: self.counter1_reload,
            counter2_reload: self.counter2_reload,
            timer1: self.timer1,
            timer1_div: self.timer1_div,
            timer2: self.timer2,
        }
    }

    /// Restores the raw register values, as captured by `registers`.
    pub fn set_registers(&mut self, registers: &SoundTimerRegisters) {
        self.mode = registers.mode;
        self.tone = registers.tone;
        self.counter1_reload = registers.counter1_reload;
        self.counter2_reload = registers.counter2_reload;
        self.timer1 = registers.timer1;
        self.timer1_div = registers.timer1_div;
        self.timer2 = registers.timer2;
    }
}
