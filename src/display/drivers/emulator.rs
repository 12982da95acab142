/*
 *  display/drivers/emulator.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory ST7529 controller for desktop testing
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::display::address::{
    in_bounds, mirror_x, split_column, HEIGHT, SUBPIXELS, WIDTH, WORDS_PER_LINE, WORD_OFF,
};
use crate::display::command::*;
use crate::display::traits::Bus;

/// One transfer as seen on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Command(u8),
    Data(u8),
    Read(u8),
    Reset(bool),
    Backlight(bool),
}

/// What display-data transfers currently do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Idle,
    Write,
    Read,
    ReadModifyWrite,
}

/// Which byte the next display-data read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadPhase {
    Dummy,
    High,
    Low,
}

/// Emulated ST7529 controller
///
/// Models the parts of the chip the driver leans on: the line/column window
/// with auto-increment and wrap, RAMWR/RAMRD, the read-modify-write bracket
/// with its dummy read, 2-bytes-per-word pairing, both command sets, and the
/// handful of registers worth inspecting. Transfers are journaled so tests
/// can check exact bus traffic; long renders use [`Emulator::without_journal`]
/// and keep only the count.
#[derive(Debug, Clone)]
pub struct Emulator {
    memory: Vec<u16>,

    ext: bool,
    line_window: (u8, u8),
    column_window: (u8, u8),
    line: u8,
    column: u8,

    access: Access,
    read_phase: ReadPhase,
    write_latch: Option<u8>,
    rmw_origin: (u8, u8),

    pending: Option<(u8, usize)>,
    params: Vec<u8>,

    in_reset: bool,
    sleeping: bool,
    display_on: bool,
    inverted: bool,
    backlight: bool,
    contrast: u16,
    power: u8,
    gray_odd: [u8; GRAY_LEVELS],
    gray_even: [u8; GRAY_LEVELS],

    journal: Vec<BusOp>,
    journaling: bool,
    transfers: usize,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    /// A powered-down panel with blank memory
    pub fn new() -> Self {
        Self {
            memory: vec![WORD_OFF; HEIGHT as usize * WORDS_PER_LINE],
            ext: false,
            line_window: (0, LINE_END),
            column_window: (0, COLUMN_END),
            line: 0,
            column: 0,
            access: Access::Idle,
            read_phase: ReadPhase::Dummy,
            write_latch: None,
            rmw_origin: (0, 0),
            pending: None,
            params: Vec::new(),
            in_reset: false,
            sleeping: true,
            display_on: false,
            inverted: false,
            backlight: false,
            contrast: 0,
            power: 0,
            gray_odd: [0; GRAY_LEVELS],
            gray_even: [0; GRAY_LEVELS],
            journal: Vec::new(),
            journaling: true,
            transfers: 0,
        }
    }

    /// Same panel, counting transfers without keeping them
    pub fn without_journal() -> Self {
        Self {
            journaling: false,
            ..Self::new()
        }
    }

    /// Every transfer since creation or the last `clear_journal`
    pub fn journal(&self) -> &[BusOp] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
        self.transfers = 0;
    }

    /// Number of transfers since creation or the last `clear_journal`
    pub fn transactions(&self) -> usize {
        self.transfers
    }

    fn record(&mut self, op: BusOp) {
        self.transfers += 1;
        if self.journaling {
            self.journal.push(op);
        }
    }

    /// Raw memory word at word column `column`, line `row`
    pub fn word(&self, column: usize, row: usize) -> u16 {
        self.memory[row * WORDS_PER_LINE + column]
    }

    /// Logical pixel state, same coordinates as the driver
    pub fn pixel(&self, x: i16, y: i16) -> bool {
        if !in_bounds(x, y) {
            return false;
        }
        let (word, sub) = split_column(mirror_x(x));
        SUBPIXELS[sub].is_on(self.word(word as usize, y as usize))
    }

    /// Count pixels that are on
    pub fn count_on_pixels(&self) -> usize {
        (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y))
            .count()
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Electronic volume as the controller decoded it
    pub fn contrast(&self) -> u16 {
        self.contrast
    }

    pub fn power_control(&self) -> u8 {
        self.power
    }

    /// (odd frame, even frame) gray ramps
    pub fn gray_levels(&self) -> (&[u8; GRAY_LEVELS], &[u8; GRAY_LEVELS]) {
        (&self.gray_odd, &self.gray_even)
    }

    /// Write the panel as a plain PBM (P1), top row first
    pub fn write_pbm<W: Write>(&self, mut out: W) -> io::Result<()> {
        // PBM header
        writeln!(out, "P1")?;
        writeln!(out, "{} {}", WIDTH, HEIGHT)?;

        // Pixel data
        for y in (0..HEIGHT).rev() {
            let row: Vec<&str> = (0..WIDTH)
                .map(|x| if self.pixel(x, y) { "1" } else { "0" })
                .collect();
            writeln!(out, "{}", row.join(" "))?;
        }
        out.flush()
    }

    /// Save the panel to a PBM file (for visual debugging)
    pub fn save_to_pbm<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_pbm(BufWriter::new(file))
    }

    fn power_on_reset(&mut self) {
        self.ext = false;
        self.line_window = (0, LINE_END);
        self.column_window = (0, COLUMN_END);
        self.line = 0;
        self.column = 0;
        self.access = Access::Idle;
        self.read_phase = ReadPhase::Dummy;
        self.write_latch = None;
        self.pending = None;
        self.params.clear();
        self.sleeping = true;
        self.display_on = false;
        self.inverted = false;
    }

    fn index(&self) -> usize {
        self.line as usize * WORDS_PER_LINE + self.column as usize
    }

    /// Column first, then line, both wrapping inside their windows
    fn advance(&mut self) {
        if self.column >= self.column_window.1 {
            self.column = self.column_window.0;
            self.line = if self.line >= self.line_window.1 {
                self.line_window.0
            } else {
                self.line + 1
            };
        } else {
            self.column += 1;
        }
    }

    fn expect_params(&mut self, cmd: u8, count: usize) {
        self.pending = Some((cmd, count));
        self.params.clear();
    }

    fn execute(&mut self, cmd: u8) {
        self.access = Access::Idle;

        match cmd {
            EXT_IN0 => self.ext = false,
            EXT_IN1 => self.ext = true,
            _ if self.ext => match cmd {
                GRAY_ODD_FRAME | GRAY_EVEN_FRAME => self.expect_params(cmd, GRAY_LEVELS),
                ANALOG_CIRCUIT => self.expect_params(cmd, 3),
                SOFTWARE_INIT => {}
                _ => trace!("emulator: unknown ext command {:#04x}", cmd),
            },
            SLEEP_OUT => self.sleeping = false,
            SLEEP_IN => self.sleeping = true,
            DISPLAY_ON => self.display_on = true,
            DISPLAY_OFF => self.display_on = false,
            NORMAL_DISPLAY => self.inverted = false,
            INVERSE_DISPLAY => self.inverted = true,
            OSC_ON => {}
            RAM_WRITE => self.access = Access::Write,
            RAM_READ => {
                self.access = Access::Read;
                self.read_phase = ReadPhase::Dummy;
            }
            RMW_IN => {
                self.access = Access::ReadModifyWrite;
                self.read_phase = ReadPhase::Dummy;
                self.rmw_origin = (self.line, self.column);
            }
            RMW_OUT => (self.line, self.column) = self.rmw_origin,
            LINE_ADDRESS | COLUMN_ADDRESS | ELECTRONIC_CONTROL => self.expect_params(cmd, 2),
            POWER_CONTROL | COM_SCAN_DIRECTION => self.expect_params(cmd, 1),
            DISPLAY_CONTROL | DATA_SCAN_DIRECTION => self.expect_params(cmd, 3),
            _ => trace!("emulator: unknown command {:#04x}", cmd),
        }
    }

    fn apply(&mut self, cmd: u8) {
        let p = std::mem::take(&mut self.params);
        match (self.ext, cmd) {
            (false, LINE_ADDRESS) => {
                let start = p[0].min(LINE_END);
                self.line_window = (start, p[1].clamp(start, LINE_END));
                self.line = start;
            }
            (false, COLUMN_ADDRESS) => {
                let start = p[0].min(COLUMN_END);
                self.column_window = (start, p[1].clamp(start, COLUMN_END));
                self.column = start;
            }
            (false, ELECTRONIC_CONTROL) => {
                self.contrast = (p[0] & 0x3f) as u16 | ((p[1] & 0x07) as u16) << 6;
            }
            (false, POWER_CONTROL) => self.power = p[0],
            (true, GRAY_ODD_FRAME) => self.gray_odd.copy_from_slice(&p),
            (true, GRAY_EVEN_FRAME) => self.gray_even.copy_from_slice(&p),
            _ => {}
        }
    }
}

impl Bus for Emulator {
    type Error = Infallible;

    fn write_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
        self.record(BusOp::Command(cmd));
        self.pending = None;
        self.write_latch = None;
        if !self.in_reset {
            self.execute(cmd);
        }
        Ok(())
    }

    fn write_data(&mut self, data: u8) -> Result<(), Self::Error> {
        self.record(BusOp::Data(data));
        if self.in_reset {
            return Ok(());
        }

        if let Some((cmd, count)) = self.pending {
            self.params.push(data);
            if self.params.len() == count {
                self.pending = None;
                self.apply(cmd);
            }
            return Ok(());
        }

        if matches!(self.access, Access::Write | Access::ReadModifyWrite) {
            match self.write_latch.take() {
                None => self.write_latch = Some(data),
                Some(high) => {
                    let i = self.index();
                    self.memory[i] = u16::from_be_bytes([high, data]);
                    self.advance();
                }
            }
        }
        Ok(())
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        let value = match self.access {
            Access::Read | Access::ReadModifyWrite if !self.in_reset => {
                let word = self.memory[self.index()];
                match self.read_phase {
                    ReadPhase::Dummy => {
                        self.read_phase = ReadPhase::High;
                        0x00
                    }
                    ReadPhase::High => {
                        self.read_phase = ReadPhase::Low;
                        (word >> 8) as u8
                    }
                    ReadPhase::Low => {
                        self.read_phase = ReadPhase::High;
                        // RMW reads hold the address for the write-back
                        if self.access == Access::Read {
                            self.advance();
                        }
                        word as u8
                    }
                }
            }
            // floating bus
            _ => 0xff,
        };
        self.record(BusOp::Read(value));
        Ok(value)
    }

    fn set_reset(&mut self, active: bool) -> Result<(), Self::Error> {
        self.record(BusOp::Reset(active));
        if active {
            self.power_on_reset();
        }
        self.in_reset = active;
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        self.record(BusOp::Backlight(on));
        self.backlight = on;
        Ok(())
    }
}

/// Delay that records what was asked of it instead of sleeping
#[derive(Debug, Default, Clone)]
pub struct RecordingDelay {
    delays_ms: Vec<u32>,
    total_ns: u64,
}

impl RecordingDelay {
    /// Millisecond delays in the order they were requested
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }

    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.total_ns += ms as u64 * 1_000_000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::address::WORD_ON;

    #[test]
    fn test_emulator_ram_write_wraps_window() {
        let mut emu = Emulator::new();
        emu.write_command(LINE_ADDRESS).unwrap();
        emu.write_data(5).unwrap();
        emu.write_data(6).unwrap();
        emu.write_command(COLUMN_ADDRESS).unwrap();
        emu.write_data(52).unwrap();
        emu.write_data(COLUMN_END).unwrap();
        emu.write_command(RAM_WRITE).unwrap();
        for word in [0x1111u16, 0x2222, 0x3333] {
            emu.write_data_word(word).unwrap();
        }
        assert_eq!(emu.word(52, 5), 0x1111);
        assert_eq!(emu.word(53, 5), 0x2222);
        assert_eq!(emu.word(52, 6), 0x3333);
    }

    #[test]
    fn test_emulator_ram_read_has_dummy() {
        let mut emu = Emulator::new();
        emu.memory[0] = 0xabcd;
        emu.memory[1] = 0x1234;
        emu.write_command(RAM_READ).unwrap();
        assert_eq!(emu.read_data().unwrap(), 0x00);
        assert_eq!(emu.read_data().unwrap(), 0xab);
        assert_eq!(emu.read_data().unwrap(), 0xcd);
        assert_eq!(emu.read_data().unwrap(), 0x12);
        assert_eq!(emu.read_data().unwrap(), 0x34);
    }

    #[test]
    fn test_emulator_rmw_writes_in_place() {
        let mut emu = Emulator::new();
        emu.memory[0] = 0x1234;
        emu.write_command(RMW_IN).unwrap();
        emu.read_data().unwrap();
        assert_eq!(emu.read_data().unwrap(), 0x12);
        assert_eq!(emu.read_data().unwrap(), 0x34);
        emu.write_data_word(0x5678).unwrap();
        emu.write_command(RMW_OUT).unwrap();
        assert_eq!(emu.word(0, 0), 0x5678);
        assert_eq!(emu.word(1, 0), WORD_OFF);
    }

    #[test]
    fn test_emulator_ignores_commands_in_reset() {
        let mut emu = Emulator::new();
        emu.set_reset(true).unwrap();
        emu.write_command(DISPLAY_ON).unwrap();
        assert!(!emu.is_display_on());
        emu.set_reset(false).unwrap();
        emu.write_command(DISPLAY_ON).unwrap();
        assert!(emu.is_display_on());
        assert_eq!(emu.transactions(), 4);
    }

    #[test]
    fn test_emulator_without_journal_still_counts() {
        let mut emu = Emulator::without_journal();
        emu.write_command(RAM_WRITE).unwrap();
        emu.write_data_word(WORD_ON).unwrap();
        assert!(emu.journal().is_empty());
        assert_eq!(emu.transactions(), 3);
        assert_eq!(emu.word(0, 0), WORD_ON);

        emu.clear_journal();
        assert_eq!(emu.transactions(), 0);
    }

    #[test]
    fn test_emulator_idle_read_floats() {
        let mut emu = Emulator::new();
        assert_eq!(emu.read_data().unwrap(), 0xff);
    }

    #[test]
    fn test_pbm_output() {
        let emu = Emulator::new();
        let mut out = Vec::new();
        emu.write_pbm(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("P1"));
        assert_eq!(lines.next(), Some("160 160"));
        assert_eq!(lines.count(), 160);
    }
}
