/*
 *  display/st7529.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sitronix ST7529 160x160 LCD driver
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

use std::ops::{BitOr, BitOrAssign};

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::display::address::{HEIGHT, WIDTH, WORDS_PER_LINE, WORD_OFF, WORD_ON};
use crate::display::command::*;
use crate::display::error::LcdError;
use crate::display::pixel::Pen;
use crate::display::traits::{Bus, ColorDepth, DisplayCapabilities};

/// Settle time around the reset pulse
const RESET_DELAY_MS: u32 = 50;

/// Booster settle time before the regulator may be enabled
const BOOSTER_DELAY_MS: u32 = 2;

/// Session-wide rendering flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode(u16);

impl DisplayMode {
    pub const PROPORTIONAL: DisplayMode = DisplayMode(0x01);
    pub const REVERSE_FONT: DisplayMode = DisplayMode(0x02);
    pub const FONT_2X: DisplayMode = DisplayMode(0x04);
    /// Accepted for compatibility; nothing reads it
    pub const FRAM_CHARACTER: DisplayMode = DisplayMode(0x08);
    pub const REVERSE_DISPLAY: DisplayMode = DisplayMode(0x10);
    pub const OR_CHAR: DisplayMode = DisplayMode(0x20);

    const ALL: u16 = 0x3f;

    pub const fn empty() -> Self {
        DisplayMode(0)
    }

    /// Unknown bits are dropped
    pub const fn from_bits_truncate(bits: u16) -> Self {
        DisplayMode(bits & Self::ALL)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: DisplayMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: DisplayMode) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: DisplayMode) {
        self.0 &= !other.0;
    }
}

impl BitOr for DisplayMode {
    type Output = DisplayMode;

    fn bitor(self, rhs: DisplayMode) -> DisplayMode {
        DisplayMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for DisplayMode {
    fn bitor_assign(&mut self, rhs: DisplayMode) {
        self.0 |= rhs.0;
    }
}

/// How `set_display_mode` changes the current flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// Turn the given flags on
    Set(DisplayMode),
    /// Turn the given flags off
    Clear(DisplayMode),
    /// Drop every flag
    Reset,
}

/// ST7529 driver context.
///
/// Owns the transport plus the state the firmware used to keep in globals:
/// the mode flags and the text cursor. One instance per physical panel.
pub struct St7529<B: Bus> {
    bus: B,

    /// Rendering flags
    pub(crate) mode: DisplayMode,

    /// Text cursor column (0-159)
    pub(crate) cursor_x: i16,

    /// Text cursor row, bottom of the current text line (0-159)
    pub(crate) cursor_y: i16,

    /// Display capabilities
    capabilities: DisplayCapabilities,
}

impl<B: Bus> St7529<B> {
    /// Wrap a transport. The panel is untouched until `init`.
    pub fn new(bus: B) -> Self {
        let capabilities = DisplayCapabilities {
            width: WIDTH as u32,
            height: HEIGHT as u32,
            color_depth: ColorDepth::Gray32,
            supports_contrast: true,
            supports_invert: true,
        };

        Self {
            bus,
            mode: DisplayMode::empty(),
            cursor_x: 0,
            cursor_y: HEIGHT - 1,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the transport back
    pub fn release(self) -> B {
        self.bus
    }

    pub(crate) fn command(&mut self, cmd: u8) -> Result<(), LcdError> {
        self.bus.write_command(cmd).map_err(LcdError::bus)
    }

    pub(crate) fn data(&mut self, data: u8) -> Result<(), LcdError> {
        self.bus.write_data(data).map_err(LcdError::bus)
    }

    pub(crate) fn data_word(&mut self, word: u16) -> Result<(), LcdError> {
        self.bus.write_data_word(word).map_err(LcdError::bus)
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8, LcdError> {
        self.bus.read_data().map_err(LcdError::bus)
    }

    /// Reset and configure the controller: 1/160 duty, 1/13 bias, 2B3P packing.
    ///
    /// The ordering below is what the panel needs; do not reshuffle it.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), LcdError> {
        info!("Initializing ST7529 160x160 LCD");

        self.bus.set_reset(false).map_err(LcdError::bus)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.bus.set_reset(true).map_err(LcdError::bus)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.bus.set_reset(false).map_err(LcdError::bus)?;
        delay.delay_ms(RESET_DELAY_MS);

        self.command(EXT_IN0)?;
        self.command(SLEEP_OUT)?;
        self.command(OSC_ON)?;

        // booster must be on first
        self.command(POWER_CONTROL)?;
        self.data(POWER_BOOSTER)?;
        delay.delay_ms(BOOSTER_DELAY_MS);
        self.command(POWER_CONTROL)?;
        self.data(POWER_ALL)?;

        self.write_volume(VOP_CODE)?;

        self.command(DISPLAY_CONTROL)?;
        self.data(0x00)?; // CLD=0
        self.data(0x27)?; // duty = 160/4 - 1
        self.data(0x00)?; // FR inverse-set value

        self.command(NORMAL_DISPLAY)?;

        self.command(COM_SCAN_DIRECTION)?;
        self.data(0x01)?; // 0->79 159->80

        self.command(DATA_SCAN_DIRECTION)?;
        self.data(0x01)?; // CI=0, LI=1
        self.data(0x01)?; // CLR=1 (P3/P2/P1)
        self.data(0x01)?; // 2B3P

        self.command(EXT_IN1)?;

        self.command(GRAY_ODD_FRAME)?;
        for level in (0..2 * GRAY_LEVELS as u8).step_by(2) {
            self.data(level)?;
        }
        self.command(GRAY_EVEN_FRAME)?;
        for level in (1..2 * GRAY_LEVELS as u8).step_by(2) {
            self.data(level)?;
        }

        self.command(ANALOG_CIRCUIT)?;
        self.data(0x00)?; // OSC frequency default
        self.data(0x01)?; // booster efficiency default
        self.data(0x01)?; // bias 1/13

        self.command(SOFTWARE_INIT)?;

        self.command(EXT_IN0)?;
        self.command(DISPLAY_ON)?;

        self.mode = DisplayMode::empty();
        self.home();
        info!("ST7529 ready");
        Ok(())
    }

    fn write_volume(&mut self, level: u16) -> Result<(), LcdError> {
        self.command(ELECTRONIC_CONTROL)?;
        self.data((level & 0x3f) as u8)?;
        self.data((level >> 6) as u8)
    }

    /// Electronic volume (contrast), 9 significant bits
    pub fn set_contrast(&mut self, level: u16) -> Result<(), LcdError> {
        info!("Setting contrast to {}", level);
        self.write_volume(level)
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError> {
        debug!("Backlight {}", if on { "on" } else { "off" });
        self.bus.set_backlight(on).map_err(LcdError::bus)
    }

    /// Blank the whole panel
    pub fn clear(&mut self) -> Result<(), LcdError> {
        self.fill(WORD_OFF)
    }

    /// Write `value` to every memory word, then reset modes and cursor
    pub fn fill(&mut self, value: u16) -> Result<(), LcdError> {
        info!("Filling display with {:#06x}", value);
        self.set_address(0, 0)?;
        self.command(RAM_WRITE)?;
        for _ in 0..HEIGHT as usize * WORDS_PER_LINE {
            self.data_word(value)?;
        }
        self.set_display_mode(ModeChange::Reset)?;
        self.home();
        Ok(())
    }

    /// Cursor to the upper left corner
    fn home(&mut self) {
        self.cursor_x = 0;
        self.cursor_y = HEIGHT - 1;
    }

    /// Read a raw memory word at word column `column`, line `row`
    pub fn read_word(&mut self, column: u8, row: u8) -> Result<u16, LcdError> {
        self.set_word_address(column, row)?;
        self.command(RAM_READ)?;
        self.read_byte()?; // dummy
        let high = self.read_byte()?;
        let low = self.read_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Write a raw memory word at word column `column`, line `row`
    pub fn write_word(&mut self, column: u8, row: u8, value: u16) -> Result<(), LcdError> {
        self.set_word_address(column, row)?;
        self.command(RAM_WRITE)?;
        self.data_word(value)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Change the rendering flags and return the new set.
    ///
    /// REVERSE_DISPLAY is mirrored to the controller's inverse display.
    pub fn set_display_mode(&mut self, change: ModeChange) -> Result<DisplayMode, LcdError> {
        let mut mode = self.mode;
        match change {
            ModeChange::Set(flags) => mode.insert(flags),
            ModeChange::Clear(flags) => mode.remove(flags),
            ModeChange::Reset => mode = DisplayMode::empty(),
        }

        let was_reversed = self.mode.contains(DisplayMode::REVERSE_DISPLAY);
        let reversed = mode.contains(DisplayMode::REVERSE_DISPLAY);
        if was_reversed != reversed {
            self.command(if reversed { INVERSE_DISPLAY } else { NORMAL_DISPLAY })?;
        }

        if mode != self.mode {
            debug!("Display mode {:#04x} -> {:#04x}", self.mode.bits(), mode.bits());
        }
        self.mode = mode;
        Ok(mode)
    }
}

impl<B: Bus> OriginDimensions for St7529<B> {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

// embedded-graphics has y growing downwards, the panel has row 0 at the bottom
impl<B: Bus> DrawTarget for St7529<B> {
    type Color = BinaryColor;
    type Error = LcdError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            let pen = if color.is_on() { Pen::DRAW } else { Pen::ERASE };
            self.plot(p.x, HEIGHT as i32 - 1 - p.y, pen)?;
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(if color.is_on() { WORD_ON } else { WORD_OFF })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::emulator::{BusOp, Emulator, RecordingDelay};

    fn panel() -> St7529<Emulator> {
        let mut lcd = St7529::new(Emulator::new());
        lcd.init(&mut RecordingDelay::default()).unwrap();
        lcd.bus_mut().clear_journal();
        lcd
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = St7529::new(Emulator::new());
        let mut delay = RecordingDelay::default();
        lcd.init(&mut delay).unwrap();

        let mut expected = vec![
            BusOp::Reset(false),
            BusOp::Reset(true),
            BusOp::Reset(false),
            BusOp::Command(0x30),
            BusOp::Command(0x94),
            BusOp::Command(0xd1),
            BusOp::Command(0x20),
            BusOp::Data(0x08),
            BusOp::Command(0x20),
            BusOp::Data(0x0b),
            BusOp::Command(0x81),
            BusOp::Data((335u16 & 0x3f) as u8),
            BusOp::Data((335u16 >> 6) as u8),
            BusOp::Command(0xca),
            BusOp::Data(0x00),
            BusOp::Data(0x27),
            BusOp::Data(0x00),
            BusOp::Command(0xa6),
            BusOp::Command(0xbb),
            BusOp::Data(0x01),
            BusOp::Command(0xbc),
            BusOp::Data(0x01),
            BusOp::Data(0x01),
            BusOp::Data(0x01),
            BusOp::Command(0x31),
            BusOp::Command(0x20),
        ];
        expected.extend((0..32).step_by(2).map(BusOp::Data));
        expected.push(BusOp::Command(0x21));
        expected.extend((1..32).step_by(2).map(BusOp::Data));
        expected.extend([
            BusOp::Command(0x32),
            BusOp::Data(0x00),
            BusOp::Data(0x01),
            BusOp::Data(0x01),
            BusOp::Command(0x34),
            BusOp::Command(0x30),
            BusOp::Command(0xaf),
        ]);

        assert_eq!(lcd.bus().journal(), expected.as_slice());
        assert_eq!(delay.delays_ms(), &[50, 50, 50, 2]);

        let emu = lcd.bus();
        assert!(emu.is_display_on());
        assert!(!emu.is_sleeping());
        assert_eq!(emu.contrast(), 335);
        assert_eq!(emu.gray_levels().0[15], 30);
        assert_eq!(emu.gray_levels().1[15], 31);
        assert_eq!(lcd.cursor(), (0, 159));
    }

    #[test]
    fn test_write_read_word_round_trip() {
        let mut lcd = panel();
        for value in 0..=u16::MAX {
            lcd.write_word(17, 42, value).unwrap();
            assert_eq!(lcd.read_word(17, 42).unwrap(), value);
        }
    }

    #[test]
    fn test_word_access_out_of_range() {
        let mut lcd = panel();
        assert_eq!(
            lcd.write_word(54, 0, 0x1234),
            Err(LcdError::OutOfRange { x: 54, y: 0 })
        );
        assert_eq!(
            lcd.write_word(0, 160, 0x4321),
            Err(LcdError::OutOfRange { x: 0, y: 160 })
        );
        assert_eq!(lcd.read_word(60, 0), Err(LcdError::OutOfRange { x: 60, y: 0 }));
        assert_eq!(lcd.bus().transactions(), 0);
        assert!(lcd.bus().journal().is_empty());

        lcd.write_word(53, 159, 0x1234).unwrap();
        assert_eq!(lcd.read_word(53, 159), Ok(0x1234));
    }

    #[test]
    fn test_fill_and_clear() {
        let mut lcd = panel();
        lcd.fill(WORD_ON).unwrap();
        assert_eq!(lcd.bus().count_on_pixels(), 160 * 160);
        lcd.clear().unwrap();
        assert_eq!(lcd.bus().count_on_pixels(), 0);
        assert_eq!(lcd.read_word(0, 0).unwrap(), WORD_OFF);
        assert_eq!(lcd.read_word(53, 159).unwrap(), WORD_OFF);
    }

    #[test]
    fn test_fill_resets_mode_and_cursor() {
        let mut lcd = panel();
        lcd.set_display_mode(ModeChange::Set(DisplayMode::FONT_2X)).unwrap();
        lcd.set_cursor(40, 40);
        lcd.clear().unwrap();
        assert!(lcd.display_mode().is_empty());
        assert_eq!(lcd.cursor(), (0, 159));
    }

    #[test]
    fn test_contrast_and_backlight() {
        let mut lcd = panel();
        lcd.set_contrast(300).unwrap();
        assert_eq!(lcd.bus().contrast(), 300);
        lcd.set_backlight(true).unwrap();
        assert!(lcd.bus().backlight());
        lcd.set_backlight(false).unwrap();
        assert!(!lcd.bus().backlight());
    }

    #[test]
    fn test_mode_set_clear_reset() {
        let mut lcd = panel();
        let mode = lcd
            .set_display_mode(ModeChange::Set(DisplayMode::PROPORTIONAL | DisplayMode::OR_CHAR))
            .unwrap();
        assert!(mode.contains(DisplayMode::PROPORTIONAL));
        assert!(mode.contains(DisplayMode::OR_CHAR));

        let mode = lcd.set_display_mode(ModeChange::Clear(DisplayMode::OR_CHAR)).unwrap();
        assert_eq!(mode, DisplayMode::PROPORTIONAL);

        let mode = lcd.set_display_mode(ModeChange::Reset).unwrap();
        assert!(mode.is_empty());
        // no inverse toggling happened
        assert!(lcd.bus().journal().is_empty());
    }

    #[test]
    fn test_reverse_display_drives_controller() {
        let mut lcd = panel();
        lcd.set_display_mode(ModeChange::Set(DisplayMode::REVERSE_DISPLAY)).unwrap();
        assert!(lcd.bus().is_inverted());
        lcd.set_display_mode(ModeChange::Set(DisplayMode::REVERSE_FONT)).unwrap();
        assert_eq!(lcd.bus().journal(), &[BusOp::Command(0xa7)]);
        lcd.set_display_mode(ModeChange::Reset).unwrap();
        assert!(!lcd.bus().is_inverted());
    }

    #[test]
    fn test_mode_from_bits_truncates() {
        assert_eq!(DisplayMode::from_bits_truncate(0xffff).bits(), 0x3f);
    }

    #[test]
    fn test_draw_target_flips_y() {
        use embedded_graphics::primitives::{Line, PrimitiveStyle};

        let mut lcd = panel();
        Line::new(Point::new(0, 0), Point::new(9, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut lcd)
            .unwrap();

        for x in 0..10 {
            assert!(lcd.bus().pixel(x, 159));
        }
        assert_eq!(lcd.bus().count_on_pixels(), 10);
    }
}
