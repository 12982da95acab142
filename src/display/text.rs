/*
 *  display/text.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Cursor based text output with the 5x8 column font
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

use std::fmt::{self, Write};

use arrayvec::ArrayString;
use log::{trace, warn};

use crate::display::address::{HEIGHT, WIDTH};
use crate::display::error::LcdError;
use crate::display::font::{glyph, GLYPH_WIDTH};
use crate::display::pixel::Pen;
use crate::display::st7529::{DisplayMode, St7529};
use crate::display::traits::Bus;

/// Longest formatted string `print` will output
pub const PRINT_BUFFER_SIZE: usize = 32;

/// Rows in a text line at normal size
pub const CHAR_SIZE: i16 = 8;

const BEL: u8 = 0x07;
const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Spread each bit of `byte` over two adjacent bits
pub const fn double_bits(byte: u8) -> u16 {
    let mut doubled = 0u16;
    let mut bit = 0;
    while bit < 8 {
        if byte & (1 << bit) != 0 {
            doubled |= 0b11 << (2 * bit);
        }
        bit += 1;
    }
    doubled
}

/// Format into the print buffer and write it to the panel.
///
/// ```ignore
/// lcd_print!(lcd, "T={:>3}", temp)?;
/// ```
#[macro_export]
macro_rules! lcd_print {
    ($lcd:expr, $($arg:tt)*) => {
        $lcd.print(format_args!($($arg)*))
    };
}

impl<B: Bus> St7529<B> {
    /// Move the text cursor; each coordinate is clamped to the panel
    pub fn set_cursor(&mut self, x: i16, y: i16) {
        self.cursor_x = x.clamp(0, WIDTH - 1);
        self.cursor_y = y.clamp(0, HEIGHT - 1);
    }

    /// Cursor column and the bottom row of the current text line
    pub fn cursor(&self) -> (i16, i16) {
        (self.cursor_x, self.cursor_y)
    }

    /// Write one character at the cursor and advance it.
    ///
    /// BEL turns on reverse font, LF moves down a text line and returns,
    /// CR returns. Bytes outside space..tilde are otherwise ignored.
    pub fn put_char(&mut self, c: u8) -> Result<(), LcdError> {
        match c {
            BEL => {
                self.mode.insert(DisplayMode::REVERSE_FONT);
                Ok(())
            }
            LF => {
                let lines = if self.mode.contains(DisplayMode::FONT_2X) { 2 } else { 1 };
                self.cursor_y = (self.cursor_y - CHAR_SIZE * lines).rem_euclid(HEIGHT);
                self.cursor_x = 0;
                Ok(())
            }
            CR => {
                self.cursor_x = 0;
                Ok(())
            }
            _ => match glyph(c) {
                Some(columns) => {
                    trace!("char {:?} at ({}, {})", c as char, self.cursor_x, self.cursor_y);
                    let used = self.glyph_columns(columns);
                    if self.mode.contains(DisplayMode::FONT_2X) {
                        self.put_glyph_2x(&columns[..used])
                    } else {
                        self.put_glyph(&columns[..used])
                    }
                }
                None => Ok(()),
            },
        }
    }

    /// Write every byte of `s`, returning how many were consumed
    pub fn put_str(&mut self, s: &str) -> Result<usize, LcdError> {
        for c in s.bytes() {
            self.put_char(c)?;
        }
        Ok(s.len())
    }

    /// Format `args` and write the result. Output longer than
    /// `PRINT_BUFFER_SIZE` is rejected before anything is drawn.
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<usize, LcdError> {
        let mut buffer = ArrayString::<PRINT_BUFFER_SIZE>::new();
        if buffer.write_fmt(args).is_err() {
            warn!("print output exceeds {} bytes", PRINT_BUFFER_SIZE);
            return Err(LcdError::FormatOverflow { capacity: PRINT_BUFFER_SIZE });
        }
        self.put_str(&buffer)
    }

    /// Columns to draw: all of them, or in proportional mode up to the
    /// last column followed only by blank ones (at least one).
    fn glyph_columns(&self, columns: &[u8; GLYPH_WIDTH]) -> usize {
        if !self.mode.contains(DisplayMode::PROPORTIONAL) {
            return GLYPH_WIDTH;
        }
        columns.iter().rposition(|&col| col != 0).map_or(1, |last| last + 1)
    }

    fn put_glyph(&mut self, columns: &[u8]) -> Result<(), LcdError> {
        let y = self.cursor_y;

        self.emit_column(0x00, y)?;
        self.advance();
        for &col in columns {
            self.emit_column(col, y)?;
            self.advance();
        }
        self.emit_column(0x00, y)?;
        self.advance();
        Ok(())
    }

    fn put_glyph_2x(&mut self, columns: &[u8]) -> Result<(), LcdError> {
        let y = self.cursor_y;
        let upper = (y + CHAR_SIZE) % HEIGHT;

        self.emit_pair(0x0000, y, upper)?;
        for &col in columns {
            let doubled = double_bits(col);
            self.emit_pair(doubled, y, upper)?;
            self.emit_pair(doubled, y, upper)?;
        }
        self.emit_pair(0x0000, y, upper)
    }

    /// One doubled column: high byte on the upper band, low on the lower
    fn emit_pair(&mut self, doubled: u16, lower: i16, upper: i16) -> Result<(), LcdError> {
        self.emit_column((doubled >> 8) as u8, upper)?;
        self.emit_column(doubled as u8, lower)?;
        self.advance();
        Ok(())
    }

    /// Write one font column at the cursor column, bit 7 on row y+7
    fn emit_column(&mut self, datum: u8, y: i16) -> Result<(), LcdError> {
        let datum = if self.mode.contains(DisplayMode::REVERSE_FONT) { !datum } else { datum };
        let or_char = self.mode.contains(DisplayMode::OR_CHAR);
        let x = self.cursor_x as i32;

        for bit in 0..CHAR_SIZE {
            let row = (y + CHAR_SIZE - 1 - bit) as i32;
            if datum & (0x80 >> bit) != 0 {
                self.plot(x, row, Pen::DRAW)?;
            } else if !or_char {
                self.plot(x, row, Pen::ERASE)?;
            }
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.cursor_x += 1;
        if self.cursor_x >= WIDTH {
            self.cursor_x = 0;
        }
    }
}
