/*
 *  display/address.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Coordinate mapping and the 3-pixels-per-word packing
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

use log::trace;

use crate::display::command::{COLUMN_ADDRESS, COLUMN_END, LINE_ADDRESS, LINE_END};
use crate::display::error::LcdError;
use crate::display::st7529::St7529;
use crate::display::traits::Bus;

/// Logical surface size
pub const WIDTH: i16 = 160;
pub const HEIGHT: i16 = 160;

/// Packed words per controller line (columns 0..=0x35)
pub const WORDS_PER_LINE: usize = COLUMN_END as usize + 1;

/// Word with every sub-pixel off
pub const WORD_OFF: u16 = 0xffdf;

/// Word with every sub-pixel on
pub const WORD_ON: u16 = 0x0000;

/// One of the three intensity fields of a packed memory word.
///
/// A field with all bits set is dark-off, all bits clear is fully on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubPixel {
    pub mask: u16,
    pub shift: u8,
}

impl SubPixel {
    /// Raw field value, right aligned
    pub const fn field(self, word: u16) -> u16 {
        (word & self.mask) >> self.shift
    }

    pub const fn set_on(self, word: u16) -> u16 {
        word & !self.mask
    }

    pub const fn set_off(self, word: u16) -> u16 {
        word | self.mask
    }

    pub const fn is_on(self, word: u16) -> bool {
        word & self.mask == 0
    }
}

/// Field layout indexed by sub-pixel (controller column mod 3).
/// Bit 5 belongs to no field.
pub const SUBPIXELS: [SubPixel; 3] = [
    SubPixel { mask: 0x001f, shift: 0 },
    SubPixel { mask: 0x07c0, shift: 6 },
    SubPixel { mask: 0xf800, shift: 11 },
];

/// Integer division by three.
pub const fn divu3(n: u16) -> u16 {
    n / 3
}

/// Split a controller column into (word column, sub-pixel index)
pub const fn split_column(cx: u16) -> (u16, usize) {
    let word = divu3(cx);
    (word, (cx - word * 3) as usize)
}

/// Controller column 0 is the right edge of the glass
pub const fn mirror_x(x: i16) -> u16 {
    (WIDTH - 1 - x) as u16
}

pub const fn in_bounds(x: i16, y: i16) -> bool {
    x >= 0 && x < WIDTH && y >= 0 && y < HEIGHT
}

pub fn check_bounds(x: i16, y: i16) -> Result<(), LcdError> {
    if in_bounds(x, y) {
        Ok(())
    } else {
        Err(LcdError::OutOfRange { x, y })
    }
}

/// Validate a region with `(x, y)` as its lower-left corner
pub fn check_region(x: i16, y: i16, width: u16, height: u16) -> Result<(), LcdError> {
    check_bounds(x, y)?;
    let right = x as i32 + width as i32 - 1;
    let top = y as i32 + height as i32 - 1;
    if right >= WIDTH as i32 || top >= HEIGHT as i32 {
        return Err(LcdError::OutOfRange {
            x: right.min(i16::MAX as i32) as i16,
            y: top.min(i16::MAX as i32) as i16,
        });
    }
    Ok(())
}

impl<B: Bus> St7529<B> {
    /// Point the controller at line `y`, word column `cx / 3`.
    ///
    /// `cx` is a controller column (already mirrored). No range checking.
    pub(crate) fn set_address(&mut self, cx: u16, y: u16) -> Result<(), LcdError> {
        trace!("address line {} column {}", y, cx);
        self.command(LINE_ADDRESS)?;
        self.data(y as u8)?;
        self.data(LINE_END)?;

        self.command(COLUMN_ADDRESS)?;
        self.data(divu3(cx) as u8)?;
        self.data(COLUMN_END)
    }

    /// Address a word column directly, rejecting anything past the window ends
    pub(crate) fn set_word_address(&mut self, column: u8, row: u8) -> Result<(), LcdError> {
        if column > COLUMN_END || row > LINE_END {
            return Err(LcdError::OutOfRange {
                x: column as i16,
                y: row as i16,
            });
        }
        self.command(LINE_ADDRESS)?;
        self.data(row)?;
        self.data(LINE_END)?;

        self.command(COLUMN_ADDRESS)?;
        self.data(column)?;
        self.data(COLUMN_END)
    }
}
