/*
 *  display/pixel.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Point access through the controller read-modify-write bracket
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

use crate::display::address::{check_bounds, mirror_x, split_column, SUBPIXELS};
use crate::display::command::{RMW_IN, RMW_OUT};
use crate::display::error::LcdError;
use crate::display::st7529::St7529;
use crate::display::traits::Bus;

/// Pen code for point and shape operations.
///
/// ```text
/// bit 0      0 = erase, 1 = draw
/// bits 0-3   size code (see footprint)
/// bit 2      shapes: fill
/// bit 3      triangle: base at the top
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pen(pub u8);

impl Pen {
    pub const ERASE: Pen = Pen(0);
    pub const DRAW: Pen = Pen(1);
    pub const DOUBLE_ERASE: Pen = Pen(2);
    pub const DOUBLE: Pen = Pen(3);
    pub const PLUS: Pen = Pen(5);
    pub const BOX3: Pen = Pen(7);
    pub const ROUND5: Pen = Pen(9);
    pub const BOX5: Pen = Pen(11);

    pub const FILL_BIT: u8 = 0x04;
    pub const FLIP_BIT: u8 = 0x08;

    pub const fn is_draw(self) -> bool {
        self.0 & 0x01 != 0
    }

    pub const fn is_fill(self) -> bool {
        self.0 & Self::FILL_BIT != 0
    }

    pub const fn is_flipped(self) -> bool {
        self.0 & Self::FLIP_BIT != 0
    }

    pub const fn filled(self) -> Pen {
        Pen(self.0 | Self::FILL_BIT)
    }

    pub const fn flipped(self) -> Pen {
        Pen(self.0 | Self::FLIP_BIT)
    }

    pub const fn size_code(self) -> u8 {
        self.0 & 0x0f
    }

    /// Offsets painted for a composite pen, `None` for a single point
    pub fn footprint(self) -> Option<&'static [(i16, i16)]> {
        match self.size_code() {
            2 | 3 => Some(&DOUBLE_FOOTPRINT),
            4 | 5 => Some(&FOOTPRINT[20..]),
            6 | 7 => Some(&FOOTPRINT[16..]),
            8 | 9 => Some(&FOOTPRINT[4..]),
            10 | 11 => Some(&FOOTPRINT[..]),
            _ => None,
        }
    }
}

//  Each larger code is a longer tail of this table:
//
//                      -ooo-   ooooo
//                      ooooo   ooooo
//        -o-    ooo    ooXoo   ooXoo
//        oXo    oXo    ooooo   ooooo
//        -o-    ooo    -ooo-   ooooo
//        4/5    6/7     8/9    10/11
const FOOTPRINT: [(i16, i16); 25] = [
    // 5x5 corners
    (-2, 2), (2, 2), (-2, -2), (2, -2),
    // 5x5 ring
    (-1, 2), (0, 2), (1, 2),
    (-2, 1), (2, 1),
    (-2, 0), (2, 0),
    (-2, -1), (2, -1),
    (-1, -2), (0, -2), (1, -2),
    // 3x3 corners
    (-1, 1), (1, 1), (-1, -1), (1, -1),
    // plus
    (0, 1), (-1, 0), (0, 0), (1, 0), (0, -1),
];

//  oo
//  Xo
const DOUBLE_FOOTPRINT: [(i16, i16); 4] = [(0, 1), (0, 0), (1, 1), (1, 0)];

impl<B: Bus> St7529<B> {
    /// Draw or erase a point with the given pen.
    ///
    /// The center must be on the surface; composite offsets that fall off
    /// the edge are dropped.
    pub fn point(&mut self, x: i16, y: i16, pen: Pen) -> Result<(), LcdError> {
        check_bounds(x, y)?;
        let on = pen.is_draw();

        match pen.footprint() {
            Some(offsets) => {
                for &(dx, dy) in offsets {
                    match self.write_point(x + dx, y + dy, on) {
                        Err(LcdError::OutOfRange { .. }) => {}
                        other => other?,
                    }
                }
                Ok(())
            }
            None => self.write_point(x, y, on),
        }
    }

    /// Read back a single point, `true` when it is on
    pub fn read_point(&mut self, x: i16, y: i16) -> Result<bool, LcdError> {
        check_bounds(x, y)?;
        let (word, sub) = self.rmw_enter(x, y)?;
        self.command(RMW_OUT)?;
        Ok(SUBPIXELS[sub].is_on(word))
    }

    /// Like `point` but takes wide coordinates and silently clips,
    /// which is what the rasterizers want.
    pub(crate) fn plot(&mut self, x: i32, y: i32, pen: Pen) -> Result<(), LcdError> {
        let (Ok(x), Ok(y)) = (i16::try_from(x), i16::try_from(y)) else {
            return Ok(());
        };
        match self.point(x, y, pen) {
            Err(LcdError::OutOfRange { .. }) => Ok(()),
            other => other,
        }
    }

    fn write_point(&mut self, x: i16, y: i16, on: bool) -> Result<(), LcdError> {
        check_bounds(x, y)?;
        trace!("point ({}, {}) {}", x, y, if on { "on" } else { "off" });

        let (word, sub) = self.rmw_enter(x, y)?;
        let field = SUBPIXELS[sub];
        let word = if on { field.set_on(word) } else { field.set_off(word) };

        self.data_word(word)?;
        self.command(RMW_OUT)
    }

    /// Enter read-modify-write at (x, y) and fetch the word holding it
    fn rmw_enter(&mut self, x: i16, y: i16) -> Result<(u16, usize), LcdError> {
        let cx = mirror_x(x);
        self.set_address(cx, y as u16)?;

        self.command(RMW_IN)?;
        self.read_byte()?; // dummy
        let high = self.read_byte()?;
        let low = self.read_byte()?;

        let (_, sub) = split_column(cx);
        Ok((u16::from_be_bytes([high, low]), sub))
    }
}
