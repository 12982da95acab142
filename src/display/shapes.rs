/*
 *  display/shapes.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Point-by-point shape rasterizer
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

use log::debug;

use crate::display::error::LcdError;
use crate::display::pixel::Pen;
use crate::display::st7529::St7529;
use crate::display::traits::Bus;

impl<B: Bus> St7529<B> {
    /// Circle of radius `r` centered on (x0, y0).
    ///
    /// With the fill bit set each step paints the spans between the arc
    /// points plus the interior block. The pen goes to `point` unchanged,
    /// so a filled circle is also drawn with the composite its code names.
    pub fn circle(&mut self, x0: i16, y0: i16, r: u16, pen: Pen) -> Result<(), LcdError> {
        debug!("circle ({}, {}) r={} pen={:#04x}", x0, y0, r, pen.0);
        let (x0, y0) = (x0 as i32, y0 as i32);

        // offsets from the center
        let mut dx = 0i32;
        let mut dy = r as i32;
        let mut d = 3 - 2 * r as i32;

        loop {
            if pen.is_fill() {
                for i in x0 - dx..=x0 + dx {
                    self.plot(i, y0 + dy, pen)?;
                    self.plot(i, y0 - dy, pen)?;
                }
                for j in y0 - dx..=y0 + dx {
                    for i in x0 - dy..=x0 + dy {
                        self.plot(i, j, pen)?;
                    }
                }
            } else {
                for (px, py) in [
                    (dx, dy), (dx, -dy), (-dx, dy), (-dx, -dy),
                    (dy, dx), (dy, -dx), (-dy, dx), (-dy, -dx),
                ] {
                    self.plot(x0 + px, y0 + py, pen)?;
                }
            }

            if d < 0 {
                d += 4 * dx + 6;
            } else {
                d += 4 * (dx - dy) + 10;
                dy -= 1;
            }
            dx += 1;

            if dx > dy {
                break;
            }
        }
        Ok(())
    }

    /// Rectangle with lower-left corner (x, y), `w` columns and `h + 1` rows.
    ///
    /// Only the low two pen bits select the point composite here; bit 2
    /// fills the interior.
    pub fn rectangle(&mut self, x: i16, y: i16, w: u16, h: u16, pen: Pen) -> Result<(), LcdError> {
        debug!("rectangle ({}, {}) {}x{} pen={:#04x}", x, y, w, h, pen.0);
        let fill = pen.is_fill();
        let pen = Pen(pen.0 & 0x03);

        if w == 0 {
            return Ok(());
        }
        let right = x as i32 + w as i32 - 1;
        let (x, y) = (x as i32, y as i32);
        let top = y + h as i32;

        for row in y..=top {
            self.plot(x, row, pen)?;
            if row == y || row == top || fill {
                for col in x + 1..right {
                    self.plot(col, row, pen)?;
                }
            }
            self.plot(right, row, pen)?;
        }
        Ok(())
    }

    /// Square of half-size `r` centered on (x0, y0)
    pub fn square(&mut self, x0: i16, y0: i16, r: u16, pen: Pen) -> Result<(), LcdError> {
        let (x, y) = (x0 as i32 - r as i32, y0 as i32 - r as i32);
        let side = 2 * r as u32;
        let (Ok(x), Ok(y), Ok(side)) = (i16::try_from(x), i16::try_from(y), u16::try_from(side)) else {
            return Ok(());
        };
        self.rectangle(x, y, side, side, pen)
    }

    /// Solid triangle of radius `r` centered on (x0, y0).
    ///
    /// Base at the bottom narrowing upwards, or with the flip bit set, base
    /// at the top narrowing downwards.
    pub fn triangle(&mut self, x0: i16, y0: i16, r: u16, pen: Pen) -> Result<(), LcdError> {
        debug!("triangle ({}, {}) r={} pen={:#04x}", x0, y0, r, pen.0);
        let (x0, y0, r) = (x0 as i32, y0 as i32, r as i32);
        let (mut y, step) = if pen.is_flipped() { (y0 + r, -1) } else { (y0 - r, 1) };
        // orientation only, never a footprint
        let pen = Pen(pen.0 & !Pen::FLIP_BIT);

        for width in (0..=2 * r).rev() {
            for x in x0 - width / 2..=x0 + width / 2 {
                self.plot(x, y, pen)?;
            }
            y += step;
        }
        Ok(())
    }

    /// Five-point star silhouette of radius `r` centered on (x0, y0).
    ///
    /// Widths are kept in quarter columns: the top spike widens 6/4 per row,
    /// the body then narrows 1/4 per row down to y0 - r.
    pub fn star(&mut self, x0: i16, y0: i16, r: u16, pen: Pen) -> Result<(), LcdError> {
        debug!("star ({}, {}) r={} pen={:#04x}", x0, y0, r, pen.0);
        let (x0, y0, r0) = (x0 as i32, y0 as i32, r as i32);
        let mut y = y0 + r0;
        let mut quarter = 0i32;

        loop {
            self.star_row(x0, y, quarter, pen)?;
            y -= 1;
            quarter += 6;
            if quarter > 4 * r0 {
                break;
            }
        }

        loop {
            self.star_row(x0, y, quarter, pen)?;
            y -= 1;
            quarter -= 1;
            if y < y0 - r0 {
                break;
            }
        }
        Ok(())
    }

    fn star_row(&mut self, x0: i32, y: i32, quarter: i32, pen: Pen) -> Result<(), LcdError> {
        for x in x0 - quarter / 4..=x0 + quarter / 4 {
            self.plot(x, y, pen)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::emulator::{Emulator, RecordingDelay};

    fn panel() -> St7529<Emulator> {
        let mut lcd = St7529::new(Emulator::new());
        lcd.init(&mut RecordingDelay::default()).unwrap();
        lcd.clear().unwrap();
        lcd.bus_mut().clear_journal();
        lcd
    }

    #[test]
    fn test_rectangle_zero_width_is_noop() {
        let mut lcd = panel();
        lcd.rectangle(10, 10, 0, 20, Pen::DRAW.filled()).unwrap();
        assert_eq!(lcd.bus().transactions(), 0);
    }

    #[test]
    fn test_rectangle_outline() {
        let mut lcd = panel();
        lcd.rectangle(10, 20, 5, 3, Pen::DRAW).unwrap();
        let emu = lcd.bus();
        // columns 10..=14, rows 20..=23
        for x in 10..=14 {
            assert!(emu.pixel(x, 20));
            assert!(emu.pixel(x, 23));
        }
        for y in 21..=22 {
            assert!(emu.pixel(10, y));
            assert!(emu.pixel(14, y));
            for x in 11..=13 {
                assert!(!emu.pixel(x, y));
            }
        }
        assert!(!emu.pixel(15, 20));
        assert_eq!(emu.count_on_pixels(), 2 * 5 + 2 * 2);
    }

    #[test]
    fn test_rectangle_fill_sets_interior() {
        let mut lcd = panel();
        lcd.rectangle(10, 20, 5, 3, Pen::DRAW.filled()).unwrap();
        let emu = lcd.bus();
        for y in 20..=23 {
            for x in 10..=14 {
                assert!(emu.pixel(x, y), "({}, {})", x, y);
            }
        }
        assert_eq!(emu.count_on_pixels(), 20);
    }

    #[test]
    fn test_rectangle_ignores_size_bits_above_double() {
        let mut lcd = panel();
        // 0x0d: fill bit plus size code 13, reduced to a plain point pen
        lcd.rectangle(50, 50, 3, 0, Pen(0x0d)).unwrap();
        assert_eq!(lcd.bus().count_on_pixels(), 3);
    }

    #[test]
    fn test_square_centered() {
        let mut lcd = panel();
        lcd.square(80, 80, 2, Pen::DRAW.filled()).unwrap();
        let emu = lcd.bus();
        assert!(emu.pixel(78, 78));
        assert!(emu.pixel(81, 82));
        assert!(!emu.pixel(82, 80));
        assert_eq!(emu.count_on_pixels(), 4 * 5);
    }

    #[test]
    fn test_circle_outline_symmetry() {
        let mut lcd = panel();
        lcd.circle(80, 80, 10, Pen::DRAW).unwrap();
        let emu = lcd.bus();
        for (x, y) in [(80, 90), (80, 70), (90, 80), (70, 80)] {
            assert!(emu.pixel(x, y), "({}, {})", x, y);
        }
        assert!(!emu.pixel(80, 80));
        for y in 60..100 {
            for x in 60..100 {
                assert_eq!(emu.pixel(x, y), emu.pixel(160 - x, y));
                assert_eq!(emu.pixel(x, y), emu.pixel(x, 160 - y));
            }
        }
    }

    #[test]
    fn test_filled_circle_covers_center() {
        let mut lcd = panel();
        lcd.circle(80, 80, 6, Pen::DRAW.filled()).unwrap();
        let emu = lcd.bus();
        for (x, y) in [(80, 80), (84, 80), (80, 76), (83, 83)] {
            assert!(emu.pixel(x, y), "({}, {})", x, y);
        }
        assert!(!emu.pixel(90, 90));
    }

    #[test]
    fn test_circle_clips_at_edge() {
        let mut lcd = panel();
        lcd.circle(0, 0, 5, Pen::DRAW).unwrap();
        let emu = lcd.bus();
        assert!(emu.pixel(5, 0));
        assert!(emu.pixel(0, 5));
    }

    #[test]
    fn test_triangle_rows() {
        let mut lcd = panel();
        lcd.triangle(80, 80, 3, Pen::DRAW).unwrap();
        let emu = lcd.bus();
        // base row 77 spans x0-3..=x0+3, apex row 83 one pixel
        assert!(emu.pixel(77, 77) && emu.pixel(83, 77));
        assert!(!emu.pixel(76, 77));
        assert!(emu.pixel(80, 83));
        assert!(!emu.pixel(79, 83));
        assert_eq!(emu.count_on_pixels(), 7 + 5 + 5 + 3 + 3 + 1 + 1);
    }

    #[test]
    fn test_triangle_flipped() {
        let mut lcd = panel();
        lcd.triangle(80, 80, 3, Pen::DRAW.flipped()).unwrap();
        let emu = lcd.bus();
        assert!(emu.pixel(77, 83) && emu.pixel(83, 83));
        assert!(emu.pixel(80, 77));
        assert!(!emu.pixel(79, 77));
        assert!(!emu.pixel(76, 83) && !emu.pixel(80, 84));
        assert_eq!(emu.count_on_pixels(), 7 + 5 + 5 + 3 + 3 + 1 + 1);
    }

    #[test]
    fn test_star_spans_radius() {
        let mut lcd = panel();
        lcd.star(80, 80, 8, Pen::DRAW).unwrap();
        let emu = lcd.bus();
        assert!(emu.pixel(80, 88));
        assert!(!emu.pixel(79, 88));
        assert!(emu.pixel(80, 72));
        assert!(!(0..160).any(|x| emu.pixel(x, 71) || emu.pixel(x, 89)));
    }

    #[test]
    fn test_erase_pen_clears_shape() {
        let mut lcd = panel();
        lcd.fill(0x0000).unwrap();
        lcd.square(40, 40, 3, Pen::ERASE.filled()).unwrap();
        // 6 columns by 7 rows
        assert_eq!(lcd.bus().count_on_pixels(), 160 * 160 - 42);
    }
}
