/*
 *  display/blit.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Block image transfer: bit-plane, run-length word-plane and column images
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

//! Block writes stream whole memory words, three columns at a time, right
//! to left from the region's rightmost column. Packing starts at the word
//! holding that column, so an image lands exactly where asked only when
//! `159 - (x + w - 1)` is a multiple of three; otherwise it is pulled right
//! to the word boundary.

use log::{debug, warn};

use crate::display::address::{check_region, mirror_x, SUBPIXELS, WORD_OFF, WORD_ON};
use crate::display::command::RAM_WRITE;
use crate::display::error::LcdError;
use crate::display::pixel::Pen;
use crate::display::st7529::St7529;
use crate::display::traits::Bus;

/// What a block write puts in the region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitMode {
    /// Every pixel off
    Blank,
    /// The image contents
    Draw,
    /// Every pixel on
    Fill,
}

/// Words needed for `width` columns
const fn words_per_row(width: u16) -> usize {
    (width as usize + 2) / 3
}

/// One bit per pixel, rows top first, `ceil(w/8)` bytes per row, MSB leftmost
#[derive(Debug, Clone, Copy)]
pub struct BitImage<'a> {
    width: u16,
    height: u16,
    data: &'a [u8],
}

impl<'a> BitImage<'a> {
    /// Parse a `[w][h][rows...]` buffer
    pub fn parse(buf: &'a [u8]) -> Result<Self, LcdError> {
        let [w, h, data @ ..] = buf else {
            return Err(LcdError::ImageTruncated { expected: 2, actual: buf.len() });
        };
        Self::new(*w as u16, *h as u16, data)
    }

    /// Wrap headerless row data
    pub fn new(width: u16, height: u16, data: &'a [u8]) -> Result<Self, LcdError> {
        let expected = (width as usize).div_ceil(8) * height as usize;
        if data.len() < expected {
            return Err(LcdError::ImageTruncated { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn stride(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Row `index` counting from the top
    pub fn row(&self, index: usize) -> &'a [u8] {
        let stride = self.stride();
        &self.data[index * stride..(index + 1) * stride]
    }

    /// Memory words for row `index`, right to left
    pub fn packed_row(&self, index: usize) -> BitRowPacker<'a> {
        BitRowPacker { row: self.row(index), remaining: self.width }
    }
}

/// Packs one bit-image row into memory words, rightmost column first.
///
/// Sub-pixel 0 takes the rightmost column of each group of three; a short
/// final group leaves its missing columns off.
#[derive(Debug, Clone)]
pub struct BitRowPacker<'a> {
    row: &'a [u8],
    remaining: u16,
}

impl Iterator for BitRowPacker<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.remaining == 0 {
            return None;
        }

        let mut word = WORD_OFF;
        for field in SUBPIXELS {
            if self.remaining == 0 {
                break;
            }
            self.remaining -= 1;
            let col = self.remaining as usize;
            if self.row[col / 8] & (0x80 >> (col % 8)) != 0 {
                word = field.set_on(word);
            }
        }
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = words_per_row(self.remaining);
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitRowPacker<'_> {}

/// Raw memory words with run-length compression, rows top first,
/// words right to left
#[derive(Debug, Clone, Copy)]
pub struct WordImage<'a> {
    width: u16,
    height: u16,
    body: &'a [u16],
}

impl<'a> WordImage<'a> {
    /// Parse a `[w][h][words...]` buffer. The body is checked when drawn.
    pub fn parse(buf: &'a [u16]) -> Result<Self, LcdError> {
        let [w, h, body @ ..] = buf else {
            return Err(LcdError::ImageTruncated { expected: 2, actual: buf.len() });
        };
        Ok(Self { width: *w, height: *h, body })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn decoder(&self) -> RunDecoder<'a> {
        RunDecoder::new(self.body)
    }

    /// Words the panel receives for this image
    pub fn output_words(&self) -> usize {
        words_per_row(self.width) * self.height as usize
    }

    /// Make sure the body decodes to a full image
    fn validate(&self) -> Result<(), LcdError> {
        let mut decoder = self.decoder();
        for _ in 0..self.output_words() {
            decoder.next_word()?;
        }
        Ok(())
    }
}

/// Decoder position between output words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Next output comes from the next input word
    Literal,
    /// `remaining` more copies of `value` are due
    Run { value: u16, remaining: u16 },
}

/// Word-plane run-length decoder.
///
/// ```text
///   ....  ..0. ....      literal, written complemented
///   NNNN  NNNN 1111 1111 N+1 words all off
///   NNNN  NNNN 1111 1110 N+1 words all on
///   NNNN  NNNN xx1x xxxx N+1 copies of the complement of the next word
/// ```
///
/// Runs carry over row ends.
#[derive(Debug, Clone)]
pub struct RunDecoder<'a> {
    words: &'a [u16],
    pos: usize,
    state: RunState,
}

impl<'a> RunDecoder<'a> {
    pub const CONTROL_BIT: u16 = 0x0020;

    pub fn new(words: &'a [u16]) -> Self {
        Self { words, pos: 0, state: RunState::Literal }
    }

    pub const fn is_control(word: u16) -> bool {
        word & Self::CONTROL_BIT != 0
    }

    /// Input words used so far
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn take(&mut self) -> Result<u16, LcdError> {
        let word = self.words.get(self.pos).copied().ok_or(LcdError::ImageTruncated {
            expected: self.pos + 1,
            actual: self.words.len(),
        })?;
        self.pos += 1;
        Ok(word)
    }

    /// Next memory word for the panel
    pub fn next_word(&mut self) -> Result<u16, LcdError> {
        if let RunState::Run { value, remaining } = self.state {
            self.state = match remaining {
                1 => RunState::Literal,
                _ => RunState::Run { value, remaining: remaining - 1 },
            };
            return Ok(value);
        }

        let word = self.take()?;
        if !Self::is_control(word) {
            return Ok(!word);
        }

        let value = match word & 0x00ff {
            0x00ff => WORD_OFF,
            0x00fe => WORD_ON,
            _ => !self.take()?,
        };
        let repeats = word >> 8;
        if repeats > 0 {
            self.state = RunState::Run { value, remaining: repeats };
        }
        Ok(value)
    }
}

impl<B: Bus> St7529<B> {
    /// Address each row of the region top first and hand it to `row`,
    /// which must stream that row's words.
    ///
    /// Rows cover `y..=y+height-1` with `y` the bottom row, the same band
    /// `blank` and column images use, not `y+1..=y+height`.
    fn stream_rows<F>(&mut self, x: i16, y: i16, width: u16, height: u16, mut row: F) -> Result<(), LcdError>
    where
        F: FnMut(&mut Self, usize) -> Result<(), LcdError>,
    {
        check_region(x, y, width, height)?;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let cx = mirror_x(x + width as i16 - 1);
        if cx % 3 != 0 {
            debug!("blit at x={} is not word aligned, shifting {} right", x, cx % 3);
        }

        let top = y + height as i16 - 1;
        for index in 0..height as usize {
            self.set_address(cx, (top - index as i16) as u16)?;
            self.command(RAM_WRITE)?;
            row(self, index)?;
        }
        Ok(())
    }

    fn solid(&mut self, x: i16, y: i16, width: u16, height: u16, value: u16) -> Result<(), LcdError> {
        let words = words_per_row(width);
        self.stream_rows(x, y, width, height, |lcd, _| {
            (0..words).try_for_each(|_| lcd.data_word(value))
        })
    }

    /// Draw a bit-plane image with its lower-left corner at (x, y)
    pub fn draw_bit_image(&mut self, image: &[u8], x: i16, y: i16, mode: BlitMode) -> Result<(), LcdError> {
        let image = BitImage::parse(image)?;
        debug!("bit image {}x{} at ({}, {}) {:?}", image.width, image.height, x, y, mode);

        match mode {
            BlitMode::Draw => self.stream_rows(x, y, image.width, image.height, |lcd, index| {
                image.packed_row(index).try_for_each(|word| lcd.data_word(word))
            }),
            BlitMode::Blank => self.solid(x, y, image.width, image.height, WORD_OFF),
            BlitMode::Fill => self.solid(x, y, image.width, image.height, WORD_ON),
        }
    }

    /// Draw a run-length word-plane image with its lower-left corner at (x, y)
    pub fn draw_word_image(&mut self, image: &[u16], x: i16, y: i16, mode: BlitMode) -> Result<(), LcdError> {
        let image = WordImage::parse(image)?;
        debug!("word image {}x{} at ({}, {}) {:?}", image.width, image.height, x, y, mode);

        match mode {
            BlitMode::Draw => {
                check_region(x, y, image.width, image.height)?;
                image.validate()?;

                let words = words_per_row(image.width);
                let mut decoder = image.decoder();
                self.stream_rows(x, y, image.width, image.height, |lcd, _| {
                    for _ in 0..words {
                        let word = decoder.next_word()?;
                        lcd.data_word(word)?;
                    }
                    Ok(())
                })
            }
            BlitMode::Blank => self.solid(x, y, image.width, image.height, WORD_OFF),
            BlitMode::Fill => self.solid(x, y, image.width, image.height, WORD_ON),
        }
    }

    /// Draw a column image: `[w][h]`, then for each 8-row band from the
    /// top, `w` bytes with bit 7 on the band's top row. Rows of the last
    /// band that fall below `y` are not drawn.
    pub fn draw_column_image(&mut self, image: &[u8], x: i16, y: i16) -> Result<(), LcdError> {
        let [w, h, data @ ..] = image else {
            return Err(LcdError::ImageTruncated { expected: 2, actual: image.len() });
        };
        let (width, height) = (*w as usize, *h as usize);
        let bands = height.div_ceil(8);
        let expected = 2 + width * bands;
        if image.len() < expected {
            return Err(LcdError::ImageTruncated { expected, actual: image.len() });
        }
        check_region(x, y, width as u16, height as u16)?;
        debug!("column image {}x{} at ({}, {})", width, height, x, y);

        let top = y + height as i16 - 1;
        for (band, columns) in data.chunks(width.max(1)).take(bands).enumerate() {
            for (col, &bits) in columns.iter().enumerate() {
                for bit in 0..8 {
                    let row = top - (band * 8 + bit) as i16;
                    if row < y {
                        break;
                    }
                    let pen = if bits & (0x80 >> bit) != 0 { Pen::DRAW } else { Pen::ERASE };
                    self.point(x + col as i16, row, pen)?;
                }
            }
        }
        Ok(())
    }

    /// Blank or fill a region with block writes
    pub fn fill_region(&mut self, x: i16, y: i16, width: u16, height: u16, mode: BlitMode) -> Result<(), LcdError> {
        if mode == BlitMode::Draw {
            warn!("fill_region has no image to draw");
            return Err(LcdError::UnsupportedMode);
        }
        let header = [width, height];
        self.draw_word_image(&header, x, y, mode)
    }

    /// Clear a region point by point; slow, but exact at any alignment
    pub fn blank(&mut self, x: i16, y: i16, width: u16, height: u16) -> Result<(), LcdError> {
        check_region(x, y, width, height)?;
        debug!("blank {}x{} at ({}, {})", width, height, x, y);

        for col in (x..x + width as i16).rev() {
            for row in (y..y + height as i16).rev() {
                self.point(col, row, Pen::ERASE)?;
            }
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
    fn test_bit_image_single_column() {
        let mut lcd = panel();
        let image = [1, 8, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80];
        // x = 9 puts the column on sub-pixel 0
        lcd.draw_bit_image(&image, 9, 20, BlitMode::Draw).unwrap();
        let emu = lcd.bus();
        for y in 20..28 {
            assert!(emu.pixel(9, y), "row {}", y);
        }
        assert_eq!(emu.count_on_pixels(), 8);

        lcd.draw_bit_image(&image, 9, 20, BlitMode::Blank).unwrap();
        assert_eq!(lcd.bus().count_on_pixels(), 0);
    }

    #[test]
    fn test_bit_image_rows_top_first() {
        let mut lcd = panel();
        // 10 wide, 2 high: top row leftmost pixel, bottom row rightmost pixel
        let image = [10, 2, 0x80, 0x00, 0x00, 0x40];
        lcd.draw_bit_image(&image, 150, 0, BlitMode::Draw).unwrap();
        let emu = lcd.bus();
        assert!(emu.pixel(150, 1));
        assert!(emu.pixel(159, 0));
        assert_eq!(emu.count_on_pixels(), 2);
    }

    #[test]
    fn test_bit_image_words_per_row() {
        let mut lcd = panel();
        let image = [7, 1, 0xfe];
        lcd.draw_bit_image(&image, 153, 0, BlitMode::Fill).unwrap();
        // line, column, RAMWR, 3 words
        assert_eq!(lcd.bus().transactions(), 3 + 3 + 1 + 3 * 2);
        assert_eq!(lcd.bus().count_on_pixels(), 9);
    }

    #[test]
    fn test_packer_partial_group() {
        let image = BitImage::parse(&[4, 1, 0xf0]).unwrap();
        let words: Vec<u16> = image.packed_row(0).collect();
        assert_eq!(words, vec![0x0000, SUBPIXELS[0].set_on(WORD_OFF)]);
        assert_eq!(image.packed_row(0).len(), 2);
    }

    #[test]
    fn test_bit_image_truncated() {
        let mut lcd = panel();
        assert_eq!(
            lcd.draw_bit_image(&[2, 2, 0x00], 0, 0, BlitMode::Draw),
            Err(LcdError::ImageTruncated { expected: 2, actual: 1 })
        );
        assert_eq!(
            lcd.draw_bit_image(&[1], 0, 0, BlitMode::Draw),
            Err(LcdError::ImageTruncated { expected: 2, actual: 1 })
        );
        assert_eq!(lcd.bus().transactions(), 0);
    }

    #[test]
    fn test_region_out_of_range() {
        let mut lcd = panel();
        let image = [2, 1, 0xc0];
        assert!(matches!(
            lcd.draw_bit_image(&image, 159, 0, BlitMode::Draw),
            Err(LcdError::OutOfRange { .. })
        ));
        assert!(matches!(
            lcd.fill_region(0, 155, 3, 6, BlitMode::Fill),
            Err(LcdError::OutOfRange { .. })
        ));
        assert_eq!(lcd.bus().transactions(), 0);
    }

    #[test]
    fn test_off_run_consumes_one_word() {
        let body = [0x04ff, 0x1234 & !RunDecoder::CONTROL_BIT];
        let mut decoder = RunDecoder::new(&body);
        for _ in 0..5 {
            assert_eq!(decoder.next_word().unwrap(), WORD_OFF);
            assert_eq!(decoder.consumed(), 1);
        }
        assert_eq!(decoder.state(), RunState::Literal);
        assert_eq!(decoder.next_word().unwrap(), !0x1214);
        assert_eq!(decoder.consumed(), 2);
    }

    #[test]
    fn test_on_run_and_pattern_run() {
        let body = [0x01fe, 0x02f0, 0x1111];
        let mut decoder = RunDecoder::new(&body);
        assert_eq!(decoder.next_word().unwrap(), WORD_ON);
        assert_eq!(decoder.state(), RunState::Run { value: WORD_ON, remaining: 1 });
        assert_eq!(decoder.next_word().unwrap(), WORD_ON);
        for _ in 0..3 {
            assert_eq!(decoder.next_word().unwrap(), !0x1111);
        }
        assert_eq!(decoder.consumed(), 3);
        assert!(matches!(decoder.next_word(), Err(LcdError::ImageTruncated { .. })));
    }

    #[test]
    fn test_word_image_run_crosses_rows() {
        let mut lcd = panel();
        // 6 wide (2 words per row), 2 rows: three on words then a literal
        let image = [6, 2, 0x02fe, 0x0000];
        lcd.draw_word_image(&image, 154, 10, BlitMode::Draw).unwrap();
        let emu = lcd.bus();
        assert_eq!(emu.word(0, 11), 0x0000);
        assert_eq!(emu.word(1, 11), 0x0000);
        assert_eq!(emu.word(0, 10), 0x0000);
        assert_eq!(emu.word(1, 10), 0xffff);
        assert_eq!(emu.count_on_pixels(), 9);
    }

    #[test]
    fn test_word_image_truncated_sends_nothing() {
        let mut lcd = panel();
        let image = [6, 2, 0x01fe];
        assert!(matches!(
            lcd.draw_word_image(&image, 154, 10, BlitMode::Draw),
            Err(LcdError::ImageTruncated { .. })
        ));
        assert_eq!(lcd.bus().transactions(), 0);
    }

    #[test]
    fn test_fill_region_modes() {
        let mut lcd = panel();
        assert_eq!(lcd.fill_region(0, 0, 3, 3, BlitMode::Draw), Err(LcdError::UnsupportedMode));
        lcd.fill_region(151, 0, 9, 9, BlitMode::Fill).unwrap();
        assert_eq!(lcd.bus().count_on_pixels(), 81);
        assert!(lcd.bus().pixel(151, 8));
        lcd.fill_region(151, 0, 9, 9, BlitMode::Blank).unwrap();
        assert_eq!(lcd.bus().count_on_pixels(), 0);
    }

    #[test]
    fn test_blank_clears_only_region() {
        let mut lcd = panel();
        lcd.fill(WORD_ON).unwrap();
        lcd.blank(10, 10, 5, 5).unwrap();
        let emu = lcd.bus();
        assert_eq!(emu.count_on_pixels(), 160 * 160 - 25);
        assert!(!emu.pixel(14, 14));
        assert!(emu.pixel(15, 14));
    }

    #[test]
    fn test_column_image() {
        let mut lcd = panel();
        lcd.draw_column_image(&[2, 8, 0x81, 0xff], 20, 30).unwrap();
        let emu = lcd.bus();
        assert!(emu.pixel(20, 37));
        assert!(emu.pixel(20, 30));
        assert!(!emu.pixel(20, 33));
        assert!((30..38).all(|y| emu.pixel(21, y)));
        assert_eq!(emu.count_on_pixels(), 10);
    }

    #[test]
    fn test_column_image_clips_below_origin() {
        let mut lcd = panel();
        lcd.fill(WORD_ON).unwrap();
        lcd.draw_column_image(&[1, 4, 0x0f], 5, 5).unwrap();
        let emu = lcd.bus();
        assert!((5..9).all(|y| !emu.pixel(5, y)));
        assert!(emu.pixel(5, 4));
        assert_eq!(emu.count_on_pixels(), 160 * 160 - 4);
    }
}
