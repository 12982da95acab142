/*
 *  display/font.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  5x8 column font for printable ASCII
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

/// Columns per glyph
pub const GLYPH_WIDTH: usize = 5;

pub const FIRST_GLYPH: u8 = b' ';
pub const LAST_GLYPH: u8 = b'~';

/// One entry per character from space to tilde, left column first,
/// bit 7 on the top row.
pub const GLYPHS: [[u8; GLYPH_WIDTH]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0xfa, 0xfa, 0x00, 0x00, 0x00], // !
    [0xe0, 0xc0, 0x00, 0xe0, 0xc0], // "
    [0x24, 0x7e, 0x24, 0x7e, 0x24], // #
    [0x24, 0xd4, 0x56, 0x48, 0x00], // $
    [0xc6, 0xc8, 0x10, 0x26, 0xc6], // %
    [0x6c, 0x92, 0x6a, 0x04, 0x0a], // &
    [0xc0, 0xc0, 0x00, 0x00, 0x00], // '
    [0x7c, 0x82, 0x00, 0x00, 0x00], // (
    [0x82, 0x7c, 0x00, 0x00, 0x00], // )
    [0x10, 0x7c, 0x38, 0x7c, 0x10], // *
    [0x10, 0x10, 0x7c, 0x10, 0x10], // +
    [0x07, 0x06, 0x00, 0x00, 0x00], // ,
    [0x10, 0x10, 0x10, 0x10, 0x10], // -
    [0x06, 0x06, 0x00, 0x00, 0x00], // .
    [0x04, 0x08, 0x10, 0x20, 0x40], // /
    [0x7c, 0x8a, 0x92, 0xa2, 0x7c], // 0
    [0x00, 0x42, 0xfe, 0x02, 0x00], // 1
    [0x46, 0x8a, 0x92, 0x92, 0x62], // 2
    [0x44, 0x92, 0x92, 0x92, 0x6c], // 3
    [0x18, 0x28, 0x48, 0xfe, 0x08], // 4
    [0xf4, 0x92, 0x92, 0x92, 0x8c], // 5
    [0x3c, 0x52, 0x92, 0x92, 0x8c], // 6
    [0x80, 0x8e, 0x90, 0xa0, 0xc0], // 7
    [0x6c, 0x92, 0x92, 0x92, 0x6c], // 8
    [0x60, 0x92, 0x92, 0x94, 0x78], // 9
    [0x36, 0x36, 0x00, 0x00, 0x00], // :
    [0x37, 0x36, 0x00, 0x00, 0x00], // ;
    [0x10, 0x28, 0x44, 0x82, 0x00], // <
    [0x24, 0x24, 0x24, 0x24, 0x24], // =
    [0x82, 0x44, 0x28, 0x10, 0x00], // >
    [0x60, 0x80, 0x9a, 0x90, 0x60], // ?
    [0x7c, 0x82, 0xba, 0xaa, 0x78], // @
    [0x7e, 0x90, 0x90, 0x90, 0x7e], // A
    [0xfe, 0x92, 0x92, 0x92, 0x6c], // B
    [0x7c, 0x82, 0x82, 0x82, 0x44], // C
    [0xfe, 0x82, 0x82, 0x82, 0x7c], // D
    [0xfe, 0x92, 0x92, 0x92, 0x82], // E
    [0xfe, 0x90, 0x90, 0x90, 0x80], // F
    [0x7c, 0x82, 0x92, 0x92, 0x5c], // G
    [0xfe, 0x10, 0x10, 0x10, 0xfe], // H
    [0x82, 0xfe, 0x82, 0x00, 0x00], // I
    [0x0c, 0x02, 0x02, 0x02, 0xfc], // J
    [0xfe, 0x10, 0x28, 0x44, 0x82], // K
    [0xfe, 0x02, 0x02, 0x02, 0x02], // L
    [0xfe, 0x40, 0x20, 0x40, 0xfe], // M
    [0xfe, 0x40, 0x20, 0x10, 0xfe], // N
    [0x7c, 0x82, 0x82, 0x82, 0x7c], // O
    [0xfe, 0x90, 0x90, 0x90, 0x60], // P
    [0x7c, 0x82, 0x92, 0x8c, 0x7a], // Q
    [0xfe, 0x90, 0x90, 0x98, 0x66], // R
    [0x64, 0x92, 0x92, 0x92, 0x4c], // S
    [0x80, 0x80, 0xfe, 0x80, 0x80], // T
    [0xfc, 0x02, 0x02, 0x02, 0xfc], // U
    [0xf8, 0x04, 0x02, 0x04, 0xf8], // V
    [0xfc, 0x02, 0x3c, 0x02, 0xfc], // W
    [0xc6, 0x28, 0x10, 0x28, 0xc6], // X
    [0xe0, 0x10, 0x0e, 0x10, 0xe0], // Y
    [0x86, 0x8a, 0x92, 0xa2, 0xc2], // Z
    [0xfe, 0x82, 0x82, 0x00, 0x00], // [
    [0x40, 0x20, 0x10, 0x08, 0x04], // backslash
    [0x82, 0x82, 0xfe, 0x00, 0x00], // ]
    [0x20, 0x40, 0x80, 0x40, 0x20], // ^
    [0x02, 0x02, 0x02, 0x02, 0x02], // _
    [0xc0, 0xe0, 0x00, 0x00, 0x00], // `
    [0x04, 0x2a, 0x2a, 0x2a, 0x1e], // a
    [0xfe, 0x22, 0x22, 0x22, 0x1c], // b
    [0x1c, 0x22, 0x22, 0x22, 0x14], // c
    [0x1c, 0x22, 0x22, 0x22, 0xfc], // d
    [0x1c, 0x2a, 0x2a, 0x2a, 0x10], // e
    [0x10, 0x7e, 0x90, 0x90, 0x80], // f
    [0x18, 0x25, 0x25, 0x25, 0x3e], // g
    [0xfe, 0x10, 0x10, 0x10, 0x0e], // h
    [0xbe, 0x02, 0x00, 0x00, 0x00], // i
    [0x02, 0x01, 0x01, 0x21, 0xbe], // j
    [0xfe, 0x08, 0x14, 0x22, 0x00], // k
    [0xfe, 0x02, 0x00, 0x00, 0x00], // l
    [0x3e, 0x20, 0x18, 0x20, 0x1e], // m
    [0x3e, 0x20, 0x20, 0x20, 0x1e], // n
    [0x1c, 0x22, 0x22, 0x22, 0x1c], // o
    [0x3f, 0x22, 0x22, 0x22, 0x1c], // p
    [0x1c, 0x22, 0x22, 0x22, 0x3f], // q
    [0x22, 0x1e, 0x22, 0x20, 0x10], // r
    [0x12, 0x2a, 0x2a, 0x2a, 0x04], // s
    [0x20, 0x7c, 0x22, 0x22, 0x04], // t
    [0x3c, 0x02, 0x04, 0x3e, 0x00], // u
    [0x38, 0x04, 0x02, 0x04, 0x38], // v
    [0x3c, 0x06, 0x0c, 0x06, 0x3c], // w
    [0x22, 0x14, 0x08, 0x14, 0x22], // x
    [0x39, 0x05, 0x06, 0x3c, 0x00], // y
    [0x26, 0x2a, 0x2a, 0x32, 0x00], // z
    [0x10, 0x7c, 0x82, 0x82, 0x00], // {
    [0xee, 0x00, 0x00, 0x00, 0x00], // |
    [0x82, 0x82, 0x7c, 0x10, 0x00], // }
    [0x40, 0x80, 0x40, 0x80, 0x00], // ~
];

/// Glyph for a printable character, `None` for anything else
pub fn glyph(c: u8) -> Option<&'static [u8; GLYPH_WIDTH]> {
    match c {
        FIRST_GLYPH..=LAST_GLYPH => Some(&GLYPHS[(c - FIRST_GLYPH) as usize]),
        _ => None,
    }
}
