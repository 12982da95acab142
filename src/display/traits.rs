/*
 *  display/traits.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the controller transport
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

use std::fmt::Debug;

/// Color depth capabilities of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// 1-bit logical pixels (what the point/text paths produce)
    Monochrome,

    /// 5-bit gray fields (what word-plane images can carry)
    Gray32,
}

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Color depth of the controller memory
    pub color_depth: ColorDepth,

    /// Whether the display supports contrast (electronic volume) control
    pub supports_contrast: bool,

    /// Whether the display supports inversion
    pub supports_invert: bool,
}

/// Byte-transfer channel to the controller
///
/// Every call is one complete, blocking strobe cycle. Implementations do not
/// buffer or batch; the driver relies on each transfer having landed by the
/// time the call returns.
pub trait Bus {
    /// Transport error (pin or port failure)
    type Error: Debug;

    /// Write one byte with A0 low (command register)
    fn write_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    /// Write one byte with A0 high (display data)
    fn write_data(&mut self, data: u8) -> Result<(), Self::Error>;

    /// Write a packed memory word, high byte first
    fn write_data_word(&mut self, word: u16) -> Result<(), Self::Error> {
        self.write_data((word >> 8) as u8)?;
        self.write_data(word as u8)
    }

    /// Read one byte of display data
    fn read_data(&mut self) -> Result<u8, Self::Error>;

    /// Drive the controller reset level (`true` = held in reset)
    fn set_reset(&mut self, active: bool) -> Result<(), Self::Error>;

    /// Switch the panel backlight
    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn write_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
        (**self).write_command(cmd)
    }

    fn write_data(&mut self, data: u8) -> Result<(), Self::Error> {
        (**self).write_data(data)
    }

    fn write_data_word(&mut self, word: u16) -> Result<(), Self::Error> {
        (**self).write_data_word(word)
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        (**self).read_data()
    }

    fn set_reset(&mut self, active: bool) -> Result<(), Self::Error> {
        (**self).set_reset(active)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        (**self).set_backlight(on)
    }
}
