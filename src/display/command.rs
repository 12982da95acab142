/*
 *  display/command.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sitronix ST7529 command set
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

// Both command sets
pub const EXT_IN0: u8 = 0x30;
pub const EXT_IN1: u8 = 0x31;

// Ext = 0
pub const SLEEP_OUT: u8 = 0x94;
pub const SLEEP_IN: u8 = 0x95;
pub const OSC_ON: u8 = 0xd1;
pub const POWER_CONTROL: u8 = 0x20;
pub const ELECTRONIC_CONTROL: u8 = 0x81;
pub const DISPLAY_CONTROL: u8 = 0xca;
pub const NORMAL_DISPLAY: u8 = 0xa6;
pub const INVERSE_DISPLAY: u8 = 0xa7;
pub const COM_SCAN_DIRECTION: u8 = 0xbb;
pub const DATA_SCAN_DIRECTION: u8 = 0xbc;
pub const DISPLAY_ON: u8 = 0xaf;
pub const DISPLAY_OFF: u8 = 0xae;
pub const LINE_ADDRESS: u8 = 0x75;
pub const COLUMN_ADDRESS: u8 = 0x15;
pub const RAM_WRITE: u8 = 0x5c;
pub const RAM_READ: u8 = 0x5d;
pub const RMW_IN: u8 = 0xe0;
pub const RMW_OUT: u8 = 0xee;

// Ext = 1
pub const GRAY_ODD_FRAME: u8 = 0x20;
pub const GRAY_EVEN_FRAME: u8 = 0x21;
pub const ANALOG_CIRCUIT: u8 = 0x32;
pub const SOFTWARE_INIT: u8 = 0x34;

/// Booster first, then booster + regulator + follower
pub const POWER_BOOSTER: u8 = 0x08;
pub const POWER_ALL: u8 = 0x0b;

/// Electronic volume for 14.0V VOP
pub const VOP_CODE: u16 = 335;

/// Last line / last word column of the 160x160 window
pub const LINE_END: u8 = 0x9f;
pub const COLUMN_END: u8 = 0x35;

/// Gray-level ramps have 16 entries per frame
pub const GRAY_LEVELS: usize = 16;
