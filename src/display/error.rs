/*
 *  display/error.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the LCD driver
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
use thiserror::Error;

/// Unified error type for all LCD operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LcdError {
    /// Coordinate outside the 160x160 surface; nothing was sent to the panel
    #[error("coordinate ({x}, {y}) is outside the display surface")]
    OutOfRange { x: i16, y: i16 },

    /// Formatted text did not fit the print buffer; nothing was printed
    #[error("formatted output exceeds the {capacity} byte print buffer")]
    FormatOverflow { capacity: usize },

    /// Image buffer shorter than its header promises
    #[error("image buffer truncated: expected {expected} elements, got {actual}")]
    ImageTruncated { expected: usize, actual: usize },

    /// Blit mode not meaningful for this operation
    #[error("blit mode not supported by this operation")]
    UnsupportedMode,

    /// Transport failure reported by the bus implementation
    #[error("bus transfer failed: {0}")]
    Bus(String),
}

impl LcdError {
    /// Wrap any transport error; the HAL error types only promise `Debug`.
    pub fn bus<E: Debug>(err: E) -> Self {
        LcdError::Bus(format!("{:?}", err))
    }
}
