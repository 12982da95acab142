/*
 *  display/mod.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  ST7529 display subsystem
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod command;

// Driver context and the layers built on it
pub mod st7529;
pub mod address;
pub mod pixel;
pub mod shapes;
pub mod blit;
pub mod font;
pub mod text;

// Bus implementations
pub mod drivers;

// Re-exports for convenience
pub use traits::{Bus, DisplayCapabilities, ColorDepth};
pub use error::LcdError;
pub use st7529::{St7529, DisplayMode, ModeChange};
pub use address::{WIDTH, HEIGHT, WORD_OFF, WORD_ON};
pub use pixel::Pen;
pub use blit::{BlitMode, BitImage, WordImage, RunDecoder, RunState};
pub use text::PRINT_BUFFER_SIZE;
pub use drivers::emulator::Emulator;
