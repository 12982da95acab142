/*
 *  display/drivers/gpio.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  8080-style parallel bus over embedded-hal pins
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

//! Control lines:
//!
//! ```text
//!   A0  RW  E
//!   0   0   1   control write (command)
//!   0   1   x   held in reset
//!   1   0   1   display write
//!   1   1   1   display read
//! ```

use std::fmt::Debug;

use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;
use thiserror::Error;

use crate::display::traits::Bus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GpioError {
    #[error("control pin error: {0}")]
    Pin(String),

    #[error("data port error: {0}")]
    Port(String),
}

impl GpioError {
    fn pin<E: Debug>(err: E) -> Self {
        GpioError::Pin(format!("{:?}", err))
    }

    fn port<E: Debug>(err: E) -> Self {
        GpioError::Port(format!("{:?}", err))
    }
}

/// Bidirectional 8-bit data port
pub trait DataPort {
    type Error: Debug;

    /// Switch to output and put `value` on D0-D7
    fn drive(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Stop driving so the controller can
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Latch D0-D7
    fn sample(&mut self) -> Result<u8, Self::Error>;
}

/// Data port over eight open-drain pins, D0 first.
///
/// Releasing drives every line high so the controller can pull it down.
pub struct OpenDrainPort<P> {
    pins: [P; 8],
}

impl<P: OutputPin + InputPin> OpenDrainPort<P> {
    pub fn new(pins: [P; 8]) -> Self {
        Self { pins }
    }

    pub fn release_pins(self) -> [P; 8] {
        self.pins
    }
}

impl<P: OutputPin + InputPin> DataPort for OpenDrainPort<P> {
    type Error = P::Error;

    fn drive(&mut self, value: u8) -> Result<(), Self::Error> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if value & (1 << bit) != 0 {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.pins.iter_mut().try_for_each(|pin| pin.set_high())
    }

    fn sample(&mut self) -> Result<u8, Self::Error> {
        let mut value = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if pin.is_high()? {
                value |= 1 << bit;
            }
        }
        Ok(value)
    }
}

/// ST7529 parallel bus: data port plus A0, RW, E and the backlight switch
pub struct GpioBus<D, A0, RW, E, BL> {
    data: D,
    a0: A0,
    rw: RW,
    e: E,
    backlight: BL,
}

impl<D, A0, RW, E, BL> GpioBus<D, A0, RW, E, BL>
where
    D: DataPort,
    A0: OutputPin,
    RW: OutputPin,
    E: OutputPin,
    BL: OutputPin,
{
    pub fn new(data: D, a0: A0, rw: RW, e: E, backlight: BL) -> Self {
        debug!("GPIO bus created");
        Self { data, a0, rw, e, backlight }
    }

    pub fn release(self) -> (D, A0, RW, E, BL) {
        (self.data, self.a0, self.rw, self.e, self.backlight)
    }

    fn strobe(&mut self) -> Result<(), GpioError> {
        self.e.set_high().map_err(GpioError::pin)?;
        self.e.set_low().map_err(GpioError::pin)
    }

    fn write(&mut self, data: bool, value: u8) -> Result<(), GpioError> {
        self.data.drive(value).map_err(GpioError::port)?;
        self.rw.set_low().map_err(GpioError::pin)?;
        if data {
            self.a0.set_high().map_err(GpioError::pin)?;
        } else {
            self.a0.set_low().map_err(GpioError::pin)?;
        }
        self.strobe()
    }
}

impl<D, A0, RW, E, BL> Bus for GpioBus<D, A0, RW, E, BL>
where
    D: DataPort,
    A0: OutputPin,
    RW: OutputPin,
    E: OutputPin,
    BL: OutputPin,
{
    type Error = GpioError;

    fn write_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
        self.write(false, cmd)
    }

    fn write_data(&mut self, data: u8) -> Result<(), Self::Error> {
        self.write(true, data)
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        self.data.release().map_err(GpioError::port)?;
        self.a0.set_high().map_err(GpioError::pin)?;
        self.rw.set_high().map_err(GpioError::pin)?;

        self.e.set_high().map_err(GpioError::pin)?;
        let value = self.data.sample().map_err(GpioError::port);
        self.e.set_low().map_err(GpioError::pin)?;
        value
    }

    fn set_reset(&mut self, active: bool) -> Result<(), Self::Error> {
        self.rw.set_high().map_err(GpioError::pin)?;
        if active {
            self.a0.set_low().map_err(GpioError::pin)
        } else {
            self.a0.set_high().map_err(GpioError::pin)
        }
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.backlight.set_high().map_err(GpioError::pin)
        } else {
            self.backlight.set_low().map_err(GpioError::pin)
        }
    }
}
