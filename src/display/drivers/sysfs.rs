/*
 *  display/drivers/sysfs.rs
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Linux sysfs wiring for the parallel bus
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

use linux_embedded_hal::sysfs_gpio::{self, Direction};
use linux_embedded_hal::SysfsPin;
use log::info;

use crate::config::GpioConfig;
use crate::display::drivers::gpio::{DataPort, GpioBus, GpioError};

/// Parallel bus with every line on a sysfs GPIO
pub type SysfsBus = GpioBus<SysfsDataPort, SysfsPin, SysfsPin, SysfsPin, SysfsPin>;

/// D0-D7 on sysfs pins, switching direction only when it changes
pub struct SysfsDataPort {
    pins: Vec<SysfsPin>,
    driving: Option<bool>,
}

impl SysfsDataPort {
    pub fn new(numbers: &[u64]) -> Result<Self, GpioError> {
        if numbers.len() != 8 {
            return Err(GpioError::Port(format!(
                "need 8 data pins, got {}",
                numbers.len()
            )));
        }

        let pins = numbers
            .iter()
            .map(|&n| {
                let pin = SysfsPin::new(n);
                pin.export()
                    .map_err(|e| GpioError::Port(format!("export gpio{}: {:?}", n, e)))?;
                Ok(pin)
            })
            .collect::<Result<Vec<_>, GpioError>>()?;

        Ok(Self { pins, driving: None })
    }

    fn set_driving(&mut self, driving: bool) -> Result<(), sysfs_gpio::Error> {
        if self.driving != Some(driving) {
            let direction = if driving { Direction::Out } else { Direction::In };
            for pin in &self.pins {
                pin.set_direction(direction)?;
            }
            self.driving = Some(driving);
        }
        Ok(())
    }
}

impl DataPort for SysfsDataPort {
    type Error = sysfs_gpio::Error;

    fn drive(&mut self, value: u8) -> Result<(), Self::Error> {
        self.set_driving(true)?;
        for (bit, pin) in self.pins.iter().enumerate() {
            pin.set_value((value >> bit) & 1)?;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.set_driving(false)
    }

    fn sample(&mut self) -> Result<u8, Self::Error> {
        let mut value = 0u8;
        for (bit, pin) in self.pins.iter().enumerate() {
            value |= (pin.get_value()? & 1) << bit;
        }
        Ok(value)
    }
}

fn output_pin(n: u64, high: bool) -> Result<SysfsPin, GpioError> {
    let pin = SysfsPin::new(n);
    pin.export()
        .map_err(|e| GpioError::Pin(format!("export gpio{}: {:?}", n, e)))?;
    pin.set_direction(if high { Direction::High } else { Direction::Low })
        .map_err(|e| GpioError::Pin(format!("direction gpio{}: {:?}", n, e)))?;
    Ok(pin)
}

/// Export and configure every line named in `config`.
///
/// Control lines come up idle: A0 and RW high (display read, not reset),
/// E low, backlight off.
pub fn open(config: &GpioConfig) -> Result<SysfsBus, GpioError> {
    info!(
        "Opening sysfs bus: data {:?}, a0 {}, rw {}, e {}, backlight {}",
        config.data_pins, config.a0, config.rw, config.enable, config.backlight
    );

    let data = SysfsDataPort::new(&config.data_pins)?;
    let a0 = output_pin(config.a0, true)?;
    let rw = output_pin(config.rw, true)?;
    let e = output_pin(config.enable, false)?;
    let backlight = output_pin(config.backlight, false)?;

    Ok(GpioBus::new(data, a0, rw, e, backlight))
}
