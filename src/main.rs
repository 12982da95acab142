/*
 *  main.rs
 *
 *  st7529-lcd - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Demo: draws text, shapes and images on an ST7529 panel, or on the
 *	emulator with a PBM snapshot of the result
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use env_logger::Env;
use log::info;

use st7529_lcd::config::{self, Config, Scene};
use st7529_lcd::display::drivers::emulator::RecordingDelay;
use st7529_lcd::display::{HEIGHT, WIDTH};
use st7529_lcd::{lcd_print, BlitMode, Bus, DisplayMode, Emulator, ModeChange, Pen, St7529};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

//  right-pointing arrow, 12x8
const ARROW: [u8; 2 + 2 * 8] = [
    12, 8,
    0x06, 0x00,
    0x07, 0x00,
    0xff, 0x80,
    0xff, 0xc0,
    0xff, 0xc0,
    0xff, 0x80,
    0x07, 0x00,
    0x06, 0x00,
];

//  9x6 stripes, every row a single run
const STRIPES: [u16; 2 + 6] = [9, 6, 0x02fe, 0x02ff, 0x02fe, 0x02ff, 0x02fe, 0x02ff];

//  8x8 frame, one band of columns
const FRAME: [u8; 2 + 8] = [8, 8, 0xff, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xff];

fn main() -> Result<()> {
    let cfg = config::load().context("loading configuration")?;

    // Initialize the logger with the configured level
    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This {} worth the Squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {} [{}]", env!("CARGO_PKG_VERSION"), BUILD_DATE, BUILD_FEATURES);

    if run_hardware(&cfg)? {
        return Ok(());
    }

    info!("No panel wiring configured, drawing on the emulator");
    let mut lcd = St7529::new(Emulator::without_journal());
    lcd.init(&mut RecordingDelay::default())?;
    render(&mut lcd, &cfg)?;

    let path = cfg.pbm_path();
    lcd.bus()
        .save_to_pbm(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(
        "Snapshot written to {} ({} pixels on, {} bus transfers)",
        path.display(),
        lcd.bus().count_on_pixels(),
        lcd.bus().transactions()
    );
    Ok(())
}

#[cfg(feature = "linux-gpio")]
fn run_hardware(cfg: &Config) -> Result<bool> {
    use st7529_lcd::display::drivers::sysfs;

    let Some(gpio) = cfg.gpio() else {
        return Ok(false);
    };
    let bus = sysfs::open(gpio).context("opening GPIO bus")?;
    let mut lcd = St7529::new(bus);
    lcd.init(&mut linux_embedded_hal::Delay)?;
    render(&mut lcd, cfg)?;
    Ok(true)
}

#[cfg(not(feature = "linux-gpio"))]
fn run_hardware(cfg: &Config) -> Result<bool> {
    if cfg.gpio().is_some() {
        log::warn!("gpio wiring ignored, built without the linux-gpio feature");
    }
    Ok(false)
}

fn render<B: Bus>(lcd: &mut St7529<B>, cfg: &Config) -> Result<()> {
    lcd.clear()?;
    lcd.set_contrast(cfg.contrast())?;
    lcd.set_backlight(cfg.backlight())?;
    lcd.set_display_mode(ModeChange::Set(cfg.display_mode()))?;

    let scene = cfg.scene();
    info!("Rendering {:?}", scene);
    match scene {
        Scene::Text => text_scene(lcd)?,
        Scene::Shapes => shapes_scene(lcd)?,
        Scene::Images => images_scene(lcd)?,
        Scene::All => {
            text_scene(lcd)?;
            shapes_scene(lcd)?;
            images_scene(lcd)?;
        }
    }
    Ok(())
}

/// Top band: a few lines in each font mode
fn text_scene<B: Bus>(lcd: &mut St7529<B>) -> Result<()> {
    let base = lcd.display_mode();

    lcd.set_cursor(0, HEIGHT - 9);
    lcd_print!(lcd, "ST7529 {}x{}\n", WIDTH, HEIGHT)?;
    lcd.put_str("worth the squeeze\n")?;

    lcd.set_display_mode(ModeChange::Set(DisplayMode::PROPORTIONAL))?;
    // skip a line, 2x glyphs are two lines tall
    lcd.put_str("proportional text\n\n")?;

    lcd.set_display_mode(ModeChange::Set(DisplayMode::FONT_2X))?;
    lcd.put_str("2X\n")?;

    lcd.set_display_mode(ModeChange::Reset)?;
    lcd.set_display_mode(ModeChange::Set(base))?;
    Ok(())
}

/// Middle band: every shape, split off with embedded-graphics rules
fn shapes_scene<B: Bus>(lcd: &mut St7529<B>) -> Result<()> {
    let rule = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    Line::new(Point::new(0, 58), Point::new(WIDTH as i32 - 1, 58))
        .into_styled(rule)
        .draw(lcd)?;
    Line::new(Point::new(0, 122), Point::new(WIDTH as i32 - 1, 122))
        .into_styled(rule)
        .draw(lcd)?;

    lcd.circle(18, 80, 14, Pen::DRAW)?;
    lcd.circle(52, 80, 12, Pen::DRAW.filled())?;
    lcd.rectangle(72, 68, 24, 24, Pen::DOUBLE)?;
    lcd.square(118, 80, 10, Pen::DRAW.filled())?;
    lcd.point(148, 80, Pen::BOX5)?;

    lcd.triangle(18, 49, 8, Pen::DRAW)?;
    lcd.triangle(46, 49, 8, Pen::DRAW.flipped())?;
    lcd.star(80, 49, 10, Pen::DRAW)?;
    Ok(())
}

/// Bottom band: one of each image format plus block fill and blank
fn images_scene<B: Bus>(lcd: &mut St7529<B>) -> Result<()> {
    lcd.draw_bit_image(&ARROW, 10, 10, BlitMode::Draw)?;
    lcd.draw_word_image(&STRIPES, 40, 10, BlitMode::Draw)?;
    lcd.draw_column_image(&FRAME, 70, 10)?;

    lcd.fill_region(100, 5, 12, 12, BlitMode::Fill)?;
    lcd.blank(103, 8, 6, 6)?;
    lcd.point(105, 10, Pen::PLUS)?;
    Ok(())
}
