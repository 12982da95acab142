/*
 *  tests/display_integration.rs
 *
 *  Integration tests for the display driver, run against the emulator
 *
 *  st7529-lcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 */

use st7529_lcd::display::drivers::emulator::{BusOp, RecordingDelay};
use st7529_lcd::display::{ColorDepth, DisplayMode, WORD_OFF};
use st7529_lcd::{lcd_print, BlitMode, Emulator, LcdError, ModeChange, Pen, St7529};

fn panel() -> St7529<Emulator> {
    let mut lcd = St7529::new(Emulator::new());
    lcd.init(&mut RecordingDelay::default()).unwrap();
    lcd.clear().unwrap();
    lcd.bus_mut().clear_journal();
    lcd
}

#[test]
fn test_capabilities() {
    let lcd = St7529::new(Emulator::new());
    let caps = lcd.capabilities();
    assert_eq!((caps.width, caps.height), (160, 160));
    assert_eq!(caps.color_depth, ColorDepth::Gray32);
    assert!(caps.supports_contrast);
    assert!(caps.supports_invert);
}

#[test]
fn test_init_ends_with_display_on() {
    let mut lcd = St7529::new(Emulator::new());
    lcd.init(&mut RecordingDelay::default()).unwrap();
    let journal = lcd.bus().journal();
    assert_eq!(journal.first(), Some(&BusOp::Reset(false)));
    assert_eq!(&journal[journal.len() - 2..], &[BusOp::Command(0x30), BusOp::Command(0xaf)]);
    assert_eq!(lcd.cursor(), (0, 159));
    assert!(lcd.display_mode().is_empty());
}

#[test]
fn test_points_survive_other_operations() {
    let mut lcd = panel();
    lcd.point(0, 0, Pen::DRAW).unwrap();
    lcd.point(159, 159, Pen::DRAW).unwrap();
    lcd.circle(80, 80, 20, Pen::DRAW).unwrap();
    lcd.set_cursor(40, 40);
    lcd.put_str("Hi").unwrap();

    assert!(lcd.read_point(0, 0).unwrap());
    assert!(lcd.read_point(159, 159).unwrap());
    assert!(!lcd.read_point(1, 0).unwrap());
}

#[test]
fn test_bus_errors_are_not_swallowed_by_clipping() {
    let mut lcd = panel();
    // clipped composites are fine
    lcd.point(159, 159, Pen::BOX5).unwrap();
    assert_eq!(lcd.bus().count_on_pixels(), 9);
    // a bad center is still reported
    assert_eq!(lcd.point(160, 159, Pen::BOX5), Err(LcdError::OutOfRange { x: 160, y: 159 }));
}

#[test]
fn test_text_then_clear() {
    let mut lcd = panel();
    lcd.set_display_mode(ModeChange::Set(DisplayMode::FONT_2X | DisplayMode::PROPORTIONAL))
        .unwrap();
    lcd.set_cursor(0, 100);
    assert_eq!(lcd_print!(lcd, "{}:{:02}", 7, 5), Ok(4));
    assert!(lcd.bus().count_on_pixels() > 0);

    lcd.clear().unwrap();
    assert_eq!(lcd.bus().count_on_pixels(), 0);
    assert_eq!(lcd.cursor(), (0, 159));
    assert!(lcd.display_mode().is_empty());
}

#[test]
fn test_images_and_block_fill() {
    let mut lcd = panel();

    // 3x2 bit image; x = 1 puts its right edge on a word boundary
    lcd.draw_bit_image(&[3, 2, 0xa0, 0x40], 1, 0, BlitMode::Draw).unwrap();
    assert!(lcd.bus().pixel(1, 1) && lcd.bus().pixel(3, 1));
    assert!(lcd.bus().pixel(2, 0));
    assert_eq!(lcd.bus().count_on_pixels(), 3);

    // word image of a single off run wipes it again
    lcd.draw_word_image(&[3, 2, 0x01ff], 1, 0, BlitMode::Draw).unwrap();
    assert_eq!(lcd.bus().count_on_pixels(), 0);
    assert_eq!(lcd.bus().word(52, 0), WORD_OFF);

    lcd.fill_region(1, 0, 3, 2, BlitMode::Fill).unwrap();
    assert_eq!(lcd.bus().count_on_pixels(), 6);
    lcd.blank(1, 0, 3, 2).unwrap();
    assert_eq!(lcd.bus().count_on_pixels(), 0);
}

#[test]
fn test_pbm_snapshot() {
    let mut lcd = panel();
    lcd.point(0, 159, Pen::DRAW).unwrap();

    let mut out = Vec::new();
    lcd.bus().write_pbm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let first_row = text.lines().nth(2).unwrap();
    assert!(first_row.starts_with("1 0"));
}

#[test]
fn test_driver_over_borrowed_bus() {
    let mut emu = Emulator::new();
    {
        let mut lcd = St7529::new(&mut emu);
        lcd.init(&mut RecordingDelay::default()).unwrap();
        lcd.clear().unwrap();
        lcd.point(10, 10, Pen::DRAW).unwrap();
    }
    assert!(emu.pixel(10, 10));
}
