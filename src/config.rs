use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::command::VOP_CODE;
use crate::display::st7529::DisplayMode;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Largest electronic volume the controller accepts (9 bits)
pub const MAX_CONTRAST: u16 = 511;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General options
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// panel behavior and wiring
    pub display: Option<DisplayConfig>,
    /// what the demo draws and where the snapshot goes
    pub demo: Option<DemoConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub contrast: Option<u16>,          // 0-511, electronic volume
    pub backlight: Option<bool>,
    pub proportional: Option<bool>,
    pub font_2x: Option<bool>,
    pub reverse_font: Option<bool>,
    pub reverse_display: Option<bool>,
    pub gpio: Option<GpioConfig>,       // <- parallel bus wiring, linux-gpio only
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DemoConfig {
    pub scene: Option<Scene>,
    pub pbm_path: Option<PathBuf>,
}

/// Parallel bus wiring, sysfs GPIO numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GpioConfig {
    pub data_pins: Vec<u64>,    // D0..D7
    pub a0: u64,
    pub rw: u64,
    pub enable: u64,
    pub backlight: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    Text,
    Shapes,
    Images,
    #[default]
    All,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "st7529-demo", about = "ST7529 160x160 LCD demo", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// electronic volume 0-511
    #[arg(long)]
    pub contrast: Option<u16>,
    #[arg(long, action = ArgAction::Set)]
    pub backlight: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub proportional: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub font_2x: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub reverse_display: Option<bool>,
    #[arg(long, value_enum)]
    pub scene: Option<Scene>,
    /// where to write the PBM snapshot
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub pbm: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn contrast(&self) -> u16 {
        self.display.as_ref().and_then(|d| d.contrast).unwrap_or(VOP_CODE)
    }

    pub fn backlight(&self) -> bool {
        self.display.as_ref().and_then(|d| d.backlight).unwrap_or(true)
    }

    /// Mode flags the panel starts with
    pub fn display_mode(&self) -> DisplayMode {
        let mut mode = DisplayMode::empty();
        if let Some(d) = self.display.as_ref() {
            let flags = [
                (d.proportional, DisplayMode::PROPORTIONAL),
                (d.font_2x, DisplayMode::FONT_2X),
                (d.reverse_font, DisplayMode::REVERSE_FONT),
                (d.reverse_display, DisplayMode::REVERSE_DISPLAY),
            ];
            for (set, flag) in flags {
                if set == Some(true) { mode.insert(flag); }
            }
        }
        mode
    }

    pub fn gpio(&self) -> Option<&GpioConfig> {
        self.display.as_ref().and_then(|d| d.gpio.as_ref())
    }

    pub fn scene(&self) -> Scene {
        self.demo.as_ref().and_then(|d| d.scene).unwrap_or_default()
    }

    pub fn pbm_path(&self) -> PathBuf {
        self.demo
            .as_ref()
            .and_then(|d| d.pbm_path.clone())
            .unwrap_or_else(|| PathBuf::from("st7529.pbm"))
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer YAML and the given CLI overrides, then validate.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/st7529/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/st7529/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/st7529.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["st7529.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    // demo
    match (&mut dst.demo, src.demo) {
        (None, Some(c)) => dst.demo = Some(c),
        (Some(d), Some(s)) => {
            if s.scene.is_some()    { d.scene = s.scene; }
            if s.pbm_path.is_some() { d.pbm_path = s.pbm_path; }
        }
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.contrast.is_some()        { dst.contrast = src.contrast; }
    if src.backlight.is_some()       { dst.backlight = src.backlight; }
    if src.proportional.is_some()    { dst.proportional = src.proportional; }
    if src.font_2x.is_some()         { dst.font_2x = src.font_2x; }
    if src.reverse_font.is_some()    { dst.reverse_font = src.reverse_font; }
    if src.reverse_display.is_some() { dst.reverse_display = src.reverse_display; }
    if src.gpio.is_some()            { dst.gpio = src.gpio; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    let any_display = cli.contrast.is_some()
        || cli.backlight.is_some()
        || cli.proportional.is_some()
        || cli.font_2x.is_some()
        || cli.reverse_display.is_some();

    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.contrast.is_some()        { display.contrast = cli.contrast; }
        if cli.backlight.is_some()       { display.backlight = cli.backlight; }
        if cli.proportional.is_some()    { display.proportional = cli.proportional; }
        if cli.font_2x.is_some()         { display.font_2x = cli.font_2x; }
        if cli.reverse_display.is_some() { display.reverse_display = cli.reverse_display; }
    }

    if (cli.scene.is_some() || cli.pbm.is_some()) && cfg.demo.is_none() {
        cfg.demo = Some(DemoConfig::default());
    }
    if let Some(demo) = cfg.demo.as_mut() {
        if cli.scene.is_some() { demo.scene = cli.scene; }
        if cli.pbm.is_some()   { demo.pbm_path = cli.pbm.clone(); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {}", LOG_LEVELS.join("|")
            )));
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        if let Some(c) = display.contrast {
            if c > MAX_CONTRAST {
                return Err(ConfigError::Validation(format!(
                    "display contrast must be 0..={MAX_CONTRAST}"
                )));
            }
        }
        if let Some(gpio) = display.gpio.as_ref() {
            if gpio.data_pins.len() != 8 {
                return Err(ConfigError::Validation("gpio data_pins must list 8 pins (D0..D7)".into()));
            }
            let mut all = gpio.data_pins.clone();
            all.extend([gpio.a0, gpio.rw, gpio.enable, gpio.backlight]);
            all.sort_unstable();
            if all.windows(2).any(|w| w[0] == w[1]) {
                return Err(ConfigError::Validation("gpio pins must be distinct".into()));
            }
        }
    }
    Ok(())
}
