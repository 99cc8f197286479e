use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use embedded_graphics::prelude::*;

const ABOUT: &str = "E-paper status dashboard";

const LONG_ABOUT: &str = "
Periodically fetches weather, air quality, and pollen data for a fixed
location and pushes a composed status frame to an e-paper panel (or a
PNG file when --out is given).

API credentials are read from the environment:

  LAUNCHPAD_OWM_KEY     OpenWeatherMap One Call key
  LAUNCHPAD_AIRNOW_KEY  AirNow API key
";

#[derive(Parser, Debug)]
#[command(version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    /// Latitude of the forecast location
    #[arg(long, default_value = "29.8068")]
    pub lat: String,

    /// Longitude of the forecast location
    #[arg(long, default_value = "-95.4181")]
    pub lon: String,

    /// ZIP code used for air quality readings
    #[arg(long, default_value = "77008")]
    pub zip: String,

    /// Local UTC offset in seconds
    #[arg(long, default_value_t = -18000)]
    pub utc_offset: i32,

    /// Panel width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Panel height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Write frames to a PNG file instead of the panel
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Render a single frame and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub owm_key: String,
    pub airnow_key: String,
    pub lat: String,
    pub lon: String,
    pub zip: String,
    pub utc_offset: i32,
    pub canvas: Size,
    pub hourly_slots: usize,
    pub daily_slots: usize,
    pub out: Option<PathBuf>,
    pub once: bool,
}

impl Config {
    pub fn load(args: Args) -> Result<Config> {
        Ok(Config {
            owm_key: required_env("LAUNCHPAD_OWM_KEY")?,
            airnow_key: required_env("LAUNCHPAD_AIRNOW_KEY")?,
            lat: args.lat,
            lon: args.lon,
            zip: args.zip,
            utc_offset: args.utc_offset,
            canvas: Size::new(args.width, args.height),
            hourly_slots: 8,
            daily_slots: 5,
            out: args.out,
            once: args.once,
        })
    }
}

fn required_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{name} is not set"),
    }
}
