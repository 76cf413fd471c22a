//! Diagnostic timeline renderer: writes storm_cycle.png and sun_path.png.
//! Not part of the runtime path.

use std::f64::consts::TAU;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use sky_core::dynamic::storm::{PROGRESS_MAX, PROGRESS_MIN, PROGRESS_RATE};
use sky_core::dynamic::sun::PHASE_RATE;
use sky_core::{Weather, WeatherParameters};

const PLOT_H: u32 = 220;
/// Widest strip chart we are willing to allocate.
const MAX_COLUMNS: u32 = 1 << 16;

#[derive(Parser, Debug)]
#[command(name = "timeline", about = "Render storm and sun cycles to PNG strip charts")]
struct Args {
    /// Output directory (created if absent)
    #[arg(short, long, default_value = "data/debug")]
    out_dir: PathBuf,

    /// Simulated seconds per column
    #[arg(long, default_value = "1.0")]
    step: f64,
}

// ── Plot helpers ──────────────────────────────────────────────────────────────

/// Blank white canvas with a light grey grid line every 25% of height.
fn canvas(width: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, PLOT_H, Rgb([255, 255, 255]));
    for q in 1..4 {
        let y = PLOT_H * q / 4;
        for x in 0..width {
            img.put_pixel(x, y, Rgb([225, 225, 225]));
        }
    }
    img
}

/// Plot `value` in `[lo, hi]` at column `x`, top = `hi`.
fn plot(img: &mut RgbImage, x: u32, value: f64, lo: f64, hi: f64, color: [u8; 3]) {
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    let y = ((1.0 - t) * (PLOT_H - 1) as f64).round() as u32;
    img.put_pixel(x, y, Rgb(color));
}

/// Number of columns needed to cover `seconds` at `step` seconds per column.
fn columns_for(seconds: f64, step: f64) -> Result<u32> {
    let columns = (seconds / step).ceil();
    if columns > MAX_COLUMNS as f64 {
        bail!("--step {step} needs {columns} columns, more than {MAX_COLUMNS}; use a larger step");
    }
    Ok(columns as u32)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if !(args.step.is_finite() && args.step > 0.0) {
        bail!("--step must be a positive number of seconds, got {}", args.step);
    }
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    // ── 1. storm_cycle.png ───────────────────────────────────────────────────
    // One full cycle: up from the dry start, down to the floor, back up.
    {
        let range = PROGRESS_MAX - PROGRESS_MIN;
        let cycle_seconds = 2.0 * range / PROGRESS_RATE;
        let columns = columns_for(cycle_seconds, args.step)?;

        let mut record = WeatherParameters::default();
        let mut weather = Weather::new(&record);
        let mut img = canvas(columns);
        for x in 0..columns {
            weather.tick(args.step, &mut record);
            let f = weather.storm().fields();
            plot(&mut img, x, f.clouds, 0.0, 100.0, [120, 120, 120]); // grey
            plot(&mut img, x, f.rain, 0.0, 100.0, [30, 80, 220]);     // blue
            plot(&mut img, x, f.puddles, 0.0, 100.0, [0, 170, 170]);  // teal
            plot(&mut img, x, f.wetness, 0.0, 100.0, [140, 60, 20]);  // brown
            plot(&mut img, x, f.fog, 0.0, 100.0, [180, 80, 200]);     // purple
            plot(&mut img, x, f.wind, 0.0, 100.0, [220, 40, 40]);     // red
        }
        let path = args.out_dir.join("storm_cycle.png");
        img.save(&path).with_context(|| format!("failed to save {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    // ── 2. sun_path.png ──────────────────────────────────────────────────────
    {
        let period = TAU / PHASE_RATE;
        let columns = columns_for(period, args.step)?;

        let mut record = WeatherParameters::default();
        let mut weather = Weather::new(&record);
        let mut img = canvas(columns);
        for x in 0..columns {
            weather.tick(args.step, &mut record);
            let sun = weather.sun();
            plot(&mut img, x, sun.altitude, -90.0, 90.0, [240, 160, 0]); // amber
            plot(&mut img, x, sun.azimuth, 0.0, 360.0, [60, 60, 200]);   // indigo
        }
        let path = args.out_dir.join("sun_path.png");
        img.save(&path).with_context(|| format!("failed to save {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_fits_both_charts() {
        assert_eq!(columns_for(2.0 * 350.0 / 1.3, 1.0).unwrap(), 539);
        assert_eq!(columns_for(TAU / PHASE_RATE, 1.0).unwrap(), 786);
    }

    #[test]
    fn tiny_step_is_rejected() {
        let err = columns_for(TAU / PHASE_RATE, 1e-9).unwrap_err();
        assert!(err.to_string().contains("--step"), "{err}");
    }
}
