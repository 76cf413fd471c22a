//! Dynamic weather: a sun cycle and a storm cycle ticked together.
//!
//! Pipeline per tick:
//!   Sun::tick → Storm::tick → write eight fields into the caller's record.
//!
//! The two sub-models are independent, so tick order does not change the
//! result. Each tick is O(1) arithmetic with no blocking or allocation.

pub mod storm;
pub mod sun;

use std::f64::consts::TAU;
use std::fmt;

use log::warn;

use crate::params::WeatherParameters;

pub use storm::{derive_storm_fields, Storm, StormFields};
pub use sun::Sun;

// ── Numeric helpers ──────────────────────────────────────────────────────────

/// `max(min, min(value, max))`. When `min > max` the result is `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(value.min(max))
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    wrap(deg, 360.0)
}

/// Wrap a phase in radians into `[0, 2π)`.
pub fn wrap_phase(rad: f64) -> f64 {
    wrap(rad, TAU)
}

fn wrap(x: f64, modulus: f64) -> f64 {
    let r = x.rem_euclid(modulus);
    // rem_euclid of a tiny negative value rounds up to the modulus itself.
    if r >= modulus { 0.0 } else { r }
}

/// Negative or non-finite steps are treated as zero elapsed time.
pub(crate) fn sanitize_delta(delta_seconds: f64) -> f64 {
    if delta_seconds.is_finite() && delta_seconds >= 0.0 {
        delta_seconds
    } else {
        warn!("ignoring invalid weather tick delta {delta_seconds}");
        0.0
    }
}

// ── Composite ────────────────────────────────────────────────────────────────

/// Sun and storm, advanced together and written into a weather record.
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    sun: Sun,
    storm: Storm,
}

impl Weather {
    /// Seed the sun from the record's sun angles and the storm from its
    /// precipitation.
    pub fn new(record: &WeatherParameters) -> Self {
        Self {
            sun: Sun::new(record.sun_azimuth_angle as f64, record.sun_altitude_angle as f64),
            storm: Storm::new(record.precipitation as f64),
        }
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn storm(&self) -> &Storm {
        &self.storm
    }

    /// Advance both cycles by `delta_seconds` and overwrite the record.
    pub fn tick(&mut self, delta_seconds: f64, record: &mut WeatherParameters) {
        let dt = sanitize_delta(delta_seconds);
        self.sun.tick(dt);
        self.storm.tick(dt);
        self.write_to(record);
    }

    /// Write the current model state into `record`. Fields the model does not
    /// own (fog distance/falloff, scattering) are left as they are.
    pub fn write_to(&self, record: &mut WeatherParameters) {
        let s = self.storm.fields();
        record.cloudiness = s.clouds as f32;
        record.precipitation = s.rain as f32;
        record.precipitation_deposits = s.puddles as f32;
        record.wind_intensity = s.wind as f32;
        record.fog_density = s.fog as f32;
        record.wetness = s.wetness as f32;
        // Narrowing can round an azimuth just below 360 up to 360.0.
        let azimuth = self.sun.azimuth as f32;
        record.sun_azimuth_angle = if azimuth >= 360.0 { 0.0 } else { azimuth };
        record.sun_altitude_angle = self.sun.altitude as f32;
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sun, self.storm)
    }
}
