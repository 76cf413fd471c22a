//! Storm cycle driven by one hidden progress scalar.
//!
//! Progress `t` runs up from clear skies to a peak at 100, then back down to
//! -250 and up again. Every output is a clamped affine function of `t`, so
//! clouds, rain, puddles, wetness, wind and fog stay correlated. Puddles use
//! a direction-dependent offset: they lag the rain while the storm builds and
//! linger while it recedes.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{clamp, sanitize_delta};

/// Lower bound of the progress scalar (long clear spell).
pub const PROGRESS_MIN: f64 = -250.0;
/// Upper bound of the progress scalar (storm peak).
pub const PROGRESS_MAX: f64 = 100.0;
/// Progress change per simulated second.
pub const PROGRESS_RATE: f64 = 1.3;
/// Starting progress when the seed record has no precipitation.
pub const DRY_START: f64 = -50.0;

/// Everything the storm exposes to the weather record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StormFields {
    /// `[0, 90]`
    pub clouds: f64,
    /// `[0, 80]`
    pub rain: f64,
    /// `[0, 85]`
    pub puddles: f64,
    /// `[0, 100]`
    pub wetness: f64,
    /// One of 5, 40, 90.
    pub wind: f64,
    /// `[0, 30]`
    pub fog: f64,
}

/// Derive all storm outputs from the progress scalar and cycle direction.
pub fn derive_storm_fields(t: f64, increasing: bool) -> StormFields {
    let clouds = clamp(t + 40.0, 0.0, 90.0);
    let delay = if increasing { -10.0 } else { 90.0 };
    StormFields {
        clouds,
        rain: clamp(t, 0.0, 80.0),
        puddles: clamp(t + delay, 0.0, 85.0),
        wetness: clamp(t * 5.0, 0.0, 100.0),
        wind: wind_for_clouds(clouds),
        fog: clamp(t - 10.0, 0.0, 30.0),
    }
}

/// Step function: light breeze under thin cover, gale under heavy cover.
pub fn wind_for_clouds(clouds: f64) -> f64 {
    if clouds <= 20.0 {
        5.0
    } else if clouds >= 70.0 {
        90.0
    } else {
        40.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Storm {
    t: f64,
    increasing: bool,
    fields: StormFields,
}

impl Storm {
    /// Seed from the record's precipitation. A dry record starts the cycle
    /// just before the storm builds.
    pub fn new(precipitation: f64) -> Self {
        let t = if precipitation > 0.0 { precipitation.min(PROGRESS_MAX) } else { DRY_START };
        Self { t, increasing: true, fields: StormFields::default() }
    }

    pub fn progress(&self) -> f64 {
        self.t
    }

    pub fn is_increasing(&self) -> bool {
        self.increasing
    }

    pub fn fields(&self) -> StormFields {
        self.fields
    }

    pub fn tick(&mut self, delta_seconds: f64) {
        let dt = sanitize_delta(delta_seconds);
        let rate = if self.increasing { PROGRESS_RATE } else { -PROGRESS_RATE };
        let step = rate * dt;
        self.t = clamp(self.t + step, PROGRESS_MIN, PROGRESS_MAX);

        // Outputs use the direction that produced this step.
        self.fields = derive_storm_fields(self.t, self.increasing);

        if self.t == PROGRESS_MIN && !self.increasing {
            debug!("storm cycle: clear spell bottomed out, building");
            self.increasing = true;
        }
        if self.t == PROGRESS_MAX && self.increasing {
            debug!("storm cycle: peak reached, receding");
            self.increasing = false;
        }
    }
}

impl fmt::Display for Storm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Storm(clouds={}%, rain={}%, wind={}%)",
            self.fields.clouds as i64, self.fields.rain as i64, self.fields.wind as i64
        )
    }
}
