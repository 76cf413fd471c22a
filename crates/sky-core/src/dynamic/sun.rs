//! Day/night sun cycle.
//!
//! A single sinusoid drives altitude; azimuth turns at its own constant rate.
//! The two clocks are independent, which keeps the cycle plausible without
//! any ephemeris computation.

use std::fmt;

use super::{sanitize_delta, wrap_degrees, wrap_phase};

/// Phase advance per simulated second, in radians.
pub const PHASE_RATE: f64 = 0.008;
/// Azimuth advance per simulated second, in degrees.
pub const AZIMUTH_RATE: f64 = 0.25;
/// Peak deviation of altitude from its midline, in degrees.
pub const ALTITUDE_AMPLITUDE: f64 = 70.0;
/// Altitude midline, in degrees.
pub const ALTITUDE_OFFSET: f64 = -20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    /// Degrees, in `[0, 360)` after the first tick.
    pub azimuth: f64,
    /// Degrees, in `[-90, 50]` after the first tick.
    pub altitude: f64,
    t: f64,
}

impl Sun {
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self { azimuth, altitude, t: 0.0 }
    }

    /// Current phase in radians, `[0, 2π)`.
    pub fn phase(&self) -> f64 {
        self.t
    }

    pub fn tick(&mut self, delta_seconds: f64) {
        let dt = sanitize_delta(delta_seconds);
        self.t = wrap_phase(self.t + PHASE_RATE * dt);
        self.azimuth = wrap_degrees(self.azimuth + AZIMUTH_RATE * dt);
        self.altitude = altitude_at(self.t);
    }
}

/// Altitude for a given phase: `70·sin(t) − 20`.
pub fn altitude_at(phase: f64) -> f64 {
    ALTITUDE_AMPLITUDE * phase.sin() + ALTITUDE_OFFSET
}

impl fmt::Display for Sun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sun(alt: {:.2}, azm: {:.2})", self.altitude, self.azimuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::TAU;

    #[test]
    fn first_tick_recomputes_altitude_from_phase() {
        let mut sun = Sun::new(0.0, 2.5);
        sun.tick(10.0);
        assert_abs_diff_eq!(sun.phase(), 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(sun.azimuth, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sun.altitude, 70.0 * 0.08_f64.sin() - 20.0, epsilon = 1e-12);
    }

    /// Azimuth and altitude stay in range for arbitrary non-negative steps.
    #[test]
    fn random_steps_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sun = Sun::new(359.0, 45.0);
        for _ in 0..10_000 {
            sun.tick(rng.gen_range(0.0..500.0));
            assert!(
                (0.0..360.0).contains(&sun.azimuth),
                "azimuth {} outside [0, 360)",
                sun.azimuth
            );
            assert!(
                (-90.0..=50.0).contains(&sun.altitude),
                "altitude {} outside [-90, 50]",
                sun.altitude
            );
            assert!((0.0..TAU).contains(&sun.phase()));
        }
    }

    #[test]
    fn azimuth_wraps_past_360() {
        let mut sun = Sun::new(350.0, 0.0);
        sun.tick(80.0); // +20°
        assert_abs_diff_eq!(sun.azimuth, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn out_of_range_seed_azimuth_is_wrapped_on_first_tick() {
        let mut sun = Sun::new(-90.0, 0.0);
        sun.tick(0.0);
        assert_abs_diff_eq!(sun.azimuth, 270.0, epsilon = 1e-9);
    }

    /// One full phase period returns altitude to where it started.
    #[test]
    fn altitude_is_periodic() {
        let mut sun = Sun::new(0.0, 0.0);
        sun.tick(37.0);
        let before = sun.altitude;
        sun.tick(TAU / PHASE_RATE);
        assert_abs_diff_eq!(sun.altitude, before, epsilon = 1e-9);
    }

    #[test]
    fn peak_and_trough_match_band() {
        assert_abs_diff_eq!(altitude_at(TAU / 4.0), 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(altitude_at(3.0 * TAU / 4.0), -90.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_delta_is_treated_as_zero() {
        let mut sun = Sun::new(100.0, 0.0);
        sun.tick(-50.0);
        assert_eq!(sun.phase(), 0.0);
        assert_eq!(sun.azimuth, 100.0);
    }

    #[test]
    fn display_has_two_decimals() {
        let sun = Sun::new(12.5, -3.0);
        assert_eq!(sun.to_string(), "Sun(alt: -3.00, azm: 12.50)");
    }
}
