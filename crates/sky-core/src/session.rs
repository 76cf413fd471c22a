//! World-tick driver for the dynamic weather model.
//!
//! The simulator calls [`DynamicSession::on_world_tick`] once per world
//! step. Elapsed time accumulates until it passes the update frequency; then
//! the weather advances by `speed_factor × elapsed` and the record is
//! rewritten. Between updates the record is left alone so the simulator is
//! not flooded with identical weather pushes.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dynamic::Weather;
use crate::error::{Error, Result};
use crate::params::WeatherParameters;

/// Base interval between weather updates at `speed_factor = 1`, in seconds.
pub const BASE_UPDATE_INTERVAL: f64 = 0.1;

/// Tunables for a dynamic weather session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Multiplier on simulated time. 1.0 = real rate.
    pub speed_factor: f64,
    /// Seconds of simulated time between weather updates.
    /// Defaults to `0.1 / speed_factor`.
    pub update_freq: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { speed_factor: 1.0, update_freq: None }
    }
}

impl SessionConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.speed_factor.is_finite() && self.speed_factor > 0.0) {
            return Err(Error::Config(format!(
                "speed_factor must be a positive number, got {}",
                self.speed_factor
            )));
        }
        if let Some(freq) = self.update_freq {
            if !(freq.is_finite() && freq > 0.0) {
                return Err(Error::Config(format!(
                    "update_freq must be a positive number, got {freq}"
                )));
            }
        }
        Ok(())
    }

    pub fn effective_update_freq(&self) -> f64 {
        self.update_freq.unwrap_or(BASE_UPDATE_INTERVAL / self.speed_factor)
    }
}

/// A running weather model plus the time accumulator that throttles it.
#[derive(Debug, Clone)]
pub struct DynamicSession {
    weather: Weather,
    speed_factor: f64,
    update_freq: f64,
    elapsed: f64,
    updates: u64,
}

impl DynamicSession {
    /// Start a session seeded from `record`. The config is validated here.
    pub fn new(config: SessionConfig, record: &WeatherParameters) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            weather: Weather::new(record),
            speed_factor: config.speed_factor,
            update_freq: config.effective_update_freq(),
            elapsed: 0.0,
            updates: 0,
        })
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    /// Number of weather updates applied so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Feed one world step. Returns `true` when `record` was rewritten.
    pub fn on_world_tick(&mut self, delta_seconds: f64, record: &mut WeatherParameters) -> bool {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.elapsed += delta_seconds;
        }
        if self.elapsed <= self.update_freq {
            return false;
        }
        self.weather.tick(self.speed_factor * self.elapsed, record);
        self.elapsed = 0.0;
        self.updates += 1;
        debug!("weather update {}: {}", self.updates, self.weather);
        true
    }

    /// Drive `steps` world ticks of `delta_seconds` each.
    /// Returns how many of them produced a weather update.
    pub fn run_fixed(&mut self, steps: usize, delta_seconds: f64, record: &mut WeatherParameters) -> usize {
        (0..steps).filter(|_| self.on_world_tick(delta_seconds, record)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_update_freq_scales_with_speed() {
        let c = SessionConfig { speed_factor: 4.0, update_freq: None };
        assert!((c.effective_update_freq() - 0.025).abs() < 1e-12);
        let c = SessionConfig { speed_factor: 4.0, update_freq: Some(1.0) };
        assert_eq!(c.effective_update_freq(), 1.0);
    }

    #[test]
    fn rejects_bad_config() {
        assert!(SessionConfig { speed_factor: 0.0, update_freq: None }.validate().is_err());
        assert!(SessionConfig { speed_factor: f64::NAN, update_freq: None }.validate().is_err());
        assert!(SessionConfig { speed_factor: 1.0, update_freq: Some(-1.0) }.validate().is_err());
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn updates_only_after_interval_elapses() {
        let config = SessionConfig { speed_factor: 1.0, update_freq: Some(0.5) };
        let mut record = WeatherParameters::default();
        let mut session = DynamicSession::new(config, &record).unwrap();

        assert!(!session.on_world_tick(0.2, &mut record));
        assert!(!session.on_world_tick(0.2, &mut record));
        assert_eq!(record, WeatherParameters::default());

        assert!(session.on_world_tick(0.2, &mut record));
        assert_eq!(session.updates(), 1);
        // 0.6 s elapsed at 0.25°/s.
        assert!((record.sun_azimuth_angle - 0.15).abs() < 1e-6);
    }

    #[test]
    fn speed_factor_scales_weather_time() {
        let config = SessionConfig { speed_factor: 10.0, update_freq: Some(0.5) };
        let mut record = WeatherParameters::default();
        let mut session = DynamicSession::new(config, &record).unwrap();
        let n = session.run_fixed(3, 0.2, &mut record);
        assert_eq!(n, 1);
        // 0.6 s × 10 at 0.25°/s.
        assert!((record.sun_azimuth_angle - 1.5).abs() < 1e-5);
    }

    #[test]
    fn run_fixed_counts_updates() {
        let mut record = WeatherParameters::default();
        let mut session = DynamicSession::new(SessionConfig::default(), &record).unwrap();
        // 0.05 s steps against a 0.1 s interval: every third step crosses it.
        let n = session.run_fixed(30, 0.05, &mut record);
        assert_eq!(n, 10);
        assert_eq!(session.updates(), 10);
    }

    #[test]
    fn invalid_deltas_do_not_accumulate() {
        let config = SessionConfig { speed_factor: 1.0, update_freq: Some(0.5) };
        let mut record = WeatherParameters::default();
        let mut session = DynamicSession::new(config, &record).unwrap();
        assert!(!session.on_world_tick(-10.0, &mut record));
        assert!(!session.on_world_tick(f64::NAN, &mut record));
        assert!(!session.on_world_tick(0.4, &mut record));
    }

    #[test]
    fn loads_config_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "speed_factor": 2.0 }}"#).unwrap();
        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.speed_factor, 2.0);
        assert_eq!(config.update_freq, None);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "speed_factor": -1.0 }}"#).unwrap();
        assert!(matches!(SessionConfig::load(file.path()), Err(Error::Config(_))));
    }
}
