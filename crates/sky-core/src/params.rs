//! The weather record shared with the simulator.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Atmosphere parameters read by the simulator, one record per world.
///
/// The record is owned by the caller. [`crate::Weather::tick`] and the preset
/// functions write into it through `&mut`; the simulator side reads it after
/// the tick returns. Nothing here locks: a caller must not hand the record to
/// the simulator while a tick is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherParameters {
    /// Cloud cover, 0–100.
    pub cloudiness: f32,
    /// Rain intensity, 0–100.
    pub precipitation: f32,
    /// Puddle coverage on the road, 0–100.
    pub precipitation_deposits: f32,
    /// Wind strength, 0–100.
    pub wind_intensity: f32,
    /// Fog concentration, 0–100.
    pub fog_density: f32,
    /// Fog start distance in metres.
    pub fog_distance: f32,
    /// Fog height falloff.
    pub fog_falloff: f32,
    /// Surface wetness, 0–100.
    pub wetness: f32,
    pub scattering_intensity: f32,
    pub mie_scattering_scale: f32,
    pub rayleigh_scattering_scale: f32,
    /// Sun azimuth in degrees.
    pub sun_azimuth_angle: f32,
    /// Sun altitude in degrees, -90 (midnight) to 90 (zenith).
    pub sun_altitude_angle: f32,
}

impl Default for WeatherParameters {
    fn default() -> Self {
        Self {
            cloudiness: 0.0,
            precipitation: 0.0,
            precipitation_deposits: 0.0,
            wind_intensity: 0.0,
            fog_density: 0.0,
            fog_distance: 0.0,
            fog_falloff: 0.0,
            wetness: 0.0,
            scattering_intensity: 0.0,
            mie_scattering_scale: 0.0,
            rayleigh_scattering_scale: 0.0331,
            sun_azimuth_angle: 0.0,
            sun_altitude_angle: 0.0,
        }
    }
}

impl WeatherParameters {
    /// Parse a record from JSON. Missing fields keep their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let p = WeatherParameters::from_json(r#"{"cloudiness": 30.0, "sun_altitude_angle": 2.5}"#).unwrap();
        assert_eq!(p.cloudiness, 30.0);
        assert_eq!(p.sun_altitude_angle, 2.5);
        assert_eq!(p.precipitation, 0.0);
        assert_eq!(p.rayleigh_scattering_scale, 0.0331);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(WeatherParameters::from_json("{ cloudiness: ").is_err());
    }

    #[test]
    fn json_output_is_readable_back() {
        let p = WeatherParameters { wetness: 42.5, ..WeatherParameters::default() };
        let s = p.to_json_pretty().unwrap();
        assert!(s.contains("\"wetness\": 42.5"), "{s}");
        assert_eq!(WeatherParameters::from_json(&s).unwrap(), p);
    }
}
