//! Static weather overlay: named sun and weather presets plus per-field
//! overrides.
//!
//! Presets are closed enums with a total table function. Names are parsed
//! once at the boundary (`FromStr`); an unknown name fails before any field
//! is written. Application order is sun preset → weather preset → overrides,
//! last write wins field by field.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, PresetKind, Result};
use crate::params::WeatherParameters;

// ── Sun presets ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SunPreset {
    Day,
    Night,
    Sunset,
}

/// Sun position for a preset, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub altitude: f32,
    pub azimuth: f32,
}

impl SunPreset {
    pub const ALL: [SunPreset; 3] = [SunPreset::Day, SunPreset::Night, SunPreset::Sunset];

    pub fn name(self) -> &'static str {
        match self {
            SunPreset::Day => "day",
            SunPreset::Night => "night",
            SunPreset::Sunset => "sunset",
        }
    }

    pub fn position(self) -> SunPosition {
        let (altitude, azimuth) = match self {
            SunPreset::Day => (45.0, 0.0),
            SunPreset::Night => (-90.0, 0.0),
            SunPreset::Sunset => (0.5, 0.0),
        };
        SunPosition { altitude, azimuth }
    }
}

impl FromStr for SunPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SunPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownPreset { kind: PresetKind::Sun, name: s.to_string() })
    }
}

pub fn apply_sun_preset(preset: SunPreset, record: &mut WeatherParameters) {
    let pos = preset.position();
    record.sun_altitude_angle = pos.altitude;
    record.sun_azimuth_angle = pos.azimuth;
}

// ── Weather presets ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherPreset {
    Clear,
    Overcast,
    Rain,
}

/// The eleven atmosphere fields a weather preset sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherValues {
    pub cloudiness: f32,
    pub precipitation: f32,
    pub precipitation_deposits: f32,
    pub wind_intensity: f32,
    pub fog_density: f32,
    pub fog_distance: f32,
    pub fog_falloff: f32,
    pub wetness: f32,
    pub scattering_intensity: f32,
    pub mie_scattering_scale: f32,
    pub rayleigh_scattering_scale: f32,
}

impl WeatherPreset {
    pub const ALL: [WeatherPreset; 3] =
        [WeatherPreset::Clear, WeatherPreset::Overcast, WeatherPreset::Rain];

    pub fn name(self) -> &'static str {
        match self {
            WeatherPreset::Clear => "clear",
            WeatherPreset::Overcast => "overcast",
            WeatherPreset::Rain => "rain",
        }
    }

    pub fn values(self) -> WeatherValues {
        let v: [f32; 11] = match self {
            WeatherPreset::Clear => [10.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 0.0331],
            WeatherPreset::Overcast => [80.0, 0.0, 0.0, 50.0, 2.0, 0.75, 0.1, 10.0, 0.0, 0.03, 0.0331],
            WeatherPreset::Rain => [100.0, 80.0, 90.0, 100.0, 7.0, 0.75, 0.1, 100.0, 0.0, 0.03, 0.0331],
        };
        WeatherValues {
            cloudiness: v[0],
            precipitation: v[1],
            precipitation_deposits: v[2],
            wind_intensity: v[3],
            fog_density: v[4],
            fog_distance: v[5],
            fog_falloff: v[6],
            wetness: v[7],
            scattering_intensity: v[8],
            mie_scattering_scale: v[9],
            rayleigh_scattering_scale: v[10],
        }
    }
}

impl FromStr for WeatherPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        WeatherPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownPreset { kind: PresetKind::Weather, name: s.to_string() })
    }
}

pub fn apply_weather_preset(preset: WeatherPreset, record: &mut WeatherParameters) {
    let v = preset.values();
    record.cloudiness = v.cloudiness;
    record.precipitation = v.precipitation;
    record.precipitation_deposits = v.precipitation_deposits;
    record.wind_intensity = v.wind_intensity;
    record.fog_density = v.fog_density;
    record.fog_distance = v.fog_distance;
    record.fog_falloff = v.fog_falloff;
    record.wetness = v.wetness;
    record.scattering_intensity = v.scattering_intensity;
    record.mie_scattering_scale = v.mie_scattering_scale;
    record.rayleigh_scattering_scale = v.rayleigh_scattering_scale;
}

// ── Per-field overrides ──────────────────────────────────────────────────────

/// Explicit values that take precedence over any preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherOverrides {
    pub azimuth: Option<f32>,
    pub altitude: Option<f32>,
    pub clouds: Option<f32>,
    pub rain: Option<f32>,
    pub puddles: Option<f32>,
    pub wind: Option<f32>,
    pub fog: Option<f32>,
    pub fog_distance: Option<f32>,
    pub fog_falloff: Option<f32>,
    pub wetness: Option<f32>,
    pub scattering_intensity: Option<f32>,
    pub mie_scattering_scale: Option<f32>,
    pub rayleigh_scattering_scale: Option<f32>,
}

pub fn apply_weather_values(overrides: &WeatherOverrides, record: &mut WeatherParameters) {
    fn set(slot: &mut f32, value: Option<f32>) {
        if let Some(v) = value {
            *slot = v;
        }
    }
    set(&mut record.sun_azimuth_angle, overrides.azimuth);
    set(&mut record.sun_altitude_angle, overrides.altitude);
    set(&mut record.cloudiness, overrides.clouds);
    set(&mut record.precipitation, overrides.rain);
    set(&mut record.precipitation_deposits, overrides.puddles);
    set(&mut record.wind_intensity, overrides.wind);
    set(&mut record.fog_density, overrides.fog);
    set(&mut record.fog_distance, overrides.fog_distance);
    set(&mut record.fog_falloff, overrides.fog_falloff);
    set(&mut record.wetness, overrides.wetness);
    set(&mut record.scattering_intensity, overrides.scattering_intensity);
    set(&mut record.mie_scattering_scale, overrides.mie_scattering_scale);
    set(&mut record.rayleigh_scattering_scale, overrides.rayleigh_scattering_scale);
}

// ── Scene ────────────────────────────────────────────────────────────────────

/// A full static overlay: optional presets plus overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub sun: Option<SunPreset>,
    pub weather: Option<WeatherPreset>,
    pub overrides: WeatherOverrides,
}

impl Scene {
    /// Parse the preset names a user typed. Either name may be absent.
    pub fn parse(sun: Option<&str>, weather: Option<&str>, overrides: WeatherOverrides) -> Result<Self> {
        Ok(Self {
            sun: sun.map(str::parse::<SunPreset>).transpose()?,
            weather: weather.map(str::parse::<WeatherPreset>).transpose()?,
            overrides,
        })
    }

    pub fn apply(&self, record: &mut WeatherParameters) {
        if let Some(sun) = self.sun {
            apply_sun_preset(sun, record);
        }
        if let Some(weather) = self.weather {
            apply_weather_preset(weather, record);
        }
        apply_weather_values(&self.overrides, record);
    }
}

/// Validate names, then apply sun preset, weather preset and overrides in
/// that order. On an unknown name the record is left untouched.
pub fn apply_scene(
    record: &mut WeatherParameters,
    sun: Option<&str>,
    weather: Option<&str>,
    overrides: &WeatherOverrides,
) -> Result<Scene> {
    let scene = Scene::parse(sun, weather, *overrides)?;
    scene.apply(record);
    Ok(scene)
}
