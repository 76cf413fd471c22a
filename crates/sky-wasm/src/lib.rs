use wasm_bindgen::prelude::*;
use sky_core::presets::{Scene, WeatherOverrides};
use sky_core::{Weather, WeatherParameters};

/// Dynamic weather for a browser-side driver.
///
/// Holds its own record; JS reads it back with `record()` after each tick
/// and forwards it to whatever renders the sky.
#[wasm_bindgen]
pub struct DynamicWeather {
    record: WeatherParameters,
    weather: Weather,
    last_ms: Option<f64>,
}

impl DynamicWeather {
    fn from_json(record_json: &str) -> Result<Self, String> {
        let record = if record_json.trim().is_empty() {
            WeatherParameters::default()
        } else {
            WeatherParameters::from_json(record_json).map_err(|e| format!("Invalid record: {e}"))?
        };
        Ok(Self { weather: Weather::new(&record), record, last_ms: None })
    }

    fn apply_scene(&mut self, sun: Option<&str>, weather: Option<&str>) -> Result<(), String> {
        let scene = Scene::parse(sun, weather, WeatherOverrides::default()).map_err(|e| e.to_string())?;
        scene.apply(&mut self.record);
        // Presets move the sun and the rain, so the cycles restart from there.
        self.weather = Weather::new(&self.record);
        Ok(())
    }

    fn tick_at(&mut self, now_ms: f64) {
        let delta = match self.last_ms {
            Some(last) => (now_ms - last) / 1000.0,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.weather.tick(delta, &mut self.record);
    }
}

#[wasm_bindgen]
impl DynamicWeather {
    /// Create from a weather record JSON. An empty string gives a neutral record.
    #[wasm_bindgen(constructor)]
    pub fn new(record_json: &str) -> Result<DynamicWeather, JsValue> {
        Self::from_json(record_json).map_err(|e| JsValue::from_str(&e))
    }

    /// Apply named sun/weather presets and restart the cycles from the result.
    pub fn apply_presets(&mut self, sun: Option<String>, weather: Option<String>) -> Result<(), JsValue> {
        self.apply_scene(sun.as_deref(), weather.as_deref())
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Advance by an explicit step in seconds.
    pub fn tick(&mut self, delta_seconds: f64) {
        self.weather.tick(delta_seconds, &mut self.record);
    }

    /// Advance by the wall-clock time since the previous `tick_now` call.
    pub fn tick_now(&mut self) {
        self.tick_at(js_sys::Date::now());
    }

    pub fn record(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.record).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn record_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.record).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn describe(&self) -> String {
        self.weather.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_neutral_record() {
        let w = DynamicWeather::from_json("").unwrap();
        assert_eq!(w.record, WeatherParameters::default());
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = DynamicWeather::from_json("{ nope").err().unwrap();
        assert!(err.starts_with("Invalid record"), "{err}");
    }

    #[test]
    fn presets_reseed_the_storm() {
        let mut w = DynamicWeather::from_json("").unwrap();
        w.apply_scene(Some("sunset"), Some("rain")).unwrap();
        assert_eq!(w.record.sun_altitude_angle, 0.5);
        assert_eq!(w.weather.storm().progress(), 80.0);
        assert!(w.apply_scene(Some("noon"), None).is_err());
    }

    #[test]
    fn wall_clock_ticks_use_elapsed_time() {
        let mut w = DynamicWeather::from_json("").unwrap();
        w.tick_at(1_000.0);
        assert_eq!(w.record.sun_azimuth_angle, 0.0);
        w.tick_at(5_000.0);
        // 4 s at 0.25°/s.
        assert_eq!(w.record.sun_azimuth_angle, 1.0);
    }
}
