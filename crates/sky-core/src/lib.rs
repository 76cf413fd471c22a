//! Procedural weather model for driving a vehicle simulator's atmosphere.
//!
//! The dynamic model (`dynamic`) advances a sun and a storm cycle once per
//! simulation step and writes the result into a caller-owned
//! [`params::WeatherParameters`] record. Presets, explicit overrides and
//! light commands (`presets`, `lights`) are the discrete overlay applied at
//! the CLI boundary; `session` wraps the tick loop the way a world-tick
//! callback drives it.

pub mod dynamic;
pub mod error;
pub mod lights;
pub mod params;
pub mod presets;
pub mod session;

pub use dynamic::{Sun, Storm, Weather};
pub use error::{Error, Result};
pub use params::WeatherParameters;
