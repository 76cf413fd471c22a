//! Weather control CLI: applies sun/weather presets, per-field overrides and
//! light settings to a weather record, optionally runs the dynamic weather
//! model, and prints the resulting scene plan as JSON for the simulator
//! driver to push.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use sky_core::lights::{
    apply_lights_manager, light_mask, parse_light_commands, LightCommand, LightGroup, LightLog, LightOp,
    VehicleLightState,
};
use sky_core::presets::{Scene, SunPreset, WeatherOverrides, WeatherPreset};
use sky_core::session::{DynamicSession, SessionConfig};
use sky_core::WeatherParameters;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "weather", about = "Set static or dynamic weather for a simulator session")]
struct Args {
    /// Sun position preset: day | night | sunset
    #[arg(short, long)]
    sun: Option<String>,

    /// Weather preset: clear | overcast | rain
    #[arg(short, long)]
    weather: Option<String>,

    /// Sun azimuth angle in degrees
    #[arg(long, allow_negative_numbers = true)]
    azimuth: Option<f32>,

    /// Sun altitude angle in degrees
    #[arg(long, allow_negative_numbers = true)]
    altitude: Option<f32>,

    /// Cloudiness, 0-100
    #[arg(long)]
    clouds: Option<f32>,

    /// Precipitation, 0-100
    #[arg(long)]
    rain: Option<f32>,

    /// Precipitation deposits (puddles), 0-100
    #[arg(long)]
    puddles: Option<f32>,

    /// Wind intensity, 0-100
    #[arg(long)]
    wind: Option<f32>,

    /// Fog density, 0-100
    #[arg(long)]
    fog: Option<f32>,

    /// Fog start distance in metres
    #[arg(long)]
    fogdist: Option<f32>,

    /// Fog falloff
    #[arg(long)]
    fogfalloff: Option<f32>,

    /// Surface wetness, 0-100
    #[arg(long)]
    wetness: Option<f32>,

    /// Scattering intensity
    #[arg(long)]
    scatteringintensity: Option<f32>,

    /// Mie scattering scale
    #[arg(long)]
    miescatteringscale: Option<f32>,

    /// Rayleigh scattering scale
    #[arg(long)]
    rayleighscatteringscale: Option<f32>,

    /// Vehicle light states to switch on, e.g. Position LowBeam
    #[arg(long, num_args = 1..)]
    cars: Option<Vec<String>>,

    /// Light commands: on | off | intensity N | color R G B
    #[arg(long, num_args = 1..)]
    lights: Option<Vec<String>>,

    /// Light group the light commands target: None | Street | Building | Other
    #[arg(long)]
    lightgroup: Option<String>,

    /// Starting weather record (JSON). Defaults to a neutral record.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Dynamic session config (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// World ticks to run the dynamic weather model for (0 = static only)
    #[arg(long, default_value = "0")]
    ticks: usize,

    /// Simulated seconds per world tick
    #[arg(long, default_value = "0.05")]
    delta: f64,

    /// Weather speed factor, overrides the config file
    #[arg(long)]
    speed: Option<f64>,

    /// Write the scene plan here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> WeatherOverrides {
        WeatherOverrides {
            azimuth: self.azimuth,
            altitude: self.altitude,
            clouds: self.clouds,
            rain: self.rain,
            puddles: self.puddles,
            wind: self.wind,
            fog: self.fog,
            fog_distance: self.fogdist,
            fog_falloff: self.fogfalloff,
            wetness: self.wetness,
            scattering_intensity: self.scatteringintensity,
            mie_scattering_scale: self.miescatteringscale,
            rayleigh_scattering_scale: self.rayleighscatteringscale,
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ScenePlan {
    weather: WeatherParameters,
    scene: Scene,
    vehicle_lights: Option<VehicleLightState>,
    light_group: Option<LightGroup>,
    light_commands: Vec<LightCommand>,
    light_ops: Vec<LightOp>,
    weather_updates: usize,
    summary: Option<String>,
}

// ── Validation ───────────────────────────────────────────────────────────────

fn not_known(flag: &str, value: &str) -> anyhow::Error {
    anyhow!("Command [{flag}] '{value}' not known")
}

/// Parse every name the user typed before anything is applied.
fn parse_scene(args: &Args) -> Result<Scene> {
    let sun = args
        .sun
        .as_deref()
        .map(|s| s.parse::<SunPreset>().map_err(|_| not_known("--sun | -s", s)))
        .transpose()?;
    let weather = args
        .weather
        .as_deref()
        .map(|s| s.parse::<WeatherPreset>().map_err(|_| not_known("--weather | -w", s)))
        .transpose()?;
    Ok(Scene { sun, weather, overrides: args.overrides() })
}

fn parse_car_lights(args: &Args) -> Result<Option<VehicleLightState>> {
    let Some(names) = &args.cars else { return Ok(None) };
    for name in names {
        name.parse::<VehicleLightState>().map_err(|_| not_known("--cars", name))?;
    }
    Ok(Some(light_mask(names.as_slice())?))
}

fn parse_lights(args: &Args) -> Result<(Option<LightGroup>, Vec<LightCommand>)> {
    let Some(tokens) = &args.lights else { return Ok((None, Vec::new())) };
    let group = match args.lightgroup.as_deref() {
        Some(name) => name.parse::<LightGroup>().map_err(|_| not_known("--lightgroup", name))?,
        None => LightGroup::None,
    };
    let commands = parse_light_commands(tokens.as_slice())?;
    Ok((Some(group), commands))
}

/// Replay the light commands against one stand-in light per group, so the
/// plan shows how many lights each command would reach.
fn dry_run_lights(group: LightGroup, commands: &[LightCommand]) -> Vec<LightOp> {
    let mut log = LightLog::new();
    for g in [LightGroup::Street, LightGroup::Building, LightGroup::Other] {
        log.add_light(g);
    }
    apply_lights_manager(commands, group, &mut log);
    log.ops
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn run(args: Args) -> Result<()> {
    let scene = parse_scene(&args)?;
    let vehicle_lights = parse_car_lights(&args)?;
    let (light_group, light_commands) = parse_lights(&args)?;
    let light_ops = dry_run_lights(light_group.unwrap_or_default(), &light_commands);

    let mut record = match &args.input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            WeatherParameters::from_json(&text)
                .with_context(|| format!("cannot parse {}", path.display()))?
        }
        None => WeatherParameters::default(),
    };

    scene.apply(&mut record);
    info!("applied scene: sun={:?} weather={:?}", scene.sun, scene.weather);

    let mut weather_updates = 0;
    let mut summary = None;
    if args.ticks > 0 {
        let mut config = match &args.config {
            Some(path) => SessionConfig::load(path)
                .with_context(|| format!("cannot load session config {}", path.display()))?,
            None => SessionConfig::default(),
        };
        if let Some(speed) = args.speed {
            config.speed_factor = speed;
        }
        let mut session = DynamicSession::new(config, &record)?;
        weather_updates = session.run_fixed(args.ticks, args.delta, &mut record);
        info!("{} ticks, {} weather updates: {}", args.ticks, weather_updates, session.weather());
        summary = Some(session.weather().to_string());
    }

    let plan = ScenePlan {
        weather: record,
        scene,
        vehicle_lights,
        light_group,
        light_commands,
        light_ops,
        weather_updates,
        summary,
    };
    let json = serde_json::to_string_pretty(&plan)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n").with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        println!("[ERROR]: {e:#}");
        process::exit(1);
    }
}
