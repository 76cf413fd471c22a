//! Vehicle light masks and street/building light commands.
//!
//! The simulator owns the actual actors and lights; this module only speaks
//! to it through the [`LightManager`] and [`VehicleActor`] traits. Names and
//! command tokens are validated here so the simulator side never sees a
//! partial or malformed request.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ── Vehicle light state ──────────────────────────────────────────────────────

/// Bitmask of vehicle lights, laid out the way the simulator expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleLightState(pub u32);

impl VehicleLightState {
    pub const NONE: Self = Self(0);
    pub const POSITION: Self = Self(0x1);
    pub const LOW_BEAM: Self = Self(0x1 << 1);
    pub const HIGH_BEAM: Self = Self(0x1 << 2);
    pub const BRAKE: Self = Self(0x1 << 3);
    pub const RIGHT_BLINKER: Self = Self(0x1 << 4);
    pub const LEFT_BLINKER: Self = Self(0x1 << 5);
    pub const REVERSE: Self = Self(0x1 << 6);
    pub const FOG: Self = Self(0x1 << 7);
    pub const INTERIOR: Self = Self(0x1 << 8);
    pub const SPECIAL1: Self = Self(0x1 << 9);
    pub const SPECIAL2: Self = Self(0x1 << 10);
    pub const ALL: Self = Self(0xFFFF_FFFF);

    const NAMED: [(&'static str, Self); 13] = [
        ("None", Self::NONE),
        ("Position", Self::POSITION),
        ("LowBeam", Self::LOW_BEAM),
        ("HighBeam", Self::HIGH_BEAM),
        ("Brake", Self::BRAKE),
        ("RightBlinker", Self::RIGHT_BLINKER),
        ("LeftBlinker", Self::LEFT_BLINKER),
        ("Reverse", Self::REVERSE),
        ("Fog", Self::FOG),
        ("Interior", Self::INTERIOR),
        ("Special1", Self::SPECIAL1),
        ("Special2", Self::SPECIAL2),
        ("All", Self::ALL),
    ];

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for VehicleLightState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VehicleLightState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for VehicleLightState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMED
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, state)| state)
            .ok_or_else(|| Error::UnknownLightState(s.to_string()))
    }
}

/// OR together the named light states. An empty list gives `NONE`.
pub fn light_mask<S: AsRef<str>>(names: &[S]) -> Result<VehicleLightState> {
    names.iter().try_fold(VehicleLightState::NONE, |mask, name| {
        Ok(mask | name.as_ref().parse::<VehicleLightState>()?)
    })
}

// ── Light groups and commands ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightGroup {
    /// No filter: every light in the map.
    #[default]
    None,
    Vehicle,
    Street,
    Building,
    Other,
}

impl LightGroup {
    pub fn matches(self, light_group: LightGroup) -> bool {
        self == LightGroup::None || self == light_group
    }
}

impl FromStr for LightGroup {
    type Err = Error;

    /// Vehicle lights are driven through [`VehicleLightState`], so `Vehicle`
    /// is not a selectable group here.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "None" => Ok(LightGroup::None),
            "Street" => Ok(LightGroup::Street),
            "Building" => Ok(LightGroup::Building),
            "Other" => Ok(LightGroup::Other),
            _ => Err(Error::UnknownLightGroup(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightCommand {
    On,
    Off,
    Intensity(u32),
    Color(Color),
}

/// Parse a token stream such as `on intensity 500 color 255 0 0`.
pub fn parse_light_commands<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<LightCommand>> {
    fn operand<T: FromStr, S: AsRef<str>>(tokens: &[S], i: usize, what: &str) -> Result<T> {
        let tok = tokens
            .get(i)
            .ok_or_else(|| Error::LightCommand(format!("missing {what}")))?
            .as_ref();
        tok.parse()
            .map_err(|_| Error::LightCommand(format!("invalid {what} '{tok}'")))
    }

    let mut commands = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].as_ref() {
            "on" => commands.push(LightCommand::On),
            "off" => commands.push(LightCommand::Off),
            "intensity" => {
                commands.push(LightCommand::Intensity(operand(tokens, i + 1, "intensity value")?));
                i += 1;
            }
            "color" => {
                let r = operand(tokens, i + 1, "red channel")?;
                let g = operand(tokens, i + 2, "green channel")?;
                let b = operand(tokens, i + 3, "blue channel")?;
                commands.push(LightCommand::Color(Color { r, g, b }));
                i += 3;
            }
            other => return Err(Error::LightCommand(format!("unknown command '{other}'"))),
        }
        i += 1;
    }
    Ok(commands)
}

// ── Simulator seams ──────────────────────────────────────────────────────────

/// The simulator's light registry.
pub trait LightManager {
    type Light: Clone;

    fn get_all_lights(&self, group: LightGroup) -> Vec<Self::Light>;
    fn turn_on(&mut self, lights: &[Self::Light]);
    fn turn_off(&mut self, lights: &[Self::Light]);
    fn set_intensity(&mut self, lights: &[Self::Light], intensity: f32);
    fn set_color(&mut self, lights: &[Self::Light], color: Color);
}

/// Run `commands` in order against every light in `group`.
/// Returns the number of lights the commands were applied to.
pub fn apply_lights_manager<M: LightManager>(
    commands: &[LightCommand],
    group: LightGroup,
    manager: &mut M,
) -> usize {
    if commands.is_empty() {
        return 0;
    }
    let lights = manager.get_all_lights(group);
    for command in commands {
        match *command {
            LightCommand::On => manager.turn_on(&lights),
            LightCommand::Off => manager.turn_off(&lights),
            LightCommand::Intensity(v) => manager.set_intensity(&lights, v as f32),
            LightCommand::Color(c) => manager.set_color(&lights, c),
        }
    }
    debug!("applied {} light command(s) to {} {:?} light(s)", commands.len(), lights.len(), group);
    lights.len()
}

/// A simulator actor that may carry vehicle lights.
pub trait VehicleActor {
    /// Blueprint id, e.g. `vehicle.tesla.model3`.
    fn type_id(&self) -> &str;
    fn set_light_state(&mut self, state: VehicleLightState);
}

/// Set `state` on every vehicle among `actors`. Returns how many were set.
pub fn apply_lights_to_cars<'a, A, I>(state: VehicleLightState, actors: I) -> usize
where
    A: VehicleActor + 'a,
    I: IntoIterator<Item = &'a mut A>,
{
    let mut count = 0;
    for actor in actors {
        if actor.type_id().contains("vehicle.") {
            actor.set_light_state(state);
            count += 1;
        }
    }
    count
}

// ── In-memory registry ───────────────────────────────────────────────────────

/// One light tracked by [`LightLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedLight {
    pub id: u32,
    pub group: LightGroup,
    pub on: bool,
    pub intensity: f32,
    pub color: Color,
}

/// One operation [`LightLog`] received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightOp {
    pub command: LightCommand,
    pub lights: usize,
}

/// A [`LightManager`] without a simulator: keeps light state in memory and
/// records every operation. Used for dry runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightLog {
    pub lights: Vec<LoggedLight>,
    pub ops: Vec<LightOp>,
}

impl LightLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a light, switched off, white, zero intensity.
    pub fn add_light(&mut self, group: LightGroup) -> u32 {
        let id = self.lights.len() as u32;
        self.lights.push(LoggedLight {
            id,
            group,
            on: false,
            intensity: 0.0,
            color: Color { r: 255, g: 255, b: 255 },
        });
        id
    }

    fn update(&mut self, ids: &[u32], command: LightCommand, mut f: impl FnMut(&mut LoggedLight)) {
        for light in self.lights.iter_mut().filter(|l| ids.contains(&l.id)) {
            f(light);
        }
        self.ops.push(LightOp { command, lights: ids.len() });
    }
}

impl LightManager for LightLog {
    type Light = u32;

    fn get_all_lights(&self, group: LightGroup) -> Vec<u32> {
        self.lights.iter().filter(|l| group.matches(l.group)).map(|l| l.id).collect()
    }

    fn turn_on(&mut self, lights: &[u32]) {
        self.update(lights, LightCommand::On, |l| l.on = true);
    }

    fn turn_off(&mut self, lights: &[u32]) {
        self.update(lights, LightCommand::Off, |l| l.on = false);
    }

    fn set_intensity(&mut self, lights: &[u32], intensity: f32) {
        self.update(lights, LightCommand::Intensity(intensity as u32), |l| l.intensity = intensity);
    }

    fn set_color(&mut self, lights: &[u32], color: Color) {
        self.update(lights, LightCommand::Color(color), |l| l.color = color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Actor {
        type_id: String,
        state: Option<VehicleLightState>,
    }

    impl Actor {
        fn new(type_id: &str) -> Self {
            Self { type_id: type_id.to_string(), state: None }
        }
    }

    impl VehicleActor for Actor {
        fn type_id(&self) -> &str {
            &self.type_id
        }

        fn set_light_state(&mut self, state: VehicleLightState) {
            self.state = Some(state);
        }
    }

    #[test]
    fn mask_ors_names() {
        let mask = light_mask(&["Position", "LowBeam", "Fog"]).unwrap();
        assert_eq!(mask.bits(), 0x1 | 0x2 | 0x80);
        assert!(mask.contains(VehicleLightState::LOW_BEAM));
        assert!(!mask.contains(VehicleLightState::BRAKE));
    }

    #[test]
    fn empty_mask_is_none() {
        let names: [&str; 0] = [];
        assert!(light_mask(&names).unwrap().is_empty());
    }

    #[test]
    fn all_covers_every_named_light() {
        for (_, state) in VehicleLightState::NAMED {
            assert!(VehicleLightState::ALL.contains(state));
        }
    }

    #[test]
    fn unknown_light_name_fails() {
        let err = light_mask(&["Position", "Strobe"]).unwrap_err();
        assert!(matches!(err, Error::UnknownLightState(ref s) if s == "Strobe"));
    }

    #[test]
    fn light_group_names() {
        assert_eq!("Street".parse::<LightGroup>().unwrap(), LightGroup::Street);
        assert_eq!("None".parse::<LightGroup>().unwrap(), LightGroup::None);
        assert!("Vehicle".parse::<LightGroup>().is_err());
        assert!("street".parse::<LightGroup>().is_err());
    }

    #[test]
    fn parses_command_stream() {
        let cmds = parse_light_commands(&["on", "intensity", "500", "color", "255", "10", "0", "off"]).unwrap();
        assert_eq!(
            cmds,
            vec![
                LightCommand::On,
                LightCommand::Intensity(500),
                LightCommand::Color(Color { r: 255, g: 10, b: 0 }),
                LightCommand::Off,
            ]
        );
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_light_commands(&["intensity"]).is_err());
        assert!(parse_light_commands(&["intensity", "bright"]).is_err());
        assert!(parse_light_commands(&["color", "255", "0"]).is_err());
        assert!(parse_light_commands(&["color", "256", "0", "0"]).is_err());
        assert!(parse_light_commands(&["dim"]).is_err());
    }

    #[test]
    fn manager_commands_hit_only_the_group() {
        let mut log = LightLog::new();
        let street = log.add_light(LightGroup::Street);
        let building = log.add_light(LightGroup::Building);

        let cmds = parse_light_commands(&["on", "color", "0", "0", "255"]).unwrap();
        let n = apply_lights_manager(&cmds, LightGroup::Street, &mut log);

        assert_eq!(n, 1);
        assert!(log.lights[street as usize].on);
        assert_eq!(log.lights[street as usize].color, Color { r: 0, g: 0, b: 255 });
        assert!(!log.lights[building as usize].on);
        assert_eq!(log.ops.len(), 2);
    }

    #[test]
    fn group_none_selects_everything() {
        let mut log = LightLog::new();
        log.add_light(LightGroup::Street);
        log.add_light(LightGroup::Other);
        let n = apply_lights_manager(&[LightCommand::Intensity(80)], LightGroup::None, &mut log);
        assert_eq!(n, 2);
        assert!(log.lights.iter().all(|l| l.intensity == 80.0));
    }

    #[test]
    fn no_commands_touches_nothing() {
        let mut log = LightLog::new();
        log.add_light(LightGroup::Street);
        assert_eq!(apply_lights_manager(&[], LightGroup::None, &mut log), 0);
        assert!(log.ops.is_empty());
    }

    #[test]
    fn only_vehicles_get_light_state() {
        let mut actors = vec![
            Actor::new("vehicle.tesla.model3"),
            Actor::new("sensor.camera.rgb"),
            Actor::new("vehicle.audi.tt"),
            Actor::new("walker.pedestrian.0001"),
        ];
        let state = VehicleLightState::LOW_BEAM | VehicleLightState::POSITION;
        let n = apply_lights_to_cars(state, actors.iter_mut());
        assert_eq!(n, 2);
        assert_eq!(actors[0].state, Some(state));
        assert_eq!(actors[1].state, None);
        assert_eq!(actors[2].state, Some(state));
        assert_eq!(actors[3].state, None);
    }
}
