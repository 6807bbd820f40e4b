use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt, fs::File, io::BufReader, path::Path};

pub const SETTINGS_FILE: &str = "settings.json";
pub const MIN_SECONDS_PER_DAY: f32 = 1.0;

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Settings::load_or_default(SETTINGS_FILE));
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub camera: CameraSettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub size_x: i32,
    pub size_y: i32,
    pub cell_size: f32,
    pub max_floors: i32,
    pub floor_height: f32,
    pub origin: [f32; 3],
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size_x: 50,
            size_y: 50,
            cell_size: 1.0,
            max_floors: 5,
            floor_height: 4.0,
            origin: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_zoom: f32,
    pub pitch_degrees: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Keyboard yaw rate in degrees per second.
    pub rotation_speed: f32,
    pub mouse_rotate_sensitivity: f32,
    pub zoom_interpolation_speed: f32,
    pub rotation_interpolation_speed: f32,
    pub pan_interpolation_speed: f32,
    pub max_pan_velocity: f32,
    pub pan_deceleration: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_zoom: 5.0,
            max_zoom: 30.0,
            initial_zoom: 15.0,
            pitch_degrees: -50.0,
            zoom_speed: 2.0,
            pan_speed: 10.0,
            rotation_speed: 90.0,
            mouse_rotate_sensitivity: 0.2,
            zoom_interpolation_speed: 8.0,
            rotation_interpolation_speed: 8.0,
            pan_interpolation_speed: 10.0,
            max_pan_velocity: 20.0,
            pan_deceleration: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub seconds_per_day: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { seconds_per_day: 60.0 }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "could not read settings: {}", err),
            SettingsError::Parse(err) => write!(f, "malformed settings: {}", err),
        }
    }
}

impl Error for SettingsError {}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(SettingsError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = File::open(path).map_err(SettingsError::Io)?;
        serde_json::from_reader(BufReader::new(file)).map_err(SettingsError::Parse)
    }

    /// Repairs values that would break the camera or the day clock.
    pub fn sanitized(mut self) -> Self {
        let camera = &mut self.camera;
        if camera.min_zoom > camera.max_zoom {
            log::warn!("Camera min_zoom {} exceeds max_zoom {}, swapping", camera.min_zoom, camera.max_zoom);
            std::mem::swap(&mut camera.min_zoom, &mut camera.max_zoom);
        }

        let simulation = &mut self.simulation;
        if simulation.seconds_per_day.is_nan() || simulation.seconds_per_day < MIN_SECONDS_PER_DAY {
            let fallback = SimulationSettings::default().seconds_per_day;
            log::warn!("seconds_per_day {} is too short, using {}", simulation.seconds_per_day, fallback);
            simulation.seconds_per_day = fallback;
        }
        self
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Settings::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {:?}", path);
                settings.sanitized()
            }
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {:?}, using defaults", path);
                Settings::default()
            }
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Settings::default()
            }
        }
    }
}
