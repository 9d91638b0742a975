// Application settings, read from `app_settings.json`.
//
// Every field has a default so a partial (or missing) file still yields a
// complete config. Range checks live in the builders that consume the values.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::mesh::TessellationParams;

pub const DEFAULT_CONFIG_PATH: &str = "app_settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub maze: MazeConfig,
    pub terrain: TerrainConfig,
    pub agent: AgentConfig,
    pub objects: Vec<SceneObject>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            maze: MazeConfig::default(),
            terrain: TerrainConfig::default(),
            agent: AgentConfig::default(),
            objects: default_objects(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Lunar Maze".to_string(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Cells along X. Odd, >= 5.
    pub width: u32,
    /// Cells along Z. Odd, >= 5.
    pub height: u32,
    /// World units per cell (also the wall cube size).
    pub cell_scale: f32,
    /// World Y of wall cube centers.
    pub elevation: f32,
    /// Fixed seed for the first maze. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 19,
            height: 19,
            cell_scale: 1.0,
            elevation: 0.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grayscale heightmap image. `None` uses a procedural field.
    pub heightmap: Option<PathBuf>,
    /// Side length of the procedural field in samples.
    pub resolution: u32,
    pub step: u32,
    pub world_scale: f32,
    pub height_scale: f32,
    pub base_height: f32,
    pub tile_factor: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let params = TessellationParams::default();
        Self {
            heightmap: None,
            resolution: 129,
            step: params.step,
            world_scale: params.world_scale,
            height_scale: params.height_scale,
            base_height: params.base_height,
            tile_factor: params.tile_factor,
        }
    }
}

impl TerrainConfig {
    pub fn tessellation(&self) -> TessellationParams {
        TessellationParams {
            step: self.step,
            world_scale: self.world_scale,
            height_scale: self.height_scale,
            base_height: self.base_height,
            tile_factor: self.tile_factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub radius: f32,
    pub eye_height: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            eye_height: 1.62,
            move_speed: 2.5,
            mouse_sensitivity: 0.1,
        }
    }
}

/// Static prop placed in the scene. Only `solid` props block the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub position: Vec3,
    pub half_extent: f32,
    pub solid: bool,
}

impl SceneObject {
    pub fn new(position: Vec3, half_extent: f32, solid: bool) -> Self {
        Self { position, half_extent, solid }
    }
}

/// Glass pillar plus a water and a lava block beside the maze.
/// Water and lava are walk-through.
pub fn default_objects() -> Vec<SceneObject> {
    vec![
        SceneObject::new(Vec3::new(9.501, 0.501, 4.5), 0.5, true),
        SceneObject::new(Vec3::new(9.501, 1.501, 4.5), 0.5, true),
        SceneObject::new(Vec3::new(9.501, 4.0, 4.5), 0.5, true),
        SceneObject::new(Vec3::new(9.501, 0.501, 2.5), 0.5, false),
        SceneObject::new(Vec3::new(9.501, 0.501, 6.5), 0.5, false),
    ]
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read settings from `path`. A missing file falls back to the built-in
    /// settings; an unreadable or malformed one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_json(&text)?;
                log::info!("loaded settings from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("{} not found, using default settings", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = AppConfig::from_json(r#"{ "maze": { "width": 21, "seed": 42 } }"#).unwrap();
        assert_eq!(config.maze.width, 21);
        assert_eq!(config.maze.height, 19);
        assert_eq!(config.maze.seed, Some(42));
        assert_eq!(config.agent, AgentConfig::default());
        assert_eq!(config.objects, default_objects());
    }

    #[test]
    fn objects_replace_the_defaults() {
        let config = AppConfig::from_json(
            r#"{ "objects": [ { "position": [1.0, 0.5, -2.0], "half_extent": 0.25, "solid": false } ] }"#,
        )
        .unwrap();
        assert_eq!(config.objects, vec![SceneObject::new(Vec3::new(1.0, 0.5, -2.0), 0.25, false)]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AppConfig::from_json(r#"{ "maze": { "width": "wide" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = AppConfig::load_or_default(Path::new("no/such/app_settings.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.objects.iter().filter(|o| o.solid).count(), 3);
    }

    #[test]
    fn terrain_section_maps_to_tessellation() {
        let config = AppConfig::from_json(r#"{ "terrain": { "step": 4, "tile_factor": 3.0 } }"#).unwrap();
        let params = config.terrain.tessellation();
        assert_eq!(params.step, 4);
        assert_eq!(params.tile_factor, 3.0);
        assert_eq!(params.world_scale, TessellationParams::default().world_scale);
    }

    #[test]
    fn round_trips_through_json() {
        let config = AppConfig::default();
        let text = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(AppConfig::from_json(&text).unwrap(), config);
    }
}
