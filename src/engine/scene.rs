// Scene driver: owns the generated world and the agent.
//
// Calls the maze generator and the terrain mesher at startup, the collision
// resolver every frame. The maze and the obstacle index are rebuilt together
// and swapped by value, so the resolver never sees a half-built index.

use glam::{Mat4, Vec2, Vec3};

use super::collision::{self, Agent};
use super::config::{AppConfig, MazeConfig, SceneObject, TerrainConfig};
use super::error::{ConfigError, WorldError};
use super::heightfield::HeightField;
use super::maze::{self, MazeGrid};
use super::mesh::{self, TerrainMesh};
use super::obstacles::ObstacleIndex;

/// Seed for the procedural terrain; terrain is not regenerated with the maze.
const TERRAIN_SEED: u64 = 0x5EED_0F_600D;

pub struct Scene {
    maze_config: MazeConfig,
    maze: MazeGrid,
    obstacles: ObstacleIndex,
    terrain: TerrainMesh,
    objects: Vec<SceneObject>,
    agent: Agent,
}

impl Scene {
    /// Build the maze, terrain and obstacle index and place the agent on the
    /// maze's start cell.
    ///
    /// Out-of-range maze size or tessellation step falls back to the default
    /// value with a warning. A heightmap that cannot be loaded aborts.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut maze_config = config.maze.clone();
        let seed = maze_config.seed.unwrap_or_else(maze::entropy_seed);
        let maze = match maze::generate(maze_config.width, maze_config.height, seed) {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("{e}; falling back to the default maze size");
                let defaults = MazeConfig::default();
                maze_config.width = defaults.width;
                maze_config.height = defaults.height;
                maze::generate(defaults.width, defaults.height, seed)?
            }
        };
        log::info!(
            "generated {}x{} maze with seed {seed} ({} walls)",
            maze.width(),
            maze.height(),
            maze.wall_count()
        );

        let terrain = build_terrain(&config.terrain)?;

        let (sx, sy) = maze.start();
        let start = maze.cell_world_position(sx, sy, maze_config.cell_scale);
        let agent = Agent::new(
            Vec3::new(start.x, 0.0, start.y),
            config.agent.radius,
            config.agent.eye_height,
        );

        let mut scene = Self {
            maze_config,
            maze,
            obstacles: ObstacleIndex::default(),
            terrain,
            objects: Vec::new(),
            agent,
        };
        scene.set_objects(config.objects.clone());
        Ok(scene)
    }

    /// Carve a new maze with `seed` and swap in a matching obstacle index.
    ///
    /// The agent stays where it is, even if a new wall now covers it. While
    /// it overlaps that wall, `update` lets it walk out in any direction that
    /// does not touch another obstacle.
    pub fn regenerate(&mut self, seed: u64) -> Result<(), WorldError> {
        let maze = maze::generate(self.maze_config.width, self.maze_config.height, seed)?;
        let obstacles = ObstacleIndex::build(
            &maze,
            self.maze_config.cell_scale,
            &solid_footprints(&self.objects),
        );
        log::info!("regenerated maze with seed {seed} ({} walls)", maze.wall_count());
        self.maze = maze;
        self.obstacles = obstacles;
        Ok(())
    }

    /// Replace the scene props. Non-solid props are kept for drawing but do
    /// not block movement.
    pub fn set_objects(&mut self, objects: Vec<SceneObject>) {
        self.obstacles = ObstacleIndex::build(
            &self.maze,
            self.maze_config.cell_scale,
            &solid_footprints(&objects),
        );
        self.objects = objects;
    }

    /// Move the agent by `desired_delta` (XZ), resolved against the obstacles.
    pub fn update(&mut self, desired_delta: Vec2) -> Vec3 {
        self.agent.position = collision::resolve(&self.obstacles, &self.agent, desired_delta);
        self.agent.position
    }

    /// One transform per wall cube.
    pub fn wall_transforms(&self) -> Vec<Mat4> {
        self.maze.wall_transforms(self.maze_config.cell_scale, self.maze_config.elevation)
    }

    /// XZ direction from the entrance opening to the start cell, i.e. facing
    /// into the maze.
    pub fn start_facing(&self) -> Vec2 {
        let (sx, sy) = self.maze.start();
        let (ex, ey) = self.maze.entrance();
        let scale = self.maze_config.cell_scale;
        self.maze.cell_world_position(sx, sy, scale) - self.maze.cell_world_position(ex, ey, scale)
    }

    pub fn maze(&self) -> &MazeGrid { &self.maze }
    pub fn obstacles(&self) -> &ObstacleIndex { &self.obstacles }
    pub fn terrain(&self) -> &TerrainMesh { &self.terrain }
    pub fn objects(&self) -> &[SceneObject] { &self.objects }
    pub fn agent(&self) -> &Agent { &self.agent }
    pub fn seed(&self) -> u64 { self.maze.seed() }
}

/// XZ footprints of the props that block movement.
fn solid_footprints(objects: &[SceneObject]) -> Vec<(Vec2, f32)> {
    objects
        .iter()
        .filter(|o| o.solid)
        .map(|o| (Vec2::new(o.position.x, o.position.z), o.half_extent))
        .collect()
}

fn build_terrain(config: &TerrainConfig) -> Result<TerrainMesh, ConfigError> {
    let field = match &config.heightmap {
        Some(path) => HeightField::load(path)?,
        None => HeightField::procedural(config.resolution, TERRAIN_SEED)?,
    };

    let params = config.tessellation();
    match mesh::build_terrain_mesh(&field, &params) {
        Ok(mesh) => Ok(mesh),
        Err(e @ WorldError::InvalidStep { .. }) => {
            log::warn!("{e}; falling back to step 1");
            Ok(mesh::build_terrain_mesh(&field, &mesh::TessellationParams { step: 1, ..params })?)
        }
        Err(e) => Err(e.into()),
    }
}
