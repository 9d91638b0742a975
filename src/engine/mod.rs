// Engine module - world generation, collision and the pieces the app loop
// drives (camera, input, overlay)

pub mod camera;
pub mod collision;
pub mod config;
pub mod debug_overlay;
pub mod error;
pub mod heightfield;
pub mod input;
pub mod maze;
pub mod mesh;
pub mod obstacles;
pub mod scene;

// Re-export commonly used items
pub use camera::FirstPersonCamera;
pub use config::{AppConfig, DEFAULT_CONFIG_PATH};
pub use debug_overlay::{DebugOverlay, DebugStats};
pub use error::ConfigError;
pub use input::InputState;
pub use mesh::{GpuVertex, TerrainMesh};
pub use scene::Scene;
