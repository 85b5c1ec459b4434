pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod loaders;
pub mod model;
pub mod overlay;
pub mod pipeline;
pub mod renderer;
pub mod scene;
pub mod types;

pub use camera::LookAtCamera;
pub use config::{MappingMode, ProgramKind, SceneConfig};
pub use scene::{DrawCommand, ModelSlot, Scene, DRAWS_PER_FRAME};
