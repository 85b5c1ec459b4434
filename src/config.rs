// config.rs - Scene configuration loaded from JSON, overridable from the CLI
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::{DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::cli::Cli;
use crate::model::ModelSource;
use crate::scene::ModelSlot;

pub const ASSETS_DIR_NAME: &str = "assets";

/// Shading program selected for every draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramKind {
    Phong,
    BlinnPhong,
    Texture,
    NormalMapping,
    Normal,
    Depth,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 6] = [
        ProgramKind::Phong,
        ProgramKind::BlinnPhong,
        ProgramKind::Texture,
        ProgramKind::NormalMapping,
        ProgramKind::Normal,
        ProgramKind::Depth,
    ];

    /// Fragment entry point in scene.wgsl
    pub fn entry_point(self) -> &'static str {
        match self {
            ProgramKind::Phong => "fs_phong",
            ProgramKind::BlinnPhong => "fs_blinn_phong",
            ProgramKind::Texture => "fs_texture",
            ProgramKind::NormalMapping => "fs_normal_mapping",
            ProgramKind::Normal => "fs_normal",
            ProgramKind::Depth => "fs_depth",
        }
    }
}

impl Default for ProgramKind {
    fn default() -> Self {
        ProgramKind::Texture
    }
}

/// Texture-coordinate generation strategy used by the textured programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MappingMode {
    Triplanar,
    Cylindrical,
    Spherical,
    Mesh,
}

impl MappingMode {
    /// Selector value uploaded to the shader
    pub fn index(self) -> u32 {
        match self {
            MappingMode::Triplanar => 0,
            MappingMode::Cylindrical => 1,
            MappingMode::Spherical => 2,
            MappingMode::Mesh => 3,
        }
    }
}

impl Default for MappingMode {
    fn default() -> Self {
        MappingMode::Mesh
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Meadow".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Asset file names, relative to the assets directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: Option<PathBuf>,
    pub terrain_mesh: String,
    pub terrain_texture: Option<String>,
    pub terrain_normal_texture: Option<String>,
    pub avatar_mesh: String,
    pub prop_mesh: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: None,
            terrain_mesh: "uploads_files_2671085_Weed.obj".to_string(),
            terrain_texture: Some("maps/grass-3d-model.jpg".to_string()),
            terrain_normal_texture: Some("maps/grass-3d-model.jpg".to_string()),
            avatar_mesh: "12248_Bird_v1_L2.obj".to_string(),
            prop_mesh: "10602_Rubber_Duck_v1_L3.obj".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: [f32; 3],
    pub at: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            eye: [0.0, 0.5, 2.5],
            at: [0.0, 0.5, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: [-1.0, -1.0, -1.0, 0.0],
            ambient: [1.0; 4],
            diffuse: [1.0; 4],
            specular: [1.0; 4],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub program: ProgramKind,
    pub mapping_mode: MappingMode,
    pub show_fps: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            program: ProgramKind::default(),
            mapping_mode: MappingMode::default(),
            show_fps: true,
        }
    }
}

impl SceneConfig {
    /// Parse a JSON config file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the effective config: file (if any) first, then CLI overrides
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.assets {
            self.assets.dir = Some(dir.clone());
        }
        if let Some(program) = cli.program {
            self.program = program;
        }
        if let Some(mode) = cli.mapping_mode {
            self.mapping_mode = mode;
        }
        if cli.no_ui {
            self.show_fps = false;
        }
    }

    /// Resolve the assets directory: explicit dir, then next to the executable, then ./assets
    pub fn assets_dir(&self) -> PathBuf {
        if let Some(dir) = &self.assets.dir {
            return dir.clone();
        }
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(ASSETS_DIR_NAME)));
        match beside_exe {
            Some(dir) if dir.is_dir() => dir,
            _ => PathBuf::from(ASSETS_DIR_NAME),
        }
    }

    /// Files for one model slot, resolved against the assets directory
    pub fn model_source(&self, slot: ModelSlot) -> ModelSource {
        let dir = self.assets_dir();
        let assets = &self.assets;
        match slot {
            ModelSlot::Terrain => ModelSource {
                mesh: dir.join(&assets.terrain_mesh),
                diffuse_texture: assets.terrain_texture.as_ref().map(|name| dir.join(name)),
                normal_texture: assets.terrain_normal_texture.as_ref().map(|name| dir.join(name)),
            },
            ModelSlot::Avatar => ModelSource::mesh(dir.join(&assets.avatar_mesh)),
            ModelSlot::Prop => ModelSource::mesh(dir.join(&assets.prop_mesh)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_match_scene_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.fov_degrees, 70.0);
        assert_eq!(config.lighting.direction, [-1.0, -1.0, -1.0, 0.0]);
        assert_eq!(config.program, ProgramKind::Texture);
        assert_eq!(config.mapping_mode.index(), 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "window": { "width": 1024 }, "program": "blinn-phong", "mapping_mode": "spherical" }"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.program, ProgramKind::BlinnPhong);
        assert_eq!(config.mapping_mode, MappingMode::Spherical);
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(SceneConfig::from_json("{ not json").is_err());
        assert!(SceneConfig::from_json(r#"{ "program": "gouraud" }"#).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = SceneConfig::load("/definitely/not/here/meadow.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "meadow",
            "--assets",
            "/tmp/meadow-assets",
            "--program",
            "depth",
            "--mapping-mode",
            "triplanar",
            "--no-ui",
        ]);
        let mut config = SceneConfig::default();
        assert!(config.show_fps);
        config.apply_cli(&cli);

        assert_eq!(config.assets_dir(), PathBuf::from("/tmp/meadow-assets"));
        assert_eq!(config.program, ProgramKind::Depth);
        assert_eq!(config.mapping_mode, MappingMode::Triplanar);
        assert!(!config.show_fps);
    }

    #[test]
    fn test_model_sources_resolve_against_assets_dir() {
        let mut config = SceneConfig::default();
        config.assets.dir = Some(PathBuf::from("/srv/meadow"));

        let terrain = config.model_source(ModelSlot::Terrain);
        assert_eq!(terrain.mesh, PathBuf::from("/srv/meadow/uploads_files_2671085_Weed.obj"));
        assert_eq!(
            terrain.diffuse_texture,
            Some(PathBuf::from("/srv/meadow/maps/grass-3d-model.jpg"))
        );
        assert_eq!(terrain.normal_texture, terrain.diffuse_texture);

        let prop = config.model_source(ModelSlot::Prop);
        assert_eq!(prop.mesh, PathBuf::from("/srv/meadow/10602_Rubber_Duck_v1_L3.obj"));
        assert_eq!(prop.diffuse_texture, None);
    }

    #[test]
    fn test_program_entry_points_are_distinct() {
        let mut names: Vec<_> = ProgramKind::ALL.iter().map(|p| p.entry_point()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ProgramKind::ALL.len());
    }
}
