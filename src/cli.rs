// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::config::{MappingMode, ProgramKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "meadow")]
#[command(about = "Fly through the meadow and knock over the ducks", long_about = None)]
pub struct Cli {
    /// JSON scene configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the OBJ meshes and texture maps
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Shading program used for every draw
    #[arg(long, value_enum)]
    pub program: Option<ProgramKind>,

    /// Texture-coordinate generation for the textured programs
    #[arg(long = "mapping-mode", value_enum)]
    pub mapping_mode: Option<MappingMode>,

    /// Hide the FPS readout (the win banner is always shown)
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
