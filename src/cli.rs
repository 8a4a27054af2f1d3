// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "orbit-viewer")]
#[command(about = "Animated glTF model viewer", long_about = None)]
pub struct Cli {
    /// Model file to load
    #[arg(default_value = "models/bookanim.glb")]
    pub model: PathBuf,
}
