//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use splatter_convert::{DEFAULT_OPACITY, DEFAULT_SAMPLE_COUNT, SplatSchema};
use std::path::PathBuf;

/// Splatter - convert triangle meshes into splat point clouds
#[derive(Parser, Debug)]
#[command(name = "splatter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample mesh surfaces into .splat files
    Convert(ConvertArgs),
    /// Copy the text header of a PLY file
    Header(HeaderArgs),
    /// Drop near-white vertices from a binary PLY point cloud
    StripWhite(StripWhiteArgs),
    /// Summarize an existing .splat file
    Inspect(InspectArgs),
}

/// Output record layout
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaArg {
    /// Position, log-scale, RGBA and quantized rotation (32 bytes)
    Full,
    /// Position and RGB only (15 bytes)
    PositionColor,
}

impl From<SchemaArg> for SplatSchema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Full => SplatSchema::Full,
            SchemaArg::PositionColor => SplatSchema::PositionColor,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Mesh files to convert (.glb, .gltf, .ply)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file; only valid with a single input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of surface samples per mesh
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_COUNT as u64,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub samples: u64,

    /// Output record layout
    #[arg(long, value_enum, default_value_t = SchemaArg::Full)]
    pub schema: SchemaArg,

    /// Seed for reproducible sampling; input i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Opacity written to every splat (full schema only)
    #[arg(long, default_value_t = DEFAULT_OPACITY)]
    pub opacity: f32,
}

#[derive(Args, Debug)]
pub struct HeaderArgs {
    /// PLY file to read
    pub input: PathBuf,

    /// Destination text file [default: <stem>_header.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StripWhiteArgs {
    /// Binary little-endian PLY file to filter
    pub input: PathBuf,

    /// Destination PLY file [default: <stem>_no_white.ply]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Threshold applied to f_dc_0..2
    #[arg(long, default_value_t = 0.94)]
    pub threshold: f32,

    /// Threshold applied to red/green/blue bytes
    #[arg(long, default_value_t = 240)]
    pub channel_threshold: u8,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Splat file to read
    pub input: PathBuf,

    /// Record layout of the file
    #[arg(long, value_enum, default_value_t = SchemaArg::Full)]
    pub schema: SchemaArg,
}
