//! Splatter Application
//!
//! Command-line front end for mesh to splat conversion.
//!
//! Features:
//! - Batch conversion of glTF/GLB/PLY meshes into .splat files
//! - Full (32-byte) and position-color (15-byte) record layouts
//! - PLY header extraction and near-white vertex filtering
//! - Summary of existing splat files

mod batch;
mod cli;
mod commands;
mod errors;
mod logging;

use clap::Parser;
use cli::Cli;
use logging::LoggingConfig;

fn main() {
    let cli = Cli::parse();
    LoggingConfig::new(cli.log_level.as_str()).init();

    if let Err(e) = commands::run(cli.command) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
