//! Subcommand handlers.

use crate::batch::{FileMeshSource, plan_outputs, run_batch};
use crate::cli::{Command, ConvertArgs, HeaderArgs, InspectArgs, StripWhiteArgs};
use crate::errors::AppError;
use glam::Vec3;
use splatter_convert::{ConvertConfig, DecodedSplat, SplatSchema, decode_splats};
use splatter_data::{FilterConfig, extract_header, strip_white_file};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Convert(args) => convert(args),
        Command::Header(args) => header(args),
        Command::StripWhite(args) => strip_white(args),
        Command::Inspect(args) => inspect(args).map(|_| ()),
    }
}

/// `<dir>/<stem><suffix>` next to `input`.
fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}{}", stem, suffix))
}

fn convert(args: ConvertArgs) -> Result<(), AppError> {
    let jobs = plan_outputs(&args.inputs, args.output.as_deref())?;
    let sample_count = usize::try_from(args.samples)
        .map_err(|_| AppError::Config(format!("sample count {} is too large", args.samples)))?;
    let config = ConvertConfig::default()
        .with_sample_count(sample_count)
        .with_schema(args.schema.into())
        .with_opacity(args.opacity);

    info!(
        "Converting {} file(s): {} samples each, {} schema",
        jobs.len(),
        config.sample_count,
        config.schema
    );
    run_batch(&FileMeshSource, &jobs, config, args.seed)?;
    Ok(())
}

fn header(args: HeaderArgs) -> Result<(), AppError> {
    let output = args
        .output
        .unwrap_or_else(|| derived_path(&args.input, "_header.txt"));
    extract_header(&args.input, &output)?;
    Ok(())
}

fn strip_white(args: StripWhiteArgs) -> Result<(), AppError> {
    let output = args
        .output
        .unwrap_or_else(|| derived_path(&args.input, "_no_white.ply"));
    let config = FilterConfig::default()
        .with_threshold(args.threshold)
        .with_channel_threshold(args.channel_threshold);
    strip_white_file(&args.input, &output, &config)?;
    Ok(())
}

/// Aggregate figures for a decoded splat file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatSummary {
    pub count: usize,
    pub min: Vec3,
    pub max: Vec3,
    pub mean_color: [f32; 3],
}

pub fn summarize(splats: &[DecodedSplat]) -> Option<SplatSummary> {
    let first = splats.first()?;
    let mut min = first.position;
    let mut max = first.position;
    let mut color_sum = [0u64; 3];
    for splat in splats {
        min = min.min(splat.position);
        max = max.max(splat.position);
        for (sum, c) in color_sum.iter_mut().zip(splat.color) {
            *sum += u64::from(c);
        }
    }
    let n = splats.len() as f32;
    Some(SplatSummary {
        count: splats.len(),
        min,
        max,
        mean_color: color_sum.map(|s| s as f32 / n),
    })
}

fn inspect(args: InspectArgs) -> Result<Option<SplatSummary>, AppError> {
    let schema = SplatSchema::from(args.schema);
    let bytes = std::fs::read(&args.input).map_err(|source| AppError::Io {
        path: args.input.clone(),
        source,
    })?;
    let splats = decode_splats(&bytes, schema).map_err(|source| AppError::Decode {
        path: args.input.clone(),
        source,
    })?;

    let summary = summarize(&splats);
    match &summary {
        Some(s) => {
            info!("{}: {} splats ({} schema)", args.input.display(), s.count, schema);
            info!("Bounds: min {:?}, max {:?}", s.min, s.max);
            info!(
                "Mean color: [{:.1}, {:.1}, {:.1}]",
                s.mean_color[0], s.mean_color[1], s.mean_color[2]
            );
        }
        None => info!("{}: empty splat file", args.input.display()),
    }
    Ok(summary)
}
