//! Batch conversion of mesh files into splat files.

use crate::errors::AppError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use splatter_convert::{ConvertConfig, SplatConverter, write_splat_file};
use splatter_data::{LoadError, Mesh, load_mesh};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Output name used for a single input when none is given.
pub const DEFAULT_OUTPUT: &str = "output.splat";

/// Where meshes come from. Lets tests feed meshes without touching disk.
pub trait MeshSource {
    fn load(&self, path: &Path) -> Result<Mesh, LoadError>;
}

/// Loads meshes from the filesystem by extension.
pub struct FileMeshSource;

impl MeshSource for FileMeshSource {
    fn load(&self, path: &Path) -> Result<Mesh, LoadError> {
        load_mesh(path)
    }
}

/// One input file and the splat file it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

fn sibling_output(input: &Path) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".splat");
    input.with_file_name(name)
}

/// Pair every input with its output path.
pub fn plan_outputs(inputs: &[PathBuf], output: Option<&Path>) -> Result<Vec<ConvertJob>, AppError> {
    match (inputs, output) {
        ([], _) => Err(AppError::Config("no input files given".to_string())),
        ([input], output) => Ok(vec![ConvertJob {
            input: input.clone(),
            output: output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), Path::to_path_buf),
        }]),
        (_, Some(_)) => Err(AppError::Config(
            "--output can only be used with a single input".to_string(),
        )),
        (inputs, None) => Ok(inputs
            .iter()
            .map(|input| ConvertJob {
                input: input.clone(),
                output: sibling_output(input),
            })
            .collect()),
    }
}

/// Seeded generator for the `index`-th job, or an entropy-seeded one.
fn job_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

fn run_job(
    source: &dyn MeshSource,
    converter: &SplatConverter,
    job: &ConvertJob,
    rng: &mut StdRng,
) -> Result<usize, AppError> {
    let mesh = source.load(&job.input)?;
    info!(
        "Loaded {}: {} vertices, {} faces, surface area {:.4}",
        job.input.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.total_area()
    );
    let stream = converter.convert(&mesh, rng)?;
    write_splat_file(&job.output, &stream.bytes)?;
    Ok(stream.record_count())
}

/// Convert every job, continuing past failures.
///
/// Nothing is written for a job that fails. Returns the number of jobs
/// that succeeded, or [`AppError::BatchFailed`] if any did not.
pub fn run_batch(
    source: &dyn MeshSource,
    jobs: &[ConvertJob],
    config: ConvertConfig,
    seed: Option<u64>,
) -> Result<usize, AppError> {
    let converter = SplatConverter::new(config)?;
    if seed.is_none() {
        warn!("No --seed given, output will not be reproducible");
    }

    let mut failed = 0;
    for (index, job) in jobs.iter().enumerate() {
        let mut rng = job_rng(seed, index);
        match run_job(source, &converter, job, &mut rng) {
            Ok(count) => info!(
                "Converted {} -> {} ({} splats)",
                job.input.display(),
                job.output.display(),
                count
            ),
            Err(e) => {
                error!("Failed to convert {}: {}", job.input.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(AppError::BatchFailed {
            failed,
            total: jobs.len(),
        });
    }
    Ok(jobs.len())
}
