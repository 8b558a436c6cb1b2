//! Error types for mesh construction, loading and PLY processing.

use std::path::PathBuf;
use thiserror::Error;

/// A mesh that cannot be sampled.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh has no faces")]
    NoFaces,

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: i64,
        vertex_count: usize,
    },

    #[error("face {face} has a non-finite area")]
    NonFiniteArea { face: usize },

    #[error("total surface area is {total}, expected a positive value")]
    ZeroArea { total: f64 },

    #[error("mesh has {uvs} UV coordinates for {vertices} vertices")]
    UvCountMismatch { uvs: usize, vertices: usize },
}

/// Errors raised while parsing or rewriting PLY files.
#[derive(Debug, Error)]
pub enum PlyError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("PLY header has no end_header line")]
    MissingEndHeader,

    #[error("invalid PLY header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },

    #[error("unsupported PLY layout: {0}")]
    UnsupportedLayout(String),

    #[error("missing PLY property: {0}")]
    MissingProperty(String),

    #[error("PLY parsing error: {0}")]
    Parse(String),
}

impl PlyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlyError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while turning a file into a [`crate::Mesh`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("glTF error in {path}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("texture error in {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} contains no triangle geometry")]
    NoGeometry { path: PathBuf },

    #[error("missing '{property}' at vertex {vertex}")]
    MissingVertexProperty { property: &'static str, vertex: usize },

    #[error(transparent)]
    Ply(#[from] PlyError),

    #[error("invalid mesh in {path}: {source}")]
    InvalidMesh {
        path: PathBuf,
        #[source]
        source: MeshError,
    },
}
