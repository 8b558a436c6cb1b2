//! Splatter Data Crate
//!
//! Mesh model and file handling for the splatter converter: validated
//! triangle meshes, glTF/PLY mesh loaders, and PLY point-cloud utilities.
//! Nothing here knows about splat records.

pub mod error;
pub mod loader;
pub mod mesh;
pub mod ply;
pub mod types;

pub use error::{LoadError, MeshError, PlyError};
pub use loader::{MeshFormat, load_gltf_mesh, load_mesh};
pub use mesh::Mesh;
pub use ply::{FilterConfig, FilterStats, extract_header, load_ply_mesh, strip_white_file};
pub use types::{Triangle, TriangleUv};
