//! PLY parsing: header extraction, mesh loading and vertex filtering

mod filter;
mod header;
mod mesh_loader;

pub use filter::{FilterConfig, FilterStats, strip_white_file, strip_white_vertices};
pub use header::{
    PlyElement, PlyFormat, PlyHeader, PlyProperty, PropertyKind, RawHeader, ScalarType,
    extract_header, read_header,
};
pub use mesh_loader::load_ply_mesh;
