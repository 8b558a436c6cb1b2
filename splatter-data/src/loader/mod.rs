//! Mesh loading by file extension

mod gltf_mesh;

pub use gltf_mesh::load_gltf_mesh;

use crate::error::LoadError;
use crate::mesh::Mesh;
use crate::ply::load_ply_mesh;
use std::path::Path;

/// Mesh file formats understood by [`load_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Gltf,
    Ply,
}

impl MeshFormat {
    /// Guess the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "glb" | "gltf" => Some(MeshFormat::Gltf),
            "ply" => Some(MeshFormat::Ply),
            _ => None,
        }
    }
}

/// Load a mesh, picking the loader from the file extension.
pub fn load_mesh(path: &Path) -> Result<Mesh, LoadError> {
    match MeshFormat::from_path(path) {
        Some(MeshFormat::Gltf) => load_gltf_mesh(path),
        Some(MeshFormat::Ply) => load_ply_mesh(path),
        None => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(MeshFormat::from_path(Path::new("chair.GLB")), Some(MeshFormat::Gltf));
        assert_eq!(MeshFormat::from_path(Path::new("a/b.gltf")), Some(MeshFormat::Gltf));
        assert_eq!(MeshFormat::from_path(Path::new("scan.ply")), Some(MeshFormat::Ply));
        assert_eq!(MeshFormat::from_path(Path::new("model.obj")), None);
        assert_eq!(MeshFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_mesh_rejects_unknown_extension() {
        let err = load_mesh(Path::new("model.obj")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_mesh_missing_file_reports_path() {
        let err = load_mesh(Path::new("/nonexistent/splatter/chair.ply")).unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with("chair.ply")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
