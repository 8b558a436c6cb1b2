//! PLY mesh loading

use super::header::{PlyHeader, read_header};
use crate::error::{LoadError, MeshError, PlyError};
use crate::mesh::Mesh;
use glam::{Vec2, Vec3};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

// Face structure for PLY files
#[derive(Deserialize, Debug)]
struct PlyFace {
    #[serde(alias = "vertex_index")]
    vertex_indices: Vec<i64>,
}

// PLY file structure
#[derive(Deserialize, Debug)]
struct PlyFile {
    #[serde(rename = "vertex")]
    vertex: Vec<HashMap<String, JsonValue>>,
    #[serde(default, rename = "face")]
    face: Vec<PlyFace>,
}

const UV_NAMES: [(&str, &str); 3] = [("s", "t"), ("u", "v"), ("texture_u", "texture_v")];

fn get_f32(prop: Option<&JsonValue>) -> Option<f32> {
    prop.and_then(|v| match v {
        JsonValue::Number(n) => n.as_f64().map(|f| f as f32),
        _ => None,
    })
}

/// Load a triangulated mesh from a PLY file.
///
/// Reads `x`/`y`/`z` positions, an optional UV pair and the `face` element.
/// Polygons are fan-triangulated. A `comment TextureFile <name>` line binds a
/// texture resolved relative to the PLY file.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_ply_mesh(path: &Path) -> Result<Mesh, LoadError> {
    debug!("Loading PLY mesh from: {}", path.display());
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let header = {
        let mut reader = BufReader::new(File::open(path).map_err(io_err)?);
        read_header(&mut reader)?.parse()?
    };

    let file = File::open(path).map_err(io_err)?;
    let ply_data: PlyFile = serde_ply::from_reader(BufReader::new(file)).map_err(|e| {
        warn!("Failed to parse PLY file: {}", e);
        PlyError::Parse(e.to_string())
    })?;

    info!(
        "PLY file parsed: {} vertices, {} faces",
        ply_data.vertex.len(),
        ply_data.face.len()
    );

    let invalid = |source| LoadError::InvalidMesh {
        path: path.to_path_buf(),
        source,
    };
    let (positions, uvs) = read_vertices(&ply_data.vertex)?;
    let faces = triangulate_faces(&ply_data.face, positions.len()).map_err(invalid)?;
    let mut mesh = Mesh::new(positions, faces).map_err(invalid)?;
    if let Some(uvs) = uvs {
        mesh = mesh.with_uvs(uvs).map_err(invalid)?;
    }
    if let Some(texture) = load_bound_texture(path, &header)? {
        mesh = mesh.with_texture(texture);
    }

    debug!(
        "Loaded mesh with {} faces (uv: {}, texture: {})",
        mesh.face_count(),
        mesh.uvs().is_some(),
        mesh.texture().is_some()
    );
    Ok(mesh)
}

type VertexData = (Vec<Vec3>, Option<Vec<Vec2>>);

fn read_vertices(rows: &[HashMap<String, JsonValue>]) -> Result<VertexData, LoadError> {
    let uv_names = rows.first().and_then(|first| {
        UV_NAMES
            .into_iter()
            .find(|(u, v)| first.contains_key(*u) && first.contains_key(*v))
    });

    let mut positions = Vec::with_capacity(rows.len());
    let mut uvs = uv_names.map(|_| Vec::with_capacity(rows.len()));

    for (i, vertex) in rows.iter().enumerate() {
        let coord = |property: &'static str| {
            get_f32(vertex.get(property))
                .ok_or(LoadError::MissingVertexProperty { property, vertex: i })
        };
        positions.push(Vec3::new(coord("x")?, coord("y")?, coord("z")?));

        if let (Some((u, v)), Some(uvs)) = (uv_names, uvs.as_mut()) {
            uvs.push(Vec2::new(coord(u)?, coord(v)?));
        }
    }

    Ok((positions, uvs))
}

fn triangulate_faces(
    faces: &[PlyFace],
    vertex_count: usize,
) -> Result<Vec<[u32; 3]>, MeshError> {
    let mut triangles = Vec::with_capacity(faces.len());
    let mut skipped = 0usize;

    for (i, face) in faces.iter().enumerate() {
        let indices = &face.vertex_indices;
        if indices.len() < 3 {
            skipped += 1;
            continue;
        }
        let mut resolved = Vec::with_capacity(indices.len());
        for &index in indices {
            match u32::try_from(index) {
                Ok(index) if (index as usize) < vertex_count => resolved.push(index),
                _ => {
                    return Err(MeshError::IndexOutOfRange {
                        face: i,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        for k in 1..resolved.len() - 1 {
            triangles.push([resolved[0], resolved[k], resolved[k + 1]]);
        }
    }

    if skipped > 0 {
        warn!("Skipped {} faces with fewer than 3 vertices", skipped);
    }
    Ok(triangles)
}

fn load_bound_texture(
    path: &Path,
    header: &PlyHeader,
) -> Result<Option<image::RgbImage>, LoadError> {
    let Some(name) = header.texture_file() else {
        return Ok(None);
    };
    let texture_path = path.parent().unwrap_or(Path::new("")).join(name);
    debug!("Loading bound texture {}", texture_path.display());
    let image = image::open(&texture_path).map_err(|source| LoadError::Texture {
        path: texture_path.clone(),
        source,
    })?;
    Ok(Some(image.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    const TEXTURED_QUAD: &str = "ply
format ascii 1.0
comment TextureFile quad.png
element vertex 4
property float x
property float y
property float z
property float s
property float t
element face 1
property list uchar int vertex_indices
end_header
0 0 0 0 0
2 0 0 1 0
2 1 0 1 1
0 1 0 0 1
4 0 1 2 3
";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("splatter-ply-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_textured_ascii_quad() {
        let dir = scratch_dir("textured");
        let mut texture = RgbImage::new(2, 1);
        texture.put_pixel(0, 0, Rgb([0, 255, 0]));
        texture.put_pixel(1, 0, Rgb([0, 0, 255]));
        texture.save(dir.join("quad.png")).unwrap();
        let path = dir.join("quad.ply");
        std::fs::write(&path, TEXTURED_QUAD).unwrap();

        let mesh = load_ply_mesh(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert!((mesh.total_area() - 2.0).abs() < 1e-9);

        let uvs = mesh.uvs().unwrap();
        assert_eq!(uvs[1], Vec2::new(1.0, 0.0));
        assert_eq!(uvs[2], Vec2::new(1.0, 1.0));

        let loaded = mesh.texture().unwrap();
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(loaded.get_pixel(1, 0).0, [0, 0, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_ply_missing_texture_file() {
        let dir = scratch_dir("missing-texture");
        let path = dir.join("quad.ply");
        std::fs::write(&path, TEXTURED_QUAD).unwrap();

        let err = load_ply_mesh(&path).unwrap_err();
        match err {
            LoadError::Texture { path, .. } => assert!(path.ends_with("quad.png")),
            other => panic!("unexpected error: {other}"),
        }
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_binary_vertex_index_alias() {
        let dir = scratch_dir("binary");
        let mut data = b"ply
format binary_little_endian 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar uint vertex_index
end_header
"
        .to_vec();
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.push(3);
        for i in [0u32, 1, 2] {
            data.extend_from_slice(&i.to_le_bytes());
        }
        let path = dir.join("tri.ply");
        std::fs::write(&path, &data).unwrap();

        let mesh = load_ply_mesh(&path).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert!((mesh.total_area() - 0.5).abs() < 1e-9);
        assert!(mesh.uvs().is_none());
        assert!(mesh.texture().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    fn face(indices: &[i64]) -> PlyFace {
        PlyFace {
            vertex_indices: indices.to_vec(),
        }
    }

    #[test]
    fn test_triangulate_fan() {
        let faces = vec![face(&[0, 1, 2, 3]), face(&[1, 2, 3])];
        let triangles = triangulate_faces(&faces, 4).unwrap();
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3], [1, 2, 3]]);
    }

    #[test]
    fn test_triangulate_skips_degenerate_polygons() {
        let faces = vec![face(&[0, 1]), face(&[0, 1, 2])];
        let triangles = triangulate_faces(&faces, 3).unwrap();
        assert_eq!(triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_triangulate_rejects_negative_index() {
        let faces = vec![face(&[0, -1, 2])];
        let err = triangulate_faces(&faces, 3).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange { index: -1, .. }
        ));
    }

    #[test]
    fn test_read_vertices_with_st() {
        let mut row = HashMap::new();
        for (k, v) in [("x", 1.0), ("y", 2.0), ("z", 3.0), ("s", 0.25), ("t", 0.75)] {
            row.insert(k.to_string(), serde_json::json!(v));
        }
        let (positions, uvs) = read_vertices(&[row]).unwrap();
        assert_eq!(positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(uvs, Some(vec![Vec2::new(0.25, 0.75)]));
    }

    #[test]
    fn test_read_vertices_missing_coordinate() {
        let mut row = HashMap::new();
        row.insert("x".to_string(), serde_json::json!(1.0));
        row.insert("y".to_string(), serde_json::json!(1.0));
        let err = read_vertices(&[row]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingVertexProperty {
                property: "z",
                vertex: 0
            }
        ));
    }
}
