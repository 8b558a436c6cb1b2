//! Validated triangle mesh with optional UV channel and base-color texture.

use crate::error::MeshError;
use crate::types::{Triangle, TriangleUv};
use glam::{Vec2, Vec3};
use image::RgbImage;
use tracing::{debug, warn};

/// A triangulated mesh ready for surface sampling.
///
/// Construction validates face indices and computes per-face areas once, so
/// every `Mesh` in circulation has at least one face and a positive total
/// surface area.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    face_areas: Vec<f64>,
    total_area: f64,
    uvs: Option<Vec<Vec2>>,
    texture: Option<RgbImage>,
}

impl Mesh {
    /// Build a mesh from vertex positions and face index triples.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if faces.is_empty() {
            return Err(MeshError::NoFaces);
        }

        let vertex_count = positions.len();
        let mut face_areas = Vec::with_capacity(faces.len());
        let mut total_area = 0.0f64;

        for (i, face) in faces.iter().enumerate() {
            for &index in face {
                if index as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        face: i,
                        index: index as i64,
                        vertex_count,
                    });
                }
            }

            let area = Triangle::new(
                positions[face[0] as usize],
                positions[face[1] as usize],
                positions[face[2] as usize],
            )
            .area();
            if !area.is_finite() {
                return Err(MeshError::NonFiniteArea { face: i });
            }
            total_area += area;
            face_areas.push(area);
        }

        if !(total_area > 0.0) {
            return Err(MeshError::ZeroArea { total: total_area });
        }

        debug!(
            "Mesh built: {} vertices, {} faces, total area {:.6}",
            vertex_count,
            faces.len(),
            total_area
        );

        Ok(Self {
            positions,
            faces,
            face_areas,
            total_area,
            uvs: None,
            texture: None,
        })
    }

    /// Attach one UV coordinate per vertex.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Result<Self, MeshError> {
        if uvs.len() != self.positions.len() {
            return Err(MeshError::UvCountMismatch {
                uvs: uvs.len(),
                vertices: self.positions.len(),
            });
        }
        self.uvs = Some(uvs);
        Ok(self)
    }

    /// Bind a base-color texture. Empty rasters are ignored.
    pub fn with_texture(mut self, texture: RgbImage) -> Self {
        if texture.width() == 0 || texture.height() == 0 {
            warn!("Ignoring empty {}x{} texture", texture.width(), texture.height());
            return self;
        }
        self.texture = Some(texture);
        self
    }

    /// Per-face surface area, in face order.
    pub fn face_areas(&self) -> &[f64] {
        &self.face_areas
    }

    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    pub fn uvs(&self) -> Option<&[Vec2]> {
        self.uvs.as_deref()
    }

    pub fn texture(&self) -> Option<&RgbImage> {
        self.texture.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Resolve the positions of face `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.faces[index];
        Triangle::new(
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        )
    }

    /// Resolve the corner UVs of face `index`, if the mesh carries UVs.
    pub fn triangle_uv(&self, index: usize) -> Option<TriangleUv> {
        let uvs = self.uvs.as_ref()?;
        let [a, b, c] = self.faces[index];
        Some(TriangleUv::new(
            uvs[a as usize],
            uvs[b as usize],
            uvs[c as usize],
        ))
    }
}
