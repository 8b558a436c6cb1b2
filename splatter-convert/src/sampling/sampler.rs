//! Area-weighted surface sampling with barycentric interpolation.

use super::distribution::FaceDistribution;
use crate::colorize::{DEFAULT_COLOR, Rgb};
use crate::error::ConvertError;
use glam::{Vec2, Vec3};
use rand::Rng;
use splatter_data::Mesh;
use tracing::debug;

/// One point drawn from a mesh surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    /// Index of the face the point was drawn from.
    pub face: usize,
    /// Barycentric weights `(b0, b1, b2)` within that face.
    pub barycentric: [f32; 3],
    pub position: Vec3,
    /// Interpolated texture coordinate, when the mesh has UVs.
    pub uv: Option<Vec2>,
    /// Resolved color; white until a colorizer runs.
    pub color: Rgb,
}

impl SampledPoint {
    /// Copy of this point with a resolved color.
    pub fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }
}

/// Map two uniform numbers in `[0, 1)` to barycentric weights.
///
/// The square root on `r1` makes the result uniform over the triangle's
/// area rather than over the `(r1, r2)` square.
pub fn barycentric(r1: f32, r2: f32) -> [f32; 3] {
    let s = r1.sqrt();
    [1.0 - s, s * (1.0 - r2), s * r2]
}

/// Draws surface points from a mesh, picking faces by area.
#[derive(Debug)]
pub struct SurfaceSampler<'m> {
    mesh: &'m Mesh,
    distribution: FaceDistribution,
}

impl<'m> SurfaceSampler<'m> {
    pub fn new(mesh: &'m Mesh) -> Result<Self, ConvertError> {
        let distribution = FaceDistribution::from_mesh(mesh)?;
        debug!(
            "Face distribution built over {} faces",
            distribution.probabilities().len()
        );
        Ok(Self { mesh, distribution })
    }

    /// Draw a single point.
    pub fn sample_one<R: Rng + ?Sized>(&self, rng: &mut R) -> SampledPoint {
        let face = self.distribution.sample_face(rng);
        let r1: f32 = rng.r#gen();
        let r2: f32 = rng.r#gen();
        let weights = barycentric(r1, r2);

        SampledPoint {
            face,
            barycentric: weights,
            position: self.mesh.triangle(face).point_at(weights),
            uv: self.mesh.triangle_uv(face).map(|uv| uv.uv_at(weights)),
            color: DEFAULT_COLOR,
        }
    }

    /// Draw `count` points in sampling order.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<SampledPoint> {
        (0..count).map(|_| self.sample_one(rng)).collect()
    }
}
