//! Core geometric types shared by the loaders and the conversion pipeline.
//!
//! These are plain CPU-side values; nothing here owns file handles or
//! texture memory.

use glam::{Vec2, Vec3};

/// A triangle resolved from a mesh face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex position.
    pub v0: Vec3,
    /// Second vertex position.
    pub v1: Vec3,
    /// Third vertex position.
    pub v2: Vec3,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Area of the triangle, computed in f64.
    pub fn area(&self) -> f64 {
        let v0 = self.v0.as_dvec3();
        let e1 = self.v1.as_dvec3() - v0;
        let e2 = self.v2.as_dvec3() - v0;
        e1.cross(e2).length() * 0.5
    }

    /// Point at the given barycentric weights `(b0, b1, b2)`.
    pub fn point_at(&self, weights: [f32; 3]) -> Vec3 {
        self.v0 * weights[0] + self.v1 * weights[1] + self.v2 * weights[2]
    }
}

/// Texture coordinates at the three corners of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleUv {
    pub uv0: Vec2,
    pub uv1: Vec2,
    pub uv2: Vec2,
}

impl TriangleUv {
    pub fn new(uv0: Vec2, uv1: Vec2, uv2: Vec2) -> Self {
        Self { uv0, uv1, uv2 }
    }

    /// UV at the given barycentric weights `(b0, b1, b2)`.
    pub fn uv_at(&self, weights: [f32; 3]) -> Vec2 {
        self.uv0 * weights[0] + self.uv1 * weights[1] + self.uv2 * weights[2]
    }
}
