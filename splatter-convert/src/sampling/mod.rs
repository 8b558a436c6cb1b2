//! Surface sampling
//!
//! Faces are chosen through a [`FaceDistribution`] weighted by area, then a
//! point is placed inside the chosen face with uniformly distributed
//! barycentric weights.

mod distribution;
mod sampler;

pub use distribution::FaceDistribution;
pub use sampler::{SampledPoint, SurfaceSampler, barycentric};
