//! Splat record encoding
//!
//! Scale and rotation are placeholders: every record gets a zero log-scale
//! and the identity orientation.

mod record;
mod schema;

pub use record::{SplatRecord, opacity_byte, quantize_component, quantize_rotation};
pub use schema::SplatSchema;

use crate::sampling::SampledPoint;
use glam::{Quat, Vec3};

/// Opacity written when none is configured.
pub const DEFAULT_OPACITY: f32 = 1.0;

/// Builds records from colorized sample points.
#[derive(Debug, Clone, Copy)]
pub struct SplatEncoder {
    log_scale: Vec3,
    opacity: u8,
    rotation: [u8; 4],
}

impl SplatEncoder {
    /// Encoder with the given opacity in `[0, 1]`.
    pub fn new(opacity: f32) -> Self {
        Self {
            log_scale: Vec3::ZERO,
            opacity: opacity_byte(opacity),
            rotation: quantize_rotation(Quat::IDENTITY),
        }
    }

    pub fn encode(&self, point: &SampledPoint) -> SplatRecord {
        let [r, g, b] = point.color;
        SplatRecord {
            position: point.position.to_array(),
            scale: self.log_scale.to_array(),
            color: [r, g, b, self.opacity],
            rotation: self.rotation,
        }
    }
}

impl Default for SplatEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_OPACITY)
    }
}
