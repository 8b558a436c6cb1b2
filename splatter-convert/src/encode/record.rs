//! Fixed-width splat record and its quantization helpers.

use super::schema::SplatSchema;
use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

/// One splat in the full on-disk layout.
///
/// Field order and sizes match the file format, so on little-endian hosts a
/// slice of records can be written with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct SplatRecord {
    pub position: [f32; 3],
    /// Log-domain per-axis scale.
    pub scale: [f32; 3],
    /// RGB plus opacity.
    pub color: [u8; 4],
    /// Quantized quaternion `(x, y, z, w)`.
    pub rotation: [u8; 4],
}

const _: () = assert!(std::mem::size_of::<SplatRecord>() == SplatSchema::Full.record_size());

impl SplatRecord {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Append this record to `out` in the given schema, little-endian.
    pub fn write_le(&self, schema: SplatSchema, out: &mut Vec<u8>) {
        for v in self.position {
            out.extend_from_slice(&v.to_le_bytes());
        }
        match schema {
            SplatSchema::PositionColor => out.extend_from_slice(&self.color[..3]),
            SplatSchema::Full => {
                for v in self.scale {
                    out.extend_from_slice(&v.to_le_bytes());
                }
                out.extend_from_slice(&self.color);
                out.extend_from_slice(&self.rotation);
            }
        }
    }
}

/// Map a quaternion component from `[-1, 1]` onto `[0, 255]`, 128 being zero.
pub fn quantize_component(q: f32) -> u8 {
    (q * 128.0 + 128.0).round().clamp(0.0, 255.0) as u8
}

/// Normalize and quantize a rotation as `(x, y, z, w)` bytes.
pub fn quantize_rotation(rotation: Quat) -> [u8; 4] {
    rotation.normalize().to_array().map(quantize_component)
}

/// Opacity in `[0, 1]` as a byte.
pub fn opacity_byte(opacity: f32) -> u8 {
    (255.0 * opacity).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_component_range() {
        assert_eq!(quantize_component(0.0), 128);
        assert_eq!(quantize_component(1.0), 255);
        assert_eq!(quantize_component(-1.0), 0);
        assert_eq!(quantize_component(0.5), 192);
        assert_eq!(quantize_component(-0.5), 64);
        assert_eq!(quantize_component(3.0), 255);
    }

    #[test]
    fn test_quantize_identity_rotation() {
        assert_eq!(quantize_rotation(Quat::IDENTITY), [128, 128, 128, 255]);
    }

    #[test]
    fn test_quantize_rotation_normalizes() {
        let q = Quat::from_xyzw(0.0, 0.0, 0.0, 4.0);
        assert_eq!(quantize_rotation(q), [128, 128, 128, 255]);
    }

    #[test]
    fn test_opacity_byte() {
        assert_eq!(opacity_byte(1.0), 255);
        assert_eq!(opacity_byte(0.0), 0);
        assert_eq!(opacity_byte(0.5), 128);
    }

    #[test]
    fn test_write_le_layouts() {
        let record = SplatRecord {
            position: [1.0, -2.0, 0.5],
            scale: [0.0; 3],
            color: [10, 20, 30, 255],
            rotation: [128, 128, 128, 255],
        };

        let mut full = Vec::new();
        record.write_le(SplatSchema::Full, &mut full);
        assert_eq!(full.len(), 32);
        assert_eq!(&full[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&full[4..8], &(-2.0f32).to_le_bytes());
        assert_eq!(&full[12..24], &[0u8; 12]);
        assert_eq!(&full[24..32], &[10, 20, 30, 255, 128, 128, 128, 255]);

        let mut compact = Vec::new();
        record.write_le(SplatSchema::PositionColor, &mut compact);
        assert_eq!(compact.len(), 15);
        assert_eq!(&compact[8..12], &0.5f32.to_le_bytes());
        assert_eq!(&compact[12..], &[10, 20, 30]);
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_cast_matches_write_le() {
        let record = SplatRecord {
            position: [3.25, 0.0, -7.0],
            scale: [0.0; 3],
            color: [1, 2, 3, 4],
            rotation: [5, 6, 7, 8],
        };
        let mut manual = Vec::new();
        record.write_le(SplatSchema::Full, &mut manual);
        assert_eq!(bytemuck::bytes_of(&record), manual.as_slice());
    }
}
