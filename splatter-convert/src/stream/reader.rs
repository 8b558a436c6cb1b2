//! Splat stream decoding.

use crate::encode::SplatSchema;
use crate::error::DecodeError;
use glam::Vec3;

/// One record read back from a splat stream.
///
/// Fields absent from the compact schema are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedSplat {
    pub position: Vec3,
    pub color: [u8; 3],
    pub opacity: Option<u8>,
    pub scale: Option<Vec3>,
    pub rotation: Option<[u8; 4]>,
}

fn read_f32s<const N: usize>(bytes: &[u8]) -> [f32; N] {
    std::array::from_fn(|i| {
        let o = i * 4;
        f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
    })
}

/// Decode a headerless splat stream written in `schema`.
pub fn decode_splats(bytes: &[u8], schema: SplatSchema) -> Result<Vec<DecodedSplat>, DecodeError> {
    let record_size = schema.record_size();
    if bytes.len() % record_size != 0 {
        return Err(DecodeError::TrailingBytes {
            len: bytes.len(),
            record_size,
        });
    }

    Ok(bytes
        .chunks_exact(record_size)
        .map(|chunk| {
            let position = Vec3::from_array(read_f32s::<3>(chunk));
            match schema {
                SplatSchema::PositionColor => DecodedSplat {
                    position,
                    color: [chunk[12], chunk[13], chunk[14]],
                    opacity: None,
                    scale: None,
                    rotation: None,
                },
                SplatSchema::Full => DecodedSplat {
                    position,
                    color: [chunk[24], chunk[25], chunk[26]],
                    opacity: Some(chunk[27]),
                    scale: Some(Vec3::from_array(read_f32s::<3>(&chunk[12..24]))),
                    rotation: Some([chunk[28], chunk[29], chunk[30], chunk[31]]),
                },
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::SplatRecord;
    use crate::stream::encode_records;

    #[test]
    fn test_decode_full_record() {
        let record = SplatRecord {
            position: [1.5, -0.25, 8.0],
            scale: [0.0; 3],
            color: [9, 8, 7, 255],
            rotation: [128, 128, 128, 255],
        };
        let bytes = encode_records(&[record], SplatSchema::Full);
        let decoded = decode_splats(&bytes, SplatSchema::Full).unwrap();
        assert_eq!(
            decoded,
            vec![DecodedSplat {
                position: Vec3::new(1.5, -0.25, 8.0),
                color: [9, 8, 7],
                opacity: Some(255),
                scale: Some(Vec3::ZERO),
                rotation: Some([128, 128, 128, 255]),
            }]
        );
    }

    #[test]
    fn test_decode_position_color() {
        let mut bytes = Vec::new();
        for v in [0.5f32, 1.0, 2.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&[200, 100, 50]);
        let decoded = decode_splats(&bytes, SplatSchema::PositionColor).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].position, Vec3::new(0.5, 1.0, 2.0));
        assert_eq!(decoded[0].color, [200, 100, 50]);
        assert_eq!(decoded[0].opacity, None);
    }

    #[test]
    fn test_decode_rejects_partial_record() {
        let err = decode_splats(&[0u8; 33], SplatSchema::Full).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TrailingBytes {
                len: 33,
                record_size: 32
            }
        ));
    }
}
