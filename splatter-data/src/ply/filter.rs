//! Remove near-white vertices from binary PLY point clouds.

use super::header::{PlyFormat, PlyHeader, ScalarType, read_header};
use crate::error::PlyError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Upper bound on vertices reserved up front; larger clouds grow on demand.
const MAX_RESERVED_VERTICES: usize = 1 << 20;

/// Thresholds above which a vertex counts as white.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Applied to `f_dc_0..2` float properties.
    pub threshold: f32,
    /// Applied to `red`/`green`/`blue` byte properties.
    pub channel_threshold: u8,
}

impl FilterConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_channel_threshold(mut self, channel_threshold: u8) -> Self {
        self.channel_threshold = channel_threshold;
        self
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.94,
            channel_threshold: 240,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub total: usize,
    pub kept: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Copy)]
enum ColorChannels {
    Dc([usize; 3]),
    Bytes([usize; 3]),
}

impl ColorChannels {
    fn locate(header: &PlyHeader) -> Result<Self, PlyError> {
        let vertex = header
            .element("vertex")
            .ok_or_else(|| PlyError::MissingProperty("element vertex".into()))?;

        let find = |names: [&str; 3], ty: ScalarType| -> Option<[usize; 3]> {
            let mut offsets = [0; 3];
            for (slot, name) in offsets.iter_mut().zip(names) {
                match vertex.scalar_offset(name) {
                    Some((offset, found)) if found == ty => *slot = offset,
                    _ => return None,
                }
            }
            Some(offsets)
        };

        if let Some(offsets) = find(["f_dc_0", "f_dc_1", "f_dc_2"], ScalarType::Float32) {
            Ok(ColorChannels::Dc(offsets))
        } else if let Some(offsets) = find(["red", "green", "blue"], ScalarType::UInt8) {
            Ok(ColorChannels::Bytes(offsets))
        } else {
            Err(PlyError::MissingProperty(
                "float f_dc_0/f_dc_1/f_dc_2 or uchar red/green/blue".into(),
            ))
        }
    }

    fn is_white(self, record: &[u8], config: &FilterConfig) -> bool {
        match self {
            ColorChannels::Dc(offsets) => offsets.iter().all(|&o| {
                let value = f32::from_le_bytes([record[o], record[o + 1], record[o + 2], record[o + 3]]);
                value > config.threshold
            }),
            ColorChannels::Bytes(offsets) => offsets
                .iter()
                .all(|&o| record[o] > config.channel_threshold),
        }
    }
}

/// Stream a PLY file from `input` to `output`, dropping near-white vertices.
///
/// The vertex element must come first and hold only scalar properties.
/// Everything after the vertex records is copied unchanged.
pub fn strip_white_vertices<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    config: &FilterConfig,
) -> Result<FilterStats, PlyError> {
    let raw = read_header(&mut input)?;
    let header = raw.parse()?;

    if header.format != PlyFormat::BinaryLittleEndian {
        return Err(PlyError::UnsupportedLayout(format!(
            "expected binary_little_endian, found {:?}",
            header.format
        )));
    }
    match header.elements.first() {
        Some(first) if first.name == "vertex" => {}
        _ => {
            return Err(PlyError::UnsupportedLayout(
                "vertex must be the first element".into(),
            ));
        }
    }

    let vertex = &header.elements[0];
    let stride = vertex.record_size().ok_or_else(|| {
        PlyError::UnsupportedLayout("vertex element has list properties".into())
    })?;
    let channels = ColorChannels::locate(&header)?;
    debug!("Vertex stride {} bytes, channels {:?}", stride, channels);

    vertex.count.checked_mul(stride).ok_or_else(|| {
        PlyError::UnsupportedLayout(format!(
            "{} vertices of {} bytes overflow the addressable size",
            vertex.count, stride
        ))
    })?;
    let mut kept = Vec::with_capacity(vertex.count.min(MAX_RESERVED_VERTICES) * stride);
    let mut record = vec![0u8; stride];
    let mut stats = FilterStats::default();

    for i in 0..vertex.count {
        if let Err(e) = input.read_exact(&mut record) {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                warn!("Vertex data ends after {} of {} records", i, vertex.count);
                break;
            }
            return Err(e.into());
        }
        stats.total += 1;
        if channels.is_white(&record, config) {
            stats.removed += 1;
        } else {
            kept.extend_from_slice(&record);
            stats.kept += 1;
        }
    }

    let mut rest = Vec::new();
    input.read_to_end(&mut rest)?;

    output.write_all(&rewrite_vertex_count(&raw.bytes, stats.kept))?;
    output.write_all(&kept)?;
    output.write_all(&rest)?;
    output.flush()?;

    Ok(stats)
}

/// Replace the count on the `element vertex` line, keeping all other bytes.
fn rewrite_vertex_count(header: &[u8], count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.len() + 8);
    for line in header.split_inclusive(|&b| b == b'\n') {
        if line.starts_with(b"element vertex ") {
            let ending: &[u8] = if line.ends_with(b"\r\n") { b"\r\n" } else { b"\n" };
            out.extend_from_slice(format!("element vertex {}", count).as_bytes());
            out.extend_from_slice(ending);
        } else {
            out.extend_from_slice(line);
        }
    }
    out
}

/// File-level wrapper around [`strip_white_vertices`].
///
/// The output file is only created once the input has been fully read.
#[tracing::instrument(skip_all, fields(path = %input.display()))]
pub fn strip_white_file(
    input: &Path,
    output: &Path,
    config: &FilterConfig,
) -> Result<FilterStats, PlyError> {
    let file = File::open(input).map_err(|e| PlyError::io(input, e))?;
    let mut buffer = Vec::new();
    let stats = strip_white_vertices(BufReader::new(file), &mut buffer, config).map_err(
        |e| match e {
            PlyError::Stream(source) => PlyError::io(input, source),
            other => other,
        },
    )?;

    let out = File::create(output).map_err(|e| PlyError::io(output, e))?;
    let mut writer = BufWriter::new(out);
    writer
        .write_all(&buffer)
        .and_then(|_| writer.flush())
        .map_err(|e| PlyError::io(output, e))?;

    info!(
        "Kept {} of {} vertices ({} removed), written to {}",
        stats.kept,
        stats.total,
        stats.removed,
        output.display()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dc_cloud(colors: &[[f32; 3]], trailer: &[u8]) -> Vec<u8> {
        let mut data = format!(
            "ply\nformat binary_little_endian 1.0\nelement vertex {}\n\
property float x\nproperty float y\nproperty float z\n\
property float f_dc_0\nproperty float f_dc_1\nproperty float f_dc_2\n\
property float opacity\nend_header\n",
            colors.len()
        )
        .into_bytes();
        for (i, c) in colors.iter().enumerate() {
            for v in [i as f32, 0.0, 0.0, c[0], c[1], c[2], 1.0] {
                data.extend_from_slice(&v.to_le_bytes());
            }
        }
        data.extend_from_slice(trailer);
        data
    }

    #[test]
    fn test_strip_white_dc() {
        let input = dc_cloud(
            &[[1.0, 1.0, 1.0], [0.2, 0.3, 0.4], [0.95, 0.95, 0.5], [0.99, 0.98, 0.97]],
            b"tail",
        );
        let mut output = Vec::new();
        let stats =
            strip_white_vertices(Cursor::new(input), &mut output, &FilterConfig::default())
                .unwrap();
        assert_eq!(
            stats,
            FilterStats {
                total: 4,
                kept: 2,
                removed: 2
            }
        );

        let mut reader = Cursor::new(output);
        let raw = read_header(&mut reader).unwrap();
        let header = raw.parse().unwrap();
        assert_eq!(header.element("vertex").unwrap().count, 2);

        let mut body = Vec::new();
        reader.read_to_end(&mut body).unwrap();
        assert_eq!(body.len(), 2 * 28 + 4);
        let first_x = f32::from_le_bytes(body[0..4].try_into().unwrap());
        let second_x = f32::from_le_bytes(body[28..32].try_into().unwrap());
        assert_eq!(first_x, 1.0);
        assert_eq!(second_x, 2.0);
        assert_eq!(&body[56..], b"tail");
    }

    #[test]
    fn test_strip_white_rgb_bytes() {
        let mut input = b"ply\nformat binary_little_endian 1.0\nelement vertex 3\n\
property uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n"
            .to_vec();
        input.extend_from_slice(&[255, 255, 255, 10, 20, 30, 241, 250, 240]);

        let mut output = Vec::new();
        let stats =
            strip_white_vertices(Cursor::new(input), &mut output, &FilterConfig::default())
                .unwrap();
        assert_eq!(stats.kept, 2);
        assert!(output.ends_with(&[10, 20, 30, 241, 250, 240]));
    }

    #[test]
    fn test_strip_white_custom_threshold() {
        let input = dc_cloud(&[[0.6, 0.7, 0.8], [0.1, 0.1, 0.1]], b"");
        let config = FilterConfig::default().with_threshold(0.5);
        let stats =
            strip_white_vertices(Cursor::new(input), Vec::new(), &config).unwrap();
        assert_eq!(stats.removed, 1);
    }

    #[test]
    fn test_strip_white_truncated_body() {
        let mut input = dc_cloud(&[[0.1, 0.1, 0.1], [0.2, 0.2, 0.2]], b"");
        input.truncate(input.len() - 10);
        let stats =
            strip_white_vertices(Cursor::new(input), Vec::new(), &FilterConfig::default())
                .unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn test_strip_white_rejects_ascii() {
        let input = b"ply\nformat ascii 1.0\nelement vertex 0\nproperty uchar red\n\
property uchar green\nproperty uchar blue\nend_header\n"
            .to_vec();
        let err = strip_white_vertices(Cursor::new(input), Vec::new(), &FilterConfig::default())
            .unwrap_err();
        assert!(matches!(err, PlyError::UnsupportedLayout(_)));
    }

    #[test]
    fn test_strip_white_requires_color() {
        let input = b"ply\nformat binary_little_endian 1.0\nelement vertex 0\n\
property float x\nend_header\n"
            .to_vec();
        let err = strip_white_vertices(Cursor::new(input), Vec::new(), &FilterConfig::default())
            .unwrap_err();
        assert!(matches!(err, PlyError::MissingProperty(_)));
    }

    #[test]
    fn test_strip_white_huge_declared_count() {
        let mut input = b"ply\nformat binary_little_endian 1.0\nelement vertex 4000000000000000000\n\
property uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n"
            .to_vec();
        input.extend_from_slice(&[255, 255, 255, 1, 2, 3]);
        let mut output = Vec::new();
        let stats =
            strip_white_vertices(Cursor::new(input), &mut output, &FilterConfig::default())
                .unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.kept, 1);
        assert!(output.ends_with(b"end_header\n\x01\x02\x03"));
    }

    #[test]
    fn test_strip_white_rejects_overflowing_size() {
        let input = format!(
            "ply\nformat binary_little_endian 1.0\nelement vertex {}\n\
property float f_dc_0\nproperty float f_dc_1\nproperty float f_dc_2\nend_header\n",
            usize::MAX / 2
        )
        .into_bytes();
        let err = strip_white_vertices(Cursor::new(input), Vec::new(), &FilterConfig::default())
            .unwrap_err();
        assert!(matches!(err, PlyError::UnsupportedLayout(_)));
    }

    #[test]
    fn test_rewrite_vertex_count_preserves_other_lines() {
        let header = b"ply\r\nelement vertex 10\r\nend_header\r\n";
        assert_eq!(
            rewrite_vertex_count(header, 3),
            b"ply\r\nelement vertex 3\r\nend_header\r\n".to_vec()
        );
    }
}
