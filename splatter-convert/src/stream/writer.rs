//! Headerless splat stream writer.

use crate::encode::{SplatRecord, SplatSchema};
use crate::error::ConvertError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Serialize records back to back in `schema`, with no header.
pub fn encode_records(records: &[SplatRecord], schema: SplatSchema) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * schema.record_size());
    match schema {
        #[cfg(target_endian = "little")]
        SplatSchema::Full => out.extend_from_slice(bytemuck::cast_slice(records)),
        _ => {
            for record in records {
                record.write_le(schema, &mut out);
            }
        }
    }
    out
}

/// Write an encoded splat stream to `path` in one go.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn write_splat_file(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<SplatRecord> {
        (0..4)
            .map(|i| SplatRecord {
                position: [i as f32, 1.0, 2.0],
                scale: [0.0; 3],
                color: [i as u8, 0, 0, 255],
                rotation: [128, 128, 128, 255],
            })
            .collect()
    }

    #[test]
    fn test_encode_records_sizes() {
        let records = records();
        assert_eq!(encode_records(&records, SplatSchema::Full).len(), 4 * 32);
        assert_eq!(encode_records(&records, SplatSchema::PositionColor).len(), 4 * 15);
        assert!(encode_records(&[], SplatSchema::Full).is_empty());
    }

    #[test]
    fn test_encode_records_full_matches_per_record() {
        let records = records();
        let mut manual = Vec::new();
        for record in &records {
            record.write_le(SplatSchema::Full, &mut manual);
        }
        assert_eq!(encode_records(&records, SplatSchema::Full), manual);
    }

    #[test]
    fn test_write_splat_file_reports_path() {
        let path = Path::new("/nonexistent/splatter/out.splat");
        let err = write_splat_file(path, &[0u8; 4]).unwrap_err();
        match err {
            ConvertError::Write { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
