//! Mesh-to-splat conversion: sample, colorize, encode, serialize.

use crate::colorize::Colorizer;
use crate::encode::{DEFAULT_OPACITY, SplatEncoder, SplatRecord, SplatSchema};
use crate::error::ConvertError;
use crate::sampling::SurfaceSampler;
use crate::stream::encode_records;
use rand::Rng;
use splatter_data::Mesh;
use tracing::{debug, info};

/// Number of surface samples drawn when none is configured.
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

/// Settings for one conversion run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertConfig {
    pub sample_count: usize,
    pub schema: SplatSchema,
    pub opacity: f32,
}

impl ConvertConfig {
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_schema(mut self, schema: SplatSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Reject settings that could never produce a valid stream.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.sample_count == 0 {
            return Err(ConvertError::ZeroSampleCount);
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConvertError::InvalidOpacity(self.opacity));
        }
        Ok(())
    }

    /// Exact byte length of a stream produced with these settings.
    pub fn output_len(&self) -> usize {
        self.sample_count * self.schema.record_size()
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            schema: SplatSchema::default(),
            opacity: DEFAULT_OPACITY,
        }
    }
}

/// Encoded output of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct SplatStream {
    pub schema: SplatSchema,
    pub bytes: Vec<u8>,
}

impl SplatStream {
    pub fn record_count(&self) -> usize {
        self.bytes.len() / self.schema.record_size()
    }
}

/// Runs the full sampling and encoding pipeline over a mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplatConverter {
    config: ConvertConfig,
}

impl SplatConverter {
    pub fn new(config: ConvertConfig) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Sample, colorize and encode `sample_count` records.
    pub fn records<R: Rng + ?Sized>(
        &self,
        mesh: &Mesh,
        rng: &mut R,
    ) -> Result<Vec<SplatRecord>, ConvertError> {
        let sampler = SurfaceSampler::new(mesh)?;
        let colorizer = Colorizer::new(mesh.texture());
        let encoder = SplatEncoder::new(self.config.opacity);

        if !colorizer.is_textured() || mesh.uvs().is_none() {
            debug!(
                "No texture lookup possible (uv: {}, texture: {}), using default color",
                mesh.uvs().is_some(),
                colorizer.is_textured()
            );
        }

        let records: Vec<SplatRecord> = (0..self.config.sample_count)
            .map(|_| encoder.encode(&colorizer.colorize(sampler.sample_one(rng))))
            .collect();
        Ok(records)
    }

    /// Run the pipeline and serialize the records in the configured schema.
    pub fn convert<R: Rng + ?Sized>(
        &self,
        mesh: &Mesh,
        rng: &mut R,
    ) -> Result<SplatStream, ConvertError> {
        let records = self.records(mesh, rng)?;
        let bytes = encode_records(&records, self.config.schema);
        info!(
            "Encoded {} splats ({} schema, {} bytes)",
            records.len(),
            self.config.schema,
            bytes.len()
        );
        Ok(SplatStream {
            schema: self.config.schema,
            bytes,
        })
    }
}
