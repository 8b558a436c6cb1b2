//! Splatter Conversion Crate
//!
//! Turns a validated [`splatter_data::Mesh`] into a headerless stream of
//! fixed-size splat records.
//!
//! ## Modules
//!
//! - [`sampling`]: area-weighted face selection and barycentric point placement
//! - [`colorize`]: nearest-pixel texture lookup with default white
//! - [`encode`]: record layout, quantization and output schemas
//! - [`stream`]: serialization to and from splat byte streams
//! - [`pipeline`]: the end-to-end converter
//!
//! Randomness is always supplied by the caller, so a seeded generator gives
//! reproducible output.

pub mod colorize;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod sampling;
pub mod stream;

pub use colorize::{Colorizer, DEFAULT_COLOR, resolve_color, sample_texture};
pub use encode::{DEFAULT_OPACITY, SplatEncoder, SplatRecord, SplatSchema};
pub use error::{ConvertError, DecodeError};
pub use pipeline::{ConvertConfig, DEFAULT_SAMPLE_COUNT, SplatConverter, SplatStream};
pub use sampling::{FaceDistribution, SampledPoint, SurfaceSampler};
pub use stream::{DecodedSplat, decode_splats, encode_records, write_splat_file};
