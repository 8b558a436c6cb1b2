//! Reading and writing headerless splat streams

mod reader;
mod writer;

pub use reader::{DecodedSplat, decode_splats};
pub use writer::{encode_records, write_splat_file};
