//! Output record layouts.

use std::fmt;

/// Binary layout of each output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplatSchema {
    /// `[pos: 3 x f32][rgb: 3 x u8]`, 15 bytes.
    PositionColor,
    /// `[pos: 3 x f32][scale: 3 x f32][rgba: 4 x u8][rot: 4 x u8]`, 32 bytes.
    #[default]
    Full,
}

impl SplatSchema {
    /// Size of one record in bytes.
    pub const fn record_size(self) -> usize {
        match self {
            SplatSchema::PositionColor => 15,
            SplatSchema::Full => 32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SplatSchema::PositionColor => "position-color",
            SplatSchema::Full => "full",
        }
    }
}

impl fmt::Display for SplatSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
