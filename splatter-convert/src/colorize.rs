//! Texture colorization of sampled points.
//!
//! Lookup is nearest-pixel with edge clamping: `x = floor(u * width)`,
//! `y = floor((1 - v) * height)`. Texture rows run top to bottom while V
//! grows upward, hence the flip.

use crate::sampling::SampledPoint;
use glam::Vec2;
use image::RgbImage;

/// 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Color used when no texture lookup is possible.
pub const DEFAULT_COLOR: Rgb = [255, 255, 255];

/// Pixel coordinates for `uv` in a `width` x `height` raster.
///
/// Both dimensions must be non-zero.
pub fn pixel_coords(width: u32, height: u32, uv: Vec2) -> (u32, u32) {
    let clamp = |value: f32, size: u32| (value.floor() as i64).clamp(0, size as i64 - 1) as u32;
    (
        clamp(uv.x * width as f32, width),
        clamp((1.0 - uv.y) * height as f32, height),
    )
}

/// Nearest-pixel texture lookup.
pub fn sample_texture(raster: &RgbImage, uv: Vec2) -> Rgb {
    let (x, y) = pixel_coords(raster.width(), raster.height(), uv);
    raster.get_pixel(x, y).0
}

/// Color for an optional texture and UV; white unless both are present.
pub fn resolve_color(texture: Option<&RgbImage>, uv: Option<Vec2>) -> Rgb {
    match (texture, uv) {
        (Some(raster), Some(uv)) if raster.width() > 0 && raster.height() > 0 => {
            sample_texture(raster, uv)
        }
        _ => DEFAULT_COLOR,
    }
}

/// Resolves sampled point colors against an optional texture.
#[derive(Debug, Clone, Copy)]
pub struct Colorizer<'t> {
    texture: Option<&'t RgbImage>,
}

impl<'t> Colorizer<'t> {
    pub fn new(texture: Option<&'t RgbImage>) -> Self {
        Self { texture }
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    pub fn colorize(&self, point: SampledPoint) -> SampledPoint {
        point.with_color(resolve_color(self.texture, point.uv))
    }
}
