//! glTF / GLB mesh loading.

use crate::error::LoadError;
use crate::mesh::Mesh;
use glam::{Vec2, Vec3};
use gltf::image::Format;
use gltf::mesh::Mode;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load the first triangle primitive of a glTF or GLB file.
///
/// Only the base-color texture and the TEXCOORD set it references are
/// read. Node transforms are not applied.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_gltf_mesh(path: &Path) -> Result<Mesh, LoadError> {
    let (document, buffers, images) = gltf::import(path).map_err(|source| LoadError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut primitives = document
        .meshes()
        .flat_map(|mesh| mesh.primitives())
        .filter(|p| p.mode() == Mode::Triangles);
    let primitive = primitives.next().ok_or_else(|| LoadError::NoGeometry {
        path: path.to_path_buf(),
    })?;
    let ignored = primitives.count();
    if ignored > 0 {
        warn!("Ignoring {} additional triangle primitives", ignored);
    }

    let reader = primitive.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| LoadError::NoGeometry {
            path: path.to_path_buf(),
        })?
        .map(Vec3::from_array)
        .collect();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() % 3 != 0 {
        warn!("Index count {} is not a multiple of 3", indices.len());
    }
    let faces: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    let base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_texture();
    let tex_coord_set = base_color.as_ref().map_or(0, |info| info.tex_coord());

    // glTF puts the UV origin at the top-left; flip V so v = 0 is the bottom row.
    let uvs: Option<Vec<Vec2>> = reader
        .read_tex_coords(tex_coord_set)
        .map(|coords| coords.into_f32().map(|[u, v]| Vec2::new(u, 1.0 - v)).collect());

    let texture = base_color.and_then(|info| {
        let index = info.texture().source().index();
        images.get(index).and_then(to_rgb_image)
    });

    info!(
        "glTF primitive: {} vertices, {} faces, uv: {}, texture: {}",
        positions.len(),
        faces.len(),
        uvs.is_some(),
        texture.is_some()
    );

    let invalid = |source| LoadError::InvalidMesh {
        path: path.to_path_buf(),
        source,
    };
    let mut mesh = Mesh::new(positions, faces).map_err(invalid)?;
    if let Some(uvs) = uvs {
        mesh = mesh.with_uvs(uvs).map_err(invalid)?;
    }
    if let Some(texture) = texture {
        mesh = mesh.with_texture(texture);
    }
    Ok(mesh)
}

/// Convert decoded glTF image data to an 8-bit RGB raster.
fn to_rgb_image(data: &gltf::image::Data) -> Option<RgbImage> {
    let rgb: Vec<u8> = match data.format {
        Format::R8G8B8 => data.pixels.clone(),
        Format::R8G8B8A8 => data
            .pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect(),
        Format::R8G8 => data
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0]])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&p| [p, p, p]).collect(),
        other => {
            warn!("Unsupported texture format {:?}, using default color", other);
            return None;
        }
    };
    debug!("Texture {}x{} ({:?})", data.width, data.height, data.format);
    RgbImage::from_raw(data.width, data.height, rgb)
}
