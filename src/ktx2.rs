//! Reading of KTX version 2 containers.
//!
//! The level index stores the offset and length of every mip level. Inside
//! a level, all layers, faces and depth slices are tightly packed. Rows are
//! never padded.
//!
//! Supercompressed payloads (Basis Universal, Zstandard, ZLIB) are reported
//! as unsupported.
//!
//! <https://registry.khronos.org/KTX/specs/2.0/ktxspec.v2.html>

mod header;
mod vk;

pub use self::header::{Header, LevelIndex, HEADER_SIZE, LEVEL_INDEX_ENTRY_SIZE};
pub use self::vk::resolve_format;
use crate::{
    error::{DecodeResult, Malformed},
    texture::{decode_groups, ensure_elements_fit, mip_dimension, RawSurface},
    CubeFace, CubemapTexture, DecodeSettings, FlatTexture, PixelFormat, Texture, VolumeTexture,
};

/// The identifier every KTX2 file starts with.
pub const IDENTIFIER: [u8; 12] = [
    0xAB, b'K', b'T', b'X', b' ', b'2', b'0', 0xBB, b'\r', b'\n', 0x1A, b'\n',
];

/// Parses, validates and decodes a KTX2 texture.
pub fn read(bytes: &[u8], settings: &DecodeSettings) -> DecodeResult<Texture> {
    let header = Header::parse(bytes)?;
    header.validate(settings.max_dimension())?;
    let format = resolve_format(&header)?;

    tracing::debug!(
        width = header.pixel_width,
        height = header.height(),
        depth = header.depth(),
        mip_levels = header.mip_levels(),
        array_size = header.array_size(),
        faces = header.face_count,
        format = format.name(),
        "parsed KTX2 header"
    );

    let levels = settings.levels_to_decode(header.mip_levels());
    let planned = header
        .levels
        .iter()
        .zip(0..levels)
        .map(|(index, level)| plan_level(&header, format, level, index, bytes.len()))
        .collect::<DecodeResult<Vec<_>>>()?;

    if header.is_volume() {
        return Ok(Texture::Volume(VolumeTexture {
            depth: header.depth(),
            levels: decode_groups(format, bytes, planned)?,
        }));
    }

    let element_count = planned.first().map_or(0, Vec::len);
    let mut chains: Vec<Vec<RawSurface>> = vec![Vec::with_capacity(planned.len()); element_count];
    for level in planned {
        for (chain, surface) in chains.iter_mut().zip(level) {
            chain.push(surface);
        }
    }

    let mut chains = decode_groups(format, bytes, chains)?
        .into_iter()
        .map(|mipmaps| FlatTexture { mipmaps });

    let texture = match (header.is_cubemap(), header.is_array()) {
        (false, false) => Texture::Flat(chains.next().unwrap_or(FlatTexture {
            mipmaps: Vec::new(),
        })),
        (true, false) => Texture::Cubemap(CubemapTexture {
            faces: CubeFace::ALL.into_iter().zip(chains).collect(),
        }),
        _ => Texture::Array(chains.collect()),
    };

    Ok(texture)
}

/// Plans the surfaces of one level in storage order, with offsets relative
/// to the start of a file of `file_size` bytes.
fn plan_level(
    header: &Header,
    format: PixelFormat,
    level: u32,
    index: &LevelIndex,
    file_size: usize,
) -> DecodeResult<Vec<RawSurface>> {
    let width = mip_dimension(header.pixel_width, level);
    let height = mip_dimension(header.height(), level);
    let slices = if header.is_volume() {
        mip_dimension(header.pixel_depth, level)
    } else {
        1
    };

    let surface_size = format.blocks_byte_size(width, height)?;
    let surface_count =
        header.array_size() as usize * header.face_count as usize * slices as usize;
    let needed = surface_size
        .checked_mul(surface_count)
        .ok_or(Malformed::SizeOverflow)?;

    let start = usize::try_from(index.byte_offset).map_err(|_| Malformed::LevelSize(level))?;
    let length = usize::try_from(index.byte_length).map_err(|_| Malformed::LevelSize(level))?;
    if length < needed {
        return Err(Malformed::LevelSize(level).into());
    }
    ensure_elements_fit(1, 0, length, file_size.saturating_sub(start))?;

    let surfaces = (0..surface_count)
        .map(|surface| {
            let offset = surface
                .checked_mul(surface_size)
                .and_then(|size| size.checked_add(start))
                .ok_or(Malformed::SizeOverflow)?;
            Ok(RawSurface::new(width, height, offset))
        })
        .collect::<Result<Vec<_>, Malformed>>()?;
    Ok(surfaces)
}
