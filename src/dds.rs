//! Reading of DDS (DirectDraw Surface) containers.
//!
//! A DDS file starts with the magic word `DDS `, followed by a 124 byte
//! header and an optional 20 byte DX10 header. The surfaces follow without
//! padding: every array element (or cube face) stores its full mip chain
//! before the next one starts. Volume textures store all depth slices of a
//! level before the next level.
//!
//! <https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dx-graphics-dds-pguide>

mod dxgi;
mod header;
mod resolve;

pub use self::dxgi::DxgiFormat;
pub use self::header::{
    BitFlags, Caps, Caps2, Dx10Header, Flags, Header, PixelFormatFlags, PixelFormatHeader,
    ResourceDimension, DX10_HEADER_SIZE, HEADER_SIZE, PIXEL_FORMAT_SIZE,
};
pub use self::resolve::resolve_format;
use crate::{
    error::{DecodeResult, Malformed},
    texture::{decode_groups, ensure_elements_fit, mip_dimension, RawSurface},
    CubemapTexture, DecodeSettings, FlatTexture, PixelFormat, Texture, VolumeTexture,
};

/// The magic word every DDS file starts with.
pub const MAGIC: &[u8; 4] = b"DDS ";

/// Parses, validates and decodes a DDS texture.
pub fn read(bytes: &[u8], settings: &DecodeSettings) -> DecodeResult<Texture> {
    let (header, data_offset) = Header::parse(bytes)?;
    header.validate(settings.max_dimension())?;
    let format = resolve_format(&header)?;

    tracing::debug!(
        width = header.width,
        height = header.height,
        depth = header.depth(),
        mip_levels = header.mip_levels(),
        array_size = header.array_size(),
        cubemap = header.is_cubemap(),
        format = format.name(),
        "parsed DDS header"
    );

    let data = &bytes[data_offset..];
    let levels = settings.levels_to_decode(header.mip_levels());

    if header.is_volume() {
        return read_volume(&header, format, levels, data);
    }

    let faces = header.cubemap_faces();
    let surfaces_per_element = faces.len().max(1);
    let element_count = (header.array_size() as usize)
        .checked_mul(surfaces_per_element)
        .ok_or(Malformed::SizeOverflow)?;
    ensure_elements_fit(
        element_count,
        chain_size(&header, format)?,
        format.blocks_byte_size(header.width, header.height)?,
        data.len(),
    )?;

    let mut offset = 0;
    let mut chains = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        chains.push(plan_chain(&header, format, levels, &mut offset)?);
    }

    let mut chains = decode_groups(format, data, chains)?
        .into_iter()
        .map(|mipmaps| FlatTexture { mipmaps });

    let texture = match (faces.is_empty(), header.array_size()) {
        (true, 1) => Texture::Flat(chains.next().unwrap_or(FlatTexture {
            mipmaps: Vec::new(),
        })),
        (false, 1) => Texture::Cubemap(CubemapTexture {
            faces: faces.into_iter().zip(chains).collect(),
        }),
        _ => Texture::Array(chains.collect()),
    };

    Ok(texture)
}

/// Plans the mip chain of one array element or cube face starting at
/// `offset`, advancing `offset` past every stored level.
fn plan_chain(
    header: &Header,
    format: PixelFormat,
    levels: u32,
    offset: &mut usize,
) -> Result<Vec<RawSurface>, Malformed> {
    let mut chain = Vec::with_capacity(levels as usize);
    for level in 0..header.mip_levels() {
        let width = mip_dimension(header.width, level);
        let height = mip_dimension(header.height, level);
        if level < levels {
            chain.push(RawSurface::new(width, height, *offset));
        }
        *offset = offset
            .checked_add(format.blocks_byte_size(width, height)?)
            .ok_or(Malformed::SizeOverflow)?;
    }
    Ok(chain)
}

/// Bytes of one full stored mip chain.
fn chain_size(header: &Header, format: PixelFormat) -> Result<usize, Malformed> {
    (0..header.mip_levels()).try_fold(0usize, |size, level| {
        let level_size = format.blocks_byte_size(
            mip_dimension(header.width, level),
            mip_dimension(header.height, level),
        )?;
        size.checked_add(level_size).ok_or(Malformed::SizeOverflow)
    })
}

fn read_volume(
    header: &Header,
    format: PixelFormat,
    levels: u32,
    data: &[u8],
) -> DecodeResult<Texture> {
    let depth = header.depth();

    let mut offset = 0usize;
    let mut planned = Vec::with_capacity(levels as usize);
    for level in 0..levels {
        let width = mip_dimension(header.width, level);
        let height = mip_dimension(header.height, level);
        let slice_size = format.blocks_byte_size(width, height)?;

        let slices = (0..mip_dimension(depth, level))
            .map(|slice| {
                let slice_offset = (slice as usize)
                    .checked_mul(slice_size)
                    .and_then(|size| size.checked_add(offset))
                    .ok_or(Malformed::SizeOverflow)?;
                Ok(RawSurface::new(width, height, slice_offset))
            })
            .collect::<Result<Vec<_>, Malformed>>()?;

        offset = slice_size
            .checked_mul(slices.len())
            .and_then(|size| size.checked_add(offset))
            .ok_or(Malformed::SizeOverflow)?;
        planned.push(slices);
    }

    Ok(Texture::Volume(VolumeTexture {
        depth,
        levels: decode_groups(format, data, planned)?,
    }))
}
