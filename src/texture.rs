use std::borrow::Cow;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    decode::decode_surface,
    error::{DecodeError, DecodeResult, Malformed},
    PixelFormat, PixelLayout,
};

/// A decoded mip level, cube face or volume slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipMap {
    pub width: u32,
    pub height: u32,
    /// The format the surface was stored in.
    pub format: PixelFormat,
    /// The layout of `data`.
    pub layout: PixelLayout,
    /// Exactly `width * height * layout.bytes_per_pixel()` bytes, rows top
    /// to bottom without padding.
    pub data: Vec<u8>,
}

impl MipMap {
    /// Bytes per row of `data`.
    pub fn pitch(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }
}

/// A 2D texture or one element of an array, largest level first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTexture {
    pub mipmaps: Vec<MipMap>,
}

/// One face of a cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// All faces in storage order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];
}

/// The faces of a cube map that are present in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapTexture {
    pub faces: Vec<(CubeFace, FlatTexture)>,
}

impl CubemapTexture {
    pub fn face(&self, face: CubeFace) -> Option<&FlatTexture> {
        self.faces
            .iter()
            .find_map(|(stored, texture)| (*stored == face).then_some(texture))
    }
}

/// A 3D texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeTexture {
    /// Depth of the largest level.
    pub depth: u32,
    /// The depth slices of every level, largest level first. Level `n` holds
    /// `max(1, depth >> n)` slices.
    pub levels: Vec<Vec<MipMap>>,
}

/// A decoded texture with its surface topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Texture {
    Flat(FlatTexture),
    Cubemap(CubemapTexture),
    Volume(VolumeTexture),
    /// Array elements in order. Cube map arrays store six consecutive
    /// elements per cube, in [`CubeFace::ALL`] order.
    Array(Vec<FlatTexture>),
}

impl Texture {
    /// The largest level of the first surface.
    pub fn first_mip(&self) -> Option<&MipMap> {
        match self {
            Texture::Flat(texture) => texture.mipmaps.first(),
            Texture::Cubemap(cubemap) => cubemap
                .faces
                .first()
                .and_then(|(_, texture)| texture.mipmaps.first()),
            Texture::Volume(volume) => volume.levels.first().and_then(|slices| slices.first()),
            Texture::Array(elements) => elements
                .first()
                .and_then(|texture| texture.mipmaps.first()),
        }
    }

    /// Every decoded surface in container order.
    pub fn surfaces(&self) -> Vec<&MipMap> {
        match self {
            Texture::Flat(texture) => texture.mipmaps.iter().collect(),
            Texture::Cubemap(cubemap) => cubemap
                .faces
                .iter()
                .flat_map(|(_, texture)| &texture.mipmaps)
                .collect(),
            Texture::Volume(volume) => volume.levels.iter().flatten().collect(),
            Texture::Array(elements) => elements
                .iter()
                .flat_map(|texture| &texture.mipmaps)
                .collect(),
        }
    }
}

/// Size of `size` at mip `level`.
pub(crate) fn mip_dimension(size: u32, level: u32) -> u32 {
    size.checked_shr(level).unwrap_or(0).max(1)
}

/// Checks that `count` elements stored `stride` bytes apart fit into
/// `available` bytes, when the last element needs at least `last` bytes.
///
/// Runs before any per-element planning, so a header claiming more elements
/// than the payload can hold fails without allocating for them.
pub(crate) fn ensure_elements_fit(
    count: usize,
    stride: usize,
    last: usize,
    available: usize,
) -> DecodeResult<()> {
    let Some(before_last) = count.checked_sub(1) else {
        return Ok(());
    };
    let expected = stride
        .checked_mul(before_last)
        .and_then(|size| size.checked_add(last))
        .ok_or(Malformed::SizeOverflow)?;
    if expected > available {
        return Err(DecodeError::TruncatedStream {
            expected,
            actual: available,
        });
    }
    Ok(())
}

/// Location of one encoded surface inside a container payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawSurface {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) offset: usize,
    /// Stored bytes per row of blocks, when rows are padded.
    pub(crate) row_pitch: Option<usize>,
}

impl RawSurface {
    pub(crate) fn new(width: u32, height: u32, offset: usize) -> Self {
        Self {
            width,
            height,
            offset,
            row_pitch: None,
        }
    }

    /// Returns the tightly packed encoded bytes of the surface.
    fn encoded<'a>(&self, format: PixelFormat, data: &'a [u8]) -> DecodeResult<Cow<'a, [u8]>> {
        let packed_row = format.bytes_per_row(self.width);
        let rows = self.height.div_ceil(format.descriptor().block_height) as usize;
        let row_pitch = self.row_pitch.unwrap_or(packed_row);

        let expected = row_pitch
            .checked_mul(rows.saturating_sub(1))
            .and_then(|size| size.checked_add(packed_row))
            .ok_or(Malformed::SizeOverflow)?;
        let available = data.get(self.offset..).unwrap_or_default();
        if available.len() < expected {
            return Err(DecodeError::TruncatedStream {
                expected,
                actual: available.len(),
            });
        }

        if row_pitch == packed_row {
            return Ok(Cow::Borrowed(&available[..expected]));
        }

        let mut packed = Vec::with_capacity(packed_row * rows);
        for row in available.chunks(row_pitch).take(rows) {
            packed.extend_from_slice(&row[..packed_row]);
        }
        Ok(Cow::Owned(packed))
    }

    fn decode(&self, format: PixelFormat, data: &[u8]) -> DecodeResult<MipMap> {
        let encoded = self.encoded(format, data)?;
        Ok(MipMap {
            width: self.width,
            height: self.height,
            format,
            layout: format.layout(),
            data: decode_surface(format, self.width, self.height, &encoded)?,
        })
    }
}

/// Decodes groups of surfaces stored in `data`, keeping the grouping.
///
/// Every surface is checked for presence before any is decoded, so the
/// first missing surface in container order is the one reported.
pub(crate) fn decode_groups(
    format: PixelFormat,
    data: &[u8],
    groups: Vec<Vec<RawSurface>>,
) -> DecodeResult<Vec<Vec<MipMap>>> {
    let group_sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    let surfaces: Vec<RawSurface> = groups.into_iter().flatten().collect();

    for surface in &surfaces {
        surface.encoded(format, data).map(drop)?;
    }

    #[cfg(feature = "rayon")]
    let decoded = surfaces
        .par_iter()
        .map(|surface| surface.decode(format, data))
        .collect::<DecodeResult<Vec<_>>>()?;
    #[cfg(not(feature = "rayon"))]
    let decoded = surfaces
        .iter()
        .map(|surface| surface.decode(format, data))
        .collect::<DecodeResult<Vec<_>>>()?;

    let mut decoded = decoded.into_iter();
    Ok(group_sizes
        .into_iter()
        .map(|size| decoded.by_ref().take(size).collect())
        .collect())
}

#[cfg(feature = "image")]
mod convert {
    use half::f16;
    use image::{
        DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, Luma, Rgb32FImage, RgbImage,
        Rgba32FImage, RgbaImage,
    };

    use super::MipMap;
    use crate::PixelLayout;

    fn le_u16s(data: &[u8]) -> Vec<u16> {
        let len = data.len() / 2;
        let mut values = vec![0u16; len];
        bytemuck::cast_slice_mut(&mut values).copy_from_slice(&data[..len * 2]);
        values.iter_mut().for_each(|value| *value = u16::from_le(*value));
        values
    }

    fn le_halfs(data: &[u8]) -> Vec<f32> {
        le_u16s(data)
            .into_iter()
            .map(|bits| f16::from_bits(bits).to_f32())
            .collect()
    }

    fn le_f32s(data: &[u8]) -> Vec<f32> {
        let len = data.len() / 4;
        let mut values = vec![0u32; len];
        bytemuck::cast_slice_mut(&mut values).copy_from_slice(&data[..len * 4]);
        values
            .into_iter()
            .map(|bits| f32::from_bits(u32::from_le(bits)))
            .collect()
    }

    /// Widens `channels`-wide pixels to RGB, filling missing channels with 0.
    /// Single channel pixels are replicated as grey.
    fn widen_to_rgb<T: Copy + Default>(values: &[T], channels: usize) -> Vec<T> {
        values
            .chunks_exact(channels)
            .flat_map(|pixel| match channels {
                1 => [pixel[0]; 3],
                2 => [pixel[0], pixel[1], T::default()],
                _ => [pixel[0], pixel[1], pixel[2]],
            })
            .collect()
    }

    impl MipMap {
        /// Converts the surface to an [`image::DynamicImage`].
        ///
        /// Two channel layouts become RGB with blue 0, `A8` becomes black
        /// with alpha and single channel float layouts become grey RGB.
        pub fn to_image(&self) -> Option<DynamicImage> {
            let (width, height) = (self.width, self.height);
            let data = &self.data;

            let image: DynamicImage = match self.layout {
                PixelLayout::L8 => GrayImage::from_raw(width, height, data.clone())?.into(),
                PixelLayout::A8 => {
                    let pixels = data.iter().flat_map(|&alpha| [0, alpha]).collect();
                    GrayAlphaImage::from_raw(width, height, pixels)?.into()
                }
                PixelLayout::La8 => GrayAlphaImage::from_raw(width, height, data.clone())?.into(),
                PixelLayout::Rg8 => RgbImage::from_raw(width, height, widen_to_rgb(data, 2))?.into(),
                PixelLayout::Rgb8 => RgbImage::from_raw(width, height, data.clone())?.into(),
                PixelLayout::Rgba8 => RgbaImage::from_raw(width, height, data.clone())?.into(),
                PixelLayout::L16 => {
                    ImageBuffer::<Luma<u16>, _>::from_raw(width, height, le_u16s(data))?.into()
                }
                PixelLayout::Rg16 => DynamicImage::ImageRgb16(ImageBuffer::from_raw(
                    width,
                    height,
                    widen_to_rgb(&le_u16s(data), 2),
                )?),
                PixelLayout::Rgba16 => {
                    DynamicImage::ImageRgba16(ImageBuffer::from_raw(width, height, le_u16s(data))?)
                }
                PixelLayout::R16F => {
                    Rgb32FImage::from_raw(width, height, widen_to_rgb(&le_halfs(data), 1))?.into()
                }
                PixelLayout::Rg16F => {
                    Rgb32FImage::from_raw(width, height, widen_to_rgb(&le_halfs(data), 2))?.into()
                }
                PixelLayout::Rgba16F => {
                    Rgba32FImage::from_raw(width, height, le_halfs(data))?.into()
                }
                PixelLayout::R32F => {
                    Rgb32FImage::from_raw(width, height, widen_to_rgb(&le_f32s(data), 1))?.into()
                }
                PixelLayout::Rg32F => {
                    Rgb32FImage::from_raw(width, height, widen_to_rgb(&le_f32s(data), 2))?.into()
                }
                PixelLayout::Rgb32F => Rgb32FImage::from_raw(width, height, le_f32s(data))?.into(),
                PixelLayout::Rgba32F => {
                    Rgba32FImage::from_raw(width, height, le_f32s(data))?.into()
                }
            };

            Some(image)
        }
    }
}
