//! Surface decoding.
//!
//! A surface is decoded by walking its blocks in row-major order and handing
//! each block to the decoder of its [`PixelFormat`]. Block decoders write
//! into a buffer padded to whole blocks, which is trimmed to the requested
//! dimensions at the end.

#[cfg(feature = "bc6h")]
mod bc6h;
#[cfg(feature = "bc7")]
mod bc7;
#[cfg_attr(
    not(all(feature = "bc15", feature = "bc6h", feature = "bc7")),
    allow(dead_code)
)]
mod bits;
#[cfg(feature = "bc15")]
mod block;
#[cfg(any(feature = "bc6h", feature = "bc7"))]
mod partition;
mod pixel;

#[cfg(feature = "bc6h")]
pub use self::bc6h::{decode_block_bc6h, decode_block_bc6h_float};
#[cfg(feature = "bc7")]
pub use self::bc7::decode_block_bc7;
#[cfg(feature = "bc15")]
pub use self::block::{
    decode_block_bc1, decode_block_bc2, decode_block_bc3, decode_block_bc4, decode_block_bc4s,
    decode_block_bc5, decode_block_bc5s,
};
use crate::{
    error::{DecodeError, DecodeResult, Malformed, UnsupportedFormat},
    PixelFormat,
};

/// Result of decoding a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The block was decoded from a valid encoding.
    Decoded,
    /// The block holds an invalid encoding and was filled with the fallback
    /// color of its format.
    Fallback,
}

trait BlockDecoder {
    const FORMAT: PixelFormat;

    /// Decodes one block of `FORMAT` into `decompressed`, which holds `pitch`
    /// bytes per output row.
    fn decode_block(compressed: &[u8], decompressed: &mut [u8], pitch: usize) -> BlockOutcome;
}

/// Declares decoders for formats whose block function can't fail.
macro_rules! infallible_decoders {
    ($($decoder:ident => $format:ident, $decode:path;)*) => {
        $(
            struct $decoder;

            impl BlockDecoder for $decoder {
                const FORMAT: PixelFormat = PixelFormat::$format;

                #[inline(always)]
                fn decode_block(
                    compressed: &[u8],
                    decompressed: &mut [u8],
                    pitch: usize,
                ) -> BlockOutcome {
                    $decode(compressed, decompressed, pitch);
                    BlockOutcome::Decoded
                }
            }
        )*
    };
}

/// Declares decoders for formats stored one pixel (or one pixel pair) per
/// block, which only ever write a single output row.
macro_rules! pixel_decoders {
    ($($decoder:ident => $format:ident, $decode:path;)*) => {
        $(
            struct $decoder;

            impl BlockDecoder for $decoder {
                const FORMAT: PixelFormat = PixelFormat::$format;

                #[inline(always)]
                fn decode_block(
                    compressed: &[u8],
                    decompressed: &mut [u8],
                    _pitch: usize,
                ) -> BlockOutcome {
                    $decode(compressed, decompressed);
                    BlockOutcome::Decoded
                }
            }
        )*
    };
}

#[cfg(feature = "bc15")]
infallible_decoders! {
    Bc1Decoder => Bc1, decode_block_bc1;
    Bc2Decoder => Bc2, decode_block_bc2;
    Bc3Decoder => Bc3, decode_block_bc3;
    Bc4Decoder => Bc4, decode_block_bc4;
    Bc4SDecoder => Bc4S, decode_block_bc4s;
    Bc5Decoder => Bc5, decode_block_bc5;
    Bc5SDecoder => Bc5S, decode_block_bc5s;
}

#[cfg(feature = "bc6h")]
struct Bc6HDecoder<const SIGNED: bool>;

#[cfg(feature = "bc6h")]
impl BlockDecoder for Bc6HDecoder<false> {
    const FORMAT: PixelFormat = PixelFormat::Bc6H;

    #[inline(always)]
    fn decode_block(compressed: &[u8], decompressed: &mut [u8], pitch: usize) -> BlockOutcome {
        bc6h::decode_block_bc6h_unorm(compressed, decompressed, pitch, false)
    }
}

#[cfg(feature = "bc6h")]
impl BlockDecoder for Bc6HDecoder<true> {
    const FORMAT: PixelFormat = PixelFormat::Bc6HS;

    #[inline(always)]
    fn decode_block(compressed: &[u8], decompressed: &mut [u8], pitch: usize) -> BlockOutcome {
        bc6h::decode_block_bc6h_unorm(compressed, decompressed, pitch, true)
    }
}

#[cfg(feature = "bc7")]
struct Bc7Decoder;

#[cfg(feature = "bc7")]
impl BlockDecoder for Bc7Decoder {
    const FORMAT: PixelFormat = PixelFormat::Bc7;

    #[inline(always)]
    fn decode_block(compressed: &[u8], decompressed: &mut [u8], pitch: usize) -> BlockOutcome {
        decode_block_bc7(compressed, decompressed, pitch)
    }
}

pixel_decoders! {
    R8Decoder => R8, pixel::copy;
    A8Decoder => A8, pixel::copy;
    L8Decoder => L8, pixel::copy;
    R8G8Decoder => R8G8, pixel::copy;
    A8L8Decoder => A8L8, pixel::copy;
    R8G8B8Decoder => R8G8B8, pixel::copy;
    B8G8R8Decoder => B8G8R8, pixel::bgr8;
    R8G8B8A8Decoder => R8G8B8A8, pixel::copy;
    B8G8R8A8Decoder => B8G8R8A8, pixel::bgra8;
    B8G8R8X8Decoder => B8G8R8X8, pixel::bgrx8;
    R8G8B8X8Decoder => R8G8B8X8, pixel::rgbx8;
    B5G6R5Decoder => B5G6R5, pixel::b5g6r5;
    B5G5R5A1Decoder => B5G5R5A1, pixel::b5g5r5a1;
    B5G5R5X1Decoder => B5G5R5X1, pixel::b5g5r5x1;
    B4G4R4A4Decoder => B4G4R4A4, pixel::b4g4r4a4;
    R10G10B10A2Decoder => R10G10B10A2, pixel::r10g10b10a2;
    B10G10R10A2Decoder => B10G10R10A2, pixel::b10g10r10a2;
    R16Decoder => R16, pixel::copy;
    L16Decoder => L16, pixel::copy;
    R16G16Decoder => R16G16, pixel::copy;
    R16G16B16A16Decoder => R16G16B16A16, pixel::copy;
    R16FloatDecoder => R16Float, pixel::copy;
    R16G16FloatDecoder => R16G16Float, pixel::copy;
    R16G16B16A16FloatDecoder => R16G16B16A16Float, pixel::copy;
    R32FloatDecoder => R32Float, pixel::copy;
    R32G32FloatDecoder => R32G32Float, pixel::copy;
    R32G32B32FloatDecoder => R32G32B32Float, pixel::copy;
    R32G32B32A32FloatDecoder => R32G32B32A32Float, pixel::copy;
    Yuy2Decoder => Yuy2, pixel::yuy2;
    UyvyDecoder => Uyvy, pixel::uyvy;
    R8G8B8G8Decoder => R8G8B8G8, pixel::rgbg;
    G8R8G8B8Decoder => G8R8G8B8, pixel::grgb;
}

fn decompress<D: BlockDecoder>(width: u32, height: u32, data: &[u8]) -> DecodeResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(Malformed::ZeroDimension.into());
    }

    let format = D::FORMAT;
    let descriptor = format.descriptor();
    let expected = format.blocks_byte_size(width, height)?;
    if data.len() < expected {
        return Err(DecodeError::TruncatedStream {
            expected,
            actual: data.len(),
        });
    }

    let block_width = descriptor.block_width as usize;
    let block_height = descriptor.block_height as usize;
    let bytes_per_block = descriptor.bytes_per_block as usize;
    let bytes_per_pixel = descriptor.output_bytes_per_pixel();

    let blocks_x = width.div_ceil(descriptor.block_width) as usize;
    let blocks_y = height.div_ceil(descriptor.block_height) as usize;
    let padded_width = blocks_x * block_width;
    let padded_height = blocks_y * block_height;

    let pitch = padded_width
        .checked_mul(bytes_per_pixel)
        .ok_or(Malformed::SizeOverflow)?;
    let block_row_size = pitch
        .checked_mul(block_height)
        .ok_or(Malformed::SizeOverflow)?;
    let padded_size = block_row_size
        .checked_mul(blocks_y)
        .ok_or(Malformed::SizeOverflow)?;

    tracing::trace!(
        format = format.name(),
        width,
        height,
        blocks = blocks_x * blocks_y,
        "decoding surface"
    );

    let mut padded = vec![0u8; padded_size];
    let mut fallback_blocks = 0usize;

    let source_rows = data[..expected].chunks_exact(blocks_x * bytes_per_block);
    let output_rows = padded.chunks_exact_mut(block_row_size);

    for (source_row, output_row) in source_rows.zip(output_rows) {
        for (bx, compressed) in source_row.chunks_exact(bytes_per_block).enumerate() {
            let offset = bx * block_width * bytes_per_pixel;
            let outcome = D::decode_block(compressed, &mut output_row[offset..], pitch);
            if outcome == BlockOutcome::Fallback {
                fallback_blocks += 1;
            }
        }
    }

    if fallback_blocks > 0 {
        tracing::warn!(
            format = format.name(),
            width,
            height,
            fallback_blocks,
            "surface contains blocks with invalid encodings"
        );
    }

    let width = width as usize;
    let height = height as usize;
    if padded_width == width && padded_height == height {
        return Ok(padded);
    }

    let row_size = width * bytes_per_pixel;
    let mut decoded = Vec::with_capacity(row_size * height);
    for row in padded.chunks_exact(pitch).take(height) {
        decoded.extend_from_slice(&row[..row_size]);
    }

    Ok(decoded)
}

/// Decodes a single surface of `format` with the given dimensions.
///
/// `data` must hold at least [`PixelFormat::blocks_byte_size`] bytes, any
/// bytes beyond are ignored. The returned buffer holds exactly
/// `width * height` pixels in the format's [`PixelLayout`](crate::PixelLayout).
pub fn decode_surface(
    format: PixelFormat,
    width: u32,
    height: u32,
    data: &[u8],
) -> DecodeResult<Vec<u8>> {
    match format {
        #[cfg(feature = "bc15")]
        PixelFormat::Bc1 => decompress::<Bc1Decoder>(width, height, data),
        #[cfg(feature = "bc15")]
        PixelFormat::Bc2 => decompress::<Bc2Decoder>(width, height, data),
        #[cfg(feature = "bc15")]
        PixelFormat::Bc3 => decompress::<Bc3Decoder>(width, height, data),
        #[cfg(feature = "bc15")]
        PixelFormat::Bc4 => decompress::<Bc4Decoder>(width, height, data),
        #[cfg(feature = "bc15")]
        PixelFormat::Bc4S => decompress::<Bc4SDecoder>(width, height, data),
        #[cfg(feature = "bc15")]
        PixelFormat::Bc5 => decompress::<Bc5Decoder>(width, height, data),
        #[cfg(feature = "bc15")]
        PixelFormat::Bc5S => decompress::<Bc5SDecoder>(width, height, data),
        #[cfg(feature = "bc6h")]
        PixelFormat::Bc6H => decompress::<Bc6HDecoder<false>>(width, height, data),
        #[cfg(feature = "bc6h")]
        PixelFormat::Bc6HS => decompress::<Bc6HDecoder<true>>(width, height, data),
        #[cfg(feature = "bc7")]
        PixelFormat::Bc7 => decompress::<Bc7Decoder>(width, height, data),
        PixelFormat::R8 => decompress::<R8Decoder>(width, height, data),
        PixelFormat::A8 => decompress::<A8Decoder>(width, height, data),
        PixelFormat::L8 => decompress::<L8Decoder>(width, height, data),
        PixelFormat::R8G8 => decompress::<R8G8Decoder>(width, height, data),
        PixelFormat::A8L8 => decompress::<A8L8Decoder>(width, height, data),
        PixelFormat::R8G8B8 => decompress::<R8G8B8Decoder>(width, height, data),
        PixelFormat::B8G8R8 => decompress::<B8G8R8Decoder>(width, height, data),
        PixelFormat::R8G8B8A8 => decompress::<R8G8B8A8Decoder>(width, height, data),
        PixelFormat::B8G8R8A8 => decompress::<B8G8R8A8Decoder>(width, height, data),
        PixelFormat::B8G8R8X8 => decompress::<B8G8R8X8Decoder>(width, height, data),
        PixelFormat::R8G8B8X8 => decompress::<R8G8B8X8Decoder>(width, height, data),
        PixelFormat::B5G6R5 => decompress::<B5G6R5Decoder>(width, height, data),
        PixelFormat::B5G5R5A1 => decompress::<B5G5R5A1Decoder>(width, height, data),
        PixelFormat::B5G5R5X1 => decompress::<B5G5R5X1Decoder>(width, height, data),
        PixelFormat::B4G4R4A4 => decompress::<B4G4R4A4Decoder>(width, height, data),
        PixelFormat::R10G10B10A2 => decompress::<R10G10B10A2Decoder>(width, height, data),
        PixelFormat::B10G10R10A2 => decompress::<B10G10R10A2Decoder>(width, height, data),
        PixelFormat::R16 => decompress::<R16Decoder>(width, height, data),
        PixelFormat::L16 => decompress::<L16Decoder>(width, height, data),
        PixelFormat::R16G16 => decompress::<R16G16Decoder>(width, height, data),
        PixelFormat::R16G16B16A16 => decompress::<R16G16B16A16Decoder>(width, height, data),
        PixelFormat::R16Float => decompress::<R16FloatDecoder>(width, height, data),
        PixelFormat::R16G16Float => decompress::<R16G16FloatDecoder>(width, height, data),
        PixelFormat::R16G16B16A16Float => {
            decompress::<R16G16B16A16FloatDecoder>(width, height, data)
        }
        PixelFormat::R32Float => decompress::<R32FloatDecoder>(width, height, data),
        PixelFormat::R32G32Float => decompress::<R32G32FloatDecoder>(width, height, data),
        PixelFormat::R32G32B32Float => decompress::<R32G32B32FloatDecoder>(width, height, data),
        PixelFormat::R32G32B32A32Float => {
            decompress::<R32G32B32A32FloatDecoder>(width, height, data)
        }
        PixelFormat::Yuy2 => decompress::<Yuy2Decoder>(width, height, data),
        PixelFormat::Uyvy => decompress::<UyvyDecoder>(width, height, data),
        PixelFormat::R8G8B8G8 => decompress::<R8G8B8G8Decoder>(width, height, data),
        PixelFormat::G8R8G8B8 => decompress::<G8R8G8B8Decoder>(width, height, data),
        #[allow(unreachable_patterns)]
        _ => Err(UnsupportedFormat::Disabled(format.name()).into()),
    }
}
