//! OpenGL enums found in KTX headers.

use super::header::Header;
use crate::{error::UnsupportedFormat, PixelFormat};

// EXT_texture_compression_s3tc
const COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
const COMPRESSED_RGBA_S3TC_DXT1: u32 = 0x83F1;
const COMPRESSED_RGBA_S3TC_DXT3: u32 = 0x83F2;
const COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;
// EXT_texture_sRGB
const COMPRESSED_SRGB_S3TC_DXT1: u32 = 0x8C4C;
const COMPRESSED_SRGB_ALPHA_S3TC_DXT1: u32 = 0x8C4D;
const COMPRESSED_SRGB_ALPHA_S3TC_DXT3: u32 = 0x8C4E;
const COMPRESSED_SRGB_ALPHA_S3TC_DXT5: u32 = 0x8C4F;
// ARB_texture_compression_rgtc
const COMPRESSED_RED_RGTC1: u32 = 0x8DBB;
const COMPRESSED_SIGNED_RED_RGTC1: u32 = 0x8DBC;
const COMPRESSED_RG_RGTC2: u32 = 0x8DBD;
const COMPRESSED_SIGNED_RG_RGTC2: u32 = 0x8DBE;
// ARB_texture_compression_bptc
const COMPRESSED_RGBA_BPTC_UNORM: u32 = 0x8E8C;
const COMPRESSED_SRGB_ALPHA_BPTC_UNORM: u32 = 0x8E8D;
const COMPRESSED_RGB_BPTC_SIGNED_FLOAT: u32 = 0x8E8E;
const COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT: u32 = 0x8E8F;

// Sized internal formats
const ALPHA8: u32 = 0x803C;
const LUMINANCE8: u32 = 0x8040;
const LUMINANCE16: u32 = 0x8042;
const LUMINANCE8_ALPHA8: u32 = 0x8045;
const RGB8: u32 = 0x8051;
const RGBA8: u32 = 0x8058;
const RGB10_A2: u32 = 0x8059;
const RGBA16: u32 = 0x805B;
const R8: u32 = 0x8229;
const R16: u32 = 0x822A;
const RG8: u32 = 0x822B;
const RG16: u32 = 0x822C;
const R16F: u32 = 0x822D;
const R32F: u32 = 0x822E;
const RG16F: u32 = 0x822F;
const RG32F: u32 = 0x8230;
const RGBA32F: u32 = 0x8814;
const RGB32F: u32 = 0x8815;
const RGBA16F: u32 = 0x881A;
const SRGB8: u32 = 0x8C41;
const SRGB8_ALPHA8: u32 = 0x8C43;
const RGB565: u32 = 0x8D62;
const BGRA8: u32 = 0x93A1;

// Unsized formats, used by older writers together with `glType`
const RED: u32 = 0x1903;
const ALPHA: u32 = 0x1906;
const RGB: u32 = 0x1907;
const RGBA: u32 = 0x1908;
const LUMINANCE: u32 = 0x1909;
const LUMINANCE_ALPHA: u32 = 0x190A;
const BGR: u32 = 0x80E0;
const BGRA: u32 = 0x80E1;
const RG: u32 = 0x8227;

// Types
const UNSIGNED_BYTE: u32 = 0x1401;
const UNSIGNED_SHORT_5_6_5: u32 = 0x8363;

/// Maps the GL formats of a KTX header to a decodable format.
pub fn resolve_format(header: &Header) -> Result<PixelFormat, UnsupportedFormat> {
    let internal_format = header.gl_internal_format;
    let format = if header.is_compressed() {
        compressed_format(internal_format)
    } else {
        sized_format(internal_format)
            .or_else(|| unsized_format(header.gl_format, header.gl_type))
    };

    match format {
        Some(format) if format.is_enabled() => Ok(format),
        Some(format) => Err(UnsupportedFormat::Disabled(format.name())),
        None => Err(UnsupportedFormat::GlInternalFormat(internal_format)),
    }
}

fn compressed_format(internal_format: u32) -> Option<PixelFormat> {
    let format = match internal_format {
        COMPRESSED_RGB_S3TC_DXT1
        | COMPRESSED_RGBA_S3TC_DXT1
        | COMPRESSED_SRGB_S3TC_DXT1
        | COMPRESSED_SRGB_ALPHA_S3TC_DXT1 => PixelFormat::Bc1,
        COMPRESSED_RGBA_S3TC_DXT3 | COMPRESSED_SRGB_ALPHA_S3TC_DXT3 => PixelFormat::Bc2,
        COMPRESSED_RGBA_S3TC_DXT5 | COMPRESSED_SRGB_ALPHA_S3TC_DXT5 => PixelFormat::Bc3,
        COMPRESSED_RED_RGTC1 => PixelFormat::Bc4,
        COMPRESSED_SIGNED_RED_RGTC1 => PixelFormat::Bc4S,
        COMPRESSED_RG_RGTC2 => PixelFormat::Bc5,
        COMPRESSED_SIGNED_RG_RGTC2 => PixelFormat::Bc5S,
        COMPRESSED_RGBA_BPTC_UNORM | COMPRESSED_SRGB_ALPHA_BPTC_UNORM => PixelFormat::Bc7,
        COMPRESSED_RGB_BPTC_SIGNED_FLOAT => PixelFormat::Bc6HS,
        COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT => PixelFormat::Bc6H,
        _ => return None,
    };
    Some(format)
}

fn sized_format(internal_format: u32) -> Option<PixelFormat> {
    let format = match internal_format {
        ALPHA8 => PixelFormat::A8,
        LUMINANCE8 => PixelFormat::L8,
        LUMINANCE16 => PixelFormat::L16,
        LUMINANCE8_ALPHA8 => PixelFormat::A8L8,
        R8 => PixelFormat::R8,
        RG8 => PixelFormat::R8G8,
        RGB8 | SRGB8 => PixelFormat::R8G8B8,
        RGBA8 | SRGB8_ALPHA8 => PixelFormat::R8G8B8A8,
        BGRA8 => PixelFormat::B8G8R8A8,
        RGB565 => PixelFormat::B5G6R5,
        RGB10_A2 => PixelFormat::R10G10B10A2,
        R16 => PixelFormat::R16,
        RG16 => PixelFormat::R16G16,
        RGBA16 => PixelFormat::R16G16B16A16,
        R16F => PixelFormat::R16Float,
        RG16F => PixelFormat::R16G16Float,
        RGBA16F => PixelFormat::R16G16B16A16Float,
        R32F => PixelFormat::R32Float,
        RG32F => PixelFormat::R32G32Float,
        RGB32F => PixelFormat::R32G32B32Float,
        RGBA32F => PixelFormat::R32G32B32A32Float,
        _ => return None,
    };
    Some(format)
}

fn unsized_format(format: u32, ty: u32) -> Option<PixelFormat> {
    let format = match (format, ty) {
        (RED, UNSIGNED_BYTE) => PixelFormat::R8,
        (RG, UNSIGNED_BYTE) => PixelFormat::R8G8,
        (RGB, UNSIGNED_BYTE) => PixelFormat::R8G8B8,
        (RGBA, UNSIGNED_BYTE) => PixelFormat::R8G8B8A8,
        (BGR, UNSIGNED_BYTE) => PixelFormat::B8G8R8,
        (BGRA, UNSIGNED_BYTE) => PixelFormat::B8G8R8A8,
        (ALPHA, UNSIGNED_BYTE) => PixelFormat::A8,
        (LUMINANCE, UNSIGNED_BYTE) => PixelFormat::L8,
        (LUMINANCE_ALPHA, UNSIGNED_BYTE) => PixelFormat::A8L8,
        (RGB, UNSIGNED_SHORT_5_6_5) => PixelFormat::B5G6R5,
        _ => return None,
    };
    Some(format)
}
