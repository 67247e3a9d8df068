use super::{
    dxgi::DxgiFormat,
    header::{BitFlags, Header, PixelFormatFlags, PixelFormatHeader},
};
use crate::{error::UnsupportedFormat, PixelFormat};

// D3DFORMAT values stored directly in the FourCC field.
const D3DFMT_A16B16G16R16: u32 = 36;
const D3DFMT_R16F: u32 = 111;
const D3DFMT_G16R16F: u32 = 112;
const D3DFMT_A16B16G16R16F: u32 = 113;
const D3DFMT_R32F: u32 = 114;
const D3DFMT_G32R32F: u32 = 115;
const D3DFMT_A32B32G32R32F: u32 = 116;

/// Maps the pixel format of a DDS header to a decodable format.
///
/// The DX10 header takes precedence, then the FourCC, then the bit masks.
/// A format whose decoder was compiled out is reported as
/// [`UnsupportedFormat::Disabled`].
pub fn resolve_format(header: &Header) -> Result<PixelFormat, UnsupportedFormat> {
    let format = match &header.dx10 {
        Some(dx10) => resolve_dxgi(dx10.dxgi_format)?,
        None => match header.pixel_format.four_cc() {
            Some(four_cc) => resolve_four_cc(four_cc)?,
            None => resolve_masks(&header.pixel_format)?,
        },
    };

    if format.is_enabled() {
        Ok(format)
    } else {
        Err(UnsupportedFormat::Disabled(format.name()))
    }
}

fn resolve_dxgi(code: u32) -> Result<PixelFormat, UnsupportedFormat> {
    DxgiFormat::try_from(code)
        .ok()
        .and_then(DxgiFormat::pixel_format)
        .ok_or(UnsupportedFormat::Dxgi(code))
}

fn resolve_four_cc(four_cc: [u8; 4]) -> Result<PixelFormat, UnsupportedFormat> {
    let format = match &four_cc {
        b"DXT1" => PixelFormat::Bc1,
        b"DXT3" => PixelFormat::Bc2,
        b"DXT5" => PixelFormat::Bc3,
        b"ATI1" | b"BC4U" => PixelFormat::Bc4,
        b"BC4S" => PixelFormat::Bc4S,
        b"ATI2" | b"BC5U" => PixelFormat::Bc5,
        b"BC5S" => PixelFormat::Bc5S,
        b"YUY2" => PixelFormat::Yuy2,
        b"UYVY" => PixelFormat::Uyvy,
        b"RGBG" => PixelFormat::R8G8B8G8,
        b"GRGB" => PixelFormat::G8R8G8B8,
        _ => match u32::from_le_bytes(four_cc) {
            D3DFMT_A16B16G16R16 => PixelFormat::R16G16B16A16,
            D3DFMT_R16F => PixelFormat::R16Float,
            D3DFMT_G16R16F => PixelFormat::R16G16Float,
            D3DFMT_A16B16G16R16F => PixelFormat::R16G16B16A16Float,
            D3DFMT_R32F => PixelFormat::R32Float,
            D3DFMT_G32R32F => PixelFormat::R32G32Float,
            D3DFMT_A32B32G32R32F => PixelFormat::R32G32B32A32Float,
            // DXT2 and DXT4 store premultiplied alpha and land here too.
            _ => return Err(UnsupportedFormat::FourCc(four_cc)),
        },
    };
    Ok(format)
}

/// Matches the bit masks of an uncompressed format against the layouts
/// written by D3DX and DirectXTex.
fn resolve_masks(pixel_format: &PixelFormatHeader) -> Result<PixelFormat, UnsupportedFormat> {
    let flags = pixel_format.flags;
    let alpha_mask = if flags.has_bits(PixelFormatFlags::ALPHA_PIXELS) {
        pixel_format.a_bit_mask
    } else {
        0
    };
    let masks = [
        pixel_format.r_bit_mask,
        pixel_format.g_bit_mask,
        pixel_format.b_bit_mask,
        alpha_mask,
    ];
    let bit_count = pixel_format.rgb_bit_count;

    let format = if flags.has_bits(PixelFormatFlags::RGB) {
        match (bit_count, masks) {
            (32, [0xFF, 0xFF00, 0xFF0000, 0xFF000000]) => Some(PixelFormat::R8G8B8A8),
            (32, [0xFF0000, 0xFF00, 0xFF, 0xFF000000]) => Some(PixelFormat::B8G8R8A8),
            (32, [0xFF0000, 0xFF00, 0xFF, 0]) => Some(PixelFormat::B8G8R8X8),
            (32, [0xFF, 0xFF00, 0xFF0000, 0]) => Some(PixelFormat::R8G8B8X8),
            (32, [0x3FF, 0xFFC00, 0x3FF00000, 0xC0000000]) => Some(PixelFormat::R10G10B10A2),
            (32, [0x3FF00000, 0xFFC00, 0x3FF, 0xC0000000]) => Some(PixelFormat::B10G10R10A2),
            (32, [0xFFFF, 0xFFFF0000, 0, 0]) => Some(PixelFormat::R16G16),
            (24, [0xFF0000, 0xFF00, 0xFF, 0]) => Some(PixelFormat::B8G8R8),
            (24, [0xFF, 0xFF00, 0xFF0000, 0]) => Some(PixelFormat::R8G8B8),
            (16, [0xF800, 0x7E0, 0x1F, 0]) => Some(PixelFormat::B5G6R5),
            (16, [0x7C00, 0x3E0, 0x1F, 0x8000]) => Some(PixelFormat::B5G5R5A1),
            (16, [0x7C00, 0x3E0, 0x1F, 0]) => Some(PixelFormat::B5G5R5X1),
            (16, [0xF00, 0xF0, 0xF, 0xF000]) => Some(PixelFormat::B4G4R4A4),
            (16, [0xFF, 0xFF00, 0, 0]) => Some(PixelFormat::R8G8),
            (16, [0xFFFF, 0, 0, 0]) => Some(PixelFormat::R16),
            (8, [0xFF, 0, 0, 0]) => Some(PixelFormat::R8),
            _ => None,
        }
    } else if flags.has_bits(PixelFormatFlags::LUMINANCE) {
        match (bit_count, masks) {
            (8, [0xFF, 0, 0, 0]) => Some(PixelFormat::L8),
            (16, [0xFFFF, 0, 0, 0]) => Some(PixelFormat::L16),
            (16, [0xFF, 0, 0, 0xFF00]) => Some(PixelFormat::A8L8),
            _ => None,
        }
    } else if flags.has_bits(PixelFormatFlags::ALPHA) {
        match (bit_count, pixel_format.a_bit_mask) {
            (8, 0xFF) => Some(PixelFormat::A8),
            _ => None,
        }
    } else {
        None
    };

    format.ok_or(UnsupportedFormat::PixelMasks {
        flags: flags.bits(),
        bit_count,
        masks: [
            pixel_format.r_bit_mask,
            pixel_format.g_bit_mask,
            pixel_format.b_bit_mask,
            pixel_format.a_bit_mask,
        ],
    })
}
