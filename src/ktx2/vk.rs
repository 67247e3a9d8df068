//! Vulkan formats found in KTX2 headers.

use super::header::Header;
use crate::{error::UnsupportedFormat, PixelFormat};

/// Maps the `vkFormat` of a KTX2 header to a decodable format.
///
/// Supercompressed payloads are rejected before the format is looked at.
pub fn resolve_format(header: &Header) -> Result<PixelFormat, UnsupportedFormat> {
    if header.supercompression_scheme != 0 {
        return Err(UnsupportedFormat::Supercompression(
            header.supercompression_scheme,
        ));
    }

    match pixel_format(header.vk_format) {
        Some(format) if format.is_enabled() => Ok(format),
        Some(format) => Err(UnsupportedFormat::Disabled(format.name())),
        None => Err(UnsupportedFormat::VkFormat(header.vk_format)),
    }
}

/// sRGB variants decode like their linear counterparts.
const fn pixel_format(vk_format: u32) -> Option<PixelFormat> {
    let format = match vk_format {
        // VK_FORMAT_R5G6B5_UNORM_PACK16
        4 => PixelFormat::B5G6R5,
        // VK_FORMAT_A1R5G5B5_UNORM_PACK16
        8 => PixelFormat::B5G5R5A1,
        // VK_FORMAT_R8_UNORM, VK_FORMAT_R8_SRGB
        9 | 15 => PixelFormat::R8,
        // VK_FORMAT_R8G8_UNORM, VK_FORMAT_R8G8_SRGB
        16 | 22 => PixelFormat::R8G8,
        // VK_FORMAT_R8G8B8_UNORM, VK_FORMAT_R8G8B8_SRGB
        23 | 29 => PixelFormat::R8G8B8,
        // VK_FORMAT_B8G8R8_UNORM, VK_FORMAT_B8G8R8_SRGB
        30 | 36 => PixelFormat::B8G8R8,
        // VK_FORMAT_R8G8B8A8_UNORM, VK_FORMAT_R8G8B8A8_SRGB
        // VK_FORMAT_A8B8G8R8_UNORM_PACK32, VK_FORMAT_A8B8G8R8_SRGB_PACK32
        37 | 43 | 51 | 57 => PixelFormat::R8G8B8A8,
        // VK_FORMAT_B8G8R8A8_UNORM, VK_FORMAT_B8G8R8A8_SRGB
        44 | 50 => PixelFormat::B8G8R8A8,
        // VK_FORMAT_A2R10G10B10_UNORM_PACK32
        58 => PixelFormat::B10G10R10A2,
        // VK_FORMAT_A2B10G10R10_UNORM_PACK32
        64 => PixelFormat::R10G10B10A2,
        // VK_FORMAT_R16_UNORM
        70 => PixelFormat::R16,
        // VK_FORMAT_R16_SFLOAT
        76 => PixelFormat::R16Float,
        // VK_FORMAT_R16G16_UNORM
        77 => PixelFormat::R16G16,
        // VK_FORMAT_R16G16_SFLOAT
        83 => PixelFormat::R16G16Float,
        // VK_FORMAT_R16G16B16A16_UNORM
        91 => PixelFormat::R16G16B16A16,
        // VK_FORMAT_R16G16B16A16_SFLOAT
        97 => PixelFormat::R16G16B16A16Float,
        // VK_FORMAT_R32_SFLOAT
        100 => PixelFormat::R32Float,
        // VK_FORMAT_R32G32_SFLOAT
        103 => PixelFormat::R32G32Float,
        // VK_FORMAT_R32G32B32_SFLOAT
        106 => PixelFormat::R32G32B32Float,
        // VK_FORMAT_R32G32B32A32_SFLOAT
        109 => PixelFormat::R32G32B32A32Float,
        // VK_FORMAT_BC1_RGB_UNORM_BLOCK ..= VK_FORMAT_BC1_RGBA_SRGB_BLOCK
        131..=134 => PixelFormat::Bc1,
        // VK_FORMAT_BC2_UNORM_BLOCK, VK_FORMAT_BC2_SRGB_BLOCK
        135 | 136 => PixelFormat::Bc2,
        // VK_FORMAT_BC3_UNORM_BLOCK, VK_FORMAT_BC3_SRGB_BLOCK
        137 | 138 => PixelFormat::Bc3,
        139 => PixelFormat::Bc4,
        140 => PixelFormat::Bc4S,
        141 => PixelFormat::Bc5,
        142 => PixelFormat::Bc5S,
        143 => PixelFormat::Bc6H,
        144 => PixelFormat::Bc6HS,
        // VK_FORMAT_BC7_UNORM_BLOCK, VK_FORMAT_BC7_SRGB_BLOCK
        145 | 146 => PixelFormat::Bc7,
        // VK_FORMAT_A4R4G4B4_UNORM_PACK16
        1_000_340_000 => PixelFormat::B4G4R4A4,
        // VK_FORMAT_A8_UNORM_KHR
        1_000_470_001 => PixelFormat::A8,
        _ => return None,
    };
    Some(format)
}
