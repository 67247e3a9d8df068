use crate::error::Malformed;

/// Pixel formats this crate can decode.
///
/// Block compressed formats decode 4x4 blocks, the packed 4:2:2 formats
/// decode pairs of pixels and all other formats decode single pixels.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum PixelFormat {
    /// BC1 / DXT1 (RGB with optional 1 bit alpha)
    Bc1,
    /// BC2 / DXT3 (RGB with explicit 4 bit alpha)
    Bc2,
    /// BC3 / DXT5 (RGB with interpolated alpha)
    Bc3,
    /// BC4 (R)
    Bc4,
    /// BC4 signed (R)
    Bc4S,
    /// BC5 (RG)
    Bc5,
    /// BC5 signed (RG)
    Bc5S,
    /// BC6H unsigned (RGB HDR)
    Bc6H,
    /// BC6H signed (RGB HDR)
    Bc6HS,
    /// BC7 (RGBA)
    Bc7,
    R8,
    A8,
    L8,
    R8G8,
    /// Luminance in the low byte, alpha in the high byte.
    A8L8,
    /// 24 bit RGB stored red first.
    R8G8B8,
    /// 24 bit RGB stored blue first (the legacy D3D9 layout).
    B8G8R8,
    R8G8B8A8,
    B8G8R8A8,
    B8G8R8X8,
    R8G8B8X8,
    B5G6R5,
    B5G5R5A1,
    B5G5R5X1,
    B4G4R4A4,
    R10G10B10A2,
    B10G10R10A2,
    R16,
    L16,
    R16G16,
    R16G16B16A16,
    R16Float,
    R16G16Float,
    R16G16B16A16Float,
    R32Float,
    R32G32Float,
    R32G32B32Float,
    R32G32B32A32Float,
    /// Packed 4:2:2 YUV, byte order Y0 U Y1 V.
    Yuy2,
    /// Packed 4:2:2 YUV, byte order U Y0 V Y1.
    Uyvy,
    /// Packed RGBG pairs, byte order R G0 B G1.
    R8G8B8G8,
    /// Packed GRGB pairs, byte order G0 R G1 B.
    G8R8G8B8,
}

/// Channel layout of decoded pixels.
///
/// Multi-byte channels are stored little endian. Float layouts hold IEEE
/// half or single precision values.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub enum PixelLayout {
    L8,
    A8,
    Rg8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    Rg16,
    Rgba16,
    R16F,
    Rg16F,
    Rgba16F,
    R32F,
    Rg32F,
    Rgb32F,
    Rgba32F,
}

impl PixelLayout {
    /// Number of channels per pixel.
    pub const fn channel_count(self) -> usize {
        match self {
            PixelLayout::L8
            | PixelLayout::A8
            | PixelLayout::L16
            | PixelLayout::R16F
            | PixelLayout::R32F => 1,
            PixelLayout::Rg8
            | PixelLayout::La8
            | PixelLayout::Rg16
            | PixelLayout::Rg16F
            | PixelLayout::Rg32F => 2,
            PixelLayout::Rgb8 | PixelLayout::Rgb32F => 3,
            PixelLayout::Rgba8
            | PixelLayout::Rgba16
            | PixelLayout::Rgba16F
            | PixelLayout::Rgba32F => 4,
        }
    }

    /// Bytes of one decoded pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        let channel_size = match self {
            PixelLayout::L8
            | PixelLayout::A8
            | PixelLayout::Rg8
            | PixelLayout::La8
            | PixelLayout::Rgb8
            | PixelLayout::Rgba8 => 1,
            PixelLayout::L16
            | PixelLayout::Rg16
            | PixelLayout::Rgba16
            | PixelLayout::R16F
            | PixelLayout::Rg16F
            | PixelLayout::Rgba16F => 2,
            PixelLayout::R32F
            | PixelLayout::Rg32F
            | PixelLayout::Rgb32F
            | PixelLayout::Rgba32F => 4,
        };
        channel_size * self.channel_count()
    }
}

/// Fixed geometry of a [`PixelFormat`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FormatDescriptor {
    pub bits_per_pixel: u32,
    pub block_width: u32,
    pub block_height: u32,
    pub bytes_per_block: u32,
    pub is_compressed: bool,
    pub layout: PixelLayout,
}

impl FormatDescriptor {
    const fn block(bytes_per_block: u32, layout: PixelLayout) -> Self {
        Self {
            bits_per_pixel: bytes_per_block * 8 / 16,
            block_width: 4,
            block_height: 4,
            bytes_per_block,
            is_compressed: true,
            layout,
        }
    }

    const fn pixel(bytes_per_pixel: u32, layout: PixelLayout) -> Self {
        Self {
            bits_per_pixel: bytes_per_pixel * 8,
            block_width: 1,
            block_height: 1,
            bytes_per_block: bytes_per_pixel,
            is_compressed: false,
            layout,
        }
    }

    const fn pair(layout: PixelLayout) -> Self {
        Self {
            bits_per_pixel: 16,
            block_width: 2,
            block_height: 1,
            bytes_per_block: 4,
            is_compressed: false,
            layout,
        }
    }

    /// Bytes of one decoded pixel.
    pub const fn output_bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel()
    }
}

impl PixelFormat {
    /// Returns the geometry and output layout of the format.
    pub const fn descriptor(self) -> FormatDescriptor {
        use PixelLayout as L;

        match self {
            PixelFormat::Bc1 => FormatDescriptor::block(8, L::Rgba8),
            PixelFormat::Bc2 | PixelFormat::Bc3 | PixelFormat::Bc7 => {
                FormatDescriptor::block(16, L::Rgba8)
            }
            PixelFormat::Bc4 | PixelFormat::Bc4S => FormatDescriptor::block(8, L::L8),
            PixelFormat::Bc5 | PixelFormat::Bc5S => FormatDescriptor::block(16, L::Rgb8),
            PixelFormat::Bc6H | PixelFormat::Bc6HS => FormatDescriptor::block(16, L::Rgb8),
            PixelFormat::R8 | PixelFormat::L8 => FormatDescriptor::pixel(1, L::L8),
            PixelFormat::A8 => FormatDescriptor::pixel(1, L::A8),
            PixelFormat::R8G8 => FormatDescriptor::pixel(2, L::Rg8),
            PixelFormat::A8L8 => FormatDescriptor::pixel(2, L::La8),
            PixelFormat::R8G8B8 | PixelFormat::B8G8R8 => FormatDescriptor::pixel(3, L::Rgb8),
            PixelFormat::R8G8B8A8 | PixelFormat::B8G8R8A8 => {
                FormatDescriptor::pixel(4, L::Rgba8)
            }
            PixelFormat::B8G8R8X8 | PixelFormat::R8G8B8X8 => FormatDescriptor::pixel(4, L::Rgb8),
            PixelFormat::B5G6R5 | PixelFormat::B5G5R5X1 => FormatDescriptor::pixel(2, L::Rgb8),
            PixelFormat::B5G5R5A1 | PixelFormat::B4G4R4A4 => FormatDescriptor::pixel(2, L::Rgba8),
            PixelFormat::R10G10B10A2 | PixelFormat::B10G10R10A2 => {
                FormatDescriptor::pixel(4, L::Rgba16)
            }
            PixelFormat::R16 | PixelFormat::L16 => FormatDescriptor::pixel(2, L::L16),
            PixelFormat::R16G16 => FormatDescriptor::pixel(4, L::Rg16),
            PixelFormat::R16G16B16A16 => FormatDescriptor::pixel(8, L::Rgba16),
            PixelFormat::R16Float => FormatDescriptor::pixel(2, L::R16F),
            PixelFormat::R16G16Float => FormatDescriptor::pixel(4, L::Rg16F),
            PixelFormat::R16G16B16A16Float => FormatDescriptor::pixel(8, L::Rgba16F),
            PixelFormat::R32Float => FormatDescriptor::pixel(4, L::R32F),
            PixelFormat::R32G32Float => FormatDescriptor::pixel(8, L::Rg32F),
            PixelFormat::R32G32B32Float => FormatDescriptor::pixel(12, L::Rgb32F),
            PixelFormat::R32G32B32A32Float => FormatDescriptor::pixel(16, L::Rgba32F),
            PixelFormat::Yuy2
            | PixelFormat::Uyvy
            | PixelFormat::R8G8B8G8
            | PixelFormat::G8R8G8B8 => FormatDescriptor::pair(L::Rgb8),
        }
    }

    /// Channel layout of the decoded pixels.
    pub const fn layout(self) -> PixelLayout {
        self.descriptor().layout
    }

    /// Whether the format stores 4x4 compressed blocks.
    pub const fn is_compressed(self) -> bool {
        self.descriptor().is_compressed
    }

    /// Whether the decoder for this format was compiled in.
    pub const fn is_enabled(self) -> bool {
        match self {
            PixelFormat::Bc1
            | PixelFormat::Bc2
            | PixelFormat::Bc3
            | PixelFormat::Bc4
            | PixelFormat::Bc4S
            | PixelFormat::Bc5
            | PixelFormat::Bc5S => cfg!(feature = "bc15"),
            PixelFormat::Bc6H | PixelFormat::Bc6HS => cfg!(feature = "bc6h"),
            PixelFormat::Bc7 => cfg!(feature = "bc7"),
            _ => true,
        }
    }

    /// Returns the byte size of the encoded surface for the given dimensions.
    ///
    /// Width and height are rounded up to whole blocks.
    pub fn blocks_byte_size(self, width: u32, height: u32) -> Result<usize, Malformed> {
        let descriptor = self.descriptor();
        let blocks_x = width.div_ceil(descriptor.block_width) as usize;
        let blocks_y = height.div_ceil(descriptor.block_height) as usize;

        blocks_x
            .checked_mul(blocks_y)
            .and_then(|blocks| blocks.checked_mul(descriptor.bytes_per_block as usize))
            .ok_or(Malformed::SizeOverflow)
    }

    /// Returns the bytes per encoded row of blocks for the given width.
    pub const fn bytes_per_row(self, width: u32) -> usize {
        let descriptor = self.descriptor();
        width.div_ceil(descriptor.block_width) as usize * descriptor.bytes_per_block as usize
    }

    /// Returns the byte size of the decoded surface.
    pub fn decoded_byte_size(self, width: u32, height: u32) -> Result<usize, Malformed> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(self.layout().bytes_per_pixel()))
            .ok_or(Malformed::SizeOverflow)
    }

    /// Lowercase display name.
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Bc1 => "bc1",
            PixelFormat::Bc2 => "bc2",
            PixelFormat::Bc3 => "bc3",
            PixelFormat::Bc4 => "bc4",
            PixelFormat::Bc4S => "bc4s",
            PixelFormat::Bc5 => "bc5",
            PixelFormat::Bc5S => "bc5s",
            PixelFormat::Bc6H => "bc6h",
            PixelFormat::Bc6HS => "bc6hs",
            PixelFormat::Bc7 => "bc7",
            PixelFormat::R8 => "r8",
            PixelFormat::A8 => "a8",
            PixelFormat::L8 => "l8",
            PixelFormat::R8G8 => "r8g8",
            PixelFormat::A8L8 => "a8l8",
            PixelFormat::R8G8B8 => "r8g8b8",
            PixelFormat::B8G8R8 => "b8g8r8",
            PixelFormat::R8G8B8A8 => "r8g8b8a8",
            PixelFormat::B8G8R8A8 => "b8g8r8a8",
            PixelFormat::B8G8R8X8 => "b8g8r8x8",
            PixelFormat::R8G8B8X8 => "r8g8b8x8",
            PixelFormat::B5G6R5 => "b5g6r5",
            PixelFormat::B5G5R5A1 => "b5g5r5a1",
            PixelFormat::B5G5R5X1 => "b5g5r5x1",
            PixelFormat::B4G4R4A4 => "b4g4r4a4",
            PixelFormat::R10G10B10A2 => "r10g10b10a2",
            PixelFormat::B10G10R10A2 => "b10g10r10a2",
            PixelFormat::R16 => "r16",
            PixelFormat::L16 => "l16",
            PixelFormat::R16G16 => "r16g16",
            PixelFormat::R16G16B16A16 => "r16g16b16a16",
            PixelFormat::R16Float => "r16f",
            PixelFormat::R16G16Float => "r16g16f",
            PixelFormat::R16G16B16A16Float => "r16g16b16a16f",
            PixelFormat::R32Float => "r32f",
            PixelFormat::R32G32Float => "r32g32f",
            PixelFormat::R32G32B32Float => "r32g32b32f",
            PixelFormat::R32G32B32A32Float => "r32g32b32a32f",
            PixelFormat::Yuy2 => "yuy2",
            PixelFormat::Uyvy => "uyvy",
            PixelFormat::R8G8B8G8 => "r8g8b8g8",
            PixelFormat::G8R8G8B8 => "g8r8g8b8",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes_round_up() {
        assert_eq!(PixelFormat::Bc1.blocks_byte_size(4, 4), Ok(8));
        assert_eq!(PixelFormat::Bc1.blocks_byte_size(5, 5), Ok(32));
        assert_eq!(PixelFormat::Bc3.blocks_byte_size(8, 8), Ok(64));
        assert_eq!(PixelFormat::Bc7.blocks_byte_size(1, 1), Ok(16));
        assert_eq!(PixelFormat::Yuy2.blocks_byte_size(3, 2), Ok(16));
        assert_eq!(PixelFormat::R8G8B8.blocks_byte_size(3, 2), Ok(18));
    }

    #[test]
    fn bytes_per_row_counts_whole_blocks() {
        assert_eq!(PixelFormat::Bc1.bytes_per_row(9), 24);
        assert_eq!(PixelFormat::Bc5.bytes_per_row(4), 16);
        assert_eq!(PixelFormat::B5G6R5.bytes_per_row(7), 14);
    }

    #[test]
    fn compressed_formats_use_four_by_four_blocks() {
        for format in [
            PixelFormat::Bc1,
            PixelFormat::Bc2,
            PixelFormat::Bc3,
            PixelFormat::Bc4,
            PixelFormat::Bc4S,
            PixelFormat::Bc5,
            PixelFormat::Bc5S,
            PixelFormat::Bc6H,
            PixelFormat::Bc6HS,
            PixelFormat::Bc7,
        ] {
            let descriptor = format.descriptor();
            assert!(format.is_compressed(), "{}", format.name());
            assert_eq!(descriptor.block_width, 4);
            assert_eq!(descriptor.block_height, 4);
        }
        assert_eq!(PixelFormat::Bc1.descriptor().bits_per_pixel, 4);
        assert_eq!(PixelFormat::Bc7.descriptor().bits_per_pixel, 8);
    }

    #[test]
    fn r32_float_is_single_channel() {
        assert_eq!(PixelFormat::R32Float.layout(), PixelLayout::R32F);
        assert_eq!(PixelFormat::R32Float.layout().channel_count(), 1);
        assert_eq!(PixelFormat::R32G32B32A32Float.layout().bytes_per_pixel(), 16);
    }

    #[test]
    fn decoded_size_uses_the_output_layout() {
        assert_eq!(PixelFormat::Bc3.decoded_byte_size(8, 8), Ok(256));
        assert_eq!(PixelFormat::Bc5.decoded_byte_size(5, 3), Ok(45));
        assert_eq!(PixelFormat::B10G10R10A2.decoded_byte_size(2, 2), Ok(32));
        assert_eq!(
            PixelFormat::R32G32B32A32Float.decoded_byte_size(u32::MAX, u32::MAX),
            Err(Malformed::SizeOverflow)
        );
    }
}
