#![allow(dead_code)]

use block_decompression::{ktx, ktx2};

pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_DEPTH: u32 = 0x800000;

pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;

pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS2_CUBEMAP_ALL_FACES: u32 = 0xFE00;
pub const DDSCAPS2_VOLUME: u32 = 0x200000;

/// BC7 mode 6 block decoding to (255, 1, 1, 255) in every pixel.
pub const BC7_MODE_6_BLOCK: [u8; 16] =
    ((1u128 << 6) | (127 << 7) | (127 << 49) | (1 << 63)).to_le_bytes();

/// Pixel format of a DDS header, either a FourCC or bit masks.
#[derive(Clone, Copy)]
pub enum DdsPixelFormat {
    FourCc(&'static [u8; 4]),
    Masks {
        flags: u32,
        bit_count: u32,
        masks: [u32; 4],
    },
}

/// Builds a DDS file without DX10 header.
pub struct DdsBuilder {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mipmap_count: u32,
    pub pixel_format: DdsPixelFormat,
    pub caps2: u32,
}

impl DdsBuilder {
    pub fn new(width: u32, height: u32, four_cc: &'static [u8; 4]) -> Self {
        Self {
            width,
            height,
            depth: 0,
            mipmap_count: 1,
            pixel_format: DdsPixelFormat::FourCc(four_cc),
            caps2: 0,
        }
    }

    pub fn with_masks(
        width: u32,
        height: u32,
        flags: u32,
        bit_count: u32,
        masks: [u32; 4],
    ) -> Self {
        Self {
            pixel_format: DdsPixelFormat::Masks {
                flags,
                bit_count,
                masks,
            },
            ..Self::new(width, height, b"\0\0\0\0")
        }
    }

    pub fn mipmap_count(mut self, mipmap_count: u32) -> Self {
        self.mipmap_count = mipmap_count;
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self.caps2 |= DDSCAPS2_VOLUME;
        self
    }

    pub fn cubemap(mut self) -> Self {
        self.caps2 |= DDSCAPS2_CUBEMAP_ALL_FACES;
        self
    }

    pub fn build(&self, payload: &[u8]) -> Vec<u8> {
        let mut fields = Vec::with_capacity(31);
        fields.push(124);
        fields.push(
            DDSD_CAPS
                | DDSD_HEIGHT
                | DDSD_WIDTH
                | DDSD_PIXELFORMAT
                | DDSD_MIPMAPCOUNT
                | if self.depth > 0 { DDSD_DEPTH } else { 0 },
        );
        fields.extend([self.height, self.width, 0, self.depth, self.mipmap_count]);
        fields.extend([0; 11]);
        fields.push(32);
        match self.pixel_format {
            DdsPixelFormat::FourCc(four_cc) => {
                fields.extend([DDPF_FOURCC, u32::from_le_bytes(*four_cc), 0, 0, 0, 0, 0]);
            }
            DdsPixelFormat::Masks {
                flags,
                bit_count,
                masks,
            } => {
                fields.extend([flags, 0, bit_count]);
                fields.extend(masks);
            }
        }
        fields.extend([DDSCAPS_TEXTURE, self.caps2, 0, 0, 0]);

        let mut bytes = b"DDS ".to_vec();
        for field in fields {
            bytes.extend_from_slice(&field.to_le_bytes());
        }
        bytes.extend_from_slice(payload);
        bytes
    }
}

/// Builds a KTX file holding one uncompressed or compressed 2D texture.
pub fn ktx_file(
    gl_type: u32,
    gl_format: u32,
    gl_internal_format: u32,
    width: u32,
    height: u32,
    levels: &[&[u8]],
) -> Vec<u8> {
    let mut bytes = ktx::IDENTIFIER.to_vec();
    let fields = [
        0x0403_0201,
        gl_type,
        1,
        gl_format,
        gl_internal_format,
        gl_format,
        width,
        height,
        0,
        0,
        1,
        levels.len() as u32,
        0,
    ];
    for field in fields {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    for level in levels {
        bytes.extend_from_slice(&(level.len() as u32).to_le_bytes());
        bytes.extend_from_slice(level);
    }
    bytes
}

/// Builds a KTX2 file holding one 2D texture, levels stored after the
/// level index in index order.
pub fn ktx2_file(vk_format: u32, width: u32, height: u32, levels: &[&[u8]]) -> Vec<u8> {
    let mut bytes = ktx2::IDENTIFIER.to_vec();
    let fields = [
        vk_format,
        1,
        width,
        height,
        0,
        0,
        1,
        levels.len() as u32,
        0,
        0,
        0,
        0,
        0,
    ];
    for field in fields {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    bytes.extend_from_slice(&[0; 16]);

    let mut offset = ktx2::HEADER_SIZE + ktx2::LEVEL_INDEX_ENTRY_SIZE * levels.len();
    for level in levels {
        for value in [offset, level.len(), level.len()] {
            bytes.extend_from_slice(&(value as u64).to_le_bytes());
        }
        offset += level.len();
    }
    for level in levels {
        bytes.extend_from_slice(level);
    }
    bytes
}
