use std::io::{self, Read};

use byteorder_lite::{LittleEndian, ReadBytesExt};

use crate::error::{DecodeError, DecodeResult, Malformed};

/// Size of the header and the fixed part of the index, including the
/// identifier.
pub const HEADER_SIZE: usize = 80;
/// Size of one level index entry.
pub const LEVEL_INDEX_ENTRY_SIZE: usize = 24;

/// The KTX2 header, its index and the level index.
///
/// <https://registry.khronos.org/KTX/specs/2.0/ktxspec.v2.html>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// `VK_FORMAT_UNDEFINED` (0) for Basis Universal payloads.
    pub vk_format: u32,
    pub type_size: u32,
    pub pixel_width: u32,
    /// `0` for 1D textures.
    pub pixel_height: u32,
    /// `0` for everything but 3D textures.
    pub pixel_depth: u32,
    /// `0` for textures that are not arrays.
    pub layer_count: u32,
    pub face_count: u32,
    /// `0` asks the loader to generate the chain, only the base level is stored.
    pub level_count: u32,
    pub supercompression_scheme: u32,
    pub dfd_byte_offset: u32,
    pub dfd_byte_length: u32,
    pub kvd_byte_offset: u32,
    pub kvd_byte_length: u32,
    pub sgd_byte_offset: u64,
    pub sgd_byte_length: u64,
    /// One entry per level, largest level first.
    pub levels: Vec<LevelIndex>,
}

/// Location of one mip level, relative to the start of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelIndex {
    pub byte_offset: u64,
    pub byte_length: u64,
    pub uncompressed_byte_length: u64,
}

impl Header {
    /// Reads the header that follows the identifier, including the level index.
    pub fn from_reader(r: &mut dyn Read) -> DecodeResult<Self> {
        let vk_format = r.read_u32::<LittleEndian>()?;
        let type_size = r.read_u32::<LittleEndian>()?;
        let pixel_width = r.read_u32::<LittleEndian>()?;
        let pixel_height = r.read_u32::<LittleEndian>()?;
        let pixel_depth = r.read_u32::<LittleEndian>()?;
        let layer_count = r.read_u32::<LittleEndian>()?;
        let face_count = r.read_u32::<LittleEndian>()?;
        let level_count = r.read_u32::<LittleEndian>()?;
        let supercompression_scheme = r.read_u32::<LittleEndian>()?;
        let dfd_byte_offset = r.read_u32::<LittleEndian>()?;
        let dfd_byte_length = r.read_u32::<LittleEndian>()?;
        let kvd_byte_offset = r.read_u32::<LittleEndian>()?;
        let kvd_byte_length = r.read_u32::<LittleEndian>()?;
        let sgd_byte_offset = r.read_u64::<LittleEndian>()?;
        let sgd_byte_length = r.read_u64::<LittleEndian>()?;

        let levels = (0..level_count.max(1))
            .map(|_| {
                Ok(LevelIndex {
                    byte_offset: r.read_u64::<LittleEndian>()?,
                    byte_length: r.read_u64::<LittleEndian>()?,
                    uncompressed_byte_length: r.read_u64::<LittleEndian>()?,
                })
            })
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self {
            vk_format,
            type_size,
            pixel_width,
            pixel_height,
            pixel_depth,
            layer_count,
            face_count,
            level_count,
            supercompression_scheme,
            dfd_byte_offset,
            dfd_byte_length,
            kvd_byte_offset,
            kvd_byte_length,
            sgd_byte_offset,
            sgd_byte_length,
            levels,
        })
    }

    /// Parses the header from the start of `bytes`, including the identifier.
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        if !bytes.starts_with(&super::IDENTIFIER) {
            return Err(DecodeError::NotATexture);
        }

        let mut cursor = &bytes[super::IDENTIFIER.len()..];
        Self::from_reader(&mut cursor).map_err(|error| match error {
            DecodeError::Io(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                Malformed::TruncatedHeader(bytes.len()).into()
            }
            error => error,
        })
    }

    /// Checks the header for values no decoder can work with.
    pub fn validate(&self, max_dimension: u32) -> Result<(), Malformed> {
        if self.pixel_width == 0 {
            return Err(Malformed::ZeroDimension);
        }

        for value in [self.pixel_width, self.height(), self.depth()] {
            if value > max_dimension {
                return Err(Malformed::DimensionTooLarge {
                    value,
                    limit: max_dimension,
                });
            }
        }

        if !matches!(self.face_count, 1 | 6) {
            return Err(Malformed::FaceCount(self.face_count));
        }
        if self.is_volume() {
            if self.layer_count != 0 {
                return Err(Malformed::ArraySize(self.layer_count));
            }
            if self.is_cubemap() {
                return Err(Malformed::FaceCount(self.face_count));
            }
        }

        let largest = self.pixel_width.max(self.height()).max(self.depth());
        let max_levels = u32::BITS - largest.leading_zeros();
        if self.mip_levels() > max_levels {
            return Err(Malformed::MipLevelCount(self.level_count));
        }

        Ok(())
    }

    pub fn height(&self) -> u32 {
        self.pixel_height.max(1)
    }

    pub fn depth(&self) -> u32 {
        self.pixel_depth.max(1)
    }

    pub fn mip_levels(&self) -> u32 {
        self.level_count.max(1)
    }

    pub fn array_size(&self) -> u32 {
        self.layer_count.max(1)
    }

    pub fn is_array(&self) -> bool {
        self.layer_count != 0
    }

    pub fn is_cubemap(&self) -> bool {
        self.face_count == 6
    }

    pub fn is_volume(&self) -> bool {
        self.pixel_depth != 0
    }
}
