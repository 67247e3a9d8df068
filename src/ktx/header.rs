use std::io::{self, Read};

use byteorder_lite::{LittleEndian, ReadBytesExt};

use crate::error::{DecodeError, DecodeResult, Malformed, UnsupportedFormat};

/// Size of the header, including the identifier.
pub const HEADER_SIZE: usize = 64;

/// Endianness marker of a file written in the byte order of the reader.
const ENDIANNESS: u32 = 0x0403_0201;
/// Endianness marker of a file written in the opposite byte order.
const ENDIANNESS_SWAPPED: u32 = 0x0102_0304;

/// The fixed size KTX header.
///
/// <https://registry.khronos.org/KTX/specs/1.0/ktxspec.v1.html>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// `0` for compressed formats.
    pub gl_type: u32,
    pub gl_type_size: u32,
    /// `0` for compressed formats.
    pub gl_format: u32,
    pub gl_internal_format: u32,
    pub gl_base_internal_format: u32,
    pub pixel_width: u32,
    /// `0` for 1D textures.
    pub pixel_height: u32,
    /// `0` for everything but 3D textures.
    pub pixel_depth: u32,
    /// `0` for textures that are not arrays.
    pub number_of_array_elements: u32,
    pub number_of_faces: u32,
    /// `0` asks the loader to generate the chain, only the base level is stored.
    pub number_of_mipmap_levels: u32,
    pub bytes_of_key_value_data: u32,
}

impl Header {
    /// Reads the header that follows the identifier, starting at the
    /// endianness marker.
    pub fn from_reader(r: &mut dyn Read) -> DecodeResult<Self> {
        match r.read_u32::<LittleEndian>()? {
            ENDIANNESS => {}
            ENDIANNESS_SWAPPED => return Err(UnsupportedFormat::BigEndian.into()),
            marker => return Err(Malformed::Endianness(marker).into()),
        }

        Ok(Self {
            gl_type: r.read_u32::<LittleEndian>()?,
            gl_type_size: r.read_u32::<LittleEndian>()?,
            gl_format: r.read_u32::<LittleEndian>()?,
            gl_internal_format: r.read_u32::<LittleEndian>()?,
            gl_base_internal_format: r.read_u32::<LittleEndian>()?,
            pixel_width: r.read_u32::<LittleEndian>()?,
            pixel_height: r.read_u32::<LittleEndian>()?,
            pixel_depth: r.read_u32::<LittleEndian>()?,
            number_of_array_elements: r.read_u32::<LittleEndian>()?,
            number_of_faces: r.read_u32::<LittleEndian>()?,
            number_of_mipmap_levels: r.read_u32::<LittleEndian>()?,
            bytes_of_key_value_data: r.read_u32::<LittleEndian>()?,
        })
    }

    /// Parses the header from the start of `bytes`, including the identifier.
    ///
    /// Returns the header and the offset of the first image size field,
    /// which follows the key/value data.
    pub fn parse(bytes: &[u8]) -> DecodeResult<(Self, usize)> {
        if !bytes.starts_with(&super::IDENTIFIER) {
            return Err(DecodeError::NotATexture);
        }

        let mut cursor = &bytes[super::IDENTIFIER.len()..];
        let header = Self::from_reader(&mut cursor).map_err(|error| match error {
            DecodeError::Io(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                Malformed::TruncatedHeader(bytes.len()).into()
            }
            error => error,
        })?;

        let data_offset = HEADER_SIZE + header.bytes_of_key_value_data as usize;
        if data_offset > bytes.len() {
            return Err(Malformed::TruncatedHeader(bytes.len()).into());
        }

        Ok((header, data_offset))
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

        if !matches!(self.number_of_faces, 1 | 6) {
            return Err(Malformed::FaceCount(self.number_of_faces));
        }
        if self.is_volume() {
            if self.number_of_array_elements != 0 {
                return Err(Malformed::ArraySize(self.number_of_array_elements));
            }
            if self.is_cubemap() {
                return Err(Malformed::FaceCount(self.number_of_faces));
            }
        }

        let largest = self.pixel_width.max(self.height()).max(self.depth());
        let max_levels = u32::BITS - largest.leading_zeros();
        if self.mip_levels() > max_levels {
            return Err(Malformed::MipLevelCount(self.number_of_mipmap_levels));
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
        self.number_of_mipmap_levels.max(1)
    }

    pub fn array_size(&self) -> u32 {
        self.number_of_array_elements.max(1)
    }

    pub fn is_array(&self) -> bool {
        self.number_of_array_elements != 0
    }

    pub fn is_cubemap(&self) -> bool {
        self.number_of_faces == 6
    }

    pub fn is_volume(&self) -> bool {
        self.pixel_depth != 0
    }

    /// Whether the data was uploaded with `glCompressedTexImage*`.
    pub fn is_compressed(&self) -> bool {
        self.gl_type == 0
    }
}
