use std::io::{self, Read};

use byteorder_lite::{LittleEndian, ReadBytesExt};

use crate::{
    error::{DecodeError, DecodeResult, Malformed},
    CubeFace,
};

/// Size of the `DDS_HEADER` structure, excluding the magic word.
pub const HEADER_SIZE: u32 = 124;
/// Size of the `DDS_PIXELFORMAT` structure.
pub const PIXEL_FORMAT_SIZE: u32 = 32;
/// Size of the `DDS_HEADER_DXT10` structure.
pub const DX10_HEADER_SIZE: u32 = 20;

/// Access to the raw bits of a DDS flag field.
pub trait BitFlags: Sized + Copy {
    fn bits(self) -> u32;

    /// Returns true if all bits of `flag` are set.
    fn has_bits(self, flag: u32) -> bool {
        self.bits() & flag == flag
    }
}

/// `DDS_HEADER`
///
/// <https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dds-header>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub flags: Flags,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mipmap_count: u32,
    pub pixel_format: PixelFormatHeader,
    pub caps: Caps,
    pub caps2: Caps2,
    /// The extended header, present when the pixel format FourCC is `DX10`.
    pub dx10: Option<Dx10Header>,
}

impl Header {
    /// Reads the header that follows the magic word.
    ///
    /// The returned header is not validated yet, see [`Header::validate`].
    pub fn from_reader(r: &mut dyn Read) -> DecodeResult<Self> {
        let size = r.read_u32::<LittleEndian>()?;
        if size != HEADER_SIZE {
            return Err(Malformed::HeaderSize(size).into());
        }

        let flags = r.read_u32::<LittleEndian>()?;
        let flags = Flags::from_u32(flags).ok_or(Malformed::HeaderFlags(flags))?;

        let height = r.read_u32::<LittleEndian>()?;
        let width = r.read_u32::<LittleEndian>()?;
        let pitch_or_linear_size = r.read_u32::<LittleEndian>()?;
        let depth = r.read_u32::<LittleEndian>()?;
        let mipmap_count = r.read_u32::<LittleEndian>()?;
        // dwReserved1
        r.read_exact(&mut [0u8; 4 * 11])?;

        let pixel_format = PixelFormatHeader::from_reader(r)?;
        let caps = Caps(r.read_u32::<LittleEndian>()?);
        let caps2 = Caps2(r.read_u32::<LittleEndian>()?);
        // dwCaps3, dwCaps4, dwReserved2
        r.read_exact(&mut [0u8; 4 * 3])?;

        let dx10 = if pixel_format.four_cc() == Some(*b"DX10") {
            Some(Dx10Header::from_reader(r)?)
        } else {
            None
        };

        Ok(Self {
            flags,
            height,
            width,
            pitch_or_linear_size,
            depth,
            mipmap_count,
            pixel_format,
            caps,
            caps2,
            dx10,
        })
    }

    /// Parses the header from the start of `bytes`, including the magic word.
    ///
    /// Returns the header and the offset of the first payload byte.
    pub fn parse(bytes: &[u8]) -> DecodeResult<(Self, usize)> {
        if !bytes.starts_with(super::MAGIC) {
            return Err(DecodeError::NotATexture);
        }

        let mut cursor = &bytes[super::MAGIC.len()..];
        let header = Self::from_reader(&mut cursor).map_err(|error| match error {
            DecodeError::Io(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                Malformed::TruncatedHeader(bytes.len()).into()
            }
            error => error,
        })?;

        Ok((header, bytes.len() - cursor.len()))
    }

    /// Checks the header for values no decoder can work with.
    pub fn validate(&self, max_dimension: u32) -> Result<(), Malformed> {
        if self.width == 0 || self.height == 0 {
            return Err(Malformed::ZeroDimension);
        }

        let depth = self.depth();
        for value in [self.width, self.height, depth] {
            if value > max_dimension {
                return Err(Malformed::DimensionTooLarge {
                    value,
                    limit: max_dimension,
                });
            }
        }

        let largest = self.width.max(self.height).max(depth);
        let max_levels = u32::BITS - largest.leading_zeros();
        if self.mip_levels() > max_levels {
            return Err(Malformed::MipLevelCount(self.mipmap_count));
        }

        if self.is_cubemap() && self.dx10.is_none() && self.cubemap_faces().is_empty() {
            return Err(Malformed::CubemapFaces);
        }

        Ok(())
    }

    /// Number of mip levels stored, at least 1.
    pub fn mip_levels(&self) -> u32 {
        self.mipmap_count.max(1)
    }

    /// Depth of a volume texture, 1 for everything else.
    pub fn depth(&self) -> u32 {
        if self.is_volume() {
            self.depth.max(1)
        } else {
            1
        }
    }

    pub fn is_volume(&self) -> bool {
        match &self.dx10 {
            Some(dx10) => dx10.resource_dimension == ResourceDimension::Texture3D,
            None => self.caps2.has_bits(Caps2::VOLUME),
        }
    }

    pub fn is_cubemap(&self) -> bool {
        match &self.dx10 {
            Some(dx10) => dx10.is_cubemap(),
            None => self.caps2.has_bits(Caps2::CUBEMAP),
        }
    }

    /// Number of array elements, 1 unless a DX10 header says otherwise.
    pub fn array_size(&self) -> u32 {
        self.dx10.as_ref().map_or(1, |dx10| dx10.array_size)
    }

    /// Cube faces stored in the file, in storage order.
    ///
    /// DX10 cubemaps always store all six faces.
    pub fn cubemap_faces(&self) -> Vec<CubeFace> {
        if !self.is_cubemap() {
            return Vec::new();
        }

        CubeFace::ALL
            .into_iter()
            .filter(|face| self.dx10.is_some() || self.caps2.has_bits(caps2_bit(*face)))
            .collect()
    }
}

/// `DDS_HEADER.dwFlags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    fn from_u32(flags: u32) -> Option<Self> {
        // CAPS and PIXELFORMAT are often missing in the wild.
        if flags & Self::REQUIRED != Self::REQUIRED {
            None
        } else {
            Some(Self(flags))
        }
    }

    const REQUIRED: u32 = Self::HEIGHT | Self::WIDTH;

    pub const CAPS: u32 = 0x1;
    pub const HEIGHT: u32 = 0x2;
    pub const WIDTH: u32 = 0x4;
    pub const PITCH: u32 = 0x8;
    pub const PIXEL_FORMAT: u32 = 0x1000;
    pub const MIPMAP_COUNT: u32 = 0x20000;
    pub const LINEAR_SIZE: u32 = 0x80000;
    pub const DEPTH: u32 = 0x800000;
}

impl BitFlags for Flags {
    fn bits(self) -> u32 {
        self.0
    }
}

/// `DDS_HEADER.dwCaps`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caps(u32);

impl Caps {
    /// More than one surface is stored.
    pub const COMPLEX: u32 = 0x8;
    pub const TEXTURE: u32 = 0x1000;
    pub const MIPMAP: u32 = 0x400000;
}

impl BitFlags for Caps {
    fn bits(self) -> u32 {
        self.0
    }
}

/// `DDS_HEADER.dwCaps2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caps2(u32);

impl Caps2 {
    pub const CUBEMAP: u32 = 0x200;
    pub const CUBEMAP_POSITIVE_X: u32 = 0x400;
    pub const CUBEMAP_NEGATIVE_X: u32 = 0x800;
    pub const CUBEMAP_POSITIVE_Y: u32 = 0x1000;
    pub const CUBEMAP_NEGATIVE_Y: u32 = 0x2000;
    pub const CUBEMAP_POSITIVE_Z: u32 = 0x4000;
    pub const CUBEMAP_NEGATIVE_Z: u32 = 0x8000;
    pub const VOLUME: u32 = 0x200000;
}

impl BitFlags for Caps2 {
    fn bits(self) -> u32 {
        self.0
    }
}

const fn caps2_bit(face: CubeFace) -> u32 {
    match face {
        CubeFace::PositiveX => Caps2::CUBEMAP_POSITIVE_X,
        CubeFace::NegativeX => Caps2::CUBEMAP_NEGATIVE_X,
        CubeFace::PositiveY => Caps2::CUBEMAP_POSITIVE_Y,
        CubeFace::NegativeY => Caps2::CUBEMAP_NEGATIVE_Y,
        CubeFace::PositiveZ => Caps2::CUBEMAP_POSITIVE_Z,
        CubeFace::NegativeZ => Caps2::CUBEMAP_NEGATIVE_Z,
    }
}

/// `DDS_PIXELFORMAT`
///
/// <https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dds-pixelformat>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatHeader {
    pub flags: PixelFormatFlags,
    pub four_cc: [u8; 4],
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl PixelFormatHeader {
    fn from_reader(r: &mut dyn Read) -> DecodeResult<Self> {
        let size = r.read_u32::<LittleEndian>()?;
        if size != PIXEL_FORMAT_SIZE {
            return Err(Malformed::PixelFormatSize(size).into());
        }

        let flags = PixelFormatFlags(r.read_u32::<LittleEndian>()?);
        let mut four_cc = [0; 4];
        r.read_exact(&mut four_cc)?;

        Ok(Self {
            flags,
            four_cc,
            rgb_bit_count: r.read_u32::<LittleEndian>()?,
            r_bit_mask: r.read_u32::<LittleEndian>()?,
            g_bit_mask: r.read_u32::<LittleEndian>()?,
            b_bit_mask: r.read_u32::<LittleEndian>()?,
            a_bit_mask: r.read_u32::<LittleEndian>()?,
        })
    }

    /// The FourCC, if the `DDPF_FOURCC` flag is set.
    pub fn four_cc(&self) -> Option<[u8; 4]> {
        self.flags
            .has_bits(PixelFormatFlags::FOURCC)
            .then_some(self.four_cc)
    }
}

/// `DDS_PIXELFORMAT.dwFlags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormatFlags(pub u32);

impl PixelFormatFlags {
    pub const ALPHA_PIXELS: u32 = 0x1;
    pub const ALPHA: u32 = 0x2;
    pub const FOURCC: u32 = 0x4;
    pub const PAL8: u32 = 0x20;
    pub const RGB: u32 = 0x40;
    pub const YUV: u32 = 0x200;
    pub const LUMINANCE: u32 = 0x20000;
    pub const BUMP_DUDV: u32 = 0x80000;
}

impl BitFlags for PixelFormatFlags {
    fn bits(self) -> u32 {
        self.0
    }
}

/// `DDS_HEADER_DXT10`
///
/// <https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dds-header-dxt10>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dx10Header {
    /// The raw `DXGI_FORMAT`, resolved later so unknown values can be
    /// reported as unsupported rather than malformed.
    pub dxgi_format: u32,
    pub resource_dimension: ResourceDimension,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

impl Dx10Header {
    /// `DDS_RESOURCE_MISC_TEXTURECUBE`
    pub const MISC_TEXTURE_CUBE: u32 = 0x4;

    fn from_reader(r: &mut dyn Read) -> DecodeResult<Self> {
        let dxgi_format = r.read_u32::<LittleEndian>()?;
        let resource_dimension = r.read_u32::<LittleEndian>()?;
        let misc_flag = r.read_u32::<LittleEndian>()?;
        let array_size = r.read_u32::<LittleEndian>()?;
        let misc_flags2 = r.read_u32::<LittleEndian>()?;

        // Only 1D, 2D and 3D textures hold images.
        let resource_dimension = match resource_dimension {
            2 => ResourceDimension::Texture1D,
            3 => ResourceDimension::Texture2D,
            4 => ResourceDimension::Texture3D,
            other => return Err(Malformed::ResourceDimension(other).into()),
        };

        // Some writers store 0 for a single texture.
        let array_size = array_size.max(1);
        if resource_dimension == ResourceDimension::Texture3D && array_size != 1 {
            return Err(Malformed::ArraySize(array_size).into());
        }

        Ok(Self {
            dxgi_format,
            resource_dimension,
            misc_flag,
            array_size,
            misc_flags2,
        })
    }

    pub fn is_cubemap(&self) -> bool {
        self.misc_flag & Self::MISC_TEXTURE_CUBE != 0
    }
}

/// `D3D10_RESOURCE_DIMENSION` values valid for textures.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum ResourceDimension {
    Texture1D,
    Texture2D,
    Texture3D,
}
