//! Reading of KTX version 1 containers.
//!
//! Levels are stored largest first. Every level starts with a 32 bit image
//! size, followed by all array elements, cube faces and depth slices of the
//! level. Rows of uncompressed formats are padded to four bytes.
//!
//! <https://registry.khronos.org/KTX/specs/1.0/ktxspec.v1.html>

mod gl;
mod header;

pub use self::gl::resolve_format;
pub use self::header::{Header, HEADER_SIZE};
use crate::{
    error::{DecodeError, DecodeResult, Malformed},
    texture::{decode_groups, ensure_elements_fit, mip_dimension, RawSurface},
    CubeFace, CubemapTexture, DecodeSettings, FlatTexture, PixelFormat, Texture, VolumeTexture,
};

/// The identifier every KTX file starts with.
pub const IDENTIFIER: [u8; 12] = [
    0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n',
];

/// Row alignment of uncompressed image data.
const ROW_ALIGNMENT: usize = 4;

/// Parses, validates and decodes a KTX texture.
pub fn read(bytes: &[u8], settings: &DecodeSettings) -> DecodeResult<Texture> {
    let (header, data_offset) = Header::parse(bytes)?;
    header.validate(settings.max_dimension())?;
    let format = resolve_format(&header)?;

    tracing::debug!(
        width = header.pixel_width,
        height = header.height(),
        depth = header.depth(),
        mip_levels = header.mip_levels(),
        array_size = header.array_size(),
        faces = header.number_of_faces,
        format = format.name(),
        "parsed KTX header"
    );

    let data = &bytes[data_offset..];
    let levels = settings.levels_to_decode(header.mip_levels());
    let planned = plan_levels(&header, format, levels, data)?;

    if header.is_volume() {
        return Ok(Texture::Volume(VolumeTexture {
            depth: header.depth(),
            levels: decode_groups(format, data, planned)?,
        }));
    }

    // Transpose the level major layout into one chain per element.
    let element_count = planned.first().map_or(0, Vec::len);
    let mut chains: Vec<Vec<RawSurface>> = vec![Vec::with_capacity(planned.len()); element_count];
    for level in planned {
        for (chain, surface) in chains.iter_mut().zip(level) {
            chain.push(surface);
        }
    }

    let mut chains = decode_groups(format, data, chains)?
        .into_iter()
        .map(|mipmaps| FlatTexture { mipmaps });

    let texture = match (header.is_cubemap(), header.is_array()) {
        (false, false) => Texture::Flat(chains.next().unwrap_or(FlatTexture {
            mipmaps: Vec::new(),
        })),
        (true, false) => Texture::Cubemap(CubemapTexture {
            faces: CubeFace::ALL.into_iter().zip(chains).collect(),
        }),
        _ => Texture::Array(chains.collect()),
    };

    Ok(texture)
}

/// Plans the surfaces of the first `levels` levels, one list per level in
/// storage order.
fn plan_levels(
    header: &Header,
    format: PixelFormat,
    levels: u32,
    data: &[u8],
) -> DecodeResult<Vec<Vec<RawSurface>>> {
    // Faces of non-array cube maps carry their own image size and padding.
    let face_sized = header.is_cubemap() && !header.is_array();
    let images_per_level = if face_sized { 6 } else { 1 };

    let mut offset = 0usize;
    let mut planned = Vec::with_capacity(levels as usize);
    for level in 0..levels {
        let width = mip_dimension(header.pixel_width, level);
        let height = mip_dimension(header.height(), level);
        let slices = if header.is_volume() {
            mip_dimension(header.pixel_depth, level)
        } else {
            1
        };

        let image_size = read_image_size(data, offset)?;
        offset += 4;

        let row_pitch = row_pitch(format, width)?;
        let rows = height.div_ceil(format.descriptor().block_height) as usize;
        let surface_size = row_pitch.checked_mul(rows).ok_or(Malformed::SizeOverflow)?;
        let surfaces_per_image = if face_sized {
            1
        } else {
            header.array_size() as usize * header.number_of_faces as usize * slices as usize
        };

        let needed = surface_size
            .checked_mul(surfaces_per_image)
            .ok_or(Malformed::SizeOverflow)?;
        if needed > image_size {
            return Err(Malformed::LevelSize(level).into());
        }

        let image_stride = image_size
            .checked_next_multiple_of(ROW_ALIGNMENT)
            .ok_or(Malformed::SizeOverflow)?;
        ensure_elements_fit(
            images_per_level,
            image_stride,
            needed,
            data.len().saturating_sub(offset),
        )?;
        let surface_stride = if face_sized { image_stride } else { surface_size };
        let surface_count = surfaces_per_image * images_per_level;

        let mut surfaces = Vec::with_capacity(surface_count);
        for index in 0..surface_count {
            let surface_offset = index
                .checked_mul(surface_stride)
                .and_then(|size| size.checked_add(offset))
                .ok_or(Malformed::SizeOverflow)?;
            surfaces.push(RawSurface {
                row_pitch: Some(row_pitch),
                ..RawSurface::new(width, height, surface_offset)
            });
        }
        planned.push(surfaces);

        offset = image_stride
            .checked_mul(images_per_level)
            .and_then(|size| size.checked_add(offset))
            .ok_or(Malformed::SizeOverflow)?;
    }

    Ok(planned)
}

/// Stored bytes per row of blocks.
fn row_pitch(format: PixelFormat, width: u32) -> Result<usize, Malformed> {
    let packed = format.bytes_per_row(width);
    if format.is_compressed() {
        Ok(packed)
    } else {
        packed
            .checked_next_multiple_of(ROW_ALIGNMENT)
            .ok_or(Malformed::SizeOverflow)
    }
}

fn read_image_size(data: &[u8], offset: usize) -> DecodeResult<usize> {
    let available = data.get(offset..).unwrap_or_default();
    match available.first_chunk::<4>() {
        Some(bytes) => Ok(u32::from_le_bytes(*bytes) as usize),
        None => Err(DecodeError::TruncatedStream {
            expected: 4,
            actual: available.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelLayout, UnsupportedFormat};

    const GL_UNSIGNED_BYTE: u32 = 0x1401;
    const GL_RGB: u32 = 0x1907;
    const GL_RGBA: u32 = 0x1908;
    const GL_RGB8: u32 = 0x8051;
    const GL_RGBA8: u32 = 0x8058;
    const GL_COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;

    struct Builder {
        fields: [u32; 12],
    }

    impl Builder {
        fn new(width: u32, height: u32) -> Self {
            Self {
                fields: [
                    GL_UNSIGNED_BYTE,
                    1,
                    GL_RGBA,
                    GL_RGBA8,
                    GL_RGBA,
                    width,
                    height,
                    0,
                    0,
                    1,
                    1,
                    0,
                ],
            }
        }

        fn compressed(mut self, internal_format: u32) -> Self {
            self.fields[0] = 0;
            self.fields[2] = 0;
            self.fields[3] = internal_format;
            self
        }

        fn rgb(mut self) -> Self {
            self.fields[2] = GL_RGB;
            self.fields[3] = GL_RGB8;
            self
        }

        fn field(mut self, index: usize, value: u32) -> Self {
            self.fields[index] = value;
            self
        }

        fn build(&self, endianness: u32) -> Vec<u8> {
            let mut bytes = IDENTIFIER.to_vec();
            bytes.extend_from_slice(&endianness.to_le_bytes());
            for field in self.fields {
                bytes.extend_from_slice(&field.to_le_bytes());
            }
            bytes
        }
    }

    fn push_level(bytes: &mut Vec<u8>, data: &[u8]) {
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
    }

    #[test]
    fn header_is_parsed() {
        let mut bytes = Builder::new(4, 2).field(11, 8).build(0x0403_0201);
        bytes.extend_from_slice(&[0; 8]);

        let (header, offset) = Header::parse(&bytes).unwrap();
        assert_eq!(offset, HEADER_SIZE + 8);
        assert_eq!(header.pixel_width, 4);
        assert_eq!(header.height(), 2);
        assert_eq!(header.gl_internal_format, GL_RGBA8);
    }

    #[test]
    fn byte_order_is_checked() {
        let bytes = Builder::new(4, 4).build(0x0102_0304);
        assert!(matches!(
            Header::parse(&bytes),
            Err(DecodeError::UnsupportedFormat(UnsupportedFormat::BigEndian))
        ));

        let bytes = Builder::new(4, 4).build(7);
        assert!(matches!(
            Header::parse(&bytes),
            Err(DecodeError::MalformedContainer(Malformed::Endianness(7)))
        ));
    }

    #[test]
    fn missing_key_value_data_is_truncated() {
        let bytes = Builder::new(4, 4).field(11, 16).build(0x0403_0201);
        assert!(matches!(
            Header::parse(&bytes),
            Err(DecodeError::MalformedContainer(Malformed::TruncatedHeader(64)))
        ));
    }

    #[test]
    fn face_counts_are_validated() {
        let bytes = Builder::new(4, 4).field(9, 2).build(0x0403_0201);
        let (header, _) = Header::parse(&bytes).unwrap();
        assert_eq!(header.validate(1024), Err(Malformed::FaceCount(2)));
    }

    #[test]
    fn padded_rows_are_skipped() {
        let mut bytes = Builder::new(1, 2).rgb().build(0x0403_0201);
        push_level(&mut bytes, &[1, 2, 3, 0, 4, 5, 6, 0]);

        let texture = read(&bytes, &DecodeSettings::default()).unwrap();
        let mip = texture.first_mip().unwrap();
        assert_eq!(mip.layout, PixelLayout::Rgb8);
        assert_eq!(mip.data, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn mip_levels_follow_their_image_sizes() {
        let mut bytes = Builder::new(2, 2).field(10, 2).build(0x0403_0201);
        push_level(&mut bytes, &[1; 16]);
        push_level(&mut bytes, &[2; 4]);

        let Texture::Flat(flat) = read(&bytes, &DecodeSettings::default()).unwrap() else {
            panic!("expected a flat texture");
        };
        assert_eq!(flat.mipmaps.len(), 2);
        assert_eq!(flat.mipmaps[0].data, [1; 16]);
        assert_eq!((flat.mipmaps[1].width, flat.mipmaps[1].height), (1, 1));
        assert_eq!(flat.mipmaps[1].data, [2; 4]);
    }

    #[test]
    fn cubemap_faces_are_stored_per_level() {
        let mut bytes = Builder::new(1, 1).field(9, 6).build(0x0403_0201);
        // The image size of a non-array cube map counts a single face.
        bytes.extend_from_slice(&4u32.to_le_bytes());
        for face in 0..6 {
            bytes.extend_from_slice(&[face; 4]);
        }

        let Texture::Cubemap(cubemap) = read(&bytes, &DecodeSettings::default()).unwrap() else {
            panic!("expected a cube map");
        };
        assert_eq!(cubemap.faces.len(), 6);
        for (index, (face, texture)) in cubemap.faces.iter().enumerate() {
            assert_eq!(*face, CubeFace::ALL[index]);
            assert_eq!(texture.mipmaps[0].data, [index as u8; 4]);
        }
    }

    #[test]
    fn arrays_share_one_image_size() {
        let mut bytes = Builder::new(1, 1).field(8, 3).build(0x0403_0201);
        push_level(&mut bytes, &[0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);

        let Texture::Array(elements) = read(&bytes, &DecodeSettings::default()).unwrap() else {
            panic!("expected an array");
        };
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2].mipmaps[0].data, [2; 4]);
    }

    #[test]
    fn compressed_levels_are_not_padded() {
        let mut bytes = Builder::new(4, 4)
            .compressed(GL_COMPRESSED_RGB_S3TC_DXT1)
            .build(0x0403_0201);
        push_level(&mut bytes, &[0; 8]);

        let mip = read(&bytes, &DecodeSettings::default())
            .unwrap()
            .first_mip()
            .cloned()
            .unwrap();
        assert_eq!(mip.format, PixelFormat::Bc1);
        assert_eq!(mip.data, [0, 0, 0, 255].repeat(16));
    }

    #[test]
    fn short_image_sizes_are_rejected() {
        let mut bytes = Builder::new(2, 2).build(0x0403_0201);
        push_level(&mut bytes, &[0; 12]);

        assert!(matches!(
            read(&bytes, &DecodeSettings::default()),
            Err(DecodeError::MalformedContainer(Malformed::LevelSize(0)))
        ));
    }

    #[test]
    fn array_sizes_beyond_the_payload_are_rejected() {
        // Four bytes per element already exceed the largest image size.
        let mut bytes = Builder::new(1, 1).field(8, 0x4000_0000).build(0x0403_0201);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        assert!(matches!(
            read(&bytes, &DecodeSettings::default()),
            Err(DecodeError::MalformedContainer(Malformed::LevelSize(0)))
        ));

        let mut bytes = Builder::new(1, 1).field(8, 0x3FFF_FFFF).build(0x0403_0201);
        bytes.extend_from_slice(&0xFFFF_FFFCu32.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        assert!(matches!(
            read(&bytes, &DecodeSettings::default()),
            Err(DecodeError::TruncatedStream {
                expected: 0xFFFF_FFFC,
                actual: 8
            })
        ));
    }

    #[test]
    fn missing_levels_are_truncated_streams() {
        let mut bytes = Builder::new(2, 2).field(10, 2).build(0x0403_0201);
        push_level(&mut bytes, &[0; 16]);

        assert!(matches!(
            read(&bytes, &DecodeSettings::default()),
            Err(DecodeError::TruncatedStream {
                expected: 4,
                actual: 0
            })
        ));
        assert!(read(&bytes, &DecodeSettings::top_level()).is_ok());
    }
}
