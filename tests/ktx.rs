use block_decompression::*;

use crate::common::{ktx2_file, ktx_file, BC7_MODE_6_BLOCK};

mod common;

const GL_UNSIGNED_BYTE: u32 = 0x1401;
const GL_RED: u32 = 0x1903;
const GL_RGBA: u32 = 0x1908;
const GL_R8: u32 = 0x8229;
const GL_RGBA8: u32 = 0x8058;
const GL_COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;

const VK_FORMAT_R8_UNORM: u32 = 9;
const VK_FORMAT_BC4_UNORM_BLOCK: u32 = 139;
const VK_FORMAT_BC7_SRGB_BLOCK: u32 = 146;

#[test]
fn containers_dispatch_to_their_readers() {
    let ktx = ktx_file(GL_UNSIGNED_BYTE, GL_RGBA, GL_RGBA8, 1, 1, &[&[1, 2, 3, 4]]);
    let ktx2 = ktx2_file(VK_FORMAT_R8_UNORM, 1, 1, &[&[7]]);

    assert_eq!(ContainerFormat::detect(&ktx), Some(ContainerFormat::Ktx));
    assert_eq!(ContainerFormat::detect(&ktx2), Some(ContainerFormat::Ktx2));

    let texture = load(&ktx, &DecodeSettings::default()).unwrap();
    assert_eq!(texture.first_mip().unwrap().data, [1, 2, 3, 4]);

    let texture = load(&ktx2, &DecodeSettings::default()).unwrap();
    assert_eq!(texture.first_mip().unwrap().data, [7]);
}

#[test]
fn ktx_dxt5_output_is_trimmed_to_the_image() {
    let bytes = ktx_file(0, 0, GL_COMPRESSED_RGBA_S3TC_DXT5, 6, 5, &[&[0x5A; 64]]);
    let texture = load(&bytes, &DecodeSettings::default()).unwrap();

    let mip = texture.first_mip().unwrap();
    assert_eq!(mip.format, PixelFormat::Bc3);
    assert_eq!(mip.data.len(), 6 * 5 * 4);
}

#[test]
fn row_padding_differs_between_versions() {
    // KTX pads every row of a 3 pixel wide R8 image to 4 bytes, KTX2 doesn't.
    let ktx = ktx_file(
        GL_UNSIGNED_BYTE,
        GL_RED,
        GL_R8,
        3,
        2,
        &[&[1, 2, 3, 0, 4, 5, 6, 0]],
    );
    let ktx2 = ktx2_file(VK_FORMAT_R8_UNORM, 3, 2, &[&[1, 2, 3, 4, 5, 6]]);

    let from_ktx = load(&ktx, &DecodeSettings::default()).unwrap();
    let from_ktx2 = load(&ktx2, &DecodeSettings::default()).unwrap();
    assert_eq!(from_ktx, from_ktx2);
    assert_eq!(from_ktx.first_mip().unwrap().data, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn ktx2_bc7_mip_chain() {
    let level0 = BC7_MODE_6_BLOCK.repeat(2);
    let bytes = ktx2_file(
        VK_FORMAT_BC7_SRGB_BLOCK,
        8,
        4,
        &[&level0, &[0; 16], &[0; 16], &[0; 16]],
    );

    let Texture::Flat(texture) = load(&bytes, &DecodeSettings::default()).unwrap() else {
        panic!("expected a flat texture");
    };
    let dimensions: Vec<(u32, u32)> = texture
        .mipmaps
        .iter()
        .map(|mip| (mip.width, mip.height))
        .collect();
    assert_eq!(dimensions, [(8, 4), (4, 2), (2, 1), (1, 1)]);
    assert_eq!(texture.mipmaps[0].data, [255, 1, 1, 255].repeat(32));
    assert_eq!(texture.mipmaps[3].data, [0; 4]);
}

#[test]
fn ktx2_bc4_index_zero_is_the_first_reference() {
    let bytes = ktx2_file(VK_FORMAT_BC4_UNORM_BLOCK, 4, 4, &[&[200, 50, 0, 0, 0, 0, 0, 0]]);
    let texture = load(&bytes, &DecodeSettings::default()).unwrap();

    let mip = texture.first_mip().unwrap();
    assert_eq!(mip.layout, PixelLayout::L8);
    assert_eq!(mip.data, [200; 16]);
}

#[test]
fn unsupported_formats_name_their_code() {
    // ETC2 RGB8
    let ktx = ktx_file(0, 0, 0x9274, 4, 4, &[&[0; 8]]);
    assert!(matches!(
        load(&ktx, &DecodeSettings::default()),
        Err(DecodeError::UnsupportedFormat(
            UnsupportedFormat::GlInternalFormat(0x9274)
        ))
    ));

    // ASTC 4x4
    let ktx2 = ktx2_file(157, 4, 4, &[&[0; 16]]);
    assert!(matches!(
        load(&ktx2, &DecodeSettings::default()),
        Err(DecodeError::UnsupportedFormat(UnsupportedFormat::VkFormat(157)))
    ));
}
