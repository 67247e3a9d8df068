use block_decompression::*;
use ddsfile::{
    AlphaMode, D3D10ResourceDimension, D3DFormat, Dds, DxgiFormat, NewD3dParams, NewDxgiParams,
};

use crate::common::{DdsBuilder, BC7_MODE_6_BLOCK, DDPF_ALPHAPIXELS, DDPF_RGB};

mod common;

fn load_flat(bytes: &[u8]) -> FlatTexture {
    match load(bytes, &DecodeSettings::default()) {
        Ok(Texture::Flat(texture)) => texture,
        other => panic!("expected a flat texture, got {other:?}"),
    }
}

fn write_dds(dds: &Dds) -> Vec<u8> {
    let mut bytes = Vec::new();
    dds.write(&mut bytes).expect("failed to write DDS file");
    bytes
}

fn dxgi_texture(
    format: DxgiFormat,
    width: u32,
    height: u32,
    mipmap_levels: u32,
    array_layers: Option<u32>,
    data: Vec<u8>,
) -> Vec<u8> {
    let mut dds = Dds::new_dxgi(NewDxgiParams {
        height,
        width,
        depth: None,
        format,
        mipmap_levels: Some(mipmap_levels),
        array_layers,
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Straight,
    })
    .expect("failed to create DDS header");
    dds.data = data;
    write_dds(&dds)
}

#[test]
fn minimal_dxt1_decodes_to_black() {
    let bytes = DdsBuilder::new(4, 4, b"DXT1").build(&[0; 8]);
    let texture = load_flat(&bytes);

    assert_eq!(texture.mipmaps.len(), 1);
    let mip = &texture.mipmaps[0];
    assert_eq!((mip.width, mip.height), (4, 4));
    assert_eq!(mip.format, PixelFormat::Bc1);
    assert_eq!(mip.layout, PixelLayout::Rgba8);
    assert_eq!(mip.data, [0, 0, 0, 255].repeat(16));
}

#[test]
fn equal_white_endpoints_decode_to_opaque_white() {
    let bytes = DdsBuilder::new(4, 4, b"DXT1").build(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    assert_eq!(load_flat(&bytes).mipmaps[0].data, [0xFF; 64]);
}

#[test]
fn premultiplied_alpha_is_unsupported() {
    for four_cc in [b"DXT2", b"DXT4"] {
        let bytes = DdsBuilder::new(4, 4, four_cc).build(&[0; 16]);
        let error = load(&bytes, &DecodeSettings::default()).unwrap_err();
        assert!(
            matches!(
                error,
                DecodeError::UnsupportedFormat(UnsupportedFormat::FourCc(code)) if &code == four_cc
            ),
            "{error}"
        );
    }
}

#[test]
fn bc4_index_zero_is_the_first_reference() {
    let bytes = DdsBuilder::new(4, 4, b"ATI1").build(&[200, 50, 0, 0, 0, 0, 0, 0]);
    let mip = &load_flat(&bytes).mipmaps[0];

    assert_eq!(mip.layout, PixelLayout::L8);
    assert_eq!(mip.data, [200; 16]);
}

#[test]
fn dxt5_output_is_trimmed_to_the_image() {
    let bytes = DdsBuilder::new(8, 8, b"DXT5").build(&[0x5A; 64]);
    assert_eq!(load_flat(&bytes).mipmaps[0].data.len(), 8 * 8 * 4);
}

#[test]
fn mip_chains_round_partial_blocks_up() {
    // 6x6, 3x3 and 1x1 levels need 4, 1 and 1 blocks.
    let bytes = DdsBuilder::new(6, 6, b"DXT1")
        .mipmap_count(3)
        .build(&[0; 48]);
    let texture = load_flat(&bytes);

    let sizes: Vec<(u32, u32, usize)> = texture
        .mipmaps
        .iter()
        .map(|mip| (mip.width, mip.height, mip.data.len()))
        .collect();
    assert_eq!(sizes, [(6, 6, 144), (3, 3, 36), (1, 1, 4)]);
}

#[test]
fn top_level_setting_skips_the_rest_of_the_chain() {
    let bytes = DdsBuilder::new(8, 8, b"DXT1")
        .mipmap_count(4)
        .build(&[0; 56]);

    let texture = load(&bytes, &DecodeSettings::top_level()).unwrap();
    assert_eq!(texture.surfaces().len(), 1);

    let settings = DecodeSettings::default().with_mip_levels(MipLevels::First(2));
    let texture = load(&bytes, &settings).unwrap();
    assert_eq!(texture.surfaces().len(), 2);
}

#[test]
fn truncated_payload_is_reported() {
    let bytes = DdsBuilder::new(4, 4, b"DXT1").build(&[0; 4]);
    assert!(matches!(
        load(&bytes, &DecodeSettings::default()),
        Err(DecodeError::TruncatedStream {
            expected: 8,
            actual: 4
        })
    ));
}

#[test]
fn dimensions_above_the_limit_are_rejected() {
    let bytes = DdsBuilder::new(8, 8, b"DXT1").build(&[0; 32]);
    let settings = DecodeSettings::default().with_max_dimension(4);
    assert!(matches!(
        load(&bytes, &settings),
        Err(DecodeError::MalformedContainer(
            Malformed::DimensionTooLarge { value: 8, limit: 4 }
        ))
    ));
}

#[test]
fn cubemap_faces_are_read_in_order() {
    // Solid red, green, blue, white, black and yellow faces.
    let colors: [u16; 6] = [0xF800, 0x07E0, 0x001F, 0xFFFF, 0x0000, 0xFFE0];
    let payload: Vec<u8> = colors
        .iter()
        .flat_map(|color| {
            let [low, high] = color.to_le_bytes();
            [low, high, low, high, 0, 0, 0, 0]
        })
        .collect();
    let bytes = DdsBuilder::new(4, 4, b"DXT1").cubemap().build(&payload);

    let Texture::Cubemap(cubemap) = load(&bytes, &DecodeSettings::default()).unwrap() else {
        panic!("expected a cube map");
    };
    let first_pixels: Vec<(CubeFace, &[u8])> = cubemap
        .faces
        .iter()
        .map(|(face, texture)| (*face, &texture.mipmaps[0].data[..4]))
        .collect();
    assert_eq!(
        first_pixels,
        [
            (CubeFace::PositiveX, &[255, 0, 0, 255][..]),
            (CubeFace::NegativeX, &[0, 255, 0, 255][..]),
            (CubeFace::PositiveY, &[0, 0, 255, 255][..]),
            (CubeFace::NegativeY, &[255, 255, 255, 255][..]),
            (CubeFace::PositiveZ, &[0, 0, 0, 255][..]),
            (CubeFace::NegativeZ, &[255, 255, 0, 255][..]),
        ]
    );
}

#[test]
fn volume_levels_halve_their_depth() {
    let masks = [0xFF0000, 0xFF00, 0xFF, 0xFF000000];
    let mut payload = Vec::new();
    // Two 2x2 slices, then one 1x1 slice, stored as BGRA.
    payload.extend([10, 20, 30, 255].repeat(4));
    payload.extend([40, 50, 60, 255].repeat(4));
    payload.extend([70, 80, 90, 255]);
    let bytes = DdsBuilder::with_masks(2, 2, DDPF_RGB | DDPF_ALPHAPIXELS, 32, masks)
        .depth(2)
        .mipmap_count(2)
        .build(&payload);

    let Texture::Volume(volume) = load(&bytes, &DecodeSettings::default()).unwrap() else {
        panic!("expected a volume");
    };
    assert_eq!(volume.depth, 2);
    assert_eq!(volume.levels.len(), 2);
    assert_eq!(volume.levels[0].len(), 2);
    assert_eq!(volume.levels[1].len(), 1);
    assert_eq!(volume.levels[0][1].data, [60, 50, 40, 255].repeat(4));
    assert_eq!(volume.levels[1][0].data, [90, 80, 70, 255]);
}

#[test]
fn ddsfile_dx10_bc7_mip_chain() {
    let mut data = BC7_MODE_6_BLOCK.repeat(4);
    // Three more levels of reserved mode blocks.
    data.extend([0; 48]);
    let bytes = dxgi_texture(DxgiFormat::BC7_UNorm, 8, 8, 4, None, data);

    let texture = load_flat(&bytes);
    assert_eq!(texture.mipmaps.len(), 4);
    assert_eq!(texture.mipmaps[0].format, PixelFormat::Bc7);
    assert_eq!(texture.mipmaps[0].data, [255, 1, 1, 255].repeat(64));
    assert_eq!(texture.mipmaps[1].data, [0; 4 * 4 * 4]);
    assert_eq!(texture.mipmaps[3].data, [0; 4]);
}

#[test]
fn ddsfile_dx10_arrays() {
    let data: Vec<u8> = (0..3u8).flat_map(|layer| [layer; 16]).collect();
    let bytes = dxgi_texture(DxgiFormat::R8G8B8A8_UNorm, 2, 2, 1, Some(3), data);

    let Texture::Array(elements) = load(&bytes, &DecodeSettings::default()).unwrap() else {
        panic!("expected an array");
    };
    assert_eq!(elements.len(), 3);
    for (layer, element) in elements.iter().enumerate() {
        assert_eq!(element.mipmaps[0].data, [layer as u8; 16]);
    }
}

#[test]
fn ddsfile_dx10_single_channel_float() {
    let values = [1.0f32, 0.5];
    let data: Vec<u8> = values.iter().flat_map(|value| value.to_le_bytes()).collect();
    let bytes = dxgi_texture(DxgiFormat::R32_Float, 2, 1, 1, None, data.clone());

    let mip = &load_flat(&bytes).mipmaps[0];
    assert_eq!(mip.layout, PixelLayout::R32F);
    assert_eq!(mip.data, data);
}

#[test]
fn ddsfile_dx10_bc6h_zero_block_is_black() {
    let bytes = dxgi_texture(DxgiFormat::BC6H_UF16, 4, 4, 1, None, vec![0; 16]);

    let mip = &load_flat(&bytes).mipmaps[0];
    assert_eq!(mip.layout, PixelLayout::Rgb8);
    assert_eq!(mip.data, [0; 48]);
}

#[test]
fn ddsfile_legacy_bgra_masks() {
    let mut dds = Dds::new_d3d(NewD3dParams {
        height: 1,
        width: 2,
        depth: None,
        format: D3DFormat::A8R8G8B8,
        mipmap_levels: None,
        caps2: None,
    })
    .expect("failed to create DDS header");
    dds.data = vec![1, 2, 3, 255, 4, 5, 6, 255];
    let bytes = write_dds(&dds);

    let mip = &load_flat(&bytes).mipmaps[0];
    assert_eq!(mip.layout, PixelLayout::Rgba8);
    assert_eq!(mip.data, [3, 2, 1, 255, 6, 5, 4, 255]);
}

#[test]
fn decoding_is_deterministic() {
    let mut data = BC7_MODE_6_BLOCK.to_vec();
    data.extend([0x33; 16]);
    let bytes = dxgi_texture(DxgiFormat::BC7_UNorm, 8, 4, 1, None, data);

    let first = load(&bytes, &DecodeSettings::default()).unwrap();
    let second = load(&bytes, &DecodeSettings::default()).unwrap();
    assert_eq!(first, second);
}

#[cfg(feature = "image")]
#[test]
fn mips_convert_to_images() {
    let bytes = DdsBuilder::new(4, 4, b"DXT1").build(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    let image = load_flat(&bytes).mipmaps[0].to_image().unwrap();

    assert_eq!((image.width(), image.height()), (4, 4));
    assert_eq!(image.to_rgba8().get_pixel(3, 3).0, [255, 255, 255, 255]);
}
