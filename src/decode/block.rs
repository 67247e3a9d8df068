//! Integer decoders for the fixed gradient formats BC1 through BC5.
//!
//! The interpolation constants come from bcdec
//! (<https://github.com/iOrange/bcdec>, public domain), and reproduce the
//! rounding of a float implementation without dividing.

use super::bits::{le_u16, le_u32, le_u64};

/// Decodes a BC1 block by reading 8 bytes from `compressed_block` and writing the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes per output row.
#[inline(always)]
pub fn decode_block_bc1(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_color_block::<false>(compressed_block, decompressed_block, destination_pitch);
}

/// BC2: 4-bit explicit alpha in the first 8 bytes, then an always opaque color block.
#[inline(always)]
pub fn decode_block_bc2(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_color_block::<true>(
        &compressed_block[8..],
        decompressed_block,
        destination_pitch,
    );
    decode_sharp_alpha_block(compressed_block, decompressed_block, destination_pitch);
}

/// BC3: a gradient alpha block followed by an always opaque color block.
#[inline(always)]
pub fn decode_block_bc3(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_color_block::<true>(
        &compressed_block[8..],
        decompressed_block,
        destination_pitch,
    );
    decode_channel_block::<4>(
        &unsigned_palette(compressed_block),
        le_u64(compressed_block, 0) >> 16,
        &mut decompressed_block[3..],
        destination_pitch,
    );
}

/// Decodes a BC4 block into one byte per pixel.
#[inline(always)]
pub fn decode_block_bc4(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_channel_block::<1>(
        &unsigned_palette(compressed_block),
        le_u64(compressed_block, 0) >> 16,
        decompressed_block,
        destination_pitch,
    );
}

/// Decodes a signed BC4 block by reading 8 bytes from `compressed_block` and writing the R8 data, remapped from `-127..=127` to `0..=255`, into `decompressed_block` with `destination_pitch` many bytes per output row.
#[inline(always)]
pub fn decode_block_bc4s(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_channel_block::<1>(
        &signed_palette(compressed_block),
        le_u64(compressed_block, 0) >> 16,
        decompressed_block,
        destination_pitch,
    );
}

/// Decodes a BC5 block into RGB8 with red and green from the two halves. Blue is zero.
#[inline(always)]
pub fn decode_block_bc5(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_two_channel_block(
        &unsigned_palette(compressed_block),
        &unsigned_palette(&compressed_block[8..]),
        compressed_block,
        decompressed_block,
        destination_pitch,
    );
}

/// Signed BC5, both channels remapped as in [`decode_block_bc4s`].
#[inline(always)]
pub fn decode_block_bc5s(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_two_channel_block(
        &signed_palette(compressed_block),
        &signed_palette(&compressed_block[8..]),
        compressed_block,
        decompressed_block,
        destination_pitch,
    );
}

#[inline(always)]
fn decode_two_channel_block(
    red: &[u8; 8],
    green: &[u8; 8],
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_channel_block::<3>(
        red,
        le_u64(compressed_block, 0) >> 16,
        decompressed_block,
        destination_pitch,
    );
    decode_channel_block::<3>(
        green,
        le_u64(compressed_block, 8) >> 16,
        &mut decompressed_block[1..],
        destination_pitch,
    );

    for i in 0..4 {
        for j in 0..4 {
            decompressed_block[i * destination_pitch + j * 3 + 2] = 0;
        }
    }
}

/// Decompresses a BC1/DXT1 color block
#[inline(always)]
fn decode_color_block<const OPAQUE_MODE: bool>(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let c0 = le_u16(compressed_block, 0);
    let c1 = le_u16(compressed_block, 2);

    let [r0, g0, b0] = unpack_565(c0);
    let [r1, g1, b1] = unpack_565(c1);

    let mut palette = [[0u8; 4]; 4];
    palette[0] = expand_565(r0, g0, b0);
    palette[1] = expand_565(r1, g1, b1);

    if c0 > c1 || OPAQUE_MODE {
        // color_2 = 2/3*color_0 + 1/3*color_1
        // color_3 = 1/3*color_0 + 2/3*color_1
        palette[2] = [
            (((2 * r0 + r1) * 351 + 61) >> 7) as u8,
            (((2 * g0 + g1) * 2763 + 1039) >> 11) as u8,
            (((2 * b0 + b1) * 351 + 61) >> 7) as u8,
            0xFF,
        ];
        palette[3] = [
            (((r0 + 2 * r1) * 351 + 61) >> 7) as u8,
            (((g0 + 2 * g1) * 2763 + 1039) >> 11) as u8,
            (((b0 + 2 * b1) * 351 + 61) >> 7) as u8,
            0xFF,
        ];
    } else {
        // color_2 = 1/2*color_0 + 1/2*color_1
        // color_3 = transparent black
        palette[2] = [
            (((r0 + r1) * 1053 + 125) >> 8) as u8,
            (((g0 + g1) * 4145 + 1019) >> 11) as u8,
            (((b0 + b1) * 1053 + 125) >> 8) as u8,
            0xFF,
        ];
    }

    let mut color_indices = le_u32(compressed_block, 4);

    for i in 0..4 {
        for j in 0..4 {
            let offset = i * destination_pitch + j * 4;
            decompressed_block[offset..offset + 4]
                .copy_from_slice(&palette[(color_indices & 0x03) as usize]);
            color_indices >>= 2;
        }
    }
}

#[inline(always)]
fn unpack_565(color: u16) -> [u32; 3] {
    [
        ((color >> 11) & 0x1F) as u32,
        ((color >> 5) & 0x3F) as u32,
        (color & 0x1F) as u32,
    ]
}

/// Expands 565 to 888 with bit replication, rounded like the float expansion.
#[inline(always)]
fn expand_565(r: u32, g: u32, b: u32) -> [u8; 4] {
    [
        ((r * 527 + 23) >> 6) as u8,
        ((g * 259 + 33) >> 6) as u8,
        ((b * 527 + 23) >> 6) as u8,
        0xFF,
    ]
}

/// Decodes a BC2/DXT3 explicit alpha block
#[inline(always)]
fn decode_sharp_alpha_block(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    for i in 0..4 {
        let mut row = le_u16(compressed_block, i * 2);
        for j in 0..4 {
            decompressed_block[i * destination_pitch + j * 4 + 3] = (row & 0x0F) as u8 * 17;
            row >>= 4;
        }
    }
}

/// Builds the 8 entry palette of a BC3 alpha / BC4 block.
#[inline(always)]
#[rustfmt::skip]
fn unsigned_palette(compressed_block: &[u8]) -> [u8; 8] {
    let a0 = compressed_block[0] as u16;
    let a1 = compressed_block[1] as u16;

    if a0 > a1 {
        [
            a0 as u8,
            a1 as u8,
            ((6 * a0 +     a1) / 7) as u8,
            ((5 * a0 + 2 * a1) / 7) as u8,
            ((4 * a0 + 3 * a1) / 7) as u8,
            ((3 * a0 + 4 * a1) / 7) as u8,
            ((2 * a0 + 5 * a1) / 7) as u8,
            ((    a0 + 6 * a1) / 7) as u8,
        ]
    } else {
        [
            a0 as u8,
            a1 as u8,
            ((4 * a0 +     a1) / 5) as u8,
            ((3 * a0 + 2 * a1) / 5) as u8,
            ((2 * a0 + 3 * a1) / 5) as u8,
            ((    a0 + 4 * a1) / 5) as u8,
            0x00,
            0xFF,
        ]
    }
}

/// Builds the 8 entry palette of a signed BC4 block, already remapped to
/// unsigned bytes.
#[inline(always)]
#[rustfmt::skip]
fn signed_palette(compressed_block: &[u8]) -> [u8; 8] {
    // -128 and -127 both mean -1.0
    let a0 = (compressed_block[0] as i8).max(-127) as i32;
    let a1 = (compressed_block[1] as i8).max(-127) as i32;

    let palette = if a0 > a1 {
        [
            a0,
            a1,
            (6 * a0 +     a1) / 7,
            (5 * a0 + 2 * a1) / 7,
            (4 * a0 + 3 * a1) / 7,
            (3 * a0 + 4 * a1) / 7,
            (2 * a0 + 5 * a1) / 7,
            (    a0 + 6 * a1) / 7,
        ]
    } else {
        [
            a0,
            a1,
            (4 * a0 +     a1) / 5,
            (3 * a0 + 2 * a1) / 5,
            (2 * a0 + 3 * a1) / 5,
            (    a0 + 4 * a1) / 5,
            -127,
            127,
        ]
    };

    palette.map(snorm_to_unorm)
}

/// Maps `-127..=127` onto `0..=255`.
#[inline(always)]
fn snorm_to_unorm(value: i32) -> u8 {
    (((value + 127) * 255 + 127) / 254) as u8
}

/// Expands 16 3-bit indices into one channel of `PIXEL_SIZE` byte pixels.
#[inline(always)]
fn decode_channel_block<const PIXEL_SIZE: usize>(
    palette: &[u8; 8],
    mut indices: u64,
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    for i in 0..4 {
        for j in 0..4 {
            decompressed_block[i * destination_pitch + j * PIXEL_SIZE] =
                palette[(indices & 0x07) as usize];
            indices >>= 3;
        }
    }
}
