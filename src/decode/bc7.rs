//! BC7 decoding.

use super::bits::BitStream;
use super::partition::Partition;
use super::BlockOutcome;

const WEIGHT2: [u32; 4] = [0, 21, 43, 64];
const WEIGHT3: [u32; 8] = [0, 9, 18, 27, 37, 46, 55, 64];
const WEIGHT4: [u32; 16] = [0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];

/// Reserved mode and overrun fallback.
const TRANSPARENT_BLACK: [u8; 4] = [0, 0, 0, 0];

struct Mode {
    regions: u8,
    shape_bits: u8,
    p_bits: u8,
    rotation_bits: u8,
    index_mode_bits: u8,
    index_bits: u8,
    secondary_index_bits: u8,
    /// RGBA precision as stored.
    precision: [u8; 4],
    /// RGBA precision once p-bits are appended.
    precision_with_p: [u8; 4],
}

#[rustfmt::skip]
static MODES: [Mode; 8] = [
    Mode { regions: 3, shape_bits: 4, p_bits: 6, rotation_bits: 0, index_mode_bits: 0, index_bits: 3, secondary_index_bits: 0, precision: [4, 4, 4, 0], precision_with_p: [5, 5, 5, 0] },
    Mode { regions: 2, shape_bits: 6, p_bits: 2, rotation_bits: 0, index_mode_bits: 0, index_bits: 3, secondary_index_bits: 0, precision: [6, 6, 6, 0], precision_with_p: [7, 7, 7, 0] },
    Mode { regions: 3, shape_bits: 6, p_bits: 0, rotation_bits: 0, index_mode_bits: 0, index_bits: 2, secondary_index_bits: 0, precision: [5, 5, 5, 0], precision_with_p: [5, 5, 5, 0] },
    Mode { regions: 2, shape_bits: 6, p_bits: 4, rotation_bits: 0, index_mode_bits: 0, index_bits: 2, secondary_index_bits: 0, precision: [7, 7, 7, 0], precision_with_p: [8, 8, 8, 0] },
    Mode { regions: 1, shape_bits: 0, p_bits: 0, rotation_bits: 2, index_mode_bits: 1, index_bits: 2, secondary_index_bits: 3, precision: [5, 5, 5, 6], precision_with_p: [5, 5, 5, 6] },
    Mode { regions: 1, shape_bits: 0, p_bits: 0, rotation_bits: 2, index_mode_bits: 0, index_bits: 2, secondary_index_bits: 2, precision: [7, 7, 7, 8], precision_with_p: [7, 7, 7, 8] },
    Mode { regions: 1, shape_bits: 0, p_bits: 2, rotation_bits: 0, index_mode_bits: 0, index_bits: 4, secondary_index_bits: 0, precision: [7, 7, 7, 7], precision_with_p: [8, 8, 8, 8] },
    Mode { regions: 2, shape_bits: 6, p_bits: 4, rotation_bits: 0, index_mode_bits: 0, index_bits: 2, secondary_index_bits: 0, precision: [5, 5, 5, 5], precision_with_p: [6, 6, 6, 6] },
];

fn weights(bits: u8) -> &'static [u32] {
    match bits {
        2 => &WEIGHT2,
        3 => &WEIGHT3,
        _ => &WEIGHT4,
    }
}

/// Decodes a BC7 block by reading 16 bytes from `compressed_block` and writing the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes per output row.
///
/// Reserved modes decode to transparent black. If the indices run past the
/// end of the block the pixels without complete indices are transparent
/// black too. Both cases return [`BlockOutcome::Fallback`].
pub fn decode_block_bc7(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) -> BlockOutcome {
    let mut stream = BitStream::new(compressed_block);

    let mut mode_index = 0;
    while mode_index < 8 && stream.read_bit() == Some(0) {
        mode_index += 1;
    }

    let decoded = match MODES.get(mode_index) {
        Some(mode) => decode_pixels(mode, &mut stream, decompressed_block, destination_pitch),
        None => 0,
    };

    for pixel in decoded..16 {
        let offset = (pixel / 4) * destination_pitch + (pixel % 4) * 4;
        decompressed_block[offset..offset + 4].copy_from_slice(&TRANSPARENT_BLACK);
    }

    if decoded == 16 {
        BlockOutcome::Decoded
    } else {
        BlockOutcome::Fallback
    }
}

/// Decodes the pixels of a valid mode and returns how many could be decoded.
fn decode_pixels(
    mode: &Mode,
    stream: &mut BitStream,
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) -> usize {
    let Some((partition, rotation, index_mode, endpoints)) = read_endpoints(mode, stream) else {
        return 0;
    };

    let mut primary = [0usize; 16];
    let mut secondary = [0usize; 16];
    let mut decodable = 16;

    for (pixel, index) in primary.iter_mut().enumerate() {
        let bits = mode.index_bits as u32 - partition.is_anchor(pixel) as u32;
        match stream.read_bits(bits) {
            Some(value) => *index = value as usize,
            None => {
                decodable = pixel;
                break;
            }
        }
    }

    if mode.secondary_index_bits > 0 {
        for (pixel, index) in secondary.iter_mut().enumerate().take(decodable) {
            // The secondary fix-up pixel is always pixel 0.
            let bits = mode.secondary_index_bits as u32 - (pixel == 0) as u32;
            match stream.read_bits(bits) {
                Some(value) => *index = value as usize,
                None => {
                    decodable = pixel;
                    break;
                }
            }
        }
    }

    let primary_weights = weights(mode.index_bits);
    let secondary_weights = weights(mode.secondary_index_bits);

    for pixel in 0..decodable {
        let region = partition.region(pixel);
        let low = &endpoints[region * 2];
        let high = &endpoints[region * 2 + 1];

        let (color_weight, alpha_weight) = if mode.secondary_index_bits == 0 {
            let weight = primary_weights[primary[pixel]];
            (weight, weight)
        } else if index_mode == 0 {
            (
                primary_weights[primary[pixel]],
                secondary_weights[secondary[pixel]],
            )
        } else {
            (
                secondary_weights[secondary[pixel]],
                primary_weights[primary[pixel]],
            )
        };

        let mut color = [0u8; 4];
        for channel in 0..3 {
            color[channel] = interpolate(low[channel], high[channel], color_weight);
        }
        color[3] = interpolate(low[3], high[3], alpha_weight);

        match rotation {
            1 => color.swap(0, 3),
            2 => color.swap(1, 3),
            3 => color.swap(2, 3),
            _ => {}
        }

        let offset = (pixel / 4) * destination_pitch + (pixel % 4) * 4;
        decompressed_block[offset..offset + 4].copy_from_slice(&color);
    }

    decodable
}

type Endpoints = [[u8; 4]; 6];

/// Reads shape, rotation, index mode and the unquantized endpoints.
fn read_endpoints(
    mode: &Mode,
    stream: &mut BitStream,
) -> Option<(Partition, u32, u32, Endpoints)> {
    let shape = stream.read_bits(mode.shape_bits as u32)? as usize;
    let rotation = stream.read_bits(mode.rotation_bits as u32)?;
    let index_mode = stream.read_bits(mode.index_mode_bits as u32)?;
    let partition = Partition::new(mode.regions, shape)?;

    let endpoint_count = mode.regions as usize * 2;
    let mut raw = [[0u32; 4]; 6];

    for channel in 0..4 {
        for endpoint in raw.iter_mut().take(endpoint_count) {
            endpoint[channel] = stream.read_bits(mode.precision[channel] as u32)?;
        }
    }

    let mut p_bits = [0u32; 6];
    for p_bit in p_bits.iter_mut().take(mode.p_bits as usize) {
        *p_bit = stream.read_bit()?;
    }

    let mut endpoints = [[0u8; 4]; 6];
    for (index, (endpoint, raw)) in endpoints
        .iter_mut()
        .zip(&raw)
        .take(endpoint_count)
        .enumerate()
    {
        // Shared p-bits are spread evenly across the endpoints.
        let p_bit = p_bits[index * mode.p_bits as usize / endpoint_count];

        for channel in 0..4 {
            let mut value = raw[channel];
            if mode.precision_with_p[channel] != mode.precision[channel] {
                value = (value << 1) | p_bit;
            }
            endpoint[channel] = unquantize(value, mode.precision_with_p[channel] as u32);
        }
    }

    Some((partition, rotation, index_mode, endpoints))
}

/// Expands to 8 bits by replicating the high bits into the low ones.
#[inline]
fn unquantize(value: u32, precision: u32) -> u8 {
    if precision == 0 {
        return 0xFF;
    }
    let shifted = value << (8 - precision);
    (shifted | (shifted >> precision)) as u8
}

#[inline]
fn interpolate(a: u8, b: u8, weight: u32) -> u8 {
    ((a as u32 * (64 - weight) + b as u32 * weight + 32) >> 6) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_block(compressed_block: &[u8], pitch: usize, expected_output: &[u8], name: &str) {
        let mut decoded = [0u8; 64];
        decode_block_bc7(compressed_block, &mut decoded, pitch);

        for y in 0..4 {
            let start = y * pitch;
            let end = start + pitch;
            assert_eq!(
                &decoded[start..end],
                &expected_output[start..end],
                "{}: Mismatch at row {}",
                name,
                y
            );
        }
    }

    #[test]
    fn test_bc7_block_0() {
        let compressed_block = [
            0x40, 0xAF, 0xF6, 0xB, 0xFD, 0x2E, 0xFF, 0xFF, 0x11, 0x71, 0x10, 0xA1, 0x21, 0xF2,
            0x33, 0x73,
        ];
        let expected_output = [
            0xBD, 0xBF, 0xBF, 0xFF, 0xBD, 0xBD, 0xBD, 0xFF, 0xBD, 0xBF, 0xBF, 0xFF, 0xBD, 0xBD,
            0xBD, 0xFF, 0xBD, 0xBD, 0xBD, 0xFF, 0xBC, 0xBB, 0xB9, 0xFF, 0xBB, 0xB9, 0xB7, 0xFF,
            0xBB, 0xB9, 0xB7, 0xFF, 0xBB, 0xB9, 0xB7, 0xFF, 0xB9, 0xB1, 0xAC, 0xFF, 0x0, 0x0, 0x0,
            0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
            0x0, 0x0, 0x0, 0x0,
        ];
        test_block(&compressed_block, 8, &expected_output, "BC7 block 0");
    }

    #[test]
    fn test_bc7_block_1() {
        let compressed_block = [
            0xC0, 0x8C, 0xEF, 0xA2, 0xBB, 0xDC, 0xFE, 0x7F, 0x6C, 0x55, 0x6A, 0x34, 0x4F, 0x0,
            0x5D, 0x0,
        ];
        let expected_output = [
            0x50, 0x4A, 0x48, 0xFE, 0x50, 0x4A, 0x48, 0xFE, 0x64, 0x5D, 0x59, 0xFE, 0x50, 0x4A,
            0x48, 0xFE, 0x7C, 0x74, 0x6E, 0xFE, 0x46, 0x41, 0x3F, 0xFE, 0x72, 0x6A, 0x65, 0xFE,
            0x4A, 0x45, 0x43, 0xFE, 0x32, 0x2E, 0x2E, 0xFE, 0x32, 0x2E, 0x2E, 0xFE, 0x0, 0x0, 0x0,
            0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
            0x0, 0x0, 0x0, 0x0,
        ];
        test_block(&compressed_block, 8, &expected_output, "BC7 block 1");
    }

    fn decode_to_pixels(compressed_block: &[u8; 16]) -> Vec<[u8; 4]> {
        let mut decoded = [0u8; 64];
        let outcome = decode_block_bc7(compressed_block, &mut decoded, 16);
        assert_eq!(outcome, BlockOutcome::Decoded);
        decoded
            .chunks_exact(4)
            .map(|pixel| pixel.try_into().unwrap())
            .collect()
    }

    #[test]
    fn mode_2_narrows_the_anchors_of_all_three_regions() {
        // Shape 23 puts the anchors of regions 1 and 2 at pixels 10 and 8.
        // Endpoints: red..blue, green..yellow, black..(132, 66, 255).
        let compressed_block = [
            0xBC, 0x3E, 0x00, 0x1F, 0x40, 0x00, 0xFE, 0x07, 0x08, 0x7C, 0x00, 0xC0, 0x97, 0x6F,
            0xD4, 0x36,
        ];
        let expected: [[u8; 4]; 16] = [
            [255, 0, 0, 255],
            [171, 0, 84, 255],
            [84, 0, 171, 255],
            [0, 0, 255, 255],
            [255, 255, 0, 255],
            [171, 255, 0, 255],
            [171, 0, 84, 255],
            [255, 0, 0, 255],
            [43, 22, 84, 255],
            [89, 44, 171, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [89, 44, 171, 255],
            [43, 22, 84, 255],
            [255, 255, 0, 255],
            [255, 0, 0, 255],
        ];
        assert_eq!(decode_to_pixels(&compressed_block), expected);
    }

    #[test]
    fn mode_1_shares_one_p_bit_per_region() {
        // Shape 13 splits the block into top and bottom halves. The p-bit of
        // region 0 is set, the one of region 1 is clear.
        let compressed_block = [
            0x36, 0x3F, 0x50, 0xF0, 0xC0, 0x8F, 0x2A, 0x0A, 0xF5, 0x7B, 0xF1, 0x35, 0x32, 0x0F,
            0x65, 0x2E,
        ];
        let expected: [[u8; 4]; 16] = [
            [255, 2, 42, 255],
            [2, 255, 82, 255],
            [148, 109, 59, 255],
            [73, 184, 71, 255],
            [219, 38, 48, 255],
            [184, 73, 53, 255],
            [38, 219, 76, 255],
            [109, 148, 65, 255],
            [241, 40, 120, 255],
            [20, 161, 253, 255],
            [82, 127, 216, 255],
            [51, 144, 234, 255],
            [113, 110, 197, 255],
            [210, 57, 139, 255],
            [179, 74, 157, 255],
            [20, 161, 253, 255],
        ];
        assert_eq!(decode_to_pixels(&compressed_block), expected);
    }

    #[test]
    fn modes_fill_the_block() {
        for (index, mode) in MODES.iter().enumerate() {
            let endpoints = mode.regions as u32 * 2;
            let endpoint_bits: u32 = mode.precision.iter().map(|&bits| bits as u32).sum();
            let index_bits = |bits: u8| {
                if bits == 0 {
                    0
                } else {
                    16 * bits as u32 - mode.regions as u32
                }
            };
            let secondary_bits = if mode.secondary_index_bits == 0 {
                0
            } else {
                16 * mode.secondary_index_bits as u32 - 1
            };
            let total = index as u32
                + 1
                + mode.shape_bits as u32
                + mode.rotation_bits as u32
                + mode.index_mode_bits as u32
                + endpoints * endpoint_bits
                + mode.p_bits as u32
                + index_bits(mode.index_bits)
                + secondary_bits;
            assert_eq!(total, 128, "mode {index}");
        }
    }

    #[test]
    fn reserved_mode_is_transparent_black() {
        let mut compressed_block = [0xFFu8; 16];
        compressed_block[0] = 0x00;

        let mut decoded = [0x55u8; 64];
        let outcome = decode_block_bc7(&compressed_block, &mut decoded, 16);

        assert_eq!(outcome, BlockOutcome::Fallback);
        assert_eq!(decoded, [0u8; 64]);
    }

    #[test]
    fn mode_6_appends_p_bits() {
        // Mode 6: R0 = 127, A0 = 127, everything else zero except p-bit 0.
        // Every index is 0, so each pixel takes endpoint 0.
        let mut bits: u128 = 1 << 6;
        bits |= 127 << 7;
        bits |= 127 << 49;
        bits |= 1 << 63;
        let compressed_block = bits.to_le_bytes();

        let mut decoded = [0u8; 64];
        let outcome = decode_block_bc7(&compressed_block, &mut decoded, 16);
        assert_eq!(outcome, BlockOutcome::Decoded);

        // The p-bit becomes the low bit of every channel.
        for pixel in decoded.chunks_exact(4) {
            assert_eq!(pixel, &[0xFF, 0x01, 0x01, 0xFF]);
        }
    }

    #[test]
    fn mode_5_rotation_swaps_alpha() {
        // Mode 5 with rotation 1: red and alpha trade places. Color endpoints
        // are (127, 0, 0) and alpha endpoints 0, so the output is red 0,
        // alpha 255.
        let mut bits: u128 = 1 << 5;
        bits |= 1 << 6;
        bits |= 127 << 8;
        bits |= 127 << 15;
        let compressed_block = bits.to_le_bytes();

        let mut decoded = [0u8; 64];
        decode_block_bc7(&compressed_block, &mut decoded, 16);

        for pixel in decoded.chunks_exact(4) {
            assert_eq!(pixel, &[0, 0, 0, 0xFF]);
        }
    }

    #[test]
    fn unquantize_replicates_bits() {
        assert_eq!(unquantize(0b11111, 5), 0xFF);
        assert_eq!(unquantize(0b10000, 5), 0b1000_0100);
        assert_eq!(unquantize(0x7F, 7), 0xFF);
        assert_eq!(unquantize(0xAB, 8), 0xAB);
        assert_eq!(unquantize(0, 0), 0xFF);
    }
}
