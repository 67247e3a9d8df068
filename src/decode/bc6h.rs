//! BC6H decoding.
//!
//! Each of the 14 modes is described by a [`Mode`] record whose `layout`
//! lists the header fields in stream order. A field run copies `count` bits
//! into an endpoint component starting at bit `shift`. This replaces the
//! per-mode hand written read sequences of the reference decoder.

use half::f16;

use super::bits::BitStream;
use super::partition::Partition;
use super::BlockOutcome;

const WEIGHT3: [i32; 8] = [0, 9, 18, 27, 37, 46, 55, 64];
const WEIGHT4: [i32; 16] = [0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];

/// Endpoint components of the header. `W` is the base endpoint of region 0,
/// `X` its second endpoint, `Y` and `Z` the endpoints of region 1.
#[derive(Clone, Copy)]
enum Field {
    Rw,
    Gw,
    Bw,
    Rx,
    Gx,
    Bx,
    Ry,
    Gy,
    By,
    Rz,
    Gz,
    Bz,
    Shape,
}

impl Field {
    /// Returns `(channel, endpoint)` or `None` for the shape index.
    const fn slot(self) -> Option<(usize, usize)> {
        match self {
            Field::Rw => Some((0, 0)),
            Field::Gw => Some((1, 0)),
            Field::Bw => Some((2, 0)),
            Field::Rx => Some((0, 1)),
            Field::Gx => Some((1, 1)),
            Field::Bx => Some((2, 1)),
            Field::Ry => Some((0, 2)),
            Field::Gy => Some((1, 2)),
            Field::By => Some((2, 2)),
            Field::Rz => Some((0, 3)),
            Field::Gz => Some((1, 3)),
            Field::Bz => Some((2, 3)),
            Field::Shape => None,
        }
    }
}

#[derive(Clone, Copy)]
struct Run {
    field: Field,
    shift: u8,
    count: u8,
    /// The run is stored most significant bit first.
    reversed: bool,
}

const fn run(field: Field, shift: u8, count: u8) -> Run {
    Run {
        field,
        shift,
        count,
        reversed: false,
    }
}

const fn reversed(field: Field, shift: u8, count: u8) -> Run {
    Run {
        field,
        shift,
        count,
        reversed: true,
    }
}

struct Mode {
    /// Non-base endpoints are stored as deltas from `W`.
    transformed: bool,
    /// Two regions selected by a 5 bit shape index.
    partitioned: bool,
    endpoint_bits: u8,
    delta_bits: [u8; 3],
    layout: &'static [Run],
}

use Field::*;

#[rustfmt::skip]
static MODES: [Mode; 14] = [
    // 0b00: 10.555 10.555 10.555
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 10, delta_bits: [5, 5, 5],
        layout: &[
            run(Gy, 4, 1), run(By, 4, 1), run(Bz, 4, 1), run(Rw, 0, 10), run(Gw, 0, 10),
            run(Bw, 0, 10), run(Rx, 0, 5), run(Gz, 4, 1), run(Gy, 0, 4), run(Gx, 0, 5),
            run(Bz, 0, 1), run(Gz, 0, 4), run(Bx, 0, 5), run(Bz, 1, 1), run(By, 0, 4),
            run(Ry, 0, 5), run(Bz, 2, 1), run(Rz, 0, 5), run(Bz, 3, 1), run(Shape, 0, 5),
        ],
    },
    // 0b01: 7666 7666 7666
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 7, delta_bits: [6, 6, 6],
        layout: &[
            run(Gy, 5, 1), run(Gz, 4, 1), run(Gz, 5, 1), run(Rw, 0, 7), run(Bz, 0, 1),
            run(Bz, 1, 1), run(By, 4, 1), run(Gw, 0, 7), run(By, 5, 1), run(Bz, 2, 1),
            run(Gy, 4, 1), run(Bw, 0, 7), run(Bz, 3, 1), run(Bz, 5, 1), run(Bz, 4, 1),
            run(Rx, 0, 6), run(Gy, 0, 4), run(Gx, 0, 6), run(Gz, 0, 4), run(Bx, 0, 6),
            run(By, 0, 4), run(Ry, 0, 6), run(Rz, 0, 6), run(Shape, 0, 5),
        ],
    },
    // 0b00010: 11.555 11.444 11.444
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 11, delta_bits: [5, 4, 4],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 5), run(Rw, 10, 1),
            run(Gy, 0, 4), run(Gx, 0, 4), run(Gw, 10, 1), run(Bz, 0, 1), run(Gz, 0, 4),
            run(Bx, 0, 4), run(Bw, 10, 1), run(Bz, 1, 1), run(By, 0, 4), run(Ry, 0, 5),
            run(Bz, 2, 1), run(Rz, 0, 5), run(Bz, 3, 1), run(Shape, 0, 5),
        ],
    },
    // 0b00110: 11.444 11.555 11.444
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 11, delta_bits: [4, 5, 4],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 4), run(Rw, 10, 1),
            run(Gz, 4, 1), run(Gy, 0, 4), run(Gx, 0, 5), run(Gw, 10, 1), run(Gz, 0, 4),
            run(Bx, 0, 4), run(Bw, 10, 1), run(Bz, 1, 1), run(By, 0, 4), run(Ry, 0, 4),
            run(Bz, 0, 1), run(Bz, 2, 1), run(Rz, 0, 4), run(Gy, 4, 1), run(Bz, 3, 1),
            run(Shape, 0, 5),
        ],
    },
    // 0b01010: 11.444 11.444 11.555
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 11, delta_bits: [4, 4, 5],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 4), run(Rw, 10, 1),
            run(By, 4, 1), run(Gy, 0, 4), run(Gx, 0, 4), run(Gw, 10, 1), run(Bz, 0, 1),
            run(Gz, 0, 4), run(Bx, 0, 5), run(Bw, 10, 1), run(By, 0, 4), run(Ry, 0, 4),
            run(Bz, 1, 1), run(Bz, 2, 1), run(Rz, 0, 4), run(Bz, 4, 1), run(Bz, 3, 1),
            run(Shape, 0, 5),
        ],
    },
    // 0b01110: 9555 9555 9555
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 9, delta_bits: [5, 5, 5],
        layout: &[
            run(Rw, 0, 9), run(By, 4, 1), run(Gw, 0, 9), run(Gy, 4, 1), run(Bw, 0, 9),
            run(Bz, 4, 1), run(Rx, 0, 5), run(Gz, 4, 1), run(Gy, 0, 4), run(Gx, 0, 5),
            run(Bz, 0, 1), run(Gz, 0, 4), run(Bx, 0, 5), run(Bz, 1, 1), run(By, 0, 4),
            run(Ry, 0, 5), run(Bz, 2, 1), run(Rz, 0, 5), run(Bz, 3, 1), run(Shape, 0, 5),
        ],
    },
    // 0b10010: 8666 8555 8555
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 8, delta_bits: [6, 5, 5],
        layout: &[
            run(Rw, 0, 8), run(Gz, 4, 1), run(By, 4, 1), run(Gw, 0, 8), run(Bz, 2, 1),
            run(Gy, 4, 1), run(Bw, 0, 8), run(Bz, 3, 1), run(Bz, 4, 1), run(Rx, 0, 6),
            run(Gy, 0, 4), run(Gx, 0, 5), run(Bz, 0, 1), run(Gz, 0, 4), run(Bx, 0, 5),
            run(Bz, 1, 1), run(By, 0, 4), run(Ry, 0, 6), run(Rz, 0, 6), run(Shape, 0, 5),
        ],
    },
    // 0b10110: 8555 8666 8555
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 8, delta_bits: [5, 6, 5],
        layout: &[
            run(Rw, 0, 8), run(Bz, 0, 1), run(By, 4, 1), run(Gw, 0, 8), run(Gy, 5, 1),
            run(Gy, 4, 1), run(Bw, 0, 8), run(Gz, 5, 1), run(Bz, 4, 1), run(Rx, 0, 5),
            run(Gz, 4, 1), run(Gy, 0, 4), run(Gx, 0, 6), run(Gz, 0, 4), run(Bx, 0, 5),
            run(Bz, 1, 1), run(By, 0, 4), run(Ry, 0, 5), run(Bz, 2, 1), run(Rz, 0, 5),
            run(Bz, 3, 1), run(Shape, 0, 5),
        ],
    },
    // 0b11010: 8555 8555 8666
    Mode {
        transformed: true, partitioned: true, endpoint_bits: 8, delta_bits: [5, 5, 6],
        layout: &[
            run(Rw, 0, 8), run(Bz, 1, 1), run(By, 4, 1), run(Gw, 0, 8), run(By, 5, 1),
            run(Gy, 4, 1), run(Bw, 0, 8), run(Bz, 5, 1), run(Bz, 4, 1), run(Rx, 0, 5),
            run(Gz, 4, 1), run(Gy, 0, 4), run(Gx, 0, 5), run(Bz, 0, 1), run(Gz, 0, 4),
            run(Bx, 0, 6), run(By, 0, 4), run(Ry, 0, 5), run(Bz, 2, 1), run(Rz, 0, 5),
            run(Bz, 3, 1), run(Shape, 0, 5),
        ],
    },
    // 0b11110: 6666 6666 6666, endpoints stored explicitly
    Mode {
        transformed: false, partitioned: true, endpoint_bits: 6, delta_bits: [6, 6, 6],
        layout: &[
            run(Rw, 0, 6), run(Gz, 4, 1), run(Bz, 0, 1), run(Bz, 1, 1), run(By, 4, 1),
            run(Gw, 0, 6), run(Gy, 5, 1), run(By, 5, 1), run(Bz, 2, 1), run(Gy, 4, 1),
            run(Bw, 0, 6), run(Gz, 5, 1), run(Bz, 3, 1), run(Bz, 5, 1), run(Bz, 4, 1),
            run(Rx, 0, 6), run(Gy, 0, 4), run(Gx, 0, 6), run(Gz, 0, 4), run(Bx, 0, 6),
            run(By, 0, 4), run(Ry, 0, 6), run(Rz, 0, 6), run(Shape, 0, 5),
        ],
    },
    // 0b00011: 10.10 10.10 10.10, endpoints stored explicitly
    Mode {
        transformed: false, partitioned: false, endpoint_bits: 10, delta_bits: [10, 10, 10],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 10), run(Gx, 0, 10),
            run(Bx, 0, 10),
        ],
    },
    // 0b00111: 11.9 11.9 11.9
    Mode {
        transformed: true, partitioned: false, endpoint_bits: 11, delta_bits: [9, 9, 9],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 9), run(Rw, 10, 1),
            run(Gx, 0, 9), run(Gw, 10, 1), run(Bx, 0, 9), run(Bw, 10, 1),
        ],
    },
    // 0b01011: 12.8 12.8 12.8
    Mode {
        transformed: true, partitioned: false, endpoint_bits: 12, delta_bits: [8, 8, 8],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 8),
            reversed(Rw, 10, 2), run(Gx, 0, 8), reversed(Gw, 10, 2), run(Bx, 0, 8),
            reversed(Bw, 10, 2),
        ],
    },
    // 0b01111: 16.4 16.4 16.4
    Mode {
        transformed: true, partitioned: false, endpoint_bits: 16, delta_bits: [4, 4, 4],
        layout: &[
            run(Rw, 0, 10), run(Gw, 0, 10), run(Bw, 0, 10), run(Rx, 0, 4),
            reversed(Rw, 10, 6), run(Gx, 0, 4), reversed(Gw, 10, 6), run(Bx, 0, 4),
            reversed(Bw, 10, 6),
        ],
    },
];

/// Maps the 2 or 5 bit mode selector to its mode. The four remaining 5 bit
/// selectors ending in `0b11` are reserved.
fn select_mode(selector: u32) -> Option<&'static Mode> {
    let index = match selector {
        0b00 => 0,
        0b01 => 1,
        0b00010 => 2,
        0b00110 => 3,
        0b01010 => 4,
        0b01110 => 5,
        0b10010 => 6,
        0b10110 => 7,
        0b11010 => 8,
        0b11110 => 9,
        0b00011 => 10,
        0b00111 => 11,
        0b01011 => 12,
        0b01111 => 13,
        _ => return None,
    };
    Some(&MODES[index])
}

/// Decodes a BC6H block by reading 16 bytes from `compressed_block` and writing the RGB16F data (half float) into `decompressed_block` with `destination_pitch` many half floats per output row.
///
/// Reserved modes and header reads past the end of the block produce a block
/// of zeros and return [`BlockOutcome::Fallback`].
pub fn decode_block_bc6h(
    compressed_block: &[u8],
    decompressed_block: &mut [f16],
    destination_pitch: usize,
    is_signed: bool,
) -> BlockOutcome {
    let mut stream = BitStream::new(compressed_block);

    match decode_pixels(&mut stream, decompressed_block, destination_pitch, is_signed) {
        Some(()) => BlockOutcome::Decoded,
        None => {
            fill_fallback(decompressed_block, destination_pitch, 0);
            BlockOutcome::Fallback
        }
    }
}

/// Decodes a BC6H block into RGB32F, see [`decode_block_bc6h`].
#[inline(always)]
pub fn decode_block_bc6h_float(
    compressed_block: &[u8],
    decompressed_block: &mut [f32],
    destination_pitch: usize,
    is_signed: bool,
) -> BlockOutcome {
    let mut block = [f16::ZERO; 48];
    let outcome = decode_block_bc6h(compressed_block, &mut block, 12, is_signed);

    for i in 0..4 {
        for j in 0..12 {
            decompressed_block[i * destination_pitch + j] = block[i * 12 + j].to_f32();
        }
    }

    outcome
}

/// Decodes a BC6H block to RGB8. Values are clamped to `[0, 1]` before they
/// are scaled to bytes.
#[inline(always)]
pub(crate) fn decode_block_bc6h_unorm(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
    is_signed: bool,
) -> BlockOutcome {
    let mut block = [f16::ZERO; 48];
    let outcome = decode_block_bc6h(compressed_block, &mut block, 12, is_signed);

    for i in 0..4 {
        for j in 0..12 {
            decompressed_block[i * destination_pitch + j] = half_to_unorm8(block[i * 12 + j]);
        }
    }

    outcome
}

#[inline(always)]
fn half_to_unorm8(value: f16) -> u8 {
    // NaN saturates to 0 in the cast.
    (value.to_f32().clamp(0.0, 1.0) * 255.0).round() as u8
}

fn decode_pixels(
    stream: &mut BitStream,
    decompressed_block: &mut [f16],
    destination_pitch: usize,
    is_signed: bool,
) -> Option<()> {
    let mut selector = stream.read_bits(2)?;
    if selector > 1 {
        selector |= stream.read_bits(3)? << 2;
    }
    let mode = select_mode(selector)?;

    // endpoints[channel][endpoint] with endpoints ordered W, X, Y, Z.
    let mut endpoints = [[0i32; 4]; 3];
    let mut shape = 0;

    for run in mode.layout {
        let count = run.count as u32;
        let bits = if run.reversed {
            stream.read_reversed(count)?
        } else {
            stream.read_field(count)?
        };

        match run.field.slot() {
            Some((channel, endpoint)) => endpoints[channel][endpoint] |= (bits << run.shift) as i32,
            None => shape |= (bits as usize) << run.shift,
        }
    }

    let (partition, endpoint_count) = if mode.partitioned {
        (Partition::new(2, shape)?, 4)
    } else {
        (Partition::SINGLE, 2)
    };

    let endpoint_bits = mode.endpoint_bits as i32;
    for (channel, endpoints) in endpoints.iter_mut().enumerate() {
        let delta_bits = mode.delta_bits[channel] as i32;

        if is_signed {
            endpoints[0] = extend_sign(endpoints[0], endpoint_bits);
        }

        if mode.transformed || is_signed {
            for endpoint in &mut endpoints[1..endpoint_count] {
                *endpoint = extend_sign(*endpoint, delta_bits);
            }
        }

        if mode.transformed {
            let base = endpoints[0];
            for endpoint in &mut endpoints[1..endpoint_count] {
                *endpoint = transform_inverse(*endpoint, base, endpoint_bits, is_signed);
            }
        }

        for endpoint in &mut endpoints[..endpoint_count] {
            *endpoint = unquantize(*endpoint, endpoint_bits, is_signed);
        }
    }

    let (weights, index_bits): (&[i32], u32) = if mode.partitioned {
        (&WEIGHT3, 3)
    } else {
        (&WEIGHT4, 4)
    };

    for pixel in 0..16 {
        let bits = index_bits - partition.is_anchor(pixel) as u32;
        let index = match stream.read_bits(bits) {
            Some(index) => index as usize,
            None => {
                fill_fallback(decompressed_block, destination_pitch, pixel);
                return Some(());
            }
        };

        let region = partition.region(pixel);
        let out = (pixel / 4) * destination_pitch + (pixel % 4) * 3;

        for (channel, endpoints) in endpoints.iter().enumerate() {
            let value = interpolate(
                endpoints[region * 2],
                endpoints[region * 2 + 1],
                weights[index],
            );
            decompressed_block[out + channel] = f16::from_bits(finish_unquantize(value, is_signed));
        }
    }

    Some(())
}

/// Zeroes every pixel from `first_pixel` on.
fn fill_fallback(decompressed_block: &mut [f16], destination_pitch: usize, first_pixel: usize) {
    for pixel in first_pixel..16 {
        let out = (pixel / 4) * destination_pitch + (pixel % 4) * 3;
        decompressed_block[out..out + 3].fill(f16::ZERO);
    }
}

#[inline]
fn interpolate(a: i32, b: i32, weight: i32) -> i32 {
    (a * (64 - weight) + b * weight + 32) >> 6
}

#[inline]
fn extend_sign(val: i32, bits: i32) -> i32 {
    // http://graphics.stanford.edu/~seander/bithacks.html#VariableSignExtend
    (val << (32 - bits)) >> (32 - bits)
}

#[inline]
fn transform_inverse(val: i32, base: i32, bits: i32, is_signed: bool) -> i32 {
    // B0 = (B0 + A0) & ((1 << p) - 1)
    let transformed = (val + base) & ((1 << bits) - 1);
    if is_signed {
        extend_sign(transformed, bits)
    } else {
        transformed
    }
}

/// Scales an endpoint from `bits` of precision to the 16 bit range.
#[inline]
fn unquantize(val: i32, bits: i32, is_signed: bool) -> i32 {
    if !is_signed {
        if bits >= 15 {
            val
        } else if val == 0 {
            0
        } else if val == ((1 << bits) - 1) {
            0xFFFF
        } else {
            ((val << 16) + 0x8000) >> bits
        }
    } else if bits >= 16 {
        val
    } else {
        let magnitude = val.abs();

        let unquantized = if magnitude == 0 {
            0
        } else if magnitude >= ((1 << (bits - 1)) - 1) {
            0x7FFF
        } else {
            ((magnitude << 15) + 0x4000) >> (bits - 1)
        };

        if val < 0 {
            -unquantized
        } else {
            unquantized
        }
    }
}

/// Converts an interpolated value to the bit pattern of a half float.
#[inline]
fn finish_unquantize(val: i32, is_signed: bool) -> u16 {
    if !is_signed {
        // Scale the magnitude by 31 / 64
        ((val * 31) >> 6) as u16
    } else {
        // Scale the magnitude by 31 / 32
        let scaled = if val < 0 {
            -(((-val) * 31) >> 5)
        } else {
            (val * 31) >> 5
        };

        if scaled < 0 {
            0x8000 | (-scaled) as u16
        } else {
            scaled as u16
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED_BLOCK: [u8; 16] = [
        0x40, 0xAF, 0xF6, 0x0B, 0xFD, 0x2E, 0xFF, 0xFF, 0x11, 0x71, 0x10, 0xA1, 0x21, 0xF2,
        0x33, 0x73,
    ];

    #[test]
    fn header_layouts_fill_the_block() {
        for (index, mode) in MODES.iter().enumerate() {
            let mode_bits = if index < 2 { 2 } else { 5 };
            let header_bits: u32 = mode.layout.iter().map(|run| run.count as u32).sum();
            let index_bits = if mode.partitioned { 16 * 3 - 2 } else { 16 * 4 - 1 };
            assert_eq!(mode_bits + header_bits + index_bits, 128, "mode {index}");
        }
    }

    #[test]
    fn header_layouts_cover_every_endpoint_bit() {
        for (index, mode) in MODES.iter().enumerate() {
            let mut coverage = [[0u32; 4]; 3];
            let mut shape = 0u32;
            for run in mode.layout {
                let mask = ((1u32 << run.count) - 1) << run.shift;
                match run.field.slot() {
                    Some((channel, endpoint)) => {
                        assert_eq!(coverage[channel][endpoint] & mask, 0, "mode {index}");
                        coverage[channel][endpoint] |= mask;
                    }
                    None => shape |= mask,
                }
            }

            let endpoints = if mode.partitioned { 4 } else { 2 };
            for channel in 0..3 {
                assert_eq!(coverage[channel][0], (1 << mode.endpoint_bits) - 1, "mode {index}");
                let delta_mask = (1 << mode.delta_bits[channel]) - 1;
                for endpoint in 1..endpoints {
                    assert_eq!(coverage[channel][endpoint], delta_mask, "mode {index}");
                }
            }
            assert_eq!(shape, if mode.partitioned { 0x1F } else { 0 }, "mode {index}");
        }
    }

    #[test]
    fn test_bc6h_block_0() {
        let expected_output = [
            0x5BAB, 0x84B9, 0xDBE9, 0x5BA2, 0x84F6, 0xDBF1, 0x5B99, 0x8533, 0xDBFA, 0x5D9B,
            0x8307, 0xD847, 0x5B7E, 0x85F0, 0xDC15, 0x5BA2, 0x84F6, 0xDBF1, 0x5CC3, 0x81E8,
            0xD8D6, 0x5D9B, 0x8307, 0xD847, 0x5BA2, 0x84F6, 0xDBF1, 0x5B6D, 0x866B, 0xDC27,
            0x5C27, 0x8117, 0xD93F, 0x5CC3, 0x81E8, 0xD8D6, 0x5BA2, 0x84F6, 0xDBF1, 0x5CFE,
            0x8235, 0xD8AF, 0x5C5B, 0x815C, 0xD91C, 0x5D66, 0x82C1, 0xD869,
        ]
        .map(f16::from_bits);

        let mut decoded = [f16::ZERO; 48];
        let outcome = decode_block_bc6h(&SIGNED_BLOCK, &mut decoded, 12, true);

        assert_eq!(outcome, BlockOutcome::Decoded);
        assert_eq!(&decoded[..], &expected_output[..], "BC6H block mismatch");
    }

    #[test]
    #[rustfmt::skip]
    fn test_bc6h_block_0_float() {
        let expected_output: [f32; 48] = [
            245.375, -0.000072062016, -253.125, 244.25, -0.0000756979, -254.125, 243.125, -0.00007933378, -255.25, 358.75, -0.0000461936, -136.875, 239.75, -0.00009059906, -261.25, 244.25,
            -0.0000756979, -254.125, 304.75, -0.000029087067, -154.75, 358.75, -0.0000461936, -136.875, 244.25, -0.0000756979, -254.125, 237.625, -0.00009793043, -265.75, 265.75, -0.000016629696,
            -167.875, 304.75, -0.000029087067, -154.75, 244.25, -0.0000756979, -254.125, 319.5, -0.000033676624, -149.875, 278.75, -0.000020742416, -163.5, 345.5, -0.000042021275, -141.125
        ];

        let mut decoded = [0.0_f32; 48];
        decode_block_bc6h_float(&SIGNED_BLOCK, &mut decoded, 12, true);

        assert_eq!(&decoded[..], &expected_output[..], "BC6H block mismatch");
    }

    #[test]
    fn reserved_modes_decode_to_zero() {
        for selector in [0b10011u8, 0b10111, 0b11011, 0b11111] {
            let mut compressed_block = [0xFFu8; 16];
            compressed_block[0] = 0xE0 | selector;

            let mut decoded = [f16::ONE; 48];
            let outcome = decode_block_bc6h(&compressed_block, &mut decoded, 12, false);

            assert_eq!(outcome, BlockOutcome::Fallback, "selector {selector:#07b}");
            assert!(decoded.iter().all(|value| *value == f16::ZERO));
        }
    }

    #[test]
    fn unsigned_explicit_endpoints() {
        // Mode 0b00011 with W = (1023, 0, 0), X = (0, 0, 1023) and every
        // index 0 except the last pixel, which uses index 15.
        let mut bits: u128 = 0b00011;
        bits |= 1023 << 5;
        bits |= 1023 << (5 + 50);
        bits |= 15 << (128 - 4);
        let compressed_block = bits.to_le_bytes();

        let mut decoded = [f16::ZERO; 48];
        let outcome = decode_block_bc6h(&compressed_block, &mut decoded, 12, false);
        assert_eq!(outcome, BlockOutcome::Decoded);

        // 0xFFFF * 31 / 64 is the largest finite unsigned half.
        let red = f16::from_bits(0x7BFF);
        assert_eq!(&decoded[0..3], &[red, f16::ZERO, f16::ZERO]);
        assert_eq!(&decoded[45..48], &[f16::ZERO, f16::ZERO, red]);

        let mut bytes = [0u8; 48];
        decode_block_bc6h_unorm(&compressed_block, &mut bytes, 12, false);
        assert_eq!(&bytes[0..3], &[255, 0, 0]);
        assert_eq!(&bytes[45..48], &[0, 0, 255]);
    }

    #[test]
    fn unorm_conversion_clamps() {
        assert_eq!(half_to_unorm8(f16::from_f32(-3.0)), 0);
        assert_eq!(half_to_unorm8(f16::from_f32(0.5)), 128);
        assert_eq!(half_to_unorm8(f16::from_f32(7.0)), 255);
        assert_eq!(half_to_unorm8(f16::NAN), 0);
    }
}
