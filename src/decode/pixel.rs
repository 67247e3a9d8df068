//! Decoders for uncompressed and packed pixel formats.
//!
//! Every function decodes one block of the format: a single pixel, or a pair
//! of pixels for the 4:2:2 formats. Multi-byte outputs are little endian.

use super::bits::{le_u16, le_u32};

/// Copies a pixel whose stored layout already matches its output layout.
#[inline(always)]
pub(crate) fn copy(source: &[u8], destination: &mut [u8]) {
    destination[..source.len()].copy_from_slice(source);
}

#[inline(always)]
pub(crate) fn bgr8(source: &[u8], destination: &mut [u8]) {
    destination[..3].copy_from_slice(&[source[2], source[1], source[0]]);
}

#[inline(always)]
pub(crate) fn bgra8(source: &[u8], destination: &mut [u8]) {
    destination[..4].copy_from_slice(&[source[2], source[1], source[0], source[3]]);
}

#[inline(always)]
pub(crate) fn bgrx8(source: &[u8], destination: &mut [u8]) {
    bgr8(source, destination);
}

#[inline(always)]
pub(crate) fn rgbx8(source: &[u8], destination: &mut [u8]) {
    destination[..3].copy_from_slice(&source[..3]);
}

#[inline(always)]
fn expand5(value: u16) -> u8 {
    ((value << 3) | (value >> 2)) as u8
}

#[inline(always)]
fn expand6(value: u16) -> u8 {
    ((value << 2) | (value >> 4)) as u8
}

#[inline(always)]
pub(crate) fn b5g6r5(source: &[u8], destination: &mut [u8]) {
    let value = le_u16(source, 0);
    destination[..3].copy_from_slice(&[
        expand5((value >> 11) & 0x1F),
        expand6((value >> 5) & 0x3F),
        expand5(value & 0x1F),
    ]);
}

#[inline(always)]
pub(crate) fn b5g5r5a1(source: &[u8], destination: &mut [u8]) {
    let value = le_u16(source, 0);
    destination[..4].copy_from_slice(&[
        expand5((value >> 10) & 0x1F),
        expand5((value >> 5) & 0x1F),
        expand5(value & 0x1F),
        if value & 0x8000 != 0 { 0xFF } else { 0x00 },
    ]);
}

#[inline(always)]
pub(crate) fn b5g5r5x1(source: &[u8], destination: &mut [u8]) {
    let value = le_u16(source, 0);
    destination[..3].copy_from_slice(&[
        expand5((value >> 10) & 0x1F),
        expand5((value >> 5) & 0x1F),
        expand5(value & 0x1F),
    ]);
}

#[inline(always)]
pub(crate) fn b4g4r4a4(source: &[u8], destination: &mut [u8]) {
    let value = le_u16(source, 0);
    destination[..4].copy_from_slice(&[
        ((value >> 8) & 0xF) as u8 * 17,
        ((value >> 4) & 0xF) as u8 * 17,
        (value & 0xF) as u8 * 17,
        (value >> 12) as u8 * 17,
    ]);
}

/// Writes four 16 bit channels from 10 bit color and 2 bit alpha.
#[inline(always)]
fn write_rgb10a2(red: u32, green: u32, blue: u32, alpha: u32, destination: &mut [u8]) {
    let expand10 = |value: u32| ((value << 6) | (value >> 4)) as u16;
    let channels = [expand10(red), expand10(green), expand10(blue), alpha as u16 * 0x5555];
    for (chunk, channel) in destination[..8].chunks_exact_mut(2).zip(channels) {
        chunk.copy_from_slice(&channel.to_le_bytes());
    }
}

#[inline(always)]
pub(crate) fn r10g10b10a2(source: &[u8], destination: &mut [u8]) {
    let value = le_u32(source, 0);
    write_rgb10a2(
        value & 0x3FF,
        (value >> 10) & 0x3FF,
        (value >> 20) & 0x3FF,
        value >> 30,
        destination,
    );
}

#[inline(always)]
pub(crate) fn b10g10r10a2(source: &[u8], destination: &mut [u8]) {
    let value = le_u32(source, 0);
    write_rgb10a2(
        (value >> 20) & 0x3FF,
        (value >> 10) & 0x3FF,
        value & 0x3FF,
        value >> 30,
        destination,
    );
}

/// BT.601 limited range YCbCr to RGB.
#[inline(always)]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = 298 * (y as i32 - 16);
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    let clamp = |value: i32| ((value + 128) >> 8).clamp(0, 255) as u8;
    [
        clamp(c + 409 * e),
        clamp(c - 100 * d - 208 * e),
        clamp(c + 516 * d),
    ]
}

#[inline(always)]
fn write_pair(first: [u8; 3], second: [u8; 3], destination: &mut [u8]) {
    destination[..3].copy_from_slice(&first);
    destination[3..6].copy_from_slice(&second);
}

#[inline(always)]
pub(crate) fn yuy2(source: &[u8], destination: &mut [u8]) {
    let [y0, u, y1, v] = [source[0], source[1], source[2], source[3]];
    write_pair(yuv_to_rgb(y0, u, v), yuv_to_rgb(y1, u, v), destination);
}

#[inline(always)]
pub(crate) fn uyvy(source: &[u8], destination: &mut [u8]) {
    let [u, y0, v, y1] = [source[0], source[1], source[2], source[3]];
    write_pair(yuv_to_rgb(y0, u, v), yuv_to_rgb(y1, u, v), destination);
}

#[inline(always)]
pub(crate) fn rgbg(source: &[u8], destination: &mut [u8]) {
    let [r, g0, b, g1] = [source[0], source[1], source[2], source[3]];
    write_pair([r, g0, b], [r, g1, b], destination);
}

#[inline(always)]
pub(crate) fn grgb(source: &[u8], destination: &mut [u8]) {
    let [g0, r, g1, b] = [source[0], source[1], source[2], source[3]];
    write_pair([r, g0, b], [r, g1, b], destination);
}
