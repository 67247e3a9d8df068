//! Bit and byte readers over a single compressed block.

/// Number of bits in the largest block (16 bytes).
pub(crate) const BLOCK_BITS: u32 = 128;

#[inline(always)]
pub(crate) fn le_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline(always)]
pub(crate) fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

#[inline(always)]
pub(crate) fn le_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// LSB-first reader over a 128 bit block.
///
/// Every read returns `None` instead of wrapping once the cursor would move
/// past the end of the block. Callers treat that as an invalid encoding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BitStream {
    low: u64,
    high: u64,
    position: u32,
}

impl BitStream {
    /// Creates a bitstream over the first 16 bytes of `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than 16 bytes.
    #[inline]
    pub(crate) fn new(data: &[u8]) -> Self {
        Self {
            low: le_u64(data, 0),
            high: le_u64(data, 8),
            position: 0,
        }
    }

    #[inline]
    pub(crate) fn read_bit(&mut self) -> Option<u32> {
        self.read_bits(1)
    }

    /// Reads up to 8 bits. Bits that straddle a byte boundary come low bits
    /// first from the current byte.
    #[inline]
    pub(crate) fn read_bits(&mut self, count: u32) -> Option<u32> {
        debug_assert!(count <= 8);
        if count == 0 {
            return Some(0);
        }
        if self.position + count > BLOCK_BITS {
            return None;
        }

        let mask = (1u64 << count) - 1;
        let bits = (self.low & mask) as u32;
        // Shift the low bits of `high` into the top of `low`.
        self.low = (self.low >> count) | ((self.high & mask) << (64 - count));
        self.high >>= count;
        self.position += count;

        Some(bits)
    }

    /// Reads a field of up to 16 bits, assembled LSB first from byte sized
    /// chunks.
    #[inline]
    pub(crate) fn read_field(&mut self, count: u32) -> Option<u32> {
        debug_assert!(count <= 16);
        let mut value = 0;
        let mut shift = 0;
        while shift < count {
            let chunk = (count - shift).min(8);
            value |= self.read_bits(chunk)? << shift;
            shift += chunk;
        }
        Some(value)
    }

    /// Reads a field whose first bit is its most significant one.
    #[inline]
    pub(crate) fn read_reversed(&mut self, count: u32) -> Option<u32> {
        let bits = self.read_field(count)?;
        Some((0..count).fold(0, |result, i| (result << 1) | ((bits >> i) & 1)))
    }
}
