//! Error types returned by container parsing and surface decoding.

use thiserror::Error;

/// Result type used throughout the crate.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that abort decoding of a whole texture.
///
/// Invalid encodings inside a single BC6H or BC7 block are not errors. Those
/// blocks decode to the fallback color and decoding continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream does not start with a DDS, KTX or KTX2 identifier.
    #[error("not a DDS, KTX or KTX2 texture")]
    NotATexture,

    /// The container was recognized but its header is inconsistent.
    #[error("malformed texture container: {0}")]
    MalformedContainer(#[from] Malformed),

    /// The container is valid but stores a format this crate can't decode.
    #[error("unsupported texture format: {0}")]
    UnsupportedFormat(#[from] UnsupportedFormat),

    /// Fewer bytes are available than a surface needs.
    #[error("truncated texture data: expected {expected} bytes, but only {actual} are available")]
    TruncatedStream {
        /// The number of bytes the surface needs
        expected: usize,
        /// The number of bytes that were available
        actual: usize,
    },

    /// An I/O error other than an unexpected end of stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a container header is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("header ends after {0} bytes")]
    TruncatedHeader(usize),
    #[error("invalid header size {0}")]
    HeaderSize(u32),
    #[error("invalid pixel format size {0}")]
    PixelFormatSize(u32),
    #[error("invalid header flags {0:#010X}")]
    HeaderFlags(u32),
    #[error("width or height is zero")]
    ZeroDimension,
    #[error("dimension {value} exceeds the limit of {limit}")]
    DimensionTooLarge { value: u32, limit: u32 },
    #[error("surface size overflows")]
    SizeOverflow,
    #[error("invalid resource dimension {0}")]
    ResourceDimension(u32),
    #[error("invalid array size {0}")]
    ArraySize(u32),
    #[error("cube map without faces")]
    CubemapFaces,
    #[error("mip level count {0} is larger than the dimensions allow")]
    MipLevelCount(u32),
    #[error("invalid face count {0}")]
    FaceCount(u32),
    #[error("invalid endianness marker {0:#010X}")]
    Endianness(u32),
    #[error("invalid size or offset for mip level {0}")]
    LevelSize(u32),
}

/// The offending format code of an [`DecodeError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnsupportedFormat {
    /// A DDS pixel format FourCC.
    #[error("FourCC {:?}", String::from_utf8_lossy(.0))]
    FourCc([u8; 4]),
    /// A DXGI format from a DDS DX10 header.
    #[error("DXGI format {0}")]
    Dxgi(u32),
    /// A DDS pixel format described by bit masks.
    #[error("{bit_count} bit pixel format with flags {flags:#010X} and masks {masks:08X?}")]
    PixelMasks {
        flags: u32,
        bit_count: u32,
        masks: [u32; 4],
    },
    /// A KTX `glInternalFormat`.
    #[error("GL internal format {0:#06X}")]
    GlInternalFormat(u32),
    /// A KTX2 `vkFormat`.
    #[error("Vulkan format {0}")]
    VkFormat(u32),
    /// A KTX2 supercompression scheme.
    #[error("supercompression scheme {0}")]
    Supercompression(u32),
    /// A KTX file written in big endian byte order.
    #[error("big endian KTX")]
    BigEndian,
    /// A codec family that was disabled at compile time.
    #[error("{0} (disabled at compile time)")]
    Disabled(&'static str),
}
