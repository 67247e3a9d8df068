//! # block_decompression
//!
//! CPU decoding of block compressed GPU textures.
//!
//! Reads DDS, KTX and KTX2 containers and decodes every stored surface into
//! a plain pixel buffer. Block compressed formats are decoded 4x4 blocks at
//! a time, uncompressed formats are swizzled into a small set of
//! [`PixelLayout`]s.
//!
//! ## Supported block compressions
//!
//!  * BC1 (DXT1)
//!  * BC2 (DXT3)
//!  * BC3 (DXT5)
//!  * BC4 and BC4 signed
//!  * BC5 and BC5 signed
//!  * BC6H and BC6H signed
//!  * BC7
//!
//! BC1 to BC5 are behind the `bc15` feature, BC6H behind `bc6h` and BC7
//! behind `bc7`. All three are enabled by default.
//!
//! ## Example
//!
//! ```no_run
//! use block_decompression::{load, DecodeSettings};
//!
//! let bytes = std::fs::read("texture.dds")?;
//! let texture = load(&bytes, &DecodeSettings::top_level())?;
//! if let Some(mip) = texture.first_mip() {
//!     println!("{}x{} {:?}", mip.width, mip.height, mip.layout);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod dds;
pub mod decode;
mod error;
mod format;
pub mod ktx;
pub mod ktx2;
mod settings;
mod texture;

pub use decode::{decode_surface, BlockOutcome};
pub use error::{DecodeError, DecodeResult, Malformed, UnsupportedFormat};
pub use format::{FormatDescriptor, PixelFormat, PixelLayout};
pub use settings::{DecodeSettings, MipLevels};
pub use texture::{CubeFace, CubemapTexture, FlatTexture, MipMap, Texture, VolumeTexture};

/// Container formats this crate can read.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub enum ContainerFormat {
    Dds,
    Ktx,
    Ktx2,
}

impl ContainerFormat {
    /// Detects the container from the magic bytes at the start of `bytes`.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(dds::MAGIC) {
            Some(ContainerFormat::Dds)
        } else if bytes.starts_with(&ktx::IDENTIFIER) {
            Some(ContainerFormat::Ktx)
        } else if bytes.starts_with(&ktx2::IDENTIFIER) {
            Some(ContainerFormat::Ktx2)
        } else {
            None
        }
    }

    const fn name(self) -> &'static str {
        match self {
            ContainerFormat::Dds => "dds",
            ContainerFormat::Ktx => "ktx",
            ContainerFormat::Ktx2 => "ktx2",
        }
    }
}

/// Loads a texture from a DDS, KTX or KTX2 file held in memory.
pub fn load(bytes: &[u8], settings: &DecodeSettings) -> DecodeResult<Texture> {
    let container = ContainerFormat::detect(bytes).ok_or(DecodeError::NotATexture)?;
    tracing::trace!(container = container.name(), "detected texture container");

    match container {
        ContainerFormat::Dds => dds::read(bytes, settings),
        ContainerFormat::Ktx => ktx::read(bytes, settings),
        ContainerFormat::Ktx2 => ktx2::read(bytes, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_are_detected() {
        assert_eq!(
            ContainerFormat::detect(b"DDS \x7c\0\0\0"),
            Some(ContainerFormat::Dds)
        );
        assert_eq!(
            ContainerFormat::detect(&ktx::IDENTIFIER),
            Some(ContainerFormat::Ktx)
        );
        assert_eq!(
            ContainerFormat::detect(&ktx2::IDENTIFIER),
            Some(ContainerFormat::Ktx2)
        );
        assert_eq!(ContainerFormat::detect(b"\x89PNG\r\n\x1a\n"), None);
        assert_eq!(ContainerFormat::detect(b""), None);
    }

    #[test]
    fn unknown_data_is_not_a_texture() {
        assert!(matches!(
            load(b"GIF89a", &DecodeSettings::default()),
            Err(DecodeError::NotATexture)
        ));
    }
}
