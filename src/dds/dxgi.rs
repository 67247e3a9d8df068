use crate::PixelFormat;

macro_rules! dxgi_formats {
    ($($name:ident = $value:literal,)*) => {
        /// `DXGI_FORMAT`
        ///
        /// <https://learn.microsoft.com/en-us/windows/win32/api/dxgiformat/ne-dxgiformat-dxgi_format>
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum DxgiFormat {
            $($name = $value,)*
        }

        impl TryFrom<u32> for DxgiFormat {
            type Error = u32;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(DxgiFormat::$name),)*
                    other => Err(other),
                }
            }
        }
    };
}

dxgi_formats! {
    Unknown = 0,
    R32G32B32A32Typeless = 1,
    R32G32B32A32Float = 2,
    R32G32B32A32Uint = 3,
    R32G32B32A32Sint = 4,
    R32G32B32Typeless = 5,
    R32G32B32Float = 6,
    R32G32B32Uint = 7,
    R32G32B32Sint = 8,
    R16G16B16A16Typeless = 9,
    R16G16B16A16Float = 10,
    R16G16B16A16Unorm = 11,
    R16G16B16A16Uint = 12,
    R16G16B16A16Snorm = 13,
    R16G16B16A16Sint = 14,
    R32G32Typeless = 15,
    R32G32Float = 16,
    R32G32Uint = 17,
    R32G32Sint = 18,
    R32G8X24Typeless = 19,
    D32FloatS8X24Uint = 20,
    R32FloatX8X24Typeless = 21,
    X32TypelessG8X24Uint = 22,
    R10G10B10A2Typeless = 23,
    R10G10B10A2Unorm = 24,
    R10G10B10A2Uint = 25,
    R11G11B10Float = 26,
    R8G8B8A8Typeless = 27,
    R8G8B8A8Unorm = 28,
    R8G8B8A8UnormSrgb = 29,
    R8G8B8A8Uint = 30,
    R8G8B8A8Snorm = 31,
    R8G8B8A8Sint = 32,
    R16G16Typeless = 33,
    R16G16Float = 34,
    R16G16Unorm = 35,
    R16G16Uint = 36,
    R16G16Snorm = 37,
    R16G16Sint = 38,
    R32Typeless = 39,
    D32Float = 40,
    R32Float = 41,
    R32Uint = 42,
    R32Sint = 43,
    R24G8Typeless = 44,
    D24UnormS8Uint = 45,
    R24UnormX8Typeless = 46,
    X24TypelessG8Uint = 47,
    R8G8Typeless = 48,
    R8G8Unorm = 49,
    R8G8Uint = 50,
    R8G8Snorm = 51,
    R8G8Sint = 52,
    R16Typeless = 53,
    R16Float = 54,
    D16Unorm = 55,
    R16Unorm = 56,
    R16Uint = 57,
    R16Snorm = 58,
    R16Sint = 59,
    R8Typeless = 60,
    R8Unorm = 61,
    R8Uint = 62,
    R8Snorm = 63,
    R8Sint = 64,
    A8Unorm = 65,
    R1Unorm = 66,
    R9G9B9E5Sharedexp = 67,
    R8G8B8G8Unorm = 68,
    G8R8G8B8Unorm = 69,
    Bc1Typeless = 70,
    Bc1Unorm = 71,
    Bc1UnormSrgb = 72,
    Bc2Typeless = 73,
    Bc2Unorm = 74,
    Bc2UnormSrgb = 75,
    Bc3Typeless = 76,
    Bc3Unorm = 77,
    Bc3UnormSrgb = 78,
    Bc4Typeless = 79,
    Bc4Unorm = 80,
    Bc4Snorm = 81,
    Bc5Typeless = 82,
    Bc5Unorm = 83,
    Bc5Snorm = 84,
    B5G6R5Unorm = 85,
    B5G5R5A1Unorm = 86,
    B8G8R8A8Unorm = 87,
    B8G8R8X8Unorm = 88,
    R10G10B10XrBiasA2Unorm = 89,
    B8G8R8A8Typeless = 90,
    B8G8R8A8UnormSrgb = 91,
    B8G8R8X8Typeless = 92,
    B8G8R8X8UnormSrgb = 93,
    Bc6HTypeless = 94,
    Bc6HUf16 = 95,
    Bc6HSf16 = 96,
    Bc7Typeless = 97,
    Bc7Unorm = 98,
    Bc7UnormSrgb = 99,
    Ayuv = 100,
    Y410 = 101,
    Y416 = 102,
    Nv12 = 103,
    P010 = 104,
    P016 = 105,
    Opaque420 = 106,
    Yuy2 = 107,
    Y210 = 108,
    Y216 = 109,
    Nv11 = 110,
    Ai44 = 111,
    Ia44 = 112,
    P8 = 113,
    A8P8 = 114,
    B4G4R4A4Unorm = 115,
    P208 = 130,
    V208 = 131,
    V408 = 132,
    SamplerFeedbackMinMipOpaque = 189,
    SamplerFeedbackMipRegionUsedOpaque = 190,
    A4B4G4R4Unorm = 191,
}

impl DxgiFormat {
    /// The decoded format, if there is a decoder for it.
    ///
    /// sRGB formats decode like their linear counterparts.
    pub const fn pixel_format(self) -> Option<PixelFormat> {
        let format = match self {
            DxgiFormat::R32G32B32A32Float => PixelFormat::R32G32B32A32Float,
            DxgiFormat::R32G32B32Float => PixelFormat::R32G32B32Float,
            DxgiFormat::R16G16B16A16Float => PixelFormat::R16G16B16A16Float,
            DxgiFormat::R16G16B16A16Unorm => PixelFormat::R16G16B16A16,
            DxgiFormat::R32G32Float => PixelFormat::R32G32Float,
            DxgiFormat::R10G10B10A2Unorm => PixelFormat::R10G10B10A2,
            DxgiFormat::R8G8B8A8Unorm | DxgiFormat::R8G8B8A8UnormSrgb => PixelFormat::R8G8B8A8,
            DxgiFormat::R16G16Float => PixelFormat::R16G16Float,
            DxgiFormat::R16G16Unorm => PixelFormat::R16G16,
            DxgiFormat::R32Float => PixelFormat::R32Float,
            DxgiFormat::R8G8Unorm => PixelFormat::R8G8,
            DxgiFormat::R16Float => PixelFormat::R16Float,
            DxgiFormat::R16Unorm => PixelFormat::R16,
            DxgiFormat::R8Unorm => PixelFormat::R8,
            DxgiFormat::A8Unorm => PixelFormat::A8,
            DxgiFormat::R8G8B8G8Unorm => PixelFormat::R8G8B8G8,
            DxgiFormat::G8R8G8B8Unorm => PixelFormat::G8R8G8B8,
            DxgiFormat::Bc1Unorm | DxgiFormat::Bc1UnormSrgb => PixelFormat::Bc1,
            DxgiFormat::Bc2Unorm | DxgiFormat::Bc2UnormSrgb => PixelFormat::Bc2,
            DxgiFormat::Bc3Unorm | DxgiFormat::Bc3UnormSrgb => PixelFormat::Bc3,
            DxgiFormat::Bc4Unorm => PixelFormat::Bc4,
            DxgiFormat::Bc4Snorm => PixelFormat::Bc4S,
            DxgiFormat::Bc5Unorm => PixelFormat::Bc5,
            DxgiFormat::Bc5Snorm => PixelFormat::Bc5S,
            DxgiFormat::B5G6R5Unorm => PixelFormat::B5G6R5,
            DxgiFormat::B5G5R5A1Unorm => PixelFormat::B5G5R5A1,
            DxgiFormat::B8G8R8A8Unorm | DxgiFormat::B8G8R8A8UnormSrgb => PixelFormat::B8G8R8A8,
            DxgiFormat::B8G8R8X8Unorm | DxgiFormat::B8G8R8X8UnormSrgb => PixelFormat::B8G8R8X8,
            DxgiFormat::Bc6HUf16 => PixelFormat::Bc6H,
            DxgiFormat::Bc6HSf16 => PixelFormat::Bc6HS,
            DxgiFormat::Bc7Unorm | DxgiFormat::Bc7UnormSrgb => PixelFormat::Bc7,
            DxgiFormat::Yuy2 => PixelFormat::Yuy2,
            DxgiFormat::B4G4R4A4Unorm => PixelFormat::B4G4R4A4,
            _ => return None,
        };
        Some(format)
    }
}
