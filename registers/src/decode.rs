//! Raw register value decoding shared by every region.

use crate::RegisterError;

/// Convert an address register value to a physical byte address.
///
/// Physical addresses referenced by GPU registers are 8-byte aligned, so the
/// registers hold the address divided by 8. Overflow wraps.
#[inline]
#[must_use]
pub const fn decode_address(raw: u32) -> u32 {
    raw.wrapping_mul(8)
}

/// Pixel formats selectable by a 3-bit format field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32 bpp, 8-8-8-8
    Rgba8 = 0,
    /// 24 bpp, 8-8-8
    Rgb8 = 1,
    /// 16 bpp, 5-6-5
    Rgb565 = 2,
    /// 16 bpp, 5-5-5-1
    Rgba5551 = 3,
    /// 16 bpp, 4-4-4-4
    Rgba4 = 4,
}

impl PixelFormat {
    /// Decode a format code.
    ///
    /// # Errors
    /// Returns [`RegisterError::InvalidFormatCode`] for codes 5 and up.
    pub const fn from_bits(code: u32) -> Result<Self, RegisterError> {
        match code {
            0 => Ok(Self::Rgba8),
            1 => Ok(Self::Rgb8),
            2 => Ok(Self::Rgb565),
            3 => Ok(Self::Rgba5551),
            4 => Ok(Self::Rgba4),
            code => Err(RegisterError::InvalidFormatCode(code)),
        }
    }

    /// The format code of the variant
    #[must_use]
    pub const fn bits(&self) -> u32 {
        *self as u32
    }

    #[must_use]
    pub const fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::Rgba8 => 4,
            Self::Rgb8 => 3,
            Self::Rgb565 | Self::Rgba5551 | Self::Rgba4 => 2,
        }
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Rgba8 => "RGBA8",
            Self::Rgb8 => "RGB8",
            Self::Rgb565 => "RGB565",
            Self::Rgba5551 => "RGBA5551",
            Self::Rgba4 => "RGBA4",
        };
        f.write_str(name)
    }
}

/// Table lookup from a format code to a [`PixelFormat`].
pub const fn decode_format(code: u32) -> Result<PixelFormat, RegisterError> {
    PixelFormat::from_bits(code)
}

/// Framebuffer format word. Only the low 3 bits select the pixel format.
#[repr(transparent)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferFormat(pub u32);

impl FramebufferFormat {
    pub const FORMAT_MAP: [PixelFormat; 5] = [
        PixelFormat::Rgba8,
        PixelFormat::Rgb8,
        PixelFormat::Rgb565,
        PixelFormat::Rgba5551,
        PixelFormat::Rgba4,
    ];

    pub const SELECTOR: crate::PackedField = crate::PackedField::new(0, 3);

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn code(self) -> u32 {
        Self::SELECTOR.extract(self.0)
    }

    pub const fn pixel_format(self) -> Result<PixelFormat, RegisterError> {
        decode_format(self.code())
    }
}
