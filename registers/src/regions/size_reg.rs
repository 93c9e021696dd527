//! Register: width/height pair

use crate::PackedField;

/// 16-bit width in the low half, 16-bit height in the high half.
///
/// Used by the framebuffer size word and both display-transfer size words.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct SizeReg(pub u32);

impl SizeReg {
    pub const WIDTH: PackedField = PackedField::new(0, 16);
    pub const HEIGHT: PackedField = PackedField::new(16, 16);

    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self(Self::HEIGHT.deposit(Self::WIDTH.deposit(0, width as u32), height as u32))
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        Self::WIDTH.extract(self.0) as u16
    }

    #[inline]
    pub fn set_width(&mut self, val: u16) {
        self.0 = Self::WIDTH.deposit(self.0, val.into());
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        Self::HEIGHT.extract(self.0) as u16
    }

    #[inline]
    pub fn set_height(&mut self, val: u16) {
        self.0 = Self::HEIGHT.deposit(self.0, val.into());
    }
}

impl core::fmt::Debug for SizeReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SizeReg")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
