//! Region: framebuffer_config[0..2]
//!
//! Each display unit has two address sets, suffixed "1" and "2". Writing
//! `active_fb` picks which set scanout reads from; the switch takes effect
//! immediately.

use crate::decode::{decode_address, FramebufferFormat};
use crate::regions::SizeReg;
use crate::PackedField;

/// `active_fb` word.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct FramebufferSelect(pub u32);

impl FramebufferSelect {
    /// 0: use the "1" address set, 1: use the "2" address set.
    pub const SECOND_FB_ACTIVE: PackedField = PackedField::new(0, 1);

    #[inline]
    #[must_use]
    pub const fn second_fb_active(&self) -> bool {
        Self::SECOND_FB_ACTIVE.is_set(self.0)
    }

    #[inline]
    pub fn set_second_fb_active(&mut self, val: bool) {
        self.0 = Self::SECOND_FB_ACTIVE.with_flag(self.0, val);
    }

    /// Index of the live address set (0 for "1", 1 for "2").
    #[inline]
    #[must_use]
    pub const fn active_set(&self) -> usize {
        self.second_fb_active() as usize
    }
}

impl core::fmt::Debug for FramebufferSelect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FramebufferSelect")
            .field("second_fb_active", &self.second_fb_active())
            .finish()
    }
}

/// Word indices within the region.
pub mod word {
    pub const SIZE: usize = 0x0;
    pub const ADDRESS_LEFT1: usize = 0x3;
    pub const ADDRESS_LEFT2: usize = 0x4;
    pub const FORMAT: usize = 0x5;
    pub const ACTIVE_FB: usize = 0x7;
    /// Distance between two pixel rows, in bytes.
    pub const STRIDE: usize = 0xD;
    pub const ADDRESS_RIGHT1: usize = 0xE;
    pub const ADDRESS_RIGHT2: usize = 0xF;
}

/// View over one `framebuffer_config` region.
pub struct FramebufferConfig<W> {
    words: W,
}

impl<W: AsRef<[u32]>> FramebufferConfig<W> {
    pub(crate) fn new(words: W) -> Self {
        debug_assert_eq!(words.as_ref().len(), crate::layout::FRAMEBUFFER_CONFIG_WORDS);
        Self { words }
    }

    fn raw(&self, index: usize) -> u32 {
        self.words.as_ref()[index]
    }

    #[must_use]
    pub fn size(&self) -> SizeReg {
        SizeReg(self.raw(word::SIZE))
    }

    #[must_use]
    pub fn address_left1(&self) -> u32 {
        self.raw(word::ADDRESS_LEFT1)
    }

    #[must_use]
    pub fn address_left2(&self) -> u32 {
        self.raw(word::ADDRESS_LEFT2)
    }

    #[must_use]
    pub fn address_right1(&self) -> u32 {
        self.raw(word::ADDRESS_RIGHT1)
    }

    #[must_use]
    pub fn address_right2(&self) -> u32 {
        self.raw(word::ADDRESS_RIGHT2)
    }

    #[must_use]
    pub fn format(&self) -> FramebufferFormat {
        FramebufferFormat(self.raw(word::FORMAT))
    }

    #[must_use]
    pub fn active_fb(&self) -> FramebufferSelect {
        FramebufferSelect(self.raw(word::ACTIVE_FB))
    }

    #[must_use]
    pub fn stride(&self) -> u32 {
        self.raw(word::STRIDE)
    }

    /// Raw left-eye address of the live set.
    #[must_use]
    pub fn active_address_left(&self) -> u32 {
        if self.active_fb().second_fb_active() {
            self.address_left2()
        } else {
            self.address_left1()
        }
    }

    /// Raw right-eye address of the live set.
    #[must_use]
    pub fn active_address_right(&self) -> u32 {
        if self.active_fb().second_fb_active() {
            self.address_right2()
        } else {
            self.address_right1()
        }
    }

    /// Physical left-eye address of the live set.
    #[must_use]
    pub fn active_left_address(&self) -> u32 {
        decode_address(self.active_address_left())
    }

    /// Physical right-eye address of the live set.
    #[must_use]
    pub fn active_right_address(&self) -> u32 {
        decode_address(self.active_address_right())
    }
}

impl<W: AsRef<[u32]> + AsMut<[u32]>> FramebufferConfig<W> {
    fn raw_mut(&mut self, index: usize) -> &mut u32 {
        &mut self.words.as_mut()[index]
    }

    pub fn set_size(&mut self, size: SizeReg) {
        *self.raw_mut(word::SIZE) = size.0;
    }

    pub fn set_address_left1(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS_LEFT1) = raw;
    }

    pub fn set_address_left2(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS_LEFT2) = raw;
    }

    pub fn set_address_right1(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS_RIGHT1) = raw;
    }

    pub fn set_address_right2(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS_RIGHT2) = raw;
    }

    pub fn set_format(&mut self, format: FramebufferFormat) {
        *self.raw_mut(word::FORMAT) = format.0;
    }

    pub fn set_active_fb(&mut self, select: FramebufferSelect) {
        *self.raw_mut(word::ACTIVE_FB) = select.0;
    }

    pub fn set_stride(&mut self, stride: u32) {
        *self.raw_mut(word::STRIDE) = stride;
    }
}
