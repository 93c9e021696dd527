//! Region: memory_fill_config[0..2]
//!
//! Writes a repeating 16-, 24- or 32-bit pattern between two physical
//! addresses. Setting TRIGGER starts the fill; the fill unit clears TRIGGER
//! and sets FINISHED when it is done.

use crate::decode::decode_address;
use crate::PackedField;

/// Fill value word.
///
/// The same word is read as a 16-bit value, a 24-bit R/G/B triple, or a
/// full 32-bit value depending on the control word's pattern bits. The byte
/// order of the 24-bit triple has not been confirmed against hardware.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct MemoryFillValue(pub u32);

impl MemoryFillValue {
    pub const VALUE_16BIT: PackedField = PackedField::new(0, 16);
    pub const VALUE_24BIT_R: PackedField = PackedField::new(0, 8);
    pub const VALUE_24BIT_G: PackedField = PackedField::new(8, 8);
    pub const VALUE_24BIT_B: PackedField = PackedField::new(16, 8);

    #[inline]
    #[must_use]
    pub const fn value_32bit(&self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn value_16bit(&self) -> u16 {
        Self::VALUE_16BIT.extract(self.0) as u16
    }

    #[inline]
    pub fn set_value_16bit(&mut self, val: u16) {
        self.0 = Self::VALUE_16BIT.deposit(self.0, val.into());
    }

    #[inline]
    #[must_use]
    pub const fn value_24bit_r(&self) -> u8 {
        Self::VALUE_24BIT_R.extract(self.0) as u8
    }

    #[inline]
    #[must_use]
    pub const fn value_24bit_g(&self) -> u8 {
        Self::VALUE_24BIT_G.extract(self.0) as u8
    }

    #[inline]
    #[must_use]
    pub const fn value_24bit_b(&self) -> u8 {
        Self::VALUE_24BIT_B.extract(self.0) as u8
    }

    #[inline]
    pub fn set_value_24bit(&mut self, r: u8, g: u8, b: u8) {
        let word = Self::VALUE_24BIT_R.deposit(self.0, r.into());
        let word = Self::VALUE_24BIT_G.deposit(word, g.into());
        self.0 = Self::VALUE_24BIT_B.deposit(word, b.into());
    }
}

impl core::fmt::Debug for MemoryFillValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryFillValue")
            .field("value_32bit", &format_args!("{:#010x}", self.value_32bit()))
            .finish()
    }
}

/// Fill control word.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct MemoryFillControl(pub u32);

impl MemoryFillControl {
    /// Written 1 to start the fill. Reset to 0 on completion.
    pub const TRIGGER: PackedField = PackedField::new(0, 1);
    /// Set to 1 on completion.
    pub const FINISHED: PackedField = PackedField::new(1, 1);
    /// Fill with 24-bit wide values.
    pub const FILL_24BIT: PackedField = PackedField::new(8, 1);
    /// Fill with 32-bit wide values.
    pub const FILL_32BIT: PackedField = PackedField::new(9, 1);

    #[inline]
    #[must_use]
    pub const fn trigger(&self) -> bool {
        Self::TRIGGER.is_set(self.0)
    }

    #[inline]
    pub fn set_trigger(&mut self, val: bool) {
        self.0 = Self::TRIGGER.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn finished(&self) -> bool {
        Self::FINISHED.is_set(self.0)
    }

    #[inline]
    pub fn set_finished(&mut self, val: bool) {
        self.0 = Self::FINISHED.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn fill_24bit(&self) -> bool {
        Self::FILL_24BIT.is_set(self.0)
    }

    #[inline]
    pub fn set_fill_24bit(&mut self, val: bool) {
        self.0 = Self::FILL_24BIT.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn fill_32bit(&self) -> bool {
        Self::FILL_32BIT.is_set(self.0)
    }

    #[inline]
    pub fn set_fill_32bit(&mut self, val: bool) {
        self.0 = Self::FILL_32BIT.with_flag(self.0, val);
    }
}

impl core::fmt::Debug for MemoryFillControl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryFillControl")
            .field("trigger", &self.trigger())
            .field("finished", &self.finished())
            .field("fill_24bit", &self.fill_24bit())
            .field("fill_32bit", &self.fill_32bit())
            .finish()
    }
}

/// Word indices within the region.
pub mod word {
    pub const ADDRESS_START: usize = 0;
    pub const ADDRESS_END: usize = 1;
    pub const VALUE: usize = 2;
    pub const CONTROL: usize = 3;
}

/// View over one `memory_fill_config` region.
pub struct MemoryFillConfig<W> {
    words: W,
}

impl<W: AsRef<[u32]>> MemoryFillConfig<W> {
    pub(crate) fn new(words: W) -> Self {
        debug_assert_eq!(words.as_ref().len(), crate::layout::MEMORY_FILL_CONFIG_WORDS);
        Self { words }
    }

    fn raw(&self, index: usize) -> u32 {
        self.words.as_ref()[index]
    }

    #[must_use]
    pub fn address_start(&self) -> u32 {
        self.raw(word::ADDRESS_START)
    }

    #[must_use]
    pub fn address_end(&self) -> u32 {
        self.raw(word::ADDRESS_END)
    }

    /// Physical byte address the fill starts at.
    #[must_use]
    pub fn start_address(&self) -> u32 {
        decode_address(self.address_start())
    }

    /// Physical byte address the fill ends at.
    #[must_use]
    pub fn end_address(&self) -> u32 {
        decode_address(self.address_end())
    }

    #[must_use]
    pub fn value(&self) -> MemoryFillValue {
        MemoryFillValue(self.raw(word::VALUE))
    }

    #[must_use]
    pub fn control(&self) -> MemoryFillControl {
        MemoryFillControl(self.raw(word::CONTROL))
    }
}

impl<W: AsRef<[u32]> + AsMut<[u32]>> MemoryFillConfig<W> {
    fn raw_mut(&mut self, index: usize) -> &mut u32 {
        &mut self.words.as_mut()[index]
    }

    pub fn set_address_start(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS_START) = raw;
    }

    pub fn set_address_end(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS_END) = raw;
    }

    pub fn set_value(&mut self, value: MemoryFillValue) {
        *self.raw_mut(word::VALUE) = value.0;
    }

    pub fn set_control(&mut self, control: MemoryFillControl) {
        *self.raw_mut(word::CONTROL) = control.0;
    }
}
