//! Region: display_transfer_config
//!
//! Copies an image between two physical buffers, converting pixel format,
//! tiling and scale on the way, or (with `is_raw_copy`) performs a plain
//! line-by-line texture copy described by the padding words 8..10.

use crate::decode::{decode_address, decode_format, PixelFormat};
use crate::regions::SizeReg;
use crate::{PackedField, RegisterError};

/// Transfer flags word.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct TransferFlags(pub u32);

impl TransferFlags {
    pub const FLIP_DATA: PackedField = PackedField::new(0, 1);
    /// Tile the output instead of untiling the input.
    pub const CONVERT_TO_TILED: PackedField = PackedField::new(1, 1);
    /// Ignore formats and sizes; copy bytes using the line layout words.
    pub const IS_RAW_COPY: PackedField = PackedField::new(3, 1);
    pub const DISABLE_UNTILING: PackedField = PackedField::new(5, 1);
    pub const INPUT_FORMAT: PackedField = PackedField::new(8, 3);
    pub const OUTPUT_FORMAT: PackedField = PackedField::new(12, 3);
    pub const OUTPUT_TILED: PackedField = PackedField::new(16, 1);
    /// 0: no scaling, 1: halve width, 2: halve width and height.
    pub const SCALING_MODE: PackedField = PackedField::new(24, 2);

    #[inline]
    #[must_use]
    pub const fn flip_data(&self) -> bool {
        Self::FLIP_DATA.is_set(self.0)
    }

    #[inline]
    pub fn set_flip_data(&mut self, val: bool) {
        self.0 = Self::FLIP_DATA.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn convert_to_tiled(&self) -> bool {
        Self::CONVERT_TO_TILED.is_set(self.0)
    }

    #[inline]
    pub fn set_convert_to_tiled(&mut self, val: bool) {
        self.0 = Self::CONVERT_TO_TILED.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn is_raw_copy(&self) -> bool {
        Self::IS_RAW_COPY.is_set(self.0)
    }

    #[inline]
    pub fn set_is_raw_copy(&mut self, val: bool) {
        self.0 = Self::IS_RAW_COPY.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn disable_untiling(&self) -> bool {
        Self::DISABLE_UNTILING.is_set(self.0)
    }

    #[inline]
    pub fn set_disable_untiling(&mut self, val: bool) {
        self.0 = Self::DISABLE_UNTILING.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn input_format_code(&self) -> u32 {
        Self::INPUT_FORMAT.extract(self.0)
    }

    /// Returns [`RegisterError::FieldOverflow`] for codes above 7.
    pub fn set_input_format_code(&mut self, code: u32) -> Result<(), RegisterError> {
        self.0 = Self::INPUT_FORMAT.insert(self.0, code)?;
        Ok(())
    }

    pub fn input_format(&self) -> Result<PixelFormat, RegisterError> {
        decode_format(self.input_format_code())
    }

    #[inline]
    #[must_use]
    pub const fn output_format_code(&self) -> u32 {
        Self::OUTPUT_FORMAT.extract(self.0)
    }

    pub fn set_output_format_code(&mut self, code: u32) -> Result<(), RegisterError> {
        self.0 = Self::OUTPUT_FORMAT.insert(self.0, code)?;
        Ok(())
    }

    pub fn output_format(&self) -> Result<PixelFormat, RegisterError> {
        decode_format(self.output_format_code())
    }

    #[inline]
    #[must_use]
    pub const fn output_tiled(&self) -> bool {
        Self::OUTPUT_TILED.is_set(self.0)
    }

    #[inline]
    pub fn set_output_tiled(&mut self, val: bool) {
        self.0 = Self::OUTPUT_TILED.with_flag(self.0, val);
    }

    #[inline]
    #[must_use]
    pub const fn scaling_mode(&self) -> u32 {
        Self::SCALING_MODE.extract(self.0)
    }

    pub fn set_scaling_mode(&mut self, mode: u32) -> Result<(), RegisterError> {
        self.0 = Self::SCALING_MODE.insert(self.0, mode)?;
        Ok(())
    }
}

impl core::fmt::Debug for TransferFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransferFlags")
            .field("flip_data", &self.flip_data())
            .field("convert_to_tiled", &self.convert_to_tiled())
            .field("is_raw_copy", &self.is_raw_copy())
            .field("disable_untiling", &self.disable_untiling())
            .field("input_format", &self.input_format_code())
            .field("output_format", &self.output_format_code())
            .field("output_tiled", &self.output_tiled())
            .field("scaling_mode", &self.scaling_mode())
            .finish()
    }
}

/// Texture-copy line layout: bytes per line and gap after each line, both in
/// 16-byte units.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct LineSizeReg(pub u32);

impl LineSizeReg {
    pub const SIZE: PackedField = PackedField::new(0, 16);
    pub const PADDING: PackedField = PackedField::new(16, 16);

    #[must_use]
    pub const fn new(size: u16, padding: u16) -> Self {
        Self(Self::PADDING.deposit(Self::SIZE.deposit(0, size as u32), padding as u32))
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        Self::SIZE.extract(self.0)
    }

    #[inline]
    #[must_use]
    pub const fn padding(&self) -> u32 {
        Self::PADDING.extract(self.0)
    }

    #[must_use]
    pub const fn bytes_per_line(&self) -> u32 {
        self.size() * 16
    }

    #[must_use]
    pub const fn padding_bytes_per_line(&self) -> u32 {
        self.padding() * 16
    }

    /// Distance between the starts of two consecutive lines.
    #[must_use]
    pub const fn total_bytes_per_line(&self) -> u32 {
        self.bytes_per_line() + self.padding_bytes_per_line()
    }
}

impl core::fmt::Debug for LineSizeReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineSizeReg")
            .field("bytes_per_line", &self.bytes_per_line())
            .field("padding_bytes_per_line", &self.padding_bytes_per_line())
            .finish()
    }
}

/// Word indices within the region.
pub mod word {
    pub const INPUT_ADDRESS: usize = 0;
    pub const OUTPUT_ADDRESS: usize = 1;
    pub const OUTPUT_SIZE: usize = 2;
    pub const INPUT_SIZE: usize = 3;
    pub const FLAGS: usize = 4;
    pub const TRIGGER: usize = 6;
    pub const TOTAL_BYTES_TO_COPY: usize = 8;
    pub const INPUT_SIZE_WITH_PADDING: usize = 9;
    pub const OUTPUT_SIZE_WITH_PADDING: usize = 10;
}

/// View over `display_transfer_config`.
pub struct DisplayTransferConfig<W> {
    words: W,
}

impl<W: AsRef<[u32]>> DisplayTransferConfig<W> {
    pub(crate) fn new(words: W) -> Self {
        debug_assert_eq!(words.as_ref().len(), crate::layout::DISPLAY_TRANSFER_CONFIG_WORDS);
        Self { words }
    }

    fn raw(&self, index: usize) -> u32 {
        self.words.as_ref()[index]
    }

    #[must_use]
    pub fn input_address(&self) -> u32 {
        self.raw(word::INPUT_ADDRESS)
    }

    #[must_use]
    pub fn output_address(&self) -> u32 {
        self.raw(word::OUTPUT_ADDRESS)
    }

    #[must_use]
    pub fn physical_input_address(&self) -> u32 {
        decode_address(self.input_address())
    }

    #[must_use]
    pub fn physical_output_address(&self) -> u32 {
        decode_address(self.output_address())
    }

    #[must_use]
    pub fn output_size(&self) -> SizeReg {
        SizeReg(self.raw(word::OUTPUT_SIZE))
    }

    #[must_use]
    pub fn input_size(&self) -> SizeReg {
        SizeReg(self.raw(word::INPUT_SIZE))
    }

    #[must_use]
    pub fn flags(&self) -> TransferFlags {
        TransferFlags(self.raw(word::FLAGS))
    }

    #[must_use]
    pub fn trigger(&self) -> u32 {
        self.raw(word::TRIGGER)
    }

    #[must_use]
    pub fn total_bytes_to_copy(&self) -> u32 {
        self.raw(word::TOTAL_BYTES_TO_COPY)
    }

    #[must_use]
    pub fn input_line(&self) -> LineSizeReg {
        LineSizeReg(self.raw(word::INPUT_SIZE_WITH_PADDING))
    }

    #[must_use]
    pub fn output_line(&self) -> LineSizeReg {
        LineSizeReg(self.raw(word::OUTPUT_SIZE_WITH_PADDING))
    }
}

impl<W: AsRef<[u32]> + AsMut<[u32]>> DisplayTransferConfig<W> {
    fn raw_mut(&mut self, index: usize) -> &mut u32 {
        &mut self.words.as_mut()[index]
    }

    pub fn set_input_address(&mut self, raw: u32) {
        *self.raw_mut(word::INPUT_ADDRESS) = raw;
    }

    pub fn set_output_address(&mut self, raw: u32) {
        *self.raw_mut(word::OUTPUT_ADDRESS) = raw;
    }

    pub fn set_output_size(&mut self, size: SizeReg) {
        *self.raw_mut(word::OUTPUT_SIZE) = size.0;
    }

    pub fn set_input_size(&mut self, size: SizeReg) {
        *self.raw_mut(word::INPUT_SIZE) = size.0;
    }

    pub fn set_flags(&mut self, flags: TransferFlags) {
        *self.raw_mut(word::FLAGS) = flags.0;
    }

    pub fn set_trigger(&mut self, value: u32) {
        *self.raw_mut(word::TRIGGER) = value;
    }

    pub fn set_total_bytes_to_copy(&mut self, bytes: u32) {
        *self.raw_mut(word::TOTAL_BYTES_TO_COPY) = bytes;
    }

    pub fn set_input_line(&mut self, line: LineSizeReg) {
        *self.raw_mut(word::INPUT_SIZE_WITH_PADDING) = line.0;
    }

    pub fn set_output_line(&mut self, line: LineSizeReg) {
        *self.raw_mut(word::OUTPUT_SIZE_WITH_PADDING) = line.0;
    }
}
