//! Bit-range views over 32-bit register words.

use crate::RegisterError;

/// A `width`-bit unsigned field starting at bit `offset` of a 32-bit word.
///
/// Every multi-bit control, status and dimension field in the register map
/// is described by one of these. Fields are declared as associated constants
/// on the register word types, so a bad geometry is rejected at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedField {
    offset: u32,
    width: u32,
}

impl PackedField {
    /// Create a field.
    ///
    /// # Panics
    /// Panics (at compile time when used in a `const`) if the field is empty
    /// or reaches past bit 31.
    #[must_use]
    pub const fn new(offset: u32, width: u32) -> Self {
        assert!(width > 0 && offset < 32 && width <= 32 - offset, "field must fit in a u32");
        Self { offset, width }
    }

    /// Create a field from runtime values.
    pub const fn try_new(offset: u32, width: u32) -> Result<Self, RegisterError> {
        if width > 0 && offset < 32 && width <= 32 - offset {
            Ok(Self { offset, width })
        } else {
            Err(RegisterError::InvalidFieldGeometry { offset, width })
        }
    }

    #[inline]
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    #[inline]
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Unshifted mask covering `width` bits.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u32 {
        if self.width == 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Largest value the field can hold.
    #[inline]
    #[must_use]
    pub const fn max_value(self) -> u32 {
        self.mask()
    }

    /// Read the field out of `word`.
    #[inline]
    #[must_use]
    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.offset) & self.mask()
    }

    /// Replace the field in `word` with `value`, keeping every other bit.
    pub const fn insert(self, word: u32, value: u32) -> Result<u32, RegisterError> {
        if value > self.mask() {
            return Err(RegisterError::FieldOverflow {
                value,
                width: self.width,
            });
        }
        Ok(self.deposit(word, value))
    }

    /// Like [`insert`](Self::insert) but silently drops bits above `width`.
    ///
    /// Used by typed setters whose argument type already fits the field.
    #[inline]
    #[must_use]
    pub const fn deposit(self, word: u32, value: u32) -> u32 {
        let mask = self.mask() << self.offset;
        (word & !mask) | ((value << self.offset) & mask)
    }

    #[inline]
    #[must_use]
    pub const fn is_set(self, word: u32) -> bool {
        self.extract(word) != 0
    }

    #[inline]
    #[must_use]
    pub const fn with_flag(self, word: u32, set: bool) -> u32 {
        self.deposit(word, set as u32)
    }
}

/// `(word >> offset) & ((1 << width) - 1)`.
///
/// Bits beyond the top of the word read as zero.
#[must_use]
pub fn extract(word: u32, offset: u32, width: u32) -> u32 {
    let mask = if width >= 32 { u32::MAX } else { (1 << width) - 1 };
    word.checked_shr(offset).unwrap_or(0) & mask
}

/// Replace `width` bits of `word` at `offset` with `value`.
pub fn insert(word: u32, offset: u32, width: u32, value: u32) -> Result<u32, RegisterError> {
    PackedField::try_new(offset, width)?.insert(word, value)
}
