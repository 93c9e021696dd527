//! CPU bus access widths and byte lanes.
//!
//! Registers are little-endian. An access of `N` bytes at address `a` covers
//! bytes `(a % 4) & !(N - 1)` onward inside word `a / 4`; the low address bits
//! below the access size are ignored.

use gpu_registers::PackedField;
use num_traits::{AsPrimitive, PrimInt, Unsigned};

/// An unsigned integer the CPU can move over the register bus.
pub trait BusValue: PrimInt + Unsigned + AsPrimitive<u32> + core::fmt::LowerHex {
    /// Truncate a register word to this width.
    fn from_word(word: u32) -> Self;

    /// Access width in bits.
    #[must_use]
    fn bits() -> u32 {
        Self::zero().count_zeros()
    }
}

macro_rules! impl_bus_value {
    ($($ty:ty),+) => {
        $(impl BusValue for $ty {
            #[inline]
            fn from_word(word: u32) -> Self {
                word.as_()
            }
        })+
    };
}

impl_bus_value!(u8, u16, u32);

/// Bits of the target word covered by a `W`-wide access at `address`.
#[must_use]
pub fn lane<W: BusValue>(address: u32) -> PackedField {
    let bits = W::bits();
    let byte = (address % 4) & !(bits / 8 - 1);
    PackedField::new(byte * 8, bits)
}

#[must_use]
pub fn read_lane<W: BusValue>(word: u32, address: u32) -> W {
    W::from_word(lane::<W>(address).extract(word))
}

/// `word` with the lane at `address` replaced by `value`.
#[must_use]
pub fn merge_lane<W: BusValue>(word: u32, address: u32, value: W) -> u32 {
    lane::<W>(address).deposit(word, value.as_())
}

/// Shifted mask of the lane at `address`.
#[must_use]
pub fn lane_mask<W: BusValue>(address: u32) -> u32 {
    let field = lane::<W>(address);
    field.mask() << field.offset()
}
