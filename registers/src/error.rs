/// Errors raised by register-file access and field decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// Word index outside the 4096-word register space.
    #[error("register index {index:#x} is outside the register file (0..{len:#x})")]
    OutOfRange { index: usize, len: usize },

    /// Value does not fit in the destination packed field.
    #[error("value {value:#x} does not fit in a {width}-bit field")]
    FieldOverflow { value: u32, width: u32 },

    /// Packed field does not lie within a 32-bit word.
    #[error("field at bit {offset} with width {width} does not fit in a 32-bit word")]
    InvalidFieldGeometry { offset: u32, width: u32 },

    /// Pixel format selector with no defined format.
    #[error("pixel format code {0} is undefined")]
    InvalidFormatCode(u32),
}
