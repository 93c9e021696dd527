//! GPU MMIO register map.
//!
//! A 4096-word register file with six named regions (two memory fill units,
//! two framebuffer units, the display transfer engine and the command
//! processor) at fixed word offsets. Each region is exposed as a typed view
//! over the same words the bus reads and writes, and every packed field is a
//! [`PackedField`] constant on its word type.
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_cast)]

pub mod decode;
pub mod error;
pub mod field;
pub mod file;
pub mod layout;
pub mod regions;

pub use crate::decode::{decode_address, decode_format, FramebufferFormat, PixelFormat};
pub use crate::error::RegisterError;
pub use crate::field::PackedField;
pub use crate::file::RegisterFile;
pub use crate::layout::{locate, Region, RegionId, RegionSlot, PHYSICAL_BASE, REGISTER_COUNT};
