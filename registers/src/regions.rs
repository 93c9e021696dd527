//! Register word types and region views for each named register region.
//!
//! Word types wrap one raw `u32` and expose its packed fields; region views
//! borrow a region's words out of the [`RegisterFile`](crate::RegisterFile)
//! and give each word a name.

pub mod command_processor;
pub mod display_transfer;
pub mod framebuffer;
pub mod memory_fill;
pub mod size_reg;

pub use command_processor::{CommandProcessorConfig, CommandTrigger};
pub use display_transfer::{DisplayTransferConfig, LineSizeReg, TransferFlags};
pub use framebuffer::{FramebufferConfig, FramebufferSelect};
pub use memory_fill::{MemoryFillConfig, MemoryFillControl, MemoryFillValue};
pub use size_reg::SizeReg;
