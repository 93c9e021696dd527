//! Byte-addressed access to the GPU register file.
//!
//! [`GpuContext`] owns the register file behind one lock and serves 8, 16
//! and 32-bit CPU reads and writes. Writes that land on a trigger register
//! decode their region into a request and pass it to a [`GpuExecutor`]; the
//! executor reports back through the [`Completion`] it was given.

pub mod bus;
pub mod completion;
pub mod config;
pub mod context;
mod dispatch;
pub mod error;
pub mod executor;
pub mod state;

pub use crate::bus::BusValue;
pub use crate::completion::Completion;
pub use crate::config::{ComponentOrder, FillModePolicy, FlipAxis, GpuConfig, ScalingInterpretation};
pub use crate::context::{window_offset, GpuContext};
pub use crate::error::{ConfigError, MmioError};
pub use crate::executor::{
    ActiveFramebuffer, CommandListRequest, Dimensions, DisplayTransferRequest, FillPattern,
    FormatConversion, GpuExecutor, ImmediateExecutor, LineLayout, MemoryFillRequest, TextureCopy,
    TransferKind,
};
pub use crate::state::{GpuState, Operation, RegionState};

pub use gpu_registers;
