//! The seam between the register model and the engines that do the work.
//!
//! A trigger write decodes its region into one of the request records below
//! and hands it to the [`GpuExecutor`] together with a [`Completion`]. The
//! executor may finish the work inline or keep the completion and report
//! back later from any thread.

use gpu_registers::regions::{LineSizeReg, SizeReg, TransferFlags};
use gpu_registers::{FramebufferFormat, PixelFormat};

use crate::completion::Completion;
use crate::config::FlipAxis;

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<SizeReg> for Dimensions {
    fn from(size: SizeReg) -> Self {
        Self {
            width: size.width().into(),
            height: size.height().into(),
        }
    }
}

/// Repeating value written by a memory fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPattern {
    Bits16(u16),
    /// Components in red, green, blue order.
    Bits24([u8; 3]),
    Bits32(u32),
}

impl FillPattern {
    /// Width of one pattern element in bytes.
    #[must_use]
    pub const fn element_bytes(&self) -> u32 {
        match self {
            Self::Bits16(_) => 2,
            Self::Bits24(_) => 3,
            Self::Bits32(_) => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFillRequest {
    pub unit: usize,
    /// Physical start address.
    pub start_address: u32,
    /// Physical end address.
    pub end_address: u32,
    pub pattern: FillPattern,
}

/// Texture copy line layout in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineLayout {
    pub bytes_per_line: u32,
    pub padding_bytes_per_line: u32,
}

impl LineLayout {
    #[must_use]
    pub const fn total_bytes_per_line(&self) -> u32 {
        self.bytes_per_line + self.padding_bytes_per_line
    }
}

impl From<LineSizeReg> for LineLayout {
    fn from(line: LineSizeReg) -> Self {
        Self {
            bytes_per_line: line.bytes_per_line(),
            padding_bytes_per_line: line.padding_bytes_per_line(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConversion {
    pub input_format: PixelFormat,
    pub output_format: PixelFormat,
    pub input_size: Dimensions,
    /// Output size as programmed, before scaling.
    pub output_size: Dimensions,
    /// Output size after the configured scaling interpretation.
    pub scaled_output_size: Dimensions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCopy {
    pub total_bytes: u32,
    pub input: LineLayout,
    pub output: LineLayout,
}

/// What a display transfer does with the bytes it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Pixel format, tiling and scale conversion.
    Convert(FormatConversion),
    /// Byte copy with per-line padding (`is_raw_copy`).
    TextureCopy(TextureCopy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTransferRequest {
    /// Physical input address.
    pub input_address: u32,
    /// Physical output address.
    pub output_address: u32,
    pub flags: TransferFlags,
    /// Axis `flags.flip_data()` refers to.
    pub flip_axis: FlipAxis,
    pub kind: TransferKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandListRequest {
    /// Physical address of the first command.
    pub address: u32,
    pub size_bytes: u32,
}

/// The address set a framebuffer unit scans out after an `active_fb` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFramebuffer {
    /// 0 for the "1" set, 1 for the "2" set.
    pub set: usize,
    /// Physical left-eye address.
    pub left_address: u32,
    /// Physical right-eye address.
    pub right_address: u32,
    pub stride: u32,
    pub size: Dimensions,
    pub format: FramebufferFormat,
}

/// Engines driven by trigger registers.
///
/// Called with the register lock released, so an implementation may touch
/// the context or complete the operation before returning.
pub trait GpuExecutor {
    fn memory_fill(&mut self, request: MemoryFillRequest, completion: Completion);

    fn display_transfer(&mut self, request: DisplayTransferRequest, completion: Completion);

    fn process_command_list(&mut self, request: CommandListRequest, completion: Completion);

    /// Synchronous: the new set is already live when this is called.
    fn framebuffer_swapped(&mut self, unit: usize, active: ActiveFramebuffer) {
        let _ = (unit, active);
    }
}

/// Completes every operation as soon as it is launched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateExecutor;

impl GpuExecutor for ImmediateExecutor {
    fn memory_fill(&mut self, _request: MemoryFillRequest, completion: Completion) {
        completion.complete();
    }

    fn display_transfer(&mut self, _request: DisplayTransferRequest, completion: Completion) {
        completion.complete();
    }

    fn process_command_list(&mut self, _request: CommandListRequest, completion: Completion) {
        completion.complete();
    }
}
