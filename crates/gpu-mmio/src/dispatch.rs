//! Write side effects of the trigger and swap registers.
//!
//! Runs under the context lock. A write is either stored (possibly with
//! engine-owned bits preserved) or rejected with the register file left
//! untouched. Work for the executor is returned as a [`Launch`] and issued
//! by the caller once the lock is dropped.

use gpu_registers::layout::{self, RegionId};
use gpu_registers::regions::{
    command_processor, display_transfer, framebuffer, memory_fill, CommandTrigger,
    MemoryFillControl,
};
use gpu_registers::{PackedField, RegisterError, RegisterFile};
use log::{debug, info, warn};

use crate::config::{ComponentOrder, FillModePolicy, GpuConfig};
use crate::error::MmioError;
use crate::executor::{
    ActiveFramebuffer, CommandListRequest, DisplayTransferRequest, FillPattern, FormatConversion,
    MemoryFillRequest, TextureCopy, TransferKind,
};
use crate::state::{GpuState, Operation};

/// A CPU store to one register word, already merged with the old contents.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WordWrite {
    pub index: usize,
    pub old: u32,
    pub new: u32,
    /// Bits covered by the bus access.
    pub mask: u32,
}

impl WordWrite {
    fn touches(&self, field: PackedField) -> bool {
        self.mask & (field.mask() << field.offset()) != 0
    }

    fn written(&self) -> u32 {
        self.new & self.mask
    }
}

/// Work to hand to the executor after the lock is released.
#[derive(Debug)]
pub(crate) enum Launch {
    MemoryFill(MemoryFillRequest),
    DisplayTransfer(DisplayTransferRequest),
    CommandList(CommandListRequest),
    FramebufferSwap { unit: usize, active: ActiveFramebuffer },
}

pub(crate) fn apply_write(
    state: &mut GpuState,
    config: &GpuConfig,
    write: WordWrite,
) -> Result<Option<Launch>, MmioError> {
    let Some(slot) = layout::locate(write.index) else {
        return store(state, write.index, write.new);
    };
    match (slot.region, slot.word) {
        (RegionId::MemoryFill0, memory_fill::word::CONTROL) => {
            memory_fill_control(state, config, 0, write)
        }
        (RegionId::MemoryFill1, memory_fill::word::CONTROL) => {
            memory_fill_control(state, config, 1, write)
        }
        (RegionId::Framebuffer0, framebuffer::word::ACTIVE_FB) => active_fb(state, 0, write),
        (RegionId::Framebuffer1, framebuffer::word::ACTIVE_FB) => active_fb(state, 1, write),
        (RegionId::DisplayTransfer, display_transfer::word::TRIGGER) => {
            transfer_trigger(state, config, write)
        }
        (RegionId::CommandProcessor, command_processor::word::TRIGGER) => {
            command_trigger(state, write)
        }
        _ => store(state, write.index, write.new),
    }
}

fn store(state: &mut GpuState, index: usize, value: u32) -> Result<Option<Launch>, MmioError> {
    state.registers.write(index, value)?;
    Ok(None)
}

fn already_running(operation: Operation) -> MmioError {
    warn!("gpu: rejected trigger, {operation} still running");
    MmioError::OperationAlreadyInProgress(operation)
}

/// Region views are only absent for units past 1, which no caller passes.
fn missing_unit(index: usize) -> MmioError {
    MmioError::Register(RegisterError::OutOfRange {
        index,
        len: RegisterFile::LEN,
    })
}

fn memory_fill_control(
    state: &mut GpuState,
    config: &GpuConfig,
    unit: usize,
    write: WordWrite,
) -> Result<Option<Launch>, MmioError> {
    let operation = Operation::MemoryFill { unit };
    let mut control = MemoryFillControl(write.new);
    // The CPU may clear `finished` but never set it.
    control.set_finished(MemoryFillControl(write.old).finished() && control.finished());

    if state.is_busy(operation) {
        if write.touches(MemoryFillControl::TRIGGER) && control.trigger() {
            return Err(already_running(operation));
        }
        control.set_trigger(true);
        return store(state, write.index, control.0);
    }
    if !control.trigger() {
        return store(state, write.index, control.0);
    }

    let fill = state
        .registers
        .memory_fill(unit)
        .ok_or_else(|| missing_unit(write.index))?;
    let value = fill.value();
    let pattern = match fill_pattern(config, control) {
        Ok(FillWidth::Bits16) => FillPattern::Bits16(value.value_16bit()),
        Ok(FillWidth::Bits24) => {
            let (low, mid, high) = (value.value_24bit_r(), value.value_24bit_g(), value.value_24bit_b());
            FillPattern::Bits24(match config.fill24_order {
                ComponentOrder::Rgb => [low, mid, high],
                ComponentOrder::Bgr => [high, mid, low],
            })
        }
        Ok(FillWidth::Bits32) => FillPattern::Bits32(value.value_32bit()),
        Err(err) => {
            warn!("gpu: {operation} rejected: {err}");
            return Err(err);
        }
    };
    let request = MemoryFillRequest {
        unit,
        start_address: fill.start_address(),
        end_address: fill.end_address(),
        pattern,
    };

    control.set_finished(false);
    state.registers.write(write.index, control.0)?;
    state.set_busy(operation);
    info!(
        "gpu: {operation} launched {:#010x}..{:#010x} {:?}",
        request.start_address, request.end_address, request.pattern
    );
    Ok(Some(Launch::MemoryFill(request)))
}

enum FillWidth {
    Bits16,
    Bits24,
    Bits32,
}

fn fill_pattern(config: &GpuConfig, control: MemoryFillControl) -> Result<FillWidth, MmioError> {
    match (control.fill_24bit(), control.fill_32bit(), config.fill_mode_policy) {
        (true, false, _) => Ok(FillWidth::Bits24),
        (false, true, _) => Ok(FillWidth::Bits32),
        (false, false, FillModePolicy::ZeroSelects16Bit) => Ok(FillWidth::Bits16),
        (fill_24bit, fill_32bit, _) => Err(MmioError::InvalidFillMode {
            fill_24bit,
            fill_32bit,
        }),
    }
}

fn active_fb(state: &mut GpuState, unit: usize, write: WordWrite) -> Result<Option<Launch>, MmioError> {
    state.registers.write(write.index, write.new)?;
    let fb = state
        .registers
        .framebuffer(unit)
        .ok_or_else(|| missing_unit(write.index))?;
    let active = ActiveFramebuffer {
        set: fb.active_fb().active_set(),
        left_address: fb.active_left_address(),
        right_address: fb.active_right_address(),
        stride: fb.stride(),
        size: fb.size().into(),
        format: fb.format(),
    };
    debug!(
        "gpu: framebuffer {unit} now scanning set {} at {:#010x}",
        active.set + 1,
        active.left_address
    );
    Ok(Some(Launch::FramebufferSwap { unit, active }))
}

fn transfer_trigger(
    state: &mut GpuState,
    config: &GpuConfig,
    write: WordWrite,
) -> Result<Option<Launch>, MmioError> {
    let operation = Operation::DisplayTransfer;
    if state.is_busy(operation) {
        if write.written() != 0 {
            return Err(already_running(operation));
        }
        // The engine owns the reset to 0.
        return Ok(None);
    }
    if write.new == 0 {
        return store(state, write.index, 0);
    }

    let request = match transfer_request(state.registers(), config) {
        Ok(request) => request,
        Err(err) => {
            warn!("gpu: {operation} rejected: {err}");
            return Err(err);
        }
    };
    state.registers.write(write.index, write.new)?;
    state.set_busy(operation);
    info!(
        "gpu: {operation} launched {:#010x} -> {:#010x} {:?}",
        request.input_address, request.output_address, request.kind
    );
    Ok(Some(Launch::DisplayTransfer(request)))
}

fn transfer_request(
    registers: &RegisterFile,
    config: &GpuConfig,
) -> Result<DisplayTransferRequest, MmioError> {
    let transfer = registers.display_transfer();
    let flags = transfer.flags();
    let kind = if flags.is_raw_copy() {
        TransferKind::TextureCopy(TextureCopy {
            total_bytes: transfer.total_bytes_to_copy(),
            input: transfer.input_line().into(),
            output: transfer.output_line().into(),
        })
    } else {
        let output_size = transfer.output_size().into();
        TransferKind::Convert(FormatConversion {
            input_format: flags.input_format()?,
            output_format: flags.output_format()?,
            input_size: transfer.input_size().into(),
            output_size,
            scaled_output_size: config.scaling.scaled(output_size, flags.scaling_mode()),
        })
    };
    Ok(DisplayTransferRequest {
        input_address: transfer.physical_input_address(),
        output_address: transfer.physical_output_address(),
        flags,
        flip_axis: config.flip_axis,
        kind,
    })
}

fn command_trigger(state: &mut GpuState, write: WordWrite) -> Result<Option<Launch>, MmioError> {
    let operation = Operation::CommandList;
    let fired = write.touches(CommandTrigger::TRIGGER) && CommandTrigger(write.new).trigger();
    if state.is_busy(operation) {
        if fired {
            return Err(already_running(operation));
        }
        // The engine owns the reset to 0.
        return Ok(None);
    }
    if !fired {
        return store(state, write.index, write.new);
    }

    let list = state.registers.command_processor();
    let request = CommandListRequest {
        address: list.physical_address(),
        size_bytes: list.size_bytes(),
    };
    state.registers.write(write.index, write.new)?;
    state.set_busy(operation);
    info!(
        "gpu: {operation} launched {:#010x} ({} bytes)",
        request.address, request.size_bytes
    );
    Ok(Some(Launch::CommandList(request)))
}
