//! The GPU context: one register file, one lock, one executor.

use std::sync::{Arc, Mutex};

use gpu_registers::{RegisterFile, PHYSICAL_BASE};
use log::trace;

use crate::bus::{self, BusValue};
use crate::completion::Completion;
use crate::config::GpuConfig;
use crate::dispatch::{self, Launch, WordWrite};
use crate::error::MmioError;
use crate::executor::GpuExecutor;
use crate::state::{self, GpuState, Operation, RegionState};

/// Emulated GPU register block.
///
/// Addresses are byte offsets into the 16 KiB register window. Completion
/// handles share the register state, so an executor may report back from
/// another thread while the context keeps serving CPU accesses.
pub struct GpuContext<E: GpuExecutor> {
    shared: Arc<Mutex<GpuState>>,
    config: GpuConfig,
    executor: E,
}

impl<E: GpuExecutor> GpuContext<E> {
    pub fn new(config: GpuConfig, executor: E) -> Self {
        Self {
            shared: Arc::new(Mutex::new(GpuState::default())),
            config,
            executor,
        }
    }

    pub fn config(&self) -> &GpuConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Read a `W`-wide value at byte offset `address`.
    pub fn read<W: BusValue>(&self, address: u32) -> Result<W, MmioError> {
        let index = RegisterFile::word_index(address)?;
        let word = state::lock(&self.shared).registers.read(index)?;
        let value = bus::read_lane::<W>(word, address);
        trace!("gpu: read{} {:#06x} -> {:#x}", W::bits(), address, value);
        Ok(value)
    }

    /// Write a `W`-wide value at byte offset `address`.
    ///
    /// Trigger writes launch their operation on the executor after the lock
    /// is released. A rejected write leaves every register unchanged.
    pub fn write<W: BusValue>(&mut self, address: u32, value: W) -> Result<(), MmioError> {
        trace!("gpu: write{} {:#06x} <- {:#x}", W::bits(), address, value);
        let index = RegisterFile::word_index(address)?;
        let launch = {
            let mut guard = state::lock(&self.shared);
            let old = guard.registers.read(index)?;
            let write = WordWrite {
                index,
                old,
                new: bus::merge_lane(old, address, value),
                mask: bus::lane_mask::<W>(address),
            };
            dispatch::apply_write(&mut guard, &self.config, write)?
        };
        if let Some(launch) = launch {
            self.launch(launch);
        }
        Ok(())
    }

    fn launch(&mut self, launch: Launch) {
        match launch {
            Launch::MemoryFill(request) => {
                let operation = Operation::MemoryFill { unit: request.unit };
                let completion = self.completion(operation);
                self.executor.memory_fill(request, completion);
            }
            Launch::DisplayTransfer(request) => {
                let completion = self.completion(Operation::DisplayTransfer);
                self.executor.display_transfer(request, completion);
            }
            Launch::CommandList(request) => {
                let completion = self.completion(Operation::CommandList);
                self.executor.process_command_list(request, completion);
            }
            Launch::FramebufferSwap { unit, active } => {
                self.executor.framebuffer_swapped(unit, active);
            }
        }
    }

    fn completion(&self, operation: Operation) -> Completion {
        Completion::new(Arc::clone(&self.shared), operation)
    }

    pub fn read8(&self, address: u32) -> Result<u8, MmioError> {
        self.read(address)
    }

    pub fn read16(&self, address: u32) -> Result<u16, MmioError> {
        self.read(address)
    }

    pub fn read32(&self, address: u32) -> Result<u32, MmioError> {
        self.read(address)
    }

    pub fn write8(&mut self, address: u32, value: u8) -> Result<(), MmioError> {
        self.write(address, value)
    }

    pub fn write16(&mut self, address: u32, value: u16) -> Result<(), MmioError> {
        self.write(address, value)
    }

    pub fn write32(&mut self, address: u32, value: u32) -> Result<(), MmioError> {
        self.write(address, value)
    }

    pub fn state(&self, operation: Operation) -> RegionState {
        state::lock(&self.shared).state(operation)
    }

    pub fn is_busy(&self, operation: Operation) -> bool {
        self.state(operation) == RegionState::Busy
    }

    /// Run `f` with a consistent snapshot of the register file.
    pub fn with_registers<R>(&self, f: impl FnOnce(&RegisterFile) -> R) -> R {
        f(state::lock(&self.shared).registers())
    }
}

/// Window offset of an absolute physical address, if it falls in the window.
#[must_use]
pub fn window_offset(physical: u32) -> Option<u32> {
    physical
        .checked_sub(PHYSICAL_BASE)
        .filter(|offset| (*offset as usize) < gpu_registers::layout::REGISTER_BYTES)
}

impl<E: GpuExecutor + core::fmt::Debug> core::fmt::Debug for GpuContext<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GpuContext")
            .field("config", &self.config)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}
