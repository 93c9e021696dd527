//! Register file plus the Idle/Busy machine of each triggered operation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use gpu_registers::regions::MemoryFillControl;
use gpu_registers::regions::{command_processor, display_transfer, memory_fill};
use gpu_registers::{RegionId, RegisterFile};

/// An operation started by a trigger register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    MemoryFill { unit: usize },
    DisplayTransfer,
    CommandList,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::MemoryFill { unit: 0 },
        Operation::MemoryFill { unit: 1 },
        Operation::DisplayTransfer,
        Operation::CommandList,
    ];

    /// Region holding the operation's trigger.
    #[must_use]
    pub fn region(self) -> Option<RegionId> {
        match self {
            Self::MemoryFill { unit } => RegionId::memory_fill(unit),
            Self::DisplayTransfer => Some(RegionId::DisplayTransfer),
            Self::CommandList => Some(RegionId::CommandProcessor),
        }
    }

    /// Absolute word index of the trigger word.
    #[must_use]
    pub fn trigger_word(self) -> Option<usize> {
        let word = match self {
            Self::MemoryFill { .. } => memory_fill::word::CONTROL,
            Self::DisplayTransfer => display_transfer::word::TRIGGER,
            Self::CommandList => command_processor::word::TRIGGER,
        };
        self.region().map(|region| region.region().offset + word)
    }

    fn slot(self) -> Option<usize> {
        match self {
            Self::MemoryFill { unit } if unit < 2 => Some(unit),
            Self::MemoryFill { .. } => None,
            Self::DisplayTransfer => Some(2),
            Self::CommandList => Some(3),
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MemoryFill { unit } => write!(f, "memory fill {unit}"),
            Self::DisplayTransfer => f.write_str("display transfer"),
            Self::CommandList => f.write_str("command list"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionState {
    #[default]
    Idle,
    Busy,
}

/// Everything guarded by the context lock.
#[derive(Debug, Default)]
pub struct GpuState {
    pub(crate) registers: RegisterFile,
    operations: [RegionState; 4],
}

impl GpuState {
    #[must_use]
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Unknown operations (a fill unit past 1) report `Idle`.
    #[must_use]
    pub fn state(&self, operation: Operation) -> RegionState {
        operation
            .slot()
            .map_or(RegionState::Idle, |slot| self.operations[slot])
    }

    #[must_use]
    pub fn is_busy(&self, operation: Operation) -> bool {
        self.state(operation) == RegionState::Busy
    }

    pub(crate) fn set_busy(&mut self, operation: Operation) {
        if let Some(slot) = operation.slot() {
            self.operations[slot] = RegionState::Busy;
        }
    }

    /// Publish completion of `operation` and return it to `Idle`.
    ///
    /// A fill sets `finished` and clears `trigger` in a single store; the
    /// transfer and command list engines reset their trigger word to 0.
    pub(crate) fn finish(&mut self, operation: Operation) {
        let (Some(slot), Some(index)) = (operation.slot(), operation.trigger_word()) else {
            return;
        };
        let done = match operation {
            Operation::MemoryFill { .. } => {
                let mut control = MemoryFillControl(self.registers.words()[index]);
                control.set_trigger(false);
                control.set_finished(true);
                control.0
            }
            Operation::DisplayTransfer | Operation::CommandList => 0,
        };
        // trigger_word() only yields indices inside the file
        let _ = self.registers.write(index, done);
        self.operations[slot] = RegionState::Idle;
    }
}

/// Lock the shared state. Every update under the lock is a single store,
/// so a poisoned lock still guards consistent registers.
pub(crate) fn lock(shared: &Mutex<GpuState>) -> MutexGuard<'_, GpuState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
