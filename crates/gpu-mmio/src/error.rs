use gpu_registers::RegisterError;

use crate::state::Operation;

/// Errors returned by register bus accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MmioError {
    /// Access outside the register file, or a field that failed to decode.
    #[error(transparent)]
    Register(#[from] RegisterError),

    /// Memory fill triggered without exactly one pattern width selected.
    #[error("invalid fill mode: fill_24bit={fill_24bit}, fill_32bit={fill_32bit}")]
    InvalidFillMode { fill_24bit: bool, fill_32bit: bool },

    /// Trigger written while the same operation is still running.
    #[error("{0} is already in progress")]
    OperationAlreadyInProgress(Operation),
}

/// Error parsing a configuration knob from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown {knob} value {value:?} (expected one of: {expected})")]
    UnknownValue {
        knob: &'static str,
        value: String,
        expected: &'static str,
    },
}
