use std::sync::{Arc, Mutex};

use log::debug;

use crate::state::{self, GpuState, Operation};

/// One-shot handle an executor uses to report that an operation finished.
///
/// Completing consumes the handle, so an operation cannot be completed
/// twice. Dropping it without completing leaves the region busy.
#[must_use = "an operation stays busy until its completion is reported"]
pub struct Completion {
    shared: Arc<Mutex<GpuState>>,
    operation: Operation,
}

impl Completion {
    pub(crate) fn new(shared: Arc<Mutex<GpuState>>, operation: Operation) -> Self {
        Self { shared, operation }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Publish the status update and return the region to idle.
    pub fn complete(self) {
        state::lock(&self.shared).finish(self.operation);
        debug!("gpu: {} complete", self.operation);
    }
}

impl core::fmt::Debug for Completion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Completion")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}
