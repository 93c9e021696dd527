//! Replay a trace against a [`GpuContext`] with a logging executor.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use gpu_mmio::{
    ActiveFramebuffer, CommandListRequest, Completion, DisplayTransferRequest, GpuConfig,
    GpuContext, GpuExecutor, MemoryFillRequest, MmioError,
};
use log::info;

use crate::trace::{parse_trace, TraceOp, Width};

/// Executor that logs each request and either completes it at once or
/// holds it until the trace says `complete`.
#[derive(Debug, Default)]
pub struct TraceExecutor {
    defer_completion: bool,
    pending: Vec<Completion>,
    launched: usize,
    swaps: usize,
}

impl TraceExecutor {
    pub fn new(defer_completion: bool) -> Self {
        Self {
            defer_completion,
            ..Self::default()
        }
    }

    /// Complete everything still pending. Returns how many finished.
    pub fn complete_pending(&mut self) -> usize {
        let count = self.pending.len();
        for completion in self.pending.drain(..) {
            completion.complete();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn accept(&mut self, completion: Completion) {
        self.launched += 1;
        if self.defer_completion {
            self.pending.push(completion);
        } else {
            completion.complete();
        }
    }
}

impl GpuExecutor for TraceExecutor {
    fn memory_fill(&mut self, request: MemoryFillRequest, completion: Completion) {
        info!(
            "fill unit {}: {:#010x}..{:#010x} with {:?}",
            request.unit, request.start_address, request.end_address, request.pattern
        );
        self.accept(completion);
    }

    fn display_transfer(&mut self, request: DisplayTransferRequest, completion: Completion) {
        info!(
            "transfer {:#010x} -> {:#010x}: {:?}",
            request.input_address, request.output_address, request.kind
        );
        self.accept(completion);
    }

    fn process_command_list(&mut self, request: CommandListRequest, completion: Completion) {
        info!(
            "command list at {:#010x}, {} bytes",
            request.address, request.size_bytes
        );
        self.accept(completion);
    }

    fn framebuffer_swapped(&mut self, unit: usize, active: ActiveFramebuffer) {
        info!(
            "framebuffer {unit} scanning set {} (left {:#010x}, right {:#010x})",
            active.set + 1,
            active.left_address,
            active.right_address
        );
        self.swaps += 1;
    }
}

/// Counts reported at the end of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub reads: usize,
    pub writes: usize,
    pub rejected: usize,
    pub launched: usize,
    pub swaps: usize,
    /// Operations still running when the trace ended.
    pub pending: usize,
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} reads, {} writes ({} rejected), {} operations launched, {} swaps, {} pending",
            self.reads, self.writes, self.rejected, self.launched, self.swaps, self.pending
        )
    }
}

/// Run `trace` and print read results and rejected writes to `out`.
pub fn replay<W: Write>(
    trace: &str,
    config: GpuConfig,
    defer_completion: bool,
    out: &mut W,
) -> Result<ReplaySummary> {
    let lines = parse_trace(trace)?;
    let mut gpu = GpuContext::new(config, TraceExecutor::new(defer_completion));
    let mut summary = ReplaySummary::default();

    for line in lines {
        match line.op {
            TraceOp::Read { width, address } => {
                summary.reads += 1;
                match read(&gpu, width, address) {
                    Ok(value) => writeln!(out, "{address:#06x} = {value:#x}")?,
                    Err(err) => writeln!(out, "line {}: read {address:#06x} failed: {err}", line.line)?,
                }
            }
            TraceOp::Write {
                width,
                address,
                value,
            } => {
                summary.writes += 1;
                if let Err(err) = write(&mut gpu, width, address, value) {
                    summary.rejected += 1;
                    writeln!(
                        out,
                        "line {}: write {value:#x} to {address:#06x} rejected: {err}",
                        line.line
                    )?;
                }
            }
            TraceOp::Complete => {
                gpu.executor_mut().complete_pending();
            }
        }
    }

    summary.launched = gpu.executor().launched;
    summary.swaps = gpu.executor().swaps;
    summary.pending = gpu.executor().pending();
    Ok(summary)
}

/// [`replay`] a trace file.
pub fn replay_file<W: Write>(
    path: &Path,
    config: GpuConfig,
    defer_completion: bool,
    out: &mut W,
) -> Result<ReplaySummary> {
    let trace = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace: {}", path.display()))?;
    replay(&trace, config, defer_completion, out)
        .with_context(|| format!("Failed to replay trace: {}", path.display()))
}

fn read(gpu: &GpuContext<TraceExecutor>, width: Width, address: u32) -> Result<u32, MmioError> {
    match width {
        Width::W8 => gpu.read8(address).map(u32::from),
        Width::W16 => gpu.read16(address).map(u32::from),
        Width::W32 => gpu.read32(address),
    }
}

fn write(
    gpu: &mut GpuContext<TraceExecutor>,
    width: Width,
    address: u32,
    value: u32,
) -> Result<(), MmioError> {
    // Values are range-checked against the width when the trace is parsed.
    match width {
        Width::W8 => gpu.write8(address, value as u8),
        Width::W16 => gpu.write16(address, value as u16),
        Width::W32 => gpu.write32(address, value),
    }
}
