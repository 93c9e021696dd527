//! Register access trace scripts.
//!
//! One access per line:
//!
//! ```text
//! # fill unit 0 with 0xFFFFFFFF
//! w32 0x10 0x00300000
//! w32 0x1c 0x201
//! r32 0x1c
//! complete
//! ```
//!
//! Addresses are window offsets or absolute physical addresses inside the
//! register window. Numbers are decimal or `0x` hex.

use anyhow::{anyhow, bail, Context, Result};
use gpu_mmio::window_offset;

/// CPU access width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
        }
    }

    const fn max_value(self) -> u32 {
        match self {
            Self::W8 => 0xFF,
            Self::W16 => 0xFFFF,
            Self::W32 => u32::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    Read { width: Width, address: u32 },
    Write { width: Width, address: u32, value: u32 },
    /// Finish every operation still pending.
    Complete,
}

/// A parsed line with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLine {
    pub line: usize,
    pub op: TraceOp,
}

/// Parse a whole script. Fails on the first malformed line.
pub fn parse_trace(text: &str) -> Result<Vec<TraceLine>> {
    let mut lines = Vec::new();
    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        if let Some(op) = parse_line(raw).with_context(|| format!("line {line}: {}", raw.trim()))? {
            lines.push(TraceLine { line, op });
        }
    }
    Ok(lines)
}

/// Parse one line. Blank lines and comments yield `None`.
pub fn parse_line(raw: &str) -> Result<Option<TraceOp>> {
    let text = raw.split('#').next().unwrap_or_default().trim();
    if text.is_empty() {
        return Ok(None);
    }
    let mut tokens = text.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(None);
    };
    let operands: Vec<&str> = tokens.collect();

    let op = match command.to_ascii_lowercase().as_str() {
        "complete" => {
            expect_operands(command, &operands, 0)?;
            TraceOp::Complete
        }
        "r8" | "r16" | "r32" => {
            expect_operands(command, &operands, 1)?;
            TraceOp::Read {
                width: width_of(command)?,
                address: parse_address(operands[0])?,
            }
        }
        "w8" | "w16" | "w32" => {
            expect_operands(command, &operands, 2)?;
            let width = width_of(command)?;
            let value = parse_number(operands[1])?;
            if value > width.max_value() {
                bail!("value {value:#x} does not fit in {} bits", width.bits());
            }
            TraceOp::Write {
                width,
                address: parse_address(operands[0])?,
                value,
            }
        }
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(op))
}

fn expect_operands(command: &str, operands: &[&str], count: usize) -> Result<()> {
    if operands.len() != count {
        bail!("{command} takes {count} operand(s), got {}", operands.len());
    }
    Ok(())
}

fn width_of(command: &str) -> Result<Width> {
    match &command[1..] {
        "8" => Ok(Width::W8),
        "16" => Ok(Width::W16),
        "32" => Ok(Width::W32),
        _ => Err(anyhow!("unknown access width in {command:?}")),
    }
}

/// Decimal or `0x`-prefixed hex.
pub fn parse_number(token: &str) -> Result<u32> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => token.replace('_', "").parse(),
    };
    parsed.with_context(|| format!("invalid number {token:?}"))
}

/// Window offset for an address token. Absolute physical addresses inside
/// the register window are translated; anything else is used as given.
pub fn parse_address(token: &str) -> Result<u32> {
    let address = parse_number(token)?;
    Ok(window_offset(address).unwrap_or(address))
}
