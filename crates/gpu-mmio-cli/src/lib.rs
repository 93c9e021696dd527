/// Trace script parsing
pub mod trace;

/// Trace replay against a GPU context
pub mod replay;

use std::io::Write;

use gpu_registers::layout::{REGIONS, REGISTER_BYTES, REGISTER_COUNT};
use gpu_registers::PHYSICAL_BASE;

pub use replay::{replay, replay_file, ReplaySummary, TraceExecutor};

/// Result type alias for CLI operations
pub type Result<T> = anyhow::Result<T>;

/// Print every named region with its word offset, byte offset and size.
pub fn write_layout<W: Write>(out: &mut W) -> Result<()> {
    writeln!(
        out,
        "register file: {REGISTER_COUNT:#x} words ({REGISTER_BYTES} bytes) at {PHYSICAL_BASE:#010x}"
    )?;
    writeln!(
        out,
        "{:<26} {:>7} {:>7} {:>11} {:>6}",
        "region", "word", "byte", "physical", "bytes"
    )?;
    for region in REGIONS {
        writeln!(
            out,
            "{:<26} {:>#7x} {:>#7x} {:>#11x} {:>#6x}",
            region.id.name(),
            region.offset,
            region.byte_offset(),
            PHYSICAL_BASE as usize + region.byte_offset(),
            region.byte_size()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lists_every_region() {
        let mut out = Vec::new();
        write_layout(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("memory_fill_config[0]"));
        assert!(text.contains("0x1ef00c00"));
        assert_eq!(text.lines().count(), 2 + REGIONS.len());
    }
}
