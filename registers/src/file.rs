//! The register file: 4096 raw words with typed region views laid over them.

use crate::layout::{Region, RegionId, REGISTER_COUNT};
use crate::regions::{
    CommandProcessorConfig, DisplayTransferConfig, FramebufferConfig, MemoryFillConfig,
};
use crate::RegisterError;

/// Owned GPU register state.
///
/// Padding words are ordinary storage: reads return whatever was last written.
/// Region views borrow the same words, so every bit has exactly one home.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile {
    words: Box<[u32; REGISTER_COUNT]>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Number of register ids.
    pub const LEN: usize = REGISTER_COUNT;

    #[must_use]
    pub fn new() -> Self {
        Self {
            words: Box::new([0; REGISTER_COUNT]),
        }
    }

    /// Word index addressed by a byte offset into the register window.
    pub const fn word_index(address: u32) -> Result<usize, RegisterError> {
        let index = (address / 4) as usize;
        if index < REGISTER_COUNT {
            Ok(index)
        } else {
            Err(RegisterError::OutOfRange {
                index,
                len: REGISTER_COUNT,
            })
        }
    }

    pub fn read(&self, index: usize) -> Result<u32, RegisterError> {
        self.words.get(index).copied().ok_or(RegisterError::OutOfRange {
            index,
            len: REGISTER_COUNT,
        })
    }

    pub fn write(&mut self, index: usize, value: u32) -> Result<(), RegisterError> {
        let slot = self.words.get_mut(index).ok_or(RegisterError::OutOfRange {
            index,
            len: REGISTER_COUNT,
        })?;
        *slot = value;
        Ok(())
    }

    #[must_use]
    pub fn words(&self) -> &[u32; REGISTER_COUNT] {
        &self.words
    }

    /// Raw words of a region.
    #[must_use]
    pub fn region(&self, id: RegionId) -> &[u32] {
        let Region { offset, words, .. } = id.region();
        &self.words[offset..offset + words]
    }

    #[must_use]
    pub fn region_mut(&mut self, id: RegionId) -> &mut [u32] {
        let Region { offset, words, .. } = id.region();
        &mut self.words[offset..offset + words]
    }

    /// `memory_fill_config[unit]`. Units other than 0 and 1 return `None`.
    #[must_use]
    pub fn memory_fill(&self, unit: usize) -> Option<MemoryFillConfig<&[u32]>> {
        RegionId::memory_fill(unit).map(|id| MemoryFillConfig::new(self.region(id)))
    }

    #[must_use]
    pub fn memory_fill_mut(&mut self, unit: usize) -> Option<MemoryFillConfig<&mut [u32]>> {
        RegionId::memory_fill(unit).map(|id| MemoryFillConfig::new(self.region_mut(id)))
    }

    /// `framebuffer_config[unit]`. Units other than 0 and 1 return `None`.
    #[must_use]
    pub fn framebuffer(&self, unit: usize) -> Option<FramebufferConfig<&[u32]>> {
        RegionId::framebuffer(unit).map(|id| FramebufferConfig::new(self.region(id)))
    }

    #[must_use]
    pub fn framebuffer_mut(&mut self, unit: usize) -> Option<FramebufferConfig<&mut [u32]>> {
        RegionId::framebuffer(unit).map(|id| FramebufferConfig::new(self.region_mut(id)))
    }

    #[must_use]
    pub fn display_transfer(&self) -> DisplayTransferConfig<&[u32]> {
        DisplayTransferConfig::new(self.region(RegionId::DisplayTransfer))
    }

    #[must_use]
    pub fn display_transfer_mut(&mut self) -> DisplayTransferConfig<&mut [u32]> {
        DisplayTransferConfig::new(self.region_mut(RegionId::DisplayTransfer))
    }

    #[must_use]
    pub fn command_processor(&self) -> CommandProcessorConfig<&[u32]> {
        CommandProcessorConfig::new(self.region(RegionId::CommandProcessor))
    }

    #[must_use]
    pub fn command_processor_mut(&mut self) -> CommandProcessorConfig<&mut [u32]> {
        CommandProcessorConfig::new(self.region_mut(RegionId::CommandProcessor))
    }
}

impl core::fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let nonzero = self.words.iter().filter(|w| **w != 0).count();
        f.debug_struct("RegisterFile")
            .field("len", &REGISTER_COUNT)
            .field("nonzero_words", &nonzero)
            .finish()
    }
}
