//! Region: command_processor_config

use crate::decode::decode_address;
use crate::PackedField;

/// Command list trigger word.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct CommandTrigger(pub u32);

impl CommandTrigger {
    /// Written 1 to start processing the command list.
    pub const TRIGGER: PackedField = PackedField::new(0, 1);

    #[inline]
    #[must_use]
    pub const fn trigger(&self) -> bool {
        Self::TRIGGER.is_set(self.0)
    }

    #[inline]
    pub fn set_trigger(&mut self, val: bool) {
        self.0 = Self::TRIGGER.with_flag(self.0, val);
    }
}

impl core::fmt::Debug for CommandTrigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandTrigger")
            .field("trigger", &self.trigger())
            .finish()
    }
}

/// Word indices within the region.
pub mod word {
    /// List size in 8-byte units.
    pub const SIZE: usize = 0;
    pub const ADDRESS: usize = 2;
    pub const TRIGGER: usize = 4;
}

/// View over `command_processor_config`.
pub struct CommandProcessorConfig<W> {
    words: W,
}

impl<W: AsRef<[u32]>> CommandProcessorConfig<W> {
    pub(crate) fn new(words: W) -> Self {
        debug_assert_eq!(words.as_ref().len(), crate::layout::COMMAND_PROCESSOR_CONFIG_WORDS);
        Self { words }
    }

    fn raw(&self, index: usize) -> u32 {
        self.words.as_ref()[index]
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.raw(word::SIZE)
    }

    /// List length in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u32 {
        self.size().wrapping_mul(8)
    }

    #[must_use]
    pub fn address(&self) -> u32 {
        self.raw(word::ADDRESS)
    }

    #[must_use]
    pub fn physical_address(&self) -> u32 {
        decode_address(self.address())
    }

    #[must_use]
    pub fn trigger(&self) -> CommandTrigger {
        CommandTrigger(self.raw(word::TRIGGER))
    }
}

impl<W: AsRef<[u32]> + AsMut<[u32]>> CommandProcessorConfig<W> {
    fn raw_mut(&mut self, index: usize) -> &mut u32 {
        &mut self.words.as_mut()[index]
    }

    pub fn set_size(&mut self, size: u32) {
        *self.raw_mut(word::SIZE) = size;
    }

    pub fn set_address(&mut self, raw: u32) {
        *self.raw_mut(word::ADDRESS) = raw;
    }

    pub fn set_trigger(&mut self, trigger: CommandTrigger) {
        *self.raw_mut(word::TRIGGER) = trigger.0;
    }
}
