//! Fixed placement of the named register regions inside the 4096-word space.
//!
//! The map is written the way the hardware documents it: a run of padding,
//! then a region, then more padding. Region offsets are derived from that
//! sequence at compile time and checked against the documented word offsets,
//! so a miscounted padding run fails the build.

/// Number of 32-bit registers in the file.
pub const REGISTER_COUNT: usize = 0x1000;

/// Size of the register file in bytes.
pub const REGISTER_BYTES: usize = REGISTER_COUNT * 4;

/// Physical address the register window is mapped at.
pub const PHYSICAL_BASE: u32 = 0x1EF0_0000;

pub const MEMORY_FILL_CONFIG_WORDS: usize = 4;
pub const FRAMEBUFFER_CONFIG_WORDS: usize = 64;
pub const DISPLAY_TRANSFER_CONFIG_WORDS: usize = 11;
pub const COMMAND_PROCESSOR_CONFIG_WORDS: usize = 5;

/// Named register regions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    MemoryFill0 = 0,
    MemoryFill1 = 1,
    Framebuffer0 = 2,
    Framebuffer1 = 3,
    DisplayTransfer = 4,
    CommandProcessor = 5,
}

impl RegionId {
    pub const ALL: [RegionId; 6] = [
        RegionId::MemoryFill0,
        RegionId::MemoryFill1,
        RegionId::Framebuffer0,
        RegionId::Framebuffer1,
        RegionId::DisplayTransfer,
        RegionId::CommandProcessor,
    ];

    #[must_use]
    pub const fn memory_fill(unit: usize) -> Option<Self> {
        match unit {
            0 => Some(Self::MemoryFill0),
            1 => Some(Self::MemoryFill1),
            _ => None,
        }
    }

    #[must_use]
    pub const fn framebuffer(unit: usize) -> Option<Self> {
        match unit {
            0 => Some(Self::Framebuffer0),
            1 => Some(Self::Framebuffer1),
            _ => None,
        }
    }

    #[must_use]
    pub const fn region(self) -> Region {
        REGIONS[self as usize]
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MemoryFill0 => "memory_fill_config[0]",
            Self::MemoryFill1 => "memory_fill_config[1]",
            Self::Framebuffer0 => "framebuffer_config[0]",
            Self::Framebuffer1 => "framebuffer_config[1]",
            Self::DisplayTransfer => "display_transfer_config",
            Self::CommandProcessor => "command_processor_config",
        }
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Placement of one region, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub offset: usize,
    pub words: usize,
}

impl Region {
    #[must_use]
    pub const fn byte_offset(&self) -> usize {
        self.offset * 4
    }

    #[must_use]
    pub const fn byte_size(&self) -> usize {
        self.words * 4
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.words
    }

    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.offset && index < self.end()
    }
}

/// One run of the register map: padding words, or a named region.
#[derive(Clone, Copy)]
enum Segment {
    Padding(usize),
    Region(RegionId, usize),
}

const SEGMENTS: [Segment; 11] = [
    Segment::Padding(0x4),
    Segment::Region(RegionId::MemoryFill0, MEMORY_FILL_CONFIG_WORDS),
    Segment::Region(RegionId::MemoryFill1, MEMORY_FILL_CONFIG_WORDS),
    Segment::Padding(0x10b),
    Segment::Region(RegionId::Framebuffer0, FRAMEBUFFER_CONFIG_WORDS),
    Segment::Region(RegionId::Framebuffer1, FRAMEBUFFER_CONFIG_WORDS),
    Segment::Padding(0x169),
    Segment::Region(RegionId::DisplayTransfer, DISPLAY_TRANSFER_CONFIG_WORDS),
    Segment::Padding(0x32d),
    Segment::Region(RegionId::CommandProcessor, COMMAND_PROCESSOR_CONFIG_WORDS),
    Segment::Padding(0x9c3),
];

const fn build_regions() -> [Region; 6] {
    let mut regions = [Region {
        id: RegionId::MemoryFill0,
        offset: 0,
        words: 0,
    }; 6];
    let mut cursor = 0;
    let mut i = 0;
    while i < SEGMENTS.len() {
        match SEGMENTS[i] {
            Segment::Padding(words) => cursor += words,
            Segment::Region(id, words) => {
                regions[id as usize] = Region {
                    id,
                    offset: cursor,
                    words,
                };
                cursor += words;
            }
        }
        i += 1;
    }
    regions
}

const fn total_words() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < SEGMENTS.len() {
        total += match SEGMENTS[i] {
            Segment::Padding(words) | Segment::Region(_, words) => words,
        };
        i += 1;
    }
    total
}

/// Every region, indexed by `RegionId as usize`.
pub const REGIONS: [Region; 6] = build_regions();

// Documented hardware word offsets.
const _: () = {
    assert!(REGIONS[RegionId::MemoryFill0 as usize].offset == 0x00004);
    assert!(REGIONS[RegionId::MemoryFill1 as usize].offset == 0x00008);
    assert!(REGIONS[RegionId::Framebuffer0 as usize].offset == 0x00117);
    assert!(REGIONS[RegionId::Framebuffer1 as usize].offset == 0x00157);
    assert!(REGIONS[RegionId::DisplayTransfer as usize].offset == 0x00300);
    assert!(REGIONS[RegionId::CommandProcessor as usize].offset == 0x00638);

    assert!(MEMORY_FILL_CONFIG_WORDS * 4 == 0x10);
    assert!(FRAMEBUFFER_CONFIG_WORDS * 4 == 0x100);
    assert!(DISPLAY_TRANSFER_CONFIG_WORDS * 4 == 0x2c);
    assert!(COMMAND_PROCESSOR_CONFIG_WORDS * 4 == 0x14);

    assert!(total_words() == REGISTER_COUNT);
};

/// Position of a word inside a named region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSlot {
    pub region: RegionId,
    /// Word index relative to the start of the region.
    pub word: usize,
}

/// Find the named region containing `index`, if any. Padding words return `None`.
#[must_use]
pub fn locate(index: usize) -> Option<RegionSlot> {
    REGIONS
        .iter()
        .find(|region| region.contains(index))
        .map(|region| RegionSlot {
            region: region.id,
            word: index - region.offset,
        })
}
