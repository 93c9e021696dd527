//! Knobs for register semantics that have not been confirmed on hardware.
//!
//! Every default follows the most literal reading of the register
//! documentation. The alternatives exist so a frontend can switch
//! interpretation without code changes once a hardware test settles it.

use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;
use crate::executor::Dimensions;

/// How a memory fill with neither pattern width bit set is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillModePolicy {
    /// Exactly one of fill_24bit/fill_32bit must be set.
    #[default]
    Strict,
    /// Neither bit selects the 16-bit pattern. Both set is still rejected.
    ZeroSelects16Bit,
}

/// Byte order of the 24-bit fill value. Unconfirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComponentOrder {
    /// Bits 0..8 are red, 8..16 green, 16..24 blue.
    #[default]
    Rgb,
    /// Bits 0..8 are blue, 8..16 green, 16..24 red.
    Bgr,
}

/// Axis the display transfer `flip_data` flag mirrors. Unconfirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlipAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// What `scaling_mode` does to the final output size. Unconfirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalingInterpretation {
    /// The programmed output size is the final size.
    #[default]
    Unscaled,
    /// Mode 1 halves the width, modes 2 and 3 halve width and height.
    HalveOutput,
}

impl ScalingInterpretation {
    /// Final output size for a programmed output size and `scaling_mode`.
    #[must_use]
    pub fn scaled(self, output: Dimensions, scaling_mode: u32) -> Dimensions {
        match (self, scaling_mode) {
            (Self::Unscaled, _) | (Self::HalveOutput, 0) => output,
            (Self::HalveOutput, 1) => Dimensions {
                width: output.width / 2,
                height: output.height,
            },
            (Self::HalveOutput, _) => Dimensions {
                width: output.width / 2,
                height: output.height / 2,
            },
        }
    }
}

/// Runtime configuration of a [`GpuContext`](crate::GpuContext).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuConfig {
    pub fill_mode_policy: FillModePolicy,
    pub fill24_order: ComponentOrder,
    pub flip_axis: FlipAxis,
    pub scaling: ScalingInterpretation,
}

/// `FromStr`/`Display` over a fixed table of names.
macro_rules! named_knob {
    ($ty:ident, $knob:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            pub const NAMES: &'static [&'static str] = &[$($name),+];

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ConfigError::UnknownValue {
                        knob: $knob,
                        value: s.to_string(),
                        expected: concat!($($name, " "),+),
                    }),
                }
            }
        }
    };
}

named_knob!(FillModePolicy, "fill mode", [
    Strict => "strict",
    ZeroSelects16Bit => "zero-selects-16bit",
]);

named_knob!(ComponentOrder, "fill24 order", [
    Rgb => "rgb",
    Bgr => "bgr",
]);

named_knob!(FlipAxis, "flip axis", [
    Horizontal => "horizontal",
    Vertical => "vertical",
]);

named_knob!(ScalingInterpretation, "scaling", [
    Unscaled => "unscaled",
    HalveOutput => "halve-output",
]);
