//! Envelope shape table
//!
//! Register R13 selects one of 16 envelope shapes. By a quirk of the
//! hardware shape-generation logic several codes produce identical
//! waveforms: codes 0-3 and 9 all decay once and hold at the bottom, codes
//! 4-7 and 15 all attack once, drop and hold at the bottom. The duplication
//! is part of the chip specification and is preserved here rather than
//! collapsed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Waveform class an envelope shape code resolves to
///
/// Ten distinct classes cover all 16 shape codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeClass {
    /// Single decay, then hold at minimum (`\___`)
    DownHold,
    /// Single attack, drop, then hold at minimum (`/|__`)
    UpHold,
    /// Repeating decay ramp (`\|\|`)
    DownRepeat,
    /// Decay and attack alternating (`\/\/`)
    DownUpAlternate,
    /// Single decay, then hold at maximum (`\|~~`)
    DownHoldTop,
    /// Repeating attack ramp (`/|/|`)
    UpRepeat,
    /// Single attack, then hold at maximum (`/~~~`)
    UpHoldTop,
    /// Attack and decay alternating (`/\/\`)
    UpDownAlternate,
}

/// Envelope shape selector (R13, low nibble)
///
/// Variant names carry the raw code because several codes share a waveform
/// class; see [`EnvelopeShape::class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvelopeShape {
    /// 0000: decay, hold bottom
    DownHold0 = 0x00,
    /// 0001: decay, hold bottom (same waveform as 0000)
    DownHold1 = 0x01,
    /// 0010: decay, hold bottom (same waveform as 0000)
    DownHold2 = 0x02,
    /// 0011: decay, hold bottom (same waveform as 0000)
    DownHold3 = 0x03,
    /// 0100: attack, drop, hold bottom
    UpHold4 = 0x04,
    /// 0101: attack, drop, hold bottom (same waveform as 0100)
    UpHold5 = 0x05,
    /// 0110: attack, drop, hold bottom (same waveform as 0100)
    UpHold6 = 0x06,
    /// 0111: attack, drop, hold bottom (same waveform as 0100)
    UpHold7 = 0x07,
    /// 1000: repeating decay ramp (buzzer)
    DownRepeat8 = 0x08,
    /// 1001: decay, hold bottom (same waveform as 0000)
    DownHold9 = 0x09,
    /// 1010: decay/attack triangle
    DownUp10 = 0x0A,
    /// 1011: decay, hold top
    DownHoldTop11 = 0x0B,
    /// 1100: repeating attack ramp (buzzer)
    UpRepeat12 = 0x0C,
    /// 1101: attack, hold top
    UpHoldTop13 = 0x0D,
    /// 1110: attack/decay triangle
    UpDown14 = 0x0E,
    /// 1111: attack, drop, hold bottom (same waveform as 0100)
    UpHold15 = 0x0F,
}

/// All 16 shape codes in register order
pub const SHAPES: [EnvelopeShape; 16] = [
    EnvelopeShape::DownHold0,
    EnvelopeShape::DownHold1,
    EnvelopeShape::DownHold2,
    EnvelopeShape::DownHold3,
    EnvelopeShape::UpHold4,
    EnvelopeShape::UpHold5,
    EnvelopeShape::UpHold6,
    EnvelopeShape::UpHold7,
    EnvelopeShape::DownRepeat8,
    EnvelopeShape::DownHold9,
    EnvelopeShape::DownUp10,
    EnvelopeShape::DownHoldTop11,
    EnvelopeShape::UpRepeat12,
    EnvelopeShape::UpHoldTop13,
    EnvelopeShape::UpDown14,
    EnvelopeShape::UpHold15,
];

impl EnvelopeShape {
    /// Create from a raw register value (only the low nibble is used)
    pub fn from_code(code: u8) -> Self {
        SHAPES[(code & 0x0F) as usize]
    }

    /// The raw 4-bit shape code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The waveform class this code resolves to
    pub fn class(self) -> EnvelopeClass {
        match self {
            EnvelopeShape::DownHold0
            | EnvelopeShape::DownHold1
            | EnvelopeShape::DownHold2
            | EnvelopeShape::DownHold3
            | EnvelopeShape::DownHold9 => EnvelopeClass::DownHold,
            EnvelopeShape::UpHold4
            | EnvelopeShape::UpHold5
            | EnvelopeShape::UpHold6
            | EnvelopeShape::UpHold7
            | EnvelopeShape::UpHold15 => EnvelopeClass::UpHold,
            EnvelopeShape::DownRepeat8 => EnvelopeClass::DownRepeat,
            EnvelopeShape::DownUp10 => EnvelopeClass::DownUpAlternate,
            EnvelopeShape::DownHoldTop11 => EnvelopeClass::DownHoldTop,
            EnvelopeShape::UpRepeat12 => EnvelopeClass::UpRepeat,
            EnvelopeShape::UpHoldTop13 => EnvelopeClass::UpHoldTop,
            EnvelopeShape::UpDown14 => EnvelopeClass::UpDownAlternate,
        }
    }

    /// ASCII waveform sketch, one per class
    pub fn label(self) -> &'static str {
        match self.class() {
            EnvelopeClass::DownHold => "\\___",
            EnvelopeClass::UpHold => "/|__",
            EnvelopeClass::DownRepeat => "\\|\\|",
            EnvelopeClass::DownUpAlternate => "\\/\\/",
            EnvelopeClass::DownHoldTop => "\\|~~",
            EnvelopeClass::UpRepeat => "/|/|",
            EnvelopeClass::UpHoldTop => "/~~~",
            EnvelopeClass::UpDownAlternate => "/\\/\\",
        }
    }
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        EnvelopeShape::DownHold0
    }
}

impl fmt::Display for EnvelopeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
