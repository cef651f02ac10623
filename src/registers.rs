//! AY/YM register file
//!
//! The 14 control registers (R0-R13) are write-oriented: a byte written to a
//! register is decoded immediately into calls on the owning [`ChipBackend`],
//! nothing is latched at this layer. Decode is a plain dispatch table, one
//! handler function per register.
//!
//! Register map:
//!
//! | Register | Function |
//! |----------|----------|
//! | R0/R1    | Channel A tone period fine/coarse |
//! | R2/R3    | Channel B tone period fine/coarse |
//! | R4/R5    | Channel C tone period fine/coarse |
//! | R6       | Noise period |
//! | R7       | Mixer control (set bit = generator off) |
//! | R8-R10   | Channel A/B/C volume + envelope enable (bit 4) |
//! | R11/R12  | Envelope period fine/coarse |
//! | R13      | Envelope shape |

use bitflags::bitflags;
use std::fmt;

use crate::backend::ChipBackend;
use crate::envelope::EnvelopeShape;
use crate::{ChipError, Result};

/// Number of programmable registers (R0-R13)
pub const NUM_REGISTERS: usize = 14;

/// Register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Channel A tone period, fine byte - R0
    ToneAFine = 0x00,
    /// Channel A tone period, coarse nibble - R1
    ToneACoarse = 0x01,
    /// Channel B tone period, fine byte - R2
    ToneBFine = 0x02,
    /// Channel B tone period, coarse nibble - R3
    ToneBCoarse = 0x03,
    /// Channel C tone period, fine byte - R4
    ToneCFine = 0x04,
    /// Channel C tone period, coarse nibble - R5
    ToneCCoarse = 0x05,
    /// Noise period - R6
    NoisePeriod = 0x06,
    /// Mixer control - R7
    Mixer = 0x07,
    /// Channel A volume / envelope enable - R8
    VolumeA = 0x08,
    /// Channel B volume / envelope enable - R9
    VolumeB = 0x09,
    /// Channel C volume / envelope enable - R10
    VolumeC = 0x0A,
    /// Envelope period, fine byte - R11
    EnvelopeFine = 0x0B,
    /// Envelope period, coarse byte - R12
    EnvelopeCoarse = 0x0C,
    /// Envelope shape - R13
    EnvelopeShape = 0x0D,
}

impl Register {
    /// Convert a raw register index (0-13) to a `Register`
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0x00 => Some(Register::ToneAFine),
            0x01 => Some(Register::ToneACoarse),
            0x02 => Some(Register::ToneBFine),
            0x03 => Some(Register::ToneBCoarse),
            0x04 => Some(Register::ToneCFine),
            0x05 => Some(Register::ToneCCoarse),
            0x06 => Some(Register::NoisePeriod),
            0x07 => Some(Register::Mixer),
            0x08 => Some(Register::VolumeA),
            0x09 => Some(Register::VolumeB),
            0x0A => Some(Register::VolumeC),
            0x0B => Some(Register::EnvelopeFine),
            0x0C => Some(Register::EnvelopeCoarse),
            0x0D => Some(Register::EnvelopeShape),
            _ => None,
        }
    }

    /// The register's index value
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::ToneAFine => write!(f, "R0 (Tone A Fine)"),
            Register::ToneACoarse => write!(f, "R1 (Tone A Coarse)"),
            Register::ToneBFine => write!(f, "R2 (Tone B Fine)"),
            Register::ToneBCoarse => write!(f, "R3 (Tone B Coarse)"),
            Register::ToneCFine => write!(f, "R4 (Tone C Fine)"),
            Register::ToneCCoarse => write!(f, "R5 (Tone C Coarse)"),
            Register::NoisePeriod => write!(f, "R6 (Noise Period)"),
            Register::Mixer => write!(f, "R7 (Mixer Control)"),
            Register::VolumeA => write!(f, "R8 (Volume A)"),
            Register::VolumeB => write!(f, "R9 (Volume B)"),
            Register::VolumeC => write!(f, "R10 (Volume C)"),
            Register::EnvelopeFine => write!(f, "R11 (Envelope Fine)"),
            Register::EnvelopeCoarse => write!(f, "R12 (Envelope Coarse)"),
            Register::EnvelopeShape => write!(f, "R13 (Envelope Shape)"),
        }
    }
}

bitflags! {
    /// Mixer control register (R7) bit layout
    ///
    /// The hardware convention is inverted: a SET bit disables the
    /// corresponding generator. Bits 6-7 (the I/O port directions on real
    /// silicon) are ignored at this layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MixerFlags: u8 {
        /// Channel A tone disable
        const TONE_A_OFF = 0x01;
        /// Channel B tone disable
        const TONE_B_OFF = 0x02;
        /// Channel C tone disable
        const TONE_C_OFF = 0x04;
        /// Channel A noise disable
        const NOISE_A_OFF = 0x08;
        /// Channel B noise disable
        const NOISE_B_OFF = 0x10;
        /// Channel C noise disable
        const NOISE_C_OFF = 0x20;
    }
}

impl MixerFlags {
    /// Create mixer flags from a raw R7 byte, dropping bits 6-7
    pub fn from_register(value: u8) -> Self {
        MixerFlags::from_bits_truncate(value)
    }

    /// Whether the tone generator feeds the given channel (inverted bit)
    pub fn tone_enabled(self, channel: usize) -> bool {
        !self.contains(MixerFlags::from_bits_truncate(1 << channel))
    }

    /// Whether the noise generator feeds the given channel (inverted bit)
    pub fn noise_enabled(self, channel: usize) -> bool {
        !self.contains(MixerFlags::from_bits_truncate(8 << channel))
    }
}

/// Register write handler: decodes one byte into backend calls
type Handler = fn(&mut dyn ChipBackend, u8);

fn set_tone_fine<const CH: usize>(chip: &mut dyn ChipBackend, value: u8) {
    let old = chip.tone_period(CH);
    chip.set_tone_period(CH, (old & 0xFF00) | value as u16);
}

// The coarse byte is shifted up unmasked; bits above the documented 12 are
// the backend's to ignore.
fn set_tone_coarse<const CH: usize>(chip: &mut dyn ChipBackend, value: u8) {
    let old = chip.tone_period(CH);
    chip.set_tone_period(CH, (old & 0x00FF) | ((value as u16) << 8));
}

fn set_noise_period(chip: &mut dyn ChipBackend, value: u8) {
    chip.set_noise_period(value);
}

fn set_mixer(chip: &mut dyn ChipBackend, value: u8) {
    let flags = MixerFlags::from_register(value);
    for channel in 0..3 {
        chip.set_tone_enable(channel, flags.tone_enabled(channel));
        chip.set_noise_enable(channel, flags.noise_enabled(channel));
    }
}

fn set_level<const CH: usize>(chip: &mut dyn ChipBackend, value: u8) {
    chip.set_volume(CH, value & 0x0F);
    chip.set_envelope_enable(CH, value & 0x10 != 0);
}

fn set_envelope_fine(chip: &mut dyn ChipBackend, value: u8) {
    let old = chip.envelope_period();
    chip.set_envelope_period((old & 0xFF00) | value as u16);
}

fn set_envelope_coarse(chip: &mut dyn ChipBackend, value: u8) {
    let old = chip.envelope_period();
    chip.set_envelope_period((old & 0x00FF) | ((value as u16) << 8));
}

fn set_envelope_shape(chip: &mut dyn ChipBackend, value: u8) {
    chip.set_envelope_shape(EnvelopeShape::from_code(value));
}

/// Dispatch table, one handler per register
static DISPATCH: [Handler; NUM_REGISTERS] = [
    set_tone_fine::<0>,
    set_tone_coarse::<0>,
    set_tone_fine::<1>,
    set_tone_coarse::<1>,
    set_tone_fine::<2>,
    set_tone_coarse::<2>,
    set_noise_period,
    set_mixer,
    set_level::<0>,
    set_level::<1>,
    set_level::<2>,
    set_envelope_fine,
    set_envelope_coarse,
    set_envelope_shape,
];

/// Write one register
///
/// The write takes effect immediately. Fails with
/// [`ChipError::RegisterIndex`] when `index` is outside `0..=13`.
pub fn write_register(chip: &mut dyn ChipBackend, index: usize, value: u8) -> Result<()> {
    let handler = DISPATCH
        .get(index)
        .ok_or(ChipError::RegisterIndex { index })?;
    handler(chip, value);
    Ok(())
}

/// Write several registers by index
///
/// Element-wise [`write_register`] over the two slices. Both slices are
/// validated up front: on any error no register is written.
pub fn write_registers(chip: &mut dyn ChipBackend, indices: &[u8], values: &[u8]) -> Result<()> {
    if indices.len() != values.len() {
        return Err(ChipError::LengthMismatch {
            expected: indices.len(),
            actual: values.len(),
        });
    }
    if let Some(&bad) = indices.iter().find(|&&i| (i as usize) >= NUM_REGISTERS) {
        return Err(ChipError::RegisterIndex { index: bad as usize });
    }
    for (&index, &value) in indices.iter().zip(values) {
        DISPATCH[index as usize](chip, value);
    }
    Ok(())
}

/// Write a full 14-byte register image through a skip mask
///
/// `values[i]` is applied to register `i` wherever `skip[i]` is FALSE. A
/// true mask entry means "leave this register alone" - the polarity is
/// inherited from the frame dump format and is deliberately inverted from
/// the intuitive "mask = apply" reading.
///
/// Both slices must have exactly [`NUM_REGISTERS`] entries; on error no
/// register is written.
pub fn write_registers_masked(
    chip: &mut dyn ChipBackend,
    values: &[u8],
    skip: &[bool],
) -> Result<()> {
    if values.len() != NUM_REGISTERS {
        return Err(ChipError::RegisterCount {
            expected: NUM_REGISTERS,
            actual: values.len(),
        });
    }
    if skip.len() != NUM_REGISTERS {
        return Err(ChipError::RegisterCount {
            expected: NUM_REGISTERS,
            actual: skip.len(),
        });
    }
    for (index, (&value, &skipped)) in values.iter().zip(skip).enumerate() {
        if !skipped {
            DISPATCH[index](chip, value);
        }
    }
    Ok(())
}
