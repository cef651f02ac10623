//! Backend trait abstraction for AY/YM chip implementations
//!
//! This module defines the capability interface every chip backend must
//! implement, whether it is a software synthesizer, a cycle-exact emulation
//! or a driver for real hardware. The register file and the frame renderer
//! only ever talk to a backend through this trait.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::envelope::EnvelopeShape;

/// Number of tone channels
pub const NUM_CHANNELS: usize = 3;

/// Default audio sample rate (44.1 kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default master clock (ZX Spectrum AY frequency, ~1.77 MHz)
pub const DEFAULT_CLOCK_RATE: f64 = 1_773_400.0;

/// Chip variant selector
///
/// The AY-3-8910 and the YM2149 share the register model; they differ in
/// the internal DAC resolution (16 vs 32 envelope levels), which changes
/// the volume curve, not the register decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipVariant {
    /// General Instrument AY-3-8910
    Ay,
    /// Yamaha YM2149
    Ym,
}

impl ChipVariant {
    /// Display label for the variant
    pub fn label(self) -> &'static str {
        match self {
            ChipVariant::Ay => "AY",
            ChipVariant::Ym => "YM",
        }
    }
}

impl fmt::Display for ChipVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full reset configuration for a chip backend
///
/// Changing any of the three fields requires a full reinitialization of the
/// backend, so they travel together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChipConfig {
    /// Audio output sample rate in Hz
    pub sample_rate: u32,
    /// Master clock frequency in Hz
    pub clock_rate: f64,
    /// Chip variant (volume curve selection)
    pub variant: ChipVariant,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            clock_rate: DEFAULT_CLOCK_RATE,
            variant: ChipVariant::Ay,
        }
    }
}

/// Common interface for AY/YM chip backends
///
/// A backend owns the full chip parameter set (tone/noise/envelope periods,
/// mixer flags, volumes, pan, master volume, clocks) and produces one stereo
/// sample per synthesis step. Register decode and frame batching live one
/// layer up, in [`crate::registers`] and [`crate::renderer`].
///
/// A single backend instance must not be driven from multiple threads; the
/// trait requires `Send` only so that independent instances can live on
/// different threads.
///
/// # Example
///
/// ```
/// use ayay::{ChipBackend, SoftChip};
///
/// fn play_note<B: ChipBackend>(chip: &mut B) {
///     chip.set_tone_period(0, 284);
///     chip.set_volume(0, 15);
///     chip.set_mixer(0, true, false, false);
/// }
///
/// let mut chip = SoftChip::new();
/// play_note(&mut chip);
/// ```
pub trait ChipBackend: Send {
    /// Reinitialize the backend to a fresh power-on state
    ///
    /// Applies the default pan layout (0.25 / 0.75 / 0.50) and disables
    /// tone, noise and envelope mixing on every channel. Master volume is
    /// preserved. Called internally whenever sample rate, clock rate or
    /// variant changes.
    fn reset(&mut self, config: ChipConfig);

    /// Whether the clock rate can be changed at all
    fn can_change_clock(&self) -> bool;

    /// Whether the clock rate can take any positive value
    fn can_change_clock_continuously(&self) -> bool;

    /// The finite set of supported clock rates
    ///
    /// Empty when [`Self::can_change_clock_continuously`] returns true.
    fn supported_clock_rates(&self) -> Vec<f64>;

    /// Change the sample rate (full reset)
    fn set_sample_rate(&mut self, sample_rate: u32);

    /// Current sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Change the master clock rate (full reset)
    fn set_clock_rate(&mut self, clock_rate: f64);

    /// Current master clock rate in Hz
    fn clock_rate(&self) -> f64;

    /// Change the chip variant (full reset)
    fn set_variant(&mut self, variant: ChipVariant);

    /// Current chip variant
    fn variant(&self) -> ChipVariant;

    /// Set a channel's stereo position
    ///
    /// `pan` is in [0.0, 1.0] with 0.0 hard left and 1.0 hard right. With
    /// `equal_power` the gains follow a square-root law that preserves
    /// perceived loudness across the field; otherwise they are linear.
    fn set_pan(&mut self, channel: usize, pan: f64, equal_power: bool);

    /// Current stereo position of a channel
    fn pan(&self, channel: usize) -> f64;

    /// Set a channel's tone, noise and envelope enables in one call
    fn set_mixer(&mut self, channel: usize, tone_on: bool, noise_on: bool, envelope_on: bool);

    /// Enable or disable the tone generator feeding a channel
    fn set_tone_enable(&mut self, channel: usize, on: bool);

    /// Enable or disable the noise generator feeding a channel
    fn set_noise_enable(&mut self, channel: usize, on: bool);

    /// Switch a channel between fixed volume and envelope-driven volume
    fn set_envelope_enable(&mut self, channel: usize, on: bool);

    /// Set a channel's fixed volume (0-15)
    fn set_volume(&mut self, channel: usize, volume: u8);

    /// Current fixed volume of a channel
    fn volume(&self, channel: usize) -> u8;

    /// Set a channel's tone period
    ///
    /// Only the low 12 bits are significant; the backend masks excess bits.
    fn set_tone_period(&mut self, channel: usize, period: u16);

    /// Current tone period of a channel (12 bits)
    fn tone_period(&self, channel: usize) -> u16;

    /// Set the shared noise period (low 5 bits significant)
    fn set_noise_period(&mut self, period: u8);

    /// Current noise period (5 bits)
    fn noise_period(&self) -> u8;

    /// Set the envelope period (16 bits)
    fn set_envelope_period(&mut self, period: u16);

    /// Current envelope period
    fn envelope_period(&self) -> u16;

    /// Select the envelope shape and restart the envelope
    fn set_envelope_shape(&mut self, shape: EnvelopeShape);

    /// Current envelope shape
    fn envelope_shape(&self) -> EnvelopeShape;

    /// Set the linear master volume applied to every rendered sample
    fn set_master_volume(&mut self, volume: f32);

    /// Current master volume
    fn master_volume(&self) -> f32;

    /// Render `num_samples` stereo samples
    ///
    /// Writes `left * master_volume` / `right * master_volume` into the two
    /// output slices at the given stride (`1` for contiguous output) and
    /// leaves internal state positioned to continue seamlessly on the next
    /// call. With `remove_dc` a running-average DC filter is applied per
    /// sample.
    ///
    /// Buffers must hold at least `(num_samples - 1) * stride + 1` samples;
    /// this is a precondition, validated by [`crate::renderer::render_block`]
    /// and [`crate::renderer::render_frames`], not here.
    fn process_block(
        &mut self,
        out_left: &mut [f32],
        out_right: &mut [f32],
        num_samples: usize,
        remove_dc: bool,
        stride: usize,
    );
}
