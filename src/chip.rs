//! Software synthesizer backend
//!
//! [`SoftChip`] is the bundled [`ChipBackend`]: three tone generators, the
//! shared noise LFSR and the envelope unit ticked at one eighth of the
//! master clock, box-filtered down to the output sample rate. It accepts
//! any sample rate, clock rate and variant, so every capability query
//! answers "yes".

use crate::backend::{ChipBackend, ChipConfig, ChipVariant, NUM_CHANNELS};
use crate::envelope::EnvelopeShape;
use crate::synth::tables::dac_table;
use crate::synth::{DcFilter, EnvelopeUnit, NoiseGenerator, ToneGenerator};

/// Master clock divider for the internal tick rate
const CLOCK_DIVIDER: f64 = 8.0;

/// Default stereo positions (A left of center, B right, C center)
const DEFAULT_PAN: [f64; NUM_CHANNELS] = [0.25, 0.75, 0.50];

/// Per-channel synthesis state
#[derive(Clone, Debug)]
struct ChannelState {
    tone: ToneGenerator,
    tone_period: u16,
    volume: u8,
    tone_on: bool,
    noise_on: bool,
    envelope_on: bool,
    pan: f64,
    gain_left: f32,
    gain_right: f32,
}

impl ChannelState {
    fn new() -> Self {
        let mut state = Self {
            tone: ToneGenerator::new(),
            tone_period: 0,
            volume: 0,
            tone_on: false,
            noise_on: false,
            envelope_on: false,
            pan: 0.5,
            gain_left: 0.5,
            gain_right: 0.5,
        };
        state.set_pan(0.5, false);
        state
    }

    fn set_pan(&mut self, pan: f64, equal_power: bool) {
        let pan = pan.clamp(0.0, 1.0);
        self.pan = pan;
        if equal_power {
            self.gain_left = (1.0 - pan).sqrt() as f32;
            self.gain_right = pan.sqrt() as f32;
        } else {
            self.gain_left = (1.0 - pan) as f32;
            self.gain_right = pan as f32;
        }
    }

    fn reset(&mut self, channel: usize) {
        self.tone.reset();
        self.tone_period = 0;
        self.volume = 0;
        self.tone_on = false;
        self.noise_on = false;
        self.envelope_on = false;
        self.set_pan(DEFAULT_PAN[channel], false);
    }
}

/// Software-synthesizing AY/YM backend
///
/// # Example
///
/// ```
/// use ayay::{ChipBackend, ChipConfig, ChipVariant, SoftChip};
///
/// let mut chip = SoftChip::with_config(ChipConfig {
///     sample_rate: 48_000,
///     clock_rate: 2_000_000.0,
///     variant: ChipVariant::Ym,
/// });
/// assert_eq!(chip.sample_rate(), 48_000);
///
/// chip.set_tone_period(0, 284);
/// chip.set_volume(0, 15);
/// chip.set_mixer(0, true, false, false);
///
/// let mut left = vec![0.0f32; 480];
/// let mut right = vec![0.0f32; 480];
/// chip.process_block(&mut left, &mut right, 480, false, 1);
/// ```
///
/// `SoftChip` is `Clone`: a clone carries the full synthesis state and
/// renders the same samples as the source until the two are mutated apart.
#[derive(Clone, Debug)]
pub struct SoftChip {
    config: ChipConfig,
    channels: [ChannelState; NUM_CHANNELS],
    noise: NoiseGenerator,
    noise_period: u8,
    envelope: EnvelopeUnit,
    envelope_period: u16,
    dac: [f32; 32],
    master_volume: f32,
    dc_left: DcFilter,
    dc_right: DcFilter,
    /// Internal ticks per output sample (clock / 8 / sample_rate)
    ticks_per_sample: f64,
    tick_acc: f64,
    last_left: f32,
    last_right: f32,
}

impl SoftChip {
    /// Create a chip with the default configuration (44.1 kHz, AY variant)
    pub fn new() -> Self {
        Self::with_config(ChipConfig::default())
    }

    /// Create a chip with an explicit configuration
    pub fn with_config(config: ChipConfig) -> Self {
        let mut chip = Self {
            config,
            channels: [ChannelState::new(), ChannelState::new(), ChannelState::new()],
            noise: NoiseGenerator::new(),
            noise_period: 0,
            envelope: EnvelopeUnit::new(),
            envelope_period: 0,
            dac: [0.0; 32],
            master_volume: 1.0,
            dc_left: DcFilter::new(),
            dc_right: DcFilter::new(),
            ticks_per_sample: 0.0,
            tick_acc: 0.0,
            last_left: 0.0,
            last_right: 0.0,
        };
        chip.reset(config);
        chip
    }

    /// Run one internal tick and return the unscaled stereo sum
    #[inline]
    fn tick(&mut self) -> (f32, f32) {
        let noise_out = self.noise.tick(self.noise_period);
        self.envelope.tick(self.envelope_period);
        let envelope_level = self.envelope.level() as usize;

        let mut left = 0.0f32;
        let mut right = 0.0f32;
        for channel in &mut self.channels {
            let tone_out = channel.tone.tick(channel.tone_period);
            // A disabled generator holds its channel input high
            let gate = (tone_out || !channel.tone_on) && (noise_out || !channel.noise_on);
            if gate {
                let index = if channel.envelope_on {
                    envelope_level
                } else {
                    channel.volume as usize * 2 + 1
                };
                let amplitude = self.dac[index];
                left += amplitude * channel.gain_left;
                right += amplitude * channel.gain_right;
            }
        }
        (left, right)
    }

    /// Produce the next output sample by averaging the ticks it spans
    #[inline]
    fn next_sample(&mut self) -> (f32, f32) {
        self.tick_acc += self.ticks_per_sample;
        let ticks = self.tick_acc as u32;
        self.tick_acc -= ticks as f64;

        if ticks == 0 {
            return (self.last_left, self.last_right);
        }

        let mut left = 0.0f32;
        let mut right = 0.0f32;
        for _ in 0..ticks {
            let (l, r) = self.tick();
            left += l;
            right += r;
        }
        left /= ticks as f32;
        right /= ticks as f32;
        self.last_left = left;
        self.last_right = right;
        (left, right)
    }
}

impl Default for SoftChip {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipBackend for SoftChip {
    fn reset(&mut self, config: ChipConfig) {
        self.config = config;
        self.dac = dac_table(config.variant);
        self.ticks_per_sample = config.clock_rate / CLOCK_DIVIDER / config.sample_rate as f64;
        self.tick_acc = 0.0;
        self.last_left = 0.0;
        self.last_right = 0.0;

        for (index, channel) in self.channels.iter_mut().enumerate() {
            channel.reset(index);
        }
        self.noise.reset();
        self.noise_period = 0;
        self.envelope.reset();
        self.envelope.set_shape(EnvelopeShape::default());
        self.envelope_period = 0;
        self.dc_left.reset();
        self.dc_right.reset();
        // master_volume survives the reset
    }

    fn can_change_clock(&self) -> bool {
        true
    }

    fn can_change_clock_continuously(&self) -> bool {
        true
    }

    fn supported_clock_rates(&self) -> Vec<f64> {
        Vec::new()
    }

    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.reset(ChipConfig {
            sample_rate,
            ..self.config
        });
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    fn set_clock_rate(&mut self, clock_rate: f64) {
        self.reset(ChipConfig {
            clock_rate,
            ..self.config
        });
    }

    fn clock_rate(&self) -> f64 {
        self.config.clock_rate
    }

    fn set_variant(&mut self, variant: ChipVariant) {
        self.reset(ChipConfig {
            variant,
            ..self.config
        });
    }

    fn variant(&self) -> ChipVariant {
        self.config.variant
    }

    fn set_pan(&mut self, channel: usize, pan: f64, equal_power: bool) {
        if channel < NUM_CHANNELS {
            self.channels[channel].set_pan(pan, equal_power);
        }
    }

    fn pan(&self, channel: usize) -> f64 {
        self.channels.get(channel).map_or(0.5, |c| c.pan)
    }

    fn set_mixer(&mut self, channel: usize, tone_on: bool, noise_on: bool, envelope_on: bool) {
        if channel < NUM_CHANNELS {
            self.channels[channel].tone_on = tone_on;
            self.channels[channel].noise_on = noise_on;
            self.channels[channel].envelope_on = envelope_on;
        }
    }

    fn set_tone_enable(&mut self, channel: usize, on: bool) {
        if channel < NUM_CHANNELS {
            self.channels[channel].tone_on = on;
        }
    }

    fn set_noise_enable(&mut self, channel: usize, on: bool) {
        if channel < NUM_CHANNELS {
            self.channels[channel].noise_on = on;
        }
    }

    fn set_envelope_enable(&mut self, channel: usize, on: bool) {
        if channel < NUM_CHANNELS {
            self.channels[channel].envelope_on = on;
        }
    }

    fn set_volume(&mut self, channel: usize, volume: u8) {
        if channel < NUM_CHANNELS {
            self.channels[channel].volume = volume & 0x0F;
        }
    }

    fn volume(&self, channel: usize) -> u8 {
        self.channels.get(channel).map_or(0, |c| c.volume)
    }

    fn set_tone_period(&mut self, channel: usize, period: u16) {
        if channel < NUM_CHANNELS {
            self.channels[channel].tone_period = period & 0x0FFF;
        }
    }

    fn tone_period(&self, channel: usize) -> u16 {
        self.channels.get(channel).map_or(0, |c| c.tone_period)
    }

    fn set_noise_period(&mut self, period: u8) {
        self.noise_period = period & 0x1F;
    }

    fn noise_period(&self) -> u8 {
        self.noise_period
    }

    fn set_envelope_period(&mut self, period: u16) {
        self.envelope_period = period;
    }

    fn envelope_period(&self) -> u16 {
        self.envelope_period
    }

    fn set_envelope_shape(&mut self, shape: EnvelopeShape) {
        self.envelope.set_shape(shape);
    }

    fn envelope_shape(&self) -> EnvelopeShape {
        self.envelope.shape()
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume;
    }

    fn master_volume(&self) -> f32 {
        self.master_volume
    }

    fn process_block(
        &mut self,
        out_left: &mut [f32],
        out_right: &mut [f32],
        num_samples: usize,
        remove_dc: bool,
        stride: usize,
    ) {
        for i in 0..num_samples {
            let (mut left, mut right) = self.next_sample();
            if remove_dc {
                left = self.dc_left.process(left);
                right = self.dc_right.process(right);
            }
            out_left[i * stride] = left * self.master_volume;
            out_right[i * stride] = right * self.master_volume;
        }
    }
}
