//! Sound generators
//!
//! The individual generator components ticked by the synthesis loop:
//! - Tone generators (one per channel)
//! - Noise generator (shared 17-bit LFSR)
//! - Envelope unit (16 hardware shapes)
//!
//! Periods are passed in at tick time rather than latched here, so a
//! half-written fine/coarse pair is picked up on the very next tick. A
//! period of 0 behaves as 1, as on real hardware.

use crate::envelope::{EnvelopeClass, EnvelopeShape};

/// Square-wave tone generator for a single channel
///
/// A counter toggles the output line every `period` ticks.
#[derive(Clone, Debug, Default)]
pub struct ToneGenerator {
    counter: u32,
    output: bool,
}

impl ToneGenerator {
    /// Create a new tone generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick and return the output line state
    #[inline]
    pub fn tick(&mut self, period: u16) -> bool {
        self.counter += 1;
        if self.counter >= period.max(1) as u32 {
            self.output = !self.output;
            self.counter = 0;
        }
        self.output
    }

    /// Reset to initial state
    pub fn reset(&mut self) {
        self.counter = 0;
        self.output = false;
    }
}

/// Noise generator using a 17-bit LFSR
///
/// Runs at half the tone generator rate and produces a pseudo-random bit
/// sequence using XOR feedback, shared by all three channels.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    counter: u32,
    /// 17-bit LFSR state, must stay non-zero
    lfsr: u32,
    output: bool,
    half_tick: bool,
}

impl NoiseGenerator {
    /// Create a new noise generator
    pub fn new() -> Self {
        Self {
            counter: 0,
            lfsr: 1,
            output: false,
            half_tick: false,
        }
    }

    /// Advance one tick and return the output line state
    ///
    /// Uses a 17-bit Galois LFSR with taps at bits 13 and 16, matching the
    /// real YM2149/AY-3-8910 sequence.
    #[inline]
    pub fn tick(&mut self, period: u8) -> bool {
        self.half_tick = !self.half_tick;

        if self.half_tick {
            self.counter += 1;
            if self.counter >= period.max(1) as u32 {
                let lsb = self.lfsr & 1;
                self.lfsr >>= 1;
                if lsb != 0 {
                    self.lfsr ^= 0x12000; // Taps at bits 13 (0x2000) and 16 (0x10000)
                }
                self.output = lsb != 0;
                self.counter = 0;
            }
        }

        self.output
    }

    /// Reset to initial state
    pub fn reset(&mut self) {
        self.counter = 0;
        self.lfsr = 1;
        self.output = false;
        self.half_tick = false;
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope segment behavior
///
/// Every shape is two segments: the initial ramp, then what happens after
/// it. Repeating shapes alternate between the two segments forever; hold
/// shapes park in the second one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
    SlideUp,
    SlideDown,
    HoldTop,
    HoldBottom,
}

fn segments(shape: EnvelopeShape) -> [Segment; 2] {
    match shape.class() {
        EnvelopeClass::DownHold => [Segment::SlideDown, Segment::HoldBottom],
        EnvelopeClass::UpHold => [Segment::SlideUp, Segment::HoldBottom],
        EnvelopeClass::DownRepeat => [Segment::SlideDown, Segment::SlideDown],
        EnvelopeClass::DownUpAlternate => [Segment::SlideDown, Segment::SlideUp],
        EnvelopeClass::DownHoldTop => [Segment::SlideDown, Segment::HoldTop],
        EnvelopeClass::UpRepeat => [Segment::SlideUp, Segment::SlideUp],
        EnvelopeClass::UpHoldTop => [Segment::SlideUp, Segment::HoldTop],
        EnvelopeClass::UpDownAlternate => [Segment::SlideUp, Segment::SlideDown],
    }
}

/// Envelope unit producing 32-step amplitude levels
///
/// The level directly indexes the 32-entry DAC table. Writing a shape
/// restarts the envelope from the beginning of its first segment.
#[derive(Clone, Debug)]
pub struct EnvelopeUnit {
    counter: u32,
    shape: EnvelopeShape,
    /// Which of the two segments is active (0 or 1)
    segment: usize,
    level: u32,
}

impl EnvelopeUnit {
    /// Create a new envelope unit in the default shape
    pub fn new() -> Self {
        let mut unit = Self {
            counter: 0,
            shape: EnvelopeShape::default(),
            segment: 0,
            level: 0,
        };
        unit.reset_segment();
        unit
    }

    /// Select a shape and restart the envelope
    pub fn set_shape(&mut self, shape: EnvelopeShape) {
        self.shape = shape;
        self.segment = 0;
        self.counter = 0;
        self.reset_segment();
    }

    /// Current shape
    pub fn shape(&self) -> EnvelopeShape {
        self.shape
    }

    /// Current amplitude level (0-31)
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Advance one tick
    #[inline]
    pub fn tick(&mut self, period: u16) {
        self.counter += 1;
        if self.counter >= period.max(1) as u32 {
            self.step();
            self.counter = 0;
        }
    }

    fn step(&mut self) {
        match segments(self.shape)[self.segment] {
            Segment::SlideUp => {
                if self.level < 31 {
                    self.level += 1;
                } else {
                    self.advance_segment();
                }
            }
            Segment::SlideDown => {
                if self.level > 0 {
                    self.level -= 1;
                } else {
                    self.advance_segment();
                }
            }
            Segment::HoldTop | Segment::HoldBottom => {}
        }
    }

    fn advance_segment(&mut self) {
        self.segment ^= 1;
        self.reset_segment();
    }

    fn reset_segment(&mut self) {
        self.level = match segments(self.shape)[self.segment] {
            Segment::SlideDown | Segment::HoldTop => 31,
            Segment::SlideUp | Segment::HoldBottom => 0,
        };
    }

    /// Reset to initial state, keeping the selected shape
    pub fn reset(&mut self) {
        self.counter = 0;
        self.segment = 0;
        self.reset_segment();
    }
}

impl Default for EnvelopeUnit {
    fn default() -> Self {
        Self::new()
    }
}
