//! DC offset removal filter
//!
//! The chip output has a DC offset that varies with the audio content
//! (mixer-gated channels idle high, not at zero). This filter subtracts a
//! running average to center the signal.

/// History buffer size (2048 samples = ~46ms at 44.1kHz)
const HISTORY_SIZE_BITS: usize = 11;
const HISTORY_SIZE: usize = 1 << HISTORY_SIZE_BITS;

/// DC offset removal filter using a running average
#[derive(Clone)]
pub struct DcFilter {
    /// Circular buffer of recent samples
    buffer: Box<[f32; HISTORY_SIZE]>,
    /// Current write position in buffer
    position: usize,
    /// Running sum of all samples in buffer
    running_sum: f64,
}

impl DcFilter {
    /// Create a new DC filter
    pub fn new() -> Self {
        Self {
            buffer: Box::new([0.0; HISTORY_SIZE]),
            position: 0,
            running_sum: 0.0,
        }
    }

    /// Process a sample and return the DC-adjusted value
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.running_sum -= self.buffer[self.position] as f64;
        self.running_sum += sample as f64;
        self.buffer[self.position] = sample;

        self.position = (self.position + 1) & (HISTORY_SIZE - 1);

        let dc_offset = self.running_sum / HISTORY_SIZE as f64;
        sample - dc_offset as f32
    }

    /// Reset the filter state
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.position = 0;
        self.running_sum = 0.0;
    }
}

impl Default for DcFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DcFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DcFilter")
            .field("position", &self.position)
            .field("running_sum", &self.running_sum)
            .finish_non_exhaustive()
    }
}
