//! AY-3-8910 / YM2149 PSG register frontend
//!
//! Exposes the classic 14-register programming model of the AY/YM sound chip
//! family on top of a software-synthesizing backend, together with a batch
//! renderer that turns a timeline of register snapshots (as produced by
//! tracker and rip tools) into a continuous stereo PCM stream.
//!
//! # Features
//! - Bit-exact decode of the 14 control registers (R0-R13)
//! - Masked partial register updates per frame, with frame-accurate
//!   sample-boundary rounding
//! - Capability trait ([`ChipBackend`]) so alternative chip backends can be
//!   driven through the same register file
//! - Software synthesizer backend ([`SoftChip`]) with AY/YM volume curves,
//!   per-channel stereo panning and optional DC-offset removal
//!
//! # Crate feature flags
//! - `export-wav` (optional): write rendered buffers to WAV via `hound`
//!
//! # Quick start
//! ```
//! use ayay::SoftChip;
//!
//! let mut chip = SoftChip::new();
//! ayay::write_register(&mut chip, 0, 0x1C).unwrap(); // Tone A fine
//! ayay::write_register(&mut chip, 1, 0x01).unwrap(); // Tone A coarse
//! ayay::write_register(&mut chip, 7, 0x3E).unwrap(); // Mixer: tone A on
//! ayay::write_register(&mut chip, 8, 0x0F).unwrap(); // Volume A = 15
//!
//! let mut left = vec![0.0f32; 882];
//! let mut right = vec![0.0f32; 882];
//! ayay::render_block(&mut chip, &mut left, &mut right, 882, true).unwrap();
//! ```
//!
//! # Frame rendering
//! ```
//! use ayay::{SoftChip, NUM_REGISTERS};
//!
//! let mut chip = SoftChip::new();
//! let snapshots = [[0u8; NUM_REGISTERS]; 2];
//! let masks = [[false; NUM_REGISTERS]; 2];
//! let mut left = vec![0.0f32; 1764];
//! let mut right = vec![0.0f32; 1764];
//! let rendered =
//!     ayay::render_frames(&mut chip, &snapshots, &masks, &mut left, &mut right, 50.0, true)
//!         .unwrap();
//! assert_eq!(rendered, 1764);
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod chip;
pub mod envelope;
pub mod registers;
pub mod renderer;
pub mod synth;

#[cfg(feature = "export-wav")]
pub mod export;

/// Error types for register file, renderer and export operations
///
/// The register and renderer variants are validation errors detected before
/// any chip state is mutated; the IO and export variants come from the
/// optional WAV writer. Capability errors are not modeled: changing sample
/// rate, clock rate or chip variant always succeeds by performing a full
/// reset.
#[derive(thiserror::Error, Debug)]
pub enum ChipError {
    /// Register index outside 0..=13
    #[error("register index {index} out of range (0-13)")]
    RegisterIndex {
        /// The offending index
        index: usize,
    },

    /// Paired input slices have different lengths
    #[error("paired inputs must have equal lengths (got {expected} and {actual})")]
    LengthMismatch {
        /// Length of the first slice
        expected: usize,
        /// Length of the second slice
        actual: usize,
    },

    /// Masked register write requires exactly one entry per register
    #[error("expected exactly {expected} register entries, got {actual}")]
    RegisterCount {
        /// Required entry count (14)
        expected: usize,
        /// Entry count supplied by the caller
        actual: usize,
    },

    /// Snapshot and mask sequences have different frame counts
    #[error("snapshot rows ({snapshots}) and mask rows ({masks}) differ")]
    RowCountMismatch {
        /// Number of snapshot rows
        snapshots: usize,
        /// Number of mask rows
        masks: usize,
    },

    /// Left and right output buffers have different lengths
    #[error("output buffers differ in length ({left} vs {right})")]
    OutputLengthMismatch {
        /// Left buffer length
        left: usize,
        /// Right buffer length
        right: usize,
    },

    /// Output buffers cannot hold the requested sample span
    #[error("output buffers hold {capacity} samples, need at least {required}")]
    OutputTooShort {
        /// Samples the render would produce
        required: usize,
        /// Samples the buffers can hold
        capacity: usize,
    },

    /// A render of zero samples was requested
    #[error("sample count must be greater than zero")]
    EmptyBlock,

    /// Frame rate must be a positive, finite number of frames per second
    #[error("frame rate must be positive, got {0}")]
    InvalidFrameRate(f64),

    /// IO error from the filesystem (WAV export)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio file export error
    #[error("export error: {0}")]
    Export(String),
}

/// Result type for register file and renderer operations
pub type Result<T> = std::result::Result<T, ChipError>;

// Public API exports
pub use backend::{ChipBackend, ChipConfig, ChipVariant, NUM_CHANNELS};
pub use chip::SoftChip;
pub use envelope::{EnvelopeClass, EnvelopeShape, SHAPES};
pub use registers::{
    write_register, write_registers, write_registers_masked, MixerFlags, Register, NUM_REGISTERS,
};
pub use renderer::{render_block, render_frames};
