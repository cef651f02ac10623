//! Software synthesis internals
//!
//! Building blocks used by [`crate::chip::SoftChip`]: the per-channel tone
//! generators, the shared noise LFSR, the envelope unit, the DAC volume
//! tables and the DC removal filter. Nothing here touches registers; the
//! decode layer lives in [`crate::registers`].

pub mod dc_filter;
pub mod generators;
pub mod tables;

pub use dc_filter::DcFilter;
pub use generators::{EnvelopeUnit, NoiseGenerator, ToneGenerator};
