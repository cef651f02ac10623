//! Audio file export
//!
//! Enabled by the `export-wav` feature.

mod wav;

pub use wav::write_stereo_wav;
