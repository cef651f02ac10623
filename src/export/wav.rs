//! WAV file export

use crate::{ChipError, Result};
use std::path::Path;

/// Write a rendered stereo buffer pair to a 16-bit WAV file
///
/// Samples are clamped to [-1.0, 1.0] and quantized to 16 bits,
/// interleaved left/right.
///
/// # Examples
///
/// ```no_run
/// use ayay::{ChipBackend, SoftChip};
///
/// # fn main() -> ayay::Result<()> {
/// let mut chip = SoftChip::new();
/// let mut left = vec![0.0f32; 44_100];
/// let mut right = vec![0.0f32; 44_100];
/// ayay::render_block(&mut chip, &mut left, &mut right, 44_100, true)?;
///
/// ayay::export::write_stereo_wav("output.wav", &left, &right, chip.sample_rate())?;
/// # Ok(())
/// # }
/// ```
pub fn write_stereo_wav<P: AsRef<Path>>(
    path: P,
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
) -> Result<()> {
    if left.len() != right.len() {
        return Err(ChipError::OutputLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), spec)
        .map_err(|e| map_hound_error(e, "failed to create WAV file"))?;

    for (&l, &r) in left.iter().zip(right) {
        for sample in [l, r] {
            let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| map_hound_error(e, "failed to write sample"))?;
        }
    }

    writer
        .finalize()
        .map_err(|e| map_hound_error(e, "failed to finalize WAV file"))?;

    Ok(())
}

/// Surface the filesystem cause directly, format problems as export errors
fn map_hound_error(error: hound::Error, context: &str) -> ChipError {
    match error {
        hound::Error::IoError(io) => ChipError::Io(io),
        other => ChipError::Export(format!("{context}: {other}")),
    }
}
