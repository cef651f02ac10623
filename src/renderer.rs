//! Block and frame rendering on top of a chip backend
//!
//! [`render_block`] is a validated wrapper around
//! [`ChipBackend::process_block`]. [`render_frames`] maps a timeline of
//! register snapshots onto a PCM buffer: each frame's masked register image
//! is applied, then exactly that frame's slice of samples is rendered, with
//! frame boundaries rounded per frame so the stream never drifts against
//! the nominal frame rate.

use crate::backend::ChipBackend;
use crate::registers::{write_registers_masked, NUM_REGISTERS};
use crate::{ChipError, Result};

/// Render a contiguous block of stereo samples
///
/// Validates the buffers, then delegates to
/// [`ChipBackend::process_block`] with a stride of one. Fails when
/// `num_samples` is zero, when the two buffers differ in length or when
/// they are shorter than `num_samples`.
pub fn render_block(
    chip: &mut dyn ChipBackend,
    out_left: &mut [f32],
    out_right: &mut [f32],
    num_samples: usize,
    remove_dc: bool,
) -> Result<()> {
    if num_samples == 0 {
        return Err(ChipError::EmptyBlock);
    }
    if out_left.len() != out_right.len() {
        return Err(ChipError::OutputLengthMismatch {
            left: out_left.len(),
            right: out_right.len(),
        });
    }
    if out_left.len() < num_samples {
        return Err(ChipError::OutputTooShort {
            required: num_samples,
            capacity: out_left.len(),
        });
    }
    chip.process_block(out_left, out_right, num_samples, remove_dc, 1);
    Ok(())
}

/// Render a timeline of register frames into a stereo buffer
///
/// Each row of `snapshots` is a full 14-byte register image and each row of
/// `masks` its skip mask (`true` = leave the register unchanged, see
/// [`write_registers_masked`]). Per frame the masked registers are applied
/// and then the frame's share of samples is rendered.
///
/// Frame boundaries land at `round(i * sample_rate / frame_rate)`, so
/// individual frames may differ by one sample in length while the stream as
/// a whole stays locked to the frame rate. Returns the number of samples
/// written, `round(frames * sample_rate / frame_rate)`.
///
/// The buffers are validated up front against the worst case,
/// `ceil(frames * sample_rate / frame_rate)`; on any error nothing is
/// rendered and no register is written.
pub fn render_frames(
    chip: &mut dyn ChipBackend,
    snapshots: &[[u8; NUM_REGISTERS]],
    masks: &[[bool; NUM_REGISTERS]],
    out_left: &mut [f32],
    out_right: &mut [f32],
    frame_rate: f64,
    remove_dc: bool,
) -> Result<usize> {
    if snapshots.len() != masks.len() {
        return Err(ChipError::RowCountMismatch {
            snapshots: snapshots.len(),
            masks: masks.len(),
        });
    }
    if out_left.len() != out_right.len() {
        return Err(ChipError::OutputLengthMismatch {
            left: out_left.len(),
            right: out_right.len(),
        });
    }
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        return Err(ChipError::InvalidFrameRate(frame_rate));
    }

    let samples_per_frame = chip.sample_rate() as f64 / frame_rate;
    let worst_case = (snapshots.len() as f64 * samples_per_frame).ceil() as usize;
    if out_left.len() < worst_case {
        return Err(ChipError::OutputTooShort {
            required: worst_case,
            capacity: out_left.len(),
        });
    }

    let mut cursor = 0usize;
    for (i, (snapshot, mask)) in snapshots.iter().zip(masks).enumerate() {
        write_registers_masked(chip, snapshot, mask)?;

        let start = (i as f64 * samples_per_frame).round() as usize;
        let end = ((i + 1) as f64 * samples_per_frame).round() as usize;
        let count = end - start;
        if count > 0 {
            chip.process_block(
                &mut out_left[cursor..],
                &mut out_right[cursor..],
                count,
                remove_dc,
                1,
            );
            cursor += count;
        }
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::SoftChip;

    fn buffers(len: usize) -> (Vec<f32>, Vec<f32>) {
        (vec![0.0; len], vec![0.0; len])
    }

    #[test]
    fn test_render_block_rejects_zero_samples() {
        let mut chip = SoftChip::new();
        let (mut l, mut r) = buffers(16);
        let err = render_block(&mut chip, &mut l, &mut r, 0, false).unwrap_err();
        assert!(matches!(err, ChipError::EmptyBlock));
    }

    #[test]
    fn test_render_block_rejects_short_buffers() {
        let mut chip = SoftChip::new();
        let (mut l, mut r) = buffers(16);
        let err = render_block(&mut chip, &mut l, &mut r, 17, false).unwrap_err();
        assert!(matches!(
            err,
            ChipError::OutputTooShort {
                required: 17,
                capacity: 16
            }
        ));
    }

    #[test]
    fn test_render_block_rejects_unequal_buffers() {
        let mut chip = SoftChip::new();
        let mut l = vec![0.0f32; 16];
        let mut r = vec![0.0f32; 8];
        let err = render_block(&mut chip, &mut l, &mut r, 8, false).unwrap_err();
        assert!(matches!(err, ChipError::OutputLengthMismatch { .. }));
    }

    #[test]
    fn test_exact_sample_count_at_50hz() {
        // 44100 / 50 = 882 samples per frame exactly
        let mut chip = SoftChip::new();
        let snapshots = [[0u8; NUM_REGISTERS]; 2];
        let masks = [[true; NUM_REGISTERS]; 2];
        let (mut l, mut r) = buffers(1764);
        let rendered =
            render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, 50.0, false).unwrap();
        assert_eq!(rendered, 1764);
    }

    #[test]
    fn test_fractional_frame_rate_tiles_without_drift() {
        // 44100 / 60 = 735 exactly; use 59.94 for a fractional division
        let mut chip = SoftChip::new();
        let frames = 100;
        let snapshots = vec![[0u8; NUM_REGISTERS]; frames];
        let masks = vec![[true; NUM_REGISTERS]; frames];
        let spf = 44_100.0 / 59.94;
        let (mut l, mut r) = buffers((frames as f64 * spf).ceil() as usize);

        let rendered =
            render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, 59.94, false).unwrap();
        assert_eq!(rendered, (frames as f64 * spf).round() as usize);
    }

    #[test]
    fn test_frame_lengths_differ_by_at_most_one() {
        let spf: f64 = 44_100.0 / 59.94;
        let short = spf.floor() as usize;
        for i in 0..1000usize {
            let start = (i as f64 * spf).round() as usize;
            let end = ((i + 1) as f64 * spf).round() as usize;
            let count = end - start;
            assert!(count == short || count == short + 1);
        }
    }

    #[test]
    fn test_row_count_mismatch() {
        let mut chip = SoftChip::new();
        let snapshots = [[0u8; NUM_REGISTERS]; 3];
        let masks = [[true; NUM_REGISTERS]; 2];
        let (mut l, mut r) = buffers(4096);
        let err = render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, 50.0, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ChipError::RowCountMismatch {
                snapshots: 3,
                masks: 2
            }
        ));
    }

    #[test]
    fn test_buffer_validated_against_ceiling() {
        // 3 frames at 59.94 Hz need ceil(2207.2) = 2208 slots even though
        // only round(2207.2) = 2207 are written.
        let mut chip = SoftChip::new();
        let snapshots = [[0u8; NUM_REGISTERS]; 3];
        let masks = [[true; NUM_REGISTERS]; 3];

        let (mut l, mut r) = buffers(2207);
        let err = render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, 59.94, false)
            .unwrap_err();
        assert!(matches!(err, ChipError::OutputTooShort { required: 2208, .. }));

        let (mut l, mut r) = buffers(2208);
        let rendered =
            render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, 59.94, false).unwrap();
        assert_eq!(rendered, 2207);
    }

    #[test]
    fn test_invalid_frame_rates() {
        let mut chip = SoftChip::new();
        let snapshots = [[0u8; NUM_REGISTERS]; 1];
        let masks = [[true; NUM_REGISTERS]; 1];
        let (mut l, mut r) = buffers(4096);
        for bad in [0.0, -50.0, f64::NAN, f64::INFINITY] {
            let err = render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, bad, false)
                .unwrap_err();
            assert!(matches!(err, ChipError::InvalidFrameRate(_)));
        }
    }

    #[test]
    fn test_frames_drive_registers() {
        let mut chip = SoftChip::new();
        // Frame 0: tone A at period 100, volume 15, mixer enables tone A
        let mut snapshot = [0u8; NUM_REGISTERS];
        snapshot[0] = 100;
        snapshot[7] = 0b0011_1110;
        snapshot[8] = 0x0F;
        let snapshots = [snapshot];
        let masks = [[false; NUM_REGISTERS]];
        let (mut l, mut r) = buffers(882);
        render_frames(&mut chip, &snapshots, &masks, &mut l, &mut r, 50.0, false).unwrap();
        assert!(l.iter().any(|&s| s != 0.0));
        assert!(r.iter().any(|&s| s != 0.0));
    }
}
