//! End-to-end contract tests: register writes through the frame renderer
//! down to the synthesized PCM stream.

use ayay::{
    render_frames, write_register, write_registers_masked, ChipBackend, ChipError, SoftChip,
    NUM_REGISTERS,
};

const FRAME_RATE: f64 = 50.0;
const SAMPLES_PER_FRAME: usize = 882; // 44100 / 50

fn buffers(frames: usize) -> (Vec<f32>, Vec<f32>) {
    let len = frames * SAMPLES_PER_FRAME;
    (vec![0.0; len], vec![0.0; len])
}

fn mean_abs(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32
}

/// Register image playing a tone on channel A
fn tone_a_frame(fine: u8, coarse: u8, volume: u8) -> [u8; NUM_REGISTERS] {
    let mut frame = [0u8; NUM_REGISTERS];
    frame[0] = fine;
    frame[1] = coarse;
    frame[7] = 0b0011_1110; // only tone A enabled
    frame[8] = volume;
    frame
}

#[test]
fn renders_exact_sample_count_per_frame_timeline() {
    let mut chip = SoftChip::new();
    let snapshots = vec![tone_a_frame(100, 0, 15); 5];
    let masks = vec![[false; NUM_REGISTERS]; 5];
    let (mut left, mut right) = buffers(5);

    let rendered = render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, FRAME_RATE, false,
    )
    .unwrap();
    assert_eq!(rendered, 5 * SAMPLES_PER_FRAME);
    assert!(mean_abs(&left) > 0.1);
}

#[test]
fn masked_frames_keep_previous_register_values() {
    let mut chip = SoftChip::new();

    // Frame 0 programs the tone; frames 1-2 mask every register out, so
    // the note must keep sounding unchanged.
    let snapshots = vec![tone_a_frame(100, 0, 15), [0u8; NUM_REGISTERS], [0u8; NUM_REGISTERS]];
    let masks = vec![
        [false; NUM_REGISTERS],
        [true; NUM_REGISTERS],
        [true; NUM_REGISTERS],
    ];
    let (mut left, mut right) = buffers(3);

    render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, FRAME_RATE, false,
    )
    .unwrap();

    let last_frame = &left[2 * SAMPLES_PER_FRAME..];
    assert!(mean_abs(last_frame) > 0.1, "masked frames must not silence the note");
    assert_eq!(chip.volume(0), 15);
    assert_eq!(chip.tone_period(0), 100);
}

#[test]
fn unmasked_zero_frame_silences_the_note() {
    let mut chip = SoftChip::new();
    let snapshots = vec![tone_a_frame(100, 0, 15), [0u8; NUM_REGISTERS]];
    let masks = vec![[false; NUM_REGISTERS]; 2];
    let (mut left, mut right) = buffers(2);

    render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, FRAME_RATE, false,
    )
    .unwrap();

    assert_eq!(chip.volume(0), 0);
    let first = mean_abs(&left[..SAMPLES_PER_FRAME]);
    let second = mean_abs(&left[SAMPLES_PER_FRAME..]);
    assert!(first > 5.0 * second, "first {first}, second {second}");
}

#[test]
fn volume_change_lands_on_the_frame_boundary() {
    let mut chip = SoftChip::new();
    let snapshots = vec![tone_a_frame(100, 0, 15), tone_a_frame(100, 0, 4)];
    // Second frame only touches the volume register
    let mut volume_only = [true; NUM_REGISTERS];
    volume_only[8] = false;
    let masks = vec![[false; NUM_REGISTERS], volume_only];
    let (mut left, mut right) = buffers(2);

    render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, FRAME_RATE, false,
    )
    .unwrap();

    let loud = mean_abs(&left[..SAMPLES_PER_FRAME]);
    let quiet = mean_abs(&left[SAMPLES_PER_FRAME..]);
    assert!(loud > 5.0 * quiet, "loud {loud}, quiet {quiet}");
    // Tone keeps running, only the level dropped
    assert!(quiet > 0.001);
}

#[test]
fn failed_frame_render_leaves_chip_untouched() {
    let mut chip = SoftChip::new();
    write_register(&mut chip, 8, 7).unwrap();

    let snapshots = [tone_a_frame(100, 0, 15); 2];
    let masks = [[false; NUM_REGISTERS]; 1];
    let (mut left, mut right) = buffers(2);

    let err = render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, FRAME_RATE, false,
    )
    .unwrap_err();
    assert!(matches!(err, ChipError::RowCountMismatch { .. }));
    assert_eq!(chip.volume(0), 7, "no frame may be applied on a failed render");
    assert!(left.iter().all(|&s| s == 0.0));
}

#[test]
fn masked_write_is_independent_of_value_content() {
    // A skipped register must stay put even when the snapshot carries a
    // conspicuous value in its slot.
    let mut chip = SoftChip::new();
    write_register(&mut chip, 6, 0x15).unwrap();

    let mut values = [0xFFu8; NUM_REGISTERS];
    values[6] = 0x01;
    let skip = [true; NUM_REGISTERS];
    write_registers_masked(&mut chip, &values, &skip).unwrap();

    assert_eq!(chip.noise_period(), 0x15);
    assert_eq!(chip.volume(0), 0);
    assert_eq!(chip.tone_period(2), 0);
}

#[test]
fn envelope_driven_note_across_frames() {
    let mut chip = SoftChip::new();

    let mut frame = [0u8; NUM_REGISTERS];
    frame[0] = 100;
    frame[7] = 0b0011_1110;
    frame[8] = 0x10; // envelope mode, volume nibble ignored
    frame[11] = 0x00;
    frame[12] = 0x02; // envelope period 512
    frame[13] = 0x08; // repeating decay
    let snapshots = vec![frame, frame, frame, frame];
    // Every later frame is fully masked so the envelope is not retriggered
    let hold = [true; NUM_REGISTERS];
    let masks = vec![[false; NUM_REGISTERS], hold, hold, hold];

    let (mut left, mut right) = buffers(4);
    render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, FRAME_RATE, false,
    )
    .unwrap();

    assert!(mean_abs(&left) > 0.02, "envelope note must be audible");
}

#[test]
fn renderer_works_through_a_trait_object() {
    // The renderer takes any backend as a trait object
    let mut chip: Box<dyn ChipBackend> = Box::new(SoftChip::new());
    let snapshots = [tone_a_frame(50, 1, 12)];
    let masks = [[false; NUM_REGISTERS]];
    let (mut left, mut right) = buffers(1);

    let rendered = render_frames(
        chip.as_mut(), &snapshots, &masks, &mut left, &mut right, FRAME_RATE, true,
    )
    .unwrap();
    assert_eq!(rendered, SAMPLES_PER_FRAME);
    assert_eq!(chip.tone_period(0), 0x0132);
}

#[test]
fn sixty_hz_timeline_at_odd_sample_rate() {
    // 22050 / 60 = 367.5: frames alternate 367/368 samples and the total
    // stays locked to round(n * 367.5).
    let mut chip = SoftChip::new();
    chip.set_sample_rate(22_050);

    let frames = 9;
    let snapshots = vec![tone_a_frame(100, 0, 15); frames];
    let masks = vec![[false; NUM_REGISTERS]; frames];
    let capacity = (frames as f64 * 367.5).ceil() as usize;
    let mut left = vec![0.0f32; capacity];
    let mut right = vec![0.0f32; capacity];

    let rendered = render_frames(
        &mut chip, &snapshots, &masks, &mut left, &mut right, 60.0, false,
    )
    .unwrap();
    assert_eq!(rendered, (frames as f64 * 367.5).round() as usize);
}
