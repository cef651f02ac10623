//! DAC volume tables
//!
//! Measured output levels of the 16-step volume DAC. The YM2149 resolves 32
//! envelope levels where the AY-3-8910 only resolves 16, so the synthesis
//! loop always indexes a 32-entry table: on the AY adjacent entries are
//! duplicated, on the YM the intermediate steps are filled in on the
//! (logarithmic) volume curve.

use crate::backend::ChipVariant;

/// Measured DAC output per volume step (0-15), arbitrary units
pub const VOLUME_TABLE: [u16; 16] = [
    20, 53, 88, 125, 193, 258, 385, 525, 753, 1029, 1523, 2077, 3110, 4395, 7073, 10922,
];

/// Build the normalized 32-entry amplitude table for a chip variant
///
/// Entry 31 is 1.0 for both variants. Fixed volume `v` indexes entry
/// `v * 2 + 1`; the envelope indexes all 32 entries directly.
pub fn dac_table(variant: ChipVariant) -> [f32; 32] {
    let max = VOLUME_TABLE[15] as f32;
    let volume = |step: usize| VOLUME_TABLE[step] as f32 / max;

    let mut table = [0.0f32; 32];
    for step in 0..16 {
        table[step * 2 + 1] = volume(step);
        table[step * 2] = match variant {
            ChipVariant::Ay => volume(step),
            // Geometric midpoint between adjacent steps on the log curve
            ChipVariant::Ym => {
                if step == 0 {
                    0.0
                } else {
                    (volume(step - 1) * volume(step)).sqrt()
                }
            }
        };
    }
    table
}
