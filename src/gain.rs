//! Level → playback gain curves for presenters.
//!
//! The core only deals in abstract levels; these helpers give every presenter
//! the same mapping so results are comparable across audio backends.

use crate::staircase::{MAX_LEVEL, MIN_LEVEL};

fn normalised(level: u8) -> f32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL) as f32 / MAX_LEVEL as f32
}

/// Linear gain for buffer playback: level 1 → ≈0.032, level 100 → 1.2.
///
/// ```text
/// gain = 0.02 + (level / 100) × 1.18
/// ```
pub fn level_to_gain(level: u8) -> f32 {
    0.02 + normalised(level) * 1.18
}

/// Volume for speech synthesis, quadratic so quiet levels stay quiet.
///
/// ```text
/// volume = clamp(0.02 + (level / 100)² × 0.98, 0.001, 1.0)
/// ```
pub fn level_to_speech_volume(level: u8) -> f32 {
    let n = normalised(level);
    (0.02 + n * n * 0.98).clamp(0.001, 1.0)
}
