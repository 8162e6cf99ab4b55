/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Reduce each ear's staircase to a 1–100 score and the pair to a tier.
//!
//! The primary estimate is the reversal mean from
//! [`Staircase::reversal_threshold`]. An ear that never reversed falls back to
//! a trimmed mean of the levels it was tested at; an ear that was never tested
//! has insufficient data.

use alloc::vec::Vec;

use crate::sequencer::ResponseRecord;
use crate::staircase::{rounded_mean, Staircase};

/// Tier boundary below which a referral is recommended.
pub const REFERRAL_BELOW: u8 = 30;

/// Tier boundary below which a follow-up screen is recommended.
pub const FOLLOW_UP_BELOW: u8 = 60;

/// Per-ear result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Score {
    /// Estimated threshold level in [1, 100].
    Level(u8),
    /// No responses were collected for this ear.
    InsufficientData,
}

impl Score {
    /// The level, if there is one.
    pub fn level(self) -> Option<u8> {
        match self {
            Score::Level(l) => Some(l),
            Score::InsufficientData => None,
        }
    }
}

impl core::fmt::Display for Score {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Score::Level(l) => write!(f, "{l}"),
            Score::InsufficientData => f.write_str("N/A"),
        }
    }
}

/// Screening outcome across both ears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recommendation {
    /// At least one ear could not be scored.
    InsufficientData,
    /// At least one ear scored below 30.
    ReferralRecommended,
    /// At least one ear scored below 60.
    FollowUpRecommended,
    /// Both ears scored 60 or above.
    WithinNormalLimits,
}

impl Recommendation {
    /// Message shown to the operator on the results screen.
    pub fn message(self) -> &'static str {
        match self {
            Recommendation::InsufficientData => "Not enough data.",
            Recommendation::ReferralRecommended => {
                "Recommend audiology referral. Low score detected."
            }
            Recommendation::FollowUpRecommended => "Follow-up screening recommended.",
            Recommendation::WithinNormalLimits => {
                "Hearing appears within normal limits for this screen."
            }
        }
    }
}

/// Score one ear.
///
/// `responses` is that ear's response log; its levels are the ones the child
/// heard (pre-update), which is what the fallback averages.
pub fn summarize(staircase: &Staircase, responses: &[ResponseRecord], trim_percent: u8) -> Score {
    if let Some(level) = staircase.reversal_threshold() {
        return Score::Level(level);
    }
    let levels: Vec<u8> = responses.iter().map(|r| r.level).collect();
    match trimmed_mean(&levels, trim_percent) {
        Some(level) => Score::Level(level),
        None => Score::InsufficientData,
    }
}

/// Mean of `levels` after dropping `trim_percent`% from each end, rounded half up.
///
/// Keeps the sorted slice `[floor(n·p/100), ceil(n·(100−p)/100))`. `None` for
/// an empty input.
pub fn trimmed_mean(levels: &[u8], trim_percent: u8) -> Option<u8> {
    if levels.is_empty() {
        return None;
    }
    let mut sorted = levels.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let p = trim_percent.min(49) as usize;
    let lo = n * p / 100;
    let hi = (n * (100 - p)).div_ceil(100);
    let kept = if lo < hi { &sorted[lo..hi] } else { &sorted[..] };
    Some(rounded_mean(kept))
}

/// Combine both ears into a tier. The worse ear decides.
pub fn recommend(left: Score, right: Score) -> Recommendation {
    match (left.level(), right.level()) {
        (Some(l), Some(r)) => {
            let worst = l.min(r);
            if worst < REFERRAL_BELOW {
                Recommendation::ReferralRecommended
            } else if worst < FOLLOW_UP_BELOW {
                Recommendation::FollowUpRecommended
            } else {
                Recommendation::WithinNormalLimits
            }
        }
        _ => Recommendation::InsufficientData,
    }
}
