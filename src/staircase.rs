/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Per-ear adaptive staircase.
//!
//! A 1-up/1-down procedure: a correct answer lowers the level by `step`, a
//! wrong answer or timeout raises it. The staircase converges on the level
//! the child hears about half the time.
//!
//! - [`StaircaseConfig`]: starting level, step sizes and termination settings.
//! - [`Staircase`]: the mutable per-ear state, advanced only by [`Staircase::update`].
//!
//! # Invariants
//!
//! - **Level bounds**: `level` is always within [`MIN_LEVEL`, `MAX_LEVEL`].
//! - **Monotone reversals**: the reversal list only grows.
//! - **Latched completion**: once `done`, the staircase never changes again.
//! - **Single refinement**: the step is halved exactly once, on the update that
//!   records reversal number `halve_at_reversal` (not on every multiple of it).

use alloc::vec::Vec;

use log::debug;

use crate::error::ScreeningError;

/// Quietest presentable level.
pub const MIN_LEVEL: u8 = 1;

/// Loudest presentable level.
pub const MAX_LEVEL: u8 = 100;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Staircase parameters.
///
/// Defaults: start at 70 with step 8, halve the step on the 3rd reversal
/// (never below 1), stop after 6 reversals, estimate from the last 6 reversals,
/// trim 10% from each end in the fallback estimate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaircaseConfig {
    /// Level of the first presentation, in [1, 100].
    pub initial_level: u8,
    /// Step before refinement.
    pub initial_step: u8,
    /// Floor for the refined step.
    pub min_step: u8,
    /// Reversal count that completes the staircase.
    pub reversal_target: usize,
    /// Reversal count at which the step is halved.
    pub halve_at_reversal: usize,
    /// Number of most recent reversals averaged into the threshold.
    pub threshold_window: usize,
    /// Percent of response levels dropped from each end by the fallback estimate.
    pub trim_percent: u8,
}

impl StaircaseConfig {
    /// Check ranges. Called by [`Staircase::new`] and the sequencer config.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.initial_level) {
            return Err(ScreeningError::InvalidConfig("initial_level must be within 1..=100"));
        }
        if self.min_step == 0 {
            return Err(ScreeningError::InvalidConfig("min_step must be at least 1"));
        }
        if self.initial_step < self.min_step {
            return Err(ScreeningError::InvalidConfig("initial_step must not be below min_step"));
        }
        if self.reversal_target == 0 {
            return Err(ScreeningError::InvalidConfig("reversal_target must be at least 1"));
        }
        if self.threshold_window == 0 {
            return Err(ScreeningError::InvalidConfig("threshold_window must be at least 1"));
        }
        if self.trim_percent >= 50 {
            return Err(ScreeningError::InvalidConfig("trim_percent must be below 50"));
        }
        Ok(())
    }
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            initial_level: 70,
            initial_step: 8,
            min_step: 1,
            reversal_target: 6,
            halve_at_reversal: 3,
            threshold_window: 6,
            trim_percent: 10,
        }
    }
}

// ─── Direction / history ────────────────────────────────────────────────────

/// Direction the level moved on an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Louder, after a wrong answer or timeout.
    Up,
    /// Quieter, after a correct answer.
    Down,
}

impl Direction {
    /// `Down` for a correct answer, `Up` otherwise.
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// One applied update: the level *after* adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    /// Level after this update.
    pub level: u8,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Time of the update in milliseconds from the session clock.
    pub timestamp_ms: u64,
}

/// What a single [`Staircase::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Update {
    /// Level before the update.
    pub previous_level: u8,
    /// Level after the update.
    pub level: u8,
    /// A reversal was recorded at `previous_level`.
    pub reversal: bool,
    /// The step was halved on this update.
    pub refined: bool,
    /// This update completed the staircase.
    pub completed: bool,
}

// ─── Staircase ──────────────────────────────────────────────────────────────

/// Adaptive state for one ear.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Staircase {
    level: u8,
    step: u8,
    min_step: u8,
    last_direction: Option<Direction>,
    reversals: Vec<u8>,
    history: Vec<HistoryEntry>,
    done: bool,
    reversal_target: usize,
    halve_at_reversal: usize,
    threshold_window: usize,
}

impl Staircase {
    /// Fresh staircase at the configured starting level.
    pub fn new(config: &StaircaseConfig) -> Result<Self, ScreeningError> {
        config.validate()?;
        Ok(Self {
            level: config.initial_level,
            step: config.initial_step,
            min_step: config.min_step,
            last_direction: None,
            reversals: Vec::with_capacity(config.reversal_target),
            history: Vec::new(),
            done: false,
            reversal_target: config.reversal_target,
            halve_at_reversal: config.halve_at_reversal,
            threshold_window: config.threshold_window,
        })
    }

    /// Apply one answer. Returns `None` without touching state once done.
    ///
    /// Order of operations:
    /// 1. A direction change records the pre-adjustment level as a reversal;
    ///    the reversal numbered `halve_at_reversal` halves the step
    ///    (rounded half up, floored at `min_step`).
    /// 2. The level moves by the (possibly refined) step, clamped to [1, 100].
    /// 3. The post-adjustment level is appended to the history.
    /// 4. Reaching `reversal_target` reversals latches `done`.
    pub fn update(&mut self, correct: bool, timestamp_ms: u64) -> Option<Update> {
        if self.done {
            return None;
        }
        let previous_level = self.level;
        let direction = Direction::from_correct(correct);

        let mut reversal = false;
        let mut refined = false;
        if self.last_direction.is_some_and(|last| last != direction) {
            self.reversals.push(previous_level);
            reversal = true;
            debug!(
                "staircase reversal #{} at level {}",
                self.reversals.len(),
                previous_level
            );
            if self.reversals.len() == self.halve_at_reversal {
                let halved = (self.step / 2) + (self.step % 2);
                self.step = halved.max(self.min_step);
                refined = true;
                debug!("staircase step refined to {}", self.step);
            }
        }
        self.last_direction = Some(direction);

        self.level = match direction {
            Direction::Down => self.level.saturating_sub(self.step).max(MIN_LEVEL),
            Direction::Up => self.level.saturating_add(self.step).min(MAX_LEVEL),
        };

        self.history.push(HistoryEntry {
            level: self.level,
            correct,
            timestamp_ms,
        });

        let completed = self.reversals.len() >= self.reversal_target;
        if completed {
            self.done = true;
        }

        Some(Update {
            previous_level,
            level: self.level,
            reversal,
            refined,
            completed,
        })
    }

    /// Mean of the last `threshold_window` reversal levels, rounded half up.
    ///
    /// `None` when no reversal has been recorded yet.
    pub fn reversal_threshold(&self) -> Option<u8> {
        if self.reversals.is_empty() {
            return None;
        }
        let take = self.threshold_window.min(self.reversals.len());
        let recent = &self.reversals[self.reversals.len() - take..];
        Some(rounded_mean(recent))
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Level for the next presentation.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Current step size.
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Step floor.
    pub fn min_step(&self) -> u8 {
        self.min_step
    }

    /// Direction of the most recent update.
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Reversal levels in the order they occurred.
    pub fn reversals(&self) -> &[u8] {
        &self.reversals
    }

    /// Every applied update in order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Whether enough reversals have been collected.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Reversals needed to complete.
    pub fn reversal_target(&self) -> usize {
        self.reversal_target
    }
}

impl Default for Staircase {
    fn default() -> Self {
        let config = StaircaseConfig::default();
        Self {
            level: config.initial_level,
            step: config.initial_step,
            min_step: config.min_step,
            last_direction: None,
            reversals: Vec::new(),
            history: Vec::new(),
            done: false,
            reversal_target: config.reversal_target,
            halve_at_reversal: config.halve_at_reversal,
            threshold_window: config.threshold_window,
        }
    }
}

/// Integer mean rounded half up, matching `round(sum / n)` for non-negative levels.
pub(crate) fn rounded_mean(levels: &[u8]) -> u8 {
    let n = levels.len() as u32;
    let sum: u32 = levels.iter().map(|&l| l as u32).sum();
    ((2 * sum + n) / (2 * n)) as u8
}

// ─── Tests ──────────────────────────────────────────────────────────────────
