/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Trial sequencing: ear selection, the response window, recording and termination.
//!
//! The [`Sequencer`] owns the whole [`TestState`] and advances it one trial at
//! a time. Presentation (audio, pictures, input) is behind the [`Presenter`]
//! trait, whose [`Presenter::await_response`] is the only suspension point.
//!
//! # Per-trial flow
//!
//! ```text
//! select_ear ─► Staircase::level ─► TrialGenerator::generate
//!      │                                     │
//!      │                  Presenter::present_stimulus
//!      │                                     │
//!      │                  Presenter::await_response(window)
//!      │                        │ Chosen(id) │ Timeout
//!      │                        ▼            ▼
//!      └──────────────── TestState::record_response ─► Presenter::show_feedback
//! ```
//!
//! # Invariants
//!
//! - Exactly one response is consumed per trial; the trial index advances once.
//! - The test stops before a trial when both staircases are done or the trial
//!   budget is spent.
//! - An unknown response id is scored as a wrong answer, never an error.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use crate::dictionary::{Dictionary, DictionaryEntry};
use crate::ear::Ear;
use crate::error::ScreeningError;
use crate::scorer::{recommend, summarize, Recommendation, Score};
use crate::staircase::{Staircase, StaircaseConfig, Update};
use crate::time::TimeProvider;
use crate::trial::{Trial, TrialGenerator};

// ─── Config ─────────────────────────────────────────────────────────────────

/// Session parameters.
///
/// The two pauses are advisory: they travel to the presenter with each
/// stimulus request and outcome, the sequencer itself never sleeps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SequencerConfig {
    /// Trial budget across both ears.
    pub max_trials: u32,
    /// How long the child has to answer.
    pub response_window: Duration,
    /// Delay between showing the choices and playing the word.
    pub pre_stimulus_delay: Duration,
    /// Pause after feedback before the next trial.
    pub inter_trial_pause: Duration,
    /// Settings shared by both ears' staircases.
    pub staircase: StaircaseConfig,
}

impl SequencerConfig {
    /// Check ranges, including the nested staircase config.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        if self.max_trials == 0 {
            return Err(ScreeningError::InvalidConfig("max_trials must be at least 1"));
        }
        if self.response_window.is_zero() {
            return Err(ScreeningError::InvalidConfig("response_window must be non-zero"));
        }
        self.staircase.validate()
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_trials: 20,
            response_window: Duration::from_secs(5),
            pre_stimulus_delay: Duration::from_millis(350),
            inter_trial_pause: Duration::from_millis(600),
            staircase: StaircaseConfig::default(),
        }
    }
}

// ─── Boundary types ─────────────────────────────────────────────────────────

/// How a response window closed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Response {
    /// The child picked the option with this id.
    Chosen(String),
    /// The window expired with no answer.
    Timeout,
}

/// What the presenter must show and play for one trial.
#[derive(Clone, Copy, Debug)]
pub struct StimulusRequest<'a> {
    /// 1-based trial counter for progress display.
    pub trial_number: u32,
    /// Trial budget.
    pub max_trials: u32,
    /// Ear to route the word to.
    pub ear: Ear,
    /// Presentation level in [1, 100].
    pub level: u8,
    /// The word to play.
    pub target: &'a DictionaryEntry,
    /// The shuffled choices to show.
    pub options: &'a [DictionaryEntry],
    /// Suggested delay between showing choices and playing the word.
    pub pre_stimulus_delay: Duration,
}

/// Result of one completed trial, reported for feedback display.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialOutcome {
    /// 0-based index of the trial.
    pub trial_index: u32,
    /// Ear tested.
    pub ear: Ear,
    /// Level the word was played at.
    pub level: u8,
    /// Correct option id.
    pub target_id: String,
    /// Option picked, `None` on timeout.
    pub chosen_id: Option<String>,
    /// Whether the answer was scored correct.
    pub correct: bool,
    /// Whether the window expired.
    pub timed_out: bool,
    /// Suggested pause before the next trial.
    pub inter_trial_pause: Duration,
}

/// Final scores handed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestReport {
    /// Left-ear score.
    pub left: Score,
    /// Right-ear score.
    pub right: Score,
    /// Combined tier.
    pub tier: Recommendation,
    /// Trials actually run.
    pub trials_run: u32,
}

/// The presentation/audio layer, as seen by the sequencer.
///
/// Playback failures stay on the presenter's side of this trait; the sequencer
/// only needs one [`Response`] per trial.
pub trait Presenter {
    /// Show the choices and play the target at `request.level` in `request.ear`.
    fn present_stimulus(&mut self, request: &StimulusRequest<'_>);

    /// Block until the child answers or `timeout` elapses. Must resolve exactly once.
    fn await_response(&mut self, timeout: Duration) -> Response;

    /// Mark the correct and wrong choices after a trial.
    fn show_feedback(&mut self, _outcome: &TrialOutcome) {}

    /// Receive the final scores.
    fn on_test_complete(&mut self, _report: &TestReport) {}
}

// ─── Test state ─────────────────────────────────────────────────────────────

/// One scored answer. Appended per ear, never edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseRecord {
    /// Ear tested.
    pub ear: Ear,
    /// Level the word was played at (before the staircase moved).
    pub level: u8,
    /// Whether the answer was correct.
    pub correct: bool,
}

/// Everything one screening session mutates.
#[derive(Clone, Debug, PartialEq)]
pub struct TestState {
    current_trial_index: u32,
    max_trials: u32,
    left: Staircase,
    right: Staircase,
    left_log: Vec<ResponseRecord>,
    right_log: Vec<ResponseRecord>,
}

impl TestState {
    /// Fresh state: two identical staircases, empty logs, trial 0.
    pub fn new(config: &SequencerConfig) -> Result<Self, ScreeningError> {
        config.validate()?;
        Ok(Self {
            current_trial_index: 0,
            max_trials: config.max_trials,
            left: Staircase::new(&config.staircase)?,
            right: Staircase::new(&config.staircase)?,
            left_log: Vec::new(),
            right_log: Vec::new(),
        })
    }

    /// 0-based index of the next trial; equals trials run so far.
    pub fn current_trial_index(&self) -> u32 {
        self.current_trial_index
    }

    /// 1-based number of the next trial.
    pub fn trial_number(&self) -> u32 {
        self.current_trial_index + 1
    }

    /// Trial budget.
    pub fn max_trials(&self) -> u32 {
        self.max_trials
    }

    /// Staircase for `ear`.
    pub fn staircase(&self, ear: Ear) -> &Staircase {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }

    /// Response log for `ear`, oldest first.
    pub fn responses(&self, ear: Ear) -> &[ResponseRecord] {
        match ear {
            Ear::Left => &self.left_log,
            Ear::Right => &self.right_log,
        }
    }

    /// Whether no further trial will run.
    pub fn is_finished(&self) -> bool {
        select_ear(self).is_none()
    }

    /// Log an answer for `ear` at its current level, then update its staircase.
    ///
    /// Advances the trial index. Returns the staircase update, or `None`
    /// without touching the log or the trial index if the ear was already done.
    pub fn record_response(&mut self, ear: Ear, correct: bool, timestamp_ms: u64) -> Option<Update> {
        let (stair, log) = match ear {
            Ear::Left => (&mut self.left, &mut self.left_log),
            Ear::Right => (&mut self.right, &mut self.right_log),
        };
        if stair.is_done() {
            warn!("{} ear staircase already complete; response not recorded", ear);
            return None;
        }
        log.push(ResponseRecord {
            ear,
            level: stair.level(),
            correct,
        });
        let update = stair.update(correct, timestamp_ms);
        self.current_trial_index += 1;
        update
    }
}

/// Ear for the next trial, or `None` when the test is over.
///
/// Parity picks the ear; a finished ear hands over to the other one. Stops on
/// an exhausted trial budget or when both staircases are done.
pub fn select_ear(state: &TestState) -> Option<Ear> {
    if state.current_trial_index >= state.max_trials {
        return None;
    }
    let preferred = Ear::for_trial_index(state.current_trial_index);
    [preferred, preferred.other()]
        .into_iter()
        .find(|&ear| !state.staircase(ear).is_done())
}

// ─── Sequencer ──────────────────────────────────────────────────────────────

/// Drives a screening session from first trial to report.
pub struct Sequencer<'d, P, T, R> {
    generator: TrialGenerator<'d>,
    config: SequencerConfig,
    state: TestState,
    presenter: P,
    clock: T,
    rng: R,
    completed: Option<TestReport>,
}

impl<'d, P, T, R> Sequencer<'d, P, T, R>
where
    P: Presenter,
    T: TimeProvider,
    R: Rng,
{
    /// Validate `config` and set up a fresh session.
    pub fn new(
        dictionary: &'d Dictionary,
        config: SequencerConfig,
        presenter: P,
        clock: T,
        rng: R,
    ) -> Result<Self, ScreeningError> {
        let state = TestState::new(&config)?;
        Ok(Self {
            generator: TrialGenerator::new(dictionary),
            config,
            state,
            presenter,
            clock,
            rng,
            completed: None,
        })
    }

    /// Run one trial. Returns `None`, doing nothing, once the test is over.
    pub fn step(&mut self) -> Option<TrialOutcome> {
        let ear = select_ear(&self.state)?;
        let level = self.state.staircase(ear).level();
        let trial: Trial = self.generator.generate(ear, &mut self.rng);
        let trial_index = self.state.current_trial_index();

        debug!(
            "trial {}/{}: {} level {} target {}",
            trial_index + 1,
            self.config.max_trials,
            ear,
            level,
            trial.target.id
        );
        self.presenter.present_stimulus(&StimulusRequest {
            trial_number: trial_index + 1,
            max_trials: self.config.max_trials,
            ear,
            level,
            target: &trial.target,
            options: &trial.options,
            pre_stimulus_delay: self.config.pre_stimulus_delay,
        });

        let response = self.presenter.await_response(self.config.response_window);
        let (chosen_id, correct, timed_out) = match response {
            Response::Chosen(id) => {
                if !trial.offers(&id) {
                    warn!("response id {:?} is not among the offered options; scoring as wrong", id);
                }
                let correct = trial.is_correct(&id);
                (Some(id), correct, false)
            }
            Response::Timeout => (None, false, true),
        };

        let now = self.clock.now_ms();
        if let Some(update) = self.state.record_response(ear, correct, now) {
            debug!(
                "{} staircase {} -> {} (step {})",
                ear,
                update.previous_level,
                update.level,
                self.state.staircase(ear).step()
            );
            if update.completed {
                info!(
                    "{} ear staircase complete after {} trials, reversals {:?}",
                    ear,
                    self.state.responses(ear).len(),
                    self.state.staircase(ear).reversals()
                );
            }
        }

        let outcome = TrialOutcome {
            trial_index,
            ear,
            level,
            target_id: trial.target.id,
            chosen_id,
            correct,
            timed_out,
            inter_trial_pause: self.config.inter_trial_pause,
        };
        self.presenter.show_feedback(&outcome);
        Some(outcome)
    }

    /// Run trials until the test ends, then report to the presenter.
    ///
    /// The presenter hears about completion once; later calls return the
    /// stored report.
    pub fn run(&mut self) -> TestReport {
        if let Some(report) = self.completed {
            return report;
        }
        while self.step().is_some() {}
        let report = self.report();
        info!(
            "screening finished after {} trials: left {} right {} ({:?})",
            report.trials_run, report.left, report.right, report.tier
        );
        self.presenter.on_test_complete(&report);
        self.completed = Some(report);
        report
    }

    /// Scores for the session so far.
    pub fn report(&self) -> TestReport {
        let trim = self.config.staircase.trim_percent;
        let left = summarize(self.state.staircase(Ear::Left), self.state.responses(Ear::Left), trim);
        let right = summarize(self.state.staircase(Ear::Right), self.state.responses(Ear::Right), trim);
        TestReport {
            left,
            right,
            tier: recommend(left, right),
            trials_run: self.state.current_trial_index(),
        }
    }

    /// Session state.
    pub fn state(&self) -> &TestState {
        &self.state
    }

    /// Session config.
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Consume the sequencer, returning the presenter and final state.
    pub fn into_parts(self) -> (P, TestState) {
        (self.presenter, self.state)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
