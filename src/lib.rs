//! # hearscreen-core
//!
//! The decision core of a picture-word hearing screen for young children.
//!
//! ---
//!
//! A word is played into one ear at a controlled level while four pictures are
//! shown. The child has five seconds to tap the one they heard. Each ear runs
//! its own **1-up/1-down staircase**: a correct answer makes the next word
//! quieter, a wrong answer or silence makes it louder. Where the direction
//! flips is a *reversal*; reversals cluster around the level the child hears
//! half the time, and their mean is the ear's score.
//!
//! Everything that makes sound or draws pixels lives outside this crate behind
//! the [`Presenter`] trait. The core only decides *which ear, how loud, which
//! words* and turns answers into scores.
//!
//! ## The pipeline
//!
//! ```text
//! Dictionary ─► TrialGenerator ─► Presenter::present_stimulus
//!                    ▲                         │
//!               select_ear               await_response (5 s)
//!                    │                         ▼
//!               TestState ◄──── record_response ─► Staircase::update
//!                    │
//!                    ▼
//!            summarize / recommend ─► TestReport
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`dictionary`] | [`Dictionary`], [`DictionaryEntry`] | Validated stimulus word list (≥ 4 unique ids) |
//! | [`trial`] | [`Trial`], [`TrialGenerator`] | Target + 3 distractors, shuffled |
//! | [`staircase`] | [`Staircase`], [`StaircaseConfig`] | Per-ear adaptive level, reversals, termination |
//! | [`sequencer`] | [`Sequencer`], [`TestState`], [`Presenter`] | Ear selection, response window, recording |
//! | [`scorer`] | [`Score`], [`Recommendation`] | Reversal mean / trimmed-mean fallback, tiers |
//! | [`window`] | `ResponseWindow`, `ResponseSlot` | Resolve-once timeout vs. answer race (requires `std`) |
//! | [`gain`] | [`gain::level_to_gain`] | Level → playback gain curves for presenters |
//! | [`time`] | [`TimeProvider`] | Timestamps for staircase history |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` (with `alloc`) by default. Enable the `std`
//! feature for the threaded response window and the wall clock. Enable the
//! `serde` feature to move configs, outcomes and reports across the host
//! boundary.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod dictionary;
pub mod ear;
pub mod error;
pub mod gain;
pub mod scorer;
pub mod sequencer;
pub mod staircase;
pub mod time;
pub mod trial;
#[cfg(feature = "std")]
pub mod window;

pub use dictionary::{builtin_dictionary, Dictionary, DictionaryEntry};
pub use ear::Ear;
pub use error::ScreeningError;
pub use scorer::{recommend, summarize, Recommendation, Score};
pub use sequencer::{
    select_ear, Presenter, Response, ResponseRecord, Sequencer, SequencerConfig,
    StimulusRequest, TestReport, TestState, TrialOutcome,
};
pub use staircase::{Direction, HistoryEntry, Staircase, StaircaseConfig};
pub use time::TimeProvider;
pub use trial::{Trial, TrialGenerator, OPTIONS_PER_TRIAL};
