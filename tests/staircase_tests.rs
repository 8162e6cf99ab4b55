//! Staircase and scorer behaviour through the public API.
//!
//! Property tests cover arbitrary answer sequences; the scenario tests pin the
//! exact level traces the screen is expected to produce.

use hearscreen_core::scorer::{recommend, summarize, trimmed_mean, Recommendation, Score};
use hearscreen_core::sequencer::ResponseRecord;
use hearscreen_core::staircase::{Direction, Staircase, StaircaseConfig, MAX_LEVEL, MIN_LEVEL};
use hearscreen_core::Ear;
use proptest::prelude::*;

// ─── helpers ─────────────────────────────────────────────────────────────────

fn feed(stair: &mut Staircase, answers: &[bool]) -> Vec<u8> {
    answers
        .iter()
        .enumerate()
        .filter_map(|(t, &c)| stair.update(c, t as u64).map(|u| u.level))
        .collect()
}

fn heard_levels(answers: &[bool]) -> (Staircase, Vec<ResponseRecord>) {
    let mut stair = Staircase::default();
    let mut log = Vec::new();
    for (t, &correct) in answers.iter().enumerate() {
        if stair.is_done() {
            break;
        }
        log.push(ResponseRecord {
            ear: Ear::Left,
            level: stair.level(),
            correct,
        });
        stair.update(correct, t as u64);
    }
    (stair, log)
}

// ─── properties ──────────────────────────────────────────────────────────────

proptest! {
    /// Level stays in [1, 100] after every update, whatever the answers.
    #[test]
    fn prop_level_always_in_bounds(answers in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut stair = Staircase::default();
        for (t, c) in answers.into_iter().enumerate() {
            stair.update(c, t as u64);
            prop_assert!(stair.level() >= MIN_LEVEL && stair.level() <= MAX_LEVEL);
        }
    }

    /// Reversals only grow, `done` never un-latches, and `done` flips exactly
    /// on the update that records the sixth reversal.
    #[test]
    fn prop_reversals_monotone_and_done_latched(answers in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut stair = Staircase::default();
        let mut prev_reversals = 0usize;
        let mut was_done = false;
        for (t, c) in answers.into_iter().enumerate() {
            let update = stair.update(c, t as u64);
            let n = stair.reversals().len();
            prop_assert!(n >= prev_reversals);
            if was_done {
                prop_assert!(update.is_none());
                prop_assert!(stair.is_done());
            } else {
                prop_assert_eq!(stair.is_done(), n >= 6);
                prop_assert_eq!(update.map(|u| u.completed), Some(n >= 6));
            }
            prop_assert!(n <= 6);
            prev_reversals = n;
            was_done = stair.is_done();
        }
    }

    /// History length equals the number of applied updates.
    #[test]
    fn prop_history_counts_applied_updates(answers in prop::collection::vec(any::<bool>(), 0..100)) {
        let mut stair = Staircase::default();
        let applied = feed(&mut stair, &answers);
        prop_assert_eq!(stair.history().len(), applied.len());
    }

    /// A reversal-based score is always a valid level.
    #[test]
    fn prop_score_in_range(answers in prop::collection::vec(any::<bool>(), 1..60)) {
        let (stair, log) = heard_levels(&answers);
        match summarize(&stair, &log, 10) {
            Score::Level(l) => prop_assert!((1..=100).contains(&l)),
            Score::InsufficientData => prop_assert!(false, "answers were given"),
        }
    }
}

// ─── scenarios ───────────────────────────────────────────────────────────────

#[test]
fn test_two_down_two_up_trace() {
    let mut stair = Staircase::default();
    let levels = feed(&mut stair, &[true, true, false, false, true]);
    assert_eq!(levels, [62, 54, 62, 70, 62]);
    assert_eq!(stair.reversals(), &[54, 70]);
    assert_eq!(stair.last_direction(), Some(Direction::Down));
}

#[test]
fn test_strict_alternation_full_run() {
    let mut stair = Staircase::default();
    // c i c i c i c: reversals on every transition after the first answer.
    let levels = feed(&mut stair, &[true, false, true, false, true, false, true]);
    // 70→62→70→62→(step 4)66→62→66→62
    assert_eq!(levels, [62, 70, 62, 66, 62, 66, 62]);
    assert_eq!(stair.reversals(), &[62, 70, 62, 66, 62, 66]);
    assert_eq!(stair.step(), 4);
    assert!(stair.is_done());
    // Mean of the six reversals: 388 / 6 = 64.67 → 65.
    assert_eq!(stair.reversal_threshold(), Some(65));
}

#[test]
fn test_larger_reversal_target_keeps_window() {
    let config = StaircaseConfig {
        reversal_target: 8,
        ..StaircaseConfig::default()
    };
    let mut stair = Staircase::new(&config).unwrap();
    let answers: Vec<bool> = (0..9).map(|i| i % 2 == 0).collect();
    feed(&mut stair, &answers);
    assert_eq!(stair.reversals().len(), 8);
    assert!(stair.is_done());
    let last_six = &stair.reversals()[2..];
    let sum: u32 = last_six.iter().map(|&l| l as u32).sum();
    let expected = ((sum as f64) / 6.0).round() as u8;
    assert_eq!(stair.reversal_threshold(), Some(expected));
}

#[test]
fn test_never_reversing_ear_uses_fallback() {
    // Ten wrong answers in a row: climbs to the ceiling, never reverses.
    let (stair, log) = heard_levels(&[false; 10]);
    assert!(stair.reversals().is_empty());
    assert_eq!(stair.level(), MAX_LEVEL);
    let levels: Vec<u8> = log.iter().map(|r| r.level).collect();
    assert_eq!(summarize(&stair, &log, 10), Score::Level(trimmed_mean(&levels, 10).unwrap()));
    assert_eq!(summarize(&stair, &log, 10), Score::Level(95));
}

#[test]
fn test_recommendation_examples() {
    assert_eq!(
        recommend(Score::Level(25), Score::Level(80)),
        Recommendation::ReferralRecommended
    );
    assert_eq!(
        recommend(Score::Level(55), Score::Level(65)),
        Recommendation::FollowUpRecommended
    );
    assert_eq!(
        recommend(Score::Level(75), Score::Level(80)),
        Recommendation::WithinNormalLimits
    );
    assert_eq!(
        recommend(Score::InsufficientData, Score::Level(80)),
        Recommendation::InsufficientData
    );
}
