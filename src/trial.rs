/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Trial generation: one spoken target plus three distractors.
//!
//! # Invariants
//!
//! - Every trial has exactly [`OPTIONS_PER_TRIAL`] options.
//! - Options are unique by id and contain the target exactly once.
//! - Option order is a uniform random permutation.

use alloc::vec::Vec;

use hashbrown::HashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dictionary::{Dictionary, DictionaryEntry};
use crate::ear::Ear;
use crate::error::ScreeningError;

/// Picture/word choices shown per trial.
pub const OPTIONS_PER_TRIAL: usize = 4;

/// One presentation: the spoken target, the shuffled choices and the ear.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trial {
    /// The word that is played.
    pub target: DictionaryEntry,
    /// Shuffled choices, target included.
    pub options: Vec<DictionaryEntry>,
    /// Ear the target is routed to.
    pub ear: Ear,
}

impl Trial {
    /// Whether `id` is one of the offered options.
    pub fn offers(&self, id: &str) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    /// Whether choosing `id` answers this trial correctly.
    pub fn is_correct(&self, id: &str) -> bool {
        self.target.id == id
    }

    /// Check the option invariants.
    ///
    /// A trial produced by [`TrialGenerator`] always passes; a failure here
    /// means a bug, not bad input.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        if self.options.len() != OPTIONS_PER_TRIAL {
            return Err(ScreeningError::MalformedTrial("option count is not 4"));
        }
        let mut ids: HashSet<&str> = HashSet::with_capacity(OPTIONS_PER_TRIAL);
        if !self.options.iter().all(|o| ids.insert(o.id.as_str())) {
            return Err(ScreeningError::MalformedTrial("duplicate option id"));
        }
        let target_hits = self
            .options
            .iter()
            .filter(|o| o.id == self.target.id)
            .count();
        if target_hits != 1 {
            return Err(ScreeningError::MalformedTrial("target missing from options"));
        }
        Ok(())
    }
}

/// Builds trials from a validated [`Dictionary`].
///
/// Holds no state besides the borrowed dictionary; all randomness comes from
/// the caller's RNG so sessions can be replayed from a seed.
#[derive(Clone, Copy, Debug)]
pub struct TrialGenerator<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> TrialGenerator<'a> {
    /// Generator over `dictionary`. The dictionary's size was checked at construction.
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Draw a target uniformly, add three distinct distractors by rejection
    /// sampling, then Fisher–Yates shuffle the four options.
    pub fn generate<R: Rng + ?Sized>(&self, ear: Ear, rng: &mut R) -> Trial {
        let len = self.dictionary.len();
        let target_index = rng.gen_range(0..len);

        let mut picked: Vec<usize> = Vec::with_capacity(OPTIONS_PER_TRIAL);
        picked.push(target_index);
        while picked.len() < OPTIONS_PER_TRIAL {
            let candidate = rng.gen_range(0..len);
            if !picked.contains(&candidate) {
                picked.push(candidate);
            }
        }
        picked.shuffle(rng);

        let entries = self.dictionary.entries();
        let trial = Trial {
            target: entries[target_index].clone(),
            options: picked.iter().map(|&i| entries[i].clone()).collect(),
            ear,
        };
        debug_assert!(trial.validate().is_ok(), "generated trial violates option invariants");
        trial
    }
}
