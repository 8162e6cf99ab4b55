//! Trial generation over arbitrary dictionaries and seeds.

use hearscreen_core::{Dictionary, DictionaryEntry, Ear, TrialGenerator, OPTIONS_PER_TRIAL};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ─── helpers ─────────────────────────────────────────────────────────────────

fn dictionary(size: usize) -> Dictionary {
    let entries = (0..size)
        .map(|i| DictionaryEntry::new(format!("w{i}"), format!("Word {i}")))
        .collect();
    Dictionary::new(entries).unwrap()
}

// ─── properties ──────────────────────────────────────────────────────────────

proptest! {
    /// Four distinct options drawn from the dictionary, with the target among
    /// them exactly once, for any seed and any dictionary of 4 to 20 words.
    #[test]
    fn prop_trials_are_well_formed(seed in any::<u64>(), size in 4usize..=20) {
        let dict = dictionary(size);
        let generator = TrialGenerator::new(&dict);
        let mut rng = StdRng::seed_from_u64(seed);
        for i in 0..8u32 {
            let ear = Ear::for_trial_index(i);
            let trial = generator.generate(ear, &mut rng);
            prop_assert!(trial.validate().is_ok());
            prop_assert_eq!(trial.options.len(), OPTIONS_PER_TRIAL);
            prop_assert_eq!(trial.ear, ear);
            prop_assert!(trial.options.iter().all(|o| dict.find(&o.id).is_some()));
            prop_assert_eq!(
                trial.options.iter().filter(|o| o.id == trial.target.id).count(),
                1
            );
        }
    }
}

// ─── scenarios ───────────────────────────────────────────────────────────────

#[test]
fn test_four_word_dictionary_offers_every_word() {
    let dict = dictionary(4);
    let generator = TrialGenerator::new(&dict);
    let mut rng = StdRng::seed_from_u64(7);
    let trial = generator.generate(Ear::Right, &mut rng);
    let mut ids: Vec<&str> = trial.options.iter().map(|o| o.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["w0", "w1", "w2", "w3"]);
}
