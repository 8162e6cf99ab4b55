//! Host-boundary serialisation of configs and reports.
//!
//! Run with: `cargo test --features serde`

#[cfg(feature = "serde")]
mod tests {
    use std::time::Duration;

    use hearscreen_core::dictionary::DictionaryEntry;
    use hearscreen_core::scorer::{Recommendation, Score};
    use hearscreen_core::sequencer::{SequencerConfig, TestReport};
    use hearscreen_core::staircase::StaircaseConfig;
    use hearscreen_core::Dictionary;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "max_trials": 30, "staircase": { "initial_level": 60 } }"#;
        let config: SequencerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_trials, 30);
        assert_eq!(config.response_window, Duration::from_secs(5));
        assert_eq!(
            config.staircase,
            StaircaseConfig {
                initial_level: 60,
                ..StaircaseConfig::default()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_config_deserialises_but_fails_validation() {
        let json = r#"{ "staircase": { "initial_level": 0 } }"#;
        let config: SequencerConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dictionary_from_host_json() {
        let json = r#"[
            { "id": "cat", "display_word": "Cat", "image": "img/cat.svg" },
            { "id": "dog", "display_word": "Dog" },
            { "id": "cup", "display_word": "Cup" },
            { "id": "egg", "display_word": "Egg" }
        ]"#;
        let entries: Vec<DictionaryEntry> = serde_json::from_str(json).unwrap();
        let dict = Dictionary::new(entries).unwrap();
        assert_eq!(dict.find("cat").unwrap().image.as_deref(), Some("img/cat.svg"));
        assert_eq!(dict.find("dog").unwrap().audio, None);
    }

    #[test]
    fn test_report_shape() {
        let report = TestReport {
            left: Score::Level(49),
            right: Score::InsufficientData,
            tier: Recommendation::InsufficientData,
            trials_run: 1,
        };
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["left"]["Level"], 49);
        assert_eq!(value["right"], "InsufficientData");
        assert_eq!(value["tier"], "InsufficientData");
        assert_eq!(value["trials_run"], 1);
    }
}
