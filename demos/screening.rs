//! # Console hearing screen
//!
//! Runs a full screening session in the terminal. There is no audio here: the
//! "stimulus" is printed with its ear, level and playback gain, and you answer
//! by typing the option number (1–4) or the word within five seconds.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example screening --features std
//! ```

use std::io::{self, BufRead, Write};
use std::thread;

use hearscreen_core::dictionary::builtin_dictionary;
use hearscreen_core::gain::{level_to_gain, level_to_speech_volume};
use hearscreen_core::sequencer::{
    Presenter, Response, Sequencer, SequencerConfig, StimulusRequest, TestReport, TrialOutcome,
};
use hearscreen_core::time::SystemTimeProvider;
use hearscreen_core::window::ResponseSlot;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Prints trials and routes typed answers to the open response window.
struct ConsolePresenter {
    slot: ResponseSlot,
    /// Option ids of the current trial, so "1".."4" can be mapped to ids.
    options: Arc<Mutex<Vec<String>>>,
}

impl Presenter for ConsolePresenter {
    fn present_stimulus(&mut self, request: &StimulusRequest<'_>) {
        thread::sleep(request.pre_stimulus_delay);
        println!();
        println!(
            "Trial {}/{} — {} level {} (gain {:.2}, speech volume {:.2}, pan {:+.0})",
            request.trial_number,
            request.max_trials,
            request.ear,
            request.level,
            level_to_gain(request.level),
            level_to_speech_volume(request.level),
            request.ear.pan(),
        );
        println!("  ♪ \"{}\"", request.target.display_word);
        for (i, option) in request.options.iter().enumerate() {
            println!("  [{}] {}", i + 1, option.display_word);
        }
        print!("> ");
        let _ = io::stdout().flush();
        *self.options.lock().unwrap() = request.options.iter().map(|o| o.id.clone()).collect();
    }

    fn await_response(&mut self, timeout: Duration) -> Response {
        self.slot.await_response(timeout)
    }

    fn show_feedback(&mut self, outcome: &TrialOutcome) {
        if outcome.timed_out {
            println!("\n  time's up — it was {}", outcome.target_id);
        } else if outcome.correct {
            println!("  ✓ correct");
        } else {
            println!("  ✗ it was {}", outcome.target_id);
        }
        thread::sleep(outcome.inter_trial_pause);
    }

    fn on_test_complete(&mut self, report: &TestReport) {
        println!();
        println!("Left ear score:  {}", report.left);
        println!("Right ear score: {}", report.right);
        println!("{}", report.tier.message());
    }
}

fn main() {
    env_logger::init();

    let slot = ResponseSlot::new();
    let options = Arc::new(Mutex::new(Vec::<String>::new()));

    let input_slot = slot.clone();
    let input_options = Arc::clone(&options);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let answer = line.trim().to_lowercase();
            let id = match answer.parse::<usize>() {
                Ok(n) => input_options.lock().unwrap().get(n.wrapping_sub(1)).cloned(),
                Err(_) => Some(answer),
            };
            if let Some(id) = id {
                if !input_slot.submit(id) {
                    println!("  (too late for that trial)");
                }
            }
        }
    });

    let dictionary = builtin_dictionary();
    let presenter = ConsolePresenter { slot, options };
    let mut sequencer = match Sequencer::new(
        &dictionary,
        SequencerConfig::default(),
        presenter,
        SystemTimeProvider,
        rand::thread_rng(),
    ) {
        Ok(seq) => seq,
        Err(e) => {
            eprintln!("cannot start screening: {e}");
            std::process::exit(1);
        }
    };
    sequencer.run();
}
