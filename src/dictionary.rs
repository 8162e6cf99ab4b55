//! Stimulus words and the validated dictionary they are drawn from.
//!
//! A [`Dictionary`] can only be built through [`Dictionary::new`], which
//! rejects lists too small to fill a trial and lists with repeated ids. Every
//! downstream component takes a `&Dictionary`, so an invalid word list stops
//! the session before the first trial.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::error::ScreeningError;
use crate::trial::OPTIONS_PER_TRIAL;

/// A stimulus word. Opaque to the core beyond its id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DictionaryEntry {
    /// Stable unique identifier, also the response id for this choice.
    pub id: String,
    /// Word shown under the picture and spoken as the stimulus.
    pub display_word: String,
    /// Picture asset path for the presentation layer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<String>,
    /// Recorded audio asset path for the presentation layer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub audio: Option<String>,
}

impl DictionaryEntry {
    /// Entry with no asset paths.
    pub fn new(id: impl Into<String>, display_word: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_word: display_word.into(),
            image: None,
            audio: None,
        }
    }

    /// Attach conventional `assets/img/<id>.svg` and `assets/audio/<id>.wav` paths.
    pub fn with_default_assets(mut self) -> Self {
        let mut image = String::from("assets/img/");
        image.push_str(&self.id);
        image.push_str(".svg");
        let mut audio = String::from("assets/audio/");
        audio.push_str(&self.id);
        audio.push_str(".wav");
        self.image = Some(image);
        self.audio = Some(audio);
        self
    }
}

/// An ordered, validated word list with at least [`OPTIONS_PER_TRIAL`] unique ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    /// Validate and wrap a word list.
    ///
    /// Fails with [`ScreeningError::DictionaryTooSmall`] below four entries and
    /// with [`ScreeningError::DuplicateEntry`] when ids repeat.
    pub fn new(entries: Vec<DictionaryEntry>) -> Result<Self, ScreeningError> {
        if entries.len() < OPTIONS_PER_TRIAL {
            return Err(ScreeningError::DictionaryTooSmall {
                len: entries.len(),
                required: OPTIONS_PER_TRIAL,
            });
        }
        {
            let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
            for entry in &entries {
                if !seen.insert(entry.id.as_str()) {
                    return Err(ScreeningError::DuplicateEntry {
                        id: entry.id.to_string(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Number of entries (always ≥ 4).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, in load order.
    pub fn get(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    /// Look up an entry by id.
    pub fn find(&self, id: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }
}

const BUILTIN_WORDS: [(&str, &str); 20] = [
    ("cat", "Cat"),
    ("dog", "Dog"),
    ("ball", "Ball"),
    ("milk", "Milk"),
    ("cow", "Cow"),
    ("duck", "Duck"),
    ("car", "Car"),
    ("tree", "Tree"),
    ("fish", "Fish"),
    ("bird", "Bird"),
    ("shoe", "Shoe"),
    ("hat", "Hat"),
    ("book", "Book"),
    ("cup", "Cup"),
    ("egg", "Egg"),
    ("star", "Star"),
    ("apple", "Apple"),
    ("banana", "Banana"),
    ("chair", "Chair"),
    ("bed", "Bed"),
];

/// The 20-word starter dictionary of concrete nouns familiar to young children,
/// with conventional asset paths attached.
pub fn builtin_dictionary() -> Dictionary {
    Dictionary {
        entries: BUILTIN_WORDS
            .iter()
            .map(|&(id, word)| DictionaryEntry::new(id, word).with_default_assets())
            .collect(),
    }
}
