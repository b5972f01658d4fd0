use rand::prelude::*;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use unicode_normalization::UnicodeNormalization;

/// Given a raw entry from a word list, turn it into the form we'll place in the grid. Case is
/// preserved; Unicode combining forms are composed so that each grid cell holds one `char`.
#[must_use]
pub fn normalize_word(raw: &str) -> String {
    raw.nfc().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    InvalidPath(String),
    InvalidWord(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            WordListError::InvalidPath(path) => format!("Can’t read file: “{path}”"),
            WordListError::InvalidWord(word) => {
                format!("Word list contains invalid word: “{word}”")
            }
        };
        write!(f, "{string}")
    }
}

/// Configuration describing a source of word list entries.
pub enum WordListSourceConfig {
    Memory { id: String, words: Vec<String> },
    File { id: String, path: OsString },
    FileContents { id: String, contents: &'static str },
}

impl WordListSourceConfig {
    /// The unique, persistent id of this word list.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            WordListSourceConfig::Memory { id, .. }
            | WordListSourceConfig::FileContents { id, .. }
            | WordListSourceConfig::File { id, .. } => id.clone(),
        }
    }
}

/// Normalize a single entry, recording an error if it can't be used. Returns `None` for entries
/// that should be skipped.
fn parse_entry(raw: &str, errors: &mut Vec<WordListError>) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let normalized = normalize_word(raw);
    if normalized.chars().any(char::is_control) {
        errors.push(WordListError::InvalidWord(raw.trim().into()));
        return None;
    }

    Some(normalized)
}

fn parse_word_list_file_contents(
    file_contents: &str,
    errors: &mut Vec<WordListError>,
) -> Vec<String> {
    file_contents
        .lines()
        .map_while(|line| {
            if errors.len() > 100 {
                return None;
            }
            Some(parse_entry(line, errors))
        })
        .flatten()
        .collect()
}

fn load_words_from_source(source: &WordListSourceConfig) -> (Vec<String>, Vec<WordListError>) {
    let mut errors = vec![];

    let words = match source {
        WordListSourceConfig::Memory { words, .. } => words
            .iter()
            .filter_map(|word| parse_entry(word, &mut errors))
            .collect(),

        WordListSourceConfig::File { path, .. } => {
            if let Ok(contents) = fs::read_to_string(path) {
                parse_word_list_file_contents(&contents, &mut errors)
            } else {
                errors.push(WordListError::InvalidPath(path.to_string_lossy().into()));
                vec![]
            }
        }

        WordListSourceConfig::FileContents { contents, .. } => {
            parse_word_list_file_contents(contents, &mut errors)
        }
    };

    (words, errors)
}

/// The ordered list of words a layout search draws from. Order matters: the first word is the one
/// every layout is built around.
#[derive(Debug, Default)]
pub struct WordList {
    pub words: Vec<String>,

    /// The maximum word length provided when configuring the `WordList`, if any.
    pub max_length: Option<usize>,

    /// Errors encountered while loading each source, keyed by source id.
    pub source_errors: HashMap<String, Vec<WordListError>>,
}

impl WordList {
    /// Construct a new `WordList` from the given sources in order, dropping duplicates (the first
    /// occurrence wins) and any entries longer than `max_length`.
    #[must_use]
    pub fn new(source_configs: &[WordListSourceConfig], max_length: Option<usize>) -> WordList {
        let mut seen_words: HashSet<String> = HashSet::new();
        let mut instance = WordList {
            max_length,
            ..WordList::default()
        };

        for source in source_configs {
            let (words, errors) = load_words_from_source(source);
            for word in words {
                if max_length.map_or(false, |max_length| word.chars().count() > max_length) {
                    continue;
                }
                if seen_words.insert(word.clone()) {
                    instance.words.push(word);
                }
            }
            instance.source_errors.insert(source.id(), errors);
        }

        instance
    }

    /// Get all errors from all sources, keyed by source id.
    #[must_use]
    pub fn get_source_errors(&self) -> &HashMap<String, Vec<WordListError>> {
        &self.source_errors
    }

    /// Reorder the words pseudo-randomly. The same seed always gives the same order for the same
    /// list, so a run can be reproduced.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng: SmallRng = SeedableRng::seed_from_u64(seed);
        self.words.shuffle(&mut rng);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
