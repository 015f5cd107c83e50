//! Maps spoken-language transcripts to lamp control actions by fuzzy matching
//! them against a multilingual bank of reference phrases.
//!
//! ```no_run
//! use eusebio::{Matcher, PhraseCorpus};
//!
//! let matcher = Matcher::new(PhraseCorpus::builtin());
//! let result = matcher.detect("apaga la luz");
//! assert!(result.matched);
//! ```

pub mod action;
pub mod config;
pub mod corpus;
pub mod detection;
pub mod fuzzy;
pub mod matcher;
pub mod repl;

pub use action::{Action, ActionType};
pub use corpus::{CommandDefinition, Locale, PhraseCorpus};
pub use detection::Detection;
pub use matcher::{DEFAULT_THRESHOLD, MatchResult, Matcher};
