//! Matcher - picks the action whose reference phrase best resembles a transcript
//!
//! Every call scans the whole corpus. Scores must be strictly greater to
//! replace the current best, so ties keep the phrase seen first in
//! corpus, locale, phrase order.

use crate::action::Action;
use crate::corpus::{Locale, PhraseCorpus};
use crate::fuzzy::{normalize, similarity};
use serde::Serialize;

/// Minimum score for a match unless the caller overrides it
pub const DEFAULT_THRESHOLD: f64 = 0.80;

/// Outcome of matching one transcript
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched: bool,
    /// Best score, rounded to 2 decimals (reported even without a match)
    pub score: f64,
    pub action: Action,
}

/// A reference phrase and how well it scored
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPhrase<'a> {
    pub action: Action,
    pub locale: Locale,
    pub phrase: &'a str,
    pub score: f64,
}

/// Reference phrase with its normalized form cached
#[derive(Debug)]
struct Candidate {
    action: Action,
    locale: Locale,
    phrase: String,
    normalized: String,
}

/// Matches transcripts against a read-only phrase corpus.
///
/// Holds no mutable state, so one matcher can serve any number of threads.
#[derive(Debug)]
pub struct Matcher {
    corpus: PhraseCorpus,
    candidates: Vec<Candidate>,
}

impl Matcher {
    pub fn new(corpus: PhraseCorpus) -> Self {
        let candidates = corpus
            .commands()
            .iter()
            .flat_map(|cmd| {
                cmd.phrases().flat_map(move |(locale, phrases)| {
                    phrases.iter().map(move |phrase| Candidate {
                        action: cmd.action(),
                        locale,
                        phrase: phrase.clone(),
                        normalized: normalize(phrase),
                    })
                })
            })
            .collect();

        Self { corpus, candidates }
    }

    pub fn corpus(&self) -> &PhraseCorpus {
        &self.corpus
    }

    /// Match with [`DEFAULT_THRESHOLD`]
    pub fn detect(&self, transcript: &str) -> MatchResult {
        self.detect_action(transcript, DEFAULT_THRESHOLD)
    }

    /// Find the best matching action for `transcript`.
    ///
    /// The threshold is not range checked: above 1.0 nothing matches, at or
    /// below 0.0 any transcript sharing a character with the corpus does.
    #[hotpath::measure]
    pub fn detect_action(&self, transcript: &str, threshold: f64) -> MatchResult {
        let input = normalize(transcript);

        let mut best_score = 0.0;
        let mut best_action = None;
        for candidate in &self.candidates {
            let score = similarity(&input, &candidate.normalized);
            if score > best_score {
                best_score = score;
                best_action = Some(candidate.action);
                if score >= 1.0 {
                    break;
                }
            }
        }

        let score = round2(best_score);
        let result = match best_action {
            Some(action) if best_score >= threshold => MatchResult {
                matched: true,
                score,
                action,
            },
            _ => MatchResult {
                matched: false,
                score,
                action: Action::Unknown,
            },
        };

        tracing::debug!(
            transcript,
            normalized = %input,
            best = ?best_action,
            score = best_score,
            threshold,
            matched = result.matched,
            "detect"
        );
        result
    }

    /// The `limit` highest scoring reference phrases, best first.
    ///
    /// Equal scores stay in corpus order, so the first entry is always the
    /// candidate `detect_action` would pick.
    pub fn explain(&self, transcript: &str, limit: usize) -> Vec<ScoredPhrase<'_>> {
        let input = normalize(transcript);
        let mut scored: Vec<ScoredPhrase<'_>> = self
            .candidates
            .iter()
            .map(|c| ScoredPhrase {
                action: c.action,
                locale: c.locale,
                phrase: &c.phrase,
                score: similarity(&input, &c.normalized),
            })
            .collect();

        // stable sort keeps enumeration order among ties
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        scored
    }
}

/// Two decimals, exact halves go to the even neighbour (0.125 -> 0.12)
fn round2(score: f64) -> f64 {
    (score * 100.0).round_ties_even() / 100.0
}
