//! Response payload handed back to whatever transport invoked the matcher

use crate::action::Action;
use crate::matcher::{MatchResult, Matcher};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub success: bool,
    /// Transcript as received
    pub text: String,
    /// Caller supplied label, never used for matching
    pub language: String,
    pub action: Action,
    pub confidence: f64,
    pub matched: bool,
}

impl Detection {
    pub fn new(text: impl Into<String>, language: impl Into<String>, result: MatchResult) -> Self {
        Self {
            success: true,
            text: text.into(),
            language: language.into(),
            action: result.action,
            confidence: result.score,
            matched: result.matched,
        }
    }

    /// Run the matcher and wrap the outcome
    pub fn detect(matcher: &Matcher, text: &str, language: &str, threshold: f64) -> Self {
        Self::new(text, language, matcher.detect_action(text, threshold))
    }
}
