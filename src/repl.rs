//! REPL input handling - one transcript per line, one JSON payload per line

use crate::detection::Detection;
use crate::matcher::Matcher;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Match every non-empty line of `input`, writing payloads to `output`.
///
/// Returns the number of transcripts processed once `input` hits EOF.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    matcher: &Matcher,
    language: &str,
    threshold: f64,
) -> Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line.context("failed to read transcript")?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let detection = Detection::detect(matcher, text, language, threshold);
        serde_json::to_writer(&mut output, &detection)?;
        writeln!(output)?;
        output.flush()?;
        count += 1;
    }
    Ok(count)
}
