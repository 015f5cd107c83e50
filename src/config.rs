use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::matcher::DEFAULT_THRESHOLD;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum similarity for a transcript to count as a command
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Language label echoed back with every detection
    #[serde(default = "default_language")]
    pub language: String,
    /// External phrase corpus (TOML); the built-in table is used when unset
    #[serde(default)]
    pub corpus: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            language: default_language(),
            corpus: None,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_language() -> String {
    "en".into()
}

impl Config {
    /// Load from `path`, or `config.toml` in the working directory.
    ///
    /// A missing file means defaults. A file that exists but can't be read
    /// or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;

        // Relative corpus paths are relative to the config file
        if let (Some(corpus), Some(dir)) = (config.corpus.as_mut(), path.parent()) {
            if corpus.is_relative() {
                *corpus = dir.join(&*corpus);
            }
        }

        Ok(config)
    }

    /// Thresholds outside [0, 1] are allowed but almost certainly a mistake
    pub fn check_threshold(&self) {
        if !(0.0..=1.0).contains(&self.threshold) {
            tracing::warn!(
                threshold = self.threshold,
                "threshold outside [0, 1]: {}",
                if self.threshold > 1.0 {
                    "nothing will match"
                } else {
                    "every transcript will match"
                }
            );
        }
    }
}
