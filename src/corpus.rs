//! Phrase corpus - reference phrases for every supported action
//!
//! Each command binds one action to phrase lists keyed by locale. The corpus
//! is built once at startup (built-in table or a TOML file) and only read
//! afterwards.

use crate::action::{Action, Brightness, Color, Model, Power};
use crate::fuzzy::normalize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid corpus file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    UnsupportedLocale(String),

    #[error("corpus defines no commands")]
    NoCommands,

    #[error("a command cannot bind the UNKNOWN action")]
    UnknownAction,

    #[error("command {action} declares locale '{locale}' more than once")]
    DuplicateLocale { action: Action, locale: Locale },

    #[error("command {0} declares no phrases")]
    NoLocales(Action),

    #[error("command {action} has an empty phrase list for locale '{locale}'")]
    EmptyPhrases { action: Action, locale: Locale },

    #[error("command {action} has phrase '{phrase}' ({locale}) with no word characters")]
    BlankPhrase {
        action: Action,
        locale: Locale,
        phrase: String,
    },
}

/// Phrase language. Groups phrases only, never affects scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Locale {
    /// English
    En,
    /// Spanish
    Es,
    /// Basque
    Eu,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Es => write!(f, "es"),
            Locale::Eu => write!(f, "eu"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            "eu" => Ok(Locale::Eu),
            other => Err(format!("unsupported locale '{}' (expected en, es or eu)", other)),
        }
    }
}

/// One action and the phrases that trigger it
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    action: Action,
    phrases: BTreeMap<Locale, Vec<String>>,
}

impl CommandDefinition {
    /// Validates that the action is concrete, at least one locale is
    /// declared, and every phrase list holds matchable phrases.
    pub fn new(
        action: Action,
        phrases: BTreeMap<Locale, Vec<String>>,
    ) -> Result<Self, CorpusError> {
        if action == Action::Unknown {
            return Err(CorpusError::UnknownAction);
        }
        if phrases.is_empty() {
            return Err(CorpusError::NoLocales(action));
        }
        for (locale, list) in &phrases {
            if list.is_empty() {
                return Err(CorpusError::EmptyPhrases {
                    action,
                    locale: *locale,
                });
            }
            if let Some(phrase) = list.iter().find(|p| normalize(p).is_empty()) {
                return Err(CorpusError::BlankPhrase {
                    action,
                    locale: *locale,
                    phrase: phrase.clone(),
                });
            }
        }
        Ok(Self { action, phrases })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Phrase lists in locale order
    pub fn phrases(&self) -> impl Iterator<Item = (Locale, &[String])> {
        self.phrases.iter().map(|(l, p)| (*l, p.as_slice()))
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.values().map(Vec::len).sum()
    }
}

/// Ordered, immutable set of command definitions
#[derive(Debug, Clone)]
pub struct PhraseCorpus {
    commands: Vec<CommandDefinition>,
}

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    command: Vec<CommandEntry>,
}

#[derive(Deserialize)]
struct CommandEntry {
    action: Action,
    #[serde(default)]
    phrases: BTreeMap<String, Vec<String>>,
}

impl PhraseCorpus {
    pub fn new(commands: Vec<CommandDefinition>) -> Self {
        Self { commands }
    }

    /// Parse a corpus from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, CorpusError> {
        let file: CorpusFile = toml::from_str(text)?;
        if file.command.is_empty() {
            return Err(CorpusError::NoCommands);
        }

        let commands = file
            .command
            .into_iter()
            .map(|entry| {
                let mut phrases = BTreeMap::new();
                for (code, list) in entry.phrases {
                    let locale: Locale = code.parse().map_err(CorpusError::UnsupportedLocale)?;
                    // keys are case-insensitive, so "EN" and "en" collide
                    if phrases.insert(locale, list).is_some() {
                        return Err(CorpusError::DuplicateLocale {
                            action: entry.action,
                            locale,
                        });
                    }
                }
                CommandDefinition::new(entry.action, phrases)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { commands })
    }

    /// Load a corpus from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The phrase bank shipped with the binary
    pub fn builtin() -> Self {
        let commands = BUILTIN
            .iter()
            .map(|(action, locales)| CommandDefinition {
                action: *action,
                phrases: locales
                    .iter()
                    .map(|(locale, list)| (*locale, list.iter().map(|p| p.to_string()).collect()))
                    .collect(),
            })
            .collect();
        Self { commands }
    }

    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }

    pub fn phrase_count(&self) -> usize {
        self.commands.iter().map(CommandDefinition::phrase_count).sum()
    }
}

type PhraseTable = &'static [(Action, &'static [(Locale, &'static [&'static str])])];

// Basque phrases keep the "eusebio" wake prefix and the misrecognized
// spellings the speech model produces for them.
const BUILTIN: PhraseTable = &[
    (
        Action::Power(Power::On),
        &[
            (
                Locale::En,
                &["turn on the light", "switch on the light", "turn the light on", "light on"],
            ),
            (Locale::Es, &["encender la luz", "prender la luz", "enciende la luz"]),
            (
                Locale::Eu,
                &["eusebio piztu argia", "eusebio pistoardia", "piztu argia", "argia piztu"],
            ),
        ],
    ),
    (
        Action::Power(Power::Off),
        &[
            (
                Locale::En,
                &["turn off the light", "switch off the light", "turn the light off", "light off"],
            ),
            (Locale::Es, &["apagar la luz", "apaga la luz"]),
            (
                Locale::Eu,
                &[
                    "eusebio itzali argia",
                    "eusebio, italii arvija.",
                    "itzali argia",
                    "argia itzali",
                ],
            ),
        ],
    ),
    (
        Action::Brightness(Brightness::Up),
        &[
            (Locale::En, &["make the light brighter", "increase brightness", "more light"]),
            (Locale::Es, &["más brillo", "aumentar brillo", "más luz"]),
            (
                Locale::Eu,
                &["eusebio argi gehiago", "eusebio ardile yago", "argi gehiago"],
            ),
        ],
    ),
    (
        Action::Brightness(Brightness::Down),
        &[
            (Locale::En, &["make the light darker", "decrease brightness", "less light"]),
            (Locale::Es, &["menos brillo", "reducir brillo", "menos luz"]),
            (
                Locale::Eu,
                &["eusebio argi gutxiago", "argi gutxiago", "eusebio arribuciavo"],
            ),
        ],
    ),
    (
        Action::Model(Model::Change),
        &[
            (
                Locale::En,
                &["change the lamp model", "switch the lamp model", "change model"],
            ),
            (Locale::Es, &["cambiar el modelo de la lámpara", "cambiar modelo"]),
            (
                Locale::Eu,
                &["eusebio aldatu lanpara", "eusebio aldatulam paramota.", "lanpara aldatu"],
            ),
        ],
    ),
    (
        Action::Color(Color::Blue),
        &[
            (Locale::En, &["switch on blue light", "blue light", "turn on blue light"]),
            (Locale::Es, &["luz azul", "enciende la luz azul"]),
            (
                Locale::Eu,
                &["eusebio piztu argi urdina", "eusebio pistuardi-urdiña.", "argi urdina piztu"],
            ),
        ],
    ),
    (
        Action::Color(Color::Green),
        &[
            (Locale::En, &["switch on green light", "green light", "turn on green light"]),
            (Locale::Es, &["luz verde", "enciende la luz verde"]),
            (
                Locale::Eu,
                &["eusebio piztu argi berdea", "eusebio pistuardi verdea", "argi berdea piztu"],
            ),
        ],
    ),
    (
        Action::Color(Color::Red),
        &[
            (Locale::En, &["switch on red light", "red light", "turn on red light"]),
            (Locale::Es, &["luz roja", "enciende la luz roja"]),
            (
                Locale::Eu,
                &["eusebio piztu argi gorria", "eusebio pistuardi gorria", "argi gorria piztu"],
            ),
        ],
    ),
    (
        Action::Color(Color::White),
        &[
            (Locale::En, &["switch on white light", "white light", "turn on white light"]),
            (Locale::Es, &["luz blanca", "enciende la luz blanca"]),
            (
                Locale::Eu,
                &["eusebio piztu argi zuria", "argi zuria piztu"],
            ),
        ],
    ),
    (
        Action::Color(Color::Yellow),
        &[
            (Locale::En, &["switch on yellow light", "yellow light", "turn on yellow light"]),
            (Locale::Es, &["luz amarilla", "enciende la luz amarilla"]),
            (
                Locale::Eu,
                &["eusebio piztu argi horia", "argi horia piztu"],
            ),
        ],
    ),
    (
        Action::Color(Color::Purple),
        &[
            (Locale::En, &["switch on purple light", "purple light", "turn on purple light"]),
            (Locale::Es, &["luz morada", "enciende la luz morada"]),
            (
                Locale::Eu,
                &["eusebio piztu argi morea", "argi morea piztu"],
            ),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[command]]
action = { type = "POWER", value = "ON" }
[command.phrases]
en = ["light on", "turn on the light"]
es = ["encender la luz"]

[[command]]
action = { type = "COLOR", value = "RED" }
[command.phrases]
eu = ["argi gorria piztu"]
"#;

    #[test]
    fn test_builtin_is_valid() {
        let corpus = PhraseCorpus::builtin();
        assert_eq!(corpus.commands().len(), 11);
        for cmd in corpus.commands() {
            let phrases = cmd.phrases.clone();
            assert!(CommandDefinition::new(cmd.action(), phrases).is_ok());
            assert_ne!(cmd.action(), Action::Unknown);
        }
    }

    #[test]
    fn test_builtin_order() {
        let corpus = PhraseCorpus::builtin();
        let first = &corpus.commands()[0];
        assert_eq!(first.action(), Action::Power(Power::On));
        let locales: Vec<Locale> = first.phrases().map(|(l, _)| l).collect();
        assert_eq!(locales, vec![Locale::En, Locale::Es, Locale::Eu]);
        assert_eq!(first.phrases().next().unwrap().1[0], "turn on the light");
    }

    #[test]
    fn test_from_toml_str() {
        let corpus = PhraseCorpus::from_toml_str(SAMPLE).unwrap();
        assert_eq!(corpus.commands().len(), 2);
        assert_eq!(corpus.phrase_count(), 4);
        assert_eq!(corpus.commands()[1].action(), Action::Color(Color::Red));
    }

    #[test]
    fn test_rejects_invalid_action() {
        let text = r#"
[[command]]
action = { type = "POWER", value = "PURPLE" }
[command.phrases]
en = ["light"]
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(text),
            Err(CorpusError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_action() {
        let text = r#"
[[command]]
action = { type = "UNKNOWN" }
[command.phrases]
en = ["huh"]
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(text),
            Err(CorpusError::UnknownAction)
        ));

        let mut phrases = BTreeMap::new();
        phrases.insert(Locale::En, vec!["huh".to_string()]);
        assert!(matches!(
            CommandDefinition::new(Action::Unknown, phrases),
            Err(CorpusError::UnknownAction)
        ));
    }

    #[test]
    fn test_rejects_duplicate_locale() {
        let text = r#"
[[command]]
action = { type = "POWER", value = "ON" }
[command.phrases]
EN = ["light on"]
en = ["turn on the light"]
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(text),
            Err(CorpusError::DuplicateLocale { locale: Locale::En, .. })
        ));
    }

    #[test]
    fn test_rejects_unsupported_locale() {
        let text = r#"
[[command]]
action = { type = "POWER", value = "ON" }
[command.phrases]
fr = ["allume la lumière"]
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(text),
            Err(CorpusError::UnsupportedLocale(_))
        ));
    }

    #[test]
    fn test_rejects_empty_lists() {
        let no_locales = r#"
[[command]]
action = { type = "POWER", value = "ON" }
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(no_locales),
            Err(CorpusError::NoLocales(_))
        ));

        let empty_list = r#"
[[command]]
action = { type = "POWER", value = "ON" }
[command.phrases]
en = []
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(empty_list),
            Err(CorpusError::EmptyPhrases { locale: Locale::En, .. })
        ));

        let blank = r#"
[[command]]
action = { type = "POWER", value = "ON" }
[command.phrases]
es = ["¡!"]
"#;
        assert!(matches!(
            PhraseCorpus::from_toml_str(blank),
            Err(CorpusError::BlankPhrase { .. })
        ));

        assert!(matches!(
            PhraseCorpus::from_toml_str(""),
            Err(CorpusError::NoCommands)
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let corpus = PhraseCorpus::load(file.path()).unwrap();
        assert_eq!(corpus.commands().len(), 2);

        let missing = PhraseCorpus::load("/nonexistent/phrases.toml");
        assert!(matches!(missing, Err(CorpusError::Io { .. })));
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("EU".parse::<Locale>(), Ok(Locale::Eu));
        assert!("fr".parse::<Locale>().is_err());
    }
}
