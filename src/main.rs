use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use eusebio::config::Config;
use eusebio::repl;
use eusebio::{Detection, Locale, Matcher, PhraseCorpus};

#[derive(Parser)]
#[command(name = "eusebio", version, about = "Match spoken transcripts to lamp commands")]
struct Cli {
    /// Config file [default: config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Phrase corpus TOML, overrides the config file
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match one transcript and print the result as JSON
    Detect {
        /// Transcript text (multiple words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        opts: MatchOpts,

        /// Print the N best scoring reference phrases to stderr
        #[arg(long, value_name = "N")]
        explain: Option<usize>,
    },
    /// Match transcripts read from stdin, one per line
    Repl {
        #[command(flatten)]
        opts: MatchOpts,
    },
    /// List the reference phrases
    Phrases {
        /// Only show phrases for this locale (en, es, eu)
        #[arg(long)]
        locale: Option<Locale>,
    },
}

#[derive(clap::Args)]
struct MatchOpts {
    /// Minimum score to accept a match [default: from config, 0.80]
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Language label to echo back [default: from config, "en"]
    #[arg(short, long)]
    lang: Option<String>,
}

impl MatchOpts {
    /// Command line flags win over the config file
    fn apply(self, config: &mut Config) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(lang) = self.lang {
            config.language = lang;
        }
        config.check_threshold();
    }
}

#[hotpath::main]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eusebio=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    let matcher = load_matcher(cli.corpus.as_deref().or(config.corpus.as_deref()))?;

    match cli.command {
        Command::Detect {
            text,
            opts,
            explain,
        } => {
            opts.apply(&mut config);
            let text = text.join(" ");
            if let Some(limit) = explain {
                print_explain(&matcher, &text, limit);
            }
            let detection = Detection::detect(&matcher, &text, &config.language, config.threshold);
            println!("{}", serde_json::to_string_pretty(&detection)?);
        }
        Command::Repl { opts } => {
            opts.apply(&mut config);
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            let count = repl::run(stdin, stdout, &matcher, &config.language, config.threshold)?;
            tracing::info!(count, "stdin closed");
        }
        Command::Phrases { locale } => print_phrases(matcher.corpus(), locale),
    }

    Ok(())
}

fn load_matcher(path: Option<&Path>) -> Result<Matcher> {
    let corpus = match path {
        Some(path) => PhraseCorpus::load(path)
            .with_context(|| format!("failed to load phrase corpus {}", path.display()))?,
        None => PhraseCorpus::builtin(),
    };
    tracing::info!(
        commands = corpus.commands().len(),
        phrases = corpus.phrase_count(),
        source = %path.map_or("built-in".into(), |p| p.display().to_string()),
        "phrase corpus loaded"
    );
    Ok(Matcher::new(corpus))
}

fn print_explain(matcher: &Matcher, text: &str, limit: usize) {
    for scored in matcher.explain(text, limit) {
        eprintln!(
            "{:>6.3}  {:<16} {}  {}",
            scored.score,
            scored.action.to_string(),
            scored.locale,
            scored.phrase
        );
    }
}

fn print_phrases(corpus: &PhraseCorpus, only: Option<Locale>) {
    for command in corpus.commands() {
        println!("{}", command.action());
        for (locale, phrases) in command.phrases() {
            if only.is_some_and(|l| l != locale) {
                continue;
            }
            for phrase in phrases {
                println!("  [{}] {}", locale, phrase);
            }
        }
    }
}
