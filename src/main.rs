//! wordtrie CLI - Command line interface for trie dictionary files
//!
//! Every invocation loads the trie file, applies one command and, for
//! mutating commands, writes the trie back.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use wordtrie::{TextSymbol, Trie};

#[derive(Parser)]
#[command(name = "wordtrie")]
#[command(about = "A string dictionary stored as a prefix tree")]
#[command(version)]
struct Cli {
    /// Path to the trie file
    #[arg(short, long, default_value = "words.trie1")]
    file: PathBuf,

    /// Bytes per symbol; inferred from a .trie1/.trie2/.trie4 extension if omitted
    #[arg(short, long)]
    width: Option<Width>,

    /// Output format (json or text)
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Symbol width of a trie file
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Width {
    /// UTF-8 bytes
    #[value(name = "1")]
    One,
    /// UTF-16 code units
    #[value(name = "2")]
    Two,
    /// Unicode scalar values
    #[value(name = "4")]
    Four,
}

impl Width {
    fn from_path(path: &Path) -> Option<Width> {
        match path.extension()?.to_str()? {
            "trie1" => Some(Width::One),
            "trie2" => Some(Width::Two),
            "trie4" => Some(Width::Four),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add words
    Add {
        /// Words to add
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Remove words
    Remove {
        /// Words to remove
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Check whether a word is stored
    Has {
        /// The word to look up
        word: String,
    },

    /// List all words, sorted
    List {
        /// Maximum number of words to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Add one word per line from a file, or stdin with "-"
    Import {
        /// Source file
        source: PathBuf,
    },

    /// Remove all words
    Clear,

    /// Show trie size
    Stats,

    /// Run the built-in example without touching the trie file
    Demo,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let width = cli
        .width
        .or_else(|| Width::from_path(&cli.file))
        .unwrap_or(Width::One);

    match width {
        Width::One => run::<u8>(&cli),
        Width::Two => run::<u16>(&cli),
        Width::Four => run::<char>(&cli),
    }
}

fn run<S: TextSymbol>(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Add { words } => {
            let mut trie = load::<S>(&cli.file)?;
            let added = words.iter().filter(|w| trie.add_str(w)).count();
            let bytes = save(&trie, &cli.file)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "added": added,
                    "count": trie.word_count(),
                    "bytes": bytes
                }),
            );
        }

        Commands::Remove { words } => {
            let mut trie = load::<S>(&cli.file)?;
            let removed = words.iter().filter(|w| trie.remove_str(w)).count();
            let bytes = save(&trie, &cli.file)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "removed": removed,
                    "count": trie.word_count(),
                    "bytes": bytes
                }),
            );
        }

        Commands::Has { word } => {
            let trie = load::<S>(&cli.file)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "word": word,
                    "present": trie.has_str(word)
                }),
            );
        }

        Commands::List { limit } => {
            let trie = load::<S>(&cli.file)?;
            let mut words = trie.strings();
            if let Some(limit) = limit {
                words.truncate(*limit);
            }
            output(
                &cli.format,
                &serde_json::json!({
                    "count": trie.word_count(),
                    "words": words
                }),
            );
        }

        Commands::Import { source } => {
            let mut trie = load::<S>(&cli.file)?;
            let lines = read_lines(source)?;
            let added = lines
                .iter()
                .map(|line| line.trim())
                .filter(|line| trie.add_str(line))
                .count();
            let bytes = save(&trie, &cli.file)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "read": lines.len(),
                    "added": added,
                    "count": trie.word_count(),
                    "bytes": bytes
                }),
            );
        }

        Commands::Clear => {
            let mut trie = load::<S>(&cli.file)?;
            let removed = trie.word_count();
            trie.clear();
            save(&trie, &cli.file)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "removed": removed
                }),
            );
        }

        Commands::Stats => {
            let trie = load::<S>(&cli.file)?;
            let file_bytes = match std::fs::metadata(&cli.file) {
                Ok(meta) => meta.len(),
                Err(_) => 0,
            };
            output(
                &cli.format,
                &serde_json::json!({
                    "file": cli.file.display().to_string(),
                    "file_bytes": file_bytes,
                    "stats": trie.stats()
                }),
            );
        }

        Commands::Demo => {
            let mut trie = Trie::<S>::new();
            for word in ["he", "tat", "tute", "tut"] {
                trie.add_str(word);
            }
            let before = trie.strings();

            trie.remove_str("tut");
            trie.remove_str("tute");
            output(
                &cli.format,
                &serde_json::json!({
                    "before": before,
                    "after": trie.strings(),
                    "count": trie.word_count(),
                    "nodes": trie.node_count()
                }),
            );
        }
    }

    Ok(())
}

/// Load the trie at `path`, or an empty one if the file does not exist yet
fn load<S: TextSymbol>(path: &Path) -> anyhow::Result<Trie<S>> {
    let mut trie = Trie::new();
    if path.exists() {
        trie.try_read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(trie)
}

/// Persist `trie` to `path`
///
/// An empty trie writes no file, so a file left over from earlier contents
/// is deleted instead.
fn save<S: TextSymbol>(trie: &Trie<S>, path: &Path) -> anyhow::Result<usize> {
    if trie.is_empty() {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        return Ok(0);
    }

    trie.try_write(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn read_lines(source: &Path) -> anyhow::Result<Vec<String>> {
    let lines = if source == Path::new("-") {
        std::io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        let file = std::fs::File::open(source)
            .with_context(|| format!("Failed to open {}", source.display()))?;
        std::io::BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(lines)
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value).unwrap());
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
    }
}
