//! Wordlink CLI
//!
//! Command-line interface for wordlink - words, notations and the example
//! sentences they appear in.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wordlink_core::{
    Config, NotationId, OwnerId, SentenceId, StorageError, VocabularyService, WordId,
};

mod commands;
mod editor;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "wordlink")]
#[command(about = "Wordlink - find your words in your sentences")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a different config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Act as this owner instead of the configured one
    #[arg(long, global = true, value_name = "ID")]
    owner: Option<OwnerId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage words
    Word {
        #[command(subcommand)]
        command: WordCommands,
    },
    /// Manage notations (alternate forms of a word)
    Notation {
        #[command(subcommand)]
        command: NotationCommands,
    },
    /// Manage sentences
    Sentence {
        #[command(subcommand)]
        command: SentenceCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (database location, counts)
    Status,
}

#[derive(Subcommand)]
enum WordCommands {
    /// Record a new word
    #[command(alias = "create")]
    Add {
        /// The word as written
        text: String,
        /// Meaning, reading or any other note
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// Record words from a file, one per line (`word<TAB>memo`)
    Import {
        /// File to read
        file: PathBuf,
    },
    /// List all words
    #[command(alias = "ls")]
    List,
    /// Show a word with its notations and sentences
    Show {
        /// Word ID
        id: WordId,
    },
    /// Edit a word (opens editor if no flags given)
    Edit {
        /// Word ID
        id: WordId,
        /// New text
        #[arg(short, long)]
        text: Option<String>,
        /// New memo
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// Delete a word
    #[command(alias = "rm")]
    Delete {
        /// Word ID
        id: WordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List sentences containing a word, rendered with links
    Sentences {
        /// Word ID
        id: WordId,
    },
}

#[derive(Subcommand)]
enum NotationCommands {
    /// Add a notation to a word
    #[command(alias = "create")]
    Add {
        /// Word ID
        word_id: WordId,
        /// The alternate form
        text: String,
    },
    /// List notations of a word
    #[command(alias = "ls")]
    List {
        /// Word ID
        word_id: WordId,
    },
    /// Change a notation's text
    Edit {
        /// Notation ID
        id: NotationId,
        /// New text
        text: String,
    },
    /// Delete a notation
    #[command(alias = "rm")]
    Delete {
        /// Notation ID
        id: NotationId,
    },
}

#[derive(Subcommand)]
enum SentenceCommands {
    /// Record a new sentence (opens editor if no text given)
    #[command(alias = "create")]
    Add {
        /// The sentence
        text: Option<String>,
    },
    /// Record sentences from a file, one per line
    Import {
        /// File to read
        file: PathBuf,
    },
    /// List all sentences
    #[command(alias = "ls")]
    List,
    /// Show a sentence rendered with links
    Show {
        /// Sentence ID
        id: SentenceId,
    },
    /// Edit a sentence (opens editor if no text given)
    Edit {
        /// Sentence ID
        id: SentenceId,
        /// New text
        text: Option<String>,
    },
    /// Delete a sentence
    #[command(alias = "rm")]
    Delete {
        /// Sentence ID
        id: SentenceId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List words found in a sentence
    Words {
        /// Sentence ID
        id: SentenceId,
    },
    /// Link a sentence to words explicitly
    Link {
        /// Sentence ID
        id: SentenceId,
        /// Word IDs to link
        #[arg(required = true)]
        word_ids: Vec<WordId>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, owner_id, render_mode, log_file, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands must work even when the database can't be opened
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let owner = cli.owner.unwrap_or(config.owner_id);
    let service = VocabularyService::open(&config).inspect_err(print_recovery_hint)?;

    match cli.command {
        Commands::Word { command } => handle_word_command(command, &service, owner, &output),
        Commands::Notation { command } => {
            handle_notation_command(command, &service, owner, &output)
        }
        Commands::Sentence { command } => {
            handle_sentence_command(command, &service, owner, &output)
        }
        Commands::Status => commands::status::show(&service, &config, owner, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_word_command(
    command: WordCommands,
    service: &commands::Service,
    owner: OwnerId,
    output: &Output,
) -> Result<()> {
    match command {
        WordCommands::Add { text, memo } => commands::word::add(service, owner, text, memo, output),
        WordCommands::Import { file } => commands::word::import(service, owner, file, output),
        WordCommands::List => commands::word::list(service, owner, output),
        WordCommands::Show { id } => commands::word::show(service, owner, id, output),
        WordCommands::Edit { id, text, memo } => {
            commands::word::edit(service, owner, id, text, memo, output)
        }
        WordCommands::Delete { id, yes } => commands::word::delete(service, owner, id, yes, output),
        WordCommands::Sentences { id } => commands::word::sentences(service, owner, id, output),
    }
}

fn handle_notation_command(
    command: NotationCommands,
    service: &commands::Service,
    owner: OwnerId,
    output: &Output,
) -> Result<()> {
    match command {
        NotationCommands::Add { word_id, text } => {
            commands::notation::add(service, owner, word_id, text, output)
        }
        NotationCommands::List { word_id } => {
            commands::notation::list(service, owner, word_id, output)
        }
        NotationCommands::Edit { id, text } => {
            commands::notation::edit(service, owner, id, text, output)
        }
        NotationCommands::Delete { id } => commands::notation::delete(service, owner, id, output),
    }
}

fn handle_sentence_command(
    command: SentenceCommands,
    service: &commands::Service,
    owner: OwnerId,
    output: &Output,
) -> Result<()> {
    match command {
        SentenceCommands::Add { text } => commands::sentence::add(service, owner, text, output),
        SentenceCommands::Import { file } => {
            commands::sentence::import(service, owner, file, output)
        }
        SentenceCommands::List => commands::sentence::list(service, owner, output),
        SentenceCommands::Show { id } => commands::sentence::show(service, owner, id, output),
        SentenceCommands::Edit { id, text } => {
            commands::sentence::edit(service, owner, id, text, output)
        }
        SentenceCommands::Delete { id, yes } => {
            commands::sentence::delete(service, owner, id, yes, output)
        }
        SentenceCommands::Words { id } => commands::sentence::words(service, owner, id, output),
        SentenceCommands::Link { id, word_ids } => {
            commands::sentence::link(service, owner, id, word_ids, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Print a hint for storage errors the user can fix
fn print_recovery_hint(error: &anyhow::Error) {
    let hint = error
        .downcast_ref::<StorageError>()
        .and_then(StorageError::recovery_suggestion);
    if let Some(hint) = hint {
        eprintln!("Hint: {}", hint);
    }
}
