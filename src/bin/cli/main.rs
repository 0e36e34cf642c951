mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mneme::models::QuizMode;
use mneme::store::ListOrder;

#[derive(Parser)]
#[command(name = "mneme", about = "Personal vocabulary tracker with spaced repetition", version)]
struct Cli {
    /// Use a specific storage file (default: platform data directory)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a word to the collection
    Add {
        /// The word to learn
        word: String,
        /// Its definition; separate multiple senses with "; "
        definition: String,
        /// Example sentence or other context
        #[arg(long)]
        context: Option<String>,
    },

    /// List stored words
    List {
        /// Sort order
        #[arg(long, default_value = "due")]
        order: ListOrderArg,
        /// Maximum rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Review the words that are due
    Review {
        /// Quiz direction
        #[arg(long, default_value = "word")]
        mode: QuizModeArg,
        /// Stop after this many graded words
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum ListOrderArg {
    Due,
    Created,
}

impl From<ListOrderArg> for ListOrder {
    fn from(arg: ListOrderArg) -> Self {
        match arg {
            ListOrderArg::Due => ListOrder::DueAt,
            ListOrderArg::Created => ListOrder::CreatedAt,
        }
    }
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum QuizModeArg {
    Word,
    Definition,
}

impl From<QuizModeArg> for QuizMode {
    fn from(arg: QuizModeArg) -> Self {
        match arg {
            QuizModeArg::Word => QuizMode::WordToDefinition,
            QuizModeArg::Definition => QuizMode::DefinitionToWord,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Add {
            word,
            definition,
            context,
        } => {
            let mut app = app::App::new(cli.storage.as_deref())?;
            commands::add::run(&mut app, &word, &definition, context.as_deref(), &cli.format)?;
        }
        Command::List { order, limit } => {
            let app = app::App::new(cli.storage.as_deref())?;
            commands::list::run(&app, order.into(), limit, &cli.format)?;
        }
        Command::Review { mode, limit } => {
            let mut app = app::App::new(cli.storage.as_deref())?;
            commands::review::run(&mut app, mode.into(), limit, &cli.format)?;
        }
    }

    Ok(())
}
