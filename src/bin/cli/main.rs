mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use flashdeck_lib::config::Backend;

#[derive(Parser)]
#[command(name = "flashdeck-cli", about = "Manage and study flashcards", version)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the flashcard data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(long, global = true)]
    backend: Option<BackendArg>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum BackendArg {
    File,
    Sqlite,
    Memory,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => Backend::File,
            BackendArg::Sqlite => Backend::Sqlite,
            BackendArg::Memory => Backend::Memory,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List all flashcards
    List,

    /// Show one flashcard
    Show {
        /// Flashcard id
        id: u64,
    },

    /// Add a flashcard
    Add {
        /// Question (front of the card)
        question: String,
        /// Answer (back of the card)
        answer: String,
        /// How the question is pronounced
        #[arg(long)]
        pronunciation: Option<String>,
    },

    /// Change fields of a flashcard
    Edit {
        /// Flashcard id
        id: u64,
        /// New question
        #[arg(long)]
        question: Option<String>,
        /// New answer
        #[arg(long)]
        answer: Option<String>,
        /// New pronunciation (pass "" to remove it)
        #[arg(long)]
        pronunciation: Option<String>,
    },

    /// Delete a flashcard
    Delete {
        /// Flashcard id
        id: u64,
    },

    /// Review all flashcards in order
    Study,

    /// Erase all stored data
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();

    let app = app::App::new(cli.config, cli.data_dir, cli.backend.map(Backend::from)).await?;

    match cli.command {
        Command::List => {
            commands::list::run(&app, &cli.format, use_color).await?;
        }
        Command::Show { id } => {
            commands::show::run(&app, id, &cli.format, use_color).await?;
        }
        Command::Add { question, answer, pronunciation } => {
            commands::add::run(
                &app,
                &question,
                &answer,
                pronunciation.as_deref(),
                &cli.format,
                use_color,
            )
            .await?;
        }
        Command::Edit { id, question, answer, pronunciation } => {
            commands::edit::run(&app, id, question, answer, pronunciation, &cli.format, use_color)
                .await?;
        }
        Command::Delete { id } => {
            commands::delete::run(&app, id, &cli.format).await?;
        }
        Command::Study => {
            commands::study::run(&app, use_color).await?;
        }
        Command::Reset { yes } => {
            commands::reset::run(&app, yes).await?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
