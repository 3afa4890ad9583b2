//! CLI for chatting with PDF and CSV files and turning PDFs into slide decks.

mod commands;

use aitools_core::table::DEFAULT_PREVIEW_ROWS;
use aitools_core::Settings;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Chat with documents and generate presentations using Gemini.
#[derive(Parser, Debug)]
#[command(name = "aitools")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Model to use (overrides AITOOLS_MODEL)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Seconds to wait for an uploaded file to become ready
    #[arg(long, global = true)]
    poll_timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask questions about a PDF document
    PdfChat {
        /// PDF file to upload
        file: PathBuf,
    },

    /// Ask questions about a CSV dataset
    CsvChat {
        /// CSV file to upload
        file: PathBuf,

        /// Print the first rows of the table before chatting
        #[arg(short, long)]
        preview: bool,

        /// Number of rows shown by --preview
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },

    /// Generate a PowerPoint deck from a PDF
    PptFromPdf {
        /// PDF file to summarize
        file: PathBuf,

        /// Presentation title
        #[arg(short, long, default_value = "Business Report")]
        title: String,

        /// Output path (default: <title>.pptx in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of content slides
        #[arg(long)]
        max_slides: Option<usize>,

        /// Create the deck without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the text of each slide in a .pptx file
    Inspect {
        /// Deck to read
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env first; it may set RUST_LOG.
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    logger_builder(args.verbose).init();

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    let settings = settings_from_args(Settings::from_env(), &args);
    log::debug!("Using model {}", settings.model);

    match args.command {
        Command::PdfChat { file } => commands::pdf_chat(&settings, &file),
        Command::CsvChat {
            file,
            preview,
            rows,
        } => commands::csv_chat(&settings, &file, preview.then_some(rows)),
        Command::PptFromPdf {
            file,
            title,
            output,
            max_slides: _,
            yes,
        } => commands::ppt_from_pdf(&settings, &file, &title, output, yes),
        Command::Inspect { file } => commands::inspect(&file),
    }
}

/// Logger reading `RUST_LOG`, defaulting to `warn` (or `debug` when verbose).
fn logger_builder(verbose: bool) -> env_logger::Builder {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
}

/// Apply command-line overrides on top of the environment settings.
fn settings_from_args(mut settings: Settings, args: &Args) -> Settings {
    if let Some(model) = &args.model {
        settings = settings.with_model(model.clone());
    }
    if let Some(secs) = args.poll_timeout {
        settings = settings.with_poll_timeout(Duration::from_secs(secs));
    }
    if let Command::PptFromPdf {
        max_slides: Some(max),
        ..
    } = &args.command
    {
        settings = settings.with_max_slides(*max);
    }
    settings
}
