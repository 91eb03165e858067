//! texstep CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "texstep")]
#[command(version)]
#[command(about = "Round-trip editing of slide markup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and check that it renders back unchanged
    Check {
        /// Input document
        input: PathBuf,

        /// Where to write the render when it diverges (defaults to INPUT.wrong)
        #[arg(long)]
        side_file: Option<PathBuf>,
    },

    /// Render some or all steps of a document
    Render {
        /// Input document
        input: PathBuf,

        /// Write output to FILE
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Slide name (or part of it), or an absolute step index
        #[arg(long)]
        slide: Option<String>,

        /// First step; the last step when --slide is an index (-1 for the end)
        #[arg(long, allow_hyphen_values = true)]
        start: Option<i64>,

        /// Last step, included (-1 for the end)
        #[arg(long, allow_hyphen_values = true)]
        stop: Option<i64>,
    },

    /// Print the slides of a document with their headers
    Outline {
        /// Input document
        input: PathBuf,

        /// Parse headers as title, subtitle and page number macros
        #[arg(long)]
        standard_header: bool,
    },

    /// Print the placeholder template of an annotated command
    Signature {
        /// Command name, without the backslash
        name: String,

        /// Directory searched for *.tex files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "texstep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input, side_file } => {
            commands::check::execute(commands::check::CheckArgs { input, side_file })
        }
        Commands::Render {
            input,
            output,
            slide,
            start,
            stop,
        } => commands::render::execute(commands::render::RenderArgs {
            input,
            output,
            slide,
            start,
            stop,
        }),
        Commands::Outline {
            input,
            standard_header,
        } => commands::outline::execute(commands::outline::OutlineArgs {
            input,
            standard_header,
        }),
        Commands::Signature { name, dir } => {
            commands::signature::execute(commands::signature::SignatureArgs { name, dir })
        }
    }
}
