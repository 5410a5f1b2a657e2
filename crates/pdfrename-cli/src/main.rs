//! CLI for renaming financial and utility PDFs to canonical names.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{boxes, inputs, rename};
use pdfrename_core::RenameConfig;

/// Rename PDF bills, statements and invoices after their content
#[derive(Parser)]
#[command(name = "pdfrename")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rename the files instead of printing rename commands
    #[arg(long)]
    rename: bool,

    /// Also list files that are not being renamed
    #[arg(long)]
    list_all: bool,

    /// Print the first page's text boxes instead of renaming
    #[arg(long, conflicts_with_all = ["rename", "list_all"])]
    print_boxes: bool,

    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity, unless RUST_LOG says otherwise
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = FmtSubscriber::builder()
        .with_target(false)
        .with_writer(std::io::stderr);
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        tracing::subscriber::set_global_default(
            builder.with_env_filter(EnvFilter::from_default_env()).finish(),
        )?;
    } else {
        tracing::subscriber::set_global_default(builder.with_max_level(level).finish())?;
    }
    install_panic_hook();

    let config = match cli.config.as_deref() {
        Some(path) => RenameConfig::from_file(path)?,
        None => RenameConfig::default(),
    };

    let files = inputs::expand(&cli.inputs)?;

    if cli.print_boxes {
        boxes::run(&files, &config)
    } else {
        let args = rename::RenameArgs {
            rename: cli.rename,
            list_all: cli.list_all,
        };
        rename::run(&files, &args, &config)
    }
}

/// Report panics, including the extractor panics the registry recovers
/// from, as log events rather than raw stderr output.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!("{info}");
    }));
}
