//! Command dispatch logic for ghrr

use super::{InitArgs, ResumeArgs, RetrieveArgs, init_config, process_resume, process_retrieve};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "ghrr", author, version, long_about = None)]
#[command(about = "Collect the users who starred, watched, or contributed to a GitHub repository")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: GhrrSubcommand,
}

#[derive(Subcommand, Debug)]
enum GhrrSubcommand {
    /// Crawl a repository's users into a new CSV file
    Retrieve(Box<RetrieveArgs>),
    /// Continue a crawl into an existing CSV file, skipping users already recorded
    Resume(Box<ResumeArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        GhrrSubcommand::Retrieve(retrieve_args) => process_retrieve(host, retrieve_args).await,
        GhrrSubcommand::Resume(resume_args) => process_resume(host, resume_args).await,
        GhrrSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
