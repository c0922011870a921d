use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinview::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the market table
    Table {
        /// Currency code to show values in, e.g. usd or btc
        #[arg(long)]
        currency: Option<String>,

        /// Read the dataset from a JSON file instead of the configured source
        #[arg(short, long)]
        file: Option<String>,

        /// Column to sort by; repeat a column to flip its direction
        #[arg(short, long)]
        sort: Vec<String>,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Abbreviate large amounts
        #[arg(long)]
        compact: bool,
    },
    /// List configured currencies
    Currencies,
}

impl From<Commands> for coinview::AppCommand {
    fn from(cmd: Commands) -> coinview::AppCommand {
        match cmd {
            Commands::Table {
                currency,
                file,
                sort,
                limit,
                compact,
            } => coinview::AppCommand::Table(coinview::TableArgs {
                currency,
                file,
                sort,
                limit,
                compact,
            }),
            Commands::Currencies => coinview::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinview::cli::setup::setup(),
        Some(cmd) => coinview::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
