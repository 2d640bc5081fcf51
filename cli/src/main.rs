use clap::{Args, Parser, Subcommand};
use esoparse_cli::commands::{self, ConfigUpdate};
use esoparse_cli::{CliContext, logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Elder Scrolls Online encounter log analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a whole log and print every retained encounter
    Parse {
        /// Log file; relative paths are resolved against log_directory
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Follow a log as it is written
    Tail {
        /// Defaults to Encounter.log in log_directory, waiting for it to appear
        path: Option<PathBuf>,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    #[arg(long)]
    log_directory: Option<PathBuf>,
    #[arg(long)]
    diagnostic_logging: Option<bool>,
    #[arg(long)]
    list_hostiles: Option<bool>,
    #[arg(long)]
    retained_encounters: Option<usize>,
    #[arg(long, conflicts_with = "clear_gear_set_table")]
    gear_set_table: Option<PathBuf>,
    #[arg(long)]
    clear_gear_set_table: bool,
}

impl From<SetArgs> for ConfigUpdate {
    fn from(args: SetArgs) -> Self {
        ConfigUpdate {
            log_directory: args.log_directory,
            diagnostic_logging: args.diagnostic_logging,
            list_hostiles: args.list_hostiles,
            retained_encounters: args.retained_encounters,
            gear_set_table: args.gear_set_table,
            clear_gear_set_table: args.clear_gear_set_table,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "esoparse failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let ctx = CliContext::load()?;
    match cli.command {
        Commands::Parse { path, json } => commands::parse(&ctx, &path, json).await,
        Commands::Tail { path } => commands::tail(&ctx, path.as_deref()).await,
        Commands::Config { action } => match action {
            None | Some(ConfigAction::Show) => commands::show_config(&ctx.config),
            Some(ConfigAction::Set(args)) => commands::set_config(ctx.config, args.into()),
        },
    }
}
