use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use snapmig::commands::{self, RunOptions};
use snapmig::config::{self, ConfigInput, DatabaseArgs, MigrationArgs, SchemaArgs};
use snapmig::constants::CONFIG_FILENAME;
use snapmig::migration::Program;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Print the statements that would run without executing them
    #[arg(long)]
    dry_run: bool,

    /// Do not ask for confirmation before dropping tables
    #[arg(long, short = 'y')]
    yes: bool,

    #[command(flatten)]
    database_args: DatabaseArgs,

    #[command(flatten)]
    schema_args: SchemaArgs,

    #[command(flatten)]
    migration_args: MigrationArgs,
}

#[derive(Args, Debug, Clone)]
struct StatusArgs {
    #[command(flatten)]
    database_args: DatabaseArgs,

    #[command(flatten)]
    migration_args: MigrationArgs,
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    #[command(flatten)]
    schema_args: SchemaArgs,

    #[command(flatten)]
    migration_args: MigrationArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Converge the database to the declared tables
    Migrate(RunArgs),

    /// Drop every table of the last recorded migration and the migration history
    Drop(RunArgs),

    /// Drop, then migrate from scratch
    Reset(RunArgs),

    /// Show the last recorded migration
    Status(StatusArgs),

    /// Validate the schema file and print the migration order (no database needed)
    Check(CheckArgs),
}

impl Commands {
    fn cli_input(&self) -> ConfigInput {
        match self {
            Commands::Migrate(args) | Commands::Drop(args) | Commands::Reset(args) => ConfigInput {
                database: Some(args.database_args.clone().into()),
                schema: Some(args.schema_args.clone().into()),
                migration: Some(args.migration_args.clone().into()),
            },
            Commands::Status(args) => ConfigInput {
                database: Some(args.database_args.clone().into()),
                schema: None,
                migration: Some(args.migration_args.clone().into()),
            },
            Commands::Check(args) => ConfigInput {
                database: None,
                schema: Some(args.schema_args.clone().into()),
                migration: Some(args.migration_args.clone().into()),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    run_until_shutdown(run_main(cli), wait_for_shutdown_signal()).await
}

/// Drive `run` to completion unless `shutdown` fires first, which fails the run.
async fn run_until_shutdown(
    run: impl Future<Output = Result<()>>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::select! {
        result = run => result,
        _ = shutdown => {
            error!(
                "Received shutdown signal: the run was interrupted before completing, \
                 tables may be partially migrated and no migration was recorded"
            );
            Err(anyhow!("interrupted by shutdown signal"))
        }
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;
    let config = config::ConfigBuilder::new()
        .with_file(file_config)
        .with_cli_args(cli.command.cli_input())
        .resolve()?;

    match &cli.command {
        Commands::Migrate(args) | Commands::Drop(args) | Commands::Reset(args) => {
            let program = match &cli.command {
                Commands::Drop(_) => Program::Drop,
                Commands::Reset(_) => Program::Reset,
                _ => Program::Migrate,
            };
            let options = RunOptions {
                dry_run: args.dry_run,
                assume_yes: args.yes,
                verbose: cli.verbose || cli.debug,
            };
            if !commands::cmd_run(&config, &root_dir, program, &options).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Status(_) => commands::cmd_status(&config).await,
        Commands::Check(_) => commands::cmd_check(&config, &root_dir, cli.verbose),
    }
}
