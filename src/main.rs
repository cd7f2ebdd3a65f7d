mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod report;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cmd::sync::SyncCommandArgs;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::harness::HarnessClient;
use crate::report::RunStatus;
use crate::workflow::fetch::DEFAULT_PAGE_SIZE;

#[derive(Parser)]
#[command(
    name = "reclink",
    author,
    version,
    about = "File issue tracker tickets for open cost recommendations"
)]
struct Cli {
    /// Look settings up as <PREFIX><NAME> before <NAME> (e.g. PLUGIN_).
    #[arg(long, global = true, env = "RECLINK_ENV_PREFIX")]
    env_prefix: Option<String>,
    /// Compose and log tickets without creating them.
    #[arg(long, global = true)]
    dry_run: bool,
    /// Log level or filter directive (overrides LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tickets for open recommendations (default).
    Sync(SyncArgs),
    /// Print the number of open recommendations.
    Count,
    /// Validate and print the bucket mapping table.
    Mappings,
    /// Show the resolved configuration (secrets masked).
    Config,
}

#[derive(Args)]
struct SyncArgs {
    /// Recommendations requested per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

async fn run() -> AppResult<RunStatus> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.env_prefix)?;
    if cli.dry_run {
        config.dry_run = true;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(&config.log_level);

    let command = cli.command.unwrap_or(Commands::Sync(SyncArgs {
        page_size: DEFAULT_PAGE_SIZE,
    }));

    match command {
        Commands::Config => {
            cmd::config::run(&config);
            Ok(RunStatus::Clean)
        }
        Commands::Mappings => {
            cmd::mappings::run(&config)?;
            Ok(RunStatus::Clean)
        }
        Commands::Count => {
            let ctx = build_context(config)?;
            let count = cmd::count::run(&ctx).await?;
            println!("{count} open recommendations");
            Ok(RunStatus::Clean)
        }
        Commands::Sync(args) => {
            let ctx = build_context(config)?;
            cmd::sync::run(
                &ctx,
                SyncCommandArgs {
                    page_size: args.page_size,
                },
            )
            .await
        }
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let client = Arc::new(HarnessClient::from_config(&config)?);
    Ok(AppContext::new(config, client))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
