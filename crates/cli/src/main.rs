use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use termforge_storage::MySqlStorage;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "termforge")]
#[command(about = "Glossary keyword research and publishing pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research keywords for a glossary term.
    Research {
        term: String,
        /// Recompute every step instead of reusing persisted data.
        #[arg(long)]
        refresh: bool,
    },
    /// Publish a researched entry as a glossary pull request.
    Publish {
        term: String,
        /// GitHub repository owner.
        #[arg(long, env = "TERMFORGE_GITHUB_OWNER")]
        owner: String,
        /// GitHub repository name.
        #[arg(long, env = "TERMFORGE_GITHUB_REPO")]
        repo: String,
        /// Re-open the PR even when one is already recorded.
        #[arg(long)]
        refresh: bool,
    },
    /// Database management.
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Apply a breakpoint-delimited migration file in one transaction.
    Push {
        #[arg(long, default_value = "migrations/0001_init.sql")]
        file: std::path::PathBuf,
    },
    /// Drop every termforge table. Destructive.
    Reset {
        /// Required confirmation.
        #[arg(long)]
        yes: bool,
    },
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable must be set"))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

async fn connect_storage() -> Result<Arc<MySqlStorage>> {
    let url = require_env("TERMFORGE_DATABASE_URL")?;
    Ok(Arc::new(MySqlStorage::connect(&url).await?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Research { term, refresh } => commands::research::run(&term, refresh).await,
        Commands::Publish { term, owner, repo, refresh } => {
            commands::publish::run(&term, owner, repo, refresh).await
        },
        Commands::Db { command } => match command {
            DbCommands::Push { file } => commands::push::run(&file).await,
            DbCommands::Reset { yes } => commands::reset::run(yes).await,
        },
    }
}
