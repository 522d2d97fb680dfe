//! Command-line interface

pub mod config;
pub mod stats;
pub mod tasks;

use clap::{Parser, Subcommand};

use crate::api::{Credentials, HttpBackend};
use crate::error::Result;
use crate::storage::config::{load_config, Config};
use crate::store::TaskStore;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version)]
#[command(about = "Task list client with personal and calendar views")]
pub struct Cli {
    /// API base URL (overrides config and TASKDECK_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,
    /// Bearer token (overrides config and TASKDECK_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List, create, update and delete tasks
    Tasks {
        #[command(subcommand)]
        action: tasks::TaskAction,
    },
    /// Show tasks due on a date (YYYY-MM-DD, defaults to today)
    Calendar { date: Option<String> },
    /// Dashboard statistics
    Stats {
        /// Day to report on instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show or edit ~/.taskdeck/config.toml
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

/// Resolved settings shared by the task commands
pub struct Context {
    pub config: Config,
    pub credentials: Credentials,
    pub json: bool,
}

impl Context {
    /// Config file, then environment, then command-line flags
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = load_config();
        config.apply_overrides(cli.url.clone(), cli.token.clone());
        let credentials = match config.server.token.as_deref() {
            Some(token) => Credentials::bearer(token),
            None => Credentials::none(),
        };
        Self {
            config,
            credentials,
            json: cli.json,
        }
    }

    pub fn store(&self) -> Result<TaskStore<HttpBackend>> {
        let backend = HttpBackend::new(&self.config.server.base_url, self.config.server.timeout())?;
        Ok(TaskStore::with_mode(backend, self.config.store.consistency))
    }

    /// A store filled by one bulk load
    pub async fn loaded_store(&self) -> Result<TaskStore<HttpBackend>> {
        let mut store = self.store()?;
        store
            .load(&self.credentials, 0, self.config.store.page_limit)
            .await?;
        Ok(store)
    }
}

/// Dispatch a parsed command
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli);
    match cli.command {
        Commands::Tasks { action } => tasks::execute(&ctx, action).await,
        Commands::Calendar { date } => tasks::calendar(&ctx, date).await,
        Commands::Stats { date } => stats::execute(&ctx, date).await,
        Commands::Config { action } => config::execute(&ctx, action),
    }
}
