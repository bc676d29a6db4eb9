//! Command-line interface for folioterm.
//!
//! `folioterm dashboard` runs the interactive terminal UI; the remaining
//! subcommands are one-shot equivalents of the dashboard actions, useful
//! for scripting and quick checks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;

use crate::client::ApiClient;
use crate::config::BackendConfig;
use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{init_logging, LogMode, LoggingConfig};

use commands::analyze::{AnalyzeArgs, AnalyzeCommand};
use commands::buy::{BuyArgs, BuyCommand};
use commands::dashboard::{DashboardArgs, DashboardCommand};
use commands::metrics::{MetricsArgs, MetricsCommand};
use commands::positions::{PositionsArgs, PositionsCommand};
use commands::sell::{SellArgs, SellCommand};

#[derive(Parser)]
#[command(name = "folioterm")]
#[command(version)]
#[command(about = "Terminal dashboard for the portfolio trading backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides FOLIOTERM_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive dashboard
    Dashboard(DashboardArgs),

    /// List active positions
    Positions(PositionsArgs),

    /// Run an on-demand analysis for a ticker
    Analyze(AnalyzeArgs),

    /// Submit a manual buy request
    Buy(BuyArgs),

    /// Submit a manual sell request
    Sell(SellArgs),

    /// Show the performance snapshot
    Metrics(MetricsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        // The dashboard owns the terminal, so its logs go to file only
        let log_mode = match self.command {
            Commands::Dashboard(_) => LogMode::FileOnly,
            _ => LogMode::ConsoleAndFile,
        };
        init_logging(LoggingConfig::new(log_mode, data_paths))?;

        let config = BackendConfig::resolve(self.backend_url.as_deref())?;
        let client = Arc::new(ApiClient::new(config)?);

        match self.command {
            Commands::Dashboard(args) => DashboardCommand::new(args).execute(client).await,
            Commands::Positions(args) => PositionsCommand::new(args).execute(&client).await,
            Commands::Analyze(args) => AnalyzeCommand::new(args).execute(&client).await,
            Commands::Buy(args) => BuyCommand::new(args).execute(&client).await,
            Commands::Sell(args) => SellCommand::new(args).execute(&client).await,
            Commands::Metrics(args) => MetricsCommand::new(args).execute(&client).await,
        }
    }
}
