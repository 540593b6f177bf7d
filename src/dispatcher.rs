//! Command dispatcher that routes parsed clap commands to their handlers.
//!
//! Every handler receives an [`AppContext`] carrying the reference date, the
//! loaded configuration and the data file location, so nothing below this
//! layer reads the clock or the environment.

mod portfolio;
mod records;
mod valuation;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::CarteiraError;
use crate::reports::ValuationContext;
use crate::store::JsonStore;
use crate::valuation::coerce::to_date;

/// Everything a handler needs besides its own arguments
#[derive(Debug, Clone)]
pub struct AppContext {
    pub json: bool,
    pub today: NaiveDate,
    pub config: Config,
    pub data_file: PathBuf,
}

impl AppContext {
    /// Build the context from global flags, loading the config file.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load()?;
        let today = match cli.today.as_deref() {
            Some(raw) => to_date(raw).ok_or_else(|| {
                CarteiraError::Validation(format!("invalid --today date '{}'", raw))
            })?,
            None => Local::now().date_naive(),
        };
        let data_file = config.resolve_data_file(cli.file.clone())?;
        debug!("Reference date {}, data file {:?}", today, data_file);

        Ok(Self {
            json: cli.json,
            today,
            config,
            data_file,
        })
    }

    pub fn open_store(&self) -> Result<JsonStore> {
        JsonStore::open(&self.data_file)
            .with_context(|| format!("Failed to open data file {:?}", self.data_file))
    }

    pub fn valuation_context(&self) -> ValuationContext {
        ValuationContext::new(self.today, &self.config)
    }
}

/// Route a parsed command to its handler
pub fn dispatch_command(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Value { action } => valuation::dispatch_value(action, ctx),
        Commands::Tax { action } => valuation::dispatch_tax(action, ctx),
        Commands::Positions { action } => records::dispatch_positions(action, ctx),
        Commands::Assets { action } => records::dispatch_balances(action, false, ctx),
        Commands::Liabilities { action } => records::dispatch_balances(action, true, ctx),
        Commands::Goals { action } => records::dispatch_goals(action, ctx),
        Commands::Portfolio { action } => portfolio::dispatch_portfolio(action, ctx),
        Commands::Networth { action } => portfolio::dispatch_net_worth(action, ctx),
    }
}
