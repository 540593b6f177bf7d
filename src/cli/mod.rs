use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::valuation::{FixedIncomeForm, TreasuryForm, VariableIncomeForm};

pub mod formatters;

#[derive(Parser)]
#[command(name = "carteira")]
#[command(
    version,
    about = "Personal finance tracker with Brazilian fixed income valuation"
)]
#[command(
    long_about = "Record assets, liabilities, savings goals and investment positions (Tesouro Direto, renda fixa, renda variável), value them with compound interest and project the liquid amount at maturity after IR."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Data file (defaults to ~/.carteira/carteira.json)
    #[arg(long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Value positions as of this date instead of today (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long = "today", global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Value a position from the command line without storing it
    Value {
        #[command(subcommand)]
        action: ValueCommands,
    },

    /// IR withholding: regressive table lookup and net projection
    Tax {
        #[command(subcommand)]
        action: TaxCommands,
    },

    /// Investment positions
    Positions {
        #[command(subcommand)]
        action: PositionCommands,
    },

    /// Assets (bank balances, property, cash)
    Assets {
        #[command(subcommand)]
        action: BalanceCommands,
    },

    /// Liabilities (não ativos: debts, financing, card bills)
    Liabilities {
        #[command(subcommand)]
        action: BalanceCommands,
    },

    /// Savings goals and emergency reserve
    Goals {
        #[command(subcommand)]
        action: GoalCommands,
    },

    /// Portfolio views over stored positions
    Portfolio {
        #[command(subcommand)]
        action: PortfolioCommands,
    },

    /// Net worth and its history
    Networth {
        #[command(subcommand)]
        action: NetWorthCommands,
    },
}

#[derive(Args, Clone, Debug)]
pub struct TreasuryArgs {
    /// Amount invested (e.g. "1.000,00")
    #[arg(long)]
    pub principal: String,

    /// Contracted annual rate in percent
    #[arg(long)]
    pub rate: String,

    /// Purchase date
    #[arg(long)]
    pub purchase: Option<String>,

    /// Maturity date
    #[arg(long)]
    pub maturity: Option<String>,
}

impl TreasuryArgs {
    pub fn to_form(&self) -> TreasuryForm {
        TreasuryForm {
            principal: self.principal.clone(),
            annual_rate: self.rate.clone(),
            purchase_date: self.purchase.clone(),
            maturity_date: self.maturity.clone(),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct FixedIncomeArgs {
    /// Amount invested
    #[arg(long)]
    pub principal: String,

    /// Rate type: prefixado, cdi (pós-fixado) or ipca
    #[arg(long = "rate-type")]
    pub rate_type: String,

    /// Fixed % a.a., % of CDI, or spread over IPCA depending on the rate type
    #[arg(long)]
    pub rate: String,

    /// Current CDI % a.a. (defaults to the configured value)
    #[arg(long)]
    pub cdi: Option<String>,

    /// Reference IPCA % a.a. (defaults to the configured value)
    #[arg(long)]
    pub ipca: Option<String>,

    /// Instrument: CDB, LC, LCI, LCA, CRI, CRA, debenture, debenture-incentivada
    #[arg(long)]
    pub instrument: Option<String>,

    /// Purchase date
    #[arg(long)]
    pub purchase: Option<String>,

    /// Maturity date
    #[arg(long)]
    pub maturity: Option<String>,
}

impl FixedIncomeArgs {
    pub fn to_form(&self) -> FixedIncomeForm {
        FixedIncomeForm {
            principal: self.principal.clone(),
            rate_type: self.rate_type.clone(),
            rate: self.rate.clone(),
            cdi: self.cdi.clone(),
            ipca: self.ipca.clone(),
            instrument: self.instrument.clone(),
            purchase_date: self.purchase.clone(),
            maturity_date: self.maturity.clone(),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct VariableIncomeArgs {
    /// Number of shares/quotas
    #[arg(long)]
    pub quantity: String,

    /// Current market price per unit
    #[arg(long)]
    pub price: String,

    /// Average purchase price per unit
    #[arg(long = "average-price")]
    pub average_price: Option<String>,
}

impl VariableIncomeArgs {
    pub fn to_form(&self) -> VariableIncomeForm {
        VariableIncomeForm {
            quantity: self.quantity.clone(),
            current_price: self.price.clone(),
            average_price: self.average_price.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum ValueCommands {
    /// Tesouro Direto bond at a fixed rate
    Treasury(TreasuryArgs),

    /// Fixed income (CDB, LCI, LCA, debentures...)
    FixedIncome(FixedIncomeArgs),

    /// Variable income (stocks, ETFs, FIIs)
    Variable {
        #[command(flatten)]
        position: VariableIncomeArgs,

        /// Tax rate on the gain if sold (15 swing trade, 20 day trade)
        #[arg(long = "tax-rate")]
        tax_rate: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TaxCommands {
    /// Regressive IR rate for a holding period
    Rate {
        /// Days held
        days: i64,
    },

    /// Liquid value after IR on the gain
    Project {
        /// Gross value at maturity
        #[arg(long)]
        gross: String,

        /// Amount originally invested
        #[arg(long)]
        principal: String,

        #[arg(long)]
        purchase: Option<String>,

        #[arg(long)]
        maturity: Option<String>,

        /// Instrument kind, decides exemption (LCI, CDB, ...)
        #[arg(long, conflicts_with_all = ["exempt", "manual_rate"])]
        instrument: Option<String>,

        /// Treat the position as IR-exempt
        #[arg(long)]
        exempt: bool,

        /// Apply this rate directly instead of the regressive table
        #[arg(long = "manual-rate", conflicts_with = "exempt")]
        manual_rate: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AddPositionCommands {
    /// Tesouro Direto bond
    Treasury {
        #[arg(long)]
        name: String,
        #[arg(long)]
        broker: Option<String>,
        #[command(flatten)]
        terms: TreasuryArgs,
    },

    /// Fixed income
    FixedIncome {
        #[arg(long)]
        name: String,
        #[arg(long)]
        broker: Option<String>,
        #[command(flatten)]
        terms: FixedIncomeArgs,
    },

    /// Variable income
    Variable {
        /// Ticker or description
        #[arg(long)]
        name: String,
        #[arg(long)]
        broker: Option<String>,
        #[command(flatten)]
        terms: VariableIncomeArgs,
    },
}

#[derive(Subcommand)]
pub enum PositionCommands {
    /// Add a position
    Add {
        #[command(subcommand)]
        class: AddPositionCommands,
    },

    /// List stored positions with their current value
    List,

    /// Remove a position
    Remove { id: u64 },
}

#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Add a record
    Add {
        name: String,
        amount: String,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List records
    List,

    /// Remove a record
    Remove { id: u64 },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a savings goal
    Add {
        name: String,
        target: String,
        /// Amount already saved
        #[arg(long, default_value = "0")]
        current: String,
        /// Mark as the emergency reserve
        #[arg(long)]
        reserve: bool,
    },

    /// Update the amount saved towards a goal
    Update { id: u64, current: String },

    /// List goals with progress
    List,

    /// Remove a goal
    Remove { id: u64 },

    /// Compute an emergency reserve target from monthly expenses
    Reserve {
        monthly_cost: String,
        #[arg(long, default_value_t = crate::goals::DEFAULT_RESERVE_MONTHS)]
        months: u32,
    },
}

#[derive(Subcommand)]
pub enum PortfolioCommands {
    /// Show every position valued at the reference date
    Show {
        /// Also export the report to CSV at this path
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Allocation by asset class
    Allocation,

    /// Distribution by broker
    Brokers,
}

#[derive(Subcommand)]
pub enum NetWorthCommands {
    /// Current net worth
    Show,

    /// Store today's net worth in the history
    Snapshot,

    /// Net worth history
    History,
}
