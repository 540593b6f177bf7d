use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::valuation::{FixedIncomeForm, TreasuryForm, VariableIncomeForm};

/// Asset class of an investment position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Treasury,
    FixedIncome,
    VariableIncome,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Treasury => "TESOURO",
            AssetClass::FixedIncome => "RENDA_FIXA",
            AssetClass::VariableIncome => "RENDA_VARIAVEL",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something owned (asset) or owed (liability, "não ativo") with a plain balance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceRecord {
    pub id: u64,
    pub name: String,
    /// Amount as typed by the user
    pub amount: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalRecord {
    pub id: u64,
    pub name: String,
    pub target: String,
    pub current: String,
    #[serde(default)]
    pub emergency_reserve: bool,
}

/// Class-specific terms of a position, stored as the raw form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum PositionDetails {
    Treasury(TreasuryForm),
    FixedIncome(FixedIncomeForm),
    VariableIncome(VariableIncomeForm),
}

impl PositionDetails {
    pub fn class(&self) -> AssetClass {
        match self {
            PositionDetails::Treasury(_) => AssetClass::Treasury,
            PositionDetails::FixedIncome(_) => AssetClass::FixedIncome,
            PositionDetails::VariableIncome(_) => AssetClass::VariableIncome,
        }
    }
}

/// Investment position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub broker: Option<String>,
    pub details: PositionDetails,
}

/// Net worth recorded on a given day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetWorthSnapshot {
    pub date: NaiveDate,
    pub net_worth: Decimal,
}

/// The whole JSON document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Document {
    pub next_id: u64,
    pub assets: Vec<BalanceRecord>,
    pub liabilities: Vec<BalanceRecord>,
    pub goals: Vec<GoalRecord>,
    pub positions: Vec<PositionRecord>,
    pub snapshots: Vec<NetWorthSnapshot>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            next_id: 1,
            assets: Vec::new(),
            liabilities: Vec::new(),
            goals: Vec::new(),
            positions: Vec::new(),
            snapshots: Vec::new(),
        }
    }
}

/// Collections addressable by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Assets,
    Liabilities,
    Goals,
    Positions,
}

impl Collection {
    pub fn record_name(&self) -> &'static str {
        match self {
            Collection::Assets => "asset",
            Collection::Liabilities => "liability",
            Collection::Goals => "goal",
            Collection::Positions => "position",
        }
    }
}
