// Store module - single JSON document holding every record

pub mod models;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::CarteiraError;
pub use models::{
    AssetClass, BalanceRecord, Collection, Document, GoalRecord, NetWorthSnapshot,
    PositionDetails, PositionRecord,
};

/// Get the default data file path (~/.carteira/carteira.json)
pub fn get_default_store_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".carteira").join("carteira.json"))
}

/// JSON document bound to the file it was loaded from
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    doc: Document,
}

impl JsonStore {
    /// Open the document at `path`; a missing file is an empty document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!("No data file at {:?}, starting empty", path);
            return Ok(Self {
                path,
                doc: Document::default(),
            });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read data file at {:?}", path))?;
        let doc: Document = serde_json::from_str(&content)
            .map_err(|e| CarteiraError::Store(e.to_string()))
            .with_context(|| format!("Failed to parse data file at {:?}", path))?;

        Ok(Self { path, doc })
    }

    /// Write the whole document atomically (temp file + rename).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&self.doc)
            .context("Failed to serialize data document")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).context("Failed to write data file")?;
        fs::rename(&tmp_path, &self.path).context("Failed to finalize data file")?;

        info!("Saved data file {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.doc.next_id.max(1);
        self.doc.next_id = id + 1;
        id
    }

    pub fn add_asset(&mut self, name: &str, amount: &str, category: Option<&str>) -> Result<u64> {
        let record = self.balance_record(name, amount, category)?;
        let id = record.id;
        self.doc.assets.push(record);
        Ok(id)
    }

    pub fn add_liability(
        &mut self,
        name: &str,
        amount: &str,
        category: Option<&str>,
    ) -> Result<u64> {
        let record = self.balance_record(name, amount, category)?;
        let id = record.id;
        self.doc.liabilities.push(record);
        Ok(id)
    }

    fn balance_record(
        &mut self,
        name: &str,
        amount: &str,
        category: Option<&str>,
    ) -> Result<BalanceRecord> {
        require("name", name)?;
        require("amount", amount)?;
        Ok(BalanceRecord {
            id: self.allocate_id(),
            name: name.trim().to_string(),
            amount: amount.trim().to_string(),
            category: category.map(|c| c.trim().to_string()),
        })
    }

    pub fn add_goal(
        &mut self,
        name: &str,
        target: &str,
        current: &str,
        emergency_reserve: bool,
    ) -> Result<u64> {
        require("name", name)?;
        require("target", target)?;
        let id = self.allocate_id();
        self.doc.goals.push(GoalRecord {
            id,
            name: name.trim().to_string(),
            target: target.trim().to_string(),
            current: current.trim().to_string(),
            emergency_reserve,
        });
        Ok(id)
    }

    /// Update how much has been saved towards a goal.
    pub fn update_goal_current(&mut self, id: u64, current: &str) -> Result<()> {
        let goal = self
            .doc
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(CarteiraError::NotFound { kind: "goal", id })?;
        goal.current = current.trim().to_string();
        Ok(())
    }

    pub fn add_position(
        &mut self,
        name: &str,
        broker: Option<&str>,
        details: PositionDetails,
    ) -> Result<u64> {
        require("name", name)?;
        match &details {
            PositionDetails::Treasury(form) => require("principal", &form.principal)?,
            PositionDetails::FixedIncome(form) => require("principal", &form.principal)?,
            PositionDetails::VariableIncome(form) => require("quantity", &form.quantity)?,
        }

        let id = self.allocate_id();
        self.doc.positions.push(PositionRecord {
            id,
            name: name.trim().to_string(),
            broker: broker
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            details,
        });
        Ok(id)
    }

    /// Remove a record by id from one collection.
    pub fn remove(&mut self, collection: Collection, id: u64) -> Result<()> {
        let removed = match collection {
            Collection::Assets => remove_by_id(&mut self.doc.assets, id, |r| r.id),
            Collection::Liabilities => remove_by_id(&mut self.doc.liabilities, id, |r| r.id),
            Collection::Goals => remove_by_id(&mut self.doc.goals, id, |r| r.id),
            Collection::Positions => remove_by_id(&mut self.doc.positions, id, |r| r.id),
        };

        if !removed {
            return Err(CarteiraError::NotFound {
                kind: collection.record_name(),
                id,
            }
            .into());
        }
        Ok(())
    }

    /// Record the net worth for `date`, replacing a snapshot of the same day.
    pub fn record_snapshot(&mut self, date: NaiveDate, net_worth: Decimal) {
        self.doc.snapshots.retain(|s| s.date != date);
        self.doc.snapshots.push(NetWorthSnapshot { date, net_worth });
        self.doc.snapshots.sort_by_key(|s| s.date);
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: u64, id_of: impl Fn(&T) -> u64) -> bool {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    items.len() != before
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CarteiraError::Validation(format!("{} is required", field)).into());
    }
    Ok(())
}
