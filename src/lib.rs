//! Carteira - Brazilian personal finance and investment valuation
//!
//! This library values treasury, fixed income and variable income positions,
//! projects the liquid amount after income tax withholding, and keeps a small
//! JSON document of positions, balances, goals and net worth snapshots.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod goals;
pub mod reports;
pub mod store;
pub mod tax;
pub mod utils;
pub mod valuation;
