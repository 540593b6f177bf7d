//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of valuation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::reports::{
    AllocationSlice, GoalSummary, HistoryRow, NetWorth, PortfolioReport,
};
use crate::store::BalanceRecord;
use crate::utils::{format_currency, format_percent};
use crate::valuation::coerce::to_number;
use crate::valuation::{CurrentValuation, Diagnostic, MaturityProjection};

/// Serialize any report for `--json` output
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

fn colored_pl(value: Decimal) -> String {
    let text = format_currency(value);
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Warnings attached to a result, one per line
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("{} {}\n", "⚠".yellow().bold(), d.description()))
        .collect()
}

/// Detail view of a single valuation
pub fn format_current_valuation(valuation: &CurrentValuation) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<20} {}\n",
        "Current value:".bold(),
        format_currency(valuation.current_value.value()).green()
    ));

    if let Some(period) = &valuation.period {
        output.push_str(&format!(
            "{:<20} {}\n",
            "Effective rate:".bold(),
            format_percent(valuation.effective_rate)
        ));
        output.push_str(&format!(
            "{:<20} {} ({} days)\n",
            "Reference date:".bold(),
            period.reference_date.format("%d/%m/%Y"),
            period.days
        ));
    }

    output.push_str(&format_diagnostics(&valuation.diagnostics));
    output
}

/// Detail view of a maturity (or sale) projection
pub fn format_projection(projection: &MaturityProjection) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<20} {}\n",
        "Gross value:".bold(),
        format_currency(projection.gross_value.value())
    ));

    match projection.tax_rate {
        Some(rate) => {
            let held = projection
                .days_held
                .map(|d| format!(" after {} days", d))
                .unwrap_or_default();
            output.push_str(&format!(
                "{:<20} {} ({}{})\n",
                "IR withheld:".bold(),
                format_currency(projection.tax_withheld.value()).red(),
                format_percent(rate),
                held
            ));
        }
        None => {
            output.push_str(&format!(
                "{:<20} {}\n",
                "IR withheld:".bold(),
                "not computed (purchase and maturity dates required)".dimmed()
            ));
        }
    }

    output.push_str(&format!(
        "{:<20} {}\n",
        "Net value:".bold(),
        format_currency(projection.final_value.value()).green().bold()
    ));
    output.push_str(&format_diagnostics(&projection.diagnostics));
    output
}

/// Format a portfolio report for terminal table output
pub fn format_portfolio_table(report: &PortfolioReport) -> String {
    let mut output = format!(
        "\n{} Portfolio as of {}\n\n",
        "📊".cyan().bold(),
        report.as_of.format("%d/%m/%Y")
    );

    #[derive(Tabled)]
    struct PositionRow {
        #[tabled(rename = "ID")]
        id: u64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Class")]
        class: String,
        #[tabled(rename = "Broker")]
        broker: String,
        #[tabled(rename = "Invested")]
        invested: String,
        #[tabled(rename = "Current")]
        current: String,
        #[tabled(rename = "Net at maturity")]
        net: String,
    }

    let rows: Vec<PositionRow> = report
        .positions
        .iter()
        .map(|p| PositionRow {
            id: p.id,
            name: p.name.clone(),
            class: p.class.as_str().to_string(),
            broker: p.broker.clone().unwrap_or_else(|| "-".to_string()),
            invested: format_currency(p.invested),
            current: p
                .current
                .as_ref()
                .map(|c| format_currency(c.current_value.value()))
                .unwrap_or_else(|| "Calculating...".dimmed().to_string()),
            net: p
                .projection
                .as_ref()
                .map(|m| format_currency(m.final_value.value()))
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(4..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format!("\n\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total invested:".bold(),
        format_currency(report.total_invested)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total value:".bold(),
        format_currency(report.total_value)
    ));
    output.push_str(&format!(
        "\n{:<20} {}\n",
        "Total P&L:".bold(),
        colored_pl(report.total_pl)
    ));
    output.push_str(&format_diagnostics(&report.diagnostics));

    output
}

/// Format empty portfolio message
pub fn format_empty_portfolio() -> String {
    format!(
        "{} No positions found\nAdd one using: {} positions add <class> ...\n",
        "ℹ".blue().bold(),
        "carteira".bold()
    )
}

/// Distribution table (allocation by class or broker)
pub fn format_slices(title: &str, slices: &[AllocationSlice]) -> String {
    #[derive(Tabled)]
    struct SliceRow {
        #[tabled(rename = "")]
        label: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "%")]
        percent: String,
    }

    let rows: Vec<SliceRow> = slices
        .iter()
        .map(|s| SliceRow {
            label: s.label.clone(),
            value: format_currency(s.value),
            percent: format_percent(s.percent),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());

    format!("\n{} {}\n\n{}\n", "📊".cyan().bold(), title, table)
}

pub fn format_net_worth(net: &NetWorth) -> String {
    let summary = format!(
        "\n{} Net worth as of {}\n\n{:<20} {}\n{:<20} {}\n{:<20} {}\n{:<20} {}\n",
        "💰".cyan().bold(),
        net.as_of.format("%d/%m/%Y"),
        "Assets:".bold(),
        format_currency(net.assets),
        "Investments:".bold(),
        format_currency(net.investments),
        "Liabilities:".bold(),
        format_currency(net.liabilities).red(),
        "Net worth:".bold(),
        colored_pl(net.net_worth)
    );
    summary + &format_diagnostics(&net.diagnostics)
}

pub fn format_history(rows: &[HistoryRow]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Net worth")]
        net_worth: String,
        #[tabled(rename = "Change")]
        change: String,
    }

    let rows: Vec<Row> = rows
        .iter()
        .map(|r| Row {
            date: r.date.format("%d/%m/%Y").to_string(),
            net_worth: format_currency(r.net_worth),
            change: r.change.map(colored_pl).unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

pub fn format_goals(goals: &[GoalSummary]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: u64,
        #[tabled(rename = "Goal")]
        name: String,
        #[tabled(rename = "Saved")]
        current: String,
        #[tabled(rename = "Target")]
        target: String,
        #[tabled(rename = "Progress")]
        progress: String,
        #[tabled(rename = "Missing")]
        remaining: String,
    }

    let rows: Vec<Row> = goals
        .iter()
        .map(|g| Row {
            id: g.id,
            name: if g.emergency_reserve {
                format!("{} (reserva)", g.name)
            } else {
                g.name.clone()
            },
            current: format_currency(g.current),
            target: format_currency(g.target),
            progress: g
                .percent
                .map(format_percent)
                .unwrap_or_else(|| "N/A".to_string()),
            remaining: format_currency(g.remaining),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(2..), Alignment::right());
    table.to_string()
}

pub fn format_balances(records: &[BalanceRecord]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: u64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Amount")]
        amount: String,
    }

    let rows: Vec<Row> = records
        .iter()
        .map(|r| Row {
            id: r.id,
            name: r.name.clone(),
            category: r.category.clone().unwrap_or_else(|| "-".to_string()),
            amount: format_currency(to_number(&r.amount)),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(3..), Alignment::right());
    table.to_string()
}
