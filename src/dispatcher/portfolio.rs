use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::AppContext;
use crate::cli::formatters::{
    format_empty_portfolio, format_history, format_json, format_net_worth,
    format_portfolio_table, format_slices,
};
use crate::cli::{NetWorthCommands, PortfolioCommands};
use crate::reports::{
    allocation_by_class, calculate_net_worth, calculate_portfolio, distribution_by_broker,
    export_portfolio_csv, net_worth_history,
};
use crate::store::JsonStore;

pub fn dispatch_portfolio(action: PortfolioCommands, ctx: &AppContext) -> Result<()> {
    let store = ctx.open_store()?;

    match action {
        PortfolioCommands::Show { export } => print_portfolio(&store, ctx, export),
        PortfolioCommands::Allocation => {
            let report = calculate_portfolio(store.document(), &ctx.valuation_context());
            let slices = allocation_by_class(&report);
            if ctx.json {
                println!("{}", format_json(&slices));
            } else if slices.is_empty() {
                println!("{}", format_empty_portfolio());
            } else {
                println!("{}", format_slices("Allocation by class", &slices));
            }
            Ok(())
        }
        PortfolioCommands::Brokers => {
            let report = calculate_portfolio(store.document(), &ctx.valuation_context());
            let slices = distribution_by_broker(&report);
            if ctx.json {
                println!("{}", format_json(&slices));
            } else if slices.is_empty() {
                println!("{}", format_empty_portfolio());
            } else {
                println!("{}", format_slices("Distribution by broker", &slices));
            }
            Ok(())
        }
    }
}

/// Value every stored position and print it, optionally exporting CSV
pub fn print_portfolio(
    store: &JsonStore,
    ctx: &AppContext,
    export: Option<PathBuf>,
) -> Result<()> {
    let report = calculate_portfolio(store.document(), &ctx.valuation_context());

    if let Some(path) = export {
        let csv = export_portfolio_csv(&report)?;
        fs::write(&path, csv)
            .with_context(|| format!("Failed to write CSV export to {:?}", path))?;
        info!("Exported {} positions to {:?}", report.positions.len(), path);
        if !ctx.json {
            println!("{} Exported to {}", "✓".green().bold(), path.display());
        }
    }

    if ctx.json {
        println!("{}", format_json(&report));
    } else if report.positions.is_empty() {
        println!("{}", format_empty_portfolio());
    } else {
        println!("{}", format_portfolio_table(&report));
    }
    Ok(())
}

pub fn dispatch_net_worth(action: NetWorthCommands, ctx: &AppContext) -> Result<()> {
    match action {
        NetWorthCommands::Show => {
            let store = ctx.open_store()?;
            let net = calculate_net_worth(store.document(), &ctx.valuation_context());
            if ctx.json {
                println!("{}", format_json(&net));
            } else {
                println!("{}", format_net_worth(&net));
            }
            Ok(())
        }
        NetWorthCommands::Snapshot => {
            let mut store = ctx.open_store()?;
            let net = calculate_net_worth(store.document(), &ctx.valuation_context());
            store.record_snapshot(net.as_of, net.net_worth);
            store.save()?;
            info!("Snapshot {} recorded for {}", net.net_worth, net.as_of);

            if ctx.json {
                println!("{}", format_json(&net));
            } else {
                println!(
                    "{} Snapshot recorded for {}",
                    "✓".green().bold(),
                    net.as_of.format("%d/%m/%Y")
                );
                println!("{}", format_net_worth(&net));
            }
            Ok(())
        }
        NetWorthCommands::History => {
            let store = ctx.open_store()?;
            let rows = net_worth_history(store.document());
            if ctx.json {
                println!("{}", format_json(&rows));
            } else if rows.is_empty() {
                println!(
                    "{} No snapshots yet. Record one with: {} networth snapshot",
                    "ℹ".blue().bold(),
                    "carteira".bold()
                );
            } else {
                println!("{}", format_history(&rows));
            }
            Ok(())
        }
    }
}
