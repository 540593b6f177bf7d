use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use super::AppContext;
use crate::cli::formatters::{format_balances, format_goals, format_json};
use crate::cli::{AddPositionCommands, BalanceCommands, GoalCommands, PositionCommands};
use crate::goals::emergency_reserve_target;
use crate::reports::goal_summaries;
use crate::store::{Collection, PositionDetails};
use crate::utils::format_currency;
use crate::valuation::coerce::to_number;

#[derive(Serialize)]
struct RecordId {
    id: u64,
}

fn print_created(kind: &str, name: &str, id: u64, json: bool) {
    if json {
        println!("{}", format_json(&RecordId { id }));
    } else {
        println!("{} Added {} #{}: {}", "✓".green().bold(), kind, id, name);
    }
}

fn print_removed(kind: &str, id: u64, json: bool) {
    if json {
        println!("{}", format_json(&RecordId { id }));
    } else {
        println!("{} Removed {} #{}", "✓".green().bold(), kind, id);
    }
}

pub fn dispatch_positions(action: PositionCommands, ctx: &AppContext) -> Result<()> {
    let mut store = ctx.open_store()?;

    match action {
        PositionCommands::Add { class } => {
            let (name, broker, details) = match class {
                AddPositionCommands::Treasury {
                    name,
                    broker,
                    terms,
                } => (name, broker, PositionDetails::Treasury(terms.to_form())),
                AddPositionCommands::FixedIncome {
                    name,
                    broker,
                    terms,
                } => (name, broker, PositionDetails::FixedIncome(terms.to_form())),
                AddPositionCommands::Variable {
                    name,
                    broker,
                    terms,
                } => (name, broker, PositionDetails::VariableIncome(terms.to_form())),
            };

            let id = store.add_position(&name, broker.as_deref(), details)?;
            store.save()?;
            info!("Added position {} ({})", id, name);
            print_created("position", &name, id, ctx.json);
            Ok(())
        }
        PositionCommands::List => super::portfolio::print_portfolio(&store, ctx, None),
        PositionCommands::Remove { id } => {
            store.remove(Collection::Positions, id)?;
            store.save()?;
            print_removed("position", id, ctx.json);
            Ok(())
        }
    }
}

pub fn dispatch_balances(
    action: BalanceCommands,
    liabilities: bool,
    ctx: &AppContext,
) -> Result<()> {
    let mut store = ctx.open_store()?;
    let (kind, collection) = if liabilities {
        ("liability", Collection::Liabilities)
    } else {
        ("asset", Collection::Assets)
    };

    match action {
        BalanceCommands::Add {
            name,
            amount,
            category,
        } => {
            let id = if liabilities {
                store.add_liability(&name, &amount, category.as_deref())?
            } else {
                store.add_asset(&name, &amount, category.as_deref())?
            };
            store.save()?;
            print_created(kind, &name, id, ctx.json);
            Ok(())
        }
        BalanceCommands::List => {
            let doc = store.document();
            let records = if liabilities {
                &doc.liabilities
            } else {
                &doc.assets
            };

            if ctx.json {
                println!("{}", format_json(records));
            } else if records.is_empty() {
                println!("{} No {} records", "ℹ".blue().bold(), kind);
            } else {
                println!("{}", format_balances(records));
                let total = records.iter().map(|r| to_number(&r.amount)).sum();
                println!("{:<10} {}", "Total:".bold(), format_currency(total));
            }
            Ok(())
        }
        BalanceCommands::Remove { id } => {
            store.remove(collection, id)?;
            store.save()?;
            print_removed(kind, id, ctx.json);
            Ok(())
        }
    }
}

pub fn dispatch_goals(action: GoalCommands, ctx: &AppContext) -> Result<()> {
    match action {
        GoalCommands::Add {
            name,
            target,
            current,
            reserve,
        } => {
            let mut store = ctx.open_store()?;
            let id = store.add_goal(&name, &target, &current, reserve)?;
            store.save()?;
            print_created("goal", &name, id, ctx.json);
            Ok(())
        }
        GoalCommands::Update { id, current } => {
            let mut store = ctx.open_store()?;
            store.update_goal_current(id, &current)?;
            store.save()?;
            if ctx.json {
                println!("{}", format_json(&RecordId { id }));
            } else {
                println!("{} Updated goal #{}", "✓".green().bold(), id);
            }
            Ok(())
        }
        GoalCommands::List => {
            let store = ctx.open_store()?;
            let goals = goal_summaries(store.document());
            if ctx.json {
                println!("{}", format_json(&goals));
            } else if goals.is_empty() {
                println!("{} No goals yet", "ℹ".blue().bold());
            } else {
                println!("{}", format_goals(&goals));
            }
            Ok(())
        }
        GoalCommands::Remove { id } => {
            let mut store = ctx.open_store()?;
            store.remove(Collection::Goals, id)?;
            store.save()?;
            print_removed("goal", id, ctx.json);
            Ok(())
        }
        GoalCommands::Reserve {
            monthly_cost,
            months,
        } => {
            let target = emergency_reserve_target(to_number(&monthly_cost), months);
            if ctx.json {
                #[derive(Serialize)]
                struct ReserveOutput {
                    months: u32,
                    target: rust_decimal::Decimal,
                }
                println!("{}", format_json(&ReserveOutput { months, target }));
            } else {
                println!(
                    "Emergency reserve for {} months: {}",
                    months,
                    format_currency(target).bold()
                );
            }
            Ok(())
        }
    }
}
