use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::AppContext;
use crate::cli::formatters::{
    format_current_valuation, format_json, format_projection,
};
use crate::cli::{FixedIncomeArgs, TaxCommands, ValueCommands};
use crate::tax::{regressive_rate, InstrumentKind, TaxTreatment};
use crate::utils::format_percent;
use crate::valuation::coerce::{to_date_opt, to_number};
use crate::valuation::{project_maturity_value, CurrentValuation, MaturityProjection};

/// Current value and, when computable, the liquid value at maturity
#[derive(Serialize)]
struct ValueOutput {
    current: Option<CurrentValuation>,
    maturity: Option<MaturityProjection>,
}

pub fn dispatch_value(action: ValueCommands, ctx: &AppContext) -> Result<()> {
    let output = match action {
        ValueCommands::Treasury(args) => {
            let form = args.to_form();
            ValueOutput {
                current: form.valuate(ctx.today),
                maturity: form.project(),
            }
        }
        ValueCommands::FixedIncome(args) => {
            let form = with_configured_rates(args, ctx).to_form();
            ValueOutput {
                current: form.valuate(ctx.today),
                maturity: form.project(),
            }
        }
        ValueCommands::Variable { position, tax_rate } => {
            let form = position.to_form();
            let rate = tax_rate
                .as_deref()
                .map(to_number)
                .unwrap_or(ctx.config.manual_tax_rate);
            ValueOutput {
                current: Some(form.valuate()),
                maturity: form.project_sale(rate),
            }
        }
    };

    print_value_output(&output, ctx.json);
    Ok(())
}

fn with_configured_rates(mut args: FixedIncomeArgs, ctx: &AppContext) -> FixedIncomeArgs {
    if args.cdi.is_none() {
        args.cdi = ctx.config.cdi.map(|cdi| cdi.to_string());
    }
    if args.ipca.is_none() {
        args.ipca = ctx.config.ipca.map(|ipca| ipca.to_string());
    }
    args
}

fn print_value_output(output: &ValueOutput, json: bool) {
    if json {
        println!("{}", format_json(output));
        return;
    }

    match &output.current {
        Some(current) => {
            println!("\n{} Current position\n", "📈".cyan().bold());
            print!("{}", format_current_valuation(current));
        }
        None => {
            println!(
                "{} Calculating... (purchase date required)",
                "ℹ".blue().bold()
            );
        }
    }

    if let Some(maturity) = &output.maturity {
        println!("\n{} At maturity\n", "🏁".cyan().bold());
        print!("{}", format_projection(maturity));
    }
}

pub fn dispatch_tax(action: TaxCommands, ctx: &AppContext) -> Result<()> {
    match action {
        TaxCommands::Rate { days } => {
            let rate = regressive_rate(days);
            if ctx.json {
                #[derive(Serialize)]
                struct RateOutput {
                    days: i64,
                    rate: rust_decimal::Decimal,
                }
                println!("{}", format_json(&RateOutput { days, rate }));
            } else {
                println!(
                    "IR for {} days held: {}",
                    days,
                    format_percent(rate).bold()
                );
            }
            Ok(())
        }
        TaxCommands::Project {
            gross,
            principal,
            purchase,
            maturity,
            instrument,
            exempt,
            manual_rate,
        } => {
            let treatment = match (manual_rate.as_deref(), instrument.as_deref()) {
                (Some(rate), _) => TaxTreatment::Manual(to_number(rate)),
                (None, Some(kind)) => kind
                    .parse::<InstrumentKind>()
                    .map(|k| k.tax_treatment(ctx.config.manual_tax_rate))
                    .map_err(|_| {
                        crate::error::CarteiraError::Validation(format!(
                            "unknown instrument '{}'",
                            kind
                        ))
                    })?,
                (None, None) => TaxTreatment::from_exempt_flag(exempt),
            };

            let projection = project_maturity_value(
                to_number(&gross),
                to_number(&principal),
                to_date_opt(purchase.as_deref()),
                to_date_opt(maturity.as_deref()),
                treatment,
            );

            if ctx.json {
                println!("{}", format_json(&projection));
            } else {
                print!("{}", format_projection(&projection));
            }
            Ok(())
        }
    }
}
