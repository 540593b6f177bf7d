use chrono::NaiveDate;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::goals::{goal_progress, remaining_to_goal};
use crate::store::{AssetClass, Document, PositionDetails, PositionRecord};
use crate::valuation::coerce::to_number;
use crate::valuation::compound::round_cents;
use crate::valuation::{CurrentValuation, Diagnostic, MaturityProjection};

/// Label used for positions without a broker
pub const NO_BROKER: &str = "—";

/// What the valuation of stored positions depends on besides the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationContext {
    pub today: NaiveDate,
    pub cdi: Option<Decimal>,
    pub ipca: Option<Decimal>,
    pub manual_tax_rate: Decimal,
}

impl ValuationContext {
    pub fn new(today: NaiveDate, config: &Config) -> Self {
        Self {
            today,
            cdi: config.cdi,
            ipca: config.ipca,
            manual_tax_rate: config.manual_tax_rate,
        }
    }
}

/// Summary of a single position
#[derive(Debug, Clone, Serialize)]
pub struct PositionSummary {
    pub id: u64,
    pub name: String,
    pub broker: Option<String>,
    pub class: AssetClass,
    pub invested: Decimal,
    /// `None` while the position lacks a purchase date
    pub current: Option<CurrentValuation>,
    /// Liquid value at maturity (or on sale, for variable income)
    pub projection: Option<MaturityProjection>,
}

impl PositionSummary {
    /// Current value, counting not-yet-computable positions at their invested amount
    pub fn value_or_invested(&self) -> Decimal {
        self.current
            .as_ref()
            .map(|c| c.current_value.value())
            .unwrap_or(self.invested)
    }
}

/// Complete portfolio report
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub as_of: NaiveDate,
    pub positions: Vec<PositionSummary>,
    pub total_invested: Decimal,
    pub total_value: Decimal,
    pub total_pl: Decimal,
    pub diagnostics: Vec<Diagnostic>,
}

/// Value every stored position at `ctx.today`.
pub fn calculate_portfolio(doc: &Document, ctx: &ValuationContext) -> PortfolioReport {
    let positions: Vec<PositionSummary> = doc
        .positions
        .iter()
        .map(|p| summarize_position(p, ctx))
        .collect();

    let mut diagnostics = Vec::new();
    let total_invested = checked_total(positions.iter().map(|p| p.invested), &mut diagnostics);
    let total_value = checked_total(
        positions.iter().map(|p| p.value_or_invested()),
        &mut diagnostics,
    );
    let total_pl = or_overflow(total_value.checked_sub(total_invested), &mut diagnostics);

    PortfolioReport {
        as_of: ctx.today,
        positions,
        total_invested,
        total_value,
        total_pl,
        diagnostics,
    }
}

/// Sum that degrades to zero (flagged) instead of overflowing.
fn checked_total(
    values: impl IntoIterator<Item = Decimal>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Decimal {
    let total = values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value));
    or_overflow(total, diagnostics)
}

fn or_overflow(value: Option<Decimal>, diagnostics: &mut Vec<Diagnostic>) -> Decimal {
    value.unwrap_or_else(|| {
        debug!("report total overflowed, reporting zero");
        if !diagnostics.contains(&Diagnostic::ArithmeticOverflow) {
            diagnostics.push(Diagnostic::ArithmeticOverflow);
        }
        Decimal::ZERO
    })
}

fn summarize_position(record: &PositionRecord, ctx: &ValuationContext) -> PositionSummary {
    let (invested, current, projection) = match &record.details {
        PositionDetails::Treasury(form) => {
            (form.principal(), form.valuate(ctx.today), form.project())
        }
        PositionDetails::FixedIncome(form) => {
            let mut form = form.clone();
            if form.cdi.is_none() {
                form.cdi = ctx.cdi.map(|cdi| cdi.to_string());
            }
            if form.ipca.is_none() {
                form.ipca = ctx.ipca.map(|ipca| ipca.to_string());
            }
            (form.principal(), form.valuate(ctx.today), form.project())
        }
        PositionDetails::VariableIncome(form) => {
            let current = form.valuate();
            let invested = form
                .cost_basis()
                .unwrap_or_else(|| current.current_value.value());
            (
                invested,
                Some(current),
                form.project_sale(ctx.manual_tax_rate),
            )
        }
    };

    PositionSummary {
        id: record.id,
        name: record.name.clone(),
        broker: record.broker.clone(),
        class: record.details.class(),
        invested,
        current,
        projection,
    }
}

/// Assets + investments - liabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetWorth {
    pub as_of: NaiveDate,
    pub assets: Decimal,
    pub investments: Decimal,
    pub liabilities: Decimal,
    pub net_worth: Decimal,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn calculate_net_worth(doc: &Document, ctx: &ValuationContext) -> NetWorth {
    let portfolio = calculate_portfolio(doc, ctx);
    let mut diagnostics = portfolio.diagnostics;
    let investments = portfolio.total_value;

    let assets = checked_total(doc.assets.iter().map(|a| to_number(&a.amount)), &mut diagnostics);
    let liabilities = checked_total(
        doc.liabilities.iter().map(|l| to_number(&l.amount)),
        &mut diagnostics,
    );
    let net_worth = or_overflow(
        assets
            .checked_add(investments)
            .and_then(|gross| gross.checked_sub(liabilities)),
        &mut diagnostics,
    );

    NetWorth {
        as_of: ctx.today,
        assets: round_cents(assets),
        investments: round_cents(investments),
        liabilities: round_cents(liabilities),
        net_worth: round_cents(net_worth),
        diagnostics,
    }
}

/// One slice of a distribution chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSlice {
    pub label: String,
    pub value: Decimal,
    pub percent: Decimal,
}

/// Share of the portfolio per asset class, largest first.
pub fn allocation_by_class(report: &PortfolioReport) -> Vec<AllocationSlice> {
    distribute(report, |p| p.class.as_str().to_string())
}

/// Share of the portfolio per broker, largest first.
pub fn distribution_by_broker(report: &PortfolioReport) -> Vec<AllocationSlice> {
    distribute(report, |p| {
        p.broker.clone().unwrap_or_else(|| NO_BROKER.to_string())
    })
}

fn distribute(
    report: &PortfolioReport,
    label_of: impl Fn(&PositionSummary) -> String,
) -> Vec<AllocationSlice> {
    let total = report.total_value;

    report
        .positions
        .iter()
        .map(|p| (label_of(p), p.value_or_invested()))
        .into_group_map()
        .into_iter()
        .map(|(label, values)| {
            let value = values
                .into_iter()
                .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
                .unwrap_or(Decimal::ZERO);
            let percent = value
                .checked_div(total)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .map(round_cents)
                .unwrap_or(Decimal::ZERO);
            AllocationSlice {
                label,
                value: round_cents(value),
                percent,
            }
        })
        .sorted_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)))
        .collect()
}

/// Net worth snapshot with the change since the previous one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub net_worth: Decimal,
    pub change: Option<Decimal>,
}

pub fn net_worth_history(doc: &Document) -> Vec<HistoryRow> {
    let sorted: Vec<_> = doc.snapshots.iter().sorted_by_key(|s| s.date).collect();

    sorted
        .iter()
        .enumerate()
        .map(|(i, snapshot)| HistoryRow {
            date: snapshot.date,
            net_worth: snapshot.net_worth,
            change: i
                .checked_sub(1)
                .and_then(|prev| snapshot.net_worth.checked_sub(sorted[prev].net_worth)),
        })
        .collect()
}

/// Progress of a savings goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalSummary {
    pub id: u64,
    pub name: String,
    pub emergency_reserve: bool,
    pub target: Decimal,
    pub current: Decimal,
    pub percent: Option<Decimal>,
    pub remaining: Decimal,
}

pub fn goal_summaries(doc: &Document) -> Vec<GoalSummary> {
    doc.goals
        .iter()
        .map(|goal| {
            let target = to_number(&goal.target);
            let current = to_number(&goal.current);
            GoalSummary {
                id: goal.id,
                name: goal.name.clone(),
                emergency_reserve: goal.emergency_reserve,
                target,
                current,
                percent: goal_progress(current, target),
                remaining: remaining_to_goal(current, target),
            }
        })
        .collect()
}
