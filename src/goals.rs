//! Savings goals and emergency reserve progress.

use rust_decimal::Decimal;
use tracing::debug;

use crate::valuation::compound::round_cents;

/// Months of expenses an emergency reserve usually covers.
pub const DEFAULT_RESERVE_MONTHS: u32 = 6;

/// How much of `target` has been reached, in percent (2 places).
///
/// `None` when the target is zero or negative, or when the ratio overflows.
/// A negative balance counts as nothing saved; over-funded goals report more
/// than 100.
///
/// # Examples
/// ```
/// use carteira::goals::goal_progress;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(goal_progress(dec!(2500), dec!(10000)), Some(dec!(25)));
/// assert_eq!(goal_progress(dec!(100), dec!(0)), None);
/// ```
pub fn goal_progress(current: Decimal, target: Decimal) -> Option<Decimal> {
    if target <= Decimal::ZERO {
        return None;
    }
    let current = current.max(Decimal::ZERO);
    let percent = current
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    if percent.is_none() {
        debug!("goal progress {} / {} overflowed", current, target);
    }
    percent.map(round_cents)
}

/// Amount still missing to reach `target`, never negative.
pub fn remaining_to_goal(current: Decimal, target: Decimal) -> Decimal {
    target
        .checked_sub(current.max(Decimal::ZERO))
        .map(|missing| round_cents(missing.max(Decimal::ZERO)))
        .unwrap_or(Decimal::ZERO)
}

/// Emergency reserve target: monthly cost of living times the months to cover.
///
/// A product too large for `Decimal` gives zero.
pub fn emergency_reserve_target(monthly_cost: Decimal, months: u32) -> Decimal {
    match monthly_cost.max(Decimal::ZERO).checked_mul(Decimal::from(months)) {
        Some(target) => round_cents(target),
        None => {
            debug!("reserve target {} x {} overflowed", monthly_cost, months);
            Decimal::ZERO
        }
    }
}
