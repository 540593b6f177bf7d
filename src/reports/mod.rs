// Reports module - portfolio, net worth and goal reports over the stored document

pub mod export;
pub mod portfolio;

pub use export::export_portfolio_csv;
pub use portfolio::{
    allocation_by_class, calculate_net_worth, calculate_portfolio, distribution_by_broker,
    goal_summaries, net_worth_history, AllocationSlice, GoalSummary, HistoryRow, NetWorth,
    PortfolioReport, PositionSummary, ValuationContext,
};
