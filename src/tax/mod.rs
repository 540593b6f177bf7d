// Tax module - Brazilian IR rules on investment gains (regressive table, exemptions)

pub mod withholding;

pub use withholding::{
    regressive_rate, InstrumentKind, TaxTreatment, DAY_TRADE_RATE, LONG_TERM_RATE,
    REGRESSIVE_TABLE, SWING_TRADE_RATE,
};
