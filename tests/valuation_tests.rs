use carteira::goals::{emergency_reserve_target, goal_progress};
use carteira::tax::{regressive_rate, InstrumentKind, TaxTreatment};
use carteira::valuation::{
    project_maturity_value, valuate_fixed_income, valuate_treasury, valuate_variable_income,
    Diagnostic, FixedIncomeForm, RateSpec, TreasuryForm, VariableIncomeForm,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixed_income(rate_type: &str, rate: &str, instrument: Option<&str>) -> FixedIncomeForm {
    FixedIncomeForm {
        principal: "10.000,00".to_string(),
        rate_type: rate_type.to_string(),
        rate: rate.to_string(),
        cdi: None,
        ipca: None,
        instrument: instrument.map(str::to_string),
        purchase_date: Some("2023-01-01".to_string()),
        maturity_date: Some("01/01/2025".to_string()),
    }
}

#[test]
fn treasury_one_year_at_ten_percent() {
    let valuation = valuate_treasury(
        dec!(1000),
        dec!(10),
        Some(date(2023, 1, 1)),
        None,
        date(2024, 1, 1),
    )
    .unwrap();

    assert_eq!(valuation.current_value.value(), dec!(1100.00));
    assert_eq!(valuation.period.unwrap().days, 365);
    assert!(valuation.diagnostics.is_empty());
}

#[test]
fn treasury_without_purchase_date_is_not_computable() {
    assert!(valuate_treasury(dec!(1000), dec!(10), None, None, date(2024, 1, 1)).is_none());
}

#[test]
fn valuation_stops_at_maturity() {
    let before = valuate_treasury(
        dec!(1000),
        dec!(10),
        Some(date(2023, 1, 1)),
        Some(date(2024, 1, 1)),
        date(2024, 1, 1),
    )
    .unwrap();
    let after = valuate_treasury(
        dec!(1000),
        dec!(10),
        Some(date(2023, 1, 1)),
        Some(date(2024, 1, 1)),
        date(2026, 6, 30),
    )
    .unwrap();

    assert_eq!(before.current_value, after.current_value);
}

#[test]
fn cdi_and_equivalent_ipca_agree() {
    let cdi = RateSpec::PosFixadoCdi {
        percent_of_cdi: dec!(100),
        current_cdi: dec!(10.5),
    };
    let ipca = RateSpec::Ipca {
        reference_ipca: Some(dec!(4.5)),
        fixed_spread: dec!(6),
    };

    let by_cdi = valuate_fixed_income(
        dec!(2000),
        Some(&cdi),
        Some(date(2023, 1, 1)),
        None,
        date(2025, 1, 1),
    )
    .unwrap();
    let by_ipca = valuate_fixed_income(
        dec!(2000),
        Some(&ipca),
        Some(date(2023, 1, 1)),
        None,
        date(2025, 1, 1),
    )
    .unwrap();

    assert_eq!(by_cdi.current_value.value(), dec!(2442.72));
    assert_eq!(by_ipca.current_value, by_cdi.current_value);
}

#[test]
fn ipca_without_reference_uses_spread_and_says_so() {
    let spec = RateSpec::Ipca {
        reference_ipca: None,
        fixed_spread: dec!(6),
    };
    let valuation = valuate_fixed_income(
        dec!(2000),
        Some(&spec),
        Some(date(2023, 1, 1)),
        None,
        date(2025, 1, 1),
    )
    .unwrap();

    assert_eq!(valuation.current_value.value(), dec!(2247.56));
    assert_eq!(valuation.diagnostics, vec![Diagnostic::IpcaSpreadOnly]);
}

#[test]
fn unknown_rate_type_keeps_principal() {
    let form = fixed_income("poupanca", "6", None);
    let valuation = form.valuate(date(2025, 1, 1)).unwrap();

    assert_eq!(valuation.current_value.value(), dec!(10000.00));
    assert!(valuation.diagnostics.contains(&Diagnostic::UnknownRateType));
}

#[test]
fn cdb_and_lci_differ_only_by_tax() {
    let cdb = fixed_income("prefixado", "10,5", Some("CDB")).project().unwrap();
    let lci = fixed_income("pré-fixado", "10,5", Some("LCI")).project().unwrap();

    assert_eq!(cdb.gross_value.value(), dec!(12213.59));
    assert_eq!(lci.gross_value, cdb.gross_value);

    assert_eq!(cdb.days_held, Some(731));
    assert_eq!(cdb.tax_rate, Some(dec!(15)));
    assert_eq!(cdb.tax_withheld.value(), dec!(332.04));
    assert_eq!(cdb.final_value.value(), dec!(11881.55));

    assert_eq!(lci.tax_withheld.value(), Decimal::ZERO);
    assert_eq!(lci.final_value, lci.gross_value);
}

#[test]
fn treasury_projection_uses_holding_bracket() {
    let form = TreasuryForm {
        principal: "1000".to_string(),
        annual_rate: "10".to_string(),
        purchase_date: Some("2023-01-01".to_string()),
        maturity_date: Some("2024-01-01".to_string()),
    };
    let projection = form.project().unwrap();

    assert_eq!(projection.gross_value.value(), dec!(1100.00));
    assert_eq!(projection.tax_rate, Some(dec!(17.5)));
    assert_eq!(projection.tax_withheld.value(), dec!(17.50));
    assert_eq!(projection.final_value.value(), dec!(1082.50));
}

#[test]
fn projection_never_exceeds_gross() {
    for days in [1, 90, 180, 181, 360, 361, 720, 721, 2000] {
        let purchase = date(2020, 1, 1);
        let maturity = purchase + chrono::Duration::days(days);
        let projection = project_maturity_value(
            dec!(1500),
            dec!(1000),
            Some(purchase),
            Some(maturity),
            TaxTreatment::Regressive,
        );
        assert!(projection.final_value <= projection.gross_value);
        assert_eq!(projection.tax_rate, Some(regressive_rate(days)));
    }
}

#[test]
fn loss_is_never_taxed() {
    let projection = project_maturity_value(
        dec!(900),
        dec!(1000),
        Some(date(2023, 1, 1)),
        Some(date(2023, 3, 1)),
        TaxTreatment::Regressive,
    );
    assert_eq!(projection.tax_withheld.value(), Decimal::ZERO);
    assert_eq!(projection.final_value.value(), dec!(900.00));
}

#[test]
fn variable_income_sale_at_swing_trade_rate() {
    let form = VariableIncomeForm {
        quantity: "100".to_string(),
        current_price: "25,30".to_string(),
        average_price: Some("20".to_string()),
    };

    assert_eq!(form.valuate().current_value.value(), dec!(2530.00));

    let sale = form.project_sale(dec!(15)).unwrap();
    assert_eq!(sale.tax_withheld.value(), dec!(79.50));
    assert_eq!(sale.final_value.value(), dec!(2450.50));
}

#[test]
fn variable_income_with_garbage_input_is_zero() {
    let valuation = valuate_variable_income(Decimal::ZERO, dec!(10));
    assert_eq!(valuation.current_value.value(), Decimal::ZERO);
    assert!(valuation.period.is_none());
}

#[test]
fn exempt_instruments() {
    for kind in ["LCI", "lca", "CRI", "cra"] {
        let kind = kind.parse::<InstrumentKind>().unwrap();
        assert_eq!(kind.tax_treatment(dec!(15)), TaxTreatment::Exempt);
    }
    let cdb = "CDB".parse::<InstrumentKind>().unwrap();
    assert_eq!(cdb.tax_treatment(dec!(15)), TaxTreatment::Regressive);
}

#[test]
fn goals_and_reserve() {
    assert_eq!(goal_progress(dec!(2500), dec!(10000)), Some(dec!(25.00)));
    assert_eq!(goal_progress(dec!(100), Decimal::ZERO), None);
    assert_eq!(emergency_reserve_target(dec!(3000), 6), dec!(18000.00));
}
