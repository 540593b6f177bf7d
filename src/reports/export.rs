use anyhow::{Context, Result};

use super::portfolio::PortfolioReport;

/// Export the valued portfolio as CSV, one row per position.
pub fn export_portfolio_csv(report: &PortfolioReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "id",
        "nome",
        "classe",
        "corretora",
        "investido",
        "valor_atual",
        "imposto_previsto",
        "valor_liquido",
    ])?;

    for position in &report.positions {
        let current = position
            .current
            .as_ref()
            .map(|c| c.current_value.to_string())
            .unwrap_or_default();
        let (tax, net) = position
            .projection
            .as_ref()
            .map(|p| (p.tax_withheld.to_string(), p.final_value.to_string()))
            .unwrap_or_default();

        writer.write_record([
            position.id.to_string(),
            position.name.clone(),
            position.class.as_str().to_string(),
            position.broker.clone().unwrap_or_default(),
            format!("{:.2}", position.invested),
            current,
            tax,
            net,
        ])?;
    }

    writer.write_record([
        String::new(),
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        format!("{:.2}", report.total_invested),
        format!("{:.2}", report.total_value),
        String::new(),
        String::new(),
    ])?;

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
