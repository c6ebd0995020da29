use crate::core::cashflow::AggregatedCashflow;
use crate::core::pnl::PnlLedger;
use crate::curve::forward_points::ForwardPointsCurve;
use crate::engine::expansion::ProcessingSummary;
use crate::engine::horizon::HorizonSummary;
use crate::io::{IoError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Date layout used in the aggregated cashflow CSV.
pub const CSV_DATE_FORMAT: &str = "%d/%m/%Y";

/// Write aggregated cashflows as `Date,Currency,Cashflow`.
pub fn write_cashflow_csv<W: Write>(writer: W, cashflows: &[AggregatedCashflow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Currency", "Cashflow"])?;
    for cf in cashflows {
        wtr.write_record([
            cf.date.format(CSV_DATE_FORMAT).to_string(),
            cf.currency.to_string(),
            cf.amount.normalize().to_string(),
        ])?;
    }
    wtr.flush().map_err(|e| IoError::Csv(e.into()))?;
    Ok(())
}

/// Write the aggregated cashflow CSV to `path`, creating parent directories.
pub fn write_cashflow_csv_file(path: impl AsRef<Path>, cashflows: &[AggregatedCashflow]) -> Result<()> {
    let path = path.as_ref();
    let file_error = |source| IoError::File {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(file_error)?;
    }
    let file = File::create(path).map_err(file_error)?;
    write_cashflow_csv(file, cashflows)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotRateOutput {
    pub pair: String,
    pub rate: Decimal,
}

/// Everything a run hands to report rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub cashflows: Vec<AggregatedCashflow>,
    pub pnl: PnlLedger,
    pub spot_rates: Vec<SpotRateOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon: Option<HorizonSummary>,
    pub summary: ProcessingSummary,
}

impl RunReport {
    pub fn new(
        cashflows: Vec<AggregatedCashflow>,
        pnl: PnlLedger,
        curve: &ForwardPointsCurve,
        horizon: Option<HorizonSummary>,
        summary: ProcessingSummary,
    ) -> Self {
        let spot_rates = curve
            .spot_rates()
            .into_iter()
            .map(|(pair, rate)| SpotRateOutput {
                pair: pair.to_string(),
                rate,
            })
            .collect();
        Self {
            cashflows,
            pnl,
            spot_rates,
            horizon,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Aggregated Cashflows ===")?;
        if self.cashflows.is_empty() {
            writeln!(f, "(none)")?;
        }
        for cf in &self.cashflows {
            writeln!(f, "{}  {:<4}{:>22}", cf.date, cf.currency, cf.amount.round_dp(2))?;
        }
        writeln!(f)?;
        write!(f, "{}", self.pnl)?;

        if !self.spot_rates.is_empty() {
            writeln!(f, "\n=== Spot Rates ===")?;
            for spot in &self.spot_rates {
                writeln!(f, "{:<10}{}", spot.pair, spot.rate.round_dp(6))?;
            }
        }
        if let Some(horizon) = &self.horizon {
            writeln!(f)?;
            write!(f, "{}", horizon)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn flows() -> Vec<AggregatedCashflow> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        vec![
            AggregatedCashflow::new(day, CurrencyCode::new("EUR"), dec!(1000000)),
            AggregatedCashflow::new(day, CurrencyCode::new("USD"), dec!(-1100000.50)),
        ]
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_cashflow_csv(&mut buf, &flows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Date,Currency,Cashflow\n10/01/2024,EUR,1000000\n10/01/2024,USD,-1100000.5\n"
        );
    }

    #[test]
    fn test_csv_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cashflows.csv");
        write_cashflow_csv_file(&path, &flows()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("Date,Currency,Cashflow"));
    }

    #[test]
    fn test_report_json() {
        let pnl: PnlLedger = [(CurrencyCode::new("USD"), dec!(-1000))].into_iter().collect();
        let report = RunReport::new(
            flows(),
            pnl,
            &ForwardPointsCurve::empty(),
            None,
            ProcessingSummary::default(),
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["cashflows"][0]["currency"], "EUR");
        assert_eq!(json["pnl"]["USD"], "-1000");
        assert!(json.get("horizon").is_none());
        assert!(report.to_string().contains("Aggregated Cashflows"));
    }
}
