//! Forward points report decoding.
//!
//! Two layouts are accepted:
//!
//! - **Sectioned**: blocks separated by blank lines. Each block starts with
//!   a line holding the pair code, followed by a CSV table with a
//!   `Tenor,SettlementDate,BidPoints,AskPoints,BidOutright,AskOutright` header.
//! - **Flat**: one CSV table whose header mentions `Tenor` and
//!   `SettlementDate`. Rows name their pair in a `Pair` column, or the pair
//!   is inferred from the header (e.g. `EURUSD Tenor,SettlementDate,...`).

use crate::core::currency::CurrencyPair;
use crate::curve::forward_points::ForwardPointsCurve;
use crate::curve::points::RawPointsRow;
use crate::io::{read_text, Result};
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use std::path::Path;

/// Pair name used when a flat report gives no way to tell its pair.
pub const UNKNOWN_PAIR: &str = "UNKNOWN";

const COLUMNS: &[&str] = &[
    "Pair",
    "Tenor",
    "SettlementDate",
    "Days",
    "BidPoints",
    "AskPoints",
    "BidOutright",
    "AskOutright",
];

pub fn read_points_report(path: impl AsRef<Path>) -> Result<Vec<RawPointsRow>> {
    parse_points_report(&read_text(path.as_ref())?)
}

/// Build a curve from a report file.
///
/// A missing or unreadable report yields an empty curve, so that the run
/// degrades to cashflows without forward-points PnL.
pub fn load_curve(path: impl AsRef<Path>) -> ForwardPointsCurve {
    let path = path.as_ref();
    match read_points_report(path) {
        Ok(rows) => {
            let curve = ForwardPointsCurve::load(rows);
            info!(
                "loaded forward points for {} pair(s) from {}",
                curve.pair_count(),
                path.display()
            );
            curve
        }
        Err(e) => {
            warn!("cannot load forward points report: {}", e);
            ForwardPointsCurve::empty()
        }
    }
}

/// Decode either report layout.
pub fn parse_points_report(content: &str) -> Result<Vec<RawPointsRow>> {
    let content = content.replace("\r\n", "\n");
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    if first_line.contains("Tenor") && first_line.contains("SettlementDate") {
        parse_flat(&content)
    } else {
        parse_sectioned(&content)
    }
}

fn parse_flat(content: &str) -> Result<Vec<RawPointsRow>> {
    let mut lines = content.lines().skip_while(|l| l.trim().is_empty());
    let header = lines.next().unwrap_or("");
    let inferred = infer_pair(header);

    // "EURUSD Tenor" -> "Tenor"
    let normalized_header: Vec<&str> = header
        .split(',')
        .map(|cell| cell.split_whitespace().last().unwrap_or(""))
        .collect();
    let body: Vec<&str> = lines.collect();
    let table = format!("{}\n{}", normalized_header.join(","), body.join("\n"));

    let mut rows = decode_table(&table)?;
    for row in &mut rows {
        if row.pair.trim().is_empty() {
            row.pair = inferred.clone().unwrap_or_else(|| UNKNOWN_PAIR.to_string());
        }
    }
    Ok(rows)
}

fn parse_sectioned(content: &str) -> Result<Vec<RawPointsRow>> {
    let mut rows = Vec::new();
    for block in blocks(content) {
        let Some((title, table)) = block.split_first() else {
            continue;
        };
        if table.is_empty() {
            continue;
        }
        let pair = title.trim().trim_end_matches(',').trim();
        for mut row in decode_table(&table.join("\n"))? {
            row.pair = pair.to_string();
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Split text into runs of non-blank lines.
fn blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn decode_table(table: &str) -> Result<Vec<RawPointsRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(table.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// First header token that reads as a currency pair.
fn infer_pair(header: &str) -> Option<String> {
    header
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty() && !COLUMNS.contains(t))
        .filter(|t| t.chars().all(|c| c.is_ascii_alphabetic() || c == '/'))
        .find(|t| CurrencyPair::parse(t).is_well_formed())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const SECTIONED: &str = "\
EURUSD
Tenor,SettlementDate,BidPoints,AskPoints,BidOutright,AskOutright
SP,2024/01/12,0,0,1.0950,1.0952
1M,2024/02/12,20.5,21.5,,
3M,2024/04/12,60,62,,

USDJPY
Tenor,SettlementDate,BidPoints,AskPoints,BidOutright,AskOutright
SP,2024/01/12,0,0,145.10,145.14
3M,2024/04/12,-210,-206,,
";

    #[test]
    fn test_sectioned_layout() {
        let rows = parse_points_report(SECTIONED).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].pair, "EURUSD");
        assert_eq!(rows[3].pair, "USDJPY");
        assert_eq!(rows[4].bid_points, "-210");

        let curve = ForwardPointsCurve::load(rows);
        let eurusd = CurrencyPair::parse("EURUSD");
        assert_eq!(curve.spot_rate(&eurusd), Some(dec!(1.0951)));
        assert_eq!(curve.points_at_tenor(&eurusd, "1M"), Some(dec!(21)));
        assert_eq!(curve.spot_rate(&CurrencyPair::parse("USD/JPY")), Some(dec!(145.12)));
    }

    #[test]
    fn test_sectioned_crlf() {
        let rows = parse_points_report(&SECTIONED.replace('\n', "\r\n")).unwrap();
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_flat_with_pair_column() {
        let text = "\
Pair,Tenor,SettlementDate,BidPoints,AskPoints
GBPUSD,1M,2024-02-12,5,7
EURUSD,1M,2024-02-12,20,22
";
        let rows = parse_points_report(text).unwrap();
        assert_eq!(rows[0].pair, "GBPUSD");
        assert_eq!(rows[1].pair, "EURUSD");
    }

    #[test]
    fn test_flat_inferred_pair() {
        let text = "\
EURUSD Tenor,SettlementDate,BidPoints,AskPoints,BidOutright,AskOutright
1M,2024-02-12,20,22,,
";
        let rows = parse_points_report(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pair, "EURUSD");
        assert_eq!(rows[0].tenor, "1M");

        let curve = ForwardPointsCurve::load(rows);
        let start = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 12).unwrap();
        assert_eq!(
            curve.interpolate(&CurrencyPair::parse("EURUSD"), start, end),
            Some(dec!(21))
        );
    }

    #[test]
    fn test_flat_unknown_pair() {
        let text = "Tenor,SettlementDate,BidPoints,AskPoints\n1M,2024-02-12,1,1\n";
        let rows = parse_points_report(text).unwrap();
        assert_eq!(rows[0].pair, UNKNOWN_PAIR);
    }

    #[test]
    fn test_missing_report_gives_empty_curve() {
        let curve = load_curve("/nonexistent/points.csv");
        assert!(curve.is_empty());
    }

    #[test]
    fn test_load_curve_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        std::fs::write(&path, SECTIONED).unwrap();
        let curve = load_curve(&path);
        assert_eq!(curve.pair_count(), 2);
    }
}
