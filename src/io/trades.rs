use crate::core::trade::RawTradeRow;
use crate::io::{read_text, Result};
use csv::{ReaderBuilder, Trim};
use std::path::Path;

/// Read the trade-detail CSV export.
pub fn read_trades(path: impl AsRef<Path>) -> Result<Vec<RawTradeRow>> {
    parse_trades(&read_text(path.as_ref())?)
}

/// Decode trade rows from CSV text with a header line.
///
/// Unknown columns are ignored and missing ones are left empty.
pub fn parse_trades(content: &str) -> Result<Vec<RawTradeRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Folder,Deal Id,Type of Deal,Security,Amount1,Amount2,Trade Date,Value Date,Mat. Date,Rate/Price,Trader
FX-DESK,D-1,Spot,EUR/USD,\"1,000,000\",\"-1,100,000\",08/01/2024,10/01/2024,,1.1000,amy
FX-DESK,D-2,FX Swap,USDJPY,500000,-74250000,08/01/2024,10/01/2024,10/04/2024,-210,bo
";

    #[test]
    fn test_parse_rows() {
        let rows = parse_trades(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].deal_id, "D-1");
        assert_eq!(rows[0].amount1, "1,000,000");
        assert_eq!(rows[0].maturity_date, "");
        assert_eq!(rows[1].deal_type, "FX Swap");
        assert_eq!(rows[1].rate, "-210");
    }

    #[test]
    fn test_missing_columns_default_empty() {
        let rows = parse_trades("Deal Id,Type of Deal\nD-9,Spot\n").unwrap();
        assert_eq!(rows[0].deal_id, "D-9");
        assert!(rows[0].security.is_empty());
        assert!(rows[0].value_date.is_empty());
    }

    #[test]
    fn test_read_file_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        std::fs::write(&path, format!("\u{feff}{}", SAMPLE)).unwrap();
        let rows = read_trades(&path).unwrap();
        assert_eq!(rows[0].folder, "FX-DESK");
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(read_trades("/nonexistent/trades.csv").is_err());
    }
}
