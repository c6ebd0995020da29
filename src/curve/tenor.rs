use serde::{Deserialize, Serialize};
use std::fmt;

/// A standard quoted maturity bucket.
///
/// Nominal day counts use a flat 30-day month and 365-day year; they are
/// only an approximation for quotes that carry no settlement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenor {
    Overnight,
    TomNext,
    Spot,
    SpotNext,
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Tenor {
    /// Parse a tenor label such as `ON`, `SP`, `2W`, `18M`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fx_cashflow_engine::curve::tenor::Tenor;
    ///
    /// assert_eq!(Tenor::parse("3m"), Some(Tenor::Months(3)));
    /// assert_eq!(Tenor::parse("SP"), Some(Tenor::Spot));
    /// assert_eq!(Tenor::parse("BROKEN"), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        match label.as_str() {
            "ON" => return Some(Self::Overnight),
            "TN" => return Some(Self::TomNext),
            "SP" => return Some(Self::Spot),
            "SN" => return Some(Self::SpotNext),
            _ => {}
        }
        if label.len() < 2 || !label.is_ascii() {
            return None;
        }
        let (count, unit) = label.split_at(label.len() - 1);
        let count: u32 = count.parse().ok()?;
        match unit {
            "D" => Some(Self::Days(count)),
            "W" => Some(Self::Weeks(count)),
            "M" => Some(Self::Months(count)),
            "Y" => Some(Self::Years(count)),
            _ => None,
        }
    }

    /// Approximate calendar days covered by this tenor.
    pub fn nominal_days(&self) -> i64 {
        match *self {
            Self::Overnight => 1,
            Self::TomNext | Self::Spot => 2,
            Self::SpotNext => 3,
            Self::Days(n) => i64::from(n),
            Self::Weeks(n) => i64::from(n) * 7,
            Self::Months(n) => i64::from(n) * 30,
            Self::Years(n) => i64::from(n) * 365,
        }
    }

    pub fn is_spot(&self) -> bool {
        matches!(self, Self::Spot)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overnight => write!(f, "ON"),
            Self::TomNext => write!(f, "TN"),
            Self::Spot => write!(f, "SP"),
            Self::SpotNext => write!(f, "SN"),
            Self::Days(n) => write!(f, "{}D", n),
            Self::Weeks(n) => write!(f, "{}W", n),
            Self::Months(n) => write!(f, "{}M", n),
            Self::Years(n) => write!(f, "{}Y", n),
        }
    }
}
