use crate::core::trade::FolderFilter;
use crate::io::{read_text, IoError, Result};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Folder-exclusion rules loaded from a JSON file.
///
/// ```json
/// { "ignore_folders": ["TEST", "ARCHIVE"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub ignore_folders: Vec<String>,
}

impl FilterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&read_text(path.as_ref())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value.get("ignore_folders") {
            None | Some(serde_json::Value::Array(_)) => Ok(serde_json::from_value(value)?),
            Some(_) => Err(IoError::InvalidConfig(
                "ignore_folders must be a list".to_string(),
            )),
        }
    }

    pub fn folder_filter(&self) -> FolderFilter {
        self.ignore_folders.iter().collect()
    }
}

/// Output format for the run report on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved options for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub points: Option<PathBuf>,
    pub filter_config: Option<PathBuf>,
    /// Comma-separated folder list; overrides `filter_config` when set.
    pub ignore_folders: Option<String>,
    pub out_dir: PathBuf,
    pub out_csv: String,
    pub format: OutputFormat,
    /// Reference date for the horizon summary.
    pub as_of: Option<NaiveDate>,
}

pub const DEFAULT_OUT_DIR: &str = "generatedFile";
pub const DEFAULT_OUT_CSV: &str = "cashflows_agg.csv";

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            points: None,
            filter_config: None,
            ignore_folders: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            out_csv: DEFAULT_OUT_CSV.to_string(),
            format: OutputFormat::default(),
            as_of: None,
        }
    }

    /// Work out which folders to exclude.
    ///
    /// An explicit folder list wins over the config file. An unreadable
    /// config file is logged and treated as excluding nothing.
    pub fn resolve_filter(&self) -> FolderFilter {
        if let Some(list) = &self.ignore_folders {
            return parse_folder_list(list);
        }
        match &self.filter_config {
            Some(path) => match FilterConfig::load(path) {
                Ok(config) => config.folder_filter(),
                Err(e) => {
                    warn!("cannot load filter config {}: {}", path.display(), e);
                    FolderFilter::new()
                }
            },
            None => FolderFilter::new(),
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(&self.out_csv)
    }
}

/// Parse a comma-separated folder list.
pub fn parse_folder_list(list: &str) -> FolderFilter {
    list.split(',').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_config_from_json() {
        let config = FilterConfig::from_json(r#"{"ignore_folders": ["TEST", "ARCHIVE"]}"#).unwrap();
        let filter = config.folder_filter();
        assert!(filter.is_excluded("TEST"));
        assert!(!filter.is_excluded("FX"));
    }

    #[test]
    fn test_filter_config_missing_key() {
        let config = FilterConfig::from_json("{}").unwrap();
        assert!(config.ignore_folders.is_empty());
    }

    #[test]
    fn test_filter_config_not_a_list() {
        let err = FilterConfig::from_json(r#"{"ignore_folders": "TEST"}"#).unwrap_err();
        assert!(matches!(err, IoError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_list_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        std::fs::write(&path, r#"{"ignore_folders": ["FROM-FILE"]}"#).unwrap();

        let mut config = RunConfig::new("trades.csv");
        config.filter_config = Some(path);
        assert!(config.resolve_filter().is_excluded("FROM-FILE"));

        config.ignore_folders = Some("A, B".to_string());
        let filter = config.resolve_filter();
        assert!(filter.is_excluded("B"));
        assert!(!filter.is_excluded("FROM-FILE"));
    }

    #[test]
    fn test_unreadable_config_excludes_nothing() {
        let mut config = RunConfig::new("trades.csv");
        config.filter_config = Some(PathBuf::from("/nonexistent/filter.json"));
        assert!(config.resolve_filter().is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("trades.csv");
        assert_eq!(config.csv_path(), PathBuf::from("generatedFile/cashflows_agg.csv"));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("xml"), None);
    }
}
