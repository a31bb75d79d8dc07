use crate::error::{Result, TriAnalyzeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-disk shape of the combined report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Excel, ExportFormat::Csv, ExportFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "results.xlsx",
            ExportFormat::Csv => "results.csv",
            ExportFormat::Json => "results.json",
        }
    }

    pub fn parse(token: &str) -> Result<Self> {
        token.parse()
    }
}

impl FromStr for ExportFormat {
    type Err = TriAnalyzeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "excel" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(TriAnalyzeError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(ExportFormat::parse("excel").unwrap(), ExportFormat::Excel);
        assert_eq!(ExportFormat::parse("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse(" json ").unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::parse("xml"),
            Err(TriAnalyzeError::UnsupportedFormat { .. })
        ));
        assert!(ExportFormat::parse("").is_err());
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(ExportFormat::Excel.file_name(), "results.xlsx");
        assert_eq!(ExportFormat::Csv.file_name(), "results.csv");
        assert_eq!(ExportFormat::Json.file_name(), "results.json");
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::parse(&format.to_string()).unwrap(), format);
        }
    }
}
