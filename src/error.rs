use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriAnalyzeError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Filesystem operation failed on {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Capture file not found: {path}")]
    MissingCapture { path: PathBuf },

    #[error("Unsupported export format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Report collection '{collection}' has no '{expected}' field")]
    MergePrecondition { collection: String, expected: String },

    #[error("Export to {path} failed: {message}")]
    Export { path: PathBuf, message: String },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriAnalyzeError {
    pub fn filesystem<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        TriAnalyzeError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TriAnalyzeError {
    fn user_message(&self) -> String {
        match self {
            TriAnalyzeError::Filesystem { path, source } => {
                format!("Cannot access {}: {}", path.display(), source)
            }
            TriAnalyzeError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            TriAnalyzeError::MissingCapture { path } => {
                format!("Capture file does not exist or is not a file: {}", path.display())
            }
            TriAnalyzeError::UnsupportedFormat { format } => {
                format!("Unsupported export format '{}'", format)
            }
            TriAnalyzeError::MergePrecondition {
                collection,
                expected,
            } => {
                format!(
                    "Cannot merge reports: collection '{}' is missing the '{}' field",
                    collection, expected
                )
            }
            TriAnalyzeError::Export { path, message } => {
                format!("Failed to write {}: {}", path.display(), message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TriAnalyzeError::Filesystem { .. } => Some(
                "Ensure you have read/write permissions for the output and extraction directories."
                    .to_string(),
            ),
            TriAnalyzeError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config."
                    .to_string(),
            ),
            TriAnalyzeError::MissingCapture { .. } => Some(
                "Pass the path of an existing packet capture with --pcap (e.g., --pcap traffic.pcap)."
                    .to_string(),
            ),
            TriAnalyzeError::UnsupportedFormat { .. } => {
                Some("Use one of: excel, csv, json.".to_string())
            }
            TriAnalyzeError::Export { .. } | TriAnalyzeError::Xlsx(_) => Some(
                "Make sure the output file is not open in another program and try again."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TriAnalyzeError {
    fn from(error: toml::de::Error) -> Self {
        TriAnalyzeError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TriAnalyzeError>;
