pub mod format;
pub mod output_manager;

pub use format::ExportFormat;
pub use output_manager::{ExportArtifact, OutputManager, SHEET_NAME};
