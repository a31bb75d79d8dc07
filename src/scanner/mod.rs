pub mod carved_scanner;
pub mod file_filter;

pub use carved_scanner::{CarvedFileScanner, ExtractedFile};
pub use file_filter::FileFilter;
