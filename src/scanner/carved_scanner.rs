use crate::config::ScanConfig;
use crate::error::{Result, TriAnalyzeError};
use crate::scanner::file_filter::FileFilter;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A file the carver recovered from the capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub extension: String,
}

impl ExtractedFile {
    pub fn new(path: PathBuf, relative_path: PathBuf) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            path,
            relative_path,
            extension,
        }
    }

    /// Join key used in the combined report: the bare file name. The same
    /// document carved from two streams shares one key.
    pub fn report_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Location under the extraction directory, `/`-separated on every
    /// platform.
    pub fn display_path(&self) -> String {
        self.relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

pub struct CarvedFileScanner {
    filter: FileFilter,
    max_depth: usize,
}

impl CarvedFileScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
        }
    }

    /// Candidates in directory-traversal order. Unreadable entries are
    /// logged and skipped; only a missing root is an error.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<ExtractedFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(TriAnalyzeError::filesystem(
                root_path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry during scan: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.filter.is_candidate(entry.path()) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root_path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));

            files.push(ExtractedFile::new(entry.path().to_path_buf(), relative_path));
        }

        Ok(files)
    }
}
