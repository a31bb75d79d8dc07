use crate::config::ScanConfig;
use std::path::Path;

/// Extension allow-list for carved documents.
pub struct FileFilter {
    extensions: Vec<String>,
    case_sensitive: bool,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        let extensions = config
            .extensions
            .iter()
            .map(|ext| normalize_extension(ext, config.case_sensitive))
            .collect();

        Self {
            extensions,
            case_sensitive: config.case_sensitive,
        }
    }

    pub fn is_candidate(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|s| s.to_str()) else {
            return false;
        };

        if self.case_sensitive {
            self.extensions.iter().any(|ext| ext == extension)
        } else {
            let ext_lower = extension.to_lowercase();
            self.extensions.contains(&ext_lower)
        }
    }

    pub fn get_extensions(&self) -> &Vec<String> {
        &self.extensions
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

fn normalize_extension(ext: &str, case_sensitive: bool) -> String {
    let ext = ext.trim().trim_start_matches('.');
    if case_sensitive {
        ext.to_string()
    } else {
        ext.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(case_sensitive: bool) -> ScanConfig {
        ScanConfig {
            extensions: vec!["doc".to_string(), ".xls".to_string(), "DOCX".to_string()],
            case_sensitive,
            max_depth: 8,
        }
    }

    #[test]
    fn test_candidate_detection() {
        let filter = FileFilter::new(&create_test_config(false));

        assert!(filter.is_candidate(Path::new("a.doc")));
        assert!(filter.is_candidate(Path::new("c.xls")));
        assert!(filter.is_candidate(Path::new("dir/report.docx")));

        assert!(!filter.is_candidate(Path::new("b.txt")));
        assert!(!filter.is_candidate(Path::new("c.xlsx")));
        assert!(!filter.is_candidate(Path::new("doc")));
        assert!(!filter.is_candidate(Path::new("archive.doc.zip")));
    }

    #[test]
    fn test_case_insensitive_extensions() {
        let filter = FileFilter::new(&create_test_config(false));

        assert!(filter.is_candidate(Path::new("d.DOCX")));
        assert!(filter.is_candidate(Path::new("e.Doc")));
        assert!(filter.is_candidate(Path::new("f.XLS")));
        assert_eq!(filter.get_extensions(), &vec!["doc", "xls", "docx"]);
    }

    #[test]
    fn test_case_sensitive_extensions() {
        let filter = FileFilter::new(&create_test_config(true));

        assert!(filter.is_case_sensitive());
        assert!(filter.is_candidate(Path::new("a.doc")));
        assert!(!filter.is_candidate(Path::new("a.DOC")));
        assert!(filter.is_candidate(Path::new("d.DOCX")));
        assert!(!filter.is_candidate(Path::new("d.docx")));
    }
}
