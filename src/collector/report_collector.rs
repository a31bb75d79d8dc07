use crate::invoker::{Collaborator, Invoker};
use crate::scanner::ExtractedFile;
use std::time::{Duration, Instant};

/// Name of the join-key field every report collection carries.
pub const FILE_FIELD: &str = "File";
pub const OLEDUMP_FIELD: &str = "Oledump_Output";
pub const EXIFTOOL_FIELD: &str = "Exiftool_Output";

/// Output of one collaborator run against one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorReport {
    pub file: String,
    pub output: String,
    pub diagnostic: Option<String>,
}

impl CollaboratorReport {
    pub fn new<F: Into<String>, O: Into<String>>(file: F, output: O) -> Self {
        Self {
            file: file.into(),
            output: output.into(),
            diagnostic: None,
        }
    }

    pub fn with_diagnostic<S: Into<String>>(mut self, diagnostic: S) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

/// All reports from one collaborator pass, tagged with the field names
/// they contribute to the combined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCollection {
    key_field: String,
    value_field: String,
    reports: Vec<CollaboratorReport>,
}

impl ReportCollection {
    pub fn new<V: Into<String>>(value_field: V) -> Self {
        Self::with_key_field(FILE_FIELD, value_field)
    }

    pub fn with_key_field<K: Into<String>, V: Into<String>>(key_field: K, value_field: V) -> Self {
        Self {
            key_field: key_field.into(),
            value_field: value_field.into(),
            reports: Vec::new(),
        }
    }

    pub fn push(&mut self, report: CollaboratorReport) {
        self.reports.push(report);
    }

    pub fn with_report(mut self, report: CollaboratorReport) -> Self {
        self.push(report);
        self
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn value_field(&self) -> &str {
        &self.value_field
    }

    pub fn reports(&self) -> &[CollaboratorReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

}

#[derive(Debug, Clone)]
pub struct CollectionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub failures: Vec<String>,
}

impl CollectionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            current_file: None,
            start_time: Instant::now(),
            failures: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String) {
        self.files_processed += 1;
        self.current_file = Some(filename);
    }

    pub fn add_failure<S: Into<String>>(&mut self, failure: S) {
        self.failures.push(failure.into());
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.files_processed as f64 / elapsed.as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Runs one collaborator over a list of files, one at a time, in order.
pub struct ReportCollector<'a> {
    invoker: &'a dyn Invoker,
    collaborator: &'a Collaborator,
}

impl<'a> ReportCollector<'a> {
    pub fn new(invoker: &'a dyn Invoker, collaborator: &'a Collaborator) -> Self {
        Self {
            invoker,
            collaborator,
        }
    }

    pub fn collect(
        &self,
        files: &[ExtractedFile],
        value_field: &str,
        progress_callback: Option<&dyn Fn(&CollectionProgress)>,
    ) -> (ReportCollection, CollectionProgress) {
        let mut collection = ReportCollection::new(value_field);
        let mut progress = CollectionProgress::new(files.len());

        for file in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let name = file.report_name();
            let invocation = self.collaborator.invocation_for(&file.path);
            let outcome = self.invoker.invoke(&invocation);

            let mut report = CollaboratorReport::new(name.clone(), outcome.captured_text());
            if let Some(diagnostic) = outcome.diagnostic {
                progress.add_failure(format!(
                    "{} on {}: {}",
                    self.collaborator.name(),
                    file.display_path(),
                    diagnostic
                ));
                report = report.with_diagnostic(diagnostic);
            }

            collection.push(report);
            progress.update_file(name);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        (collection, progress)
    }
}
