use crate::collector::report_collector::{ReportCollection, FILE_FIELD};
use crate::error::{Result, TriAnalyzeError};
use std::collections::BTreeMap;

/// Column names of the combined table, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeaders {
    pub key: String,
    pub left: String,
    pub right: String,
}

impl TableHeaders {
    pub fn columns(&self) -> [&str; 3] {
        [&self.key, &self.left, &self.right]
    }
}

/// One row of the combined table. `None` means the collaborator produced no
/// report for this file, which is distinct from an empty report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRecord {
    pub file: String,
    pub ole_dump: Option<String>,
    pub metadata: Option<String>,
}

impl CombinedRecord {
    pub fn cells(&self) -> [Option<&str>; 3] {
        [
            Some(self.file.as_str()),
            self.ole_dump.as_deref(),
            self.metadata.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedTable {
    pub headers: TableHeaders,
    pub records: Vec<CombinedRecord>,
}

impl CombinedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.file.as_str())
    }
}

/// Full outer join of the OLE-dump and metadata passes on the file name.
///
/// Rows come out sorted by file name. A file present on only one side gets
/// `None` for the other; a file repeated on either side yields every
/// pairing of its rows, in input order.
pub fn merge_reports(ole_dump: &ReportCollection, metadata: &ReportCollection) -> Result<CombinedTable> {
    for collection in [ole_dump, metadata] {
        if collection.key_field() != FILE_FIELD {
            return Err(TriAnalyzeError::MergePrecondition {
                collection: collection.value_field().to_string(),
                expected: FILE_FIELD.to_string(),
            });
        }
    }

    let mut groups: BTreeMap<&str, (Vec<&str>, Vec<&str>)> = BTreeMap::new();
    for report in ole_dump.reports() {
        groups
            .entry(report.file.as_str())
            .or_default()
            .0
            .push(report.output.as_str());
    }
    for report in metadata.reports() {
        groups
            .entry(report.file.as_str())
            .or_default()
            .1
            .push(report.output.as_str());
    }

    let mut records = Vec::new();
    for (file, (left, right)) in groups {
        let left: Vec<Option<&str>> = if left.is_empty() {
            vec![None]
        } else {
            left.into_iter().map(Some).collect()
        };
        let right: Vec<Option<&str>> = if right.is_empty() {
            vec![None]
        } else {
            right.into_iter().map(Some).collect()
        };

        for l in &left {
            for r in &right {
                records.push(CombinedRecord {
                    file: file.to_string(),
                    ole_dump: l.map(str::to_string),
                    metadata: r.map(str::to_string),
                });
            }
        }
    }

    Ok(CombinedTable {
        headers: TableHeaders {
            key: FILE_FIELD.to_string(),
            left: ole_dump.value_field().to_string(),
            right: metadata.value_field().to_string(),
        },
        records,
    })
}
