pub mod merge;
pub mod report_collector;

pub use merge::{merge_reports, CombinedRecord, CombinedTable, TableHeaders};
pub use report_collector::{
    CollaboratorReport, CollectionProgress, ReportCollection, ReportCollector, EXIFTOOL_FIELD,
    FILE_FIELD, OLEDUMP_FIELD,
};
