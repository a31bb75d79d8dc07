use crate::collector::CombinedTable;
use crate::error::{Result, TriAnalyzeError};
use crate::export::ExportFormat;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SHEET_NAME: &str = "Combined_Results";

/// Longest text a single spreadsheet cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

/// The report file written at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub rows: usize,
}

pub struct OutputManager {
    output_directory: PathBuf,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.output_directory)
            .map_err(|e| TriAnalyzeError::filesystem(&self.output_directory, e))?;
        Ok(())
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn artifact_path(&self, format: ExportFormat) -> PathBuf {
        self.output_directory.join(format.file_name())
    }

    /// Parses the selector before touching the filesystem, so an unknown
    /// token never leaves a file behind.
    pub fn export_as(&self, table: &CombinedTable, format_token: &str) -> Result<ExportArtifact> {
        let format = ExportFormat::parse(format_token)?;
        self.export(table, format)
    }

    pub fn export(&self, table: &CombinedTable, format: ExportFormat) -> Result<ExportArtifact> {
        self.initialize()?;
        let path = self.artifact_path(format);

        match format {
            ExportFormat::Excel => write_workbook(table, &path)?,
            ExportFormat::Csv => write_csv(table, &path)?,
            ExportFormat::Json => write_json_lines(table, &path)?,
        }

        log::info!("Wrote {} rows to {}", table.len(), path.display());

        Ok(ExportArtifact {
            path,
            format,
            rows: table.len(),
        })
    }
}

fn write_csv(table: &CombinedTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(table.headers.columns())?;
    for record in &table.records {
        writer.write_record(record.cells().map(|cell| cell.unwrap_or("")))?;
    }

    writer.flush().map_err(|e| TriAnalyzeError::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}

fn write_json_lines(table: &CombinedTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| TriAnalyzeError::filesystem(path, e))?;
    let mut writer = BufWriter::new(file);

    for record in &table.records {
        let mut object = Map::new();
        for (column, cell) in table.headers.columns().into_iter().zip(record.cells()) {
            let value = match cell {
                Some(text) => Value::String(text.to_string()),
                None => Value::Null,
            };
            object.insert(column.to_string(), value);
        }

        serde_json::to_writer(&mut writer, &Value::Object(object))?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

fn write_workbook(table: &CombinedTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.columns().into_iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (index, record) in table.records.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, cell) in record.cells().into_iter().enumerate() {
            if let Some(text) = cell {
                let text = fit_cell(text, &record.file);
                worksheet.write_string(row, col as u16, text)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn fit_cell<'a>(text: &'a str, file: &str) -> &'a str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            log::warn!(
                "Truncated cell for {} to {} characters to fit the workbook",
                file,
                MAX_CELL_CHARS
            );
            &text[..cut]
        }
        None => text,
    }
}
