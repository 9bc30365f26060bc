//! Matrix compiler
//!
//! Flattens a contradiction matrix spreadsheet into [`ContradictionRecord`]s.
//!
//! Layout: the header row holds improving parameter names from the second
//! column on; every row below it starts with a worsening parameter name and
//! holds comma-separated principle numbers (or nothing) in the remaining
//! cells. Records are emitted row-major, one per non-blank cell.

use crate::matrix::ContradictionMatrix;
use crate::types::ContradictionRecord;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use thiserror::Error;

/// Malformed or unreadable matrix source. Any of these aborts the compile.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unsupported source format {0:?} (expected xlsx, xlsm, xlsb, xls, ods or csv)")]
    UnsupportedFormat(String),

    #[error("spreadsheet error: {0}")]
    Workbook(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("sheet {0:?} not found")]
    SheetNotFound(String),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("header row {0} is missing (source has fewer rows)")]
    MissingHeader(usize),

    #[error("header row must name at least one improving parameter")]
    NarrowHeader,

    #[error("column {column} has values but no improving parameter name in the header")]
    BlankImprovingHeader { column: usize },

    #[error("row {row} has values but no worsening parameter name")]
    BlankWorseningName { row: usize },
}

/// A rectangular-ish grid of cells, `None` meaning blank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub rows: Vec<Vec<Option<String>>>,
}

impl SourceTable {
    /// Build from string cells; empty or whitespace-only strings become blank.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| non_blank(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }
}

/// Where to find the matrix inside a source file
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Worksheet name; first sheet when unset. Ignored for CSV.
    pub sheet: Option<String>,
    /// Zero-based index of the header row
    pub header_row: usize,
}

/// Counts reported after a compile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    pub records: usize,
    pub improving: usize,
    pub worsening: usize,
    /// Non-blank cells where no token was a valid number
    pub empty_cells: usize,
}

impl CompileSummary {
    pub fn of(matrix: &ContradictionMatrix) -> Self {
        Self {
            records: matrix.len(),
            improving: matrix.improving_labels().len(),
            worsening: matrix.worsening_labels().len(),
            empty_cells: matrix
                .records()
                .iter()
                .filter(|r| r.principles.is_empty())
                .count(),
        }
    }
}

/// Parse one cell: split on commas, keep tokens made only of ASCII digits.
///
/// Anything else (signs, decimals, words, numbers too large for `u32`) is
/// dropped without complaint.
pub fn parse_principles(cell: &str) -> Vec<u32> {
    cell.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|t| t.parse().ok())
        .collect()
}

/// Flatten a table into a matrix, row-major.
pub fn compile(table: &SourceTable, header_row: usize) -> Result<ContradictionMatrix, CompileError> {
    let header = table
        .rows
        .get(header_row)
        .ok_or(CompileError::MissingHeader(header_row))?;

    let improving: Vec<Option<&str>> = header.iter().skip(1).map(|c| c.as_deref()).collect();
    if improving.iter().all(Option::is_none) {
        return Err(CompileError::NarrowHeader);
    }

    let mut records = Vec::new();

    for (row_idx, row) in table.rows.iter().enumerate().skip(header_row + 1) {
        let worsening = table.cell(row_idx, 0);

        for (col_idx, cell) in row.iter().enumerate().skip(1) {
            let Some(cell) = cell.as_deref() else {
                continue;
            };

            let worsening = worsening.ok_or(CompileError::BlankWorseningName { row: row_idx + 1 })?;
            let improving = improving
                .get(col_idx - 1)
                .copied()
                .flatten()
                .ok_or(CompileError::BlankImprovingHeader { column: col_idx + 1 })?;

            records.push(ContradictionRecord {
                improving: improving.to_string(),
                worsening: worsening.to_string(),
                principles: parse_principles(cell),
            });
        }
    }

    Ok(ContradictionMatrix::new(records))
}

/// Read a spreadsheet or CSV file into a [`SourceTable`].
pub fn read_source(path: &Path, options: &SourceOptions) -> Result<SourceTable, CompileError> {
    if !path.exists() {
        return Err(CompileError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, options.sheet.as_deref()),
        other => Err(CompileError::UnsupportedFormat(other.to_string())),
    }
}

/// Read and compile in one step.
pub fn compile_file(path: &Path, options: &SourceOptions) -> Result<ContradictionMatrix, CompileError> {
    let table = read_source(path, options)?;
    tracing::debug!(rows = table.rows.len(), "Read matrix source {:?}", path);
    compile(&table, options.header_row)
}

fn read_csv(path: &Path) -> Result<SourceTable, CompileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(non_blank).collect());
    }
    Ok(SourceTable { rows })
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<SourceTable, CompileError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| CompileError::Workbook(e.to_string()))?;

    let names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| CompileError::SheetNotFound(wanted.to_string()))?,
        None => names.first().cloned().ok_or(CompileError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| CompileError::Workbook(e.to_string()))?;

    // calamine ranges start at the first used cell; pad back to A1 so the
    // header row index means the same thing as in the spreadsheet UI.
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells: Vec<Option<String>> = vec![None; col_offset];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }

    Ok(SourceTable { rows })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) | Data::Bool(_) => None,
        Data::String(s) => non_blank(s),
        Data::Int(n) => Some(n.to_string()),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        other => non_blank(&other.to_string()),
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
