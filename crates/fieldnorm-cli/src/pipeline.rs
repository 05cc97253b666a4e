//! Stages of the `normalize` command: read, align, normalize, write, report.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use fieldnorm_model::{ErrorKind, LogicalType};
use fieldnorm_normalization::{Normalizer, RowOutcome};
use fieldnorm_standards::SchemaRegistry;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::logging::redact_value;

/// Note attached to cells whose bytes were not valid UTF-8.
pub const INVALID_UTF8_NOTE: &str = "Invalid UTF-8 characters removed";

/// Decoded CSV contents.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// (row, column) of cells that contained invalid UTF-8.
    pub repaired: Vec<(usize, usize)>,
}

/// Decode bytes as UTF-8, dropping invalid sequences. The flag reports
/// whether anything was dropped.
pub fn decode_cell(bytes: &[u8]) -> (String, bool) {
    let mut text = String::with_capacity(bytes.len());
    let mut repaired = false;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        repaired |= !chunk.invalid().is_empty();
    }
    (text, repaired)
}

fn reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))
}

fn decode_headers(reader: &mut csv::Reader<File>, path: &Path) -> Result<Vec<String>> {
    let headers = reader
        .byte_headers()
        .with_context(|| format!("read header of {}", path.display()))?;
    Ok(headers
        .iter()
        .map(|bytes| decode_cell(bytes).0.trim().to_string())
        .collect())
}

/// Header row of a CSV file.
pub fn read_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = reader(path)?;
    decode_headers(&mut reader, path)
}

/// Read a whole CSV file as raw bytes per cell and decode each cell.
pub fn read_input(path: &Path) -> Result<InputTable> {
    let mut reader = reader(path)?;
    let headers = decode_headers(&mut reader, path)?;
    let mut table = InputTable {
        headers,
        ..InputTable::default()
    };
    for (row_index, record) in reader.byte_records().enumerate() {
        let record =
            record.with_context(|| format!("read row {} of {}", row_index + 1, path.display()))?;
        let mut row = Vec::with_capacity(record.len());
        for (column, bytes) in record.iter().enumerate() {
            let (text, repaired) = decode_cell(bytes);
            if repaired {
                table.repaired.push((row_index, column));
            }
            row.push(text);
        }
        table.rows.push(row);
    }
    debug!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        repaired = table.repaired.len(),
        "input read"
    );
    Ok(table)
}

/// For each schema field, the input column that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: Vec<Option<usize>>,
    missing: Vec<String>,
}

impl ColumnMapping {
    /// Match input headers to schema fields by exact name. The first input
    /// column with a name wins.
    pub fn new(registry: &SchemaRegistry, headers: &[String]) -> Self {
        let mut sources = Vec::with_capacity(registry.len());
        let mut missing = Vec::new();
        for field in registry.fields() {
            let source = headers.iter().position(|h| *h == field.name);
            if source.is_none() {
                missing.push(field.name.clone());
            }
            sources.push(source);
        }
        Self { sources, missing }
    }

    /// Schema fields with no input column.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Schema position fed by input column `column`, if any.
    pub fn schema_position(&self, column: usize) -> Option<usize> {
        self.sources.iter().position(|&s| s == Some(column))
    }

    /// Reorder an input row into schema order; absent cells are empty.
    pub fn align<'a>(&self, row: &'a [String]) -> Vec<&'a str> {
        self.sources
            .iter()
            .map(|source| source.and_then(|i| row.get(i)).map_or("", String::as_str))
            .collect()
    }
}

/// Number of worker threads to use.
pub fn default_jobs() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Normalize every row, splitting the rows into `jobs` contiguous chunks
/// handled on scoped threads. Results keep input order.
pub fn normalize_rows(
    normalizer: &Normalizer,
    mapping: &ColumnMapping,
    rows: &[Vec<String>],
    jobs: NonZeroUsize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<RowOutcome>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let chunk_size = rows.len().div_ceil(jobs.get());
    let normalize_chunk = |chunk: &[Vec<String>]| -> Vec<RowOutcome> {
        chunk
            .iter()
            .map(|row| {
                let outcome = normalizer.normalize_row(&mapping.align(row));
                if let Some(bar) = progress {
                    bar.inc(1);
                }
                outcome
            })
            .collect()
    };
    if jobs.get() == 1 {
        return Ok(normalize_chunk(rows));
    }
    std::thread::scope(|scope| {
        let handles: Vec<_> = rows
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || normalize_chunk(chunk)))
            .collect();
        let mut outcomes = Vec::with_capacity(rows.len());
        for handle in handles {
            let chunk = handle
                .join()
                .map_err(|_| anyhow!("normalization worker panicked"))?;
            outcomes.extend(chunk);
        }
        Ok(outcomes)
    })
}

/// Write outcomes as CSV with the schema header.
pub fn write_csv<W: Write>(writer: W, registry: &SchemaRegistry, outcomes: &[RowOutcome]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(registry.column_order())?;
    for outcome in outcomes {
        writer.write_record(outcome.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write outcomes to `path`.
pub fn write_output(path: &Path, registry: &SchemaRegistry, outcomes: &[RowOutcome]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(file, registry, outcomes).with_context(|| format!("write {}", path.display()))
}

/// `<stem>_normalized.csv` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_normalized.csv"))
}

/// Per-field counts over all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub name: String,
    pub logical_type: LogicalType,
    pub valid: usize,
    pub nulls: usize,
    pub failed: usize,
    /// Outcomes that carried at least one note.
    pub noted: usize,
}

pub fn field_stats(registry: &SchemaRegistry, outcomes: &[RowOutcome]) -> Vec<FieldStats> {
    let mut stats: Vec<FieldStats> = registry
        .fields()
        .iter()
        .map(|field| FieldStats {
            name: field.name.clone(),
            logical_type: field.logical_type(),
            valid: 0,
            nulls: 0,
            failed: 0,
            noted: 0,
        })
        .collect();
    for row in outcomes {
        for (entry, outcome) in stats.iter_mut().zip(row.outcomes()) {
            if !outcome.is_valid() {
                entry.failed += 1;
            } else if outcome.is_null() {
                entry.nulls += 1;
                entry.valid += 1;
            } else {
                entry.valid += 1;
            }
            if !outcome.notes().is_empty() {
                entry.noted += 1;
            }
        }
    }
    stats
}

/// One cell worth reporting: a failure or a value that carried notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellIssue {
    /// 1-based data row (the header is row 0).
    pub row: usize,
    pub field: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// JSON document written by `--report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueReport {
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub rows: usize,
    pub missing_columns: Vec<String>,
    pub issues: Vec<CellIssue>,
}

impl IssueReport {
    pub fn build(
        registry: &SchemaRegistry,
        mapping: &ColumnMapping,
        input: &InputTable,
        outcomes: &[RowOutcome],
    ) -> Self {
        let repaired: HashSet<(usize, usize)> = input
            .repaired
            .iter()
            .filter_map(|&(row, column)| Some((row, mapping.schema_position(column)?)))
            .collect();
        let mut issues = Vec::new();
        for (row_index, row) in outcomes.iter().enumerate() {
            let cells = registry.fields().iter().zip(row.outcomes()).enumerate();
            for (position, (field, outcome)) in cells {
                let mut notes: Vec<String> = outcome.notes().to_vec();
                if repaired.contains(&(row_index, position)) {
                    notes.insert(0, INVALID_UTF8_NOTE.to_string());
                }
                if outcome.is_valid() && notes.is_empty() {
                    continue;
                }
                if !outcome.is_valid() {
                    let raw = row.original(position).unwrap_or_default().trim();
                    trace!(
                        row = row_index + 1,
                        field = %field.name,
                        value = redact_value(raw),
                        "invalid value"
                    );
                }
                issues.push(CellIssue {
                    row: row_index + 1,
                    field: field.name.clone(),
                    valid: outcome.is_valid(),
                    error_kind: outcome.error_kind(),
                    error_message: outcome.error_message().map(str::to_string),
                    notes,
                });
            }
        }
        Self {
            schema: registry.name().to_string(),
            fingerprint: registry.fingerprint().map(str::to_string),
            rows: outcomes.len(),
            missing_columns: mapping.missing().to_vec(),
            issues,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.issues.iter().filter(|issue| !issue.valid).count()
    }
}

/// Write the report as pretty JSON.
pub fn write_report(path: &Path, report: &IssueReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Log the schema fields that had no input column.
pub fn warn_missing_columns(mapping: &ColumnMapping) {
    for name in mapping.missing() {
        warn!(column = %name, "schema column missing from input, treated as empty");
    }
}
