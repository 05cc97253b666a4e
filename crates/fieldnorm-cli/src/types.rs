use std::path::PathBuf;

use fieldnorm_cli::pipeline::FieldStats;

/// Result of one `normalize` run, as printed by the summary.
#[derive(Debug)]
pub struct NormalizeResult {
    pub schema: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    pub rows: usize,
    pub fields: Vec<FieldStats>,
    pub missing_columns: Vec<String>,
    /// Cells whose bytes were not valid UTF-8.
    pub repaired_cells: usize,
    pub invalid_cells: usize,
}

impl NormalizeResult {
    pub fn has_invalid(&self) -> bool {
        self.invalid_cells > 0
    }
}
