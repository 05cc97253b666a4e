use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use fieldnorm_cli::pipeline::{
    ColumnMapping, IssueReport, default_jobs, default_output_path, field_stats, normalize_rows,
    read_headers, read_input, warn_missing_columns, write_output, write_report,
};
use fieldnorm_normalization::Normalizer;
use fieldnorm_standards::{ColumnOrderReport, SchemaRegistry, resolve_schema};

use crate::cli::{CheckColumnsArgs, NormalizeArgs, SchemaArgs};
use crate::summary::apply_table_style;
use crate::types::NormalizeResult;

fn load_schema(args: &SchemaArgs) -> Result<SchemaRegistry> {
    let registry = resolve_schema(args.schema.as_deref()).context("load schema")?;
    info!(
        schema = registry.name(),
        fields = registry.len(),
        fingerprint = registry.fingerprint(),
        "schema ready"
    );
    Ok(registry)
}

pub fn run_fields(args: &SchemaArgs) -> Result<()> {
    let registry = load_schema(args)?;
    println!("Schema: {} (version {})", registry.name(), registry.version());
    if let Some(description) = registry.description() {
        println!("{description}");
    }
    if let Some(fingerprint) = registry.fingerprint() {
        println!("SHA-256: {fingerprint}");
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "Field", "Label", "Type", "Required", "Default"]);
    apply_table_style(&mut table);
    for (position, field) in registry.fields().iter().enumerate() {
        table.add_row(vec![
            position.to_string(),
            field.name.clone(),
            field.label().to_string(),
            field.logical_type().to_string(),
            if field.required { "yes" } else { "no" }.to_string(),
            field.default_value.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check_columns(args: &CheckColumnsArgs) -> Result<ColumnOrderReport> {
    let registry = load_schema(&args.schema)?;
    let headers = read_headers(&args.input)?;
    Ok(registry.check_column_order(&headers))
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<NormalizeResult> {
    let span = info_span!("normalize", input = %args.input.display());
    let _guard = span.enter();
    let started = Instant::now();

    let registry = load_schema(&args.schema)?;
    let normalizer = Normalizer::new(registry.fields()).context("build validators")?;
    let input = read_input(&args.input)?;
    let mapping = ColumnMapping::new(&registry, &input.headers);
    warn_missing_columns(&mapping);

    let jobs = args.jobs.unwrap_or_else(default_jobs);
    let progress = progress_bar(input.rows.len())?;
    let outcomes = normalize_rows(&normalizer, &mapping, &input.rows, jobs, progress.as_ref())?;
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    write_output(&output, &registry, &outcomes)?;

    let report = IssueReport::build(&registry, &mapping, &input, &outcomes);
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    let invalid_cells = report.failure_count();
    if invalid_cells > 0 {
        warn!(invalid_cells, "some values failed validation");
    }
    info!(
        rows = outcomes.len(),
        jobs = jobs.get(),
        elapsed_ms = started.elapsed().as_millis(),
        output = %output.display(),
        "normalization complete"
    );

    Ok(NormalizeResult {
        schema: registry.name().to_string(),
        input: args.input.clone(),
        output,
        report: args.report.clone(),
        rows: outcomes.len(),
        fields: field_stats(&registry, &outcomes),
        missing_columns: mapping.missing().to_vec(),
        repaired_cells: input.repaired.len(),
        invalid_cells,
    })
}

fn progress_bar(rows: usize) -> Result<Option<ProgressBar>> {
    if rows == 0 || !io::stderr().is_terminal() {
        return Ok(None);
    }
    let bar = ProgressBar::new(rows as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} rows {msg}")
            .context("progress bar template")?
            .progress_chars("█▓░"),
    );
    Ok(Some(bar))
}

/// Path shown in messages, relative when it is inside the working directory.
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
