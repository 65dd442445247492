//! Profile command - clean a file, then tabulate its label columns.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::summary::{crosstab, crosstab_ordered, null_counts, Crosstab};
use tabnorm::{BucketTable, Dataset, Parser, Pipeline, PipelineConfig, PipelineStep};

use super::load_config;

pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    by: String,
    columns: Vec<String>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref())?;

    let columns = if columns.is_empty() {
        config.label_columns().map(str::to_string).collect()
    } else {
        columns
    };
    if columns.is_empty() {
        return Err("No columns to tabulate. Pass --column or use a config with bucket steps.".into());
    }

    let pipeline = Pipeline::new(config.clone())?.keep_audits(false);
    let (data, source) = Parser::new().load_file(&file)?;
    let (clean, report) = pipeline.run(data)?;

    let tables = columns
        .iter()
        .map(|column| tabulate(&clean, &config, column, &by))
        .collect::<tabnorm::Result<Vec<_>>>()?;
    let nulls = null_counts(&clean);

    if json_output {
        let profile = serde_json::json!({
            "file": file.display().to_string(),
            "pipeline": report.pipeline,
            "input_rows": report.input_rows,
            "output_rows": report.output_rows,
            "null_counts": nulls,
            "crosstabs": tables,
        });
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Profile of".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "  {} of {} rows kept after cleaning",
        report.output_rows.to_string().white().bold(),
        report.input_rows
    );
    if verbose {
        println!(
            "  Loaded {} rows, {} columns ({}, delimiter {:?})",
            source.row_count, source.column_count, source.format, source.delimiter
        );
        for (column, count) in report.failures_by_column() {
            println!(
                "  {} {}",
                column.red(),
                format!("({} values failed coercion)", count).dimmed()
            );
        }
    }
    println!();

    println!("{}", "Missing values:".yellow().bold());
    let with_nulls: Vec<_> = nulls.iter().filter(|(_, n)| **n > 0).collect();
    if with_nulls.is_empty() {
        println!("  {}", "none".green());
    }
    for (column, count) in with_nulls {
        println!("  {:<24} {}", column, count.to_string().red());
    }

    for table in &tables {
        println!();
        print_crosstab(table);
    }

    Ok(())
}

/// Cross-tabulate in bucket order when `column` is produced by a bucket step.
fn tabulate(
    data: &Dataset,
    config: &PipelineConfig,
    column: &str,
    by: &str,
) -> tabnorm::Result<Crosstab> {
    let ranges = config.steps.iter().find_map(|step| match step {
        PipelineStep::Bucket { target, ranges, .. } if target == column => Some(ranges),
        _ => None,
    });

    match ranges {
        Some(ranges) => {
            let table = BucketTable::new(ranges.clone())?;
            crosstab_ordered(data, column, by, &table)
        }
        None => crosstab(data, column, by),
    }
}

fn print_crosstab(table: &Crosstab) {
    println!(
        "{} {} {}",
        table.column.yellow().bold(),
        "by".dimmed(),
        table.by.yellow().bold()
    );

    let mut header = format!("  {:<16}", "");
    for outcome in &table.outcomes {
        header.push_str(&format!("{:>8}", outcome));
    }
    header.push_str(&format!("{:>8}", "total"));
    println!("{}", header.bold());

    for (label, row) in &table.counts {
        let total: usize = row.values().sum();
        let mut line = format!("  {:<16}", label);
        for outcome in &table.outcomes {
            line.push_str(&format!("{:>8}", row.get(outcome).copied().unwrap_or(0)));
        }
        line.push_str(&format!("{:>8}", total));
        if total == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}
