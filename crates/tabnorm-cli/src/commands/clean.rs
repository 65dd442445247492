//! Clean command - run the pipeline and write cleaned data plus a report.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::pipeline::{cleaned_path, report_path};
use tabnorm::{NormalizationReport, Parser, Pipeline};

use super::load_config;

pub struct CleanOptions {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub strict: bool,
    pub keep_audits: bool,
}

pub fn run(options: CleanOptions, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let CleanOptions {
        file,
        config,
        output,
        report,
        strict,
        keep_audits,
    } = options;

    // Validate configuration before touching the data
    let config = load_config(config.as_deref())?;
    let pipeline = Pipeline::new(config)?.keep_audits(keep_audits);

    println!(
        "{} {} {}",
        "Cleaning".cyan().bold(),
        file.display().to_string().white(),
        format!("(pipeline: {})", pipeline.name()).dimmed()
    );

    let (data, source) = Parser::new().load_file(&file)?;
    if verbose {
        println!(
            "  Loaded {} rows, {} columns ({}, delimiter {:?})",
            source.row_count, source.column_count, source.format, source.delimiter
        );
    }

    let (clean, run_report) = pipeline.run(data)?;
    let run_report = run_report.with_source(source);

    let output = output.unwrap_or_else(|| cleaned_path(&file));
    clean.save_csv(&output)?;

    let report_out = report.unwrap_or_else(|| report_path(&file));
    run_report.save(&report_out)?;

    print_summary(&run_report, verbose);

    println!();
    println!(
        "{} {}",
        "Cleaned data:".green().bold(),
        output.display().to_string().white()
    );
    println!(
        "{} {}",
        "Report:".green().bold(),
        report_out.display().to_string().white()
    );

    if strict && !run_report.is_clean() {
        return Err(format!(
            "{} value(s) failed coercion (strict mode)",
            run_report.failures.len()
        )
        .into());
    }

    Ok(())
}

fn print_summary(report: &NormalizationReport, verbose: bool) {
    println!();
    println!("{}", "Summary:".yellow().bold());
    println!("  Steps applied:  {}", report.steps_applied.to_string().white());
    println!("  Rows in:        {}", report.input_rows.to_string().white());
    println!("  Rows out:       {}", report.output_rows.to_string().white());
    println!(
        "  Values changed: {}",
        report.values_changed().to_string().white()
    );

    let dropped = report.dropped_rows();
    let dropped_text = if dropped == 0 {
        dropped.to_string().green()
    } else {
        dropped.to_string().yellow()
    };
    println!("  Rows dropped:   {}", dropped_text);

    if verbose {
        for change in &report.changes {
            if change.values_changed > 0 {
                println!(
                    "    {} {}",
                    format!("[{}]", change.values_changed).dimmed(),
                    change.description
                );
            }
        }
    }

    if report.is_clean() {
        println!("  Failures:       {}", "0".green());
        return;
    }

    println!(
        "  Failures:       {}",
        report.failures.len().to_string().red()
    );
    for (column, count) in report.failures_by_column() {
        println!("    {} {}", column.red(), format!("({})", count).dimmed());
    }

    // Show a handful of raw values so a bad input is easy to find
    let shown = if verbose { report.failures.len() } else { 5 };
    for failure in report.failures.iter().take(shown) {
        println!(
            "    row {}: {} = {:?} ({})",
            failure.row,
            failure.column,
            failure.raw,
            failure.kind.as_str()
        );
    }
    if report.failures.len() > shown {
        println!(
            "    {}",
            format!("... and {} more", report.failures.len() - shown).dimmed()
        );
    }
}
