//! Bins command - print the built-in bucket tables.

use colored::Colorize;
use tabnorm::bucket::presets::{monthly_charge_ranges, tenure_ranges, total_charge_ranges};
use tabnorm::{BucketTable, OUT_OF_RANGE};

pub fn run(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tables = [
        ("tenure", BucketTable::new(tenure_ranges())?),
        ("MonthlyCharges", BucketTable::new(monthly_charge_ranges())?),
        ("TotalCharges", BucketTable::new(total_charge_ranges())?),
    ];

    if json_output {
        let bins: serde_json::Map<String, serde_json::Value> = tables
            .iter()
            .map(|(column, table)| Ok((column.to_string(), serde_json::to_value(table)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&bins)?);
        return Ok(());
    }

    for (i, (column, table)) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            column.cyan().bold(),
            format!("({} bins)", table.ranges().len()).dimmed()
        );
        for range in table.ranges() {
            let hi = if range.hi.is_infinite() {
                "∞".to_string()
            } else {
                range.hi.to_string()
            };
            println!("  [{:>7}, {:>7})  {}", range.lo, hi, range.label.white());
        }
    }

    println!();
    println!(
        "Values outside every range are labelled {}.",
        format!("\"{}\"", OUT_OF_RANGE).yellow()
    );

    Ok(())
}
