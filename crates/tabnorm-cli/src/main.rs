//! tabnorm CLI - tolerant cleaning and bucketing of tabular data.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Clean {
            file,
            config,
            output,
            report,
            strict,
            no_audits,
        } => commands::clean::run(
            commands::clean::CleanOptions {
                file,
                config,
                output,
                report,
                strict,
                keep_audits: !no_audits,
            },
            cli.verbose,
        ),

        Commands::Profile {
            file,
            config,
            by,
            columns,
            json,
        } => commands::profile::run(file, config, by, columns, json, cli.verbose),

        Commands::Bins { json } => commands::bins::run(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
