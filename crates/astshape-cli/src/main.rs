//! AstShape CLI entry point.

use std::{process::ExitCode, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use astshape_cli::{Args, CliError, error_adapter::to_reportables};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match astshape_cli::run(&args) {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Falls back to `warn` for an unknown level name.
fn init_logging(level: &str) {
    let (log_level, unknown) = match LevelFilter::from_str(level) {
        Ok(log_level) => (log_level, false),
        Err(_) => (LevelFilter::Warn, true),
    };

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    if unknown {
        error!(requested = level; "Unknown log level, using 'warn'");
    }
    info!(log_level:?; "Starting AstShape");
}

fn report(err: &CliError) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        match reporter.render_report(&mut rendered, &reportable) {
            Ok(()) => error!("{rendered}"),
            Err(_) => error!("{reportable}"),
        }
    }
}
