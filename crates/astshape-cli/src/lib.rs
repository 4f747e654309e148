//! CLI logic for the AstShape grammar tool.
//!
//! This module loads a grammar, applies the requested attribute edits and
//! renders the requested entries.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::{Args, SetEdit};
pub use config::ConfigError;
pub use error::CliError;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{info, warn};

use astshape::{Diagnostic, Session};

use error_adapter::warnings_to_reportables;

/// Run the AstShape CLI application
///
/// This function loads the grammar file, applies every `--set` edit in
/// order and writes the rendering of the requested entries to the output
/// file, or to stdout when none is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns [`CliError::Config`] when the configuration file is missing or
/// invalid, and [`CliError::AstShape`] for I/O failures, rejected grammar or
/// hint files, and edits or renderings that fail.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        grammar_path = args.grammar,
        names = args.names.len(),
        edits = args.set.len();
        "Processing grammar"
    );

    let mut app_config = config::load_config(args.config.as_deref().map(Path::new))?;
    if let Some(order) = &args.order {
        app_config.set_attribute_order(order);
    }

    let grammar = fs::read_to_string(&args.grammar)?;
    let hints = app_config
        .source()
        .attribute_order()
        .map(fs::read_to_string)
        .transpose()?;

    let mut session = Session::load(&app_config, &grammar, hints.as_deref())?;
    report_warnings(session.warnings(), hints.as_deref().unwrap_or_default());

    for edit in &args.set {
        let outcome = session.upsert(&edit.name, &edit.attribute, edit.argument.clone())?;
        info!(edit:% = edit, outcome:? = outcome; "Applied edit");
    }

    let rendering = if args.names.is_empty() {
        session.render_all()?
    } else {
        args.names
            .iter()
            .map(|name| session.render(name))
            .collect::<Result<Vec<_>, _>>()?
            .concat()
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendering)?;
            info!(output_file = path; "Rendering written");
        }
        None => io::stdout().lock().write_all(rendering.as_bytes())?,
    }

    Ok(())
}

fn report_warnings(warnings: &[Diagnostic], src: &str) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in warnings_to_reportables(warnings, src) {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, &reportable).is_ok() {
            warn!("{writer}");
        }
    }
}
