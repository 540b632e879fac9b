//! FSM sketch CLI library
//!
//! This module contains the command dispatch for the `fsm-sketch` tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::io::{self, Write};

use clap::CommandFactory;
use log::info;

use fsm_sketch::{FsmSketchError, Sketcher, config::AppConfig};

/// Run the FSM sketch CLI application, printing results to stdout.
///
/// # Errors
///
/// Returns `FsmSketchError` for:
/// - Configuration loading errors
/// - Missing or unreadable files
/// - Catalogue parse errors and unknown examples
/// - Malformed or unreadable SVG documents
pub fn run(args: &Args) -> Result<(), FsmSketchError> {
    let stdout = io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the application, writing user-facing output to `out`.
///
/// # Errors
///
/// As [`run`], plus I/O errors while writing to `out`.
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<(), FsmSketchError> {
    let Some(command) = &args.command else {
        let help = Args::command().render_help();
        write!(out, "{help}")?;
        return Ok(());
    };

    let app_config = config::load_config(args.config.as_ref())?;

    match command {
        Command::Generate {
            example_name,
            catalogue,
            output,
        } => {
            let app_config = with_catalogue(app_config, catalogue.as_deref());
            let app_config = match output {
                Some(path) => app_config.with_output_path(path),
                None => app_config,
            };
            generate(app_config, example_name, out)
        }
        Command::Import { svg_file } => {
            let sketcher = Sketcher::new(app_config);
            let update = sketcher.import_file(svg_file)?;
            write!(out, "{}", sketcher.report(&update))?;
            Ok(())
        }
        Command::List { catalogue } => {
            let sketcher = Sketcher::new(with_catalogue(app_config, catalogue.as_deref()));
            let catalogue = sketcher.load_catalogue(sketcher.config().catalogue().path())?;
            for name in catalogue.names() {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
    }
}

fn with_catalogue(config: AppConfig, path: Option<&str>) -> AppConfig {
    match path {
        Some(path) => config.with_catalogue_path(path),
        None => config,
    }
}

fn generate(app_config: AppConfig, name: &str, out: &mut impl Write) -> Result<(), FsmSketchError> {
    info!(
        example = name,
        catalogue_path:? = app_config.catalogue().path(),
        output_path:? = app_config.output().path();
        "Processing example"
    );

    let sketcher = Sketcher::new(app_config);
    let config = sketcher.config();
    let catalogue = sketcher.load_catalogue(config.catalogue().path())?;
    sketcher.generate(&catalogue, name, config.output().path())?;

    writeln!(
        out,
        "Successfully generated {} for example '{name}'.",
        config.output().path().display()
    )?;
    Ok(())
}
