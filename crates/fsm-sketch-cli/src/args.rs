//! Command-line argument definitions for the FSM sketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global options select the configuration file and logging
//! verbosity; each [`Command`] runs one pipeline.

use clap::{Parser, Subcommand};

/// Command-line arguments for the FSM sketch tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Prints help when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one catalogue example to an editable SVG file
    Generate {
        /// Name of the example in the catalogue
        #[arg(help = "Name of the example to render")]
        example_name: String,

        /// Catalogue source file, overriding the configuration
        #[arg(long)]
        catalogue: Option<String>,

        /// Output SVG file, overriding the configuration
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Read an edited SVG file and print the catalogue fragments to merge
    Import {
        #[arg(help = "Path to the edited SVG file")]
        svg_file: String,
    },

    /// Print the names of the examples in the catalogue
    List {
        /// Catalogue source file, overriding the configuration
        #[arg(long)]
        catalogue: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_forms() {
        let args = Args::parse_from(["fsm-sketch", "generate", "toggle"]);
        assert!(matches!(
            args.command,
            Some(Command::Generate { ref example_name, catalogue: None, output: None })
                if example_name == "toggle"
        ));
        assert_eq!(args.log_level, "info");

        let args = Args::parse_from(["fsm-sketch", "import", "fsm.svg"]);
        assert!(matches!(
            args.command,
            Some(Command::Import { ref svg_file }) if svg_file == "fsm.svg"
        ));
    }

    #[test]
    fn test_global_options_after_command() {
        let args = Args::parse_from([
            "fsm-sketch",
            "list",
            "--catalogue",
            "web/examples.ts",
            "--config",
            "custom.toml",
            "--log-level",
            "off",
        ]);

        assert_eq!(args.config.as_deref(), Some("custom.toml"));
        assert_eq!(args.log_level, "off");
        assert!(matches!(
            args.command,
            Some(Command::List { catalogue: Some(ref path) }) if path == "web/examples.ts"
        ));
    }

    #[test]
    fn test_no_command() {
        let args = Args::parse_from(["fsm-sketch"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Args::try_parse_from(["fsm-sketch", "explode"]).is_err());
    }
}
