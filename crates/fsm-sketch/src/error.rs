//! Error types for FSM sketch operations.
//!
//! [`FsmSketchError`] wraps every failure of the generate and import
//! pipelines. Variants that relate to a source text keep that text so a
//! reporter can point into it.

use std::{io, path::PathBuf};

use thiserror::Error;

use fsm_sketch_catalogue::error::ParseError;

use crate::{export, import};

/// The main error type for FSM sketch operations.
///
/// # Diagnostic Variants
///
/// `Catalogue` carries the loader's span-carrying diagnostics together with
/// the catalogue source. `SvgParse` carries the byte offset of the XML error
/// inside the document source.
#[derive(Debug, Error)]
pub enum FsmSketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{err}")]
    Catalogue { err: ParseError, src: String },

    #[error("Example '{name}' not found.")]
    ExampleNotFound { name: String, available: Vec<String> },

    #[error("Failed to parse SVG: {message}")]
    SvgParse {
        message: String,
        offset: usize,
        src: String,
    },

    #[error("Import error: {0}")]
    Import(import::Error),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FsmSketchError {
    /// Whether the run should end with a failure status.
    ///
    /// An unknown example is reported without failing the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ExampleNotFound { .. })
    }

    /// Create a new `Catalogue` error with the associated source text.
    pub fn new_catalogue_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Catalogue {
            err,
            src: src.into(),
        }
    }

    /// Create an error for a failed import of `src`.
    ///
    /// XML syntax errors become `SvgParse` with a byte offset into `src`;
    /// everything else becomes `Import`.
    pub fn new_import_error(err: import::Error, src: &str) -> Self {
        match err {
            import::Error::Xml(xml) => {
                let pos = xml.pos();
                Self::SvgParse {
                    message: xml.to_string(),
                    offset: import::byte_offset(src, pos.row, pos.col),
                    src: src.to_string(),
                }
            }
            other => Self::Import(other),
        }
    }
}
