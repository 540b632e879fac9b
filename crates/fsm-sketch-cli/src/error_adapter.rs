//! Error adapter for converting FsmSketchError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`fsm_sketch_catalogue::error::ParseError`] contains multiple
//! diagnostics, each diagnostic is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity, SourceSpan};

use fsm_sketch::FsmSketchError;
use fsm_sketch_catalogue::error::Diagnostic;

/// Adapter for a single catalogue diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Catalogue source for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for a malformed SVG document, pointing at the XML error.
pub struct SvgParseAdapter<'a> {
    message: &'a str,
    offset: usize,
    src: &'a str,
}

impl<'a> SvgParseAdapter<'a> {
    pub fn new(message: &'a str, offset: usize, src: &'a str) -> Self {
        Self {
            message,
            offset,
            src,
        }
    }
}

impl fmt::Debug for SvgParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgParseAdapter")
            .field("message", &self.message)
            .field("offset", &self.offset)
            .finish()
    }
}

impl fmt::Display for SvgParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse SVG: {}", self.message)
    }
}

impl std::error::Error for SvgParseAdapter<'_> {}

impl MietteDiagnostic for SvgParseAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("fsm_sketch::svg_parse"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let offset = self.offset.min(self.src.len());
        let len = self.src[offset..].chars().next().map_or(0, char::len_utf8);
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(
                Some("malformed markup".to_string()),
                SourceSpan::new(offset.into(), len),
            ),
        )))
    }
}

/// Adapter for [`FsmSketchError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a FsmSketchError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FsmSketchError::Io(_) => "fsm_sketch::io",
            FsmSketchError::FileNotFound(_) => "fsm_sketch::file_not_found",
            FsmSketchError::ExampleNotFound { .. } => "fsm_sketch::not_found",
            FsmSketchError::Import(_) => "fsm_sketch::import",
            FsmSketchError::Export(_) => "fsm_sketch::export",
            FsmSketchError::Config(_) => "fsm_sketch::config",
            FsmSketchError::Catalogue { .. } | FsmSketchError::SvgParse { .. } => return None,
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<Severity> {
        if self.0.is_fatal() {
            Some(Severity::Error)
        } else {
            Some(Severity::Warning)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            FsmSketchError::ExampleNotFound { available, .. } if available.is_empty() => {
                "the catalogue has no examples".to_string()
            }
            FsmSketchError::ExampleNotFound { available, .. } => {
                format!("available examples: {}", available.join(", "))
            }
            FsmSketchError::FileNotFound(_) => "check the path and try again".to_string(),
            FsmSketchError::Config(_) => {
                "fix the configuration file or pass another one with `--config`".to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A catalogue diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A malformed SVG document.
    Markup(SvgParseAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Markup(m) => fmt::Display::fmt(m, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) | Reportable::Markup(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Markup(m) => m.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Markup(m) => m.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Markup(m) => m.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Markup(m) => m.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Markup(m) => m.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a catalogue [`Span`](fsm_sketch_catalogue::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: fsm_sketch_catalogue::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`FsmSketchError`] into a list of reportable errors.
///
/// For [`FsmSketchError::Catalogue`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &FsmSketchError) -> Vec<Reportable<'_>> {
    match err {
        FsmSketchError::Catalogue {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        FsmSketchError::SvgParse {
            message,
            offset,
            src,
        } => vec![Reportable::Markup(SvgParseAdapter::new(message, *offset, src))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
