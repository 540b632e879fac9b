//! The error returned when a catalogue cannot be loaded.

use std::fmt;

use crate::error::Diagnostic;

/// The loading stage that rejected a catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lexing or parsing stopped at the first problem.
    Syntax,
    /// The literal parsed but does not describe valid FSMs.
    Shape,
}

/// Diagnostics produced while loading a catalogue.
///
/// A syntax failure holds exactly one diagnostic; a shape failure holds
/// every problem found in the literal, in the order they were found.
#[derive(Debug)]
pub struct ParseError {
    stage: Stage,
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// A shape failure holding every problem found in the literal.
    pub fn shape(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            stage: Stage::Shape,
            diagnostics,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.diagnostics.first() else {
            return write!(f, "invalid catalogue");
        };

        match self.stage {
            Stage::Syntax => write!(f, "catalogue syntax {first}"),
            Stage::Shape => {
                write!(f, "invalid catalogue: {first}")?;
                if self.diagnostics.len() > 1 {
                    write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            stage: Stage::Syntax,
            diagnostics: vec![diagnostic],
        }
    }
}
