//! Untyped literal values produced by the parser.

use crate::span::{Span, Spanned};

/// A parsed literal value with the span it covers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Value {
    pub kind: ValueKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueKind {
    /// Entries in source order; duplicate keys are kept for later reporting.
    Object(Vec<(Spanned<String>, Value)>),
    Array(Vec<Value>),
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Value {
    pub(crate) fn new(kind: ValueKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Name of the value's type, for error messages.
    pub(crate) fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Object(_) => "object",
            ValueKind::Array(_) => "array",
            ValueKind::String(_) => "string",
            ValueKind::Number(_) => "number",
            ValueKind::Bool(_) => "boolean",
            ValueKind::Null => "null",
        }
    }
}
