//! Diagnostics for catalogue loading.
//!
//! Every problem found while reading a catalogue is described by a
//! [`Diagnostic`]: an [`ErrorCode`], a message, one or more labelled spans
//! into the source text, and optional help. A failed load returns a
//! [`ParseError`] holding every diagnostic collected.
//!
//! # Example
//!
//! ```
//! # use fsm_sketch_catalogue::error::{Diagnostic, ErrorCode};
//! # use fsm_sketch_catalogue::Span;
//!
//! let diag = Diagnostic::error("transition refers to unknown state `q9`")
//!     .with_code(ErrorCode::E202)
//!     .with_label(Span::new(120..124), "no such state")
//!     .with_help("declare `q9` under `states` or fix the name");
//! ```

mod diagnostic;
mod error_code;
mod parse_error;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use parse_error::{ParseError, Stage};
