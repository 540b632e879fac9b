//! # FSM Sketch Catalogue
//!
//! Loader for FSM catalogues kept as an object literal inside a
//! TypeScript or JavaScript source file:
//!
//! ```text
//! export const examples = {
//!     toggle: {
//!         states: { off: { x: 10, y: 10 }, on: { x: 50, y: 10 } },
//!         transitions: [
//!             { from: "off", to: "on", input: "flip" },
//!             { from: "on", to: "off", input: "flip" },
//!         ],
//!     },
//! };
//! ```
//!
//! ## Usage
//!
//! ```
//! # use fsm_sketch_catalogue::{parse, ParseConfig};
//! let source = r#"export const examples = {
//!     toggle: {
//!         states: { off: { x: 10, y: 10 }, on: { x: 50, y: 10 } },
//!         transitions: [{ from: "off", to: "on", input: "flip" }],
//!     },
//! };"#;
//!
//! let catalogue = parse(source, &ParseConfig::default()).expect("valid catalogue");
//! assert_eq!(catalogue.names().collect::<Vec<_>>(), ["toggle"]);
//! ```

pub mod error;

mod elaborate;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use span::{Span, Spanned};

use log::{debug, info};

use fsm_sketch_core::model::Catalogue;

use elaborate::Builder;
use error::ParseError;

/// Name of the exported constant holding the catalogue, unless configured otherwise.
pub const DEFAULT_BINDING: &str = "examples";

/// Options for [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    binding: String,
}

impl ParseConfig {
    /// Creates a config that reads the constant named `binding`.
    pub fn new(binding: impl Into<String>) -> Self {
        Self {
            binding: binding.into(),
        }
    }

    pub fn binding(&self) -> &str {
        &self.binding
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BINDING)
    }
}

/// Parse catalogue source text into a [`Catalogue`].
///
/// 1. **Locate** - find `export const <binding> =`
/// 2. **Parse** - read the object literal that follows
/// 3. **Elaborate** - check its shape and build the model
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostics carry spans into `source`.
/// Syntax errors stop at the first problem; shape errors are all collected.
pub fn parse(source: &str, config: &ParseConfig) -> Result<Catalogue, ParseError> {
    info!(binding = config.binding(); "Loading catalogue");

    let literal = parser::parse_declaration(source, config.binding())?;
    debug!("Catalogue literal parsed");

    Builder::new().build(&literal)
}
