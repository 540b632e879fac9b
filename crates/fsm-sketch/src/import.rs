//! Extraction of edited geometry from an SVG document.
//!
//! Only elements carrying the identifying `data-*` attributes are read:
//! circles with `data-state-name` yield state positions, paths with
//! `data-from`, `data-to` and `data-input` yield transition geometry.
//! Everything else in the document is ignored, so files re-saved by a
//! vector editor import fine.

use indexmap::IndexMap;
use log::{debug, trace};
use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;

use fsm_sketch_core::{geometry::Point, model::CurvePath};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Xml(#[from] roxmltree::Error),

    #[error("{element} for '{owner}' has no '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        owner: String,
        attribute: &'static str,
    },

    #[error("state '{state}' has an invalid '{attribute}' value '{value}'")]
    InvalidNumber {
        state: String,
        attribute: &'static str,
        value: String,
    },
}

/// Geometry recovered for one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionUpdate {
    pub from: String,
    pub to: String,
    pub input: String,
    pub path: CurvePath,
}

/// Positions and paths recovered from a document.
///
/// States keep first-seen order; a repeated state name keeps the last
/// position seen. Transitions are kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    states: IndexMap<String, Point>,
    transitions: Vec<TransitionUpdate>,
}

impl UpdateSet {
    pub fn states(&self) -> impl Iterator<Item = (&str, Point)> {
        self.states.iter().map(|(name, point)| (name.as_str(), *point))
    }

    pub fn state(&self, name: &str) -> Option<Point> {
        self.states.get(name).copied()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transitions(&self) -> &[TransitionUpdate] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.transitions.is_empty()
    }
}

/// Reads every tagged circle and path from `source`.
///
/// # Errors
///
/// Returns [`Error::Xml`] for malformed markup, and the other variants for
/// tagged elements whose geometry cannot be read.
pub fn import(source: &str) -> Result<UpdateSet, Error> {
    // Some editors write a DOCTYPE; allow it.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(source, options)?;
    let mut update = UpdateSet::default();

    for node in doc.descendants().filter(|n| is_svg_element(n, "circle")) {
        let Some(name) = node.attribute("data-state-name") else {
            continue;
        };
        let x = coordinate(&node, name, "cx")?;
        let y = coordinate(&node, name, "cy")?;
        trace!(state = name, x, y; "Found state");
        update.states.insert(name.to_string(), Point::new(x, y));
    }

    for node in doc.descendants().filter(|n| is_svg_element(n, "path")) {
        let (Some(from), Some(to), Some(input)) = (
            node.attribute("data-from"),
            node.attribute("data-to"),
            node.attribute("data-input"),
        ) else {
            continue;
        };
        let Some(d) = node.attribute("d") else {
            return Err(Error::MissingAttribute {
                element: "path",
                owner: format!("{from} -> {to} ({input})"),
                attribute: "d",
            });
        };
        trace!(from, to, input, d; "Found transition");
        update.transitions.push(TransitionUpdate {
            from: from.to_string(),
            to: to.to_string(),
            input: input.to_string(),
            path: CurvePath::new(d),
        });
    }

    debug!(
        states = update.state_count(),
        transitions = update.transitions.len();
        "SVG imported"
    );
    Ok(update)
}

/// Matches `tag` in the SVG namespace or in no namespace at all.
fn is_svg_element(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == tag
        && node
            .tag_name()
            .namespace()
            .is_none_or(|ns| ns == SVG_NAMESPACE)
}

fn coordinate(node: &Node<'_, '_>, state: &str, attribute: &'static str) -> Result<f64, Error> {
    let value = node
        .attribute(attribute)
        .ok_or_else(|| Error::MissingAttribute {
            element: "circle",
            owner: state.to_string(),
            attribute,
        })?;

    value.trim().parse().map_err(|_| Error::InvalidNumber {
        state: state.to_string(),
        attribute,
        value: value.to_string(),
    })
}

/// Converts a 1-based row and character column into a byte offset.
///
/// Positions past the end of a line or of the text are clamped.
pub fn byte_offset(source: &str, row: u32, col: u32) -> usize {
    let mut line_start = 0;
    for _ in 1..row {
        match source[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return source.len(),
        }
    }

    let line = &source[line_start..];
    let line_end = line.find('\n').unwrap_or(line.len());
    let column = line[..line_end]
        .char_indices()
        .nth(col.saturating_sub(1) as usize)
        .map_or(line_end, |(offset, _)| offset);

    line_start + column
}
