//! Rendering of an [`UpdateSet`] as catalogue fragments for manual merging.
//!
//! String contents are escaped with JavaScript backslash escapes for their
//! quote character, backslashes and control characters. Locator comments
//! use the same escaping so no name can end a comment line early.

use std::fmt::Write;

use crate::import::UpdateSet;

/// Printed instead of fragments when nothing was imported.
pub const NOTHING_FOUND: &str = "No states or paths with data attributes found in the SVG.";

const HEADER: &str = "// Copy the following code into your catalogue to update the FSM:";

/// Renders `update` as copy-paste text, one fragment per state and transition.
pub fn render(update: &UpdateSet) -> String {
    if update.is_empty() {
        return format!("{NOTHING_FOUND}\n");
    }

    let mut out = String::new();
    write_fragments(&mut out, update).expect("Writing to String buffer is infallible");
    out
}

fn write_fragments(out: &mut String, update: &UpdateSet) -> std::fmt::Result {
    writeln!(out, "{HEADER}")?;

    if update.state_count() > 0 {
        writeln!(out, "\n// Updated states:")?;
        for (name, position) in update.states() {
            let name = escape(name, '"');
            writeln!(out, "// For state \"{name}\"")?;
            writeln!(
                out,
                "\"{name}\": {{ x: {:.2}, y: {:.2} }},",
                position.x(),
                position.y()
            )?;
        }
    }

    if !update.transitions().is_empty() {
        writeln!(out, "\n// Updated paths:")?;
        for transition in update.transitions() {
            writeln!(
                out,
                "// For transition from '{}' to '{}' on input '{}'",
                escape(&transition.from, '\''),
                escape(&transition.to, '\''),
                escape(&transition.input, '\'')
            )?;
            writeln!(out, "path: '{}',", escape(transition.path.as_str(), '\''))?;
        }
    }

    Ok(())
}

/// Escapes `value` for a JavaScript string literal delimited by `quote`.
fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            // U+2028 and U+2029 end a line comment in JavaScript.
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                write!(out, "\\u{{{:x}}}", u32::from(c))
                    .expect("Writing to String buffer is infallible");
            }
            c => out.push(c),
        }
    }
    out
}
