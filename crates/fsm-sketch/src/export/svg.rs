//! SVG rendering of FSM descriptions.
//!
//! The document holds one arrowhead marker, one path per transition and one
//! circle plus label per state. Paths and circles carry `data-*` attributes
//! naming the model element they were drawn from so an edited copy can be
//! imported again.

use std::{
    borrow::Cow,
    collections::HashSet,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use svg::{
    Document, Node,
    node::element::{Circle, Definitions, Marker, Path as PathElement, Text},
};
use tempfile::NamedTempFile;

use fsm_sketch_core::{
    curve::CurveSynthesizer,
    geometry::Point,
    model::{CurvePath, FsmDescription, Transition},
};

use crate::{config::StyleConfig, export};

/// Id of the shared arrowhead marker.
pub const ARROWHEAD_ID: &str = "arrowhead";

/// Builder for [`Svg`] exporters.
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    file_name: PathBuf,
    state_radius: f64,
    font_size: f64,
    synthesizer: CurveSynthesizer,
}

impl SvgBuilder {
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        let style = StyleConfig::default();
        Self {
            file_name: file_name.into(),
            state_radius: style.state_radius(),
            font_size: style.font_size(),
            synthesizer: CurveSynthesizer::default(),
        }
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.state_radius = style.state_radius();
        self.font_size = style.font_size();
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: CurveSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn build(self) -> Svg {
        Svg {
            file_name: self.file_name,
            state_radius: self.state_radius,
            font_size: self.font_size,
            synthesizer: self.synthesizer,
        }
    }
}

/// SVG exporter writing to a single file.
#[derive(Debug, Clone)]
pub struct Svg {
    file_name: PathBuf,
    state_radius: f64,
    font_size: f64,
    synthesizer: CurveSynthesizer,
}

impl Svg {
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Renders `fsm` to indented SVG text without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::UnknownState`] if a transition names a state
    /// that has no position.
    pub fn render_fsm(&self, fsm: &FsmDescription) -> Result<String, export::Error> {
        let doc = self.render_document(fsm)?;

        let mut content = String::new();
        write_node(&mut content, &doc, 0);
        Ok(content)
    }

    fn render_document(&self, fsm: &FsmDescription) -> Result<Document, export::Error> {
        let mut doc = Document::new()
            .set("viewBox", "0 0 100 100")
            .set("preserveAspectRatio", "xMidYMid meet")
            .add(marker_definitions());

        let mut seen = HashSet::new();
        for transition in fsm.transitions() {
            if !seen.insert(transition.key()) {
                let (from, to, input) = transition.key();
                warn!(from, to, input; "Duplicate transition cannot be told apart on import");
            }
            doc = doc.add(self.render_transition(fsm, transition)?);
        }

        for (name, position) in fsm.states() {
            doc = doc.add(self.render_state_circle(name, position));
            doc = doc.add(self.render_state_label(name, position));
        }

        debug!(
            states = fsm.state_count(),
            transitions = fsm.transitions().len();
            "SVG document rendered"
        );
        Ok(doc)
    }

    /// The stored path if present, otherwise a synthesized curve.
    fn transition_path(
        &self,
        fsm: &FsmDescription,
        transition: &Transition,
    ) -> Result<CurvePath, export::Error> {
        let from = state_position(fsm, transition, transition.from())?;
        let to = state_position(fsm, transition, transition.to())?;

        if let Some(path) = transition.path() {
            return Ok(path.clone());
        }

        let curve = self
            .synthesizer
            .synthesize(from, to, transition.is_self_loop());
        Ok(curve.to_path())
    }

    fn render_transition(
        &self,
        fsm: &FsmDescription,
        transition: &Transition,
    ) -> Result<PathElement, export::Error> {
        let path = self.transition_path(fsm, transition)?;

        Ok(PathElement::new()
            .set("stroke", "black")
            .set("fill", "none")
            .set("marker-end", format!("url(#{ARROWHEAD_ID})"))
            .set("data-from", transition.from())
            .set("data-to", transition.to())
            .set("data-input", transition.input())
            .set("d", path.into_string()))
    }

    fn render_state_circle(&self, name: &str, position: Point) -> Circle {
        Circle::new()
            .set("cx", position.x())
            .set("cy", position.y())
            .set("r", self.state_radius)
            .set("stroke", "black")
            .set("fill", "white")
            .set("data-state-name", name)
    }

    fn render_state_label(&self, name: &str, position: Point) -> Text {
        Text::new(name)
            .set("x", position.x())
            .set("y", position.y())
            .set("font-size", self.font_size)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
    }

    /// Writes `content` to the target file in one step.
    ///
    /// The content goes to a temporary file next to the target which then
    /// replaces it, so a failed write leaves any previous file intact.
    fn write_document(&self, content: &str) -> Result<(), export::Error> {
        info!(file_name:? = self.file_name; "Creating SVG file");

        let dir = self
            .file_name
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut temp = match NamedTempFile::new_in(dir) {
            Ok(temp) => temp,
            Err(err) => {
                error!(file_name:? = self.file_name, err:err; "Failed to create temporary SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = temp.write_all(content.as_bytes()) {
            error!(file_name:? = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        if let Err(err) = temp.persist(&self.file_name) {
            let err = err.error;
            error!(file_name:? = self.file_name, err:err; "Failed to persist SVG file");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_fsm(&self, fsm: &FsmDescription) -> Result<(), export::Error> {
        let content = self.render_fsm(fsm)?;
        self.write_document(&content)
    }
}

fn state_position(
    fsm: &FsmDescription,
    transition: &Transition,
    state: &str,
) -> Result<Point, export::Error> {
    fsm.state(state).ok_or_else(|| export::Error::UnknownState {
        from: transition.from().to_string(),
        to: transition.to().to_string(),
        input: transition.input().to_string(),
        state: state.to_string(),
    })
}

/// Creates the arrowhead marker shared by every transition.
fn marker_definitions() -> Definitions {
    let arrowhead = Marker::new()
        .set("id", ARROWHEAD_ID)
        .set("viewBox", "-10 -5 10 10")
        .set("refX", -5)
        .set("refY", 0)
        .set("markerWidth", 4)
        .set("markerHeight", 4)
        .set("orient", "auto-start-reverse")
        .add(PathElement::new().set("d", "M 0 0 L -10 -5 L -10 5 Z"));

    Definitions::new().add(arrowhead)
}

/// Serializes `node` with two spaces of indentation per nesting level.
///
/// Elements holding only text keep it on the same line as their tags, so a
/// label reads `<text ...>name</text>`.
fn write_node(out: &mut String, node: &dyn Node, depth: usize) {
    let padding = "  ".repeat(depth);
    out.push_str(&padding);

    let Some(attributes) = node.get_attributes() else {
        // Text nodes escape their own content.
        out.push_str(&node.to_string());
        out.push('\n');
        return;
    };

    out.push('<');
    out.push_str(node.get_name());

    let mut attributes: Vec<_> = attributes.iter().collect();
    attributes.sort_by_key(|pair| pair.0.as_str());
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }

    let children = node.get_children().map(Vec::as_slice).unwrap_or_default();
    if children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push('>');

    if children.iter().all(|child| child.get_attributes().is_none()) {
        for child in children {
            out.push_str(&child.to_string());
        }
    } else {
        out.push('\n');
        for child in children {
            write_node(out, child.as_ref(), depth + 1);
        }
        out.push_str(&padding);
    }

    out.push_str("</");
    out.push_str(node.get_name());
    out.push_str(">\n");
}

/// Escapes an attribute value, including whitespace that XML parsers would
/// otherwise normalize to spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\n', '\r', '\t']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use fsm_sketch_core::model::Transition;

    use super::*;
    use crate::export::Exporter;

    fn toggle() -> FsmDescription {
        FsmDescription::new()
            .with_state("off", Point::new(10.0, 10.0))
            .with_state("on", Point::new(50.0, 10.0))
            .with_transition(Transition::new("off", "on", "flip"))
            .with_transition(Transition::new("on", "off", "flip"))
    }

    fn elements<'a>(
        doc: &'a roxmltree::Document<'a>,
        tag: &str,
    ) -> Vec<roxmltree::Node<'a, 'a>> {
        doc.descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == tag)
            .collect()
    }

    #[test]
    fn test_render_toggle() {
        let svg = SvgBuilder::new("unused.svg").build();
        let content = svg.render_fsm(&toggle()).unwrap();
        let doc = roxmltree::Document::parse(&content).unwrap();

        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        assert_eq!(root.tag_name().namespace(), Some("http://www.w3.org/2000/svg"));
        assert_eq!(root.attribute("viewBox"), Some("0 0 100 100"));
        assert_eq!(root.attribute("preserveAspectRatio"), Some("xMidYMid meet"));

        let circles = elements(&doc, "circle");
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].attribute("data-state-name"), Some("off"));
        assert_eq!(circles[0].attribute("cx"), Some("10"));
        assert_eq!(circles[0].attribute("r"), Some("2"));

        let labels = elements(&doc, "text");
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].text(), Some("on"));
        assert_eq!(labels[1].attribute("text-anchor"), Some("middle"));

        let paths: Vec<_> = elements(&doc, "path")
            .into_iter()
            .filter(|p| p.attribute("data-from").is_some())
            .collect();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].attribute("d"), Some("M 10 10 Q 30 18 50 10"));
        assert_eq!(paths[1].attribute("d"), Some("M 50 10 Q 30 2 10 10"));
        assert_eq!(paths[0].attribute("marker-end"), Some("url(#arrowhead)"));
        assert_eq!(paths[1].attribute("data-input"), Some("flip"));
    }

    #[test]
    fn test_single_marker_definition() {
        let content = SvgBuilder::new("unused.svg")
            .build()
            .render_fsm(&toggle())
            .unwrap();
        let doc = roxmltree::Document::parse(&content).unwrap();

        let markers = elements(&doc, "marker");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].attribute("id"), Some(ARROWHEAD_ID));
        assert_eq!(markers[0].attribute("orient"), Some("auto-start-reverse"));
        assert_eq!(markers[0].attribute("refX"), Some("-5"));
    }

    #[test]
    fn test_stored_path_wins() {
        let fsm = FsmDescription::new()
            .with_state("A", Point::new(20.0, 50.0))
            .with_state("B", Point::new(80.0, 50.0))
            .with_transition(
                Transition::new("B", "A", "custom").with_path("M 78 50 C 60 30, 40 70, 22 50"),
            );

        let content = SvgBuilder::new("unused.svg").build().render_fsm(&fsm).unwrap();
        let doc = roxmltree::Document::parse(&content).unwrap();
        let path = elements(&doc, "path")
            .into_iter()
            .find(|p| p.attribute("data-from") == Some("B"))
            .unwrap();

        assert_eq!(path.attribute("d"), Some("M 78 50 C 60 30, 40 70, 22 50"));
    }

    #[test]
    fn test_self_loop_uses_configured_radius() {
        let fsm = FsmDescription::new()
            .with_state("s", Point::new(20.0, 40.0))
            .with_transition(Transition::new("s", "s", "again"));

        let svg = SvgBuilder::new("unused.svg")
            .with_synthesizer(CurveSynthesizer::new(0.2, 3.0))
            .build();
        let content = svg.render_fsm(&fsm).unwrap();

        assert!(content.contains("M 20 40 A 3 3 0 1 1 19.9 40"), "{content}");
    }

    #[test]
    fn test_unknown_state() {
        let fsm = FsmDescription::new()
            .with_state("a", Point::new(1.0, 1.0))
            .with_transition(Transition::new("a", "ghost", "go"));

        let err = SvgBuilder::new("unused.svg")
            .build()
            .render_fsm(&fsm)
            .unwrap_err();
        assert!(matches!(err, export::Error::UnknownState { ref state, .. } if state == "ghost"));
    }

    #[test]
    fn test_output_is_indented() {
        let content = SvgBuilder::new("unused.svg")
            .build()
            .render_fsm(&toggle())
            .unwrap();

        let circle = content
            .lines()
            .find(|line| line.trim_start().starts_with("<circle"))
            .unwrap();
        assert!(circle.starts_with("  <circle"), "{circle:?}");

        let marker_path = content
            .lines()
            .find(|line| line.contains("M 0 0 L -10 -5"))
            .unwrap();
        assert!(marker_path.starts_with("      <path"), "{marker_path:?}");
        assert!(content.lines().any(|line| line == "</svg>"));
    }

    #[test]
    fn test_label_text_is_inline() {
        let content = SvgBuilder::new("unused.svg")
            .build()
            .render_fsm(&toggle())
            .unwrap();

        let label = content
            .lines()
            .find(|line| line.trim_start().starts_with("<text"))
            .unwrap();
        assert!(label.starts_with("  <text "), "{label:?}");
        assert!(label.ends_with(">off</text>"), "{label:?}");
    }

    #[test]
    fn test_control_whitespace_in_attributes_survives() {
        let fsm = FsmDescription::new()
            .with_state("two\nlines", Point::new(10.0, 10.0))
            .with_state("tab\there", Point::new(30.0, 10.0))
            .with_state("after", Point::new(50.0, 10.0))
            .with_transition(Transition::new("two\nlines", "after", "a\r\nb"));

        let content = SvgBuilder::new("unused.svg").build().render_fsm(&fsm).unwrap();
        assert!(content.contains("data-state-name=\"two&#10;lines\""), "{content}");
        assert!(content.contains("data-input=\"a&#13;&#10;b\""), "{content}");

        let circle_lines = content
            .lines()
            .filter(|line| line.trim_start().starts_with("<circle"))
            .count();
        assert_eq!(circle_lines, 3);
        assert!(content.lines().any(|line| line == "  <circle cx=\"50\" cy=\"10\" \
            data-state-name=\"after\" fill=\"white\" r=\"2\" stroke=\"black\"/>"));

        let doc = roxmltree::Document::parse(&content).unwrap();
        let names: Vec<_> = elements(&doc, "circle")
            .iter()
            .filter_map(|c| c.attribute("data-state-name"))
            .collect();
        assert_eq!(names, ["two\nlines", "tab\there", "after"]);

        let path = elements(&doc, "path")
            .into_iter()
            .find(|p| p.attribute("data-from").is_some())
            .unwrap();
        assert_eq!(path.attribute("data-input"), Some("a\r\nb"));
    }

    #[test]
    fn test_escape_attribute() {
        assert!(matches!(escape_attribute("plain"), Cow::Borrowed("plain")));
        assert_eq!(
            escape_attribute("<a & \"b\">\t"),
            "&lt;a &amp; &quot;b&quot;&gt;&#9;"
        );
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fsm.svg");
        std::fs::write(&target, "stale").unwrap();

        let svg = SvgBuilder::new(&target).build();
        svg.export_fsm(&toggle()).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.contains("data-state-name=\"off\""));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_render_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fsm.svg");
        std::fs::write(&target, "previous").unwrap();

        let fsm = FsmDescription::new().with_transition(Transition::new("x", "y", "z"));
        assert!(SvgBuilder::new(&target).build().export_fsm(&fsm).is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "previous");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("fsm.svg");

        let err = SvgBuilder::new(&target)
            .build()
            .export_fsm(&toggle())
            .unwrap_err();
        assert!(matches!(err, export::Error::Io(_)));
        assert!(!target.exists());
    }
}
