//! Elaboration of the untyped literal into a [`Catalogue`].
//!
//! Shape errors do not stop elaboration: every problem is collected so a
//! single run reports all of them.

use indexmap::IndexMap;
use log::debug;

use fsm_sketch_core::{
    geometry::Point,
    model::{Catalogue, FsmDescription, Signal, Transition},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    parser_types::{Value, ValueKind},
    span::Span,
};

/// The entries of an object literal, keyed by name, with duplicates reported.
struct Fields<'v> {
    span: Span,
    what: String,
    entries: IndexMap<&'v str, (Span, &'v Value)>,
}

impl<'v> Fields<'v> {
    fn get(&self, name: &str) -> Option<&'v Value> {
        self.entries
            .get(name)
            .map(|(_, value)| *value)
            .filter(|value| value.kind != ValueKind::Null)
    }
}

/// Turns literal values into model types, collecting diagnostics.
#[derive(Default)]
pub(crate) struct Builder {
    diagnostics: Vec<Diagnostic>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Elaborate the catalogue root.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] holding every shape error found.
    pub(crate) fn build(mut self, root: &Value) -> Result<Catalogue, ParseError> {
        let mut catalogue = Catalogue::new();

        if let Some(examples) = self.fields(root, "catalogue") {
            for (name, (_, value)) in &examples.entries {
                if let Some(fsm) = self.fsm(name, value) {
                    catalogue.insert(*name, fsm);
                }
            }
        }

        if self.diagnostics.is_empty() {
            debug!(examples = catalogue.len(); "Catalogue elaborated");
            Ok(catalogue)
        } else {
            Err(ParseError::shape(self.diagnostics))
        }
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn type_mismatch(&mut self, value: &Value, expected: &str, what: &str) {
        self.emit(
            Diagnostic::error(format!(
                "{what} must be {expected}, found {}",
                value.type_name()
            ))
            .with_code(ErrorCode::E201)
            .with_label(value.span, format!("expected {expected}")),
        );
    }

    /// Index an object's entries, reporting non-objects and duplicate keys.
    fn fields<'v>(&mut self, value: &'v Value, what: &str) -> Option<Fields<'v>> {
        let ValueKind::Object(raw) = &value.kind else {
            self.type_mismatch(value, "an object", what);
            return None;
        };

        let mut entries: IndexMap<&'v str, (Span, &'v Value)> = IndexMap::new();
        for (key, entry) in raw {
            if let Some((first, _)) = entries.get(key.inner().as_str()) {
                let first = *first;
                self.emit(
                    Diagnostic::error(format!("duplicate key `{}` in {what}", key.inner()))
                        .with_code(ErrorCode::E203)
                        .with_label(key.span(), ErrorCode::E203.description())
                        .with_secondary_label(first, "first defined here")
                        .with_help("remove one of the entries"),
                );
                continue;
            }
            entries.insert(key.inner().as_str(), (key.span(), entry));
        }

        Some(Fields {
            span: value.span,
            what: what.to_string(),
            entries,
        })
    }

    fn required<'v>(&mut self, fields: &Fields<'v>, name: &str) -> Option<&'v Value> {
        let value = fields.get(name);
        if value.is_none() {
            self.emit(
                Diagnostic::error(format!("{} is missing field `{name}`", fields.what))
                    .with_code(ErrorCode::E200)
                    .with_label(fields.span, format!("`{name}` is required here")),
            );
        }
        value
    }

    fn string(&mut self, value: &Value, what: &str) -> Option<String> {
        match &value.kind {
            ValueKind::String(s) => Some(s.clone()),
            _ => {
                self.type_mismatch(value, "a string", what);
                None
            }
        }
    }

    fn number(&mut self, value: &Value, what: &str) -> Option<f64> {
        match value.kind {
            ValueKind::Number(n) => Some(n),
            _ => {
                self.type_mismatch(value, "a number", what);
                None
            }
        }
    }

    fn array<'v>(&mut self, value: &'v Value, what: &str) -> Option<&'v [Value]> {
        match &value.kind {
            ValueKind::Array(items) => Some(items),
            _ => {
                self.type_mismatch(value, "an array", what);
                None
            }
        }
    }

    fn ignore_unknown(fields: &Fields<'_>, known: &[&str]) {
        for name in fields.entries.keys().filter(|name| !known.contains(name)) {
            debug!(field = name, owner = fields.what; "Ignoring unknown field");
        }
    }

    fn fsm(&mut self, name: &str, value: &Value) -> Option<FsmDescription> {
        let fields = self.fields(value, &format!("example `{name}`"))?;
        Self::ignore_unknown(
            &fields,
            &["states", "transitions", "initialState", "inputs", "outputs"],
        );

        let states = self.required(&fields, "states");
        let transitions = self.required(&fields, "transitions");

        let mut fsm = FsmDescription::new();
        let mut states_ok = false;
        if let Some(states) = states.and_then(|v| self.fields(v, "`states`")) {
            states_ok = true;
            for (state, (_, position)) in &states.entries {
                match self.position(state, position) {
                    Some(point) => fsm = fsm.with_state(*state, point),
                    None => states_ok = false,
                }
            }
        }

        if let Some(items) = transitions.and_then(|v| self.array(v, "`transitions`")) {
            for item in items {
                if let Some(transition) = self.transition(item, &fsm, states_ok) {
                    fsm = fsm.with_transition(transition);
                }
            }
        }

        if let Some(initial) = fields.get("initialState") {
            if let Some(state) = self.string(initial, "`initialState`") {
                if states_ok {
                    self.check_state(&fsm, &state, initial.span);
                }
                fsm = fsm.with_initial_state(state);
            }
        }

        for signal in self.signals(&fields, "inputs") {
            fsm = fsm.with_input(signal);
        }
        for signal in self.signals(&fields, "outputs") {
            fsm = fsm.with_output(signal);
        }

        Some(fsm)
    }

    fn position(&mut self, state: &str, value: &Value) -> Option<Point> {
        let fields = self.fields(value, &format!("state `{state}`"))?;
        Self::ignore_unknown(&fields, &["x", "y"]);

        let x = self.required(&fields, "x");
        let y = self.required(&fields, "y");
        let x = x.and_then(|v| self.number(v, "`x`"));
        let y = y.and_then(|v| self.number(v, "`y`"));

        Some(Point::new(x?, y?))
    }

    fn check_state(&mut self, fsm: &FsmDescription, state: &str, span: Span) {
        if fsm.state(state).is_none() {
            self.emit(
                Diagnostic::error(format!("unknown state `{state}`"))
                    .with_code(ErrorCode::E202)
                    .with_label(span, "no such state")
                    .with_help(format!("declare `{state}` under `states` or fix the name")),
            );
        }
    }

    fn transition(
        &mut self,
        value: &Value,
        fsm: &FsmDescription,
        check_states: bool,
    ) -> Option<Transition> {
        let fields = self.fields(value, "transition")?;
        Self::ignore_unknown(&fields, &["from", "to", "input", "output", "path"]);

        let from = self.required(&fields, "from");
        let to = self.required(&fields, "to");
        let input = self.required(&fields, "input");

        let from_name = from.and_then(|v| self.string(v, "`from`"));
        let to_name = to.and_then(|v| self.string(v, "`to`"));
        let input = input.and_then(|v| self.string(v, "`input`"));

        if check_states {
            if let (Some(name), Some(value)) = (&from_name, from) {
                self.check_state(fsm, name, value.span);
            }
            if let (Some(name), Some(value)) = (&to_name, to) {
                self.check_state(fsm, name, value.span);
            }
        }

        let output = match fields.get("output") {
            Some(value) => self.output(value)?,
            None => Vec::new(),
        };
        let path = match fields.get("path") {
            Some(value) => Some(self.string(value, "`path`")?),
            None => None,
        };

        let mut transition = Transition::new(from_name?, to_name?, input?).with_output(output);
        if let Some(path) = path {
            transition = transition.with_path(path);
        }
        Some(transition)
    }

    /// `output` is either a single string or an array of strings.
    fn output(&mut self, value: &Value) -> Option<Vec<String>> {
        match &value.kind {
            ValueKind::String(s) => Some(vec![s.clone()]),
            ValueKind::Array(items) => items
                .iter()
                .map(|item| self.string(item, "`output` entry"))
                .collect::<Vec<_>>()
                .into_iter()
                .collect(),
            _ => {
                self.type_mismatch(value, "a string or an array of strings", "`output`");
                None
            }
        }
    }

    fn signals(&mut self, fields: &Fields<'_>, name: &str) -> Vec<Signal> {
        let Some(items) = fields.get(name).and_then(|v| self.array(v, &format!("`{name}`"))) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| self.signal(item, name))
            .collect()
    }

    fn signal(&mut self, value: &Value, list: &str) -> Option<Signal> {
        let fields = self.fields(value, &format!("`{list}` entry"))?;
        Self::ignore_unknown(&fields, &["name", "exclusiveGroup"]);

        let name = self.required(&fields, "name");
        let name = name.and_then(|v| self.string(v, "`name`"))?;
        let mut signal = Signal::new(name);

        if let Some(group) = fields.get("exclusiveGroup") {
            let number = self.number(group, "`exclusiveGroup`")?;
            if number.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&number) {
                self.type_mismatch(group, "a non-negative integer", "`exclusiveGroup`");
                return None;
            }
            signal = signal.with_exclusive_group(number as u32);
        }

        Some(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declaration;

    fn build(literal: &str) -> Result<Catalogue, ParseError> {
        let source = format!("export const examples = {literal};");
        let value = parse_declaration(&source, "examples").expect("literal should parse");
        Builder::new().build(&value)
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_full_example() {
        let catalogue = build(
            r#"{
                custom: {
                    states: { A: { x: 20, y: 50 }, B: { x: 80, y: 50 } },
                    transitions: [
                        { from: "A", to: "B", input: "auto", output: "beep" },
                        { from: "B", to: "A", input: "custom", output: ["x", "y"], path: "M 78 50 C 60 30, 40 70, 22 50" },
                    ],
                    initialState: "A",
                    inputs: [{ name: "auto" }, { name: "custom", exclusiveGroup: 0 }],
                    outputs: [{ name: "beep" }],
                },
            }"#,
        )
        .expect("catalogue should elaborate");

        let fsm = catalogue.get("custom").unwrap();
        assert_eq!(fsm.state("B"), Some(Point::new(80.0, 50.0)));
        assert_eq!(fsm.transitions().len(), 2);
        assert_eq!(fsm.transitions()[0].output(), ["beep"]);
        assert_eq!(fsm.transitions()[1].output(), ["x", "y"]);
        assert_eq!(
            fsm.transitions()[1].path().map(|p| p.as_str()),
            Some("M 78 50 C 60 30, 40 70, 22 50")
        );
        assert_eq!(fsm.initial_state(), Some("A"));
        assert_eq!(fsm.inputs()[1].exclusive_group(), Some(0));
        assert_eq!(fsm.outputs().len(), 1);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let catalogue = build(
            r#"{ e: { states: { A: { x: 1, y: 2, color: "red" } }, transitions: [], notes: "hi" } }"#,
        )
        .expect("unknown fields should be ignored");
        assert_eq!(catalogue.get("e").unwrap().state("A"), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_missing_required_fields() {
        let err = build(r#"{ e: { states: { A: { x: 1 } } } }"#).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E200, ErrorCode::E200]);
    }

    #[test]
    fn test_wrong_types_are_all_reported() {
        let err = build(
            r#"{ e: { states: { A: { x: "1", y: 2 } }, transitions: [{ from: "A", to: 3, input: "i" }] } }"#,
        )
        .unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E201, ErrorCode::E201]);
    }

    #[test]
    fn test_unknown_state_reference() {
        let source = r#"{ e: { states: { A: { x: 1, y: 1 } }, transitions: [{ from: "A", to: "Z", input: "i" }], initialState: "Q" } }"#;
        let err = build(source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E202, ErrorCode::E202]);
        assert!(err.diagnostics()[0].message().contains("`Z`"));
        assert!(err.diagnostics()[1].message().contains("`Q`"));
    }

    #[test]
    fn test_duplicate_keys() {
        let literal = r#"{ e: { states: { A: { x: 1, y: 1 }, "A": { x: 2, y: 2 } }, transitions: [] } }"#;
        let err = build(literal).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E203]);
        assert_eq!(err.diagnostics()[0].labels().len(), 2);
    }

    #[test]
    fn test_invalid_exclusive_group() {
        let err = build(
            r#"{ e: { states: {}, transitions: [], inputs: [{ name: "a", exclusiveGroup: 1.5 }] } }"#,
        )
        .unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E201]);
    }

    #[test]
    fn test_root_must_be_object() {
        let err = build("[1, 2]").unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E201]);
    }

    #[test]
    fn test_null_optional_fields() {
        let catalogue = build(
            r#"{ e: { states: { A: { x: 0, y: 0 } }, transitions: [{ from: "A", to: "A", input: "i", path: null }], initialState: null } }"#,
        )
        .unwrap();
        let fsm = catalogue.get("e").unwrap();
        assert!(fsm.transitions()[0].path().is_none());
        assert!(fsm.initial_state().is_none());
    }
}
