//! The FSM data model shared by the loader, emitter, and importer.
//!
//! A [`Catalogue`] maps example names to [`FsmDescription`]s. Each description
//! holds its states in declaration order together with their positions, and
//! an ordered list of [`Transition`]s between them.

use std::fmt;

use indexmap::IndexMap;

use crate::geometry::Point;

/// The position of a state in the 100x100 sketch space.
pub type StatePosition = Point;

/// Opaque SVG path data (`M…L…`, `M…Q…`, `M…A…`, or anything an editor wrote).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurvePath(String);

impl CurvePath {
    /// Wraps path data without interpreting it.
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// Returns the raw path data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path, returning the raw path data.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CurvePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CurvePath {
    fn from(data: String) -> Self {
        Self(data)
    }
}

impl From<&str> for CurvePath {
    fn from(data: &str) -> Self {
        Self(data.to_string())
    }
}

/// A labelled edge between two states.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: String,
    to: String,
    input: String,
    output: Vec<String>,
    path: Option<CurvePath>,
}

impl Transition {
    /// Creates a transition with no output and no stored path.
    pub fn new(from: impl Into<String>, to: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            input: input.into(),
            output: Vec::new(),
            path: None,
        }
    }

    /// Sets an explicitly authored path (builder style).
    pub fn with_path(mut self, path: impl Into<CurvePath>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the outputs emitted when this transition fires (builder style).
    pub fn with_output(mut self, output: Vec<String>) -> Self {
        self.output = output;
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// The stored path, if the catalogue carries one.
    pub fn path(&self) -> Option<&CurvePath> {
        self.path.as_ref()
    }

    /// Returns true when the transition starts and ends in the same state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// The `(from, to, input)` triple that identifies this transition in a sketch.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.from, &self.to, &self.input)
    }
}

/// A named input or output symbol declared by an FSM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    name: String,
    exclusive_group: Option<u32>,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exclusive_group: None,
        }
    }

    /// Places the signal in a mutually exclusive group (builder style).
    pub fn with_exclusive_group(mut self, group: u32) -> Self {
        self.exclusive_group = Some(group);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exclusive_group(&self) -> Option<u32> {
        self.exclusive_group
    }
}

/// A single finite-state machine with its sketch layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FsmDescription {
    states: IndexMap<String, StatePosition>,
    transitions: Vec<Transition>,
    initial_state: Option<String>,
    inputs: Vec<Signal>,
    outputs: Vec<Signal>,
}

impl FsmDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state, replacing the position of an existing state with the same name.
    pub fn with_state(mut self, name: impl Into<String>, position: StatePosition) -> Self {
        self.states.insert(name.into(), position);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn with_initial_state(mut self, name: impl Into<String>) -> Self {
        self.initial_state = Some(name.into());
        self
    }

    pub fn with_input(mut self, signal: Signal) -> Self {
        self.inputs.push(signal);
        self
    }

    pub fn with_output(mut self, signal: Signal) -> Self {
        self.outputs.push(signal);
        self
    }

    /// States in declaration order.
    pub fn states(&self) -> impl Iterator<Item = (&str, StatePosition)> {
        self.states.iter().map(|(name, pos)| (name.as_str(), *pos))
    }

    /// Looks up the position of a state.
    pub fn state(&self, name: &str) -> Option<StatePosition> {
        self.states.get(name).copied()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    pub fn inputs(&self) -> &[Signal] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }
}

/// A named collection of FSM descriptions, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    examples: IndexMap<String, FsmDescription>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an example, returning the description it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        fsm: FsmDescription,
    ) -> Option<FsmDescription> {
        self.examples.insert(name.into(), fsm)
    }

    pub fn get(&self, name: &str) -> Option<&FsmDescription> {
        self.examples.get(name)
    }

    /// Example names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.examples.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FsmDescription)> {
        self.examples.iter().map(|(name, fsm)| (name.as_str(), fsm))
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
