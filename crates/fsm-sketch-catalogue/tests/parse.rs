//! Integration tests for catalogue loading.

use std::{fs, path::PathBuf};

use proptest::prelude::*;

use fsm_sketch_catalogue::{
    ParseConfig,
    error::{ErrorCode, Stage},
    parse,
};
use fsm_sketch_core::geometry::Point;

fn demo_catalogue() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/examples.ts");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

#[test]
fn test_parse_demo_catalogue() {
    let source = demo_catalogue();
    let catalogue = parse(&source, &ParseConfig::default()).expect("Demo catalogue should parse");

    assert_eq!(
        catalogue.names().collect::<Vec<_>>(),
        [
            "toggle",
            "vending_machine",
            "traffic_light",
            "binary-division",
            "custom_path",
            "turnstile"
        ]
    );

    let vending = catalogue.get("vending_machine").unwrap();
    assert_eq!(vending.state_count(), 8);
    assert_eq!(vending.transitions().len(), 24);
    assert_eq!(vending.initial_state(), Some("0"));
    assert_eq!(vending.outputs().len(), 6);
    assert_eq!(
        vending.transitions()[11].output(),
        ["dispense candy", "change 5"]
    );
    assert_eq!(vending.transitions()[8].output(), ["dispense candy"]);

    let traffic = catalogue.get("traffic_light").unwrap();
    assert_eq!(traffic.state("Yellow"), Some(Point::new(75.0, 50.0)));
    assert_eq!(traffic.inputs()[0].exclusive_group(), Some(0));

    let custom = catalogue.get("custom_path").unwrap();
    assert_eq!(custom.transitions()[0].path(), None);
    assert_eq!(
        custom.transitions()[1].path().map(|p| p.as_str()),
        Some("M 78 50 C 60 30, 40 70, 22 50")
    );

    let turnstile = catalogue.get("turnstile").unwrap();
    assert!(turnstile.transitions()[0].is_self_loop());
}

#[test]
fn test_custom_binding() {
    let source = r#"
        export const examples = { ignored: {} };
        export let drafts = {
            toggle: {
                states: { off: { x: 10, y: 10 }, on: { x: 50, y: 10 } },
                transitions: [{ from: "off", to: "on", input: "flip" }],
            },
        }
    "#;

    let catalogue = parse(source, &ParseConfig::new("drafts")).expect("Should parse drafts");
    assert_eq!(catalogue.names().collect::<Vec<_>>(), ["toggle"]);
}

#[test]
fn test_all_shape_errors_reported() {
    let source = r#"export const examples = {
        a: {
            states: { s: { x: "ten", y: 1 } },
            transitions: [{ from: "s", input: "go" }],
        },
        b: { transitions: [] },
    };"#;

    let err = parse(source, &ParseConfig::default()).unwrap_err();
    assert_eq!(err.stage(), Stage::Shape);
    let codes: Vec<_> = err.diagnostics().iter().map(|d| d.code()).collect();
    assert_eq!(
        codes,
        [
            Some(ErrorCode::E201),
            Some(ErrorCode::E200),
            Some(ErrorCode::E200)
        ]
    );
}

#[test]
fn test_error_spans_point_into_source() {
    let source = "export const examples = { a: { states: {}, transitions: [{ from: \"x\", to: \"x\", input: \"i\" }] } };";

    let err = parse(source, &ParseConfig::default()).unwrap_err();
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E202));

    let span = diagnostic.primary_span().expect("Should carry a span");
    assert_eq!(&source[span.start()..span.end()], "\"x\"");
}

#[test]
fn test_syntax_error_stops_parsing() {
    let err = parse("export const examples = { a: @ };", &ParseConfig::default()).unwrap_err();
    assert_eq!(err.stage(), Stage::Syntax);
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
}

proptest! {
    #[test]
    fn prop_positions_survive_parsing(x in -1000.0f64..1000.0, y in -1000.0f64..1000.0) {
        let source = format!(
            "export const examples = {{ e: {{ states: {{ s: {{ x: {x}, y: {y} }} }}, transitions: [] }} }};"
        );

        let catalogue = parse(&source, &ParseConfig::default()).unwrap();
        prop_assert_eq!(catalogue.get("e").unwrap().state("s"), Some(Point::new(x, y)));
    }

    #[test]
    fn prop_state_names_survive_escaping(name in "[a-z \"'\\\\]{1,12}") {
        let quoted = format!("{name:?}");
        let source = format!(
            "export const examples = {{ e: {{ states: {{ {quoted}: {{ x: 1, y: 2 }} }}, transitions: [] }} }};"
        );

        let catalogue = parse(&source, &ParseConfig::default()).unwrap();
        let fsm = catalogue.get("e").unwrap();
        prop_assert_eq!(fsm.states().map(|(n, _)| n).collect::<Vec<_>>(), vec![name.as_str()]);
    }
}
