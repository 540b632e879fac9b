use std::{fs, path::PathBuf, process};

use tempfile::tempdir;

use fsm_sketch::FsmSketchError;
use fsm_sketch_cli::{Args, Command, run_with_output};

/// The demo catalogue at the workspace root
fn demo_catalogue() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
        .join("examples.ts")
}

fn args(command: Command) -> Args {
    Args {
        config: None,
        log_level: "off".to_string(),
        command: Some(command),
    }
}

/// Runs `args`, returning what was printed.
fn run_captured(args: &Args) -> Result<String, FsmSketchError> {
    let mut out = Vec::new();
    run_with_output(args, &mut out)?;
    Ok(String::from_utf8(out).expect("Output should be UTF-8"))
}

fn list_examples() -> Vec<String> {
    let listing = run_captured(&args(Command::List {
        catalogue: Some(demo_catalogue().to_string_lossy().to_string()),
    }))
    .expect("Listing the demo catalogue should succeed");

    listing.lines().map(str::to_string).collect()
}

#[test]
fn e2e_smoke_test_demo_examples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let catalogue = demo_catalogue().to_string_lossy().to_string();

    let examples = list_examples();
    assert!(!examples.is_empty(), "No examples found in demos/examples.ts");

    let mut failed_examples = Vec::new();

    for name in &examples {
        let output_path = temp_dir.path().join(format!("{name}.svg"));
        let output = output_path.to_string_lossy().to_string();

        let generated = run_captured(&args(Command::Generate {
            example_name: name.clone(),
            catalogue: Some(catalogue.clone()),
            output: Some(output.clone()),
        }));
        let message = match generated {
            Ok(message) => message,
            Err(e) => {
                failed_examples.push((name.clone(), e));
                continue;
            }
        };
        assert_eq!(
            message.trim_end(),
            format!("Successfully generated {output} for example '{name}'.")
        );

        match run_captured(&args(Command::Import {
            svg_file: output.clone(),
        })) {
            Ok(report) => assert!(
                report.contains("// Updated states:"),
                "Import of {name} found no states:\n{report}"
            ),
            Err(e) => failed_examples.push((name.clone(), e)),
        }
    }

    if !failed_examples.is_empty() {
        eprintln!("\nExamples that failed:");
        for (name, err) in &failed_examples {
            eprintln!("  - {name}: {err}");
        }
        panic!("{} example(s) failed unexpectedly", failed_examples.len());
    }
}

#[test]
fn e2e_generate_missing_example() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("fsm.svg");

    let result = run_captured(&args(Command::Generate {
        example_name: "missing_example".to_string(),
        catalogue: Some(demo_catalogue().to_string_lossy().to_string()),
        output: Some(output.to_string_lossy().to_string()),
    }));

    match result {
        Err(err @ FsmSketchError::ExampleNotFound { .. }) => assert!(!err.is_fatal()),
        other => panic!("Expected ExampleNotFound, got {other:?}"),
    }
    assert!(!output.exists(), "No file may be written for a missing example");
}

/// Runs the `fsm-sketch` binary inside `dir`.
fn run_binary(dir: &std::path::Path, args: &[&str]) -> process::Output {
    process::Command::new(env!("CARGO_BIN_EXE_fsm-sketch"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run fsm-sketch")
}

#[test]
fn e2e_exit_status_separates_missing_example_from_aborts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let catalogue = demo_catalogue().to_string_lossy().to_string();
    let output = temp_dir.path().join("fsm.svg");
    let output_arg = output.to_string_lossy().to_string();

    let not_found = run_binary(
        temp_dir.path(),
        &[
            "generate",
            "missing_example",
            "--catalogue",
            &catalogue,
            "-o",
            &output_arg,
        ],
    );
    assert!(not_found.status.success(), "{not_found:?}");
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&not_found.stderr);
    assert!(stderr.contains("not found"), "{stderr}");

    let missing_svg = run_binary(temp_dir.path(), &["import", "missing.svg"]);
    assert_eq!(missing_svg.status.code(), Some(1));

    let missing_catalogue = run_binary(
        temp_dir.path(),
        &["generate", "toggle", "--catalogue", "missing.ts"],
    );
    assert_eq!(missing_catalogue.status.code(), Some(1));
}

#[test]
fn e2e_import_without_tagged_elements() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let svg_path = temp_dir.path().join("plain.svg");
    fs::write(
        &svg_path,
        r#"<svg xmlns="http://www.w3.org/2000/svg"><circle cx="1" cy="1" r="1"/></svg>"#,
    )
    .unwrap();

    let report = run_captured(&args(Command::Import {
        svg_file: svg_path.to_string_lossy().to_string(),
    }))
    .expect("Empty import should succeed");

    assert_eq!(
        report.trim_end(),
        "No states or paths with data attributes found in the SVG."
    );
}

#[test]
fn e2e_import_errors() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.svg");
    let malformed = temp_dir.path().join("malformed.svg");
    fs::write(&malformed, "<svg><circle></svg>").unwrap();

    let result = run_captured(&args(Command::Import {
        svg_file: missing.to_string_lossy().to_string(),
    }));
    assert!(matches!(result, Err(FsmSketchError::FileNotFound(_))));

    let result = run_captured(&args(Command::Import {
        svg_file: malformed.to_string_lossy().to_string(),
    }));
    assert!(matches!(result, Err(FsmSketchError::SvgParse { .. })));
}

#[test]
fn e2e_broken_catalogue() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let catalogue = temp_dir.path().join("examples.ts");
    fs::write(
        &catalogue,
        "export const examples = { a: { states: {}, transitions: [{ from: 'x' }] } };",
    )
    .unwrap();

    let result = run_captured(&args(Command::List {
        catalogue: Some(catalogue.to_string_lossy().to_string()),
    }));

    match result {
        Err(FsmSketchError::Catalogue { err, .. }) => assert!(err.diagnostics().len() >= 2),
        other => panic!("Expected a catalogue error, got {other:?}"),
    }
}

#[test]
fn e2e_config_file_sets_paths() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("from-config.svg");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[catalogue]\npath = {:?}\n\n[output]\npath = {:?}\n",
            demo_catalogue().to_string_lossy(),
            output.to_string_lossy()
        ),
    )
    .unwrap();

    let args = Args {
        config: Some(config_path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        command: Some(Command::Generate {
            example_name: "toggle".to_string(),
            catalogue: None,
            output: None,
        }),
    };
    run_captured(&args).expect("Generate with config file should succeed");

    assert!(output.exists());
}

#[test]
fn e2e_no_command_prints_help() {
    let args = Args {
        config: None,
        log_level: "off".to_string(),
        command: None,
    };

    let help = run_captured(&args).expect("Help should render");
    assert!(help.contains("generate"));
    assert!(help.contains("import"));
}
