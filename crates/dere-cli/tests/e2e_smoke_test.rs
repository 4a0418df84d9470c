use std::{fs, path::Path};

use tempfile::{TempDir, tempdir};

use dere::DereError;
use dere_cli::{Args, OutputFormat, error_adapter::to_reportables, load_and_render, run};

const SCHEMA: &str = r#"
[[span]]
name = "Protein"

[[frame]]
name = "Binding"

[[frame.slot]]
name = "Theme"
types = ["Protein"]

[[frame]]
name = "Positive_regulation"

[[frame.slot]]
name = "Theme"
types = ["Protein", "Binding"]

[[frame.slot]]
name = "Cause"
types = ["Protein"]
"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write fixture");
}

/// A schema file and a two-document corpus directory.
fn fixture() -> TempDir {
    let dir = tempdir().expect("Failed to create temp directory");
    write(dir.path(), "schema.toml", SCHEMA);

    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();

    write(&corpus, "PMID-1.txt", "p50 binds p65.\nIL-2 induces it.\n");
    write(
        &corpus,
        "PMID-1.a1",
        "T1\tProtein 0 3\tp50\nT2\tProtein 10 13\tp65\nT3\tProtein 15 19\tIL-2\n",
    );
    write(
        &corpus,
        "PMID-1.a2",
        "T4\tBinding 4 9\tbinds\nE1\tBinding:T4 Theme:T1 Theme2:T2\nE2\tPositive_regulation:T4 Theme:E1 Cause:T3\n",
    );

    write(&corpus, "PMID-2.txt", "No events here.\n");
    write(&corpus, "PMID-2.a1", "");

    dir
}

fn args(dir: &Path, format: OutputFormat) -> Args {
    Args {
        corpus: dir.join("corpus").to_string_lossy().to_string(),
        schema: dir.join("schema.toml").to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        format,
    }
}

#[test]
fn e2e_smoke_test_summary() {
    let dir = fixture();

    let output = load_and_render(&args(dir.path(), OutputFormat::Text)).unwrap();
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines[0], "documents     2");
    assert_eq!(lines[1], "instances     3");
    assert_eq!(lines[2], "spans         3");
    assert_eq!(lines[3], "frames        2");
    // The regulation is reached from both lines through its fillers.
    assert_eq!(lines[4], "shared frames 1");
    // T4 is a trigger of a frame type, and Theme2 is not a Binding slot.
    assert_eq!(lines[5], "skipped       2");

    assert!(run(&args(dir.path(), OutputFormat::Text)).is_ok());
}

#[test]
fn e2e_smoke_test_tsv() {
    let dir = fixture();

    let output = load_and_render(&args(dir.path(), OutputFormat::Tsv)).unwrap();

    assert_eq!(
        output,
        "doc_id\tinstance\tspans\tframes\n\
         PMID-1\t0\t2\t2\n\
         PMID-1\t1\t1\t1\n\
         PMID-2\t0\t0\t0\n"
    );
}

#[test]
fn e2e_smoke_test_config_file() {
    let dir = fixture();
    let corpus = dir.path().join("corpus");
    for id in ["PMID-1", "PMID-2"] {
        fs::rename(corpus.join(format!("{id}.txt")), corpus.join(format!("{id}.text"))).unwrap();
    }
    write(
        dir.path(),
        "config.toml",
        "[reader]\ntext_extension = \"text\"\nparallel = false\nclosure = \"fixpoint\"\n",
    );

    let mut args = args(dir.path(), OutputFormat::Text);
    let without_config = load_and_render(&args).unwrap_err();
    assert!(matches!(without_config, DereError::MissingText { .. }));

    args.config = Some(dir.path().join("config.toml").to_string_lossy().to_string());
    let output = load_and_render(&args).unwrap();
    assert!(output.starts_with("documents     2\n"));
}

#[test]
fn e2e_smoke_test_errors_render_against_annotation_file() {
    let dir = fixture();
    write(
        &dir.path().join("corpus"),
        "PMID-2.a1",
        "T1\tProtein 0 2\tNo\nT1\tProtein 3 9\tevents\n",
    );

    let err = load_and_render(&args(dir.path(), OutputFormat::Text)).unwrap_err();
    assert!(matches!(err, DereError::Parse { ref doc_id, .. } if doc_id == "PMID-2"));

    let reportables = to_reportables(&err);
    assert_eq!(reportables.len(), 1);

    let reporter =
        miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut rendered = String::new();
    reporter
        .render_report(&mut rendered, &reportables[0])
        .unwrap();
    assert!(rendered.contains("E100"));
    assert!(rendered.contains("first defined here"));
}

#[test]
fn e2e_smoke_test_missing_schema() {
    let dir = fixture();
    let mut args = args(dir.path(), OutputFormat::Text);
    args.schema = dir.path().join("absent.toml").to_string_lossy().to_string();

    assert!(matches!(run(&args), Err(DereError::Io { .. })));
}
