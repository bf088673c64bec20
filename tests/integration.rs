use predicates::prelude::*;
use serde_json::{json, Value};
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_optinspect")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn options_json(args: &[&str]) -> Value {
    let assert = cmd().arg("options").args(args).assert().success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

fn option_names(report: &Value) -> Vec<&str> {
    report["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect()
}

// -- options --

#[test]
fn options_from_descriptor_file() {
    let reports = options_json(&[&fixture_path("base_function.json")]);
    let report = &reports[0];
    assert_eq!(report["function"], "_f");
    assert_eq!(option_names(report), vec!["b", "c", "d", "e"]);

    assert_eq!(
        report["options"][0],
        json!({
            "name": "b",
            "opts": ["--b"],
            "secondary_opts": [],
            "help": "This one should be added.",
            "required": false,
            "default": 1,
            "type": "int",
        })
    );
    assert_eq!(report["options"][1]["required"], true);
    assert_eq!(report["options"][3]["secondary_opts"], json!(["--no-e"]));
    assert_eq!(report["options"][3]["is_flag"], true);
    assert_eq!(report["warnings"], json!([]));
}

#[test]
fn options_from_stdin() {
    let input = std::fs::read_to_string(fixture_path("display_data.json")).unwrap();
    let assert = cmd().arg("options").write_stdin(input).assert().success();
    let reports: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    let report = &reports[0];
    assert_eq!(option_names(report), vec!["size", "symbol", "empty"]);
    assert_eq!(report["options"][0]["help"], "Size of the grid in both dimensions.");
    assert_eq!(report["options"][0]["type"], "int");
    assert_eq!(report["options"][2]["default"], " ");
}

#[test]
fn include_and_exclude_flags_extend_the_policy() {
    let path = fixture_path("base_function.json");
    let reports = options_json(&[&path, "--exclude", "b", "--exclude", "c"]);
    assert_eq!(option_names(&reports[0]), vec!["d", "e"]);

    let reports = options_json(&[&path, "--include", "a", "--include", "b"]);
    assert_eq!(option_names(&reports[0]), vec!["a", "b"]);
    assert_eq!(reports[0]["options"][0]["type"], "str");
}

#[test]
fn directory_input_yields_one_report_per_descriptor() {
    let dir = TempDir::new().unwrap();
    for name in ["base_function.json", "display_data.json"] {
        std::fs::copy(fixture_path(name), dir.path().join(name)).unwrap();
    }
    let reports = options_json(&[dir.path().to_str().unwrap()]);
    let functions: Vec<&str> = reports
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["function"].as_str().unwrap())
        .collect();
    assert_eq!(functions, vec!["_f", "display_data"]);
}

#[test]
fn missing_type_is_a_warning() {
    cmd()
        .args(["options", &fixture_path("untyped.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No type hint for parameter 'a'"))
        .stderr(predicate::str::contains("No type hint for parameter 'a'"));
}

#[test]
fn quiet_suppresses_warnings() {
    cmd()
        .args(["-q", "options", &fixture_path("untyped.json")])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn unknown_docstring_type_fails() {
    cmd()
        .args(["options", &fixture_path("unknown_type.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "UnknownType (only builtin types are supported)",
        ));
}

#[test]
fn excluding_the_unknown_parameter_succeeds() {
    let reports = options_json(&[&fixture_path("unknown_type.json"), "--exclude", "x"]);
    assert_eq!(reports[0]["options"], json!([]));
}

#[test]
fn help_format_renders_clap_help() {
    cmd()
        .args(["options", "-f", "help", &fixture_path("base_function.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("--c <c>"))
        .stdout(predicate::str::contains("--no-e"))
        .stdout(predicate::str::contains("And so should this one."));
}

#[test]
fn help_format_with_colliding_switches() {
    let descriptor = json!({
        "name": "serve",
        "parameters": [
            {"name": "host", "kind": "keyword_only", "annotation": "str"},
            {"name": "help", "kind": "keyword_only", "default": "none"},
            {"name": "e", "kind": "keyword_only", "default": true, "annotation": "bool"},
            {"name": "no_e", "kind": "keyword_only", "default": 0},
        ],
        "names": {"host": ["-h", "--host"]},
    });
    cmd()
        .args(["options", "-f", "help"])
        .write_stdin(descriptor.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("-h, --host <host>"))
        .stdout(predicate::str::contains("--help <help>"))
        .stdout(predicate::str::contains("--no-e <no_e>"));
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["options", "-f", "yaml", &fixture_path("base_function.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: yaml"));
}

#[test]
fn malformed_descriptor_fails() {
    cmd()
        .arg("options")
        .write_stdin("{\"parameters\": []}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load descriptor <stdin>"));
}

// -- docstring --

#[test]
fn docstring_table_from_file() {
    let assert = cmd()
        .args(["docstring", &fixture_path("rest_docstring.txt")])
        .assert()
        .success();
    let table: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(
        table,
        json!({
            "baz": {"help": "This is baz.", "type": ["float", "str"]},
            "foo": {"help": "This is foo.", "type": ["int"]},
        })
    );
}

#[test]
fn unsupported_docstring_fails_with_excerpt() {
    cmd()
        .arg("docstring")
        .write_stdin("This docstring contains no parameters")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "UnsupportedStyle: This docstring contains no parameters",
        ));
}
