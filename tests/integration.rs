use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_go-annotation")));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn json_output(assert: &assert_cmd::assert::Assert) -> serde_json::Value {
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_json() {
    let input = std::fs::read_to_string(fixture_path("mapmode/single_interface.go")).unwrap();

    let assert = cmd().args(["-m", "map"]).write_stdin(input).assert().success();
    let json = json_output(&assert);
    assert_eq!(json["file_name"], "<stdin>");
    assert_eq!(json["declared_namespace"], "mapmode");
    let store = &json["interface_declarations"][0];
    assert_eq!(store["name"], "OrderStore");
    assert_eq!(
        store["annotations"]["repository"]["attributes"][0]["table"],
        "orders"
    );
}

#[test]
fn stdin_mode_markdown() {
    let input = std::fs::read_to_string(fixture_path("arraymode/single_struct.go")).unwrap();

    cmd()
        .args(["-f", "markdown"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("## struct OrderService"))
        .stdout(predicate::str::contains(
            "Create(req *model.CreateOrder, user *model.User, meta *model.Meta) error",
        ))
        .stdout(predicate::str::contains("* `@route(0=\"POST\", 1=\"/orders\")`"));
}

#[test]
fn stdin_mode_nothing_to_describe() {
    cmd()
        .write_stdin("package main\n\nfunc main() {}\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn stdin_mode_syntax_error() {
    cmd()
        .write_stdin("package main\n\ntype T struct {\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse stdin"))
        .stderr(predicate::str::contains("unexpected end of file"));
}

#[test]
fn malformed_annotation_is_warned_about() {
    let input = std::fs::read_to_string(fixture_path("mapmode/mult.go")).unwrap();

    cmd()
        .args(["-m", "map"])
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("dropping annotation"));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["--no-module", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("arraymode/single_struct.go"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("single_struct.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["record_declarations"][0]["name"], "OrderService");
    assert_eq!(json["fully_qualified_namespace"], "");
}

#[test]
fn file_mode_walks_directories() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["--no-module", "-f", "md", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("arraymode"))
        .assert()
        .success();

    assert!(dir.path().join("mult.md").exists());
    assert!(dir.path().join("single_interface.md").exists());
    assert!(dir.path().join("single_struct.md").exists());
}

#[test]
fn same_named_files_in_different_packages_do_not_collide() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    for package in ["a", "b"] {
        let dir = src.path().join(package);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("svc.go"),
            format!("package {package}\n\ntype Svc interface {{\n\tPing() error\n}}\n"),
        )
        .unwrap();
    }

    cmd()
        .args(["--no-module", "-o", out.path().to_str().unwrap()])
        .arg(src.path().to_str().unwrap())
        .assert()
        .success();

    for package in ["a", "b"] {
        let output = std::fs::read_to_string(out.path().join(package).join("svc.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["declared_namespace"], package);
    }
    assert!(!out.path().join("svc.json").exists());
}

#[test]
fn file_mode_without_output_prints_array() {
    let assert = cmd()
        .args(["--no-module", "-m", "map"])
        .arg(fixture_path("mapmode/single_struct.go"))
        .arg(fixture_path("mapmode/single_interface.go"))
        .assert()
        .success();
    let json = json_output(&assert);
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["file_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["single_interface.go", "single_struct.go"]);
}

#[test]
fn file_mode_with_prefix() {
    let dir = TempDir::new().unwrap();
    let mut prefix = NamedTempFile::new().unwrap();
    writeln!(prefix, "<!-- generated from ${{name}} in package ${{package}} -->").unwrap();

    cmd()
        .args(["--no-module", "-f", "markdown"])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-p", prefix.path().to_str().unwrap()])
        .arg(fixture_path("arraymode/single_interface.go"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("single_interface.md")).unwrap();
    assert!(output.starts_with(
        "<!-- generated from single_interface in package arraymode -->\n\n# single_interface.go"
    ));
}

#[test]
fn file_mode_from_config() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("gen");
    let config = dir.path().join("go-annotation.yaml");
    std::fs::write(
        &config,
        format!(
            "servicePath: {}\ngenFilePath: {}\nannotationMode: map\n",
            fixture_path("mapmode"),
            out.display()
        ),
    )
    .unwrap();

    cmd()
        .args(["--no-module", "-c", config.to_str().unwrap()])
        .assert()
        .success();

    let output = std::fs::read_to_string(out.join("mult.json")).unwrap();
    assert!(output.contains("\"isolation\": \"serializable\""));
}

#[test]
fn file_mode_stops_at_broken_file() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.go");
    std::fs::write(&broken, "package x\nfunc (\n").unwrap();

    cmd()
        .arg("--no-module")
        .arg(broken.to_str().unwrap())
        .arg(fixture_path("arraymode/single_struct.go"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"))
        .stderr(predicate::str::contains("broken.go"));
}

#[test]
fn keep_going_skips_broken_file() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.go");
    std::fs::write(&broken, "package x\nfunc (\n").unwrap();

    let assert = cmd()
        .args(["--no-module", "--keep-going"])
        .arg(broken.to_str().unwrap())
        .arg(fixture_path("arraymode/single_struct.go"))
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping"));
    let json = json_output(&assert);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["-f", "html"])
        .write_stdin("package x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn missing_config_fails() {
    cmd()
        .args(["-c", "/nonexistent/go-annotation.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
