// Regression tests for the entrydoc binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value;

const DEMO_JSON: &str = r#"{
  "kind": "Project",
  "name": "demo",
  "children": [
    {
      "kind": "Scene",
      "name": "s1",
      "children": [
        {
          "kind": "Object",
          "name": "bot",
          "width": 100,
          "height": 100,
          "children": [
            { "kind": "Picture", "name": "p1", "fileurl": "/media/bot.png", "selected": true },
            {
              "kind": "Statement",
              "children": [
                { "kind": "Script", "type": "when_run_button_click" },
                {
                  "kind": "Script",
                  "type": "repeat_basic",
                  "children": [
                    { "kind": "Param", "value": 5 },
                    { "kind": "Statement" }
                  ]
                }
              ]
            }
          ]
        }
      ]
    }
  ]
}"#;

const DEMO_YAML: &str = "
kind: Project
name: demo
children:
  - kind: Scene
    name: s1
    children:
      - kind: Object
        name: bot
";

const STRAY_SCENE: &str = r#"{ "kind": "Scene", "name": "stray" }"#;

/// Writes `contents` to a scratch file under tests/ and removes it on drop.
struct Scratch(&'static str);

impl Scratch {
    fn new(path: &'static str, contents: &str) -> Self {
        fs::write(path, contents).unwrap();
        Scratch(path)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_file(self.0);
    }
}

#[test]
fn cli_compiles_json_tree() {
    let input = Scratch::new("tests/cli_compile_demo.json", DEMO_JSON);

    let mut cmd = Command::cargo_bin("entrydoc").unwrap();
    let assert = cmd
        .arg("compile")
        .arg(input.0)
        .arg("--seed")
        .arg("7")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let document: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(document["name"], "demo");
    assert_eq!(document["objects"][0]["name"], "bot");
    let script: Value =
        serde_json::from_str(document["objects"][0]["script"].as_str().unwrap()).unwrap();
    assert_eq!(script[0][1]["type"], "repeat_basic");
    assert_eq!(script[0][1]["params"][0], 5);
}

#[test]
fn cli_seeded_output_is_stable() {
    let input = Scratch::new("tests/cli_seeded_demo.json", DEMO_JSON);

    let run = || {
        let mut cmd = Command::cargo_bin("entrydoc").unwrap();
        let output = cmd
            .args(["compile", input.0, "--seed", "99"])
            .output()
            .unwrap();
        assert!(output.status.success());
        output.stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn cli_writes_output_file() {
    let input = Scratch::new("tests/cli_output_demo.yaml", DEMO_YAML);
    let output = Scratch("tests/cli_output_demo.out.json");

    let mut cmd = Command::cargo_bin("entrydoc").unwrap();
    cmd.args(["compile", input.0, "--pretty", "-o", output.0])
        .assert()
        .success();

    let written = fs::read_to_string(output.0).unwrap();
    assert!(written.contains("\n  \"speed\": 60"));
    let document: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(document["scenes"][0]["name"], "s1");
}

#[test]
fn cli_check_prints_summary() {
    let input = Scratch::new("tests/cli_check_demo.json", DEMO_JSON);

    let mut cmd = Command::cargo_bin("entrydoc").unwrap();
    cmd.arg("check")
        .arg(input.0)
        .assert()
        .success()
        .stdout(
            contains("ok")
                .and(contains("objects"))
                .and(contains("script blocks"))
                .and(contains("bot")),
        );
}

#[test]
fn cli_tree_prints_outline() {
    let input = Scratch::new("tests/cli_tree_demo.json", DEMO_JSON);

    let mut cmd = Command::cargo_bin("entrydoc").unwrap();
    cmd.arg("tree")
        .arg(input.0)
        .assert()
        .success()
        .stdout(contains("Project \"demo\"").and(contains("    Picture \"p1\"")));
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    let input = Scratch::new("tests/cli_stray_scene.json", STRAY_SCENE);

    let mut cmd = Command::cargo_bin("entrydoc").unwrap();
    cmd.arg("compile").arg(input.0).assert().failure().stderr(
        contains("Scene requires Project").and(contains("entrydoc::structural")),
    );
}

#[test]
fn cli_reports_unreadable_input() {
    let mut cmd = Command::cargo_bin("entrydoc").unwrap();
    cmd.args(["check", "tests/does_not_exist.json"])
        .assert()
        .failure()
        .stderr(contains("cannot read").and(contains("entrydoc::input")));
}
