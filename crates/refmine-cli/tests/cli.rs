use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use refmine_syntax::{DiffDocument, SyntaxTree};
use refmine_test_utils::{label_diff, FixtureTree};
use tempfile::TempDir;

const RENAME: &str =
    "Rename Method public foo(x int) : void renamed to public bar(x int) : void in class C";
const TYPE_CHANGE: &str =
    "Change Parameter Type x : int to x : long in method public foo(x long) : void in class C";
const TYPE_RENAME: &str =
    "Rename Parameter x : int to x : long in method public foo(x long) : void in class C";

/// A `refmine` invocation isolated from the caller's config and log settings.
fn refmine(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("refmine"));
    cmd.current_dir(cwd)
        .env_remove("REFMINE_CONFIG_PATH")
        .env_remove("RUST_LOG");
    cmd
}

fn class_tree(method: &str) -> SyntaxTree {
    let text = format!("class C {{ {method} }}");
    let mut t = FixtureTree::new(&text);
    let class = t.class(t.root(), &text);
    t.method(class.decl, method);
    t.finish()
}

fn write_doc(dir: &TempDir, name: &str, before: &str, after: &str) -> PathBuf {
    let diff = label_diff(class_tree(before), class_tree(after));
    let json = DiffDocument::from_tree_diff("src/C.java", &diff)
        .to_json()
        .unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn help_mentions_commands() {
    let temp = TempDir::new().unwrap();
    refmine(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("detect").and(predicate::str::contains("config")));
}

#[test]
fn detect_prints_sorted_descriptions() {
    let temp = TempDir::new().unwrap();
    let rename = write_doc(&temp, "rename.json", "public void foo(int x) {}", "public void bar(int x) {}");
    let retype = write_doc(&temp, "retype.json", "public void foo(int x) {}", "public void foo(long x) {}");

    refmine(temp.path())
        .arg("detect")
        .arg(&rename)
        .arg(&retype)
        .assert()
        .success()
        .stdout(format!("{TYPE_CHANGE}\n{RENAME}\n{TYPE_RENAME}\n"));
}

#[test]
fn detect_json_emits_camel_case_records() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(&temp, "rename.json", "public void foo(int x) {}", "public void bar(int x) {}");

    let output = refmine(temp.path())
        .arg("detect")
        .arg(&doc)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["description"], RENAME);
    assert_eq!(records[0]["before"]["filePath"], "src/C.java");
    assert_eq!(records[0]["after"]["codeElement"], "bar");
    assert_eq!(records[0]["after"]["startLine"], 1);
}

#[test]
fn config_file_disables_a_pass() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("refmine.toml"), "[detect]\nrenames = false\n").unwrap();
    let rename = write_doc(&temp, "rename.json", "public void foo(int x) {}", "public void bar(int x) {}");
    let retype = write_doc(&temp, "retype.json", "public void foo(int x) {}", "public void foo(long x) {}");

    refmine(temp.path())
        .arg("detect")
        .arg(&rename)
        .arg(&retype)
        .assert()
        .success()
        .stdout(format!("{TYPE_CHANGE}\n"));
}

#[test]
fn explicit_config_flag_wins_over_discovery() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("refmine.toml"), "[detect]\nrenames = false\n").unwrap();
    let explicit = temp.path().join("custom.toml");
    std::fs::write(&explicit, "[detect]\ntype_changes = false\n").unwrap();
    let retype = write_doc(&temp, "retype.json", "public void foo(int x) {}", "public void foo(long x) {}");

    refmine(temp.path())
        .arg("--config")
        .arg(&explicit)
        .arg("detect")
        .arg(&retype)
        .assert()
        .success()
        .stdout(format!("{TYPE_RENAME}\n"));
}

#[test]
fn config_prints_effective_toml() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("refmine.toml"), "[detect]\nthreads = 3\n").unwrap();

    refmine(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("threads = 3")
                .and(predicate::str::contains("renames = true"))
                .and(predicate::str::contains("level = \"info\"")),
        );
}

/// Keep stderr to the failure report alone.
fn quiet_logging(dir: &TempDir) {
    std::fs::write(dir.path().join("refmine.toml"), "[logging]\nlevel = \"error\"\n").unwrap();
}

/// Rewrite the source root span of a document written by [`write_doc`].
fn corrupt_root_span(path: &Path, pos: u64, length: u64) {
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    doc["before"]["root"]["pos"] = pos.into();
    doc["before"]["root"]["length"] = length.into();
    std::fs::write(path, serde_json::to_string(&doc).unwrap()).unwrap();
}

#[test]
fn unreadable_document_is_reported() {
    let temp = TempDir::new().unwrap();
    quiet_logging(&temp);
    refmine(temp.path())
        .arg("detect")
        .arg(temp.path().join("missing.json"))
        .assert()
        .code(1)
        .stdout("")
        .stderr(
            predicate::str::contains("reading diff document")
                .and(predicate::str::contains("missing.json").count(1)),
        );
}

#[test]
fn malformed_document_is_reported() {
    let temp = TempDir::new().unwrap();
    let doc = temp.path().join("bad.json");
    std::fs::write(&doc, "{ \"path\": \"C.java\" }").unwrap();

    refmine(temp.path())
        .arg("detect")
        .arg(&doc)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse diff document"));
}

#[test]
fn bad_documents_do_not_drop_good_ones() {
    let temp = TempDir::new().unwrap();
    quiet_logging(&temp);
    let good = write_doc(&temp, "good.json", "public void foo(int x) {}", "public void bar(int x) {}");
    let past_end = write_doc(&temp, "past_end.json", "public void foo(int x) {}", "public void baz(int x) {}");
    corrupt_root_span(&past_end, 0, 10_000);
    let overflow = write_doc(&temp, "overflow.json", "public void foo(int x) {}", "public void qux(int x) {}");
    corrupt_root_span(&overflow, 4_294_967_290, 10);

    refmine(temp.path())
        .arg("detect")
        .arg(&past_end)
        .arg(&good)
        .arg(&overflow)
        .assert()
        .code(1)
        .stdout(format!("{RENAME}\n"))
        .stderr(
            predicate::str::contains("past_end.json")
                .and(predicate::str::contains("exceeds the text length").count(1))
                .and(predicate::str::contains("overflows the offset range").count(1)),
        );
}

#[test]
fn invalid_config_exits_with_two() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("refmine.toml"), "[detect]\nmoves = true\n").unwrap();

    refmine(temp.path())
        .arg("config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("loading config"));
}
