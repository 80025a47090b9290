//! End-to-end tests driving the `wag` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn wag() -> Command {
    Command::cargo_bin("wag").unwrap()
}

fn write_source(dir: &Path, contents: &str) {
    fs::write(dir.join("workflows.rs"), contents).unwrap();
}

const CI_SOURCE: &str = r#"
use indexmap::IndexMap;
use std::sync::LazyLock;
use wag_model::{Job, PushTrigger, Step, Triggers, Workflow};

pub static Build: LazyLock<Job> =
    LazyLock::new(|| Job::on("ubuntu-latest", [Step::run("echo hello")]));

pub static Ci: LazyLock<Workflow> = LazyLock::new(|| Workflow {
    name: "CI".to_string(),
    on: Triggers {
        push: Some(PushTrigger {
            branches: vec!["main".to_string()],
            ..PushTrigger::default()
        }),
        ..Triggers::default()
    },
    jobs: IndexMap::from([("build".to_string(), Build.clone())]),
    ..Workflow::default()
});
"#;

const CI_YAML: &str = "name: CI\non:\n  push:\n    branches:\n      - main\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: echo hello\n";

#[test]
fn build_writes_canonical_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    write_source(dir.path(), CI_SOURCE);

    wag()
        .args(["build"])
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let yaml = fs::read_to_string(out.join("ci.yml")).unwrap();
    assert_eq!(yaml, CI_YAML);
}

#[test]
fn build_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    write_source(dir.path(), CI_SOURCE);

    wag()
        .args(["build", "--dry-run"])
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("runs-on: ubuntu-latest"));

    assert!(!out.exists());
}

#[test]
fn dependency_cycle_fails_with_both_ids() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        r#"
use indexmap::IndexMap;
use std::sync::LazyLock;
use wag_model::{Job, Step, Workflow};

pub static A: LazyLock<Job> =
    LazyLock::new(|| Job::on("ubuntu-latest", [Step::run("true")]).needs("b"));

pub static B: LazyLock<Job> =
    LazyLock::new(|| Job::on("ubuntu-latest", [Step::run("true")]).needs("a"));

pub static Ci: LazyLock<Workflow> = LazyLock::new(|| Workflow {
    name: "CI".to_string(),
    jobs: IndexMap::from([("a".to_string(), A.clone()), ("b".to_string(), B.clone())]),
    ..Workflow::default()
});
"#,
    );

    wag()
        .args(["build"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "dependency cycle involving jobs 'a', 'b'",
        ));
}

#[test]
fn awkward_names_normalize() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        r#"
use indexmap::IndexMap;
use std::sync::LazyLock;
use wag_model::{Job, Step, Workflow};

pub static CCppCI: LazyLock<Workflow> = LazyLock::new(|| Workflow {
    name: "C/C++ CI".to_string(),
    jobs: IndexMap::from([(
        "build".to_string(),
        Job::on("ubuntu-latest", [Step::run("make")]),
    )]),
    ..Workflow::default()
});
"#,
    );

    wag()
        .args(["list"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("c-c-ci.yml"));
}

#[test]
fn missing_input_exits_two() {
    wag()
        .args(["list", "definitely/not/here"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn graph_renders_dot_edges() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        r#"
use indexmap::IndexMap;
use std::sync::LazyLock;
use wag_model::{Job, Step, Workflow};

pub static Ci: LazyLock<Workflow> = LazyLock::new(|| Workflow {
    name: "CI".to_string(),
    jobs: IndexMap::from([
        ("build".to_string(), Job::on("ubuntu-latest", [Step::run("make")])),
        (
            "test".to_string(),
            Job::on("ubuntu-latest", [Step::run("make test")]).needs("build"),
        ),
    ]),
    ..Workflow::default()
});
"#,
    );

    wag()
        .args(["graph"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"build\" -> \"test\";"))
        .stdout(predicate::str::contains("rankdir=TB;"));
}

#[test]
fn import_then_build_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let yaml_file = dir.path().join("ci.yml");
    fs::write(&yaml_file, CI_YAML).unwrap();
    let package = dir.path().join("imported");

    wag()
        .args(["import", "--single-file", "--no-scaffold"])
        .arg(&yaml_file)
        .arg("-o")
        .arg(&package)
        .assert()
        .success();

    let out = dir.path().join("out");
    wag()
        .args(["build"])
        .arg(&package)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(out.join("ci.yml")).unwrap(), CI_YAML);
}

#[test]
fn lint_reports_and_fixes_deprecated_commands() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        r#"
use indexmap::IndexMap;
use std::sync::LazyLock;
use wag_model::{Job, Step, Workflow};

pub static Ci: LazyLock<Workflow> = LazyLock::new(|| Workflow {
    name: "CI".to_string(),
    jobs: IndexMap::from([(
        "build".to_string(),
        Job::on("ubuntu-latest", [Step::run("echo \"::set-output name=sha::abc\"")]),
    )]),
    ..Workflow::default()
});
"#,
    );

    wag()
        .args(["lint"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("WAG002"));

    wag()
        .args(["lint", "--fix"])
        .arg(dir.path())
        .assert()
        .code(1); // WAG003 (no timeout) remains after the rewrite

    let rewritten = fs::read_to_string(dir.path().join("workflows.rs")).unwrap();
    assert!(rewritten.contains("$GITHUB_OUTPUT"));
    assert!(!rewritten.contains("::set-output"));
}

#[test]
fn validate_rejects_missing_file() {
    wag()
        .args(["validate", "not-a-file.yml"])
        .assert()
        .code(2);
}

#[cfg(unix)]
#[test]
fn validate_fails_when_external_validator_complains_on_stderr() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let yaml_file = dir.path().join("ci.yml");
    fs::write(&yaml_file, CI_YAML).unwrap();

    // An actionlint that writes its complaint to stderr and exits nonzero.
    let bin = dir.path().join("bin");
    fs::create_dir(&bin).unwrap();
    let stub = bin.join("actionlint");
    fs::write(&stub, "#!/bin/sh\necho 'could not read workflow' >&2\nexit 1\n").unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

    let path = format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    wag()
        .args(["validate"])
        .arg(&yaml_file)
        .env("PATH", path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read workflow"));
}

#[cfg(unix)]
#[test]
fn validate_fails_when_external_validator_is_silent() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let yaml_file = dir.path().join("ci.yml");
    fs::write(&yaml_file, CI_YAML).unwrap();

    let bin = dir.path().join("bin");
    fs::create_dir(&bin).unwrap();
    let stub = bin.join("actionlint");
    fs::write(&stub, "#!/bin/sh\nexit 1\n").unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

    let path = format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    wag()
        .args(["validate"])
        .arg(&yaml_file)
        .env("PATH", path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("actionlint rejected the file"));
}

#[test]
fn diff_spots_added_job() {
    let dir = tempfile::tempdir().unwrap();
    let before = dir.path().join("before.yml");
    let after = dir.path().join("after.yml");
    fs::write(&before, CI_YAML).unwrap();
    fs::write(
        &after,
        "name: CI\non:\n  push:\n    branches:\n      - main\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: echo hello\n  test:\n    runs-on: ubuntu-latest\n    needs:\n      - build\n    steps:\n      - run: make test\n",
    )
    .unwrap();

    wag()
        .args(["diff"])
        .arg(&before)
        .arg(&after)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("added job 'test'"))
        .stdout(predicate::str::contains("added dependency 'build' -> 'test'"));

    wag()
        .args(["diff"])
        .arg(&before)
        .arg(&before)
        .assert()
        .success()
        .stdout(predicate::str::contains("semantically identical"));
}

#[test]
fn init_scaffolds_a_buildable_package() {
    let dir = tempfile::tempdir().unwrap();

    wag()
        .args(["init", "CI", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    let root = dir.path().join("ci");
    assert!(root.join("Cargo.toml").is_file());
    assert!(root.join("src/workflows.rs").is_file());

    let out = dir.path().join("out");
    wag()
        .args(["build"])
        .arg(&root)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    assert!(out.join("ci.yml").is_file());
}
