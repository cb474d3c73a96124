//! CLI tests for `ralph`.
//!
//! Spawns the ralph binary in a temp project and verifies exit codes, output
//! and that failed commands leave `.ralph/prd.json` untouched.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use ralph::core::types::Category;
use ralph::exit_codes;
use ralph::io::prd_store::save_prd;
use ralph::test_support::{TestProject, entry};

fn ralph(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ralph"))
        .current_dir(root)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RALPH_SANDBOX")
        .output()
        .expect("run ralph")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

#[test]
fn init_then_prompt_prints_resolved_template() {
    let temp = tempfile::tempdir().expect("tempdir");

    let out = ralph(temp.path(), &["init", "--language", "go"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK), "{}", stderr(&out));
    assert!(stdout(&out).contains("Created .ralph/prd.json"));

    let out = ralph(temp.path(), &["prompt"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(stdout(&out).contains("go build ./..."));

    let out = ralph(temp.path(), &["prompt", "--raw"]);
    assert!(stdout(&out).contains("$checkCommand"));
}

#[test]
fn prd_clean_reports_counts() {
    let project = TestProject::new().expect("project");
    project
        .write_prd(&[
            entry(Category::Ui, "a", true),
            entry(Category::Ui, "b", false),
            entry(Category::Ui, "c", true),
        ])
        .expect("write");

    let out = ralph(project.root(), &["prd", "clean"]);

    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(stdout(&out).contains("Removed 2 passing entries. 1 entry remaining."));
    assert_eq!(
        project.read_prd().expect("read"),
        vec![entry(Category::Ui, "b", false)]
    );
}

#[test]
fn prd_toggle_out_of_range_exits_one_without_writing() {
    let project = TestProject::new().expect("project");
    project
        .write_prd(&[entry(Category::Feature, "a", false)])
        .expect("write");
    let before = fs::read_to_string(&project.paths().prd_path).expect("read");

    for args in [
        vec!["prd", "toggle", "2"],
        vec!["prd", "toggle", "0"],
        vec!["prd", "toggle", "1", "x"],
    ] {
        let out = ralph(project.root(), &args);
        assert_eq!(out.status.code(), Some(exit_codes::FAILURE), "{args:?}");
    }

    let after = fs::read_to_string(&project.paths().prd_path).expect("read");
    assert_eq!(before, after);
}

#[test]
fn prd_toggle_twice_restores_entry() {
    let project = TestProject::new().expect("project");
    let entries = vec![
        entry(Category::Feature, "a", false),
        entry(Category::Docs, "b", true),
    ];
    project.write_prd(&entries).expect("write");

    let out = ralph(project.root(), &["prd", "toggle", "1"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let text = stdout(&out);
    assert!(text.contains("Entry #1 \"a\" is now"));
    assert!(text.contains("PASSING") && !text.contains("NOT PASSING"));
    assert!(project.read_prd().expect("read")[0].passes);

    ralph(project.root(), &["prd", "toggle", "1"]);
    assert_eq!(project.read_prd().expect("read"), entries);
}

#[test]
fn invalid_run_arguments_exit_one_without_touching_store() {
    let project = TestProject::new().expect("project");
    project
        .write_prd(&[entry(Category::Ui, "open", false)])
        .expect("write");
    let before = fs::read_to_string(&project.paths().prd_path).expect("read");

    for args in [
        vec!["run", "0"],
        vec!["run", "-1"],
        vec!["run", "abc"],
        vec!["run", "1", "--category", "ui2"],
    ] {
        let out = ralph(project.root(), &args);
        assert_eq!(out.status.code(), Some(exit_codes::FAILURE), "{args:?}");
    }

    let after = fs::read_to_string(&project.paths().prd_path).expect("read");
    assert_eq!(before, after);
    assert!(project.transient_files().expect("list").is_empty());
}

#[test]
fn run_without_project_reports_error_prefix() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = ralph(temp.path(), &["run", "2"]);
    assert_eq!(out.status.code(), Some(exit_codes::FAILURE));
    assert!(stderr(&out).contains("Error: config.json not found. Run 'ralph init' first."));
}

#[test]
fn run_with_nothing_open_finishes_without_assistant() {
    let project = TestProject::new().expect("project");
    save_prd(
        &project.paths().prd_path,
        &[entry(Category::Feature, "done", true)],
    )
    .expect("write");

    let out = ralph(project.root(), &["run", "3", "--category", "feature"]);

    assert_eq!(out.status.code(), Some(exit_codes::OK), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Nothing to do"));
    assert!(!text.contains("Iteration 1 of 3"));
    assert!(text.contains("Ralph run finished."));
}

#[test]
fn prd_add_non_interactive_appends_with_default_step() {
    let project = TestProject::new().expect("project");
    project.write_prd(&[]).expect("write");

    let out = ralph(
        project.root(),
        &["prd", "add", "--category", "docs", "--description", "Write guide"],
    );

    assert_eq!(out.status.code(), Some(exit_codes::OK), "{}", stderr(&out));
    assert!(stdout(&out).contains("Added entry #1: \"Write guide\""));
    let prd = project.read_prd().expect("read");
    assert_eq!(prd[0].steps, vec!["Verify the feature works as expected"]);
}
