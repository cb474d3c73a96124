//! Loop-level harness tests for `run_loop`.
//!
//! These drive the iteration driver against a real `.ralph/` project in a
//! temp dir with a scripted assistant that rewrites the PRD the way `claude`
//! would.

use ralph::core::types::Category;
use ralph::io::executor::ExecRequest;
use ralph::io::prd_store::save_prd;
use ralph::looping::{LoopEvent, LoopStop, RunOptions, run_loop};
use ralph::test_support::{RecordingNotifier, ScriptedExec, ScriptedExecutor, TestProject, entry};

fn options(iterations: u32, category: Option<Category>, sandboxed: bool) -> RunOptions {
    RunOptions {
        iterations,
        category,
        sandboxed,
    }
}

/// `run 3 --category feature` with a single open feature entry.
///
/// Store: 2 feature entries (1 open) + 5 entries of other categories (all open).
///
/// 1. Iter 1: assistant receives only the open feature entry, marks it done.
/// 2. Iter 2: no open feature entries → loop stops without another invocation.
#[test]
fn category_run_invokes_once_for_single_open_feature() {
    let project = TestProject::new().expect("project");
    let mut store = vec![
        entry(Category::Feature, "login", true),
        entry(Category::Ui, "navbar", false),
        entry(Category::Feature, "signup", false),
        entry(Category::Bugfix, "crash", false),
        entry(Category::Docs, "readme", false),
        entry(Category::Testing, "e2e", false),
        entry(Category::Setup, "ci", false),
    ];
    project.write_prd(&store).expect("write prd");

    let prd_path = project.paths().prd_path.clone();
    store[2].passes = true;
    let after_first = store.clone();
    let executor = ScriptedExecutor::new(vec![
        ScriptedExec::stdout("implemented signup\n")
            .with_effect(move || save_prd(&prd_path, &after_first)),
        ScriptedExec::stdout("should never run\n"),
    ]);
    let notifier = RecordingNotifier::default();
    let mut events = Vec::new();

    let outcome = run_loop(
        project.paths(),
        &executor,
        &notifier,
        &options(3, Some(Category::Feature), false),
        |e| events.push(e),
    )
    .expect("loop");

    assert_eq!(outcome.invocations, 1);
    assert_eq!(outcome.stop, LoopStop::NothingRemaining);
    assert_eq!(executor.remaining(), 1);

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].prd,
        vec![serde_json::to_value(entry(Category::Feature, "signup", false)).expect("value")]
    );
    assert_eq!(
        events,
        vec![
            LoopEvent::IterationStarted {
                iter: 1,
                total: 3,
                remaining: 1
            },
            LoopEvent::NothingRemaining,
        ]
    );
    // Only the assistant wrote to the store.
    assert_eq!(project.read_prd().expect("read"), store);
}

/// The assistant sees exactly the open entries, in store order, and every
/// transient file is gone once the loop returns.
#[test]
fn each_iteration_gets_fresh_filtered_file_that_is_cleaned_up() {
    let project = TestProject::new().expect("project");
    project
        .write_prd(&[
            entry(Category::Ui, "a", false),
            entry(Category::Docs, "b", true),
            entry(Category::Feature, "c", false),
        ])
        .expect("write prd");
    let executor = ScriptedExecutor::new(vec![
        ScriptedExec::stdout("one\n"),
        ScriptedExec::exit(1, "two\n"),
        ScriptedExec::stdout("three\n"),
    ]);
    let notifier = RecordingNotifier::default();

    let outcome = run_loop(
        project.paths(),
        &executor,
        &notifier,
        &options(3, None, false),
        |_| {},
    )
    .expect("loop");

    assert_eq!(outcome.invocations, 3);
    assert_eq!(outcome.stop, LoopStop::IterationsExhausted);
    executor.assert_drained().expect("drained");

    let calls = executor.calls();
    let paths: Vec<_> = calls.iter().map(|c| c.request.prd_path.clone()).collect();
    assert_eq!(paths.len(), 3);
    assert_ne!(paths[0], paths[1]);
    assert_ne!(paths[1], paths[2]);
    for call in &calls {
        assert_eq!(call.descriptions(), vec!["a", "c"]);
    }
    assert!(project.transient_files().expect("list").is_empty());
    assert!(notifier.messages().is_empty());
}

/// The request carries the progress log, the resolved prompt and the sandbox flag.
#[test]
fn request_references_progress_log_and_resolved_prompt() {
    let project = TestProject::new().expect("project");
    project
        .write_prd(&[entry(Category::Setup, "build", false)])
        .expect("write prd");
    project
        .write_prompt("Check with $checkCommand.")
        .expect("write prompt");
    let executor = ScriptedExecutor::new(vec![ScriptedExec::stdout(
        "done: <promise>COMPLETE</promise>",
    )]);
    let notifier = RecordingNotifier::default();

    let outcome = run_loop(
        project.paths(),
        &executor,
        &notifier,
        &options(2, None, true),
        |_| {},
    )
    .expect("loop");

    assert_eq!(outcome.stop, LoopStop::Sentinel);
    assert_eq!(notifier.messages().len(), 1);

    let request: ExecRequest = executor.calls()[0].request.clone();
    assert!(request.sandboxed);
    assert_eq!(request.workdir, project.root());
    assert_eq!(request.progress_path, project.paths().progress_path);
    assert_eq!(request.prompt, "Check with cargo check.");
    assert_eq!(
        request.instruction(),
        format!(
            "@{} @{} Check with cargo check.",
            request.prd_path.display(),
            project.paths().progress_path.display()
        )
    );
}

/// A missing project file is a precondition failure: nothing runs.
#[test]
fn missing_progress_log_fails_before_any_invocation() {
    let project = TestProject::new().expect("project");
    std::fs::remove_file(&project.paths().progress_path).expect("remove progress");
    let executor = ScriptedExecutor::new(vec![ScriptedExec::stdout("x")]);

    let err = run_loop(
        project.paths(),
        &executor,
        &RecordingNotifier::default(),
        &options(1, None, false),
        |_| {},
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "progress.txt not found. Run 'ralph init' first."
    );
    assert_eq!(executor.remaining(), 1);
}
