//! `ralph`: drive an AI coding assistant through a PRD, one iteration at a time.
//!
//! Project state lives in `.ralph/` (config, prompt template, PRD, progress
//! log). `ralph run <n>` invokes `claude` up to `n` times against the open PRD
//! entries and stops early once the assistant reports completion.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use ralph::core::languages::Language;
use ralph::core::types::{Category, PrdEntry};
use ralph::exit_codes;
use ralph::io::config::load_config;
use ralph::io::executor::ClaudeExecutor;
use ralph::io::init::{FileAction, NotInitializedError, PRD_FILE, RalphPaths};
use ralph::io::interactive::{InquirePrompter, prompt_new_entry};
use ralph::io::notify::TtNotifier;
use ralph::io::prd_store::load_prd;
use ralph::io::prompt::{load_prompt_template, load_resolved_prompt};
use ralph::io::sandbox::is_sandboxed;
use ralph::logging;
use ralph::looping::{LoopEvent, LoopOutcome, RunOptions, run_loop};
use ralph::prd::{
    ToggleTarget, add_entry, clean_entries, clean_message, render_list, render_status,
    toggle_entries, toggle_message,
};
use ralph::setup::{SetupOutcome, SetupRequest, run_setup};

#[derive(Parser)]
#[command(
    name = "ralph",
    version,
    about = "Run an AI coding assistant against a PRD until every requirement passes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.ralph/` (config, prompt template, PRD, progress log).
    Init {
        /// Skip the language picker.
        #[arg(short, long, value_enum)]
        language: Option<Language>,
        /// Overwrite an existing config without asking.
        #[arg(short, long)]
        force: bool,
    },
    /// Run a single assistant iteration.
    Once {
        /// Only hand entries of this category to the assistant.
        #[arg(short, long, value_enum)]
        category: Option<Category>,
    },
    /// Run up to <ITERATIONS> assistant iterations.
    Run {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        iterations: u32,
        /// Only hand entries of this category to the assistant.
        #[arg(short, long, value_enum)]
        category: Option<Category>,
    },
    /// Manage PRD entries.
    Prd {
        #[command(subcommand)]
        command: PrdCommand,
    },
    /// Print the prompt template with variables resolved.
    Prompt {
        /// Print the template as written, with `$variables`.
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Subcommand)]
enum PrdCommand {
    /// Add an entry (interactive unless --description is given).
    Add {
        #[arg(long, value_enum, requires = "description")]
        category: Option<Category>,
        #[arg(long, requires = "category")]
        description: Option<String>,
        /// Verification step; repeat for several.
        #[arg(long = "step")]
        steps: Vec<String>,
    },
    /// List all entries.
    List,
    /// Show completion status.
    Status,
    /// Flip `passes` for entries by number (1-based).
    Toggle {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        numbers: Vec<String>,
        /// Toggle every entry.
        #[arg(short, long)]
        all: bool,
    },
    /// Remove all passing entries.
    Clean,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help/version are not errors; every usage error exits 1.
            let code = if err.use_stderr() {
                exit_codes::FAILURE
            } else {
                exit_codes::OK
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    logging::init();
    if let Err(err) = dispatch(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_codes::FAILURE);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let root = std::env::current_dir().context("resolve current directory")?;
    let paths = RalphPaths::new(root);
    match cli.command {
        Command::Init { language, force } => cmd_init(&paths, language, force),
        Command::Once { category } => cmd_once(&paths, category),
        Command::Run {
            iterations,
            category,
        } => cmd_run(&paths, iterations, category),
        Command::Prd { command } => match command {
            PrdCommand::Add {
                category,
                description,
                steps,
            } => cmd_prd_add(&paths, category, description, steps),
            PrdCommand::List => cmd_prd_list(&paths),
            PrdCommand::Status => cmd_prd_status(&paths),
            PrdCommand::Toggle { numbers, all } => {
                let target = if all {
                    ToggleTarget::All
                } else {
                    ToggleTarget::Numbers(numbers)
                };
                cmd_prd_toggle(&paths, &target)
            }
            PrdCommand::Clean => cmd_prd_clean(&paths),
        },
        Command::Prompt { raw } => cmd_prompt(&paths, raw),
    }
}

fn cmd_init(paths: &RalphPaths, language: Option<Language>, force: bool) -> Result<()> {
    println!("Initializing ralph in {}...\n", paths.root.display());
    let outcome = run_setup(paths, &SetupRequest { language, force }, &InquirePrompter)?;
    let report = match outcome {
        SetupOutcome::Aborted => {
            println!("Aborted.");
            return Ok(());
        }
        SetupOutcome::Initialized { report, .. } => report,
    };
    for (file, action) in report.files {
        match action {
            FileAction::Created => println!("Created .ralph/{file}"),
            FileAction::Skipped => println!("Skipped .ralph/{file} (already exists)"),
        }
    }
    println!("\n{}", "Ralph initialized successfully!".green());
    println!("\nNext steps:");
    println!("  1. Add requirements with 'ralph prd add' (or edit .ralph/prd.json)");
    println!("  2. Run 'ralph once' to start the first iteration");
    println!("  3. Or run 'ralph run 5' for 5 automated iterations");
    Ok(())
}

fn cmd_once(paths: &RalphPaths, category: Option<Category>) -> Result<()> {
    paths.ensure_initialized()?;
    println!("Starting single ralph iteration...\n");
    drive(paths, 1, category)?;
    Ok(())
}

fn cmd_run(paths: &RalphPaths, iterations: u32, category: Option<Category>) -> Result<()> {
    paths.ensure_initialized()?;
    match category {
        Some(c) => println!("Starting {iterations} ralph iteration(s) for category '{c}'...\n"),
        None => println!("Starting {iterations} ralph iteration(s)...\n"),
    }
    drive(paths, iterations, category)?;
    println!("\nRalph run finished.");
    Ok(())
}

fn drive(paths: &RalphPaths, iterations: u32, category: Option<Category>) -> Result<LoopOutcome> {
    let options = RunOptions {
        iterations,
        category,
        sandboxed: is_sandboxed(),
    };
    if options.sandboxed {
        info!("container detected, assistant may skip permission prompts");
    }
    let rule = "=".repeat(50);
    run_loop(
        paths,
        &ClaudeExecutor::new(),
        &TtNotifier,
        &options,
        |event| match event {
            LoopEvent::IterationStarted {
                iter,
                total,
                remaining,
            } => {
                println!("\n{rule}");
                println!("Iteration {iter} of {total} ({remaining} open)");
                println!("{rule}\n");
            }
            LoopEvent::AssistantFailed { exit_code, .. } => {
                match exit_code {
                    Some(code) => eprintln!("\nClaude exited with code {code}"),
                    None => eprintln!("\nClaude was terminated by a signal"),
                }
                println!("Continuing to next iteration...");
            }
            LoopEvent::NothingRemaining => match category {
                Some(c) => println!("\nNo incomplete '{c}' entries left. Nothing to do!"),
                None => println!("\nNo incomplete PRD entries left. Nothing to do!"),
            },
            LoopEvent::Complete => {
                println!("\n{rule}");
                println!("{}", "PRD COMPLETE - All features implemented!".green());
                println!("{rule}");
            }
        },
    )
}

fn cmd_prd_add(
    paths: &RalphPaths,
    category: Option<Category>,
    description: Option<String>,
    steps: Vec<String>,
) -> Result<()> {
    // Fail before asking any questions.
    if !paths.prd_path.exists() {
        return Err(NotInitializedError::new(PRD_FILE).into());
    }
    let entry = match (category, description) {
        (Some(category), Some(description)) => {
            if description.trim().is_empty() {
                bail!("Description is required.");
            }
            PrdEntry::new(category, description.trim(), steps)
        }
        _ => prompt_new_entry()?,
    };
    let description = entry.description.clone();
    let number = add_entry(paths, entry)?;
    println!("\nAdded entry #{number}: \"{description}\"");
    Ok(())
}

fn cmd_prd_list(paths: &RalphPaths) -> Result<()> {
    let entries = load_prd(&paths.prd_path)?;
    print!("{}", render_list(&entries));
    Ok(())
}

fn cmd_prd_status(paths: &RalphPaths) -> Result<()> {
    let entries = load_prd(&paths.prd_path)?;
    print!("{}", render_status(&entries));
    Ok(())
}

fn cmd_prd_toggle(paths: &RalphPaths, target: &ToggleTarget) -> Result<()> {
    let toggled = toggle_entries(paths, target)?;
    if toggled.is_empty() {
        println!("No PRD entries found.");
    }
    for (number, entry) in &toggled {
        println!("{}", toggle_message(*number, entry));
    }
    Ok(())
}

fn cmd_prd_clean(paths: &RalphPaths) -> Result<()> {
    let summary = clean_entries(paths)?;
    println!("{}", clean_message(&summary));
    Ok(())
}

fn cmd_prompt(paths: &RalphPaths, raw: bool) -> Result<()> {
    let text = if raw {
        load_prompt_template(&paths.prompt_path)?
    } else {
        let config = load_config(&paths.config_path)?;
        load_resolved_prompt(&paths.prompt_path, &config)?
    };
    println!("{}", text.trim_end());
    Ok(())
}
