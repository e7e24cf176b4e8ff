// crates/se_cli/src/main.rs
//
// Wires up: exit codes, typed error mapping, CLI parsing, the
// validate-only short-circuit, and the full run path (load snapshot →
// score → render report to stdout).

mod args;
mod report;

mod exitcodes {
    /// Stable exit codes (scripts and the integration tests rely on these).
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const RENDER: i32 = 5;
}

use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};

use se_algo::score_stage;
use se_core::RewardPolicy;
use se_io::loader;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Snapshot shape / domain / scoring-input failures.
    Validation(String),
    /// I/O errors (read/path).
    Io(String),
    /// Report serialization failures.
    Render(String),
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("settle: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    // Honor --validate-only as a hard short-circuit.
    let rc = if args.validate_only {
        match validate_only(&args) {
            Ok(()) => exitcodes::OK,
            Err(e) => map_error(&e),
        }
    } else {
        match run_once(&args) {
            Ok(()) => exitcodes::OK,
            Err(e) => map_error(&e),
        }
    };

    ExitCode::from(rc as u8)
}

/// Validate-only path (no scoring, no report).
/// Loads the snapshot (and policy override, if given) to exercise the
/// shape/domain checks.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let loaded = loader::load_stage_snapshot(&args.snapshot).map_err(map_io_err)?;
    if let Some(policy) = &args.policy {
        loader::load_reward_policy(policy).map_err(map_io_err)?;
    }
    if !args.quiet {
        eprintln!(
            "validate-only: snapshot OK ({} groups, {} rankings, sha256 {})",
            loaded.input.groups.len(),
            loaded.input.rankings.len(),
            loaded.snapshot_sha256
        );
    }
    Ok(())
}

/// Full run: load → score → render JSON report to stdout.
fn run_once(args: &Args) -> Result<(), MainError> {
    let loaded = loader::load_stage_snapshot(&args.snapshot).map_err(map_io_err)?;

    let policy = match &args.policy {
        Some(path) => loader::load_reward_policy(path).map_err(map_io_err)?,
        None => RewardPolicy::default(),
    };

    let input = &loaded.input;
    let outcome = score_stage(
        input.stage.reward_pool,
        &input.groups,
        &input.memberships,
        &input.rankings,
        &policy,
    )
    .map_err(|e| MainError::Validation(e.to_string()))?;

    if !args.quiet {
        eprintln!(
            "settle: stage {} scored ({} ballots over {} groups, {:.2} points allocated)",
            input.stage.stage_id,
            outcome.summary.ballot_count,
            outcome.summary.group_count,
            outcome.summary.total_allocated
        );
    }

    let rendered = report::render_json(
        &report::build_report(input, &outcome, &loaded.snapshot_sha256),
        args.pretty,
    )
    .map_err(|e| MainError::Render(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(msg) => {
            eprintln!("settle: validation error: {msg}");
            exitcodes::VALIDATION
        }
        MainError::Io(msg) => {
            eprintln!("settle: io error: {msg}");
            exitcodes::IO
        }
        MainError::Render(msg) => {
            eprintln!("settle: render error: {msg}");
            exitcodes::RENDER
        }
    }
}

/// Translate se_io::IoError into MainError buckets.
fn map_io_err(e: se_io::IoError) -> MainError {
    match e {
        se_io::IoError::Path(msg) => MainError::Io(msg),
        se_io::IoError::Json { pointer, msg } => {
            MainError::Validation(format!("json at {pointer}: {msg}"))
        }
        se_io::IoError::MalformedRanking { voter, msg } => {
            MainError::Validation(format!("malformed ranking from {voter}: {msg}"))
        }
        se_io::IoError::Hash(msg) => MainError::Io(msg),
        se_io::IoError::Invalid(msg) => MainError::Validation(msg),
    }
}
