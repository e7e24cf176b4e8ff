// crates/se_cli/src/args.rs
//
// Deterministic, offline CLI argument parsing surface.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - --snapshot is required; --policy optionally overrides the built-in
//   40/30/20/10/5%-flat reward table
// - --validate-only loads + validates the snapshot without scoring

use clap::Parser;
use std::path::PathBuf;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "settle",
    disable_help_subcommand = true,
    about = "Offline, deterministic settlement CLI: stage snapshot in, JSON report out"
)]
pub struct Args {
    /// Stage snapshot JSON path (stage + groups + members + rankings rows).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Optional reward-policy override JSON ({"shares":[..],"defaultShare":x}).
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Pretty-print the report JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Validate the snapshot only (load + shape/domain checks), do not score.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress non-essential stderr diagnostics.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "non-local path not allowed: {p}"),
        }
    }
}

/// Parse argv and apply the offline-path policy.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    check_local(&args.snapshot)?;
    if let Some(policy) = &args.policy {
        check_local(policy)?;
    }
    Ok(args)
}

fn check_local(path: &PathBuf) -> Result<(), CliError> {
    let shown = path.to_string_lossy();
    if se_io::looks_like_url_strict(&shown) {
        return Err(CliError::NonLocalPath(shown.into_owned()));
    }
    Ok(())
}
