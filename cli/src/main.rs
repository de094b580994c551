//! CLI for track-issues.
//!
//! Mirrors the open issues assigned to a set of users, across any number of
//! repositories and organizations, into tracking issues in one repository.

use clap::Parser;
use std::path::PathBuf;
use std::process::{Command, ExitCode};
use track_issues::{
    parse_comma_list, RepositoryName, RunSummary, Runner, RunnerConfig, RunnerError,
    TrackerConfig,
};
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Track assigned GitHub issues in a single repository.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a tracker.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated list of GitHub usernames.
    #[arg(long)]
    users: Option<String>,

    /// Comma-separated list of organizations.
    #[arg(long)]
    orgs: Option<String>,

    /// Results per page (1-100, default 100).
    #[arg(long)]
    per_page: Option<u32>,

    /// Number of pages to fetch (default 10).
    #[arg(long)]
    page_limit: Option<u32>,

    /// Tracking repository in "owner/name" form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// GitHub API token.
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    token: String,

    /// Label attached to tracking issues (default "tracked-issue").
    #[arg(long)]
    label: Option<String>,

    /// Comment posted on tracking issues when closing them.
    #[arg(long)]
    close_comment: Option<String>,

    /// Preview changes without creating or closing issues.
    #[arg(long)]
    dry_run: bool,

    /// Maximum concurrent write requests.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Log level comes from `RUST_LOG` and falls back to "info".
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let file_config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };

    let overrides = TrackerConfig {
        users: args.users.as_deref().map(parse_comma_list).unwrap_or_default(),
        organizations: args.orgs.as_deref().map(parse_comma_list).unwrap_or_default(),
        per_page: args.per_page,
        page_limit: args.page_limit,
        repository: args.repository,
        label: args.label,
        close_comment: args.close_comment,
        ..Default::default()
    };

    let mut config = file_config.merge(overrides);
    if config.repository.is_none() {
        config.repository = repository_from_git_remote().map(|repo| repo.full_name());
    }

    let runner_config = RunnerConfig::from_tracker_config(&config)?
        .with_dry_run(args.dry_run)
        .with_concurrency(args.concurrency);

    let runner = Runner::new(runner_config, &args.token)?;
    runner.run().await
}

/// Reads the tracking repository from the `origin` remote of the current
/// directory.
fn repository_from_git_remote() -> Option<RepositoryName> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .map_err(|e| warn!(error = %e, "Failed to run git"))
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let remote = String::from_utf8_lossy(&output.stdout);
    let repository = RepositoryName::from_remote_url(&remote);
    if repository.is_none() {
        warn!(remote = %remote.trim(), "Origin remote is not a GitHub repository");
    }
    repository
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Assigned issues: {}", summary.source_issues);
    println!("  Tracking issues: {}", summary.tracking_issues);

    if summary.dry_run {
        println!("  Would create: {}", summary.planned_creates);
        println!("  Would close: {}", summary.planned_closes);
    } else {
        println!("  Created: {}", summary.created);
        println!("  Create failures: {}", summary.create_failed);
        println!("  Closed: {}", summary.closed);
        println!("  Close failures: {}", summary.close_failed);
    }

    for warning in &summary.warnings {
        println!("  Warning: {warning}");
    }

    for failure in &summary.failures {
        match failure.tracking_number {
            Some(number) => println!(
                "  Failed to {} #{} ({}): {}",
                failure.kind, number, failure.source, failure.error
            ),
            None => println!(
                "  Failed to {} tracker for {}: {}",
                failure.kind, failure.source, failure.error
            ),
        }
    }
}
