use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_bump::classify::ConventionalClassifier;
use git_bump::cli::{run_pipeline, RunRequest};
use git_bump::config;
use git_bump::git::Git2Repository;
use git_bump::policy::SdkVerBump;
use git_bump::publish::ReleaseMode;
use git_bump::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-bump",
    version,
    about = "Compute the next version from conventional commits and publish it"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, default_value = "HEAD", help = "Revision to compute the version for")]
    head: String,

    #[arg(short, long, help = "Branch the run is for [default: current branch]")]
    branch: Option<String>,

    #[arg(long, default_value = "none", help = "What to publish: none, tag or release")]
    release_mode: ReleaseMode,

    #[arg(long, default_value = "dev", help = "Requested SdkVer bump: rel, rc or dev")]
    bump: SdkVerBump,

    #[arg(long, help = "Run in pull-request context; never publishes")]
    pull_request: bool,

    #[arg(long, help = "Discussion category for created releases")]
    discussion_category: Option<String>,

    #[arg(long, help = "Release body instead of the generated commit list")]
    release_notes: Option<String>,

    #[arg(long, help = "Print the report as JSON")]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let repo = Git2Repository::open(".").context("Git repository error")?;

    let branch = match args.branch {
        Some(branch) => branch,
        None => repo
            .current_branch()?
            .context("HEAD is detached; pass --branch explicitly")?,
    };

    let request = RunRequest {
        head: args.head,
        branch,
        is_pull_request: args.pull_request,
        release_mode: args.release_mode,
        sdkver_bump: args.bump,
        discussion_category: args.discussion_category,
        release_notes: args.release_notes,
    };

    let report = run_pipeline(&config, &repo, &repo, &ConventionalClassifier::new(), &request)?;

    if args.json {
        ui::print_json(&report)?;
    } else {
        ui::print_report(&report)?;
    }
    Ok(())
}
