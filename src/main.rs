//! unclog - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use unclog::changelog::writer::generate_summary;
use unclog::check::{check_branch, check_fragment_env};
use unclog::config::{CONFIG_DIR, RepoConfig, resolve_sections};
use unclog::release::{build_release, run_release};
use unclog::{Git2History, ReleaseConfig};

/// Assemble a release changelog from per-commit fragment files.
#[derive(Parser, Debug)]
#[command(name = "unclog")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate changelog fragments before merging
    Check(CheckArgs),
    /// Generate the changelog for a new release tag
    Release(ReleaseArgs),
}

#[derive(Args, Debug)]
struct RepoArgs {
    /// Path to the git repository (defaults to the current directory)
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Directory containing changelog fragments, relative to the repository
    #[arg(long = "changelog-dir", default_value = CONFIG_DIR)]
    changelog_dir: String,

    /// Allowed section, in rendering order (repeatable; overrides .unclog.yaml)
    #[arg(long = "section")]
    sections: Vec<String>,
}

impl RepoArgs {
    fn repo_path(&self) -> Result<PathBuf> {
        match &self.repo {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir()
                .context("repo flag not set and the working directory is unavailable"),
        }
    }

    fn explicit_sections(&self) -> Option<&[String]> {
        (!self.sections.is_empty()).then_some(self.sections.as_slice())
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    repo: RepoArgs,

    /// Main branch tip revision; the branch must be based on this commit
    /// (rebase first if the main branch has moved on)
    #[arg(long = "main-rev", default_value = "origin/develop")]
    main_rev: String,

    /// Branch tip revision
    #[arg(long, default_value = "HEAD")]
    branch: String,

    /// Environment variable holding a newline-separated list of fragment files
    #[arg(long = "fragment-env")]
    fragment_env: Option<String>,
}

#[derive(Args, Debug)]
struct ReleaseArgs {
    #[command(flatten)]
    repo: RepoArgs,

    /// New release tag (must already exist in the repository unless --tip is set)
    #[arg(long)]
    tag: String,

    /// Revision the release starts after (defaults to the previous changelog version)
    #[arg(long)]
    base: Option<String>,

    /// Revision the release ends at (defaults to --tag)
    #[arg(long)]
    tip: Option<String>,

    /// Current changelog, relative to the repository
    #[arg(long = "prev", default_value = "CHANGELOG.md")]
    previous: PathBuf,

    /// Output file, relative to the repository (defaults to --prev)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Remove the fragment files after generating the changelog
    #[arg(long)]
    cleanup: bool,

    /// Release date as YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// GitHub owner used for links
    #[arg(long, default_value = "prysmaticlabs")]
    owner: String,

    /// GitHub repository name used for links
    #[arg(long = "repo-name", default_value = "prysm")]
    repo_name: String,

    /// Print the changelog instead of writing it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Release(args) => run_release_command(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "unclog=debug" } else { "unclog=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(args: CheckArgs) -> Result<()> {
    let repo_path = args.repo.repo_path()?;
    let sections = resolve_sections(args.repo.explicit_sections(), &repo_path)
        .context("Failed to load section configuration")?;

    if let Some(env_var) = &args.fragment_env {
        let checked = check_fragment_env(env_var, &sections)?;
        println!("✓ {} fragment(s) valid", checked.len());
        return Ok(());
    }

    let history = Git2History::open(&repo_path)
        .context("Not a git repository. Run unclog from within a git repository or pass --repo.")?;
    let fragments = check_branch(
        &history,
        &args.repo.changelog_dir,
        &args.main_rev,
        &args.branch,
        &sections,
    )?;

    for fragment in &fragments {
        println!("found fragment path: {}", fragment.path);
    }
    Ok(())
}

fn run_release_command(args: ReleaseArgs) -> Result<()> {
    if args.tag.trim().is_empty() {
        bail!("tag is required");
    }

    let repo_path = args.repo.repo_path()?;
    let history = Git2History::open(&repo_path)
        .context("Not a git repository. Run unclog from within a git repository or pass --repo.")?;

    let config = ReleaseConfig {
        changes_dir: args.repo.changelog_dir.clone(),
        base: args.base,
        tip: args.tip,
        previous_path: args.previous,
        output_path: args.output,
        cleanup: args.cleanup && !args.dry_run,
        release_date: args.date.unwrap_or_else(|| Utc::now().date_naive()),
        sections: args.repo.explicit_sections().map(<[String]>::to_vec),
        repo: RepoConfig {
            owner: args.owner,
            repo: args.repo_name,
        },
        ..ReleaseConfig::new(repo_path, args.tag)
    };

    if args.dry_run {
        let output = build_release(&history, &config).context("Failed to build release")?;
        println!("{}", output.body);
        return Ok(());
    }

    let report = run_release(&history, &config).context("Failed to generate changelog")?;
    println!(
        "✓ {} for {} written to {}",
        generate_summary(&report.output.entries, &report.output.sections),
        config.tag,
        report.written_to.display()
    );
    if !report.removed.is_empty() {
        println!("✓ Removed {} fragment file(s)", report.removed.len());
    }
    Ok(())
}
