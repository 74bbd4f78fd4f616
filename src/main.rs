use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use binsweep::cleaner::{self, CleanupOutcome};
use binsweep::report::{ConsoleNotifier, Notifier};
use binsweep::workspace::{resolve_root, DiskWorkspace, PinnedWorkspace, Workspace};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove bin and obj build output directories beneath a solution root",
    long_about = None
)]
struct Args {
    /// Directory to search upward from for a solution file (defaults to the
    /// current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Clean the tree of this solution file instead of discovering one
    #[arg(long, short)]
    solution: Option<PathBuf>,

    /// List each directory as it is removed
    #[arg(long, short)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(PathBuf, CleanupOutcome)> {
    let workspace: Box<dyn Workspace> = match &args.solution {
        Some(solution) => Box::new(PinnedWorkspace::new(solution.clone())),
        None => Box::new(DiskWorkspace::new(args.path.clone())),
    };

    let root = resolve_root(workspace.as_ref()).with_context(|| match &args.solution {
        Some(solution) => format!("resolving {}", solution.display()),
        None => format!(
            "searching for a solution at or above {}",
            args.path.display()
        ),
    })?;

    let outcome = cleaner::clean(&root)
        .with_context(|| format!("cleaning below {}", root.display()))?;

    Ok((root, outcome))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let notifier = ConsoleNotifier::new(args.verbose);

    match run(&args) {
        Ok((root, outcome)) => {
            notifier.cleaned(&root, &outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            notifier.failed(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
