//! Workspace resolution: locating the solution file whose directory anchors
//! the cleanup root.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Solution manifest extensions recognized during discovery.
const SOLUTION_EXTENSIONS: &[&str] = &["sln", "slnx"];

/// Narrow view of the hosting environment: the currently open solution file,
/// if any. The cleaner itself never queries the environment directly.
pub trait Workspace {
    /// Full path of the open solution file, or `None` when no solution is
    /// open or discoverable.
    fn solution_path(&self) -> Option<PathBuf>;
}

/// No solution file is open or discoverable; cleanup never starts.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no solution file found")]
pub struct NoSolutionFound;

/// Derive the cleanup root from the workspace's solution file.
///
/// Derivation is purely lexical: the parent directory of the reported path.
/// A solution file that no longer exists on disk still resolves; the walk
/// itself reports an unreadable root. An absent, empty, or parentless path
/// fails with [`NoSolutionFound`]. No filesystem access happens here.
pub fn resolve_root(workspace: &dyn Workspace) -> Result<PathBuf, NoSolutionFound> {
    let solution = workspace
        .solution_path()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(NoSolutionFound)?;

    solution
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or(NoSolutionFound)
}

/// Workspace pinned to an explicitly chosen solution file.
pub struct PinnedWorkspace {
    solution: PathBuf,
}

impl PinnedWorkspace {
    pub fn new(solution: PathBuf) -> Self {
        PinnedWorkspace { solution }
    }
}

impl Workspace for PinnedWorkspace {
    fn solution_path(&self) -> Option<PathBuf> {
        Some(self.solution.clone())
    }
}

/// Workspace discovered from a start directory, standing in for "the
/// currently open solution": the nearest ancestor containing a solution
/// manifest wins.
pub struct DiskWorkspace {
    start: PathBuf,
}

impl DiskWorkspace {
    pub fn new(start: PathBuf) -> Self {
        DiskWorkspace { start }
    }
}

impl Workspace for DiskWorkspace {
    fn solution_path(&self) -> Option<PathBuf> {
        for dir in self.start.ancestors() {
            if let Some(solution) = solution_file_in(dir) {
                return Some(solution);
            }
        }
        None
    }
}

/// Find a solution manifest directly inside `dir`. When several are present
/// the lexicographically first is chosen, so repeated runs agree.
fn solution_file_in(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;

    let mut manifests: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_solution_extension(path))
        .collect();

    manifests.sort();
    manifests.into_iter().next()
}

fn has_solution_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOLUTION_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
