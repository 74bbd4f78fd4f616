//! Recursive, fault-tolerant removal of build-output directories.
//!
//! `clean` enumerates every directory below a root before deleting anything,
//! removes each one whose base name matches the target set, and records a
//! per-directory result instead of failing mid-walk. Only a root that cannot
//! be read at all is a hard error.

use crate::targets::is_target_dir;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Why a matched directory was left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    /// A contained file is open or otherwise busy in another process.
    Locked,
    /// Insufficient permissions to remove the directory or its contents.
    Denied,
    /// Any other removal failure; the walk continues regardless.
    Unclassified,
}

impl SkipKind {
    pub fn label(&self) -> &'static str {
        match self {
            SkipKind::Locked => "locked",
            SkipKind::Denied => "access denied",
            SkipKind::Unclassified => "error",
        }
    }
}

/// Result of one removal attempt.
#[derive(Debug)]
pub enum Removal {
    /// The directory and its entire contents were removed.
    /// `bytes` is the best-effort size of the removed subtree.
    Deleted { path: PathBuf, bytes: u64 },
    /// Removal failed; the directory (or part of it) is still on disk.
    Skipped {
        path: PathBuf,
        kind: SkipKind,
        reason: String,
    },
}

impl Removal {
    pub fn path(&self) -> &Path {
        match self {
            Removal::Deleted { path, .. } => path,
            Removal::Skipped { path, .. } => path,
        }
    }
}

/// Per-invocation record of every matched directory, in the order the
/// traversal first encountered it.
#[derive(Debug, Default)]
pub struct CleanupOutcome {
    pub removals: Vec<Removal>,
}

impl CleanupOutcome {
    pub fn deleted_count(&self) -> usize {
        self.removals
            .iter()
            .filter(|r| matches!(r, Removal::Deleted { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.removals
            .iter()
            .filter(|r| matches!(r, Removal::Skipped { .. }))
            .count()
    }

    /// Total size of the removed subtrees, as measured just before removal.
    pub fn bytes_reclaimed(&self) -> u64 {
        self.removals
            .iter()
            .map(|r| match r {
                Removal::Deleted { bytes, .. } => *bytes,
                Removal::Skipped { .. } => 0,
            })
            .sum()
    }

    /// True when nothing was skipped (including when nothing matched at all).
    pub fn is_clean(&self) -> bool {
        self.skipped_count() == 0
    }
}

/// Invocation-level failure: the cleanup produced no outcome.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The root itself does not exist or cannot be enumerated.
    #[error("cannot read cleanup root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Remove every `bin`/`obj` directory below `root`.
///
/// Per-directory failures are recorded in the returned [`CleanupOutcome`]
/// and never abort the walk. Running twice in succession is safe; the second
/// run finds nothing to remove.
pub fn clean(root: &Path) -> Result<CleanupOutcome, CleanError> {
    let candidates = snapshot_directories(root)?;

    let mut outcome = CleanupOutcome::default();
    let mut deleted_roots: Vec<PathBuf> = Vec::new();

    for dir in candidates {
        // Children of a removed match are gone as part of their parent and
        // must not be re-reported.
        if deleted_roots.iter().any(|removed| dir.starts_with(removed)) {
            continue;
        }

        if !is_target_dir(&dir) {
            continue;
        }

        // The snapshot can outlive the tree: another process may have removed
        // the directory in the meantime. Nothing to do then.
        match fs::symlink_metadata(&dir) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            _ => {}
        }

        let bytes = subtree_size(&dir);

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                outcome.removals.push(Removal::Deleted {
                    path: dir.clone(),
                    bytes,
                });
                deleted_roots.push(dir);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                // Vanished between the metadata check and the removal; the
                // subtree is gone either way.
                outcome.removals.push(Removal::Deleted {
                    path: dir.clone(),
                    bytes,
                });
                deleted_roots.push(dir);
            }
            Err(err) => {
                outcome.removals.push(Removal::Skipped {
                    path: dir,
                    kind: classify_removal_error(&err),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

/// Enumerate every directory strictly below `root`, parents before children.
///
/// Symlinks are not followed and are never reported as directories.
/// Unreadable subtrees are fail-open: whatever could not be listed is simply
/// absent from the snapshot, while the unreadable directory entry itself is
/// still present via its parent's listing.
fn snapshot_directories(root: &Path) -> Result<Vec<PathBuf>, CleanError> {
    // Probe the root eagerly so a missing or unreadable root is a hard
    // error rather than an empty walk.
    fs::read_dir(root).map_err(|source| CleanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}

/// Best-effort size of a subtree, measured without following symlinks.
/// Anything unreadable counts as zero.
fn subtree_size(path: &Path) -> u64 {
    let mut total = 0u64;

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    for entry in entries.flatten() {
        let entry_path = entry.path();
        if let Ok(metadata) = fs::symlink_metadata(&entry_path) {
            if metadata.is_file() {
                total += metadata.len();
            } else if metadata.is_dir() {
                total += subtree_size(&entry_path);
            }
        }
    }

    total
}

/// Map a removal failure onto the skip taxonomy.
fn classify_removal_error(err: &io::Error) -> SkipKind {
    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => SkipKind::Denied,
        io::ErrorKind::ResourceBusy => SkipKind::Locked,
        _ if is_sharing_violation(err) => SkipKind::Locked,
        _ => SkipKind::Unclassified,
    }
}

// ERROR_SHARING_VIOLATION and ERROR_LOCK_VIOLATION: a contained file is open
// in another process. These surface with an unhelpful generic kind.
#[cfg(windows)]
fn is_sharing_violation(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(32 | 33))
}

#[cfg(not(windows))]
fn is_sharing_violation(_err: &io::Error) -> bool {
    false
}
