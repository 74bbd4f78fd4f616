//! Build-output directory names and matching.

use std::path::Path;

/// Directory names removed by the cleaner. Fixed for the process lifetime;
/// membership is case-insensitive.
pub const TARGET_DIR_NAMES: &[&str] = &["bin", "obj"];

/// Check whether a directory base name is one of the target names.
///
/// Comparison is ASCII case-insensitive and whole-name only: `Bin` and `OBJ`
/// match, `bindings` and `objects` do not.
pub fn is_target_dir_name(name: &str) -> bool {
    TARGET_DIR_NAMES
        .iter()
        .any(|target| name.eq_ignore_ascii_case(target))
}

/// Check whether a path's final segment is a target directory name.
///
/// Only the base name is inspected; a path like `bin/release` does not match.
/// Non-UTF-8 names never match (the target names are plain ASCII).
pub fn is_target_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_target_dir_name)
}
