//! Path helpers shared by `ls` and the delete workflow.

use crate::maintenance::{ListingResult, PathEntry};

pub const SEPARATOR: char = '/';

/// The prefix every child of `root` carries: `root` with exactly one trailing separator.
pub fn common_prefix(root: &str) -> String {
    format!("{}{SEPARATOR}", root.trim_end_matches(SEPARATOR))
}

/// Strip a prefix from the given path safely. Returns the original if strip fails.
pub fn strip_prefix_safe<'a>(path: &'a str, prefix: &str) -> &'a str {
    path.strip_prefix(prefix).unwrap_or(path)
}

/// Rewrite each entry path of a listing of `root` relative to `root`.
///
/// The input listing is left untouched; a new sequence in the same order is returned.
pub fn normalize(root: &str, listing: &[PathEntry]) -> ListingResult {
    let prefix = common_prefix(root);
    listing
        .iter()
        .map(|entry| PathEntry {
            path: strip_prefix_safe(&entry.path, &prefix).to_string(),
            ..entry.clone()
        })
        .collect()
}

/// Fully-qualified path of a child entry of `root`, without trailing separator.
///
/// Listings normally carry full paths already; relative ones are joined onto `root`.
pub fn qualify(root: &str, entry_path: &str) -> String {
    let entry = entry_path.trim_end_matches(SEPARATOR);
    let prefix = common_prefix(root);
    let bare_prefix = prefix.trim_start_matches(SEPARATOR);

    if entry.starts_with(&prefix) || entry.trim_start_matches(SEPARATOR).starts_with(bare_prefix) {
        entry.to_string()
    } else {
        format!("{prefix}{}", entry.trim_start_matches(SEPARATOR))
    }
}
