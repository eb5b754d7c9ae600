//! Slash-delimited path helpers for the virtual content tree.
//!
//! Workspace paths are relative, `/`-separated strings with no leading or
//! trailing slash (`"notebooks/data/sample.csv"`). The empty string is the
//! tree root.

/// Splits a path into its segments. The root path has no segments.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Joins a parent path and a child name. Joining onto the root yields the
/// bare name.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Returns the parent path, or the root (`""`) for a single-segment path.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Returns the final segment of a path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Strips a leading `prefix/` from `path`. Returns the path unchanged when it
/// does not live under `prefix`.
pub fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_root_and_nested() {
        assert!(split("").is_empty());
        assert_eq!(split("a"), vec!["a"]);
        assert_eq!(split("a/b/c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn join_onto_root_is_bare_name() {
        assert_eq!(join("", "notebooks"), "notebooks");
        assert_eq!(join("notebooks", "intro.ipynb"), "notebooks/intro.ipynb");
    }

    #[test]
    fn parent_of_single_segment_is_root() {
        assert_eq!(parent("notebooks"), "");
        assert_eq!(parent("notebooks/data/sample.csv"), "notebooks/data");
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(file_name("intro.ipynb"), "intro.ipynb");
        assert_eq!(file_name("docs/01_intro.ipynb"), "01_intro.ipynb");
    }

    #[test]
    fn strip_prefix_removes_leading_dir() {
        assert_eq!(strip_prefix("docs/01_intro.ipynb", "docs"), "01_intro.ipynb");
        assert_eq!(strip_prefix("docs/a/b.ipynb", "docs"), "a/b.ipynb");
        assert_eq!(strip_prefix("other/b.ipynb", "docs"), "other/b.ipynb");
        assert_eq!(strip_prefix("b.ipynb", ""), "b.ipynb");
    }
}
