//! Path utilities for walking on-disk package trees.
//!
//! Provides lexical normalization for `local:` dependency paths and the
//! cache-root computation that keeps nested dependencies in one flat `deps/`.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Directory holding installed dependencies under a project root
pub const DEPS_DIR: &str = "deps";

/// Normalize a path by resolving . and .. components lexically
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {
                // Skip current directory
            },
            Utf8Component::ParentDir => match components.last() {
                Some(Utf8Component::Normal(_)) => {
                    components.pop();
                },
                // `..` directly under the root stays at the root
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {},
                // Leading `..` of a relative path is kept
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }

    components.iter().map(|c| c.as_str()).collect()
}

/// Strip trailing `deps/<name>` and `deps/@org/<name>` segments.
///
/// `/proj/deps/@org/lib/deps/zlib` maps to `/proj`, so every nested
/// dependency resolves against the same flat cache.
pub fn cache_root(path: &Utf8Path) -> Utf8PathBuf {
    let mut current = normalize_path(path);

    loop {
        let Some(parent) = current.parent() else {
            break;
        };

        let stripped = if parent.file_name() == Some(DEPS_DIR) {
            parent.parent()
        } else if parent.file_name().is_some_and(|org| org.starts_with('@')) {
            parent
                .parent()
                .filter(|deps| deps.file_name() == Some(DEPS_DIR))
                .and_then(Utf8Path::parent)
        } else {
            None
        };

        match stripped {
            Some(root) => current = root.to_path_buf(),
            None => break,
        }
    }

    current
}
