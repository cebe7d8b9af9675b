use std::path::{Component, Path, PathBuf};

use crate::http::mime::{self, ContentType};

/// A requested path mapped onto the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub absolute_path: PathBuf,
    /// True when `absolute_path` is a regular file. Always true for the
    /// front page.
    pub exists: bool,
    pub content_type: ContentType,
}

impl ResolvedTarget {
    /// Resolves `requested_path` (leading `/` already stripped) under
    /// `document_root`.
    ///
    /// Paths that could escape the root (`..`, absolute or prefixed
    /// components) resolve as missing.
    pub fn resolve(document_root: &Path, requested_path: &str) -> Self {
        let content_type = mime::resolve(requested_path);
        let absolute_path = document_root.join(requested_path);

        let exists = if requested_path.is_empty() {
            true
        } else if !stays_under_root(requested_path) {
            tracing::warn!(path = requested_path, "Rejected path outside document root");
            false
        } else {
            absolute_path.is_file()
        };

        Self {
            absolute_path,
            exists,
            content_type,
        }
    }
}

fn stays_under_root(requested_path: &str) -> bool {
    Path::new(requested_path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
