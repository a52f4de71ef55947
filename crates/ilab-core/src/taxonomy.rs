//! Taxonomy tree reader
//!
//! Lists the first-level directories of a category inside the local taxonomy
//! checkout. Read-only; the checkout itself is managed elsewhere.

use std::path::{Component, Path, PathBuf};

use crate::error::{ProxyError, ProxyResult};

pub const SKILLS_DIR: &str = "compositional_skills";
pub const KNOWLEDGE_DIR: &str = "knowledge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyCategory {
    Skills,
    Knowledge,
}

impl TaxonomyCategory {
    /// `"skills"` selects compositional skills; anything else is knowledge.
    pub fn from_root_path(root_path: &str) -> Self {
        if root_path == "skills" {
            Self::Skills
        } else {
            Self::Knowledge
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Skills => SKILLS_DIR,
            Self::Knowledge => KNOWLEDGE_DIR,
        }
    }
}

/// Resolve `<taxonomy>/<category>/<dir_name>`, refusing anything that could
/// escape the category directory.
pub fn resolve_tree_path(
    taxonomy_dir: &Path,
    category: TaxonomyCategory,
    dir_name: &str,
) -> ProxyResult<PathBuf> {
    let relative = Path::new(dir_name);
    let disallowed =
        relative.components().find(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if let Some(bad) = disallowed {
        return Err(ProxyError::InvalidPath(format!(
            "'{dir_name}' contains a disallowed component ({bad:?})"
        )));
    }

    Ok(taxonomy_dir.join(category.dir_name()).join(relative))
}

/// Names of the immediate subdirectories of `path`, sorted.
///
/// Symlinks are followed; entries whose metadata cannot be read are skipped.
pub async fn list_first_level_directories(path: &Path) -> ProxyResult<Vec<String>> {
    let filesystem_error = |source: std::io::Error| {
        tracing::error!("Error reading directory {}: {}", path.display(), source);
        ProxyError::Filesystem { message: "Failed to get the tree for path".to_string(), source }
    };

    let mut entries = tokio::fs::read_dir(path).await.map_err(filesystem_error)?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(filesystem_error)? {
        let is_dir = match tokio::fs::metadata(entry.path()).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) => {
                tracing::debug!("Skipping {}: {}", entry.path().display(), e);
                false
            },
        };
        if is_dir {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}
