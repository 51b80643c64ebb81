use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// One immediate subdirectory the command runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Entry name relative to the root, as shown in headers.
    pub name: String,
    /// Working directory handed to the child.
    pub path: PathBuf,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveOptions {
    pub skip_hidden: bool,
}

/// Immediate child directories of `root`, sorted by name.
///
/// Symlinks are followed: a link to a directory is a target, a dangling link
/// or a link to a file is not.
pub fn resolve_targets(root: &Path, options: ResolveOptions) -> Result<Vec<Target>> {
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("failed to list {}", root.display()))?;

    let mut targets = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", root.display()))?;
        let path = entry.path();
        // fs::metadata follows symlinks; errors mean a dangling link
        let is_dir = std::fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        let file_name = entry.file_name();
        if options.skip_hidden && file_name.as_encoded_bytes().starts_with(b".") {
            continue;
        }

        targets.push((file_name, path));
    }

    targets.sort_by(|a, b| a.0.cmp(&b.0));
    log::debug!("resolved {} targets in {}", targets.len(), root.display());

    Ok(targets
        .into_iter()
        .map(|(name, path)| Target {
            name: name.to_string_lossy().into_owned(),
            path,
        })
        .collect())
}
