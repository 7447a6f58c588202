//! Directory tree scanning.
//!
//! Walks one side of a merge and produces the flat, virtual-path-sorted
//! sequence of [`PathUnit`]s the alignment stage consumes. Directories and
//! files both become units; the root itself does not. Symlinks and other
//! special files are skipped.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::merge::PathUnit;

/// Error type for tree scanning.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root is not an existing directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Filesystem error while walking the tree.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for tree scanning.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Scan the tree rooted at `root` into sorted path units.
pub async fn scan_tree(root: &Path) -> Result<Vec<PathUnit>> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut units = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut read_dir = fs::read_dir(&dir).await.map_err(|source| ScanError::Io {
            path: dir.clone(),
            source,
        })?;

        loop {
            let entry = read_dir
                .next_entry()
                .await
                .map_err(|source| ScanError::Io {
                    path: dir.clone(),
                    source,
                })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|source| ScanError::Io {
                    path: path.clone(),
                    source,
                })?;

            if file_type.is_dir() {
                units.push(PathUnit::from_base(&path, root));
                pending.push(path);
            } else if file_type.is_file() {
                units.push(PathUnit::from_base(&path, root));
            }
            // Symlinks and other special files are skipped.
        }
    }

    units.sort_by(|a, b| a.virtual_path().cmp(b.virtual_path()));
    tracing::debug!(root = %root.display(), units = units.len(), "scanned tree");
    Ok(units)
}
