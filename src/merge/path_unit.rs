//! Path unit value type.
//!
//! A `PathUnit` represents one filesystem entry from one side of a merge:
//! its real on-disk location plus a normalized virtual path used purely for
//! ordering and comparison.

use std::path::{Path, PathBuf};

// =============================================================================
// PathRelation
// =============================================================================

/// The relation between two path units, derived from their virtual paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRelation {
    /// Self sorts strictly before the other and is not nested under it.
    Less,
    /// The other unit is nested under self (self is a strict ancestor).
    AncestorOf,
    /// Both virtual paths are identical.
    Equal,
    /// Self is nested under the other (the other is a strict ancestor).
    DescendantOf,
    /// Self sorts strictly after the other and is not nested under it.
    Greater,
}

// =============================================================================
// PathUnit
// =============================================================================

/// One filesystem entry from one side of a merge.
///
/// Units are compared solely on `virtual_path` using ordinary lexicographic
/// string order on the full string. Nesting detection is a plain string-prefix
/// test, not separator-aware: sibling names where one is a literal prefix of
/// the other (`foo` and `foobar`) are classified as nested. This matches the
/// behavior the rest of the pipeline is built on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUnit {
    original_path: PathBuf,
    virtual_path: String,
}

impl PathUnit {
    /// Create a unit from an explicit original path and virtual path.
    pub fn new(original_path: impl Into<PathBuf>, virtual_path: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            virtual_path: virtual_path.into(),
        }
    }

    /// Create a unit from a real path under a base directory.
    ///
    /// The virtual path is the remainder after stripping the base prefix,
    /// normalized to `/`-separated form with no leading separator.
    pub fn from_base(original_path: impl Into<PathBuf>, base: &Path) -> Self {
        let original_path = original_path.into();
        debug_assert!(
            original_path.starts_with(base),
            "path {} is not under base {}",
            original_path.display(),
            base.display()
        );
        let relative = original_path.strip_prefix(base).unwrap_or(&original_path);
        let virtual_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self {
            original_path,
            virtual_path,
        }
    }

    /// The real location of this entry.
    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    /// The virtual path used for ordering and comparison.
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// The virtual path of this unit's parent directory, or `""` for a
    /// top-level entry.
    pub fn parent_virtual_path(&self) -> &str {
        match self.virtual_path.rfind('/') {
            Some(idx) => &self.virtual_path[..idx],
            None => "",
        }
    }

    /// Compute the relation between this unit and another.
    pub fn relation_to(&self, other: &PathUnit) -> PathRelation {
        if self.virtual_path == other.virtual_path {
            PathRelation::Equal
        } else if self.virtual_path.starts_with(&other.virtual_path) {
            PathRelation::DescendantOf
        } else if other.virtual_path.starts_with(&self.virtual_path) {
            PathRelation::AncestorOf
        } else if self.virtual_path > other.virtual_path {
            PathRelation::Greater
        } else {
            PathRelation::Less
        }
    }
}
