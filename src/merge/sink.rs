//! Conflict resolution for passing aligned pairs.
//!
//! The sink turns each passing pair into zero or more physical actions
//! (copy a file, create a directory) under a target root. It performs no I/O
//! itself; file length and modification time come from a [`FileFacts`]
//! capability and the actions are applied by a separate executor.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::merge::align::AlignedPair;
use crate::merge::error::{MergeError, Result};
use crate::merge::path_unit::PathUnit;

// =============================================================================
// Configuration Modes
// =============================================================================

/// How a same-path file/file conflict is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictMode {
    /// Always keep the left side.
    TakeLeft,
    /// Always keep the right side.
    TakeRight,
    /// Keep the more recently modified side; ties go to the left.
    TakeNewer,
    /// Keep the side with the greater byte length; ties go to the left.
    TakeLarger,
    /// Keep both sides under disambiguated names.
    KeepBoth,
    /// Ask a prompt callback which side(s) to keep and under what names.
    Prompt,
}

/// Which directory to materialize when both sides are directory placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSelectMode {
    /// Create nothing.
    Neither,
    /// Create the higher-level (shorter-path) directory.
    Shallower,
    /// Create the deeper (longer-path) directory.
    Deeper,
}

/// What to materialize when one side is a file and the other a directory
/// placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDirSelectMode {
    /// Materialize nothing.
    Neither,
    /// Copy the file side only.
    File,
    /// Create the directory side only.
    Directory,
}

/// Which side of a conflict a derived name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

// =============================================================================
// Action
// =============================================================================

/// A physical action decided for one aligned pair, applied by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Copy the file at `source` to `target`, overwriting.
    CopyFile { source: PathBuf, target: PathBuf },
    /// Create the directory at `target` (and any missing parents).
    CreateDir { target: PathBuf },
}

// =============================================================================
// FileFacts
// =============================================================================

/// Filesystem facts the sink needs about a unit's real path.
pub trait FileFacts {
    /// Whether the path is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
    /// Byte length of the file at the path.
    fn len(&self, path: &Path) -> std::io::Result<u64>;
    /// Last modification time of the file at the path.
    fn modified(&self, path: &Path) -> std::io::Result<SystemTime>;
}

/// [`FileFacts`] backed by the real filesystem.
pub struct FsFacts;

impl FileFacts for FsFacts {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn len(&self, path: &Path) -> std::io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn modified(&self, path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

// =============================================================================
// ConflictPrompt
// =============================================================================

/// Collaborator consulted in [`ConflictMode::Prompt`].
///
/// Returns the target path to materialize each side at; `None` for a side
/// means "skip that side". The call is synchronous and blocking.
pub trait ConflictPrompt {
    fn resolve(
        &self,
        left: &PathUnit,
        right: &PathUnit,
        target_base: &Path,
    ) -> (Option<PathBuf>, Option<PathBuf>);
}

// =============================================================================
// Target path helpers
// =============================================================================

/// The target path for a unit's virtual path under a target root.
pub fn target_path(target_base: &Path, virtual_path: &str) -> PathBuf {
    let mut path = target_base.to_path_buf();
    path.extend(virtual_path.split('/'));
    path
}

/// A disambiguated target path for one side of a keep-both conflict.
///
/// Inserts `left`/`right` before the extension: `a/report.pdf` becomes
/// `a/report.left.pdf`, and an extension-less `notes` becomes `notes.left`.
pub fn disambiguated_target(target_base: &Path, virtual_path: &str, side: Side) -> PathBuf {
    let (dir, name) = match virtual_path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, virtual_path),
    };
    let tag = match side {
        Side::Left => "left",
        Side::Right => "right",
    };
    let tagged = match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}.{tag}.{ext}"),
        None => format!("{name}.{tag}"),
    };
    let mut path = target_base.to_path_buf();
    if let Some(dir) = dir {
        path.extend(dir.split('/'));
    }
    path.push(tagged);
    path
}

// =============================================================================
// MergeSink
// =============================================================================

/// Decides the physical actions for each passing aligned pair.
pub struct MergeSink {
    conflict_mode: ConflictMode,
    dir_select: DirSelectMode,
    file_dir_select: FileDirSelectMode,
    target_base: PathBuf,
    prompt: Option<Box<dyn ConflictPrompt + Send + Sync>>,
}

impl MergeSink {
    /// Create a sink with a non-interactive conflict mode.
    ///
    /// Fails fast with [`MergeError::PromptRequired`] if `conflict_mode` is
    /// [`ConflictMode::Prompt`]; use [`MergeSink::with_prompt`] for that.
    pub fn new(
        conflict_mode: ConflictMode,
        dir_select: DirSelectMode,
        file_dir_select: FileDirSelectMode,
        target_base: impl Into<PathBuf>,
    ) -> Result<Self> {
        if conflict_mode == ConflictMode::Prompt {
            return Err(MergeError::PromptRequired);
        }
        Ok(Self {
            conflict_mode,
            dir_select,
            file_dir_select,
            target_base: target_base.into(),
            prompt: None,
        })
    }

    /// Create a sink that resolves file conflicts through a prompt callback.
    pub fn with_prompt(
        prompt: Box<dyn ConflictPrompt + Send + Sync>,
        dir_select: DirSelectMode,
        file_dir_select: FileDirSelectMode,
        target_base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            conflict_mode: ConflictMode::Prompt,
            dir_select,
            file_dir_select,
            target_base: target_base.into(),
            prompt: Some(prompt),
        }
    }

    /// The target root actions are planned under.
    pub fn target_base(&self) -> &Path {
        &self.target_base
    }

    /// Decide the actions for one passing pair.
    pub fn decide(&self, pair: &AlignedPair, facts: &dyn FileFacts) -> Result<Vec<Action>> {
        match (&pair.left, &pair.right) {
            (Some(left), Some(right)) => self.decide_pair(left, right, facts),
            (Some(unit), None) | (None, Some(unit)) => Ok(self.decide_single(unit, facts)),
            (None, None) => {
                debug_assert!(false, "aligned pair with both slots absent");
                Ok(Vec::new())
            }
        }
    }

    /// A pair with only one side present: materialize that side as-is.
    fn decide_single(&self, unit: &PathUnit, facts: &dyn FileFacts) -> Vec<Action> {
        if facts.is_file(unit.original_path()) {
            self.copy_unit(unit).into_iter().collect()
        } else {
            vec![self.create_dir(unit)]
        }
    }

    fn decide_pair(
        &self,
        left: &PathUnit,
        right: &PathUnit,
        facts: &dyn FileFacts,
    ) -> Result<Vec<Action>> {
        let left_is_file = facts.is_file(left.original_path());
        let right_is_file = facts.is_file(right.original_path());

        if left_is_file && right_is_file {
            return self.decide_conflict(left, right, facts);
        }

        if left_is_file {
            debug_assert!(left.virtual_path().starts_with(right.virtual_path()));
            return Ok(match self.file_dir_select {
                FileDirSelectMode::Neither => Vec::new(),
                FileDirSelectMode::File => self.copy_unit(left).into_iter().collect(),
                FileDirSelectMode::Directory => vec![self.create_dir(right)],
            });
        }

        if right_is_file {
            debug_assert!(right.virtual_path().starts_with(left.virtual_path()));
            return Ok(match self.file_dir_select {
                FileDirSelectMode::Neither => Vec::new(),
                FileDirSelectMode::File => self.copy_unit(right).into_iter().collect(),
                FileDirSelectMode::Directory => vec![self.create_dir(left)],
            });
        }

        // Both are directory-level placeholders; one contains the other.
        let left_is_deeper = left.virtual_path().starts_with(right.virtual_path());
        debug_assert!(left_is_deeper || right.virtual_path().starts_with(left.virtual_path()));
        Ok(match self.dir_select {
            DirSelectMode::Neither => Vec::new(),
            DirSelectMode::Shallower => {
                vec![self.create_dir(if left_is_deeper { right } else { left })]
            }
            DirSelectMode::Deeper => {
                vec![self.create_dir(if left_is_deeper { left } else { right })]
            }
        })
    }

    /// Both sides are the same file: apply the conflict strategy.
    fn decide_conflict(
        &self,
        left: &PathUnit,
        right: &PathUnit,
        facts: &dyn FileFacts,
    ) -> Result<Vec<Action>> {
        debug_assert_eq!(left.virtual_path(), right.virtual_path());
        match self.conflict_mode {
            ConflictMode::TakeLeft => Ok(self.copy_unit(left).into_iter().collect()),
            ConflictMode::TakeRight => Ok(self.copy_unit(right).into_iter().collect()),
            ConflictMode::TakeLarger => {
                let left_len = self.metadata(facts.len(left.original_path()), left)?;
                let right_len = self.metadata(facts.len(right.original_path()), right)?;
                let winner = if left_len >= right_len { left } else { right };
                Ok(self.copy_unit(winner).into_iter().collect())
            }
            ConflictMode::TakeNewer => {
                let left_time = self.metadata(facts.modified(left.original_path()), left)?;
                let right_time = self.metadata(facts.modified(right.original_path()), right)?;
                let winner = if left_time >= right_time { left } else { right };
                Ok(self.copy_unit(winner).into_iter().collect())
            }
            ConflictMode::KeepBoth => {
                let left_target =
                    disambiguated_target(&self.target_base, left.virtual_path(), Side::Left);
                let right_target =
                    disambiguated_target(&self.target_base, right.virtual_path(), Side::Right);
                let mut actions = Vec::new();
                actions.extend(self.copy_to(left, left_target));
                actions.extend(self.copy_to(right, right_target));
                Ok(actions)
            }
            ConflictMode::Prompt => {
                let prompt = self.prompt.as_ref().ok_or(MergeError::PromptRequired)?;
                let (left_target, right_target) =
                    prompt.resolve(left, right, &self.target_base);
                let mut actions = Vec::new();
                if let Some(target) = left_target {
                    actions.extend(self.copy_to(left, target));
                }
                if let Some(target) = right_target {
                    actions.extend(self.copy_to(right, target));
                }
                Ok(actions)
            }
        }
    }

    fn metadata<T>(&self, result: std::io::Result<T>, unit: &PathUnit) -> Result<T> {
        result.map_err(|source| MergeError::Metadata {
            path: unit.original_path().to_path_buf(),
            source,
        })
    }

    fn create_dir(&self, unit: &PathUnit) -> Action {
        Action::CreateDir {
            target: target_path(&self.target_base, unit.virtual_path()),
        }
    }

    fn copy_unit(&self, unit: &PathUnit) -> Option<Action> {
        self.copy_to(unit, target_path(&self.target_base, unit.virtual_path()))
    }

    /// Copy action, unless source and target are the same path.
    fn copy_to(&self, unit: &PathUnit, target: PathBuf) -> Option<Action> {
        if unit.original_path() == target {
            return None;
        }
        Some(Action::CopyFile {
            source: unit.original_path().to_path_buf(),
            target,
        })
    }
}
