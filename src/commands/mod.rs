//! Commands module.
//!
//! This module contains top-level docsync operations, typically invoked by
//! the CLI.

mod merge_trees;

pub use merge_trees::{MergeTreesArgs, MergeTreesError, MergeTreesOutcome, merge_trees};
