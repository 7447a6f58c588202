//! docsync - reconciles two directory trees into a single merged output tree.

pub mod apply;
pub mod cli;
pub mod commands;
pub mod config;
pub mod merge;
pub mod scan;

pub use apply::{ActionFailure, ApplyReport, apply_actions};
pub use config::MergeOptions;
pub use merge::{
    Action, AlignedPair, ConflictMode, DirSelectMode, FileDirSelectMode, Operator, PathRelation,
    PathUnit, PresenceDepth, PresenceFilter, TruthTable, align,
};
pub use scan::scan_tree;
