//! Ordered merge of two directory trees.
//!
//! This module implements the pure planning pipeline that reconciles two
//! scanned trees into a list of physical actions:
//!
//! 1. Each tree is represented as a sorted sequence of [`PathUnit`]s.
//! 2. [`align`] zippers the two sequences into [`AlignedPair`]s, pairing
//!    equal paths, nested paths, and one-sided entries.
//! 3. [`PresenceFilter`] decides per pair whether it passes, by reducing each
//!    side to a presence bit and applying a boolean [`Operator`].
//! 4. [`MergeSink`] turns each passing pair into [`Action`]s under a target
//!    root, resolving conflicts per the configured modes.
//!
//! The pipeline performs no I/O beyond the [`FileFacts`] capability given to
//! the sink; applying the actions is a separate concern.

mod align;
mod error;
mod filter;
mod path_unit;
mod sink;

pub use align::{AlignedPair, TreeAlign, align};
pub use error::{MergeError, Result};
pub use filter::{Operator, PresenceDepth, PresenceFilter, TruthTable};
pub use path_unit::{PathRelation, PathUnit};
pub use sink::{
    Action, ConflictMode, ConflictPrompt, DirSelectMode, FileDirSelectMode, FileFacts, FsFacts,
    MergeSink, Side, disambiguated_target, target_path,
};
