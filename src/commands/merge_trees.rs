//! Merge trees command.
//!
//! Scans two directory trees, runs the planning pipeline over them, and
//! optionally applies the resulting actions to the target directory.

use std::path::PathBuf;

use thiserror::Error;

use crate::apply::{ApplyReport, apply_actions};
use crate::config::MergeOptions;
use crate::merge::{
    Action, ConflictPrompt, FsFacts, MergeSink, Operator, PathUnit, PresenceFilter, align,
};
use crate::scan::{ScanError, scan_tree};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during the merge_trees command.
#[derive(Debug, Error)]
pub enum MergeTreesError {
    /// No operator was resolved from config or the command line.
    #[error("no operator configured: set one in the config file or pass --op")]
    MissingOperator,

    /// Scan error on one of the input trees.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Merge planning error.
    #[error("merge error: {0}")]
    Merge(#[from] crate::merge::MergeError),
}

/// Result type for the merge_trees command.
pub type Result<T> = std::result::Result<T, MergeTreesError>;

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the merge_trees command.
pub struct MergeTreesArgs {
    /// Root of the left input tree.
    pub left_root: PathBuf,
    /// Root of the right input tree.
    pub right_root: PathBuf,
    /// Target directory the merged tree is planned under.
    pub target: PathBuf,
    /// Resolved merge options.
    pub options: MergeOptions,
    /// Prompt callback, required when the conflict mode is Prompt.
    pub prompt: Option<Box<dyn ConflictPrompt + Send + Sync>>,
    /// Plan only; do not touch the target directory.
    pub dry_run: bool,
}

/// Outcome of the merge_trees command.
pub struct MergeTreesOutcome {
    /// The planned actions, in decision order.
    pub actions: Vec<Action>,
    /// The application report, absent for dry runs.
    pub report: Option<ApplyReport>,
}

// =============================================================================
// Command Implementation
// =============================================================================

/// Merge two directory trees into a target directory.
///
/// This command:
/// 1. Scans both input trees into sorted path unit sequences
/// 2. Aligns the sequences and filters pairs through the presence logic
/// 3. Resolves each passing pair into actions under the target
/// 4. Applies the actions, unless this is a dry run
pub async fn merge_trees(args: MergeTreesArgs) -> Result<MergeTreesOutcome> {
    let operator = args.options.operator.ok_or(MergeTreesError::MissingOperator)?;

    let left_units = scan_tree(&args.left_root).await?;
    let right_units = scan_tree(&args.right_root).await?;
    tracing::info!(
        left = left_units.len(),
        right = right_units.len(),
        "scanned input trees"
    );

    let actions = plan(
        left_units,
        right_units,
        operator,
        &args.options,
        &args.target,
        args.prompt,
    )?;
    tracing::info!(actions = actions.len(), "merge plan ready");

    if args.dry_run {
        return Ok(MergeTreesOutcome {
            actions,
            report: None,
        });
    }

    let report = apply_actions(&actions).await;
    tracing::info!(
        applied = report.applied,
        failed = report.failures.len(),
        "merge applied"
    );

    Ok(MergeTreesOutcome {
        actions,
        report: Some(report),
    })
}

/// Run the pure planning pipeline over two scanned trees.
fn plan(
    left_units: Vec<PathUnit>,
    right_units: Vec<PathUnit>,
    operator: Operator,
    options: &MergeOptions,
    target: &std::path::Path,
    prompt: Option<Box<dyn ConflictPrompt + Send + Sync>>,
) -> Result<Vec<Action>> {
    let filter = PresenceFilter::new(operator, options.left_depth, options.right_depth);
    let sink = match prompt {
        Some(prompt) => MergeSink::with_prompt(
            prompt,
            options.dir_select,
            options.file_dir_select,
            target,
        ),
        // Fails with PromptRequired if the conflict mode is Prompt.
        None => MergeSink::new(
            options.conflict,
            options.dir_select,
            options.file_dir_select,
            target,
        )?,
    };

    let facts = FsFacts;
    let mut actions = Vec::new();
    for pair in align(left_units, right_units).filter(|p| filter.admits(p)) {
        actions.extend(sink.decide(&pair, &facts)?);
    }
    Ok(actions)
}
