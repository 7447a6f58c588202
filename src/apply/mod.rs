//! Action application.
//!
//! Executes the physical actions a merge plan decided on. Failures are
//! collected per action rather than aborting the run, so one unreadable file
//! does not stop the rest of the merge.

use serde::Serialize;
use tokio::fs;

use crate::merge::Action;

// =============================================================================
// Report Types
// =============================================================================

/// One action that failed during application.
#[derive(Debug, Clone, Serialize)]
pub struct ActionFailure {
    pub action: Action,
    pub message: String,
}

/// Summary of one application run.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Number of actions attempted.
    pub total: usize,
    /// Number of actions that succeeded.
    pub applied: usize,
    /// The actions that failed, with their error messages.
    pub failures: Vec<ActionFailure>,
    /// RFC 3339 timestamp of when the run finished.
    pub completed_at: String,
}

impl ApplyReport {
    /// Whether every action succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// =============================================================================
// Application
// =============================================================================

/// Apply the actions in order, collecting failures instead of aborting.
pub async fn apply_actions(actions: &[Action]) -> ApplyReport {
    let mut applied = 0;
    let mut failures = Vec::new();

    for action in actions {
        match apply_one(action).await {
            Ok(()) => applied += 1,
            Err(e) => {
                tracing::warn!(?action, error = %e, "action failed");
                failures.push(ActionFailure {
                    action: action.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    ApplyReport {
        total: actions.len(),
        applied,
        failures,
        completed_at: chrono::Utc::now().to_rfc3339(),
    }
}

async fn apply_one(action: &Action) -> std::io::Result<()> {
    match action {
        Action::CopyFile { source, target } => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::copy(source, target).await?;
            Ok(())
        }
        Action::CreateDir { target } => fs::create_dir_all(target).await,
    }
}
