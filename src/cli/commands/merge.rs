//! Merge CLI command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::apply::ApplyReport;
use crate::cli::prompt::ConsolePrompt;
use crate::cli::{GlobalArgs, OutputSink, Result};
use crate::commands::{MergeTreesArgs, merge_trees};
use crate::config::{
    MergeOptions, parse_conflict_mode, parse_dir_select, parse_file_dir_select, parse_operator,
    parse_presence_depth, read_config,
};
use crate::merge::{Action, ConflictMode};

// =============================================================================
// Arguments
// =============================================================================

/// Arguments for the merge command.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Root of the left input tree.
    #[arg(long)]
    pub left: PathBuf,

    /// Root of the right input tree.
    #[arg(long)]
    pub right: PathBuf,

    /// Directory to write the merged tree into.
    #[arg(long)]
    pub out: PathBuf,

    /// Presence operator: and, or, xor, or a 4-character t/f pattern.
    #[arg(long)]
    pub op: Option<String>,

    /// Presence depth for the left side: file, immediate-parent, or parent.
    #[arg(long = "left-depth")]
    pub left_depth: Option<String>,

    /// Presence depth for the right side: file, immediate-parent, or parent.
    #[arg(long = "right-depth")]
    pub right_depth: Option<String>,

    /// Conflict mode: take-left, take-right, take-newer, take-larger,
    /// keep-both, or prompt.
    #[arg(long)]
    pub conflict: Option<String>,

    /// Directory/directory selection: neither, shallower, or deeper.
    #[arg(long)]
    pub dirs: Option<String>,

    /// File/directory selection: neither, file, or directory.
    #[arg(long = "file-dir")]
    pub file_dir: Option<String>,

    /// Resolve file conflicts interactively (shorthand for --conflict prompt).
    #[arg(long)]
    pub prompt: bool,

    /// Plan the merge without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub output: OutputSink,
}

#[derive(Serialize)]
struct MergeOutput<'a> {
    actions: &'a [Action],
    report: Option<&'a ApplyReport>,
}

// =============================================================================
// Execution
// =============================================================================

impl MergeArgs {
    /// Resolve options by layering command-line flags over the configuration.
    fn resolve_options(&self, mut options: MergeOptions) -> Result<MergeOptions> {
        if let Some(ref op) = self.op {
            options.operator = Some(parse_operator(op)?);
        }
        if let Some(ref depth) = self.left_depth {
            options.left_depth = parse_presence_depth("left-depth", depth)?;
        }
        if let Some(ref depth) = self.right_depth {
            options.right_depth = parse_presence_depth("right-depth", depth)?;
        }
        if let Some(ref conflict) = self.conflict {
            options.conflict = parse_conflict_mode(conflict)?;
        }
        if let Some(ref dirs) = self.dirs {
            options.dir_select = parse_dir_select(dirs)?;
        }
        if let Some(ref file_dir) = self.file_dir {
            options.file_dir_select = parse_file_dir_select(file_dir)?;
        }
        if self.prompt {
            options.conflict = ConflictMode::Prompt;
        }
        Ok(options)
    }

    pub async fn run(self, global: &GlobalArgs) -> Result<()> {
        let options = self.resolve_options(read_config(&global.to_config_source())?)?;

        let prompt = (options.conflict == ConflictMode::Prompt)
            .then(|| Box::new(ConsolePrompt) as Box<dyn crate::merge::ConflictPrompt + Send + Sync>);

        let outcome = merge_trees(MergeTreesArgs {
            left_root: self.left.clone(),
            right_root: self.right.clone(),
            target: self.out.clone(),
            options,
            prompt,
            dry_run: self.dry_run,
        })
        .await?;

        if global.json {
            self.output
                .write(
                    &MergeOutput {
                        actions: &outcome.actions,
                        report: outcome.report.as_ref(),
                    },
                    true,
                )
                .await?;
        } else {
            let mut lines = Vec::new();
            for action in &outcome.actions {
                match action {
                    Action::CopyFile { source, target } => {
                        lines.push(format!("copy {} -> {}", source.display(), target.display()));
                    }
                    Action::CreateDir { target } => {
                        lines.push(format!("mkdir {}", target.display()));
                    }
                }
            }
            match &outcome.report {
                Some(report) => lines.push(format!(
                    "{} of {} actions applied, {} failed",
                    report.applied,
                    report.total,
                    report.failures.len()
                )),
                None => lines.push(format!("{} actions planned (dry run)", outcome.actions.len())),
            }
            self.output.write_str(&lines.join("\n")).await?;
        }

        Ok(())
    }
}
