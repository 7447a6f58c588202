//! Configuration types and value parsing.
//!
//! Defines the merge options that configuration files and command-line flags
//! both resolve into, plus the shared string parsers for each option value.

use crate::merge::{
    ConflictMode, DirSelectMode, FileDirSelectMode, Operator, PresenceDepth, TruthTable,
};

// =============================================================================
// MergeOptions
// =============================================================================

/// The resolved set of options one merge run uses.
///
/// The operator has no default; it must come from the config file or the
/// command line. Everything else has a working default.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub operator: Option<Operator>,
    pub left_depth: PresenceDepth,
    pub right_depth: PresenceDepth,
    pub conflict: ConflictMode,
    pub dir_select: DirSelectMode,
    pub file_dir_select: FileDirSelectMode,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            operator: None,
            left_depth: PresenceDepth::ParentOrFile,
            right_depth: PresenceDepth::ParentOrFile,
            conflict: ConflictMode::TakeNewer,
            dir_select: DirSelectMode::Shallower,
            file_dir_select: FileDirSelectMode::File,
        }
    }
}

// =============================================================================
// Value Parsing
// =============================================================================

/// Error type for option value parsing.
#[derive(Debug, thiserror::Error)]
#[error("invalid value '{value}' for {option}: expected {expected}")]
pub struct ParseValueError {
    pub option: &'static str,
    pub value: String,
    pub expected: &'static str,
}

type Result<T> = std::result::Result<T, ParseValueError>;

/// Parse an operator name or explicit truth table pattern.
///
/// Accepts `and`, `or`, `xor`, or a 4-character `t`/`f` pattern giving the
/// output for the input combinations in the order both, left-only,
/// right-only, neither. `and` is thus equivalent to `tfff`.
pub fn parse_operator(s: &str) -> Result<Operator> {
    let lowered = s.trim().to_lowercase();
    match lowered.as_str() {
        "and" => Ok(Operator::And),
        "or" => Ok(Operator::Or),
        "xor" => Ok(Operator::Xor),
        pattern if pattern.len() == 4 && pattern.bytes().all(|b| b == b't' || b == b'f') => {
            // Pattern positions both, left-only, right-only, neither map to
            // table indices 3, 1, 2, 0 under the left | right << 1 encoding.
            let mut bits = 0u8;
            for (byte, index) in pattern.bytes().zip([3u8, 1, 2, 0]) {
                if byte == b't' {
                    bits |= 1 << index;
                }
            }
            Ok(Operator::Custom(TruthTable::new(bits)))
        }
        _ => Err(ParseValueError {
            option: "operator",
            value: s.to_string(),
            expected: "and, or, xor, or a 4-character t/f pattern",
        }),
    }
}

/// Parse a presence depth name.
pub fn parse_presence_depth(option: &'static str, s: &str) -> Result<PresenceDepth> {
    match s.trim().to_lowercase().as_str() {
        "file" => Ok(PresenceDepth::FileOnly),
        "immediate-parent" => Ok(PresenceDepth::ImmediateParentOrFile),
        "parent" => Ok(PresenceDepth::ParentOrFile),
        _ => Err(ParseValueError {
            option,
            value: s.to_string(),
            expected: "file, immediate-parent, or parent",
        }),
    }
}

/// Parse a conflict mode name.
pub fn parse_conflict_mode(s: &str) -> Result<ConflictMode> {
    match s.trim().to_lowercase().as_str() {
        "take-left" => Ok(ConflictMode::TakeLeft),
        "take-right" => Ok(ConflictMode::TakeRight),
        "take-newer" => Ok(ConflictMode::TakeNewer),
        "take-larger" => Ok(ConflictMode::TakeLarger),
        "keep-both" => Ok(ConflictMode::KeepBoth),
        "prompt" => Ok(ConflictMode::Prompt),
        _ => Err(ParseValueError {
            option: "conflict",
            value: s.to_string(),
            expected: "take-left, take-right, take-newer, take-larger, keep-both, or prompt",
        }),
    }
}

/// Parse a directory/directory selection mode name.
pub fn parse_dir_select(s: &str) -> Result<DirSelectMode> {
    match s.trim().to_lowercase().as_str() {
        "neither" => Ok(DirSelectMode::Neither),
        "shallower" => Ok(DirSelectMode::Shallower),
        "deeper" => Ok(DirSelectMode::Deeper),
        _ => Err(ParseValueError {
            option: "dirs",
            value: s.to_string(),
            expected: "neither, shallower, or deeper",
        }),
    }
}

/// Parse a file/directory selection mode name.
pub fn parse_file_dir_select(s: &str) -> Result<FileDirSelectMode> {
    match s.trim().to_lowercase().as_str() {
        "neither" => Ok(FileDirSelectMode::Neither),
        "file" => Ok(FileDirSelectMode::File),
        "dir" | "directory" => Ok(FileDirSelectMode::Directory),
        _ => Err(ParseValueError {
            option: "file-dir",
            value: s.to_string(),
            expected: "neither, file, or directory",
        }),
    }
}
