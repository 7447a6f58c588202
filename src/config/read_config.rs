//! Configuration file reading and parsing.
//!
//! This module handles locating, reading, and parsing INI-format
//! configuration files, with support for layered key=value overrides.

use std::env;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;

use super::types::{
    MergeOptions, ParseValueError, parse_conflict_mode, parse_dir_select, parse_file_dir_select,
    parse_operator, parse_presence_depth,
};

// =============================================================================
// Constants
// =============================================================================

const ENV_CONFIG_FILE: &str = "DOCSYNC_CONFIG_FILE";
const DEFAULT_CONFIG_FILENAME: &str = ".docsyncrc";
const MERGE_SECTION: &str = "merge";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error(transparent)]
    InvalidValue(#[from] ParseValueError),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// =============================================================================
// ConfigSource
// =============================================================================

/// Specifies how to locate and layer configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Explicit config file path from CLI. If specified and doesn't exist,
    /// error. If None, fall back to DOCSYNC_CONFIG_FILE env var, then
    /// ~/.docsyncrc.
    pub config_file: Option<PathBuf>,

    /// Individual key=value overrides (applied last).
    /// Keys use dot-notation: "merge.operator", "merge.conflict".
    pub overrides: Vec<(String, String)>,
}

// =============================================================================
// Config File Resolution
// =============================================================================

/// Resolve which config file to use based on the ConfigSource and environment.
fn resolve_config_file(source: &ConfigSource) -> Result<Option<PathBuf>> {
    // If explicit path provided, it must exist
    if let Some(ref path) = source.config_file {
        if path.exists() {
            return Ok(Some(path.clone()));
        }
        return Err(ConfigError::FileNotFound(path.clone()));
    }

    // Check environment variable
    if let Some(env_path) = env::var_os(ENV_CONFIG_FILE) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!(
            path = %path.display(),
            "config file named by {ENV_CONFIG_FILE} does not exist, using defaults"
        );
        return Ok(None);
    }

    // Check ~/.docsyncrc
    if let Some(home) = env::var_os("HOME").map(PathBuf::from) {
        let default_path = home.join(DEFAULT_CONFIG_FILENAME);
        if default_path.exists() {
            return Ok(Some(default_path));
        }
    }

    Ok(None)
}

// =============================================================================
// INI Parsing
// =============================================================================

/// Load and parse an INI file.
fn load_ini(path: &Path) -> Result<Ini> {
    let mut ini = Ini::new();
    ini.load(path).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e,
    })?;
    Ok(ini)
}

/// Apply the [merge] section of an INI file to the options, layering on top
/// of existing values.
fn apply_ini_to_options(options: &mut MergeOptions, ini: &Ini) -> Result<()> {
    if let Some(value) = ini.get(MERGE_SECTION, "operator") {
        options.operator = Some(parse_operator(&value)?);
    }
    if let Some(value) = ini.get(MERGE_SECTION, "left_depth") {
        options.left_depth = parse_presence_depth("left_depth", &value)?;
    }
    if let Some(value) = ini.get(MERGE_SECTION, "right_depth") {
        options.right_depth = parse_presence_depth("right_depth", &value)?;
    }
    if let Some(value) = ini.get(MERGE_SECTION, "conflict") {
        options.conflict = parse_conflict_mode(&value)?;
    }
    if let Some(value) = ini.get(MERGE_SECTION, "dirs") {
        options.dir_select = parse_dir_select(&value)?;
    }
    if let Some(value) = ini.get(MERGE_SECTION, "file_dir") {
        options.file_dir_select = parse_file_dir_select(&value)?;
    }
    Ok(())
}

// =============================================================================
// Override Application
// =============================================================================

/// Apply a single key=value override to the options.
fn apply_override(options: &mut MergeOptions, key: &str, value: &str) -> Result<()> {
    match key {
        "merge.operator" => options.operator = Some(parse_operator(value)?),
        "merge.left_depth" => options.left_depth = parse_presence_depth("left_depth", value)?,
        "merge.right_depth" => options.right_depth = parse_presence_depth("right_depth", value)?,
        "merge.conflict" => options.conflict = parse_conflict_mode(value)?,
        "merge.dirs" => options.dir_select = parse_dir_select(value)?,
        "merge.file_dir" => options.file_dir_select = parse_file_dir_select(value)?,
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

/// Read and parse configuration from the specified sources.
///
/// Configuration is layered in this order:
/// 1. Built-in defaults
/// 2. Config file (from CLI, env var, or ~/.docsyncrc)
/// 3. Individual overrides (applied last)
pub fn read_config(source: &ConfigSource) -> Result<MergeOptions> {
    let mut options = MergeOptions::default();

    if let Some(path) = resolve_config_file(source)? {
        let ini = load_ini(&path)?;
        apply_ini_to_options(&mut options, &ini)?;
    }

    for (key, value) in &source.overrides {
        apply_override(&mut options, key, value)?;
    }

    Ok(options)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{ConflictMode, DirSelectMode, Operator, PresenceDepth};

    #[test]
    fn test_parse_ini_merge_section() {
        let mut ini = Ini::new();
        ini.read(
            r#"
[merge]
operator = and
left_depth = file
right_depth = immediate-parent
conflict = keep-both
dirs = deeper
file_dir = directory
"#
            .to_string(),
        )
        .unwrap();

        let mut options = MergeOptions::default();
        apply_ini_to_options(&mut options, &ini).unwrap();

        assert_eq!(options.operator, Some(Operator::And));
        assert_eq!(options.left_depth, PresenceDepth::FileOnly);
        assert_eq!(options.right_depth, PresenceDepth::ImmediateParentOrFile);
        assert_eq!(options.conflict, ConflictMode::KeepBoth);
        assert_eq!(options.dir_select, DirSelectMode::Deeper);
        assert_eq!(
            options.file_dir_select,
            crate::merge::FileDirSelectMode::Directory
        );
    }

    #[test]
    fn test_partial_ini_keeps_defaults() {
        let mut ini = Ini::new();
        ini.read("[merge]\noperator = xor\n".to_string()).unwrap();

        let mut options = MergeOptions::default();
        apply_ini_to_options(&mut options, &ini).unwrap();

        assert_eq!(options.operator, Some(Operator::Xor));
        assert_eq!(options.conflict, ConflictMode::TakeNewer);
        assert_eq!(options.left_depth, PresenceDepth::ParentOrFile);
    }

    #[test]
    fn test_overrides_layer_on_top_of_file_values() {
        let mut ini = Ini::new();
        ini.read("[merge]\nconflict = take-left\n".to_string())
            .unwrap();

        let mut options = MergeOptions::default();
        apply_ini_to_options(&mut options, &ini).unwrap();
        apply_override(&mut options, "merge.conflict", "take-right").unwrap();

        assert_eq!(options.conflict, ConflictMode::TakeRight);
    }

    #[test]
    fn test_unknown_override_key() {
        let mut options = MergeOptions::default();
        let result = apply_override(&mut options, "merge.color", "blue");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_invalid_value_propagates() {
        let mut ini = Ini::new();
        ini.read("[merge]\noperator = nand\n".to_string()).unwrap();

        let mut options = MergeOptions::default();
        let result = apply_ini_to_options(&mut options, &ini);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let source = ConfigSource {
            config_file: Some(PathBuf::from("/nonexistent/docsync.ini")),
            overrides: Vec::new(),
        };
        assert!(matches!(
            read_config(&source),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
