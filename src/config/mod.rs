//! Configuration module.

mod read_config;
mod types;

pub use read_config::{ConfigError, ConfigSource, read_config};
pub use types::{
    MergeOptions, ParseValueError, parse_conflict_mode, parse_dir_select, parse_file_dir_select,
    parse_operator, parse_presence_depth,
};
