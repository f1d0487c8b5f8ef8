use std::path::PathBuf;

use thiserror::Error;

use crate::custom::ValueError;

#[derive(Debug, Error)]
pub enum KiperError {
    #[error("configuration value is not a struct: '{key}'")]
    NotAStruct { key: String },

    #[error("Invalid tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("Duplicate name '{0}'")]
    DuplicateName(String),

    #[error("Invalid default for '{key}': {reason}")]
    InvalidDefault { key: String, reason: String },

    #[error("Invalid sequence delimiter: {0}")]
    InvalidDelimiter(#[from] regex::Error),

    #[error(transparent)]
    Flags(#[from] clap::Error),

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Unsupported config file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid value for '{key}': {source}")]
    Custom { key: String, source: ValueError },

    #[error("Key not found: {0}")]
    KeyNotFound(String),
}
