//! Core resolution pipeline: merge all sources into a config struct.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! precedence logic testable with synthetic inputs. Steps:
//!
//! 1. Deep-merge config files (later overrides earlier)
//! 2. Build the environment source
//! 3. Merge env, file and flag values into the struct, field by field

use std::path::PathBuf;

use regex::Regex;

use crate::config::KiperConfig;
use crate::env::EnvSource;
use crate::error::KiperError;
use crate::merge::{self, deep_merge};
use crate::value::Map;

/// All pre-loaded data needed to populate a config. No I/O happens here.
pub struct ResolveInput {
    /// Parsed flag values, nested by group.
    pub flags: Map,
    /// Decoded files in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, Map)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"MYAPP"`).
    pub env_prefix: Option<String>,
    /// Whether environment variables are consulted at all.
    pub env_enabled: bool,
    /// Separator for sequence values given as one string.
    pub delimiter: Regex,
}

pub fn resolve(config: &mut dyn KiperConfig, input: ResolveInput) -> Result<(), KiperError> {
    let mut file = Map::new();
    for (path, map) in input.files {
        tracing::debug!(path = %path.display(), "applying config file");
        file = deep_merge(file, map);
    }

    let env = if input.env_enabled {
        EnvSource::new(input.env_prefix.as_deref(), input.env_vars)
    } else {
        EnvSource::disabled()
    };

    merge::merge(config, &input.flags, &file, &env, &input.delimiter)
}
