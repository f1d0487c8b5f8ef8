//! Environment variable lookup for the merge.
//!
//! A field at `server.timeout` is read from `SERVER_TIMEOUT`, or
//! `MYAPP_SERVER_TIMEOUT` with prefix `MYAPP`:
//!
//! | Env var | Field |
//! |---------|-------|
//! | `MYAPP_ADDRESS` | `address` |
//! | `MYAPP_SERVER_TIMEOUT` | `server.timeout` |
//! | `MYAPP_LOG_SINK_MAX_SIZE` | `log-sink.max-size` |
//!
//! Segments are joined with `_`, uppercased, and `-`/`.` become `_`. Empty
//! values count as unset. Values stay text; the merge coerces them per field.

use std::collections::HashMap;

/// Environment variables as seen by the merge.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
#[derive(Debug, Default)]
pub struct EnvSource {
    prefix: Option<String>,
    vars: HashMap<String, String>,
    enabled: bool,
}

impl EnvSource {
    pub fn new(prefix: Option<&str>, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            vars: vars.into_iter().collect(),
            enabled: true,
        }
    }

    /// A source that never yields a value.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The variable name for a field at `path` + `name`.
    pub fn key(&self, path: &[String], name: &str) -> String {
        self.prefix
            .iter()
            .map(String::as_str)
            .chain(path.iter().map(String::as_str))
            .chain(std::iter::once(name))
            .map(normalize)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Non-empty value for the field, if set.
    pub fn lookup(&self, path: &[String], name: &str) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.vars
            .get(&self.key(path, name))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn normalize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
