//! The merge engine.
//!
//! Walks a config a second time and assigns every value field from the
//! highest-priority source that has a value for it:
//!
//! ```text
//! environment    PREFIX_GROUP_NAME
//!      ↑ overrides
//! config file    {"group": {"name": ...}}
//!      ↑ overrides
//! flags          --group.name, explicit or defaulted
//! ```
//!
//! Precedence is decided per field. A file that sets one key does not hide
//! flags for the others, and a field no source mentions keeps its value.

use regex::Regex;

use crate::coerce;
use crate::config::{KiperConfig, Visitor};
use crate::env::EnvSource;
use crate::error::KiperError;
use crate::slot::Slot;
use crate::tag::{GroupTag, ValueTag};
use crate::value::{Map, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a map for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: Map, overlay: Map) -> Map {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Map(base_map)), Value::Map(overlay_map)) => {
                base.insert(key, Value::Map(deep_merge(base_map, overlay_map)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Merge all sources into `config`.
///
/// Stops at the first failing field; fields merged before it keep their new
/// values.
pub fn merge(
    config: &mut dyn KiperConfig,
    flags: &Map,
    file: &Map,
    env: &EnvSource,
    delimiter: &Regex,
) -> Result<(), KiperError> {
    let mut merger = Merger {
        path: Vec::new(),
        flags: Some(flags),
        file: Some(file),
        env,
        delimiter,
    };
    config.visit(&mut merger)
}

struct Merger<'a> {
    path: Vec<String>,
    flags: Option<&'a Map>,
    file: Option<&'a Map>,
    env: &'a EnvSource,
    delimiter: &'a Regex,
}

impl Merger<'_> {
    fn dotted(&self, name: &str) -> String {
        let mut segments = self.path.clone();
        segments.push(name.to_string());
        segments.join(".")
    }
}

impl Visitor for Merger<'_> {
    fn value(&mut self, tag: &str, slot: Slot<'_>) -> Result<(), KiperError> {
        let tag = ValueTag::parse(tag)?;
        let key = self.dotted(&tag.name);

        let env_value = self
            .env
            .lookup(&self.path, &tag.name)
            .map(|s| Value::Str(s.to_string()));
        let file_value = self
            .file
            .and_then(|m| m.get(&tag.name))
            .filter(|v| !v.is_null());
        let flag_value = self
            .flags
            .and_then(|m| m.get(&tag.name))
            .filter(|v| !v.is_null());

        let (source, value) = match (&env_value, file_value, flag_value) {
            (Some(v), _, _) => ("env", v),
            (None, Some(v), _) => ("file", v),
            (None, None, Some(v)) => ("flag", v),
            (None, None, None) => {
                tracing::debug!(%key, "no source has a value, keeping current");
                return Ok(());
            }
        };

        tracing::debug!(%key, source, "merging field");
        coerce::assign(slot, value, &key, self.delimiter)
    }

    fn group(&mut self, tag: &str, group: &mut dyn KiperConfig) -> Result<(), KiperError> {
        let tag = GroupTag::parse(tag)?;
        let key = self.dotted(&tag.name);

        let file = match self.file.and_then(|m| m.get(&tag.name)) {
            None | Some(Value::Null) => None,
            Some(Value::Map(m)) => Some(m),
            Some(_) => return Err(KiperError::NotAStruct { key }),
        };
        let flags = self.flags.and_then(|m| m.get(&tag.name)).and_then(Value::as_map);

        let mut child = Merger {
            path: self.path.clone(),
            flags,
            file,
            env: self.env,
            delimiter: self.delimiter,
        };
        child.path.push(tag.name);
        group.visit(&mut child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::DEFAULT_DELIMITER;
    use crate::fixtures::test::TestConfig;
    use crate::value::map_insert;

    fn delim() -> Regex {
        Regex::new(DEFAULT_DELIMITER).unwrap()
    }

    fn map(pairs: &[(&str, Value)]) -> Map {
        let mut m = Map::new();
        for (k, v) in pairs {
            let segments: Vec<&str> = k.split('.').collect();
            map_insert(&mut m, &segments, v.clone());
        }
        m
    }

    fn env(pairs: &[(&str, &str)]) -> EnvSource {
        EnvSource::new(
            None,
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    fn s(v: &str) -> Value {
        Value::Str(v.into())
    }

    #[test]
    fn flag_applies_without_other_sources() {
        let mut cfg = TestConfig::default();
        let flags = map(&[("address", s("10.0.0.1")), ("server.timeout", Value::Int(60))]);
        merge(&mut cfg, &flags, &Map::new(), &env(&[]), &delim()).unwrap();
        assert_eq!(cfg.address.0, "10.0.0.1");
        assert_eq!(cfg.server.timeout, 60);
    }

    #[test]
    fn file_beats_flag() {
        let mut cfg = TestConfig::default();
        let flags = map(&[("address", s("10.0.0.1"))]);
        let file = map(&[("address", s("192.168.1.1"))]);
        merge(&mut cfg, &flags, &file, &env(&[]), &delim()).unwrap();
        assert_eq!(cfg.address.0, "192.168.1.1");
    }

    #[test]
    fn env_beats_file_and_flag() {
        let mut cfg = TestConfig::default();
        let flags = map(&[("server.timeout", Value::Int(30))]);
        let file = map(&[("server.timeout", Value::Int(90))]);
        merge(&mut cfg, &flags, &file, &env(&[("SERVER_TIMEOUT", "120")]), &delim()).unwrap();
        assert_eq!(cfg.server.timeout, 120);
    }

    #[test]
    fn precedence_is_per_field() {
        let mut cfg = TestConfig::default();
        let flags = map(&[("address", s("flag-addr")), ("port", s("3306"))]);
        let file = map(&[("address", s("file-addr"))]);
        merge(&mut cfg, &flags, &file, &env(&[]), &delim()).unwrap();
        assert_eq!(cfg.address.0, "file-addr");
        assert_eq!(cfg.port.0, "3306");
    }

    #[test]
    fn null_file_value_falls_through() {
        let mut cfg = TestConfig::default();
        let flags = map(&[("address", s("flag-addr"))]);
        let file = map(&[("address", Value::Null)]);
        merge(&mut cfg, &flags, &file, &env(&[]), &delim()).unwrap();
        assert_eq!(cfg.address.0, "flag-addr");
    }

    #[test]
    fn untouched_when_no_source() {
        let mut cfg = TestConfig {
            name: Some("caller".into()),
            ..Default::default()
        };
        merge(&mut cfg, &Map::new(), &Map::new(), &env(&[]), &delim()).unwrap();
        assert_eq!(cfg.name.as_deref(), Some("caller"));
    }

    #[test]
    fn file_float_narrows_to_int() {
        let mut cfg = TestConfig::default();
        let file = map(&[("server.timeout", Value::Float(90.7))]);
        merge(&mut cfg, &Map::new(), &file, &env(&[]), &delim()).unwrap();
        assert_eq!(cfg.server.timeout, 90);
    }

    #[test]
    fn scalar_at_group_key_is_shape_error() {
        let mut cfg = TestConfig::default();
        let file = map(&[("server", Value::Int(5))]);
        let err = merge(&mut cfg, &Map::new(), &file, &env(&[]), &delim()).unwrap_err();
        assert!(matches!(err, KiperError::NotAStruct { ref key } if key == "server"));
    }

    #[test]
    fn custom_error_aborts_and_keeps_earlier_fields() {
        let mut cfg = TestConfig::default();
        let file = map(&[("address", s("merged-first")), ("port", s("not-a-port"))]);
        let err = merge(&mut cfg, &Map::new(), &file, &env(&[]), &delim()).unwrap_err();
        assert!(matches!(err, KiperError::Custom { ref key, .. } if key == "port"));
        assert_eq!(cfg.address.0, "merged-first");
    }

    #[test]
    fn env_sequence_is_split() {
        let mut cfg = TestConfig::default();
        merge(&mut cfg, &Map::new(), &Map::new(), &env(&[("TAGS", "x,y , z")]), &delim()).unwrap();
        assert_eq!(cfg.tags, vec!["x", "y", "z"]);
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let flags = map(&[("address", s("10.0.0.1")), ("tags", s("a, b"))]);
        let file = map(&[("server.timeout", Value::Int(90)), ("port", Value::Int(5432))]);
        let mut cfg = TestConfig::default();
        merge(&mut cfg, &flags, &file, &env(&[]), &delim()).unwrap();
        let once = cfg.clone();
        merge(&mut cfg, &flags, &file, &env(&[]), &delim()).unwrap();
        assert_eq!(cfg, once);
    }

    // --- deep_merge ---

    #[test]
    fn disjoint_keys_merge() {
        let merged = deep_merge(map(&[("host", s("localhost"))]), map(&[("port", Value::Int(3000))]));
        assert_eq!(merged["host"], s("localhost"));
        assert_eq!(merged["port"], Value::Int(3000));
    }

    #[test]
    fn nested_maps_recurse() {
        let base = map(&[("database.url", s("postgres://old")), ("database.pool_size", Value::Int(5))]);
        let overlay = map(&[("database.pool_size", Value::Int(20))]);
        let merged = deep_merge(base, overlay);
        let db = merged["database"].as_map().unwrap();
        assert_eq!(db["url"], s("postgres://old"));
        assert_eq!(db["pool_size"], Value::Int(20));
    }

    #[test]
    fn overlay_scalar_replaces_map() {
        let base = map(&[("database.url", s("x"))]);
        let overlay = map(&[("database", s("flat"))]);
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["database"], s("flat"));
    }
}
