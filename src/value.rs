//! The value tree shared by flags, config files and environment variables.
//!
//! Every source is converted into [`Value`] before merging so type
//! information survives the pipeline: a JSON `90` stays an integer, a YAML
//! list stays a sequence, and nested sections stay maps.

use std::collections::BTreeMap;
use std::fmt;

/// Nested settings keyed by field or group name.
pub type Map = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Render a scalar as the text a user would have typed for it.
    ///
    /// Sequences are joined with `,`. Maps and nulls have no textual form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Seq(items) => {
                let parts: Option<Vec<String>> = items.iter().map(Value::as_text).collect();
                parts.map(|p| p.join(","))
            }
            Value::Map(_) | Value::Null => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} = {v}")?;
                }
                write!(f, "}}")
            }
            other => write!(f, "{}", other.as_text().unwrap_or_default()),
        }
    }
}

/// Look up a dotted key (`"server.timeout"`) in a nested map.
pub fn map_get<'a>(map: &'a Map, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let tbl = match path {
        Some(path) => {
            let mut current = map;
            for segment in path.split('.') {
                current = current.get(segment)?.as_map()?;
            }
            current
        }
        None => map,
    };

    tbl.get(leaf)
}

/// Insert `value` under `segments`, creating intermediate maps.
///
/// An intermediate key that already holds a non-map value is replaced.
pub fn map_insert(map: &mut Map, segments: &[&str], value: Value) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };
    let mut current = map;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(Map::new()));
        if !matches!(entry, Value::Map(_)) {
            *entry = Value::Map(Map::new());
        }
        current = match entry {
            Value::Map(next) => next,
            _ => return,
        };
    }
    current.insert(leaf.to_string(), value);
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Value::Str(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(d) => Value::Str(d.to_string()),
            toml::Value::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(t) => Value::Map(from_toml_table(t)),
        }
    }
}

pub(crate) fn from_toml_table(table: toml::Table) -> Map {
    table.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}

impl From<serde_yaml::Value> for Value {
    fn from(v: serde_yaml::Value) -> Self {
        match v {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => Value::Str(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::new();
                for (k, v) in mapping {
                    // Non-scalar keys cannot address a field.
                    if let Some(key) = Value::from(k).as_text() {
                        map.insert(key, Value::from(v));
                    }
                }
                Value::Map(map)
            }
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}
