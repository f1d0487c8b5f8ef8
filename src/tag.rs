//! Field annotation strings.
//!
//! A tag is a list of `key:value` pairs separated by `;`, for example
//! `name:port;default:3306;help:listen port;required`. Only the first `:` of a
//! segment splits it, so values may themselves contain colons. A segment
//! without a colon is a bare flag whose key and value are both the token.

use std::collections::BTreeMap;

use crate::error::KiperError;

/// Split a tag string into its attributes.
///
/// Empty segments are skipped. Keys are trimmed; values are kept verbatim.
pub fn parse_tag(text: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    for segment in text.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        match segment.split_once(':') {
            Some((key, value)) => {
                attrs.insert(key.trim().to_string(), value.to_string());
            }
            None => {
                let token = segment.trim().to_string();
                attrs.insert(token.clone(), token);
            }
        }
    }
    attrs
}

/// Attributes of a leaf field bound to one flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueTag {
    pub name: String,
    pub default: Option<String>,
    pub help: Option<String>,
    pub required: bool,
}

impl ValueTag {
    pub fn parse(text: &str) -> Result<Self, KiperError> {
        let mut attrs = parse_tag(text);
        let name = take_name(&mut attrs, text)?;
        let required = attrs
            .remove("required")
            .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"));
        Ok(Self {
            name,
            default: attrs.remove("default"),
            help: attrs.remove("help"),
            required,
        })
    }
}

/// Attributes of a nested group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTag {
    pub name: String,
}

impl GroupTag {
    pub fn parse(text: &str) -> Result<Self, KiperError> {
        let mut attrs = parse_tag(text);
        let name = take_name(&mut attrs, text)?;
        if let Some(key) = ["default", "help", "required"]
            .into_iter()
            .find(|k| attrs.contains_key(*k))
        {
            return Err(KiperError::InvalidTag {
                tag: text.to_string(),
                reason: format!("'{key}' is not allowed on a group"),
            });
        }
        Ok(Self { name })
    }
}

fn take_name(attrs: &mut BTreeMap<String, String>, text: &str) -> Result<String, KiperError> {
    let invalid = |reason: &str| KiperError::InvalidTag {
        tag: text.to_string(),
        reason: reason.to_string(),
    };
    let name = attrs.remove("name").map(|n| n.trim().to_string());
    if is_bare(text, "name") {
        return Err(invalid("'name' needs a value"));
    }
    match name {
        // Dots separate groups in flag ids.
        Some(name) if name.contains('.') => Err(invalid("'name' must not contain '.'")),
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(invalid("missing or empty 'name'")),
    }
}

/// Whether the segment that last set `key` carried no `:`.
fn is_bare(text: &str, key: &str) -> bool {
    text.split(';')
        .filter(|segment| match segment.split_once(':') {
            Some((k, _)) => k.trim() == key,
            None => segment.trim() == key,
        })
        .last()
        .is_some_and(|segment| !segment.contains(':'))
}
