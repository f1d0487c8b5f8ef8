//! Inspection of a populated config: list every field or fetch one.

use crate::config::{KiperConfig, Visitor};
use crate::error::KiperError;
use crate::slot::Slot;
use crate::tag::{GroupTag, ValueTag};

/// Shown for optional fields that hold no value.
pub const NOT_SET: &str = "<not set>";

/// All value fields as `(dotted key, rendered value)`, in declaration order.
pub fn list_values(config: &mut dyn KiperConfig) -> Result<Vec<(String, String)>, KiperError> {
    let mut lister = Lister::default();
    config.visit(&mut lister)?;
    Ok(lister.entries)
}

/// The rendered value of one dotted key.
pub fn get_value(config: &mut dyn KiperConfig, key: &str) -> Result<String, KiperError> {
    list_values(config)?
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .ok_or_else(|| KiperError::KeyNotFound(key.into()))
}

#[derive(Default)]
struct Lister {
    path: Vec<String>,
    entries: Vec<(String, String)>,
}

impl Visitor for Lister {
    fn value(&mut self, tag: &str, slot: Slot<'_>) -> Result<(), KiperError> {
        let tag = ValueTag::parse(tag)?;
        let mut segments = self.path.clone();
        segments.push(tag.name);
        let rendered = slot.render().unwrap_or_else(|| NOT_SET.to_string());
        self.entries.push((segments.join("."), rendered));
        Ok(())
    }

    fn group(&mut self, tag: &str, group: &mut dyn KiperConfig) -> Result<(), KiperError> {
        let tag = GroupTag::parse(tag)?;
        self.path.push(tag.name);
        let result = group.visit(self);
        self.path.pop();
        result
    }
}
