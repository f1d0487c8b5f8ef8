//! Flag declaration: one `clap::Arg` per value field.
//!
//! The declarator walks a config the same way the merge does. Each value
//! field becomes a long flag named by its dotted path (`--server.timeout`),
//! and a [`FlagTree`] of handles mirrors the group nesting so the parsed
//! values can be handed back to the merge as a nested [`Map`].

use std::collections::BTreeMap;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, value_parser};

use crate::coerce;
use crate::config::{KiperConfig, Visitor};
use crate::error::KiperError;
use crate::slot::{ElemKind, Kind, Slot};
use crate::tag::{GroupTag, ValueTag};
use crate::value::{Map, Value, map_insert};

/// One declared flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagHandle {
    /// Dotted identifier, also the long flag name.
    pub id: String,
    pub kind: Kind,
    /// Effective default after validation, if any.
    pub default: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlagNode {
    Leaf(FlagHandle),
    Group(FlagTree),
}

/// Declared flags keyed by field or group name.
pub type FlagTree = BTreeMap<String, FlagNode>;

/// Output of [`declare`].
#[derive(Debug)]
pub struct Declared {
    /// Args in traversal order.
    pub args: Vec<Arg>,
    pub tree: FlagTree,
}

/// Walk `config` and declare a flag for every value field.
pub fn declare(config: &mut dyn KiperConfig) -> Result<Declared, KiperError> {
    let mut declarator = Declarator::default();
    config.visit(&mut declarator)?;
    Ok(Declared {
        args: declarator.args,
        tree: declarator.tree,
    })
}

/// Collect the parsed value of every declared flag that has one.
///
/// Flags that were neither given nor defaulted are absent from the result.
pub fn flag_values(tree: &FlagTree, matches: &ArgMatches) -> Map {
    let mut map = Map::new();
    for handle in leaves(tree) {
        let Some(v) = flag_value(handle, matches) else {
            continue;
        };
        if matches.value_source(&handle.id) == Some(ValueSource::CommandLine) {
            tracing::debug!(flag = %handle.id, "flag given on command line");
        }
        let segments: Vec<&str> = handle.id.split('.').collect();
        map_insert(&mut map, &segments, v);
    }
    map
}

fn leaves(tree: &FlagTree) -> Vec<&FlagHandle> {
    tree.values()
        .flat_map(|node| match node {
            FlagNode::Leaf(handle) => vec![handle],
            FlagNode::Group(child) => leaves(child),
        })
        .collect()
}

fn flag_value(handle: &FlagHandle, matches: &ArgMatches) -> Option<Value> {
    match handle.kind {
        Kind::Bool => matches.get_one::<bool>(&handle.id).copied().map(Value::Bool),
        Kind::Int(_) => matches.get_one::<i64>(&handle.id).copied().map(Value::Int),
        Kind::Str | Kind::Seq(_) | Kind::Custom => matches
            .get_one::<String>(&handle.id)
            .cloned()
            .map(Value::Str),
    }
}

#[derive(Default)]
struct Declarator {
    path: Vec<String>,
    args: Vec<Arg>,
    tree: FlagTree,
}

impl Declarator {
    fn dotted(&self, name: &str) -> String {
        let mut segments = self.path.clone();
        segments.push(name.to_string());
        segments.join(".")
    }

    fn claim(&self, name: &str) -> Result<(), KiperError> {
        if self.tree.contains_key(name) {
            return Err(KiperError::DuplicateName(self.dotted(name)));
        }
        Ok(())
    }
}

impl Visitor for Declarator {
    fn value(&mut self, tag: &str, slot: Slot<'_>) -> Result<(), KiperError> {
        let tag = ValueTag::parse(tag)?;
        self.claim(&tag.name)?;
        let id = self.dotted(&tag.name);
        let kind = slot.kind();

        let default = match &tag.default {
            Some(d) => Some(normalize_default(&id, kind, d)?),
            // A custom value shows what it already holds.
            None if kind == Kind::Custom => slot.render().filter(|r| !r.is_empty()),
            None => None,
        };

        let handle = FlagHandle {
            id,
            kind,
            default: default.filter(|_| !tag.required),
            required: tag.required,
        };

        tracing::debug!(flag = %handle.id, ?kind, "declared flag");
        self.args.push(flag_arg(&handle, tag.help));
        self.tree.insert(tag.name, FlagNode::Leaf(handle));
        Ok(())
    }

    fn group(&mut self, tag: &str, group: &mut dyn KiperConfig) -> Result<(), KiperError> {
        let tag = GroupTag::parse(tag)?;
        self.claim(&tag.name)?;
        let mut child = Declarator {
            path: self.path.clone(),
            ..Default::default()
        };
        child.path.push(tag.name.clone());
        group.visit(&mut child)?;
        self.args.extend(child.args);
        self.tree.insert(tag.name, FlagNode::Group(child.tree));
        Ok(())
    }
}

fn flag_arg(handle: &FlagHandle, help: Option<String>) -> Arg {
    let mut arg = Arg::new(handle.id.clone())
        .long(handle.id.clone())
        .action(ArgAction::Set)
        .value_name(value_name(handle.kind));
    if let Some(help) = help {
        arg = arg.help(help);
    }
    arg = match handle.kind {
        Kind::Bool => arg
            .value_parser(value_parser!(bool))
            .num_args(0..=1)
            .default_missing_value("true"),
        Kind::Int(_) => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true),
        Kind::Str | Kind::Seq(_) | Kind::Custom => arg.value_parser(value_parser!(String)),
    };
    if handle.required {
        arg = arg.required(true);
    } else if let Some(d) = &handle.default {
        arg = arg.default_value(d.clone());
    }
    arg
}

fn value_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Str | Kind::Custom => "VALUE",
        Kind::Int(_) => "INT",
        Kind::Bool => "BOOL",
        Kind::Seq(ElemKind::Str) => "LIST",
        Kind::Seq(ElemKind::Int) => "INTS",
        Kind::Seq(ElemKind::Bool) => "BOOLS",
    }
}

/// Check that a declared default parses as the field's kind and render it
/// the way clap's parser for that kind expects (`TRUE` becomes `true`).
fn normalize_default(id: &str, kind: Kind, default: &str) -> Result<String, KiperError> {
    let fail = |reason: String| KiperError::InvalidDefault {
        key: id.into(),
        reason,
    };
    match kind {
        Kind::Int(width) => {
            let n = coerce::to_int(&Value::Str(default.into()))
                .ok_or_else(|| fail(format!("'{default}' is not an integer")))?;
            if !width.fits(n) {
                return Err(fail(format!("{n} is out of range for {width:?}")));
            }
            Ok(n.to_string())
        }
        Kind::Bool => coerce::to_bool(&Value::Str(default.into()))
            .map(|b| b.to_string())
            .ok_or_else(|| fail(format!("'{default}' is not a boolean"))),
        Kind::Str | Kind::Seq(_) | Kind::Custom => Ok(default.to_string()),
    }
}
