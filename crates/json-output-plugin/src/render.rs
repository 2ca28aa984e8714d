//! JSON text rendering: value transform application and whitespace policy.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::config::{TransformFn, ValueTransform};

/// Apply a value transform to the exported value.
///
/// Mirrors `JSON.stringify` replacer semantics: the root is visited first
/// under the key `""`, and removing the root is an error because there would
/// be nothing left to emit.
pub(crate) fn transformed(value: &Value, transform: &ValueTransform) -> Result<Value> {
    match transform {
        ValueTransform::Function(replacer) => {
            let Some(root) = replacer("", value) else {
                bail!("value transform removed the top-level value");
            };
            Ok(walk(replacer.as_ref(), root))
        }
        ValueTransform::Keys(keys) => Ok(filter_keys(value, keys)),
    }
}

fn walk(replacer: &TransformFn, value: Value) -> Value {
    match value {
        Value::Object(members) => {
            let mut out = Map::new();
            for (key, member) in members {
                if let Some(replaced) = replacer(&key, &member) {
                    out.insert(key, walk(replacer, replaced));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match replacer(&index.to_string(), &item) {
                    Some(replaced) => walk(replacer, replaced),
                    None => Value::Null,
                })
                .collect(),
        ),
        other => other,
    }
}

fn filter_keys(value: &Value, keys: &[String]) -> Value {
    match value {
        Value::Object(members) => {
            let mut out = Map::new();
            for key in keys {
                if let Some(member) = members.get(key) {
                    out.insert(key.clone(), filter_keys(member, keys));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| filter_keys(item, keys)).collect())
        }
        other => other.clone(),
    }
}

/// Render a value to JSON text, pretty-printed with the given per-level
/// indent or compact when `indent` is `None`.
pub(crate) fn render_json(value: &Value, indent: Option<&str>) -> Result<String> {
    let bytes = match indent {
        None => serde_json::to_vec(value).context("serialize JSON value")?,
        Some(indent) => {
            let mut bytes = Vec::new();
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = Serializer::with_formatter(&mut bytes, formatter);
            value
                .serialize(&mut serializer)
                .context("serialize JSON value")?;
            bytes
        }
    };

    String::from_utf8(bytes).context("rendered JSON is not valid UTF-8")
}
