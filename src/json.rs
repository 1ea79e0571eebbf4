use crate::client::Item;
use crate::error::{Error, Result};

use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

fn into_str(blob: Blob) -> String {
    String::from_utf8_lossy(&blob.into_inner()).into_owned()
}

fn into_number(n: String) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(u) = n.parse::<u64>() {
        return Value::from(u);
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::String(n))
}

pub fn attribute_to_json(value: AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => into_number(n),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(b) => Value::String(into_str(b)),
        AttributeValue::L(list) => Value::Array(list.into_iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => item_to_json(map),
        AttributeValue::Ss(v) => Value::Array(v.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(v) => Value::Array(v.into_iter().map(into_number).collect()),
        AttributeValue::Bs(v) => {
            Value::Array(v.into_iter().map(|b| Value::String(into_str(b))).collect())
        }
        other => {
            warn!("Unknown attribute value: {:?}", other);
            Value::Null
        }
    }
}

pub fn item_to_json(item: Item) -> Value {
    let mut map = Map::new();
    for (key, value) in item {
        map.insert(key, attribute_to_json(value));
    }
    Value::Object(map)
}

/// Writes items as a pretty-printed JSON array, creating parent directories.
pub fn write_items<P: AsRef<Path>>(path: P, items: Vec<Item>) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let values: Vec<Value> = items.into_iter().map(item_to_json).collect();
    let content = serde_json::to_string_pretty(&values)?;
    fs::write(path, content).map_err(write_err)?;

    debug!("Wrote {} items to {}", values.len(), path.to_string_lossy());
    Ok(())
}
