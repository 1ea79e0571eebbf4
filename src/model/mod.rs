use crate::client::{Item, KeyAttribute, TableSpec};
use crate::csv_parser::Record;
use crate::error::{Error, Result};
use crate::value::{self, Kind, Value};

use aws_sdk_dynamodb::types::{AttributeValue, KeyType, ScalarAttributeType};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const HASH_KEY: &str = "id";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f+0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inference {
    #[default]
    Infer,
    /// Every cell is stored as a string.
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    String,
    Number,
    Boolean,
    DateTime,
    List,
    Map(Schema),
}

impl AttributeKind {
    pub fn kind(&self) -> Kind {
        match self {
            AttributeKind::String => Kind::String,
            AttributeKind::Number => Kind::Number,
            AttributeKind::Boolean => Kind::Boolean,
            AttributeKind::DateTime => Kind::DateTime,
            AttributeKind::List => Kind::List,
            AttributeKind::Map(_) => Kind::Map,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
}

impl Attribute {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: Vec<Attribute>,
    /// Keys left out of the schema; never written.
    skipped: Vec<String>,
}

impl Schema {
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skipped.iter().any(|s| s == name)
    }

    fn from_values<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut schema = Self::default();
        for (name, value) in fields {
            match attribute_kind(name, value) {
                Some(kind) => schema.attributes.push(Attribute {
                    name: name.to_string(),
                    kind,
                }),
                None if matches!(value, Value::Null) => {}
                None => schema.skipped.push(name.to_string()),
            }
        }
        schema
    }
}

fn attribute_kind(name: &str, value: &Value) -> Option<AttributeKind> {
    match value {
        Value::String(_) => Some(AttributeKind::String),
        Value::Number(_) => Some(AttributeKind::Number),
        Value::Bool(_) => Some(AttributeKind::Boolean),
        Value::DateTime(_) => Some(AttributeKind::DateTime),
        Value::List(items) => match items.first() {
            Some(Value::Map(_)) => {
                warn!("Skip attribute `{name}`: lists of maps are not supported");
                None
            }
            _ => Some(AttributeKind::List),
        },
        Value::Map(fields) => Some(AttributeKind::Map(Schema::from_values(
            fields.iter().map(|(k, v)| (k.as_str(), v)),
        ))),
        Value::Null => None,
    }
}

/// Table schema synthesized from a sample record.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    table_name: String,
    hash_key_type: ScalarAttributeType,
    schema: Schema,
}

impl Model {
    pub fn from_sample(table_name: &str, sample: &Record, inference: Inference) -> Result<Self> {
        let values: Vec<(&str, Value)> = sample
            .iter()
            .map(|(column, cell)| {
                let value = match inference {
                    Inference::Infer => value::infer(cell),
                    Inference::Raw => Value::String(cell.to_string()),
                };
                (column, value)
            })
            .collect();

        let hash_key = values
            .iter()
            .find(|(column, _)| *column == HASH_KEY)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::MissingHashKey(HASH_KEY.into()))?;

        let hash_key_type = match hash_key {
            Value::String(_) | Value::DateTime(_) => ScalarAttributeType::S,
            Value::Number(_) => ScalarAttributeType::N,
            other => {
                return Err(Error::InvalidHashKey {
                    column: HASH_KEY.into(),
                    kind: other.kind(),
                })
            }
        };

        let schema = Schema::from_values(values.iter().map(|(k, v)| (*k, v)));
        debug!("Generated model for `{table_name}`: {:#?}", schema);

        Ok(Self {
            table_name: table_name.to_string(),
            hash_key_type,
            schema,
        })
    }

    pub fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn table_spec(&self) -> TableSpec {
        TableSpec {
            table_name: self.table_name.clone(),
            keys: vec![KeyAttribute {
                name: HASH_KEY.into(),
                key_type: KeyType::Hash,
                attribute_type: self.hash_key_type.clone(),
            }],
        }
    }

    /// Coerces a record into an item. `row` is the 1-based data row number.
    pub fn to_item(&self, record: &Record, row: usize) -> Result<Item> {
        let mut item: Item = HashMap::new();

        for attribute in self.schema.attributes() {
            let cell = record.get(attribute.name()).unwrap_or_default();
            if cell.is_empty() {
                if attribute.name() == HASH_KEY {
                    return Err(Error::MissingHashKeyValue {
                        row,
                        column: HASH_KEY.into(),
                    });
                }
                continue;
            }

            let value = coerce_cell(attribute, cell, row)?;
            item.insert(attribute.name().to_string(), value);
        }

        Ok(item)
    }
}

fn coerce_cell(attribute: &Attribute, cell: &str, row: usize) -> Result<AttributeValue> {
    let mismatch = || Error::TypeMismatch {
        row,
        column: attribute.name().to_string(),
        expected: attribute.kind().kind(),
        value: cell.to_string(),
    };

    match attribute.kind() {
        AttributeKind::String => Ok(AttributeValue::S(cell.to_string())),
        AttributeKind::Number => value::parse_number(cell)
            .map(AttributeValue::N)
            .ok_or_else(mismatch),
        AttributeKind::Boolean => value::parse_bool(cell)
            .map(AttributeValue::Bool)
            .ok_or_else(mismatch),
        AttributeKind::DateTime => value::parse_datetime(cell)
            .map(format_datetime)
            .ok_or_else(mismatch),
        AttributeKind::List => value::parse_list(cell)
            .map(into_attribute_value)
            .ok_or_else(mismatch),
        AttributeKind::Map(schema) => {
            let value = value::parse_map(cell).ok_or_else(mismatch)?;
            coerce_map(schema, value, attribute.name(), row)
        }
    }
}

fn coerce_map(schema: &Schema, value: Value, path: &str, row: usize) -> Result<AttributeValue> {
    let fields = match value {
        Value::Map(fields) => fields,
        other => return Ok(into_attribute_value(other)),
    };

    let mut map: HashMap<String, AttributeValue> = HashMap::new();
    for (key, value) in fields {
        if schema.is_skipped(&key) {
            continue;
        }
        let attribute_value = match (schema.get(&key).map(Attribute::kind), value) {
            (_, Value::Null) => AttributeValue::Null(true),
            (Some(AttributeKind::Map(nested)), value @ Value::Map(_)) => {
                coerce_map(nested, value, &format!("{path}.{key}"), row)?
            }
            (Some(kind), value) if kind.kind() != value.kind() => {
                return Err(Error::TypeMismatch {
                    row,
                    column: format!("{path}.{key}"),
                    expected: kind.kind(),
                    value: serde_json::Value::from(&value).to_string(),
                });
            }
            (_, value) => into_attribute_value(value),
        };
        map.insert(key, attribute_value);
    }

    Ok(AttributeValue::M(map))
}

fn format_datetime(datetime: DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(datetime.format(DATETIME_FORMAT).to_string())
}

pub fn into_attribute_value(value: Value) -> AttributeValue {
    match value {
        Value::String(s) => AttributeValue::S(s),
        Value::Number(n) => AttributeValue::N(n),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::DateTime(dt) => format_datetime(dt),
        Value::List(items) => {
            AttributeValue::L(items.into_iter().map(into_attribute_value).collect())
        }
        Value::Map(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(k, v)| (k, into_attribute_value(v)))
                .collect(),
        ),
        Value::Null => AttributeValue::Null(true),
    }
}
