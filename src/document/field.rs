//! Values produced by document path lookups.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::document::Document;

/// The result of looking a path up on a [`Document`].
///
/// Plain JSON (scalars, arrays of scalars, resolved language maps) stays
/// JSON. Nested records are wrapped as documents so they can be traversed
/// further, and relation traversals produce lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Raw or localized JSON
    Value(Value),

    /// A nested record
    Document(Document),

    /// Results gathered across a relation
    List(Vec<Field>),
}

impl Field {
    /// The absent field.
    pub const NULL: Field = Field::Value(Value::Null);

    /// Whether this is JSON `null` (also how absence is reported).
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Value(Value::Null))
    }

    /// Whether a lookup found nothing: null, or an empty relation result.
    pub fn is_absent(&self) -> bool {
        match self {
            Field::List(fields) => fields.is_empty(),
            other => other.is_null(),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Field::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Field::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Field]> {
        match self {
            Field::List(fields) => Some(fields),
            _ => None,
        }
    }

    /// Convert to plain JSON; documents become their records.
    pub fn to_value(&self) -> Value {
        match self {
            Field::Value(value) => value.clone(),
            Field::Document(document) => document.as_json(),
            Field::List(fields) => Value::Array(fields.iter().map(Field::to_value).collect()),
        }
    }

    /// Every string reachable from this field, in order.
    ///
    /// Numbers and booleans are skipped; nested documents are not searched.
    pub fn strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_strings(&mut out);
        out
    }

    fn collect_strings(&self, out: &mut Vec<String>) {
        match self {
            Field::Value(value) => collect_json_strings(value, out),
            Field::Document(_) => {}
            Field::List(fields) => fields.iter().for_each(|f| f.collect_strings(out)),
        }
    }

    /// Splice this field into `out`, unpacking lists and JSON arrays at
    /// every depth.
    pub(crate) fn flatten_into(self, out: &mut Vec<Field>) {
        match self {
            Field::List(fields) => fields.into_iter().for_each(|f| f.flatten_into(out)),
            Field::Value(Value::Array(items)) => items
                .into_iter()
                .for_each(|item| Field::Value(item).flatten_into(out)),
            other => out.push(other),
        }
    }
}

fn collect_json_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_json_strings(item, out)),
        _ => {}
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Field::Value(value)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(value) => value.serialize(serializer),
            Field::Document(document) => document.serialize(serializer),
            Field::List(fields) => fields.serialize(serializer),
        }
    }
}
