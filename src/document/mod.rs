//! Documents: API records with dotted-path field access.
//!
//! A record from the metadata API is a nested JSON object. Paths such as
//! `proxies.dcType` walk into nested records and across relations (arrays of
//! records), gathering one result per related record. Language maps found
//! at the end of a path are resolved for the caller's locale preference.
//!
//! # Example
//!
//! ```rust,ignore
//! use europeana_catalog::document::Document;
//! use europeana_catalog::i18n::LocalePreference;
//!
//! let doc = Document::from_value(record).expect("record is an object");
//! let prefs = LocalePreference::new("fr", "en");
//!
//! let types = doc.fetch("proxies.dcType", &prefs);
//! let param = doc.to_param(); // "abc/123"
//! ```

mod field;
mod more_like_this;

use std::ops::Index;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::i18n::lang_map::{is_lang_map, localize};
use crate::i18n::LocalePreference;

pub use field::Field;
pub use more_like_this::MLT_FIELD_NAMES;

static NULL: Value = Value::Null;

/// A record, or a record nested in one, from the metadata API.
///
/// Documents are immutable apart from the attached hierarchy, which is only
/// carried along for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    source: Arc<Map<String, Value>>,

    /// Top-level record this document was reached from (itself at the top)
    root: Arc<Map<String, Value>>,

    hierarchy: Option<Value>,
}

impl Document {
    pub fn new(source: Map<String, Value>) -> Self {
        let source = Arc::new(source);
        Self {
            root: Arc::clone(&source),
            source,
            hierarchy: None,
        }
    }

    /// Wrap a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::new(map)),
            _ => None,
        }
    }

    /// Wrap a record nested in this one.
    fn relation(&self, source: &Map<String, Value>) -> Self {
        Self {
            source: Arc::new(source.clone()),
            root: Arc::clone(&self.root),
            hierarchy: None,
        }
    }

    /// The raw record.
    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// Whether the record has a top-level `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.source.contains_key(key)
    }

    // ==================== Identity ====================

    /// The record ID, e.g. "/abc/123".
    pub fn id(&self) -> Option<&str> {
        self.source.get("id").and_then(Value::as_str)
    }

    fn id_segment(&self, index: usize) -> Option<&str> {
        let id = self.id()?;
        let id = id.strip_prefix('/').unwrap_or(id);
        id.split('/').nth(index)
    }

    /// ID of the data provider: the first segment of the record ID.
    pub fn provider_id(&self) -> Option<&str> {
        self.id_segment(0)
    }

    /// Provider-local record ID: the second segment of the record ID.
    pub fn record_id(&self) -> Option<&str> {
        self.id_segment(1)
    }

    /// URL parameter form of the ID: "provider/record".
    pub fn to_param(&self) -> Option<String> {
        Some(format!("{}/{}", self.provider_id()?, self.record_id()?))
    }

    // ==================== Path access ====================

    /// Look `path` up, resolving language maps for `locale`.
    ///
    /// Absent fields, and paths running into a scalar before their last
    /// segment, yield `Field::NULL`. Traversing a relation yields a list
    /// with the results for each related record spliced together in order;
    /// records without the sub-path contribute nothing.
    pub fn fetch(&self, path: &str, locale: &LocalePreference) -> Field {
        let segments: Vec<&str> = path.split('.').collect();
        self.lookup(&self.source, &segments, locale)
            .unwrap_or(Field::NULL)
    }

    /// Like [`fetch`](Self::fetch), with absent results as `None`.
    ///
    /// Null values, and traversals that found nothing in any related record,
    /// count as absent however deep the path ran out.
    pub fn get(&self, path: &str, locale: &LocalePreference) -> Option<Field> {
        Some(self.fetch(path, locale)).filter(|field| !field.is_absent())
    }

    /// Whether `path` leads to a present value (a present null counts).
    ///
    /// Across a relation, the path is present when any related record has
    /// the rest of it.
    pub fn has(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        has_path(&self.source, &segments)
    }

    fn lookup(
        &self,
        record: &Map<String, Value>,
        segments: &[&str],
        locale: &LocalePreference,
    ) -> Option<Field> {
        let (head, rest) = segments.split_first()?;
        let value = record.get(*head)?;

        if rest.is_empty() {
            return Some(self.wrap(value, locale));
        }

        match value {
            Value::Object(nested) => self.lookup(nested, rest, locale),
            Value::Array(items) => {
                let mut fields = Vec::new();
                for item in items {
                    if let Value::Object(related) = item {
                        if let Some(field) = self.lookup(related, rest, locale) {
                            field.flatten_into(&mut fields);
                        }
                    }
                }
                Some(Field::List(fields))
            }
            _ => None,
        }
    }

    fn wrap(&self, value: &Value, locale: &LocalePreference) -> Field {
        match value {
            Value::Object(_) if is_lang_map(value) => Field::Value(localize(value, locale)),
            Value::Object(nested) => Field::Document(self.relation(nested)),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                Field::List(items.iter().map(|item| self.wrap(item, locale)).collect())
            }
            other => Field::Value(other.clone()),
        }
    }

    // ==================== Concepts ====================

    /// Concepts listed on the top-level record.
    pub fn concepts(&self) -> &[Value] {
        self.root
            .get("concepts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace concept URIs with the concept's localized preferred label.
    ///
    /// Strings matching the `about` of a concept with a `prefLabel` become
    /// that label resolved for `locale`. Arrays are handled element-wise;
    /// everything else passes through.
    pub fn dereference(&self, value: &Value, locale: &LocalePreference) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.dereference(item, locale))
                    .collect(),
            ),
            Value::String(uri) => self
                .concepts()
                .iter()
                .find(|concept| concept.get("about").and_then(Value::as_str) == Some(uri.as_str()))
                .and_then(|concept| concept.get("prefLabel"))
                .map(|label| localize(label, locale))
                .unwrap_or_else(|| value.clone()),
            other => other.clone(),
        }
    }

    // ==================== Serialization ====================

    pub fn hierarchy(&self) -> Option<&Value> {
        self.hierarchy.as_ref()
    }

    /// Attach a hierarchy, included when the document is serialized.
    pub fn set_hierarchy(&mut self, hierarchy: Value) {
        self.hierarchy = Some(hierarchy);
    }

    /// The record as JSON, with the hierarchy if one is attached.
    pub fn as_json(&self) -> Value {
        let mut map = (*self.source).clone();
        if let Some(hierarchy) = &self.hierarchy {
            map.insert("hierarchy".to_string(), hierarchy.clone());
        }
        Value::Object(map)
    }
}

fn has_path(record: &Map<String, Value>, segments: &[&str]) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    let Some(value) = record.get(*head) else {
        return false;
    };

    if rest.is_empty() {
        return true;
    }

    match value {
        Value::Object(nested) => has_path(nested, rest),
        Value::Array(items) => items
            .iter()
            .any(|item| matches!(item, Value::Object(related) if has_path(related, rest))),
        _ => false,
    }
}

/// Raw top-level field access, without path traversal or localization.
///
/// Missing keys index to `Value::Null`, as with `serde_json::Value`.
impl Index<&str> for Document {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.source.get(key).unwrap_or(&NULL)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.source.len() + usize::from(self.hierarchy.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in self.source.iter() {
            map.serialize_entry(key, value)?;
        }
        if let Some(hierarchy) = &self.hierarchy {
            map.serialize_entry("hierarchy", hierarchy)?;
        }
        map.end()
    }
}
