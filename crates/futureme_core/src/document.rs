//! crates/futureme_core/src/document.rs
//!
//! The schemaless document model shared by every store adapter, and the
//! serialization layer that turns stored documents into wire JSON.
//!
//! A `Document` is an identity plus a flat map of named `Value`s. Timestamps are
//! a first-class value kind so they can be rendered as ISO-8601 on the wire and
//! kept distinguishable from ordinary strings in storage.

use crate::identity::DocumentId;
use crate::ports::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value as Json};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Key under which timestamps are wrapped in the storage encoding.
const DATE_KEY: &str = "$date";

/// Identity field name in the wire representation.
pub const WIRE_ID: &str = "id";

/// Internal identity field name; never emitted on the wire.
pub const INTERNAL_ID: &str = "_id";

//=========================================================================================
// Values and Fields
//=========================================================================================

/// A single field value inside a stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Timestamp(DateTime<Utc>),
}

/// The named fields of a document, excluding its identity.
pub type Fields = BTreeMap<String, Value>;

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Renders the value for API responses. Timestamps become RFC 3339 strings.
    pub fn to_wire(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => json!(i),
            Value::Str(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_wire).collect()),
            Value::Timestamp(t) => Json::String(format_timestamp(t)),
        }
    }

    /// Encodes the value for a JSON document store. Timestamps are wrapped as
    /// `{"$date": "<rfc3339>"}`.
    pub fn to_storage(&self) -> Json {
        match self {
            Value::Timestamp(t) => {
                let mut wrapped = Map::new();
                wrapped.insert(DATE_KEY.to_string(), Json::String(format_timestamp(t)));
                Json::Object(wrapped)
            }
            Value::List(items) => Json::Array(items.iter().map(Value::to_storage).collect()),
            other => other.to_wire(),
        }
    }

    /// Decodes a value written by [`Value::to_storage`].
    pub fn from_storage(raw: Json) -> Result<Self, StoreError> {
        match raw {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| StoreError::Corrupt(format!("non-integer number {}", n))),
            Json::String(s) => Ok(Value::Str(s)),
            Json::Array(items) => items
                .into_iter()
                .map(Value::from_storage)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Json::Object(mut map) => {
                let date = match (map.len(), map.remove(DATE_KEY)) {
                    (1, Some(Json::String(date))) => date,
                    _ => {
                        return Err(StoreError::Corrupt(
                            "nested objects are not supported".to_string(),
                        ))
                    }
                };
                DateTime::parse_from_rfc3339(&date)
                    .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                    .map_err(|e| StoreError::Corrupt(format!("bad timestamp '{}': {}", date, e)))
            }
        }
    }

    /// Total order used when sorting query results. Values of different kinds
    /// order by kind: null, bool, int, string, timestamp, list.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.sort_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Str(_) => 3,
            Value::Timestamp(_) => 4,
            Value::List(_) => 5,
        }
    }
}

fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(Value::Str).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Encodes a whole field map for storage.
pub fn fields_to_storage(fields: &Fields) -> Json {
    Json::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_storage()))
            .collect(),
    )
}

/// Decodes a field map previously written by [`fields_to_storage`].
pub fn fields_from_storage(raw: Json) -> Result<Fields, StoreError> {
    match raw {
        Json::Object(map) => map
            .into_iter()
            .map(|(k, v)| Value::from_storage(v).map(|v| (k, v)))
            .collect(),
        other => Err(StoreError::Corrupt(format!(
            "expected a document object, found {}",
            other
        ))),
    }
}

//=========================================================================================
// Documents
//=========================================================================================

/// A stored record: its identity and its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Serializes the document for API responses.
    ///
    /// The identity is emitted as `id` (its string form), any internal `_id`
    /// field is dropped, and timestamps are rendered as ISO-8601 strings.
    pub fn to_wire(&self) -> Json {
        let mut out: Map<String, Json> = self
            .fields
            .iter()
            .filter(|(k, _)| k.as_str() != INTERNAL_ID)
            .map(|(k, v)| (k.clone(), v.to_wire()))
            .collect();
        out.insert(WIRE_ID.to_string(), Json::String(self.id.to_string()));
        Json::Object(out)
    }
}

/// Serializes an optional document; an absent record becomes `{}`.
pub fn to_wire_or_empty(doc: Option<&Document>) -> Json {
    doc.map(Document::to_wire)
        .unwrap_or_else(|| Json::Object(Map::new()))
}

//=========================================================================================
// Queries
//=========================================================================================

/// Conjunction of field-equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// A filter matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        self.conditions
            .iter()
            .all(|(name, expected)| fields.get(name) == Some(expected))
    }

    /// The filter as a storage-encoded object, suitable for containment queries.
    pub fn to_storage(&self) -> Json {
        Json::Object(
            self.conditions
                .iter()
                .map(|(k, v)| (k.clone(), v.to_storage()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Ordering and result cap for `find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted(sort: Sort) -> Self {
        Self {
            sort: Some(sort),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity;

    fn sample() -> Document {
        let mut fields = Fields::new();
        fields.insert("title".into(), Value::from("Run a marathon"));
        fields.insert("progress".into(), Value::Int(40));
        fields.insert("description".into(), Value::Null);
        fields.insert(
            "milestones".into(),
            Value::from(vec!["a".to_string(), "b".to_string()]),
        );
        identity::stamp_created(&mut fields, identity::now());
        Document::new(DocumentId::generate(), fields)
    }

    #[test]
    fn wire_form_carries_id_and_no_internal_identity() {
        let mut doc = sample();
        doc.fields.insert(INTERNAL_ID.into(), Value::from("leftover"));

        let wire = doc.to_wire();

        assert_eq!(wire["id"], Json::String(doc.id.to_string()));
        assert!(wire.get("_id").is_none());
        assert_eq!(wire["title"], "Run a marathon");
        assert_eq!(wire["progress"], 40);
        assert_eq!(wire["description"], Json::Null);
        assert_eq!(wire["milestones"], json!(["a", "b"]));
    }

    #[test]
    fn timestamps_render_as_iso_8601() {
        let doc = sample();
        let wire = doc.to_wire();
        let created = wire["created_at"].as_str().unwrap();

        let parsed = DateTime::parse_from_rfc3339(created).unwrap();
        assert_eq!(
            parsed.with_timezone(&Utc),
            doc.get("created_at").unwrap().as_timestamp().unwrap()
        );
        assert!(created.ends_with('Z'));
    }

    #[test]
    fn absent_document_serializes_to_empty_object() {
        assert_eq!(to_wire_or_empty(None), json!({}));
    }

    #[test]
    fn storage_codec_keeps_timestamps_distinct_from_strings() {
        let doc = sample();
        let stored = fields_to_storage(&doc.fields);
        assert!(stored["created_at"].get("$date").is_some());

        let decoded = fields_from_storage(stored).unwrap();
        assert_eq!(decoded, doc.fields);
    }

    #[test]
    fn storage_rejects_nested_objects() {
        let err = fields_from_storage(json!({ "x": { "y": 1 } })).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn filter_matches_on_every_condition() {
        let doc = sample();
        assert!(Filter::all().matches(&doc.fields));
        assert!(Filter::all().eq("progress", 40i64).matches(&doc.fields));
        assert!(!Filter::all()
            .eq("progress", 40i64)
            .eq("title", "Other")
            .matches(&doc.fields));
        assert!(!Filter::all().eq("missing", "x").matches(&doc.fields));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let early = Value::Timestamp(DateTime::from_timestamp(1_000, 0).unwrap());
        let late = Value::Timestamp(DateTime::from_timestamp(2_000, 0).unwrap());
        assert_eq!(early.sort_cmp(&late), Ordering::Less);
        assert_eq!(Value::Null.sort_cmp(&early), Ordering::Less);
    }
}
