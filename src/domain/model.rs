use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::utils::error::ReconcileError;

/// Manifest key that lists a collection's sub-datasets.
pub const DATASETS_KEY: &str = "datasets";
pub const NAME_KEY: &str = "name";
pub const DEFAULT_NOISY_FIELD: &str = "metaFields";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Beta,
    Test,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Beta => "beta",
            Namespace::Test => "test",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf values. Numbers keep their JSON representation, so `10` and `10.0` differ.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Scalar(Scalar::Null) => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Scalar(Scalar::Number(n)) => serde_json::Value::Number(n.clone()),
            Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(record) => record.to_json(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Record(Record::from(map)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// One dataset's metadata. Keys iterate in sorted order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Inline child entries under `"datasets"`, if this record is a collection.
    pub fn sub_datasets(&self) -> Option<&[Value]> {
        self.get(DATASETS_KEY).and_then(Value::as_sequence)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = ReconcileError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Record::from(map)),
            other => Err(ReconcileError::MalformedManifest {
                path: "<inline>".to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// All records of one namespace, keyed by dataset name.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub namespace: Namespace,
    pub datasets: BTreeMap<String, Record>,
}

impl Collection {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            datasets: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.datasets.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, record: Record) -> Option<Record> {
        self.datasets.insert(name.into(), record)
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.datasets.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Conflicting sub-dataset names abort flattening.
    #[default]
    Reject,
    LastWins,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiffEntry {
    Changed {
        path: Vec<String>,
        beta: Value,
        test: Value,
    },
    /// A noisy field differs; its payload is not reported.
    Suppressed { path: Vec<String> },
}

impl DiffEntry {
    pub fn path(&self) -> &[String] {
        match self {
            DiffEntry::Changed { path, .. } | DiffEntry::Suppressed { path } => path,
        }
    }

    pub fn key(&self) -> &str {
        self.path().last().map(String::as_str).unwrap_or_default()
    }

    pub fn dotted_path(&self) -> String {
        self.path().join(".")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDiff {
    pub name: String,
    /// `None` in names-only mode.
    pub entries: Option<Vec<DiffEntry>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub test_only: BTreeSet<String>,
    pub mismatches: Vec<DatasetDiff>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_from_json_tags_variants() {
        let value = Value::from(json!({"a": [1, "x"], "b": {"c": null}}));
        let record = value.as_record().unwrap();

        assert!(matches!(record.get("a"), Some(Value::Sequence(items)) if items.len() == 2));
        assert!(matches!(record.get("b"), Some(Value::Record(_))));
        assert_eq!(value.to_json(), json!({"a": [1, "x"], "b": {"c": null}}));
    }

    #[test]
    fn test_numbers_are_not_coerced() {
        assert_ne!(Value::from(json!(10)), Value::from(json!(10.0)));
        assert_ne!(Value::from(json!("10")), Value::from(json!(10)));
    }

    #[test]
    fn test_record_try_from_rejects_non_object() {
        assert!(Record::try_from(json!([1, 2])).is_err());
        let record = Record::try_from(json!({"name": "pbmc"})).unwrap();
        assert_eq!(record.name(), Some("pbmc"));
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(Namespace::Beta.to_string(), "beta");
        assert_eq!(Namespace::Test.to_string(), "test");
    }
}
