//! Ordered key/value tree used to assemble target query documents.
//!
//! Assembly operations silently drop empty children, so a document built
//! through them never carries a vacuous `{}` or `[]`.

use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeSeq};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Scalar(serde_json::Value),
    /// Ordered children; duplicates allowed.
    List(Vec<Document>),
    /// Unique keys in insertion order.
    Object(Vec<(String, Document)>),
}

impl Document {
    pub fn object() -> Self {
        Document::Object(Vec::new())
    }

    /// `{ key: child }`, or an empty object when `child` is empty.
    pub fn keyed(key: &str, child: Document) -> Self {
        let mut doc = Document::object();
        doc.attach_by_key(key, child);
        doc
    }

    /// Assigns a scalar under `key`, overwriting any previous value.
    pub fn set_key(&mut self, key: &str, value: serde_json::Value) -> &mut Self {
        self.put(key, Document::Scalar(value));
        self
    }

    /// Attaches `child` under `key` (last write wins). Empty children are ignored.
    pub fn attach_by_key(&mut self, key: &str, child: Document) -> &mut Self {
        if !child.is_empty() {
            self.put(key, child);
        }
        self
    }

    /// Appends `child` to the list stored under `key`, creating the list on
    /// first use. Empty children are ignored.
    pub fn append_to_list(&mut self, key: &str, child: Document) -> &mut Self {
        if child.is_empty() {
            return self;
        }

        match self.get_mut(key) {
            Some(Document::List(items)) => items.push(child),
            Some(other) => {
                let previous = std::mem::replace(other, Document::List(Vec::new()));
                *other = Document::List(vec![previous, child]);
            }
            None => self.put(key, Document::List(vec![child])),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Document::Scalar(_) => false,
            Document::List(items) => items.is_empty(),
            Document::Object(entries) => entries.is_empty(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, child)| child),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[Document]> {
        match self.get(key) {
            Some(Document::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Document::Scalar(_) => 1,
            Document::List(items) => items.len(),
            Document::Object(entries) => entries.len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Document::Scalar(value) => value.clone(),
            Document::List(items) => {
                serde_json::Value::Array(items.iter().map(Document::to_json).collect())
            }
            Document::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, child)| (k.clone(), child.to_json()))
                    .collect(),
            ),
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        match self {
            Document::Object(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, child)| child),
            _ => None,
        }
    }

    fn put(&mut self, key: &str, child: Document) {
        if !matches!(self, Document::Object(_)) {
            *self = Document::object();
        }

        if let Some(slot) = self.get_mut(key) {
            *slot = child;
        } else if let Document::Object(entries) = self {
            entries.push((key.to_string(), child));
        }
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(items) => {
                Document::List(items.into_iter().map(Document::from).collect())
            }
            serde_json::Value::Object(map) => Document::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
            scalar => Document::Scalar(scalar),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Scalar(value) => value.serialize(serializer),
            Document::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, child) in entries {
                    map.serialize_entry(k, child)?;
                }
                map.end()
            }
        }
    }
}

/// Canonical compact text; keys keep insertion order.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
