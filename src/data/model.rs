use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{DatasetError, Result};

/// Attribute holding the URI-like concept; its `#` fragment is the category.
pub const ENTITY_CONCEPT: &str = "entityConcept";
/// Attribute used as the display label.
pub const ENTITY_TITLE: &str = "entityTitle";
/// Attribute used as the display weight.
pub const COUNT: &str = "count";

// ---------------------------------------------------------------------------
// ValuePair / DatasetItem – one record as it appears on disk
// ---------------------------------------------------------------------------

/// A single named attribute of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePair {
    pub key: String,
    /// Strings in most files, but numbers (e.g. `count`) occur too.
    pub value: JsonValue,
}

/// One record of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub metadata: Map<String, JsonValue>,
    pub values: Vec<ValuePair>,
}

impl DatasetItem {
    /// Value stored under `key`. A repeated key resolves to its last value,
    /// matching [`parse_item`](super::parse::parse_item).
    pub fn value(&self, key: &str) -> Option<&JsonValue> {
        self.values.iter().rev().find(|v| v.key == key).map(|v| &v.value)
    }
}

// ---------------------------------------------------------------------------
// Dataset – both on-disk shapes
// ---------------------------------------------------------------------------

/// A loaded dataset in either of its two document shapes.
///
/// ```json
/// [ { "type": "...", "metadata": {}, "values": [ { "key": "...", "value": "..." } ] } ]
/// { "items": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// Legacy shape: a bare list of items.
    Flat(Vec<DatasetItem>),
    /// Current shape: `{ "items": [...] }`.
    Wrapped { items: Vec<DatasetItem> },
}

impl Dataset {
    /// Decode a dataset document, naming `source_name` in any error.
    pub fn from_json_str(source_name: &str, text: &str) -> Result<Self> {
        let root: JsonValue = serde_json::from_str(text)
            .map_err(|e| DatasetError::malformed(source_name, format!("invalid JSON: {e}")))?;
        Self::from_json_value(source_name, root)
    }

    /// Classify an already parsed document into one of the two shapes.
    pub fn from_json_value(source_name: &str, root: JsonValue) -> Result<Self> {
        let decode = |items: JsonValue| -> Result<Vec<DatasetItem>> {
            serde_json::from_value(items)
                .map_err(|e| DatasetError::malformed(source_name, format!("bad item: {e}")))
        };

        match root {
            JsonValue::Array(_) => Ok(Dataset::Flat(decode(root)?)),
            JsonValue::Object(mut obj) => match obj.remove("items") {
                Some(items @ JsonValue::Array(_)) => Ok(Dataset::Wrapped {
                    items: decode(items)?,
                }),
                Some(_) => Err(DatasetError::malformed(
                    source_name,
                    "'items' is not an array",
                )),
                None => Err(DatasetError::malformed(
                    source_name,
                    "object has no 'items' field",
                )),
            },
            other => Err(DatasetError::malformed(
                source_name,
                format!("expected an array or an object, got {}", json_kind(&other)),
            )),
        }
    }

    /// The ordered items, whichever shape the document had.
    pub fn items(&self) -> &[DatasetItem] {
        match self {
            Dataset::Flat(items) | Dataset::Wrapped { items } => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// ParsedItem / DisplayItem – derived shapes
// ---------------------------------------------------------------------------

/// An item with its `values` folded into a flat key → value mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub metadata: Map<String, JsonValue>,
    pub data: BTreeMap<String, JsonValue>,
}

/// Minimal view-ready projection used for charts and lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayItem {
    pub label: Option<JsonValue>,
    pub weight: Option<JsonValue>,
}
