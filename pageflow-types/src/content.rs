//! Content items.

use crate::ids::ContentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property block carried by every content item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentProperties {
    /// Publishing state as reported by the content service.
    pub state: i32,
    /// Last-modified timestamp, passed through verbatim.
    pub modified: String,
    /// Version of the item.
    #[serde(rename = "versionID")]
    pub version_id: i64,
    /// Reference name of the list or item.
    pub reference_name: String,
    /// Name of the content definition (schema).
    pub definition_name: String,
    /// Sort order within its list.
    pub item_order: i64,
}

/// A content item: identifier, property block and an opaque field payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "contentID")]
    pub content_id: ContentId,
    #[serde(default)]
    pub properties: ContentProperties,
    /// Schema-specific fields. Never interpreted by the pipeline.
    #[serde(default)]
    pub fields: Value,
}

impl ContentItem {
    /// Creates an item with default properties.
    #[must_use]
    pub fn new(content_id: ContentId, fields: Value) -> Self {
        Self {
            content_id,
            properties: ContentProperties::default(),
            fields,
        }
    }

    /// Sets the definition name.
    #[must_use]
    pub fn with_definition(mut self, definition_name: impl Into<String>) -> Self {
        self.properties.definition_name = definition_name.into();
        self
    }

    /// Looks up a field by JSON pointer (e.g. `/title`).
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.fields.pointer(pointer)
    }

    /// Looks up a string field by JSON pointer.
    pub fn field_str(&self, pointer: &str) -> Option<&str> {
        self.field(pointer).and_then(Value::as_str)
    }
}
