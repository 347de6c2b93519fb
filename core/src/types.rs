//! Lookup records returned by loaders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single lookup entry: an id and a display name, plus whatever else the
/// loader chose to attach.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeRecord {
    pub id: String,
    pub name: String,
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CodeRecord {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// Two-entry mapping keyed by the given labels. When both labels are equal
    /// the name wins.
    pub fn relabel(&self, id_label: &str, name_label: &str) -> BTreeMap<String, String> {
        let mut row = BTreeMap::new();
        row.insert(id_label.to_string(), self.id.clone());
        row.insert(name_label.to_string(), self.name.clone());
        row
    }
}
