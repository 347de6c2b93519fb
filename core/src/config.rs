//! Declarative handler configuration.
//!
//! `CodeHandlerConfig` is what a config file carries. `HandlerSettings` is the
//! resolved form the handler keeps for its whole lifetime: defaults filled in,
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

pub const DEFAULT_RESOURCE: &str = "code";
pub const DEFAULT_ACTION: &str = "load";

/// Config-file shape. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeHandlerConfig {
    /// Whether a master category must be taken from the request. Absent means
    /// required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
}

/// Resolved, immutable handler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    pub require_master: bool,
    pub resource: String,
    pub action: String,
    pub id_label: String,
    pub name_label: String,
}

impl HandlerSettings {
    /// Responses are remapped unless both labels are empty.
    pub fn remaps(&self) -> bool {
        !(self.id_label.is_empty() && self.name_label.is_empty())
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            require_master: true,
            resource: DEFAULT_RESOURCE.to_string(),
            action: DEFAULT_ACTION.to_string(),
            id_label: String::new(),
            name_label: String::new(),
        }
    }
}

impl From<&CodeHandlerConfig> for HandlerSettings {
    fn from(c: &CodeHandlerConfig) -> Self {
        Self {
            require_master: c.master.unwrap_or(true),
            resource: or_default(&c.resource, DEFAULT_RESOURCE),
            action: or_default(&c.action, DEFAULT_ACTION),
            id_label: c.id.clone(),
            name_label: c.name.clone(),
        }
    }
}

pub(crate) fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
