//! In-memory loader backing the demo server.

use std::collections::BTreeMap;

use async_trait::async_trait;
use code_core::{CodeLoader, CodeRecord, LoadError, RequestContext};

/// Fixed code lists keyed by master category. An unknown category yields an
/// empty list; an empty category yields every record.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    categories: BTreeMap<String, Vec<CodeRecord>>,
}

impl MemoryLoader {
    pub fn new(categories: BTreeMap<String, Vec<CodeRecord>>) -> Self {
        Self { categories }
    }

    pub fn insert(&mut self, master: &str, records: Vec<CodeRecord>) {
        self.categories.insert(master.to_string(), records);
    }
}

#[async_trait]
impl CodeLoader for MemoryLoader {
    async fn load(&self, _ctx: &RequestContext, master: &str) -> Result<Vec<CodeRecord>, LoadError> {
        if master.is_empty() {
            return Ok(self.categories.values().flatten().cloned().collect());
        }
        Ok(self.categories.get(master).cloned().unwrap_or_default())
    }
}
