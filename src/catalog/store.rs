use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::info;
use crate::catalog::{CatalogError, NodeDefinition};

/// 已发布节点定义的注册表，按 node_type 索引。
///
/// Read-mostly shared state. A single write section covers every entry of a
/// publish call, so concurrent readers observe each publish all-or-nothing
/// and never a partially-updated provider set.
pub struct Catalog {
    entries: RwLock<HashMap<String, Arc<NodeDefinition>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Idempotent upsert by node-type id. A prior definition with the same id
    /// is replaced wholesale (pin lists are never merged). Validation happens
    /// before the write lock is taken, so a rejected batch publishes nothing.
    pub fn publish(&self, definitions: Vec<NodeDefinition>) -> Result<(), CatalogError> {
        for def in &definitions {
            def.validate()?;
        }

        let mut entries = self.entries.write().expect("catalog lock poisoned");
        for def in definitions {
            entries.insert(def.node_type.clone(), Arc::new(def));
        }
        Ok(())
    }

    /// Atomic provider-scoped replace: every definition currently owned by
    /// `provider` is dropped, then the new set is inserted, under one write
    /// lock. Used by `generate` re-runs so a regeneration replaces the
    /// provider's set instead of accreting entries.
    pub fn publish_provider(
        &self,
        provider: &str,
        definitions: Vec<NodeDefinition>,
    ) -> Result<(), CatalogError> {
        for def in &definitions {
            def.validate()?;
        }

        let mut entries = self.entries.write().expect("catalog lock poisoned");
        entries.retain(|_, def| def.provider.as_deref() != Some(provider));
        let count = definitions.len();
        for def in definitions {
            entries.insert(def.node_type.clone(), Arc::new(def));
        }
        info!(provider = provider, count = count, "Published provider definitions");
        Ok(())
    }

    pub fn get(&self, node_type: &str) -> Option<Arc<NodeDefinition>> {
        let entries = self.entries.read().expect("catalog lock poisoned");
        entries.get(node_type).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("catalog lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grouping for palette presentation. `None` keys the built-in nodes.
    /// Entries within a group are sorted by node_type for stable display.
    pub fn list_by_provider(&self) -> BTreeMap<Option<String>, Vec<Arc<NodeDefinition>>> {
        let entries = self.entries.read().expect("catalog lock poisoned");
        let mut groups: BTreeMap<Option<String>, Vec<Arc<NodeDefinition>>> = BTreeMap::new();
        for def in entries.values() {
            groups.entry(def.provider.clone()).or_default().push(def.clone());
        }
        for defs in groups.values_mut() {
            defs.sort_by(|a, b| a.node_type.cmp(&b.node_type));
        }
        groups
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
