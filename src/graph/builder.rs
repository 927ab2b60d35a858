use std::collections::HashMap;
use serde_json::Value;
use uuid::Uuid;
use crate::graph::snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
use crate::graph::Position;

/// Fluent construction of graph snapshots, keyed by short string aliases
/// instead of raw UUIDs. Used by tests and programmatic generators; the
/// result still goes through `apply_bulk_replace` like any other input.
///
/// # Panics
/// `connect` panics on an unknown alias — a typo here is a programming
/// error in the calling code, not a runtime condition.
pub struct SnapshotBuilder {
    aliases: HashMap<String, Uuid>,
    nodes: Vec<NodeSnapshot>,
    edges: Vec<EdgeSnapshot>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(self, alias: &str, node_type: &str) -> Self {
        self.node_at(alias, node_type, 0.0, 0.0)
    }

    pub fn node_at(mut self, alias: &str, node_type: &str, x: f64, y: f64) -> Self {
        let id = Uuid::new_v4();
        self.aliases.insert(alias.to_string(), id);
        self.nodes.push(NodeSnapshot {
            id,
            node_type: node_type.to_string(),
            position: Position { x, y },
            config: HashMap::new(),
        });
        self
    }

    /// Sets a config value on the most recently added node.
    pub fn config(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.config.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn connect(mut self, source: &str, source_pin: &str, target: &str, target_pin: &str) -> Self {
        let source_id = *self.aliases.get(source).expect("unknown source alias");
        let target_id = *self.aliases.get(target).expect("unknown target alias");
        self.edges.push(EdgeSnapshot {
            id: Uuid::new_v4(),
            source: source_id,
            source_pin: source_pin.to_string(),
            target: target_id,
            target_pin: target_pin.to_string(),
        });
        self
    }

    pub fn id_of(&self, alias: &str) -> Option<Uuid> {
        self.aliases.get(alias).copied()
    }

    pub fn build(self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
