use std::collections::HashMap;
use std::sync::Arc;
use serde_json::Value;
use uuid::Uuid;
use crate::catalog::Catalog;
use crate::graph::snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
use crate::graph::{Edge, GraphError, NodeInstance, Position};
use crate::pins::{self, PinDirection};

/// 可编辑的工作流图聚合
///
/// Single-threaded and synchronous: every operation completes before the
/// next is observed. Node removal and its edge cleanup are one step, so no
/// dangling edge is ever observable between calls.
pub struct GraphModel {
    catalog: Arc<Catalog>,
    nodes: HashMap<Uuid, NodeInstance>,
    edges: HashMap<Uuid, Edge>,
}

impl GraphModel {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: Uuid) -> Option<&NodeInstance> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: Uuid) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edges_touching(&self, id: Uuid) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|e| e.source == id || e.target == id)
            .collect()
    }

    /// The at-most-one edge currently feeding an input pin.
    pub fn incoming_edge(&self, target: Uuid, target_pin: &str) -> Option<&Edge> {
        self.edges
            .values()
            .find(|e| e.target == target && e.target_pin == target_pin)
    }

    /// Instantiates a node from a published definition at `position`.
    /// The definition is resolved once and pinned on the instance.
    pub fn add_node(
        &mut self,
        node_type: &str,
        position: Position,
        initial_config: HashMap<String, Value>,
    ) -> Result<Uuid, GraphError> {
        let definition = self
            .catalog
            .get(node_type)
            .ok_or_else(|| GraphError::UnknownDefinition(node_type.to_string()))?;

        let id = Uuid::new_v4();
        self.nodes.insert(id, NodeInstance {
            id,
            node_type: node_type.to_string(),
            definition,
            position,
            config: initial_config,
        });
        Ok(id)
    }

    /// Removes the instance and, in the same step, every edge touching it.
    /// Idempotent: an absent id is a no-op, so duplicate UI delete events
    /// are harmless.
    pub fn remove_node(&mut self, id: Uuid) {
        if self.nodes.remove(&id).is_none() {
            return;
        }
        self.edges.retain(|_, e| e.source != id && e.target != id);
    }

    /// Creates an edge from an output pin to an input pin.
    ///
    /// Validation order is contractual: instances exist, pins exist in the
    /// right direction, no self-loop, then type compatibility. An existing
    /// edge into the target pin is replaced, not stacked (fan-in = 1,
    /// mirroring drag-to-reconnect). Fan-out is unbounded.
    pub fn connect(
        &mut self,
        source: Uuid,
        source_pin: &str,
        target: Uuid,
        target_pin: &str,
    ) -> Result<Uuid, GraphError> {
        // 1. Both instances exist
        let source_node = self.nodes.get(&source).ok_or(GraphError::UnknownNode(source))?;
        let target_node = self.nodes.get(&target).ok_or(GraphError::UnknownNode(target))?;

        // 2. Pins exist in the correct direction
        let out_pin = source_node.definition.output(source_pin).ok_or(GraphError::UnknownPin {
            node: source,
            pin: source_pin.to_string(),
            direction: PinDirection::Output,
        })?;
        let in_pin = target_node.definition.input(target_pin).ok_or(GraphError::UnknownPin {
            node: target,
            pin: target_pin.to_string(),
            direction: PinDirection::Input,
        })?;

        // 3. No self-loop
        if source == target {
            return Err(GraphError::SelfLoop(source));
        }

        // 4. Type compatibility
        if !pins::is_compatible(out_pin.pin_type, in_pin.pin_type) {
            return Err(GraphError::IncompatiblePinTypes {
                source_type: out_pin.pin_type,
                target_type: in_pin.pin_type,
            });
        }

        // 5. Replace any existing edge into the target pin, then append
        self.edges
            .retain(|_, e| !(e.target == target && e.target_pin == target_pin));

        let id = Uuid::new_v4();
        self.edges.insert(id, Edge {
            id,
            source,
            source_pin: source_pin.to_string(),
            target,
            target_pin: target_pin.to_string(),
        });
        Ok(id)
    }

    /// Idempotent edge removal.
    pub fn disconnect(&mut self, edge_id: Uuid) {
        self.edges.remove(&edge_id);
    }

    /// Replaces both collections atomically from a snapshot.
    ///
    /// The whole input is validated first, collecting every violation; on
    /// any violation the model is left byte-for-byte unchanged and the full
    /// list is returned. Bulk intake (e.g. an assistant-generated workflow)
    /// passes through the same rules as interactive edits.
    pub fn apply_bulk_replace(&mut self, snapshot: &GraphSnapshot) -> Result<(), GraphError> {
        let mut violations = Vec::new();

        // 1. Stage nodes, resolving every definition
        let mut staged_nodes: HashMap<Uuid, NodeInstance> = HashMap::new();
        for node in &snapshot.nodes {
            if staged_nodes.contains_key(&node.id) {
                violations.push(format!("duplicate node instance id: {}", node.id));
                continue;
            }
            match self.catalog.get(&node.node_type) {
                Some(definition) => {
                    staged_nodes.insert(node.id, NodeInstance {
                        id: node.id,
                        node_type: node.node_type.clone(),
                        definition,
                        position: node.position,
                        config: node.config.clone(),
                    });
                }
                None => violations.push(format!(
                    "node {}: unknown node definition: {}",
                    node.id, node.node_type
                )),
            }
        }

        // 2. Stage edges, validating against the staged nodes
        let mut staged_edges: HashMap<Uuid, Edge> = HashMap::new();
        for edge in &snapshot.edges {
            if staged_edges.contains_key(&edge.id) {
                violations.push(format!("duplicate edge id: {}", edge.id));
                continue;
            }
            if let Err(reason) = validate_snapshot_edge(edge, &staged_nodes, &staged_edges) {
                violations.push(format!("edge {}: {}", edge.id, reason));
                continue;
            }
            staged_edges.insert(edge.id, Edge {
                id: edge.id,
                source: edge.source,
                source_pin: edge.source_pin.clone(),
                target: edge.target,
                target_pin: edge.target_pin.clone(),
            });
        }

        if !violations.is_empty() {
            return Err(GraphError::BulkReplaceRejected(violations));
        }

        // 3. Commit: single swap of both collections
        self.nodes = staged_nodes;
        self.edges = staged_edges;
        Ok(())
    }

    /// Pure projection for persistence and execution hand-off.
    /// Sorted by id so exports are diff-stable.
    pub fn export_snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<NodeSnapshot> = self
            .nodes
            .values()
            .map(|n| NodeSnapshot {
                id: n.id,
                node_type: n.node_type.clone(),
                position: n.position,
                config: n.config.clone(),
            })
            .collect();
        nodes.sort_by_key(|n| n.id);

        let mut edges: Vec<EdgeSnapshot> = self
            .edges
            .values()
            .map(|e| EdgeSnapshot {
                id: e.id,
                source: e.source,
                source_pin: e.source_pin.clone(),
                target: e.target,
                target_pin: e.target_pin.clone(),
            })
            .collect();
        edges.sort_by_key(|e| e.id);

        GraphSnapshot { nodes, edges }
    }
}

fn validate_snapshot_edge(
    edge: &EdgeSnapshot,
    nodes: &HashMap<Uuid, NodeInstance>,
    accepted: &HashMap<Uuid, Edge>,
) -> Result<(), String> {
    let source_node = nodes
        .get(&edge.source)
        .ok_or_else(|| format!("unknown source instance: {}", edge.source))?;
    let target_node = nodes
        .get(&edge.target)
        .ok_or_else(|| format!("unknown target instance: {}", edge.target))?;

    let out_pin = source_node
        .definition
        .output(&edge.source_pin)
        .ok_or_else(|| format!("unknown output pin '{}' on {}", edge.source_pin, edge.source))?;
    let in_pin = target_node
        .definition
        .input(&edge.target_pin)
        .ok_or_else(|| format!("unknown input pin '{}' on {}", edge.target_pin, edge.target))?;

    if edge.source == edge.target {
        return Err(format!("self-loop on node {}", edge.source));
    }

    if !pins::is_compatible(out_pin.pin_type, in_pin.pin_type) {
        return Err(format!(
            "incompatible pin types: {:?} -> {:?}",
            out_pin.pin_type, in_pin.pin_type
        ));
    }

    // Bulk input must already respect fan-in = 1; unlike interactive
    // connect there is no gesture ordering to disambiguate a replacement.
    let occupied = accepted
        .values()
        .any(|e| e.target == edge.target && e.target_pin == edge.target_pin);
    if occupied {
        return Err(format!(
            "input pin '{}' on {} already has an incoming edge",
            edge.target_pin, edge.target
        ));
    }

    Ok(())
}
