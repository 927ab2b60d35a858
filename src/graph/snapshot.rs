use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use uuid::Uuid;
use crate::graph::Position;

/// 图的纯数据快照 (持久化 / 执行交接 / 批量导入共用一个形状)
/// 通过 JSON 与 YAML 无损往返。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: Uuid,
    pub node_type: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub config: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub id: Uuid,
    pub source: Uuid,
    pub source_pin: String,
    pub target: Uuid,
    pub target_pin: String,
}

impl GraphSnapshot {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}
