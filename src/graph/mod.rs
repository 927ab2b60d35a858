pub mod builder;
pub mod loader;
pub mod model;
pub mod snapshot;

use std::collections::HashMap;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use crate::catalog::NodeDefinition;
use crate::pins::{PinDirection, PinType};

pub use builder::SnapshotBuilder;
pub use model::GraphModel;
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown node definition: {0}")]
    UnknownDefinition(String),
    #[error("unknown node instance: {0}")]
    UnknownNode(Uuid),
    #[error("unknown {direction:?} pin '{pin}' on node {node}")]
    UnknownPin {
        node: Uuid,
        pin: String,
        direction: PinDirection,
    },
    #[error("self-loop rejected on node {0}")]
    SelfLoop(Uuid),
    #[error("incompatible pin types: {source_type:?} -> {target_type:?}")]
    IncompatiblePinTypes { source_type: PinType, target_type: PinType },
    #[error("bulk replace rejected with {} violation(s)", .0.len())]
    BulkReplaceRejected(Vec<String>),
}

/// 画布坐标
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 画布上已放置的节点实例
/// `node_type` 是可持久化的查找引用；`definition` 钉住放置时刻的引脚形状，
/// Catalog 重新生成后旧实例保持其 last-known shape。
#[derive(Debug, Clone)]
pub struct NodeInstance {
    pub id: Uuid,
    pub node_type: String,
    pub definition: Arc<NodeDefinition>,
    pub position: Position,
    pub config: HashMap<String, Value>,
}

/// 有向边：源实例的输出引脚 -> 目标实例的输入引脚
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Uuid,
    pub source: Uuid,
    pub source_pin: String,
    pub target: Uuid,
    pub target_pin: String,
}
