pub mod builtin;
pub mod loader;
pub mod store;

use std::collections::HashSet;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;
use crate::pins::PinType;

pub use store::Catalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid node definition '{node_type}': {reason}")]
    InvalidDefinition { node_type: String, reason: String },
}

/// 节点定义中的单个引脚描述
/// id 在所属定义的同一方向内唯一；定义发布后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinSpec {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    /// Only meaningful on inputs; outputs always carry `false`.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

/// 节点类别 (调色板分区)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Configuration,
    Input,
    Query,
    Output,
}

/// 实例级可编辑属性的字段描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualHint {
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// 节点定义 (模板)
/// 由摄取管线的 generate 阶段或内置注册表创建，发布后永不原地修改；
/// 同一 node_type 重新发布时整体替换 (last-write-wins)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Globally unique node-type identifier, typically `{provider}_{operation}`.
    pub node_type: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub category: NodeCategory,
    /// `None` for built-in nodes.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub inputs: Vec<PinSpec>,
    #[serde(default)]
    pub outputs: Vec<PinSpec>,
    #[serde(default)]
    pub config_fields: Vec<ConfigField>,
    #[serde(default)]
    pub visual: VisualHint,
}

impl NodeDefinition {
    pub fn input(&self, pin_id: &str) -> Option<&PinSpec> {
        self.inputs.iter().find(|p| p.id == pin_id)
    }

    pub fn output(&self, pin_id: &str) -> Option<&PinSpec> {
        self.outputs.iter().find(|p| p.id == pin_id)
    }

    /// Structural validation applied at every publish boundary.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let fail = |reason: String| CatalogError::InvalidDefinition {
            node_type: self.node_type.clone(),
            reason,
        };

        if self.node_type.is_empty() {
            return Err(fail("empty node_type".to_string()));
        }
        if self.display_name.is_empty() {
            return Err(fail("empty display_name".to_string()));
        }

        let mut seen = HashSet::new();
        for pin in &self.inputs {
            if pin.id.is_empty() {
                return Err(fail("input pin with empty id".to_string()));
            }
            if !seen.insert(pin.id.as_str()) {
                return Err(fail(format!("duplicate input pin id: {}", pin.id)));
            }
        }

        seen.clear();
        for pin in &self.outputs {
            if pin.id.is_empty() {
                return Err(fail("output pin with empty id".to_string()));
            }
            if !seen.insert(pin.id.as_str()) {
                return Err(fail(format!("duplicate output pin id: {}", pin.id)));
            }
            if pin.required {
                return Err(fail(format!("output pin marked required: {}", pin.id)));
            }
        }

        Ok(())
    }
}
