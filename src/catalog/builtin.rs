use crate::catalog::{NodeCategory, NodeDefinition, PinSpec, VisualHint, ConfigField};
use crate::pins::PinType;

fn pin(id: &str, label: &str, pin_type: PinType, required: bool) -> PinSpec {
    PinSpec {
        id: id.to_string(),
        label: label.to_string(),
        pin_type,
        required,
        description: String::new(),
    }
}

/// 内置节点定义 (provider = None)，进程启动时发布到 Catalog。
pub fn builtin_definitions() -> Vec<NodeDefinition> {
    vec![
        NodeDefinition {
            node_type: "manual_input".to_string(),
            display_name: "Manual Input".to_string(),
            description: "Starts a workflow with a user-supplied value".to_string(),
            category: NodeCategory::Input,
            provider: None,
            inputs: vec![],
            outputs: vec![
                pin("exec_out", "Next", PinType::Execution, false),
                pin("value", "Value", PinType::Any, false),
            ],
            config_fields: vec![ConfigField {
                key: "value".to_string(),
                label: "Initial value".to_string(),
                field_type: Some("text".to_string()),
                default: None,
            }],
            visual: VisualHint {
                icon: Some("play".to_string()),
                color: Some("#4caf50".to_string()),
            },
        },
        NodeDefinition {
            node_type: "display_output".to_string(),
            display_name: "Display Output".to_string(),
            description: "Terminal sink that surfaces a value to the user".to_string(),
            category: NodeCategory::Output,
            provider: None,
            inputs: vec![
                pin("exec_in", "Run", PinType::Execution, true),
                pin("value", "Value", PinType::Any, false),
            ],
            outputs: vec![],
            config_fields: vec![],
            visual: VisualHint {
                icon: Some("monitor".to_string()),
                color: Some("#2196f3".to_string()),
            },
        },
        NodeDefinition {
            node_type: "api_credentials".to_string(),
            display_name: "API Credentials".to_string(),
            description: "Holds a credential set consumed by provider nodes".to_string(),
            category: NodeCategory::Configuration,
            provider: None,
            inputs: vec![],
            outputs: vec![pin("credentials", "Credentials", PinType::Credentials, false)],
            config_fields: vec![ConfigField {
                key: "api_key".to_string(),
                label: "API key".to_string(),
                field_type: Some("secret".to_string()),
                default: None,
            }],
            visual: VisualHint {
                icon: Some("key".to_string()),
                color: Some("#ff9800".to_string()),
            },
        },
    ]
}
