use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use serde_json::json;
use anyhow::{Result, anyhow};
use reqwest::Client;
use crate::catalog::{CatalogError, NodeCategory, NodeDefinition, ConfigField, PinSpec, VisualHint};
use crate::pins::PinType;
use crate::pipeline::job::{ParseSummary, PipelineError};

/// 上传的规格文档 (JSON 或 YAML 文本)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    pub file_name: String,
    pub content: String,
}

impl SpecDocument {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Structural format check applied before any network interaction.
    /// Whitelist by extension, then verify the content actually is a JSON
    /// object or a YAML mapping — the pipeline never inspects the spec
    /// beyond this shape check.
    pub fn check_format(&self) -> Result<(), PipelineError> {
        let unsupported = || PipelineError::UnsupportedFormat(self.file_name.clone());

        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or_else(unsupported)?;

        match extension.as_str() {
            "json" => {
                let value: serde_json::Value =
                    serde_json::from_str(&self.content).map_err(|_| unsupported())?;
                if !value.is_object() {
                    return Err(unsupported());
                }
            }
            "yaml" | "yml" => {
                let value: serde_yaml::Value =
                    serde_yaml::from_str(&self.content).map_err(|_| unsupported())?;
                if !value.is_mapping() {
                    return Err(unsupported());
                }
            }
            _ => return Err(unsupported()),
        }
        Ok(())
    }
}

/// 外部解析/生成服务的接口
/// upload 返回存储服务的不透明标识；后续阶段只携带该标识。
#[async_trait]
pub trait SpecService: Send + Sync {
    async fn upload(&self, provider: &str, document: &SpecDocument) -> Result<String>;
    async fn parse(&self, upload_id: &str) -> Result<ParseSummary>;
    async fn generate(&self, upload_id: &str) -> Result<Vec<GeneratedDefinition>>;
}

/// generate 响应中的引脚记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPin {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

/// generate 响应中的节点定义记录
/// Missing required fields fail deserialization at the boundary; a record
/// that deserializes but is structurally invalid is rejected by
/// `into_definition`, never handed to the Catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDefinition {
    pub node_type: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: NodeCategory,
    #[serde(default)]
    pub inputs: Vec<GeneratedPin>,
    #[serde(default)]
    pub outputs: Vec<GeneratedPin>,
    #[serde(default)]
    pub config_fields: Vec<ConfigField>,
    #[serde(default)]
    pub visual: VisualHint,
}

fn default_category() -> NodeCategory {
    NodeCategory::Query
}

impl GeneratedDefinition {
    /// Converts the wire record into a validated catalog definition.
    /// Output pins are forced to `required = false` regardless of what the
    /// service sent.
    pub fn into_definition(self, provider: &str) -> Result<NodeDefinition, CatalogError> {
        let to_spec = |p: GeneratedPin, required: bool| PinSpec {
            id: p.id,
            label: p.label,
            pin_type: p.pin_type,
            required,
            description: p.description,
        };

        let definition = NodeDefinition {
            node_type: self.node_type,
            display_name: self.display_name,
            description: self.description,
            category: self.category,
            provider: Some(provider.to_string()),
            inputs: self.inputs.into_iter().map(|p| {
                let required = p.required;
                to_spec(p, required)
            }).collect(),
            outputs: self.outputs.into_iter().map(|p| to_spec(p, false)).collect(),
            config_fields: self.config_fields,
            visual: self.visual,
        };

        definition.validate()?;
        Ok(definition)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_id: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    ok: bool,
    #[serde(default)]
    operation_count: usize,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    nodes: Vec<GeneratedDefinition>,
}

/// 基于 HTTP 的外部服务实现
pub struct HttpSpecService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpSpecService {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn request(&self, path: &str, body: serde_json::Value) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl SpecService for HttpSpecService {
    async fn upload(&self, provider: &str, document: &SpecDocument) -> Result<String> {
        let response = self
            .request("/specs/upload", json!({
                "provider": provider,
                "file_name": document.file_name,
                "content": document.content,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("upload failed with status {}", response.status()));
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.upload_id)
    }

    async fn parse(&self, upload_id: &str) -> Result<ParseSummary> {
        let response = self
            .request(&format!("/specs/{}/parse", upload_id), json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("parse failed with status {}", response.status()));
        }

        let body: ParseResponse = response.json().await?;
        if !body.ok {
            return Err(anyhow!(body.error.unwrap_or_else(|| "parse rejected".to_string())));
        }

        Ok(ParseSummary {
            operation_count: body.operation_count,
        })
    }

    async fn generate(&self, upload_id: &str) -> Result<Vec<GeneratedDefinition>> {
        let response = self
            .request(&format!("/specs/{}/generate", upload_id), json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("generate failed with status {}", response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.nodes)
    }
}
