use serde::{Serialize, Deserialize};
use thiserror::Error;
use uuid::Uuid;
use crate::catalog::CatalogError;
use crate::pipeline::service::SpecDocument;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid provider name '{0}': must match [a-z0-9_]+")]
    InvalidProviderName(String),
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("unknown ingestion job: {0}")]
    UnknownJob(Uuid),
    #[error("stage {requested:?} not ready: job is at {current}")]
    StageNotReady {
        requested: StageKind,
        current: String,
    },
    #[error("generation returned no node definitions")]
    NoNodesGenerated,
    #[error("stage {0:?} timed out")]
    Timeout(StageKind),
    #[error("external service failure: {0}")]
    Service(String),
    #[error("generated record rejected: {0}")]
    Rejected(#[from] CatalogError),
}

/// 管线的三个外部调用阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Upload,
    Parse,
    Generate,
}

/// 单个任务的状态机
/// Created -> Uploaded -> Parsed -> Generated (终态)；任一阶段可转入
/// Failed，Failed 只能由用户显式重试同一阶段推进，绝不自动重试。
#[derive(Debug, Clone, PartialEq)]
pub enum JobStage {
    Created,
    Uploaded,
    Parsed,
    Generated,
    Failed { at: StageKind, reason: String },
}

impl JobStage {
    pub fn describe(&self) -> String {
        match self {
            JobStage::Created => "created".to_string(),
            JobStage::Uploaded => "uploaded".to_string(),
            JobStage::Parsed => "parsed".to_string(),
            JobStage::Generated => "generated".to_string(),
            JobStage::Failed { at, reason } => format!("failed at {:?}: {}", at, reason),
        }
    }
}

/// 解析阶段返回的结构摘要，用于用户反馈。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub operation_count: usize,
}

/// 一次提供方规格摄取任务
#[derive(Debug, Clone)]
pub struct IngestionJob {
    pub id: Uuid,
    pub provider: String,
    pub document: SpecDocument,
    pub stage: JobStage,
    /// Opaque identifier returned by the external storage service.
    pub upload_id: Option<String>,
    pub summary: Option<ParseSummary>,
    /// Number of definitions published by the last successful generate.
    pub generated: usize,
}

impl IngestionJob {
    pub fn new(provider: String, document: SpecDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            document,
            stage: JobStage::Created,
            upload_id: None,
            summary: None,
            generated: 0,
        }
    }
}
