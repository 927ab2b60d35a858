use anyhow::{Result, Context as AnyhowContext};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use crate::pipeline::PipelineOptions;

/// 进程级应用配置
/// Explicit load-at-start / save-on-change lifecycle, injected into the
/// components that need it; the graph core never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_secs: u64,
    #[serde(default = "default_generate_timeout")]
    pub generate_timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://127.0.0.1:8460".to_string()
}

fn default_true() -> bool {
    true
}

fn default_stage_timeout() -> u64 {
    30
}

fn default_generate_timeout() -> u64 {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            api_key: None,
            auto_advance: true,
            stage_timeout_secs: default_stage_timeout(),
            generate_timeout_secs: default_generate_timeout(),
        }
    }
}

impl AppConfig {
    /// Missing file is not an error: first start runs on defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to deserialize config from {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            stage_timeout: Duration::from_secs(self.stage_timeout_secs),
            generate_timeout: Duration::from_secs(self.generate_timeout_secs),
            auto_advance: self.auto_advance,
        }
    }
}
