use anyhow::{Result, Context as AnyhowContext};
use std::fs;
use std::path::Path;
use crate::graph::snapshot::GraphSnapshot;

pub fn load_snapshot_from_yaml(file_path: &Path) -> Result<GraphSnapshot> {
    let yaml_content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snapshot file from {}", file_path.display()))?;

    let snapshot: GraphSnapshot = serde_yaml::from_str(&yaml_content)
        .with_context(|| format!("Failed to deserialize snapshot from {}", file_path.display()))?;

    Ok(snapshot)
}

pub fn load_snapshot_from_json(file_path: &Path) -> Result<GraphSnapshot> {
    let json_content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snapshot file from {}", file_path.display()))?;

    let snapshot: GraphSnapshot = serde_json::from_str(&json_content)
        .with_context(|| format!("Failed to deserialize snapshot from {}", file_path.display()))?;

    Ok(snapshot)
}

/// Picks the loader from the file extension (`.yaml` / `.yml` vs `.json`).
pub fn load_snapshot(file_path: &Path) -> Result<GraphSnapshot> {
    match file_path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_snapshot_from_yaml(file_path),
        Some("json") => load_snapshot_from_json(file_path),
        other => anyhow::bail!(
            "Unsupported snapshot extension {:?} for {}",
            other,
            file_path.display()
        ),
    }
}
