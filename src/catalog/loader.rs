use anyhow::{Result, Context as AnyhowContext};
use std::fs;
use std::path::Path;
use crate::catalog::NodeDefinition;

/// Loads statically-defined node definitions (built-ins or exported provider
/// sets) from a JSON file containing an array of definition records.
pub fn load_definitions_from_json(file_path: &Path) -> Result<Vec<NodeDefinition>> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read definitions file from {}", file_path.display()))?;

    let definitions: Vec<NodeDefinition> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to deserialize definitions from {}", file_path.display()))?;

    Ok(definitions)
}
