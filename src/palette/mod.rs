use std::sync::Arc;
use serde::{Serialize, Deserialize};
use crate::catalog::{Catalog, NodeCategory, NodeDefinition};

/// 调色板条目 (展示用只读投影)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub node_type: String,
    pub display_name: String,
    pub category: NodeCategory,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteGroup {
    /// `None` groups the built-in nodes.
    pub provider: Option<String>,
    pub entries: Vec<PaletteEntry>,
}

/// Pure projection of the catalog for presentation: built-ins first, then
/// providers in lexicographic order. Recomputed on demand, holds no state.
pub fn palette(catalog: &Catalog) -> Vec<PaletteGroup> {
    catalog
        .list_by_provider()
        .into_iter()
        .map(|(provider, defs)| PaletteGroup {
            provider,
            entries: defs.iter().map(|d| entry(d)).collect(),
        })
        .collect()
}

fn entry(def: &Arc<NodeDefinition>) -> PaletteEntry {
    PaletteEntry {
        node_type: def.node_type.clone(),
        display_name: def.display_name.clone(),
        category: def.category,
        icon: def.visual.icon.clone(),
    }
}
