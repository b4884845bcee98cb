use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::symbols::SymbolFilter;

/// Identity of a tree node, stable for the node's lifetime.
pub type ItemId = u64;

/// Identity of a server-side resource (layer or style).
pub type ResourceId = u64;

/// Display/selection key of a node. The server usually mirrors the numeric
/// id, but older configurations carry string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    Number(i64),
    Text(String),
}

/// Top-level tree configuration as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "root", rename_all = "camelCase")]
pub struct RootConfig {
    pub id: ItemId,
    #[serde(default)]
    pub key: Option<ItemKey>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<ItemConfig>,
}

impl RootConfig {
    /// Empty root, used before the first load.
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            key: None,
            label: String::new(),
            title: String::new(),
            children: Vec::new(),
        }
    }

    /// Parse a root configuration from server JSON.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Serialize the configuration back to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Configuration of a non-root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemConfig {
    Group(GroupConfig),
    Layer(LayerConfig),
}

impl ItemConfig {
    pub fn id(&self) -> ItemId {
        match self {
            ItemConfig::Group(group) => group.id,
            ItemConfig::Layer(layer) => layer.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    pub id: ItemId,
    #[serde(default)]
    pub key: Option<ItemKey>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default)]
    pub children: Vec<ItemConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    pub id: ItemId,
    #[serde(default)]
    pub key: Option<ItemKey>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    pub layer_id: ResourceId,
    pub style_id: ResourceId,
    #[serde(default)]
    pub visibility: bool,
    #[serde(default)]
    pub identifiable: bool,
    #[serde(default)]
    pub transparency: Option<f64>,
    #[serde(default)]
    pub min_scale_denom: Option<f64>,
    #[serde(default)]
    pub max_scale_denom: Option<f64>,
    #[serde(default)]
    pub min_resolution: Option<f64>,
    #[serde(default)]
    pub max_resolution: Option<f64>,
    #[serde(default)]
    pub draw_order_position: Option<i64>,
    #[serde(default)]
    pub legend_info: LegendInfo,
    #[serde(default)]
    pub symbols: SymbolFilter,
    #[serde(default)]
    pub editable: Option<bool>,
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(default)]
    pub plugin: Value,
    #[serde(default)]
    pub identification: Option<Value>,
}

/// How a layer's legend is presented in the layer panel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LegendVisibility {
    #[default]
    Collapse,
    Expand,
    Disable,
}

/// Legend state attached to a layer.
///
/// `symbols == None` means the symbols have not been fetched yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendInfo {
    #[serde(default)]
    pub has_legend: bool,
    #[serde(default)]
    pub symbols: Option<Vec<LegendSymbol>>,
    #[serde(default)]
    pub single: bool,
    #[serde(default)]
    pub open: Option<bool>,
    #[serde(default)]
    pub visible: LegendVisibility,
}

/// One legend entry of a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSymbol {
    pub index: u32,
    #[serde(default)]
    pub render: Option<bool>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub icon: Option<Value>,
}

impl LegendSymbol {
    pub fn new(index: u32, render: Option<bool>) -> Self {
        Self {
            index,
            render,
            display_name: None,
            icon: None,
        }
    }

    /// Whether the server renders this symbol when no filter is applied.
    pub fn renders_by_default(&self) -> bool {
        self.render.unwrap_or(true)
    }
}
