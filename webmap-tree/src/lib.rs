//! Layer tree state model behind the web map viewer's layer panel.
//!
//! The crate is UI-agnostic. It keeps the tree of map layers and groups
//! received from the server, enforces the invariants the panel relies on and
//! exposes derived views to whatever renders the map:
//! - [`TreeStore`] owns every node in a flat id map and exposes the
//!   mutation API (load, insert, move, delete, visibility and expansion);
//! - [`validate_visible`] resolves visibility conflicts inside exclusive
//!   groups, innermost group first;
//! - [`SymbolFilter`] encodes which legend symbols of a layer render;
//! - [`update_resource_legend_symbols`] coordinates legend fetches through an
//!   injected [`LegendSource`].
//!
//! Mutations settle before they return: draw order is recomputed when the
//! tree shape changed (if enabled), exclusive visibility is reconciled, and
//! only then are [`TreeEvent`]s delivered to subscribers.
//!
//! # Quick Example
//!
//! ```
//! use webmap_tree::{RootConfig, TreeStore, TreeStoreOptions};
//!
//! let config = RootConfig::from_json(
//!     r#"{
//!         "type": "root", "id": 0,
//!         "children": [
//!             { "type": "group", "id": 1, "exclusive": true, "children": [
//!                 { "type": "layer", "id": 2, "layerId": 5, "styleId": 6, "visibility": true },
//!                 { "type": "layer", "id": 3, "layerId": 7, "styleId": 8 }
//!             ] }
//!         ]
//!     }"#,
//! )?;
//! let mut store = TreeStore::from_config(&config, TreeStoreOptions::default())?;
//!
//! store.set_visibility(3, true);
//!
//! assert_eq!(store.visible_layer_ids(), &[3]);
//! # Ok::<(), webmap_tree::TreeError>(())
//! ```

mod config;
mod error;
mod event;
mod flatten;
mod item;
mod legend;
mod options;
mod store;
mod symbols;
mod util;

pub use config::{
    GroupConfig, ItemConfig, ItemId, ItemKey, LayerConfig, LegendInfo,
    LegendSymbol, LegendVisibility, ResourceId, RootConfig,
};
pub use error::{LegendError, Result, TreeError};
pub use event::TreeEvent;
pub use flatten::{TreePath, TreeRow, flatten_tree};
pub use item::{
    GroupPatch, ItemChanges, ItemType, LayerPatch, TreeGroup, TreeItem,
    TreeLayer,
};
pub use legend::{
    LegendFetch, LegendSource, LegendSymbols, update_resource_legend_symbols,
};
pub use options::TreeStoreOptions;
pub use store::{StructureStamp, TreeStore};
pub use symbols::{NOTHING_SENTINEL, SymbolFilter, SymbolRange};
pub use util::{filter, validate_visible};
