use bitflags::bitflags;
use serde_json::Value;

use crate::config::{
    GroupConfig, ItemConfig, ItemId, ItemKey, LayerConfig, LegendInfo,
    LegendSymbol, ResourceId,
};
use crate::symbols::{SymbolFilter, SymbolRange};

bitflags! {
    /// Fields touched by an update. Empty when the update was a no-op.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemChanges: u32 {
        const KEY = 1 << 0;
        const LABEL = 1 << 1;
        const TITLE = 1 << 2;
        const PARENT = 1 << 3;
        const VISIBILITY = 1 << 4;
        const IDENTIFIABLE = 1 << 5;
        const TRANSPARENCY = 1 << 6;
        const SCALE = 1 << 7;
        const RESOLUTION = 1 << 8;
        const DRAW_ORDER = 1 << 9;
        const LEGEND_INFO = 1 << 10;
        const SYMBOLS = 1 << 11;
        const EDITABLE = 1 << 12;
        const ADAPTER = 1 << 13;
        const PLUGIN = 1 << 14;
        const EXPANDED = 1 << 15;
        const EXCLUSIVE = 1 << 16;
    }
}

/// Variant discriminator of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Layer,
    Group,
}

/// A node of the layer tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeItem {
    Layer(TreeLayer),
    Group(TreeGroup),
}

impl TreeItem {
    /// Build a single node from its configuration. Group children are not
    /// materialized; the store does that while inserting a subtree.
    pub fn from_config(config: &ItemConfig, parent_id: Option<ItemId>) -> Self {
        match config {
            ItemConfig::Layer(layer) => {
                TreeItem::Layer(TreeLayer::from_config(layer, parent_id))
            },
            ItemConfig::Group(group) => {
                TreeItem::Group(TreeGroup::from_config(group, parent_id))
            },
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            TreeItem::Layer(layer) => layer.id,
            TreeItem::Group(group) => group.id,
        }
    }

    pub fn key(&self) -> Option<&ItemKey> {
        match self {
            TreeItem::Layer(layer) => layer.key.as_ref(),
            TreeItem::Group(group) => group.key.as_ref(),
        }
    }

    /// Containing group, `None` for direct children of the root.
    pub fn parent_id(&self) -> Option<ItemId> {
        match self {
            TreeItem::Layer(layer) => layer.parent_id,
            TreeItem::Group(group) => group.parent_id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TreeItem::Layer(layer) => &layer.label,
            TreeItem::Group(group) => &group.label,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            TreeItem::Layer(layer) => &layer.title,
            TreeItem::Group(group) => &group.title,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            TreeItem::Layer(_) => ItemType::Layer,
            TreeItem::Group(_) => ItemType::Group,
        }
    }

    pub fn is_layer(&self) -> bool {
        matches!(self, TreeItem::Layer(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, TreeItem::Group(_))
    }

    pub fn as_layer(&self) -> Option<&TreeLayer> {
        match self {
            TreeItem::Layer(layer) => Some(layer),
            TreeItem::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&TreeGroup> {
        match self {
            TreeItem::Group(group) => Some(group),
            TreeItem::Layer(_) => None,
        }
    }

    pub(crate) fn as_layer_mut(&mut self) -> Option<&mut TreeLayer> {
        match self {
            TreeItem::Layer(layer) => Some(layer),
            TreeItem::Group(_) => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut TreeGroup> {
        match self {
            TreeItem::Group(group) => Some(group),
            TreeItem::Layer(_) => None,
        }
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: Option<ItemId>) {
        match self {
            TreeItem::Layer(layer) => layer.parent_id = parent_id,
            TreeItem::Group(group) => group.parent_id = parent_id,
        }
    }

    /// Configuration of this node alone; group children are left empty.
    pub fn dump(&self) -> ItemConfig {
        match self {
            TreeItem::Layer(layer) => ItemConfig::Layer(layer.dump()),
            TreeItem::Group(group) => ItemConfig::Group(group.dump()),
        }
    }
}

/// Leaf node representing a renderable map layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayer {
    id: ItemId,
    key: Option<ItemKey>,
    parent_id: Option<ItemId>,
    label: String,
    title: String,
    layer_id: ResourceId,
    style_id: ResourceId,
    visibility: bool,
    identifiable: bool,
    transparency: Option<f64>,
    min_scale_denom: Option<f64>,
    max_scale_denom: Option<f64>,
    min_resolution: Option<f64>,
    max_resolution: Option<f64>,
    draw_order_position: Option<i64>,
    legend_info: LegendInfo,
    symbols: SymbolFilter,
    editable: Option<bool>,
    adapter: Option<String>,
    plugin: Value,
    identification: Option<Value>,
}

impl TreeLayer {
    pub fn from_config(
        config: &LayerConfig,
        parent_id: Option<ItemId>,
    ) -> Self {
        Self {
            id: config.id,
            key: config.key.clone(),
            parent_id,
            label: config.label.clone(),
            title: config.title.clone(),
            layer_id: config.layer_id,
            style_id: config.style_id,
            visibility: config.visibility,
            identifiable: config.identifiable,
            transparency: config.transparency,
            min_scale_denom: config.min_scale_denom,
            max_scale_denom: config.max_scale_denom,
            min_resolution: config.min_resolution,
            max_resolution: config.max_resolution,
            draw_order_position: config.draw_order_position,
            legend_info: config.legend_info.clone(),
            symbols: config.symbols.clone(),
            editable: config.editable,
            adapter: config.adapter.clone(),
            plugin: config.plugin.clone(),
            identification: config.identification.clone(),
        }
    }

    pub fn dump(&self) -> LayerConfig {
        LayerConfig {
            id: self.id,
            key: self.key.clone(),
            label: self.label.clone(),
            title: self.title.clone(),
            layer_id: self.layer_id,
            style_id: self.style_id,
            visibility: self.visibility,
            identifiable: self.identifiable,
            transparency: self.transparency,
            min_scale_denom: self.min_scale_denom,
            max_scale_denom: self.max_scale_denom,
            min_resolution: self.min_resolution,
            max_resolution: self.max_resolution,
            draw_order_position: self.draw_order_position,
            legend_info: self.legend_info.clone(),
            symbols: self.symbols.clone(),
            editable: self.editable,
            adapter: self.adapter.clone(),
            plugin: self.plugin.clone(),
            identification: self.identification.clone(),
        }
    }

    /// Place the layer under `parent_id` before inserting it.
    pub fn with_parent(mut self, parent_id: Option<ItemId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn parent_id(&self) -> Option<ItemId> {
        self.parent_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layer_id(&self) -> ResourceId {
        self.layer_id
    }

    pub fn style_id(&self) -> ResourceId {
        self.style_id
    }

    pub fn visibility(&self) -> bool {
        self.visibility
    }

    pub fn identifiable(&self) -> bool {
        self.identifiable
    }

    pub fn transparency(&self) -> Option<f64> {
        self.transparency
    }

    pub fn min_scale_denom(&self) -> Option<f64> {
        self.min_scale_denom
    }

    pub fn max_scale_denom(&self) -> Option<f64> {
        self.max_scale_denom
    }

    pub fn min_resolution(&self) -> Option<f64> {
        self.min_resolution
    }

    pub fn max_resolution(&self) -> Option<f64> {
        self.max_resolution
    }

    /// Lower values render first (bottom of the map stack).
    pub fn draw_order_position(&self) -> Option<i64> {
        self.draw_order_position
    }

    pub fn legend_info(&self) -> &LegendInfo {
        &self.legend_info
    }

    pub fn symbols(&self) -> &SymbolFilter {
        &self.symbols
    }

    pub fn editable(&self) -> Option<bool> {
        self.editable
    }

    pub fn adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }

    pub fn plugin(&self) -> &Value {
        &self.plugin
    }

    pub fn identification(&self) -> Option<&Value> {
        self.identification.as_ref()
    }

    /// Whether legend symbols still have to be fetched for this layer.
    pub fn needs_legend_symbols(&self) -> bool {
        self.legend_info.has_legend && self.legend_info.symbols.is_none()
    }

    /// Whether a single legend symbol renders under the current filter.
    pub fn symbol_renders(&self, index: u32) -> bool {
        self.symbols.renders_index(index, self.known_symbols())
    }

    /// Apply a partial update, returning the set of fields that actually
    /// changed.
    ///
    /// Legend symbols, once fetched, are never reset to the unfetched state.
    pub fn update(&mut self, patch: LayerPatch) -> ItemChanges {
        let mut changes = ItemChanges::empty();
        assign(&mut self.key, patch.key, ItemChanges::KEY, &mut changes);
        assign(&mut self.label, patch.label, ItemChanges::LABEL, &mut changes);
        assign(&mut self.title, patch.title, ItemChanges::TITLE, &mut changes);
        assign(
            &mut self.visibility,
            patch.visibility,
            ItemChanges::VISIBILITY,
            &mut changes,
        );
        assign(
            &mut self.identifiable,
            patch.identifiable,
            ItemChanges::IDENTIFIABLE,
            &mut changes,
        );
        assign(
            &mut self.transparency,
            patch.transparency,
            ItemChanges::TRANSPARENCY,
            &mut changes,
        );
        assign(
            &mut self.min_scale_denom,
            patch.min_scale_denom,
            ItemChanges::SCALE,
            &mut changes,
        );
        assign(
            &mut self.max_scale_denom,
            patch.max_scale_denom,
            ItemChanges::SCALE,
            &mut changes,
        );
        assign(
            &mut self.min_resolution,
            patch.min_resolution,
            ItemChanges::RESOLUTION,
            &mut changes,
        );
        assign(
            &mut self.max_resolution,
            patch.max_resolution,
            ItemChanges::RESOLUTION,
            &mut changes,
        );
        assign(
            &mut self.draw_order_position,
            patch.draw_order_position,
            ItemChanges::DRAW_ORDER,
            &mut changes,
        );

        let legend_info = patch.legend_info.map(|mut info| {
            if info.symbols.is_none() {
                info.symbols = self.legend_info.symbols.clone();
            }
            info
        });
        assign(
            &mut self.legend_info,
            legend_info,
            ItemChanges::LEGEND_INFO,
            &mut changes,
        );

        assign(
            &mut self.symbols,
            patch.symbols,
            ItemChanges::SYMBOLS,
            &mut changes,
        );
        assign(
            &mut self.editable,
            patch.editable,
            ItemChanges::EDITABLE,
            &mut changes,
        );
        assign(
            &mut self.adapter,
            patch.adapter,
            ItemChanges::ADAPTER,
            &mut changes,
        );
        assign(
            &mut self.plugin,
            patch.plugin,
            ItemChanges::PLUGIN,
            &mut changes,
        );
        changes
    }

    /// Toggle the render flag of one legend symbol and store the compacted
    /// filter.
    ///
    /// Turning a symbol off under the "no filter" state needs the fetched
    /// legend symbols to know what else stays on; without them the toggle
    /// is ignored.
    pub fn set_layer_legend_symbol(
        &mut self,
        index: u32,
        render: bool,
    ) -> ItemChanges {
        let Some(filter) =
            self.symbols.with_index(index, render, self.known_symbols())
        else {
            if !render {
                log::warn!(
                    "layer {} has no legend symbols yet, cannot hide {index}",
                    self.id
                );
            }
            return ItemChanges::empty();
        };

        self.update(LayerPatch::default().with_symbols(filter))
    }

    /// Store an explicit list of symbol intervals; an empty list means
    /// nothing renders.
    pub fn set_item_symbols(
        &mut self,
        ranges: Vec<SymbolRange>,
    ) -> ItemChanges {
        let filter = SymbolFilter::from_ranges(ranges);
        self.update(LayerPatch::default().with_symbols(filter))
    }

    pub(crate) fn set_draw_order_position(&mut self, position: i64) -> bool {
        !self
            .update(LayerPatch {
                draw_order_position: Some(Some(position)),
                ..LayerPatch::default()
            })
            .is_empty()
    }

    fn known_symbols(&self) -> Option<&[LegendSymbol]> {
        self.legend_info.symbols.as_deref()
    }
}

/// Container node representing a folder of layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeGroup {
    id: ItemId,
    key: Option<ItemKey>,
    parent_id: Option<ItemId>,
    label: String,
    title: String,
    expanded: bool,
    exclusive: bool,
    children_ids: Vec<ItemId>,
}

impl TreeGroup {
    /// Empty, collapsed, non-exclusive group.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        let title = title.into();
        let key = i64::try_from(id)
            .map_or_else(|_| ItemKey::Text(id.to_string()), ItemKey::Number);
        Self {
            id,
            key: Some(key),
            parent_id: None,
            label: title.clone(),
            title,
            expanded: false,
            exclusive: false,
            children_ids: Vec::new(),
        }
    }

    pub fn from_config(
        config: &GroupConfig,
        parent_id: Option<ItemId>,
    ) -> Self {
        Self {
            id: config.id,
            key: config.key.clone(),
            parent_id,
            label: config.label.clone(),
            title: config.title.clone(),
            expanded: config.expanded,
            exclusive: config.exclusive,
            children_ids: Vec::new(),
        }
    }

    pub fn dump(&self) -> GroupConfig {
        GroupConfig {
            id: self.id,
            key: self.key.clone(),
            label: self.label.clone(),
            title: self.title.clone(),
            expanded: self.expanded,
            exclusive: self.exclusive,
            children: Vec::new(),
        }
    }

    /// Place the group under `parent_id` before inserting it.
    pub fn with_parent(mut self, parent_id: Option<ItemId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn parent_id(&self) -> Option<ItemId> {
        self.parent_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// At most one child branch may show visible layers at a time.
    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    /// Ordered direct children.
    pub fn children_ids(&self) -> &[ItemId] {
        &self.children_ids
    }

    pub fn update(&mut self, patch: GroupPatch) -> ItemChanges {
        let mut changes = ItemChanges::empty();
        assign(&mut self.key, patch.key, ItemChanges::KEY, &mut changes);
        assign(&mut self.label, patch.label, ItemChanges::LABEL, &mut changes);
        assign(&mut self.title, patch.title, ItemChanges::TITLE, &mut changes);
        assign(
            &mut self.expanded,
            patch.expanded,
            ItemChanges::EXPANDED,
            &mut changes,
        );
        assign(
            &mut self.exclusive,
            patch.exclusive,
            ItemChanges::EXCLUSIVE,
            &mut changes,
        );
        changes
    }

    pub(crate) fn children_ids_mut(&mut self) -> &mut Vec<ItemId> {
        &mut self.children_ids
    }
}

/// Partial update of a layer. `None` leaves a field untouched; nullable
/// fields take `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub key: Option<Option<ItemKey>>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub visibility: Option<bool>,
    pub identifiable: Option<bool>,
    pub transparency: Option<Option<f64>>,
    pub min_scale_denom: Option<Option<f64>>,
    pub max_scale_denom: Option<Option<f64>>,
    pub min_resolution: Option<Option<f64>>,
    pub max_resolution: Option<Option<f64>>,
    pub draw_order_position: Option<Option<i64>>,
    pub legend_info: Option<LegendInfo>,
    pub symbols: Option<SymbolFilter>,
    pub editable: Option<Option<bool>>,
    pub adapter: Option<Option<String>>,
    pub plugin: Option<Value>,
}

impl LayerPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_visibility(mut self, visibility: bool) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_transparency(mut self, transparency: Option<f64>) -> Self {
        self.transparency = Some(transparency);
        self
    }

    pub fn with_editable(mut self, editable: Option<bool>) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn with_legend_info(mut self, legend_info: LegendInfo) -> Self {
        self.legend_info = Some(legend_info);
        self
    }

    pub fn with_symbols(mut self, symbols: SymbolFilter) -> Self {
        self.symbols = Some(symbols);
        self
    }
}

/// Partial update of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPatch {
    pub key: Option<Option<ItemKey>>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub expanded: Option<bool>,
    pub exclusive: Option<bool>,
}

impl GroupPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = Some(exclusive);
        self
    }
}

fn assign<T: PartialEq>(
    slot: &mut T,
    value: Option<T>,
    flag: ItemChanges,
    changes: &mut ItemChanges,
) {
    let Some(value) = value else {
        return;
    };
    if *slot != value {
        *slot = value;
        changes.insert(flag);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn layer(payload: serde_json::Value) -> TreeLayer {
        let config: LayerConfig =
            serde_json::from_value(payload).expect("layer config parses");
        TreeLayer::from_config(&config, None)
    }

    fn roads() -> TreeLayer {
        layer(json!({
            "id": 1,
            "label": "Roads",
            "title": "Roads",
            "layerId": 10,
            "styleId": 20,
            "visibility": false,
            "legendInfo": { "has_legend": true, "symbols": null },
        }))
    }

    #[test]
    fn given_same_values_when_updated_then_no_changes_are_reported() {
        let mut layer = roads();

        let changes = layer.update(
            LayerPatch::default()
                .with_title("Roads")
                .with_visibility(false),
        );

        assert!(changes.is_empty());
    }

    #[test]
    fn given_new_values_when_updated_then_only_changed_fields_are_flagged() {
        let mut layer = roads();

        let changes = layer.update(
            LayerPatch::default()
                .with_title("Streets")
                .with_visibility(false)
                .with_transparency(Some(0.5)),
        );

        assert_eq!(changes, ItemChanges::TITLE | ItemChanges::TRANSPARENCY);
        assert_eq!(layer.title(), "Streets");
        assert_eq!(layer.transparency(), Some(0.5));
    }

    #[test]
    fn given_fetched_symbols_when_patch_omits_them_then_symbols_are_kept() {
        let mut layer = roads();
        let fetched = LegendInfo {
            has_legend: true,
            symbols: Some(vec![LegendSymbol::new(0, Some(true))]),
            ..LegendInfo::default()
        };
        layer.update(LayerPatch::default().with_legend_info(fetched));

        let changes = layer.update(LayerPatch::default().with_legend_info(
            LegendInfo {
                has_legend: true,
                symbols: None,
                open: Some(true),
                ..LegendInfo::default()
            },
        ));

        assert_eq!(changes, ItemChanges::LEGEND_INFO);
        assert_eq!(
            layer.legend_info().symbols.as_ref().map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn given_nothing_rendered_when_symbol_enabled_then_only_that_symbol_renders()
    {
        let mut layer = roads();
        layer.set_item_symbols(Vec::new());
        assert_eq!(layer.symbols(), &SymbolFilter::Nothing);

        let changes = layer.set_layer_legend_symbol(3, true);

        assert_eq!(changes, ItemChanges::SYMBOLS);
        assert_eq!(layer.symbols().to_strings(), vec![String::from("3")]);
        assert!(layer.symbol_renders(3));
        assert!(!layer.symbol_renders(2));
    }

    #[test]
    fn given_known_symbols_when_last_symbol_disabled_then_sentinel_is_stored() {
        let mut layer = roads();
        layer.update(LayerPatch::default().with_legend_info(LegendInfo {
            has_legend: true,
            symbols: Some(vec![
                LegendSymbol::new(0, Some(true)),
                LegendSymbol::new(1, Some(false)),
            ]),
            ..LegendInfo::default()
        }));

        layer.set_layer_legend_symbol(0, false);

        assert_eq!(layer.symbols(), &SymbolFilter::Nothing);
        assert_eq!(layer.symbols().to_strings(), vec![String::from("-1")]);
    }

    #[test]
    fn given_known_symbols_when_toggled_then_intervals_are_compacted() {
        let mut layer = roads();
        let symbols = (0..8).map(|index| LegendSymbol::new(index, None)).collect();
        layer.update(LayerPatch::default().with_legend_info(LegendInfo {
            has_legend: true,
            symbols: Some(symbols),
            ..LegendInfo::default()
        }));

        layer.set_layer_legend_symbol(1, false);
        layer.set_layer_legend_symbol(5, false);
        layer.set_layer_legend_symbol(6, false);

        assert_eq!(
            layer.symbols().to_strings(),
            vec![String::from("0"), String::from("2-4"), String::from("7")]
        );
    }

    #[test]
    fn given_full_width_interval_when_symbol_toggled_then_result_is_immediate()
    {
        let mut layer = roads();
        let filter =
            SymbolFilter::parse(&["0-4294967295"]).expect("wide range parses");
        layer.update(LayerPatch::default().with_symbols(filter));

        let changes = layer.set_layer_legend_symbol(5, false);

        assert_eq!(changes, ItemChanges::SYMBOLS);
        assert_eq!(
            layer.symbols().to_strings(),
            vec![String::from("0-4"), String::from("6-4294967295")]
        );
        assert!(!layer.symbol_renders(5));
        assert!(layer.symbol_renders(4_000_000_000));
    }

    #[test]
    fn given_unknown_symbols_when_hiding_under_no_filter_then_toggle_is_ignored()
    {
        let mut layer = roads();

        let changes = layer.set_layer_legend_symbol(2, false);

        assert!(changes.is_empty());
        assert!(layer.symbols().is_all());
    }

    #[test]
    fn given_group_when_updated_then_expanded_flag_is_tracked() {
        let mut group = TreeGroup::new(5, "Base");

        let first = group.update(GroupPatch::default().with_expanded(true));
        let second = group.update(GroupPatch::default().with_expanded(true));

        assert_eq!(first, ItemChanges::EXPANDED);
        assert!(second.is_empty());
        assert!(group.expanded());
    }

    #[test]
    fn given_id_beyond_i64_when_group_created_then_key_keeps_exact_id() {
        let small = TreeGroup::new(5, "Base").dump();
        let large = TreeGroup::new(u64::MAX, "Overlay").dump();

        assert_eq!(small.key, Some(ItemKey::Number(5)));
        assert_eq!(
            large.key,
            Some(ItemKey::Text(String::from("18446744073709551615")))
        );
    }

    #[test]
    fn given_group_item_when_dumped_then_children_are_not_embedded() {
        let mut group = TreeGroup::new(5, "Base");
        group.children_ids_mut().push(6);
        let item = TreeItem::Group(group);

        let ItemConfig::Group(config) = item.dump() else {
            panic!("expected a group config");
        };

        assert!(config.children.is_empty());
        assert_eq!(item.item_type(), ItemType::Group);
        assert!(item.as_layer().is_none());
    }
}
