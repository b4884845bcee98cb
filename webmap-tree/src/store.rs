use std::collections::{HashMap, HashSet};

use flume::Receiver;

use crate::config::{
    ItemConfig, ItemId, LegendInfo, LegendVisibility, ResourceId, RootConfig,
};
use crate::error::{LegendError, Result, TreeError};
use crate::event::{EventHub, TreeEvent};
use crate::flatten::{TreeRow, flatten_tree, walk_expanded};
use crate::item::{
    GroupPatch, ItemChanges, LayerPatch, TreeGroup, TreeItem, TreeLayer,
};
use crate::legend::{LegendFetch, LegendSymbols};
use crate::options::TreeStoreOptions;
use crate::symbols::SymbolRange;
use crate::util::{filter, validate_visible};

/// Order-sensitive fingerprint of the tree shape.
///
/// Two equal stamps mean no insert, move or delete happened in between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructureStamp(Vec<(ItemId, Option<ItemId>)>);

/// Aggregate root of the layer tree.
///
/// Nodes live in one flat map keyed by id; parent/children relations are ids
/// into that map. Every mutation goes through this type and settles before
/// returning: draw order is recomputed when the shape changed, exclusive
/// group visibility is reconciled, and queued [`TreeEvent`]s are sent.
#[derive(Debug)]
pub struct TreeStore {
    options: TreeStoreOptions,
    root: RootConfig,
    items: HashMap<ItemId, TreeItem>,
    children_ids: Vec<ItemId>,
    visible_layer_ids: Vec<ItemId>,
    expanded_ids: Vec<ItemId>,
    structure_stamp: StructureStamp,
    loading_legend_resources: HashSet<ResourceId>,
    events: EventHub,
}

impl TreeStore {
    /// Create an empty tree.
    pub fn new(options: TreeStoreOptions) -> Self {
        Self {
            options,
            root: RootConfig::empty(0),
            items: HashMap::new(),
            children_ids: Vec::new(),
            visible_layer_ids: Vec::new(),
            expanded_ids: Vec::new(),
            structure_stamp: StructureStamp::default(),
            loading_legend_resources: HashSet::new(),
            events: EventHub::default(),
        }
    }

    /// Create a tree and load `config` into it.
    pub fn from_config(
        config: &RootConfig,
        options: TreeStoreOptions,
    ) -> Result<Self> {
        let mut store = Self::new(options);
        store.load(config)?;
        Ok(store)
    }

    pub fn options(&self) -> &TreeStoreOptions {
        &self.options
    }

    /// Receive [`TreeEvent`]s for every settled mutation from now on.
    pub fn subscribe(&mut self) -> Receiver<TreeEvent> {
        self.events.subscribe()
    }

    /// Replace the whole tree with `config`.
    ///
    /// On error the previous tree is left untouched. With draw order enabled
    /// the configured positions are used as a priority hint (ties broken by
    /// tree order) and renumbered from zero.
    pub fn load(&mut self, config: &RootConfig) -> Result<()> {
        let mut items: HashMap<ItemId, TreeItem> = HashMap::new();
        let mut children_ids = Vec::new();
        let mut stack: Vec<(&ItemConfig, Option<ItemId>)> =
            config.children.iter().rev().map(|child| (child, None)).collect();

        while let Some((node, parent_id)) = stack.pop() {
            let id = node.id();
            if items.contains_key(&id) {
                return Err(TreeError::DuplicateId(id));
            }
            if let ItemConfig::Group(group) = node {
                stack.extend(
                    group.children.iter().rev().map(|child| (child, Some(id))),
                );
            }

            match parent_id {
                None => children_ids.push(id),
                Some(parent_id) => {
                    if let Some(parent) = items
                        .get_mut(&parent_id)
                        .and_then(TreeItem::as_group_mut)
                    {
                        parent.children_ids_mut().push(id);
                    }
                },
            }
            items.insert(id, TreeItem::from_config(node, parent_id));
        }

        self.root = RootConfig {
            id: config.id,
            key: config.key.clone(),
            label: config.label.clone(),
            title: config.title.clone(),
            children: Vec::new(),
        };
        self.items = items;
        self.children_ids = children_ids;
        self.visible_layer_ids.clear();
        self.expanded_ids.clear();

        if self.options.draw_order_enabled {
            self.renumber_draw_order_from_hints();
        }
        self.structure_stamp = self.tree_structure_stamp();

        log::debug!(
            "layer tree {} loaded with {} items",
            self.root.id,
            self.items.len()
        );
        self.events.queue(TreeEvent::Loaded);
        self.settle();
        Ok(())
    }

    /// Insert the subtree described by `config` at the end of `parent_id`'s
    /// children and return its root node.
    pub fn add_item(
        &mut self,
        config: &ItemConfig,
        parent_id: Option<ItemId>,
    ) -> Result<&TreeItem> {
        self.validate_parent(parent_id)?;

        let mut seen = HashSet::new();
        let mut pending = vec![config];
        while let Some(node) = pending.pop() {
            let id = node.id();
            if self.items.contains_key(&id) || !seen.insert(id) {
                return Err(TreeError::DuplicateId(id));
            }
            if let ItemConfig::Group(group) = node {
                pending.extend(group.children.iter());
            }
        }

        let root_id = config.id();
        let mut stack = vec![(config, parent_id)];
        while let Some((node, parent)) = stack.pop() {
            let id = node.id();
            if let ItemConfig::Group(group) = node {
                stack.extend(
                    group.children.iter().rev().map(|child| (child, Some(id))),
                );
            }
            self.items.insert(id, TreeItem::from_config(node, parent));
            self.attach(id, parent, None);
        }

        log::debug!("added subtree {root_id} under {parent_id:?}");
        self.events.queue(TreeEvent::ItemInserted { id: root_id });
        self.settle();
        self.items
            .get(&root_id)
            .ok_or(TreeError::UnknownItem(root_id))
    }

    /// Insert a single pre-built node under its declared parent at `index`
    /// (appended when missing or out of bounds).
    pub fn insert_item(
        &mut self,
        item: TreeItem,
        index: Option<usize>,
    ) -> Result<()> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        if item
            .as_group()
            .is_some_and(|group| !group.children_ids().is_empty())
        {
            return Err(TreeError::GroupNotEmpty(id));
        }
        let parent_id = item.parent_id();
        self.validate_parent(parent_id)?;

        self.items.insert(id, item);
        self.attach(id, parent_id, index);

        self.events.queue(TreeEvent::ItemInserted { id });
        self.settle();
        Ok(())
    }

    /// Move a node under `new_parent_id` at `index` (appended when missing or
    /// out of bounds).
    ///
    /// Unknown `item_id` is ignored and reported as `Ok(false)`.
    pub fn move_item(
        &mut self,
        item_id: ItemId,
        new_parent_id: Option<ItemId>,
        index: Option<usize>,
    ) -> Result<bool> {
        let Some(old_parent_id) =
            self.items.get(&item_id).map(TreeItem::parent_id)
        else {
            return Ok(false);
        };
        self.validate_parent(new_parent_id)?;

        let mut ancestor = new_parent_id;
        while let Some(current) = ancestor {
            if current == item_id {
                return Err(TreeError::CyclicMove {
                    item: item_id,
                    parent: new_parent_id.unwrap_or(current),
                });
            }
            ancestor = self.parent_of(current);
        }

        self.detach(item_id, old_parent_id);
        if let Some(item) = self.items.get_mut(&item_id) {
            item.set_parent_id(new_parent_id);
        }
        self.attach(item_id, new_parent_id, index);

        if old_parent_id != new_parent_id {
            self.record(item_id, ItemChanges::PARENT);
        }
        log::debug!("moved item {item_id} to {new_parent_id:?} at {index:?}");
        self.events.queue(TreeEvent::ItemMoved { id: item_id });
        self.settle();
        Ok(true)
    }

    /// Remove a node and, for groups, its whole subtree. Returns the removed
    /// ids in traversal order; unknown ids remove nothing.
    pub fn delete_item(&mut self, item_id: ItemId) -> Vec<ItemId> {
        let Some(parent_id) = self.items.get(&item_id).map(TreeItem::parent_id)
        else {
            return Vec::new();
        };
        self.detach(item_id, parent_id);

        let mut removed = Vec::new();
        let mut stack = vec![item_id];
        while let Some(current) = stack.pop() {
            let Some(item) = self.items.remove(&current) else {
                continue;
            };
            if let TreeItem::Group(group) = &item {
                stack.extend(group.children_ids().iter().rev());
            }
            removed.push(current);
        }

        log::debug!("deleted {} items under {item_id}", removed.len());
        self.events.queue(TreeEvent::ItemsDeleted {
            ids: removed.clone(),
        });
        self.settle();
        removed
    }

    /// Show exactly the layers in `ids`, after exclusive group
    /// reconciliation. Non-layer ids are ignored.
    pub fn set_visible_ids(&mut self, ids: &[ItemId]) {
        let requested: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| self.layer(*id).is_some())
            .collect();
        let resolved = if self.has_exclusive_groups() {
            validate_visible(self, &requested, &self.visible_layer_ids)
        } else {
            requested
        };

        let resolved: HashSet<ItemId> = resolved.into_iter().collect();
        for id in self.layer_ids() {
            let visible = resolved.contains(&id);
            self.apply_layer_patch(
                id,
                LayerPatch::default().with_visibility(visible),
            );
        }
        self.settle();
    }

    /// Toggle one layer; a layer shown inside an exclusive group hides its
    /// competitors.
    pub fn set_visibility(
        &mut self,
        layer_id: ItemId,
        visibility: bool,
    ) -> ItemChanges {
        self.update_layer(
            layer_id,
            LayerPatch::default().with_visibility(visibility),
        )
    }

    /// Expand exactly the groups in `ids`; all others collapse.
    pub fn set_expanded(&mut self, ids: &[ItemId]) {
        let wanted: HashSet<ItemId> = ids.iter().copied().collect();
        let group_ids: Vec<ItemId> =
            self.groups().iter().map(|group| group.id()).collect();
        for id in group_ids {
            self.apply_group_patch(
                id,
                GroupPatch::default().with_expanded(wanted.contains(&id)),
            );
        }
        self.settle();
    }

    pub fn toggle_expanded(&mut self, group_id: ItemId) -> bool {
        let Some(expanded) = self.group(group_id).map(TreeGroup::expanded)
        else {
            return false;
        };
        let patch = GroupPatch::default().with_expanded(!expanded);
        !self.update_group(group_id, patch).is_empty()
    }

    pub fn update_layer(
        &mut self,
        layer_id: ItemId,
        patch: LayerPatch,
    ) -> ItemChanges {
        let changes = self.apply_layer_patch(layer_id, patch);
        self.settle();
        changes
    }

    pub fn update_group(
        &mut self,
        group_id: ItemId,
        patch: GroupPatch,
    ) -> ItemChanges {
        let changes = self.apply_group_patch(group_id, patch);
        self.settle();
        changes
    }

    /// See [`TreeLayer::set_layer_legend_symbol`].
    pub fn set_layer_legend_symbol(
        &mut self,
        layer_id: ItemId,
        index: u32,
        render: bool,
    ) -> ItemChanges {
        let Some(layer) = self.layer_mut(layer_id) else {
            return ItemChanges::empty();
        };
        let changes = layer.set_layer_legend_symbol(index, render);
        self.record(layer_id, changes);
        self.settle();
        changes
    }

    /// See [`TreeLayer::set_item_symbols`].
    pub fn set_item_symbols(
        &mut self,
        layer_id: ItemId,
        ranges: Vec<SymbolRange>,
    ) -> ItemChanges {
        let Some(layer) = self.layer_mut(layer_id) else {
            return ItemChanges::empty();
        };
        let changes = layer.set_item_symbols(ranges);
        self.record(layer_id, changes);
        self.settle();
        changes
    }

    /// Reassign every layer's draw order position to its index in document
    /// order.
    pub fn recompute_draw_order_positions(&mut self) {
        self.apply_draw_order();
        self.settle();
    }

    /// Serialize the whole tree back to the configuration shape.
    pub fn dump(&self) -> RootConfig {
        RootConfig {
            id: self.root.id,
            key: self.root.key.clone(),
            label: self.root.label.clone(),
            title: self.root.title.clone(),
            children: self.dump_children(),
        }
    }

    pub fn dump_json(&self) -> Result<String> {
        self.dump().to_json()
    }

    /// Mark `resources` as in flight and return the batch still to fetch.
    ///
    /// Resources already in flight are skipped; `None` means there is
    /// nothing left to request.
    pub fn begin_legend_fetch(
        &mut self,
        resources: &[ResourceId],
    ) -> Option<LegendFetch> {
        let batch: Vec<ResourceId> = resources
            .iter()
            .copied()
            .filter(|resource| self.loading_legend_resources.insert(*resource))
            .collect();
        if batch.is_empty() {
            return None;
        }

        log::debug!("fetching legend symbols for {batch:?}");
        Some(LegendFetch::new(batch))
    }

    /// Apply the outcome of a legend fetch and release its resources.
    ///
    /// Failures are logged; affected layers keep their unfetched state so a
    /// later call retries.
    pub fn finish_legend_fetch(
        &mut self,
        fetch: LegendFetch,
        result: std::result::Result<LegendSymbols, LegendError>,
    ) {
        for resource in fetch.resources() {
            self.loading_legend_resources.remove(resource);
        }

        let symbols = match result {
            Ok(symbols) => symbols,
            Err(err) => {
                log::warn!(
                    "legend symbols fetch for {:?} failed: {err}",
                    fetch.resources()
                );
                return;
            },
        };

        let targets: Vec<(ItemId, LegendInfo)> = self
            .layers()
            .into_iter()
            .filter(|layer| fetch.contains(layer.style_id()))
            .filter_map(|layer| {
                let entries = symbols.get(&layer.style_id())?;
                let current = layer.legend_info();
                let open = current
                    .open
                    .or(Some(current.visible == LegendVisibility::Expand));
                let info = LegendInfo {
                    symbols: Some(entries.clone()),
                    single: entries.len() == 1,
                    open,
                    ..current.clone()
                };
                Some((layer.id(), info))
            })
            .collect();
        for (id, info) in targets {
            let patch = LayerPatch::default().with_legend_info(info);
            self.apply_layer_patch(id, patch);
        }

        let loaded: Vec<ResourceId> = fetch
            .resources()
            .iter()
            .copied()
            .filter(|resource| symbols.contains_key(resource))
            .collect();
        if !loaded.is_empty() {
            self.events
                .queue(TreeEvent::LegendSymbolsLoaded { resources: loaded });
        }
        self.settle();
    }

    pub fn is_legend_loading(&self, resource: ResourceId) -> bool {
        self.loading_legend_resources.contains(&resource)
    }
}

impl TreeStore {
    pub fn root_id(&self) -> ItemId {
        self.root.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&TreeItem> {
        self.items.get(&id)
    }

    pub fn layer(&self, id: ItemId) -> Option<&TreeLayer> {
        self.items.get(&id).and_then(TreeItem::as_layer)
    }

    pub fn group(&self, id: ItemId) -> Option<&TreeGroup> {
        self.items.get(&id).and_then(TreeItem::as_group)
    }

    /// Root-level node ids, in order.
    pub fn children_ids(&self) -> &[ItemId] {
        &self.children_ids
    }

    /// Children of `parent_id`, or the root list for `None`.
    pub fn children_of(&self, parent_id: Option<ItemId>) -> &[ItemId] {
        match parent_id {
            None => &self.children_ids,
            Some(id) => {
                self.group(id).map(TreeGroup::children_ids).unwrap_or(&[])
            },
        }
    }

    pub fn parent_of(&self, id: ItemId) -> Option<ItemId> {
        self.items.get(&id).and_then(TreeItem::parent_id)
    }

    /// Number of groups between `id` and the root.
    pub fn depth(&self, id: ItemId) -> usize {
        let mut depth = 0;
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_of(parent);
        }
        depth
    }

    /// Descendant ids of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut ids = self.subtree_ids(id);
        if !ids.is_empty() {
            ids.remove(0);
        }
        ids
    }

    /// Layer ids in the subtree rooted at `id` (the id itself for a layer).
    pub fn layer_ids_within(&self, id: ItemId) -> Vec<ItemId> {
        self.subtree_ids(id)
            .into_iter()
            .filter(|id| self.layer(*id).is_some())
            .collect()
    }

    /// Every node in document order.
    pub fn items_in_order(&self) -> Vec<&TreeItem> {
        self.document_order()
            .into_iter()
            .filter_map(|id| self.items.get(&id))
            .collect()
    }

    pub fn layer_ids(&self) -> Vec<ItemId> {
        self.layers().into_iter().map(TreeLayer::id).collect()
    }

    pub fn layers(&self) -> Vec<&TreeLayer> {
        self.items_in_order()
            .into_iter()
            .filter_map(TreeItem::as_layer)
            .collect()
    }

    pub fn groups(&self) -> Vec<&TreeGroup> {
        self.items_in_order()
            .into_iter()
            .filter_map(TreeItem::as_group)
            .collect()
    }

    pub fn layers_by_style(&self, style_id: ResourceId) -> Vec<&TreeLayer> {
        self.layers()
            .into_iter()
            .filter(|layer| layer.style_id() == style_id)
            .collect()
    }

    /// Nodes matching `predicate`, in document order.
    pub fn filter<F>(&self, predicate: F) -> Vec<&TreeItem>
    where
        F: FnMut(&TreeItem) -> bool,
    {
        filter(self.items_in_order(), predicate)
    }

    pub fn has_exclusive_groups(&self) -> bool {
        self.items
            .values()
            .any(|item| item.as_group().is_some_and(TreeGroup::exclusive))
    }

    /// Reconciled visible layer ids, in document order.
    pub fn visible_layer_ids(&self) -> &[ItemId] {
        &self.visible_layer_ids
    }

    pub fn visible_layers(&self) -> Vec<&TreeLayer> {
        self.visible_layer_ids
            .iter()
            .filter_map(|id| self.layer(*id))
            .collect()
    }

    /// Ids of expanded groups, in document order.
    pub fn expanded(&self) -> Vec<ItemId> {
        self.groups()
            .into_iter()
            .filter(|group| group.expanded())
            .map(TreeGroup::id)
            .collect()
    }

    pub fn editable_layers(&self) -> Vec<&TreeLayer> {
        self.layers()
            .into_iter()
            .filter(|layer| layer.editable() == Some(true))
            .collect()
    }

    /// Layers reachable from the root through expanded groups only.
    pub fn layers_in_expanded_group_ids(&self) -> Vec<ItemId> {
        walk_expanded(self)
            .into_iter()
            .map(|(id, _)| id)
            .filter(|id| self.layer(*id).is_some())
            .collect()
    }

    /// Shown layers whose legend symbols are neither fetched nor in flight.
    pub fn layers_without_legend_info(&self) -> Vec<&TreeLayer> {
        self.layers_in_expanded_group_ids()
            .into_iter()
            .filter_map(|id| self.layer(id))
            .filter(|layer| {
                layer.needs_legend_symbols()
                    && !self
                        .loading_legend_resources
                        .contains(&layer.style_id())
            })
            .collect()
    }

    /// Rows of the layer panel.
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        flatten_tree(self)
    }

    pub fn tree_structure_stamp(&self) -> StructureStamp {
        StructureStamp(
            self.document_order()
                .into_iter()
                .map(|id| (id, self.parent_of(id)))
                .collect(),
        )
    }
}

impl TreeStore {
    fn settle(&mut self) {
        let stamp = self.tree_structure_stamp();
        if stamp != self.structure_stamp {
            self.structure_stamp = stamp;
            if self.options.draw_order_enabled {
                self.apply_draw_order();
            }
        }

        self.reconcile_visibility();

        let expanded = self.expanded();
        if expanded != self.expanded_ids {
            self.expanded_ids = expanded.clone();
            self.events.queue(TreeEvent::ExpandedChanged { ids: expanded });
        }

        self.events.flush();
    }

    fn reconcile_visibility(&mut self) {
        let current: Vec<ItemId> = self
            .layers()
            .into_iter()
            .filter(|layer| layer.visibility())
            .map(TreeLayer::id)
            .collect();
        let resolved = if self.has_exclusive_groups() {
            validate_visible(self, &current, &self.visible_layer_ids)
        } else {
            current.clone()
        };

        if resolved.len() != current.len() {
            let keep: HashSet<ItemId> = resolved.iter().copied().collect();
            for id in current.into_iter().filter(|id| !keep.contains(id)) {
                self.apply_layer_patch(
                    id,
                    LayerPatch::default().with_visibility(false),
                );
            }
        }

        if resolved != self.visible_layer_ids {
            self.visible_layer_ids = resolved.clone();
            self.events
                .queue(TreeEvent::VisibleLayersChanged { ids: resolved });
        }
    }

    fn apply_draw_order(&mut self) {
        let mut changed = false;
        for (position, id) in self.layer_ids().into_iter().enumerate() {
            let Some(layer) = self.layer_mut(id) else {
                continue;
            };
            if layer.set_draw_order_position(position as i64) {
                changed = true;
                self.record(id, ItemChanges::DRAW_ORDER);
            }
        }
        if changed {
            self.events.queue(TreeEvent::DrawOrderChanged);
        }
    }

    fn renumber_draw_order_from_hints(&mut self) {
        let mut ranked: Vec<(i64, usize, ItemId)> = self
            .layers()
            .into_iter()
            .enumerate()
            .map(|(index, layer)| {
                let hint = layer.draw_order_position().unwrap_or(i64::MAX);
                (hint, index, layer.id())
            })
            .collect();
        ranked.sort_unstable();

        for (position, (_, _, id)) in ranked.into_iter().enumerate() {
            if let Some(layer) = self.layer_mut(id) {
                layer.set_draw_order_position(position as i64);
            }
        }
    }

    fn apply_layer_patch(
        &mut self,
        id: ItemId,
        patch: LayerPatch,
    ) -> ItemChanges {
        let Some(layer) = self.layer_mut(id) else {
            return ItemChanges::empty();
        };
        let changes = layer.update(patch);
        self.record(id, changes);
        changes
    }

    fn apply_group_patch(
        &mut self,
        id: ItemId,
        patch: GroupPatch,
    ) -> ItemChanges {
        let Some(group) =
            self.items.get_mut(&id).and_then(TreeItem::as_group_mut)
        else {
            return ItemChanges::empty();
        };
        let changes = group.update(patch);
        self.record(id, changes);
        changes
    }

    fn record(&mut self, id: ItemId, changes: ItemChanges) {
        if !changes.is_empty() {
            self.events.queue(TreeEvent::ItemUpdated { id, changes });
        }
    }

    fn layer_mut(&mut self, id: ItemId) -> Option<&mut TreeLayer> {
        self.items.get_mut(&id).and_then(TreeItem::as_layer_mut)
    }

    fn validate_parent(&self, parent_id: Option<ItemId>) -> Result<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        match self.items.get(&parent_id) {
            None => Err(TreeError::UnknownParent(parent_id)),
            Some(TreeItem::Layer(_)) => {
                Err(TreeError::ParentNotGroup(parent_id))
            },
            Some(TreeItem::Group(_)) => Ok(()),
        }
    }

    fn siblings_mut(
        &mut self,
        parent_id: Option<ItemId>,
    ) -> Option<&mut Vec<ItemId>> {
        match parent_id {
            None => Some(&mut self.children_ids),
            Some(id) => self
                .items
                .get_mut(&id)
                .and_then(TreeItem::as_group_mut)
                .map(TreeGroup::children_ids_mut),
        }
    }

    fn attach(
        &mut self,
        id: ItemId,
        parent_id: Option<ItemId>,
        index: Option<usize>,
    ) {
        let Some(siblings) = self.siblings_mut(parent_id) else {
            return;
        };
        let position = index
            .filter(|index| *index <= siblings.len())
            .unwrap_or(siblings.len());
        siblings.insert(position, id);
    }

    fn detach(&mut self, id: ItemId, parent_id: Option<ItemId>) {
        if let Some(siblings) = self.siblings_mut(parent_id) {
            siblings.retain(|sibling| *sibling != id);
        }
    }

    fn subtree_ids(&self, id: ItemId) -> Vec<ItemId> {
        self.collect_preorder(vec![id])
    }

    fn document_order(&self) -> Vec<ItemId> {
        self.collect_preorder(self.children_ids.iter().rev().copied().collect())
    }

    fn collect_preorder(&self, mut stack: Vec<ItemId>) -> Vec<ItemId> {
        let mut ids = Vec::new();
        while let Some(id) = stack.pop() {
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            ids.push(id);
            if let TreeItem::Group(group) = item {
                stack.extend(group.children_ids().iter().rev());
            }
        }
        ids
    }

    /// Nested configuration of the root children, assembled bottom-up
    /// without recursion.
    fn dump_children(&self) -> Vec<ItemConfig> {
        let mut dumped: HashMap<ItemId, ItemConfig> = HashMap::new();
        for id in self.document_order().into_iter().rev() {
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            let mut config = item.dump();
            if let (ItemConfig::Group(nested), TreeItem::Group(group)) =
                (&mut config, item)
            {
                nested.children = group
                    .children_ids()
                    .iter()
                    .filter_map(|child| dumped.remove(child))
                    .collect();
            }
            dumped.insert(id, config);
        }

        self.children_ids
            .iter()
            .filter_map(|id| dumped.remove(id))
            .collect()
    }
}
