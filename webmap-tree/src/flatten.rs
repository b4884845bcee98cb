use crate::config::ItemId;
use crate::item::TreeItem;
use crate::store::TreeStore;

/// Path of item ids from the root to a row.
pub type TreePath = Vec<ItemId>;

/// Flattened representation of a visible tree row.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow<'a> {
    /// Zero-based tree depth (`0` for root-level rows).
    pub depth: usize,
    /// Borrowed source item.
    pub item: &'a TreeItem,
    /// Id path from the root to this row.
    pub path: TreePath,
}

/// Flatten the tree into a depth-first list of rows shown in the layer
/// panel.
///
/// Rows keep document order. Children are included only for expanded groups.
pub fn flatten_tree(store: &TreeStore) -> Vec<TreeRow<'_>> {
    let mut path = Vec::new();
    walk_expanded(store)
        .into_iter()
        .filter_map(|(id, depth)| {
            let item = store.get(id)?;
            path.truncate(depth);
            path.push(id);
            Some(TreeRow {
                depth,
                item,
                path: path.clone(),
            })
        })
        .collect()
}

/// Ids reachable from the root through expanded groups, with their depth,
/// in document order.
pub(crate) fn walk_expanded(store: &TreeStore) -> Vec<(ItemId, usize)> {
    let mut visited = Vec::new();
    let mut stack: Vec<(ItemId, usize)> =
        store.children_ids().iter().rev().map(|id| (*id, 0)).collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(item) = store.get(id) else {
            continue;
        };
        visited.push((id, depth));

        if let TreeItem::Group(group) = item
            && group.expanded()
        {
            stack.extend(
                group
                    .children_ids()
                    .iter()
                    .rev()
                    .map(|child| (*child, depth + 1)),
            );
        }
    }
    visited
}
