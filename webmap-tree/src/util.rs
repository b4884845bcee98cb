use std::collections::HashSet;

use crate::config::ItemId;
use crate::item::TreeItem;
use crate::store::TreeStore;

/// Keep the items matching `predicate`, preserving iteration order.
pub fn filter<'a, I, F>(items: I, mut predicate: F) -> Vec<&'a TreeItem>
where
    I: IntoIterator<Item = &'a TreeItem>,
    F: FnMut(&TreeItem) -> bool,
{
    items.into_iter().filter(|item| predicate(*item)).collect()
}

/// Resolve simultaneous visibility inside exclusive groups.
///
/// `requested` is the candidate visible set, `previous` the set that was
/// visible before this update. Exclusive groups are processed deepest first;
/// inside each group at most one direct child branch keeps visible layers.
/// The winning branch is the first one holding a newly shown layer, then the
/// first one that was already showing, then the first active one.
///
/// Returns the reconciled ids in the order they were requested.
pub fn validate_visible(
    store: &TreeStore,
    requested: &[ItemId],
    previous: &[ItemId],
) -> Vec<ItemId> {
    let previous: HashSet<ItemId> = previous.iter().copied().collect();
    let mut candidate: HashSet<ItemId> = requested.iter().copied().collect();

    let mut exclusive: Vec<(usize, ItemId)> = store
        .groups()
        .into_iter()
        .filter(|group| group.exclusive())
        .map(|group| (store.depth(group.id()), group.id()))
        .collect();
    exclusive.sort_by(|left, right| right.0.cmp(&left.0));

    for (_, group_id) in exclusive {
        let Some(group) = store.group(group_id) else {
            continue;
        };

        let branches: Vec<Vec<ItemId>> = group
            .children_ids()
            .iter()
            .map(|child| store.layer_ids_within(*child))
            .collect();
        let active: Vec<usize> = branches
            .iter()
            .enumerate()
            .filter(|(_, layers)| {
                layers.iter().any(|id| candidate.contains(id))
            })
            .map(|(index, _)| index)
            .collect();
        if active.len() < 2 {
            continue;
        }

        let newly_shown = |index: &usize| {
            branches[*index]
                .iter()
                .any(|id| candidate.contains(id) && !previous.contains(id))
        };
        let already_shown = |index: &usize| {
            branches[*index].iter().any(|id| previous.contains(id))
        };
        let winner = active
            .iter()
            .find(|index| newly_shown(*index))
            .or_else(|| active.iter().find(|index| already_shown(*index)))
            .copied()
            .unwrap_or(active[0]);

        log::trace!(
            "exclusive group {group_id}: branch {} wins over {} active",
            group.children_ids()[winner],
            active.len()
        );

        for index in active {
            if index == winner {
                continue;
            }
            for id in &branches[index] {
                candidate.remove(id);
            }
        }
    }

    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| candidate.contains(id) && seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{RootConfig, TreeStoreOptions};

    fn layer(id: ItemId, visibility: bool) -> Value {
        json!({
            "type": "layer",
            "id": id,
            "layerId": id * 10,
            "styleId": id * 10 + 1,
            "visibility": visibility,
        })
    }

    fn store(children: Vec<Value>) -> TreeStore {
        let config: RootConfig = serde_json::from_value(json!({
            "type": "root",
            "id": 0,
            "children": children,
        }))
        .expect("config parses");
        TreeStore::from_config(&config, TreeStoreOptions::default())
            .expect("config loads")
    }

    fn exclusive_group(id: ItemId, children: Vec<Value>) -> Value {
        json!({
            "type": "group",
            "id": id,
            "exclusive": true,
            "children": children,
        })
    }

    fn group(id: ItemId, children: Vec<Value>) -> Value {
        json!({ "type": "group", "id": id, "children": children })
    }

    #[test]
    fn given_plain_groups_when_validated_then_request_is_unchanged() {
        let store = store(vec![group(1, vec![layer(2, false), layer(3, false)])]);

        let result = validate_visible(&store, &[2, 3], &[]);

        assert_eq!(result, vec![2, 3]);
    }

    #[test]
    fn given_exclusive_conflict_when_one_layer_is_new_then_new_layer_wins() {
        let store =
            store(vec![exclusive_group(1, vec![layer(2, true), layer(3, false)])]);

        let result = validate_visible(&store, &[2, 3], &[2]);

        assert_eq!(result, vec![3]);
    }

    #[test]
    fn given_exclusive_conflict_without_new_layers_then_previous_branch_wins() {
        let store = store(vec![exclusive_group(
            1,
            vec![layer(2, false), layer(3, false), layer(4, false)],
        )]);

        let result = validate_visible(&store, &[3, 4], &[4, 3]);

        assert_eq!(result, vec![3]);
    }

    #[test]
    fn given_exclusive_conflict_in_request_order_then_children_order_decides() {
        let store = store(vec![exclusive_group(
            1,
            vec![layer(2, false), layer(3, false)],
        )]);

        let result = validate_visible(&store, &[3, 2], &[2, 3]);

        assert_eq!(result, vec![2]);
    }

    #[test]
    fn given_nested_branches_when_validated_then_whole_losing_branch_is_hidden() {
        let store = store(vec![exclusive_group(
            1,
            vec![
                group(2, vec![layer(3, false), layer(4, false)]),
                layer(5, false),
            ],
        )]);

        let result = validate_visible(&store, &[3, 4, 5], &[5]);

        assert_eq!(result, vec![3, 4]);
    }

    #[test]
    fn given_nested_exclusive_groups_when_validated_then_inner_resolves_first() {
        let store = store(vec![exclusive_group(
            1,
            vec![
                exclusive_group(2, vec![layer(3, false), layer(4, false)]),
                layer(5, false),
            ],
        )]);

        // Inner group keeps the new layer 4; the outer group then sees the
        // inner branch as the one with a new layer and drops layer 5.
        let result = validate_visible(&store, &[3, 4, 5], &[3, 5]);

        assert_eq!(result, vec![4]);
    }

    #[test]
    fn given_duplicate_ids_when_validated_then_result_has_each_once() {
        let store = store(vec![layer(1, false)]);

        let result = validate_visible(&store, &[1, 1], &[]);

        assert_eq!(result, vec![1]);
    }

    #[test]
    fn given_predicate_when_filtering_then_order_is_preserved() {
        let store = store(vec![layer(1, true), layer(2, false), layer(3, true)]);

        let visible = filter(store.items_in_order(), |item| {
            item.as_layer().is_some_and(|layer| layer.visibility())
        });

        let ids: Vec<ItemId> = visible.iter().map(|item| item.id()).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
