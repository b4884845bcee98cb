use thiserror::Error;

use crate::config::ItemId;

/// Errors raised by structural operations on the layer tree.
///
/// These point at a programming error in the caller (a duplicate id, a
/// parent that does not exist) rather than a recoverable runtime condition.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("tree item {0} already exists")]
    DuplicateId(ItemId),

    #[error("tree item {0} does not exist")]
    UnknownItem(ItemId),

    #[error("parent item {0} does not exist")]
    UnknownParent(ItemId),

    #[error("parent item {0} is a layer and cannot hold children")]
    ParentNotGroup(ItemId),

    #[error("cannot move item {item} into its own subtree at {parent}")]
    CyclicMove { item: ItemId, parent: ItemId },

    #[error("group {0} already lists children; insert a subtree with add_item")]
    GroupNotEmpty(ItemId),

    #[error("invalid symbol range: {0:?}")]
    InvalidSymbolRange(String),

    #[error("tree configuration JSON failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a [`crate::LegendSource`].
#[derive(Debug, Error)]
pub enum LegendError {
    #[error("legend request failed: {0}")]
    Request(String),

    #[error("legend response is malformed: {0}")]
    Response(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TreeError>;
