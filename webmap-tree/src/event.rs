use flume::{Receiver, Sender};

use crate::config::{ItemId, ResourceId};
use crate::item::ItemChanges;

/// Change notification emitted by [`crate::TreeStore`] once a mutation has
/// settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// The whole tree was replaced.
    Loaded,
    ItemInserted {
        id: ItemId,
    },
    ItemMoved {
        id: ItemId,
    },
    ItemsDeleted {
        ids: Vec<ItemId>,
    },
    ItemUpdated {
        id: ItemId,
        changes: ItemChanges,
    },
    VisibleLayersChanged {
        ids: Vec<ItemId>,
    },
    ExpandedChanged {
        ids: Vec<ItemId>,
    },
    DrawOrderChanged,
    LegendSymbolsLoaded {
        resources: Vec<ResourceId>,
    },
}

/// Queue of pending events plus the subscribers they fan out to.
///
/// Events are held back until [`EventHub::flush`] so subscribers never
/// observe a half-applied mutation.
#[derive(Debug, Default)]
pub(crate) struct EventHub {
    subscribers: Vec<Sender<TreeEvent>>,
    pending: Vec<TreeEvent>,
}

impl EventHub {
    pub(crate) fn subscribe(&mut self) -> Receiver<TreeEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn queue(&mut self, event: TreeEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.pending.push(event);
    }

    pub(crate) fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        self.subscribers.retain(|subscriber| {
            pending
                .iter()
                .all(|event| subscriber.send(event.clone()).is_ok())
        });
    }
}
