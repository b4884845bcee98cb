//! Coordination of on-demand legend symbol fetches.
//!
//! The transport is injected through [`LegendSource`]. A fetch runs in two
//! steps around the await point: [`TreeStore::begin_legend_fetch`] marks the
//! requested style resources as in flight, and
//! [`TreeStore::finish_legend_fetch`] fans the response out to every layer
//! using those styles and releases the resources again, on success or
//! failure.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

use crate::config::{LegendSymbol, ResourceId};
use crate::error::LegendError;
use crate::store::TreeStore;

/// Legend symbols keyed by style resource id.
pub type LegendSymbols = HashMap<ResourceId, Vec<LegendSymbol>>;

/// Backend able to fetch legend symbols for a batch of style resources.
pub trait LegendSource {
    fn legend_symbols(
        &self,
        resources: &[ResourceId],
    ) -> impl Future<Output = Result<LegendSymbols, LegendError>>;
}

/// Batch of style resources marked in flight by
/// [`TreeStore::begin_legend_fetch`].
#[must_use = "hand the fetch back to TreeStore::finish_legend_fetch"]
#[derive(Debug, PartialEq, Eq)]
pub struct LegendFetch {
    resources: Vec<ResourceId>,
}

impl LegendFetch {
    pub(crate) fn new(resources: Vec<ResourceId>) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &[ResourceId] {
        &self.resources
    }

    pub fn contains(&self, resource: ResourceId) -> bool {
        self.resources.contains(&resource)
    }
}

/// Fetch legend symbols for `resources` and apply them to the tree.
///
/// Resources already in flight are not requested again. The store is only
/// borrowed before and after the request, so other callers may read or
/// mutate it while the fetch is pending. Returns `false` when nothing had to
/// be fetched.
pub async fn update_resource_legend_symbols<S: LegendSource>(
    store: &RefCell<TreeStore>,
    source: &S,
    resources: &[ResourceId],
) -> bool {
    let fetch = store.borrow_mut().begin_legend_fetch(resources);
    let Some(fetch) = fetch else {
        return false;
    };

    let result = source.legend_symbols(fetch.resources()).await;
    store.borrow_mut().finish_legend_fetch(fetch, result);
    true
}
