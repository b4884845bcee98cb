use serde::Deserialize;

/// Configuration knobs that influence how the layer tree behaves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeStoreOptions {
    /// Recompute layer draw order from tree order after every structural
    /// change instead of keeping the positions the server sent.
    pub draw_order_enabled: bool,
}

impl TreeStoreOptions {
    pub fn with_draw_order(mut self, enabled: bool) -> Self {
        self.draw_order_enabled = enabled;
        self
    }
}
