//! Walks a small layer tree through the operations a layer panel performs.
//!
//! The tree is loaded from an inline JSON document, a few layers are toggled
//! inside an exclusive base map group, legend symbols are fetched from an
//! in-memory backend and the panel rows are printed. Run it with:
//!
//! ```bash
//! RUST_LOG=debug cargo run -p webmap-tree --example layer_tree
//! ```

use std::cell::RefCell;
use std::time::Duration;

use anyhow::Result;
use webmap_tree::{
    LegendError, LegendSource, LegendSymbol, LegendSymbols, ResourceId,
    RootConfig, TreeEvent, TreeStore, TreeStoreOptions,
    update_resource_legend_symbols,
};

const TREE: &str = r#"{
    "type": "root",
    "id": 0,
    "title": "City map",
    "children": [
        { "type": "group", "id": 1, "title": "Base maps", "expanded": true,
          "exclusive": true, "children": [
            { "type": "layer", "id": 2, "title": "Streets", "layerId": 10,
              "styleId": 11, "visibility": true },
            { "type": "layer", "id": 3, "title": "Satellite", "layerId": 12,
              "styleId": 13 }
        ] },
        { "type": "layer", "id": 4, "title": "Parcels", "layerId": 14,
          "styleId": 15, "visibility": true,
          "legendInfo": { "has_legend": true, "visible": "expand" } }
    ]
}"#;

/// Pretends to be the legend endpoint of a map server.
struct StaticLegend;

impl LegendSource for StaticLegend {
    async fn legend_symbols(
        &self,
        resources: &[ResourceId],
    ) -> Result<LegendSymbols, LegendError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(resources
            .iter()
            .map(|resource| {
                let mut residential = LegendSymbol::new(0, Some(true));
                residential.display_name = Some(String::from("Residential"));
                let mut industrial = LegendSymbol::new(1, Some(true));
                industrial.display_name = Some(String::from("Industrial"));
                (*resource, vec![residential, industrial])
            })
            .collect())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let config = RootConfig::from_json(TREE)?;
    let options = TreeStoreOptions::default().with_draw_order(true);
    let store = RefCell::new(TreeStore::from_config(&config, options)?);
    let events = store.borrow_mut().subscribe();

    store.borrow_mut().set_visibility(3, true);
    let visible = store.borrow().visible_layer_ids().to_vec();
    println!("visible after switching base map: {visible:?}");

    let pending: Vec<ResourceId> = store
        .borrow()
        .layers_without_legend_info()
        .iter()
        .map(|layer| layer.style_id())
        .collect();
    update_resource_legend_symbols(&store, &StaticLegend, &pending).await;

    store.borrow_mut().set_layer_legend_symbol(4, 1, false);
    store.borrow_mut().move_item(4, None, Some(0))?;

    let store = store.borrow();
    println!("\n{}", store.dump().title);
    for row in store.rows() {
        let marker = match row.item.as_layer() {
            Some(layer) if layer.visibility() => "[x]",
            Some(_) => "[ ]",
            None => " + ",
        };
        println!(
            "{}{marker} {} (path {:?})",
            "  ".repeat(row.depth),
            row.item.title(),
            row.path
        );
    }
    if let Some(parcels) = store.layer(4) {
        println!(
            "\nparcels symbols: {:?}, draw order: {:?}",
            parcels.symbols().to_strings(),
            parcels.draw_order_position()
        );
    }

    println!("\nevents:");
    for event in events.try_iter() {
        if !matches!(event, TreeEvent::ItemUpdated { .. }) {
            println!("  {event:?}");
        }
    }
    Ok(())
}
