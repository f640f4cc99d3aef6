//! Demand aggregation and inventory netting.

use myco_core::{Catalog, ItemId, NetDemandEntry, Order, UserState};
use std::collections::BTreeMap;
use tracing::debug;

/// Sum requested quantities per item across active orders.
pub fn aggregate_demand(orders: &[Order]) -> BTreeMap<ItemId, u32> {
    orders
        .iter()
        .filter(|o| o.active)
        .flat_map(|o| &o.lines)
        .fold(BTreeMap::new(), |mut acc, line| {
            let slot = acc.entry(line.item.clone()).or_insert(0u32);
            *slot = slot.saturating_add(line.count);
            acc
        })
}

/// Subtract stock on hand and resolve what remains against the catalog.
///
/// Satisfied items and ids missing from the catalog are dropped silently.
pub fn net_demand(
    demand: &BTreeMap<ItemId, u32>,
    state: &UserState,
    catalog: &Catalog,
) -> Vec<NetDemandEntry> {
    let mut out = Vec::with_capacity(demand.len());
    for (id, &requested) in demand {
        let needed = requested.saturating_sub(state.stock(id));
        if needed == 0 {
            continue;
        }
        let Some(item) = catalog.get(id) else {
            debug!(item = %id, "dropping demand for unknown item");
            continue;
        };
        out.push(NetDemandEntry {
            item: item.clone(),
            count_needed: needed,
        });
    }
    out
}
