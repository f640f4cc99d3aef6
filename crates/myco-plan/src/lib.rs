#![deny(warnings)]

//! Production planning for cultivation orders.
//!
//! Turns a user snapshot and the static catalog into ranked production
//! batches in a single stateless pass:
//! - aggregate demand over active orders and net it against inventory
//! - group what remains into exact-environment batches
//! - audit each batch against unlocked equipment
//! - let looser tasks ride along in stricter compatible batches
//! - rank batches by strictness, completability and volume
//!
//! Nothing here fails: unknown items and satisfied demand simply drop out.

mod audit;
mod demand;
mod grouping;
mod passengers;
mod ranking;

pub use audit::audit_equipment;
pub use demand::{aggregate_demand, net_demand};
pub use grouping::group_batches;
pub use passengers::inject_passengers;
pub use ranking::rank_batches;

use myco_core::{Catalog, PlanResult, UserState};
use tracing::{debug, info, info_span};

/// Compute a full plan from scratch for the given snapshot.
///
/// Example:
/// let result = plan(&state, &catalog);
/// for batch in &result.batches { println!("{}", batch.id); }
pub fn plan(state: &UserState, catalog: &Catalog) -> PlanResult {
    let _span = info_span!("plan", orders = state.orders.len()).entered();

    let demand = aggregate_demand(&state.orders);
    let entries = net_demand(&demand, state, catalog);
    debug!(demanded = demand.len(), outstanding = entries.len(), "netted demand");
    if entries.is_empty() {
        info!("no outstanding demand");
        return PlanResult::default();
    }

    let mut batches = group_batches(entries);
    let missing_summary = audit_equipment(&mut batches, &state.unlocked);
    let passengers = inject_passengers(&mut batches);
    rank_batches(&mut batches);

    info!(
        batches = batches.len(),
        shortfalls = missing_summary.len(),
        passengers,
        "plan computed"
    );
    PlanResult {
        batches,
        missing_summary,
    }
}
