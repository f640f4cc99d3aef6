//! Final batch ordering.

use myco_core::PlanBatch;
use std::cmp::Reverse;

/// Stricter first, then completable before blocked, then larger volume.
///
/// Stable, so full ties keep grouping order.
pub fn rank_batches(batches: &mut [PlanBatch]) {
    batches.sort_by_key(|b| {
        (
            Reverse(b.strictness),
            !b.is_completable(),
            Reverse(b.total_count),
        )
    });
}
