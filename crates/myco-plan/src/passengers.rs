//! Free-rider injection between compatible batches.

use myco_core::{PlanBatch, PlanTask};
use tracing::debug;

/// Copy tasks from looser batches into strictly stricter compatible ones.
///
/// A pair qualifies when both batches share a primary key, the target admits
/// the source on light, humidity and time (the source side may be `Any`,
/// otherwise values must be equal), and the target's strictness is strictly
/// higher. Copies are marked as passengers and leave the source untouched.
///
/// For each target, sources are visited loosest first. Compatibility is
/// transitive, so every passenger's origin is the batch it is native to.
pub fn inject_passengers(batches: &mut [PlanBatch]) -> usize {
    let mut injected = 0;
    for target in 0..batches.len() {
        let mut sources: Vec<usize> = (0..batches.len())
            .filter(|&source| qualifies(&batches[target], &batches[source]))
            .collect();
        sources.sort_by_key(|&source| batches[source].strictness);

        for source in sources {
            let origin = batches[source].id.clone();
            let riders: Vec<PlanTask> = batches[source]
                .tasks
                .iter()
                .map(|t| t.as_passenger(&origin))
                .collect();
            let dest = &mut batches[target];
            for rider in riders {
                if dest.holds(&rider.item.id) {
                    continue;
                }
                dest.push_passenger(rider);
                injected += 1;
            }
        }
    }
    debug!(injected, "passengers injected");
    injected
}

fn qualifies(target: &PlanBatch, source: &PlanBatch) -> bool {
    target.id != source.id
        && target.signature.primary == source.signature.primary
        && target.strictness > source.strictness
        && target.signature.admits(&source.signature)
}
