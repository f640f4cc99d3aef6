//! Equipment audit against the user's unlocked attribute values.

use myco_core::{Attribute, EquipmentKind, MissingEquipment, PlanBatch, UnlockedEquipment};
use std::collections::HashSet;
use tracing::debug;

/// Record per-batch shortfalls and return the deduplicated global summary.
///
/// Checks run primary, light, humidity. An `Any` attribute needs no
/// equipment, including the any-primary bucket. The summary keeps the
/// order in which shortfalls are first seen.
pub fn audit_equipment(
    batches: &mut [PlanBatch],
    unlocked: &UnlockedEquipment,
) -> Vec<MissingEquipment> {
    let mut seen: HashSet<MissingEquipment> = HashSet::new();
    let mut summary = Vec::new();
    for batch in batches.iter_mut() {
        let sig = &batch.signature;
        let gated = [
            (EquipmentKind::Primary, &sig.primary),
            (EquipmentKind::Light, &sig.light),
            (EquipmentKind::Humidity, &sig.humidity),
        ];
        let missing: Vec<MissingEquipment> = gated
            .into_iter()
            .filter_map(|(kind, attr)| match attr {
                Attribute::Specific(v) if !unlocked.contains(kind, v) => {
                    Some(MissingEquipment::new(kind, v.clone()))
                }
                _ => None,
            })
            .collect();
        for m in &missing {
            if seen.insert(m.clone()) {
                summary.push(m.clone());
            }
        }
        if !missing.is_empty() {
            debug!(batch = %batch.id, missing = missing.len(), "batch blocked on equipment");
        }
        batch.missing = missing;
    }
    summary
}
