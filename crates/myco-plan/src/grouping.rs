//! First-fit partition of net demand into exact-environment batches.

use myco_core::{Attribute, NetDemandEntry, PlanBatch};
use tracing::debug;

/// Partition entries into batches keyed by their exact environment.
///
/// Entries are split by primary key (first appearance order), then within a
/// group processed most specific first. Each entry joins the first batch of
/// its group whose light, humidity and time match exactly, or opens a new
/// one. `Any` only matches `Any`.
pub fn group_batches(entries: Vec<NetDemandEntry>) -> Vec<PlanBatch> {
    let mut groups: Vec<(Attribute, Vec<NetDemandEntry>)> = Vec::new();
    for entry in entries {
        let key = Attribute::from(entry.item.primary.as_deref());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(entry),
            None => groups.push((key, vec![entry])),
        }
    }

    let mut batches = Vec::new();
    for (key, mut members) in groups {
        // Stable: ties keep netting order.
        members.sort_by(|a, b| b.item.specificity().cmp(&a.item.specificity()));
        let mut opened: Vec<PlanBatch> = Vec::new();
        for entry in members {
            let signature = entry.item.signature();
            match opened
                .iter_mut()
                .find(|b| b.signature.secondaries() == signature.secondaries())
            {
                Some(batch) => batch.push_native(entry),
                None => {
                    let mut batch = PlanBatch::open(signature);
                    batch.push_native(entry);
                    opened.push(batch);
                }
            }
        }
        debug!(primary = %key, batches = opened.len(), "grouped primary bucket");
        batches.extend(opened);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use myco_core::ItemDefinition;

    fn entry(item: ItemDefinition, count: u32) -> NetDemandEntry {
        NetDemandEntry {
            item,
            count_needed: count,
        }
    }

    #[test]
    fn exact_match_merges_same_environment() {
        let batches = group_batches(vec![
            entry(ItemDefinition::new("a").with_primary("oak").with_light("dim"), 2),
            entry(ItemDefinition::new("b").with_primary("oak").with_light("dim"), 3),
        ]);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].id, "oak/dim/*/*");
        assert_eq!(batches[0].total_count, 5);
        assert_eq!(batches[0].tasks.len(), 2);
    }

    #[test]
    fn any_is_not_a_wildcard() {
        let batches = group_batches(vec![
            entry(ItemDefinition::new("a").with_primary("oak").with_light("dim"), 1),
            entry(ItemDefinition::new("b").with_primary("oak"), 1),
        ]);
        assert_eq!(batches.len(), 2);
        let ids: Vec<_> = batches.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["oak/dim/*/*", "oak/*/*/*"]);
    }

    #[test]
    fn primary_buckets_never_merge() {
        let batches = group_batches(vec![
            entry(ItemDefinition::new("a").with_primary("oak"), 1),
            entry(ItemDefinition::new("b").with_primary("birch"), 1),
            entry(ItemDefinition::new("c"), 1),
        ]);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].id, "*/*/*/*");
        assert!(batches[2].signature.primary.is_any());
    }

    #[test]
    fn specific_items_open_batches_first() {
        let batches = group_batches(vec![
            entry(ItemDefinition::new("loose").with_primary("oak"), 1),
            entry(
                ItemDefinition::new("tight")
                    .with_primary("oak")
                    .with_light("dim")
                    .with_time("night"),
                1,
            ),
        ]);
        assert_eq!(batches[0].id, "oak/dim/*/night");
        assert_eq!(batches[1].id, "oak/*/*/*");
    }

    #[test]
    fn special_condition_does_not_split_batches() {
        let batches = group_batches(vec![
            entry(ItemDefinition::new("a").with_primary("oak"), 1),
            entry(
                ItemDefinition::new("b")
                    .with_primary("oak")
                    .with_special_condition("storm", true),
                2,
            ),
        ]);
        assert_eq!(batches.len(), 1);
        // Higher specificity is placed first.
        assert_eq!(batches[0].tasks[0].item.id.as_str(), "b");
    }
}
