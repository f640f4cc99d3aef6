//! Plan output: tasks, batches and the overall result.

use crate::{EnvironmentSignature, ItemDefinition, ItemId, MissingEquipment};
use serde::{Deserialize, Serialize};

/// An item still needed after subtracting inventory. `count_needed` is > 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDemandEntry {
    pub item: ItemDefinition,
    pub count_needed: u32,
}

/// One item to grow within a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTask {
    pub item: ItemDefinition,
    pub count_needed: u32,
    /// Non-binding copy of a task native to another batch.
    pub is_passenger: bool,
    /// Batch the passenger was copied from; `None` for native tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_batch_id: Option<String>,
}

impl PlanTask {
    pub fn native(item: ItemDefinition, count_needed: u32) -> Self {
        Self {
            item,
            count_needed,
            is_passenger: false,
            origin_batch_id: None,
        }
    }

    /// Passenger copy of this task riding along from `origin`.
    pub fn as_passenger(&self, origin: &str) -> Self {
        Self {
            item: self.item.clone(),
            count_needed: self.count_needed,
            is_passenger: true,
            origin_batch_id: Some(origin.to_string()),
        }
    }
}

/// A set of tasks grown together under one environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBatch {
    /// Canonical form of `signature`.
    pub id: String,
    pub signature: EnvironmentSignature,
    /// Native tasks first, passengers appended.
    pub tasks: Vec<PlanTask>,
    pub missing: Vec<MissingEquipment>,
    pub strictness: u8,
    /// Sum of native task quantities.
    pub total_count: u32,
}

impl PlanBatch {
    /// Empty batch for a signature.
    pub fn open(signature: EnvironmentSignature) -> Self {
        Self {
            id: signature.canonical_id(),
            strictness: signature.strictness(),
            signature,
            tasks: vec![],
            missing: vec![],
            total_count: 0,
        }
    }

    pub fn push_native(&mut self, entry: NetDemandEntry) {
        self.total_count = self.total_count.saturating_add(entry.count_needed);
        self.tasks.push(PlanTask::native(entry.item, entry.count_needed));
    }

    /// Appends a passenger copy; does not touch `total_count`.
    pub fn push_passenger(&mut self, task: PlanTask) {
        debug_assert!(task.is_passenger);
        self.tasks.push(task);
    }

    pub fn holds(&self, id: &ItemId) -> bool {
        self.tasks.iter().any(|t| &t.item.id == id)
    }

    pub fn natives(&self) -> impl Iterator<Item = &PlanTask> {
        self.tasks.iter().filter(|t| !t.is_passenger)
    }

    pub fn passengers(&self) -> impl Iterator<Item = &PlanTask> {
        self.tasks.iter().filter(|t| t.is_passenger)
    }

    /// No equipment shortfall blocks this batch.
    pub fn is_completable(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Ordered batches plus the deduplicated equipment shortfall across them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub batches: Vec<PlanBatch>,
    pub missing_summary: Vec<MissingEquipment>,
}

impl PlanResult {
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty() && self.missing_summary.is_empty()
    }

    pub fn batch(&self, id: &str) -> Option<&PlanBatch> {
        self.batches.iter().find(|b| b.id == id)
    }

    /// The task native to `id`, wherever it was planned.
    pub fn native_task(&self, id: &ItemId) -> Option<&PlanTask> {
        self.batches
            .iter()
            .flat_map(|b| b.natives())
            .find(|t| &t.item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EquipmentKind;

    #[test]
    fn passengers_do_not_count_towards_total() {
        let oak = ItemDefinition::new("a").with_primary("oak");
        let mut batch = PlanBatch::open(oak.signature());
        batch.push_native(NetDemandEntry {
            item: oak.clone(),
            count_needed: 3,
        });
        let rider = PlanTask::native(ItemDefinition::new("b").with_primary("oak"), 7);
        batch.push_passenger(rider.as_passenger("oak/*/*/*"));

        assert_eq!(batch.id, "oak/*/*/*");
        assert_eq!(batch.strictness, 1);
        assert_eq!(batch.total_count, 3);
        assert_eq!(batch.natives().count(), 1);
        assert_eq!(batch.passengers().count(), 1);
        assert!(batch.holds(&ItemId::from("b")));
    }

    #[test]
    fn result_serializes_with_contract_field_names() {
        let mut batch = PlanBatch::open(ItemDefinition::new("a").with_primary("oak").signature());
        batch.missing.push(MissingEquipment::new(EquipmentKind::Primary, "oak"));
        let result = PlanResult {
            missing_summary: batch.missing.clone(),
            batches: vec![batch],
        };
        let v = serde_json::to_value(&result).unwrap();
        assert!(v.get("missingSummary").is_some());
        assert_eq!(v["batches"][0]["totalCount"], 0);
        assert_eq!(v["missingSummary"][0]["kind"], "primary");

        let back: PlanResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, result);
    }
}
