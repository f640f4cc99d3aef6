#![deny(warnings)]

//! Core domain model for the cultivation planner.
//!
//! This crate defines the serializable catalog, order and snapshot types the
//! planner consumes, the plan types it produces, and validation helpers that
//! callers run over a snapshot before handing it to the planner.

mod environment;
mod plan;

pub use environment::{Attribute, EnvironmentSignature, EquipmentKind, MissingEquipment};
pub use plan::{NetDemandEntry, PlanBatch, PlanResult, PlanTask};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Catalog identifier of a producible item, e.g. "shiitake".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A producible item from the static catalog.
///
/// Every requirement is optional. An absent secondary requirement means the
/// item grows under any value of that attribute; an absent primary
/// requirement places the item in the any-primary bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Catalog identifier.
    pub id: ItemId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Primary resource the item grows on (e.g. a wood type).
    #[serde(default)]
    pub primary: Option<String>,
    /// Required light level.
    #[serde(default)]
    pub light: Option<String>,
    /// Required humidity level.
    #[serde(default)]
    pub humidity: Option<String>,
    /// Required time of day.
    #[serde(default)]
    pub time: Option<String>,
    /// Special growing condition tag.
    #[serde(default, alias = "special_condition")]
    pub special_condition: Option<String>,
    /// Whether the special condition is kept ("rescued") or discarded.
    #[serde(default)]
    pub rescued: bool,
}

impl ItemDefinition {
    /// An item with no requirements at all.
    pub fn new(id: impl Into<String>) -> Self {
        let id = ItemId::new(id);
        Self {
            name: id.0.clone(),
            id,
            primary: None,
            light: None,
            humidity: None,
            time: None,
            special_condition: None,
            rescued: false,
        }
    }

    pub fn with_primary(mut self, value: impl Into<String>) -> Self {
        self.primary = Some(value.into());
        self
    }

    pub fn with_light(mut self, value: impl Into<String>) -> Self {
        self.light = Some(value.into());
        self
    }

    pub fn with_humidity(mut self, value: impl Into<String>) -> Self {
        self.humidity = Some(value.into());
        self
    }

    pub fn with_time(mut self, value: impl Into<String>) -> Self {
        self.time = Some(value.into());
        self
    }

    pub fn with_special_condition(mut self, tag: impl Into<String>, rescued: bool) -> Self {
        self.special_condition = Some(tag.into());
        self.rescued = rescued;
        self
    }

    /// Weighted count of stated requirements; more specific items are grouped first.
    pub fn specificity(&self) -> u32 {
        let mut score = 0;
        if self.primary.is_some() {
            score += 10;
        }
        if self.light.is_some() {
            score += 5;
        }
        if self.humidity.is_some() {
            score += 5;
        }
        if self.time.is_some() {
            score += 3;
        }
        if self.special_condition.is_some() {
            score += 1;
        }
        score
    }

    /// The exact environment this item asks for, unstated attributes as `Any`.
    pub fn signature(&self) -> EnvironmentSignature {
        EnvironmentSignature {
            primary: Attribute::from(self.primary.as_deref()),
            light: Attribute::from(self.light.as_deref()),
            humidity: Attribute::from(self.humidity.as_deref()),
            time: Attribute::from(self.time.as_deref()),
        }
    }
}

/// One requested (item, quantity) line of an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item: ItemId,
    pub count: u32,
}

/// A customer order. Inactive orders contribute no demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Order {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            lines: vec![],
            active: true,
        }
    }

    pub fn line(mut self, item: impl Into<String>, count: u32) -> Self {
        self.lines.push(OrderLine {
            item: ItemId::new(item),
            count,
        });
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Attribute values the user has already unlocked equipment for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedEquipment {
    #[serde(default)]
    pub primary: BTreeSet<String>,
    #[serde(default)]
    pub light: BTreeSet<String>,
    #[serde(default)]
    pub humidity: BTreeSet<String>,
}

impl UnlockedEquipment {
    pub fn contains(&self, kind: EquipmentKind, value: &str) -> bool {
        let set = match kind {
            EquipmentKind::Primary => &self.primary,
            EquipmentKind::Light => &self.light,
            EquipmentKind::Humidity => &self.humidity,
        };
        set.contains(value)
    }

    pub fn unlock(&mut self, kind: EquipmentKind, value: impl Into<String>) {
        let set = match kind {
            EquipmentKind::Primary => &mut self.primary,
            EquipmentKind::Light => &mut self.light,
            EquipmentKind::Humidity => &mut self.humidity,
        };
        set.insert(value.into());
    }
}

/// Per-run input snapshot: orders, stock on hand and unlocked equipment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub orders: Vec<Order>,
    /// On-hand count per item; a missing key means zero.
    #[serde(default)]
    pub inventory: BTreeMap<ItemId, u32>,
    #[serde(default)]
    pub unlocked: UnlockedEquipment,
}

impl UserState {
    /// On-hand stock for an item.
    pub fn stock(&self, id: &ItemId) -> u32 {
        self.inventory.get(id).copied().unwrap_or(0)
    }

    /// Snapshot after the task's quantity has been collected into inventory.
    ///
    /// The receiver is left untouched; replan from the returned snapshot.
    pub fn with_collected(&self, task: &PlanTask) -> UserState {
        let mut next = self.clone();
        let slot = next.inventory.entry(task.item.id.clone()).or_insert(0);
        *slot = slot.saturating_add(task.count_needed);
        debug!(item = %task.item.id, added = task.count_needed, stock = *slot, "collected task");
        next
    }
}

/// Immutable lookup of item definitions by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: BTreeMap<ItemId, ItemDefinition>,
}

impl Catalog {
    /// Build a catalog, validating every item and rejecting duplicate ids.
    pub fn new(items: impl IntoIterator<Item = ItemDefinition>) -> Result<Self, ValidationError> {
        let mut map = BTreeMap::new();
        for item in items {
            validate_item(&item)?;
            if map.contains_key(&item.id) {
                return Err(ValidationError::DuplicateItem(item.id.0.clone()));
            }
            map.insert(item.id.clone(), item);
        }
        debug!(items = map.len(), "catalog loaded");
        Ok(Self { items: map })
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }
}

/// Validation errors for catalog entries and user snapshots.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Item ids must be non-empty.
    #[error("item id must not be blank")]
    BlankItemId,
    /// Two catalog entries share an id.
    #[error("duplicate catalog item: {0}")]
    DuplicateItem(String),
    /// A stated requirement has an empty value.
    #[error("item {0} has a blank requirement value")]
    BlankAttribute(String),
    /// Order ids must be non-empty.
    #[error("order id must not be blank")]
    BlankOrderId,
    /// Two orders share an id.
    #[error("duplicate order: {0}")]
    DuplicateOrder(String),
    /// Order lines must request at least one unit.
    #[error("order {order} requests zero of {item}")]
    ZeroQuantity { order: String, item: String },
}

/// Validate a catalog item definition.
pub fn validate_item(item: &ItemDefinition) -> Result<(), ValidationError> {
    if item.id.0.trim().is_empty() {
        return Err(ValidationError::BlankItemId);
    }
    let stated = [
        &item.primary,
        &item.light,
        &item.humidity,
        &item.time,
        &item.special_condition,
    ];
    if stated
        .iter()
        .any(|v| v.as_deref().is_some_and(|s| s.trim().is_empty()))
    {
        return Err(ValidationError::BlankAttribute(item.id.0.clone()));
    }
    Ok(())
}

/// Validate a single order.
pub fn validate_order(order: &Order) -> Result<(), ValidationError> {
    if order.id.trim().is_empty() {
        return Err(ValidationError::BlankOrderId);
    }
    for line in &order.lines {
        if line.item.0.trim().is_empty() {
            return Err(ValidationError::BlankItemId);
        }
        if line.count == 0 {
            return Err(ValidationError::ZeroQuantity {
                order: order.id.clone(),
                item: line.item.0.clone(),
            });
        }
    }
    Ok(())
}

/// Validate a user snapshot, including order id uniqueness.
///
/// Order lines referencing ids missing from the catalog are not an error here;
/// the planner drops them.
pub fn validate_user_state(state: &UserState) -> Result<(), ValidationError> {
    let mut ids: BTreeSet<&str> = BTreeSet::new();
    for order in &state.orders {
        validate_order(order)?;
        if !ids.insert(order.id.as_str()) {
            return Err(ValidationError::DuplicateOrder(order.id.clone()));
        }
    }
    if state.inventory.keys().any(|id| id.0.trim().is_empty()) {
        return Err(ValidationError::BlankItemId);
    }
    Ok(())
}
