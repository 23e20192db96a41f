//! Treasure templates, treasure instances and the loot engine.
//!
//! Opening a treasure rolls three loot lists from its type and hands each
//! rolled item to a uniformly random party inventory. Rolling samples ids
//! with replacement, so a single roll may yield several copies of one item.

use serde::{Deserialize, Serialize};

use crate::entities::inventory::{Consumable, Currency, Equipment, Inventory};
use crate::error::DomainError;
use crate::ids::{ConsumableId, CurrencyId, EquipmentId, TreasureId, TreasureTypeId};
use crate::value_objects::{pick_integer_from_range, Range};

/// Id pools and roll counts shared by a treasure type and its create/update input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootTable {
    pub equipment_ids: Vec<EquipmentId>,
    pub consumable_ids: Vec<ConsumableId>,
    pub currency_ids: Vec<CurrencyId>,
    pub num_equipment: Option<Range>,
    pub num_consumables: Option<Range>,
    pub num_currencies: Option<Range>,
}

impl LootTable {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a roll count range dips below zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (label, range) in [
            ("num_equipment", self.num_equipment),
            ("num_consumables", self.num_consumables),
            ("num_currencies", self.num_currencies),
        ] {
            if let Some(range) = range {
                if range.min() < 0 {
                    return Err(DomainError::validation(format!(
                        "{} range cannot start below zero",
                        label
                    )));
                }
            }
        }
        Ok(())
    }

    /// Roll all three loot lists. Each list is rolled independently.
    pub fn roll(&self, mut sampler: impl FnMut(i32, i32) -> i32) -> RolledLoot {
        RolledLoot {
            consumable_ids: roll_loot(self.num_consumables, &self.consumable_ids, &mut sampler),
            equipment_ids: roll_loot(self.num_equipment, &self.equipment_ids, &mut sampler),
            currency_ids: roll_loot(self.num_currencies, &self.currency_ids, &mut sampler),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureType {
    pub id: TreasureTypeId,
    #[serde(flatten)]
    pub loot: LootTable,
}

/// A placed treasure. `opened` only ever goes from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasure {
    pub id: TreasureId,
    pub treasure_type_id: TreasureTypeId,
    pub opened: bool,
}

impl Treasure {
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the treasure was already opened.
    pub fn ensure_unopened(&self) -> Result<(), DomainError> {
        if self.opened {
            return Err(DomainError::invalid_state_transition(format!(
                "Treasure {} has already been opened",
                self.id
            )));
        }
        Ok(())
    }
}

/// Sample a count from `range`, then that many entries from `pool` with replacement.
///
/// An absent range or an empty pool yields nothing.
pub fn roll_loot<T: Copy>(
    range: Option<Range>,
    pool: &[T],
    mut sampler: impl FnMut(i32, i32) -> i32,
) -> Vec<T> {
    let Some(range) = range else {
        return Vec::new();
    };
    if pool.is_empty() {
        return Vec::new();
    }

    let count = range.pick(&mut sampler).max(0) as usize;
    let last = i32::try_from(pool.len() - 1).unwrap_or(i32::MAX);
    (0..count)
        .map(|_| {
            let index = pick_integer_from_range(0, last, &mut sampler) as usize;
            pool[index.min(pool.len() - 1)]
        })
        .collect()
}

/// Item ids produced by one treasure roll, before they are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolledLoot {
    pub consumable_ids: Vec<ConsumableId>,
    pub equipment_ids: Vec<EquipmentId>,
    pub currency_ids: Vec<CurrencyId>,
}

/// Rolled loot with every id resolved to its catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLoot {
    pub consumables: Vec<Consumable>,
    pub equipment: Vec<Equipment>,
    pub currencies: Vec<Currency>,
}

/// Tally of a loot distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Hand every item to a uniformly random inventory, one independent pick per item.
///
/// Consumables go first, then equipment, then currency. A full target drops the
/// item; there is no retry on a different inventory. Currency always lands.
pub fn distribute_loot(
    loot: ResolvedLoot,
    inventories: &mut [Inventory],
    mut sampler: impl FnMut(i32, i32) -> i32,
) -> DistributionReport {
    let mut report = DistributionReport::default();
    if inventories.is_empty() {
        report.dropped = loot.consumables.len() + loot.equipment.len() + loot.currencies.len();
        return report;
    }

    let len = inventories.len();
    let last = i32::try_from(len - 1).unwrap_or(i32::MAX);
    let total = loot.consumables.len() + loot.equipment.len() + loot.currencies.len();
    let mut targets = (0..total)
        .map(|_| (pick_integer_from_range(0, last, &mut sampler) as usize).min(len - 1))
        .collect::<Vec<_>>()
        .into_iter();

    for item in loot.consumables {
        let target = targets.next().unwrap_or(0);
        match inventories[target].add_consumable(item) {
            Ok(()) => report.delivered += 1,
            Err(_) => report.dropped += 1,
        }
    }
    for item in loot.equipment {
        let target = targets.next().unwrap_or(0);
        match inventories[target].add_equipment(item) {
            Ok(()) => report.delivered += 1,
            Err(_) => report.dropped += 1,
        }
    }
    for item in loot.currencies {
        let target = targets.next().unwrap_or(0);
        inventories[target].add_currency(item);
        report.delivered += 1;
    }

    report
}
