//! Shared fixtures for use case tests.

use delver_domain::{
    AbilityScores, Creature, CreatureClass, CreatureId, CreatureKind, CreatureName,
    CreatureProperties, CreatureType, CreatureTypeId, Inventory, InventoryId, PropertiesId, Race,
    STARTING_LEVEL,
};

fn creature(id: i64, kind: CreatureKind, hp: i32, dex: i32) -> Creature {
    Creature {
        id: CreatureId::new(id),
        name: CreatureName::new(format!("{}-{}", kind, id)).unwrap(),
        kind,
        properties: CreatureProperties {
            id: PropertiesId::new(id + 1000),
            level: STARTING_LEVEL,
            xp: 0,
            hp,
            abilities: AbilityScores::new([10, dex, 10, 10, 10, 10]),
        },
        creature_type: CreatureType {
            id: CreatureTypeId::new(id + 2000),
            class: CreatureClass::Fighter,
            race: Race::Human,
            kind,
        },
        inventory: Inventory::empty(InventoryId::new(id + 3000), 2, 2),
        equipped: Default::default(),
    }
}

pub(crate) fn character(id: i64, hp: i32, dex: i32) -> Creature {
    creature(id, CreatureKind::Character, hp, dex)
}

pub(crate) fn monster(id: i64, hp: i32, dex: i32) -> Creature {
    creature(id, CreatureKind::Monster, hp, dex)
}
