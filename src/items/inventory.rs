//! Carried items, gold and equipment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ItemId, ItemKind};
use crate::body::Body;
use crate::error::ActionError;

/// Damage dealt with no weapon equipped.
pub const BARE_HANDED_DAMAGE: u32 = 8;
/// Reach of melee weapons and fists.
pub const MELEE_RANGE: f64 = 4.0;

/// Items by count, gold, and the equipped weapon and armor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<ItemId, u32>,
    /// Gold coins.
    pub gold: u32,
    weapon: Option<ItemId>,
    armor: Option<ItemId>,
}

/// Stored inventory. Item keys are kept as strings so unknown ids can be
/// skipped instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySnapshot {
    /// Item counts by key.
    pub items: BTreeMap<String, u32>,
    /// Gold coins.
    pub gold: u32,
    /// Equipped weapon key.
    pub weapon: Option<String>,
    /// Equipped armor key.
    pub armor: Option<String>,
}

impl Inventory {
    /// An inventory with `gold` and an optional weapon already equipped.
    #[must_use]
    pub fn new(gold: u32, start_weapon: Option<ItemId>) -> Self {
        let mut inv = Self {
            gold,
            ..Self::default()
        };
        if let Some(weapon) = start_weapon {
            inv.add(weapon, 1);
            inv.weapon = Some(weapon);
        }
        inv
    }

    /// Add `count` of `item`.
    pub fn add(&mut self, item: ItemId, count: u32) {
        if count == 0 {
            return;
        }
        let held = self.items.entry(item).or_insert(0);
        *held = held.saturating_add(count);
    }

    /// Remove `count` of `item`, unequipping it when the last one goes.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotEnough`] and leaves the inventory as is if
    /// fewer than `count` are held.
    pub fn remove(&mut self, item: ItemId, count: u32) -> Result<(), ActionError> {
        let held = self.count(item);
        if held < count {
            return Err(ActionError::NotEnough {
                item,
                wanted: count,
                held,
            });
        }
        if held == count {
            self.items.remove(&item);
            if self.weapon == Some(item) {
                self.weapon = None;
            }
            if self.armor == Some(item) {
                self.armor = None;
            }
        } else {
            self.items.insert(item, held - count);
        }
        Ok(())
    }

    /// Number of `item` held.
    #[must_use]
    pub fn count(&self, item: ItemId) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    /// Holds at least `count` of `item`?
    #[must_use]
    pub fn has(&self, item: ItemId, count: u32) -> bool {
        self.count(item) >= count
    }

    /// All held items with their counts.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.items.iter().map(|(&id, &n)| (id, n))
    }

    /// Equipped weapon.
    #[must_use]
    pub const fn weapon(&self) -> Option<ItemId> {
        self.weapon
    }

    /// Equipped armor.
    #[must_use]
    pub const fn armor(&self) -> Option<ItemId> {
        self.armor
    }

    fn require(&self, item: ItemId) -> Result<(), ActionError> {
        if self.has(item, 1) {
            Ok(())
        } else {
            Err(ActionError::NotEnough {
                item,
                wanted: 1,
                held: 0,
            })
        }
    }

    /// Equip a held weapon.
    ///
    /// # Errors
    ///
    /// Fails if the item is not held or is not a weapon.
    pub fn equip_weapon(&mut self, item: ItemId) -> Result<(), ActionError> {
        self.require(item)?;
        if !item.is_weapon() {
            return Err(ActionError::WrongItemKind {
                item,
                expected: "weapon",
            });
        }
        self.weapon = Some(item);
        Ok(())
    }

    /// Equip held armor.
    ///
    /// # Errors
    ///
    /// Fails if the item is not held or is not armor.
    pub fn equip_armor(&mut self, item: ItemId) -> Result<(), ActionError> {
        self.require(item)?;
        if !item.is_armor() {
            return Err(ActionError::WrongItemKind {
                item,
                expected: "armor",
            });
        }
        self.armor = Some(item);
        Ok(())
    }

    /// Base damage of the equipped weapon, or bare hands.
    #[must_use]
    pub fn weapon_damage(&self) -> u32 {
        match self.weapon.map(ItemId::kind) {
            Some(ItemKind::Weapon { damage, .. }) => damage,
            _ => BARE_HANDED_DAMAGE,
        }
    }

    /// Reach of the equipped weapon.
    #[must_use]
    pub fn weapon_range(&self) -> f64 {
        match self.weapon.map(ItemId::kind) {
            Some(ItemKind::Weapon {
                range: Some(range), ..
            }) => range,
            _ => MELEE_RANGE,
        }
    }

    /// Defense of the equipped armor.
    #[must_use]
    pub fn armor_defense(&self) -> u32 {
        match self.armor.map(ItemId::kind) {
            Some(ItemKind::Armor { defense, .. }) => defense,
            _ => 0,
        }
    }

    /// Agility granted by the equipped armor.
    #[must_use]
    pub fn agility_bonus(&self) -> u32 {
        match self.armor.map(ItemId::kind) {
            Some(ItemKind::Armor { agility_bonus, .. }) => agility_bonus,
            _ => 0,
        }
    }

    /// Consume one `item` to treat `body`. Returns the heal amount.
    ///
    /// # Errors
    ///
    /// Fails if the item is not a consumable or is not held.
    pub fn use_consumable(&mut self, item: ItemId, body: &mut Body) -> Result<u32, ActionError> {
        let ItemKind::Consumable { heal } = item.kind() else {
            return Err(ActionError::WrongItemKind {
                item,
                expected: "consumable",
            });
        };
        self.remove(item, 1)?;
        if heal > 0 {
            body.apply_treatment(heal);
        }
        Ok(heal)
    }

    /// Capture for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            items: self
                .items
                .iter()
                .map(|(id, &n)| (id.key().to_string(), n))
                .collect(),
            gold: self.gold,
            weapon: self.weapon.map(|w| w.key().to_string()),
            armor: self.armor.map(|a| a.key().to_string()),
        }
    }

    /// Restore from persistence, skipping unknown item keys.
    #[must_use]
    pub fn from_snapshot(snapshot: &InventorySnapshot) -> Self {
        let mut inv = Self {
            gold: snapshot.gold,
            ..Self::default()
        };
        for (key, &count) in &snapshot.items {
            match ItemId::from_key(key) {
                Some(id) => inv.add(id, count),
                None => tracing::warn!(item = %key, "skipping unknown item in snapshot"),
            }
        }
        inv.weapon = snapshot
            .weapon
            .as_deref()
            .and_then(ItemId::from_key)
            .filter(|w| w.is_weapon() && inv.has(*w, 1));
        inv.armor = snapshot
            .armor
            .as_deref()
            .and_then(ItemId::from_key)
            .filter(|a| a.is_armor() && inv.has(*a, 1));
        inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyPartId, PartStatus};

    #[test]
    fn test_start_weapon_is_equipped() {
        let inv = Inventory::new(50, Some(ItemId::ElvenBlade));
        assert_eq!(inv.weapon(), Some(ItemId::ElvenBlade));
        assert_eq!(inv.weapon_damage(), 13);
        assert_eq!(inv.count(ItemId::ElvenBlade), 1);
    }

    #[test]
    fn test_bare_hands() {
        let inv = Inventory::new(0, None);
        assert_eq!(inv.weapon_damage(), BARE_HANDED_DAMAGE);
        assert!((inv.weapon_range() - MELEE_RANGE).abs() < 1e-12);
        assert_eq!(inv.armor_defense(), 0);
    }

    #[test]
    fn test_remove_fails_without_mutation() {
        let mut inv = Inventory::new(0, None);
        inv.add(ItemId::Grain, 2);
        let err = inv.remove(ItemId::Grain, 3).unwrap_err();
        assert!(matches!(err, ActionError::NotEnough { held: 2, .. }));
        assert_eq!(inv.count(ItemId::Grain), 2);
        inv.remove(ItemId::Grain, 2).unwrap();
        assert!(!inv.has(ItemId::Grain, 1));
    }

    #[test]
    fn test_removing_equipped_weapon_unequips() {
        let mut inv = Inventory::new(0, Some(ItemId::Bow));
        assert!((inv.weapon_range() - 40.0).abs() < 1e-12);
        inv.remove(ItemId::Bow, 1).unwrap();
        assert_eq!(inv.weapon(), None);
    }

    #[test]
    fn test_equip_checks_kind() {
        let mut inv = Inventory::new(0, None);
        inv.add(ItemId::Silk, 1);
        inv.add(ItemId::ElvenArmor, 1);
        assert!(matches!(
            inv.equip_weapon(ItemId::Silk),
            Err(ActionError::WrongItemKind { .. })
        ));
        assert!(inv.equip_armor(ItemId::PlateArmor).is_err());
        inv.equip_armor(ItemId::ElvenArmor).unwrap();
        assert_eq!(inv.armor_defense(), 15);
        assert_eq!(inv.agility_bonus(), 2);
    }

    #[test]
    fn test_consumable_treats_body() {
        let mut inv = Inventory::new(0, None);
        inv.add(ItemId::HealingPotion, 1);
        let mut body = Body::new();
        body.part_mut(BodyPartId::Torso).hit(150);
        assert_eq!(inv.use_consumable(ItemId::HealingPotion, &mut body), Ok(50));
        assert_eq!(body.part(BodyPartId::Torso).hp(), 100);
        assert_eq!(body.part(BodyPartId::Torso).status(), PartStatus::Injured);
        assert!(inv.use_consumable(ItemId::HealingPotion, &mut body).is_err());
        assert!(inv.use_consumable(ItemId::Sword, &mut body).is_err());
    }

    #[test]
    fn test_snapshot_skips_unknown_items() {
        let mut snap = Inventory::new(30, Some(ItemId::Sword)).to_snapshot();
        snap.items.insert("moon_rock".to_string(), 4);
        snap.armor = Some("moon_rock".to_string());
        let inv = Inventory::from_snapshot(&snap);
        assert_eq!(inv.gold, 30);
        assert_eq!(inv.weapon(), Some(ItemId::Sword));
        assert_eq!(inv.armor(), None);
        assert_eq!(inv.items().count(), 1);
    }
}
