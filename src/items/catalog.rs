//! Item catalog keyed by a closed enum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body slot a prosthetic replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProstheticSlot {
    /// Replaces an arm.
    Arm,
    /// Replaces a leg.
    Leg,
    /// Replaces an eye.
    Eye,
}

/// What an item does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    /// Equippable weapon.
    Weapon {
        /// Base damage.
        damage: u32,
        /// Reach for ranged weapons; melee weapons use the default reach.
        range: Option<f64>,
    },
    /// Equippable armor.
    Armor {
        /// Flat damage reduction.
        defense: u32,
        /// Agility granted while worn.
        agility_bonus: u32,
    },
    /// Replacement for a severed part.
    Prosthetic(ProstheticSlot),
    /// Single-use healing item.
    Consumable {
        /// HP restored to each treated part.
        heal: u32,
    },
    /// Trade good with no use beyond its price.
    Trade,
}

/// Static description of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDef {
    /// Display name.
    pub name: &'static str,
    /// Behaviour.
    pub kind: ItemKind,
    /// Base price in gold.
    pub price: u32,
}

/// Every item in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ItemId {
    Sword,
    Dagger,
    Axe,
    Bow,
    Spear,
    Staff,
    ElvenBlade,
    DarkSword,
    LeatherArmor,
    ChainMail,
    PlateArmor,
    ElvenArmor,
    DarkArmor,
    WoodenArm,
    IronArm,
    WoodenLeg,
    IronLeg,
    GlassEye,
    HealingPotion,
    Bandage,
    StrongPotion,
    Antidote,
    Grain,
    Spices,
    Silk,
    IronOre,
    Gems,
    Timber,
    Furs,
    Ale,
}

const fn weapon(name: &'static str, damage: u32, price: u32) -> ItemDef {
    ItemDef {
        name,
        kind: ItemKind::Weapon {
            damage,
            range: None,
        },
        price,
    }
}

const fn armor(name: &'static str, defense: u32, agility_bonus: u32, price: u32) -> ItemDef {
    ItemDef {
        name,
        kind: ItemKind::Armor {
            defense,
            agility_bonus,
        },
        price,
    }
}

const fn prosthetic(name: &'static str, slot: ProstheticSlot, price: u32) -> ItemDef {
    ItemDef {
        name,
        kind: ItemKind::Prosthetic(slot),
        price,
    }
}

const fn consumable(name: &'static str, heal: u32, price: u32) -> ItemDef {
    ItemDef {
        name,
        kind: ItemKind::Consumable { heal },
        price,
    }
}

const fn trade(name: &'static str, price: u32) -> ItemDef {
    ItemDef {
        name,
        kind: ItemKind::Trade,
        price,
    }
}

impl ItemId {
    /// The whole catalog in declaration order.
    pub const ALL: [Self; 30] = [
        Self::Sword,
        Self::Dagger,
        Self::Axe,
        Self::Bow,
        Self::Spear,
        Self::Staff,
        Self::ElvenBlade,
        Self::DarkSword,
        Self::LeatherArmor,
        Self::ChainMail,
        Self::PlateArmor,
        Self::ElvenArmor,
        Self::DarkArmor,
        Self::WoodenArm,
        Self::IronArm,
        Self::WoodenLeg,
        Self::IronLeg,
        Self::GlassEye,
        Self::HealingPotion,
        Self::Bandage,
        Self::StrongPotion,
        Self::Antidote,
        Self::Grain,
        Self::Spices,
        Self::Silk,
        Self::IronOre,
        Self::Gems,
        Self::Timber,
        Self::Furs,
        Self::Ale,
    ];

    /// Goods a caravan can carry.
    pub const TRADE_GOODS: [Self; 8] = [
        Self::Grain,
        Self::Spices,
        Self::Silk,
        Self::IronOre,
        Self::Gems,
        Self::Timber,
        Self::Furs,
        Self::Ale,
    ];

    /// Catalog entry for this item.
    #[must_use]
    pub const fn def(self) -> ItemDef {
        use ProstheticSlot::{Arm, Eye, Leg};
        match self {
            Self::Sword => weapon("sword", 14, 150),
            Self::Dagger => weapon("dagger", 8, 60),
            Self::Axe => weapon("axe", 20, 200),
            Self::Bow => ItemDef {
                name: "bow",
                kind: ItemKind::Weapon {
                    damage: 10,
                    range: Some(40.0),
                },
                price: 100,
            },
            Self::Spear => weapon("spear", 16, 120),
            Self::Staff => weapon("staff", 10, 200),
            Self::ElvenBlade => weapon("elven blade", 13, 300),
            Self::DarkSword => weapon("dark sword", 22, 500),
            Self::LeatherArmor => armor("leather armor", 10, 0, 80),
            Self::ChainMail => armor("chain mail", 20, 0, 200),
            Self::PlateArmor => armor("plate armor", 35, 0, 500),
            Self::ElvenArmor => armor("elven armor", 15, 2, 350),
            Self::DarkArmor => armor("dark armor", 30, 0, 450),
            Self::WoodenArm => prosthetic("wooden arm", Arm, 80),
            Self::IronArm => prosthetic("iron arm", Arm, 300),
            Self::WoodenLeg => prosthetic("wooden leg", Leg, 100),
            Self::IronLeg => prosthetic("iron leg", Leg, 350),
            Self::GlassEye => prosthetic("glass eye", Eye, 150),
            Self::HealingPotion => consumable("healing potion", 50, 40),
            Self::Bandage => consumable("bandage", 20, 10),
            Self::StrongPotion => consumable("strong potion", 100, 100),
            Self::Antidote => consumable("antidote", 0, 30),
            Self::Grain => trade("grain", 5),
            Self::Spices => trade("spices", 50),
            Self::Silk => trade("silk", 80),
            Self::IronOre => trade("iron ore", 15),
            Self::Gems => trade("gems", 200),
            Self::Timber => trade("timber", 12),
            Self::Furs => trade("furs", 70),
            Self::Ale => trade("ale", 8),
        }
    }

    /// Stable snake_case identifier used in snapshots and on the CLI.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Sword => "sword",
            Self::Dagger => "dagger",
            Self::Axe => "axe",
            Self::Bow => "bow",
            Self::Spear => "spear",
            Self::Staff => "staff",
            Self::ElvenBlade => "elven_blade",
            Self::DarkSword => "dark_sword",
            Self::LeatherArmor => "leather_armor",
            Self::ChainMail => "chain_mail",
            Self::PlateArmor => "plate_armor",
            Self::ElvenArmor => "elven_armor",
            Self::DarkArmor => "dark_armor",
            Self::WoodenArm => "wooden_arm",
            Self::IronArm => "iron_arm",
            Self::WoodenLeg => "wooden_leg",
            Self::IronLeg => "iron_leg",
            Self::GlassEye => "glass_eye",
            Self::HealingPotion => "healing_potion",
            Self::Bandage => "bandage",
            Self::StrongPotion => "strong_potion",
            Self::Antidote => "antidote",
            Self::Grain => "grain",
            Self::Spices => "spices",
            Self::Silk => "silk",
            Self::IronOre => "iron_ore",
            Self::Gems => "gems",
            Self::Timber => "timber",
            Self::Furs => "furs",
            Self::Ale => "ale",
        }
    }

    /// Look up an item by its [`Self::key`].
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.key() == key)
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.def().name
    }

    /// Base price in gold.
    #[must_use]
    pub const fn price(self) -> u32 {
        self.def().price
    }

    /// Behaviour of this item.
    #[must_use]
    pub const fn kind(self) -> ItemKind {
        self.def().kind
    }

    /// Is this an equippable weapon?
    #[must_use]
    pub const fn is_weapon(self) -> bool {
        matches!(self.kind(), ItemKind::Weapon { .. })
    }

    /// Is this equippable armor?
    #[must_use]
    pub const fn is_armor(self) -> bool {
        matches!(self.kind(), ItemKind::Armor { .. })
    }

    /// Prosthetic slot, if this is a prosthetic.
    #[must_use]
    pub const fn prosthetic_slot(self) -> Option<ProstheticSlot> {
        match self.kind() {
            ItemKind::Prosthetic(slot) => Some(slot),
            _ => None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
