//! Items: the closed catalog, the player's inventory and zone markets.

mod catalog;
mod inventory;
mod market;

pub use catalog::{ItemDef, ItemId, ItemKind, ProstheticSlot};
pub use inventory::{Inventory, InventorySnapshot, BARE_HANDED_DAMAGE, MELEE_RANGE};
pub use market::{Market, INITIAL_STOCK, MARKUP, SELLBACK};
