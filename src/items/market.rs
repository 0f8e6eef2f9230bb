//! Zone markets with finite stock.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Inventory, ItemId};
use crate::error::ActionError;
use crate::world::Zone;

/// Buy price multiplier over the catalog price.
pub const MARKUP: f64 = 1.3;
/// Sell price multiplier under the catalog price.
pub const SELLBACK: f64 = 0.6;
/// Units of each listed item a fresh market holds.
pub const INITIAL_STOCK: u32 = 10;

/// A market: which items it lists and how many of each remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    zone: Zone,
    stock: BTreeMap<ItemId, u32>,
}

impl Market {
    /// Fresh market for `zone` with every listed item at initial stock.
    #[must_use]
    pub fn new(zone: Zone) -> Self {
        let stock = zone
            .market_items()
            .iter()
            .map(|&item| (item, INITIAL_STOCK))
            .collect();
        Self { zone, stock }
    }

    /// Zone this market serves.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Listed items and their remaining stock.
    pub fn listing(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.stock.iter().map(|(&id, &n)| (id, n))
    }

    /// Remaining stock, or `None` if not listed here.
    #[must_use]
    pub fn stock(&self, item: ItemId) -> Option<u32> {
        self.stock.get(&item).copied()
    }

    /// Price to buy one `item` here.
    #[must_use]
    pub fn buy_price(item: ItemId) -> u32 {
        (f64::from(item.price()) * MARKUP).floor() as u32
    }

    /// Gold received for selling one `item`.
    #[must_use]
    pub fn sell_price(item: ItemId) -> u32 {
        (f64::from(item.price()) * SELLBACK).floor() as u32
    }

    /// Buy one `item` into `inventory`. Returns the price paid.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if the item is not listed, is out of
    /// stock, or the buyer is short of gold.
    pub fn buy(&mut self, item: ItemId, inventory: &mut Inventory) -> Result<u32, ActionError> {
        let stock = self
            .stock
            .get_mut(&item)
            .ok_or(ActionError::NotStocked(item))?;
        if *stock == 0 {
            return Err(ActionError::OutOfStock(item));
        }
        let price = Self::buy_price(item);
        if inventory.gold < price {
            return Err(ActionError::NotEnoughGold {
                price,
                held: inventory.gold,
            });
        }
        *stock -= 1;
        inventory.gold -= price;
        inventory.add(item, 1);
        Ok(price)
    }

    /// Sell one `item` from `inventory`. Any item can be sold; unlisted
    /// items become listed. Returns the gold received.
    ///
    /// # Errors
    ///
    /// Fails if the seller holds none.
    pub fn sell(&mut self, item: ItemId, inventory: &mut Inventory) -> Result<u32, ActionError> {
        inventory.remove(item, 1)?;
        let price = Self::sell_price(item);
        inventory.gold = inventory.gold.saturating_add(price);
        *self.stock.entry(item).or_insert(0) += 1;
        Ok(price)
    }
}
