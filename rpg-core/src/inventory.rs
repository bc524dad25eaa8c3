//! Stacked item storage carried by an actor.

use crate::error::GameError;
use crate::items::Item;
use serde::{Deserialize, Serialize};

/// Identical items held together with a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStack {
    pub item: Item,
    pub quantity: u32,
}

/// An actor's carried items and gold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    stacks: Vec<InventoryStack>,
    #[serde(default)]
    gold: u32,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` copies of `item`, merging into an identical stack.
    pub fn add(&mut self, item: Item, quantity: u32) -> Result<(), GameError> {
        if quantity == 0 {
            return Err(GameError::invalid(format!(
                "cannot add zero of {}",
                item.name
            )));
        }

        if let Some(stack) = self.stacks.iter_mut().find(|s| s.item == item) {
            stack.quantity = stack.quantity.saturating_add(quantity);
        } else {
            self.stacks.push(InventoryStack { item, quantity });
        }
        Ok(())
    }

    /// Add a single item.
    pub fn add_one(&mut self, item: Item) {
        match self.stacks.iter_mut().find(|s| s.item == item) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(1),
            None => self.stacks.push(InventoryStack { item, quantity: 1 }),
        }
    }

    /// Remove `quantity` items named `name` and return one copy of the item.
    ///
    /// Matching stacks (case-insensitive) are drained in order, so the
    /// returned copy comes from the first of them.
    pub fn remove(&mut self, name: &str, quantity: u32) -> Result<Item, GameError> {
        if quantity == 0 {
            return Err(GameError::invalid(format!("cannot remove zero of {name}")));
        }

        let index = self
            .find_index(name)
            .ok_or_else(|| GameError::not_found(format!("{name} in inventory")))?;

        let held = self.quantity_of(name);
        if held < quantity {
            return Err(GameError::invalid(format!(
                "only {held} {} held, cannot remove {quantity}",
                self.stacks[index].item.name
            )));
        }

        let item = self.stacks[index].item.clone();
        let mut remaining = quantity;
        for stack in self
            .stacks
            .iter_mut()
            .filter(|s| s.item.name.eq_ignore_ascii_case(name))
        {
            let taken = stack.quantity.min(remaining);
            stack.quantity -= taken;
            remaining -= taken;
            if remaining == 0 {
                break;
            }
        }
        self.stacks.retain(|s| s.quantity > 0);
        Ok(item)
    }

    /// Remove a single item by name.
    pub fn take(&mut self, name: &str) -> Result<Item, GameError> {
        self.remove(name, 1)
    }

    /// Look up an item by name without removing it.
    pub fn find(&self, name: &str) -> Option<&Item> {
        self.find_index(name).map(|i| &self.stacks[i].item)
    }

    /// Total count of items named `name` across all stacks.
    pub fn quantity_of(&self, name: &str) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.item.name.eq_ignore_ascii_case(name))
            .map(|s| s.quantity)
            .sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    pub fn stacks(&self) -> &[InventoryStack] {
        &self.stacks
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty() && self.gold == 0
    }

    /// Total number of items, counting every copy.
    pub fn item_count(&self) -> u32 {
        self.stacks.iter().map(|s| s.quantity).sum()
    }

    /// Empty the inventory, returning every stack.
    pub fn drain(&mut self) -> Vec<InventoryStack> {
        std::mem::take(&mut self.stacks)
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
        self.gold = 0;
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend gold. Returns false and changes nothing if there is not enough.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    /// Take all gold, leaving none.
    pub fn take_gold(&mut self) -> u32 {
        std::mem::take(&mut self.gold)
    }

    fn find_index(&self, name: &str) -> Option<usize> {
        self.stacks
            .iter()
            .position(|s| s.item.name.eq_ignore_ascii_case(name))
    }
}
