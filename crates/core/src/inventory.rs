use crate::cards::Edition;
use crate::consumables::Consumable;
use crate::jokers::JokerKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokerStickers {
    pub eternal: bool,
    pub perishable: bool,
    pub rental: bool,
}

/// One owned joker. `vars` holds per-joker counters (streaks, melt,
/// loyalty, accrued sell bonus) keyed by short names the effect code owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokerInstance {
    pub kind: JokerKind,
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub stickers: JokerStickers,
    #[serde(default)]
    pub buy_price: i64,
    /// Debuffed jokers still run their action hooks (counters keep
    /// advancing) but none of their ability hooks.
    #[serde(default)]
    pub debuffed: bool,
    #[serde(default)]
    pub vars: HashMap<String, f64>,
}

impl JokerInstance {
    pub fn new(kind: JokerKind, edition: Option<Edition>, buy_price: i64) -> Self {
        let mut vars = HashMap::new();
        for (key, value) in kind.initial_vars() {
            vars.insert((*key).to_string(), *value);
        }
        Self {
            kind,
            edition,
            stickers: JokerStickers::default(),
            buy_price,
            debuffed: false,
            vars,
        }
    }

    pub fn var(&self, key: &str) -> f64 {
        self.vars.get(key).copied().unwrap_or(0.0)
    }

    pub fn set_var(&mut self, key: &str, value: f64) {
        self.vars.insert(key.to_string(), value);
    }

    pub fn add_var(&mut self, key: &str, delta: f64) {
        *self.vars.entry(key.to_string()).or_insert(0.0) += delta;
    }

    pub fn is_negative(&self) -> bool {
        self.edition == Some(Edition::Negative)
    }

    pub fn sell_value(&self, sell_min: i64) -> i64 {
        let bonus = self.var("sell_bonus") as i64;
        (self.buy_price / 2 + bonus).max(sell_min)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumableInstance {
    pub consumable: Consumable,
    #[serde(default)]
    pub negative: bool,
}

impl ConsumableInstance {
    pub fn sell_value(&self, base_price: i64, sell_min: i64) -> i64 {
        (base_price / 2).max(sell_min)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub joker_slots: usize,
    pub consumable_slots: usize,
    pub jokers: Vec<JokerInstance>,
    pub consumables: Vec<ConsumableInstance>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no free joker slot")]
    JokersFull,
    #[error("no free consumable slot")]
    ConsumablesFull,
}

impl Inventory {
    pub fn with_slots(joker_slots: usize, consumable_slots: usize) -> Self {
        Self {
            joker_slots,
            consumable_slots,
            jokers: Vec::new(),
            consumables: Vec::new(),
        }
    }

    /// Negative jokers carry their own slot with them.
    pub fn joker_capacity(&self) -> usize {
        self.joker_slots + self.jokers.iter().filter(|j| j.is_negative()).count()
    }

    pub fn can_add_joker(&self, negative: bool) -> bool {
        let capacity = self.joker_capacity() + usize::from(negative);
        self.jokers.len() < capacity
    }

    pub fn add_joker(&mut self, joker: JokerInstance) -> Result<(), InventoryError> {
        if !self.can_add_joker(joker.is_negative()) {
            return Err(InventoryError::JokersFull);
        }
        self.jokers.push(joker);
        Ok(())
    }

    pub fn consumable_count(&self) -> usize {
        self.consumables.iter().filter(|c| !c.negative).count()
    }

    pub fn can_add_consumable(&self, negative: bool) -> bool {
        negative || self.consumable_count() < self.consumable_slots
    }

    pub fn add_consumable(&mut self, item: ConsumableInstance) -> Result<(), InventoryError> {
        if !self.can_add_consumable(item.negative) {
            return Err(InventoryError::ConsumablesFull);
        }
        self.consumables.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumables::Tarot;

    fn joker(kind: JokerKind) -> JokerInstance {
        JokerInstance::new(kind, None, 4)
    }

    #[test]
    fn joker_slots_fill_up() {
        let mut inv = Inventory::with_slots(2, 2);
        inv.add_joker(joker(JokerKind::Joker)).unwrap();
        inv.add_joker(joker(JokerKind::Banner)).unwrap();
        assert_eq!(
            inv.add_joker(joker(JokerKind::Misprint)),
            Err(InventoryError::JokersFull)
        );
    }

    #[test]
    fn negative_jokers_bring_their_own_slot() {
        let mut inv = Inventory::with_slots(1, 2);
        inv.add_joker(joker(JokerKind::Joker)).unwrap();
        let negative = JokerInstance::new(JokerKind::Banner, Some(Edition::Negative), 4);
        inv.add_joker(negative).unwrap();
        assert_eq!(inv.jokers.len(), 2);
        assert!(inv.can_add_joker(true));
        assert!(!inv.can_add_joker(false));
        inv.jokers.remove(1);
        assert!(!inv.can_add_joker(false));
    }

    #[test]
    fn negative_consumables_skip_the_count() {
        let mut inv = Inventory::with_slots(5, 1);
        inv.add_consumable(ConsumableInstance {
            consumable: Consumable::Tarot(Tarot::Hermit),
            negative: true,
        })
        .unwrap();
        assert_eq!(inv.consumable_count(), 0);
        inv.add_consumable(ConsumableInstance {
            consumable: Consumable::Tarot(Tarot::Strength),
            negative: false,
        })
        .unwrap();
        assert_eq!(
            inv.add_consumable(ConsumableInstance {
                consumable: Consumable::Tarot(Tarot::Death),
                negative: false,
            }),
            Err(InventoryError::ConsumablesFull)
        );
    }

    #[test]
    fn sell_value_halves_price_with_floor() {
        let mut j = joker(JokerKind::Joker);
        assert_eq!(j.sell_value(1), 2);
        j.add_var("sell_bonus", 3.0);
        assert_eq!(j.sell_value(1), 5);
        let cheap = JokerInstance::new(JokerKind::Joker, None, 0);
        assert_eq!(cheap.sell_value(1), 1);
    }
}
