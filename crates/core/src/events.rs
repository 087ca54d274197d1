use crate::{BlindStage, HandKind, JokerKind, TagKind, VoucherKind};
use serde::{Deserialize, Serialize};

/// Domain events pushed while the engine mutates state. The caller drains
/// them; the engine never logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RunStarted { seed: u64 },
    BlindSelected { stage: BlindStage, goal: i64 },
    BlindSkipped { stage: BlindStage, tag: TagKind },
    HandPlayed { kind: HandKind, score: i128 },
    HandDiscarded { count: usize },
    BlindCleared { reward: i64 },
    AnteAdvanced { ante: u32 },
    ShopEntered,
    ShopRerolled { cost: i64 },
    Purchased { label: String, cost: i64 },
    Sold { label: String, value: i64 },
    VoucherBought { voucher: VoucherKind },
    PackOpened { options: usize },
    PackPicked { label: String },
    PackSkipped,
    TagGained { tag: TagKind },
    TagResolved { tag: TagKind },
    ConsumableUsed { label: String },
    HandLeveled { kind: HandKind, level: u32 },
    JokerTriggered { kind: JokerKind, note: String },
    CardDestroyed { card_id: u32 },
    CardAdded { card_id: u32 },
    MoneyChanged { delta: i64, total: i64 },
    GameOver { won: bool },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn peek(&self) -> &[Event] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_bus() {
        let mut bus = EventBus::default();
        bus.push(Event::ShopEntered);
        bus.push(Event::PackSkipped);
        assert_eq!(bus.drain().len(), 2);
        assert!(bus.is_empty());
    }
}
