use crate::cards::Card;
use crate::config::GameConfig;
use crate::consumables::Consumable;
use crate::deck::Deck;
use crate::decks::{DeckKind, StakeKind};
use crate::events::{Event, EventBus};
use crate::hand::HandKind;
use crate::inventory::{ConsumableInstance, Inventory, InventoryError};
use crate::jokers::JokerKind;
use crate::rng::RngState;
use crate::score::ScoreStep;
use crate::shop::{PackOpen, ShopState};
use crate::state::{HandInfo, RoundState, RunPhase, RunTotals};
use crate::tags::TagKind;
use crate::vouchers::VoucherKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod blind;
mod consumable;
mod hand;
mod joker;
mod shop;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("action not allowed in phase {0:?}")]
    InvalidPhase(RunPhase),
    #[error("no hands left")]
    NoHandsLeft,
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("hand type not allowed by the boss")]
    HandNotAllowed,
    #[error("the boss blind cannot be skipped")]
    CannotSkipBoss,
    #[error("not enough money")]
    NotEnoughMoney,
    #[error("invalid index")]
    InvalidIndex,
    #[error("eternal jokers cannot be sold")]
    CannotSell,
    #[error("inventory: {0}")]
    Inventory(#[from] InventoryError),
    /// A rule the engine does not model yet. Raised loudly so gaps show up
    /// in tests instead of silently mis-scoring.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

/// A whole game. One seeded RNG lives inside; identical `(deck, stake,
/// seed)` plus an identical action sequence reproduce identical state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub config: GameConfig,
    pub deck_kind: DeckKind,
    pub stake: StakeKind,
    #[serde(skip, default = "default_rng")]
    pub rng: RngState,
    pub events: EventBus,
    pub phase: RunPhase,
    pub ante: u32,
    pub round: u32,
    pub stage: crate::state::BlindStage,
    pub money: i64,
    pub deck: Deck,
    pub hand: Vec<Card>,
    pub inventory: Inventory,
    pub vouchers: Vec<VoucherKind>,
    /// FIFO queue of skip tags waiting for their trigger site.
    pub tags: Vec<TagKind>,
    pub hand_info: Vec<(HandKind, HandInfo)>,
    pub round_state: Option<RoundState>,
    pub shop: Option<ShopState>,
    pub pack: Option<PackOpen>,
    /// Chip/mult mutations of the most recently scored hand, in order.
    pub trace: Vec<ScoreStep>,
    pub totals: RunTotals,
    next_card_id: u32,
    boss_pool: Vec<crate::bosses::BossKind>,
    /// Drawn once the Boss stage is reached so it can be previewed and
    /// rerolled before `select_blind` commits to it.
    next_boss: Option<crate::bosses::BossKind>,
    boss_rerolls_ante: u32,
    first_shop_done: bool,
    /// Unbought voucher offer; kept until purchased or the ante ends.
    pending_voucher: Option<VoucherKind>,
    last_consumable: Option<Consumable>,
    double_tags_pending: u32,
    deck_start_size: usize,
}

fn default_rng() -> RngState {
    RngState::from_seed(0)
}

impl Run {
    pub fn new(deck_kind: DeckKind, stake: StakeKind, seed: u64) -> Self {
        Self::with_config(deck_kind, stake, seed, GameConfig::default())
    }

    pub fn with_config(
        deck_kind: DeckKind,
        stake: StakeKind,
        seed: u64,
        mut config: GameConfig,
    ) -> Self {
        let mut rng = RngState::from_seed(seed);
        let mods = deck_kind.mods();
        config.hands = add_signed(config.hands, mods.hands);
        config.discards = add_signed(config.discards, mods.discards);
        config.discards = add_signed(config.discards, stake.discard_delta());
        config.hand_size = add_signed_usize(config.hand_size, mods.hand_size);
        config.joker_slots = add_signed_usize(config.joker_slots, mods.joker_slots);
        config.consumable_slots = add_signed_usize(config.consumable_slots, mods.consumable_slots);

        let mut cards = deck_kind.build_cards(&mut rng);
        let mut next_card_id = 1;
        for card in &mut cards {
            card.id = next_card_id;
            next_card_id += 1;
        }
        let deck_start_size = cards.len();

        let mut inventory = Inventory::with_slots(config.joker_slots, config.consumable_slots);
        for consumable in deck_kind.start_consumables() {
            let _ = inventory.add_consumable(ConsumableInstance {
                consumable,
                negative: false,
            });
        }

        let mut events = EventBus::default();
        events.push(Event::RunStarted { seed });

        let mut run = Self {
            money: config.economy.starting_money + mods.money,
            config,
            deck_kind,
            stake,
            rng,
            events,
            phase: RunPhase::SelectingBlind,
            ante: 1,
            round: 0,
            stage: crate::state::BlindStage::Small,
            deck: Deck::new(cards),
            hand: Vec::new(),
            inventory,
            vouchers: Vec::new(),
            tags: Vec::new(),
            hand_info: HandKind::ALL
                .iter()
                .map(|kind| (*kind, HandInfo::default()))
                .collect(),
            round_state: None,
            shop: None,
            pack: None,
            trace: Vec::new(),
            totals: RunTotals::default(),
            next_card_id,
            boss_pool: crate::bosses::BossKind::REGULAR.to_vec(),
            next_boss: None,
            boss_rerolls_ante: 0,
            first_shop_done: false,
            pending_voucher: None,
            last_consumable: None,
            double_tags_pending: 0,
            deck_start_size,
        };
        for voucher in deck_kind.start_vouchers() {
            run.grant_voucher(voucher);
        }
        run
    }

    pub fn hand_info(&self, kind: HandKind) -> HandInfo {
        self.hand_info
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, info)| *info)
            .unwrap_or_default()
    }

    pub(crate) fn hand_info_mut(&mut self, kind: HandKind) -> &mut HandInfo {
        let pos = self
            .hand_info
            .iter()
            .position(|(k, _)| *k == kind)
            .unwrap_or(0);
        &mut self.hand_info[pos].1
    }

    pub(crate) fn level_up_hand(&mut self, kind: HandKind, levels: u32) {
        let info = self.hand_info_mut(kind);
        info.level += levels;
        let level = info.level;
        self.events.push(Event::HandLeveled { kind, level });
    }

    pub fn round_score(&self) -> i128 {
        self.round_state.as_ref().map(|r| r.score).unwrap_or(0)
    }

    pub fn round_goal(&self) -> i64 {
        self.round_state.as_ref().map(|r| r.goal).unwrap_or(0)
    }

    pub fn hands_remaining(&self) -> u8 {
        self.round_state.as_ref().map(|r| r.hands_left).unwrap_or(0)
    }

    pub fn discards_remaining(&self) -> u8 {
        self.round_state
            .as_ref()
            .map(|r| r.discards_left)
            .unwrap_or(0)
    }

    pub fn game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Most-played hand category, ties broken by category strength.
    pub fn most_played_hand(&self) -> HandKind {
        let mut best = HandKind::HighCard;
        let mut top = 0;
        for (kind, info) in &self.hand_info {
            if info.played >= top {
                top = info.played;
                best = *kind;
            }
        }
        best
    }

    /// Moves a joker to a new position. Copiers resolve their target by
    /// live index lookup, so the move itself is all the bookkeeping needed.
    pub fn move_joker(&mut self, from: usize, to: usize) -> Result<(), RunError> {
        let len = self.inventory.jokers.len();
        if from >= len || to >= len {
            return Err(RunError::InvalidIndex);
        }
        let joker = self.inventory.jokers.remove(from);
        self.inventory.jokers.insert(to, joker);
        Ok(())
    }

    pub(crate) fn add_money(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        self.money += delta;
        self.events.push(Event::MoneyChanged {
            delta,
            total: self.money,
        });
    }

    /// Lowest balance a purchase may leave. Credit Card extends it below
    /// zero.
    pub(crate) fn money_floor(&self) -> i64 {
        if self.has_active_joker(JokerKind::CreditCard) {
            -20
        } else {
            0
        }
    }

    pub(crate) fn has_active_joker(&self, kind: JokerKind) -> bool {
        self.inventory
            .jokers
            .iter()
            .any(|j| j.kind == kind && !j.debuffed)
    }

    pub(crate) fn next_card_id(&mut self) -> u32 {
        let id = self.next_card_id;
        self.next_card_id += 1;
        id
    }

    /// Probability check through the run RNG. Oops! All 6s halves the
    /// sides, doubling every listed probability.
    pub(crate) fn roll_chance(&mut self, sides: u64) -> bool {
        let mut sides = sides;
        let oops = self
            .inventory
            .jokers
            .iter()
            .filter(|j| j.kind == JokerKind::OopsAllSixes && !j.debuffed)
            .count();
        for _ in 0..oops {
            sides = (sides / 2).max(1);
        }
        self.rng.chance(sides)
    }

    pub(crate) fn grant_voucher(&mut self, voucher: VoucherKind) {
        if self.vouchers.contains(&voucher) {
            return;
        }
        self.vouchers.push(voucher);
        self.apply_voucher_effect(voucher);
        self.events.push(Event::VoucherBought { voucher });
    }

    /// Immediate, permanent voucher effects. Price/weight vouchers are
    /// read at their use site instead.
    fn apply_voucher_effect(&mut self, voucher: VoucherKind) {
        match voucher {
            VoucherKind::Grabber | VoucherKind::NachoTong => {
                self.config.hands = self.config.hands.saturating_add(1);
            }
            VoucherKind::Wasteful | VoucherKind::Recyclomancy => {
                self.config.discards = self.config.discards.saturating_add(1);
            }
            VoucherKind::PaintBrush | VoucherKind::Palette => {
                self.config.hand_size += 1;
            }
            VoucherKind::Blank => {}
            VoucherKind::Antimatter => {
                self.config.joker_slots += 1;
                self.inventory.joker_slots += 1;
            }
            VoucherKind::Hieroglyph => {
                self.ante = self.ante.saturating_sub(1).max(1);
                self.config.hands = self.config.hands.saturating_sub(1);
            }
            VoucherKind::Petroglyph => {
                self.ante = self.ante.saturating_sub(1).max(1);
                self.config.discards = self.config.discards.saturating_sub(1);
            }
            _ => {}
        }
    }
}

fn add_signed(base: u8, delta: i8) -> u8 {
    (base as i16 + delta as i16).max(0) as u8
}

fn add_signed_usize(base: usize, delta: i8) -> usize {
    (base as i64 + delta as i64).max(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_starts_at_blind_select() {
        let run = Run::new(DeckKind::Red, StakeKind::White, 1);
        assert_eq!(run.phase, RunPhase::SelectingBlind);
        assert_eq!(run.ante, 1);
        assert_eq!(run.money, 4);
        assert_eq!(run.config.discards, 4);
        assert_eq!(run.deck.total(), 52);
        assert!(run.round_state.is_none());
    }

    #[test]
    fn deck_mods_apply_at_construction() {
        let black = Run::new(DeckKind::Black, StakeKind::White, 1);
        assert_eq!(black.config.joker_slots, 6);
        assert_eq!(black.config.hands, 3);
        let painted = Run::new(DeckKind::Painted, StakeKind::White, 1);
        assert_eq!(painted.config.hand_size, 10);
        assert_eq!(painted.config.joker_slots, 4);
    }

    #[test]
    fn card_ids_are_unique() {
        let run = Run::new(DeckKind::Red, StakeKind::White, 3);
        let mut ids: Vec<u32> = run.deck.draw.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 52);
    }

    #[test]
    fn magic_deck_starts_with_fools_and_voucher() {
        let run = Run::new(DeckKind::Magic, StakeKind::White, 1);
        assert_eq!(run.inventory.consumables.len(), 2);
        assert!(run.vouchers.contains(&VoucherKind::CrystalBall));
    }
}
