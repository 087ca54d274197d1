use super::Run;
use crate::cards::{Card, Edition, Enhancement, Rank, Seal, Suit};
use crate::consumables::{Consumable, Spectral, Tarot};
use crate::events::Event;
use crate::hand::{EvalRules, HandEval, HandKind};
use crate::inventory::{ConsumableInstance, JokerInstance};
use crate::jokers::{JokerKind, JokerRarity};
use crate::score::{Effect, Score};

/// Copier chains longer than this resolve to nothing. Two copiers
/// pointing at each other would otherwise loop forever.
const COPY_DEPTH_LIMIT: usize = 4;

impl Run {
    /// Evaluator knobs contributed by passive jokers.
    pub(super) fn eval_rules(&self) -> EvalRules {
        EvalRules {
            smeared: self.has_active_joker(JokerKind::SmearedJoker),
            four_fingers: self.has_active_joker(JokerKind::FourFingers),
            shortcut: self.has_active_joker(JokerKind::Shortcut),
        }
    }

    /// The slot whose ability actually runs when `slot` triggers.
    /// Blueprint borrows its right neighbor, Brainstorm the leftmost
    /// joker; chains resolve by live index so reordering just works.
    /// Returns `None` for debuffed jokers and unresolvable copiers.
    pub(super) fn resolve_ability_slot(&self, slot: usize) -> Option<usize> {
        self.resolve_slot_inner(slot, 0)
    }

    fn resolve_slot_inner(&self, slot: usize, depth: usize) -> Option<usize> {
        if depth > COPY_DEPTH_LIMIT {
            return None;
        }
        let joker = self.inventory.jokers.get(slot)?;
        if joker.debuffed {
            return None;
        }
        match joker.kind {
            JokerKind::Blueprint => self.resolve_slot_inner(slot + 1, depth + 1),
            JokerKind::Brainstorm if slot > 0 => self.resolve_slot_inner(0, depth + 1),
            JokerKind::Brainstorm => None,
            _ => Some(slot),
        }
    }

    fn joker_kind(&self, slot: usize) -> JokerKind {
        self.inventory.jokers[slot].kind
    }

    fn joker_var(&self, slot: usize, key: &str) -> f64 {
        self.inventory.jokers[slot].var(key)
    }

    fn joker_add_var(&mut self, slot: usize, key: &str, delta: f64) {
        self.inventory.jokers[slot].add_var(key, delta);
    }

    fn joker_set_var(&mut self, slot: usize, key: &str, value: f64) {
        self.inventory.jokers[slot].set_var(key, value);
    }

    /// Removes the given slots, highest first so the indices stay valid.
    /// Eternal jokers shrug destruction off.
    pub(super) fn destroy_jokers(&mut self, mut slots: Vec<usize>) {
        slots.sort_unstable();
        slots.dedup();
        for slot in slots.into_iter().rev() {
            if slot >= self.inventory.jokers.len() {
                continue;
            }
            if self.inventory.jokers[slot].stickers.eternal {
                continue;
            }
            let gone = self.inventory.jokers.remove(slot);
            self.events.push(Event::JokerTriggered {
                kind: gone.kind,
                note: "destroyed".into(),
            });
        }
    }

    fn count_cards(&self, extra: &[Card], pred: impl Fn(&Card) -> bool) -> usize {
        self.deck
            .draw
            .iter()
            .chain(self.deck.discard.iter())
            .chain(self.hand.iter())
            .chain(extra.iter())
            .filter(|c| pred(c))
            .count()
    }

    /// Extra triggers a scored card receives from joker retrigger
    /// sources. `pos` is the card's position within the scored set.
    pub(super) fn scored_retriggers(&self, card: &Card, pos: usize, final_hand: bool) -> u32 {
        let mut extra = 0;
        for slot in 0..self.inventory.jokers.len() {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            let joker = &self.inventory.jokers[src];
            extra += match joker.kind {
                JokerKind::Dusk => u32::from(final_hand),
                JokerKind::Hack => u32::from(
                    !card.is_stone()
                        && matches!(
                            card.rank,
                            Rank::Two | Rank::Three | Rank::Four | Rank::Five
                        ),
                ),
                JokerKind::SockAndBuskin => u32::from(self.is_face_card(card)),
                JokerKind::HangingChad if pos == 0 => 2,
                JokerKind::Seltzer => u32::from(joker.var("rounds") > 0.0),
                _ => 0,
            };
        }
        extra
    }

    /// Extra triggers for cards held in hand (Mime, stacked via copiers).
    pub(super) fn held_retriggers(&self) -> u32 {
        (0..self.inventory.jokers.len())
            .filter_map(|slot| self.resolve_ability_slot(slot))
            .filter(|&src| self.joker_kind(src) == JokerKind::Mime)
            .count() as u32
    }

    pub(super) fn fire_blind_selected(&mut self) {
        let stage = self.round_state.as_ref().map(|r| r.stage);
        let boss_round = stage == Some(crate::state::BlindStage::Boss);
        let sell_min = self.config.economy.sell_min;
        let count = self.inventory.jokers.len();
        let mut dead: Vec<usize> = Vec::new();

        // Per-round targets reroll first, in slot order, so the RNG
        // stream is stable regardless of which abilities fire below.
        for slot in 0..count {
            match self.joker_kind(slot) {
                JokerKind::ToDoList => {
                    let hand = self.rng.index(HandKind::ALL.len()) as f64;
                    self.joker_set_var(slot, "hand", hand);
                }
                JokerKind::MailInRebate => {
                    let rank = self.rng.index(Rank::ALL.len()) as f64;
                    self.joker_set_var(slot, "rank", rank);
                }
                JokerKind::AncientJoker | JokerKind::Castle => {
                    let suit = self.rng.index(Suit::STANDARD.len()) as f64;
                    self.joker_set_var(slot, "suit", suit);
                }
                JokerKind::TheIdol => {
                    let rank = self.rng.index(Rank::ALL.len()) as f64;
                    let suit = self.rng.index(Suit::STANDARD.len()) as f64;
                    self.joker_set_var(slot, "rank", rank);
                    self.joker_set_var(slot, "suit", suit);
                }
                _ => {}
            }
        }

        for slot in 0..count {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            match self.joker_kind(src) {
                JokerKind::Burglar => {
                    if let Some(round) = self.round_state.as_mut() {
                        round.hands_left += 3;
                        round.hands_max += 3;
                        round.discards_left = 0;
                    }
                }
                JokerKind::Marble => {
                    let suit = Suit::STANDARD[self.rng.index(4)];
                    let rank = Rank::ALL[self.rng.index(13)];
                    let mut card = Card::standard(suit, rank);
                    card.enhancement = Some(Enhancement::Stone);
                    card.id = self.next_card_id();
                    let at = self.rng.index(self.deck.draw.len() + 1);
                    self.deck.draw.insert(at, card);
                    self.totals.cards_added += 1;
                    self.events.push(Event::CardAdded { card_id: card.id });
                    self.fire_card_added();
                }
                JokerKind::RiffRaff => {
                    for _ in 0..2 {
                        self.spawn_joker_of_rarity(JokerRarity::Common);
                    }
                }
                JokerKind::Cartomancer => {
                    self.spawn_random_tarot();
                }
                JokerKind::Certificate => {
                    let suit = Suit::STANDARD[self.rng.index(4)];
                    let rank = Rank::ALL[self.rng.index(13)];
                    let seal =
                        [Seal::Red, Seal::Blue, Seal::Gold, Seal::Purple][self.rng.index(4)];
                    let mut card = Card::standard(suit, rank);
                    card.seal = Some(seal);
                    card.id = self.next_card_id();
                    self.hand.push(card);
                    self.totals.cards_added += 1;
                    self.events.push(Event::CardAdded { card_id: card.id });
                    self.fire_card_added();
                }
                JokerKind::CeremonialDagger => {
                    // Eats the joker to the acting position's right and
                    // banks twice its sell value as mult.
                    let victim = slot + 1;
                    if victim < count && !self.inventory.jokers[victim].stickers.eternal {
                        let value = self.inventory.jokers[victim].sell_value(sell_min);
                        self.joker_add_var(src, "mult", 2.0 * value as f64);
                        dead.push(victim);
                    }
                }
                JokerKind::Madness if !boss_round => {
                    self.joker_add_var(src, "xmult", 0.5);
                    let victims: Vec<usize> = (0..count)
                        .filter(|&i| {
                            i != src
                                && i != slot
                                && !self.inventory.jokers[i].stickers.eternal
                                && !dead.contains(&i)
                        })
                        .collect();
                    if !victims.is_empty() {
                        dead.push(victims[self.rng.index(victims.len())]);
                    }
                }
                _ => {}
            }
        }
        self.destroy_jokers(dead);
    }

    /// Runs right after the category is known, before base chips/mult are
    /// seeded, so streak counters already reflect this hand.
    pub(super) fn fire_hand_played(
        &mut self,
        played: &[Card],
        scored: &[usize],
        eval: &HandEval,
        best: HandKind,
        _first_hand: bool,
        _final_hand: bool,
    ) {
        let scored_face = scored
            .iter()
            .any(|&i| self.is_face_card(&played[i]) && !self.card_debuffed(&played[i]));
        let best_count = self.hand_info(best).played;
        let rival_count = self
            .hand_info
            .iter()
            .filter(|(k, _)| *k != best)
            .map(|(_, info)| info.played)
            .max()
            .unwrap_or(0);
        let count = self.inventory.jokers.len();

        // Counter advancement runs for debuffed jokers too.
        for slot in 0..count {
            match self.joker_kind(slot) {
                JokerKind::RideTheBus => {
                    if scored_face {
                        self.joker_set_var(slot, "mult", 0.0);
                    } else {
                        self.joker_add_var(slot, "mult", 1.0);
                    }
                }
                JokerKind::GreenJoker => self.joker_add_var(slot, "mult", 1.0),
                JokerKind::LoyaltyCard => self.joker_add_var(slot, "count", 1.0),
                JokerKind::SquareJoker if played.len() == 4 => {
                    self.joker_add_var(slot, "chips", 4.0);
                }
                JokerKind::Runner if eval.contains(HandKind::Straight) => {
                    self.joker_add_var(slot, "chips", 15.0);
                }
                JokerKind::SpareTrousers if eval.contains(HandKind::TwoPair) => {
                    self.joker_add_var(slot, "mult", 2.0);
                }
                JokerKind::Obelisk => {
                    if best_count >= rival_count {
                        self.joker_set_var(slot, "xmult", 1.0);
                    } else {
                        self.joker_add_var(slot, "xmult", 0.2);
                    }
                }
                _ => {}
            }
        }

        for slot in 0..count {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            if self.joker_kind(src) == JokerKind::ToDoList {
                let target = HandKind::ALL[self.joker_var(src, "hand") as usize % 12];
                if target == best {
                    self.add_money(4);
                }
            }
        }
    }

    /// One trigger of every joker's scored-card reaction, in slot order.
    /// Retriggers re-enter here via `trigger_scored_card`.
    pub(super) fn fire_card_scored(
        &mut self,
        played: &mut [Card],
        idx: usize,
        _best: HandKind,
        score: &mut Score,
        photo_done: &mut bool,
    ) {
        let smeared = self.has_active_joker(JokerKind::SmearedJoker);
        let count = self.inventory.jokers.len();

        // Growth stays on the real instance; copiers never scale.
        for slot in 0..count {
            let joker = &self.inventory.jokers[slot];
            if joker.debuffed {
                continue;
            }
            match joker.kind {
                JokerKind::WeeJoker
                    if !played[idx].is_stone() && played[idx].rank == Rank::Two =>
                {
                    self.joker_add_var(slot, "chips", 8.0);
                }
                JokerKind::Vampire if played[idx].enhancement.is_some() => {
                    played[idx].enhancement = None;
                    self.joker_add_var(slot, "xmult", 0.1);
                }
                _ => {}
            }
        }

        for slot in 0..count {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            let kind = self.joker_kind(src);
            let card = played[idx];
            let name = kind.name();
            match kind {
                JokerKind::GreedyJoker if card.matches_suit(Suit::Diamonds, false, smeared) => {
                    self.score_effect(name, Effect::AddMult(3.0), score);
                }
                JokerKind::LustyJoker if card.matches_suit(Suit::Hearts, false, smeared) => {
                    self.score_effect(name, Effect::AddMult(3.0), score);
                }
                JokerKind::WrathfulJoker if card.matches_suit(Suit::Spades, false, smeared) => {
                    self.score_effect(name, Effect::AddMult(3.0), score);
                }
                JokerKind::GluttonousJoker if card.matches_suit(Suit::Clubs, false, smeared) => {
                    self.score_effect(name, Effect::AddMult(3.0), score);
                }
                JokerKind::EightBall if !card.is_stone() && card.rank == Rank::Eight => {
                    if self.roll_chance(4) {
                        self.spawn_random_tarot();
                    }
                }
                JokerKind::ScaryFace if self.is_face_card(&card) => {
                    self.score_effect(name, Effect::AddChips(30), score);
                }
                JokerKind::EvenSteven if card.is_even() => {
                    self.score_effect(name, Effect::AddMult(4.0), score);
                }
                JokerKind::OddTodd if card.is_odd() => {
                    self.score_effect(name, Effect::AddChips(31), score);
                }
                JokerKind::Scholar if !card.is_stone() && card.rank == Rank::Ace => {
                    self.score_effect(name, Effect::AddChips(20), score);
                    self.score_effect(name, Effect::AddMult(4.0), score);
                }
                JokerKind::BusinessCard if self.is_face_card(&card) => {
                    if self.roll_chance(2) {
                        self.add_money(2);
                    }
                }
                JokerKind::Photograph if self.is_face_card(&card) && !*photo_done => {
                    *photo_done = true;
                    self.score_effect(name, Effect::TimesMult(2.0), score);
                }
                JokerKind::WalkieTalkie
                    if !card.is_stone() && matches!(card.rank, Rank::Ten | Rank::Four) =>
                {
                    self.score_effect(name, Effect::AddChips(10), score);
                    self.score_effect(name, Effect::AddMult(4.0), score);
                }
                JokerKind::SmileyFace if self.is_face_card(&card) => {
                    self.score_effect(name, Effect::AddMult(5.0), score);
                }
                JokerKind::GoldenTicket if card.enhancement == Some(Enhancement::Gold) => {
                    self.add_money(4);
                }
                JokerKind::Fibonacci
                    if !card.is_stone()
                        && matches!(
                            card.rank,
                            Rank::Ace | Rank::Two | Rank::Three | Rank::Five | Rank::Eight
                        ) =>
                {
                    self.score_effect(name, Effect::AddMult(8.0), score);
                }
                JokerKind::Hiker => {
                    played[idx].bonus_chips += 5;
                }
                JokerKind::MidasMask if self.is_face_card(&card) => {
                    played[idx].enhancement = Some(Enhancement::Gold);
                }
                JokerKind::RoughGem if card.matches_suit(Suit::Diamonds, false, smeared) => {
                    self.add_money(1);
                }
                JokerKind::Bloodstone if card.matches_suit(Suit::Hearts, false, smeared) => {
                    if self.roll_chance(2) {
                        self.score_effect(name, Effect::TimesMult(1.5), score);
                    }
                }
                JokerKind::Arrowhead if card.matches_suit(Suit::Spades, false, smeared) => {
                    self.score_effect(name, Effect::AddChips(50), score);
                }
                JokerKind::OnyxAgate if card.matches_suit(Suit::Clubs, false, smeared) => {
                    self.score_effect(name, Effect::AddMult(7.0), score);
                }
                JokerKind::AncientJoker => {
                    let suit = Suit::STANDARD[self.joker_var(src, "suit") as usize % 4];
                    if card.matches_suit(suit, false, smeared) {
                        self.score_effect(name, Effect::TimesMult(1.5), score);
                    }
                }
                JokerKind::TheIdol => {
                    let rank = Rank::ALL[self.joker_var(src, "rank") as usize % 13];
                    let suit = Suit::STANDARD[self.joker_var(src, "suit") as usize % 4];
                    if !card.is_stone()
                        && card.rank == rank
                        && card.matches_suit(suit, false, smeared)
                    {
                        self.score_effect(name, Effect::TimesMult(2.0), score);
                    }
                }
                JokerKind::Triboulet
                    if !card.is_stone() && matches!(card.rank, Rank::King | Rank::Queen) =>
                {
                    self.score_effect(name, Effect::TimesMult(2.0), score);
                }
                _ => {}
            }
        }
    }

    pub(super) fn fire_card_held(&mut self, card: &Card, is_lowest: bool, score: &mut Score) {
        let count = self.inventory.jokers.len();
        for slot in 0..count {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            let kind = self.joker_kind(src);
            let name = kind.name();
            match kind {
                JokerKind::Baron if !card.is_stone() && card.rank == Rank::King => {
                    self.score_effect(name, Effect::TimesMult(1.5), score);
                }
                JokerKind::ShootTheMoon if !card.is_stone() && card.rank == Rank::Queen => {
                    self.score_effect(name, Effect::AddMult(13.0), score);
                }
                JokerKind::RaisedFist if is_lowest => {
                    let value = card.chip_value() as f64 * 2.0;
                    self.score_effect(name, Effect::AddMult(value), score);
                }
                JokerKind::ReservedParking if self.is_face_card(card) => {
                    if self.roll_chance(2) {
                        self.add_money(1);
                    }
                }
                _ => {}
            }
        }
    }

    /// The big left-to-right pass after card and held effects: each
    /// joker's edition, its ability, its polychrome, then any Baseball
    /// Card boost for uncommons. Hand decay counters tick at the end so
    /// the current hand scores at full strength.
    pub(super) fn fire_independent(
        &mut self,
        played: &[Card],
        scored: &[usize],
        eval: &HandEval,
        best: HandKind,
        final_hand: bool,
        repeated: bool,
        score: &mut Score,
    ) {
        let smeared = self.has_active_joker(JokerKind::SmearedJoker);
        let sell_min = self.config.economy.sell_min;
        let count = self.inventory.jokers.len();
        let discards_left = self
            .round_state
            .as_ref()
            .map(|r| r.discards_left)
            .unwrap_or(0);
        let jacks_discarded = self
            .round_state
            .as_ref()
            .map(|r| r.jacks_discarded)
            .unwrap_or(0);
        let baseball_boosts = (0..count)
            .filter_map(|slot| self.resolve_ability_slot(slot))
            .filter(|&src| self.joker_kind(src) == JokerKind::BaseballCard)
            .count();

        for slot in 0..count {
            let own = self.inventory.jokers[slot].clone();
            if !own.debuffed {
                match own.edition {
                    Some(Edition::Foil) => self.score_effect("foil", Effect::AddChips(50), score),
                    Some(Edition::Holographic) => {
                        self.score_effect("holographic", Effect::AddMult(10.0), score)
                    }
                    _ => {}
                }
            }

            if let Some(src) = self.resolve_ability_slot(slot) {
                let joker = self.inventory.jokers[src].clone();
                let kind = joker.kind;
                let name = kind.name();
                match kind {
                    JokerKind::Joker => self.score_effect(name, Effect::AddMult(4.0), score),
                    JokerKind::JollyJoker if eval.contains(HandKind::Pair) => {
                        self.score_effect(name, Effect::AddMult(8.0), score)
                    }
                    JokerKind::ZanyJoker if eval.contains(HandKind::ThreeOfAKind) => {
                        self.score_effect(name, Effect::AddMult(12.0), score)
                    }
                    JokerKind::MadJoker if eval.contains(HandKind::TwoPair) => {
                        self.score_effect(name, Effect::AddMult(10.0), score)
                    }
                    JokerKind::CrazyJoker if eval.contains(HandKind::Straight) => {
                        self.score_effect(name, Effect::AddMult(12.0), score)
                    }
                    JokerKind::DrollJoker if eval.contains(HandKind::Flush) => {
                        self.score_effect(name, Effect::AddMult(10.0), score)
                    }
                    JokerKind::SlyJoker if eval.contains(HandKind::Pair) => {
                        self.score_effect(name, Effect::AddChips(50), score)
                    }
                    JokerKind::WilyJoker if eval.contains(HandKind::ThreeOfAKind) => {
                        self.score_effect(name, Effect::AddChips(100), score)
                    }
                    JokerKind::CleverJoker if eval.contains(HandKind::TwoPair) => {
                        self.score_effect(name, Effect::AddChips(80), score)
                    }
                    JokerKind::DeviousJoker if eval.contains(HandKind::Straight) => {
                        self.score_effect(name, Effect::AddChips(100), score)
                    }
                    JokerKind::CraftyJoker if eval.contains(HandKind::Flush) => {
                        self.score_effect(name, Effect::AddChips(80), score)
                    }
                    JokerKind::HalfJoker if played.len() <= 3 => {
                        self.score_effect(name, Effect::AddMult(20.0), score)
                    }
                    JokerKind::Banner => {
                        self.score_effect(name, Effect::AddChips(30 * discards_left as i64), score)
                    }
                    JokerKind::MysticSummit if discards_left == 0 => {
                        self.score_effect(name, Effect::AddMult(15.0), score)
                    }
                    JokerKind::Misprint => {
                        let roll = self.rng.range_i64(0, 23) as f64;
                        self.score_effect(name, Effect::AddMult(roll), score);
                    }
                    JokerKind::AbstractJoker => {
                        let mult = 3.0 * self.inventory.jokers.len() as f64;
                        self.score_effect(name, Effect::AddMult(mult), score);
                    }
                    JokerKind::GrosMichel => self.score_effect(name, Effect::AddMult(15.0), score),
                    JokerKind::Supernova => {
                        let played_count = self.hand_info(best).played as f64;
                        self.score_effect(name, Effect::AddMult(played_count), score);
                    }
                    JokerKind::RideTheBus
                    | JokerKind::GreenJoker
                    | JokerKind::Popcorn
                    | JokerKind::SpareTrousers
                    | JokerKind::CeremonialDagger => {
                        let mult = joker.var("mult");
                        if mult > 0.0 {
                            self.score_effect(name, Effect::AddMult(mult), score);
                        }
                    }
                    JokerKind::IceCream
                    | JokerKind::SquareJoker
                    | JokerKind::Runner
                    | JokerKind::WeeJoker
                    | JokerKind::Castle => {
                        let chips = joker.var("chips") as i64;
                        if chips > 0 {
                            self.score_effect(name, Effect::AddChips(chips), score);
                        }
                    }
                    JokerKind::BlueJoker => {
                        let chips = 2 * self.deck.draw.len() as i64;
                        self.score_effect(name, Effect::AddChips(chips), score);
                    }
                    JokerKind::Cavendish => {
                        self.score_effect(name, Effect::TimesMult(3.0), score)
                    }
                    JokerKind::RedCard => {
                        let mult = 3.0 * self.totals.packs_skipped as f64;
                        if mult > 0.0 {
                            self.score_effect(name, Effect::AddMult(mult), score);
                        }
                    }
                    JokerKind::FortuneTeller => {
                        let mult = self.totals.tarots_used as f64;
                        if mult > 0.0 {
                            self.score_effect(name, Effect::AddMult(mult), score);
                        }
                    }
                    JokerKind::Swashbuckler => {
                        let mult: i64 = self
                            .inventory
                            .jokers
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != src)
                            .map(|(_, j)| j.sell_value(sell_min))
                            .sum();
                        self.score_effect(name, Effect::AddMult(mult as f64), score);
                    }
                    JokerKind::JokerStencil => {
                        let free = self
                            .inventory
                            .joker_capacity()
                            .saturating_sub(self.inventory.jokers.len());
                        self.score_effect(name, Effect::TimesMult((free + 1) as f64), score);
                    }
                    JokerKind::LoyaltyCard => {
                        let hands = joker.var("count") as u64;
                        if hands > 0 && hands % 6 == 0 {
                            self.score_effect(name, Effect::TimesMult(4.0), score);
                        }
                    }
                    JokerKind::SteelJoker => {
                        let steel = self
                            .count_cards(played, |c| c.enhancement == Some(Enhancement::Steel));
                        self.score_effect(
                            name,
                            Effect::TimesMult(1.0 + 0.2 * steel as f64),
                            score,
                        );
                    }
                    JokerKind::Blackboard => {
                        let all_black = self.hand.iter().all(|c| !c.is_stone() && c.is_black());
                        if all_black {
                            self.score_effect(name, Effect::TimesMult(3.0), score);
                        }
                    }
                    JokerKind::CardSharp if repeated => {
                        self.score_effect(name, Effect::TimesMult(3.0), score)
                    }
                    JokerKind::Constellation
                    | JokerKind::Madness
                    | JokerKind::Vampire
                    | JokerKind::Hologram
                    | JokerKind::LuckyCat
                    | JokerKind::Ramen
                    | JokerKind::GlassJoker
                    | JokerKind::Obelisk
                    | JokerKind::Campfire
                    | JokerKind::Canio
                    | JokerKind::Yorick => {
                        let x = joker.var("xmult");
                        if x > 1.0 {
                            self.score_effect(name, Effect::TimesMult(x), score);
                        }
                    }
                    JokerKind::Erosion => {
                        let current = self.deck.total() + self.hand.len() + played.len();
                        let missing = self.deck_start_size.saturating_sub(current);
                        if missing > 0 {
                            self.score_effect(name, Effect::AddMult(4.0 * missing as f64), score);
                        }
                    }
                    JokerKind::StoneJoker => {
                        let stones = self.count_cards(played, Card::is_stone);
                        if stones > 0 {
                            self.score_effect(name, Effect::AddChips(25 * stones as i64), score);
                        }
                    }
                    JokerKind::Bull => {
                        let chips = 2 * self.money.max(0);
                        if chips > 0 {
                            self.score_effect(name, Effect::AddChips(chips), score);
                        }
                    }
                    JokerKind::FlashCard => {
                        let mult = 2.0 * self.totals.rerolls as f64;
                        if mult > 0.0 {
                            self.score_effect(name, Effect::AddMult(mult), score);
                        }
                    }
                    JokerKind::Acrobat if final_hand => {
                        self.score_effect(name, Effect::TimesMult(3.0), score)
                    }
                    JokerKind::Throwback => {
                        let x = 1.0 + 0.25 * self.totals.blinds_skipped as f64;
                        if x > 1.0 {
                            self.score_effect(name, Effect::TimesMult(x), score);
                        }
                    }
                    JokerKind::FlowerPot => {
                        if covers_all_suits(played, scored, |c| self.card_debuffed(c)) {
                            self.score_effect(name, Effect::TimesMult(3.0), score);
                        }
                    }
                    JokerKind::SeeingDouble => {
                        if clubs_and_another(played, scored, smeared, |c| self.card_debuffed(c)) {
                            self.score_effect(name, Effect::TimesMult(2.0), score);
                        }
                    }
                    JokerKind::DriversLicense => {
                        let enhanced = self.count_cards(played, |c| c.enhancement.is_some());
                        if enhanced >= 16 {
                            self.score_effect(name, Effect::TimesMult(3.0), score);
                        }
                    }
                    JokerKind::HitTheRoad => {
                        let x = 1.0 + 0.5 * jacks_discarded as f64;
                        if x > 1.0 {
                            self.score_effect(name, Effect::TimesMult(x), score);
                        }
                    }
                    JokerKind::TheDuo if eval.contains(HandKind::Pair) => {
                        self.score_effect(name, Effect::TimesMult(2.0), score)
                    }
                    JokerKind::TheTrio if eval.contains(HandKind::ThreeOfAKind) => {
                        self.score_effect(name, Effect::TimesMult(3.0), score)
                    }
                    JokerKind::TheFamily if eval.contains(HandKind::FourOfAKind) => {
                        self.score_effect(name, Effect::TimesMult(4.0), score)
                    }
                    JokerKind::TheOrder if eval.contains(HandKind::Straight) => {
                        self.score_effect(name, Effect::TimesMult(3.0), score)
                    }
                    JokerKind::TheTribe if eval.contains(HandKind::Flush) => {
                        self.score_effect(name, Effect::TimesMult(2.0), score)
                    }
                    JokerKind::Stuntman => self.score_effect(name, Effect::AddChips(250), score),
                    JokerKind::Bootstraps => {
                        let mult = 2.0 * (self.money / 5).max(0) as f64;
                        if mult > 0.0 {
                            self.score_effect(name, Effect::AddMult(mult), score);
                        }
                    }
                    JokerKind::Matador => {
                        let boss_hit = self
                            .round_state
                            .as_ref()
                            .map_or(false, |r| r.boss.is_some() && !r.boss_disabled)
                            && played.iter().any(|c| self.card_debuffed(c));
                        if boss_hit {
                            self.add_money(8);
                        }
                    }
                    _ => {}
                }
                if !own.debuffed && own.edition == Some(Edition::Polychrome) {
                    self.score_effect("polychrome", Effect::TimesMult(1.5), score);
                }
                if kind != JokerKind::BaseballCard
                    && self.joker_kind(slot).rarity() == JokerRarity::Uncommon
                {
                    for _ in 0..baseball_boosts {
                        self.score_effect("Baseball Card", Effect::TimesMult(1.5), score);
                    }
                }
            } else if !own.debuffed && own.edition == Some(Edition::Polychrome) {
                self.score_effect("polychrome", Effect::TimesMult(1.5), score);
            }
        }

        // Per-hand decay ticks after the hand banked its value.
        let mut dead: Vec<usize> = Vec::new();
        for slot in 0..count {
            match self.joker_kind(slot) {
                JokerKind::IceCream => {
                    self.joker_add_var(slot, "chips", -5.0);
                    if self.joker_var(slot, "chips") <= 0.0 {
                        dead.push(slot);
                    }
                }
                JokerKind::Seltzer => {
                    self.joker_add_var(slot, "rounds", -1.0);
                    if self.joker_var(slot, "rounds") <= 0.0 {
                        dead.push(slot);
                    }
                }
                _ => {}
            }
        }
        self.destroy_jokers(dead);
    }

    pub(super) fn fire_discard(&mut self, discarded: &[Card], first_discard: bool) {
        let smeared = self.has_active_joker(JokerKind::SmearedJoker);
        let count = self.inventory.jokers.len();
        let mut dead: Vec<usize> = Vec::new();

        for slot in 0..count {
            match self.joker_kind(slot) {
                JokerKind::GreenJoker => {
                    let next = (self.joker_var(slot, "mult") - 1.0).max(0.0);
                    self.joker_set_var(slot, "mult", next);
                }
                JokerKind::Ramen => {
                    self.joker_add_var(slot, "xmult", -0.01 * discarded.len() as f64);
                    if self.joker_var(slot, "xmult") <= 1.0 {
                        dead.push(slot);
                    }
                }
                JokerKind::Yorick => {
                    self.joker_add_var(slot, "discards", discarded.len() as f64);
                    while self.joker_var(slot, "discards") >= 23.0 {
                        self.joker_add_var(slot, "discards", -23.0);
                        self.joker_add_var(slot, "xmult", 1.0);
                    }
                }
                _ => {}
            }
        }

        for slot in 0..count {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            match self.joker_kind(src) {
                JokerKind::FacelessJoker => {
                    let faces = discarded.iter().filter(|c| self.is_face_card(c)).count();
                    if faces >= 3 {
                        self.add_money(5);
                    }
                }
                JokerKind::MailInRebate => {
                    let rank = Rank::ALL[self.joker_var(src, "rank") as usize % 13];
                    let hits = discarded
                        .iter()
                        .filter(|c| !c.is_stone() && c.rank == rank)
                        .count() as i64;
                    if hits > 0 {
                        self.add_money(5 * hits);
                    }
                }
                JokerKind::Castle => {
                    let suit = Suit::STANDARD[self.joker_var(src, "suit") as usize % 4];
                    let hits = discarded
                        .iter()
                        .filter(|c| c.matches_suit(suit, false, smeared))
                        .count() as f64;
                    if hits > 0.0 {
                        self.joker_add_var(src, "chips", 3.0 * hits);
                    }
                }
                JokerKind::BurntJoker if first_discard => {
                    let debuffs = vec![false; discarded.len()];
                    let eval = crate::hand::evaluate(discarded, &debuffs, self.eval_rules());
                    self.level_up_hand(eval.best(), 1);
                }
                _ => {}
            }
        }
        self.destroy_jokers(dead);
    }

    pub(super) fn fire_round_end(&mut self) {
        let count = self.inventory.jokers.len();
        let mut dead: Vec<usize> = Vec::new();
        let mut gift_cards = 0i64;
        let mut rental_due = 0i64;

        for slot in 0..count {
            let stickers = self.inventory.jokers[slot].stickers;
            match self.joker_kind(slot) {
                JokerKind::Popcorn => {
                    self.joker_add_var(slot, "mult", -4.0);
                    if self.joker_var(slot, "mult") <= 0.0 {
                        dead.push(slot);
                    }
                }
                JokerKind::TurtleBean => {
                    self.joker_add_var(slot, "hand_size", -1.0);
                    if self.joker_var(slot, "hand_size") <= 0.0 {
                        dead.push(slot);
                    }
                }
                JokerKind::Egg => self.joker_add_var(slot, "sell_bonus", 3.0),
                JokerKind::InvisibleJoker => self.joker_add_var(slot, "rounds_held", 1.0),
                _ => {}
            }
            if stickers.perishable && self.joker_var(slot, "perish_done") == 0.0 {
                self.joker_add_var(slot, "perish", 1.0);
                if self.joker_var(slot, "perish") >= 5.0 {
                    self.joker_set_var(slot, "perish_done", 1.0);
                }
            }
            if stickers.rental {
                rental_due += 3;
            }
        }

        for slot in 0..count {
            let Some(src) = self.resolve_ability_slot(slot) else {
                continue;
            };
            match self.joker_kind(src) {
                JokerKind::GrosMichel if src == slot => {
                    if self.roll_chance(6) {
                        dead.push(slot);
                    }
                }
                JokerKind::Cavendish if src == slot => {
                    if self.roll_chance(1000) {
                        dead.push(slot);
                    }
                }
                JokerKind::GoldenJoker => self.add_money(4),
                JokerKind::DelayedGratification => {
                    let unused = self
                        .round_state
                        .as_ref()
                        .filter(|r| r.discards_left == r.discards_max)
                        .map(|r| r.discards_max as i64)
                        .unwrap_or(0);
                    if unused > 0 {
                        self.add_money(2 * unused);
                    }
                }
                JokerKind::CloudNine => {
                    let nines = self.count_cards(&[], |c| !c.is_stone() && c.rank == Rank::Nine);
                    if nines > 0 {
                        self.add_money(nines as i64);
                    }
                }
                JokerKind::Satellite => {
                    let planets = self.totals.planet_kinds_used.len() as i64;
                    if planets > 0 {
                        self.add_money(planets);
                    }
                }
                JokerKind::GiftCard => gift_cards += 1,
                JokerKind::Rocket => {
                    let payout = self.joker_var(src, "payout") as i64;
                    self.add_money(payout);
                }
                _ => {}
            }
        }

        if gift_cards > 0 {
            for joker in &mut self.inventory.jokers {
                joker.add_var("sell_bonus", gift_cards as f64);
            }
        }
        if rental_due > 0 {
            self.add_money(-rental_due);
        }
        self.destroy_jokers(dead);
    }

    pub(super) fn fire_boss_defeated(&mut self) {
        for slot in 0..self.inventory.jokers.len() {
            let joker = &self.inventory.jokers[slot];
            if joker.debuffed {
                continue;
            }
            match joker.kind {
                JokerKind::Rocket => self.joker_add_var(slot, "payout", 2.0),
                JokerKind::Campfire => self.joker_set_var(slot, "xmult", 1.0),
                _ => {}
            }
        }
    }

    pub(super) fn fire_card_destroyed(&mut self, card: &Card) {
        let face = self.is_face_card(card);
        for slot in 0..self.inventory.jokers.len() {
            let joker = &self.inventory.jokers[slot];
            if joker.debuffed {
                continue;
            }
            match joker.kind {
                JokerKind::GlassJoker if card.enhancement == Some(Enhancement::Glass) => {
                    self.joker_add_var(slot, "xmult", 0.75);
                }
                JokerKind::Canio if face => self.joker_add_var(slot, "xmult", 1.0),
                _ => {}
            }
        }
    }

    pub(super) fn fire_card_added(&mut self) {
        for slot in 0..self.inventory.jokers.len() {
            let joker = &self.inventory.jokers[slot];
            if !joker.debuffed && joker.kind == JokerKind::Hologram {
                self.joker_add_var(slot, "xmult", 0.25);
            }
        }
    }

    pub(super) fn fire_lucky_triggered(&mut self) {
        for slot in 0..self.inventory.jokers.len() {
            let joker = &self.inventory.jokers[slot];
            if !joker.debuffed && joker.kind == JokerKind::LuckyCat {
                self.joker_add_var(slot, "xmult", 0.25);
            }
        }
    }

    pub(super) fn fire_planet_used(&mut self) {
        for slot in 0..self.inventory.jokers.len() {
            let joker = &self.inventory.jokers[slot];
            if !joker.debuffed && joker.kind == JokerKind::Constellation {
                self.joker_add_var(slot, "xmult", 0.1);
            }
        }
    }

    pub(super) fn fire_pack_opened(&mut self) {
        let hallucinations = (0..self.inventory.jokers.len())
            .filter_map(|slot| self.resolve_ability_slot(slot))
            .filter(|&src| self.joker_kind(src) == JokerKind::Hallucination)
            .count();
        for _ in 0..hallucinations {
            if self.roll_chance(2) {
                self.spawn_random_tarot();
            }
        }
    }

    /// Bystander reactions to any sale; the sold item's own effects are
    /// handled at the sell site.
    pub(super) fn fire_item_sold(&mut self) {
        for slot in 0..self.inventory.jokers.len() {
            let joker = &self.inventory.jokers[slot];
            if !joker.debuffed && joker.kind == JokerKind::Campfire {
                self.joker_add_var(slot, "xmult", 0.25);
            }
        }
    }

    pub(super) fn fire_shop_exited(&mut self) {
        let perkeos = (0..self.inventory.jokers.len())
            .filter_map(|slot| self.resolve_ability_slot(slot))
            .filter(|&src| self.joker_kind(src) == JokerKind::Perkeo)
            .count();
        for _ in 0..perkeos {
            if self.inventory.consumables.is_empty() {
                continue;
            }
            let pick = self.rng.index(self.inventory.consumables.len());
            let copy = ConsumableInstance {
                consumable: self.inventory.consumables[pick].consumable,
                negative: true,
            };
            let _ = self.inventory.add_consumable(copy);
        }
    }

    /// Creates a joker of the given rarity if a slot is free. Owned kinds
    /// are excluded from the pool unless Showman allows duplicates.
    pub(super) fn spawn_joker_of_rarity(&mut self, rarity: JokerRarity) {
        if !self.inventory.can_add_joker(false) {
            return;
        }
        let showman = self.has_active_joker(JokerKind::Showman);
        let pool: Vec<JokerKind> = JokerKind::ALL
            .iter()
            .copied()
            .filter(|k| k.rarity() == rarity)
            .filter(|k| showman || !self.inventory.jokers.iter().any(|j| j.kind == *k))
            .collect();
        if pool.is_empty() {
            return;
        }
        let kind = pool[self.rng.index(pool.len())];
        let price = self.joker_base_price(rarity);
        if self
            .inventory
            .add_joker(JokerInstance::new(kind, None, price))
            .is_ok()
        {
            self.events.push(Event::JokerTriggered {
                kind,
                note: "created".into(),
            });
        }
    }

    pub(super) fn joker_base_price(&self, rarity: JokerRarity) -> i64 {
        let prices = &self.config.shop.prices;
        match rarity {
            JokerRarity::Common => prices.joker_common,
            JokerRarity::Uncommon => prices.joker_uncommon,
            JokerRarity::Rare => prices.joker_rare,
            JokerRarity::Legendary => prices.joker_legendary,
        }
    }

    pub(super) fn spawn_random_tarot(&mut self) {
        if !self.inventory.can_add_consumable(false) {
            return;
        }
        let tarot = Tarot::ALL[self.rng.index(Tarot::ALL.len())];
        let _ = self.inventory.add_consumable(ConsumableInstance {
            consumable: Consumable::Tarot(tarot),
            negative: false,
        });
    }

    /// The Soul and Black Hole only come out of packs, so random spawns
    /// draw from the first sixteen spectrals.
    pub(super) fn spawn_random_spectral(&mut self) {
        if !self.inventory.can_add_consumable(false) {
            return;
        }
        let pool = &Spectral::ALL[..16];
        let spectral = pool[self.rng.index(pool.len())];
        let _ = self.inventory.add_consumable(ConsumableInstance {
            consumable: Consumable::Spectral(spectral),
            negative: false,
        });
    }
}

fn covers_all_suits(played: &[Card], scored: &[usize], debuffed: impl Fn(&Card) -> bool) -> bool {
    let mut seen = [false; 4];
    let mut wilds = 0;
    for &idx in scored {
        let card = &played[idx];
        if card.is_stone() || debuffed(card) {
            continue;
        }
        if card.is_wild() {
            wilds += 1;
            continue;
        }
        let bucket = match card.suit {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Clubs => 2,
            Suit::Diamonds => 3,
            Suit::Wild => continue,
        };
        seen[bucket] = true;
    }
    let missing = seen.iter().filter(|s| !**s).count();
    missing <= wilds
}

fn clubs_and_another(
    played: &[Card],
    scored: &[usize],
    smeared: bool,
    debuffed: impl Fn(&Card) -> bool,
) -> bool {
    let usable: Vec<&Card> = scored
        .iter()
        .map(|&i| &played[i])
        .filter(|c| !debuffed(c))
        .collect();
    for (a, club) in usable.iter().enumerate() {
        if !club.matches_suit(Suit::Clubs, false, smeared) {
            continue;
        }
        for (b, other) in usable.iter().enumerate() {
            if a == b {
                continue;
            }
            if [Suit::Spades, Suit::Hearts, Suit::Diamonds]
                .iter()
                .any(|&s| other.matches_suit(s, false, smeared))
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decks::{DeckKind, StakeKind};

    fn run_with(kinds: &[JokerKind]) -> Run {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 7);
        for &kind in kinds {
            run.inventory
                .add_joker(JokerInstance::new(kind, None, 4))
                .unwrap();
        }
        run
    }

    #[test]
    fn blueprint_copies_its_right_neighbor() {
        let run = run_with(&[JokerKind::Blueprint, JokerKind::Joker]);
        assert_eq!(run.resolve_ability_slot(0), Some(1));
        assert_eq!(run.resolve_ability_slot(1), Some(1));
    }

    #[test]
    fn brainstorm_copies_the_leftmost() {
        let run = run_with(&[JokerKind::Joker, JokerKind::Banner, JokerKind::Brainstorm]);
        assert_eq!(run.resolve_ability_slot(2), Some(0));
    }

    #[test]
    fn copier_loops_resolve_to_nothing() {
        let run = run_with(&[JokerKind::Blueprint, JokerKind::Brainstorm]);
        assert_eq!(run.resolve_ability_slot(0), None);
        assert_eq!(run.resolve_ability_slot(1), None);
    }

    #[test]
    fn copier_at_the_edge_resolves_to_nothing() {
        let run = run_with(&[JokerKind::Joker, JokerKind::Blueprint]);
        assert_eq!(run.resolve_ability_slot(1), None);
        let solo = run_with(&[JokerKind::Brainstorm]);
        assert_eq!(solo.resolve_ability_slot(0), None);
    }

    #[test]
    fn debuffed_jokers_resolve_to_nothing() {
        let mut run = run_with(&[JokerKind::Blueprint, JokerKind::Joker]);
        run.inventory.jokers[1].debuffed = true;
        assert_eq!(run.resolve_ability_slot(0), None);
        assert_eq!(run.resolve_ability_slot(1), None);
    }

    #[test]
    fn passive_jokers_toggle_eval_rules() {
        let run = run_with(&[JokerKind::FourFingers, JokerKind::Shortcut]);
        let rules = run.eval_rules();
        assert!(rules.four_fingers && rules.shortcut && !rules.smeared);
    }

    #[test]
    fn debuffed_counters_still_advance() {
        let mut run = run_with(&[JokerKind::GreenJoker]);
        run.inventory.jokers[0].debuffed = true;
        let cards = [Card::standard(Suit::Hearts, Rank::Five)];
        let eval = crate::hand::evaluate(&cards, &[false], EvalRules::default());
        run.fire_hand_played(&cards, &[0], &eval, HandKind::HighCard, true, false);
        assert_eq!(run.inventory.jokers[0].var("mult"), 1.0);
    }

    #[test]
    fn debuffed_abilities_contribute_nothing() {
        let mut run = run_with(&[JokerKind::Joker]);
        run.inventory.jokers[0].debuffed = true;
        let cards = [Card::standard(Suit::Hearts, Rank::Five)];
        let eval = crate::hand::evaluate(&cards, &[false], EvalRules::default());
        let mut score = Score::new(5, 1.0);
        run.fire_independent(
            &cards,
            &[0],
            &eval,
            HandKind::HighCard,
            false,
            false,
            &mut score,
        );
        assert_eq!(score.mult, 1.0);
    }

    #[test]
    fn ice_cream_melts_and_disappears() {
        let mut run = run_with(&[JokerKind::IceCream]);
        run.inventory.jokers[0].set_var("chips", 5.0);
        let cards = [Card::standard(Suit::Hearts, Rank::Five)];
        let eval = crate::hand::evaluate(&cards, &[false], EvalRules::default());
        let mut score = Score::new(0, 1.0);
        run.fire_independent(
            &cards,
            &[0],
            &eval,
            HandKind::HighCard,
            false,
            false,
            &mut score,
        );
        assert_eq!(score.chips, 5);
        assert!(run.inventory.jokers.is_empty());
    }

    #[test]
    fn eternal_jokers_survive_destruction() {
        let mut run = run_with(&[JokerKind::GrosMichel]);
        run.inventory.jokers[0].stickers.eternal = true;
        run.destroy_jokers(vec![0]);
        assert_eq!(run.inventory.jokers.len(), 1);
    }

    #[test]
    fn flower_pot_accepts_wild_fill_ins() {
        let mut cards = vec![
            Card::standard(Suit::Spades, Rank::Two),
            Card::standard(Suit::Hearts, Rank::Three),
            Card::standard(Suit::Clubs, Rank::Four),
            Card::standard(Suit::Clubs, Rank::Five),
        ];
        let scored = [0usize, 1, 2, 3];
        assert!(!covers_all_suits(&cards, &scored, |_| false));
        cards[3].enhancement = Some(Enhancement::Wild);
        assert!(covers_all_suits(&cards, &scored, |_| false));
    }

    #[test]
    fn mime_counts_stack_through_copies() {
        let run = run_with(&[JokerKind::Mime, JokerKind::Blueprint, JokerKind::Mime]);
        assert_eq!(run.held_retriggers(), 3);
    }
}
