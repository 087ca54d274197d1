use super::{Run, RunError};
use crate::cards::{Card, Edition, Enhancement, Rank, Seal, Suit};
use crate::consumables::{Consumable, Planet, Spectral, Tarot};
use crate::events::Event;
use crate::hand::HandKind;
use crate::inventory::ConsumableInstance;
use crate::jokers::JokerRarity;
use crate::state::RunPhase;

impl Run {
    /// Uses an owned consumable. `targets` are indices into the current
    /// hand; untargeted cards ignore them, targeted cards demand a count
    /// inside their declared bounds and a blind in progress.
    pub fn use_consumable(&mut self, index: usize, targets: &[usize]) -> Result<(), RunError> {
        if self.phase == RunPhase::GameOver {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let instance = *self
            .inventory
            .consumables
            .get(index)
            .ok_or(RunError::InvalidIndex)?;
        let consumable = instance.consumable;
        match consumable.targets() {
            Some((min, max)) => {
                if self.phase != RunPhase::PlayingBlind {
                    return Err(RunError::InvalidPhase(self.phase));
                }
                if targets.len() < min || targets.len() > max {
                    return Err(RunError::InvalidSelection);
                }
                let mut seen = targets.to_vec();
                seen.sort_unstable();
                seen.dedup();
                if seen.len() != targets.len()
                    || targets.iter().any(|&t| t >= self.hand.len())
                {
                    return Err(RunError::InvalidSelection);
                }
            }
            None => {
                if !targets.is_empty() {
                    return Err(RunError::InvalidSelection);
                }
            }
        }

        self.inventory.consumables.remove(index);
        let result = match consumable {
            Consumable::Tarot(tarot) => self.apply_tarot(tarot, targets),
            Consumable::Planet(planet) => self.apply_planet(planet),
            Consumable::Spectral(spectral) => self.apply_spectral(spectral, targets),
        };
        match result {
            Ok(()) => {
                self.events.push(Event::ConsumableUsed {
                    label: consumable.name().to_string(),
                });
                match consumable {
                    Consumable::Tarot(tarot) => {
                        self.totals.tarots_used += 1;
                        if tarot != Tarot::Fool {
                            self.last_consumable = Some(consumable);
                        }
                    }
                    Consumable::Planet(_) => {
                        self.last_consumable = Some(consumable);
                    }
                    Consumable::Spectral(_) => {}
                }
                Ok(())
            }
            Err(err) => {
                // Validation failed before any effect ran; put it back.
                self.inventory.consumables.insert(index, instance);
                Err(err)
            }
        }
    }

    /// Applies an untargeted consumable straight from a pack pick. Targeted
    /// cards never reach here.
    pub(super) fn apply_untargeted_consumable(
        &mut self,
        consumable: Consumable,
    ) -> Result<(), RunError> {
        let result = match consumable {
            Consumable::Tarot(tarot) => self.apply_tarot(tarot, &[]),
            Consumable::Planet(planet) => self.apply_planet(planet),
            Consumable::Spectral(spectral) => self.apply_spectral(spectral, &[]),
        };
        if result.is_ok() {
            self.events.push(Event::ConsumableUsed {
                label: consumable.name().to_string(),
            });
            match consumable {
                Consumable::Tarot(tarot) => {
                    self.totals.tarots_used += 1;
                    if tarot != Tarot::Fool {
                        self.last_consumable = Some(consumable);
                    }
                }
                Consumable::Planet(_) => self.last_consumable = Some(consumable),
                Consumable::Spectral(_) => {}
            }
        }
        result
    }

    fn apply_planet(&mut self, planet: Planet) -> Result<(), RunError> {
        self.level_up_hand(planet.hand(), 1);
        self.totals.planets_used += 1;
        self.totals.planet_kinds_used.insert(planet as u8);
        self.fire_planet_used();
        Ok(())
    }

    fn apply_tarot(&mut self, tarot: Tarot, targets: &[usize]) -> Result<(), RunError> {
        match tarot {
            Tarot::Fool => {
                let last = self.last_consumable.ok_or(RunError::InvalidSelection)?;
                if !self.inventory.can_add_consumable(false) {
                    return Err(RunError::Inventory(
                        crate::inventory::InventoryError::ConsumablesFull,
                    ));
                }
                let _ = self.inventory.add_consumable(ConsumableInstance {
                    consumable: last,
                    negative: false,
                });
            }
            Tarot::Magician => self.enhance_targets(targets, Enhancement::Lucky),
            Tarot::HighPriestess => {
                for _ in 0..2 {
                    if !self.inventory.can_add_consumable(false) {
                        break;
                    }
                    let planet = Planet::ALL[self.rng.index(Planet::ALL.len())];
                    let _ = self.inventory.add_consumable(ConsumableInstance {
                        consumable: Consumable::Planet(planet),
                        negative: false,
                    });
                }
            }
            Tarot::Empress => self.enhance_targets(targets, Enhancement::Mult),
            Tarot::Emperor => {
                for _ in 0..2 {
                    self.spawn_random_tarot();
                }
            }
            Tarot::Hierophant => self.enhance_targets(targets, Enhancement::Bonus),
            Tarot::Lovers => self.enhance_targets(targets, Enhancement::Wild),
            Tarot::Chariot => self.enhance_targets(targets, Enhancement::Steel),
            Tarot::Justice => self.enhance_targets(targets, Enhancement::Glass),
            Tarot::Hermit => {
                let gain = self.money.clamp(0, 20);
                self.add_money(gain);
            }
            Tarot::WheelOfFortune => {
                let eligible: Vec<usize> = self
                    .inventory
                    .jokers
                    .iter()
                    .enumerate()
                    .filter(|(_, j)| j.edition.is_none())
                    .map(|(i, _)| i)
                    .collect();
                if !eligible.is_empty() && self.roll_chance(4) {
                    let slot = eligible[self.rng.index(eligible.len())];
                    const POOL: [Edition; 3] =
                        [Edition::Foil, Edition::Holographic, Edition::Polychrome];
                    let edition = POOL[self.rng.index(POOL.len())];
                    self.inventory.jokers[slot].edition = Some(edition);
                    let kind = self.inventory.jokers[slot].kind;
                    self.events.push(Event::JokerTriggered {
                        kind,
                        note: "upgraded".into(),
                    });
                }
            }
            Tarot::Strength => {
                for &idx in targets {
                    let card = &mut self.hand[idx];
                    if !card.is_stone() {
                        card.rank = card.rank.next_up();
                    }
                }
            }
            Tarot::HangedMan => {
                self.destroy_hand_cards(targets);
            }
            Tarot::Death => {
                // First selected card becomes a copy of the second; its
                // identity stays its own.
                let source = self.hand[targets[1]];
                let dest = &mut self.hand[targets[0]];
                let id = dest.id;
                *dest = source;
                dest.id = id;
            }
            Tarot::Temperance => {
                let sell_min = self.config.economy.sell_min;
                let total: i64 = self
                    .inventory
                    .jokers
                    .iter()
                    .map(|j| j.sell_value(sell_min))
                    .sum();
                self.add_money(total.min(50));
            }
            Tarot::Devil => self.enhance_targets(targets, Enhancement::Gold),
            Tarot::Tower => self.enhance_targets(targets, Enhancement::Stone),
            Tarot::Star => self.resuit_targets(targets, Suit::Diamonds),
            Tarot::Moon => self.resuit_targets(targets, Suit::Clubs),
            Tarot::Sun => self.resuit_targets(targets, Suit::Hearts),
            Tarot::World => self.resuit_targets(targets, Suit::Spades),
            Tarot::Judgement => {
                let rarity = self.roll_spawn_rarity();
                self.spawn_joker_of_rarity(rarity);
            }
        }
        Ok(())
    }

    fn apply_spectral(&mut self, spectral: Spectral, targets: &[usize]) -> Result<(), RunError> {
        match spectral {
            Spectral::Familiar => {
                self.require_hand()?;
                self.destroy_random_hand_cards(1);
                const FACES: [Rank; 3] = [Rank::Jack, Rank::Queen, Rank::King];
                for _ in 0..3 {
                    let rank = FACES[self.rng.index(FACES.len())];
                    let card = self.random_enhanced_card(rank);
                    self.add_card_to_hand(card);
                }
            }
            Spectral::Grim => {
                self.require_hand()?;
                self.destroy_random_hand_cards(1);
                for _ in 0..2 {
                    let card = self.random_enhanced_card(Rank::Ace);
                    self.add_card_to_hand(card);
                }
            }
            Spectral::Incantation => {
                self.require_hand()?;
                self.destroy_random_hand_cards(1);
                const NUMBERS: [Rank; 9] = [
                    Rank::Two,
                    Rank::Three,
                    Rank::Four,
                    Rank::Five,
                    Rank::Six,
                    Rank::Seven,
                    Rank::Eight,
                    Rank::Nine,
                    Rank::Ten,
                ];
                for _ in 0..4 {
                    let rank = NUMBERS[self.rng.index(NUMBERS.len())];
                    let card = self.random_enhanced_card(rank);
                    self.add_card_to_hand(card);
                }
            }
            Spectral::Talisman => self.seal_targets(targets, Seal::Gold),
            Spectral::Aura => {
                const POOL: [Edition; 3] =
                    [Edition::Foil, Edition::Holographic, Edition::Polychrome];
                let edition = POOL[self.rng.index(POOL.len())];
                for &idx in targets {
                    self.hand[idx].edition = Some(edition);
                }
            }
            Spectral::Wraith => {
                self.spawn_joker_of_rarity(JokerRarity::Rare);
                let money = self.money;
                if money > 0 {
                    self.add_money(-money);
                }
            }
            Spectral::Sigil => {
                self.require_hand()?;
                let suit = Suit::STANDARD[self.rng.index(4)];
                for card in &mut self.hand {
                    if !card.is_stone() {
                        card.suit = suit;
                    }
                }
            }
            Spectral::Ouija => {
                self.require_hand()?;
                let rank = Rank::ALL[self.rng.index(13)];
                for card in &mut self.hand {
                    if !card.is_stone() {
                        card.rank = rank;
                    }
                }
                self.shrink_hand_size();
            }
            Spectral::Ectoplasm => {
                if self.inventory.jokers.is_empty() {
                    return Err(RunError::InvalidSelection);
                }
                let slot = self.rng.index(self.inventory.jokers.len());
                self.inventory.jokers[slot].edition = Some(Edition::Negative);
                self.shrink_hand_size();
            }
            Spectral::Immolate => {
                self.require_hand()?;
                self.destroy_random_hand_cards(5);
                self.add_money(20);
            }
            Spectral::Ankh => {
                if self.inventory.jokers.is_empty() {
                    return Err(RunError::InvalidSelection);
                }
                let keep = self.rng.index(self.inventory.jokers.len());
                let mut copy = self.inventory.jokers[keep].clone();
                if copy.edition == Some(Edition::Negative) {
                    copy.edition = None;
                }
                let others: Vec<usize> = (0..self.inventory.jokers.len())
                    .filter(|&i| i != keep)
                    .collect();
                self.destroy_jokers(others);
                let _ = self.inventory.add_joker(copy);
            }
            Spectral::DejaVu => self.seal_targets(targets, Seal::Red),
            Spectral::Hex => {
                if self.inventory.jokers.is_empty() {
                    return Err(RunError::InvalidSelection);
                }
                let keep = self.rng.index(self.inventory.jokers.len());
                self.inventory.jokers[keep].edition = Some(Edition::Polychrome);
                let others: Vec<usize> = (0..self.inventory.jokers.len())
                    .filter(|&i| i != keep)
                    .collect();
                self.destroy_jokers(others);
            }
            Spectral::Trance => self.seal_targets(targets, Seal::Blue),
            Spectral::Medium => self.seal_targets(targets, Seal::Purple),
            Spectral::Cryptid => {
                let source = self.hand[targets[0]];
                for _ in 0..2 {
                    let mut copy = source;
                    copy.id = self.next_card_id();
                    self.add_card_to_hand(copy);
                }
            }
            Spectral::Soul => {
                self.spawn_joker_of_rarity(JokerRarity::Legendary);
            }
            Spectral::BlackHole => {
                for kind in HandKind::ALL {
                    self.level_up_hand(kind, 1);
                }
            }
        }
        Ok(())
    }

    fn require_hand(&self) -> Result<(), RunError> {
        if self.phase != RunPhase::PlayingBlind || self.hand.is_empty() {
            return Err(RunError::Unimplemented(
                "hand-affecting spectrals outside a blind",
            ));
        }
        Ok(())
    }

    fn enhance_targets(&mut self, targets: &[usize], enhancement: Enhancement) {
        for &idx in targets {
            self.hand[idx].enhancement = Some(enhancement);
        }
    }

    fn resuit_targets(&mut self, targets: &[usize], suit: Suit) {
        for &idx in targets {
            if !self.hand[idx].is_stone() {
                self.hand[idx].suit = suit;
            }
        }
    }

    fn seal_targets(&mut self, targets: &[usize], seal: Seal) {
        for &idx in targets {
            self.hand[idx].seal = Some(seal);
        }
    }

    fn destroy_hand_cards(&mut self, targets: &[usize]) {
        let mut sorted = targets.to_vec();
        sorted.sort_unstable();
        for &idx in sorted.iter().rev() {
            let card = self.hand.remove(idx);
            self.events.push(Event::CardDestroyed { card_id: card.id });
            self.fire_card_destroyed(&card);
        }
    }

    fn destroy_random_hand_cards(&mut self, count: usize) {
        for _ in 0..count {
            if self.hand.is_empty() {
                break;
            }
            let idx = self.rng.index(self.hand.len());
            let card = self.hand.remove(idx);
            self.events.push(Event::CardDestroyed { card_id: card.id });
            self.fire_card_destroyed(&card);
        }
    }

    fn random_enhanced_card(&mut self, rank: Rank) -> Card {
        const POOL: [Enhancement; 7] = [
            Enhancement::Bonus,
            Enhancement::Mult,
            Enhancement::Wild,
            Enhancement::Glass,
            Enhancement::Steel,
            Enhancement::Lucky,
            Enhancement::Gold,
        ];
        let suit = Suit::STANDARD[self.rng.index(4)];
        let mut card = Card::standard(suit, rank);
        card.enhancement = Some(POOL[self.rng.index(POOL.len())]);
        card
    }

    fn add_card_to_hand(&mut self, mut card: Card) {
        if card.id == 0 {
            card.id = self.next_card_id();
        }
        self.events.push(Event::CardAdded { card_id: card.id });
        self.hand.push(card);
        self.totals.cards_added += 1;
        self.fire_card_added();
    }

    /// Permanent hand-size loss, applied to the running round too.
    fn shrink_hand_size(&mut self) {
        self.config.hand_size = self.config.hand_size.saturating_sub(1).max(1);
        if let Some(round) = self.round_state.as_mut() {
            round.hand_size = round.hand_size.saturating_sub(1).max(1);
        }
    }

    fn roll_spawn_rarity(&mut self) -> JokerRarity {
        let weights: Vec<(JokerRarity, u32)> = self
            .config
            .shop
            .rarity_weights
            .iter()
            .map(|w| (w.rarity, w.weight))
            .collect();
        crate::shop::pick_weighted(&weights, &mut self.rng).unwrap_or(JokerRarity::Common)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decks::{DeckKind, StakeKind};
    use crate::inventory::JokerInstance;
    use crate::jokers::JokerKind;

    fn run_with(consumable: Consumable) -> Run {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 21);
        run.inventory
            .add_consumable(ConsumableInstance {
                consumable,
                negative: false,
            })
            .unwrap();
        run
    }

    fn in_blind(run: &mut Run) {
        run.phase = RunPhase::PlayingBlind;
        run.hand = vec![
            Card::standard(Suit::Spades, Rank::Ace),
            Card::standard(Suit::Hearts, Rank::Five),
            Card::standard(Suit::Clubs, Rank::King),
        ];
        for (i, card) in run.hand.iter_mut().enumerate() {
            card.id = 900 + i as u32;
        }
    }

    #[test]
    fn planets_level_their_hand() {
        let mut run = run_with(Consumable::Planet(Planet::Mercury));
        run.use_consumable(0, &[]).unwrap();
        assert_eq!(run.hand_info(HandKind::Pair).level, 2);
        assert_eq!(run.totals.planets_used, 1);
        assert!(run.inventory.consumables.is_empty());
    }

    #[test]
    fn hermit_doubles_money_up_to_twenty() {
        let mut run = run_with(Consumable::Tarot(Tarot::Hermit));
        run.money = 13;
        run.use_consumable(0, &[]).unwrap();
        assert_eq!(run.money, 26);
        let mut rich = run_with(Consumable::Tarot(Tarot::Hermit));
        rich.money = 50;
        rich.use_consumable(0, &[]).unwrap();
        assert_eq!(rich.money, 70);
    }

    #[test]
    fn fool_copies_the_last_used_card() {
        let mut run = run_with(Consumable::Planet(Planet::Pluto));
        run.inventory
            .add_consumable(ConsumableInstance {
                consumable: Consumable::Tarot(Tarot::Fool),
                negative: false,
            })
            .unwrap();
        run.use_consumable(0, &[]).unwrap();
        run.use_consumable(0, &[]).unwrap();
        assert_eq!(
            run.inventory.consumables[0].consumable,
            Consumable::Planet(Planet::Pluto)
        );
    }

    #[test]
    fn fool_with_no_history_is_rejected() {
        let mut run = run_with(Consumable::Tarot(Tarot::Fool));
        assert_eq!(
            run.use_consumable(0, &[]),
            Err(RunError::InvalidSelection)
        );
        assert_eq!(run.inventory.consumables.len(), 1);
    }

    #[test]
    fn targeted_cards_need_a_blind() {
        let mut run = run_with(Consumable::Tarot(Tarot::Devil));
        assert_eq!(
            run.use_consumable(0, &[0]),
            Err(RunError::InvalidPhase(RunPhase::SelectingBlind))
        );
    }

    #[test]
    fn devil_gilds_the_target() {
        let mut run = run_with(Consumable::Tarot(Tarot::Devil));
        in_blind(&mut run);
        run.use_consumable(0, &[1]).unwrap();
        assert_eq!(run.hand[1].enhancement, Some(Enhancement::Gold));
        assert_eq!(run.hand[0].enhancement, None);
    }

    #[test]
    fn hanged_man_destroys_selections() {
        let mut run = run_with(Consumable::Tarot(Tarot::HangedMan));
        in_blind(&mut run);
        run.use_consumable(0, &[0, 2]).unwrap();
        assert_eq!(run.hand.len(), 1);
        assert_eq!(run.hand[0].rank, Rank::Five);
    }

    #[test]
    fn death_copies_right_onto_left() {
        let mut run = run_with(Consumable::Tarot(Tarot::Death));
        in_blind(&mut run);
        let left_id = run.hand[0].id;
        run.use_consumable(0, &[0, 2]).unwrap();
        assert_eq!(run.hand[0].rank, Rank::King);
        assert_eq!(run.hand[0].suit, Suit::Clubs);
        assert_eq!(run.hand[0].id, left_id);
    }

    #[test]
    fn strength_raises_ranks_with_wraparound() {
        let mut run = run_with(Consumable::Tarot(Tarot::Strength));
        in_blind(&mut run);
        run.use_consumable(0, &[0, 2]).unwrap();
        assert_eq!(run.hand[0].rank, Rank::Two);
        assert_eq!(run.hand[2].rank, Rank::Ace);
    }

    #[test]
    fn black_hole_levels_every_hand() {
        let mut run = run_with(Consumable::Spectral(Spectral::BlackHole));
        run.use_consumable(0, &[]).unwrap();
        for kind in HandKind::ALL {
            assert_eq!(run.hand_info(kind).level, 2);
        }
    }

    #[test]
    fn ectoplasm_goes_negative_and_shrinks_the_hand() {
        let mut run = run_with(Consumable::Spectral(Spectral::Ectoplasm));
        run.inventory
            .add_joker(JokerInstance::new(JokerKind::Joker, None, 4))
            .unwrap();
        let before = run.config.hand_size;
        run.use_consumable(0, &[]).unwrap();
        assert_eq!(run.inventory.jokers[0].edition, Some(Edition::Negative));
        assert_eq!(run.config.hand_size, before - 1);
    }

    #[test]
    fn immolate_burns_five_for_twenty() {
        let mut run = run_with(Consumable::Spectral(Spectral::Immolate));
        in_blind(&mut run);
        let before = run.money;
        run.use_consumable(0, &[]).unwrap();
        assert!(run.hand.is_empty());
        assert_eq!(run.money, before + 20);
    }

    #[test]
    fn cryptid_duplicates_the_target_twice() {
        let mut run = run_with(Consumable::Spectral(Spectral::Cryptid));
        in_blind(&mut run);
        run.use_consumable(0, &[1]).unwrap();
        assert_eq!(run.hand.len(), 5);
        assert_eq!(run.hand[3].rank, Rank::Five);
        assert_eq!(run.hand[4].rank, Rank::Five);
        assert_ne!(run.hand[3].id, run.hand[1].id);
    }

    #[test]
    fn temperance_pays_joker_value_capped() {
        let mut run = run_with(Consumable::Tarot(Tarot::Temperance));
        run.inventory
            .add_joker(JokerInstance::new(JokerKind::Joker, None, 6))
            .unwrap();
        let before = run.money;
        run.use_consumable(0, &[]).unwrap();
        assert_eq!(run.money, before + 3);
    }

    #[test]
    fn hex_leaves_one_polychrome_joker() {
        let mut run = run_with(Consumable::Spectral(Spectral::Hex));
        run.inventory
            .add_joker(JokerInstance::new(JokerKind::Joker, None, 4))
            .unwrap();
        run.inventory
            .add_joker(JokerInstance::new(JokerKind::Banner, None, 4))
            .unwrap();
        run.use_consumable(0, &[]).unwrap();
        assert_eq!(run.inventory.jokers.len(), 1);
        assert_eq!(
            run.inventory.jokers[0].edition,
            Some(Edition::Polychrome)
        );
    }
}
