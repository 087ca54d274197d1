use super::{Run, RunError};
use crate::cards::{Card, Enhancement, Rank, Seal};
use crate::consumables::{Consumable, Planet};
use crate::events::Event;
use crate::hand::{evaluate, HandKind};
use crate::jokers::JokerKind;
use crate::score::{Effect, Score, ScoreStep};
use crate::state::RunPhase;
use crate::vouchers::VoucherKind;

/// Removes `indices` from `hand`, validating range and uniqueness first.
/// Returned cards keep their original left-to-right order.
pub(super) fn take_cards(hand: &mut Vec<Card>, indices: &[usize]) -> Result<Vec<Card>, RunError> {
    if indices.is_empty() || indices.len() > 5 {
        return Err(RunError::InvalidSelection);
    }
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != indices.len() {
        return Err(RunError::InvalidSelection);
    }
    if sorted.last().copied().unwrap_or(0) >= hand.len() {
        return Err(RunError::InvalidSelection);
    }
    let mut taken = Vec::with_capacity(sorted.len());
    for &idx in sorted.iter().rev() {
        taken.push(hand.remove(idx));
    }
    taken.reverse();
    Ok(taken)
}

impl Run {
    pub(super) fn draw_to_hand_size(&mut self) {
        let target = self
            .round_state
            .as_ref()
            .map(|r| r.hand_size)
            .unwrap_or(self.config.hand_size);
        let need = target.saturating_sub(self.hand.len());
        self.draw_cards(need);
    }

    /// Redraw after a play or discard. Serpent overrides this draw with a
    /// fixed count; the opening deal still fills the whole hand.
    pub(super) fn redraw_after_action(&mut self) {
        let fixed = self
            .round_state
            .as_ref()
            .filter(|r| !r.boss_disabled)
            .and_then(|r| r.boss)
            .and_then(|b| b.fixed_draw());
        match fixed {
            Some(n) => self.draw_cards(n),
            None => self.draw_to_hand_size(),
        }
    }

    fn draw_cards(&mut self, mut need: usize) {
        while need > 0 {
            if self.deck.draw.is_empty() {
                self.deck.reshuffle_discard(&mut self.rng);
                if self.deck.draw.is_empty() {
                    return;
                }
            }
            let drawn = self.deck.draw_cards(need);
            if drawn.is_empty() {
                return;
            }
            need -= drawn.len();
            self.hand.extend(drawn);
        }
    }

    /// Whether a card currently contributes nothing: boss suit/face/replay
    /// debuffs, or a blanket Verdant Leaf.
    pub(super) fn card_debuffed(&self, card: &Card) -> bool {
        let Some(round) = self.round_state.as_ref() else {
            return false;
        };
        let Some(boss) = round.boss else {
            return false;
        };
        if round.boss_disabled {
            return false;
        }
        if boss.debuffs_all_until_joker_sold() {
            return true;
        }
        if let Some(suit) = boss.debuffed_suit() {
            if card.matches_suit(suit, false, false) {
                return true;
            }
        }
        if boss.debuffs_faces() && self.is_face_card(card) {
            return true;
        }
        boss.debuffs_replayed() && self.totals.played_ids_ante.contains(&card.id)
    }

    pub(super) fn is_face_card(&self, card: &Card) -> bool {
        card.is_face(self.has_active_joker(JokerKind::Pareidolia))
    }

    pub(super) fn score_effect(&mut self, source: &str, effect: Effect, score: &mut Score) {
        let before = *score;
        score.apply(effect);
        self.trace.push(ScoreStep {
            source: source.to_string(),
            effect,
            before,
            after: *score,
        });
    }

    /// Plays 1-5 cards from the hand and scores them. Returns the hand
    /// total added to the round score.
    pub fn play_hand(&mut self, indices: &[usize]) -> Result<i128, RunError> {
        if self.phase != RunPhase::PlayingBlind {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let round = self.round_state.as_ref().ok_or(RunError::NoHandsLeft)?;
        if round.hands_left == 0 {
            return Err(RunError::NoHandsLeft);
        }

        // Everything below `take_cards` is validated against the selection
        // while it is still in hand, so failures leave the run untouched.
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != indices.len()
            || sorted.is_empty()
            || sorted.len() > 5
            || sorted.last().copied().unwrap_or(0) >= self.hand.len()
        {
            return Err(RunError::InvalidSelection);
        }
        let boss = round.boss.filter(|_| !round.boss_disabled);
        if let Some(required) = boss.and_then(|b| b.required_play_count()) {
            if sorted.len() != required {
                return Err(RunError::HandNotAllowed);
            }
        }

        let selection: Vec<Card> = sorted.iter().map(|&i| self.hand[i]).collect();
        let debuffs: Vec<bool> = selection.iter().map(|c| self.card_debuffed(c)).collect();
        let rules = self.eval_rules();
        let eval = evaluate(&selection, &debuffs, rules);
        let best = eval.best();

        if let Some(b) = boss {
            if b.forbids_repeat_hand() && round.played_kinds.contains(&best) {
                return Err(RunError::HandNotAllowed);
            }
            if b.locks_first_hand() {
                if let Some(locked) = round.locked_kind {
                    if locked != best {
                        return Err(RunError::HandNotAllowed);
                    }
                }
            }
        }

        // Committed: remove the cards and run the pipeline.
        let most_played_before = self.most_played_hand();
        let mut played = take_cards(&mut self.hand, &sorted)?;
        let round = self.round_state.as_mut().expect("round in progress");
        round.played_kinds.push(best);
        if round.locked_kind.is_none() {
            round.locked_kind = Some(best);
        }
        if round.first_hand_kind.is_none() {
            round.first_hand_kind = Some(best);
        }
        let final_hand = round.is_final_hand();
        let first_hand = round.hands_left == round.hands_max;
        let already_played_this_round = round
            .played_kinds
            .iter()
            .filter(|k| **k == best)
            .count()
            > 1;
        self.hand_info_mut(best).played += 1;
        self.totals.hands_played += 1;
        if self.stage != crate::state::BlindStage::Boss {
            for card in &played {
                self.totals.played_ids_ante.insert(card.id);
            }
        }
        self.trace.clear();

        // Scored set: the best category's cards, plus stones, or everything
        // under Splash.
        let mut scored: Vec<usize> = eval.indices(best).map(|s| s.to_vec()).unwrap_or_default();
        for (idx, card) in played.iter().enumerate() {
            if card.is_stone() && !scored.contains(&idx) {
                scored.push(idx);
            }
        }
        if self.has_active_joker(JokerKind::Splash) {
            scored = (0..played.len()).collect();
        }
        scored.sort_unstable();

        self.fire_hand_played(&played, &scored, &eval, best, first_hand, final_hand);

        // Base chips/mult from the category level table.
        let value = self.config.hand_value(best);
        let mut level = self.hand_info(best).level as i64;
        if let Some(b) = boss {
            level = (level + b.level_delta() as i64).max(1);
        }
        let mut chips = value.chips + value.level_chips * (level - 1);
        let mut mult = value.mult + value.level_mult * (level - 1) as f64;
        if boss.map_or(false, |b| b.halves_base()) {
            chips = (chips / 2).max(0);
            mult /= 2.0;
        }
        let mut score = Score::new(0, 0.0);
        self.score_effect(best.name(), Effect::AddChips(chips), &mut score);
        self.score_effect(best.name(), Effect::AddMult(mult), &mut score);

        // Per scored card, in order: chips, enhancement, seal, edition,
        // then every joker's scored ability; red seals and joker
        // retriggers repeat the whole bundle.
        let mut photo_done = false;
        let mut destroyed: Vec<usize> = Vec::new();
        for (pos, &idx) in scored.iter().enumerate() {
            if self.card_debuffed(&played[idx]) {
                continue;
            }
            let mut triggers = 1u32;
            if played[idx].seal == Some(Seal::Red) {
                triggers += 1;
            }
            triggers += self.scored_retriggers(&played[idx], pos, final_hand);
            for _ in 0..triggers {
                self.trigger_scored_card(&mut played, idx, best, &mut score, &mut photo_done);
            }
        }

        // Held cards trigger next: steel and friends, with their own
        // retrigger sources.
        let held = self.hand.clone();
        let lowest_held = held
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.order_value().map(|v| (v, i)))
            .min()
            .map(|(_, i)| i);
        for (idx, card) in held.iter().enumerate() {
            if self.card_debuffed(card) {
                continue;
            }
            let mut triggers = 1u32;
            if card.seal == Some(Seal::Red) {
                triggers += 1;
            }
            triggers += self.held_retriggers();
            for _ in 0..triggers {
                self.trigger_held_card(card, lowest_held == Some(idx), &mut score);
            }
        }

        self.fire_independent(
            &played,
            &scored,
            &eval,
            best,
            final_hand,
            already_played_this_round,
            &mut score,
        );

        // Observatory: each held planet of the played hand's category is
        // worth x1.5 mult.
        if self.vouchers.contains(&VoucherKind::Observatory) {
            let wanted = Consumable::Planet(Planet::for_hand(best));
            let held_planets = self
                .inventory
                .consumables
                .iter()
                .filter(|c| c.consumable == wanted)
                .count();
            for _ in 0..held_planets {
                self.score_effect("observatory", Effect::TimesMult(1.5), &mut score);
            }
        }

        let total = score.hand_total(self.deck_kind.balanced_scoring());
        let round = self.round_state.as_mut().expect("round in progress");
        round.score += total;
        round.hands_left -= 1;
        self.events.push(Event::HandPlayed { kind: best, score: total });

        self.post_scoring_effects(&mut played, &scored, &eval, best, first_hand, &mut destroyed);

        // Boss side effects on every played hand.
        if let Some(b) = boss {
            let per_card = b.money_per_played_card();
            if per_card != 0 {
                self.add_money(per_card * played.len() as i64);
            }
            if b.zeroes_money_on_most_played() && best == most_played_before && self.money > 0 {
                let money = self.money;
                self.add_money(-money);
            }
            if b.debuffs_random_joker() {
                self.debuff_random_joker();
            }
        }

        // Destroyed cards leave the run; survivors go to the discard pile.
        destroyed.sort_unstable();
        destroyed.dedup();
        for (idx, card) in played.into_iter().enumerate() {
            if destroyed.binary_search(&idx).is_ok() {
                self.events.push(Event::CardDestroyed { card_id: card.id });
                self.fire_card_destroyed(&card);
            } else {
                self.deck.discard.push(card);
            }
        }

        if let Some(b) = boss {
            let n = b.discards_after_play();
            if n > 0 {
                self.discard_random_held(n);
            }
        }

        let round = self.round_state.as_ref().expect("round in progress");
        if round.cleared() {
            self.finish_round(false);
        } else if round.hands_left == 0 {
            let goal = round.goal;
            let score = round.score;
            if self.has_active_joker(JokerKind::MrBones) && score * 4 >= goal as i128 {
                if let Some(pos) = self
                    .inventory
                    .jokers
                    .iter()
                    .position(|j| j.kind == JokerKind::MrBones)
                {
                    let gone = self.inventory.jokers.remove(pos);
                    self.events.push(Event::JokerTriggered {
                        kind: gone.kind,
                        note: "prevented death".into(),
                    });
                }
                self.finish_round(true);
            } else {
                self.phase = RunPhase::GameOver;
                self.events.push(Event::GameOver { won: false });
            }
        } else {
            self.redraw_after_action();
        }
        Ok(total)
    }

    /// One full trigger of a scored card: its chips, enhancement, seal and
    /// edition, then every joker's card-scored hook.
    fn trigger_scored_card(
        &mut self,
        played: &mut [Card],
        idx: usize,
        best: HandKind,
        score: &mut Score,
        photo_done: &mut bool,
    ) {
        let card = played[idx];
        let chips = if card.is_stone() {
            0
        } else {
            self.config.rank_chip_value(card.rank)
        } + card.bonus_chips;
        if chips != 0 {
            self.score_effect("card", Effect::AddChips(chips), score);
        }
        match card.enhancement {
            Some(Enhancement::Bonus) => self.score_effect("bonus", Effect::AddChips(30), score),
            Some(Enhancement::Mult) => self.score_effect("mult card", Effect::AddMult(4.0), score),
            Some(Enhancement::Glass) => {
                self.score_effect("glass", Effect::TimesMult(2.0), score)
            }
            Some(Enhancement::Stone) => self.score_effect("stone", Effect::AddChips(50), score),
            Some(Enhancement::Lucky) => {
                let mut triggered = false;
                if self.roll_chance(5) {
                    self.score_effect("lucky", Effect::AddMult(20.0), score);
                    triggered = true;
                }
                if self.roll_chance(15) {
                    self.add_money(20);
                    triggered = true;
                }
                if triggered {
                    self.fire_lucky_triggered();
                }
            }
            _ => {}
        }
        if card.seal == Some(Seal::Gold) {
            self.add_money(3);
        }
        match card.edition {
            Some(crate::cards::Edition::Foil) => {
                self.score_effect("foil", Effect::AddChips(50), score)
            }
            Some(crate::cards::Edition::Holographic) => {
                self.score_effect("holographic", Effect::AddMult(10.0), score)
            }
            Some(crate::cards::Edition::Polychrome) => {
                self.score_effect("polychrome", Effect::TimesMult(1.5), score)
            }
            _ => {}
        }
        self.fire_card_scored(played, idx, best, score, photo_done);
    }

    fn trigger_held_card(&mut self, card: &Card, is_lowest: bool, score: &mut Score) {
        if card.enhancement == Some(Enhancement::Steel) {
            self.score_effect("steel", Effect::TimesMult(1.5), score);
        }
        self.fire_card_held(card, is_lowest, score);
    }

    /// Hand-complete effects that create or destroy things rather than
    /// score: glass breakage, Sixth Sense, Seance, Superposition, DNA.
    fn post_scoring_effects(
        &mut self,
        played: &mut [Card],
        scored: &[usize],
        eval: &crate::hand::HandEval,
        best: HandKind,
        first_hand: bool,
        destroyed: &mut Vec<usize>,
    ) {
        for &idx in scored {
            if played[idx].enhancement == Some(Enhancement::Glass)
                && !self.card_debuffed(&played[idx])
                && self.roll_chance(4)
            {
                destroyed.push(idx);
            }
        }
        if self.has_active_joker(JokerKind::SixthSense)
            && played.len() == 1
            && played[0].rank == Rank::Six
            && !played[0].is_stone()
            && destroyed.is_empty()
        {
            destroyed.push(0);
            self.spawn_random_spectral();
        }
        if self.has_active_joker(JokerKind::Seance) && eval.contains(HandKind::StraightFlush) {
            self.spawn_random_spectral();
        }
        if self.has_active_joker(JokerKind::Superposition)
            && eval.contains(HandKind::Straight)
            && played.iter().any(|c| !c.is_stone() && c.rank == Rank::Ace)
        {
            self.spawn_random_tarot();
        }
        if self.has_active_joker(JokerKind::Vagabond) && self.money <= 4 {
            self.spawn_random_tarot();
        }
        if first_hand && played.len() == 1 && self.has_active_joker(JokerKind::Dna) {
            let mut copy = played[0];
            copy.id = self.next_card_id();
            self.events.push(Event::CardAdded { card_id: copy.id });
            self.totals.cards_added += 1;
            self.fire_card_added();
            self.hand.push(copy);
        }
        if self.has_active_joker(JokerKind::SpaceJoker) && self.roll_chance(4) {
            self.level_up_hand(best, 1);
        }
    }

    fn discard_random_held(&mut self, count: usize) {
        for _ in 0..count {
            if self.hand.is_empty() {
                break;
            }
            let idx = self.rng.index(self.hand.len());
            let card = self.hand.remove(idx);
            self.deck.discard.push(card);
        }
    }

    /// Discards 1-5 cards and redraws. Consumes one discard.
    pub fn discard(&mut self, indices: &[usize]) -> Result<(), RunError> {
        if self.phase != RunPhase::PlayingBlind {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let round = self.round_state.as_ref().ok_or(RunError::NoDiscardsLeft)?;
        if round.discards_left == 0 {
            return Err(RunError::NoDiscardsLeft);
        }
        let first_discard = round.discards_left == round.discards_max;
        let discarded = take_cards(&mut self.hand, indices)?;
        let count = discarded.len();
        let jacks = discarded
            .iter()
            .filter(|c| !c.is_stone() && c.rank == Rank::Jack)
            .count() as u32;

        let mut destroyed_all = false;
        // Trading Card eats a lone first discard for $3.
        if first_discard && count == 1 && self.has_active_joker(JokerKind::TradingCard) {
            destroyed_all = true;
            self.add_money(3);
            self.events.push(Event::CardDestroyed {
                card_id: discarded[0].id,
            });
        }
        for card in &discarded {
            if card.seal == Some(Seal::Purple) {
                self.spawn_random_tarot();
            }
        }
        self.fire_discard(&discarded, first_discard);

        if destroyed_all {
            for card in &discarded {
                self.fire_card_destroyed(card);
            }
        } else {
            self.deck.discard_cards(discarded);
        }
        let round = self.round_state.as_mut().expect("round in progress");
        round.discards_left -= 1;
        round.jacks_discarded += jacks;
        self.events.push(Event::HandDiscarded { count });
        self.redraw_after_action();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bosses::BossKind;
    use crate::decks::{DeckKind, StakeKind};

    fn serpent_run(seed: u64) -> Run {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, seed);
        run.select_blind().unwrap();
        run.round_state.as_mut().unwrap().boss = Some(BossKind::Serpent);
        run
    }

    #[test]
    fn serpent_still_deals_a_full_hand() {
        let mut run = serpent_run(70);
        let hand_size = run.round_state.as_ref().unwrap().hand_size;
        let held = std::mem::take(&mut run.hand);
        run.deck.discard_cards(held);
        run.draw_to_hand_size();
        assert_eq!(run.hand.len(), hand_size);
    }

    #[test]
    fn serpent_fixes_the_redraw_at_three() {
        let mut run = serpent_run(71);
        let before = run.hand.len();
        run.discard(&[0, 1]).unwrap();
        assert_eq!(run.hand.len(), before + 1);
    }

    #[test]
    fn a_disabled_serpent_refills_to_hand_size() {
        let mut run = serpent_run(72);
        run.round_state.as_mut().unwrap().boss_disabled = true;
        let before = run.hand.len();
        run.discard(&[0, 1]).unwrap();
        assert_eq!(run.hand.len(), before);
    }
}
