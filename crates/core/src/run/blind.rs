use super::{Run, RunError};
use crate::bosses::BossKind;
use crate::cards::Enhancement;
use crate::consumables::Planet;
use crate::events::Event;
use crate::jokers::JokerKind;
use crate::state::{BlindStage, RoundState, RunPhase};
use crate::tags::TagKind;
use crate::vouchers;

impl Run {
    /// Enters the upcoming blind: computes the goal, rebuilds and deals
    /// the deck, and fires blind-selected hooks.
    pub fn select_blind(&mut self) -> Result<(), RunError> {
        if self.phase != RunPhase::SelectingBlind {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let stage = self.stage;
        let boss = if stage == BlindStage::Boss {
            let boss = self.ensure_next_boss();
            self.next_boss = None;
            Some(boss)
        } else {
            None
        };
        let boss_disabled = self.has_active_joker(JokerKind::Chicot);

        let goal = self.goal_for(self.ante, stage, boss, boss_disabled);
        let active_boss = boss.filter(|_| !boss_disabled);

        let mut hands = self.config.hands;
        let mut discards = self.config.discards;
        let mut hand_size = self.config.hand_size as i64 + self.joker_hand_size_delta();
        hands = (hands as i64 + self.joker_hands_delta()).max(1) as u8;
        discards = (discards as i64 + self.joker_discards_delta()).max(0) as u8;
        if let Some(boss) = active_boss {
            if let Some(forced) = boss.hands_override() {
                hands = forced;
            }
            if let Some(forced) = boss.discards_override() {
                discards = forced;
            }
            hand_size += boss.hand_size_delta() as i64;
        }
        // Juggle tags cash in as hand size for this one round.
        while let Some(pos) = self.tags.iter().position(|t| *t == TagKind::Juggle) {
            self.tags.remove(pos);
            hand_size += 3;
            self.events.push(Event::TagResolved {
                tag: TagKind::Juggle,
            });
        }
        let hand_size = hand_size.max(1) as usize;

        self.round_state = Some(RoundState {
            stage,
            goal,
            score: 0,
            hands_left: hands,
            discards_left: discards,
            hands_max: hands,
            discards_max: discards,
            hand_size,
            boss: active_boss,
            played_kinds: Vec::new(),
            locked_kind: None,
            jacks_discarded: 0,
            first_hand_kind: None,
            boss_disabled,
        });
        self.phase = RunPhase::PlayingBlind;
        self.trace.clear();

        // Fresh shuffle of everything not destroyed, then the opening deal.
        let mut discard = std::mem::take(&mut self.deck.discard);
        self.deck.draw.append(&mut discard);
        self.deck.shuffle(&mut self.rng);
        self.draw_to_hand_size();

        self.fire_blind_selected();
        if active_boss.map_or(false, |b| b.debuffs_random_joker()) {
            self.debuff_random_joker();
        }

        self.events.push(Event::BlindSelected { stage, goal });
        Ok(())
    }

    /// Skips a Small or Big blind for a random tag instead of playing it.
    pub fn skip_blind(&mut self) -> Result<(), RunError> {
        if self.phase != RunPhase::SelectingBlind {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let stage = self.stage;
        if !self.config.stage_rule(stage).can_skip {
            return Err(RunError::CannotSkipBoss);
        }
        self.totals.blinds_skipped += 1;
        let tag = TagKind::ALL[self.rng.index(TagKind::ALL.len())];
        self.events.push(Event::BlindSkipped { stage, tag });
        self.gain_tag(tag);
        self.stage = stage.next();
        Ok(())
    }

    pub(super) fn gain_tag(&mut self, tag: TagKind) {
        self.events.push(Event::TagGained { tag });
        if tag == TagKind::Double {
            self.double_tags_pending += 1;
            return;
        }
        let copies = 1 + std::mem::take(&mut self.double_tags_pending);
        for _ in 0..copies {
            self.resolve_or_queue_tag(tag);
        }
    }

    /// Tags with an immediate payout resolve on the spot; the rest queue
    /// FIFO for their trigger site (next shop, next boss pick, ...).
    fn resolve_or_queue_tag(&mut self, tag: TagKind) {
        if let Some(pack) = tag.free_pack() {
            self.open_tag_pack(pack);
            self.events.push(Event::TagResolved { tag });
            return;
        }
        match tag {
            TagKind::Speed => {
                self.add_money(5 * self.totals.blinds_skipped as i64);
            }
            TagKind::Handy => {
                self.add_money(self.totals.hands_played as i64);
            }
            TagKind::Garbage => {
                self.add_money(self.totals.unused_discards as i64);
            }
            TagKind::Economy => {
                let bonus = self.money.clamp(0, 40);
                self.add_money(bonus);
            }
            TagKind::Orbital => {
                let kind = crate::hand::HandKind::ALL[self.rng.index(12)];
                self.level_up_hand(kind, 3);
            }
            TagKind::TopUp => {
                for _ in 0..2 {
                    self.spawn_joker_of_rarity(crate::jokers::JokerRarity::Common);
                }
            }
            other => {
                self.tags.push(other);
                return;
            }
        }
        self.events.push(Event::TagResolved { tag });
    }

    pub(super) fn take_queued_tag(&mut self, tag: TagKind) -> bool {
        if let Some(pos) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(pos);
            self.events.push(Event::TagResolved { tag });
            true
        } else {
            false
        }
    }

    /// The boss waiting at the end of this ante, once the Boss stage is
    /// reached. Drawn lazily so it can be previewed and rerolled before
    /// `select_blind` commits to it.
    pub fn upcoming_boss(&mut self) -> Option<BossKind> {
        if self.phase != RunPhase::SelectingBlind || self.stage != BlindStage::Boss {
            return None;
        }
        Some(self.ensure_next_boss())
    }

    fn ensure_next_boss(&mut self) -> BossKind {
        if let Some(boss) = self.next_boss {
            return boss;
        }
        // A queued Boss tag burns one pick and rerolls.
        let rerolls = usize::from(self.take_queued_tag(TagKind::Boss));
        let mut boss = self.draw_boss();
        for _ in 0..rerolls {
            boss = self.draw_boss();
        }
        self.next_boss = Some(boss);
        boss
    }

    fn draw_boss(&mut self) -> BossKind {
        if self.ante % 8 == 0 {
            let pick = self.rng.index(BossKind::FINISHERS.len());
            return BossKind::FINISHERS[pick];
        }
        if self.boss_pool.is_empty() {
            self.boss_pool = BossKind::REGULAR.to_vec();
        }
        let pick = self.rng.index(self.boss_pool.len());
        self.boss_pool.remove(pick)
    }

    /// Rerolls the upcoming boss for $10. Director's Cut allows one paid
    /// reroll per ante, Retcon unlimited.
    pub fn reroll_boss(&mut self) -> Result<(), RunError> {
        if self.phase != RunPhase::SelectingBlind || self.stage != BlindStage::Boss {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let retcon = self.vouchers.contains(&vouchers::VoucherKind::Retcon);
        if !retcon && !self.vouchers.contains(&vouchers::VoucherKind::DirectorsCut) {
            return Err(RunError::InvalidSelection);
        }
        if !retcon && self.boss_rerolls_ante >= 1 {
            return Err(RunError::InvalidSelection);
        }
        let cost = 10;
        if self.money - cost < self.money_floor() {
            return Err(RunError::NotEnoughMoney);
        }
        self.ensure_next_boss();
        self.add_money(-cost);
        self.boss_rerolls_ante += 1;
        self.next_boss = Some(self.draw_boss());
        Ok(())
    }

    fn goal_for(
        &self,
        ante: u32,
        stage: BlindStage,
        boss: Option<BossKind>,
        boss_disabled: bool,
    ) -> i64 {
        let base = self.config.ante_base(ante) as f64;
        let mut factor = self.config.stage_rule(stage).target_mult;
        factor *= self.stake.target_factor(ante);
        factor *= self.deck_kind.blind_factor();
        if let Some(boss) = boss {
            if !boss_disabled {
                factor *= boss.target_factor();
            }
        }
        (base * factor).round() as i64
    }

    fn joker_hand_size_delta(&self) -> i64 {
        let mut delta = 0;
        for joker in &self.inventory.jokers {
            if joker.debuffed {
                continue;
            }
            delta += match joker.kind {
                JokerKind::Juggler => 1,
                JokerKind::Troubadour => 2,
                JokerKind::Stuntman => -2,
                JokerKind::MerryAndy => -1,
                JokerKind::TurtleBean => joker.var("hand_size") as i64,
                _ => 0,
            };
        }
        delta
    }

    fn joker_hands_delta(&self) -> i64 {
        let mut delta = 0;
        for joker in &self.inventory.jokers {
            if joker.debuffed {
                continue;
            }
            delta += match joker.kind {
                JokerKind::Troubadour => -1,
                _ => 0,
            };
        }
        delta
    }

    fn joker_discards_delta(&self) -> i64 {
        let mut delta = 0;
        for joker in &self.inventory.jokers {
            if joker.debuffed {
                continue;
            }
            delta += match joker.kind {
                JokerKind::Drunkard => 1,
                JokerKind::MerryAndy => 3,
                _ => 0,
            };
        }
        delta
    }

    pub(super) fn debuff_random_joker(&mut self) {
        for joker in &mut self.inventory.jokers {
            joker.debuffed = false;
        }
        if self.inventory.jokers.is_empty() {
            return;
        }
        let pick = self.rng.index(self.inventory.jokers.len());
        self.inventory.jokers[pick].debuffed = true;
    }

    /// Cash-out after a cleared (or death-saved) blind: round-end joker and
    /// held-card effects, the reward, then the shop.
    pub(super) fn finish_round(&mut self, saved: bool) {
        self.fire_round_end();
        self.held_round_end_effects();

        let round = self.round_state.as_ref().expect("round in progress");
        let stage = round.stage;
        let hands_left = round.hands_left;
        let discards_left = round.discards_left;
        self.totals.unused_discards += discards_left as u32;

        let mut reward = if saved {
            0
        } else {
            let rule = self.config.stage_rule(stage);
            if stage == BlindStage::Small && !self.stake.small_blind_pays() {
                0
            } else {
                rule.reward
            }
        };
        reward += self.config.economy.hand_reward * hands_left as i64;
        reward += self.deck_kind.unused_hand_bonus() * hands_left as i64;
        reward += self.deck_kind.unused_discard_bonus() * discards_left as i64;
        reward += self.interest_earned();
        self.add_money(reward);
        self.events.push(Event::BlindCleared { reward });

        // Hand and table cards rejoin the deck for the next shuffle.
        let held = std::mem::take(&mut self.hand);
        self.deck.discard_cards(held);

        if stage == BlindStage::Boss {
            self.on_boss_defeated();
        }
        self.round += 1;
        self.round_state = None;
        // Boss debuffs lift at round end; an expired perishable stays dark.
        for joker in &mut self.inventory.jokers {
            joker.debuffed = joker.stickers.perishable && joker.var("perish_done") > 0.0;
        }
        self.stage = stage.next();
        self.enter_shop();
    }

    fn on_boss_defeated(&mut self) {
        while self.take_queued_tag(TagKind::Investment) {
            self.add_money(25);
        }
        self.fire_boss_defeated();
        self.totals.played_ids_ante.clear();
        self.boss_rerolls_ante = 0;
        self.pending_voucher = None;
        self.ante += 1;
        self.events.push(Event::AnteAdvanced { ante: self.ante });
        if self.deck_kind.double_tag_after_boss() {
            self.gain_tag(TagKind::Double);
        }
    }

    pub(super) fn interest_earned(&self) -> i64 {
        if self.deck_kind.mods().no_interest {
            return 0;
        }
        let economy = &self.config.economy;
        if economy.interest_step <= 0 {
            return 0;
        }
        let mut per = economy.interest_per;
        if self.has_active_joker(JokerKind::ToTheMoon) {
            per += 1;
        }
        let cap = vouchers::interest_cap(economy.interest_cap, &self.vouchers);
        let steps = (self.money / economy.interest_step).max(0);
        (steps * per).min(cap)
    }

    /// Gold cards pay out and blue seals roll planets while held at round
    /// end.
    fn held_round_end_effects(&mut self) {
        let mut gold = 0;
        let mut blue_seals = 0;
        for card in &self.hand {
            if card.enhancement == Some(Enhancement::Gold) {
                gold += 1;
            }
            if card.seal == Some(crate::cards::Seal::Blue) {
                blue_seals += 1;
            }
        }
        if gold > 0 {
            self.add_money(3 * gold);
        }
        let last = self
            .round_state
            .as_ref()
            .and_then(|r| r.played_kinds.last().copied())
            .unwrap_or(crate::hand::HandKind::HighCard);
        for _ in 0..blue_seals {
            let planet = Planet::for_hand(last);
            let _ = self
                .inventory
                .add_consumable(crate::inventory::ConsumableInstance {
                    consumable: crate::consumables::Consumable::Planet(planet),
                    negative: false,
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decks::{DeckKind, StakeKind};

    #[test]
    fn select_blind_sets_goal_and_deals() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 1);
        run.select_blind().unwrap();
        assert_eq!(run.phase, RunPhase::PlayingBlind);
        assert_eq!(run.round_goal(), 100);
        assert_eq!(run.round_score(), 0);
        assert_eq!(run.hand.len(), 8);
        assert_eq!(run.hands_remaining(), 4);
    }

    #[test]
    fn skip_advances_stage_and_grants_a_tag() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 2);
        run.skip_blind().unwrap();
        assert_eq!(run.totals.blinds_skipped, 1);
        assert_eq!(run.stage, BlindStage::Big);
        assert_eq!(run.phase, RunPhase::SelectingBlind);
    }

    #[test]
    fn boss_cannot_be_skipped() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 2);
        run.stage = BlindStage::Boss;
        assert_eq!(run.skip_blind(), Err(RunError::CannotSkipBoss));
    }

    #[test]
    fn select_twice_is_rejected() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 1);
        run.select_blind().unwrap();
        assert_eq!(
            run.select_blind(),
            Err(RunError::InvalidPhase(RunPhase::PlayingBlind))
        );
    }

    #[test]
    fn plasma_doubles_the_goal() {
        let mut run = Run::new(DeckKind::Plasma, StakeKind::White, 1);
        run.select_blind().unwrap();
        assert_eq!(run.round_goal(), 200);
    }

    #[test]
    fn the_previewed_boss_is_the_one_selected() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 21);
        run.stage = BlindStage::Boss;
        let preview = run.upcoming_boss().unwrap();
        run.select_blind().unwrap();
        assert_eq!(run.round_state.as_ref().unwrap().boss, Some(preview));
    }

    #[test]
    fn boss_reroll_needs_a_voucher() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 22);
        run.stage = BlindStage::Boss;
        assert_eq!(run.reroll_boss(), Err(RunError::InvalidSelection));
    }

    #[test]
    fn directors_cut_rerolls_the_boss_once_per_ante() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 20);
        run.vouchers.push(crate::vouchers::VoucherKind::DirectorsCut);
        run.stage = BlindStage::Boss;
        run.money = 30;
        let first = run.upcoming_boss().unwrap();
        run.reroll_boss().unwrap();
        // Drawn bosses leave the pool, so a reroll never repeats.
        let second = run.upcoming_boss().unwrap();
        assert_ne!(first, second);
        assert_eq!(run.money, 20);
        assert_eq!(run.reroll_boss(), Err(RunError::InvalidSelection));
        run.vouchers.push(crate::vouchers::VoucherKind::Retcon);
        run.reroll_boss().unwrap();
        assert_eq!(run.money, 10);
    }

    #[test]
    fn big_blind_goal_scales() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 3);
        run.skip_blind().unwrap();
        // Tag resolution may have consumed RNG; the goal itself is fixed.
        run.select_blind().unwrap();
        assert_eq!(run.round_goal(), 150);
    }
}
