use super::{Run, RunError};
use crate::cards::{Card, Edition, Enhancement, Rank, Seal, Suit};
use crate::config::{PackKind, PackRule, PackSize, ShopItemKind};
use crate::consumables::{Consumable, ConsumableKind, Planet, Spectral, Tarot};
use crate::events::Event;
use crate::inventory::{ConsumableInstance, JokerInstance, JokerStickers};
use crate::jokers::{JokerKind, JokerRarity};
use crate::shop::{
    discounted_price, pick_weighted, CardOffer, PackItem, PackOffer, PackOpen, ShopState,
};
use crate::state::{RunPhase, SellSection, ShopSection};
use crate::tags::TagKind;
use crate::vouchers::{self, VoucherKind};

impl Run {
    /// Builds a fresh shop after a cleared blind. Queued tags spend
    /// themselves here: coupons, D6, edition/rarity marks, vouchers.
    pub(super) fn enter_shop(&mut self) {
        self.phase = RunPhase::Shop;
        let coupon = self.take_queued_tag(TagKind::Coupon);
        let d6 = self.take_queued_tag(TagKind::D6);
        while self.take_queued_tag(TagKind::Voucher) {
            if let Some(voucher) = self.roll_voucher() {
                self.grant_voucher(voucher);
            }
        }
        let forced_rarity = if self.take_queued_tag(TagKind::Rare) {
            Some(JokerRarity::Rare)
        } else if self.take_queued_tag(TagKind::Uncommon) {
            Some(JokerRarity::Uncommon)
        } else {
            None
        };
        let forced_edition = [
            TagKind::Negative,
            TagKind::Polychrome,
            TagKind::Holographic,
            TagKind::Foil,
        ]
        .into_iter()
        .find(|tag| self.take_queued_tag(*tag))
        .and_then(TagKind::joker_edition);

        let card_slots =
            self.config.shop.card_slots + vouchers::extra_shop_card_slots(&self.vouchers);
        let mut cards = Vec::with_capacity(card_slots);
        for slot in 0..card_slots {
            // Tag-marked jokers take the first slot, free of charge.
            if slot == 0 && (forced_rarity.is_some() || forced_edition.is_some()) {
                let rarity = forced_rarity.unwrap_or_else(|| self.roll_rarity());
                let mut offer = self.roll_joker_offer(rarity);
                if let CardOffer::Joker { edition, price, .. } = &mut offer {
                    if let Some(forced) = forced_edition {
                        *edition = Some(forced);
                        *price = 0;
                    }
                }
                cards.push(offer);
                continue;
            }
            cards.push(self.roll_card_offer());
        }

        let pack_slots = self.config.shop.pack_slots;
        let mut packs = Vec::with_capacity(pack_slots);
        for slot in 0..pack_slots {
            // The very first shop of a run always leads with a Buffoon pack.
            let rule = if slot == 0 && !self.first_shop_done {
                self.pack_rule(PackKind::Buffoon, PackSize::Normal)
            } else {
                self.roll_pack_rule()
            };
            packs.push(PackOffer {
                kind: rule.kind,
                size: rule.size,
                price: self.pack_price(&rule),
                options: rule.options,
                picks: rule.picks,
            });
        }
        self.first_shop_done = true;

        // The voucher offer survives shop visits until bought or the ante
        // ends.
        let voucher = match self.pending_voucher {
            Some(v) if !self.vouchers.contains(&v) => Some(v),
            _ => self.roll_voucher(),
        };
        self.pending_voucher = voucher;
        let base_reroll = if d6 {
            0
        } else {
            (self.config.economy.reroll_base - vouchers::reroll_discount(&self.vouchers)).max(0)
        };
        let free_rerolls = u32::from(self.has_active_joker(JokerKind::ChaosTheClown));

        self.shop = Some(ShopState {
            cards,
            packs,
            voucher,
            reroll_cost: base_reroll,
            free_rerolls,
            paid_rerolls: 0,
            coupon,
        });
        self.events.push(Event::ShopEntered);
    }

    /// Leaves the shop for the next blind pick.
    pub fn next_round(&mut self) -> Result<(), RunError> {
        if self.phase != RunPhase::Shop {
            return Err(RunError::InvalidPhase(self.phase));
        }
        self.fire_shop_exited();
        self.shop = None;
        self.phase = RunPhase::SelectingBlind;
        Ok(())
    }

    /// Rerolls the card row. Free rerolls (Chaos the Clown) go first;
    /// paid ones climb by the configured step.
    pub fn reroll_shop(&mut self) -> Result<(), RunError> {
        if self.phase != RunPhase::Shop {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let shop = self.shop.as_ref().ok_or(RunError::InvalidPhase(self.phase))?;
        let cost = if shop.free_rerolls > 0 {
            0
        } else {
            shop.reroll_cost
        };
        if self.money - cost < self.money_floor() {
            return Err(RunError::NotEnoughMoney);
        }
        if cost > 0 {
            self.add_money(-cost);
        }
        let card_slots = self
            .shop
            .as_ref()
            .map(|s| s.cards.len())
            .unwrap_or_default();
        let mut cards = Vec::with_capacity(card_slots);
        for _ in 0..card_slots {
            cards.push(self.roll_card_offer());
        }
        let shop = self.shop.as_mut().expect("shop in progress");
        shop.cards = cards;
        if shop.free_rerolls > 0 {
            shop.free_rerolls -= 1;
        } else {
            shop.paid_rerolls += 1;
            shop.reroll_cost += self.config.economy.reroll_step;
        }
        self.totals.rerolls += 1;
        self.events.push(Event::ShopRerolled { cost });
        Ok(())
    }

    /// Buys from one of the three shop sections by index.
    pub fn buy_shop_item(&mut self, section: ShopSection, index: usize) -> Result<(), RunError> {
        if self.phase != RunPhase::Shop {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let shop = self.shop.as_ref().ok_or(RunError::InvalidPhase(self.phase))?;
        match section {
            ShopSection::Card => {
                let offer = shop.cards.get(index).ok_or(RunError::InvalidIndex)?.clone();
                let cost = if shop.coupon { 0 } else { offer.price() };
                if self.money - cost < self.money_floor() {
                    return Err(RunError::NotEnoughMoney);
                }
                match &offer {
                    CardOffer::Joker { edition, .. } => {
                        if !self
                            .inventory
                            .can_add_joker(*edition == Some(Edition::Negative))
                        {
                            return Err(RunError::Inventory(
                                crate::inventory::InventoryError::JokersFull,
                            ));
                        }
                    }
                    CardOffer::Consumable { negative, .. } => {
                        if !self.inventory.can_add_consumable(*negative) {
                            return Err(RunError::Inventory(
                                crate::inventory::InventoryError::ConsumablesFull,
                            ));
                        }
                    }
                    CardOffer::PlayingCard { .. } => {}
                }
                let label = offer.label();
                self.shop.as_mut().expect("shop in progress").cards.remove(index);
                if cost > 0 {
                    self.add_money(-cost);
                }
                match offer {
                    CardOffer::Joker {
                        kind,
                        edition,
                        stickers,
                        price,
                    } => {
                        let mut joker = JokerInstance::new(kind, edition, price);
                        joker.stickers = stickers;
                        self.inventory.add_joker(joker)?;
                    }
                    CardOffer::Consumable {
                        consumable,
                        negative,
                        ..
                    } => {
                        self.inventory.add_consumable(ConsumableInstance {
                            consumable,
                            negative,
                        })?;
                    }
                    CardOffer::PlayingCard { mut card, .. } => {
                        card.id = self.next_card_id();
                        self.deck.draw.push(card);
                        self.totals.cards_added += 1;
                        self.events.push(Event::CardAdded { card_id: card.id });
                        self.fire_card_added();
                    }
                }
                self.events.push(Event::Purchased { label, cost });
                Ok(())
            }
            ShopSection::Pack => {
                let offer = *shop.packs.get(index).ok_or(RunError::InvalidIndex)?;
                let cost = if shop.coupon { 0 } else { offer.price };
                if self.money - cost < self.money_floor() {
                    return Err(RunError::NotEnoughMoney);
                }
                self.shop.as_mut().expect("shop in progress").packs.remove(index);
                if cost > 0 {
                    self.add_money(-cost);
                }
                self.events.push(Event::Purchased {
                    label: pack_label(offer.kind),
                    cost,
                });
                self.open_pack(offer.kind, offer.size, offer.options, offer.picks, false);
                Ok(())
            }
            ShopSection::Voucher => {
                if index != 0 {
                    return Err(RunError::InvalidIndex);
                }
                let voucher = shop.voucher.ok_or(RunError::InvalidIndex)?;
                let cost = self.config.shop.prices.voucher;
                if self.money - cost < self.money_floor() {
                    return Err(RunError::NotEnoughMoney);
                }
                self.shop.as_mut().expect("shop in progress").voucher = None;
                self.pending_voucher = None;
                self.add_money(-cost);
                self.grant_voucher(voucher);
                Ok(())
            }
        }
    }

    /// Sells an owned joker or consumable for half its purchase price.
    /// Allowed mid-blind too, which is how Luchador earns its keep.
    pub fn sell_item(&mut self, section: SellSection, index: usize) -> Result<(), RunError> {
        if self.phase != RunPhase::Shop && self.phase != RunPhase::PlayingBlind {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let sell_min = self.config.economy.sell_min;
        match section {
            SellSection::Joker => {
                let joker = self
                    .inventory
                    .jokers
                    .get(index)
                    .ok_or(RunError::InvalidIndex)?;
                if joker.stickers.eternal {
                    return Err(RunError::CannotSell);
                }
                let value = joker.sell_value(sell_min);
                let sold = self.inventory.jokers.remove(index);
                self.add_money(value);
                self.events.push(Event::Sold {
                    label: sold.kind.name().to_string(),
                    value,
                });
                self.on_joker_sold(&sold);
                self.fire_item_sold();
                Ok(())
            }
            SellSection::Consumable => {
                let item = self
                    .inventory
                    .consumables
                    .get(index)
                    .ok_or(RunError::InvalidIndex)?;
                let base = self.consumable_price(item.consumable.kind());
                let value = item.sell_value(base, sell_min);
                let sold = self.inventory.consumables.remove(index);
                self.add_money(value);
                self.events.push(Event::Sold {
                    label: sold.consumable.name().to_string(),
                    value,
                });
                self.fire_item_sold();
                Ok(())
            }
        }
    }

    /// Effects carried by the sold joker itself.
    fn on_joker_sold(&mut self, sold: &JokerInstance) {
        let boss_blind = self
            .round_state
            .as_ref()
            .map_or(false, |r| r.boss.is_some());
        match sold.kind {
            JokerKind::Luchador if boss_blind => {
                if let Some(round) = self.round_state.as_mut() {
                    round.boss_disabled = true;
                }
            }
            JokerKind::DietCola => self.gain_tag(TagKind::Double),
            JokerKind::InvisibleJoker if sold.var("rounds_held") >= 2.0 => {
                if !self.inventory.jokers.is_empty() {
                    let pick = self.rng.index(self.inventory.jokers.len());
                    let mut copy = self.inventory.jokers[pick].clone();
                    copy.stickers = JokerStickers::default();
                    if self.inventory.add_joker(copy).is_ok() {
                        self.events.push(Event::JokerTriggered {
                            kind: self.inventory.jokers[pick].kind,
                            note: "duplicated".into(),
                        });
                    }
                }
            }
            _ => {}
        }
        // Selling any joker satisfies a boss that waits for one.
        if let Some(round) = self.round_state.as_mut() {
            if round
                .boss
                .map_or(false, |b| b.debuffs_all_until_joker_sold())
            {
                round.boss_disabled = true;
            }
        }
    }

    /// Opens the free Mega pack a skip tag grants.
    pub(super) fn open_tag_pack(&mut self, kind: PackKind) {
        let rule = self.pack_rule(kind, PackSize::Mega);
        self.open_pack(rule.kind, rule.size, rule.options, rule.picks, true);
    }

    fn open_pack(
        &mut self,
        kind: PackKind,
        size: PackSize,
        options: u8,
        picks: u8,
        from_tag: bool,
    ) {
        let mut items = Vec::with_capacity(options as usize);
        for slot in 0..options {
            items.push(self.roll_pack_item(kind, slot));
        }
        self.events.push(Event::PackOpened {
            options: items.len(),
        });
        self.pack = Some(PackOpen {
            kind,
            size,
            options: items,
            picks_left: picks,
            from_tag,
        });
        self.phase = if from_tag {
            RunPhase::OpeningPackTag
        } else {
            RunPhase::OpeningPackShop
        };
        self.fire_pack_opened();
    }

    /// Takes one option from the open pack. Untargeted consumables apply
    /// on the spot; targeted ones have no hand to aim at out here.
    pub fn pick_pack_item(&mut self, index: usize) -> Result<(), RunError> {
        if self.phase != RunPhase::OpeningPackShop && self.phase != RunPhase::OpeningPackTag {
            return Err(RunError::InvalidPhase(self.phase));
        }
        let pack = self.pack.as_ref().ok_or(RunError::InvalidPhase(self.phase))?;
        let item = pack.options.get(index).ok_or(RunError::InvalidIndex)?.clone();
        match &item {
            PackItem::Joker { kind, edition } => {
                if !self
                    .inventory
                    .can_add_joker(*edition == Some(Edition::Negative))
                {
                    return Err(RunError::Inventory(
                        crate::inventory::InventoryError::JokersFull,
                    ));
                }
                let price = self.joker_base_price(kind.rarity());
                let joker = JokerInstance::new(*kind, *edition, price);
                self.inventory.add_joker(joker)?;
            }
            PackItem::Consumable(consumable) => {
                if consumable.targets().is_some() {
                    return Err(RunError::Unimplemented(
                        "targeted consumables picked outside a blind",
                    ));
                }
                self.apply_untargeted_consumable(*consumable)?;
            }
            PackItem::PlayingCard(card) => {
                let mut card = *card;
                card.id = self.next_card_id();
                self.deck.draw.push(card);
                self.totals.cards_added += 1;
                self.events.push(Event::CardAdded { card_id: card.id });
                self.fire_card_added();
            }
        }
        let pack = self.pack.as_mut().expect("pack open");
        pack.options.remove(index);
        pack.picks_left -= 1;
        self.events.push(Event::PackPicked { label: item.label() });
        if self.pack.as_ref().map_or(true, |p| {
            p.picks_left == 0 || p.options.is_empty()
        }) {
            self.close_pack();
        }
        Ok(())
    }

    /// Walks away from the remaining pack options.
    pub fn skip_pack(&mut self) -> Result<(), RunError> {
        if self.phase != RunPhase::OpeningPackShop && self.phase != RunPhase::OpeningPackTag {
            return Err(RunError::InvalidPhase(self.phase));
        }
        self.totals.packs_skipped += 1;
        self.events.push(Event::PackSkipped);
        self.close_pack();
        Ok(())
    }

    fn close_pack(&mut self) {
        let from_tag = self.pack.as_ref().map_or(false, |p| p.from_tag);
        self.pack = None;
        self.phase = if from_tag {
            RunPhase::SelectingBlind
        } else {
            RunPhase::Shop
        };
    }

    fn roll_card_offer(&mut self) -> CardOffer {
        let tarot_factor = vouchers::tarot_weight_factor(&self.vouchers);
        let planet_factor = vouchers::planet_weight_factor(&self.vouchers);
        let magic_trick = self.vouchers.contains(&VoucherKind::MagicTrick);
        let spectral_shop = self.deck_kind.spectral_in_shop();
        let weights: Vec<(ShopItemKind, u32)> = self
            .config
            .shop
            .item_weights
            .iter()
            .map(|w| {
                let weight = match w.kind {
                    ShopItemKind::Tarot => w.weight * tarot_factor,
                    ShopItemKind::Planet => w.weight * planet_factor,
                    ShopItemKind::Spectral if spectral_shop => w.weight.max(2),
                    ShopItemKind::PlayingCard if magic_trick => w.weight.max(4),
                    _ => w.weight,
                };
                (w.kind, weight)
            })
            .collect();
        let kind = pick_weighted(&weights, &mut self.rng).unwrap_or(ShopItemKind::Joker);
        match kind {
            ShopItemKind::Joker => {
                let rarity = self.roll_rarity();
                self.roll_joker_offer(rarity)
            }
            ShopItemKind::Tarot => {
                let tarot = Tarot::ALL[self.rng.index(Tarot::ALL.len())];
                self.consumable_offer(Consumable::Tarot(tarot))
            }
            ShopItemKind::Planet => {
                let planet = Planet::ALL[self.rng.index(Planet::ALL.len())];
                self.consumable_offer(Consumable::Planet(planet))
            }
            ShopItemKind::Spectral => {
                let pool = &Spectral::ALL[..16];
                let spectral = pool[self.rng.index(pool.len())];
                self.consumable_offer(Consumable::Spectral(spectral))
            }
            ShopItemKind::PlayingCard => {
                let suit = Suit::STANDARD[self.rng.index(4)];
                let rank = Rank::ALL[self.rng.index(13)];
                let mut card = Card::standard(suit, rank);
                if self.vouchers.contains(&VoucherKind::Illusion) {
                    self.roll_card_extras(&mut card);
                }
                let price = discounted_price(
                    self.config.shop.prices.playing_card,
                    vouchers::discount_factor(&self.vouchers),
                );
                CardOffer::PlayingCard { card, price }
            }
        }
    }

    fn roll_rarity(&mut self) -> JokerRarity {
        let weights: Vec<(JokerRarity, u32)> = self
            .config
            .shop
            .rarity_weights
            .iter()
            .map(|w| (w.rarity, w.weight))
            .collect();
        pick_weighted(&weights, &mut self.rng).unwrap_or(JokerRarity::Common)
    }

    fn roll_joker_offer(&mut self, rarity: JokerRarity) -> CardOffer {
        let kind = self.roll_joker_kind(rarity);
        let edition = self.roll_shop_edition();
        let stickers = self.roll_stickers();
        let mut price = self.joker_base_price(rarity) + self.edition_surcharge(edition);
        price = discounted_price(price, vouchers::discount_factor(&self.vouchers));
        // Rentals always cost a flat $3 up front; the toll comes later.
        if stickers.rental {
            price = 3;
        }
        CardOffer::Joker {
            kind,
            edition,
            stickers,
            price,
        }
    }

    fn roll_joker_kind(&mut self, rarity: JokerRarity) -> JokerKind {
        let showman = self.has_active_joker(JokerKind::Showman);
        let pool: Vec<JokerKind> = JokerKind::ALL
            .iter()
            .copied()
            .filter(|k| k.rarity() == rarity)
            .filter(|k| showman || !self.inventory.jokers.iter().any(|j| j.kind == *k))
            .collect();
        if pool.is_empty() {
            // Everything of this rarity is owned; duplicates beat nothing.
            let fallback: Vec<JokerKind> = JokerKind::ALL
                .iter()
                .copied()
                .filter(|k| k.rarity() == rarity)
                .collect();
            return fallback[self.rng.index(fallback.len())];
        }
        pool[self.rng.index(pool.len())]
    }

    fn roll_shop_edition(&mut self) -> Option<Edition> {
        let editions = self.config.shop.editions;
        let factor = vouchers::edition_weight_factor(&self.vouchers);
        let weights = [
            (None, editions.plain),
            (Some(Edition::Foil), editions.foil * factor),
            (Some(Edition::Holographic), editions.holographic * factor),
            (Some(Edition::Polychrome), editions.polychrome * factor),
            (Some(Edition::Negative), editions.negative),
        ];
        pick_weighted(&weights, &mut self.rng).unwrap_or(None)
    }

    fn roll_stickers(&mut self) -> JokerStickers {
        let mut stickers = JokerStickers::default();
        let eternal = self.stake.eternal_percent();
        let perishable = self.stake.perishable_percent();
        let rental = self.stake.rental_percent();
        // At most one sticker per joker.
        if eternal > 0 && (self.rng.index(100) as u64) < eternal {
            stickers.eternal = true;
        } else if perishable > 0 && (self.rng.index(100) as u64) < perishable {
            stickers.perishable = true;
        } else if rental > 0 && (self.rng.index(100) as u64) < rental {
            stickers.rental = true;
        }
        stickers
    }

    fn edition_surcharge(&self, edition: Option<Edition>) -> i64 {
        let prices = &self.config.shop.prices;
        match edition {
            Some(Edition::Foil) => prices.foil,
            Some(Edition::Holographic) => prices.holographic,
            Some(Edition::Polychrome) => prices.polychrome,
            Some(Edition::Negative) => prices.negative,
            None => 0,
        }
    }

    fn consumable_offer(&mut self, consumable: Consumable) -> CardOffer {
        let base = self.consumable_price(consumable.kind());
        let mut price = discounted_price(base, vouchers::discount_factor(&self.vouchers));
        if consumable.kind() == ConsumableKind::Planet
            && self.has_active_joker(JokerKind::Astronomer)
        {
            price = 0;
        }
        CardOffer::Consumable {
            consumable,
            negative: false,
            price,
        }
    }

    pub(super) fn consumable_price(&self, kind: ConsumableKind) -> i64 {
        let prices = &self.config.shop.prices;
        match kind {
            ConsumableKind::Tarot => prices.tarot,
            ConsumableKind::Planet => prices.planet,
            ConsumableKind::Spectral => prices.spectral,
        }
    }

    fn pack_rule(&self, kind: PackKind, size: PackSize) -> PackRule {
        self.config
            .shop
            .packs
            .iter()
            .copied()
            .find(|rule| rule.kind == kind && rule.size == size)
            .unwrap_or(PackRule {
                kind,
                size,
                weight: 1,
                price: 4,
                options: 3,
                picks: 1,
            })
    }

    fn roll_pack_rule(&mut self) -> PackRule {
        let weights: Vec<(usize, u32)> = self
            .config
            .shop
            .packs
            .iter()
            .enumerate()
            .map(|(idx, rule)| (idx, rule.weight))
            .collect();
        let idx = pick_weighted(&weights, &mut self.rng).unwrap_or(0);
        self.config.shop.packs[idx]
    }

    fn pack_price(&self, rule: &PackRule) -> i64 {
        if rule.kind == PackKind::Celestial && self.has_active_joker(JokerKind::Astronomer) {
            return 0;
        }
        discounted_price(rule.price, vouchers::discount_factor(&self.vouchers))
    }

    fn roll_pack_item(&mut self, kind: PackKind, slot: u8) -> PackItem {
        match kind {
            PackKind::Arcana => {
                // Omen Globe lets spectrals bleed into arcana packs.
                if self.vouchers.contains(&VoucherKind::OmenGlobe) && self.rng.chance(5) {
                    let pool = &Spectral::ALL[..16];
                    return PackItem::Consumable(Consumable::Spectral(
                        pool[self.rng.index(pool.len())],
                    ));
                }
                PackItem::Consumable(Consumable::Tarot(
                    Tarot::ALL[self.rng.index(Tarot::ALL.len())],
                ))
            }
            PackKind::Celestial => {
                if slot == 0 && self.vouchers.contains(&VoucherKind::Telescope) {
                    let planet = Planet::for_hand(self.most_played_hand());
                    return PackItem::Consumable(Consumable::Planet(planet));
                }
                PackItem::Consumable(Consumable::Planet(
                    Planet::ALL[self.rng.index(Planet::ALL.len())],
                ))
            }
            PackKind::Spectral => PackItem::Consumable(Consumable::Spectral(
                Spectral::ALL[self.rng.index(Spectral::ALL.len())],
            )),
            PackKind::Buffoon => {
                let rarity = self.roll_rarity();
                let kind = self.roll_joker_kind(rarity);
                let edition = self.roll_shop_edition();
                PackItem::Joker { kind, edition }
            }
            PackKind::Standard => {
                let suit = Suit::STANDARD[self.rng.index(4)];
                let rank = Rank::ALL[self.rng.index(13)];
                let mut card = Card::standard(suit, rank);
                self.roll_card_extras(&mut card);
                PackItem::PlayingCard(card)
            }
        }
    }

    /// Optional enhancement, seal, and edition rolls shared by Standard
    /// packs and Illusion shop cards.
    fn roll_card_extras(&mut self, card: &mut Card) {
        if self.rng.index(10) < 4 {
            const POOL: [Enhancement; 8] = [
                Enhancement::Bonus,
                Enhancement::Mult,
                Enhancement::Wild,
                Enhancement::Glass,
                Enhancement::Steel,
                Enhancement::Stone,
                Enhancement::Lucky,
                Enhancement::Gold,
            ];
            card.enhancement = Some(POOL[self.rng.index(POOL.len())]);
        }
        if self.rng.index(10) < 2 {
            const SEALS: [Seal; 4] = [Seal::Red, Seal::Blue, Seal::Gold, Seal::Purple];
            card.seal = Some(SEALS[self.rng.index(SEALS.len())]);
        }
        if self.rng.chance(50) {
            const EDITIONS: [Edition; 3] =
                [Edition::Foil, Edition::Holographic, Edition::Polychrome];
            card.edition = Some(EDITIONS[self.rng.index(EDITIONS.len())]);
        }
    }

    /// One voucher offer per shop: any unowned voucher whose base tier
    /// requirement is met.
    fn roll_voucher(&mut self) -> Option<VoucherKind> {
        let pool: Vec<VoucherKind> = VoucherKind::ALL
            .iter()
            .copied()
            .filter(|v| !self.vouchers.contains(v))
            .filter(|v| match v.requires() {
                Some(base) => self.vouchers.contains(&base),
                None => true,
            })
            .collect();
        if pool.is_empty() {
            return None;
        }
        Some(pool[self.rng.index(pool.len())])
    }
}

fn pack_label(kind: PackKind) -> String {
    match kind {
        PackKind::Standard => "Standard Pack",
        PackKind::Arcana => "Arcana Pack",
        PackKind::Celestial => "Celestial Pack",
        PackKind::Spectral => "Spectral Pack",
        PackKind::Buffoon => "Buffoon Pack",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decks::{DeckKind, StakeKind};

    fn shop_run(seed: u64) -> Run {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, seed);
        run.enter_shop();
        run
    }

    #[test]
    fn first_shop_leads_with_a_buffoon_pack() {
        let run = shop_run(5);
        let shop = run.shop.as_ref().unwrap();
        assert_eq!(shop.cards.len(), 2);
        assert_eq!(shop.packs.len(), 2);
        assert_eq!(shop.packs[0].kind, PackKind::Buffoon);
        assert!(shop.voucher.is_some());
        assert_eq!(shop.reroll_cost, 5);
    }

    #[test]
    fn reroll_costs_climb_by_step() {
        let mut run = shop_run(6);
        run.money = 50;
        run.reroll_shop().unwrap();
        run.reroll_shop().unwrap();
        let shop = run.shop.as_ref().unwrap();
        assert_eq!(shop.reroll_cost, 7);
        assert_eq!(shop.paid_rerolls, 2);
        assert_eq!(run.totals.rerolls, 2);
        assert_eq!(run.money, 50 - 5 - 6);
    }

    #[test]
    fn buying_needs_money() {
        let mut run = shop_run(7);
        run.money = 0;
        let shop = run.shop.as_ref().unwrap();
        if shop.cards[0].price() > 0 {
            assert_eq!(
                run.buy_shop_item(ShopSection::Card, 0),
                Err(RunError::NotEnoughMoney)
            );
        }
    }

    #[test]
    fn selling_a_joker_returns_half_price() {
        let mut run = shop_run(8);
        run.inventory
            .add_joker(JokerInstance::new(JokerKind::Joker, None, 6))
            .unwrap();
        let before = run.money;
        run.sell_item(SellSection::Joker, 0).unwrap();
        assert_eq!(run.money, before + 3);
        assert!(run.inventory.jokers.is_empty());
    }

    #[test]
    fn eternal_jokers_cannot_be_sold() {
        let mut run = shop_run(9);
        let mut joker = JokerInstance::new(JokerKind::Joker, None, 6);
        joker.stickers.eternal = true;
        run.inventory.add_joker(joker).unwrap();
        assert_eq!(
            run.sell_item(SellSection::Joker, 0),
            Err(RunError::CannotSell)
        );
    }

    #[test]
    fn buy_sell_round_trip_is_half_price() {
        let mut run = shop_run(10);
        run.money = 100;
        let joker_idx = run
            .shop
            .as_ref()
            .unwrap()
            .cards
            .iter()
            .position(|c| matches!(c, CardOffer::Joker { .. }));
        if let Some(idx) = joker_idx {
            let price = run.shop.as_ref().unwrap().cards[idx].price();
            run.buy_shop_item(ShopSection::Card, idx).unwrap();
            let after_buy = run.money;
            run.sell_item(SellSection::Joker, 0).unwrap();
            assert_eq!(run.money, after_buy + (price / 2).max(1));
            assert_eq!(run.money, 100 - price + (price / 2).max(1));
        }
    }

    #[test]
    fn pack_purchase_opens_for_picks() {
        let mut run = shop_run(11);
        run.money = 100;
        run.buy_shop_item(ShopSection::Pack, 0).unwrap();
        assert_eq!(run.phase, RunPhase::OpeningPackShop);
        let pack = run.pack.as_ref().unwrap();
        assert_eq!(pack.kind, PackKind::Buffoon);
        assert_eq!(pack.options.len(), 3);
        run.skip_pack().unwrap();
        assert_eq!(run.phase, RunPhase::Shop);
        assert_eq!(run.totals.packs_skipped, 1);
    }

    #[test]
    fn leaving_the_shop_returns_to_blind_select() {
        let mut run = shop_run(12);
        run.next_round().unwrap();
        assert_eq!(run.phase, RunPhase::SelectingBlind);
        assert!(run.shop.is_none());
    }

    #[test]
    fn unbought_voucher_offer_persists_within_the_ante() {
        let mut run = shop_run(14);
        let first = run.shop.as_ref().unwrap().voucher;
        assert!(first.is_some());
        run.next_round().unwrap();
        run.enter_shop();
        assert_eq!(run.shop.as_ref().unwrap().voucher, first);
    }

    #[test]
    fn buying_the_voucher_rolls_a_fresh_offer_next_shop() {
        let mut run = shop_run(15);
        run.money = 100;
        let bought = run.shop.as_ref().unwrap().voucher.unwrap();
        run.buy_shop_item(ShopSection::Voucher, 0).unwrap();
        run.next_round().unwrap();
        run.enter_shop();
        assert_ne!(run.shop.as_ref().unwrap().voucher, Some(bought));
    }

    #[test]
    fn illusion_decorates_shop_playing_cards() {
        let mut run = shop_run(16);
        run.vouchers.push(VoucherKind::MagicTrick);
        run.vouchers.push(VoucherKind::Illusion);
        let mut decorated = 0;
        for _ in 0..300 {
            if let CardOffer::PlayingCard { card, .. } = run.roll_card_offer() {
                if card.enhancement.is_some() || card.edition.is_some() || card.seal.is_some() {
                    decorated += 1;
                }
            }
        }
        assert!(decorated > 0);
    }

    #[test]
    fn shop_playing_cards_are_plain_without_illusion() {
        let mut run = shop_run(17);
        run.vouchers.push(VoucherKind::MagicTrick);
        for _ in 0..300 {
            if let CardOffer::PlayingCard { card, .. } = run.roll_card_offer() {
                assert!(card.enhancement.is_none());
                assert!(card.edition.is_none());
                assert!(card.seal.is_none());
            }
        }
    }

    #[test]
    fn rental_jokers_cost_a_flat_three() {
        let mut run = Run::new(DeckKind::Red, StakeKind::Gold, 18);
        let mut rentals = 0;
        for _ in 0..120 {
            if let CardOffer::Joker {
                stickers, price, ..
            } = run.roll_joker_offer(JokerRarity::Common)
            {
                assert!(!(stickers.rental && (stickers.eternal || stickers.perishable)));
                if stickers.rental {
                    assert_eq!(price, 3);
                    rentals += 1;
                }
            }
        }
        assert!(rentals > 0);
    }

    #[test]
    fn coupon_tag_makes_cards_free() {
        let mut run = Run::new(DeckKind::Red, StakeKind::White, 13);
        run.tags.push(TagKind::Coupon);
        run.enter_shop();
        assert!(run.shop.as_ref().unwrap().coupon);
        run.money = 0;
        let offer = run.shop.as_ref().unwrap().cards[0].clone();
        match offer {
            CardOffer::Joker { .. } | CardOffer::PlayingCard { .. } => {
                run.buy_shop_item(ShopSection::Card, 0).unwrap();
                assert_eq!(run.money, 0);
            }
            CardOffer::Consumable { .. } => {
                run.buy_shop_item(ShopSection::Card, 0).unwrap();
                assert_eq!(run.money, 0);
            }
        }
    }
}
