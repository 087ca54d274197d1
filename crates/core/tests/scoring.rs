use motley_core::{
    Card, Consumable, ConsumableInstance, DeckKind, Enhancement, JokerInstance, JokerKind, Planet,
    Rank, Run, Seal, StakeKind, Suit, VoucherKind,
};

fn blind_run(seed: u64) -> Run {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, seed);
    run.select_blind().unwrap();
    run
}

fn card(suit: Suit, rank: Rank, id: u32) -> Card {
    let mut card = Card::standard(suit, rank);
    card.id = id;
    card
}

/// Two nines plus three off-suit fillers: a plain pair, no flush, no
/// straight, nothing enhanced.
fn pair_of_nines(run: &mut Run) {
    run.hand = vec![
        card(Suit::Spades, Rank::Nine, 101),
        card(Suit::Hearts, Rank::Nine, 102),
        card(Suit::Clubs, Rank::Two, 103),
        card(Suit::Diamonds, Rank::Five, 104),
        card(Suit::Spades, Rank::King, 105),
    ];
}

#[test]
fn pair_scores_base_plus_scored_card_chips() {
    let mut run = blind_run(50);
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // (10 base + 9 + 9) * 2: fillers are not part of the scored set.
    assert_eq!(total, 56);
}

#[test]
fn leveled_hand_uses_the_level_table() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 51);
    run.inventory
        .add_consumable(ConsumableInstance {
            consumable: Consumable::Planet(Planet::Mercury),
            negative: false,
        })
        .unwrap();
    run.use_consumable(0, &[]).unwrap();
    run.select_blind().unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // Level 2 pair: (10 + 15) chips, (2 + 1) mult.
    assert_eq!(total, (25 + 18) * 3);
}

#[test]
fn glass_doubles_and_held_steel_multiplies() {
    let mut run = blind_run(52);
    let mut glass = card(Suit::Spades, Rank::Ace, 110);
    glass.enhancement = Some(Enhancement::Glass);
    let mut steel = card(Suit::Hearts, Rank::Two, 111);
    steel.enhancement = Some(Enhancement::Steel);
    run.hand = vec![glass, steel];
    let total = run.play_hand(&[0]).unwrap();
    // (5 + 11) chips * (1 * 2 glass * 1.5 steel).
    assert_eq!(total, 48);
}

#[test]
fn red_seal_replays_the_whole_card() {
    let mut run = blind_run(53);
    let mut sealed = card(Suit::Clubs, Rank::Two, 120);
    sealed.seal = Some(Seal::Red);
    run.hand = vec![sealed, card(Suit::Hearts, Rank::Seven, 121)];
    let total = run.play_hand(&[0]).unwrap();
    // 5 base + 2 + 2: the seal repeats the card trigger.
    assert_eq!(total, 9);
}

#[test]
fn bonus_and_foil_stack_on_one_card() {
    let mut run = blind_run(54);
    let mut loaded = card(Suit::Diamonds, Rank::Ten, 130);
    loaded.enhancement = Some(Enhancement::Bonus);
    loaded.edition = Some(motley_core::Edition::Foil);
    run.hand = vec![loaded, card(Suit::Spades, Rank::Three, 131)];
    let total = run.play_hand(&[0]).unwrap();
    // 5 base + 10 rank + 30 bonus + 50 foil, mult 1.
    assert_eq!(total, 95);
}

#[test]
fn flat_mult_joker_applies_after_cards() {
    let mut run = blind_run(55);
    run.inventory
        .add_joker(JokerInstance::new(JokerKind::Joker, None, 4))
        .unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(total, (10 + 18) * (2 + 4));
}

#[test]
fn blueprint_copies_its_right_neighbor() {
    let mut run = blind_run(56);
    run.inventory
        .add_joker(JokerInstance::new(JokerKind::Blueprint, None, 10))
        .unwrap();
    run.inventory
        .add_joker(JokerInstance::new(JokerKind::Joker, None, 4))
        .unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // Blueprint mirrors the +4, then the Joker itself adds +4.
    assert_eq!(total, (10 + 18) * (2 + 4 + 4));
}

#[test]
fn debuffed_joker_contributes_nothing() {
    let mut run = blind_run(57);
    let mut joker = JokerInstance::new(JokerKind::Joker, None, 4);
    joker.debuffed = true;
    run.inventory.add_joker(joker).unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(total, 56);
}

#[test]
fn polychrome_joker_multiplies_after_its_ability() {
    let mut run = blind_run(58);
    run.inventory
        .add_joker(JokerInstance::new(
            JokerKind::Joker,
            Some(motley_core::Edition::Polychrome),
            4,
        ))
        .unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // (28) * (2 + 4) * 1.5.
    assert_eq!(total, 252);
}

#[test]
fn stone_cards_score_even_outside_the_category() {
    let mut run = blind_run(59);
    let mut stone = card(Suit::Spades, Rank::King, 140);
    stone.enhancement = Some(Enhancement::Stone);
    run.hand = vec![
        card(Suit::Spades, Rank::Nine, 141),
        card(Suit::Hearts, Rank::Nine, 142),
        stone,
        card(Suit::Clubs, Rank::Four, 143),
        card(Suit::Diamonds, Rank::Jack, 144),
    ];
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // Pair of nines plus the stone's 50 chips; the jack stays out.
    assert_eq!(total, (10 + 18 + 50) * 2);
}

#[test]
fn trace_records_every_mutation_in_order() {
    let mut run = blind_run(60);
    pair_of_nines(&mut run);
    run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    assert!(run.trace.len() >= 4);
    assert_eq!(run.trace[0].source, "Pair");
    assert_eq!(run.trace[1].source, "Pair");
    assert_eq!(run.trace[2].source, "card");
    let last = run.trace.last().unwrap();
    assert_eq!(last.after.chips, 28);
    assert!((last.after.mult - 2.0).abs() < 1e-9);
}

#[test]
fn observatory_pays_off_held_planets() {
    let mut run = blind_run(62);
    run.vouchers.push(VoucherKind::Observatory);
    run.inventory
        .add_consumable(ConsumableInstance {
            consumable: Consumable::Planet(Planet::Mercury),
            negative: false,
        })
        .unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // Mercury matches the pair: (10 + 18) * (2 * 1.5).
    assert_eq!(total, 84);
}

#[test]
fn observatory_ignores_planets_for_other_hands() {
    let mut run = blind_run(63);
    run.vouchers.push(VoucherKind::Observatory);
    run.inventory
        .add_consumable(ConsumableInstance {
            consumable: Consumable::Planet(Planet::Jupiter),
            negative: false,
        })
        .unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(total, 56);
}

#[test]
fn plasma_deck_balances_chips_and_mult() {
    let mut run = Run::new(DeckKind::Plasma, StakeKind::White, 61);
    run.select_blind().unwrap();
    pair_of_nines(&mut run);
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // ((28 + 2) / 2)^2 squared average instead of 28 * 2.
    assert_eq!(total, 225);
}
