use motley_core::{
    Card, DeckKind, Enhancement, Rank, Run, RunError, RunPhase, StakeKind, Suit,
};

fn advance(run: &mut Run) {
    match run.phase {
        RunPhase::SelectingBlind => run.select_blind().unwrap(),
        RunPhase::PlayingBlind => {
            let count = run.hand.len().min(5);
            let indices: Vec<usize> = (0..count).collect();
            run.play_hand(&indices).unwrap();
        }
        RunPhase::Shop => run.next_round().unwrap(),
        RunPhase::OpeningPackShop | RunPhase::OpeningPackTag => run.skip_pack().unwrap(),
        RunPhase::GameOver => {}
    }
}

#[test]
fn same_seed_same_actions_same_state() {
    let mut a = Run::new(DeckKind::Red, StakeKind::White, 777);
    let mut b = Run::new(DeckKind::Red, StakeKind::White, 777);
    for _ in 0..20 {
        advance(&mut a);
        advance(&mut b);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.money, b.money);
        assert_eq!(a.events.drain(), b.events.drain());
        if a.game_over() {
            break;
        }
    }
    let state_a = serde_json::to_string(&a).unwrap();
    let state_b = serde_json::to_string(&b).unwrap();
    assert_eq!(state_a, state_b);
}

#[test]
fn different_seeds_diverge() {
    let a = Run::new(DeckKind::Red, StakeKind::White, 1);
    let b = Run::new(DeckKind::Red, StakeKind::White, 2);
    let cards_a: Vec<_> = a.deck.draw.iter().map(|c| (c.suit, c.rank)).collect();
    let cards_b: Vec<_> = b.deck.draw.iter().map(|c| (c.suit, c.rank)).collect();
    assert_ne!(cards_a, cards_b);
}

#[test]
fn clearing_the_blind_opens_the_shop() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 40);
    run.select_blind().unwrap();
    // A crafted Flush Five blows past any ante-one goal in one play.
    run.hand = (0..5)
        .map(|i| {
            let mut card = Card::standard(Suit::Hearts, Rank::King);
            card.id = 500 + i;
            card
        })
        .collect();
    let total = run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    assert!(total >= run.round_goal() as i128);
    assert_eq!(run.phase, RunPhase::Shop);
    assert!(run.shop.is_some());
    assert_eq!(run.round, 1);
    assert!(run.round_state.is_none());
}

#[test]
fn blind_reward_includes_interest_and_unused_hands() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 41);
    run.select_blind().unwrap();
    run.money = 25;
    run.hand = (0..5)
        .map(|i| {
            let mut card = Card::standard(Suit::Hearts, Rank::King);
            card.id = 600 + i;
            card
        })
        .collect();
    run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // $3 small blind, $1 per unused hand (3), $1 interest per $5 capped at 5.
    assert_eq!(run.money, 25 + 3 + 3 + 5);
}

#[test]
fn running_out_of_hands_ends_the_run() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 42);
    run.select_blind().unwrap();
    for _ in 0..4 {
        let mut weak = Card::standard(Suit::Clubs, Rank::Two);
        weak.id = 700;
        run.hand.insert(0, weak);
        run.play_hand(&[0]).unwrap();
        if run.game_over() {
            break;
        }
    }
    assert!(run.game_over());
    assert!(run.round_score() < run.round_goal() as i128);
}

#[test]
fn gold_cards_held_at_round_end_pay_out() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 43);
    run.select_blind().unwrap();
    run.money = 0;
    let mut gold = Card::standard(Suit::Diamonds, Rank::Three);
    gold.enhancement = Some(Enhancement::Gold);
    gold.id = 800;
    run.hand = (0..5)
        .map(|i| {
            let mut card = Card::standard(Suit::Hearts, Rank::King);
            card.id = 810 + i;
            card
        })
        .collect();
    run.hand.push(gold);
    run.play_hand(&[0, 1, 2, 3, 4]).unwrap();
    // 3 (blind) + 3 (hands) + 0 (interest) + 3 (gold card).
    assert_eq!(run.money, 9);
}

#[test]
fn played_actions_are_phase_gated() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 44);
    assert_eq!(
        run.play_hand(&[0]),
        Err(RunError::InvalidPhase(RunPhase::SelectingBlind))
    );
    assert_eq!(
        run.discard(&[0]),
        Err(RunError::InvalidPhase(RunPhase::SelectingBlind))
    );
    assert_eq!(
        run.next_round(),
        Err(RunError::InvalidPhase(RunPhase::SelectingBlind))
    );
    assert_eq!(
        run.skip_pack(),
        Err(RunError::InvalidPhase(RunPhase::SelectingBlind))
    );
}

#[test]
fn discards_are_limited_and_redraw() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 45);
    run.select_blind().unwrap();
    let hand_size = run.hand.len();
    for _ in 0..run.discards_remaining() {
        run.discard(&[0, 1]).unwrap();
        assert_eq!(run.hand.len(), hand_size);
    }
    assert_eq!(run.discard(&[0]), Err(RunError::NoDiscardsLeft));
}

#[test]
fn skipping_blinds_walks_the_stages() {
    let mut run = Run::new(DeckKind::Red, StakeKind::White, 46);
    run.skip_blind().unwrap();
    // A skip tag may hand out a free pack; clear it before moving on.
    if run.pack.is_some() {
        run.skip_pack().unwrap();
    }
    run.skip_blind().unwrap();
    if run.pack.is_some() {
        run.skip_pack().unwrap();
    }
    assert_eq!(run.totals.blinds_skipped, 2);
    assert_eq!(run.stage, motley_core::BlindStage::Boss);
    assert_eq!(run.skip_blind(), Err(RunError::CannotSkipBoss));
}
