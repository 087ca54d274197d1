use crate::cards::{Card, Suit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Poker-hand categories, weakest to strongest. Discriminants index the
/// scoring tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    FiveOfAKind,
    FlushHouse,
    FlushFive,
}

impl HandKind {
    pub const ALL: [HandKind; 12] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::ThreeOfAKind,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::FourOfAKind,
        HandKind::StraightFlush,
        HandKind::FiveOfAKind,
        HandKind::FlushHouse,
        HandKind::FlushFive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::ThreeOfAKind => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::FourOfAKind => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::FiveOfAKind => "Five of a Kind",
            HandKind::FlushHouse => "Flush House",
            HandKind::FlushFive => "Flush Five",
        }
    }

    pub fn strength(self) -> usize {
        self as usize
    }
}

/// Evaluation modifiers granted by jokers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EvalRules {
    /// Hearts/Diamonds and Spades/Clubs each count as one suit.
    pub smeared: bool,
    /// Flushes and straights need only four cards.
    pub four_fingers: bool,
    /// Straights may skip one rank between cards.
    pub shortcut: bool,
}

/// Every category the played cards form, with the indices (into the played
/// list) realizing each one. Categories coexist; `best` is the strongest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandEval {
    categories: HashMap<HandKind, Vec<usize>>,
    best: HandKind,
}

impl HandEval {
    pub fn best(&self) -> HandKind {
        self.best
    }

    pub fn contains(&self, kind: HandKind) -> bool {
        self.categories.contains_key(&kind)
    }

    pub fn indices(&self, kind: HandKind) -> Option<&[usize]> {
        self.categories.get(&kind).map(|v| v.as_slice())
    }

    pub fn categories(&self) -> &HashMap<HandKind, Vec<usize>> {
        &self.categories
    }
}

/// Evaluates 1..=5 played cards. Stone cards carry no rank and no suit;
/// debuffed cards keep their rank but contribute no suit.
pub fn evaluate(cards: &[Card], debuffed: &[bool], rules: EvalRules) -> HandEval {
    let mut categories: HashMap<HandKind, Vec<usize>> = HashMap::new();

    let flush = find_flush(cards, debuffed, rules);
    if let Some(indices) = &flush {
        categories.insert(HandKind::Flush, indices.clone());
    }

    let straight = find_straight(cards, rules);
    if let Some(indices) = &straight {
        categories.insert(HandKind::Straight, indices.clone());
        if let Some(flush_indices) = &flush {
            let mut union = indices.clone();
            for &idx in flush_indices {
                if !union.contains(&idx) {
                    union.push(idx);
                }
            }
            union.sort_unstable();
            categories.insert(HandKind::StraightFlush, union);
        }
    }

    // Rank groups, highest value first. Stones carry no order value.
    let groups = rank_groups(cards);
    if let Some(indices) = group_of_size(&groups, 5) {
        categories.insert(HandKind::FiveOfAKind, indices.clone());
        if flush.is_some() {
            categories.insert(HandKind::FlushFive, indices);
        }
    }
    if let Some(indices) = group_of_size(&groups, 4) {
        categories.insert(HandKind::FourOfAKind, indices);
    }
    if let Some(indices) = group_of_size(&groups, 3) {
        categories.insert(HandKind::ThreeOfAKind, indices);
    }
    if let Some(indices) = group_of_size(&groups, 2) {
        categories.insert(HandKind::Pair, indices);
    }
    let pairs: Vec<&Vec<usize>> = groups
        .iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(_, members)| members)
        .collect();
    if pairs.len() >= 2 {
        let mut indices: Vec<usize> = pairs[0][..2].to_vec();
        indices.extend_from_slice(&pairs[1][..2]);
        indices.sort_unstable();
        categories.insert(HandKind::TwoPair, indices);
    }
    if let Some(indices) = find_full_house(&groups) {
        categories.insert(HandKind::FullHouse, indices.clone());
        if flush.is_some() {
            categories.insert(HandKind::FlushHouse, indices);
        }
    }

    if let Some(idx) = highest_card_index(cards) {
        categories.insert(HandKind::HighCard, vec![idx]);
    }

    let mut best = HandKind::HighCard;
    for kind in HandKind::ALL {
        if categories.contains_key(&kind) {
            best = kind;
        }
    }

    HandEval { categories, best }
}

fn flush_threshold(rules: EvalRules) -> usize {
    if rules.four_fingers {
        4
    } else {
        5
    }
}

fn straight_len(rules: EvalRules) -> usize {
    if rules.four_fingers {
        4
    } else {
        5
    }
}

fn max_gap(rules: EvalRules) -> u8 {
    if rules.shortcut {
        2
    } else {
        1
    }
}

fn find_flush(cards: &[Card], debuffed: &[bool], rules: EvalRules) -> Option<Vec<usize>> {
    let threshold = flush_threshold(rules);
    let mut best: Option<Vec<usize>> = None;
    for suit in Suit::STANDARD {
        if rules.smeared && matches!(suit, Suit::Clubs | Suit::Diamonds) {
            continue;
        }
        let indices: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(idx, card)| {
                card.matches_suit(suit, debuffed.get(*idx).copied().unwrap_or(false), rules.smeared)
            })
            .map(|(idx, _)| idx)
            .collect();
        if indices.len() >= threshold {
            let better = match &best {
                Some(current) => indices.len() > current.len(),
                None => true,
            };
            if better {
                best = Some(indices);
            }
        }
    }
    best
}

fn find_straight(cards: &[Card], rules: EvalRules) -> Option<Vec<usize>> {
    let required = straight_len(rules);
    let gap = max_gap(rules);

    // Distinct order values with the first card index carrying each value.
    let mut by_value: Vec<(u8, usize)> = Vec::new();
    for (idx, card) in cards.iter().enumerate() {
        if let Some(value) = card.order_value() {
            if !by_value.iter().any(|(v, _)| *v == value) {
                by_value.push((value, idx));
            }
        }
    }
    if by_value.len() < required {
        return None;
    }

    let mut candidates: Vec<Vec<(u8, usize)>> = Vec::new();
    let mut high = by_value.clone();
    high.sort_unstable_by_key(|(v, _)| *v);
    candidates.push(high);
    if let Some(&(_, ace_idx)) = by_value.iter().find(|(v, _)| *v == 14) {
        let mut low: Vec<(u8, usize)> = by_value
            .iter()
            .map(|&(v, idx)| if v == 14 { (1, ace_idx) } else { (v, idx) })
            .collect();
        low.sort_unstable_by_key(|(v, _)| *v);
        candidates.push(low);
    }

    let mut best: Option<Vec<(u8, usize)>> = None;
    for values in &candidates {
        let mut start = 0;
        for end in 0..values.len() {
            if end > 0 && values[end].0 - values[end - 1].0 > gap {
                start = end;
            }
            let run = &values[start..=end];
            if run.len() >= required {
                let better = match &best {
                    Some(current) => {
                        run.len() > current.len()
                            || (run.len() == current.len()
                                && run.last().map(|(v, _)| *v) > current.last().map(|(v, _)| *v))
                    }
                    None => true,
                };
                if better {
                    best = Some(run.to_vec());
                }
            }
        }
    }

    best.map(|run| {
        let mut indices: Vec<usize> = run.iter().map(|(_, idx)| *idx).collect();
        indices.sort_unstable();
        indices
    })
}

/// Rank groups sorted by descending order value, each with ascending
/// member indices.
fn rank_groups(cards: &[Card]) -> Vec<(u8, Vec<usize>)> {
    let mut groups: Vec<(u8, Vec<usize>)> = Vec::new();
    for (idx, card) in cards.iter().enumerate() {
        let Some(value) = card.order_value() else {
            continue;
        };
        match groups.iter_mut().find(|(v, _)| *v == value) {
            Some((_, members)) => members.push(idx),
            None => groups.push((value, vec![idx])),
        }
    }
    groups.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// Highest-value group with at least `size` members, truncated to `size`.
fn group_of_size(groups: &[(u8, Vec<usize>)], size: usize) -> Option<Vec<usize>> {
    groups
        .iter()
        .find(|(_, members)| members.len() >= size)
        .map(|(_, members)| members[..size].to_vec())
}

fn find_full_house(groups: &[(u8, Vec<usize>)]) -> Option<Vec<usize>> {
    let trips = groups.iter().find(|(_, members)| members.len() >= 3)?;
    let pair = groups
        .iter()
        .find(|(value, members)| *value != trips.0 && members.len() >= 2)?;
    let mut indices: Vec<usize> = trips.1[..3].to_vec();
    indices.extend_from_slice(&pair.1[..2]);
    indices.sort_unstable();
    Some(indices)
}

fn highest_card_index(cards: &[Card]) -> Option<usize> {
    let mut best: Option<(u8, usize)> = None;
    for (idx, card) in cards.iter().enumerate() {
        if let Some(value) = card.order_value() {
            let better = match best {
                Some((top, _)) => value > top,
                None => true,
            };
            if better {
                best = Some((value, idx));
            }
        }
    }
    best.map(|(_, idx)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Enhancement, Rank};

    fn card(suit: Suit, rank: Rank) -> Card {
        Card::standard(suit, rank)
    }

    fn eval(cards: &[Card]) -> HandEval {
        evaluate(cards, &vec![false; cards.len()], EvalRules::default())
    }

    #[test]
    fn pair_registers_high_card_too() {
        let cards = [
            card(Suit::Spades, Rank::Nine),
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::King),
        ];
        let result = eval(&cards);
        assert_eq!(result.best(), HandKind::Pair);
        assert_eq!(result.indices(HandKind::Pair), Some(&[0, 1][..]));
        assert_eq!(result.indices(HandKind::HighCard), Some(&[2][..]));
    }

    #[test]
    fn full_house_contains_two_pair_and_trips() {
        let cards = [
            card(Suit::Spades, Rank::King),
            card(Suit::Hearts, Rank::King),
            card(Suit::Clubs, Rank::King),
            card(Suit::Spades, Rank::Four),
            card(Suit::Hearts, Rank::Four),
        ];
        let result = eval(&cards);
        assert_eq!(result.best(), HandKind::FullHouse);
        assert!(result.contains(HandKind::TwoPair));
        assert!(result.contains(HandKind::ThreeOfAKind));
        assert!(result.contains(HandKind::Pair));
        assert_eq!(result.indices(HandKind::FullHouse), Some(&[0, 1, 2, 3, 4][..]));
        assert_eq!(result.indices(HandKind::TwoPair), Some(&[0, 1, 3, 4][..]));
    }

    #[test]
    fn four_of_a_kind_has_no_two_pair() {
        let cards = [
            card(Suit::Spades, Rank::Seven),
            card(Suit::Hearts, Rank::Seven),
            card(Suit::Clubs, Rank::Seven),
            card(Suit::Diamonds, Rank::Seven),
        ];
        let result = eval(&cards);
        assert_eq!(result.best(), HandKind::FourOfAKind);
        assert!(result.contains(HandKind::ThreeOfAKind));
        assert!(result.contains(HandKind::Pair));
        assert!(!result.contains(HandKind::TwoPair));
    }

    #[test]
    fn five_of_a_kind_with_flush_is_flush_five() {
        let cards = [
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Hearts, Rank::Ace),
        ];
        let result = eval(&cards);
        assert_eq!(result.best(), HandKind::FlushFive);
        assert!(result.contains(HandKind::FiveOfAKind));
        assert!(result.contains(HandKind::FourOfAKind));
        assert!(result.contains(HandKind::Flush));
        assert!(!result.contains(HandKind::FullHouse));
    }

    #[test]
    fn straight_allows_ace_low() {
        let cards = [
            card(Suit::Spades, Rank::Ace),
            card(Suit::Hearts, Rank::Two),
            card(Suit::Clubs, Rank::Three),
            card(Suit::Diamonds, Rank::Four),
            card(Suit::Spades, Rank::Five),
        ];
        let result = eval(&cards);
        assert_eq!(result.best(), HandKind::Straight);
        assert_eq!(result.indices(HandKind::Straight), Some(&[0, 1, 2, 3, 4][..]));
    }

    #[test]
    fn shortcut_widens_straight_gaps() {
        let cards = [
            card(Suit::Spades, Rank::Two),
            card(Suit::Hearts, Rank::Four),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Eight),
            card(Suit::Spades, Rank::Ten),
        ];
        let plain = eval(&cards);
        assert!(!plain.contains(HandKind::Straight));
        let rules = EvalRules {
            shortcut: true,
            ..EvalRules::default()
        };
        let result = evaluate(&cards, &[false; 5], rules);
        assert_eq!(result.best(), HandKind::Straight);
    }

    #[test]
    fn four_fingers_flush_and_straight() {
        let cards = [
            card(Suit::Spades, Rank::Two),
            card(Suit::Spades, Rank::Three),
            card(Suit::Spades, Rank::Four),
            card(Suit::Spades, Rank::Five),
            card(Suit::Hearts, Rank::King),
        ];
        let rules = EvalRules {
            four_fingers: true,
            ..EvalRules::default()
        };
        let result = evaluate(&cards, &[false; 5], rules);
        assert_eq!(result.best(), HandKind::StraightFlush);
        assert_eq!(result.indices(HandKind::Flush), Some(&[0, 1, 2, 3][..]));
        assert_eq!(result.indices(HandKind::StraightFlush), Some(&[0, 1, 2, 3][..]));
    }

    #[test]
    fn straight_flush_unions_straight_and_flush_indices() {
        // Four-card straight inside a five-card flush.
        let cards = [
            card(Suit::Spades, Rank::Two),
            card(Suit::Spades, Rank::Three),
            card(Suit::Spades, Rank::Four),
            card(Suit::Spades, Rank::Five),
            card(Suit::Spades, Rank::Nine),
        ];
        let rules = EvalRules {
            four_fingers: true,
            ..EvalRules::default()
        };
        let result = evaluate(&cards, &[false; 5], rules);
        assert_eq!(result.best(), HandKind::StraightFlush);
        assert_eq!(
            result.indices(HandKind::StraightFlush),
            Some(&[0, 1, 2, 3, 4][..])
        );
    }

    #[test]
    fn smeared_merges_colors_for_flushes() {
        let cards = [
            card(Suit::Hearts, Rank::Two),
            card(Suit::Diamonds, Rank::Five),
            card(Suit::Hearts, Rank::Seven),
            card(Suit::Diamonds, Rank::Nine),
            card(Suit::Hearts, Rank::King),
        ];
        assert!(!eval(&cards).contains(HandKind::Flush));
        let rules = EvalRules {
            smeared: true,
            ..EvalRules::default()
        };
        let result = evaluate(&cards, &[false; 5], rules);
        assert!(result.contains(HandKind::Flush));
    }

    #[test]
    fn debuffed_cards_lose_suit_but_keep_rank() {
        let cards = [
            card(Suit::Clubs, Rank::Two),
            card(Suit::Clubs, Rank::Two),
            card(Suit::Clubs, Rank::Seven),
            card(Suit::Clubs, Rank::Nine),
            card(Suit::Clubs, Rank::King),
        ];
        let debuffed = [true, false, false, false, false];
        let result = evaluate(&cards, &debuffed, EvalRules::default());
        assert!(!result.contains(HandKind::Flush));
        assert_eq!(result.best(), HandKind::Pair);
    }

    #[test]
    fn stones_never_form_categories() {
        let mut stone = card(Suit::Spades, Rank::King);
        stone.enhancement = Some(Enhancement::Stone);
        let result = eval(&[stone, stone]);
        assert!(result.categories().is_empty());
        assert_eq!(result.best(), HandKind::HighCard);

        let mixed = [stone, card(Suit::Hearts, Rank::Three)];
        let result = eval(&mixed);
        assert_eq!(result.indices(HandKind::HighCard), Some(&[1][..]));
    }

    #[test]
    fn wild_cards_count_for_any_flush_suit() {
        let mut wild = card(Suit::Spades, Rank::Two);
        wild.enhancement = Some(Enhancement::Wild);
        let cards = [
            wild,
            card(Suit::Hearts, Rank::Five),
            card(Suit::Hearts, Rank::Seven),
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Hearts, Rank::Jack),
        ];
        assert!(eval(&cards).contains(HandKind::Flush));
    }
}
