use crate::cards::Card;
use crate::rng::RngState;
use serde::{Deserialize, Serialize};

/// Draw and discard piles. The top of the draw pile is the last element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            draw: cards,
            discard: Vec::new(),
        }
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    /// Pops up to `count` cards; the caller reshuffles when it wants the
    /// discard pile back in play.
    pub fn draw_cards(&mut self, count: usize) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw.pop() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    pub fn discard_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards);
    }

    pub fn reshuffle_discard(&mut self, rng: &mut RngState) {
        if self.discard.is_empty() {
            return;
        }
        self.draw.append(&mut self.discard);
        self.shuffle(rng);
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn total(&self) -> usize {
        self.draw.len() + self.discard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn draw_stops_at_empty_pile() {
        let cards = vec![
            Card::standard(Suit::Spades, Rank::Two),
            Card::standard(Suit::Hearts, Rank::Three),
        ];
        let mut deck = Deck::new(cards);
        let drawn = deck.draw_cards(5);
        assert_eq!(drawn.len(), 2);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn reshuffle_returns_discards_to_draw() {
        let mut deck = Deck::new(vec![Card::standard(Suit::Spades, Rank::Two)]);
        let drawn = deck.draw_cards(1);
        deck.discard_cards(drawn);
        assert_eq!(deck.remaining(), 0);
        deck.reshuffle_discard(&mut RngState::from_seed(0));
        assert_eq!(deck.remaining(), 1);
        assert!(deck.discard.is_empty());
    }
}
