//! Deterministic decks and a toy evaluator for tests and examples.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::{Card, Deck, HandEvaluator, HandRank};

/// A deck that deals a fixed card sequence. Shuffling rewinds it, so every
/// hand replays the same cards.
pub struct StackedDeck {
    cards: Vec<Card>,
    next: usize,
}

impl StackedDeck {
    pub fn new(cards: Vec<Card>) -> Self {
        StackedDeck { cards, next: 0 }
    }

    /// The 52 card indices in ascending order.
    pub fn sequential() -> Self {
        StackedDeck::new((0..52).map(Card).collect())
    }
}

impl Deck for StackedDeck {
    fn shuffle(&mut self) {
        self.next = 0;
    }

    fn deal(&mut self) -> Option<Card> {
        let card = self.cards.get(self.next).copied();
        self.next += 1;
        card
    }
}

/// A 52 card deck shuffled with a seeded generator, for tests that want
/// variety without losing reproducibility.
pub struct ShuffledDeck {
    cards: Vec<Card>,
    next: usize,
    rng: StdRng,
}

impl ShuffledDeck {
    pub fn from_seed(seed: u64) -> Self {
        ShuffledDeck {
            cards: (0..52).map(Card).collect(),
            next: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Deck for ShuffledDeck {
    fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.next = 0;
    }

    fn deal(&mut self) -> Option<Card> {
        let card = self.cards.get(self.next).copied();
        self.next += 1;
        card
    }
}

/// Ranks a hand by its hole card indices alone, ignoring the board. High
/// card wins, second card breaks ties. Handy because the winner is obvious
/// from the stacked deck order.
pub struct HighCardEvaluator;

impl HandEvaluator for HighCardEvaluator {
    fn evaluate(&self, hole: &[Card; 2], _community: &[Card]) -> HandRank {
        let high = hole[0].0.max(hole[1].0) as u64;
        let low = hole[0].0.min(hole[1].0) as u64;
        HandRank((high << 8) | low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacked_deck_rewinds_on_shuffle() {
        let mut deck = StackedDeck::sequential();
        assert_eq!(deck.deal(), Some(Card(0)));
        assert_eq!(deck.deal(), Some(Card(1)));
        deck.shuffle();
        assert_eq!(deck.deal(), Some(Card(0)));
    }

    #[test]
    fn test_shuffled_deck_is_reproducible() {
        let mut a = ShuffledDeck::from_seed(42);
        let mut b = ShuffledDeck::from_seed(42);
        a.shuffle();
        b.shuffle();
        for _ in 0..52 {
            assert_eq!(a.deal(), b.deal());
        }
        assert_eq!(a.deal(), None);
    }

    #[test]
    fn test_high_card_evaluator_orders_by_hole_cards() {
        let eval = HighCardEvaluator;
        let strong = eval.evaluate(&[Card(50), Card(3)], &[]);
        let weak = eval.evaluate(&[Card(40), Card(39)], &[]);
        assert!(strong > weak);
        // Order within the hole pair does not matter.
        assert_eq!(
            eval.evaluate(&[Card(3), Card(50)], &[]),
            eval.evaluate(&[Card(50), Card(3)], &[])
        );
    }
}
