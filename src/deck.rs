use crate::card::{Card, NUM_CARDS_DECK};
use crate::error::{Error, Result};
use arrayvec::ArrayVec;
use rand::{seq::SliceRandom, Rng};

/// The 52 cards before they are dealt. The top of the deck is the last element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: ArrayVec<Card, NUM_CARDS_DECK>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        Self {
            cards: Card::all().collect(),
        }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn peek(&self) -> Result<Card> {
        self.cards.last().copied().ok_or(Error::EmptyDeck)
    }

    pub fn draw(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(Error::EmptyDeck)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Suit, KING};
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn fresh_deck_top_is_king_of_spades() {
        let deck = Deck::new();
        assert_eq!(deck.len(), 52);
        assert_eq!(deck.peek(), Ok(Card::new(KING, Suit::Spades).unwrap()));
    }

    #[test]
    fn draw_until_empty() {
        let mut deck = Deck::new();
        let mut seen = HashSet::new();
        while !deck.is_empty() {
            let top = deck.peek().unwrap();
            assert_eq!(deck.draw(), Ok(top));
            assert!(seen.insert(top));
        }
        assert_eq!(seen.len(), 52);
        assert_eq!(deck.draw(), Err(Error::EmptyDeck));
        assert_eq!(deck.peek(), Err(Error::EmptyDeck));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut deck = Deck::new();
        deck.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(deck.len(), 52);
        let cards: HashSet<Card> = deck.cards.iter().copied().collect();
        assert_eq!(cards.len(), 52);
        assert_ne!(deck, Deck::new());
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle(&mut StdRng::seed_from_u64(99));
        b.shuffle(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
