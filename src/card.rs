use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub type Rank = u8;

pub const ACE: Rank = 1;
pub const KING: Rank = 13;

pub const NUM_SUITS: usize = 4;
pub const NUM_RANKS: usize = 13;
pub const NUM_CARDS_DECK: usize = NUM_SUITS * NUM_RANKS;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 1,
    Clubs = 2,
    Diamonds = 3,
    Spades = 4,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Suit {
    pub const ALL: [Suit; NUM_SUITS] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

    /// Zero-based position, also the foundation pile this suit builds on.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_index(index: usize) -> Option<Suit> {
        Self::ALL.get(index).copied()
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    pub fn is_red(self) -> bool {
        self.color() == Color::Red
    }
}

/// A playing card. Ranks run from 1 (Ace) to 13 (King).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Option<Card> {
        (ACE..=KING).contains(&rank).then_some(Card { rank, suit })
    }

    pub fn rank(self) -> Rank {
        self.rank
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    pub fn color(self) -> Color {
        self.suit.color()
    }

    pub fn is_red(self) -> bool {
        self.suit.is_red()
    }

    /// Every card in canonical order: all ranks of hearts, then clubs, diamonds, spades.
    pub fn all() -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| (ACE..=KING).map(move |rank| Card { rank, suit }))
    }
}

/// Cards only compare by rank within the same suit.
impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.suit == other.suit).then(|| self.rank.cmp(&other.rank))
    }
}

pub fn is_ace(card: Card) -> bool {
    card.rank == ACE
}

pub fn is_king(card: Card) -> bool {
    card.rank == KING
}

pub fn are_card_ranks_sequential(bottom: Card, top: Card) -> bool {
    top.rank + 1 == bottom.rank
}

pub fn are_card_colors_different(card1: Card, card2: Card) -> bool {
    card1.color() != card2.color()
}

pub fn are_card_suits_the_same(card1: Card, card2: Card) -> bool {
    card1.suit == card2.suit
}

/// Tableau rule: `top` goes on `bottom` when colors alternate and `top` is one rank lower.
pub fn can_be_placed_on_top_of(bottom: Card, top: Card) -> bool {
    are_card_ranks_sequential(bottom, top) && are_card_colors_different(bottom, top)
}

/// Foundation rule: `card` goes on a foundation whose current top is `top`.
pub fn can_build_on_foundation(top: Option<Card>, card: Card) -> bool {
    match top {
        None => is_ace(card),
        Some(top) => are_card_suits_the_same(top, card) && card.rank == top.rank + 1,
    }
}
