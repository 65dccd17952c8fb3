use crate::card::{Card, Suit, NUM_CARDS_DECK, NUM_RANKS, NUM_SUITS};
use crate::deck::Deck;
use crate::error::{Error, Result};
use arrayvec::ArrayVec;
use derivative::Derivative;
use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU8;

pub const NUM_TABLEAUS: usize = 7;
pub const NUM_FOUNDATIONS: usize = NUM_SUITS;

pub const DEFAULT_DRAW: NonZeroU8 = match NonZeroU8::new(3) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableauCard {
    pub card: Card,
    pub face_up: bool,
}

impl TableauCard {
    pub fn face_up(card: Card) -> Self {
        Self { card, face_up: true }
    }

    pub fn face_down(card: Card) -> Self {
        Self { card, face_up: false }
    }
}

pub type TableauPile = Vec<TableauCard>;
pub type FoundationPile = ArrayVec<Card, NUM_RANKS>;

/// A Klondike layout plus the number of cards moved per draw.
///
/// Equality and hashing look at the piles only; the draw count is
/// configuration, not position.
#[derive(Clone, Debug, Derivative)]
#[derivative(PartialEq, Eq, Hash)]
pub struct Game {
    pub(crate) tableaus: [TableauPile; NUM_TABLEAUS],
    /// Indexed by `Suit::index`.
    pub(crate) foundations: [FoundationPile; NUM_FOUNDATIONS],
    pub(crate) stock: Vec<Card>,
    pub(crate) waste: Vec<Card>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub(crate) n_draw: NonZeroU8,
}

/// A freshly shuffled deal with the default draw count.
impl Default for Game {
    fn default() -> Self {
        Self::new(DEFAULT_DRAW)
    }
}

impl Game {
    /// A board with no cards anywhere. Only a starting point for `deal`,
    /// `decode` and hand-built positions.
    pub(crate) fn empty() -> Self {
        Self {
            tableaus: Default::default(),
            foundations: Default::default(),
            stock: Vec::new(),
            waste: Vec::new(),
            n_draw: DEFAULT_DRAW,
        }
    }

    /// Deals a freshly shuffled deck.
    pub fn new(n_draw: NonZeroU8) -> Self {
        Self::with_rng(n_draw, &mut thread_rng())
    }

    /// Deals a reproducible game for `seed`.
    pub fn seeded(n_draw: NonZeroU8, seed: u64) -> Self {
        Self::with_rng(n_draw, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(n_draw: NonZeroU8, rng: &mut R) -> Self {
        let mut deck = Deck::new();
        deck.shuffle(rng);
        match Self::deal(deck, n_draw) {
            Ok(game) => game,
            Err(_) => unreachable!("a full deck always deals"),
        }
    }

    /// Deals `deck` in its current order: rows of the triangle first, then
    /// the remaining cards onto the stock, the last one drawn on top.
    ///
    /// A deck that has already had cards drawn is `InsufficientCards`.
    pub fn deal(mut deck: Deck, n_draw: NonZeroU8) -> Result<Self> {
        if deck.len() != NUM_CARDS_DECK {
            return Err(Error::InsufficientCards);
        }
        let mut game = Self {
            n_draw,
            ..Self::empty()
        };
        for i in 0..NUM_TABLEAUS {
            for j in i..NUM_TABLEAUS {
                let card = deck.draw()?;
                game.tableaus[j].push(TableauCard {
                    card,
                    face_up: i == j,
                });
            }
        }
        while !deck.is_empty() {
            game.stock.push(deck.draw()?);
        }
        Ok(game)
    }

    /// Throws the current layout away and deals a new one with the same draw count.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::with_rng(self.n_draw, rng);
    }

    pub fn with_draw(mut self, n_draw: NonZeroU8) -> Self {
        self.n_draw = n_draw;
        self
    }

    pub fn n_draw(&self) -> NonZeroU8 {
        self.n_draw
    }

    pub fn tableau(&self, index: usize) -> Result<&[TableauCard]> {
        Ok(&self.tableaus[tableau_index(index)?])
    }

    pub fn foundation(&self, suit: Suit) -> &[Card] {
        &self.foundations[suit.index()]
    }

    pub fn stock(&self) -> &[Card] {
        &self.stock
    }

    pub fn waste(&self) -> &[Card] {
        &self.waste
    }

    /// Total number of cards already on the foundations.
    pub fn foundation_cards(&self) -> usize {
        self.foundations.iter().map(|f| f.len()).sum()
    }

    /// Every card in play, wherever it currently lies.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.tableaus
            .iter()
            .flat_map(|pile| pile.iter().map(|slot| slot.card))
            .chain(self.foundations.iter().flatten().copied())
            .chain(self.stock.iter().copied())
            .chain(self.waste.iter().copied())
    }

    /// Turns the top of a tableau pile face up after cards leave it.
    pub(crate) fn expose(&mut self, index: usize) {
        if let Some(top) = self.tableaus[index].last_mut() {
            top.face_up = true;
        }
    }
}

pub(crate) fn tableau_index(index: usize) -> Result<usize> {
    if index < NUM_TABLEAUS {
        Ok(index)
    } else {
        Err(Error::PileOutOfRange {
            index,
            piles: NUM_TABLEAUS,
        })
    }
}

pub(crate) fn foundation_index(index: usize) -> Result<usize> {
    if index < NUM_FOUNDATIONS {
        Ok(index)
    } else {
        Err(Error::PileOutOfRange {
            index,
            piles: NUM_FOUNDATIONS,
        })
    }
}
