use crate::card::{can_be_placed_on_top_of, can_build_on_foundation, is_king, Card};
use crate::error::{Error, Result};
use crate::game::{
    foundation_index, tableau_index, Game, TableauCard, NUM_FOUNDATIONS, NUM_TABLEAUS,
};
use serde::{Deserialize, Serialize};
use std::iter;

/// One player action. Pile indices are 0-based.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Turn up to `n_draw` cards from the stock onto the waste, recycling
    /// the waste first when the stock is empty.
    DrawStock,
    WasteToFoundation,
    WasteToTableau(usize),
    TableauToFoundation(usize),
    /// (foundation, tableau)
    FoundationToTableau(usize, usize),
    /// Moves the top `count` cards of `from` onto `to`. Without a count the
    /// deepest legal run is picked.
    TableauToTableau {
        from: usize,
        to: usize,
        count: Option<usize>,
    },
}

impl Move {
    pub fn is_foundation_move(&self) -> bool {
        matches!(self, Move::WasteToFoundation | Move::TableauToFoundation(_))
    }
}

/// Number of face-up cards at the top of a tableau pile.
pub fn face_up_len(pile: &[TableauCard]) -> usize {
    pile.iter().rev().take_while(|slot| slot.face_up).count()
}

/// A run is face up and descends by one rank with alternating colors.
pub fn is_run(cards: &[TableauCard]) -> bool {
    cards.iter().all(|slot| slot.face_up)
        && cards
            .windows(2)
            .all(|pair| can_be_placed_on_top_of(pair[0].card, pair[1].card))
}

impl Game {
    fn can_move_card_to_foundation(&self, card: Card) -> bool {
        can_build_on_foundation(self.foundations[card.suit().index()].last().copied(), card)
    }

    fn can_move_card_to_tableau(&self, card: Card, tableau_idx: usize) -> bool {
        match self.tableaus[tableau_idx].last() {
            Some(top) => top.face_up && can_be_placed_on_top_of(top.card, card),
            None => is_king(card),
        }
    }

    fn exposed_card(&self, tableau_idx: usize) -> Result<Card> {
        self.tableaus[tableau_idx]
            .last()
            .filter(|slot| slot.face_up)
            .map(|slot| slot.card)
            .ok_or(Error::EmptyPile)
    }

    fn waste_card(&self) -> Result<Card> {
        self.waste.last().copied().ok_or(Error::EmptyPile)
    }

    /// Resolves how many cards a tableau-to-tableau move carries.
    fn check_run(&self, from: usize, to: usize, count: Option<usize>) -> Result<usize> {
        let from = tableau_index(from)?;
        let to = tableau_index(to)?;
        if from == to {
            return Err(Error::IllegalDestination);
        }
        let pile = &self.tableaus[from];
        let movable = face_up_len(pile);
        let fits = |n: usize| {
            let run = &pile[pile.len() - n..];
            self.can_move_card_to_tableau(run[0].card, to) && is_run(run)
        };
        match count {
            Some(n) if n > pile.len() => Err(Error::InsufficientCards),
            Some(n) if n == 0 || n > movable => Err(Error::EmptyPile),
            Some(n) if fits(n) => Ok(n),
            Some(_) => Err(Error::IllegalDestination),
            None if movable == 0 => Err(Error::EmptyPile),
            None => (1..=movable)
                .rev()
                .find(|&n| fits(n))
                .ok_or(Error::IllegalDestination),
        }
    }

    /// Decides whether `mv` is legal without touching the game. On success
    /// the returned move is fully resolved: a tableau-to-tableau move always
    /// carries the count it would move.
    pub fn check(&self, mv: Move) -> Result<Move> {
        match mv {
            Move::DrawStock => {
                if self.stock.is_empty() && self.waste.is_empty() {
                    Err(Error::EmptyPile)
                } else {
                    Ok(mv)
                }
            }
            Move::WasteToFoundation => {
                let card = self.waste_card()?;
                if self.can_move_card_to_foundation(card) {
                    Ok(mv)
                } else {
                    Err(Error::IllegalDestination)
                }
            }
            Move::WasteToTableau(to) => {
                let to = tableau_index(to)?;
                let card = self.waste_card()?;
                if self.can_move_card_to_tableau(card, to) {
                    Ok(mv)
                } else {
                    Err(Error::IllegalDestination)
                }
            }
            Move::TableauToFoundation(from) => {
                let card = self.exposed_card(tableau_index(from)?)?;
                if self.can_move_card_to_foundation(card) {
                    Ok(mv)
                } else {
                    Err(Error::IllegalDestination)
                }
            }
            Move::FoundationToTableau(from, to) => {
                let from = foundation_index(from)?;
                let to = tableau_index(to)?;
                let card = *self.foundations[from].last().ok_or(Error::EmptyPile)?;
                if self.can_move_card_to_tableau(card, to) {
                    Ok(mv)
                } else {
                    Err(Error::IllegalDestination)
                }
            }
            Move::TableauToTableau { from, to, count } => {
                let count = self.check_run(from, to, count)?;
                Ok(Move::TableauToTableau {
                    from,
                    to,
                    count: Some(count),
                })
            }
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.check(mv).is_ok()
    }

    /// Validates and applies `mv`. Either the whole move happens or the
    /// game is left exactly as it was.
    pub fn play(&mut self, mv: Move) -> Result<Move> {
        let resolved = self.check(mv)?;
        self.apply(resolved);
        Ok(resolved)
    }

    /// Only called with moves `check` resolved.
    fn apply(&mut self, mv: Move) {
        match mv {
            Move::DrawStock => {
                if self.stock.is_empty() {
                    self.waste.reverse();
                    std::mem::swap(&mut self.stock, &mut self.waste);
                }
                for _ in 0..self.n_draw.get() {
                    match self.stock.pop() {
                        Some(card) => self.waste.push(card),
                        None => break,
                    }
                }
            }
            Move::WasteToFoundation => {
                if let Some(card) = self.waste.pop() {
                    self.foundations[card.suit().index()].push(card);
                }
            }
            Move::WasteToTableau(to) => {
                if let Some(card) = self.waste.pop() {
                    self.tableaus[to].push(TableauCard::face_up(card));
                }
            }
            Move::TableauToFoundation(from) => {
                if let Some(slot) = self.tableaus[from].pop() {
                    self.foundations[slot.card.suit().index()].push(slot.card);
                    self.expose(from);
                }
            }
            Move::FoundationToTableau(from, to) => {
                if let Some(card) = self.foundations[from].pop() {
                    self.tableaus[to].push(TableauCard::face_up(card));
                }
            }
            Move::TableauToTableau { from, to, count } => {
                let pile = &mut self.tableaus[from];
                let at = pile.len() - count.unwrap_or(0);
                let run = pile.split_off(at);
                self.tableaus[to].extend(run);
                self.expose(from);
            }
        }
    }

    pub fn draw_from_stock(&mut self) -> Result<()> {
        self.play(Move::DrawStock).map(drop)
    }

    pub fn move_waste_to_foundation(&mut self) -> Result<()> {
        self.play(Move::WasteToFoundation).map(drop)
    }

    pub fn move_waste_to_tableau(&mut self, to: usize) -> Result<()> {
        self.play(Move::WasteToTableau(to)).map(drop)
    }

    pub fn move_tableau_to_foundation(&mut self, from: usize) -> Result<()> {
        self.play(Move::TableauToFoundation(from)).map(drop)
    }

    pub fn move_foundation_to_tableau(&mut self, from: usize, to: usize) -> Result<()> {
        self.play(Move::FoundationToTableau(from, to)).map(drop)
    }

    /// Returns the number of cards moved.
    pub fn move_tableau_to_tableau(
        &mut self,
        from: usize,
        to: usize,
        count: Option<usize>,
    ) -> Result<usize> {
        match self.play(Move::TableauToTableau { from, to, count })? {
            Move::TableauToTableau { count: Some(n), .. } => Ok(n),
            _ => unreachable!("check resolves the run length"),
        }
    }

    /// Every move shape worth asking the validator about, in a fixed order.
    fn candidate_moves(&self) -> impl Iterator<Item = Move> + '_ {
        let from_waste = iter::once(Move::WasteToFoundation)
            .chain((0..NUM_TABLEAUS).map(Move::WasteToTableau));
        let to_foundation = (0..NUM_TABLEAUS).map(Move::TableauToFoundation);
        let between_tableaus = (0..NUM_TABLEAUS).flat_map(move |from| {
            let movable = face_up_len(&self.tableaus[from]);
            (0..NUM_TABLEAUS)
                .filter(move |&to| to != from)
                .flat_map(move |to| {
                    (1..=movable).rev().map(move |n| Move::TableauToTableau {
                        from,
                        to,
                        count: Some(n),
                    })
                })
        });
        let from_foundation = (0..NUM_FOUNDATIONS)
            .flat_map(|from| (0..NUM_TABLEAUS).map(move |to| Move::FoundationToTableau(from, to)));
        from_waste
            .chain(to_foundation)
            .chain(between_tableaus)
            .chain(from_foundation)
            .chain(iter::once(Move::DrawStock))
    }

    /// All currently legal moves. Each call starts a fresh pass in the same order.
    pub fn valid_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.candidate_moves().filter(move |mv| self.is_legal(*mv))
    }
}
