//! Fixed-layout byte encoding of a game position.
//!
//! ```text
//! stock_len | stock cards
//! waste_len | waste cards
//! foundation counts (4 bytes, hearts clubs diamonds spades)
//! 7 x (pile_len | pile cards)
//! ```
//!
//! Each card is one byte: bits 0-3 hold `rank - 1`, bits 4-5 `suit - 1` and
//! bit 6 is the face-up flag, only ever set on tableau cards. Foundations
//! only store a count since a foundation is always the ace-up run of its
//! suit. There is no version tag and the draw count is not part of the
//! encoding.

use crate::card::{Card, Suit, ACE, NUM_CARDS_DECK, NUM_RANKS};
use crate::error::{Error, Result};
use crate::game::{Game, TableauCard, NUM_FOUNDATIONS, NUM_TABLEAUS};
use std::collections::HashSet;

const RANK_MASK: u8 = 0b0000_1111;
const SUIT_SHIFT: u8 = 4;
const SUIT_MASK: u8 = 0b0011_0000;
const FACE_UP: u8 = 0b0100_0000;
const RESERVED: u8 = 0b1000_0000;

/// Largest possible encoding: every card listed once plus the length bytes.
pub const MAX_ENCODED_LEN: usize = NUM_CARDS_DECK + 2 + NUM_FOUNDATIONS + NUM_TABLEAUS;

pub fn encode_card(card: Card, face_up: bool) -> u8 {
    let byte = (card.rank() - ACE) | ((card.suit() as u8 - 1) << SUIT_SHIFT);
    if face_up {
        byte | FACE_UP
    } else {
        byte
    }
}

/// Returns the card and its face-up flag.
pub fn decode_card(byte: u8) -> Result<(Card, bool)> {
    if byte & RESERVED != 0 {
        return Err(Error::MalformedState(format!("card byte {:#04x} uses bit 7", byte)));
    }
    let suit = Suit::from_index(((byte & SUIT_MASK) >> SUIT_SHIFT) as usize);
    let card = suit.and_then(|suit| Card::new((byte & RANK_MASK) + ACE, suit));
    match card {
        Some(card) => Ok((card, byte & FACE_UP != 0)),
        None => Err(Error::MalformedState(format!("card byte {:#04x} has no rank", byte))),
    }
}

fn push_len(bytes: &mut Vec<u8>, len: usize) {
    debug_assert!(len <= u8::MAX as usize);
    bytes.push(len as u8);
}

/// Reads the buffer front to back, refusing to run past its end.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn byte(&mut self, what: &str) -> Result<u8> {
        match self.bytes.split_first() {
            Some((&byte, rest)) => {
                self.bytes = rest;
                Ok(byte)
            }
            None => Err(Error::MalformedState(format!("buffer ends before {}", what))),
        }
    }

    fn section(&mut self, what: &str) -> Result<&'a [u8]> {
        let len = self.byte(what)? as usize;
        if len > self.bytes.len() {
            return Err(Error::MalformedState(format!(
                "{} claims {} cards but only {} bytes remain",
                what,
                len,
                self.bytes.len()
            )));
        }
        let (section, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(section)
    }

    /// Stock and waste cards are never face up.
    fn face_down_cards(&mut self, what: &str) -> Result<Vec<Card>> {
        self.section(what)?
            .iter()
            .map(|&byte| match decode_card(byte)? {
                (card, false) => Ok(card),
                (_, true) => Err(Error::MalformedState(format!("face-up card in {}", what))),
            })
            .collect()
    }
}

impl Game {
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(MAX_ENCODED_LEN);
        for pile in [&self.stock, &self.waste] {
            push_len(&mut bytes, pile.len());
            bytes.extend(pile.iter().map(|&card| encode_card(card, false)));
        }
        bytes.extend(self.foundations.iter().map(|f| f.len() as u8));
        for pile in &self.tableaus {
            push_len(&mut bytes, pile.len());
            bytes.extend(pile.iter().map(|slot| encode_card(slot.card, slot.face_up)));
        }
        bytes
    }

    /// Rebuilds a game from `encode` output. The draw count is the default;
    /// use `with_draw` to change it.
    pub fn decode(bytes: &[u8]) -> Result<Game> {
        let mut reader = Reader { bytes };
        let mut game = Game::empty();
        game.stock = reader.face_down_cards("stock")?;
        game.waste = reader.face_down_cards("waste")?;

        for (index, suit) in Suit::ALL.into_iter().enumerate() {
            let count = reader.byte("foundation counts")? as usize;
            if count > NUM_RANKS {
                return Err(Error::MalformedState(format!(
                    "foundation {:?} holds {} cards",
                    suit, count
                )));
            }
            game.foundations[index] = (ACE..ACE + count as u8)
                .filter_map(|rank| Card::new(rank, suit))
                .collect();
        }

        for index in 0..NUM_TABLEAUS {
            let pile = reader
                .section("tableau pile")?
                .iter()
                .map(|&byte| decode_card(byte).map(|(card, face_up)| TableauCard { card, face_up }))
                .collect::<Result<Vec<_>>>()?;
            check_pile(&pile, index)?;
            game.tableaus[index] = pile;
        }

        if !reader.bytes.is_empty() {
            return Err(Error::MalformedState(format!(
                "{} trailing bytes",
                reader.bytes.len()
            )));
        }
        check_deck(&game)?;
        Ok(game)
    }
}

/// Face-up cards form the top of the pile and a non-empty pile shows its top card.
fn check_pile(pile: &[TableauCard], index: usize) -> Result<()> {
    let face_down_above_face_up = pile
        .windows(2)
        .any(|pair| pair[0].face_up && !pair[1].face_up);
    let hidden_top = pile.last().map_or(false, |slot| !slot.face_up);
    if face_down_above_face_up || hidden_top {
        Err(Error::MalformedState(format!(
            "tableau pile {} has a face-down card on top",
            index
        )))
    } else {
        Ok(())
    }
}

fn check_deck(game: &Game) -> Result<()> {
    let mut seen = HashSet::with_capacity(NUM_CARDS_DECK);
    for card in game.cards() {
        if !seen.insert(card) {
            return Err(Error::MalformedState(format!("{:?} appears twice", card)));
        }
    }
    if seen.len() != NUM_CARDS_DECK {
        return Err(Error::MalformedState(format!(
            "{} of {} cards present",
            seen.len(),
            NUM_CARDS_DECK
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit::{Clubs, Diamonds, Hearts, Spades};
    use crate::card::KING;
    use crate::game::DEFAULT_DRAW;
    use crate::tests::card;
    use std::num::NonZeroU8;

    #[test]
    fn card_bits() {
        assert_eq!(encode_card(card(ACE, Hearts), false), 0x00);
        assert_eq!(encode_card(card(KING, Spades), false), 0x3c);
        assert_eq!(encode_card(card(10, Diamonds), true), 0x69);
        assert_eq!(decode_card(0x69), Ok((card(10, Diamonds), true)));
        assert_eq!(decode_card(0x1c), Ok((card(KING, Clubs), false)));
    }

    #[test]
    fn bad_card_bytes() {
        assert!(matches!(decode_card(0x0d), Err(Error::MalformedState(_))));
        assert!(matches!(decode_card(0x80), Err(Error::MalformedState(_))));
    }

    #[test]
    fn fresh_deal_layout() {
        let game = Game::seeded(DEFAULT_DRAW, 8);
        let bytes = game.encode();
        assert_eq!(bytes.len(), 1 + 24 + 1 + 4 + 7 + 28);
        assert_eq!(bytes[0], 24);
        assert_eq!(bytes[25], 0);
        assert_eq!(&bytes[26..30], &[0, 0, 0, 0]);
        assert_eq!(bytes[30], 1);
        assert_eq!(bytes[31] & FACE_UP, FACE_UP);
        assert_eq!(bytes[32], 2);
        assert_eq!(bytes[33] & FACE_UP, 0);
    }

    #[test]
    fn round_trip_after_play() {
        let mut game = Game::seeded(DEFAULT_DRAW, 21);
        for _ in 0..40 {
            let Some(mv) = game.valid_moves().next() else {
                break;
            };
            game.play(mv).unwrap();
            let bytes = game.encode();
            let decoded = Game::decode(&bytes).unwrap();
            assert_eq!(decoded, game);
            assert_eq!(decoded.encode(), bytes);
        }
    }

    #[test]
    fn decode_keeps_default_draw() {
        let game = Game::seeded(NonZeroU8::new(1).unwrap(), 2);
        let decoded = Game::decode(&game.encode()).unwrap();
        assert_eq!(decoded.n_draw(), DEFAULT_DRAW);
        assert_eq!(decoded.with_draw(game.n_draw()).n_draw().get(), 1);
    }

    #[test]
    fn foundations_rebuild_as_runs() {
        let mut game = Game::seeded(DEFAULT_DRAW, 3);
        // Move every card of hearts onto its foundation by hand.
        let hearts: Vec<Card> = (ACE..=KING).map(|rank| card(rank, Hearts)).collect();
        game.stock.retain(|c| c.suit() != Hearts);
        game.waste.retain(|c| c.suit() != Hearts);
        for pile in game.tableaus.iter_mut() {
            pile.retain(|slot| slot.card.suit() != Hearts);
            if let Some(top) = pile.last_mut() {
                top.face_up = true;
            }
        }
        game.foundations[Hearts.index()] = hearts.iter().copied().collect();
        let decoded = Game::decode(&game.encode()).unwrap();
        assert_eq!(decoded.foundation(Hearts), hearts.as_slice());
        assert_eq!(decoded, game);
    }

    #[test]
    fn truncated_buffers() {
        let bytes = Game::seeded(DEFAULT_DRAW, 4).encode();
        for len in [0, 1, 10, 26, 29, bytes.len() - 1] {
            assert!(matches!(
                Game::decode(&bytes[..len]),
                Err(Error::MalformedState(_))
            ));
        }
    }

    #[test]
    fn trailing_bytes() {
        let mut bytes = Game::seeded(DEFAULT_DRAW, 4).encode();
        bytes.push(0);
        assert!(matches!(Game::decode(&bytes), Err(Error::MalformedState(_))));
    }

    #[test]
    fn face_up_stock_card() {
        let mut bytes = Game::seeded(DEFAULT_DRAW, 4).encode();
        bytes[1] |= FACE_UP;
        assert!(matches!(Game::decode(&bytes), Err(Error::MalformedState(_))));
    }

    #[test]
    fn hidden_tableau_top() {
        let mut bytes = Game::seeded(DEFAULT_DRAW, 4).encode();
        // Pile 0 holds a single face-up card right after its length byte.
        bytes[31] &= !FACE_UP;
        assert!(matches!(Game::decode(&bytes), Err(Error::MalformedState(_))));
    }

    #[test]
    fn duplicate_card() {
        let mut bytes = Game::seeded(DEFAULT_DRAW, 4).encode();
        bytes[2] = bytes[1];
        assert!(matches!(Game::decode(&bytes), Err(Error::MalformedState(_))));
    }

    #[test]
    fn oversized_foundation() {
        let mut bytes = Game::seeded(DEFAULT_DRAW, 4).encode();
        bytes[26] = 14;
        assert!(matches!(Game::decode(&bytes), Err(Error::MalformedState(_))));
    }
}
