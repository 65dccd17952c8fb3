use crate::card::{Card, Suit, NUM_RANKS};
use crate::game::{Game, TableauCard};
use crate::moves::Move;
use colored::Colorize;
use std::fmt;

const HIDDEN: &str = "XX";

fn rank_glyph(card: Card) -> &'static str {
    ["A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K"][card.rank() as usize - 1]
}

fn suit_glyph(suit: Suit) -> &'static str {
    match suit {
        Suit::Hearts => "♥",
        Suit::Clubs => "♣",
        Suit::Diamonds => "♦",
        Suit::Spades => "♠",
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = format!("{}{}", rank_glyph(*self), suit_glyph(self.suit()));
        if self.is_red() {
            write!(f, "{}", text.bright_red())
        } else {
            write!(f, "{}", text.bright_black())
        }
    }
}

impl fmt::Display for TableauCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.face_up {
            write!(f, "{}", self.card)
        } else {
            write!(f, "{}", HIDDEN.blue())
        }
    }
}

/// Pile numbers are shown 1-based.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Move::DrawStock => write!(f, "draw from stock"),
            Move::WasteToFoundation => write!(f, "waste -> foundation"),
            Move::WasteToTableau(to) => write!(f, "waste -> tableau {}", to + 1),
            Move::TableauToFoundation(from) => write!(f, "tableau {} -> foundation", from + 1),
            Move::FoundationToTableau(from, to) => {
                let suit = Suit::from_index(from).map_or("?", suit_glyph);
                write!(f, "foundation {} -> tableau {}", suit, to + 1)
            }
            Move::TableauToTableau { from, to, count } => {
                write!(f, "tableau {} -> tableau {}", from + 1, to + 1)?;
                match count {
                    Some(n) if n > 1 => write!(f, " ({} cards)", n),
                    _ => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n--------- Foundations ---------")?;
        Suit::ALL.iter().try_for_each(|&suit| {
            let pile = self.foundation(suit);
            match pile.last() {
                Some(card) if pile.len() == NUM_RANKS => write!(f, "[{}*]\t", card),
                Some(card) => write!(f, "[{}]\t", card),
                None => write!(f, "[{}]\t", suit_glyph(suit)),
            }
        })?;
        writeln!(f)?;
        writeln!(f, "--------- Tableaus ------------")?;
        self.tableaus.iter().enumerate().try_for_each(|(idx, pile)| {
            write!(f, "{}: ", idx + 1)?;
            pile.iter().try_for_each(|slot| write!(f, "{}\t", slot))?;
            writeln!(f)
        })?;
        writeln!(f, "--------- Stock ---------------")?;
        writeln!(f, "{} cards", self.stock().len())?;
        writeln!(f, "--------- Waste ---------------")?;
        self.waste().iter().try_for_each(|card| write!(f, "{} ", card))
    }
}
