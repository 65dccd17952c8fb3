//! Klondike solitaire: deck, layout, move rules, win detection and a
//! compact state encoding, plus a bounded solver for batch analysis.

pub mod card;
pub mod codec;
pub mod deck;
pub mod display;
pub mod error;
pub mod game;
pub mod moves;
pub mod sim;
pub mod solver;
pub mod win;

#[cfg(test)]
mod tests;

pub use card::{Card, Color, Rank, Suit};
pub use deck::Deck;
pub use error::{Error, Result};
pub use game::{Game, TableauCard, DEFAULT_DRAW, NUM_FOUNDATIONS, NUM_TABLEAUS};
pub use moves::Move;
