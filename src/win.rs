use crate::card::{NUM_CARDS_DECK, NUM_RANKS};
use crate::game::Game;
use crate::moves::Move;

impl Game {
    pub fn are_foundations_complete(&self) -> bool {
        self.foundations.iter().all(|f| f.len() == NUM_RANKS)
    }

    /// Every tableau card is showing and at most one card is left to draw.
    /// A heuristic: the rest of the game only needs foundation moves.
    pub fn can_auto_solve(&self) -> bool {
        self.tableaus.iter().flatten().all(|slot| slot.face_up)
            && self.stock.len() + self.waste.len() <= 1
    }

    pub fn is_won(&self) -> bool {
        self.are_foundations_complete() || self.can_auto_solve()
    }

    /// Plays foundation moves, drawing when none is available, until the
    /// foundations stop growing. Returns the moves played.
    pub fn auto_complete(&mut self) -> Vec<Move> {
        let mut played = Vec::new();
        let mut idle_draws = 0;
        while !self.are_foundations_complete() {
            let next = self.valid_moves().find(Move::is_foundation_move);
            let mv = match next {
                Some(mv) => {
                    idle_draws = 0;
                    mv
                }
                // One full pass over stock and waste without progress means we are stuck.
                None if idle_draws <= self.stock.len() + self.waste.len() => {
                    idle_draws += 1;
                    Move::DrawStock
                }
                None => break,
            };
            match self.play(mv) {
                Ok(mv) => played.push(mv),
                Err(_) => break,
            }
            if played.len() > NUM_CARDS_DECK * NUM_CARDS_DECK {
                break;
            }
        }
        played
    }
}
