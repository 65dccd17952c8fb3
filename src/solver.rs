use crate::game::Game;
use crate::moves::Move;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NODE_BUDGET: usize = 200_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Positions expanded before the search gives up.
    pub node_budget: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Moves from the starting position to a won one.
    Solved(Vec<Move>),
    /// Every reachable position was visited without a win.
    Unsolvable,
    /// The node budget ran out first.
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub verdict: Verdict,
    pub nodes: usize,
}

/// Lower sorts first. Foundation moves and moves out of the waste come
/// before shuffling cards around the tableau.
fn priority(mv: &Move) -> u8 {
    match mv {
        Move::WasteToFoundation | Move::TableauToFoundation(_) => 0,
        Move::TableauToTableau { .. } => 1,
        Move::WasteToTableau(_) => 2,
        Move::DrawStock => 3,
        Move::FoundationToTableau(..) => 4,
    }
}

/// Depth-first search over legal moves. Positions are deduplicated by their
/// encoded bytes.
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, original_game: &Game) -> Search {
        let mut visited_game_states = FxHashSet::default();
        visited_game_states.insert(original_game.encode());
        // (position, depth, move that led here)
        let mut states_to_visit = vec![(original_game.clone(), 0usize, None)];
        let mut line: Vec<Move> = Vec::new();
        let mut nodes = 0;

        while let Some((state, depth, last_move)) = states_to_visit.pop() {
            line.truncate(depth.saturating_sub(1));
            if let Some(mv) = last_move {
                line.push(mv);
            }
            if state.is_won() {
                log::debug!("solved in {} moves after {} nodes", line.len(), nodes);
                return Search {
                    verdict: Verdict::Solved(line),
                    nodes,
                };
            }
            if nodes >= self.config.node_budget {
                log::debug!("node budget of {} exhausted", self.config.node_budget);
                return Search {
                    verdict: Verdict::Unknown,
                    nodes,
                };
            }
            nodes += 1;

            let mut valid_moves: Vec<Move> = state.valid_moves().collect();
            // Pushed in reverse so the best move is popped first.
            valid_moves.sort_by_key(|mv| std::cmp::Reverse(priority(mv)));
            for valid_move in valid_moves {
                let mut next = state.clone();
                if next.play(valid_move).is_err() {
                    continue;
                }
                if visited_game_states.insert(next.encode()) {
                    states_to_visit.push((next, depth + 1, Some(valid_move)));
                }
            }
        }
        log::debug!("search space exhausted after {} nodes", nodes);
        Search {
            verdict: Verdict::Unsolvable,
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit::{Clubs, Diamonds, Hearts, Spades};
    use crate::card::{ACE, KING};
    use crate::tests::{card, down, up};

    fn nearly_done() -> Game {
        let mut game = Game::empty();
        for suit in [Clubs, Spades] {
            game.foundations[suit.index()] = (ACE..=KING).map(|rank| card(rank, suit)).collect();
        }
        game.foundations[Hearts.index()] = (ACE..=11).map(|rank| card(rank, Hearts)).collect();
        game.foundations[Diamonds.index()] = (ACE..=10).map(|rank| card(rank, Diamonds)).collect();
        game
    }

    fn replay(mut game: Game, line: &[Move]) -> Game {
        for mv in line {
            game.play(*mv).unwrap();
        }
        game
    }

    #[test]
    fn won_position_needs_no_moves() {
        let search = Solver::new(SolverConfig::default()).solve(&nearly_done());
        assert_eq!(search.verdict, Verdict::Solved(vec![]));
        assert_eq!(search.nodes, 0);
    }

    #[test]
    fn uncovers_a_hidden_card() {
        let mut game = nearly_done();
        game.foundations[Hearts.index()].pop();
        // Q of hearts is buried under the J of diamonds; J and K of hearts wait in the stock.
        game.tableaus[0] = vec![down(12, Hearts), up(11, Diamonds)];
        game.tableaus[1] = vec![up(KING, Diamonds), up(12, Diamonds)];
        game.stock = vec![card(KING, Hearts), card(11, Hearts)];
        assert!(!game.is_won());

        let search = Solver::new(SolverConfig::default()).solve(&game);
        let line = match search.verdict {
            Verdict::Solved(line) => line,
            other => panic!("expected a solution, got {:?}", other),
        };
        assert!(!line.is_empty());
        assert!(replay(game, &line).is_won());
    }

    #[test]
    fn dead_position_is_unsolvable() {
        let mut game = Game::empty();
        // Two face-down cards with nothing that can ever free them.
        game.tableaus[0] = vec![down(2, Hearts), up(5, Spades)];
        game.tableaus[1] = vec![down(3, Hearts), up(5, Clubs)];
        let search = Solver::new(SolverConfig::default()).solve(&game);
        assert_eq!(search.verdict, Verdict::Unsolvable);
        assert_eq!(search.nodes, 1);
    }

    #[test]
    fn budget_stops_the_search() {
        let game = Game::seeded(crate::game::DEFAULT_DRAW, 9);
        let search = Solver::new(SolverConfig { node_budget: 5 }).solve(&game);
        assert!(search.nodes <= 5);
        if let Verdict::Solved(line) = &search.verdict {
            assert!(replay(game, line).is_won());
        }
    }
}
