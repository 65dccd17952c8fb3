use crate::card::{Card, Rank, Suit, NUM_CARDS_DECK};
use crate::error::Error;
use crate::game::{Game, TableauCard, DEFAULT_DRAW};
use crate::moves::Move;
use std::collections::HashSet;

pub(crate) fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit).unwrap()
}

pub(crate) fn up(rank: Rank, suit: Suit) -> TableauCard {
    TableauCard::face_up(card(rank, suit))
}

pub(crate) fn down(rank: Rank, suit: Suit) -> TableauCard {
    TableauCard::face_down(card(rank, suit))
}

pub fn is_valid_game_state(game: &Game) -> bool {
    let distinct: HashSet<Card> = game.cards().collect();
    let foundations_are_runs = Suit::ALL.iter().all(|&suit| {
        game.foundation(suit)
            .iter()
            .enumerate()
            .all(|(idx, card)| card.suit() == suit && card.rank() as usize == idx + 1)
    });
    let face_up_on_top = game.tableaus.iter().all(|pile| {
        pile.windows(2).all(|pair| !pair[0].face_up || pair[1].face_up)
            && pile.last().map_or(true, |top| top.face_up)
    });

    game.cards().count() == NUM_CARDS_DECK
        && distinct.len() == NUM_CARDS_DECK
        && foundations_are_runs
        && face_up_on_top
}

#[test]
fn setup_is_valid() {
    for seed in 0..20 {
        assert!(is_valid_game_state(&Game::seeded(DEFAULT_DRAW, seed)));
    }
}

#[test]
fn stock_recycles_instead_of_failing() {
    let mut game = Game::seeded(DEFAULT_DRAW, 17);
    let mut draws = 0;
    while !game.stock().is_empty() {
        game.draw_from_stock().unwrap();
        draws += 1;
    }
    assert_eq!(draws, 8);
    assert_eq!(game.waste().len(), 24);
    let oldest = game.waste()[0];
    let second = game.waste()[1];
    let third = game.waste()[2];

    game.draw_from_stock().unwrap();
    assert_eq!(game.stock().len(), 21);
    assert_eq!(game.waste(), &[oldest, second, third]);
    assert!(is_valid_game_state(&game));
}

#[test]
fn non_ace_to_empty_foundation_changes_nothing() {
    let mut game = Game::seeded(DEFAULT_DRAW, 0);
    let (idx, _) = (0..7)
        .map(|idx| (idx, game.tableau(idx).unwrap().last().unwrap().card))
        .find(|(_, card)| card.rank() != 1)
        .unwrap();
    let before = game.encode();
    assert_eq!(
        game.move_tableau_to_foundation(idx),
        Err(Error::IllegalDestination)
    );
    assert_eq!(game.encode(), before);
}

#[test]
fn failed_moves_leave_state_untouched() {
    for seed in 0..10 {
        let game = Game::seeded(DEFAULT_DRAW, seed);
        let legal: HashSet<Move> = game.valid_moves().collect();
        for from in 0..7 {
            for to in 0..7 {
                for count in [None, Some(1), Some(2), Some(9)] {
                    let mv = Move::TableauToTableau { from, to, count };
                    let mut copy = game.clone();
                    match copy.play(mv) {
                        Ok(resolved) => assert!(legal.contains(&resolved)),
                        Err(_) => assert_eq!(copy.encode(), game.encode()),
                    }
                }
            }
        }
    }
}

#[test]
fn greedy_playout_keeps_invariants() {
    let mut game = Game::seeded(DEFAULT_DRAW, 1234);
    for _ in 0..300 {
        let moves: Vec<Move> = game.valid_moves().collect();
        // Prefer anything but drawing so the tableau actually changes.
        let Some(&mv) = moves.iter().find(|mv| **mv != Move::DrawStock).or(moves.last()) else {
            break;
        };
        let foundation_before = game.foundation_cards();
        game.play(mv).unwrap();
        assert!(is_valid_game_state(&game));
        if mv.is_foundation_move() {
            assert_eq!(game.foundation_cards(), foundation_before + 1);
        }
    }
}
