//! Randomized playout properties.

use chess_rules::{rules, Game};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random legal playouts never leave the mover's king attacked, never
    /// capture a same-color piece, and keep the grid and registry in sync.
    #[test]
    fn playouts_preserve_invariants(choices in prop::collection::vec(any::<u16>(), 0..60)) {
        let mut game = Game::new();
        for choice in choices {
            let moves = rules::legal_moves_for(game.board(), game.turn());
            if moves.is_empty() {
                break;
            }
            let mv = moves[choice as usize % moves.len()];

            if let Some(cap) = mv.captured {
                prop_assert_ne!(
                    game.board().piece(cap).color,
                    game.board().piece(mv.piece).color
                );
            }

            let mover = game.turn();
            game.submit_move(mv.from, mv.to, None).unwrap();

            prop_assert!(game.board().is_consistent());
            prop_assert!(!rules::is_targeted(
                game.board(),
                mover.opposite(),
                game.board().king_square(mover)
            ));
        }
    }

    /// Generating moves is a pure query: repeating it after an arbitrary
    /// playout yields the identical list.
    #[test]
    fn generation_is_stable(choices in prop::collection::vec(any::<u16>(), 0..30)) {
        let mut game = Game::new();
        for choice in choices {
            let moves = rules::legal_moves_for(game.board(), game.turn());
            if moves.is_empty() {
                break;
            }
            let mv = moves[choice as usize % moves.len()];
            game.submit_move(mv.from, mv.to, None).unwrap();
        }

        let first = rules::legal_moves_for(game.board(), game.turn());
        let second = rules::legal_moves_for(game.board(), game.turn());
        prop_assert_eq!(first, second);
    }
}
