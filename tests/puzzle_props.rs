//! Property tests for the grid engine.
//!
//! Grids, seeds, walk lengths and click sequences are generated; the
//! arrangement must stay a permutation with one fixed hole, moves must undo
//! themselves, rejected clicks must change nothing, and every shuffle must be
//! a replayable walk of legal slides that never steps straight back.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use slide_puzzle::{GridConfig, MoveResult, Position, Puzzle, TileId};

fn assert_permutation(puzzle: &Puzzle) {
    let config = puzzle.config();
    let cells: HashSet<Position> = puzzle.tiles().iter().map(|t| t.current()).collect();
    assert_eq!(cells.len(), config.tile_count());
    for cell in &cells {
        assert!(cell.x < config.width && cell.y < config.height);
    }
    for tile in puzzle.tiles() {
        assert_eq!(puzzle.tile_at(tile.current()), Some(tile.id()));
    }
}

fn assert_single_empty(puzzle: &Puzzle, expected: TileId) {
    let empties: Vec<TileId> = puzzle
        .tiles()
        .iter()
        .filter(|t| t.is_empty())
        .map(|t| t.id())
        .collect();
    assert_eq!(empties, vec![expected]);
}

fn snapshot(puzzle: &Puzzle) -> Vec<(Position, bool)> {
    puzzle
        .tiles()
        .iter()
        .map(|t| (t.current(), t.is_empty()))
        .collect()
}

fn grid() -> impl Strategy<Value = GridConfig> {
    (2usize..=5, 2usize..=5).prop_map(|(w, h)| GridConfig::new(w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn permutation_and_single_empty_hold(
        config in grid(),
        seed in any::<u64>(),
        steps in 0usize..200,
        clicks in proptest::collection::vec(0usize..30, 0..100),
    ) {
        let mut puzzle = Puzzle::new(config).unwrap();
        let hole = puzzle.empty_tile().id();
        prop_assert_eq!(hole, TileId(config.tile_count() - 1));

        let _ = puzzle.shuffle(steps, &mut StdRng::seed_from_u64(seed));
        assert_permutation(&puzzle);
        assert_single_empty(&puzzle, hole);

        for click in clicks {
            let _ = puzzle.try_move(TileId(click));
            assert_permutation(&puzzle);
            assert_single_empty(&puzzle, hole);
        }
        prop_assert!(puzzle.is_solvable());
    }

    #[test]
    fn move_then_same_tile_again_restores(
        config in grid(),
        seed in any::<u64>(),
        steps in 0usize..100,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut puzzle = Puzzle::new(config).unwrap();
        let _ = puzzle.shuffle(steps, &mut StdRng::seed_from_u64(seed));
        let before = snapshot(&puzzle);

        let movable: Vec<TileId> = puzzle.movable_tiles().collect();
        let tile = movable[pick.index(movable.len())];

        prop_assert!(puzzle.try_move(tile).is_applied());
        // The tile now sits where the hole was, so it is still next to it.
        prop_assert!(puzzle.try_move(tile).is_applied());
        prop_assert_eq!(snapshot(&puzzle), before);
    }

    #[test]
    fn rejected_moves_change_nothing(
        config in grid(),
        seed in any::<u64>(),
        steps in 0usize..100,
    ) {
        let mut puzzle = Puzzle::new(config).unwrap();
        let _ = puzzle.shuffle(steps, &mut StdRng::seed_from_u64(seed));
        let hole = puzzle.empty_tile().id();
        let before = snapshot(&puzzle);

        for index in 0..config.tile_count() + 3 {
            let id = TileId(index);
            if puzzle.is_adjacent(id, hole) {
                continue;
            }
            prop_assert_eq!(puzzle.try_move(id), MoveResult::Rejected);
            prop_assert_eq!(snapshot(&puzzle), before.clone());
        }
    }

    #[test]
    fn shuffle_is_a_replayable_walk(
        config in grid(),
        seed in any::<u64>(),
        steps in 0usize..300,
    ) {
        let mut shuffled = Puzzle::new(config).unwrap();
        let walk = shuffled.shuffle(steps, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(walk.len(), steps);

        let mut replay = Puzzle::new(config).unwrap();
        for &tile in &walk {
            prop_assert!(replay.try_move(tile).is_applied());
        }
        prop_assert_eq!(replay.tile_render_order(), shuffled.tile_render_order());
    }

    #[test]
    fn shuffle_never_steps_straight_back(
        config in grid(),
        seed in any::<u64>(),
        steps in 2usize..300,
    ) {
        let mut puzzle = Puzzle::new(config).unwrap();
        let walk = puzzle.shuffle(steps, &mut StdRng::seed_from_u64(seed));
        for pair in walk.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn render_order_matches_positions(
        config in grid(),
        seed in any::<u64>(),
        steps in 0usize..100,
    ) {
        let mut puzzle = Puzzle::new(config).unwrap();
        let _ = puzzle.shuffle(steps, &mut StdRng::seed_from_u64(seed));
        let order = puzzle.tile_render_order();

        let mut slots = order.clone();
        slots.sort_unstable();
        prop_assert_eq!(slots, (0..config.tile_count()).collect::<Vec<_>>());
        for (index, slot) in order.into_iter().enumerate() {
            prop_assert_eq!(puzzle.tile_at(Position::from_slot(slot, config.width)), Some(TileId(index)));
        }
        prop_assert_eq!(
            puzzle.is_solved(),
            puzzle.tiles().iter().all(|t| t.current() == t.original())
        );
    }
}
