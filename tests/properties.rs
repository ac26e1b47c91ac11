use autosweeper::codec::UNKNOWN;
use autosweeper::solver::{deduce, SolverBoard};
use autosweeper::{Cell, Game, Outcome};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Small configurations exercised by the randomized invariants below:
/// board dimensions, a valid mine count, and an RNG seed for the layout.
fn configs() -> impl Strategy<Value = (usize, usize, usize, u64)> {
    (2usize..=8, 2usize..=8)
        .prop_flat_map(|(h, w)| (Just(h), Just(w), 1..h * w, any::<u64>()))
}

proptest! {
    #[test]
    fn first_click_never_loses((h, w, m, seed) in configs(), click_index in 0usize..64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_rng(h, w, m, &mut rng).unwrap();

        let cell = Cell::new(click_index / w % h, click_index % w);
        game.click(cell);
        prop_assert_ne!(game.outcome(), Outcome::Lost);
    }

    #[test]
    fn mine_count_is_conserved((h, w, m, seed) in configs(), click_index in 0usize..64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_rng(h, w, m, &mut rng).unwrap();
        prop_assert_eq!(game.mines().len(), m);

        // Relocation on a first-click mine must preserve the count.
        let cell = Cell::new(click_index / w % h, click_index % w);
        game.click(cell);
        prop_assert_eq!(game.mines().len(), m);
    }

    #[test]
    fn cascades_close_over_zero_regions((h, w, m, seed) in configs(), clicks in proptest::collection::vec(0usize..64, 1..8)) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_rng(h, w, m, &mut rng).unwrap();

        for click_index in clicks {
            game.click(Cell::new(click_index / w % h, click_index % w));
        }

        // Every revealed cell is visible and is not a mine; every revealed
        // zero has its whole neighborhood revealed.
        for &cell in game.revealed() {
            prop_assert_ne!(game.visible()[[cell.row, cell.col]], UNKNOWN);
            prop_assert!(!game.mines().contains(&cell));
            if game.visible()[[cell.row, cell.col]] == 0 {
                for neighbor in cell.neighbors(h, w) {
                    prop_assert!(game.revealed().contains(&neighbor));
                }
            }
        }
    }

    #[test]
    fn win_requires_exactly_the_mine_set((h, w, m, seed) in configs()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_rng(h, w, m, &mut rng).unwrap();

        let mut mines: Vec<Cell> = game.mines().iter().copied().collect();
        mines.sort_unstable();

        // All but one mine flagged: not a win.
        for &mine in &mines[1..] {
            game.flag(mine);
        }
        prop_assert_ne!(game.outcome(), Outcome::Won);

        // The last one completes the exact set.
        game.flag(mines[0]);
        prop_assert_eq!(game.outcome(), Outcome::Won);
    }

    #[test]
    fn deduction_is_sound_on_revealed_boards((h, w, m, seed) in configs()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_rng(h, w, m, &mut rng).unwrap();

        // Reveal every safe cell; the resulting numbers are fully consistent.
        let safe: Vec<Cell> = (0..h)
            .flat_map(|r| (0..w).map(move |c| Cell::new(r, c)))
            .filter(|cell| !game.mines().contains(cell))
            .collect();
        for cell in safe {
            game.click(cell);
        }

        let board = SolverBoard::new(&game);
        let deductions = deduce(&board);
        for cell in &deductions.mines {
            prop_assert!(game.mines().contains(cell));
        }
        for cell in &deductions.safe {
            prop_assert!(!game.mines().contains(cell));
        }
    }
}
