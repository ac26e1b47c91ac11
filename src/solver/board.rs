use crate::codec::Tile;
use crate::{Cell, Game};
use ndarray::ArrayView2;

/// A snapshot of the visible board handed to strategies.
///
/// Strategies only ever see this view, never the hidden grid; the total mine
/// count rides along because the enumeration engine needs the global budget.
#[derive(Debug, Clone, Copy)]
pub struct SolverBoard<'a> {
    grid: ArrayView2<'a, i8>,
    total_mines: usize,
}

impl<'a> SolverBoard<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self {
            grid: game.visible(),
            total_mines: game.mine_count(),
        }
    }

    /// Builds a view from a raw visible grid, for tests and scaffolding.
    pub fn from_parts(grid: ArrayView2<'a, i8>, total_mines: usize) -> Self {
        Self { grid, total_mines }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dim()
    }

    pub fn total_mines(&self) -> usize {
        self.total_mines
    }

    pub fn get(&self, cell: Cell) -> Tile {
        Tile::from_raw(self.grid[[cell.row, cell.col]]).expect("invalid visible-board encoding")
    }

    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let (height, width) = self.dimensions();
        cell.neighbors(height, width)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (height, width) = self.dimensions();
        (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }

    pub fn unknown_cells(&self) -> Vec<Cell> {
        self.cells()
            .filter(|&c| self.get(c) == Tile::Unknown)
            .collect()
    }

    pub fn flagged_cells(&self) -> impl Iterator<Item = Cell> + '_ + use<'_, 'a> {
        self.cells().filter(|&c| self.get(c) == Tile::Flagged)
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_cells().count()
    }

    /// Revealed cells together with their counts.
    pub fn revealed_counts(&self) -> impl Iterator<Item = (Cell, u8)> + '_ + use<'_, 'a> {
        self.cells().filter_map(|c| match self.get(c) {
            Tile::Count(n) => Some((c, n)),
            _ => None,
        })
    }

    /// Revealed cells with a positive count, i.e. the constraint sources.
    pub fn numbered_cells(&self) -> impl Iterator<Item = (Cell, u8)> + '_ + use<'_, 'a> {
        self.revealed_counts().filter(|&(_, n)| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::UNKNOWN;
    use ndarray::arr2;

    #[test]
    fn test_snapshot_of_fresh_game() {
        let game = Game::with_mines(3, 3, [Cell::new(0, 0)]).unwrap();
        let board = SolverBoard::new(&game);

        assert_eq!(board.dimensions(), (3, 3));
        assert_eq!(board.total_mines(), 1);
        assert_eq!(board.unknown_cells().len(), 9);
        assert_eq!(board.revealed_counts().count(), 0);
    }

    #[test]
    fn test_tile_queries() {
        let grid = arr2(&[[1, UNKNOWN], [-3, 0]]);
        let board = SolverBoard::from_parts(grid.view(), 1);

        assert_eq!(board.get(Cell::new(0, 0)), Tile::Count(1));
        assert_eq!(board.get(Cell::new(0, 1)), Tile::Unknown);
        assert_eq!(board.get(Cell::new(1, 0)), Tile::Flagged);
        assert_eq!(board.unknown_cells(), vec![Cell::new(0, 1)]);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.numbered_cells().collect::<Vec<_>>(), vec![(Cell::new(0, 0), 1)]);
    }
}
