use crate::codec::{self, FLAGGED, MINE, UNKNOWN};
use crate::{Cell, GameError};
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// A Minesweeper game: the authoritative hidden grid plus the player-visible
/// grid, mutated only through [`Game::click`] and [`Game::flag`].
///
/// Terminal outcomes are absorbing: once `outcome()` reports `Won` or `Lost`,
/// `click` and `flag` are no-ops.
#[derive(Debug)]
pub struct Game {
    height: usize,
    width: usize,
    mine_count: usize,
    /// Hidden grid: `-1` mine, `0..=8` adjacent-mine count.
    board: Array2<i8>,
    /// Visible grid: `-2` unknown, `-3` flag, `0..=8` revealed count.
    vboard: Array2<i8>,
    mines: HashSet<Cell>,
    flags: HashSet<Cell>,
    revealed: HashSet<Cell>,
    first_click: bool,
    failed: bool,
}

impl Game {
    /// Creates a game with a uniformly random mine layout.
    pub fn new(height: usize, width: usize, mine_count: usize) -> Result<Self, GameError> {
        Self::with_rng(height, width, mine_count, &mut rand::thread_rng())
    }

    /// Creates a game drawing the mine layout from the supplied generator.
    pub fn with_rng<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mine_count: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let mut game = Self::empty(height, width, mine_count)?;

        // Rejection sampling: re-draw until `mine_count` distinct cells hold a mine.
        while game.mines.len() < mine_count {
            let cell = Cell::new(rng.gen_range(0..height), rng.gen_range(0..width));
            if game.mines.insert(cell) {
                game.board[[cell.row, cell.col]] = MINE;
            }
        }
        game.populate();
        Ok(game)
    }

    /// Creates a game with a fixed mine layout, for scripted scenarios.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, GameError> {
        let mines: HashSet<Cell> = mines.into_iter().collect();
        let mut game = Self::empty(height, width, mines.len())?;

        for &mine in &mines {
            if mine.row >= height || mine.col >= width {
                return Err(GameError::MineOutOfBounds(mine));
            }
            game.board[[mine.row, mine.col]] = MINE;
        }
        game.mines = mines;
        game.populate();
        Ok(game)
    }

    fn empty(height: usize, width: usize, mine_count: usize) -> Result<Self, GameError> {
        if mine_count >= height * width {
            return Err(GameError::InvalidConfiguration {
                height,
                width,
                mines: mine_count,
            });
        }
        Ok(Self {
            height,
            width,
            mine_count,
            board: Array2::zeros((height, width)),
            vboard: Array2::from_elem((height, width), UNKNOWN),
            mines: HashSet::new(),
            flags: HashSet::new(),
            revealed: HashSet::new(),
            first_click: true,
            failed: false,
        })
    }

    /// Recomputes the adjacency count of every non-mine cell on the hidden grid.
    fn populate(&mut self) {
        for row in 0..self.height {
            for col in 0..self.width {
                if self.board[[row, col]] != MINE {
                    self.board[[row, col]] = self.adjacent_mines(Cell::new(row, col)) as i8;
                }
            }
        }
    }

    fn adjacent_mines(&self, cell: Cell) -> u8 {
        cell.neighbors(self.height, self.width)
            .filter(|n| self.board[[n.row, n.col]] == MINE)
            .count() as u8
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.board[[cell.row, cell.col]] == MINE
    }

    /// Clicks a cell, progressing the game.
    ///
    /// The first click of a game is always safe: if it lands on a mine, the
    /// mine is relocated before the cell is revealed. Any later click on a
    /// mine loses the game.
    pub fn click(&mut self, cell: Cell) {
        if self.outcome() != Outcome::InProgress {
            return;
        }
        if self.first_click {
            self.first_click = false;
            if self.is_mine(cell) {
                self.relocate_mine(cell);
            }
        }
        if self.is_mine(cell) {
            self.failed = true;
        } else {
            self.reveal(cell);
        }
    }

    /// Moves the mine under a first click to the first non-mine cell in
    /// row-major order, then recomputes all adjacency counts.
    fn relocate_mine(&mut self, cell: Cell) {
        let target = (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| Cell::new(row, col)))
            .find(|&c| !self.is_mine(c))
            .expect("configuration guarantees at least one safe cell");

        self.board[[target.row, target.col]] = MINE;
        self.board[[cell.row, cell.col]] = 0;
        self.mines.remove(&cell);
        self.mines.insert(target);
        self.populate();
    }

    /// Reveals a cell, cascading through zero-count regions.
    ///
    /// Flood fill over an explicit work stack; the `revealed` membership
    /// check keeps the cascade from looping. Must only be called on
    /// non-mines.
    fn reveal(&mut self, cell: Cell) {
        let mut stack = vec![cell];
        while let Some(current) = stack.pop() {
            if !self.revealed.insert(current) {
                continue;
            }
            let count = self.board[[current.row, current.col]];
            assert!(count != MINE, "revealed a mine at {current:?}");
            self.vboard[[current.row, current.col]] = count;

            if count == 0 {
                for neighbor in current.neighbors(self.height, self.width) {
                    if !self.revealed.contains(&neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
        }
    }

    /// Flags a cell as a suspected mine.
    ///
    /// Flagging more cells than there are mines loses the game.
    pub fn flag(&mut self, cell: Cell) {
        if self.outcome() != Outcome::InProgress {
            return;
        }
        self.vboard[[cell.row, cell.col]] = FLAGGED;
        self.flags.insert(cell);
        if self.flags.len() > self.mine_count {
            self.failed = true;
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.failed {
            Outcome::Lost
        } else if self.flags == self.mines {
            Outcome::Won
        } else {
            Outcome::InProgress
        }
    }

    /// The player-visible grid.
    pub fn visible(&self) -> ArrayView2<'_, i8> {
        self.vboard.view()
    }

    /// The hidden grid. For harness and test scaffolding; strategies only
    /// ever see [`Game::visible`].
    pub fn hidden(&self) -> ArrayView2<'_, i8> {
        self.board.view()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn revealed(&self) -> &HashSet<Cell> {
        &self.revealed
    }
}

impl fmt::Display for Game {
    /// Renders the visible board: `X` mine, `F` flag, blank unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(2 * self.width + 1);
        for row in 0..self.height {
            writeln!(f, "{separator}")?;
            for col in 0..self.width {
                let tile = codec::Tile::from_raw(self.vboard[[row, col]]);
                let symbol = match tile {
                    Some(codec::Tile::Count(n)) => char::from_digit(n as u32, 10).unwrap_or('?'),
                    Some(codec::Tile::Mine) => 'X',
                    Some(codec::Tile::Flagged) => 'F',
                    _ => ' ',
                };
                write!(f, "|{symbol}")?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "{separator}")
    }
}
