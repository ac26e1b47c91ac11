use super::board::SolverBoard;
use super::{random_unknown, Action, Strategy};
use crate::codec::Tile;
use crate::Cell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// Cells a deduction pass has proven safe or proven to be mines.
#[derive(Debug, Clone, Default)]
pub struct Deductions {
    pub safe: HashSet<Cell>,
    pub mines: HashSet<Cell>,
}

impl Deductions {
    pub fn is_empty(&self) -> bool {
        self.safe.is_empty() && self.mines.is_empty()
    }
}

/// Single-cell logical inference over the current board; one pass, no memory.
///
/// For every positive revealed count: if the flagged neighbors already account
/// for the whole count, the remaining unknown neighbors are safe; if flagged
/// plus unknown neighbors exactly meet the count, the unknown neighbors are
/// all mines.
pub fn deduce(board: &SolverBoard) -> Deductions {
    let mut result = Deductions::default();

    for (cell, count) in board.numbered_cells() {
        let mut unknown = Vec::new();
        let mut flagged = 0usize;

        for neighbor in board.neighbors(cell) {
            match board.get(neighbor) {
                Tile::Unknown => unknown.push(neighbor),
                Tile::Flagged => flagged += 1,
                _ => {}
            }
        }
        if unknown.is_empty() {
            continue;
        }

        let count = count as usize;
        if flagged == count {
            result.safe.extend(unknown);
        } else if flagged + unknown.len() == count {
            result.mines.extend(unknown);
        }
    }

    result
}

/// Strategy built on [`deduce`] alone, with a uniform-random fallback.
///
/// Deduced actions are queued across calls and re-checked against the latest
/// board before being returned, since a cascade may have revealed a queued
/// cell in the meantime.
pub struct Deduction {
    to_click: Vec<Cell>,
    to_flag: Vec<Cell>,
    rng: StdRng,
}

impl Deduction {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            to_click: Vec::new(),
            to_flag: Vec::new(),
            rng,
        }
    }

    fn pop_pending(&mut self, board: &SolverBoard) -> Option<Action> {
        while let Some(cell) = self.to_click.pop() {
            if board.get(cell) == Tile::Unknown {
                return Some(Action::Click(cell));
            }
        }
        while let Some(cell) = self.to_flag.pop() {
            if board.get(cell) == Tile::Unknown {
                return Some(Action::Flag(cell));
            }
        }
        None
    }
}

impl Default for Deduction {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Deduction {
    fn name(&self) -> &str {
        "deduction"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        if let Some(action) = self.pop_pending(board) {
            return action;
        }

        let deductions = deduce(board);
        let mut safe: Vec<Cell> = deductions.safe.into_iter().collect();
        let mut mines: Vec<Cell> = deductions.mines.into_iter().collect();
        safe.sort_unstable();
        mines.sort_unstable();
        self.to_click.extend(safe);
        self.to_flag.extend(mines);

        if let Some(action) = self.pop_pending(board) {
            return action;
        }
        random_unknown(board, &mut self.rng)
    }
}
