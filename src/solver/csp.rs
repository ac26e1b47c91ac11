use super::board::SolverBoard;
use super::constraints::ConstraintStore;
use super::deduction::deduce;
use super::enumerate::least_likely_mine;
use super::{random_unknown, Action, Strategy};
use crate::Cell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// Incremental constraint-satisfaction strategy.
///
/// The first move always opens the board center, which empirically opens the
/// largest cascade. After that every call runs the constraint pipeline:
/// prune newly revealed cells, drain the action queues, ingest new
/// constraints, resolve trivially, reduce by subset. When the pipeline
/// produces nothing the strategy has to guess: [`Csp::propose`] reports that
/// by returning `None`, and composites decide what to try before randomness.
pub struct Csp {
    store: ConstraintStore,
    seen_revealed: HashSet<Cell>,
    first_move: bool,
    rng: StdRng,
}

impl Csp {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            store: ConstraintStore::new(),
            seen_revealed: HashSet::new(),
            first_move: true,
            rng,
        }
    }

    /// Runs the constraint pipeline; `None` means no deduced action exists
    /// and the caller must fall back to a guess.
    pub fn propose(&mut self, board: &SolverBoard) -> Option<Action> {
        if self.first_move {
            self.first_move = false;
            let (height, width) = board.dimensions();
            return Some(Action::Click(Cell::new(height / 2, width / 2)));
        }

        let newly_revealed: HashSet<Cell> = board
            .revealed_counts()
            .map(|(cell, _)| cell)
            .filter(|cell| !self.seen_revealed.contains(cell))
            .collect();
        self.store.prune(&newly_revealed);
        self.seen_revealed.extend(newly_revealed);

        if let Some(action) = self.store.pop_action(board) {
            return Some(action);
        }

        self.store.add_constraints(board);
        self.store.resolve_trivial();
        self.store.reduce_by_subset();
        self.store.pop_action(board)
    }
}

impl Default for Csp {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Csp {
    fn name(&self) -> &str {
        "csp"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        self.propose(board)
            .unwrap_or_else(|| random_unknown(board, &mut self.rng))
    }
}

/// CSP, then one deduction pass, then random.
pub struct CspDeduction {
    csp: Csp,
    rng: StdRng,
}

impl CspDeduction {
    pub fn new() -> Self {
        Self {
            csp: Csp::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            csp: Csp::with_seed(seed),
            rng: StdRng::seed_from_u64(seed ^ 1),
        }
    }
}

impl Default for CspDeduction {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for CspDeduction {
    fn name(&self) -> &str {
        "csp+deduction"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        if let Some(action) = self.csp.propose(board) {
            return action;
        }
        if let Some(action) = deduced_action(board) {
            return action;
        }
        random_unknown(board, &mut self.rng)
    }
}

/// CSP, then bounded enumeration, then random.
pub struct CspEnumeration {
    csp: Csp,
    rng: StdRng,
}

impl CspEnumeration {
    pub fn new() -> Self {
        Self {
            csp: Csp::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            csp: Csp::with_seed(seed),
            rng: StdRng::seed_from_u64(seed ^ 1),
        }
    }
}

impl Default for CspEnumeration {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for CspEnumeration {
    fn name(&self) -> &str {
        "csp+enumeration"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        if let Some(action) = self.csp.propose(board) {
            return action;
        }
        if let Some(cell) = least_likely_mine(board) {
            return Action::Click(cell);
        }
        random_unknown(board, &mut self.rng)
    }
}

/// The full pipeline: CSP, then deduction, then enumeration, then random.
pub struct CspDeductionEnumeration {
    csp: Csp,
    rng: StdRng,
}

impl CspDeductionEnumeration {
    pub fn new() -> Self {
        Self {
            csp: Csp::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            csp: Csp::with_seed(seed),
            rng: StdRng::seed_from_u64(seed ^ 1),
        }
    }
}

impl Default for CspDeductionEnumeration {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for CspDeductionEnumeration {
    fn name(&self) -> &str {
        "csp+deduction+enumeration"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        if let Some(action) = self.csp.propose(board) {
            return action;
        }
        if let Some(action) = deduced_action(board) {
            return action;
        }
        if let Some(cell) = least_likely_mine(board) {
            return Action::Click(cell);
        }
        random_unknown(board, &mut self.rng)
    }
}

/// One fresh deduction pass boiled down to a single action; clicks win over
/// flags, the lowest cell in row-major order wins within each kind.
fn deduced_action(board: &SolverBoard) -> Option<Action> {
    let deductions = deduce(board);
    if let Some(&cell) = deductions.safe.iter().min() {
        return Some(Action::Click(cell));
    }
    deductions.mines.iter().min().map(|&cell| Action::Flag(cell))
}
