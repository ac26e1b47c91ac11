use super::board::SolverBoard;
use super::Action;
use crate::codec::Tile;
use crate::Cell;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// One revealed numbered cell's outstanding obligation: the neighbors still
/// unknown to the store and how many of them must be mines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    unknowns: HashSet<Cell>,
    remaining: usize,
}

impl Constraint {
    #[cfg(test)]
    pub fn new(unknowns: impl IntoIterator<Item = Cell>, remaining: usize) -> Self {
        Self {
            unknowns: unknowns.into_iter().collect(),
            remaining,
        }
    }

    pub fn unknowns(&self) -> &HashSet<Cell> {
        &self.unknowns
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn is_trivial_mine(&self) -> bool {
        self.unknowns.len() == self.remaining
    }
}

/// Incremental constraint state for one game, maintained across moves.
///
/// Unlike the single-pass deduction engine, the store remembers constraints,
/// pending actions, and retired constraint sources between calls. All emitted
/// actions are sound; the store is deliberately not complete (no n-ary
/// solving), so callers fall back to enumeration or randomness when it runs
/// dry.
#[derive(Debug, Default)]
pub struct ConstraintStore {
    constraints: HashMap<Cell, Constraint>,
    retired: HashSet<Cell>,
    to_click: Vec<Cell>,
    to_flag: Vec<Cell>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a constraint for every revealed numbered cell that is neither
    /// live nor already retired: its currently-unknown neighbors, and its
    /// number minus the neighbors already flagged.
    pub fn add_constraints(&mut self, board: &SolverBoard) {
        for (cell, count) in board.numbered_cells() {
            if self.constraints.contains_key(&cell) || self.retired.contains(&cell) {
                continue;
            }
            let mut unknowns = HashSet::new();
            let mut flagged = 0usize;
            for neighbor in board.neighbors(cell) {
                match board.get(neighbor) {
                    Tile::Unknown => {
                        unknowns.insert(neighbor);
                    }
                    Tile::Flagged => flagged += 1,
                    _ => {}
                }
            }
            let remaining = (count as usize).saturating_sub(flagged);
            self.constraints.insert(cell, Constraint { unknowns, remaining });
        }
    }

    /// Drops cells that became known since the last call from every live
    /// constraint's unknown set. Remaining counts are untouched: they are
    /// only adjusted by explicit mine/safe propagation.
    pub fn prune(&mut self, newly_revealed: &HashSet<Cell>) {
        for constraint in self.constraints.values_mut() {
            for cell in newly_revealed {
                constraint.unknowns.remove(cell);
            }
        }
    }

    /// Runs trivial mine/safe resolution to a fixed point.
    ///
    /// Each pass strictly shrinks the total unknown cardinality across all
    /// constraints, so the loop terminates.
    pub fn resolve_trivial(&mut self) {
        loop {
            let changed = self.resolve_trivial_mines() | self.resolve_trivial_safe();
            if !changed {
                break;
            }
        }
    }

    /// One pass over constraints whose unknowns must all be mines
    /// (`|unknowns| == remaining`). A fully satisfied constraint (both zero)
    /// is retired silently; otherwise every unknown is queued for flagging,
    /// the constraint retired, and the mine removed from every other
    /// constraint with its remaining count decremented, since the mine is
    /// now explained.
    pub fn resolve_trivial_mines(&mut self) -> bool {
        let mut changed = false;
        let candidates: Vec<Cell> = self
            .constraints
            .iter()
            .filter(|(_, c)| c.is_trivial_mine())
            .map(|(&key, _)| key)
            .collect();

        for key in candidates {
            let Some(constraint) = self.constraints.remove(&key) else {
                continue;
            };
            // An earlier retirement in this pass may have rewritten it.
            if !constraint.is_trivial_mine() {
                self.constraints.insert(key, constraint);
                continue;
            }
            self.retired.insert(key);
            changed = true;

            for mine in constraint.unknowns {
                self.to_flag.push(mine);
                for other in self.constraints.values_mut() {
                    if other.unknowns.remove(&mine) {
                        debug_assert!(other.remaining > 0, "mine removal underflowed {other:?}");
                        other.remaining -= 1;
                    }
                }
            }
        }
        changed
    }

    /// Symmetric pass: a constraint with `remaining == 0` proves every
    /// unknown safe. Queued for clicking, the constraint retired, and the
    /// cell removed from every other constraint, without touching their
    /// remaining counts, since no mine was consumed.
    pub fn resolve_trivial_safe(&mut self) -> bool {
        let mut changed = false;
        let candidates: Vec<Cell> = self
            .constraints
            .iter()
            .filter(|(_, c)| c.remaining == 0)
            .map(|(&key, _)| key)
            .collect();

        for key in candidates {
            let Some(constraint) = self.constraints.remove(&key) else {
                continue;
            };
            self.retired.insert(key);
            changed = !constraint.unknowns.is_empty() || changed;

            for safe in constraint.unknowns {
                self.to_click.push(safe);
                for other in self.constraints.values_mut() {
                    other.unknowns.remove(&safe);
                }
            }
        }
        changed
    }

    /// Pairwise subset reduction, interleaved with trivial resolution until
    /// nothing changes.
    ///
    /// Two constraints needing the same number of mines, where one's unknown
    /// set is a strict subset of the other's: the superset's extra cells
    /// cannot hold any of the required mines and are therefore safe.
    pub fn reduce_by_subset(&mut self) {
        while let Some((subset_key, superset_key)) = self.find_subset_pair() {
            let extras: Vec<Cell> = {
                let subset = &self.constraints[&subset_key].unknowns;
                let superset = &self.constraints[&superset_key].unknowns;
                superset.difference(subset).copied().collect()
            };
            for cell in extras {
                self.to_click.push(cell);
                for constraint in self.constraints.values_mut() {
                    constraint.unknowns.remove(&cell);
                }
            }
            self.resolve_trivial();
        }
    }

    fn find_subset_pair(&self) -> Option<(Cell, Cell)> {
        self.constraints
            .iter()
            .tuple_combinations()
            .find_map(|((&a_key, a), (&b_key, b))| {
                if a.remaining != b.remaining || a.unknowns == b.unknowns {
                    return None;
                }
                if a.unknowns.is_subset(&b.unknowns) {
                    Some((a_key, b_key))
                } else if b.unknowns.is_subset(&a.unknowns) {
                    Some((b_key, a_key))
                } else {
                    None
                }
            })
    }

    /// Pops the next queued action, clicks first. Each target is re-checked
    /// against the supplied board: a cell revealed or flagged since it was
    /// queued is skipped, not an error.
    pub fn pop_action(&mut self, board: &SolverBoard) -> Option<Action> {
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

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn live_constraints(&self) -> impl Iterator<Item = (Cell, &Constraint)> {
        self.constraints.iter().map(|(&key, c)| (key, c))
    }

    #[cfg(test)]
    fn insert_raw(&mut self, key: Cell, constraint: Constraint) {
        self.constraints.insert(key, constraint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FLAGGED, UNKNOWN};
    use ndarray::arr2;

    fn cell(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn test_add_constraints_absorbs_flags() {
        // The 2 at (0,0) has one flagged neighbor, so one mine remains.
        let grid = arr2(&[[2, FLAGGED], [UNKNOWN, UNKNOWN]]);
        let board = SolverBoard::from_parts(grid.view(), 2);

        let mut store = ConstraintStore::new();
        store.add_constraints(&board);

        let (_, constraint) = store.live_constraints().next().unwrap();
        assert_eq!(constraint.remaining(), 1);
        assert_eq!(
            constraint.unknowns(),
            &HashSet::from([cell(1, 0), cell(1, 1)])
        );
    }

    #[test]
    fn test_add_constraints_skips_live_and_retired() {
        let grid = arr2(&[[1, UNKNOWN]]);
        let board = SolverBoard::from_parts(grid.view(), 1);

        let mut store = ConstraintStore::new();
        store.add_constraints(&board);
        assert_eq!(store.live_constraints().count(), 1);

        // Re-adding changes nothing while live.
        store.add_constraints(&board);
        assert_eq!(store.live_constraints().count(), 1);

        // Once resolved and retired, the source stays consumed.
        store.resolve_trivial();
        assert!(store.is_empty());
        store.add_constraints(&board);
        assert!(store.is_empty());
    }

    #[test]
    fn test_trivial_mine_resolution_propagates() {
        let mut store = ConstraintStore::new();
        // A forces (1,1) to be a mine; B shares it.
        store.insert_raw(cell(0, 0), Constraint::new([cell(1, 1)], 1));
        store.insert_raw(cell(0, 2), Constraint::new([cell(1, 1), cell(1, 2)], 1));

        store.resolve_trivial();

        assert_eq!(store.to_flag, vec![cell(1, 1)]);
        // B lost its explained mine and resolved to "remaining cells safe".
        assert_eq!(store.to_click, vec![cell(1, 2)]);
        assert!(store.is_empty());
        assert!(store.retired.contains(&cell(0, 0)));
        assert!(store.retired.contains(&cell(0, 2)));
    }

    #[test]
    fn test_trivial_safe_resolution_keeps_counts() {
        let mut store = ConstraintStore::new();
        store.insert_raw(cell(0, 0), Constraint::new([cell(1, 0), cell(1, 1)], 0));
        store.insert_raw(cell(0, 2), Constraint::new([cell(1, 1), cell(1, 2)], 1));

        // A single safe pass: propagation must not touch remaining counts.
        store.resolve_trivial_safe();

        let mut clicked = store.to_click.clone();
        clicked.sort_unstable();
        assert_eq!(clicked, vec![cell(1, 0), cell(1, 1)]);

        // The surviving constraint lost the safe cell but kept its count.
        let (_, survivor) = store.live_constraints().next().unwrap();
        assert_eq!(survivor.unknowns(), &HashSet::from([cell(1, 2)]));
        assert_eq!(survivor.remaining(), 1);
    }

    #[test]
    fn test_fully_satisfied_constraint_retires_silently() {
        let mut store = ConstraintStore::new();
        store.insert_raw(cell(0, 0), Constraint::new([], 0));

        store.resolve_trivial();

        assert!(store.is_empty());
        assert!(store.to_click.is_empty() && store.to_flag.is_empty());
        assert!(store.retired.contains(&cell(0, 0)));
    }

    #[test]
    fn test_prune_leaves_remaining_counts() {
        let mut store = ConstraintStore::new();
        store.insert_raw(cell(0, 0), Constraint::new([cell(1, 0), cell(1, 1)], 1));

        store.prune(&HashSet::from([cell(1, 0)]));

        let (_, constraint) = store.live_constraints().next().unwrap();
        assert_eq!(constraint.unknowns(), &HashSet::from([cell(1, 1)]));
        assert_eq!(constraint.remaining(), 1);
    }

    #[test]
    fn test_subset_reduction_clears_excess() {
        let mut store = ConstraintStore::new();
        // A = {a, b} needs 1; B = {a, b, c, d} needs 1 => c, d are safe.
        let (a, b, c, d) = (cell(2, 0), cell(2, 1), cell(2, 2), cell(2, 3));
        store.insert_raw(cell(0, 0), Constraint::new([a, b], 1));
        store.insert_raw(cell(0, 2), Constraint::new([a, b, c, d], 1));

        store.reduce_by_subset();

        let mut clicked = store.to_click.clone();
        clicked.sort_unstable();
        assert_eq!(clicked, vec![c, d]);
        assert!(store.to_flag.is_empty());

        // Both constraints collapsed to {a, b} needing 1; neither resolved.
        for (_, constraint) in store.live_constraints() {
            assert_eq!(constraint.unknowns(), &HashSet::from([a, b]));
            assert_eq!(constraint.remaining(), 1);
        }
    }

    #[test]
    fn test_subset_reduction_cascades_into_trivial() {
        let mut store = ConstraintStore::new();
        // A ⊂ B proves c safe; with c gone, C pins d as a mine.
        let (a, b, c, d) = (cell(2, 0), cell(2, 1), cell(2, 2), cell(2, 3));
        store.insert_raw(cell(0, 0), Constraint::new([a, b], 1));
        store.insert_raw(cell(0, 1), Constraint::new([a, b, c], 1));
        store.insert_raw(cell(0, 2), Constraint::new([c, d], 1));

        store.reduce_by_subset();

        assert!(store.to_click.contains(&c));
        assert!(store.to_flag.contains(&d));
    }

    #[test]
    fn test_pop_action_refilters_against_board() {
        let grid = arr2(&[[1, UNKNOWN], [2, UNKNOWN]]);
        let board = SolverBoard::from_parts(grid.view(), 2);

        let mut store = ConstraintStore::new();
        store.to_click.push(cell(0, 0)); // already revealed: stale
        store.to_click.push(cell(0, 1));
        assert_eq!(store.pop_action(&board), Some(Action::Click(cell(0, 1))));
        assert_eq!(store.pop_action(&board), None);
    }

    #[test]
    fn test_invariant_remaining_bounded_by_unknowns() {
        let grid = arr2(&[[1, UNKNOWN], [UNKNOWN, UNKNOWN]]);
        let board = SolverBoard::from_parts(grid.view(), 1);

        let mut store = ConstraintStore::new();
        store.add_constraints(&board);
        for (_, constraint) in store.live_constraints() {
            assert!(constraint.remaining() <= constraint.unknowns().len());
        }
    }
}
