use super::board::SolverBoard;
use crate::codec::Tile;
use crate::Cell;
use itertools::Itertools;
use statrs::function::factorial::binomial;

/// Cap on the number of candidate placements the engine will enumerate.
/// Above it the caller gets nothing back and degrades to a random guess.
pub const ENUMERATION_BUDGET: f64 = 100_000.0;

/// A revealed number reduced to the unknown cells it watches: of those,
/// `required` must be mines once the fixed flags are subtracted.
struct NumberConstraint {
    required: usize,
    watched: Vec<usize>,
}

/// Returns the unknown cell least likely to be a mine, estimated by
/// enumerating every mine placement consistent with the revealed numbers.
///
/// This is a guess, not a guaranteed-safe move; it is only worth calling when
/// no unconditionally safe action exists. Ties break to the first cell in
/// row-major order so a seeded run is reproducible.
pub fn least_likely_mine(board: &SolverBoard) -> Option<Cell> {
    let probabilities = mine_probabilities(board)?;
    probabilities
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(cell, _)| cell)
}

/// Estimated mine probability for every unknown cell: the fraction of
/// surviving candidate placements that put a mine there.
///
/// Returns `None` when the placement space `C(|unknowns|, k)` exceeds
/// [`ENUMERATION_BUDGET`], when the flags already contradict the numbers, or
/// when no placement survives; all of these mean "fall back to random", not
/// failure.
pub fn mine_probabilities(board: &SolverBoard) -> Option<Vec<(Cell, f64)>> {
    let unknowns = board.unknown_cells();
    if unknowns.is_empty() {
        return None;
    }

    // k mines are still unplaced; every candidate is a size-k subset of the
    // unknown cells merged with the flags already on the board.
    let k = board.total_mines().checked_sub(board.flagged_count())?;
    if k > unknowns.len() {
        return None;
    }
    if binomial(unknowns.len() as u64, k as u64) > ENUMERATION_BUDGET {
        return None;
    }

    let constraints = gather_constraints(board, &unknowns)?;

    let mut hits = vec![0usize; unknowns.len()];
    let mut surviving = 0usize;
    let mut in_placement = vec![false; unknowns.len()];

    for placement in (0..unknowns.len()).combinations(k) {
        for &i in &placement {
            in_placement[i] = true;
        }
        let consistent = constraints
            .iter()
            .all(|c| c.watched.iter().filter(|&&i| in_placement[i]).count() == c.required);
        if consistent {
            surviving += 1;
            for &i in &placement {
                hits[i] += 1;
            }
        }
        for &i in &placement {
            in_placement[i] = false;
        }
    }

    if surviving == 0 {
        return None;
    }
    Some(
        unknowns
            .iter()
            .zip(&hits)
            .map(|(&cell, &h)| (cell, h as f64 / surviving as f64))
            .collect(),
    )
}

/// Reduces every revealed number to a requirement on the unknown cells it
/// neighbors. Numbers watching no unknowns are dropped: with the flags fixed
/// they hold or fail identically across all placements. Returns `None` when
/// some number can no longer be met, which dooms every placement.
fn gather_constraints(board: &SolverBoard, unknowns: &[Cell]) -> Option<Vec<NumberConstraint>> {
    let index_of = |cell: Cell| unknowns.iter().position(|&u| u == cell);

    let mut constraints = Vec::new();
    for (cell, count) in board.revealed_counts() {
        let mut watched = Vec::new();
        let mut flagged = 0usize;
        for neighbor in board.neighbors(cell) {
            match board.get(neighbor) {
                Tile::Unknown => watched.push(index_of(neighbor)?),
                Tile::Flagged => flagged += 1,
                _ => {}
            }
        }
        if watched.is_empty() {
            continue;
        }
        let required = (count as usize).checked_sub(flagged)?;
        if required > watched.len() {
            return None;
        }
        constraints.push(NumberConstraint { required, watched });
    }
    Some(constraints)
}
