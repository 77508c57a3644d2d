//! Single-owner cells.
//!
//! Under the exclusive-cell meta-rule every cell holds at most one species.
//! Contention between several candidate species is settled by one uniform
//! draw over the candidates, taken in the fixed order A, B, C.

use crate::grid::{is_exclusive_cell, Grid};
use crate::random::RandomSource;
use lifeplus_core::{cell, Species};

/// Reduce a species mask to a single species bit.
///
/// Zero or one candidate resolves without drawing; several candidates take
/// one draw `floor(r * count)` indexing the candidates in order A, B, C.
/// Bits outside the species range are discarded.
pub fn pick_one<R: RandomSource + ?Sized>(mask: u8, rng: &mut R) -> u8 {
    let candidates = mask & cell::SPECIES;
    let count = candidates.count_ones() as usize;
    if count <= 1 {
        return candidates;
    }

    let pick = ((rng.next_f64() * count as f64).floor() as usize).min(count - 1);
    Species::ALL
        .iter()
        .map(|species| species.bit())
        .filter(|&bit| candidates & bit != 0)
        .nth(pick)
        .unwrap_or(0)
}

/// Bring a cell buffer into exclusive form.
///
/// Returns `None` when every cell is already empty or single-species, in
/// which case nothing is drawn.
pub(crate) fn sanitize_cells<R: RandomSource + ?Sized>(cells: &[u8], rng: &mut R) -> Option<Vec<u8>> {
    if cells.iter().all(|&c| is_exclusive_cell(c)) {
        return None;
    }
    Some(
        cells
            .iter()
            .map(|&c| if is_exclusive_cell(c) { c } else { pick_one(c, rng) })
            .collect(),
    )
}

/// Normalize a grid so that no cell holds more than one species.
pub fn normalize_exclusive<R: RandomSource + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    match sanitize_cells(grid.cells(), rng) {
        Some(cells) => grid.with_cells(cells),
        None => grid.clone(),
    }
}
