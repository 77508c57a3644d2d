//! Directional step engine.
//!
//! Each species sees its neighbors as an 8-bit direction mask and is
//! evaluated against the compiled rule set. Draws are taken from the
//! caller's [`RandomSource`] in a fixed order, so a seeded source replays a
//! run exactly:
//!
//! 1. exclusive sanitization, cell by cell, for contested cells only;
//! 2. then for each cell in row-major order, birth draws in species order
//!    A, B, C (one per matching birth rule), followed in exclusive mode by a
//!    tie-break draw when more than one species was born.

use crate::directional::{compile_rule_set, CompiledRuleSet};
use crate::exclusive::{pick_one, sanitize_cells};
use crate::grid::Grid;
use crate::neighborhood::Neighborhood;
use crate::random::RandomSource;
use lifeplus_core::{cell, DirectionalRuleSet, MetaRules, Result, Species};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::borrow::Cow;

/// Advance one generation under a directional rule set.
pub fn step_directional<R: RandomSource + ?Sized>(
    grid: &Grid,
    rule_set: &DirectionalRuleSet,
    rng: &mut R,
    meta: &MetaRules,
) -> Result<Grid> {
    grid.validate()?;
    let compiled = compile_rule_set(rule_set);
    step_compiled(grid, &compiled, rng, meta.exclusive_cell)
}

/// Advance one generation with a non-deterministic source.
pub fn step_directional_from_entropy(
    grid: &Grid,
    rule_set: &DirectionalRuleSet,
    meta: &MetaRules,
) -> Result<Grid> {
    let mut rng = ChaCha8Rng::from_entropy();
    step_directional(grid, rule_set, &mut rng, meta)
}

/// Advance one generation under an already compiled rule set.
pub fn step_compiled<R: RandomSource + ?Sized>(
    grid: &Grid,
    rules: &CompiledRuleSet,
    rng: &mut R,
    exclusive_cell: bool,
) -> Result<Grid> {
    grid.validate()?;

    let width = grid.width();
    let height = grid.height();
    let cells: Cow<'_, [u8]> = if exclusive_cell {
        match sanitize_cells(grid.cells(), rng) {
            Some(sanitized) => Cow::Owned(sanitized),
            None => Cow::Borrowed(grid.cells()),
        }
    } else {
        Cow::Borrowed(grid.cells())
    };

    let mut next_cells = vec![0u8; cells.len()];
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let hood = Neighborhood::gather(&cells, width, height, x, y);
            let masks = Species::ALL.map(|species| hood.direction_mask(species.bit()));
            next_cells[idx] = if exclusive_cell {
                next_exclusive(cells[idx], &masks, rules, rng)
            } else {
                next_shared(cells[idx], &masks, rules, rng)
            };
        }
    }

    Ok(grid.with_cells(next_cells))
}

/// Species share the cell; each is evaluated on its own.
fn next_shared<R: RandomSource + ?Sized>(
    current: u8,
    masks: &[u8; 3],
    rules: &CompiledRuleSet,
    rng: &mut R,
) -> u8 {
    let mut next = 0;
    for (species, &mask) in Species::ALL.iter().zip(masks) {
        let bit = species.bit();
        let alive = if current & bit != 0 {
            rules.survives(mask)
        } else {
            rules.birth_triggered(mask, rng)
        };
        if alive {
            next |= bit;
        }
    }
    next
}

/// The cell has a single owner.
///
/// A dying incumbent is not a birth candidate for its own cell in the same
/// generation; only the other two species may take it over.
fn next_exclusive<R: RandomSource + ?Sized>(
    current: u8,
    masks: &[u8; 3],
    rules: &CompiledRuleSet,
    rng: &mut R,
) -> u8 {
    let incumbent = Species::from_bit(current);
    if let Some(species) = incumbent {
        if rules.survives(masks[species as usize]) {
            return species.bit();
        }
    }

    let mut born = 0;
    for (species, &mask) in Species::ALL.iter().zip(masks) {
        if Some(*species) == incumbent {
            continue;
        }
        if rules.birth_triggered(mask, rng) {
            born |= species.bit();
        }
    }
    pick_one(born & cell::SPECIES, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;
    use lifeplus_core::{dir, DirectionalRule, Position};

    fn rule(alive: u8, dead: u8) -> DirectionalRule {
        DirectionalRule::new(i64::from(alive), i64::from(dead))
    }

    const SHARED: MetaRules = MetaRules {
        exclusive_cell: false,
        end_on_top: false,
    };
    const EXCLUSIVE: MetaRules = MetaRules {
        exclusive_cell: true,
        end_on_top: false,
    };

    #[test]
    fn test_always_born_never_survive() {
        let set = DirectionalRuleSet::survive(vec![rule(0, 0).with_probability(1.0)], vec![]);
        let mut grid = Grid::new(4, 3).unwrap();
        grid.set(Position::new(1, 1), cell::A);
        grid.set(Position::new(2, 2), cell::A | cell::B);

        let mut rng = ScriptedSource::new(vec![0.5]);
        let next = step_directional(&grid, &set, &mut rng, &SHARED).unwrap();
        for (pos, value) in next.iter() {
            let before = grid.get(pos);
            assert_eq!(value, !before & cell::SPECIES, "at {:?}", pos);
        }
        // One draw per absent species per cell.
        let absent: u32 = grid.cells().iter().map(|&c| 3 - c.count_ones()).sum();
        assert_eq!(rng.draws(), absent as usize);
    }

    #[test]
    fn test_directional_birth_is_direction_sensitive() {
        // Born when the southern neighbor (row y - 1) holds the species.
        let set = DirectionalRuleSet::death(vec![rule(dir::S, 0)], vec![]);
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(Position::new(1, 0), cell::C);

        let mut rng = ScriptedSource::new(vec![0.0]);
        let next = step_directional(&grid, &set, &mut rng, &SHARED).unwrap();
        assert_eq!(next.get(Position::new(1, 0)), cell::C);
        assert_eq!(next.get(Position::new(1, 1)), cell::C);
        assert_eq!(next.population(), [0, 0, 2]);
    }

    #[test]
    fn test_death_mode_kills_on_match() {
        // Dies when nothing is to the east.
        let set = DirectionalRuleSet::death(vec![], vec![rule(0, dir::E)]);
        let mut grid = Grid::new(4, 1).unwrap();
        grid.set(Position::new(0, 0), cell::B);
        grid.set(Position::new(1, 0), cell::B);

        let mut rng = ScriptedSource::default();
        let next = step_directional(&grid, &set, &mut rng, &SHARED).unwrap();
        assert_eq!(next.cells(), &[cell::B, 0, 0, 0]);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_shared_mode_keeps_coexisting_species() {
        let set = DirectionalRuleSet::death(vec![], vec![]);
        let grid = Grid::from_cells(2, 1, vec![cell::SPECIES, cell::A | 0x40]).unwrap();
        let mut rng = ScriptedSource::default();
        let next = step_directional(&grid, &set, &mut rng, &SHARED).unwrap();
        assert_eq!(next.cells(), &[cell::SPECIES, cell::A]);
    }

    #[test]
    fn test_exclusive_sanitizes_before_stepping() {
        let set = DirectionalRuleSet::death(vec![], vec![]);
        let grid = Grid::from_cells(3, 1, vec![cell::A | cell::B, 0, cell::SPECIES]).unwrap();
        let mut rng = ScriptedSource::new(vec![0.6, 0.1]);
        let next = step_directional(&grid, &set, &mut rng, &EXCLUSIVE).unwrap();
        assert_eq!(next.cells(), &[cell::B, 0, cell::A]);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_exclusive_empty_cell_tie_break() {
        // Every species is born everywhere; contention is settled per cell.
        let set = DirectionalRuleSet::survive(vec![rule(0, 0)], vec![]);
        let grid = Grid::new(1, 1).unwrap();
        // Three birth draws (all succeed), then the tie-break 0.7 -> C.
        let mut rng = ScriptedSource::new(vec![0.0, 0.0, 0.0, 0.7]);
        let next = step_directional(&grid, &set, &mut rng, &EXCLUSIVE).unwrap();
        assert_eq!(next.cells(), &[cell::C]);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_exclusive_single_candidate_skips_tie_break() {
        let set = DirectionalRuleSet::survive(vec![rule(0, 0).with_probability(0.5)], vec![]);
        let grid = Grid::new(1, 1).unwrap();
        // Only B's draw succeeds.
        let mut rng = ScriptedSource::new(vec![0.9, 0.1, 0.9]);
        let next = step_directional(&grid, &set, &mut rng, &EXCLUSIVE).unwrap();
        assert_eq!(next.cells(), &[cell::B]);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_exclusive_incumbent_not_reborn() {
        // Survive mode with no alive rules: every occupant dies, and birth
        // always succeeds. The dying A can only be replaced by B or C.
        let set = DirectionalRuleSet::survive(vec![rule(0, 0)], vec![]);
        let grid = Grid::from_cells(1, 1, vec![cell::A]).unwrap();
        // Two birth draws (B, C), then tie-break 0.0 picks B.
        let mut rng = ScriptedSource::new(vec![0.0, 0.0, 0.0]);
        let next = step_directional(&grid, &set, &mut rng, &EXCLUSIVE).unwrap();
        assert_eq!(next.cells(), &[cell::B]);
        assert_eq!(rng.draws(), 3);

        // Shared mode: A dies, B and C are both born.
        let mut rng = ScriptedSource::new(vec![0.0]);
        let next = step_directional(&grid, &set, &mut rng, &SHARED).unwrap();
        assert_eq!(next.cells(), &[cell::B | cell::C]);
    }

    #[test]
    fn test_exclusive_survivor_draws_nothing() {
        let set = DirectionalRuleSet::death(vec![rule(0, 0)], vec![]);
        let grid = Grid::from_cells(2, 1, vec![cell::C, cell::C]).unwrap();
        let mut rng = ScriptedSource::new(vec![0.0]);
        let next = step_directional(&grid, &set, &mut rng, &EXCLUSIVE).unwrap();
        assert_eq!(next.cells(), &[cell::C, cell::C]);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let set = DirectionalRuleSet::survive(
            vec![rule(dir::W, 0).with_probability(0.6), rule(dir::S, dir::N).with_probability(0.3)],
            vec![rule(dir::S, 0), rule(dir::E | dir::W, 0)],
        );
        let mut grid = Grid::new(12, 8).unwrap();
        grid.set(Position::new(3, 0), cell::A);
        grid.set(Position::new(7, 0), cell::B | cell::C);

        for meta in [SHARED, EXCLUSIVE] {
            let mut first = grid.clone();
            let mut second = grid.clone();
            let mut rng1 = crate::random::Mulberry32::new(99);
            let mut rng2 = crate::random::Mulberry32::new(99);
            for _ in 0..10 {
                first = step_directional(&first, &set, &mut rng1, &meta).unwrap();
                second = step_directional(&second, &set, &mut rng2, &meta).unwrap();
            }
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_entropy_step_keeps_dimensions() {
        let set = DirectionalRuleSet::survive(vec![rule(0, 0).with_probability(0.5)], vec![]);
        let grid = Grid::new(7, 5).unwrap();
        let next = step_directional_from_entropy(&grid, &set, &EXCLUSIVE).unwrap();
        assert_eq!((next.width(), next.height()), (7, 5));
        assert!(next.is_exclusive());
    }
}
