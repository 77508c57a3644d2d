//! Seed patterns.

use crate::grid::Grid;
use lifeplus_core::{Position, Result, Species};

/// Built-in point patterns, as `(dx, dy)` offsets from an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Glider,
    LineVertical5,
    LineHorizontal5,
}

impl Pattern {
    pub fn points(self) -> &'static [(i64, i64)] {
        match self {
            Pattern::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Pattern::LineVertical5 => &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
            Pattern::LineHorizontal5 => &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
        }
    }

    /// Species used when the caller does not pick one.
    pub fn default_species(self) -> Species {
        match self {
            Pattern::Glider | Pattern::LineVertical5 => Species::A,
            Pattern::LineHorizontal5 => Species::B,
        }
    }

    pub fn seed(self, grid: &Grid, origin_x: i64, origin_y: i64, species: Option<Species>) -> Result<Grid> {
        let species = species.unwrap_or_else(|| self.default_species());
        seed_points(grid, origin_x, origin_y, self.points(), species)
    }
}

/// OR `species` into a copy of `grid` at each point offset from the origin.
///
/// x wraps; points on rows outside the grid are dropped. Other species bits
/// of the touched cells are kept.
pub fn seed_points(
    grid: &Grid,
    origin_x: i64,
    origin_y: i64,
    points: &[(i64, i64)],
    species: Species,
) -> Result<Grid> {
    grid.validate()?;
    let mut seeded = grid.clone();
    for &(dx, dy) in points {
        let (Some(x), Some(y)) = (origin_x.checked_add(dx), origin_y.checked_add(dy)) else {
            continue;
        };
        let pos = Position::new(x, y);
        let current = seeded.get(pos);
        seeded.set(pos, current | species.bit());
    }
    Ok(seeded)
}

pub fn seed_glider(grid: &Grid, origin_x: i64, origin_y: i64, species: Option<Species>) -> Result<Grid> {
    Pattern::Glider.seed(grid, origin_x, origin_y, species)
}

pub fn seed_line_vertical5(grid: &Grid, origin_x: i64, origin_y: i64, species: Option<Species>) -> Result<Grid> {
    Pattern::LineVertical5.seed(grid, origin_x, origin_y, species)
}

pub fn seed_line_horizontal5(grid: &Grid, origin_x: i64, origin_y: i64, species: Option<Species>) -> Result<Grid> {
    Pattern::LineHorizontal5.seed(grid, origin_x, origin_y, species)
}
