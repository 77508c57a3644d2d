//! 2D species grid.

use lifeplus_core::{cell, Error, Position, Result, Species};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid wrapping on the x axis and open on the y axis.
///
/// Each byte is a bitmask over the species bits in [`cell`]. Dimensions are
/// fixed for the lifetime of a grid and the buffer always holds exactly
/// `width * height` cells. Step functions never modify their input; they
/// return a new grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct GridData {
    width: i64,
    height: i64,
    cells: Vec<u8>,
}

impl TryFrom<GridData> for Grid {
    type Error = Error;

    fn try_from(data: GridData) -> Result<Self> {
        Grid::from_cells(data.width, data.height, data.cells)
    }
}

impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        GridData {
            width: grid.width as i64,
            height: grid.height as i64,
            cells: grid.cells,
        }
    }
}

fn dimension(name: &'static str, value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(Error::InvalidDimension { name, value });
    }
    usize::try_from(value).map_err(|_| Error::InvalidDimension { name, value })
}

impl Grid {
    /// Create an empty grid. Both dimensions must be positive.
    pub fn new(width: i64, height: i64) -> Result<Self> {
        let w = dimension("width", width)?;
        let h = dimension("height", height)?;
        let size = w
            .checked_mul(h)
            .ok_or(Error::InvalidDimension { name: "height", value: height })?;
        Ok(Self {
            width: w,
            height: h,
            cells: vec![0; size],
        })
    }

    /// Wrap an existing cell buffer.
    pub fn from_cells(width: i64, height: i64, cells: Vec<u8>) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidGrid(format!(
                "dimensions must be positive integers (got {}x{})",
                width, height
            )));
        }
        let grid = Self {
            width: width as usize,
            height: height as usize,
            cells,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the buffer against the dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidGrid(format!(
                "dimensions must be positive integers (got {}x{})",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(expected) if expected == self.cells.len() => Ok(()),
            Some(expected) => Err(Error::InvalidGrid(format!(
                "cells has length {}, expected {}",
                self.cells.len(),
                expected
            ))),
            None => Err(Error::InvalidGrid("width*height overflows".to_string())),
        }
    }

    /// A grid of the same dimensions holding `cells`.
    pub(crate) fn with_cells(&self, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Buffer index of a position, wrapping x and clipping y.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.y < 0 || pos.y >= self.height as i64 {
            return None;
        }
        let wrapped = pos.wrap_x(self.width as i64);
        Some(wrapped.y as usize * self.width + wrapped.x as usize)
    }

    /// Cell at a position; rows outside the grid read as empty.
    pub fn get(&self, pos: Position) -> u8 {
        self.index_of(pos).map_or(0, |index| self.cells[index])
    }

    /// Overwrite a cell. Returns false if the row is outside the grid.
    pub fn set(&mut self, pos: Position, cell: u8) -> bool {
        match self.index_of(pos) {
            Some(index) => {
                self.cells[index] = cell;
                true
            }
            None => false,
        }
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index % self.width) as i64;
        let y = (index / self.width) as i64;
        Position::new(x, y)
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (self.index_to_pos(i), cell))
    }

    /// Number of cells carrying each species, in order A, B, C.
    pub fn population(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for &cell in &self.cells {
            for (count, species) in counts.iter_mut().zip(Species::ALL) {
                if cell & species.bit() != 0 {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Species bits present anywhere on row `y`.
    pub fn row_species(&self, y: usize) -> u8 {
        if y >= self.height {
            return 0;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .fold(0, |mask, &cell| mask | cell)
            & cell::SPECIES
    }

    /// Species bits present on the top row (`y = height - 1`).
    pub fn top_row_species(&self) -> u8 {
        self.row_species(self.height - 1)
    }

    /// True if no cell holds more than one species and no stray bits.
    pub fn is_exclusive(&self) -> bool {
        self.cells.iter().all(|&cell| is_exclusive_cell(cell))
    }
}

/// True for an empty cell or a cell holding exactly one species bit.
pub(crate) fn is_exclusive_cell(cell: u8) -> bool {
    cell == 0 || cell == cell::A || cell == cell::B || cell == cell::C
}

/// Rows are printed with the highest row first, so north points up.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            let line: String = row
                .iter()
                .map(|&cell| match Species::from_bit(cell & cell::SPECIES) {
                    Some(species) => species.label().chars().next().unwrap_or('?'),
                    None if cell & cell::SPECIES == 0 => '.',
                    None => '#',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 4).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.cells().len(), 40);
        assert!(grid.cells().iter().all(|&cell| cell == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(Error::InvalidDimension { name: "width", value: 0 })
        ));
        assert!(matches!(
            Grid::new(5, -2),
            Err(Error::InvalidDimension { name: "height", value: -2 })
        ));
    }

    #[test]
    fn test_from_cells_validates_length() {
        assert!(Grid::from_cells(2, 2, vec![0, 1, 2, 4]).is_ok());
        assert!(matches!(
            Grid::from_cells(2, 2, vec![0, 1, 2]),
            Err(Error::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::from_cells(0, 2, vec![]),
            Err(Error::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_high_bits_accepted() {
        let grid = Grid::from_cells(1, 1, vec![0xf8]).unwrap();
        assert_eq!(grid.cells(), &[0xf8]);
        assert!(!grid.is_exclusive());
    }

    #[test]
    fn test_x_wraps_y_clips() {
        let mut grid = Grid::new(5, 3).unwrap();
        assert!(grid.set(Position::new(-1, 1), cell::B));
        assert_eq!(grid.get(Position::new(4, 1)), cell::B);
        assert_eq!(grid.get(Position::new(9, 1)), cell::B);

        assert!(!grid.set(Position::new(0, 3), cell::A));
        assert!(!grid.set(Position::new(0, -1), cell::A));
        assert_eq!(grid.get(Position::new(0, -1)), 0);
        assert_eq!(grid.population(), [0, 1, 0]);
    }

    #[test]
    fn test_population_and_rows() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(Position::new(0, 0), cell::A | cell::C);
        grid.set(Position::new(2, 1), cell::B);
        assert_eq!(grid.population(), [1, 1, 1]);
        assert_eq!(grid.row_species(0), cell::A | cell::C);
        assert_eq!(grid.top_row_species(), cell::B);
        assert_eq!(grid.row_species(7), 0);
    }

    #[test]
    fn test_iter_positions() {
        let grid = Grid::new(3, 2).unwrap();
        let positions: Vec<Position> = grid.iter().map(|(pos, _)| pos).collect();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[4], Position::new(1, 1));
    }

    #[test]
    fn test_display_north_up() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(Position::new(0, 0), cell::A);
        grid.set(Position::new(1, 1), cell::B | cell::C);
        grid.set(Position::new(2, 1), cell::C);
        assert_eq!(grid.to_string(), ".#C\nA..\n");
    }

    #[test]
    fn test_serde_validates() {
        let grid: Grid = serde_json::from_str(r#"{"width":2,"height":1,"cells":[1,2]}"#).unwrap();
        assert_eq!(grid.cells(), &[1, 2]);

        let bad = serde_json::from_str::<Grid>(r#"{"width":2,"height":2,"cells":[1,2]}"#);
        assert!(bad.is_err());
    }
}
