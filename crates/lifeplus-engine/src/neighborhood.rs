//! Moore neighborhood sampling.
//!
//! x wraps around the grid; rows beyond the bottom or top edge read as
//! empty cells.

use lifeplus_core::Direction;

/// The eight neighbor cells of one position, indexed by [`Direction`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Neighborhood([u8; 8]);

impl Neighborhood {
    pub(crate) fn gather(cells: &[u8], width: usize, height: usize, x: usize, y: usize) -> Self {
        let (w, h) = (width as i64, height as i64);
        Self(Direction::all().map(|direction| {
            let (dx, dy) = direction.to_delta();
            let ny = y as i64 + dy;
            if !(0..h).contains(&ny) {
                return 0;
            }
            let nx = (x as i64 + dx).rem_euclid(w);
            cells[(ny * w + nx) as usize]
        }))
    }

    pub(crate) fn get(&self, direction: Direction) -> u8 {
        self.0[direction.index() as usize]
    }

    /// Number of neighbors carrying `bit`.
    pub(crate) fn count(&self, bit: u8) -> u32 {
        self.0.iter().filter(|&&cell| cell & bit != 0).count() as u32
    }

    /// Direction mask of the neighbors carrying `bit`.
    pub(crate) fn direction_mask(&self, bit: u8) -> u8 {
        Direction::all()
            .into_iter()
            .filter(|&direction| self.get(direction) & bit != 0)
            .fold(0, |mask, direction| mask | direction.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeplus_core::{cell, dir};

    fn cells_with(width: usize, height: usize, live: &[(usize, usize, u8)]) -> Vec<u8> {
        let mut cells = vec![0; width * height];
        for &(x, y, bits) in live {
            cells[y * width + x] |= bits;
        }
        cells
    }

    #[test]
    fn test_directions_follow_row_order() {
        // Center at (1, 1) on a 3x3 grid.
        let cells = cells_with(3, 3, &[(1, 2, cell::A), (0, 0, cell::A), (2, 1, cell::B)]);
        let hood = Neighborhood::gather(&cells, 3, 3, 1, 1);
        assert_eq!(hood.get(Direction::North), cell::A);
        assert_eq!(hood.get(Direction::SouthWest), cell::A);
        assert_eq!(hood.get(Direction::East), cell::B);
        assert_eq!(hood.direction_mask(cell::A), dir::N | dir::SW);
        assert_eq!(hood.direction_mask(cell::B), dir::E);
        assert_eq!(hood.count(cell::A), 2);
        assert_eq!(hood.count(cell::C), 0);
    }

    #[test]
    fn test_each_direction_reads_its_delta() {
        for direction in Direction::all() {
            let (dx, dy) = direction.to_delta();
            let cells = cells_with(3, 3, &[((1 + dx) as usize, (1 + dy) as usize, cell::C)]);
            let hood = Neighborhood::gather(&cells, 3, 3, 1, 1);
            assert_eq!(hood.direction_mask(cell::C), direction.bit());
        }
    }

    #[test]
    fn test_x_wraps() {
        let cells = cells_with(4, 1, &[(0, 0, cell::C)]);
        let hood = Neighborhood::gather(&cells, 4, 1, 3, 0);
        assert_eq!(hood.direction_mask(cell::C), dir::E);

        let cells = cells_with(4, 1, &[(3, 0, cell::C)]);
        let hood = Neighborhood::gather(&cells, 4, 1, 0, 0);
        assert_eq!(hood.direction_mask(cell::C), dir::W);
    }

    #[test]
    fn test_y_is_open() {
        // Fully populated 3x2 grid: the bottom row has no southern neighbors,
        // the top row no northern ones.
        let cells = vec![cell::A; 6];
        let bottom = Neighborhood::gather(&cells, 3, 2, 1, 0);
        assert_eq!(bottom.direction_mask(cell::A), dir::N | dir::NE | dir::E | dir::W | dir::NW);
        let top = Neighborhood::gather(&cells, 3, 2, 1, 1);
        assert_eq!(top.direction_mask(cell::A), dir::E | dir::SE | dir::S | dir::SW | dir::W);
    }

    #[test]
    fn test_narrow_grid_counts_wrapped_self_column() {
        // Width 1: east and west both resolve to the cell's own column.
        let cells = vec![cell::B; 3];
        let hood = Neighborhood::gather(&cells, 1, 3, 0, 1);
        assert_eq!(hood.count(cell::B), 8);
    }
}
