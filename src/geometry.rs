//! Grid geometry types
//!
//! Headings, grid cells and poses for a 9x9 ruled surface. Columns run
//! west-to-east (1..=9, written A..=I in mission text), rows run
//! south-to-north (1..=9). North increases the row, East increases the
//! column.

/// Lowest valid row/column index.
pub const GRID_MIN: u8 = 1;

/// Highest valid row/column index.
pub const GRID_MAX: u8 = 9;

/// Cardinal heading of the vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Rotate 90 degrees counter-clockwise.
    pub fn rotate_left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Unit step (dcol, drow) when advancing one cell along this heading.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// Compact discriminant for the packed pose encoding.
    pub fn to_index(self) -> u8 {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }

    /// Inverse of [`to_index`](Heading::to_index); values above 3 wrap.
    pub fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Heading::North,
            1 => Heading::East,
            2 => Heading::South,
            _ => Heading::West,
        }
    }
}

/// One grid junction, column and row both in 1..=9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub col: u8,
    pub row: u8,
}

impl Cell {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Check both coordinates against the grid bounds.
    pub fn in_bounds(self) -> bool {
        (GRID_MIN..=GRID_MAX).contains(&self.col) && (GRID_MIN..=GRID_MAX).contains(&self.row)
    }
}

/// Logical position and orientation of the vehicle on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pose {
    pub cell: Cell,
    pub heading: Heading,
}

impl Pose {
    pub const fn new(cell: Cell, heading: Heading) -> Self {
        Self { cell, heading }
    }

    /// Move one cell along the current heading.
    ///
    /// Coordinates saturate at the grid bounds; a valid mission never asks
    /// for a step off the grid, so saturation is a defensive clamp only.
    pub fn advance(&mut self) {
        let (dc, dr) = self.heading.delta();
        self.cell.col = add_clamped(self.cell.col, dc);
        self.cell.row = add_clamped(self.cell.row, dr);
    }
}

fn add_clamped(coord: u8, delta: i8) -> u8 {
    let moved = coord.saturating_add_signed(delta);
    moved.clamp(GRID_MIN, GRID_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_HEADINGS: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    #[test]
    fn test_rotate_left_then_right_is_identity() {
        for h in ALL_HEADINGS {
            assert_eq!(h.rotate_right().rotate_left(), h);
            assert_eq!(h.rotate_left().rotate_right(), h);
        }
    }

    #[test]
    fn test_four_right_rotations_are_identity() {
        for h in ALL_HEADINGS {
            let r = h.rotate_right().rotate_right().rotate_right().rotate_right();
            assert_eq!(r, h);
        }
    }

    #[test]
    fn test_four_left_rotations_are_identity() {
        for h in ALL_HEADINGS {
            let l = h.rotate_left().rotate_left().rotate_left().rotate_left();
            assert_eq!(l, h);
        }
    }

    #[test]
    fn test_heading_index_round_trip() {
        for h in ALL_HEADINGS {
            assert_eq!(Heading::from_index(h.to_index()), h);
        }
    }

    #[test]
    fn test_delta_directions() {
        assert_eq!(Heading::North.delta(), (0, 1));
        assert_eq!(Heading::East.delta(), (1, 0));
        assert_eq!(Heading::South.delta(), (0, -1));
        assert_eq!(Heading::West.delta(), (-1, 0));
    }

    #[test]
    fn test_pose_advance() {
        let mut pose = Pose::new(Cell::new(2, 1), Heading::North);
        pose.advance();
        assert_eq!(pose.cell, Cell::new(2, 2));

        pose.heading = Heading::East;
        pose.advance();
        assert_eq!(pose.cell, Cell::new(3, 2));
    }

    #[test]
    fn test_pose_advance_clamps_at_grid_edge() {
        let mut pose = Pose::new(Cell::new(9, 9), Heading::North);
        pose.advance();
        assert_eq!(pose.cell, Cell::new(9, 9));

        pose.heading = Heading::East;
        pose.advance();
        assert_eq!(pose.cell, Cell::new(9, 9));

        let mut pose = Pose::new(Cell::new(1, 1), Heading::South);
        pose.advance();
        assert_eq!(pose.cell, Cell::new(1, 1));
    }

    #[test]
    fn test_cell_bounds() {
        assert!(Cell::new(1, 1).in_bounds());
        assert!(Cell::new(9, 9).in_bounds());
        assert!(!Cell::new(0, 5).in_bounds());
        assert!(!Cell::new(5, 10).in_bounds());
    }
}
